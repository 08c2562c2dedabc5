use chrono::{DateTime, Utc};
use scraper::{ElementRef, Html};

use crate::field::{self, Candidate, Extract};
use crate::model::{Chapter, ContentRating, SeriesDetail, SeriesState, SeriesSummary, Tag};
use crate::site::Site;

const TITLE: &[Candidate] = &[
    Candidate::select("h1", Extract::Text),
    Candidate::select("h2", Extract::Text),
    Candidate::select("h3", Extract::Text),
];

const COVER: &[Candidate] = &[
    Candidate::select(".series-cover img", Extract::Image),
    Candidate::select(".cover img", Extract::Image),
    Candidate::select(".summary_image img", Extract::Image),
    Candidate::select("img.cover", Extract::Image),
    Candidate::select("meta[property='og:image']", Extract::Url("content")),
];

const DESCRIPTION: &[Candidate] = &[
    Candidate::select(".series-description", Extract::InnerHtml),
    Candidate::select(".description", Extract::InnerHtml),
    Candidate::select(".summary", Extract::InnerHtml),
    Candidate::select(".synopsis", Extract::InnerHtml),
    Candidate::select("#description", Extract::InnerHtml),
];

const AUTHOR: &[Candidate] = &[
    Candidate::select(".author a", Extract::Text),
    Candidate::select(".author", Extract::Text),
    Candidate::select(".authors", Extract::Text),
    Candidate::select(".artist", Extract::Text),
];

const STATUS: &[Candidate] = &[
    Candidate::select(".series-status", Extract::Text),
    Candidate::select(".status", Extract::Text),
];

const TAG_SELECTORS: &[&str] = &[
    ".genres a[href]",
    ".tags a[href]",
    "a[href*='/genre/']",
    "a[href*='/tag/']",
];

const CHAPTER_SELECTORS: &[&str] = &[
    "ul.chapter-list a[href]",
    ".chapter-list a[href]",
    ".chapters a[href]",
    "a.chapter-link[href]",
    "a[href*='/chapter']",
];

const CHAPTER_TITLE: &[Candidate] = &[
    Candidate::select(".chapter-title", Extract::Text),
    Candidate::select(".title", Extract::Text),
    Candidate::select(".name", Extract::Text),
    Candidate::scope(Extract::Attr("title")),
];

const CHAPTER_DATE: &[Candidate] = &[
    Candidate::select("time", Extract::Attr("datetime")),
    Candidate::select("time", Extract::Text),
    Candidate::select(".chapter-date", Extract::Text),
    Candidate::select(".date", Extract::Text),
    Candidate::select(".time", Extract::Text),
];

const CHAPTER_NUMBER_ATTRIBUTES: &[&str] = &["data-number", "data-chapter", "data-num"];

const DATE_CLASSES: &[&str] = &["chapter-date", "date", "time"];

const ADULT_TAGS: &[&str] = &["adult", "hentai", "mature", "smut", "18"];
const SUGGESTIVE_TAGS: &[&str] = &["ecchi", "harem", "suggestive"];

/// Extracts a series page. Identity comes from `existing`; state and content rating are kept
/// from it when the page says nothing about them. `now` anchors relative chapter dates.
pub fn extract_detail(
    document: &Html,
    site: &Site,
    existing: &SeriesSummary,
    now: DateTime<Utc>,
) -> SeriesDetail {
    let root = document.root_element();

    let title = field::resolve(root, TITLE, site).unwrap_or_else(|| existing.title.clone());
    let cover_url = field::resolve(root, COVER, site);
    let description = field::resolve(root, DESCRIPTION, site);
    let tags = extract_tags(root, site);
    let authors = field::resolve(root, AUTHOR, site).into_iter().collect();
    let state = field::resolve(root, STATUS, site)
        .map(|label| SeriesState::from_label(&label))
        .filter(|state| *state != SeriesState::Unknown)
        .unwrap_or(existing.state);
    let content_rating = rating_from_tags(&tags, existing.content_rating);
    let chapters = extract_chapters(root, site, now);

    tracing::debug!(
        url = %existing.absolute_url,
        tags = tags.len(),
        chapters = chapters.len(),
        "extracted series detail"
    );

    SeriesDetail {
        summary: SeriesSummary {
            id: existing.id.clone(),
            title,
            relative_url: existing.relative_url.clone(),
            absolute_url: existing.absolute_url.clone(),
            cover_url,
            content_rating,
            state,
        },
        description,
        tags,
        authors,
        chapters,
    }
}

fn extract_tags(root: ElementRef<'_>, site: &Site) -> Vec<Tag> {
    let mut tags: Vec<Tag> = Vec::new();
    for link in field::select_all(root, TAG_SELECTORS) {
        let Some(key) = link
            .value()
            .attr("href")
            .and_then(|href| site.last_path_segment(href))
            .map(|segment| segment.to_lowercase())
        else {
            continue;
        };
        if tags.iter().any(|tag| tag.key == key) {
            continue;
        }

        let text = field::text(link);
        let title = if text.is_empty() {
            title_case(&key.replace('-', " "))
        } else {
            title_case(&text)
        };
        tags.push(Tag { key, title });
    }
    tags
}

fn extract_chapters(root: ElementRef<'_>, site: &Site, now: DateTime<Utc>) -> Vec<Chapter> {
    field::select_all(root, CHAPTER_SELECTORS)
        .into_iter()
        .enumerate()
        .filter_map(|(index, anchor)| {
            let href = anchor.value().attr("href")?;
            let Some(url) = site.relative_url(href) else {
                tracing::debug!(href, "chapter link does not resolve; skipping");
                return None;
            };

            let number = explicit_chapter_number(anchor).unwrap_or((index + 1) as f32);
            let title = field::resolve(anchor, CHAPTER_TITLE, site).or_else(|| {
                let text = text_without_dates(anchor);
                (!text.is_empty()).then_some(text)
            });
            let upload_date = crate::date::parse_date_at(&chapter_date_text(anchor, site), now);

            Some(Chapter {
                id: crate::model::chapter_id(&url),
                title,
                number,
                upload_date,
                url,
            })
        })
        .collect()
}

fn explicit_chapter_number(anchor: ElementRef<'_>) -> Option<f32> {
    let element = anchor.value();
    CHAPTER_NUMBER_ATTRIBUTES
        .iter()
        .filter_map(|name| element.attr(name))
        .filter_map(|value| value.trim().parse::<f32>().ok())
        .find(|number| number.is_finite())
}

/// The date element inside the link, or beside it in the same list row, else the link's own
/// text.
fn chapter_date_text(anchor: ElementRef<'_>, site: &Site) -> String {
    field::resolve(anchor, CHAPTER_DATE, site)
        .or_else(|| {
            field::parent_element(anchor)
                .filter(|row| matches!(row.value().name(), "li" | "tr" | "td"))
                .and_then(|row| field::resolve(row, CHAPTER_DATE, site))
        })
        .unwrap_or_else(|| field::text(anchor))
}

/// Anchor text with any nested date markup left out.
fn text_without_dates(anchor: ElementRef<'_>) -> String {
    anchor
        .descendants()
        .filter(|node| {
            !node
                .ancestors()
                .take_while(|ancestor| ancestor.id() != anchor.id())
                .filter_map(ElementRef::wrap)
                .any(is_date_element)
        })
        .filter_map(|node| node.value().as_text().map(|text| &**text))
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_date_element(element: ElementRef<'_>) -> bool {
    element.value().name() == "time"
        || element
            .value()
            .classes()
            .any(|class| DATE_CLASSES.contains(&class))
}

/// Keyword tags decide the rating. Without them a known rating on `existing` stands; a page
/// whose tags are all harmless is `Safe`.
fn rating_from_tags(tags: &[Tag], existing: ContentRating) -> ContentRating {
    if tags.iter().any(|tag| ADULT_TAGS.contains(&tag.key.as_str())) {
        ContentRating::Adult
    } else if tags
        .iter()
        .any(|tag| SUGGESTIVE_TAGS.contains(&tag.key.as_str()))
    {
        ContentRating::Suggestive
    } else if existing != ContentRating::Unknown || tags.is_empty() {
        existing
    } else {
        ContentRating::Safe
    }
}

fn title_case(text: &str) -> String {
    text.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}
