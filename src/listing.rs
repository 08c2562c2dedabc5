use scraper::{ElementRef, Html};

use crate::field::{self, Candidate, Extract};
use crate::model::{SeriesState, SeriesSummary};
use crate::site::Site;

const CARD_SELECTORS: &[&str] = &[
    ".comic-card",
    ".manga-card",
    ".series-card",
    "a[href*='/comic/']",
    "a[href*='/manga/']",
    "a[href*='/series/']",
];

const CARD_TITLE: &[Candidate] = &[
    Candidate::select(".comic-title", Extract::Text),
    Candidate::select(".card-title", Extract::Text),
    Candidate::select(".title", Extract::Text),
    Candidate::select("h3", Extract::Text),
    Candidate::select("h2", Extract::Text),
    Candidate::select("h4", Extract::Text),
    Candidate::select(".name", Extract::Text),
];

const ANCHOR_TITLE: &[Candidate] = &[
    Candidate::scope(Extract::Attr("title")),
    Candidate::scope(Extract::Text),
];

const CARD_COVER: &[Candidate] = &[
    Candidate::select(".cover img", Extract::Image),
    Candidate::select("img", Extract::Image),
];

const CARD_STATUS: &[Candidate] = &[
    Candidate::select(".status", Extract::Text),
    Candidate::select(".badge-status", Extract::Text),
];

/// Maps every card on a listing or search page to a summary, in document order. Duplicate
/// cards produce duplicate summaries.
pub fn extract_listings(document: &Html, site: &Site) -> Vec<SeriesSummary> {
    let cards = field::select_all(document.root_element(), CARD_SELECTORS);

    let summaries = cards
        .into_iter()
        .filter_map(|card| summarize_card(card, site))
        .collect::<Vec<_>>();
    tracing::debug!(count = summaries.len(), "extracted listing cards");
    summaries
}

fn summarize_card(card: ElementRef<'_>, site: &Site) -> Option<SeriesSummary> {
    let Some(anchor) = card_anchor(card) else {
        tracing::debug!(card = %card.value().name(), "card has no link; skipping");
        return None;
    };
    let href = anchor.value().attr("href")?;
    let mut summary = SeriesSummary::from_url(site, href)?;

    if let Some(title) = field::resolve(card, CARD_TITLE, site)
        .or_else(|| field::resolve(anchor, ANCHOR_TITLE, site))
    {
        summary.title = title;
    }
    summary.cover_url = field::resolve(card, CARD_COVER, site)
        .or_else(|| field::extract(card, Extract::Image, site));
    summary.state = field::resolve(card, CARD_STATUS, site)
        .map(|label| SeriesState::from_label(&label))
        .unwrap_or_default();

    Some(summary)
}

/// The card itself when it is a link, else its first link descendant, else the nearest
/// enclosing link.
fn card_anchor(card: ElementRef<'_>) -> Option<ElementRef<'_>> {
    if is_link(card) {
        return Some(card);
    }

    card.descendants()
        .filter_map(ElementRef::wrap)
        .find(|element| is_link(*element))
        .or_else(|| {
            card.ancestors()
                .filter_map(ElementRef::wrap)
                .find(|element| is_link(*element))
        })
}

fn is_link(element: ElementRef<'_>) -> bool {
    element.value().name() == "a" && element.value().attr("href").is_some()
}
