use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::Digest as _;

use crate::site::Site;

const PLACEHOLDER_TITLE: &str = "Untitled";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ContentRating {
    Safe,
    Suggestive,
    Adult,
    #[default]
    Unknown,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SeriesState {
    Ongoing,
    Finished,
    Hiatus,
    Abandoned,
    #[default]
    Unknown,
}

impl SeriesState {
    /// Maps a free-form status label ("Ongoing", "Completed", "On Hiatus", ...) to a state.
    pub fn from_label(label: &str) -> Self {
        let label = label.trim().to_lowercase();
        if label.is_empty() {
            return Self::Unknown;
        }

        if label.contains("ongoing") || label.contains("publishing") || label.contains("releasing")
        {
            Self::Ongoing
        } else if label.contains("complete") || label.contains("finished") || label.contains("ended")
        {
            Self::Finished
        } else if label.contains("hiatus") || label.contains("paused") {
            Self::Hiatus
        } else if label.contains("cancel") || label.contains("dropped") || label.contains("abandon")
        {
            Self::Abandoned
        } else {
            Self::Unknown
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesSummary {
    pub id: String,
    pub title: String,
    pub relative_url: String,
    pub absolute_url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    pub content_rating: ContentRating,
    pub state: SeriesState,
}

impl SeriesSummary {
    /// A summary known only by its link: the title is the last URL segment and every
    /// classification is unknown. Returns `None` when `href` does not resolve against `site`.
    pub fn from_url(site: &Site, href: &str) -> Option<Self> {
        let relative_url = site.relative_url(href)?;
        let absolute_url = site.absolutize(&relative_url)?;
        let title = site
            .last_path_segment(&relative_url)
            .unwrap_or_else(|| PLACEHOLDER_TITLE.to_owned());

        Some(Self {
            id: series_id(&relative_url),
            title,
            relative_url,
            absolute_url,
            cover_url: None,
            content_rating: ContentRating::Unknown,
            state: SeriesState::Unknown,
        })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    pub key: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SeriesDetail {
    #[serde(flatten)]
    pub summary: SeriesSummary,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub tags: Vec<Tag>,
    pub authors: Vec<String>,
    pub chapters: Vec<Chapter>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chapter {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub number: f32,
    /// `None` when no date could be determined.
    pub upload_date: Option<DateTime<Utc>>,
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Page {
    pub index: usize,
    pub id: String,
    pub url: String,
}

pub fn series_id(relative_url: &str) -> String {
    prefixed_digest("s", relative_url)
}

pub fn chapter_id(relative_url: &str) -> String {
    prefixed_digest("c", relative_url)
}

pub fn page_id(absolute_url: &str) -> String {
    prefixed_digest("p", absolute_url)
}

fn prefixed_digest(prefix: &str, input: &str) -> String {
    let mut hasher = sha2::Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hasher.finalize();
    format!("{prefix}_{}", hex::encode(digest))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_depend_only_on_the_url() {
        assert_eq!(series_id("/comic/abc"), series_id("/comic/abc"));
        assert_ne!(series_id("/comic/abc"), series_id("/comic/abd"));
        assert!(series_id("/comic/abc").starts_with("s_"));
        assert_eq!(series_id("/comic/abc").len(), 2 + 64);
    }

    #[test]
    fn id_kinds_do_not_collide() {
        assert_ne!(series_id("/x"), chapter_id("/x"));
        assert_ne!(chapter_id("/x"), page_id("/x"));
    }

    #[test]
    fn state_from_label_recognizes_common_wording() {
        assert_eq!(SeriesState::from_label(" Ongoing "), SeriesState::Ongoing);
        assert_eq!(SeriesState::from_label("Completed"), SeriesState::Finished);
        assert_eq!(SeriesState::from_label("On Hiatus"), SeriesState::Hiatus);
        assert_eq!(SeriesState::from_label("Dropped"), SeriesState::Abandoned);
        assert_eq!(SeriesState::from_label("???"), SeriesState::Unknown);
        assert_eq!(SeriesState::from_label(""), SeriesState::Unknown);
    }

    #[test]
    fn summary_from_url_uses_the_last_segment_as_title() -> anyhow::Result<()> {
        let site = Site::new("comics.example")?;
        let summary = SeriesSummary::from_url(&site, "https://comics.example/comic/night-shift/")
            .expect("resolvable url");
        assert_eq!(summary.relative_url, "/comic/night-shift/");
        assert_eq!(summary.title, "night-shift");
        assert_eq!(summary.id, series_id("/comic/night-shift/"));

        let root = SeriesSummary::from_url(&site, "/").expect("resolvable url");
        assert_eq!(root.title, "Untitled");
        Ok(())
    }

    #[test]
    fn unknown_upload_date_serializes_as_null() -> anyhow::Result<()> {
        let chapter = Chapter {
            id: chapter_id("/chapter/1"),
            title: None,
            number: 1.0,
            upload_date: None,
            url: "/chapter/1".to_owned(),
        };
        let value = serde_json::to_value(&chapter)?;
        assert!(value["upload_date"].is_null());
        assert!(value.get("title").is_none());
        Ok(())
    }
}
