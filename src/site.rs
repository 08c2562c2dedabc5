use anyhow::Context as _;
use serde::{Deserialize, Serialize};
use url::{Position, Url};

/// Listing orders a host can ask for. The site only knows four sort keys; anything else
/// falls back to `updated`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    #[default]
    Updated,
    Popularity,
    Newest,
    Alphabetical,
    Rating,
}

impl SortOrder {
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "popular" | "popularity" => Self::Popularity,
            "new" | "newest" | "latest" => Self::Newest,
            "alpha" | "alphabetical" | "title" => Self::Alphabetical,
            "rating" => Self::Rating,
            _ => Self::Updated,
        }
    }

    pub fn sort_key(self) -> &'static str {
        match self {
            Self::Popularity => "popular",
            Self::Newest => "new",
            Self::Alphabetical => "alpha",
            Self::Updated | Self::Rating => "updated",
        }
    }
}

/// The site every extractor resolves URLs against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Site {
    origin: String,
    base: Url,
}

impl Site {
    /// Accepts a bare domain (`example.com`, served over https) or an origin with an explicit
    /// scheme (`http://127.0.0.1:8080`).
    pub fn new(domain: &str) -> anyhow::Result<Self> {
        let domain = domain.trim().trim_end_matches('/');
        if domain.is_empty() {
            anyhow::bail!("domain must not be empty");
        }

        let origin = if domain.contains("://") {
            domain.to_owned()
        } else {
            format!("https://{domain}")
        };
        let base = Url::parse(&format!("{origin}/"))
            .with_context(|| format!("parse site origin: {origin}"))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            anyhow::bail!("site must be http/https: {origin}");
        }
        if base.host_str().is_none() {
            anyhow::bail!("site must have host: {origin}");
        }

        Ok(Self { origin, base })
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn listing_url(&self, sort: SortOrder, page: u32) -> String {
        format!("{}/comics?sort={}&page={page}", self.origin, sort.sort_key())
    }

    pub fn search_url(&self, query: &str, page: u32) -> String {
        let keyword: String = url::form_urlencoded::byte_serialize(query.as_bytes()).collect();
        format!("{}/search?keyword={keyword}&page={page}", self.origin)
    }

    /// Resolves `raw` against the site root. Blank input and anything that does not resolve to
    /// an http(s) URL (`data:` placeholders, `javascript:` links) yield `None`.
    pub fn absolutize(&self, raw: &str) -> Option<String> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }
        let url = self.base.join(raw).ok()?;
        matches!(url.scheme(), "http" | "https").then(|| String::from(url))
    }

    /// Path and query of `href` when it points at this site, otherwise the absolute URL.
    /// Fragments are dropped.
    pub fn relative_url(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }

        let mut url = self.base.join(href).ok()?;
        url.set_fragment(None);
        if self.is_same_origin(&url) {
            Some(url[Position::BeforePath..Position::AfterQuery].to_owned())
        } else {
            Some(url.to_string())
        }
    }

    /// Last non-empty path segment of `href`, percent-decoded, ignoring query and fragment.
    pub fn last_path_segment(&self, href: &str) -> Option<String> {
        let url = self.base.join(href.trim()).ok()?;
        url.path_segments()?
            .filter(|segment| !segment.is_empty())
            .last()
            .map(|segment| {
                percent_encoding::percent_decode_str(segment)
                    .decode_utf8_lossy()
                    .into_owned()
            })
    }

    fn is_same_origin(&self, url: &Url) -> bool {
        url.scheme() == self.base.scheme()
            && url.host_str() == self.base.host_str()
            && url.port_or_known_default() == self.base.port_or_known_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn site() -> Site {
        Site::new("comics.example").expect("valid site")
    }

    #[test]
    fn listing_url_is_bit_exact() {
        let site = site();
        assert_eq!(
            site.listing_url(SortOrder::Popularity, 3),
            "https://comics.example/comics?sort=popular&page=3"
        );
        assert_eq!(
            site.listing_url(SortOrder::Rating, 1),
            "https://comics.example/comics?sort=updated&page=1"
        );
    }

    #[test]
    fn search_url_encodes_spaces_as_plus() {
        assert_eq!(
            site().search_url("one piece", 1),
            "https://comics.example/search?keyword=one+piece&page=1"
        );
        assert_eq!(
            site().search_url("a&b", 2),
            "https://comics.example/search?keyword=a%26b&page=2"
        );
    }

    #[test]
    fn unrecognized_sort_labels_fall_back_to_updated() {
        assert_eq!(SortOrder::from_label("alpha"), SortOrder::Alphabetical);
        assert_eq!(SortOrder::from_label("Popular"), SortOrder::Popularity);
        assert_eq!(SortOrder::from_label("random").sort_key(), "updated");
    }

    #[test]
    fn explicit_scheme_is_kept() -> anyhow::Result<()> {
        let site = Site::new("http://127.0.0.1:8080/")?;
        assert_eq!(
            site.listing_url(SortOrder::Newest, 2),
            "http://127.0.0.1:8080/comics?sort=new&page=2"
        );
        Ok(())
    }

    #[test]
    fn empty_or_non_http_domains_are_rejected() {
        assert!(Site::new("  ").is_err());
        assert!(Site::new("ftp://comics.example").is_err());
    }

    #[test]
    fn absolutize_resolves_relative_and_protocol_relative_urls() {
        let site = site();
        assert_eq!(
            site.absolutize("/covers/a.jpg").as_deref(),
            Some("https://comics.example/covers/a.jpg")
        );
        assert_eq!(
            site.absolutize("//cdn.example/a.jpg").as_deref(),
            Some("https://cdn.example/a.jpg")
        );
        assert_eq!(site.absolutize("   "), None);
    }

    #[test]
    fn absolutize_rejects_non_http_schemes() {
        let site = site();
        assert_eq!(site.absolutize("data:image/gif;base64,R0lGODlhAQABAAAAACw="), None);
        assert_eq!(site.absolutize("javascript:void(0)"), None);
        assert_eq!(
            site.absolutize("http://cdn.example/a.jpg").as_deref(),
            Some("http://cdn.example/a.jpg")
        );
    }

    #[test]
    fn relative_url_strips_origin_and_fragment() {
        let site = site();
        assert_eq!(
            site.relative_url("https://comics.example/comic/abc?x=1#top")
                .as_deref(),
            Some("/comic/abc?x=1")
        );
        assert_eq!(
            site.relative_url("comic/abc").as_deref(),
            Some("/comic/abc")
        );
        assert_eq!(
            site.relative_url("https://mirror.example/comic/abc")
                .as_deref(),
            Some("https://mirror.example/comic/abc")
        );
    }

    #[test]
    fn last_path_segment_ignores_trailing_slash_and_query() {
        let site = site();
        assert_eq!(
            site.last_path_segment("/genre/Action-Adventure/?page=2")
                .as_deref(),
            Some("Action-Adventure")
        );
        assert_eq!(
            site.last_path_segment("/genre/Slice of Life").as_deref(),
            Some("Slice of Life")
        );
        assert_eq!(site.last_path_segment("/"), None);
    }
}
