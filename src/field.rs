//! Ordered fallback chains for pulling one value out of drifting markup.
//!
//! A field is described by a chain of [`Candidate`]s. [`resolve`] walks the chain in order and
//! returns the first non-blank value; a missing node is never an error.

use scraper::{ElementRef, Selector};

use crate::site::Site;

/// Lazy-load attributes first; `src` often holds a placeholder on lazy pages.
pub const IMAGE_ATTRIBUTES: &[&str] = &["data-src", "data-lazy-src", "src"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extract {
    /// Text content with whitespace collapsed.
    Text,
    /// Inner markup, trimmed.
    InnerHtml,
    /// Raw attribute value, trimmed.
    Attr(&'static str),
    /// Attribute value absolutized against the site.
    Url(&'static str),
    /// First non-blank of [`IMAGE_ATTRIBUTES`], absolutized.
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// The scope element itself.
    Scope,
    /// First element under the scope matching a CSS selector.
    Select(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Candidate {
    pub target: Target,
    pub extract: Extract,
}

impl Candidate {
    pub const fn select(selector: &'static str, extract: Extract) -> Self {
        Self {
            target: Target::Select(selector),
            extract,
        }
    }

    pub const fn scope(extract: Extract) -> Self {
        Self {
            target: Target::Scope,
            extract,
        }
    }
}

/// Returns the first non-blank value produced by `chain`, or `None` when every candidate
/// misses.
pub fn resolve(scope: ElementRef<'_>, chain: &[Candidate], site: &Site) -> Option<String> {
    for (position, candidate) in chain.iter().enumerate() {
        let element = match candidate.target {
            Target::Scope => Some(scope),
            Target::Select(selector) => {
                let Some(selector) = parse_selector(selector) else {
                    continue;
                };
                scope.select(&selector).next()
            }
        };
        let Some(element) = element else {
            continue;
        };

        if let Some(value) = extract(element, candidate.extract, site) {
            if position > 0 {
                tracing::trace!(?candidate, position, "field resolved by fallback candidate");
            }
            return Some(value);
        }
    }

    None
}

/// All elements matched by the first selector that matches anything.
pub fn select_all<'a>(scope: ElementRef<'a>, selectors: &[&str]) -> Vec<ElementRef<'a>> {
    for selector in selectors {
        let Some(parsed) = parse_selector(selector) else {
            continue;
        };
        let matched = scope.select(&parsed).collect::<Vec<_>>();
        if !matched.is_empty() {
            tracing::trace!(selector, count = matched.len(), "selector matched");
            return matched;
        }
    }

    Vec::new()
}

pub fn extract(element: ElementRef<'_>, rule: Extract, site: &Site) -> Option<String> {
    match rule {
        Extract::Text => non_blank(text(element)),
        Extract::InnerHtml => non_blank(element.inner_html().trim().to_owned()),
        Extract::Attr(name) => element
            .value()
            .attr(name)
            .and_then(|value| non_blank(value.trim().to_owned())),
        Extract::Url(name) => element
            .value()
            .attr(name)
            .and_then(|value| site.absolutize(value)),
        Extract::Image => image_url(element, site),
    }
}

pub fn image_url(element: ElementRef<'_>, site: &Site) -> Option<String> {
    IMAGE_ATTRIBUTES
        .iter()
        .filter_map(|name| element.value().attr(name))
        .find_map(|value| site.absolutize(value))
}

/// Text content of `element`, whitespace-collapsed.
pub fn text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn parent_element(element: ElementRef<'_>) -> Option<ElementRef<'_>> {
    element.parent().and_then(ElementRef::wrap)
}

fn parse_selector(selector: &str) -> Option<Selector> {
    match Selector::parse(selector) {
        Ok(parsed) => Some(parsed),
        Err(err) => {
            tracing::warn!(selector, ?err, "invalid selector; skipping");
            None
        }
    }
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}
