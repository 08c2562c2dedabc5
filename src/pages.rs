use scraper::Html;

use crate::error::ExtractError;
use crate::field;
use crate::model::Page;
use crate::site::Site;

const PAGE_IMAGE_SELECTORS: &[&str] = &[
    ".reading-content img",
    ".chapter-content img",
    "#readerarea img",
    ".reader-area img",
    ".page-break img",
    "img",
];

/// Ordered page images of a chapter. A chapter without a single usable image is an error.
pub fn extract_pages(
    document: &Html,
    site: &Site,
    chapter_url: &str,
) -> Result<Vec<Page>, ExtractError> {
    let images = field::select_all(document.root_element(), PAGE_IMAGE_SELECTORS);
    let matched = images.len();

    let pages = images
        .into_iter()
        .filter_map(|image| field::image_url(image, site))
        .enumerate()
        .map(|(index, url)| Page {
            index,
            id: crate::model::page_id(&url),
            url,
        })
        .collect::<Vec<_>>();

    if pages.is_empty() {
        tracing::debug!(chapter_url, matched, "chapter has no usable page images");
        return Err(ExtractError::NoPagesFound {
            url: chapter_url.to_owned(),
        });
    }

    if pages.len() < matched {
        tracing::debug!(
            chapter_url,
            dropped = matched - pages.len(),
            "dropped page images without a source"
        );
    }

    Ok(pages)
}
