/// Failures the extractors report instead of degrading to a default.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ExtractError {
    #[error("no pages found for chapter: {url}")]
    NoPagesFound { url: String },
}
