use std::sync::Arc;

use anyhow::Context as _;
use chrono::Utc;
use scraper::Html;

use crate::client::{HtmlClient, HttpClient};
use crate::config::SourceConfig;
use crate::model::{Page, SeriesDetail, SeriesSummary};
use crate::site::{Site, SortOrder};

/// Fetch-then-extract entry points for one site.
///
/// Each call fetches a fresh document and builds fresh records; nothing is shared between
/// calls, so a `Source` can serve concurrent requests. Parsed documents never live across an
/// `.await`.
#[derive(Clone)]
pub struct Source {
    site: Site,
    client: Arc<dyn HtmlClient>,
}

impl Source {
    pub fn new(site: Site, client: Arc<dyn HtmlClient>) -> Self {
        Self { site, client }
    }

    pub fn from_config(config: &SourceConfig) -> anyhow::Result<Self> {
        let site = config.site()?;
        let client = HttpClient::new(config)?;
        Ok(Self::new(site, Arc::new(client)))
    }

    pub fn site(&self) -> &Site {
        &self.site
    }

    pub async fn listing(&self, sort: SortOrder, page: u32) -> anyhow::Result<Vec<SeriesSummary>> {
        let url = self.site.listing_url(sort, page);
        self.summaries(&url).await
    }

    pub async fn search(&self, query: &str, page: u32) -> anyhow::Result<Vec<SeriesSummary>> {
        let url = self.site.search_url(query, page);
        self.summaries(&url).await
    }

    /// A bare summary for a series link, for callers that have no listing record yet.
    pub fn summary_for_url(&self, href: &str) -> anyhow::Result<SeriesSummary> {
        SeriesSummary::from_url(&self.site, href)
            .ok_or_else(|| anyhow::anyhow!("series url does not resolve: {href}"))
    }

    pub async fn series_detail(&self, summary: &SeriesSummary) -> anyhow::Result<SeriesDetail> {
        let html = self.fetch(&summary.absolute_url).await?;
        let document = Html::parse_document(&html);
        Ok(crate::detail::extract_detail(
            &document,
            &self.site,
            summary,
            Utc::now(),
        ))
    }

    /// Page images of a chapter. Fails with [`crate::error::ExtractError::NoPagesFound`] when
    /// the chapter has none.
    pub async fn page_list(&self, chapter_url: &str) -> anyhow::Result<Vec<Page>> {
        let url = self
            .site
            .absolutize(chapter_url)
            .ok_or_else(|| anyhow::anyhow!("chapter url does not resolve: {chapter_url}"))?;
        let html = self.fetch(&url).await?;
        let document = Html::parse_document(&html);
        let pages = crate::pages::extract_pages(&document, &self.site, &url)?;
        tracing::info!(url = %url, pages = pages.len(), "extracted page list");
        Ok(pages)
    }

    async fn summaries(&self, url: &str) -> anyhow::Result<Vec<SeriesSummary>> {
        let html = self.fetch(url).await?;
        let document = Html::parse_document(&html);
        let summaries = crate::listing::extract_listings(&document, &self.site);
        tracing::info!(url, count = summaries.len(), "extracted listing");
        Ok(summaries)
    }

    async fn fetch(&self, url: &str) -> anyhow::Result<String> {
        tracing::debug!(url, "fetch");
        self.client
            .get_html(url)
            .await
            .with_context(|| format!("fetch {url}"))
    }
}
