use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context as _;
use async_trait::async_trait;
use reqwest::header::ACCEPT;

use crate::config::SourceConfig;

/// Fetches the HTML text behind a URL.
#[async_trait]
pub trait HtmlClient: Send + Sync {
    async fn get_html(&self, url: &str) -> anyhow::Result<String>;
}

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new(config: &SourceConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(config.user_agent.clone())
            .timeout(Duration::from_secs(config.timeout_secs))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()
            .context("build http client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HtmlClient for HttpClient {
    async fn get_html(&self, url: &str) -> anyhow::Result<String> {
        let response = self
            .client
            .get(url)
            .header(ACCEPT, "text/html,application/xhtml+xml;q=0.9,*/*;q=0.8")
            .send()
            .await
            .with_context(|| format!("GET {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("GET {url}: unexpected status {status}");
        }

        response
            .text()
            .await
            .with_context(|| format!("read response body: {url}"))
    }
}

/// Serves one saved document for every URL. Used to extract from pages fetched earlier.
#[derive(Debug, Clone)]
pub struct SavedHtml {
    path: PathBuf,
}

impl SavedHtml {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl HtmlClient for SavedHtml {
    async fn get_html(&self, url: &str) -> anyhow::Result<String> {
        tracing::debug!(url, path = %self.path.display(), "reading saved html");
        tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read saved html: {}", self.path.display()))
    }
}
