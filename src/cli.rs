use std::path::PathBuf;

use anyhow::Context as _;
use clap::{Args, Parser, Subcommand};

use crate::config::SourceConfig;
use crate::site::SortOrder;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    /// YAML file with `domain`, `user_agent` and `timeout_secs`.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Site domain (e.g. `comics.example`); overrides the config file.
    #[arg(long, global = true)]
    pub domain: Option<String>,

    /// User-Agent header sent with every request; overrides the config file.
    #[arg(long, global = true)]
    pub user_agent: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Config file values with command-line overrides applied.
    pub fn source_config(&self) -> anyhow::Result<SourceConfig> {
        let mut config = match &self.config {
            Some(path) => SourceConfig::load(path).context("load --config")?,
            None => SourceConfig::default(),
        };
        if let Some(domain) = &self.domain {
            config.domain = domain.clone();
        }
        if let Some(user_agent) = &self.user_agent {
            config.user_agent = user_agent.clone();
        }

        if config.domain.trim().is_empty() {
            anyhow::bail!("a site domain is required (--domain or `domain` in --config)");
        }
        Ok(config)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List series from the catalog.
    List(ListArgs),
    /// Search the catalog.
    Search(SearchArgs),
    /// Series metadata and chapter list.
    Series(SeriesArgs),
    /// Page image URLs of a chapter.
    Pages(PagesArgs),
}

#[derive(Debug, Args)]
pub struct ListArgs {
    /// Listing order: popular, new, alpha, rating or updated. Unrecognized orders list by
    /// latest update.
    #[arg(long, default_value = "updated", value_parser = parse_sort_order)]
    pub sort: SortOrder,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Extract from a saved HTML document instead of fetching.
    #[arg(long)]
    pub html: Option<PathBuf>,
}

fn parse_sort_order(label: &str) -> Result<SortOrder, std::convert::Infallible> {
    Ok(SortOrder::from_label(label))
}

#[derive(Debug, Args)]
pub struct SearchArgs {
    #[arg(long)]
    pub query: String,

    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Extract from a saved HTML document instead of fetching.
    #[arg(long)]
    pub html: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct SeriesArgs {
    /// Series URL, relative to the site or absolute.
    #[arg(long)]
    pub url: String,

    /// Extract from a saved HTML document instead of fetching.
    #[arg(long)]
    pub html: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct PagesArgs {
    /// Chapter URL, relative to the site or absolute.
    #[arg(long)]
    pub url: String,

    /// Extract from a saved HTML document instead of fetching.
    #[arg(long)]
    pub html: Option<PathBuf>,
}
