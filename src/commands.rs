use std::io::Write as _;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use serde::Serialize;

use crate::cli::{ListArgs, PagesArgs, SearchArgs, SeriesArgs};
use crate::client::SavedHtml;
use crate::config::SourceConfig;
use crate::source::Source;

pub async fn list(config: &SourceConfig, args: ListArgs) -> anyhow::Result<()> {
    let source = source_for(config, args.html)?;
    let summaries = source.listing(args.sort, args.page).await?;
    write_json_lines(&summaries)
}

pub async fn search(config: &SourceConfig, args: SearchArgs) -> anyhow::Result<()> {
    let source = source_for(config, args.html)?;
    let summaries = source.search(&args.query, args.page).await?;
    write_json_lines(&summaries)
}

pub async fn series(config: &SourceConfig, args: SeriesArgs) -> anyhow::Result<()> {
    let source = source_for(config, args.html)?;
    let summary = source.summary_for_url(&args.url)?;
    let detail = source.series_detail(&summary).await?;

    let mut out = std::io::stdout().lock();
    serde_json::to_writer(&mut out, &detail).context("write series detail json")?;
    out.write_all(b"\n").context("write newline")?;
    out.flush().context("flush stdout")?;
    Ok(())
}

pub async fn pages(config: &SourceConfig, args: PagesArgs) -> anyhow::Result<()> {
    let source = source_for(config, args.html)?;
    let pages = source.page_list(&args.url).await?;
    write_json_lines(&pages)
}

fn source_for(config: &SourceConfig, saved_html: Option<PathBuf>) -> anyhow::Result<Source> {
    match saved_html {
        Some(path) => Ok(Source::new(config.site()?, Arc::new(SavedHtml::new(path)))),
        None => Source::from_config(config),
    }
}

fn write_json_lines<T: Serialize>(records: &[T]) -> anyhow::Result<()> {
    let mut out = std::io::stdout().lock();
    for record in records {
        serde_json::to_writer(&mut out, record).context("write record json")?;
        out.write_all(b"\n").context("write record newline")?;
    }
    out.flush().context("flush stdout")?;
    Ok(())
}
