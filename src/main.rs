use std::process::ExitCode;

use anyhow::Context as _;
use clap::Parser as _;

use comicsource::cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    if let Err(err) = try_main().await {
        eprintln!("{err:#}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

async fn try_main() -> anyhow::Result<()> {
    comicsource::logging::init().context("init logging")?;

    let cli = Cli::parse();
    tracing::debug!(?cli, "parsed cli");
    let config = cli.source_config()?;

    match cli.command {
        Command::List(args) => {
            comicsource::commands::list(&config, args)
                .await
                .context("list")?;
        }
        Command::Search(args) => {
            comicsource::commands::search(&config, args)
                .await
                .context("search")?;
        }
        Command::Series(args) => {
            comicsource::commands::series(&config, args)
                .await
                .context("series")?;
        }
        Command::Pages(args) => {
            comicsource::commands::pages(&config, args)
                .await
                .context("pages")?;
        }
    }

    Ok(())
}
