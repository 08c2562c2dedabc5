use anyhow::Context as _;
use tracing_subscriber::EnvFilter;

const DEFAULT_FILTER: &str = "warn,comicsource=info";

/// Logs go to stderr; stdout is reserved for extracted records. `COMICSOURCE_LOG` takes
/// precedence over `RUST_LOG`.
pub fn init() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_env("COMICSOURCE_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .context("build log filter")?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("initialize tracing subscriber: {err}"))?;

    Ok(())
}
