use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Directives applied when `RUST_LOG` is unset. `LOG_LEVEL` drives the service and
/// request spans; sqlx query logging stays at `warn`.
fn default_directives(level: &str) -> String {
    format!("warn,blog_api={level},tower_http={level},sqlx=warn")
}

pub(crate) fn init_logging(level: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_directives(level)))
        .map_err(|e| anyhow!("invalid LOG_LEVEL {level:?}: {e}"))?;

    fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .try_init()
        .map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
