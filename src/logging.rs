use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;
use std::fs::{self, OpenOptions};
use std::path::Path;

/// Send log output to `path`. The terminal belongs to the UI, so diagnostics
/// never go to stdout/stderr. `RUST_LOG` overrides the default `info` level.
pub fn init(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;

    Builder::from_default_env()
        .filter_level(LevelFilter::Info)
        .parse_default_env()
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("installing logger")?;

    log::info!("typeclock {} starting", env!("CARGO_PKG_VERSION"));
    Ok(())
}
