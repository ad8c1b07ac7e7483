use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::path::Path;

fn main() -> Result<()> {
    let cfg = mosaic_logo::config::Config::parse();
    init_logging(cfg.log_file.as_deref())?;
    mosaic_logo::app::run(cfg)
}

/// `RUST_LOG` wins when set. Otherwise log at info to `--log-file`, or not at
/// all: stderr shares the screen with the animation.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_filter = if log_file.is_some() { "info" } else { "off" };
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter));
    if let Some(path) = log_file {
        let file = File::create(path).with_context(|| format!("create log file {}", path.display()))?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }
    builder.init();
    Ok(())
}
