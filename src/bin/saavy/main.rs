//! saavy - Terminal metronome driven by the lookahead scheduler
//!
//! Run with: cargo run
//!
//! The terminal belongs to the UI, so logs go to `saavy.log` in the
//! system temp directory.

mod app;
mod render;
mod sequencer;
mod ui;

use std::fs::File;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use app::Metronome;
use color_eyre::eyre::{Result as EyreResult, WrapErr};
use tracing::Subscriber;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let log_path = init_logging()?;

    let result = Metronome::new()
        .bpm(120.0)
        .beats_per_bar(4)
        .run();

    eprintln!("log written to {}", log_path.display());
    result
}

fn init_logging() -> EyreResult<PathBuf> {
    let path = std::env::temp_dir().join("saavy.log");
    let file = File::create(&path)
        .wrap_err_with(|| format!("failed to create log file {}", path.display()))?;
    tracing::subscriber::set_global_default(log_subscriber(file))
        .wrap_err("failed to install log subscriber")?;
    Ok(path)
}

/// Plain-text subscriber writing to `writer`
fn log_subscriber<W>(writer: W) -> impl Subscriber + Send + Sync
where
    W: Write + Send + 'static,
{
    tracing_subscriber::fmt()
        .with_writer(Mutex::new(writer))
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .finish()
}
