use std::path::PathBuf;

use clap::Parser;
use log::LevelFilter;

use super::logging::LogDestination;

/// Jump-to-message overlay for a saved chat conversation page.
#[derive(Debug, Parser)]
#[command(name = "thread-jump", version, about)]
pub struct Cli {
    /// Saved conversation page (HTML).
    #[arg(long)]
    pub page: PathBuf,

    /// Origin the page was saved from; selects the per-origin settings file.
    #[arg(long)]
    pub origin: Option<String>,

    /// Directory holding the settings stores.
    #[arg(long, default_value = ".thread_jump")]
    pub profile_dir: PathBuf,

    /// Viewport size as WIDTHxHEIGHT.
    #[arg(long, default_value = "1280x800", value_parser = parse_viewport)]
    pub viewport: (f64, f64),

    /// Extractor markers in RON; built-in markers when omitted.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Charset of the page when it carries no BOM or declaration.
    #[arg(long)]
    pub charset: Option<String>,

    #[arg(long, value_enum, default_value_t = LogDestination::File)]
    pub log: LogDestination,

    #[arg(long, default_value = "thread_jump.log")]
    pub log_file: PathBuf,

    /// Log debug output as well.
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }

    /// Explicit origin, or the page's file URL.
    pub fn page_origin(&self) -> String {
        match &self.origin {
            Some(origin) => origin.clone(),
            None => format!("file://{}", self.page.display()),
        }
    }
}

fn parse_viewport(value: &str) -> Result<(f64, f64), String> {
    let (width, height) = value
        .split_once(&['x', 'X'][..])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<u32>()
            .ok()
            .filter(|px| *px > 0)
            .map(f64::from)
            .ok_or_else(|| format!("invalid viewport extent {part:?}"))
    };
    Ok((parse(width)?, parse(height)?))
}
