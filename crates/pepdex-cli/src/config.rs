//! Runtime configuration: command-line flags over `PEPDEX_*` environment
//! variables over built-in defaults.

use anyhow::{anyhow, Result};
use clap::Args;
use pepdex_corpus::ScanOptions;

pub(crate) const PEPDEX_MAX_FILES_ENV: &str = "PEPDEX_MAX_FILES";
pub(crate) const PEPDEX_MAX_FILE_BYTES_ENV: &str = "PEPDEX_MAX_FILE_BYTES";
pub(crate) const PEPDEX_EXTENSIONS_ENV: &str = "PEPDEX_EXTENSIONS";
pub(crate) const PEPDEX_LOG_ENV: &str = "PEPDEX_LOG";

#[derive(Args, Debug, Clone, Default)]
pub struct ScanArgs {
    /// Maximum number of documents to read from a directory.
    #[arg(long)]
    pub max_files: Option<usize>,

    /// Skip files larger than this many bytes.
    #[arg(long)]
    pub max_file_bytes: Option<u64>,

    /// Comma-separated file extensions to include (default: rst,txt).
    #[arg(long, value_delimiter = ',')]
    pub ext: Vec<String>,

    /// Accept every file name, not only `pep-NNNN`.
    #[arg(long)]
    pub any_name: bool,
}

fn env_number<T: std::str::FromStr>(name: &str) -> Result<Option<T>> {
    match std::env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| anyhow!("{name}: expected a number, got `{raw}`")),
        _ => Ok(None),
    }
}

fn parse_extensions(list: &[String]) -> Vec<String> {
    list.iter()
        .flat_map(|s| s.split(','))
        .map(|s| s.trim().trim_start_matches('.').to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

impl ScanArgs {
    pub fn to_options(&self) -> Result<ScanOptions> {
        let mut options = ScanOptions::default();

        if let Some(n) = self.max_files.or(env_number(PEPDEX_MAX_FILES_ENV)?) {
            options.max_files = n;
        }
        if let Some(n) = self.max_file_bytes.or(env_number(PEPDEX_MAX_FILE_BYTES_ENV)?) {
            options.max_file_bytes = n;
        }

        let mut extensions = parse_extensions(&self.ext);
        if extensions.is_empty() {
            if let Ok(raw) = std::env::var(PEPDEX_EXTENSIONS_ENV) {
                extensions = parse_extensions(&[raw]);
            }
        }
        if !extensions.is_empty() {
            options.include_extensions = extensions;
        }

        if self.any_name {
            options.file_name_pattern = None;
        }

        Ok(options)
    }
}

/// Install the stderr log subscriber.
///
/// Level: `PEPDEX_LOG` if set, else warn / info / debug for 0 / 1 / 2+ `-v`.
pub fn init_logging(verbose: u8) -> Result<()> {
    let level = match std::env::var(PEPDEX_LOG_ENV) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse::<tracing::Level>()
            .map_err(|_| anyhow!("{PEPDEX_LOG_ENV}: unknown level `{raw}`"))?,
        _ => match verbose {
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            _ => tracing::Level::DEBUG,
        },
    };

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(level)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to install log subscriber: {e}"))
}
