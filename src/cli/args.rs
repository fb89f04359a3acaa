use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug, Clone)]
#[command(name = "flipper-assets")]
#[command(
    version,
    about = "Download character images and crop their borders",
    long_about = None
)]
pub struct CliArgs {
    /// Number of catalog pages to scan [default: 5]
    #[arg(short = 'p', long, value_name = "N")]
    pub page_limit: Option<u32>,

    /// Reuse the saved character list and skip downloading
    #[arg(long)]
    pub skip_download: bool,

    /// Crop again even when processed output already exists
    #[arg(long = "override")]
    pub override_existing: bool,

    /// Load settings from a JSON config file
    #[arg(short = 'c', long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory for downloads and processed output [default: .]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Command used to crop animations [default: gifsicle]
    #[arg(long, value_name = "PROGRAM")]
    pub crop_tool: Option<String>,

    /// Compress processed PNGs (0-6 or 'max'). Default level is 2 if flag is present without value.
    #[arg(long, value_name = "LEVEL", default_missing_value = "2", num_args = 0..=1)]
    pub compress: Option<CompressionLevel>,

    /// Verbose output
    #[arg(short, long)]
    pub verbose: bool,
}

/// PNG compression level (0-6 or max)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionLevel {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression
    Max,
}

impl std::str::FromStr for CompressionLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("max") {
            Ok(CompressionLevel::Max)
        } else {
            s.parse::<u8>()
                .map_err(|_e| format!("invalid compression level: {}", s))
                .and_then(|n| {
                    if n <= 6 {
                        Ok(CompressionLevel::Level(n))
                    } else {
                        Err(format!("compression level must be 0-6 or 'max', got {}", n))
                    }
                })
        }
    }
}

impl Default for CompressionLevel {
    fn default() -> Self {
        CompressionLevel::Level(2)
    }
}
