use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use flipper_assets::catalog::{CatalogLister, read_roster, roster_jobs, write_roster};
use flipper_assets::cli::{CliArgs, CompressionLevel};
use flipper_assets::config::{CompressConfig, FlipperConfig, LoadedConfig};
use flipper_assets::crop::{Gifsicle, Pipeline};
use flipper_assets::fetch::Downloader;

#[allow(clippy::print_stderr)]
fn main() {
    if let Err(e) = run() {
        // Use eprintln instead of error! because logger may not be initialized
        // (e.g., config loading fails before logger init)
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args = CliArgs::parse();
    let merged = merge_config_with_args(&args)?;

    env_logger::Builder::new()
        .filter_level(if merged.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Info
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    info!("flipper-assets v{}", env!("CARGO_PKG_VERSION"));

    let roster_path = merged.output.join(&merged.roster_file);

    let jobs = if merged.skip_download {
        let names = read_roster(&roster_path)
            .with_context(|| format!("failed to read roster: {}", roster_path.display()))?;
        info!(
            "Reusing {} characters from {}",
            names.len(),
            roster_path.display()
        );
        roster_jobs(&names)
    } else {
        let downloader = Downloader::new(&merged.output)?;
        let catalog =
            CatalogLister::new(downloader.client(), &merged.site_url, merged.page_limit)?
                .list()
                .context("failed to list catalog")?;

        // All downloads finish before any cropping starts
        downloader.fetch_all(&catalog.jobs);

        write_roster(&roster_path, &catalog.names)
            .with_context(|| format!("failed to write roster: {}", roster_path.display()))?;
        info!("Saved {}", roster_path.display());

        catalog.jobs
    };

    let cropper = Gifsicle::new(merged.crop_tool);
    let report = Pipeline::new(&merged.output, &cropper)
        .prefix(merged.processed_prefix)
        .override_existing(merged.override_existing)
        .threshold(merged.static_threshold)
        .compress(merged.compress)
        .run(&jobs);

    info!(
        "Done! {} cropped, {} skipped, {} failed",
        report.cropped, report.skipped, report.failed
    );

    Ok(())
}

/// Merged configuration from CLI args and optional config file.
struct MergedConfig {
    site_url: String,
    output: PathBuf,
    roster_file: String,
    processed_prefix: String,
    crop_tool: String,
    page_limit: u32,
    static_threshold: u8,
    compress: Option<CompressionLevel>,
    skip_download: bool,
    override_existing: bool,
    verbose: bool,
}

/// Merge config file values with CLI arguments.
/// CLI arguments always take precedence over config values.
fn merge_config_with_args(args: &CliArgs) -> Result<MergedConfig> {
    let loaded_config = if let Some(config_path) = &args.config {
        Some(
            LoadedConfig::load(config_path)
                .with_context(|| format!("failed to load config: {}", config_path.display()))?,
        )
    } else {
        None
    };

    let defaults = FlipperConfig::default();
    let config = loaded_config
        .as_ref()
        .map(|lc| &lc.config)
        .unwrap_or(&defaults);

    // Output directory: CLI > config (relative to the config file) > default
    let output = args.output.clone().unwrap_or_else(|| {
        loaded_config
            .as_ref()
            .map(|lc| lc.resolve_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
    });

    let page_limit = args.page_limit.unwrap_or(config.page_limit);
    let crop_tool = args
        .crop_tool
        .clone()
        .unwrap_or_else(|| config.crop_tool.clone());

    // Compress: CLI option overrides config
    let compress = if args.compress.is_some() {
        args.compress
    } else {
        match &config.compress {
            Some(CompressConfig::Level(n)) if *n <= 6 => Some(CompressionLevel::Level(*n)),
            Some(CompressConfig::Max(s)) if s.eq_ignore_ascii_case("max") => {
                Some(CompressionLevel::Max)
            }
            Some(other) => anyhow::bail!(
                "invalid compress value {:?} in config file. Valid values: 0-6, \"max\"",
                other
            ),
            None => None,
        }
    };

    Ok(MergedConfig {
        site_url: config.site_url.clone(),
        output,
        roster_file: config.roster_file.clone(),
        processed_prefix: config.processed_prefix.clone(),
        crop_tool,
        page_limit,
        static_threshold: config.static_threshold,
        compress,
        skip_download: args.skip_download,
        override_existing: args.override_existing,
        verbose: args.verbose,
    })
}
