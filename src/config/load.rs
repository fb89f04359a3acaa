use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::types::{CONFIG_VERSION, FlipperConfig};

/// A loaded configuration file with its associated directory.
///
/// Paths in the config are relative to the config file location,
/// so we need to track where the config was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    /// The parsed configuration
    pub config: FlipperConfig,
    /// The directory containing the config file
    pub config_dir: PathBuf,
}

impl LoadedConfig {
    /// Load a config file from the given path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file: {}", path.display()))?;

        let config: FlipperConfig = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config file: {}", path.display()))?;
        validate(&config)
            .with_context(|| format!("invalid config file: {}", path.display()))?;

        let config_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));

        Ok(Self { config, config_dir })
    }

    /// Resolve the output directory relative to the config file directory.
    pub fn resolve_output_dir(&self) -> PathBuf {
        self.config_dir.join(&self.config.output_dir)
    }
}

fn validate(config: &FlipperConfig) -> Result<()> {
    if config.version != CONFIG_VERSION {
        bail!(
            "unsupported config version {} (expected {})",
            config.version,
            CONFIG_VERSION
        );
    }

    // An empty prefix would crop over the downloaded originals
    if config.processed_prefix.is_empty() {
        bail!("processed_prefix must not be empty");
    }
    if config.processed_prefix.contains(['/', '\\']) {
        bail!(
            "processed_prefix '{}' must not contain path separators",
            config.processed_prefix
        );
    }

    let roster = Path::new(&config.roster_file);
    if config.roster_file.trim().is_empty() || roster.file_name().is_none() {
        bail!("roster_file '{}' must name a file", config.roster_file);
    }

    Ok(())
}
