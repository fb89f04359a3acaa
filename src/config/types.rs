use serde::{Deserialize, Serialize};

/// Config file version this build understands
pub const CONFIG_VERSION: u32 = 1;

/// PNG compression level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CompressConfig {
    /// Optimization level 0-6
    Level(u8),
    /// Maximum compression ("max")
    Max(String),
}

/// Configuration file structure.
///
/// `output_dir` is relative to the config file location.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FlipperConfig {
    /// Config file version (currently 1)
    pub version: u32,
    /// Site hosting the character catalog and the assets
    pub site_url: String,
    /// Directory for downloads and processed output
    pub output_dir: String,
    /// Saved character list, relative to the output directory
    pub roster_file: String,
    /// Marker prepended to processed asset paths
    pub processed_prefix: String,
    /// Command used to crop animations
    pub crop_tool: String,
    /// Number of catalog pages to scan
    pub page_limit: u32,
    /// Corner-colour difference above which a still-image pixel is content
    pub static_threshold: u8,
    /// PNG compression for processed still images (optional)
    pub compress: Option<CompressConfig>,
}

impl Default for FlipperConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            site_url: "https://worldflipper.jp".to_string(),
            output_dir: ".".to_string(),
            roster_file: "characters.txt".to_string(),
            processed_prefix: "processed_".to_string(),
            crop_tool: "gifsicle".to_string(),
            page_limit: 5,
            static_threshold: 100,
            compress: None,
        }
    }
}
