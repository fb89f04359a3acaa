use std::path::{Path, PathBuf};
use std::process::Command;

use log::debug;

use crate::error::AssetError;
use crate::output::ensure_parent_dir;
use crate::sprite::BoundingBox;

/// Result of one external crop invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CropOutcome {
    pub output: PathBuf,
    /// Whether the tool reported success
    pub success: bool,
    /// Exit code, if the tool exited normally
    pub code: Option<i32>,
}

/// Crops an animation file to a box, keeping its frames and timing
pub trait AnimationCropper: Sync {
    fn crop(
        &self,
        input: &Path,
        output: &Path,
        bounds: BoundingBox,
    ) -> Result<CropOutcome, AssetError>;
}

/// Crops through the `gifsicle` command-line tool
#[derive(Debug, Clone)]
pub struct Gifsicle {
    program: String,
}

impl Gifsicle {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one crop: `--crop x1,y1-x2,y2 --output <out> <in>`
    pub fn args(input: &Path, output: &Path, bounds: BoundingBox) -> Vec<String> {
        vec![
            "--crop".to_string(),
            crop_arg(bounds),
            "--output".to_string(),
            output.to_string_lossy().into_owned(),
            input.to_string_lossy().into_owned(),
        ]
    }
}

impl Default for Gifsicle {
    fn default() -> Self {
        Self::new("gifsicle")
    }
}

impl AnimationCropper for Gifsicle {
    fn crop(
        &self,
        input: &Path,
        output: &Path,
        bounds: BoundingBox,
    ) -> Result<CropOutcome, AssetError> {
        ensure_parent_dir(output)?;

        let args = Self::args(input, output, bounds);
        debug!("{} {}", self.program, args.join(" "));

        let status = Command::new(&self.program)
            .args(&args)
            .status()
            .map_err(|e| AssetError::CropTool {
                tool: self.program.clone(),
                source: e,
            })?;

        Ok(CropOutcome {
            output: output.to_path_buf(),
            success: status.success(),
            code: status.code(),
        })
    }
}

/// Gifsicle corner form. Its lower-right corner is exclusive, which matches
/// the half-open box directly.
pub fn crop_arg(bounds: BoundingBox) -> String {
    format!("{},{}-{},{}", bounds.x1, bounds.y1, bounds.x2, bounds.y2)
}
