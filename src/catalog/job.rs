use std::path::{Path, PathBuf};

/// Kind of media an asset holds, which decides how it gets cropped
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaKind {
    /// Single still image, cropped against its corner colour
    Static,
    /// Multi-frame animation, cropped by an external tool
    Animation,
}

impl MediaKind {
    /// Map a file extension (with or without the leading dot) to a kind
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.trim_start_matches('.') {
            "png" => Some(MediaKind::Static),
            "gif" => Some(MediaKind::Animation),
            _ => None,
        }
    }
}

/// Where an asset comes from and where it lands locally
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobPaths {
    /// Remote location, absent when reusing a previous download
    pub source: Option<String>,
    /// Path relative to the output root, `/`-separated
    pub target: String,
}

/// A single asset to download and crop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageJob {
    Static(JobPaths),
    Animation(JobPaths),
}

impl ImageJob {
    pub fn new(kind: MediaKind, source: Option<String>, target: String) -> Self {
        let paths = JobPaths { source, target };
        match kind {
            MediaKind::Static => ImageJob::Static(paths),
            MediaKind::Animation => ImageJob::Animation(paths),
        }
    }

    pub fn kind(&self) -> MediaKind {
        match self {
            ImageJob::Static(_) => MediaKind::Static,
            ImageJob::Animation(_) => MediaKind::Animation,
        }
    }

    pub fn paths(&self) -> &JobPaths {
        match self {
            ImageJob::Static(paths) | ImageJob::Animation(paths) => paths,
        }
    }

    pub fn source(&self) -> Option<&str> {
        self.paths().source.as_deref()
    }

    pub fn target(&self) -> &str {
        &self.paths().target
    }

    /// Downloaded file location under `root`
    pub fn local_path(&self, root: &Path) -> PathBuf {
        root.join(self.target())
    }

    /// Cropped output location under `root`, marked with `prefix`
    pub fn processed_path(&self, root: &Path, prefix: &str) -> PathBuf {
        root.join(format!("{}{}", prefix, self.target()))
    }
}
