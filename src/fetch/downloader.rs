use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use log::{debug, info, warn};
use rayon::prelude::*;
use reqwest::StatusCode;
use reqwest::blocking::Client;

use crate::catalog::ImageJob;
use crate::error::AssetError;
use crate::output::ensure_parent_dir;

/// What happened to a single download
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadOutcome {
    /// Bytes written to the target
    Saved(usize),
    /// Server answered with something other than 200; nothing written
    Rejected(StatusCode),
    /// Job has no remote source
    NoSource,
}

/// Tally of a download batch
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct DownloadSummary {
    pub saved: usize,
    pub rejected: usize,
    pub failed: usize,
}

/// Fetches job sources into an output directory
pub struct Downloader {
    client: Client,
    root: PathBuf,
}

impl Downloader {
    pub fn new(root: impl Into<PathBuf>) -> Result<Self, AssetError> {
        let client = Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .connect_timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AssetError::Http {
                url: String::new(),
                source: e,
            })?;

        Ok(Self {
            client,
            root: root.into(),
        })
    }

    pub fn client(&self) -> &Client {
        &self.client
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Download one URL to `dest`, creating parent directories as needed.
    ///
    /// The body goes to a `.part` file first and is renamed into place, so a
    /// failed transfer never leaves a truncated asset behind.
    pub fn fetch(&self, url: &str, dest: &Path) -> Result<DownloadOutcome, AssetError> {
        let response = self.client.get(url).send().map_err(|e| AssetError::Http {
            url: url.to_string(),
            source: e,
        })?;

        let status = response.status();
        if status != StatusCode::OK {
            return Ok(DownloadOutcome::Rejected(status));
        }

        let bytes = response.bytes().map_err(|e| AssetError::Http {
            url: url.to_string(),
            source: e,
        })?;

        ensure_parent_dir(dest)?;
        let temp_path = part_path(dest);
        fs::write(&temp_path, &bytes).map_err(|e| AssetError::OutputWrite {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, dest).map_err(|e| AssetError::OutputWrite {
            path: dest.to_path_buf(),
            source: e,
        })?;

        Ok(DownloadOutcome::Saved(bytes.len()))
    }

    pub fn fetch_job(&self, job: &ImageJob) -> Result<DownloadOutcome, AssetError> {
        match job.source() {
            Some(url) => self.fetch(url, &job.local_path(&self.root)),
            None => Ok(DownloadOutcome::NoSource),
        }
    }

    /// Download every job concurrently and wait for all of them.
    ///
    /// Each job writes its own target, so they run independently; one failure
    /// is logged and does not stop the rest.
    pub fn fetch_all(&self, jobs: &[ImageJob]) -> DownloadSummary {
        info!("Downloading {} assets...", jobs.len());

        let outcomes: Vec<_> = jobs
            .par_iter()
            .map(|job| {
                let outcome = self.fetch_job(job);
                match &outcome {
                    Ok(DownloadOutcome::Saved(len)) => {
                        debug!("Saved {} ({} bytes)", job.target(), len)
                    }
                    Ok(DownloadOutcome::Rejected(status)) => {
                        warn!(
                            "Skipping {}: server answered {}",
                            job.source().unwrap_or_default(),
                            status
                        )
                    }
                    Ok(DownloadOutcome::NoSource) => {}
                    Err(e) => warn!("Download failed: {}", e),
                }
                outcome
            })
            .collect();

        let summary = summarize(&outcomes);
        info!(
            "Downloaded {} assets ({} rejected, {} failed)",
            summary.saved, summary.rejected, summary.failed
        );
        summary
    }
}

/// `alice.gif` -> `alice.gif.part`, keeping the extension so that targets
/// sharing a stem never share a temporary file
fn part_path(dest: &Path) -> PathBuf {
    let mut name = dest.as_os_str().to_os_string();
    name.push(".part");
    PathBuf::from(name)
}

fn summarize(outcomes: &[Result<DownloadOutcome, AssetError>]) -> DownloadSummary {
    outcomes
        .iter()
        .fold(DownloadSummary::default(), |mut summary, outcome| {
            match outcome {
                Ok(DownloadOutcome::Saved(_)) => summary.saved += 1,
                Ok(DownloadOutcome::Rejected(_)) => summary.rejected += 1,
                Ok(DownloadOutcome::NoSource) => {}
                Err(_) => summary.failed += 1,
            }
            summary
        })
}
