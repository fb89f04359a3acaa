mod downloader;

pub use downloader::{DownloadOutcome, DownloadSummary, Downloader};
