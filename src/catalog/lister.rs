use std::collections::{BTreeSet, HashSet};

use log::{debug, info};
use reqwest::Url;
use reqwest::blocking::Client;

use super::job::{ImageJob, MediaKind};
use super::pattern::{image_sources, parse_reference};
use super::templates::well_known_jobs;
use crate::error::AssetError;

/// Names and download jobs collected from the catalog
#[derive(Debug, Default)]
pub struct Catalog {
    pub names: BTreeSet<String>,
    pub jobs: Vec<ImageJob>,
    targets: HashSet<String>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a job unless another one already writes the same target
    pub fn push(&mut self, job: ImageJob) -> bool {
        if !self.targets.insert(job.target().to_string()) {
            return false;
        }
        self.jobs.push(job);
        true
    }

    /// Collect every matching image reference of one catalog page.
    ///
    /// Relative `src` values are resolved against `page_url`. References that
    /// don't follow the asset layout are skipped.
    pub fn scan_page(&mut self, html: &str, page_url: &Url) {
        for src in image_sources(html) {
            let Some(reference) = parse_reference(src) else {
                continue;
            };

            let source = match page_url.join(src) {
                Ok(url) => url.to_string(),
                Err(e) => {
                    debug!("Skipping unresolvable reference {}: {}", src, e);
                    continue;
                }
            };

            debug!("Found {}", reference.name);
            self.names.insert(reference.name.clone());
            if let Some(job) = reference.into_job(Some(source)) {
                self.push(job);
            }
        }
    }

    /// Add the well-known assets of every name seen so far
    pub fn add_well_known(&mut self, site: &str) {
        let names: Vec<_> = self.names.iter().cloned().collect();
        for name in &names {
            for job in well_known_jobs(Some(site), name) {
                self.push(job);
            }
        }
    }

    pub fn count(&self, kind: MediaKind) -> usize {
        self.jobs.iter().filter(|j| j.kind() == kind).count()
    }
}

/// Scrapes the paged character listing of a site
pub struct CatalogLister<'a> {
    client: &'a Client,
    site: Url,
    page_limit: u32,
}

impl<'a> CatalogLister<'a> {
    pub fn new(client: &'a Client, site: &str, page_limit: u32) -> Result<Self, AssetError> {
        let site = Url::parse(site).map_err(|e| AssetError::InvalidUrl {
            url: site.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            client,
            site,
            page_limit,
        })
    }

    /// URL of listing page `page` (1-based)
    pub fn page_url(&self, page: u32) -> Result<Url, AssetError> {
        let relative = format!("/character/?rarity={}", page);
        self.site
            .join(&relative)
            .map_err(|e| AssetError::InvalidUrl {
                url: relative,
                message: e.to_string(),
            })
    }

    /// Fetch pages `1..=page_limit` and collect their assets
    pub fn list(&self) -> Result<Catalog, AssetError> {
        let mut catalog = Catalog::new();

        for page in 1..=self.page_limit {
            let url = self.page_url(page)?;
            info!("Scanning {}", url);

            let html = self
                .client
                .get(url.clone())
                .send()
                .and_then(|r| r.error_for_status())
                .and_then(|r| r.text())
                .map_err(|e| AssetError::Http {
                    url: url.to_string(),
                    source: e,
                })?;

            catalog.scan_page(&html, &url);
        }

        catalog.add_well_known(self.site.as_str());

        info!(
            "Found {} characters ({} images, {} animations)",
            catalog.names.len(),
            catalog.count(MediaKind::Static),
            catalog.count(MediaKind::Animation)
        );

        Ok(catalog)
    }
}
