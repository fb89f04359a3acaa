use super::job::{ImageJob, MediaKind};
use super::pattern::{ASSET_ROOT, flatten_target};

/// A well-known asset every character has, relative to its asset directory
#[derive(Debug, Clone, Copy)]
pub struct AssetTemplate {
    /// Path below the character directory, without extension
    pub nested: &'static str,
    pub extension: &'static str,
    pub kind: MediaKind,
}

/// Square icon, full illustration and the two pixel-art animations
pub const WELL_KNOWN_ASSETS: [AssetTemplate; 4] = [
    AssetTemplate {
        nested: "square_0",
        extension: ".png",
        kind: MediaKind::Static,
    },
    AssetTemplate {
        nested: "full_shot_0",
        extension: ".png",
        kind: MediaKind::Static,
    },
    AssetTemplate {
        nested: "pixelart/front",
        extension: ".gif",
        kind: MediaKind::Animation,
    },
    AssetTemplate {
        nested: "pixelart/special",
        extension: ".gif",
        kind: MediaKind::Animation,
    },
];

impl AssetTemplate {
    /// Remote URL of this asset for `name` on `site` (no trailing slash)
    pub fn url(&self, site: &str, name: &str) -> String {
        format!(
            "{}{}/{}/{}{}",
            site.trim_end_matches('/'),
            ASSET_ROOT,
            name,
            self.nested,
            self.extension
        )
    }

    pub fn target(&self, name: &str) -> String {
        flatten_target(self.nested, name, self.extension)
    }

    pub fn job(&self, site: Option<&str>, name: &str) -> ImageJob {
        ImageJob::new(
            self.kind,
            site.map(|s| self.url(s, name)),
            self.target(name),
        )
    }
}

/// The well-known jobs for one name; without a site the jobs carry no source
pub fn well_known_jobs<'a>(
    site: Option<&'a str>,
    name: &'a str,
) -> impl Iterator<Item = ImageJob> + 'a {
    WELL_KNOWN_ASSETS.iter().map(move |t| t.job(site, name))
}

/// Jobs for a previously downloaded roster, without touching the network
pub fn roster_jobs<'a, I>(names: I) -> Vec<ImageJob>
where
    I: IntoIterator<Item = &'a String>,
{
    names
        .into_iter()
        .flat_map(|name| well_known_jobs(None, name))
        .collect()
}
