mod job;
mod lister;
mod pattern;
mod roster;
mod templates;

pub use job::{ImageJob, JobPaths, MediaKind};
pub use lister::{Catalog, CatalogLister};
pub use pattern::{CatalogRef, flatten_target, image_sources, parse_reference};
pub use roster::{read_roster, write_roster};
pub use templates::{AssetTemplate, WELL_KNOWN_ASSETS, roster_jobs, well_known_jobs};
