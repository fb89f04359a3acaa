pub mod catalog;
pub mod cli;
pub mod config;
pub mod crop;
pub mod error;
pub mod fetch;
pub mod output;
pub mod sprite;

pub use catalog::{Catalog, ImageJob, MediaKind};
pub use cli::{CliArgs, CompressionLevel};
pub use crop::{AnimationCropper, Gifsicle, Pipeline};
pub use error::AssetError;
pub use sprite::{BoundingBox, animation_bounds};
