mod cropper;
mod pipeline;

pub use cropper::{AnimationCropper, CropOutcome, Gifsicle, crop_arg};
pub use pipeline::{CropReport, DEFAULT_PREFIX, JobOutcome, Pipeline};
