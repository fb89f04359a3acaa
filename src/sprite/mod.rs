mod bbox;
pub mod corner;
mod frames;

pub use bbox::BoundingBox;
pub use frames::{animation_bounds, decode_animation, frame_bounds, measure_animation};
