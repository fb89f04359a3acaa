mod dirs;
mod format;

pub use dirs::ensure_parent_dir;
pub use format::save_png;
