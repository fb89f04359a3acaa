use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use crate::error::AssetError;

/// Create the parent directory of `path` if it is missing.
///
/// Several workers may race to create the same directory, so an
/// `AlreadyExists` error counts as success.
pub fn ensure_parent_dir(path: &Path) -> Result<(), AssetError> {
    let Some(parent) = path.parent() else {
        return Ok(());
    };
    if parent.as_os_str().is_empty() || parent.is_dir() {
        return Ok(());
    }

    match fs::create_dir_all(parent) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(()),
        Err(e) => Err(AssetError::CreateDir {
            path: parent.to_path_buf(),
            source: e,
        }),
    }
}
