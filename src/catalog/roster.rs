use std::collections::BTreeSet;
use std::fs;
use std::path::Path;

use crate::error::AssetError;
use crate::output::ensure_parent_dir;

/// Read the persisted asset names, one per line. Blank lines are ignored.
pub fn read_roster(path: &Path) -> Result<BTreeSet<String>, AssetError> {
    let content = fs::read_to_string(path).map_err(|e| AssetError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Persist asset names so a later run can skip scraping
pub fn write_roster(path: &Path, names: &BTreeSet<String>) -> Result<(), AssetError> {
    ensure_parent_dir(path)?;

    let mut content = String::new();
    for name in names {
        content.push_str(name);
        content.push('\n');
    }

    fs::write(path, content).map_err(|e| AssetError::OutputWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roster_round_trip_trims_lines() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("characters.txt");
        fs::write(&path, "bob\r\n  alice \n\n").unwrap();

        let names = read_roster(&path).unwrap();
        assert_eq!(names.iter().collect::<Vec<_>>(), vec!["alice", "bob"]);

        let copy = tmp.path().join("nested").join("characters.txt");
        write_roster(&copy, &names).unwrap();
        assert_eq!(fs::read_to_string(&copy).unwrap(), "alice\nbob\n");
    }

    #[test]
    fn test_missing_roster_is_an_error() {
        let tmp = tempfile::TempDir::new().unwrap();
        let result = read_roster(&tmp.path().join("characters.txt"));
        assert!(matches!(result, Err(AssetError::Read { .. })));
    }
}
