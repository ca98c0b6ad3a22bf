//! Workspace configuration: where the database lives.

use std::path::PathBuf;

use anyhow::{Context, Result};

const APP_DIR: &str = "flatsheet";
const DB_FILE: &str = "sheet.db";

/// Resolve the database path: explicit flag/env first, then the platform
/// data directory.
pub fn database_path(flag: Option<PathBuf>) -> Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path);
    }
    let base = dirs::data_dir().context("no data directory on this platform; pass --db")?;
    Ok(base.join(APP_DIR).join(DB_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins() {
        let path = database_path(Some("/tmp/custom.db".into())).unwrap();
        assert_eq!(path, PathBuf::from("/tmp/custom.db"));
    }

    #[test]
    fn test_default_lands_in_app_dir() {
        if let Ok(path) = database_path(None) {
            assert!(path.ends_with("flatsheet/sheet.db"));
        }
    }
}
