//! Location of the persisted credential.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::ProjectDirs;

use collegeconnect::auth::FileCredentialStore;

/// Resolve and create the data directory.
///
/// An explicit directory wins over the platform default.
pub fn data_dir(explicit: Option<&Path>) -> Result<PathBuf> {
    let dir = match explicit {
        Some(dir) => dir.to_path_buf(),
        None => ProjectDirs::from("", "", "collegeconnect")
            .context("Could not determine data directory")?
            .data_dir()
            .to_path_buf(),
    };

    fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create data directory {}", dir.display()))?;

    Ok(dir)
}

/// The credential slot inside `dir`.
pub fn credential_store(dir: &Path) -> FileCredentialStore {
    FileCredentialStore::in_dir(dir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use collegeconnect::auth::CREDENTIAL_FILE;
    use tempfile::TempDir;

    #[test]
    fn explicit_dir_is_created() {
        let tmp = TempDir::new().unwrap();
        let dir = tmp.path().join("nested").join("data");

        let resolved = data_dir(Some(&dir)).unwrap();

        assert_eq!(resolved, dir);
        assert!(dir.is_dir());
        assert_eq!(
            credential_store(&resolved).path(),
            dir.join(CREDENTIAL_FILE)
        );
    }
}
