//! Artifact file boundary
//!
//! Generators produce text in memory; this module is the only place that
//! touches the filesystem.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::error::TableError;

/// Result of comparing a freshly generated artifact with the one on disk
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactStatus {
    InSync,
    OutOfSync,
    Missing,
}

fn tmp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_then_rename(tmp_path: &Path, path: &Path, contents: &str) -> io::Result<()> {
    {
        let mut f = fs::File::create(tmp_path)?;
        f.write_all(contents.as_bytes())?;
        f.sync_all()?;
    }

    #[cfg(windows)]
    {
        if path.exists() {
            // Windows rename fails if destination exists.
            fs::remove_file(path)?;
        }
    }

    fs::rename(tmp_path, path)
}

/// Write `contents` to `path`, replacing any previous artifact.
///
/// Data goes to a sibling `.tmp` file first and is renamed into place, so a
/// failed run leaves either the old file or nothing, never a partial table.
pub fn write_artifact(path: &Path, contents: &str) -> Result<(), TableError> {
    let write_err = |source| TableError::OutputWrite {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(write_err)?;
    }

    let tmp_path = tmp_path_for(path);
    if let Err(e) = write_then_rename(&tmp_path, path, contents) {
        let _ = fs::remove_file(&tmp_path);
        return Err(write_err(e));
    }

    tracing::debug!("wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

/// Compare `contents` with the artifact currently at `path`
pub fn check_artifact(path: &Path, contents: &str) -> Result<ArtifactStatus, TableError> {
    match fs::read_to_string(path) {
        Ok(existing) if existing == contents => Ok(ArtifactStatus::InSync),
        Ok(_) => Ok(ArtifactStatus::OutOfSync),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(ArtifactStatus::Missing),
        Err(source) => Err(TableError::OutputRead {
            path: path.to_path_buf(),
            source,
        }),
    }
}
