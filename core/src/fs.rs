#![deny(missing_docs)]

//! # Filesystem Collaborator
//!
//! The single place the engine touches the disk. Reads are plain; writes go
//! through a same-directory temp file that is atomically renamed over the
//! destination, so a crash mid-write never leaves a truncated or
//! mixed-content file.

use crate::error::{EngineError, EngineResult};
use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;

/// File read/write collaborator injected into processors.
#[derive(Debug, Clone, Copy, Default)]
pub struct Filesystem;

impl Filesystem {
    /// Reads a file to a string.
    pub fn read(&self, path: &Path) -> EngineResult<String> {
        fs::read_to_string(path).map_err(|source| EngineError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Writes `contents` to `path` atomically: the full output is committed
    /// or nothing changes.
    pub fn write_atomic(&self, path: &Path, contents: &str) -> EngineResult<()> {
        let io_err = |source: std::io::Error| EngineError::Io {
            path: path.to_path_buf(),
            source,
        };

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));

        let mut tmp = NamedTempFile::new_in(dir).map_err(io_err)?;
        tmp.write_all(contents.as_bytes()).map_err(io_err)?;
        tmp.as_file().sync_all().map_err(io_err)?;
        tmp.persist(path).map_err(|err| EngineError::Io {
            path: path.to_path_buf(),
            source: err.error,
        })?;

        tracing::debug!(path = %path.display(), bytes = contents.len(), "file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_write_then_read_round_trips() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.rs");
        let fs = Filesystem;

        fs.write_atomic(&path, "struct A;\n").unwrap();
        assert_eq!(fs.read(&path).unwrap(), "struct A;\n");
    }

    #[test]
    fn test_write_replaces_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("out.rs");
        let fs = Filesystem;

        fs.write_atomic(&path, "old").unwrap();
        fs.write_atomic(&path, "new").unwrap();
        assert_eq!(fs.read(&path).unwrap(), "new");
    }

    #[test]
    fn test_read_missing_file_reports_path() {
        let fs = Filesystem;
        let err = fs.read(Path::new("definitely/not/here.rs")).unwrap_err();
        assert!(format!("{}", err).contains("definitely/not/here.rs"));
    }
}
