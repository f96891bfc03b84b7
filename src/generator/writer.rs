//! Manifest file reading and writing

use crate::error::IoError;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a manifest file into memory
pub fn read_manifest(path: &Path) -> Result<String, IoError> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::NotFound {
            IoError::not_found(path)
        } else {
            IoError::read_error(path, e)
        }
    })
}

/// Write content to a manifest file
pub fn write_manifest(path: &Path, content: &str) -> Result<(), IoError> {
    fs::write(path, content).map_err(|e| IoError::write_error(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_write_then_read() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("requirements.txt");

        write_manifest(&path, "flask==2.3.3\r\n").unwrap();
        assert_eq!(read_manifest(&path).unwrap(), "flask==2.3.3\r\n");
    }

    #[test]
    fn test_read_missing_file() {
        let dir = TempDir::new().unwrap();
        let err = read_manifest(&dir.path().join("package.json")).unwrap_err();
        assert!(matches!(err, IoError::NotFound { .. }));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("pubspec.yaml");
        let err = write_manifest(&path, "name: app\n").unwrap_err();
        assert!(matches!(err, IoError::WriteError { .. }));
    }
}
