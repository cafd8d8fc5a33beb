//! Choosing and writing the output file.

use lyric_core::{Error, Result};
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// File extension of generated decks.
pub const PPTX_EXTENSION: &str = "pptx";

/// Default file name offered when no output path is given.
pub const DEFAULT_OUTPUT_NAME: &str = "Untitled.pptx";

/// Apply the `.pptx` file-type filter to an output path.
///
/// Unless the name already ends in `.pptx`, the extension is appended to the
/// full file name, so dotted names such as `Amazing.Grace` are kept. Paths
/// without a file name are refused.
pub fn normalize_output_path(path: &Path) -> Result<PathBuf> {
    let Some(file_name) = path.file_name() else {
        return Err(Error::UnsupportedOutput(path.to_path_buf()));
    };

    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case(PPTX_EXTENSION) => Ok(path.to_path_buf()),
        _ => {
            let mut name = file_name.to_os_string();
            name.push(".");
            name.push(PPTX_EXTENSION);
            Ok(path.with_file_name(name))
        }
    }
}

/// Fail if something already exists at `path`.
pub fn ensure_available(path: &Path) -> Result<()> {
    if path.exists() {
        return Err(Error::DestinationExists(path.to_path_buf()));
    }
    Ok(())
}

/// Write `bytes` to a file that must not exist yet.
///
/// If writing fails part way, the incomplete file is removed.
pub fn write_new(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)
        .map_err(|e| match e.kind() {
            io::ErrorKind::AlreadyExists => Error::DestinationExists(path.to_path_buf()),
            _ => Error::IoError(e),
        })?;

    if let Err(e) = file.write_all(bytes).and_then(|_| file.sync_all()) {
        drop(file);
        if let Err(remove_err) = fs::remove_file(path) {
            log::warn!(
                "Failed to remove incomplete file {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(Error::IoError(e));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_output_path() {
        assert_eq!(
            normalize_output_path(Path::new("Untitled")).unwrap(),
            PathBuf::from("Untitled.pptx")
        );
        assert_eq!(
            normalize_output_path(Path::new("songs/Grace.PPTX")).unwrap(),
            PathBuf::from("songs/Grace.PPTX")
        );
        assert!(matches!(
            normalize_output_path(Path::new("")),
            Err(Error::UnsupportedOutput(_))
        ));
    }

    #[test]
    fn test_normalize_output_path_keeps_dotted_names() {
        assert_eq!(
            normalize_output_path(Path::new("songs/Amazing.Grace")).unwrap(),
            PathBuf::from("songs/Amazing.Grace.pptx")
        );
        assert_eq!(
            normalize_output_path(Path::new("Grace.txt")).unwrap(),
            PathBuf::from("Grace.txt.pptx")
        );
    }

    #[test]
    fn test_write_new_refuses_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        fs::write(&path, b"original").unwrap();

        let err = write_new(&path, b"replacement").unwrap_err();
        assert!(matches!(err, Error::DestinationExists(_)));
        assert_eq!(fs::read(&path).unwrap(), b"original");
        assert!(matches!(
            ensure_available(&path),
            Err(Error::DestinationExists(_))
        ));
    }

    #[test]
    fn test_write_new_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pptx");
        ensure_available(&path).unwrap();

        write_new(&path, b"deck").unwrap();
        assert_eq!(fs::read(&path).unwrap(), b"deck");
    }
}
