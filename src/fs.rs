//! Stateless file helpers for embedding hosts.
//!
//! A host application that streams reviews of source files needs two small
//! operations next to the streamer: load a file's raw bytes and check its
//! extension. They have no interaction with the batching state machine and
//! are kept deliberately independent of it.

use std::ffi::OsStr;
use std::fs::File;
use std::io::{self, Read};
use std::path::Path;

/// Read an entire file into a byte vector.
///
/// # Errors
///
/// Returns the underlying I/O error if the path cannot be opened or read.
pub fn read_file_bytes(path: impl AsRef<Path>) -> io::Result<Vec<u8>> {
    let mut file = File::open(path)?;
    let mut content = Vec::new();
    file.read_to_end(&mut content)?;
    Ok(content)
}

/// Check whether `path` carries the given extension (without the dot).
///
/// Purely lexical: the filesystem is not consulted and the comparison is
/// exact, so `foo.PY` does not match `py`.
pub fn has_extension(path: impl AsRef<Path>, ext: &str) -> bool {
    path.as_ref().extension() == Some(OsStr::new(ext))
}

/// Check whether `path` names a Python source file.
pub fn is_python_source(path: impl AsRef<Path>) -> bool {
    has_extension(path, "py")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn scratch_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("slipstream-fs-{}-{name}", std::process::id()))
    }

    #[test]
    fn test_read_file_bytes_round_trip() {
        let path = scratch_path("roundtrip.txt");
        std::fs::write(&path, b"fn main() {}\n").unwrap();

        let content = read_file_bytes(&path).unwrap();
        assert_eq!(content, b"fn main() {}\n");

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_read_file_bytes_missing_path_errors() {
        let err = read_file_bytes(scratch_path("does-not-exist")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::NotFound);
    }

    #[test]
    fn test_read_file_bytes_empty_file() {
        let path = scratch_path("empty.bin");
        std::fs::write(&path, b"").unwrap();

        assert!(read_file_bytes(&path).unwrap().is_empty());

        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_extension_checks() {
        assert!(is_python_source("review_task.py"));
        assert!(is_python_source("dir/with.dots/module.py"));
        assert!(!is_python_source("script.PY"));
        assert!(!is_python_source(".py"));
        assert!(!is_python_source("no_extension"));

        assert!(has_extension("lib.rs", "rs"));
        assert!(!has_extension("lib.rs", "py"));
    }
}
