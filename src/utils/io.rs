//! File I/O primitives with consistent error handling.

use crate::error::{Error, Result};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Read a whole file as UTF-8 text.
///
/// Invalid UTF-8 surfaces as `file.decode_failed`; every other failure is
/// `internal.io_error` with `operation` as context.
pub fn read_file(path: &Path, operation: &str) -> Result<String> {
    fs::read_to_string(path).map_err(|e| {
        if e.kind() == ErrorKind::InvalidData {
            Error::file_decode_failed(path.display().to_string(), e.to_string())
        } else {
            Error::internal_io(e.to_string(), Some(operation.to_string()))
        }
    })
}

/// Replace a file's contents in place. No backup is kept.
pub fn write_file(path: &Path, content: &str, operation: &str) -> Result<()> {
    fs::write(path, content)
        .map_err(|e| Error::internal_io(e.to_string(), Some(operation.to_string())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn read_file_succeeds_for_existing_file() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "namespace Foo;").unwrap();

        let content = read_file(temp.path(), "test read").unwrap();
        assert_eq!(content, "namespace Foo;\n");
    }

    #[test]
    fn read_file_returns_error_for_missing_file() {
        let result = read_file(Path::new("/nonexistent/path.cs"), "test read");
        let err = result.unwrap_err();
        assert_eq!(err.code.as_str(), "internal.io_error");
    }

    #[test]
    fn read_file_reports_decode_failure_for_invalid_utf8() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(&[0x6e, 0x73, 0xff, 0xfe, 0x00]).unwrap();

        let err = read_file(temp.path(), "test read").unwrap_err();
        assert_eq!(err.code.as_str(), "file.decode_failed");
    }

    #[test]
    fn write_file_replaces_content() {
        let temp = NamedTempFile::new().unwrap();
        write_file(temp.path(), "first", "test write").unwrap();
        write_file(temp.path(), "second", "test write").unwrap();

        assert_eq!(fs::read_to_string(temp.path()).unwrap(), "second");
    }

    #[test]
    fn write_file_fails_for_missing_directory() {
        let result = write_file(Path::new("/nonexistent/dir/file.cs"), "x", "test write");
        assert_eq!(result.unwrap_err().code.as_str(), "internal.io_error");
    }
}
