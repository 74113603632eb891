//! File I/O seam.
//!
//! Loading splits on `\n` and drops a trailing `\r`, so CRLF files open with
//! clean rows. Bytes that are not UTF-8 decode to U+FFFD instead of failing
//! the open. Saving writes every row followed by `\n`. Both go through
//! [`FileIo`] so tests can swap the filesystem for memory.

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{debug, error, warn};

pub trait FileIo: Send {
    /// Read `path` into rows.
    fn load(&self, path: &Path) -> Result<Vec<String>>;
    /// Write `content` to `path`, returning the byte count.
    fn save(&self, path: &Path, content: &str) -> Result<usize>;
}

/// Local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsIo;

impl FileIo for FsIo {
    fn load(&self, path: &Path) -> Result<Vec<String>> {
        let bytes = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        let (rows, lossy) = split_rows(&bytes);
        if lossy > 0 {
            warn!(target: "io", path = %path.display(), lines = lossy, "invalid_utf8_replaced");
        }
        debug!(target: "io", path = %path.display(), rows = rows.len(), "file_loaded");
        Ok(rows)
    }

    fn save(&self, path: &Path, content: &str) -> Result<usize> {
        fs::write(path, content.as_bytes())
            .inspect_err(|e| error!(target: "io", path = %path.display(), error = %e, "file_write_error"))
            .with_context(|| format!("writing {}", path.display()))?;
        debug!(target: "io", path = %path.display(), bytes = content.len(), "file_saved");
        Ok(content.len())
    }
}

/// Split raw file bytes into rows. Returns the rows and how many of them
/// needed lossy decoding.
fn split_rows(bytes: &[u8]) -> (Vec<String>, usize) {
    if bytes.is_empty() {
        return (Vec::new(), 0);
    }
    let body = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let mut lossy = 0;
    let rows = body
        .split(|b| *b == b'\n')
        .map(|line| {
            let line = line.strip_suffix(b"\r").unwrap_or(line);
            match String::from_utf8_lossy(line) {
                Cow::Borrowed(s) => s.to_owned(),
                Cow::Owned(s) => {
                    lossy += 1;
                    s
                }
            }
        })
        .collect();
    (rows, lossy)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn load_strips_carriage_returns() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("crlf.txt");
        fs::write(&path, "one\r\ntwo\r\n").unwrap();
        assert_eq!(FsIo.load(&path).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn load_strips_lone_carriage_return_on_last_line() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tail.txt");
        fs::write(&path, "one\r\ntwo\r").unwrap();
        assert_eq!(FsIo.load(&path).unwrap(), vec!["one", "two"]);
    }

    #[test]
    fn load_keeps_blank_rows_and_empty_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("blank.txt");
        fs::write(&path, "a\n\nb").unwrap();
        assert_eq!(FsIo.load(&path).unwrap(), vec!["a", "", "b"]);
        fs::write(&path, "").unwrap();
        assert!(FsIo.load(&path).unwrap().is_empty());
    }

    #[test]
    fn load_replaces_invalid_utf8() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("latin1.txt");
        fs::write(&path, b"caf\xe9\nok\n").unwrap();
        assert_eq!(FsIo.load(&path).unwrap(), vec!["caf\u{fffd}", "ok"]);
    }

    #[test]
    fn save_reports_bytes_written() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        let n = FsIo.save(&path, "abc\nde\n").unwrap();
        assert_eq!(n, 7);
        assert_eq!(fs::read_to_string(&path).unwrap(), "abc\nde\n");
    }

    #[test]
    fn load_missing_file_keeps_io_error_kind() {
        let dir = tempfile::tempdir().unwrap();
        let err = FsIo.load(&dir.path().join("missing.txt")).unwrap_err();
        let io = err.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::NotFound);
    }
}
