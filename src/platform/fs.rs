// taillight - platform/fs.rs
//
// Filesystem helpers with permissive decoding.

use std::io;
use std::path::Path;

/// Read the full content of a file as a string.
///
/// Invalid UTF-8 byte sequences are replaced with U+FFFD; a malformed file
/// never aborts the read.
pub fn read_file_lossy(path: &Path) -> io::Result<String> {
    let bytes = std::fs::read(path)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// Read a file as a vector of lines, decoding lossily.
///
/// Line endings are stripped (`\n` and `\r\n` alike, via `str::lines`).
pub fn read_lines_lossy(path: &Path) -> io::Result<Vec<String>> {
    let content = read_file_lossy(path)?;
    Ok(content.lines().map(str::to_string).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_read_lines_strips_endings() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mixed.log");
        fs::write(&path, "one\r\ntwo\nthree").unwrap();
        let lines = read_lines_lossy(&path).unwrap();
        assert_eq!(lines, vec!["one", "two", "three"]);
    }

    /// Malformed bytes are replaced character by character, never fatal.
    #[test]
    fn test_invalid_utf8_is_replaced() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.log");
        fs::write(&path, b"ok \xff\xfe bytes\n").unwrap();
        let lines = read_lines_lossy(&path).unwrap();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].contains('\u{fffd}'));
        assert!(lines[0].starts_with("ok "));
        assert!(lines[0].ends_with(" bytes"));
    }
}
