//! Gzip compression of rotated log files

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use flate2::Compression;
use flate2::write::GzEncoder;

/// Compresses `path` into `path.gz` and removes the original.
pub fn gzip_in_place(path: &Path) -> io::Result<PathBuf> {
    let mut compressed = path.as_os_str().to_owned();
    compressed.push(".gz");
    let compressed = PathBuf::from(compressed);

    let mut input = BufReader::new(File::open(path)?);
    let output = BufWriter::new(File::create(&compressed)?);
    let mut encoder = GzEncoder::new(output, Compression::default());
    io::copy(&mut input, &mut encoder)?;
    encoder.finish()?;

    fs::remove_file(path)?;
    Ok(compressed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::io::Read;
    use tempfile::tempdir;

    #[test]
    fn test_gzip_replaces_original() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("app.20250101_000000.log");
        fs::write(&file_path, "line one\nline two\n").unwrap();

        let compressed = gzip_in_place(&file_path).unwrap();

        assert!(!file_path.exists());
        assert_eq!(compressed, dir.path().join("app.20250101_000000.log.gz"));

        let mut decoded = String::new();
        GzDecoder::new(File::open(&compressed).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "line one\nline two\n");
    }

    #[test]
    fn test_gzip_missing_file_errors() {
        let dir = tempdir().unwrap();
        assert!(gzip_in_place(&dir.path().join("missing.log")).is_err());
    }
}
