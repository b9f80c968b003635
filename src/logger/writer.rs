//! File writer with size-based rotation

use std::fs::{File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use tracing_subscriber::fmt::MakeWriter;

use crate::logger::LoggerError;
use crate::logger::config::FileConfig;
use crate::logger::rotation::RotationManager;

/// Shared handle to the active log file.
///
/// Once a write or rotation fails the writer switches to stderr for the rest
/// of the process so logging never takes the service down.
#[derive(Clone)]
pub struct RotatingFileWriter {
    path: PathBuf,
    state: Arc<Mutex<WriterState>>,
}

struct WriterState {
    file: BufWriter<File>,
    current_size: u64,
    rotation: RotationManager,
    fallback: bool,
}

impl RotatingFileWriter {
    pub fn new(config: &FileConfig) -> Result<Self, LoggerError> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let file = open_log_file(&config.path, config.append)?;
        let current_size = if config.append {
            std::fs::metadata(&config.path).map(|m| m.len()).unwrap_or(0)
        } else {
            0
        };

        Ok(Self {
            path: config.path.clone(),
            state: Arc::new(Mutex::new(WriterState {
                file,
                current_size,
                rotation: RotationManager::new(config.rotation.clone()),
                fallback: false,
            })),
        })
    }

    fn lock(&self) -> io::Result<MutexGuard<'_, WriterState>> {
        self.state
            .lock()
            .map_err(|_| io::Error::other("log writer lock poisoned"))
    }

    #[cfg(test)]
    fn is_fallback(&self) -> bool {
        self.lock().map(|s| s.fallback).unwrap_or(true)
    }
}

impl<'a> MakeWriter<'a> for RotatingFileWriter {
    type Writer = RotatingFileWriter;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let path = self.path.clone();
        let mut state = self.lock()?;

        if state.fallback {
            return io::stderr().write(buf);
        }

        if state.rotation.should_rotate(state.current_size) {
            if let Err(e) = rotate(&mut state, &path) {
                state.fallback = true;
                eprintln!("[logger] rotation failed, writing to stderr: {e}");
                return io::stderr().write(buf);
            }
        }

        match state.file.write(buf) {
            Ok(written) => {
                state.current_size += written as u64;
                Ok(written)
            }
            Err(e) => {
                state.fallback = true;
                eprintln!("[logger] file write failed, writing to stderr: {e}");
                io::stderr().write(buf)
            }
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        let mut state = self.lock()?;
        if state.fallback {
            return io::stderr().flush();
        }
        state.file.flush()
    }
}

fn rotate(state: &mut WriterState, path: &Path) -> Result<(), LoggerError> {
    state.file.flush()?;
    state.rotation.rotate(path)?;
    state.file = open_log_file(path, false)?;
    state.current_size = 0;
    Ok(())
}

fn open_log_file(path: &Path, append: bool) -> io::Result<BufWriter<File>> {
    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(append)
        .truncate(!append)
        .open(path)?;
    Ok(BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logger::config::RotationConfig;
    use std::fs;
    use tempfile::tempdir;

    fn file_config(path: PathBuf, max_size: u64) -> FileConfig {
        FileConfig {
            enabled: true,
            path,
            append: true,
            format: Default::default(),
            rotation: RotationConfig {
                max_size,
                max_files: 3,
                compress: false,
            },
        }
    }

    #[test]
    fn test_writes_reach_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/app.log");
        let mut writer = RotatingFileWriter::new(&file_config(path.clone(), 1024)).unwrap();

        writer.write_all(b"hello\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "hello\n");
        assert!(!writer.is_fallback());
    }

    #[test]
    fn test_rotates_once_size_is_reached() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        let mut writer = RotatingFileWriter::new(&file_config(path.clone(), 8)).unwrap();

        writer.write_all(b"0123456789\n").unwrap();
        writer.write_all(b"next\n").unwrap();
        writer.flush().unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "next\n");
        let rotated = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(Result::ok)
            .filter(|e| e.path() != path)
            .count();
        assert_eq!(rotated, 1);
    }

    #[test]
    fn test_append_counts_existing_size() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("app.log");
        fs::write(&path, "previous run\n").unwrap();

        let writer = RotatingFileWriter::new(&file_config(path, 1024)).unwrap();
        assert_eq!(writer.lock().unwrap().current_size, 13);
    }
}
