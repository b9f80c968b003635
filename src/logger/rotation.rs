//! Size-based rotation for the log file

use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

use jiff::Zoned;

use crate::logger::LoggerError;
use crate::logger::compression::gzip_in_place;
use crate::logger::config::RotationConfig;

pub struct RotationManager {
    config: RotationConfig,
}

impl RotationManager {
    pub fn new(config: RotationConfig) -> Self {
        Self { config }
    }

    pub fn should_rotate(&self, current_size: u64) -> bool {
        current_size >= self.config.max_size
    }

    /// Moves the active file aside, compresses it if configured and prunes
    /// old rotations. Returns the final path of the rotated file.
    pub fn rotate(&self, active: &Path) -> Result<Option<PathBuf>, LoggerError> {
        if !active.exists() {
            return Ok(None);
        }

        let rotated = rotated_path(active, &Zoned::now());
        fs::rename(active, &rotated)?;

        let rotated = if self.config.compress {
            gzip_in_place(&rotated)
                .map_err(|e| LoggerError::rotation(format!("compression failed: {e}")))?
        } else {
            rotated
        };

        self.prune(active)?;
        Ok(Some(rotated))
    }

    /// Deletes the oldest rotations beyond `max_files`.
    pub fn prune(&self, active: &Path) -> Result<usize, LoggerError> {
        let mut rotated = rotated_siblings(active)?;
        if rotated.len() <= self.config.max_files {
            return Ok(0);
        }

        rotated.sort_by(|(a_path, a_time), (b_path, b_time)| {
            a_time.cmp(b_time).then_with(|| a_path.cmp(b_path))
        });

        let excess = rotated.len() - self.config.max_files;
        for (path, _) in rotated.iter().take(excess) {
            fs::remove_file(path)?;
        }
        Ok(excess)
    }
}

/// `logs/app.log` -> `logs/app.20250115_120000.log`, with a counter on clashes.
fn rotated_path(active: &Path, now: &Zoned) -> PathBuf {
    let timestamp = now.strftime("%Y%m%d_%H%M%S").to_string();
    let stem = active.file_stem().unwrap_or_default().to_string_lossy();
    let ext = active.extension().map(|e| e.to_string_lossy());

    let name_for = |suffix: &str| match &ext {
        Some(ext) => format!("{stem}.{timestamp}{suffix}.{ext}"),
        None => format!("{stem}.{timestamp}{suffix}"),
    };

    let mut candidate = active.with_file_name(name_for(""));
    let mut counter = 1;
    while candidate.exists() || gz_sibling(&candidate).exists() {
        candidate = active.with_file_name(name_for(&format!("_{counter}")));
        counter += 1;
    }
    candidate
}

fn gz_sibling(path: &Path) -> PathBuf {
    let mut name = path.as_os_str().to_owned();
    name.push(".gz");
    PathBuf::from(name)
}

fn rotated_siblings(active: &Path) -> Result<Vec<(PathBuf, SystemTime)>, LoggerError> {
    let parent = match active.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    let prefix = format!(
        "{}.",
        active.file_stem().unwrap_or_default().to_string_lossy()
    );

    let mut files = Vec::new();
    for entry in fs::read_dir(parent)? {
        let path = entry?.path();
        if path.file_name() == active.file_name() {
            continue;
        }
        let is_rotation = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with(&prefix))
            .unwrap_or(false);
        if is_rotation {
            let modified = fs::metadata(&path)?
                .modified()
                .unwrap_or(SystemTime::UNIX_EPOCH);
            files.push((path, modified));
        }
    }
    Ok(files)
}
