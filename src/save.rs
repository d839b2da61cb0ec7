use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

const RESERVED: &[char] = &['/', '\\', '<', '>', ':', '"', '|', '?', '*'];

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("{0:?} is not a usable file name")]
    InvalidName(String),
    #[error("{} already exists", .0.display())]
    AlreadyExists(PathBuf),
    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

/// Turn user input into a bare `.txt` file name, or reject it.
pub fn sanitize_filename(name: &str) -> Result<PathBuf, SaveError> {
    let trimmed = name.trim();
    let invalid = trimmed.is_empty()
        || trimmed == "."
        || trimmed == ".."
        || trimmed.chars().any(|c| c.is_control() || RESERVED.contains(&c));
    if invalid {
        return Err(SaveError::InvalidName(name.to_string()));
    }
    if trimmed.to_ascii_lowercase().ends_with(".txt") {
        if trimmed.len() == ".txt".len() { return Err(SaveError::InvalidName(name.to_string())); }
        Ok(PathBuf::from(trimmed))
    } else {
        Ok(PathBuf::from(format!("{trimmed}.txt")))
    }
}

/// Write `text` to a new file at `path`. Never overwrites; on a failed write
/// the partial file is removed.
pub fn save(text: &str, path: &Path) -> Result<(), SaveError> {
    let mut f = match OpenOptions::new().write(true).create_new(true).open(path) {
        Ok(f) => f,
        Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
            log::warn!("refusing to overwrite {}", path.display());
            return Err(SaveError::AlreadyExists(path.to_path_buf()));
        }
        Err(source) => return Err(SaveError::Io { path: path.to_path_buf(), source }),
    };
    if let Err(source) = f.write_all(text.as_bytes()).and_then(|_| f.sync_all()) {
        drop(f);
        let _ = fs::remove_file(path);
        log::warn!("save to {} failed: {}", path.display(), source);
        return Err(SaveError::Io { path: path.to_path_buf(), source });
    }
    log::info!("saved {} bytes to {}", text.len(), path.display());
    Ok(())
}
