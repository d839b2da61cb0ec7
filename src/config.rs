use std::path::{Path, PathBuf};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use crate::board::cozy::Position;
use crate::session::promotion::PromotionChoice;

/// Session settings, loadable from a JSON file.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct SessionConfig {
    /// Starting position; standard start when absent.
    pub start_fen: Option<String>,
    /// Directory saved transcripts go to.
    pub save_dir: PathBuf,
    pub promotion: PromotionChoice,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { start_fen: None, save_dir: PathBuf::from("."), promotion: PromotionChoice::Queen }
    }
}

impl SessionConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_json(&raw).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_json(raw: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    pub fn start_position(&self) -> anyhow::Result<Position> {
        match &self.start_fen {
            Some(fen) => Ok(Position::from_fen(fen)?),
            None => Ok(Position::startpos()),
        }
    }
}
