//! State remembered between runs.
//!
//! Loaded once at start, handed to whoever needs it, and written back only
//! when something changed.

use crate::config::load_yaml;
use crate::error::{ Error, Result };
use serde::{ Deserialize, Serialize };
use std::fs;
use std::path::{ Path, PathBuf };
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct State {
    pub last_repository: Option<String>,
}

pub struct StateStore {
    path: PathBuf,
    state: State,
    dirty: bool,
}

impl StateStore {
    pub fn load(path: &Path) -> Result<Self> {
        let state = load_yaml(path)?;
        Ok(StateStore { path: path.to_path_buf(), state, dirty: false })
    }

    pub fn state(&self) -> &State {
        &self.state
    }

    pub fn set_last_repository(&mut self, repository: &str) {
        if self.state.last_repository.as_deref() != Some(repository) {
            self.state.last_repository = Some(repository.to_string());
            self.dirty = true;
        }
    }

    /// Writes the state back if it changed since loading.
    pub fn save(&mut self) -> Result<()> {
        if !self.dirty {
            return Ok(());
        }
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_yaml::to_string(&self.state).map_err(|source| Error::Config {
            path: self.path.clone(),
            source,
        })?;
        fs::write(&self.path, text)?;
        debug!(path = %self.path.display(), "saved state");
        self.dirty = false;
        Ok(())
    }
}
