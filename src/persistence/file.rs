//! JSON file backed store
//!
//! The whole map is rewritten on every `set`: written to `<path>.tmp`, then
//! renamed over the real file, so a crash mid-write leaves the old scores.

use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::BestScoreStore;
use crate::error::GameResult;

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    values: BTreeMap<String, u64>,
}

impl JsonFileStore {
    /// Open `path`, starting empty if the file does not exist yet
    pub fn open(path: impl AsRef<Path>) -> GameResult<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(json) => serde_json::from_str(&json)?,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("No score file at {}, starting fresh", path.display());
                BTreeMap::new()
            }
            Err(err) => return Err(err.into()),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> GameResult<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir)?;
        }
        let json = serde_json::to_string_pretty(&self.values)?;
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl BestScoreStore for JsonFileStore {
    fn get(&self, key: &str) -> GameResult<Option<u64>> {
        Ok(self.values.get(key).copied())
    }

    fn set(&mut self, key: &str, value: u64) -> GameResult<()> {
        self.values.insert(key.to_string(), value);
        self.flush()
    }
}
