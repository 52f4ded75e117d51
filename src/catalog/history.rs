use anyhow::Context;
use chrono::NaiveDate;
use std::collections::BTreeMap;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::PathBuf;
use tempfile::NamedTempFile;

/// Record identifier to the calendar date it was last published.
pub type UsageHistory = BTreeMap<String, NaiveDate>;

#[derive(Debug, Clone)]
pub struct HistoryStore {
    path: PathBuf,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Missing or corrupt files load as an empty history.
    pub fn load(&self) -> UsageHistory {
        let body = match fs::read_to_string(&self.path) {
            Ok(body) => body,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                log::info!("no history at {}, starting fresh", self.path.display());
                return UsageHistory::new();
            }
            Err(err) => {
                log::warn!("could not read {}: {}", self.path.display(), err);
                return UsageHistory::new();
            }
        };

        match serde_json::from_str::<UsageHistory>(&body) {
            Ok(history) => history,
            Err(err) => {
                log::warn!(
                    "ignoring corrupt history in {}: {}",
                    self.path.display(),
                    err
                );
                UsageHistory::new()
            }
        }
    }

    /// Sets `id` to `date` and rewrites the whole file.
    pub fn record_usage(
        &self,
        history: &mut UsageHistory,
        id: &str,
        date: NaiveDate,
    ) -> anyhow::Result<()> {
        history.insert(id.to_string(), date);
        self.persist(history)
    }

    fn persist(&self, history: &UsageHistory) -> anyhow::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let body = serde_json::to_string_pretty(history).context("Serializing history")?;

        let mut file = NamedTempFile::new_in(&dir)
            .with_context(|| format!("Creating temp file in {}", dir.display()))?;
        file.write_all(body.as_bytes())
            .context("Writing history temp file")?;
        file.persist(&self.path)
            .with_context(|| format!("Replacing {}", self.path.display()))?;

        log::debug!("history saved to {}", self.path.display());
        Ok(())
    }
}
