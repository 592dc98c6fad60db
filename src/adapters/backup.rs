use crate::domain::model::SurveyResponse;
use crate::domain::ports::{BackupStore, Storage};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Well-known key the survey form uses for its local backup.
pub const BACKUP_KEY: &str = "museumSurveyBackup";

/// Backup log kept as one JSON array in `museumSurveyBackup.json`.
///
/// Appends are a plain read-modify-write with no locking; the log is
/// never pruned.
#[derive(Debug, Clone)]
pub struct StorageBackupLog<S: Storage> {
    storage: S,
}

impl<S: Storage> StorageBackupLog<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn file_name() -> String {
        format!("{}.json", BACKUP_KEY)
    }

    pub fn location(&self) -> String {
        self.storage.location(&Self::file_name())
    }

    /// `museumSurveyBackup.corrupt-<timestamp>.json`, where an unreadable
    /// log is kept before a fresh one is started.
    pub fn corrupt_file_name(at: DateTime<Utc>) -> String {
        format!("{}.corrupt-{}.json", BACKUP_KEY, at.format("%Y%m%dT%H%M%S%.3fZ"))
    }

    /// Entries to append to. An unparseable log is copied aside untouched
    /// and replaced by an empty one.
    async fn entries_for_append(&self) -> Result<Vec<SurveyResponse>> {
        let data = match self.storage.read_file(&Self::file_name()).await {
            Ok(data) => data,
            Err(e) if e.is_not_found() => return Ok(Vec::new()),
            Err(e) => return Err(e),
        };
        if data.iter().all(u8::is_ascii_whitespace) {
            return Ok(Vec::new());
        }

        match serde_json::from_slice(&data) {
            Ok(entries) => Ok(entries),
            Err(e) => {
                let aside = Self::corrupt_file_name(Utc::now());
                self.storage.write_file(&aside, &data).await?;
                tracing::warn!(
                    "⚠️ Backup log was unreadable ({}); moved to {} and started a new one",
                    e,
                    self.storage.location(&aside)
                );
                Ok(Vec::new())
            }
        }
    }
}

#[async_trait]
impl<S: Storage> BackupStore for StorageBackupLog<S> {
    async fn append(&self, response: &SurveyResponse) -> Result<()> {
        let mut entries = self.entries_for_append().await?;
        entries.push(response.clone());

        let json = serde_json::to_vec_pretty(&entries)?;
        self.storage.write_file(&Self::file_name(), &json).await?;

        tracing::debug!("Survey backed up locally ({} entries)", entries.len());
        Ok(())
    }

    async fn load_all(&self) -> Result<Vec<SurveyResponse>> {
        match self.storage.read_file(&Self::file_name()).await {
            Ok(data) if data.iter().all(u8::is_ascii_whitespace) => Ok(Vec::new()),
            Ok(data) => Ok(serde_json::from_slice(&data)?),
            Err(e) if e.is_not_found() => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }
}
