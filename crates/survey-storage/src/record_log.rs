//! Append-only JSON-lines record log

use std::path::{Path, PathBuf};

use survey_core::StoredSurveyRecord;
use tokio::fs::{File, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, error};

use crate::Result;

const DEFAULT_FILE_NAME: &str = "survey.ndjson";

/// Durable log of accepted survey records, one JSON object per line.
///
/// The file handle is opened once and shared by every request. Appends go
/// through a mutex so each line is written whole and never interleaved.
pub struct RecordLog {
    path: PathBuf,
    file: Mutex<File>,
}

impl RecordLog {
    /// Open (or create) the log. `None` uses [`RecordLog::default_path`].
    pub async fn open(path: Option<PathBuf>) -> Result<Self> {
        let path = path.unwrap_or_else(Self::default_path);

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            tokio::fs::create_dir_all(parent).await?;
        }

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .await?;

        debug!("Opened record log at {}", path.display());

        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    /// Platform data directory location of the log
    pub fn default_path() -> PathBuf {
        if let Some(dirs) = directories::ProjectDirs::from("com", "survey", "survey") {
            dirs.data_dir().join(DEFAULT_FILE_NAME)
        } else {
            PathBuf::from(DEFAULT_FILE_NAME)
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append one record as a single line and sync it to disk.
    ///
    /// On failure the file is cut back to its previous length so no partial
    /// line is left behind.
    pub async fn append(&self, record: &StoredSurveyRecord) -> Result<()> {
        let mut line = serde_json::to_vec(record)?;
        line.push(b'\n');

        let mut file = self.file.lock().await;

        // Flush waits out any write left in flight by a cancelled append, so
        // the length read next is what is actually on disk.
        file.flush().await?;
        let committed_len = file.metadata().await?.len();

        if let Err(e) = write_line(&mut file, &line).await {
            self.roll_back(&mut file, committed_len).await;
            return Err(e.into());
        }

        Ok(())
    }

    /// Cut the file back to `len`, dropping whatever a failed append left.
    async fn roll_back(&self, file: &mut File, len: u64) {
        if let Err(e) = file.set_len(len).await {
            error!(
                "Failed to roll back partial record in {}: {}",
                self.path.display(),
                e
            );
        }
    }
}

async fn write_line(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line).await?;
    file.flush().await?;
    file.sync_data().await
}
