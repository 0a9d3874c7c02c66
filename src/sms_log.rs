use crate::error::ServerError;
use crate::log_entry::LogLine;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// Append-only text log of received messages.
///
/// All access goes through one async mutex, so concurrent appends land as
/// whole lines and readers never see a half-written one. The file is opened
/// per call and never kept open between requests.
pub struct SmsLog {
    path: PathBuf,
    lock: Mutex<()>,
}

impl SmsLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn append(&self, line: &LogLine) -> Result<(), ServerError> {
        let mut record = line.to_string();
        record.push('\n');

        let _guard = self.lock.lock().await;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .map_err(|e| ServerError::io(&self.path, e))?;

        file.write_all(record.as_bytes())
            .await
            .map_err(|e| ServerError::io(&self.path, e))?;
        file.flush()
            .await
            .map_err(|e| ServerError::io(&self.path, e))?;

        Ok(())
    }

    /// Whole log as text, or an empty string if nothing was logged yet.
    pub async fn read_all(&self) -> Result<String, ServerError> {
        let _guard = self.lock.lock().await;

        match fs::read(&self.path).await {
            Ok(bytes) => Ok(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(ServerError::io(&self.path, e)),
        }
    }
}
