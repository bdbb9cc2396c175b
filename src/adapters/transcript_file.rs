//! JSON file transcript sink.

use std::path::PathBuf;

use async_trait::async_trait;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{TranscriptConfig, TranscriptRecord};
use crate::domain::ports::TranscriptSink;

/// Writes each transcript as pretty-printed JSON into the configured
/// directory, named `<prefix><timestamp><suffix>`.
pub struct JsonFileTranscriptSink {
    config: TranscriptConfig,
}

impl JsonFileTranscriptSink {
    pub fn new(config: TranscriptConfig) -> Self {
        Self { config }
    }

    fn path_for(&self, record: &TranscriptRecord) -> PathBuf {
        PathBuf::from(&self.config.dir).join(format!(
            "{}{}{}",
            self.config.filename_prefix, record.timestamp, self.config.filename_suffix
        ))
    }
}

#[async_trait]
impl TranscriptSink for JsonFileTranscriptSink {
    async fn persist(&self, record: &TranscriptRecord) -> DomainResult<String> {
        let path = self.path_for(record);
        let serialized = serde_json::to_string_pretty(record)?;

        tokio::fs::create_dir_all(&self.config.dir)
            .await
            .map_err(|e| DomainError::Transcript(format!("creating {}: {e}", self.config.dir)))?;
        tokio::fs::write(&path, serialized)
            .await
            .map_err(|e| DomainError::Transcript(format!("writing {}: {e}", path.display())))?;

        Ok(path.display().to_string())
    }
}
