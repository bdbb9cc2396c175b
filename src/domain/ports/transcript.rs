//! Transcript sink port.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::TranscriptRecord;

/// Trait for transcript persistence. The core does not depend on the
/// storage medium.
#[async_trait]
pub trait TranscriptSink: Send + Sync {
    /// Persist the record and return an identifier for it (e.g., a path).
    async fn persist(&self, record: &TranscriptRecord) -> DomainResult<String>;
}
