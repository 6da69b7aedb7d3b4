use async_trait::async_trait;
use thiserror::Error;

use crate::domain::disaster::DisasterWindow;

#[derive(Debug, Error)]
pub(crate) enum UpstreamError {
    #[error("upstream transport failed: {0}")]
    Transport(String),

    #[error("upstream responded with status {0}")]
    Status(u16),

    #[error("upstream payload could not be decoded: {0}")]
    Decode(String),
}

/// Source of upstream disaster records.
#[async_trait]
pub(crate) trait DisasterSource: Send + Sync {
    /// Fetches the `limit` most recent records, newest first.
    async fn fetch_recent(&self, limit: u32) -> Result<DisasterWindow, UpstreamError>;

    /// Forwards arbitrary query parameters and returns the upstream body untouched.
    async fn search_raw(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<serde_json::Value, UpstreamError>;
}
