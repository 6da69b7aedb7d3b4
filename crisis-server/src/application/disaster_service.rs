use tracing::{info, warn};

use crate::data::disaster_source::{DisasterSource, UpstreamError};
use crate::domain::disaster::DisasterWindow;
use crate::domain::stats::{DisasterStats, compute_stats};

pub(crate) struct DisasterService<S: DisasterSource> {
    source: S,
    window_size: u32,
}

impl<S: DisasterSource> DisasterService<S> {
    pub(crate) fn new(source: S, window_size: u32) -> Self {
        Self {
            source,
            window_size,
        }
    }

    /// Aggregated snapshot of the most recent window.
    ///
    /// Never fails: when upstream is unavailable the snapshot is computed over
    /// an empty window.
    pub(crate) async fn stats(&self) -> DisasterStats {
        let window = match self.source.fetch_recent(self.window_size).await {
            Ok(window) => window,
            Err(err) => {
                warn!(error = %err, "ReliefWeb unavailable, serving empty stats");
                DisasterWindow::empty()
            }
        };

        info!(
            records = window.records.len(),
            upstream_total = window.total_count,
            "computing disaster stats"
        );
        compute_stats(&window.records)
    }

    pub(crate) async fn search(
        &self,
        params: Vec<(String, String)>,
    ) -> Result<serde_json::Value, UpstreamError> {
        self.source.search_raw(params).await
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use async_trait::async_trait;
    use serde_json::json;

    use super::DisasterService;
    use crate::data::disaster_source::{DisasterSource, UpstreamError};
    use crate::domain::disaster::{DisasterRecord, DisasterWindow};
    use crate::domain::stats::compute_stats;

    #[derive(Clone)]
    struct FakeSource {
        window: Arc<Mutex<Option<DisasterWindow>>>,
        requested_limit: Arc<Mutex<Option<u32>>>,
    }

    impl FakeSource {
        fn failing() -> Self {
            Self {
                window: Arc::new(Mutex::new(None)),
                requested_limit: Arc::new(Mutex::new(None)),
            }
        }

        fn with_window(window: DisasterWindow) -> Self {
            let source = Self::failing();
            *source.window.lock().expect("window mutex poisoned") = Some(window);
            source
        }
    }

    #[async_trait]
    impl DisasterSource for FakeSource {
        async fn fetch_recent(&self, limit: u32) -> Result<DisasterWindow, UpstreamError> {
            *self
                .requested_limit
                .lock()
                .expect("requested_limit mutex poisoned") = Some(limit);
            self.window
                .lock()
                .expect("window mutex poisoned")
                .clone()
                .ok_or(UpstreamError::Status(503))
        }

        async fn search_raw(
            &self,
            params: Vec<(String, String)>,
        ) -> Result<serde_json::Value, UpstreamError> {
            if self.window.lock().expect("window mutex poisoned").is_none() {
                return Err(UpstreamError::Transport("connection refused".to_string()));
            }
            Ok(json!({ "params": params.len() }))
        }
    }

    #[tokio::test]
    async fn stats_falls_back_to_empty_window_on_upstream_failure() {
        let service = DisasterService::new(FakeSource::failing(), 100);

        let stats = service.stats().await;
        assert_eq!(stats, compute_stats(&[]));
        assert_eq!(stats.total, 0);
        assert_eq!(stats.common_type, "N/A");
    }

    #[tokio::test]
    async fn stats_requests_configured_window_size() {
        let window = DisasterWindow {
            records: vec![
                DisasterRecord {
                    category: Some("Flood".to_string()),
                    status: Some("alert".to_string()),
                    ..Default::default()
                },
                DisasterRecord {
                    category: Some("Drought".to_string()),
                    status: Some("past".to_string()),
                    ..Default::default()
                },
            ],
            total_count: 4000,
        };
        let source = FakeSource::with_window(window);
        let service = DisasterService::new(source.clone(), 50);

        let stats = service.stats().await;
        assert_eq!(stats.total, 2);
        assert_eq!(stats.active_count, 1);
        assert_eq!(
            *source
                .requested_limit
                .lock()
                .expect("requested_limit mutex poisoned"),
            Some(50)
        );
    }

    #[tokio::test]
    async fn search_propagates_upstream_errors() {
        let service = DisasterService::new(FakeSource::failing(), 100);

        let err = service
            .search(vec![("limit".to_string(), "5".to_string())])
            .await
            .expect_err("search must fail");
        assert!(matches!(err, UpstreamError::Transport(_)));
    }
}
