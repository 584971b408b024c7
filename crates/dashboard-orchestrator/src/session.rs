use crate::{DashboardOrchestrator, DashboardRequest, DashboardSnapshot};
use std::sync::Arc;
use tokio::task::JoinHandle;

/// One user's dashboard: the latest request and the snapshot it produced.
///
/// Submitting a new request aborts the load still in flight. Each load is
/// tagged with the generation it was submitted under, and a result whose
/// generation is no longer current is dropped instead of displayed.
pub struct DashboardSession {
    orchestrator: Arc<DashboardOrchestrator>,
    generation: u64,
    in_flight: Option<JoinHandle<(u64, DashboardSnapshot)>>,
    latest: Option<DashboardSnapshot>,
}

impl DashboardSession {
    pub fn new(orchestrator: Arc<DashboardOrchestrator>) -> Self {
        Self {
            orchestrator,
            generation: 0,
            in_flight: None,
            latest: None,
        }
    }

    /// Start loading `request`, superseding any pending load. Returns the
    /// generation assigned to it.
    pub fn submit(&mut self, request: DashboardRequest) -> u64 {
        if let Some(previous) = self.in_flight.take() {
            previous.abort();
            tracing::debug!("Aborted dashboard load for generation {}", self.generation);
        }

        self.generation += 1;
        let generation = self.generation;
        let orchestrator = self.orchestrator.clone();

        self.in_flight = Some(tokio::spawn(async move {
            (generation, orchestrator.load(request).await)
        }));

        generation
    }

    /// Wait for the pending load, if any, and return the current snapshot.
    pub async fn wait(&mut self) -> Option<&DashboardSnapshot> {
        if let Some(handle) = self.in_flight.take() {
            match handle.await {
                Ok((generation, snapshot)) if generation == self.generation => {
                    self.latest = Some(snapshot);
                }
                Ok((generation, snapshot)) => {
                    tracing::debug!(
                        "Discarding stale dashboard for {} (generation {}, current {})",
                        snapshot.symbol,
                        generation,
                        self.generation
                    );
                }
                Err(e) if e.is_cancelled() => {}
                Err(e) => tracing::error!("Dashboard load task failed: {}", e),
            }
        }
        self.latest.as_ref()
    }

    pub fn latest(&self) -> Option<&DashboardSnapshot> {
        self.latest.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_loading(&self) -> bool {
        self.in_flight.as_ref().map_or(false, |h| !h.is_finished())
    }
}

impl Drop for DashboardSession {
    fn drop(&mut self) {
        if let Some(handle) = self.in_flight.take() {
            handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{client_for, config, FakeProvider};
    use dashboard_core::Symbol;
    use std::sync::atomic::Ordering;
    use std::time::Duration;

    fn request(symbol: &str) -> DashboardRequest {
        DashboardRequest::new(Symbol::parse(symbol).unwrap())
    }

    #[tokio::test]
    async fn test_new_request_supersedes_pending() {
        let fake = Arc::new(FakeProvider {
            slow_symbol: Some(("AAPL".to_string(), Duration::from_millis(500))),
            ..Default::default()
        });
        let orchestrator = Arc::new(DashboardOrchestrator::with_client(
            client_for(fake.clone()),
            &config(3600),
        ));
        let mut session = DashboardSession::new(orchestrator.clone());

        assert_eq!(session.submit(request("AAPL")), 1);
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert_eq!(session.submit(request("MSFT")), 2);

        let shown = session.wait().await.unwrap();
        assert_eq!(shown.symbol.as_str(), "MSFT");
        assert_eq!(session.generation(), 2);
        assert!(!session.is_loading());

        // The aborted AAPL load never finished or reached the cache.
        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(fake.completed.load(Ordering::SeqCst), 7);
        assert_eq!(orchestrator.cached_entries(), 7);
    }

    #[tokio::test]
    async fn test_wait_without_request() {
        let fake = Arc::new(FakeProvider::default());
        let orchestrator =
            Arc::new(DashboardOrchestrator::with_client(client_for(fake), &config(3600)));
        let mut session = DashboardSession::new(orchestrator);

        assert!(session.wait().await.is_none());
        assert_eq!(session.generation(), 0);

        session.submit(request("IBM"));
        assert_eq!(session.wait().await.map(|s| s.symbol.as_str()), Some("IBM"));
        assert_eq!(session.latest().map(|s| s.symbol.as_str()), Some("IBM"));
    }
}
