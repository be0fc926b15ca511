//! Report list view model
//!
//! Holds the list query and what the list currently shows. Loads are
//! latest-only: starting a load cancels the previous one, and a result is
//! only shown if no newer load began while it was in flight.

use parking_lot::RwLock;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use civic_client::{ApiClient, ClientError, LatestFetch, PageMeta, Report, ReportQuery, SortOrder};

use crate::Result;

#[derive(Debug, Clone, Default)]
pub struct ListState {
    pub reports: Vec<Report>,
    pub meta: Option<PageMeta>,
    /// A load is in flight
    pub loading: bool,
    /// Message of the last failed load
    pub error: Option<String>,
}

pub struct ReportBrowser {
    client: Arc<ApiClient>,
    query: Arc<RwLock<ReportQuery>>,
    state: Arc<RwLock<ListState>>,
    fetch: LatestFetch,
}

impl ReportBrowser {
    pub fn new(client: Arc<ApiClient>, query: ReportQuery) -> Self {
        Self {
            client,
            query: Arc::new(RwLock::new(query)),
            state: Arc::new(RwLock::new(ListState::default())),
            fetch: LatestFetch::new(),
        }
    }

    pub fn query(&self) -> ReportQuery {
        self.query.read().clone()
    }

    /// What the list shows right now
    pub fn state(&self) -> ListState {
        let mut state = self.state.read().clone();
        state.loading = self.fetch.is_pending();
        state
    }

    /// Fetch the current query, superseding any load still in flight.
    ///
    /// A superseded load returns `Ok(())` without touching the list.
    pub async fn load(&self) -> Result<()> {
        let query = self.query();
        let ticket = self.fetch.begin();

        tracing::debug!(fetch_id = ticket.id(), page = query.page, "Loading reports");

        let result = ticket.run(self.client.list_reports(&query)).await;
        if matches!(result, Err(ClientError::Cancelled)) {
            return Ok(());
        }

        let applied = ticket.commit(|| {
            let mut state = self.state.write();
            match &result {
                Ok(page) => {
                    state.reports = page.data.clone();
                    state.meta = page.meta.clone();
                    state.error = None;
                }
                Err(e) => {
                    state.reports.clear();
                    state.meta = None;
                    state.error = Some(e.to_string());
                }
            }
        });

        if applied.is_none() {
            return Ok(());
        }

        match result {
            Ok(page) => {
                tracing::debug!(count = page.data.len(), "Loaded reports");
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load reports");
                Err(e.into())
            }
        }
    }

    /// Stop any load in flight; its result will be dropped
    pub fn cancel(&self) {
        self.fetch.cancel();
    }

    pub fn set_page(&self, page: u32) {
        self.query.write().set_page(page);
    }

    /// Move forward unless on the last known page
    pub fn next_page(&self) -> bool {
        let page_count = self.state.read().meta.as_ref().and_then(PageMeta::page_count);
        self.query.write().next_page(page_count)
    }

    pub fn prev_page(&self) -> bool {
        self.query.write().prev_page()
    }

    pub fn set_limit(&self, limit: u32) {
        self.query.write().set_limit(limit);
    }

    pub fn set_sort(&self, sort: SortOrder) {
        self.query.write().set_sort(sort);
    }

    pub fn set_category(&self, category: Option<&str>) {
        self.query.write().set_category(category);
    }

    /// Drop a report from the visible list after it was deleted elsewhere
    pub fn remove_report(&self, id: &str) {
        self.state.write().reports.retain(|r| r.id != id);
    }

    pub async fn delete_report(&self, id: &str) -> Result<()> {
        self.client.delete_report(id).await?;
        self.remove_report(id);
        Ok(())
    }

    /// Reload every `every` until `stop` fires
    pub fn spawn_auto_refresh(&self, every: Duration, stop: CancellationToken) -> JoinHandle<()> {
        let browser = self.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            // The first tick completes immediately; the caller did the initial load.
            ticker.tick().await;

            loop {
                tokio::select! {
                    _ = stop.cancelled() => break,
                    _ = ticker.tick() => {
                        if let Err(e) = browser.load().await {
                            tracing::warn!(error = %e, "Auto refresh failed");
                        }
                    }
                }
            }

            tracing::debug!("Auto refresh stopped");
        })
    }
}

impl Clone for ReportBrowser {
    fn clone(&self) -> Self {
        Self {
            client: Arc::clone(&self.client),
            query: Arc::clone(&self.query),
            state: Arc::clone(&self.state),
            fetch: self.fetch.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use civic_client::ClientConfig;
    use civic_session::TokenStore;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn browser_for(server: &MockServer) -> ReportBrowser {
        let config = ClientConfig::new(&server.uri()).unwrap();
        let client = ApiClient::new(config, TokenStore::new()).unwrap();
        ReportBrowser::new(Arc::new(client), ReportQuery::default())
    }

    fn page_of(id: &str, pages: u32) -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "data": [{ "_id": id, "title": id }],
            "meta": { "page": 1, "pages": pages }
        }))
    }

    #[tokio::test]
    async fn test_load_updates_state() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(page_of("r1", 3))
            .mount(&server)
            .await;

        let browser = browser_for(&server);
        browser.load().await.unwrap();

        let state = browser.state();
        assert!(!state.loading);
        assert_eq!(state.reports[0].id, "r1");
        assert_eq!(state.meta.unwrap().pages, Some(3));

        assert!(browser.next_page());
        assert_eq!(browser.query().page, 2);
    }

    #[tokio::test]
    async fn test_only_latest_load_is_shown() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .and(query_param("page", "1"))
            .respond_with(page_of("stale", 2).set_delay(Duration::from_millis(400)))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .and(query_param("page", "2"))
            .respond_with(page_of("fresh", 2))
            .mount(&server)
            .await;

        let browser = browser_for(&server);

        let first = {
            let browser = browser.clone();
            tokio::spawn(async move { browser.load().await })
        };
        tokio::time::sleep(Duration::from_millis(50)).await;

        browser.set_page(2);
        browser.load().await.unwrap();
        first.await.unwrap().unwrap();

        // Give the delayed response time to arrive.
        tokio::time::sleep(Duration::from_millis(500)).await;

        let state = browser.state();
        assert_eq!(state.reports.len(), 1);
        assert_eq!(state.reports[0].id, "fresh");
        assert!(!state.loading);
    }

    #[tokio::test]
    async fn test_abandoned_load_stops_loading() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(page_of("slow", 1).set_delay(Duration::from_millis(300)))
            .mount(&server)
            .await;

        let browser = browser_for(&server);
        let timed_out = tokio::time::timeout(Duration::from_millis(50), browser.load()).await;
        assert!(timed_out.is_err());

        let state = browser.state();
        assert!(!state.loading);
        assert!(state.reports.is_empty());
    }

    #[tokio::test]
    async fn test_failed_load_empties_list() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .and(query_param("page", "1"))
            .respond_with(page_of("r1", 2))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .and(query_param("page", "2"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let browser = browser_for(&server);
        browser.load().await.unwrap();
        assert_eq!(browser.state().reports.len(), 1);

        browser.set_page(2);
        let err = browser.load().await.unwrap_err();
        assert!(!err.is_cancelled());

        let state = browser.state();
        assert!(state.reports.is_empty());
        assert!(state.meta.is_none());
        assert!(state.error.unwrap().contains("503"));
    }

    #[tokio::test]
    async fn test_query_changes_reset_page() {
        let server = MockServer::start().await;
        let browser = browser_for(&server);

        browser.set_page(3);
        browser.set_sort(SortOrder::Oldest);
        assert_eq!(browser.query().page, 1);

        browser.set_page(3);
        browser.set_category(Some("roads"));
        let query = browser.query();
        assert_eq!(query.page, 1);
        assert_eq!(query.category.as_deref(), Some("roads"));

        assert!(!browser.prev_page());
    }

    #[tokio::test]
    async fn test_delete_removes_locally() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(page_of("r1", 1))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/reports/r1"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let browser = browser_for(&server);
        browser.load().await.unwrap();
        browser.delete_report("r1").await.unwrap();
        assert!(browser.state().reports.is_empty());
    }

    #[tokio::test]
    async fn test_auto_refresh_reloads_until_stopped() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/reports"))
            .respond_with(page_of("r1", 1))
            .mount(&server)
            .await;

        let browser = browser_for(&server);
        let stop = CancellationToken::new();
        let handle = browser.spawn_auto_refresh(Duration::from_millis(40), stop.clone());

        tokio::time::sleep(Duration::from_millis(200)).await;
        stop.cancel();
        handle.await.unwrap();

        let seen = server.received_requests().await.unwrap().len();
        assert!(seen >= 2, "expected repeated loads, saw {seen}");

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert_eq!(server.received_requests().await.unwrap().len(), seen);
    }
}
