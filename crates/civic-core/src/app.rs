//! Application entry point tying the token slot, session state and API
//! client together

use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use url::Url;

use civic_client::{ApiClient, Category, NewReport, Report, ReportQuery};
use civic_session::{SessionState, TokenStore, User};

use crate::config::Config;
use crate::detail::ReportDetail;
use crate::error::CoreError;
use crate::reports::ReportBrowser;
use crate::Result;

pub struct Civic {
    config: Config,
    tokens: TokenStore,
    session: SessionState,
    client: Arc<ApiClient>,
}

impl Civic {
    pub fn new(config: Config) -> Result<Self> {
        let tokens = TokenStore::new();
        let client = ApiClient::new(config.client_config()?, tokens.clone())?;

        tracing::debug!(api_base = %config.api_base, "Civic client ready");

        Ok(Self {
            config,
            tokens,
            session: SessionState::new(),
            client: Arc::new(client),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    pub fn tokens(&self) -> &TokenStore {
        &self.tokens
    }

    /// Resolve who is signed in. Clears `loading` on the session either way.
    pub async fn initialize(&self) -> Result<Option<User>> {
        match self.client.profile().await {
            Ok(user) => {
                match &user {
                    Some(u) => tracing::info!(user_id = %u.id, "Signed in"),
                    None => tracing::debug!("No active session"),
                }
                self.session.set_user(user.clone());
                Ok(user)
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load profile");
                self.session.set_user(None);
                Err(e.into())
            }
        }
    }

    /// Finish the OAuth redirect: obtain a token from the session cookie and
    /// load the profile. Returns whether a user is now signed in.
    pub async fn complete_login(&self) -> Result<bool> {
        if !self.client.refresh().await {
            tracing::warn!("Login could not be completed");
            self.session.set_user(None);
            return Ok(false);
        }

        Ok(self.initialize().await?.is_some())
    }

    /// Sign out locally even when the backend cannot be reached
    pub async fn logout(&self) {
        if let Err(e) = self.client.logout().await {
            tracing::warn!(error = %e, "Backend logout failed");
        }
        self.session.sign_out();
    }

    pub fn login_url(&self) -> Result<Url> {
        Ok(self.client.login_url()?)
    }

    pub async fn categories(&self) -> Result<Vec<Category>> {
        Ok(self.client.list_categories().await?)
    }

    pub async fn submit_report(&self, report: &NewReport) -> Result<Report> {
        if self.session.user().is_none() {
            return Err(CoreError::PermissionDenied(
                "sign in to submit a report".to_string(),
            ));
        }
        Ok(self.client.create_report(report).await?)
    }

    /// List view model using the configured page size
    pub fn reports(&self) -> ReportBrowser {
        let mut query = ReportQuery::default();
        query.set_limit(self.config.page_size);
        ReportBrowser::new(Arc::clone(&self.client), query)
    }

    /// Reload `browser` at the configured interval until `stop` fires
    pub fn auto_refresh(&self, browser: &ReportBrowser, stop: CancellationToken) -> JoinHandle<()> {
        browser.spawn_auto_refresh(self.config.auto_refresh_interval(), stop)
    }

    pub fn report_detail(&self, id: impl Into<String>) -> ReportDetail {
        ReportDetail::new(Arc::clone(&self.client), self.session.clone(), id)
    }
}
