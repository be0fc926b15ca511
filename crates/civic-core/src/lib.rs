//! Civic Core
//!
//! Application layer for the civic reports client. Owns the token slot, the
//! session state and the API client, and exposes view models for the report
//! list and report detail screens. Rendering is left to the caller.

mod app;
mod config;
mod detail;
mod error;
mod reports;

pub use app::Civic;
pub use config::Config;
pub use detail::ReportDetail;
pub use error::CoreError;
pub use reports::{ListState, ReportBrowser};

// Re-export core components
pub use civic_client::{
    can_modify_comment, can_modify_report, ApiClient, ApiRequest, Category, ClientConfig,
    ClientError, Comment, ErrorKind, FetchTicket, LatestFetch, Location, NewComment, NewReport,
    PageMeta, Paginated, Photo, Report, ReportQuery, SortOrder,
};
pub use civic_session::{AccessToken, AuthSnapshot, Role, SessionState, TokenStore, User};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt().with_env_filter(filter).with_target(true).init();
}
