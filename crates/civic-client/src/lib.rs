//! Civic Client
//!
//! Session-aware access to the civic reports REST API:
//! - Bearer token attached to every call when one is held
//! - One transparent refresh-and-retry when the backend answers 401
//! - Superseded list fetches are cancelled, their results dropped
//! - Typed wrappers for reports, comments, categories and profile

mod client;
mod config;
mod endpoints;
mod error;
mod fetch;
mod models;
mod permissions;
mod query;
mod request;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use endpoints::{NewComment, NewReport};
pub use error::{ClientError, ErrorKind};
pub use fetch::{FetchTicket, LatestFetch};
pub use models::{Category, Comment, Location, PageMeta, Paginated, Photo, Report};
pub use permissions::{can_modify_comment, can_modify_report};
pub use query::{ReportQuery, SortOrder, DEFAULT_LIMIT, PAGE_SIZES};
pub use request::{ApiRequest, FilePart, MultipartForm, RequestBody};

pub type Result<T> = std::result::Result<T, ClientError>;
