//! Civic Session
//!
//! Client-side session state for the civic reports backend:
//! - A single in-memory slot for the short-lived access token
//! - The signed-in user, observable through subscribe/notify
//!
//! Nothing here is persisted. The long-lived refresh credential is an HTTP
//! cookie owned by the transport, not by this crate.

mod state;
mod token;
mod user;

pub use state::{AuthSnapshot, SessionState};
pub use token::{AccessToken, TokenStore, ACCESS_TOKEN_KEY};
pub use user::{Role, User};
