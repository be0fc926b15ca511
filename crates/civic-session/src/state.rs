//! Observable session state
//!
//! Replaces an ambient UI auth context with an explicit object. Observers
//! subscribe and are notified on every change.

use std::sync::Arc;
use tokio::sync::watch;

use crate::user::User;

#[derive(Debug, Clone, PartialEq)]
pub struct AuthSnapshot {
    /// Signed-in user, if any
    pub user: Option<User>,
    /// True until the first profile lookup settles
    pub loading: bool,
}

impl AuthSnapshot {
    pub fn is_signed_in(&self) -> bool {
        self.user.is_some()
    }
}

impl Default for AuthSnapshot {
    fn default() -> Self {
        Self {
            user: None,
            loading: true,
        }
    }
}

#[derive(Debug)]
pub struct SessionState {
    tx: Arc<watch::Sender<AuthSnapshot>>,
}

impl SessionState {
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(AuthSnapshot::default());
        Self { tx: Arc::new(tx) }
    }

    pub fn snapshot(&self) -> AuthSnapshot {
        self.tx.borrow().clone()
    }

    pub fn user(&self) -> Option<User> {
        self.tx.borrow().user.clone()
    }

    /// Receive every subsequent change
    pub fn subscribe(&self) -> watch::Receiver<AuthSnapshot> {
        self.tx.subscribe()
    }

    /// Record the signed-in user and mark loading as settled
    pub fn set_user(&self, user: Option<User>) {
        if let Some(u) = &user {
            tracing::info!(user_id = %u.id, role = u.role.as_str(), "Session signed in");
        }
        self.tx.send_modify(|state| {
            state.user = user;
            state.loading = false;
        });
    }

    pub fn finish_loading(&self) {
        self.tx.send_if_modified(|state| {
            let changed = state.loading;
            state.loading = false;
            changed
        });
    }

    pub fn sign_out(&self) {
        self.tx.send_modify(|state| {
            state.user = None;
            state.loading = false;
        });
        tracing::info!("Session signed out");
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for SessionState {
    fn clone(&self) -> Self {
        Self {
            tx: Arc::clone(&self.tx),
        }
    }
}
