//! Latest-only fetches
//!
//! A view issues a fetch through `LatestFetch::begin`, which cancels whatever
//! fetch that view still had in flight. A ticket's result may only be applied
//! through `FetchTicket::commit`, which checks under the slot lock that no
//! newer fetch has started since. Dropping a ticket that is still current
//! retires it, so an abandoned fetch never stays pending.

use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::ClientError;
use crate::Result;

#[derive(Debug, Default)]
struct Slot {
    seq: u64,
    active: Option<u64>,
    cancel: Option<CancellationToken>,
}

#[derive(Debug, Default)]
pub struct LatestFetch {
    slot: Arc<Mutex<Slot>>,
}

impl LatestFetch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start a new fetch, superseding the previous one
    pub fn begin(&self) -> FetchTicket {
        let mut slot = self.slot.lock();

        if let Some(previous) = slot.cancel.take() {
            previous.cancel();
            tracing::debug!(fetch_id = ?slot.active, "Cancelled superseded fetch");
        }

        slot.seq = slot.seq.wrapping_add(1);
        let id = slot.seq;
        let cancel = CancellationToken::new();
        slot.active = Some(id);
        slot.cancel = Some(cancel.clone());

        FetchTicket {
            id,
            cancel,
            slot: Arc::clone(&self.slot),
        }
    }

    /// Cancel the in-flight fetch without starting another
    pub fn cancel(&self) {
        let mut slot = self.slot.lock();
        if let Some(cancel) = slot.cancel.take() {
            cancel.cancel();
        }
        slot.active = None;
    }

    pub fn is_pending(&self) -> bool {
        self.slot.lock().active.is_some()
    }
}

impl Clone for LatestFetch {
    fn clone(&self) -> Self {
        Self {
            slot: Arc::clone(&self.slot),
        }
    }
}

#[derive(Debug)]
pub struct FetchTicket {
    id: u64,
    cancel: CancellationToken,
    slot: Arc<Mutex<Slot>>,
}

impl FetchTicket {
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn is_current(&self) -> bool {
        self.slot.lock().active == Some(self.id)
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Drive `fut` until it completes or this ticket is superseded.
    ///
    /// A superseded fetch yields `ClientError::Cancelled` and the future is
    /// dropped, aborting its network I/O.
    pub async fn run<T, F>(&self, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        tokio::select! {
            biased;
            _ = self.cancel.cancelled() => Err(ClientError::Cancelled),
            result = fut => {
                if self.cancel.is_cancelled() {
                    Err(ClientError::Cancelled)
                } else {
                    result
                }
            }
        }
    }

    /// Apply a result if this is still the latest fetch, then retire it.
    ///
    /// Returns `None` and leaves state alone when a newer fetch exists.
    pub fn commit<R>(&self, apply: impl FnOnce() -> R) -> Option<R> {
        let mut slot = self.slot.lock();
        if slot.active != Some(self.id) {
            tracing::debug!(fetch_id = self.id, "Dropped result of superseded fetch");
            return None;
        }

        slot.active = None;
        slot.cancel = None;
        Some(apply())
    }
}

impl Drop for FetchTicket {
    fn drop(&mut self) {
        let mut slot = self.slot.lock();
        if slot.active == Some(self.id) {
            tracing::debug!(fetch_id = self.id, "Abandoned fetch retired");
            slot.active = None;
            slot.cancel = None;
        }
    }
}
