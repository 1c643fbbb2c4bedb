//! Balance Tracking
//!
//! Owns the balance state for the currently bound account and refreshes it
//! against the ledger, on demand and on an optional fixed interval.
//!
//! # State Machine
//!
//! ```text
//! Unknown → Loading → {Ready, Errored}
//!               ↑__________|
//! ```
//!
//! `Ready` and `Errored` both re-enter `Loading` on the next refresh. A
//! failed refresh records the error but keeps the previous amount.
//!
//! # Concurrency
//!
//! Concurrent refreshes are not serialized; each is an independent
//! read-only query and the last write wins. Every in-flight request carries
//! the epoch it was issued under. Rebinding to a new account (identity
//! change) bumps the epoch, so a late-arriving result for a superseded
//! account is discarded instead of overwriting the new account's state.
//!
//! The periodic refresh is an explicitly owned task handle: aborted on
//! [`BalanceTracker::stop_auto_refresh`], on [`BalanceTracker::clear`], and
//! on drop. The task holds only a weak reference to the tracker state.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

use crate::account_id::AccountIdentifier;
use crate::ledger::LedgerService;

// ============================================================================
// State
// ============================================================================

/// Freshness of the tracked balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BalanceStatus {
    /// No refresh has completed for the bound account yet.
    Unknown,
    /// A refresh is in flight.
    Loading,
    /// The amount reflects the last successful refresh.
    Ready,
    /// The last refresh failed; the amount is the last known good value.
    Errored,
}

/// Snapshot of the tracked balance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BalanceState {
    pub e8s: u64,
    pub status: BalanceStatus,
    pub last_error: Option<String>,
}

impl Default for BalanceState {
    fn default() -> Self {
        Self {
            e8s: 0,
            status: BalanceStatus::Unknown,
            last_error: None,
        }
    }
}

struct TrackerInner {
    account: Option<AccountIdentifier>,
    /// Bumped on every bind/clear; in-flight results from an older epoch
    /// are discarded on arrival.
    epoch: u64,
    state: BalanceState,
    /// Last account the initial refresh fired for. Re-binding the same
    /// account must not re-fire it.
    initialized_for: Option<AccountIdentifier>,
}

// ============================================================================
// Tracker
// ============================================================================

/// Per-identity balance tracker.
///
/// Exactly one tracker owns the balance state of an account; other
/// components only request refreshes, they never write the state.
pub struct BalanceTracker {
    ledger: Arc<dyn LedgerService>,
    inner: Arc<RwLock<TrackerInner>>,
    auto: Mutex<Option<JoinHandle<()>>>,
}

impl BalanceTracker {
    pub fn new(ledger: Arc<dyn LedgerService>) -> Self {
        Self {
            ledger,
            inner: Arc::new(RwLock::new(TrackerInner {
                account: None,
                epoch: 0,
                state: BalanceState::default(),
                initialized_for: None,
            })),
            auto: Mutex::new(None),
        }
    }

    /// Bind the tracker to a newly derived account.
    ///
    /// Called on identity change: resets the state (not merely stale),
    /// bumps the request epoch, and fires the initial refresh exactly once
    /// per newly bound account. Re-binding the currently bound account is a
    /// no-op, so caller-side reconstructions do not re-fire the initial
    /// load. The initial refresh is spawned, not awaited.
    pub async fn bind(&self, account: AccountIdentifier) {
        let fire = {
            let mut inner = self.inner.write().await;
            if inner.account == Some(account) {
                false
            } else {
                inner.account = Some(account);
                inner.epoch += 1;
                inner.state = BalanceState::default();
                let already = inner.initialized_for == Some(account);
                inner.initialized_for = Some(account);
                !already
            }
        };
        if fire {
            let ledger = Arc::clone(&self.ledger);
            let inner = Arc::clone(&self.inner);
            tokio::spawn(async move { Self::refresh_inner(&*ledger, &inner).await });
        }
    }

    /// Unbind on identity clear: stops the periodic refresh, bumps the
    /// epoch so in-flight results are discarded, and resets the state.
    pub async fn clear(&self) {
        self.stop_auto_refresh();
        let mut inner = self.inner.write().await;
        inner.account = None;
        inner.epoch += 1;
        inner.state = BalanceState::default();
        inner.initialized_for = None;
    }

    /// Refresh the balance once.
    ///
    /// On success stores the returned amount and clears any prior error;
    /// on failure records the error and keeps the previous amount.
    pub async fn refresh(&self) {
        Self::refresh_inner(&*self.ledger, &self.inner).await;
    }

    async fn refresh_inner(ledger: &dyn LedgerService, inner: &RwLock<TrackerInner>) {
        let (account, epoch) = {
            let mut guard = inner.write().await;
            let Some(account) = guard.account else {
                guard.state.last_error = Some("no account bound".to_string());
                return;
            };
            guard.state.status = BalanceStatus::Loading;
            guard.state.last_error = None;
            (account, guard.epoch)
        };

        let result = ledger.account_balance(&account).await;

        let mut guard = inner.write().await;
        if guard.epoch != epoch {
            debug!("discarding balance result for superseded account {}", account);
            return;
        }
        match result {
            Ok(tokens) => {
                guard.state.e8s = tokens.e8s;
                guard.state.status = BalanceStatus::Ready;
                guard.state.last_error = None;
            }
            Err(e) => {
                warn!("balance refresh failed for {}: {}", account, e);
                guard.state.status = BalanceStatus::Errored;
                guard.state.last_error = Some(e.to_string());
            }
        }
    }

    /// Start refreshing on a fixed interval.
    ///
    /// The interval's immediate first tick is swallowed; the initial load
    /// is [`bind`](Self::bind)'s job. Restarting replaces the previous
    /// timer.
    pub fn start_auto_refresh(&self, every: Duration) {
        self.stop_auto_refresh();
        let ledger = Arc::clone(&self.ledger);
        let weak = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            let mut tick = tokio::time::interval(every);
            tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
            tick.tick().await;
            loop {
                tick.tick().await;
                match weak.upgrade() {
                    Some(inner) => Self::refresh_inner(&*ledger, &inner).await,
                    None => break,
                }
            }
        });
        *self
            .auto
            .lock()
            .expect("auto-refresh handle lock poisoned") = Some(handle);
    }

    /// Cancel the periodic refresh, if running.
    pub fn stop_auto_refresh(&self) {
        if let Some(handle) = self
            .auto
            .lock()
            .expect("auto-refresh handle lock poisoned")
            .take()
        {
            handle.abort();
        }
    }

    /// Current snapshot of the balance state.
    pub async fn state(&self) -> BalanceState {
        self.inner.read().await.state.clone()
    }

    /// Currently bound account, if any.
    pub async fn account(&self) -> Option<AccountIdentifier> {
        self.inner.read().await.account
    }
}

impl Drop for BalanceTracker {
    fn drop(&mut self) {
        self.stop_auto_refresh();
    }
}

// ============================================================================
// Unit Tests
// ============================================================================
