//! Replay guard — prevents double-spend of a signed authorization.
//!
//! Each authorization is tracked by its [`ReplayKey`] through a two-phase
//! lifecycle:
//!
//! ```text
//!   try_begin            commit
//!  ──────────▶ PENDING ─────────▶ CONSUMED ──(retention expires)──▶ gone
//!                 │ release
//!                 ▼
//!                gone
//! ```
//!
//! `try_begin` is a single atomic check-and-set under one lock — two
//! concurrent requests carrying the same key cannot both pass it, which
//! closes the check-then-mark double-spend race. CONSUMED entries are only
//! written after the bet-collection transfer confirms, so a failed transfer
//! never burns a nonce.
//!
//! Retention is a memory bound, not a security boundary: once a key expires
//! the same nonce is technically replayable while its signature stays live.
//! The cache is additionally size-bounded with oldest-first eviction so
//! long-running processes stay predictable.

use std::collections::{HashMap, VecDeque};
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use flipcore_types::{FlipcoreError, ReplayKey, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// A request holding this key is between `try_begin` and the transfer
    /// outcome. Blocks concurrent use of the same authorization.
    Pending,
    /// The bet-collection transfer confirmed. Irreversible until retention
    /// expires.
    Consumed,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    phase: Phase,
    at: Instant,
}

#[derive(Debug, Default)]
struct GuardInner {
    entries: HashMap<ReplayKey, Entry>,
    /// Insertion order for eviction (front = oldest). May hold stale keys
    /// for entries already released; eviction skips those.
    order: VecDeque<ReplayKey>,
}

/// Tracks which authorizations have been consumed (or are mid-flight).
#[derive(Debug)]
pub struct ReplayGuard {
    inner: Mutex<GuardInner>,
    retention: Duration,
    max_entries: usize,
}

impl ReplayGuard {
    /// Create a guard with the given retention window and capacity.
    ///
    /// # Panics
    /// Panics if `max_entries` is zero.
    #[must_use]
    pub fn new(retention: Duration, max_entries: usize) -> Self {
        assert!(max_entries > 0, "ReplayGuard max_entries must be > 0");
        Self {
            inner: Mutex::new(GuardInner::default()),
            retention,
            max_entries,
        }
    }

    fn lock(&self) -> MutexGuard<'_, GuardInner> {
        self.inner.lock().expect("replay guard lock poisoned")
    }

    /// Whether a live (unexpired) entry exists for this key. Pure
    /// observation for the validator's pre-ledger check; the authoritative
    /// barrier is [`Self::try_begin`].
    #[must_use]
    pub fn has(&self, key: &ReplayKey) -> bool {
        let inner = self.lock();
        inner
            .entries
            .get(key)
            .is_some_and(|e| e.at.elapsed() < self.retention)
    }

    /// Atomically reserve this key for one in-flight request.
    ///
    /// This is the serialization point for concurrent requests sharing a
    /// `(from, nonce)` pair: exactly one caller wins the reservation; every
    /// other caller observes the replay state.
    ///
    /// # Errors
    /// Returns [`FlipcoreError::AuthorizationReplayed`] if the key is
    /// already PENDING or CONSUMED.
    pub fn try_begin(&self, key: &ReplayKey) -> Result<()> {
        let mut inner = self.lock();
        Self::purge_expired(&mut inner, self.retention);

        if inner.entries.contains_key(key) {
            return Err(FlipcoreError::AuthorizationReplayed(key.clone()));
        }

        // Evict oldest while at capacity. Stale order entries (already
        // released keys) are skipped by the failed remove.
        while inner.entries.len() >= self.max_entries {
            let Some(oldest) = inner.order.pop_front() else {
                break;
            };
            inner.entries.remove(&oldest);
        }

        inner.entries.insert(
            key.clone(),
            Entry {
                phase: Phase::Pending,
                at: Instant::now(),
            },
        );
        inner.order.push_back(key.clone());
        Ok(())
    }

    /// Mark a reserved key as consumed. Called exactly once, only after the
    /// bet-collection transfer is confirmed — never before, so a nonce is
    /// never burnt when no funds actually moved.
    pub fn commit(&self, key: &ReplayKey) {
        let mut inner = self.lock();
        match inner.entries.get_mut(key) {
            Some(entry) => {
                entry.phase = Phase::Consumed;
                entry.at = Instant::now();
            }
            None => {
                // Reservation was evicted mid-flight (capacity pressure).
                // Re-insert as consumed so the retention window still holds.
                tracing::warn!(%key, "replay reservation missing at commit; re-inserting");
                inner.entries.insert(
                    key.clone(),
                    Entry {
                        phase: Phase::Consumed,
                        at: Instant::now(),
                    },
                );
                inner.order.push_back(key.clone());
            }
        }
    }

    /// Drop a PENDING reservation after a failed collection transfer. The
    /// nonce was not consumed on the ledger, so the same authorization may
    /// be retried. CONSUMED entries are never released this way.
    pub fn release(&self, key: &ReplayKey) {
        let mut inner = self.lock();
        if inner
            .entries
            .get(key)
            .is_some_and(|e| e.phase == Phase::Pending)
        {
            inner.entries.remove(key);
        }
    }

    /// Number of keys currently tracked (including expired-but-unpurged).
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    fn purge_expired(inner: &mut GuardInner, retention: Duration) {
        let GuardInner { entries, order } = inner;
        entries.retain(|_, e| e.at.elapsed() < retention);
        order.retain(|k| entries.contains_key(k));
    }
}
