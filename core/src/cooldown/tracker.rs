//! Per-subject cooldown tracker
//!
//! Maps each subject to the instant its cooldown ends. Entries are sharded by
//! `DashMap`, so every operation locks only the shard holding its key; subjects in
//! different shards never contend and no lock spans more than one call.

use std::sync::Arc;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use crate::scheduler::Scheduler;
use crate::subject::SubjectId;

/// Upper bound for a single cooldown, keeps `Instant` arithmetic from overflowing.
pub const MAX_COOLDOWN: Duration = Duration::from_secs(60 * 60 * 24 * 365);

/// Whole seconds left, rounded up. Any nonzero remainder counts as a full second.
fn ceil_secs(remaining: Duration) -> u64 {
    remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0)
}

fn expiry(now: Instant, duration: Duration) -> Instant {
    now + duration.min(MAX_COOLDOWN)
}

#[derive(Debug, Default)]
pub struct CooldownTracker {
    entries: DashMap<SubjectId, Instant>,
}

impl CooldownTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// True while `subject` has a live cooldown.
    ///
    /// An entry whose expiry has passed is removed here, under the same shard lock as
    /// the check, so only one caller ever observes it.
    pub fn is_blocked(&self, subject: SubjectId, now: Instant) -> bool {
        self.blocked_for(subject, now).is_some()
    }

    /// Like [`is_blocked`](Self::is_blocked), but reports the remaining whole seconds
    /// taken from the same atomic observation.
    pub fn blocked_for(&self, subject: SubjectId, now: Instant) -> Option<u64> {
        match self.entries.entry(subject) {
            Entry::Occupied(entry) => {
                let expires_at = *entry.get();
                if now >= expires_at {
                    entry.remove();
                    tracing::trace!(%subject, "cooldown expired, entry removed");
                    None
                } else {
                    Some(ceil_secs(expires_at - now))
                }
            }
            Entry::Vacant(_) => None,
        }
    }

    /// Install or extend the cooldown for `subject` and return the resulting expiry.
    ///
    /// The later of the existing and the new expiry wins; re-arming never shortens a
    /// cooldown. Compare and update happen under one shard lock.
    pub fn arm(&self, subject: SubjectId, now: Instant, duration: Duration) -> Instant {
        let candidate = expiry(now, duration);
        let mut slot = self.entries.entry(subject).or_insert(candidate);
        if candidate > *slot {
            *slot = candidate;
        }
        *slot
    }

    /// Check and arm in one step: arms and returns the new expiry when `subject` is not
    /// blocked, otherwise leaves the live entry alone and returns the remaining whole
    /// seconds. Of several concurrent callers for one subject, exactly one gets `Ok`.
    pub fn try_arm(
        &self,
        subject: SubjectId,
        now: Instant,
        duration: Duration,
    ) -> Result<Instant, u64> {
        let candidate = expiry(now, duration);
        match self.entries.entry(subject) {
            Entry::Occupied(mut entry) => {
                let expires_at = *entry.get();
                if now < expires_at {
                    return Err(ceil_secs(expires_at - now));
                }
                entry.insert(candidate);
                Ok(candidate)
            }
            Entry::Vacant(entry) => {
                entry.insert(candidate);
                Ok(candidate)
            }
        }
    }

    /// Remove the entry for `subject`. Returns whether one existed.
    pub fn disarm(&self, subject: SubjectId) -> bool {
        self.entries.remove(&subject).is_some()
    }

    /// Remove the entry only if it still expires at `expected`. A later re-arm that
    /// moved the expiry leaves the entry in place.
    pub fn disarm_if(&self, subject: SubjectId, expected: Instant) -> bool {
        self.entries
            .remove_if(&subject, |_, expires_at| *expires_at == expected)
            .is_some()
    }

    /// Remaining whole seconds (rounded up) of a live cooldown. Read-only: an expired
    /// entry is reported as absent but left for [`is_blocked`](Self::is_blocked) to
    /// clean up.
    pub fn remaining_secs(&self, subject: SubjectId, now: Instant) -> Option<u64> {
        let expires_at = *self.entries.get(&subject)?;
        (now < expires_at).then(|| ceil_secs(expires_at - now))
    }

    /// Raw expiry for `subject`, live or not.
    pub fn expires_at(&self, subject: SubjectId) -> Option<Instant> {
        self.entries.get(&subject).map(|e| *e)
    }

    /// Number of stored entries, including expired ones not yet cleaned up.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ask `scheduler` to drop the entry at `expires_at` if nothing re-armed it since.
    ///
    /// The task holds only a weak reference, so a dropped tracker is not kept alive by
    /// pending timers.
    pub fn schedule_expiry(
        self: &Arc<Self>,
        scheduler: &dyn Scheduler,
        subject: SubjectId,
        expires_at: Instant,
        now: Instant,
    ) {
        let tracker = Arc::downgrade(self);
        let delay = expires_at.saturating_duration_since(now);
        scheduler.after(
            delay,
            Box::new(move || {
                if let Some(tracker) = tracker.upgrade() {
                    if tracker.disarm_if(subject, expires_at) {
                        tracing::trace!(%subject, "scheduled cooldown removal");
                    }
                }
            }),
        );
    }
}
