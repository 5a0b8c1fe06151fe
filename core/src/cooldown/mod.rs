//! Cooldown gate
//!
//! A per-subject time-to-live map with three guarantees:
//! - **Atomic per key**: check, arm and disarm each run under a single shard lock
//! - **Monotonic extend**: re-arming keeps the later of the two expiries
//! - **Self-cleaning**: expired entries vanish on the next check, or earlier when a
//!   scheduled compare-and-remove fires
//!
//! ```text
//!   arm(S, t0, D) ──► [S → t0+D] ──is_blocked(S, t ≥ t0+D)──► removed
//!                          │
//!                          └──schedule_expiry──► disarm_if(S, t0+D) at t0+D
//! ```

pub mod tracker;

#[cfg(test)]
mod tracker_tests;

pub use tracker::{CooldownTracker, MAX_COOLDOWN};
