//! Tests for the cooldown tracker
//!
//! Covers expiry boundaries, monotonic extension under contention, and the split
//! between the cleaning check and the read-only remaining-time query.

use std::sync::{Arc, Barrier};
use std::thread;
use std::time::Duration;

use super::tracker::{CooldownTracker, MAX_COOLDOWN};
use crate::clock::{Clock, ManualClock};
use crate::scheduler::ManualScheduler;
use crate::subject::SubjectId;

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

// ─────────────────────────────────────────────────────────────────────────────
// Expiry boundaries
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_blocked_until_exact_expiry() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    for duration_ms in [1u64, 1_000, 30_000] {
        let t0 = clock.at(1_000);
        tracker.arm(s, t0, Duration::from_millis(duration_ms));

        assert!(
            tracker.is_blocked(s, clock.at(1_000 + duration_ms - 1)),
            "should be blocked 1ms before expiry (D={duration_ms})"
        );
        assert!(
            !tracker.is_blocked(s, clock.at(1_000 + duration_ms)),
            "should be free at expiry (D={duration_ms})"
        );
    }
}

#[test]
fn test_expired_entry_is_removed_by_check() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), secs(5));
    assert_eq!(tracker.len(), 1);

    assert!(!tracker.is_blocked(s, clock.at(5_000)));
    assert!(tracker.is_empty(), "lazy cleanup should drop the stale entry");
    assert_eq!(tracker.expires_at(s), None);
}

#[test]
fn test_concurrent_checks_on_stale_entry() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();
    tracker.arm(s, clock.at(0), secs(30));
    let barrier = Barrier::new(16);

    let blocked: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..16u64)
            .map(|i| {
                let (tracker, barrier, clock) = (&tracker, &barrier, &clock);
                scope.spawn(move || {
                    barrier.wait();
                    // Half check exactly at expiry, half later
                    let now = clock.at(30_000 + (i % 2) * 5_000);
                    tracker.blocked_for(s, now).is_some() as usize
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).sum()
    });

    assert_eq!(blocked, 0);
    assert!(tracker.is_empty());
    assert_eq!(tracker.try_arm(s, clock.at(35_000), secs(30)), Ok(clock.at(65_000)));
}

#[test]
fn test_zero_duration_is_already_expired() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), Duration::ZERO);
    assert!(!tracker.is_blocked(s, clock.at(0)));
}

#[test]
fn test_unknown_subject_not_blocked() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();

    assert!(!tracker.is_blocked(SubjectId::new_v4(), clock.now()));
    assert!(tracker.is_empty(), "a miss must not create an entry");
}

#[test]
fn test_subjects_are_independent() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let a = SubjectId::new_v4();
    let b = SubjectId::new_v4();

    tracker.arm(a, clock.at(0), secs(30));
    assert!(tracker.is_blocked(a, clock.at(10)));
    assert!(!tracker.is_blocked(b, clock.at(10)));

    tracker.disarm(b);
    assert!(tracker.is_blocked(a, clock.at(10)));
}

// ─────────────────────────────────────────────────────────────────────────────
// Arm: monotonic extend
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_rearm_extends_but_never_shortens() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    let first = tracker.arm(s, clock.at(0), secs(30));
    assert_eq!(first, clock.at(30_000));

    // Shorter re-arm keeps the existing expiry
    let second = tracker.arm(s, clock.at(10_000), secs(5));
    assert_eq!(second, clock.at(30_000));

    // Longer re-arm moves it out
    let third = tracker.arm(s, clock.at(10_000), secs(60));
    assert_eq!(third, clock.at(70_000));
    assert_eq!(tracker.expires_at(s), Some(clock.at(70_000)));
}

#[test]
fn test_concurrent_arm_keeps_longest_expiry() {
    let clock = ManualClock::new();
    let now = clock.at(0);

    for _ in 0..50 {
        let tracker = CooldownTracker::new();
        let s = SubjectId::new_v4();
        let barrier = Barrier::new(2);

        thread::scope(|scope| {
            scope.spawn(|| {
                barrier.wait();
                tracker.arm(s, now, secs(10));
            });
            scope.spawn(|| {
                barrier.wait();
                tracker.arm(s, now, secs(20));
            });
        });

        assert_eq!(tracker.expires_at(s), Some(clock.at(20_000)));
    }
}

#[test]
fn test_concurrent_arm_many_durations() {
    let clock = ManualClock::new();
    let now = clock.at(0);
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();
    let barrier = Barrier::new(16);

    thread::scope(|scope| {
        for i in 1..=16u64 {
            let tracker = &tracker;
            let barrier = &barrier;
            scope.spawn(move || {
                barrier.wait();
                tracker.arm(s, now, secs(i));
            });
        }
    });

    assert_eq!(tracker.expires_at(s), Some(clock.at(16_000)));
}

// ─────────────────────────────────────────────────────────────────────────────
// try_arm: first caller wins
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_try_arm_reports_remaining_when_blocked() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    assert_eq!(tracker.try_arm(s, clock.at(0), secs(30)), Ok(clock.at(30_000)));
    assert_eq!(tracker.try_arm(s, clock.at(10_000), secs(30)), Err(20));
    // Rejection must not extend
    assert_eq!(tracker.expires_at(s), Some(clock.at(30_000)));

    assert_eq!(
        tracker.try_arm(s, clock.at(31_000), secs(30)),
        Ok(clock.at(61_000))
    );
}

#[test]
fn test_try_arm_single_winner_under_contention() {
    let clock = ManualClock::new();
    let now = clock.at(0);
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();
    let barrier = Barrier::new(8);
    let (tracker, barrier) = (&tracker, &barrier);

    let wins: usize = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|_| {
                scope.spawn(move || {
                    barrier.wait();
                    tracker.try_arm(s, now, secs(30)).is_ok()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum()
    });

    assert_eq!(wins, 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// Disarm and scheduled removal
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_disarm_is_idempotent() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), secs(30));
    assert!(tracker.disarm(s));
    assert!(!tracker.disarm(s));

    for t in [0, 1, 29_999, 1_000_000] {
        assert!(!tracker.is_blocked(s, clock.at(t)));
    }
}

#[test]
fn test_disarm_if_ignores_moved_expiry() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    let first = tracker.arm(s, clock.at(0), secs(10));
    tracker.arm(s, clock.at(5_000), secs(20));

    assert!(!tracker.disarm_if(s, first), "stale timer must not clobber re-arm");
    assert_eq!(tracker.expires_at(s), Some(clock.at(25_000)));

    assert!(tracker.disarm_if(s, clock.at(25_000)));
    assert!(tracker.is_empty());
}

#[test]
fn test_scheduled_expiry_removes_matching_entry() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new();
    let tracker = Arc::new(CooldownTracker::new());
    let s = SubjectId::new_v4();

    let now = clock.at(0);
    let expires_at = tracker.arm(s, now, secs(30));
    tracker.schedule_expiry(&scheduler, s, expires_at, now);

    scheduler.advance(secs(29));
    assert_eq!(tracker.len(), 1);

    scheduler.advance(secs(1));
    assert!(tracker.is_empty());
}

#[test]
fn test_scheduled_expiry_skips_extended_entry() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new();
    let tracker = Arc::new(CooldownTracker::new());
    let s = SubjectId::new_v4();

    let now = clock.at(0);
    let first = tracker.arm(s, now, secs(10));
    tracker.schedule_expiry(&scheduler, s, first, now);

    let later = tracker.arm(s, clock.at(5_000), secs(60));
    tracker.schedule_expiry(&scheduler, s, later, clock.at(5_000));

    assert_eq!(scheduler.advance(secs(10)), 1);
    assert_eq!(tracker.expires_at(s), Some(later));

    scheduler.advance(secs(60));
    assert!(tracker.is_empty());
}

#[test]
fn test_scheduled_expiry_after_tracker_dropped() {
    let clock = ManualClock::new();
    let scheduler = ManualScheduler::new();
    let tracker = Arc::new(CooldownTracker::new());
    let s = SubjectId::new_v4();

    let expires_at = tracker.arm(s, clock.at(0), secs(1));
    tracker.schedule_expiry(&scheduler, s, expires_at, clock.at(0));
    drop(tracker);

    // Must be a silent no-op
    assert_eq!(scheduler.advance(secs(1)), 1);
}

// ─────────────────────────────────────────────────────────────────────────────
// remaining_secs: read-only
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_remaining_secs_rounds_up() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), secs(30));
    assert_eq!(tracker.remaining_secs(s, clock.at(0)), Some(30));
    assert_eq!(tracker.remaining_secs(s, clock.at(10_000)), Some(20));
    assert_eq!(tracker.remaining_secs(s, clock.at(10_001)), Some(20));
    assert_eq!(tracker.remaining_secs(s, clock.at(29_999)), Some(1));
    assert_eq!(tracker.remaining_secs(s, clock.at(30_000)), None);
}

#[test]
fn test_sub_millisecond_remainder_counts_as_one_second() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();
    let t0 = clock.at(0);
    tracker.arm(s, t0, secs(30));

    let now = t0 + secs(30) - Duration::from_micros(500);
    assert_eq!(tracker.remaining_secs(s, now), Some(1));
    assert_eq!(tracker.blocked_for(s, now), Some(1));
    assert_eq!(tracker.try_arm(s, now, secs(30)), Err(1));

    let almost = t0 + secs(30) - Duration::from_nanos(1);
    assert_eq!(tracker.blocked_for(s, almost), Some(1));
}

#[test]
fn test_huge_duration_is_clamped() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let (a, b) = (SubjectId::new_v4(), SubjectId::new_v4());
    let now = clock.at(0);

    assert_eq!(tracker.arm(a, now, Duration::MAX), now + MAX_COOLDOWN);
    assert_eq!(tracker.try_arm(b, now, Duration::MAX), Ok(now + MAX_COOLDOWN));
    assert_eq!(tracker.remaining_secs(b, now), Some(MAX_COOLDOWN.as_secs()));
}

#[test]
fn test_remaining_secs_does_not_mutate() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), secs(30));
    let once = tracker.remaining_secs(s, clock.at(10_000));
    for _ in 0..100 {
        assert_eq!(tracker.remaining_secs(s, clock.at(10_000)), once);
    }
    assert!(tracker.is_blocked(s, clock.at(10_000)));

    // Past expiry it reports absent but leaves cleanup to is_blocked
    assert_eq!(tracker.remaining_secs(s, clock.at(40_000)), None);
    assert_eq!(tracker.len(), 1);
    assert!(!tracker.is_blocked(s, clock.at(40_000)));
    assert!(tracker.is_empty());
}

#[test]
fn test_blocked_for_matches_remaining() {
    let clock = ManualClock::new();
    let tracker = CooldownTracker::new();
    let s = SubjectId::new_v4();

    tracker.arm(s, clock.at(0), secs(30));
    assert_eq!(tracker.blocked_for(s, clock.at(10_000)), Some(20));
    assert_eq!(tracker.blocked_for(s, clock.at(30_000)), None);
}
