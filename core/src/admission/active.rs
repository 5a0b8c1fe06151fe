use dashmap::DashSet;

use crate::subject::SubjectId;

/// Subjects whose protected action has run and whose completion has not been
/// handled yet.
///
/// The admission controller adds; the completion handler removes. Sharded, so
/// unrelated subjects never contend.
#[derive(Debug, Default)]
pub struct ActiveSubjects {
    subjects: DashSet<SubjectId>,
}

impl ActiveSubjects {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false if the subject was already marked.
    pub fn insert(&self, subject: SubjectId) -> bool {
        self.subjects.insert(subject)
    }

    pub fn contains(&self, subject: SubjectId) -> bool {
        self.subjects.contains(&subject)
    }

    /// Clear the mark. Returns whether it was set, so query-and-clear is one call.
    pub fn remove(&self, subject: SubjectId) -> bool {
        self.subjects.remove(&subject).is_some()
    }

    pub fn len(&self) -> usize {
        self.subjects.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subjects.is_empty()
    }

    /// Point-in-time copy of the members, sorted
    pub fn snapshot(&self) -> Vec<SubjectId> {
        let mut subjects: Vec<_> = self.subjects.iter().map(|s| *s).collect();
        subjects.sort();
        subjects
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_remove_reports_membership() {
        let active = ActiveSubjects::new();
        let s = SubjectId::new_v4();

        assert!(active.insert(s));
        assert!(!active.insert(s));
        assert!(active.contains(s));
        assert!(active.remove(s));
        assert!(!active.remove(s));
        assert!(active.is_empty());
    }

    #[test]
    fn test_concurrent_remove_single_winner() {
        let active = ActiveSubjects::new();
        let s = SubjectId::new_v4();
        active.insert(s);

        let removed: usize = thread::scope(|scope| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    let active = &active;
                    scope.spawn(move || active.remove(s))
                })
                .collect();
            handles
                .into_iter()
                .map(|h| h.join().unwrap() as usize)
                .sum()
        });

        assert_eq!(removed, 1);
    }
}
