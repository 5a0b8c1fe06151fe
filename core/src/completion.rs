//! Completion handling
//!
//! The host reports every death here. Deaths caused by the protected action clear
//! the subject's active mark; whether the host's own death notice is shown depends
//! on whether the broadcast step already announced it.

use std::sync::Arc;

use crate::admission::ActiveSubjects;
use crate::config::ConfigProvider;
use crate::subject::SubjectId;

/// What the host should do with its default death notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeathNotice {
    Default,
    Suppressed,
}

pub struct CompletionHandler {
    active: Arc<ActiveSubjects>,
    config: Arc<dyn ConfigProvider>,
}

impl CompletionHandler {
    pub fn new(active: Arc<ActiveSubjects>, config: Arc<dyn ConfigProvider>) -> Self {
        Self { active, config }
    }

    /// Handle a death for `subject`.
    ///
    /// The active mark is cleared unconditionally. The notice is suppressed only for
    /// an active subject while broadcasts are disabled.
    pub fn on_death(&self, subject: SubjectId) -> DeathNotice {
        if !self.active.remove(subject) {
            return DeathNotice::Default;
        }

        if self.config.current_snapshot().broadcast.enabled {
            DeathNotice::Default
        } else {
            tracing::debug!(%subject, "Suppressing death notice");
            DeathNotice::Suppressed
        }
    }
}
