//! respawn core: a concurrent cooldown gate and the command admission state machine
//! built on top of it.
//!
//! The host (a game server, or the sandbox CLI) supplies permissions, world policy,
//! effect handlers, a clock and a deferred-call scheduler; this crate decides whether
//! an action runs and sequences everything that follows it.

pub mod admission;
pub mod clock;
pub mod commands;
pub mod completion;
pub mod config;
pub mod cooldown;
pub mod error;
pub mod host;
pub mod scheduler;
pub mod subject;

// Re-exports for convenience
pub use admission::{
    ActiveSubjects, AdmissionController, AdmissionResult, Collaborators, EffectKind,
    PipelineReport, Rejection,
};
pub use clock::{Clock, ManualClock, SystemClock};
pub use commands::CommandTable;
pub use completion::{CompletionHandler, DeathNotice};
pub use config::{ConfigProvider, FileConfigProvider, StaticConfigProvider};
pub use cooldown::CooldownTracker;
pub use error::{ConfigError, EffectError, EffectFailure};
pub use host::{ContextPolicy, EffectHandlers, PermissionOracle};
pub use scheduler::{DeferredTask, ManualScheduler, Scheduler, TokioScheduler};
pub use subject::{BlockLocation, Caller, Subject, SubjectId};
