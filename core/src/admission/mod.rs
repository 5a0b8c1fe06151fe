//! Command admission
//!
//! One admission walks a fixed sequence of checks, then commits:
//!
//! ```text
//!  Start ─► Permission ─► Syntax ─► Context ─► Cooldown ─► Execute ─► Effects ─► Done
//!              │   └─"reload"─► Reload      │          │
//!              ▼            ▼               ▼          ▼
//!          Rejected     Rejected        Rejected   Rejected
//! ```
//!
//! Rejections notify the caller once and change nothing. After `Execute` the
//! pipeline always runs to completion; effect failures are logged, not returned.

mod active;
mod controller;
mod outcome;
mod pipeline;


pub use active::ActiveSubjects;
pub use controller::{AdmissionController, Collaborators};
pub use outcome::{AdmissionResult, Rejection};
pub use pipeline::{EffectKind, PipelineReport, run_pipeline};
