//! Shared configuration types for respawn.
//!
//! Everything in here is plain data: the on-disk configuration snapshot and the
//! small helpers that turn its raw values into handler parameters and messages.
//! Loading and swapping snapshots lives in `respawn-core`.

pub mod config;
pub mod formatting;

pub use config::{
    BroadcastConfig, CooldownConfig, FireworkConfig, FireworkKind, FireworkSpec, GateConfig,
    COMMAND_NAME, MessageConfig, ParamError, Rgb, SoundConfig, SoundCue, SoundNaming, permissions,
};
