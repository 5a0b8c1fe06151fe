//! Error types for respawn-core

use std::path::PathBuf;

use respawn_types::ParamError;
use thiserror::Error;

use crate::admission::EffectKind;

/// Errors that can occur while loading or saving the gate configuration
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error reading {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Parse error in {path:?}: {source}")]
    Parse {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Serialize error for {path:?}: {source}")]
    Serialize {
        path: PathBuf,
        source: toml::ser::Error,
    },
}

/// Failure reported by a single effect handler
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EffectError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Unknown sound: {0}")]
    UnknownSound(String),

    #[error("Handler error: {0}")]
    Handler(String),
}

impl From<ParamError> for EffectError {
    fn from(err: ParamError) -> Self {
        Self::InvalidParameter(err.to_string())
    }
}

/// An effect step that failed after the protected action committed.
/// Logged by the pipeline, never surfaced to the caller.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{effect} effect failed: {source}")]
pub struct EffectFailure {
    pub effect: EffectKind,
    pub source: EffectError,
}
