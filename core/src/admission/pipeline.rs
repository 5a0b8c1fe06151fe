//! Post-action effect pipeline
//!
//! Steps run in a fixed order, each gated by its own toggle in the admission's
//! config snapshot. A step that fails is logged and recorded; the next step runs
//! regardless.

use std::fmt;

use rand::seq::IndexedRandom;
use respawn_types::GateConfig;

use crate::error::{EffectError, EffectFailure};
use crate::host::EffectHandlers;
use crate::subject::{BlockLocation, Subject};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EffectKind {
    Broadcast,
    Confirmation,
    Cosmetic,
    LocationDisclosure,
    AudioCue,
}

impl EffectKind {
    /// Execution order
    pub const ORDER: [EffectKind; 5] = [
        Self::Broadcast,
        Self::Confirmation,
        Self::Cosmetic,
        Self::LocationDisclosure,
        Self::AudioCue,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::Broadcast => "broadcast",
            Self::Confirmation => "confirmation",
            Self::Cosmetic => "cosmetic",
            Self::LocationDisclosure => "location",
            Self::AudioCue => "sound",
        }
    }

    pub fn is_enabled(self, config: &GateConfig) -> bool {
        match self {
            Self::Broadcast => config.broadcast.enabled,
            Self::Confirmation => config.message,
            Self::Cosmetic => config.firework.enabled,
            Self::LocationDisclosure => config.coords,
            Self::AudioCue => config.sound.enabled,
        }
    }
}

impl fmt::Display for EffectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// What happened to each step of one pipeline run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PipelineReport {
    /// Steps whose handler was called and succeeded
    pub completed: Vec<EffectKind>,
    /// Steps disabled by config or with nothing to do
    pub skipped: Vec<EffectKind>,
    pub failures: Vec<EffectFailure>,
}

impl PipelineReport {
    pub fn failed(&self, kind: EffectKind) -> bool {
        self.failures.iter().any(|f| f.effect == kind)
    }
}

/// Run every enabled effect for `subject` against one config snapshot.
pub fn run_pipeline(
    effects: &dyn EffectHandlers,
    config: &GateConfig,
    subject: &Subject,
    location: Option<&BlockLocation>,
) -> PipelineReport {
    let mut report = PipelineReport::default();

    for kind in EffectKind::ORDER {
        if !kind.is_enabled(config) {
            report.skipped.push(kind);
            continue;
        }

        match run_step(kind, effects, config, subject, location) {
            Ok(true) => report.completed.push(kind),
            Ok(false) => report.skipped.push(kind),
            Err(source) => {
                tracing::warn!(
                    effect = %kind,
                    subject = %subject.id,
                    error = %source,
                    "Effect failed, continuing pipeline"
                );
                if let (EffectKind::AudioCue, EffectError::UnknownSound(_)) = (kind, &source) {
                    tracing::warn!(
                        "Invalid sound '{}', try {}",
                        config.sound.sound,
                        config.sound.naming.example_sound()
                    );
                }
                report.failures.push(EffectFailure {
                    effect: kind,
                    source,
                });
            }
        }
    }

    report
}

/// Ok(false) means the step had nothing to act on.
fn run_step(
    kind: EffectKind,
    effects: &dyn EffectHandlers,
    config: &GateConfig,
    subject: &Subject,
    location: Option<&BlockLocation>,
) -> Result<bool, EffectError> {
    match kind {
        EffectKind::Broadcast => {
            let Some(template) = config.broadcast.messages.choose(&mut rand::rng()) else {
                return Ok(false);
            };
            effects.broadcast(template, subject)?;
        }
        EffectKind::Confirmation => {
            effects.send_message(subject, &config.messages.on_suicide)?;
        }
        EffectKind::Cosmetic => {
            let Some(location) = location else {
                return Ok(false);
            };
            let params = config.firework.resolve()?;
            effects.spawn_cosmetic(location, &params)?;
        }
        EffectKind::LocationDisclosure => {
            let Some(location) = location else {
                return Ok(false);
            };
            effects.disclose_location(subject, location)?;
        }
        EffectKind::AudioCue => {
            effects.play_sound(subject, &config.sound.resolve())?;
        }
    }
    Ok(true)
}
