//! Interfaces the host implements for the admission controller.
//!
//! These are deliberately narrow: the controller asks yes/no questions and hands
//! fully resolved parameters to effect handlers. Rendering, colour translation and
//! world access stay on the host side.

use respawn_types::{FireworkSpec, GateConfig, SoundCue};

use crate::error::EffectError;
use crate::subject::{BlockLocation, Subject, SubjectId};

pub trait PermissionOracle: Send + Sync {
    fn has_permission(&self, subject: SubjectId, key: &str) -> bool;
}

/// World membership and exclusion policy.
pub trait ContextPolicy: Send + Sync {
    /// Name of the world the subject is in, `None` if the host cannot tell.
    fn current_context(&self, subject: SubjectId) -> Option<String>;

    /// Current block position of the subject.
    fn location(&self, subject: SubjectId) -> Option<BlockLocation>;

    /// Whether the command is refused in `context`. Receives the admission's config
    /// snapshot; the default consults its disabled world list.
    fn is_context_disabled(&self, context: &str, config: &GateConfig) -> bool {
        config.is_world_disabled(context)
    }
}

/// Side effects run after the protected action. Each call may fail on its own
/// without affecting the others.
pub trait EffectHandlers: Send + Sync {
    /// Announce to every player. `template` may contain `%player%`.
    fn broadcast(&self, template: &str, subject: &Subject) -> Result<(), EffectError>;

    fn send_message(&self, subject: &Subject, message: &str) -> Result<(), EffectError>;

    /// When `params.harmless` is set the host must cancel damage the firework deals.
    fn spawn_cosmetic(
        &self,
        location: &BlockLocation,
        params: &FireworkSpec,
    ) -> Result<(), EffectError>;

    /// Should fail with [`EffectError::UnknownSound`] if the host has no such sound.
    fn play_sound(&self, subject: &Subject, cue: &SoundCue) -> Result<(), EffectError>;

    fn disclose_location(
        &self,
        subject: &Subject,
        location: &BlockLocation,
    ) -> Result<(), EffectError>;

    /// Notice for a console caller.
    fn console_message(&self, message: &str) {
        tracing::info!(target: "respawn::console", "{}", message);
    }
}
