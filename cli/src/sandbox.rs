//! In-memory stand-in for a game server.
//!
//! Holds a handful of players with worlds, positions and permission grants, and
//! renders every effect as a line on stdout.

use std::collections::{HashMap, HashSet};
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use respawn_core::{
    BlockLocation, ContextPolicy, EffectError, EffectHandlers, PermissionOracle, Subject,
    SubjectId,
};
use respawn_types::{FireworkSpec, SoundCue, formatting, permissions};

/// Sounds the sandbox knows how to "play", in both naming dialects
const KNOWN_SOUNDS: &[&str] = &[
    "ENTITY_ZOMBIE_HURT",
    "ENTITY_PLAYER_HURT",
    "ENTITY_GENERIC_EXPLODE",
    "BLOCK_ANVIL_LAND",
    "MOB_ZOMBIE_HURT",
    "HURT_FLESH",
    "EXPLODE",
    "ANVIL_LAND",
];

pub const DEFAULT_WORLD: &str = "world";

#[derive(Debug, Clone)]
pub struct Player {
    pub subject: Subject,
    pub location: BlockLocation,
    pub health: f64,
    pub permissions: HashSet<String>,
}

#[derive(Debug, Default)]
pub struct Sandbox {
    players: RwLock<HashMap<SubjectId, Player>>,
}

impl Sandbox {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<SubjectId, Player>> {
        self.players.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<SubjectId, Player>> {
        self.players.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Add a player holding the base command permission.
    pub fn join(&self, name: &str, world: &str) -> Result<Subject, String> {
        let mut players = self.write();
        if players
            .values()
            .any(|p| p.subject.name.eq_ignore_ascii_case(name))
        {
            return Err(format!("error: {name} is already online"));
        }

        let subject = Subject::new(SubjectId::new_v4(), name);
        let player = Player {
            subject: subject.clone(),
            location: BlockLocation::new(world, 0, 64, 0),
            health: 20.0,
            permissions: HashSet::from([permissions::COMMAND.to_string()]),
        };
        players.insert(subject.id, player);
        Ok(subject)
    }

    /// Look a player up by name, ignoring case.
    pub fn find(&self, name: &str) -> Option<Subject> {
        self.read()
            .values()
            .find(|p| p.subject.name.eq_ignore_ascii_case(name))
            .map(|p| p.subject.clone())
    }

    pub fn player(&self, subject: SubjectId) -> Option<Player> {
        self.read().get(&subject).cloned()
    }

    /// Every player, sorted by name
    pub fn players(&self) -> Vec<Player> {
        let mut players: Vec<_> = self.read().values().cloned().collect();
        players.sort_by(|a, b| a.subject.name.cmp(&b.subject.name));
        players
    }

    pub fn set_permission(&self, subject: SubjectId, key: &str, granted: bool) -> bool {
        let mut players = self.write();
        let Some(player) = players.get_mut(&subject) else {
            return false;
        };
        if granted {
            player.permissions.insert(key.to_string());
        } else {
            player.permissions.remove(key);
        }
        true
    }

    pub fn teleport(&self, subject: SubjectId, location: BlockLocation) -> bool {
        match self.write().get_mut(&subject) {
            Some(player) => {
                player.location = location;
                true
            }
            None => false,
        }
    }

    /// Drop health to zero.
    pub fn kill(&self, subject: SubjectId) {
        if let Some(player) = self.write().get_mut(&subject) {
            player.health = 0.0;
        }
    }

    pub fn respawn(&self, subject: SubjectId) {
        if let Some(player) = self.write().get_mut(&subject) {
            player.health = 20.0;
        }
    }
}

impl PermissionOracle for Sandbox {
    fn has_permission(&self, subject: SubjectId, key: &str) -> bool {
        self.read()
            .get(&subject)
            .is_some_and(|p| p.permissions.contains(key))
    }
}

impl ContextPolicy for Sandbox {
    fn current_context(&self, subject: SubjectId) -> Option<String> {
        self.read().get(&subject).map(|p| p.location.world.clone())
    }

    fn location(&self, subject: SubjectId) -> Option<BlockLocation> {
        self.read().get(&subject).map(|p| p.location.clone())
    }
}

impl EffectHandlers for Sandbox {
    fn broadcast(&self, template: &str, subject: &Subject) -> Result<(), EffectError> {
        let line = formatting::broadcast_line(template, &subject.name);
        println!("[broadcast] {}", formatting::strip_color_codes(&line));
        Ok(())
    }

    fn send_message(&self, subject: &Subject, message: &str) -> Result<(), EffectError> {
        if !self.read().contains_key(&subject.id) {
            return Err(EffectError::Handler(format!("{} is offline", subject.name)));
        }
        println!(
            "[to {}] {}",
            subject.name,
            formatting::strip_color_codes(message)
        );
        Ok(())
    }

    fn spawn_cosmetic(
        &self,
        location: &BlockLocation,
        params: &FireworkSpec,
    ) -> Result<(), EffectError> {
        let [r, g, b] = params.color;
        println!(
            "[firework] {} at {} ({}, {}, {}) color #{:02x}{:02x}{:02x} power {}{}{}{}",
            params.kind.as_str(),
            location.world,
            location.x,
            location.y,
            location.z,
            r,
            g,
            b,
            params.power,
            if params.trail { " trail" } else { "" },
            if params.flicker { " flicker" } else { "" },
            if params.harmless { " harmless" } else { "" },
        );
        Ok(())
    }

    fn play_sound(&self, subject: &Subject, cue: &SoundCue) -> Result<(), EffectError> {
        if !KNOWN_SOUNDS.contains(&cue.name.as_str()) {
            return Err(EffectError::UnknownSound(cue.name.clone()));
        }
        println!(
            "[sound to {}] {} volume {:.2} pitch {:.2}",
            subject.name, cue.name, cue.volume, cue.pitch
        );
        Ok(())
    }

    fn disclose_location(
        &self,
        subject: &Subject,
        location: &BlockLocation,
    ) -> Result<(), EffectError> {
        self.send_message(
            subject,
            &formatting::coords_line(location.x, location.y, location.z),
        )
    }

    fn console_message(&self, message: &str) {
        println!("[console] {}", formatting::strip_color_codes(message));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_grants_base_permission() {
        let sandbox = Sandbox::new();
        let steve = sandbox.join("Steve", DEFAULT_WORLD).unwrap();

        assert!(sandbox.has_permission(steve.id, permissions::COMMAND));
        assert!(!sandbox.has_permission(steve.id, permissions::BYPASS));
        assert_eq!(sandbox.find("steve"), Some(steve.clone()));
        assert!(sandbox.join("STEVE", DEFAULT_WORLD).is_err());
    }

    #[test]
    fn test_teleport_changes_context() {
        let sandbox = Sandbox::new();
        let steve = sandbox.join("Steve", DEFAULT_WORLD).unwrap();

        assert!(sandbox.teleport(steve.id, BlockLocation::new("nether", 1, 2, 3)));
        assert_eq!(sandbox.current_context(steve.id).as_deref(), Some("nether"));
        assert_eq!(
            sandbox.location(steve.id),
            Some(BlockLocation::new("nether", 1, 2, 3))
        );
    }

    #[test]
    fn test_unknown_sound_rejected() {
        let sandbox = Sandbox::new();
        let steve = sandbox.join("Steve", DEFAULT_WORLD).unwrap();
        let cue = SoundCue {
            name: "NOT_A_SOUND".to_string(),
            volume: 1.0,
            pitch: 1.0,
        };

        assert_eq!(
            sandbox.play_sound(&steve, &cue),
            Err(EffectError::UnknownSound("NOT_A_SOUND".to_string()))
        );
    }

    #[test]
    fn test_kill_and_respawn() {
        let sandbox = Sandbox::new();
        let steve = sandbox.join("Steve", DEFAULT_WORLD).unwrap();

        sandbox.kill(steve.id);
        assert_eq!(sandbox.player(steve.id).unwrap().health, 0.0);
        sandbox.respawn(steve.id);
        assert_eq!(sandbox.player(steve.id).unwrap().health, 20.0);
    }
}
