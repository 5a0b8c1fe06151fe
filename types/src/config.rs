//! Gate configuration snapshot.
//!
//! A `GateConfig` is loaded once per reload cycle and shared read-only. Every
//! section defaults independently, so a partial TOML file still produces a
//! fully-formed snapshot.

use serde::{Deserialize, Serialize};

/// Permission keys checked by the admission controller.
pub mod permissions {
    /// Required to run the command at all.
    pub const COMMAND: &str = "suicide.command";
    /// Required for the `reload` sub-command.
    pub const RELOAD: &str = "suicide.reload";
    /// Skips cooldown checks and arming.
    pub const BYPASS: &str = "suicide.bypass";
}

/// Primary command label registered with the host.
pub const COMMAND_NAME: &str = "suicide";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct GateConfig {
    /// Extra labels routed to the command
    pub aliases: Vec<String>,
    /// Worlds in which the command is refused
    pub disabled_worlds: Vec<String>,
    pub cooldown: CooldownConfig,
    pub messages: MessageConfig,
    pub broadcast: BroadcastConfig,
    /// Personal confirmation message toggle
    pub message: bool,
    /// Location disclosure toggle
    pub coords: bool,
    pub firework: FireworkConfig,
    pub sound: SoundConfig,
}

impl Default for GateConfig {
    fn default() -> Self {
        Self {
            aliases: vec!["kill".to_string(), "die".to_string()],
            disabled_worlds: Vec::new(),
            cooldown: CooldownConfig::default(),
            messages: MessageConfig::default(),
            broadcast: BroadcastConfig::default(),
            message: true,
            coords: true,
            firework: FireworkConfig::default(),
            sound: SoundConfig::default(),
        }
    }
}

impl GateConfig {
    pub fn is_world_disabled(&self, world: &str) -> bool {
        self.disabled_worlds.iter().any(|w| w == world)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CooldownConfig {
    pub enabled: bool,
    /// Signed so a bad value survives parsing; negative values behave as zero.
    pub timer_secs: i64,
}

impl Default for CooldownConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            timer_secs: 30,
        }
    }
}

impl CooldownConfig {
    /// Cooldown length in milliseconds, clamped at zero.
    pub fn duration_ms(&self) -> u64 {
        self.timer_secs.max(0).unsigned_abs().saturating_mul(1000)
    }
}

/// Message templates. Colour codes are left for the host to translate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct MessageConfig {
    pub on_suicide: String,
    pub no_permission: String,
    pub reload: String,
    pub invalid_syntax: String,
    pub disabled: String,
    /// `%time%` is replaced with the remaining whole seconds
    pub on_cooldown: String,
}

impl Default for MessageConfig {
    fn default() -> Self {
        Self {
            on_suicide: "&cYou took the easy way out.".to_string(),
            no_permission: "&cYou do not have permission to do that.".to_string(),
            reload: "&aConfiguration reloaded.".to_string(),
            invalid_syntax: "&cUsage: /suicide [reload]".to_string(),
            disabled: "&cYou cannot do that in this world.".to_string(),
            on_cooldown: "&cPlease wait %time% seconds before doing that again.".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BroadcastConfig {
    pub enabled: bool,
    /// One template is picked at random per announcement; `%player%` is substituted.
    pub messages: Vec<String>,
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            messages: vec![
                "&e%player% &7couldn't take it anymore.".to_string(),
                "&e%player% &7has left the building.".to_string(),
            ],
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Cosmetic (firework) parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Raw RGB triple as written in the config; components may be out of range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct Rgb {
    pub red: i32,
    pub green: i32,
    pub blue: i32,
}

impl Default for Rgb {
    fn default() -> Self {
        Self {
            red: 255,
            green: 0,
            blue: 0,
        }
    }
}

impl Rgb {
    pub const fn new(red: i32, green: i32, blue: i32) -> Self {
        Self { red, green, blue }
    }

    /// Clamp every component into `0..=255`.
    pub fn clamped(self) -> [u8; 3] {
        let c = |v: i32| v.clamp(0, 255) as u8;
        [c(self.red), c(self.green), c(self.blue)]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FireworkKind {
    Ball,
    BallLarge,
    Star,
    Burst,
    Creeper,
}

impl FireworkKind {
    /// Parse a config name such as `BALL_LARGE` (case-insensitive).
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_uppercase().as_str() {
            "BALL" => Some(Self::Ball),
            "BALL_LARGE" => Some(Self::BallLarge),
            "STAR" => Some(Self::Star),
            "BURST" => Some(Self::Burst),
            "CREEPER" => Some(Self::Creeper),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ball => "BALL",
            Self::BallLarge => "BALL_LARGE",
            Self::Star => "STAR",
            Self::Burst => "BURST",
            Self::Creeper => "CREEPER",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct FireworkConfig {
    pub enabled: bool,
    #[serde(rename = "type")]
    pub kind: String,
    pub color: Rgb,
    pub fade: Rgb,
    pub power: i32,
    pub trail: bool,
    pub flicker: bool,
    /// Spawned fireworks must not damage nearby entities
    pub harmless: bool,
}

impl Default for FireworkConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            kind: "BALL_LARGE".to_string(),
            color: Rgb::new(255, 0, 0),
            fade: Rgb::new(255, 255, 255),
            power: 1,
            trail: true,
            flicker: true,
            harmless: true,
        }
    }
}

/// Validated firework parameters handed to the cosmetic handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FireworkSpec {
    pub kind: FireworkKind,
    pub color: [u8; 3],
    pub fade: [u8; 3],
    /// Flight power in `0..=3`
    pub power: u8,
    pub trail: bool,
    pub flicker: bool,
    /// The host must cancel any damage dealt by this firework's explosion.
    pub harmless: bool,
}

impl FireworkConfig {
    /// Resolve raw config values into handler parameters.
    ///
    /// Colours and power are clamped into range; an unknown firework type is an error
    /// because there is no sensible value to clamp it to.
    pub fn resolve(&self) -> Result<FireworkSpec, ParamError> {
        let kind = FireworkKind::from_name(&self.kind).ok_or_else(|| ParamError::UnknownValue {
            field: "firework.type",
            value: self.kind.clone(),
        })?;

        Ok(FireworkSpec {
            kind,
            color: self.color.clamped(),
            fade: self.fade.clamped(),
            power: self.power.clamp(0, 3) as u8,
            trail: self.trail,
            flicker: self.flicker,
            harmless: self.harmless,
        })
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Audio cue parameters
// ─────────────────────────────────────────────────────────────────────────────

/// Sound name dialect spoken by the host server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SoundNaming {
    #[default]
    Modern,
    /// Pre-flattening names (`MOB_ZOMBIE_HURT` rather than `ENTITY_ZOMBIE_HURT`)
    Legacy,
}

impl SoundNaming {
    /// Translate a configured sound name into this dialect.
    pub fn translate(self, raw: &str) -> String {
        let name = raw.trim().to_ascii_uppercase();
        match self {
            Self::Modern => name,
            Self::Legacy => name
                .replace("ITEM_", "")
                .replace("BLOCK_", "")
                .replace("ENTITY_", "MOB_"),
        }
    }

    /// A known-good sound name, used in hints when a configured name is rejected.
    pub fn example_sound(self) -> &'static str {
        match self {
            Self::Modern => "ENTITY_ZOMBIE_HURT",
            Self::Legacy => "MOB_ZOMBIE_HURT",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SoundConfig {
    pub enabled: bool,
    pub sound: String,
    /// Percentage, 100 is full volume
    pub volume: i32,
    /// Percentage of the pitch range, 0 is lowest
    pub pitch: i32,
    pub naming: SoundNaming,
}

impl Default for SoundConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: "ENTITY_ZOMBIE_HURT".to_string(),
            volume: 100,
            pitch: 50,
            naming: SoundNaming::Modern,
        }
    }
}

/// Resolved audio cue handed to the sound handler.
#[derive(Debug, Clone, PartialEq)]
pub struct SoundCue {
    pub name: String,
    pub volume: f32,
    pub pitch: f32,
}

impl SoundConfig {
    /// Volume maps to `volume / 100`; pitch maps onto `0.5..=2.0`.
    pub fn resolve(&self) -> SoundCue {
        SoundCue {
            name: self.naming.translate(&self.sound),
            volume: self.volume as f32 / 100.0,
            pitch: 0.5 + (self.pitch as f32 / 100.0 * 1.5),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// A configured parameter that cannot be turned into a handler value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamError {
    UnknownValue { field: &'static str, value: String },
}

impl std::fmt::Display for ParamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownValue { field, value } => {
                write!(f, "unrecognized value {:?} for {}", value, field)
            }
        }
    }
}

impl std::error::Error for ParamError {}
