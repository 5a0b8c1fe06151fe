//! Gate configuration loading
//!
//! The configuration is a single TOML file. Readers take an `Arc` snapshot once per
//! admission; a reload parses the whole file first and swaps the pointer only on
//! success, so nobody ever sees a half-applied config.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use arc_swap::ArcSwap;
use respawn_types::{FireworkKind, GateConfig};

use crate::error::ConfigError;

pub trait ConfigProvider: Send + Sync {
    /// The snapshot in effect right now
    fn current_snapshot(&self) -> Arc<GateConfig>;

    /// Re-read the backing source. On error the previous snapshot stays in effect.
    fn reload(&self) -> Result<(), ConfigError>;
}

/// Configuration backed by a TOML file on disk
#[derive(Debug)]
pub struct FileConfigProvider {
    path: PathBuf,
    current: ArcSwap<GateConfig>,
}

impl FileConfigProvider {
    /// Load `path`, writing the default configuration there first if it does not exist.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, ConfigError> {
        let path = path.into();

        if !path.exists() {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).map_err(|e| ConfigError::Io {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
            save_file(&path, &GateConfig::default())?;
            tracing::info!(path = %path.display(), "Wrote default configuration");
        }

        let config = load_file(&path)?;
        Ok(Self {
            path,
            current: ArcSwap::from_pointee(config),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for FileConfigProvider {
    fn current_snapshot(&self) -> Arc<GateConfig> {
        self.current.load_full()
    }

    fn reload(&self) -> Result<(), ConfigError> {
        let config = load_file(&self.path)?;
        self.current.store(Arc::new(config));
        tracing::info!(path = %self.path.display(), "Configuration reloaded");
        Ok(())
    }
}

/// In-memory configuration, replaced by hand
#[derive(Debug)]
pub struct StaticConfigProvider {
    current: ArcSwap<GateConfig>,
}

impl Default for StaticConfigProvider {
    fn default() -> Self {
        Self::new(GateConfig::default())
    }
}

impl StaticConfigProvider {
    pub fn new(config: GateConfig) -> Self {
        Self {
            current: ArcSwap::from_pointee(config),
        }
    }

    pub fn replace(&self, config: GateConfig) {
        self.current.store(Arc::new(config));
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn current_snapshot(&self) -> Arc<GateConfig> {
        self.current.load_full()
    }

    fn reload(&self) -> Result<(), ConfigError> {
        Ok(())
    }
}

/// Load a single TOML config file
pub fn load_file(path: &Path) -> Result<GateConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    let config: GateConfig = toml::from_str(&contents).map_err(|e| ConfigError::Parse {
        path: path.to_path_buf(),
        source: e,
    })?;

    warn_on_suspicious_values(path, &config);
    Ok(config)
}

/// Save a config to a TOML file
pub fn save_file(path: &Path, config: &GateConfig) -> Result<(), ConfigError> {
    let contents = toml::to_string_pretty(config).map_err(|e| ConfigError::Serialize {
        path: path.to_path_buf(),
        source: e,
    })?;

    fs::write(path, contents).map_err(|e| ConfigError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;

    Ok(())
}

/// Get the default configuration file location
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|p| p.join("respawn").join("config.toml"))
}

// Values that parse but will misbehave at runtime. Loading still succeeds.
fn warn_on_suspicious_values(path: &Path, config: &GateConfig) {
    if config.cooldown.timer_secs < 0 {
        tracing::warn!(
            path = %path.display(),
            timer_secs = config.cooldown.timer_secs,
            "Negative cooldown timer, treating as zero"
        );
    }
    if config.firework.enabled && FireworkKind::from_name(&config.firework.kind).is_none() {
        tracing::warn!(
            path = %path.display(),
            kind = %config.firework.kind,
            "Unknown firework type, cosmetic effect will fail"
        );
    }
}
