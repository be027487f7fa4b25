use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{KindredError, Result};

/// Opening line used when no history has been persisted yet.
pub const DEFAULT_GREETING: &str =
    "Hi there... I'm Joi. I'm here with you. How are you feeling right now?";

/// Storage key the history is saved under.
pub const DEFAULT_HISTORY_KEY: &str = "joi-chat-history";

/// Top-level configuration for Kindred.
///
/// Loaded from `~/.kindred/config.toml` by default. Every section falls back
/// to its defaults when omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KindredConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub companion: CompanionConfig,
    #[serde(default)]
    pub engine: EngineConfig,
}

impl KindredConfig {
    /// Load configuration from a TOML file.
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: KindredConfig = toml::from_str(&content)?;
        config.validate()?;
        info!("Configuration loaded from {}", path.display());
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the
    /// file does not exist or cannot be parsed.
    pub fn load_or_default(path: &Path) -> Self {
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!(
                    "Failed to load config from {}: {}. Using defaults.",
                    path.display(),
                    e
                );
                Self::default()
            }
        }
    }

    /// Save the current configuration to a TOML file.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        info!("Configuration saved to {}", path.display());
        Ok(())
    }

    /// Check cross-field constraints that serde defaults cannot express.
    pub fn validate(&self) -> Result<()> {
        self.engine.validate()
    }
}

/// General application settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Directory for the on-disk history store.
    pub data_dir: String,
    /// Log level: trace, debug, info, warn, error.
    pub log_level: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            data_dir: "~/.kindred".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl GeneralConfig {
    /// `data_dir` with a leading `~` expanded to the home directory.
    pub fn resolve_data_dir(&self) -> Result<PathBuf> {
        expand_home(&self.data_dir)
    }
}

fn expand_home(path: &str) -> Result<PathBuf> {
    let rest = if path == "~" {
        Some("")
    } else {
        path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\"))
    };
    let Some(rest) = rest else {
        return Ok(PathBuf::from(path));
    };
    let home = dirs::home_dir().ok_or_else(|| {
        KindredError::Storage(format!("cannot expand {}: home directory unknown", path))
    })?;
    Ok(if rest.is_empty() { home } else { home.join(rest) })
}

/// Persona and history settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CompanionConfig {
    /// Message seeded into an empty or unreadable history.
    pub greeting: String,
    /// Key the history is persisted under.
    pub history_key: String,
}

impl Default for CompanionConfig {
    fn default() -> Self {
        Self {
            greeting: DEFAULT_GREETING.to_string(),
            history_key: DEFAULT_HISTORY_KEY.to_string(),
        }
    }
}

/// Reply engine tuning.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Lower bound (inclusive) of the simulated thinking delay.
    pub min_delay_ms: u64,
    /// Upper bound (exclusive) of the simulated thinking delay.
    pub max_delay_ms: u64,
    /// Number of trailing messages scanned for conversation themes.
    pub context_window: usize,
    /// Contextual follow-ups are only offered once the history is longer than this.
    pub context_min_history: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: 1000,
            max_delay_ms: 2500,
            context_window: 10,
            context_min_history: 5,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_delay_ms >= self.max_delay_ms {
            return Err(KindredError::Config(format!(
                "engine.min_delay_ms ({}) must be less than engine.max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        if self.context_window == 0 {
            return Err(KindredError::Config(
                "engine.context_window must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

// =============================================================================
// Tests
// =============================================================================
