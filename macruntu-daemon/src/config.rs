//! Configuration management

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use macruntu_paste::MacroConfig;
use serde::{Deserialize, Serialize};

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path the config was loaded from
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Start at login (stored for the UI; autostart files are not managed here)
    #[serde(default)]
    pub autostart: bool,

    /// IPC socket override (default: `$XDG_RUNTIME_DIR/macruntu.sock`)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub socket_path: Option<String>,

    /// Macros, addressed by 1-based position
    #[serde(default = "default_macros")]
    pub macros: Vec<MacroConfig>,
}

fn default_macros() -> Vec<MacroConfig> {
    let mut api_key = MacroConfig::new("API Key", "REPLACE_ME");
    api_key.secret = true;

    vec![
        MacroConfig::new("Email", "name@example.com"),
        MacroConfig::new("Phone", "+1 555 0100"),
        MacroConfig::new("Address", "221B Baker Street, London"),
        MacroConfig::new("Signature", "Best regards,\nMe"),
        api_key,
    ]
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            config_path: PathBuf::new(),
            autostart: false,
            socket_path: None,
            macros: default_macros(),
        }
    }
}

impl AppConfig {
    /// Load from the default location, creating it on first run
    pub fn load() -> Result<Self> {
        let config_path =
            macruntu_paths::config_file_path().context("Failed to determine config path")?;
        Self::load_from(&config_path)
    }

    /// Load from `config_path`, writing the default config there if missing
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if config_path.exists() {
            let contents = std::fs::read_to_string(config_path)
                .with_context(|| format!("Failed to read config file {}", config_path.display()))?;

            let mut config: AppConfig = toml::from_str(&contents)
                .with_context(|| format!("Failed to parse config file {}", config_path.display()))?;

            config.config_path = config_path.to_path_buf();
            Ok(config)
        } else {
            let config = Self {
                config_path: config_path.to_path_buf(),
                ..Self::default()
            };
            config.save().context("Failed to save default config")?;
            Ok(config)
        }
    }

    /// Save configuration to `config_path`
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            if !parent.as_os_str().is_empty() {
                macruntu_paths::ensure_private_dir(parent)
                    .context("Failed to create config directory")?;
            }
        }

        let contents = toml::to_string_pretty(self).context("Failed to serialize config")?;

        std::fs::write(&self.config_path, contents).context("Failed to write config file")?;

        Ok(())
    }

    /// Macro by 1-based index
    pub fn macro_at(&self, index: usize) -> Option<&MacroConfig> {
        index.checked_sub(1).and_then(|i| self.macros.get(i))
    }

    /// IPC socket location
    pub fn socket_path(&self) -> Result<PathBuf> {
        match &self.socket_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => macruntu_paths::get_ipc_socket_path(),
        }
    }
}
