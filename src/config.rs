use crate::view::theme::ThemeColors;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub theme: ThemeColors,

    #[serde(default)]
    pub file_tree: FileTreeConfig,

    #[serde(default)]
    pub preview: PreviewConfig,

    /// Command used to edit files. Falls back to `$EDITOR`, then `vim`.
    #[serde(default)]
    pub editor: Option<String>,
}

/// File tree behavior configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FileTreeConfig {
    #[serde(default = "default_true")]
    pub show_hidden: bool,

    /// Compute recursive directory sizes in the background
    #[serde(default = "default_true")]
    pub directory_sizes: bool,

    /// Width of the tree column in cells
    #[serde(default = "default_tree_width")]
    pub width: u16,

    #[serde(default)]
    pub icons: TreeIcons,
}

impl Default for FileTreeConfig {
    fn default() -> Self {
        Self {
            show_hidden: true,
            directory_sizes: true,
            width: default_tree_width(),
            icons: TreeIcons::default(),
        }
    }
}

/// Label prefixes for tree rows
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeIcons {
    pub expanded: String,
    pub collapsed: String,
    pub file: String,
}

impl Default for TreeIcons {
    fn default() -> Self {
        Self {
            expanded: "▼".to_string(),
            collapsed: "▶".to_string(),
            file: " ".to_string(),
        }
    }
}

/// Content preview configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PreviewConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Files of this size or larger are not previewed
    #[serde(default = "default_preview_max_bytes")]
    pub max_bytes: u64,
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            max_bytes: default_preview_max_bytes(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_tree_width() -> u16 {
    50
}

fn default_preview_max_bytes() -> u64 {
    400_000
}

impl Config {
    /// Load configuration from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: Config =
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<(), ConfigError> {
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path.as_ref(), contents).map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Default location of the user config file
    pub fn user_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("term-finder").join("config.json"))
    }

    /// Load the user config if there is one
    ///
    /// A missing file gives the defaults silently; a broken one is logged and
    /// also gives the defaults, so a typo never keeps the browser from starting.
    pub fn load_user() -> Self {
        let Some(path) = Self::user_config_path() else {
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(config) => {
                tracing::info!("Loaded config from {:?}", path);
                config
            }
            Err(e) => {
                tracing::warn!("Ignoring config {:?}: {}", path, e);
                Self::default()
            }
        }
    }

    /// Editor command: config, then `$EDITOR`, then `vim`
    pub fn editor_command(&self) -> String {
        self.editor
            .clone()
            .filter(|e| !e.trim().is_empty())
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vim".to_string())
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.file_tree.width < 10 {
            return Err(ConfigError::ValidationError(
                "file_tree.width must be at least 10".to_string(),
            ));
        }

        if self.editor.as_ref().is_some_and(|e| e.trim().is_empty()) {
            return Err(ConfigError::ValidationError(
                "editor cannot be empty".to_string(),
            ));
        }

        Ok(())
    }
}

/// Configuration error types
#[derive(Debug)]
pub enum ConfigError {
    IoError(String),
    ParseError(String),
    SerializeError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::IoError(msg) => write!(f, "IO error: {msg}"),
            ConfigError::ParseError(msg) => write!(f, "Parse error: {msg}"),
            ConfigError::SerializeError(msg) => write!(f, "Serialize error: {msg}"),
            ConfigError::ValidationError(msg) => write!(f, "Validation error: {msg}"),
        }
    }
}

impl std::error::Error for ConfigError {}
