use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

use crate::utils;

/// Current configuration version
pub const CURRENT_CONFIG_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_database_path")]
    pub database_path: String,
    /// Signed-in user; falls back to the OS login name when unset
    #[serde(default)]
    pub user: Option<String>,
    #[serde(default = "default_store_timeout_ms")]
    pub store_timeout_ms: u64,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_current_theme")]
    pub current_theme: String,
    #[serde(default)]
    pub themes: HashMap<String, Theme>,
    #[serde(default)]
    pub key_bindings: KeyBindings,
    #[serde(default = "default_config_version")]
    pub config_version: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyBindings {
    #[serde(default = "default_quit")]
    pub quit: String,
    #[serde(default = "default_help")]
    pub help: String,
    #[serde(default = "default_view_left")]
    pub view_left: String,
    #[serde(default = "default_view_right")]
    pub view_right: String,
    #[serde(default = "default_view_overview")]
    pub view_overview: String,
    #[serde(default = "default_view_daily")]
    pub view_daily: String,
    #[serde(default = "default_view_weekly")]
    pub view_weekly: String,
    #[serde(default = "default_view_badges")]
    pub view_badges: String,
    #[serde(default = "default_list_up")]
    pub list_up: String,
    #[serde(default = "default_list_down")]
    pub list_down: String,
    #[serde(default = "default_switch_focus")]
    pub switch_focus: String,
    #[serde(default = "default_log_completed")]
    pub log_completed: String,
    #[serde(default = "default_log_skipped")]
    pub log_skipped: String,
    #[serde(default = "default_log_missed")]
    pub log_missed: String,
    #[serde(default = "default_new_habit")]
    pub new_habit: String,
    #[serde(default = "default_new_task")]
    pub new_task: String,
    #[serde(default = "default_toggle_task")]
    pub toggle_task: String,
    #[serde(default = "default_delete")]
    pub delete: String,
    #[serde(default = "default_previous_day")]
    pub previous_day: String,
    #[serde(default = "default_next_day")]
    pub next_day: String,
    #[serde(default = "default_today")]
    pub today: String,
    #[serde(default = "default_retry")]
    pub retry: String,
    #[serde(default = "default_reload")]
    pub reload: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default = "default_fg")]
    pub fg: String,
    #[serde(default = "default_bg")]
    pub bg: String,
    #[serde(default = "default_highlight_bg")]
    pub highlight_bg: String,
    #[serde(default = "default_tab_bg")]
    pub tab_bg: String,
    #[serde(default = "default_error_bg")]
    pub error_bg: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            user: None,
            store_timeout_ms: default_store_timeout_ms(),
            log_level: default_log_level(),
            current_theme: default_current_theme(),
            themes: HashMap::new(),
            key_bindings: KeyBindings::default(),
            config_version: Some(CURRENT_CONFIG_VERSION),
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        Self {
            quit: default_quit(),
            help: default_help(),
            view_left: default_view_left(),
            view_right: default_view_right(),
            view_overview: default_view_overview(),
            view_daily: default_view_daily(),
            view_weekly: default_view_weekly(),
            view_badges: default_view_badges(),
            list_up: default_list_up(),
            list_down: default_list_down(),
            switch_focus: default_switch_focus(),
            log_completed: default_log_completed(),
            log_skipped: default_log_skipped(),
            log_missed: default_log_missed(),
            new_habit: default_new_habit(),
            new_task: default_new_task(),
            toggle_task: default_toggle_task(),
            delete: default_delete(),
            previous_day: default_previous_day(),
            next_day: default_next_day(),
            today: default_today(),
            retry: default_retry(),
            reload: default_reload(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            fg: default_fg(),
            bg: default_bg(),
            highlight_bg: default_highlight_bg(),
            tab_bg: default_tab_bg(),
            error_bg: default_error_bg(),
        }
    }
}

impl Theme {
    /// Get preset themes that are always available
    pub fn get_preset_themes() -> HashMap<String, Theme> {
        let mut themes = HashMap::new();

        themes.insert("default".to_string(), Theme::default());

        themes.insert("light".to_string(), Theme {
            fg: "black".to_string(),
            bg: "white".to_string(),
            highlight_bg: "blue".to_string(),
            tab_bg: "gray".to_string(),
            error_bg: "lightred".to_string(),
        });

        themes.insert("green".to_string(), Theme {
            fg: "green".to_string(),
            bg: "black".to_string(),
            highlight_bg: "yellow".to_string(),
            tab_bg: "darkgray".to_string(),
            error_bg: "red".to_string(),
        });

        themes
    }
}

// Default value functions
fn default_database_path() -> String {
    // Fallback only - the profile's data dir is applied at load time
    if let Some(data_dir) = utils::get_data_dir(utils::Profile::Prod) {
        data_dir.join("habits.db").to_string_lossy().to_string()
    } else {
        "~/.local/share/habitgrid/habits.db".to_string()
    }
}

fn default_store_timeout_ms() -> u64 {
    5000
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_current_theme() -> String {
    "default".to_string()
}

fn default_config_version() -> Option<u32> {
    Some(CURRENT_CONFIG_VERSION)
}

fn default_quit() -> String {
    "q".to_string()
}

fn default_help() -> String {
    "F1".to_string()
}

fn default_view_left() -> String {
    "Left".to_string()
}

fn default_view_right() -> String {
    "Right".to_string()
}

fn default_view_overview() -> String {
    "1".to_string()
}

fn default_view_daily() -> String {
    "2".to_string()
}

fn default_view_weekly() -> String {
    "3".to_string()
}

fn default_view_badges() -> String {
    "4".to_string()
}

fn default_list_up() -> String {
    "k".to_string()
}

fn default_list_down() -> String {
    "j".to_string()
}

fn default_switch_focus() -> String {
    "Tab".to_string()
}

fn default_log_completed() -> String {
    "c".to_string()
}

fn default_log_skipped() -> String {
    "s".to_string()
}

fn default_log_missed() -> String {
    "x".to_string()
}

fn default_new_habit() -> String {
    "n".to_string()
}

fn default_new_task() -> String {
    "a".to_string()
}

fn default_toggle_task() -> String {
    "Space".to_string()
}

fn default_delete() -> String {
    "d".to_string()
}

fn default_previous_day() -> String {
    "[".to_string()
}

fn default_next_day() -> String {
    "]".to_string()
}

fn default_today() -> String {
    "t".to_string()
}

fn default_retry() -> String {
    "r".to_string()
}

fn default_reload() -> String {
    "F5".to_string()
}

fn default_fg() -> String {
    "white".to_string()
}

fn default_bg() -> String {
    "black".to_string()
}

fn default_highlight_bg() -> String {
    "blue".to_string()
}

fn default_tab_bg() -> String {
    "gray".to_string()
}

fn default_error_bg() -> String {
    "red".to_string()
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config directory: {0}")]
    ConfigDirError(String),
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to write config file: {0}")]
    WriteError(String),
    #[error("Theme not found: {0}")]
    ThemeNotFound(String),
}

impl Config {
    /// Load configuration for a profile, creating the default file if missing
    pub fn load_with_profile(profile: utils::Profile) -> Result<Self, ConfigError> {
        let config_path = Self::get_config_path(profile)?;
        let mut config = Self::load_from_path(&config_path)?;
        // Keep the database inside the profile's data dir even if the file was edited
        config.database_path = Self::default_database_path_for_profile(profile);
        Ok(config)
    }

    /// Load configuration from an explicit file, creating it with defaults if missing
    pub fn load_from_path(config_path: &Path) -> Result<Self, ConfigError> {
        if config_path.exists() {
            let contents = fs::read_to_string(config_path)
                .map_err(|e| ConfigError::ReadError(e.to_string()))?;
            let config: Config = toml::from_str(&contents)?;
            Ok(config)
        } else {
            let mut config = Config::default();
            config.save_to_path(config_path)?;
            Ok(config)
        }
    }

    /// Save configuration to an explicit file
    pub fn save_to_path(&mut self, config_path: &Path) -> Result<(), ConfigError> {
        self.config_version = Some(CURRENT_CONFIG_VERSION);

        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)
                .map_err(|e| ConfigError::WriteError(e.to_string()))?;
        }

        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::WriteError(format!("Failed to serialize config: {}", e)))?;

        fs::write(config_path, toml_string)
            .map_err(|e| ConfigError::WriteError(e.to_string()))?;

        Ok(())
    }

    /// Get the path to the config file
    pub fn get_config_path(profile: utils::Profile) -> Result<PathBuf, ConfigError> {
        let config_dir = utils::get_config_dir(profile)
            .ok_or_else(|| ConfigError::ConfigDirError("Could not determine config directory".to_string()))?;
        Ok(config_dir.join("config.toml"))
    }

    /// Get default database path for a specific profile
    fn default_database_path_for_profile(profile: utils::Profile) -> String {
        if let Some(data_dir) = utils::get_data_dir(profile) {
            data_dir.join("habits.db").to_string_lossy().to_string()
        } else {
            match profile {
                utils::Profile::Dev => "~/.local/share/habitgrid-dev/habits.db".to_string(),
                utils::Profile::Prod => "~/.local/share/habitgrid/habits.db".to_string(),
            }
        }
    }

    /// Get the expanded database path (with ~ expansion)
    pub fn get_database_path(&self) -> PathBuf {
        utils::expand_path(&self.database_path)
    }

    pub fn store_timeout(&self) -> Duration {
        Duration::from_millis(self.store_timeout_ms)
    }

    /// Get the currently active theme (user-defined first, then presets, then default)
    pub fn get_active_theme(&self) -> Theme {
        self.themes
            .get(&self.current_theme)
            .cloned()
            .or_else(|| Theme::get_preset_themes().remove(&self.current_theme))
            .unwrap_or_default()
    }

    /// Set the active theme by name
    pub fn set_theme(&mut self, name: &str) -> Result<(), ConfigError> {
        if !self.themes.contains_key(name) && !Theme::get_preset_themes().contains_key(name) {
            return Err(ConfigError::ThemeNotFound(name.to_string()));
        }
        self.current_theme = name.to_string();
        Ok(())
    }
}
