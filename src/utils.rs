use chrono::{Datelike, Duration, NaiveDate};
use directories::{BaseDirs, ProjectDirs};
use std::path::PathBuf;

/// Profile mode for the application (dev or prod)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Profile {
    Dev,
    Prod,
}

impl Profile {
    fn app_name(&self) -> &'static str {
        match self {
            Profile::Dev => "habitgrid-dev",
            Profile::Prod => "habitgrid",
        }
    }
}

/// Get the configuration directory path
/// If profile is Dev, uses "habitgrid-dev" instead of "habitgrid"
pub fn get_config_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "habitgrid", profile.app_name())
        .map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the data directory path (database and logs live here)
pub fn get_data_dir(profile: Profile) -> Option<PathBuf> {
    ProjectDirs::from("com", "habitgrid", profile.app_name())
        .map(|dirs| dirs.data_dir().to_path_buf())
}

/// Expand `~` in a path string to the user's home directory
pub fn expand_path(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = BaseDirs::new().map(|d| d.home_dir().to_path_buf()) {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse a date string in ISO 8601 format (YYYY-MM-DD)
pub fn parse_date(date_str: &str) -> Result<NaiveDate, chrono::ParseError> {
    NaiveDate::parse_from_str(date_str.trim(), "%Y-%m-%d")
}

/// The viewer's current calendar date.
///
/// This is the only place the crate reads the wall clock for day bucketing;
/// everything downstream takes the date as a parameter.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Shift a date by whole days. Returns `None` only when the result leaves
/// chrono's representable range.
pub fn shift_days(date: NaiveDate, delta_days: i64) -> Option<NaiveDate> {
    Duration::try_days(delta_days).and_then(|delta| date.checked_add_signed(delta))
}

/// Monday of the week containing `date`. A Sunday belongs to the week that
/// started six days earlier.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    let offset = date.weekday().num_days_from_monday() as i64;
    shift_days(date, -offset).unwrap_or(date)
}

/// The `count` consecutive days ending at `end`, oldest first
pub fn trailing_days(end: NaiveDate, count: usize) -> Vec<NaiveDate> {
    (0..count as i64)
        .rev()
        .filter_map(|back| shift_days(end, -back))
        .collect()
}

/// Long human label, e.g. "Thursday, February 29"
pub fn format_long_date(date: NaiveDate) -> String {
    date.format("%A, %B %-d").to_string()
}

/// Parsed key binding information
#[derive(Debug, Clone)]
pub struct ParsedKeyBinding {
    pub key_code: crossterm::event::KeyCode,
    pub requires_ctrl: bool,
}

/// Parse a key binding string from config into a ParsedKeyBinding
/// Supports: single keys ("q", "n", "["), special keys ("Enter", "Left", "F5"),
/// and modifiers ("Ctrl+r")
pub fn parse_key_binding(key_str: &str) -> Result<ParsedKeyBinding, String> {
    let key_str = key_str.trim();

    if let Some(key_part) = key_str.strip_prefix("Ctrl+") {
        let key_code = parse_key_code(key_part)?;
        return Ok(ParsedKeyBinding {
            key_code,
            requires_ctrl: true,
        });
    }

    let key_code = parse_key_code(key_str)?;
    Ok(ParsedKeyBinding {
        key_code,
        requires_ctrl: false,
    })
}

/// Parse a key code from a string (without modifiers)
fn parse_key_code(key_str: &str) -> Result<crossterm::event::KeyCode, String> {
    use crossterm::event::KeyCode;

    match key_str {
        "Enter" => Ok(KeyCode::Enter),
        "Esc" | "Escape" => Ok(KeyCode::Esc),
        "Backspace" => Ok(KeyCode::Backspace),
        "Tab" => Ok(KeyCode::Tab),
        "Space" | " " => Ok(KeyCode::Char(' ')),
        "Left" => Ok(KeyCode::Left),
        "Right" => Ok(KeyCode::Right),
        "Up" => Ok(KeyCode::Up),
        "Down" => Ok(KeyCode::Down),
        "Home" => Ok(KeyCode::Home),
        "End" => Ok(KeyCode::End),
        "Delete" => Ok(KeyCode::Delete),
        _ => {
            if let Some(n) = key_str.strip_prefix('F').and_then(|n| n.parse::<u8>().ok()) {
                if (1..=12).contains(&n) {
                    return Ok(KeyCode::F(n));
                }
            }
            let mut chars = key_str.chars();
            match (chars.next(), chars.next()) {
                (Some(c), None) => Ok(KeyCode::Char(c)),
                _ => Err(format!("Unknown key binding: {}", key_str)),
            }
        }
    }
}

/// Check whether a key event matches a configured binding string
pub fn key_matches(binding: &str, key_event: &crossterm::event::KeyEvent) -> bool {
    use crossterm::event::KeyModifiers;

    match parse_key_binding(binding) {
        Ok(parsed) => {
            let ctrl = key_event.modifiers.contains(KeyModifiers::CONTROL);
            parsed.key_code == key_event.code && parsed.requires_ctrl == ctrl
        }
        Err(_) => false,
    }
}

/// Format a binding for help text and key hints ("Left" becomes "←")
pub fn format_key_binding_for_display(binding: &str) -> String {
    match binding.trim() {
        "Left" => "←".to_string(),
        "Right" => "→".to_string(),
        "Up" => "↑".to_string(),
        "Down" => "↓".to_string(),
        other => other.to_string(),
    }
}
