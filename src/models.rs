use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Color assigned to habits created without one
pub const DEFAULT_HABIT_COLOR: &str = "#6366F1";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Habit {
    pub id: Option<i64>,
    pub user_id: String,
    pub name: String,
    pub description: Option<String>,
    pub color: String,      // #RRGGBB, #RGB or a named terminal color
    pub created_at: String, // YYYY-MM-DD HH:MM:SS (UTC)
}

/// Daily outcome recorded for a habit
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogStatus {
    Completed,
    Missed,
    Skipped,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitLog {
    pub id: Option<i64>,
    pub habit_id: i64,
    pub user_id: String,
    pub date: NaiveDate, // serialized as YYYY-MM-DD
    pub status: LogStatus,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Option<i64>,
    pub user_id: String,
    pub title: String,
    pub date: NaiveDate,
    pub completed: bool,
    pub created_at: String,
}

/// Partial update for a habit; `None` leaves the field untouched
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HabitPatch {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub color: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogPatch {
    pub status: Option<LogStatus>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub date: Option<NaiveDate>,
    pub completed: Option<bool>,
}

/// `#RGB`, `#RRGGBB`, or a plain ASCII color name such as `cyan`
pub fn is_valid_color(color: &str) -> bool {
    match color.strip_prefix('#') {
        Some(hex) => matches!(hex.len(), 3 | 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => !color.is_empty() && color.chars().all(|c| c.is_ascii_alphabetic()),
    }
}

fn timestamp_now() -> String {
    chrono::Utc::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

impl Habit {
    /// Build an unsaved habit. `user_id` is filled in by the store from its session.
    pub fn new(name: String) -> Self {
        Self {
            id: None,
            user_id: String::new(),
            name,
            description: None,
            color: DEFAULT_HABIT_COLOR.to_string(),
            created_at: timestamp_now(),
        }
    }
}

impl HabitLog {
    pub fn new(habit_id: i64, date: NaiveDate, status: LogStatus) -> Self {
        Self {
            id: None,
            habit_id,
            user_id: String::new(),
            date,
            status,
        }
    }
}

impl Task {
    pub fn new(title: String, date: NaiveDate) -> Self {
        Self {
            id: None,
            user_id: String::new(),
            title,
            date,
            completed: false,
            created_at: timestamp_now(),
        }
    }
}

impl LogStatus {
    pub const ALL: [LogStatus; 3] = [LogStatus::Completed, LogStatus::Skipped, LogStatus::Missed];

    pub fn as_str(&self) -> &'static str {
        match self {
            LogStatus::Completed => "completed",
            LogStatus::Missed => "missed",
            LogStatus::Skipped => "skipped",
        }
    }

    /// One-character glyph used in grids and sparklines
    pub fn glyph(&self) -> &'static str {
        match self {
            LogStatus::Completed => "✓",
            LogStatus::Missed => "✗",
            LogStatus::Skipped => "–",
        }
    }
}

impl fmt::Display for LogStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LogStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "completed" | "done" | "c" => Ok(LogStatus::Completed),
            "missed" | "x" => Ok(LogStatus::Missed),
            "skipped" | "skip" | "s" => Ok(LogStatus::Skipped),
            other => Err(format!("unknown status '{}' (expected completed, missed or skipped)", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_parses_aliases() {
        assert_eq!("Completed".parse::<LogStatus>(), Ok(LogStatus::Completed));
        assert_eq!("skip".parse::<LogStatus>(), Ok(LogStatus::Skipped));
        assert_eq!(" x ".parse::<LogStatus>(), Ok(LogStatus::Missed));
        assert!("maybe".parse::<LogStatus>().is_err());
    }

    #[test]
    fn color_validation() {
        assert!(is_valid_color("#22C55E"));
        assert!(is_valid_color("#abc"));
        assert!(is_valid_color("lightcyan"));
        assert!(!is_valid_color("#1é234"));
        assert!(!is_valid_color("#é1"));
        assert!(!is_valid_color("#1234"));
        assert!(!is_valid_color("light blue"));
    }

    #[test]
    fn log_serializes_with_canonical_date_and_lowercase_status() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let log = HabitLog::new(7, date, LogStatus::Skipped);
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json["date"], "2024-01-01");
        assert_eq!(json["status"], "skipped");
    }
}
