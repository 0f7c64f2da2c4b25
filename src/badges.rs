use serde::{Deserialize, Serialize};

use crate::models::Habit;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BadgeState {
    Earned,
    Locked,
    /// Declared but never evaluated; streak badges are not wired to streak data yet
    NotComputed,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Badge {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub state: BadgeState,
}

impl Badge {
    pub fn is_earned(&self) -> bool {
        self.state == BadgeState::Earned
    }
}

/// Evaluate the fixed badge set against the current habits
pub fn evaluate(habits: &[Habit]) -> Vec<Badge> {
    let first_habit = if habits.is_empty() {
        BadgeState::Locked
    } else {
        BadgeState::Earned
    };

    vec![
        Badge {
            id: "first-habit",
            title: "First Step",
            description: "Create your first habit",
            state: first_habit,
        },
        // TODO: evaluate against metrics::current_streak once the threshold semantics are settled
        Badge {
            id: "3-day-streak",
            title: "3-Day Streak",
            description: "Complete habits for 3 days in a row",
            state: BadgeState::NotComputed,
        },
        Badge {
            id: "7-day-streak",
            title: "7-Day Streak",
            description: "Complete habits for 7 days in a row",
            state: BadgeState::NotComputed,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_step_follows_habit_count() {
        assert_eq!(evaluate(&[])[0].state, BadgeState::Locked);
        let habits = vec![Habit::new("Read".to_string())];
        let badges = evaluate(&habits);
        assert!(badges[0].is_earned());
    }

    #[test]
    fn streak_badges_stay_uncomputed() {
        let habits = vec![Habit::new("Read".to_string())];
        let badges = evaluate(&habits);
        assert_eq!(badges.len(), 3);
        assert!(badges[1..].iter().all(|b| b.state == BadgeState::NotComputed));
    }
}
