//! Derived progress metrics.
//!
//! Everything here is a pure function over borrowed collections. Reference
//! dates are always passed in; nothing reads the clock.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::models::{HabitLog, LogStatus, Task};
use crate::utils::{shift_days, trailing_days};

/// Length of the trailing window used by [`monthly_rate`], in days
pub const MONTHLY_WINDOW_DAYS: i64 = 30;

/// Number of days in the per-habit sparkline and the weekly grid
pub const WEEK_DAYS: usize = 7;

/// Rounded percentage, 0 when there is nothing to divide by
pub fn percentage(part: usize, whole: usize) -> u32 {
    if whole == 0 {
        return 0;
    }
    ((part as f64 / whole as f64) * 100.0).round() as u32
}

/// Status logged for a habit on a date, if any.
/// At most one log exists per (habit, date), so the first match is the only one.
pub fn status_for(habit_id: i64, date: NaiveDate, logs: &[HabitLog]) -> Option<LogStatus> {
    logs.iter()
        .find(|log| log.habit_id == habit_id && log.date == date)
        .map(|log| log.status)
}

/// Completed logs dated `date`, across all habits
pub fn completed_on(logs: &[HabitLog], date: NaiveDate) -> usize {
    logs.iter()
        .filter(|log| log.date == date && log.status == LogStatus::Completed)
        .count()
}

pub fn completion_rate(habit_count: usize, logs: &[HabitLog], date: NaiveDate) -> u32 {
    percentage(completed_on(logs, date), habit_count)
}

/// Consecutive days ending at `reference` with at least one completed log.
/// Zero when `reference` itself has no completion.
pub fn current_streak(logs: &[HabitLog], reference: NaiveDate) -> u32 {
    let completed_days: HashSet<NaiveDate> = logs
        .iter()
        .filter(|log| log.status == LogStatus::Completed)
        .map(|log| log.date)
        .collect();

    let mut streak = 0;
    let mut day = Some(reference);
    while let Some(current) = day {
        if !completed_days.contains(&current) {
            break;
        }
        streak += 1;
        day = current.pred_opt();
    }
    streak
}

/// Completion over the window `[reference - 30 days, reference]`.
///
/// The denominator is a fixed `habit_count * 30` slots regardless of how long
/// each habit has existed, so young habits read low.
pub fn monthly_rate(habit_count: usize, logs: &[HabitLog], reference: NaiveDate) -> u32 {
    let Some(window_start) = shift_days(reference, -MONTHLY_WINDOW_DAYS) else {
        return 0;
    };
    let completed = logs
        .iter()
        .filter(|log| log.status == LogStatus::Completed)
        .filter(|log| log.date >= window_start && log.date <= reference)
        .count();
    percentage(completed, habit_count * MONTHLY_WINDOW_DAYS as usize)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayProgress {
    pub date: NaiveDate,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekProgress {
    pub days: Vec<DayProgress>,
    pub completed: usize,
    pub total: usize,
    pub percentage: u32,
}

pub fn day_progress(habit_count: usize, logs: &[HabitLog], date: NaiveDate) -> DayProgress {
    let completed = completed_on(logs, date);
    DayProgress {
        date,
        completed,
        total: habit_count,
        percentage: percentage(completed, habit_count),
    }
}

/// Seven day buckets starting at `week_start` plus the week-level rate
pub fn weekly_aggregate(habit_count: usize, logs: &[HabitLog], week_start: NaiveDate) -> WeekProgress {
    let days: Vec<DayProgress> = (0..WEEK_DAYS as i64)
        .filter_map(|offset| shift_days(week_start, offset))
        .map(|date| day_progress(habit_count, logs, date))
        .collect();

    let completed = days.iter().map(|day| day.completed).sum();
    let total = days.iter().map(|day| day.total).sum();

    WeekProgress {
        days,
        completed,
        total,
        percentage: percentage(completed, total),
    }
}

/// Last seven statuses of one habit, oldest first, ending at `today`
pub fn weekly_series(habit_id: i64, logs: &[HabitLog], today: NaiveDate) -> Vec<Option<LogStatus>> {
    trailing_days(today, WEEK_DAYS)
        .into_iter()
        .map(|date| status_for(habit_id, date, logs))
        .collect()
}

/// Habit and task completion for a single date (the daily focus header)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySummary {
    pub date: NaiveDate,
    pub habits_completed: usize,
    pub habits_total: usize,
    pub tasks_completed: usize,
    pub tasks_total: usize,
    pub percentage: u32,
}

pub fn day_summary(habit_count: usize, logs: &[HabitLog], tasks: &[Task], date: NaiveDate) -> DaySummary {
    let habits_completed = completed_on(logs, date);
    let day_tasks = tasks_on(tasks, date);
    DaySummary {
        date,
        habits_completed,
        habits_total: habit_count,
        tasks_completed: day_tasks.iter().filter(|task| task.completed).count(),
        tasks_total: day_tasks.len(),
        percentage: percentage(habits_completed, habit_count),
    }
}

/// Tasks scheduled on `date`, in collection order
pub fn tasks_on(tasks: &[Task], date: NaiveDate) -> Vec<&Task> {
    tasks.iter().filter(|task| task.date == date).collect()
}

/// Headline numbers shown on the overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Kpis {
    pub completed_today: usize,
    pub total_habits: usize,
    pub completion_rate: u32,
    pub current_streak: u32,
    pub monthly_rate: u32,
}

impl Kpis {
    pub fn compute(habit_count: usize, logs: &[HabitLog], today: NaiveDate) -> Self {
        Self {
            completed_today: completed_on(logs, today),
            total_habits: habit_count,
            completion_rate: completion_rate(habit_count, logs, today),
            current_streak: current_streak(logs, today),
            monthly_rate: monthly_rate(habit_count, logs, today),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn log(habit_id: i64, date: NaiveDate, status: LogStatus) -> HabitLog {
        HabitLog::new(habit_id, date, status)
    }

    #[test]
    fn completion_rate_is_zero_without_habits() {
        let day = d(2024, 1, 1);
        let logs = vec![log(1, day, LogStatus::Completed), log(2, day, LogStatus::Completed)];
        assert_eq!(completion_rate(0, &logs, day), 0);
        assert_eq!(completion_rate(0, &[], day), 0);
    }

    #[test]
    fn completion_rate_half_done() {
        let day = d(2024, 1, 1);
        let logs = vec![log(1, day, LogStatus::Completed), log(2, day, LogStatus::Missed)];
        assert_eq!(completion_rate(2, &logs, day), 50);
        assert_eq!(completion_rate(3, &logs, day), 33);
    }

    #[test]
    fn no_logs_means_no_status_and_zero_rate() {
        let day = d(2024, 5, 10);
        for habit_id in 1..=3 {
            assert_eq!(status_for(habit_id, day, &[]), None);
        }
        assert_eq!(completion_rate(3, &[], day), 0);
    }

    #[test]
    fn status_lookup_matches_habit_and_date() {
        let day = d(2024, 5, 10);
        let logs = vec![
            log(1, day, LogStatus::Skipped),
            log(2, day, LogStatus::Completed),
            log(1, d(2024, 5, 9), LogStatus::Missed),
        ];
        assert_eq!(status_for(1, day, &logs), Some(LogStatus::Skipped));
        assert_eq!(status_for(2, day, &logs), Some(LogStatus::Completed));
        assert_eq!(status_for(2, d(2024, 5, 9), &logs), None);
    }

    #[test]
    fn streak_counts_back_until_first_gap() {
        let today = d(2024, 3, 2);
        let logs = vec![
            log(1, d(2024, 3, 2), LogStatus::Completed),
            log(1, d(2024, 3, 1), LogStatus::Completed),
            log(2, d(2024, 2, 29), LogStatus::Completed),
            log(1, d(2024, 2, 28), LogStatus::Missed),
            log(1, d(2024, 2, 27), LogStatus::Completed),
        ];
        assert_eq!(current_streak(&logs, today), 3);
    }

    #[test]
    fn streak_with_empty_yesterday_is_one() {
        let today = d(2024, 3, 2);
        let logs = vec![
            log(1, today, LogStatus::Completed),
            log(1, d(2024, 2, 29), LogStatus::Completed),
        ];
        assert_eq!(current_streak(&logs, today), 1);
    }

    #[test]
    fn streak_is_zero_when_today_has_no_completion() {
        let today = d(2024, 3, 2);
        let logs = vec![
            log(1, today, LogStatus::Skipped),
            log(1, d(2024, 3, 1), LogStatus::Completed),
            log(1, d(2024, 2, 29), LogStatus::Completed),
        ];
        assert_eq!(current_streak(&logs, today), 0);
    }

    #[test]
    fn monthly_rate_uses_fixed_thirty_slot_denominator() {
        let today = d(2024, 3, 31);
        let logs = vec![
            log(1, today, LogStatus::Completed),
            log(2, today, LogStatus::Completed),
            log(1, d(2024, 3, 1), LogStatus::Completed), // exactly 30 days back, inside
            log(1, d(2024, 2, 29), LogStatus::Completed), // outside
            log(1, d(2024, 4, 1), LogStatus::Completed),  // after reference, outside
            log(2, d(2024, 3, 15), LogStatus::Missed),
        ];
        // 3 completed / (2 habits * 30)
        assert_eq!(monthly_rate(2, &logs, today), 5);
        assert_eq!(monthly_rate(0, &logs, today), 0);
    }

    #[test]
    fn weekly_totals_equal_habits_times_seven() {
        let monday = d(2024, 1, 1);
        let logs = vec![
            log(1, d(2024, 1, 1), LogStatus::Completed),
            log(2, d(2024, 1, 1), LogStatus::Completed),
            log(1, d(2024, 1, 3), LogStatus::Completed),
            log(1, d(2024, 1, 7), LogStatus::Skipped),
            log(1, d(2024, 1, 8), LogStatus::Completed), // next week
        ];
        let week = weekly_aggregate(3, &logs, monday);
        assert_eq!(week.days.len(), 7);
        assert_eq!(week.total, 3 * 7);
        assert_eq!(week.days.iter().map(|day| day.total).sum::<usize>(), week.total);
        assert_eq!(week.completed, 3);
        assert_eq!(week.percentage, 14);
        assert_eq!(week.days[0].percentage, 67);
        assert_eq!(week.days[6].date, d(2024, 1, 7));
        assert_eq!(week.days[6].completed, 0);
    }

    #[test]
    fn weekly_aggregate_without_habits_is_zero() {
        let week = weekly_aggregate(0, &[], d(2024, 1, 1));
        assert_eq!(week.total, 0);
        assert_eq!(week.percentage, 0);
    }

    #[test]
    fn weekly_series_ends_today() {
        let today = d(2024, 3, 2);
        let logs = vec![
            log(4, today, LogStatus::Completed),
            log(4, d(2024, 2, 25), LogStatus::Missed),
            log(4, d(2024, 2, 24), LogStatus::Completed), // eight days back
            log(5, d(2024, 2, 29), LogStatus::Skipped),
        ];
        let series = weekly_series(4, &logs, today);
        assert_eq!(series.len(), 7);
        assert_eq!(series[0], Some(LogStatus::Missed));
        assert_eq!(series[6], Some(LogStatus::Completed));
        assert!(series[1..6].iter().all(Option::is_none));
    }

    #[test]
    fn day_summary_counts_tasks_for_the_date_only() {
        let day = d(2024, 6, 1);
        let mut done = Task::new("Stretch".to_string(), day);
        done.completed = true;
        let open = Task::new("Call mom".to_string(), day);
        let other = Task::new("Later".to_string(), d(2024, 6, 2));
        let tasks = vec![done, open, other];
        let logs = vec![log(1, day, LogStatus::Completed)];

        let summary = day_summary(4, &logs, &tasks, day);
        assert_eq!(summary.habits_completed, 1);
        assert_eq!(summary.tasks_total, 2);
        assert_eq!(summary.tasks_completed, 1);
        assert_eq!(summary.percentage, 25);
    }
}
