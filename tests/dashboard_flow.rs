use chrono::NaiveDate;
use habitgrid::badges::{self, BadgeState};
use habitgrid::metrics::{self, Kpis};
use habitgrid::models::HabitPatch;
use habitgrid::{Dashboard, Database, ErrorKind, HabitStore, LogStatus, Session, View};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn dashboard(user: &str, today: NaiveDate) -> Dashboard<Database> {
    let db = Database::open_in_memory(Session::new(user).unwrap()).unwrap();
    let mut dashboard = Dashboard::new(db, today);
    dashboard.load().unwrap();
    dashboard
}

fn habit_id(dashboard: &Dashboard<Database>, name: &str) -> i64 {
    dashboard
        .state()
        .habits
        .iter()
        .find(|habit| habit.name == name)
        .and_then(|habit| habit.id)
        .unwrap()
}

#[test]
fn a_week_of_logging_drives_metrics() {
    let today = d(2024, 1, 7); // Sunday
    let mut dashboard = dashboard("ana", today);
    dashboard.add_habit("Read", None, None).unwrap();
    dashboard.add_habit("Walk", Some("after lunch"), Some("#22C55E")).unwrap();
    let read = habit_id(&dashboard, "Read");
    let walk = habit_id(&dashboard, "Walk");

    for day in 1..=7 {
        dashboard.log_status(read, d(2024, 1, day), LogStatus::Completed).unwrap();
    }
    dashboard.log_status(walk, d(2024, 1, 7), LogStatus::Missed).unwrap();

    let state = dashboard.state();
    assert_eq!(state.habits[0].name, "Walk");
    assert_eq!(state.habits[0].color, "#22C55E");
    assert_eq!(state.logs.len(), 8);
    assert_eq!(state.logs[0].date, d(2024, 1, 7));

    let kpis = Kpis::compute(state.habits.len(), &state.logs, today);
    assert_eq!(kpis.completed_today, 1);
    assert_eq!(kpis.completion_rate, 50);
    assert_eq!(kpis.current_streak, 7);
    // 7 completions over 2 habits x 30 days, rounded
    assert_eq!(kpis.monthly_rate, 12);

    let week = metrics::weekly_aggregate(state.habits.len(), &state.logs, d(2024, 1, 1));
    assert_eq!(week.total, 14);
    assert_eq!(week.completed, 7);
    assert_eq!(week.percentage, 50);

    let series = metrics::weekly_series(walk, &state.logs, today);
    assert_eq!(series[6], Some(LogStatus::Missed));
    assert!(series[..6].iter().all(Option::is_none));

    let badges = badges::evaluate(&state.habits);
    assert_eq!(badges[0].state, BadgeState::Earned);
    assert!(badges[1..].iter().all(|badge| badge.state == BadgeState::NotComputed));
}

#[test]
fn deleting_a_habit_removes_its_logs() {
    let mut dashboard = dashboard("ana", d(2024, 2, 29));
    dashboard.add_habit("Read", None, None).unwrap();
    let read = habit_id(&dashboard, "Read");
    dashboard.log_status(read, d(2024, 2, 29), LogStatus::Completed).unwrap();

    dashboard.delete_habit(read).unwrap();

    assert!(dashboard.state().habits.is_empty());
    assert!(dashboard.state().logs.is_empty());
}

#[test]
fn edit_keeps_logs_and_renames() {
    let mut dashboard = dashboard("ana", d(2024, 2, 29));
    dashboard.add_habit("Read", Some("10 pages"), None).unwrap();
    let read = habit_id(&dashboard, "Read");
    dashboard.log_status(read, d(2024, 2, 29), LogStatus::Skipped).unwrap();

    let patch = HabitPatch {
        name: Some("Read more".to_string()),
        description: Some(None),
        ..Default::default()
    };
    dashboard.edit_habit(read, patch).unwrap();

    let state = dashboard.state();
    assert_eq!(state.habits[0].name, "Read more");
    assert_eq!(state.habits[0].description, None);
    assert_eq!(state.logs.len(), 1);
}

#[test]
fn tasks_follow_the_selected_day() {
    let mut dashboard = dashboard("ana", d(2024, 2, 28));
    dashboard.add_task("Buy stamps", d(2024, 2, 28)).unwrap();

    let next = dashboard.change_date(1);
    assert_eq!(next, d(2024, 2, 29));
    dashboard.add_task("Leap day walk", next).unwrap();
    dashboard.add_task("  ", next).unwrap();

    let state = dashboard.state();
    assert_eq!(state.tasks.len(), 2);
    let leap_tasks = metrics::tasks_on(&state.tasks, next);
    assert_eq!(leap_tasks.len(), 1);
    assert_eq!(leap_tasks[0].title, "Leap day walk");

    let id = leap_tasks[0].id.unwrap();
    dashboard.toggle_task(id, true).unwrap();
    let summary = metrics::day_summary(0, &dashboard.state().logs, &dashboard.state().tasks, next);
    assert_eq!((summary.tasks_completed, summary.tasks_total), (1, 1));
    assert_eq!(summary.percentage, 0);
}

#[test]
fn missing_records_surface_not_found() {
    let mut dashboard = dashboard("ana", d(2024, 2, 29));
    dashboard.add_task("Stretch", d(2024, 2, 29)).unwrap();

    let err = dashboard.toggle_task(999, true).unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
    assert_eq!(dashboard.state().last_error.as_ref(), Some(&err));
    assert_eq!(dashboard.state().tasks.len(), 1);
    assert!(!dashboard.can_retry());

    // Next success clears the error
    dashboard.load().unwrap();
    assert!(dashboard.state().last_error.is_none());
}

#[test]
fn view_navigation_does_not_touch_data() {
    let mut dashboard = dashboard("ana", d(2024, 2, 29));
    dashboard.add_habit("Read", None, None).unwrap();
    let before = dashboard.state().habits.clone();

    dashboard.next_view();
    assert_eq!(dashboard.state().view, View::DailyFocus);
    dashboard.select_view(View::Badges);
    dashboard.previous_view();
    assert_eq!(dashboard.state().view, View::Weekly);
    assert_eq!(dashboard.state().habits, before);
}

#[test]
fn store_reports_its_session() {
    let dashboard = dashboard("ana", d(2024, 2, 29));
    assert_eq!(dashboard.store().session().user_id(), "ana");
}
