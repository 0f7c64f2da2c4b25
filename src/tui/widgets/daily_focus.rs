use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Gauge, List, ListItem, ListState};
use ratatui::Frame;

use crate::dashboard::DashboardState;
use crate::metrics;
use crate::tui::app::Focus;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, percentage_color};
use crate::tui::widgets::habit_list::render_habit_list;
use crate::utils::format_long_date;
use crate::Config;

pub fn render_daily_focus(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    focus: Focus,
    habit_list_state: &mut ListState,
    task_list_state: &mut ListState,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));
    let highlight_bg = parse_color(&theme.highlight_bg);

    let [gauge_area, content_area] = Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(area);
    let [habits_area, tasks_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(content_area);

    let summary = metrics::day_summary(state.habits.len(), &state.logs, &state.tasks, state.selected_date);
    let title = if state.selected_date == state.today {
        format!("{} (today)", format_long_date(state.selected_date))
    } else {
        format_long_date(state.selected_date)
    };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(title).style(base))
        .gauge_style(Style::default().fg(percentage_color(summary.percentage)).bg(Color::DarkGray))
        .percent(summary.percentage.min(100) as u16)
        .label(format!(
            "{}/{} habits • {}/{} tasks",
            summary.habits_completed, summary.habits_total, summary.tasks_completed, summary.tasks_total
        ));
    f.render_widget(gauge, gauge_area);

    render_habit_list(f, habits_area, state, habit_list_state, focus == Focus::Habits, false, config);

    let tasks = metrics::tasks_on(&state.tasks, state.selected_date);
    let focused = focus == Focus::Tasks;
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Tasks ({}/{})", summary.tasks_completed, summary.tasks_total))
        .border_style(if focused { Style::default().fg(highlight_bg) } else { base })
        .style(base);

    if tasks.is_empty() {
        f.render_widget(List::new(vec![ListItem::new("No tasks for this day. Press a to add one.")]).block(block), tasks_area);
        return;
    }

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let (check, style) = if task.completed {
                ("[x] ", base.fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT))
            } else {
                ("[ ] ", base)
            };
            ListItem::new(Line::from(vec![Span::raw(check), Span::styled(task.title.as_str(), style)]))
        })
        .collect();

    let mut list = List::new(items).block(block);
    if focused {
        list = list.highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        );
    }
    f.render_stateful_widget(list, tasks_area, task_list_state);
}
