use chrono::NaiveDate;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState};
use ratatui::Frame;

use crate::dashboard::DashboardState;
use crate::metrics;
use crate::models::{Habit, LogStatus};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color, status_color};
use crate::Config;

pub fn status_span<'a>(status: Option<LogStatus>) -> Span<'a> {
    match status {
        Some(status) => Span::styled(status.glyph(), Style::default().fg(status_color(status))),
        None => Span::styled("·", Style::default().fg(Color::DarkGray)),
    }
}

fn habit_line<'a>(habit: &'a Habit, state: &DashboardState, show_series: bool) -> Line<'a> {
    let id = habit.id.unwrap_or_default();
    let mut spans = vec![
        Span::styled("● ", Style::default().fg(parse_color(&habit.color))),
        status_span(metrics::status_for(id, state.selected_date, &state.logs)),
        Span::raw(" "),
    ];
    if show_series {
        // Always the seven days ending today, independent of the selected day
        spans.extend(
            metrics::weekly_series(id, &state.logs, state.today)
                .into_iter()
                .map(status_span),
        );
        spans.push(Span::raw("  "));
    }
    spans.push(Span::raw(habit.name.as_str()));
    if let Some(ref description) = habit.description {
        spans.push(Span::styled(format!("  {}", description), Style::default().fg(Color::DarkGray)));
    }
    Line::from(spans)
}

fn title_for(selected_date: NaiveDate, today: NaiveDate, count: usize) -> String {
    if selected_date == today {
        format!("Habits ({}) · today", count)
    } else {
        format!("Habits ({}) · {}", count, selected_date)
    }
}

/// Habit rows: color dot, status on the selected day, optional last-7-days strip, name
pub fn render_habit_list(
    f: &mut Frame,
    area: Rect,
    state: &DashboardState,
    list_state: &mut ListState,
    focused: bool,
    show_series: bool,
    config: &Config,
) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(title_for(state.selected_date, state.today, state.habits.len()))
        .border_style(if focused {
            Style::default().fg(highlight_bg)
        } else {
            Style::default().fg(fg_color)
        })
        .style(Style::default().fg(fg_color).bg(bg_color));

    if state.habits.is_empty() {
        let message = if state.loading { "Loading..." } else { "No habits yet. Press n to add one." };
        let list = List::new(vec![ListItem::new(message)]).block(block);
        f.render_widget(list, area);
        return;
    }

    let items: Vec<ListItem> = state
        .habits
        .iter()
        .map(|habit| ListItem::new(habit_line(habit, state, show_series)))
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
    f.render_stateful_widget(list, area, list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn line_borrows_name_after_series() {
        let today = NaiveDate::from_ymd_opt(2024, 2, 29).unwrap();
        let state = DashboardState::new(today);
        let mut habit = Habit::new("Read".to_string());
        habit.id = Some(1);
        habit.description = Some("20 pages".to_string());

        let line = habit_line(&habit, &state, true);
        let text: String = line.spans.iter().map(|span| span.content.as_ref()).collect();
        assert!(text.ends_with("Read  20 pages"));
        assert_eq!(text.matches('·').count(), 8);
    }
}
