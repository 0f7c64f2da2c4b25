use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table};
use ratatui::Frame;

use crate::dashboard::DashboardState;
use crate::metrics::{self, DayProgress};
use crate::tui::widgets::color::{parse_color, percentage_color};
use crate::tui::widgets::habit_list::status_span;
use crate::utils::week_start;
use crate::Config;

/// Monday-to-Sunday week containing the selected day: one card per day and a habit grid
pub fn render_weekly(f: &mut Frame, area: Rect, state: &DashboardState, config: &Config) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let start = week_start(state.selected_date);
    let week = metrics::weekly_aggregate(state.habits.len(), &state.logs, start);

    let [cards_area, grid_area] = Layout::vertical([Constraint::Length(6), Constraint::Min(3)]).areas(area);

    let card_areas = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(cards_area);
    for (day, card_area) in week.days.iter().zip(card_areas.iter()) {
        f.render_widget(day_card(day, state, base), *card_area);
    }

    let mut header = vec![Cell::from("Habit")];
    header.extend(week.days.iter().map(|day| {
        let label = day.date.format("%a").to_string();
        if day.date == state.selected_date {
            Cell::from(label).style(base.add_modifier(Modifier::BOLD | Modifier::UNDERLINED))
        } else {
            Cell::from(label)
        }
    }));

    let rows: Vec<Row> = state
        .habits
        .iter()
        .map(|habit| {
            let id = habit.id.unwrap_or_default();
            let mut cells = vec![Cell::from(habit.name.as_str()).style(base.fg(parse_color(&habit.color)))];
            cells.extend(
                week.days
                    .iter()
                    .map(|day| Cell::from(Line::from(status_span(metrics::status_for(id, day.date, &state.logs))))),
            );
            Row::new(cells)
        })
        .collect();

    let mut widths = vec![Constraint::Min(12)];
    widths.extend([Constraint::Length(4); 7]);

    let title = format!(
        "Week of {} · {}/{} ({}%)",
        start.format("%b %-d"),
        week.completed,
        week.total,
        week.percentage
    );
    let table = Table::new(rows, widths)
        .header(Row::new(header).style(base.add_modifier(Modifier::BOLD)))
        .block(Block::default().borders(Borders::ALL).title(title).style(base))
        .style(base);
    f.render_widget(table, grid_area);
}

fn day_card<'a>(day: &DayProgress, state: &DashboardState, base: Style) -> Paragraph<'a> {
    let mut title_style = base;
    if day.date == state.today {
        title_style = title_style.add_modifier(Modifier::BOLD);
    }
    let border_style = if day.date == state.selected_date {
        base.add_modifier(Modifier::BOLD)
    } else {
        base
    };

    Paragraph::new(vec![
        Line::from(day.date.format("%-d %b").to_string()),
        Line::from(format!("{}/{}", day.completed, day.total)),
        Line::styled(
            format!("{}%", day.percentage),
            base.fg(percentage_color(day.percentage)).add_modifier(Modifier::BOLD),
        ),
    ])
    .alignment(Alignment::Center)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(Line::styled(day.date.format("%a").to_string(), title_style))
            .border_style(border_style)
            .style(base),
    )
}
