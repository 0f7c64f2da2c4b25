use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, ListState, Paragraph};
use ratatui::Frame;

use crate::dashboard::DashboardState;
use crate::metrics::Kpis;
use crate::tui::widgets::color::{parse_color, percentage_color};
use crate::tui::widgets::habit_list::render_habit_list;
use crate::Config;

/// Four KPI cards above the habit list
pub fn render_overview(f: &mut Frame, area: Rect, state: &DashboardState, list_state: &mut ListState, config: &Config) {
    let [cards_area, list_area] = Layout::vertical([Constraint::Length(4), Constraint::Min(3)]).areas(area);

    let kpis = Kpis::compute(state.habits.len(), &state.logs, state.today);
    render_kpi_cards(f, cards_area, &kpis, config);
    render_habit_list(f, list_area, state, list_state, true, true, config);
}

fn render_kpi_cards(f: &mut Frame, area: Rect, kpis: &Kpis, config: &Config) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let streak_unit = if kpis.current_streak == 1 { "day" } else { "days" };
    let cards = [
        ("Today", format!("{}/{}", kpis.completed_today, kpis.total_habits), None),
        ("Completion", format!("{}%", kpis.completion_rate), Some(kpis.completion_rate)),
        ("Streak", format!("{} {}", kpis.current_streak, streak_unit), None),
        ("Last 30 days", format!("{}%", kpis.monthly_rate), Some(kpis.monthly_rate)),
    ];

    let areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(area);
    for ((title, value, percentage), card_area) in cards.into_iter().zip(areas.iter()) {
        let value_style = match percentage {
            Some(p) => base.fg(percentage_color(p)),
            None => base,
        }
        .add_modifier(Modifier::BOLD);

        let card = Paragraph::new(vec![Line::styled(value, value_style)])
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(title).style(base));
        f.render_widget(card, *card_area);
    }
}
