use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::badges::{self, BadgeState};
use crate::dashboard::DashboardState;
use crate::tui::widgets::color::parse_color;
use crate::Config;

pub fn render_badges(f: &mut Frame, area: Rect, state: &DashboardState, config: &Config) {
    let theme = config.get_active_theme();
    let base = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let badges = badges::evaluate(&state.habits);
    let earned = badges.iter().filter(|badge| badge.is_earned()).count();

    let items: Vec<ListItem> = badges
        .iter()
        .map(|badge| {
            let (mark, label, style) = match badge.state {
                BadgeState::Earned => ("★", "earned", base.fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                BadgeState::Locked => ("☆", "locked", base.fg(Color::DarkGray)),
                BadgeState::NotComputed => ("?", "not tracked yet", base.fg(Color::DarkGray)),
            };
            ListItem::new(vec![
                Line::from(vec![
                    Span::styled(format!("{} ", mark), style),
                    Span::styled(badge.title, style),
                    Span::styled(format!("  ({})", label), base.fg(Color::DarkGray)),
                ]),
                Line::from(Span::styled(format!("  {}", badge.description), base)),
            ])
        })
        .collect();

    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!("Badges · {} of {} earned", earned, badges.len()))
            .style(base),
    );
    f.render_widget(list, area);
}
