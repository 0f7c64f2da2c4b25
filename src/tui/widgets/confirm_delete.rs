use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::app::DeleteTarget;
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup::popup_area;
use crate::Config;

pub fn render_confirm_delete(f: &mut Frame, area: Rect, target: &DeleteTarget, config: &Config) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup_area = popup_area(area, 50, 30);
    f.render_widget(Clear, popup_area);

    let (question, name, consequence) = match target {
        DeleteTarget::Habit { name, .. } => (
            "Delete this habit?",
            name.as_str(),
            "All of its logged days are removed too.",
        ),
        DeleteTarget::Task { title, .. } => ("Delete this task?", title.as_str(), ""),
    };

    let lines = vec![
        Line::from(Span::styled(question, style)),
        Line::from(""),
        Line::from(Span::styled(name.to_string(), style.add_modifier(Modifier::BOLD))),
        Line::from(Span::styled(consequence, style)),
        Line::from(""),
        Line::from(Span::styled("y/Enter: Delete • n/Esc: Cancel", style)),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm Delete")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup_area);
}
