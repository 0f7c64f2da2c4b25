use ratatui::layout::{Alignment, Position, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::InputForm;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup::popup_area_fixed;
use crate::Config;

/// Popup with one line per field; the cursor sits at the end of the active one
pub fn render_input_modal(f: &mut Frame, area: Rect, form: &InputForm, config: &Config) {
    let theme = config.get_active_theme();
    let fg_color = parse_color(&theme.fg);
    let bg_color = parse_color(&theme.bg);
    let highlight_bg = parse_color(&theme.highlight_bg);
    let base = Style::default().fg(fg_color).bg(bg_color);

    // Borders, one row per field, blank row, hint row
    let height = form.fields.len() as u16 + 4;
    let popup_area = popup_area_fixed(area, 60, height);
    f.render_widget(Clear, popup_area);

    let label_width = form.fields.iter().map(|field| field.label.len()).max().unwrap_or(0);
    let mut lines: Vec<Line> = form
        .fields
        .iter()
        .enumerate()
        .map(|(i, field)| {
            let label_style = if i == form.current_field {
                Style::default()
                    .fg(get_contrast_text_color(highlight_bg))
                    .bg(highlight_bg)
                    .add_modifier(Modifier::BOLD)
            } else {
                base
            };
            Line::from(vec![
                Span::styled(format!("{:>width$}", field.label, width = label_width), label_style),
                Span::styled(": ", base),
                Span::styled(field.value.clone(), base),
            ])
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Enter: Save • Tab: Next field • Esc: Cancel", base)));

    let paragraph = Paragraph::new(lines).style(base).block(
        Block::default()
            .borders(Borders::ALL)
            .title(form.title())
            .title_alignment(Alignment::Center)
            .style(base),
    );
    f.render_widget(paragraph, popup_area);

    let value_len = form.value(form.current_field).chars().count() as u16;
    let cursor_x = popup_area.x + 1 + label_width as u16 + 2 + value_len;
    let cursor_y = popup_area.y + 1 + form.current_field as u16;
    if cursor_x < popup_area.right().saturating_sub(1) {
        f.set_cursor_position(Position::new(cursor_x, cursor_y));
    }
}
