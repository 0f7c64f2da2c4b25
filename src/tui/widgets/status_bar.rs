use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::Config;

pub enum StatusMessage<'a> {
    Info(&'a str),
    Error(&'a str),
}

pub fn render_status_bar(
    f: &mut Frame,
    area: Rect,
    message: Option<StatusMessage<'_>>,
    key_hints: &[String],
    config: &Config,
) {
    let theme = config.get_active_theme();
    let max_width = area.width as usize;

    let (content, style) = match message {
        Some(StatusMessage::Error(msg)) => {
            let bg = parse_color(&theme.error_bg);
            let style = Style::default()
                .fg(get_contrast_text_color(bg))
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            (truncate(msg, max_width), style)
        }
        Some(StatusMessage::Info(msg)) => {
            let bg = parse_color(&theme.highlight_bg);
            let style = Style::default()
                .fg(get_contrast_text_color(bg))
                .bg(bg)
                .add_modifier(Modifier::BOLD);
            (truncate(msg, max_width), style)
        }
        None => (
            fit_hints(key_hints, max_width),
            Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)),
        ),
    };

    f.render_widget(Paragraph::new(content).style(style), area);
}

fn truncate(text: &str, max_width: usize) -> String {
    if text.chars().count() <= max_width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(max_width.saturating_sub(3)).collect();
    out.push_str("...");
    out
}

/// Join as many hints as fit, ending with "..." when some were dropped
pub fn fit_hints(key_hints: &[String], max_width: usize) -> String {
    const SEPARATOR: &str = " • ";
    const ELLIPSIS: &str = "...";

    let mut text = String::new();
    for (i, hint) in key_hints.iter().enumerate() {
        let current = text.chars().count();
        let added = if i == 0 {
            hint.chars().count()
        } else {
            SEPARATOR.chars().count() + hint.chars().count()
        };

        if current + added > max_width {
            if i == 0 {
                return truncate(hint, max_width);
            }
            if current + ELLIPSIS.len() <= max_width {
                text.push_str(ELLIPSIS);
            } else {
                text = truncate(&text, max_width);
            }
            break;
        }

        if i > 0 {
            text.push_str(SEPARATOR);
        }
        text.push_str(hint);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hints() -> Vec<String> {
        vec!["q: Quit".to_string(), "n: New habit".to_string(), "F1: Help".to_string()]
    }

    #[test]
    fn all_hints_fit() {
        assert_eq!(fit_hints(&hints(), 80), "q: Quit • n: New habit • F1: Help");
    }

    #[test]
    fn overflow_ends_with_ellipsis() {
        let text = fit_hints(&hints(), 25);
        assert_eq!(text, "q: Quit • n: New habit...");
        assert!(text.chars().count() <= 25);
    }

    #[test]
    fn first_hint_alone_is_truncated() {
        assert_eq!(fit_hints(&hints(), 5), "q:...");
    }
}
