use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup::popup_area;
use crate::utils::format_key_binding_for_display as key;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let theme = config.get_active_theme();
    let style = Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg));

    let popup_area = popup_area(area, 60, 80);
    f.render_widget(Clear, popup_area);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(style),
        )
        .style(style)
        .wrap(Wrap { trim: false });

    f.render_widget(paragraph, popup_area);
}

fn build_help_text(config: &Config) -> String {
    let k = &config.key_bindings;
    let mut text = String::new();

    text.push_str("Views:\n");
    text.push_str(&format!(
        "  {} {} {} {}: Overview, Daily Focus, Weekly, Badges\n",
        key(&k.view_overview),
        key(&k.view_daily),
        key(&k.view_weekly),
        key(&k.view_badges)
    ));
    text.push_str(&format!("  {} / {}: Previous / next view\n", key(&k.view_left), key(&k.view_right)));
    text.push_str(&format!("  {} / {}: Move selection\n", key(&k.list_up), key(&k.list_down)));
    text.push_str(&format!("  {}: Switch between habits and tasks (Daily Focus)\n", key(&k.switch_focus)));
    text.push('\n');

    text.push_str("Logging (selected habit, selected day):\n");
    text.push_str(&format!("  {}: Completed\n", key(&k.log_completed)));
    text.push_str(&format!("  {}: Skipped\n", key(&k.log_skipped)));
    text.push_str(&format!("  {}: Missed\n", key(&k.log_missed)));
    text.push('\n');

    text.push_str("Days:\n");
    text.push_str(&format!("  {} / {}: Previous / next day\n", key(&k.previous_day), key(&k.next_day)));
    text.push_str(&format!("  {}: Back to today\n", key(&k.today)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str(&format!("  {}: New habit\n", key(&k.new_habit)));
    text.push_str(&format!("  {}: New task for the selected day\n", key(&k.new_task)));
    text.push_str(&format!("  {}: Toggle selected task\n", key(&k.toggle_task)));
    text.push_str(&format!("  {}: Delete selection\n", key(&k.delete)));
    text.push('\n');

    text.push_str("General:\n");
    text.push_str(&format!("  {}: Retry the last failed action\n", key(&k.retry)));
    text.push_str(&format!("  {}: Reload from the database\n", key(&k.reload)));
    text.push_str("  Esc: Dismiss error\n");
    text.push_str(&format!("  {}: Show/hide help\n", key(&k.help)));
    text.push_str(&format!("  {}: Quit\n", key(&k.quit)));

    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn help_reflects_custom_bindings() {
        let mut config = Config::default();
        config.key_bindings.log_completed = "Enter".to_string();
        let text = build_help_text(&config);
        assert!(text.contains("Enter: Completed"));
        assert!(text.contains("← / →: Previous / next view"));
    }
}
