use ratatui::layout::Alignment;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders};
use ratatui::Frame;

use crate::dashboard::View;
use crate::tui::app::{App, Focus, Mode};
use crate::tui::layout::Layout;
use crate::tui::widgets::{
    badges::render_badges,
    color::parse_color,
    confirm_delete::render_confirm_delete,
    daily_focus::render_daily_focus,
    help::render_help,
    input_modal::render_input_modal,
    overview::render_overview,
    status_bar::{render_status_bar, StatusMessage},
    tabs::render_tabs,
    weekly::render_weekly,
};
use crate::utils::format_key_binding_for_display as key;

pub fn render(f: &mut Frame, app: &mut App, layout: &Layout) {
    let theme = app.config.get_active_theme();
    let outer_block = Block::default()
        .borders(Borders::ALL)
        .title("habitgrid")
        .title_alignment(Alignment::Center)
        .style(Style::default().fg(parse_color(&theme.fg)).bg(parse_color(&theme.bg)));
    f.render_widget(outer_block, f.area());

    let state = app.dashboard.state();
    render_tabs(f, layout.tabs_area, state.view, &app.config);

    match state.view {
        View::Overview => {
            render_overview(f, layout.main_area, state, &mut app.ui.habit_list_state, &app.config);
        }
        View::DailyFocus => {
            render_daily_focus(
                f,
                layout.main_area,
                state,
                app.ui.focus,
                &mut app.ui.habit_list_state,
                &mut app.ui.task_list_state,
                &app.config,
            );
        }
        View::Weekly => render_weekly(f, layout.main_area, state, &app.config),
        View::Badges => render_badges(f, layout.main_area, state, &app.config),
    }

    // Overlays after the view so they sit on top
    match app.ui.mode {
        Mode::Help => render_help(f, f.area(), &app.config),
        Mode::Input => {
            if let Some(ref form) = app.form {
                render_input_modal(f, f.area(), form, &app.config);
            }
        }
        Mode::ConfirmDelete => {
            if let Some(ref target) = app.delete_confirmation {
                render_confirm_delete(f, f.area(), target, &app.config);
            }
        }
        Mode::View => {}
    }

    // An unresolved store error outranks transient messages
    let error_text = state.last_error.as_ref().map(|error| error.user_message());
    let message = match (error_text.as_deref(), app.status.message.as_deref()) {
        (Some(error), _) => Some(StatusMessage::Error(error)),
        (None, Some(info)) => Some(StatusMessage::Info(info)),
        (None, None) => None,
    };
    let key_hints = get_key_hints(app);
    render_status_bar(f, layout.status_area, message, &key_hints, &app.config);
}

fn get_key_hints(app: &App) -> Vec<String> {
    let k = &app.config.key_bindings;
    match app.ui.mode {
        Mode::Help => vec![format!("Esc or {}: Exit help", key(&k.help))],
        Mode::Input => vec![
            "Enter: Save".to_string(),
            "Tab: Next field".to_string(),
            "Esc: Cancel".to_string(),
        ],
        Mode::ConfirmDelete => vec!["y: Delete".to_string(), "n: Cancel".to_string()],
        Mode::View => {
            let mut hints = vec![format!("{}: Quit", key(&k.quit))];
            match app.dashboard.state().view {
                View::Overview | View::DailyFocus => {
                    hints.push(format!(
                        "{}/{}/{}: Done/Skip/Miss",
                        key(&k.log_completed),
                        key(&k.log_skipped),
                        key(&k.log_missed)
                    ));
                    hints.push(format!("{}: New habit", key(&k.new_habit)));
                }
                View::Weekly | View::Badges => {}
            }
            if app.dashboard.state().view == View::DailyFocus {
                hints.push(format!("{}: New task", key(&k.new_task)));
                if app.active_focus() == Focus::Tasks {
                    hints.push(format!("{}: Toggle", key(&k.toggle_task)));
                }
                hints.push(format!("{}: Habits/Tasks", key(&k.switch_focus)));
            }
            hints.push(format!("{}: Delete", key(&k.delete)));
            hints.push(format!("{}/{}: Day", key(&k.previous_day), key(&k.next_day)));
            hints.push(format!("{}: Today", key(&k.today)));
            if app.dashboard.can_retry() {
                hints.push(format!("{}: Retry", key(&k.retry)));
            }
            hints.push(format!("{}: Help", key(&k.help)));
            hints
        }
    }
}
