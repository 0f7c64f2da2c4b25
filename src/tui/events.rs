use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, size as terminal_size, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use std::io;
use std::time::Duration;

use crate::dashboard::View;
use crate::models::LogStatus;
use crate::tui::app::{App, Mode};
use crate::tui::error::TuiError;
use crate::tui::layout::Layout;
use crate::utils::key_matches;

/// Restores the terminal on drop, including during a panic unwind
struct TerminalGuard {
    raw_mode_enabled: bool,
    alternate_screen_enabled: bool,
}

impl TerminalGuard {
    fn new() -> Result<Self, TuiError> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;

        Ok(Self {
            raw_mode_enabled: true,
            alternate_screen_enabled: true,
        })
    }

    /// Restore explicitly on normal exit; drop then does nothing
    fn restore(&mut self) -> Result<(), TuiError> {
        if self.raw_mode_enabled {
            disable_raw_mode()?;
            self.raw_mode_enabled = false;
        }
        if self.alternate_screen_enabled {
            execute!(io::stdout(), LeaveAlternateScreen)?;
            self.alternate_screen_enabled = false;
        }
        Ok(())
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.raw_mode_enabled {
            let _ = disable_raw_mode();
        }
        if self.alternate_screen_enabled {
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
        }
    }
}

pub fn run_event_loop(mut app: App) -> Result<(), TuiError> {
    // Checked before entering the alternate screen so the message stays visible
    let (width, height) = terminal_size()?;
    let min_width = Layout::MIN_WIDTH + 2;
    let min_height = Layout::MIN_HEIGHT + 2;
    if width < min_width || height < min_height {
        return Err(TuiError::RenderError(format!(
            "Terminal size too small. Current: {}x{}, Minimum required: {}x{}. Please resize your terminal window.",
            width, height, min_width, min_height
        )));
    }

    let mut guard = TerminalGuard::new()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    tracing::info!("dashboard started");

    loop {
        app.tick();

        let size = terminal.size()?;
        let area = Rect::new(0, 0, size.width, size.height);
        terminal.draw(|f| {
            let layout = Layout::calculate(area);
            crate::tui::render::render(f, &mut app, &layout);
        })?;

        if event::poll(Duration::from_millis(100))? {
            // Only Press events; Windows also reports Release
            if let Event::Key(key_event) = event::read()? {
                if key_event.kind == KeyEventKind::Press && handle_key_event(&mut app, key_event)? {
                    break;
                }
            }
        }
    }

    guard.restore()?;
    tracing::info!("dashboard closed");
    Ok(())
}

/// Returns `Ok(true)` when the app should quit
pub fn handle_key_event(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match app.ui.mode {
        Mode::Help => handle_help_mode(app, key_event),
        Mode::Input => handle_input_mode(app, key_event),
        Mode::ConfirmDelete => handle_delete_confirmation(app, key_event),
        Mode::View => handle_view_mode(app, key_event),
    }
}

fn handle_help_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    if key_event.code == KeyCode::Esc || key_matches(&app.config.key_bindings.help, &key_event) {
        app.exit_help_mode();
    }
    Ok(false)
}

fn handle_input_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Esc => app.cancel_form(),
        KeyCode::Enter => app.submit_form(),
        KeyCode::Tab | KeyCode::Down => {
            if let Some(form) = app.form.as_mut() {
                form.next_field();
            }
        }
        KeyCode::BackTab | KeyCode::Up => {
            if let Some(form) = app.form.as_mut() {
                form.previous_field();
            }
        }
        KeyCode::Backspace => {
            if let Some(form) = app.form.as_mut() {
                form.backspace();
            }
        }
        KeyCode::Char(c) => {
            if let Some(form) = app.form.as_mut() {
                form.push_char(c);
            }
        }
        _ => {}
    }
    Ok(false)
}

fn handle_delete_confirmation(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    match key_event.code {
        KeyCode::Enter | KeyCode::Char('y') => app.confirm_delete(),
        KeyCode::Esc | KeyCode::Char('n') => app.cancel_delete(),
        _ => {}
    }
    Ok(false)
}

fn handle_view_mode(app: &mut App, key_event: KeyEvent) -> Result<bool, TuiError> {
    let keys = app.config.key_bindings.clone();
    let pressed = |binding: &str| key_matches(binding, &key_event);

    if pressed(&keys.quit) {
        return Ok(true);
    }

    if pressed(&keys.help) {
        app.enter_help_mode();
    } else if key_event.code == KeyCode::Esc {
        app.dashboard.dismiss_error();
    } else if pressed(&keys.view_overview) {
        app.select_view(View::Overview);
    } else if pressed(&keys.view_daily) {
        app.select_view(View::DailyFocus);
    } else if pressed(&keys.view_weekly) {
        app.select_view(View::Weekly);
    } else if pressed(&keys.view_badges) {
        app.select_view(View::Badges);
    } else if pressed(&keys.view_left) {
        app.dashboard.previous_view();
    } else if pressed(&keys.view_right) {
        app.dashboard.next_view();
    } else if pressed(&keys.list_up) || key_event.code == KeyCode::Up {
        app.move_selection_up();
    } else if pressed(&keys.list_down) || key_event.code == KeyCode::Down {
        app.move_selection_down();
    } else if pressed(&keys.switch_focus) {
        app.switch_focus();
    } else if pressed(&keys.log_completed) {
        app.log_selected(LogStatus::Completed);
    } else if pressed(&keys.log_skipped) {
        app.log_selected(LogStatus::Skipped);
    } else if pressed(&keys.log_missed) {
        app.log_selected(LogStatus::Missed);
    } else if pressed(&keys.new_habit) {
        app.enter_add_habit();
    } else if pressed(&keys.new_task) {
        app.enter_add_task();
    } else if pressed(&keys.toggle_task) {
        app.toggle_selected_task();
    } else if pressed(&keys.delete) {
        app.request_delete();
    } else if pressed(&keys.previous_day) {
        app.change_date(-1);
    } else if pressed(&keys.next_day) {
        app.change_date(1);
    } else if pressed(&keys.today) {
        app.go_to_today();
    } else if pressed(&keys.retry) {
        app.retry();
    } else if pressed(&keys.reload) {
        app.reload();
    }

    Ok(false)
}
