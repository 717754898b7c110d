use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use std::io::{self, Stdout};
use std::sync::mpsc::Receiver;
use std::time::Duration;

use crate::api::ApiEvent;
use crate::app::{App, InputMode, View};
use crate::ui;

pub fn init_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;
    Ok(terminal)
}

pub fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    mut app: App,
    rx: Receiver<ApiEvent>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(50);
    app.refresh_list();

    loop {
        while let Ok(message) = rx.try_recv() {
            app.apply_event(message);
        }

        terminal.draw(|f| ui::ui(f, &mut app))?;

        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                match app.input_mode {
                    InputMode::Normal => match key.code {
                        KeyCode::Char('q') => return Ok(()),
                        KeyCode::Down => app.next_row(),
                        KeyCode::Up => app.previous_row(),
                        KeyCode::Enter => {
                            if app.view == View::List {
                                app.open_selected();
                            }
                        }
                        KeyCode::Char('/') => {
                            if app.view == View::List {
                                app.open_filters();
                            }
                        }
                        KeyCode::Char('r') => app.retry(),
                        KeyCode::Char('e') => {
                            if matches!(app.view, View::Detail(_)) {
                                app.toggle_edit_mode();
                            }
                        }
                        KeyCode::Char('d') => app.request_delete(),
                        KeyCode::Char('s') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            app.save();
                        }
                        KeyCode::Esc => {
                            if matches!(app.view, View::Detail(_)) {
                                app.back_to_list();
                            }
                        }
                        _ => {}
                    },
                    InputMode::Filter => match key.code {
                        KeyCode::Enter => app.apply_filters(),
                        KeyCode::Esc => app.cancel_filters(),
                        KeyCode::Down | KeyCode::Tab => app.next_filter_field(),
                        KeyCode::Up | KeyCode::BackTab => app.previous_filter_field(),
                        KeyCode::Backspace => app.backspace_filter(),
                        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if ch == 'u' {
                                app.clear_filter_field();
                            }
                        }
                        KeyCode::Char(ch) => app.push_filter_char(ch),
                        _ => {}
                    },
                    InputMode::Edit => match key.code {
                        KeyCode::Esc => app.toggle_edit_mode(),
                        KeyCode::Enter => app.commit_field(),
                        KeyCode::Down | KeyCode::Tab => app.next_edit_field(),
                        KeyCode::Up | KeyCode::BackTab => app.previous_edit_field(),
                        KeyCode::Backspace => app.backspace_edit(),
                        KeyCode::Char(ch) if key.modifiers.contains(KeyModifiers::CONTROL) => {
                            if ch == 'u' {
                                app.clear_edit_input();
                            }
                            if ch == 's' {
                                app.save();
                            }
                        }
                        KeyCode::Char(ch) => app.push_edit_char(ch),
                        _ => {}
                    },
                    InputMode::ConfirmDelete => match key.code {
                        KeyCode::Char('y') | KeyCode::Enter => app.confirm_delete(),
                        KeyCode::Char('n') | KeyCode::Esc => app.cancel_delete(),
                        _ => {}
                    },
                }
            }
        }
    }
}
