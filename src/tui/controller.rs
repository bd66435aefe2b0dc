use crate::tui::app::{AppState, InputAction, Scene};
use crate::tui::ui;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::prelude::{CrosstermBackend, Terminal};
use std::io::{self, Stdout};
use std::time::{Duration, Instant};

pub fn run(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut AppState,
    tick_rate: Duration,
) -> io::Result<()> {
    let mut last_tick = Instant::now();
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press && handle_key(app, key.code) {
                    break;
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            let _ = app.on_tick();
            last_tick = Instant::now();
        }
    }
    Ok(())
}

/// Map a key to an action. Returns true when the user asked to quit.
pub fn handle_key(app: &mut AppState, code: KeyCode) -> bool {
    if matches!(code, KeyCode::Char('q') | KeyCode::Char('Q')) {
        return true;
    }
    if app.overlay_open() {
        let action = match code {
            KeyCode::Esc => Some(InputAction::CloseOverlay),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::TogglePaytable),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(InputAction::ToggleHistory),
            _ => None,
        };
        if let Some(action) = action {
            let _ = app.handle_input(action);
        }
        return false;
    }

    let action = match app.scene {
        Scene::Menu => match code {
            KeyCode::Up => Some(InputAction::MenuPrev),
            KeyCode::Down => Some(InputAction::MenuNext),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(InputAction::MenuInc),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(InputAction::MenuDec),
            KeyCode::Enter => Some(InputAction::MenuApply),
            KeyCode::Esc => Some(InputAction::MenuCancel),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(InputAction::ToggleMenu),
            _ => None,
        },
        Scene::Machine => match code {
            KeyCode::Char(' ') => Some(InputAction::Spin),
            KeyCode::Char('+') | KeyCode::Char('=') => Some(InputAction::BetUp),
            KeyCode::Char('-') | KeyCode::Char('_') => Some(InputAction::BetDown),
            KeyCode::Char('a') | KeyCode::Char('A') => Some(InputAction::ToggleAutoplay),
            KeyCode::Char('c') | KeyCode::Char('C') => Some(InputAction::AddCredits),
            KeyCode::Char('p') | KeyCode::Char('P') => Some(InputAction::TogglePaytable),
            KeyCode::Char('h') | KeyCode::Char('H') => Some(InputAction::ToggleHistory),
            KeyCode::Char('m') | KeyCode::Char('M') => Some(InputAction::ToggleMenu),
            _ => None,
        },
    };
    if let Some(action) = action {
        let _ = app.handle_input(action);
    }
    false
}
