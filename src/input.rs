//! Raw terminal events → logical game actions.

use std::io::{self, Write};

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers,
    MouseButton, MouseEventKind,
};
use crossterm::{cursor, execute, terminal};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Action {
    Jump,
    ToggleMute,
}

/// What the host loop does with one raw event.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HostInput {
    Game(Action),
    Resize(u16, u16),
    Quit,
}

pub fn map_event(ev: &Event) -> Option<HostInput> {
    match ev {
        Event::Key(key) => map_key(key),
        Event::Mouse(m) => match m.kind {
            MouseEventKind::Down(MouseButton::Left) => Some(HostInput::Game(Action::Jump)),
            _ => None,
        },
        Event::Resize(c, r) => Some(HostInput::Resize(*c, *r)),
        _ => None,
    }
}

fn map_key(key: &KeyEvent) -> Option<HostInput> {
    // Release/repeat events would double-jump on terminals that report them.
    if key.kind != KeyEventKind::Press {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(HostInput::Quit),
        KeyCode::Char('q') | KeyCode::Esc => Some(HostInput::Quit),
        KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => Some(HostInput::Game(Action::Jump)),
        KeyCode::Char('m') | KeyCode::Char('M') => Some(HostInput::Game(Action::ToggleMute)),
        _ => None,
    }
}

/// Holds the terminal in raw mode with mouse capture for as long as it
/// lives. Raw mode swallows every key, so no event reaches the shell.
pub struct InputCapture {
    _private: (),
}

impl InputCapture {
    pub fn acquire() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut out = io::stdout();
        if let Err(e) = execute!(
            out,
            terminal::EnterAlternateScreen,
            cursor::Hide,
            terminal::DisableLineWrap,
            EnableMouseCapture,
        ) {
            let _ = terminal::disable_raw_mode();
            return Err(e);
        }
        Ok(InputCapture { _private: () })
    }
}

impl Drop for InputCapture {
    fn drop(&mut self) {
        let mut out = io::stdout();
        let _ = execute!(
            out,
            DisableMouseCapture,
            terminal::LeaveAlternateScreen,
            cursor::Show,
            terminal::EnableLineWrap,
        );
        let _ = out.flush();
        let _ = terminal::disable_raw_mode();
    }
}
