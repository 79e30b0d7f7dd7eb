use std::io::{Stderr, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyModifiers},
    queue,
    style::Print,
    terminal,
};
use gramstats::AppError;

type Result<T> = std::result::Result<T, AppError>;

fn terminal_err(err: std::io::Error) -> AppError {
    AppError::Terminal(err.to_string())
}

/// What a key press did to the secret being typed.
#[derive(Debug, PartialEq, Eq)]
enum Edit {
    Pushed,
    Popped,
    Submitted,
    Interrupted,
    Ignored,
}

/// Characters typed so far. Never echoed.
#[derive(Debug, Default)]
struct Secret {
    chars: String,
}

impl Secret {
    fn apply(&mut self, key: KeyEvent) -> Edit {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Enter => Edit::Submitted,
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => Edit::Interrupted,
            KeyCode::Char(ch) if !ctrl => {
                self.chars.push(ch);
                Edit::Pushed
            }
            KeyCode::Backspace => match self.chars.pop() {
                Some(_) => Edit::Popped,
                None => Edit::Ignored,
            },
            _ => Edit::Ignored,
        }
    }
}

/// Leaves raw mode on every exit path.
struct RawMode;

impl RawMode {
    fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(terminal_err)?;
        Ok(Self)
    }
}

impl Drop for RawMode {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

fn echo(out: &mut Stderr, edit: &Edit) -> Result<()> {
    let queued = match edit {
        Edit::Pushed => queue!(out, Print('*')),
        Edit::Popped => queue!(out, cursor::MoveLeft(1), Print(' '), cursor::MoveLeft(1)),
        Edit::Submitted | Edit::Interrupted => queue!(out, Print("\r\n")),
        Edit::Ignored => return Ok(()),
    };
    queued.map_err(terminal_err)?;
    out.flush()?;
    Ok(())
}

/// Reads a secret from the terminal on stderr, masking each character.
pub fn prompt_secret(label: &str) -> Result<String> {
    let _raw = RawMode::enable()?;
    let mut out = std::io::stderr();
    queue!(out, Print(label)).map_err(terminal_err)?;
    out.flush()?;

    let mut secret = Secret::default();
    loop {
        let Event::Key(key) = event::read().map_err(terminal_err)? else {
            continue;
        };
        let edit = secret.apply(key);
        echo(&mut out, &edit)?;
        match edit {
            Edit::Submitted => return Ok(secret.chars),
            Edit::Interrupted => return Err(AppError::Terminal("interrupted".to_string())),
            _ => {}
        }
    }
}
