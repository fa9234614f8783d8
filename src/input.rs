use std::collections::VecDeque;
use std::io::{self, IsTerminal, Write};

use crossterm::{
    cursor::MoveToColumn,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    queue,
    terminal::{disable_raw_mode, enable_raw_mode, Clear, ClearType},
};

use crate::error::BrainfuckError;

/// Why a `,` could not be satisfied. Converted into a [`BrainfuckError`] with the
/// instruction index by the machine.
#[derive(Debug, thiserror::Error)]
pub enum InputError {
    #[error("input exhausted")]
    Exhausted,
    #[error("stdin is not available for interactive input")]
    StdinInUse,
    #[error("failed to write the input prompt: {0}")]
    Prompt(#[source] io::Error),
}

impl InputError {
    pub fn at(self, ip: usize) -> BrainfuckError {
        match self {
            InputError::Exhausted => BrainfuckError::InputExhausted { ip },
            InputError::StdinInUse => BrainfuckError::StdinInUse { ip },
            InputError::Prompt(source) => BrainfuckError::Output { ip, source },
        }
    }
}

/// Where `,` gets its characters from.
pub trait InputSource {
    /// Produce the next character, blocking if the source is interactive.
    fn read_char(&mut self) -> Result<char, InputError>;
}

/// Characters supplied up front and consumed front to back.
///
/// One buffer is shared by every program of an invocation, so a later program
/// continues where the previous one stopped reading.
#[derive(Debug, Clone, Default)]
pub struct BufferedInput {
    pending: VecDeque<char>,
}

impl BufferedInput {
    pub fn new(text: &str) -> Self {
        Self {
            pending: text.chars().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl InputSource for BufferedInput {
    fn read_char(&mut self) -> Result<char, InputError> {
        self.pending.pop_front().ok_or(InputError::Exhausted)
    }
}

/// Reads a single key press from the terminal in raw mode.
///
/// An `Input: ` prompt is shown on stdout while waiting and cleared afterwards.
/// Fails with [`InputError::StdinInUse`] when stdin is not a terminal, e.g.
/// because the program itself was piped in.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl TerminalInput {
    pub fn new() -> Self {
        Self
    }
}

impl InputSource for TerminalInput {
    fn read_char(&mut self) -> Result<char, InputError> {
        if !io::stdin().is_terminal() {
            return Err(InputError::StdinInUse);
        }

        let mut stdout = io::stdout();
        write!(stdout, "Input: ").map_err(InputError::Prompt)?;
        stdout.flush().map_err(InputError::Prompt)?;

        enable_raw_mode().map_err(|_| InputError::StdinInUse)?;
        let key = read_key();
        // Restore the terminal before looking at the result.
        let _ = disable_raw_mode();

        let c = key.map_err(|_| InputError::StdinInUse)?;

        queue!(stdout, MoveToColumn(0), Clear(ClearType::CurrentLine)).map_err(InputError::Prompt)?;
        stdout.flush().map_err(InputError::Prompt)?;
        Ok(c)
    }
}

fn read_key() -> io::Result<char> {
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                continue;
            }
            if let Some(c) = key_to_char(key) {
                return Ok(c);
            }
        }
    }
}

/// Map a key press to the character a raw terminal would deliver for it.
fn key_to_char(key: KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c) if key.modifiers.contains(KeyModifiers::CONTROL) && c.is_ascii_alphabetic() => {
            Some(((c.to_ascii_lowercase() as u8) - b'a' + 1) as char)
        }
        KeyCode::Char(c) => Some(c),
        KeyCode::Enter => Some('\r'),
        KeyCode::Tab => Some('\t'),
        KeyCode::Backspace => Some('\u{7f}'),
        KeyCode::Esc => Some('\u{1b}'),
        _ => None,
    }
}
