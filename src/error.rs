use std::fmt;
use std::io;

/// Errors that can occur while loading, validating or running Brainfuck programs.
#[derive(Debug, thiserror::Error)]
pub enum BrainfuckError {
    /// The tape display width cannot fit a single cell.
    #[error("terminal is not wide enough (width {width}, need at least {min})")]
    TerminalTooNarrow { width: i64, min: usize },

    /// No script file was named and stdin is an interactive terminal.
    #[error("no input given")]
    NoInput,

    /// A script file (or stdin, named `-`) could not be read.
    #[error("cannot open file {path}: {source}")]
    ScriptRead {
        path: String,
        #[source]
        source: io::Error,
    },

    /// Loops were not balanced; a matching `[` or `]` was not found.
    #[error("parse error: unmatched bracket {kind} at instruction {ip}")]
    UnmatchedBrackets { ip: usize, kind: UnmatchedBracketKind },

    /// `,` ran with a supplied input string that has been used up.
    #[error("runtime error: not enough input was given (instruction {ip})")]
    InputExhausted { ip: usize },

    /// `,` needed a key press but stdin is not a terminal.
    #[error("runtime error: stdin is already in use.\nmake sure nothing is being piped in")]
    StdinInUse { ip: usize },

    /// Writing program output or tape renders failed.
    #[error("I/O error at instruction {ip}: {source}")]
    Output {
        ip: usize,
        #[source]
        source: io::Error,
    },
}

/// Which side of the loop was unmatched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnmatchedBracketKind {
    Open,
    Close,
}

impl fmt::Display for UnmatchedBracketKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnmatchedBracketKind::Open => write!(f, "'['"),
            UnmatchedBracketKind::Close => write!(f, "']'"),
        }
    }
}

/// Coarse classification of [`BrainfuckError`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Configuration,
    Io,
    InputExhausted,
    InteractiveRead,
    MalformedProgram,
}

impl BrainfuckError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            BrainfuckError::TerminalTooNarrow { .. } | BrainfuckError::NoInput => {
                ErrorKind::Configuration
            }
            BrainfuckError::ScriptRead { .. } | BrainfuckError::Output { .. } => ErrorKind::Io,
            BrainfuckError::UnmatchedBrackets { .. } => ErrorKind::MalformedProgram,
            BrainfuckError::InputExhausted { .. } => ErrorKind::InputExhausted,
            BrainfuckError::StdinInUse { .. } => ErrorKind::InteractiveRead,
        }
    }
}
