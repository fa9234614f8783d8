//! A Brainfuck interpreter with an unbounded tape and optional tape rendering.
//!
//! Features and behaviors:
//! - The tape starts as one zero cell and grows to the right on demand.
//!   Moving left of cell 0 leaves the pointer in place.
//! - Cells wrap at the 0..=255 boundary.
//! - Non-command characters are ignored; unmatched brackets are reported
//!   before anything runs.
//! - `,` reads from a supplied input string, or a single key press from the
//!   terminal. Running out of supplied input is an error.
//! - The tape can be printed once after a run (dump mode) or redrawn in place
//!   before every command (live mode). Both hold back `.` output until the end.
//!
//! Quick start:
//!
//! ```no_run
//! use bf_tape::{BufferedInput, Defaults, Machine, Program, RunConfig, TapeDisplay};
//!
//! let program = Program::parse(",[.,]").expect("balanced brackets");
//! let config = RunConfig::new(78, None, TapeDisplay::Hidden, None, &Defaults::default())
//!     .expect("wide enough");
//! let mut input = BufferedInput::new("echo");
//! let mut machine = Machine::new(&program, &config, std::io::stdout());
//! machine.run(&mut input).expect("program should run");
//! ```

pub mod cli_util;
pub mod commands;
pub mod config;
pub mod error;
pub mod input;
pub mod machine;
pub mod preprocess;
pub mod tape;

pub use config::{Defaults, RunConfig, TapeDisplay};
pub use error::{BrainfuckError, ErrorKind, UnmatchedBracketKind};
pub use input::{BufferedInput, InputSource, TerminalInput};
pub use machine::{run_all, Machine};
pub use preprocess::{clean, BracketMap, Program};
pub use tape::{RenderedTape, Tape};
