//! The fetch-execute loop.
//!
//! A [`Machine`] runs one [`Program`] to completion against a fresh [`Tape`].
//! Program output and tape renders go to any [`Write`]; `,` is served by an
//! [`InputSource`] borrowed for the run, so one input buffer can be drained
//! across several programs.

use std::io::{self, Write};
use std::thread;

use crossterm::{
    cursor::{MoveToColumn, MoveUp},
    queue,
    terminal::{Clear, ClearType},
};

use crate::config::{RunConfig, TapeDisplay};
use crate::error::BrainfuckError;
use crate::input::InputSource;
use crate::preprocess::Program;
use crate::tape::Tape;

/// What `.` does with a character. Picked once from the tape display mode.
#[derive(Debug, Clone, PartialEq, Eq)]
enum OutputStrategy {
    /// Write and flush immediately.
    Stream,
    /// Collect until the run ends.
    Deferred(String),
}

impl OutputStrategy {
    fn for_display(display: TapeDisplay) -> Self {
        if display.defers_output() {
            OutputStrategy::Deferred(String::new())
        } else {
            OutputStrategy::Stream
        }
    }

    fn emit<W: Write>(&mut self, out: &mut W, ch: char) -> io::Result<()> {
        match self {
            OutputStrategy::Stream => {
                write!(out, "{ch}")?;
                out.flush()
            }
            OutputStrategy::Deferred(pending) => {
                pending.push(ch);
                Ok(())
            }
        }
    }

    fn drain<W: Write>(&mut self, out: &mut W) -> io::Result<()> {
        if let OutputStrategy::Deferred(pending) = self {
            if !pending.is_empty() {
                out.write_all(pending.as_bytes())?;
                pending.clear();
            }
        }
        out.flush()
    }
}

/// Interpreter state for a single program run.
pub struct Machine<'a, W: Write> {
    program: &'a Program,
    config: &'a RunConfig,
    tape: Tape,
    ip: usize,
    output: OutputStrategy,
    out: W,
}

impl<'a, W: Write> Machine<'a, W> {
    pub fn new(program: &'a Program, config: &'a RunConfig, out: W) -> Self {
        Self {
            program,
            config,
            tape: Tape::new(),
            ip: 0,
            output: OutputStrategy::for_display(config.display),
            out,
        }
    }

    pub fn tape(&self) -> &Tape {
        &self.tape
    }

    /// Hand back the writer, e.g. to inspect what a test run produced.
    pub fn into_writer(self) -> W {
        self.out
    }

    /// Execute the program until the instruction pointer runs off the end.
    ///
    /// Errors stop the run immediately. Anything already streamed stays
    /// written; deferred output of dump and live modes is dropped.
    pub fn run(&mut self, input: &mut dyn InputSource) -> Result<(), BrainfuckError> {
        let live = self.config.display == TapeDisplay::Live;

        while let Some(instr) = self.program.command(self.ip) {
            let drawn = if live { Some(self.draw_tape(true)?) } else { None };

            self.execute(instr, input)?;

            if let Some(lines) = drawn {
                self.erase_lines(lines)?;
            }

            self.ip += 1;

            if !self.config.delay.is_zero() {
                thread::sleep(self.config.delay);
            }
        }

        match self.config.display {
            TapeDisplay::Dump => {
                self.draw_tape(false)?;
            }
            TapeDisplay::Live => {
                self.draw_tape(true)?;
            }
            TapeDisplay::Hidden => {}
        }

        let ip = self.ip;
        self.output
            .drain(&mut self.out)
            .map_err(|source| BrainfuckError::Output { ip, source })
    }

    fn execute(&mut self, instr: char, input: &mut dyn InputSource) -> Result<(), BrainfuckError> {
        match instr {
            '>' => self.tape.move_right(),
            '<' => self.tape.move_left(),
            '+' => self.tape.increment(),
            '-' => self.tape.decrement(),
            '[' => {
                if self.tape.read() == 0 {
                    self.jump();
                }
            }
            ']' => {
                if self.tape.read() != 0 {
                    self.jump();
                }
            }
            '.' => {
                let ch = self.tape.read() as char;
                let ip = self.ip;
                self.output
                    .emit(&mut self.out, ch)
                    .map_err(|source| BrainfuckError::Output { ip, source })?;
            }
            ',' => {
                // The prompt of an interactive source must land after any pending output.
                let ip = self.ip;
                self.out
                    .flush()
                    .map_err(|source| BrainfuckError::Output { ip, source })?;
                let ch = input.read_char().map_err(|e| e.at(self.ip))?;
                // Code points past 255 keep only their low byte.
                self.tape.write(ch as u32 as u8);
            }
            _ => {}
        }
        Ok(())
    }

    fn jump(&mut self) {
        // Programs are bracket-validated on parse, so every bracket has a target.
        if let Some(target) = self.program.brackets().target(self.ip) {
            self.ip = target;
        }
    }

    /// Draw the tape starting at column 0, clearing each line first.
    /// Returns how many lines were written.
    fn draw_tape(&mut self, highlight_pointer: bool) -> Result<usize, BrainfuckError> {
        let rendered = self.tape.render(self.config.width, highlight_pointer);
        let ip = self.ip;
        let draw = |out: &mut W| -> io::Result<()> {
            for line in rendered.text.lines() {
                queue!(out, MoveToColumn(0), Clear(ClearType::CurrentLine))?;
                writeln!(out, "{line}")?;
            }
            out.flush()
        };
        draw(&mut self.out).map_err(|source| BrainfuckError::Output { ip, source })?;
        Ok(rendered.lines)
    }

    /// Move the cursor back up over `lines` lines so the next draw overwrites them.
    fn erase_lines(&mut self, lines: usize) -> Result<(), BrainfuckError> {
        let ip = self.ip;
        let moved = match u16::try_from(lines) {
            Ok(n) if n > 0 => queue!(self.out, MoveUp(n)).and_then(|_| self.out.flush()),
            _ => Ok(()),
        };
        moved.map_err(|source| BrainfuckError::Output { ip, source })
    }
}

/// Run every program in order with the same configuration and input source.
///
/// Each program gets a fresh tape. The first failing program stops the batch.
pub fn run_all<W: Write>(
    programs: &[Program],
    config: &RunConfig,
    input: &mut dyn InputSource,
    out: &mut W,
) -> Result<(), BrainfuckError> {
    for program in programs {
        let mut machine = Machine::new(program, config, &mut *out);
        machine.run(input)?;
    }
    Ok(())
}
