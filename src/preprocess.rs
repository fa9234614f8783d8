//! Source cleanup and loop matching.
//!
//! Raw source text is reduced to the eight Brainfuck commands; everything else
//! (whitespace, comments, any other character) is discarded. The cleaned command
//! string is then scanned once to pair every `[` with its `]`.

use std::collections::HashMap;

use crate::error::{BrainfuckError, UnmatchedBracketKind};

/// Returns true for the eight Brainfuck command characters `><+-[].,`.
pub fn is_command(c: char) -> bool {
    matches!(c, '>' | '<' | '+' | '-' | '.' | ',' | '[' | ']')
}

/// Keep only Brainfuck command characters, preserving their order.
pub fn clean(source: &str) -> String {
    source.chars().filter(|c| is_command(*c)).collect()
}

/// Symmetric jump table: the index of each `[` maps to its `]` and vice versa.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BracketMap {
    jumps: HashMap<usize, usize>,
}

impl BracketMap {
    /// Pair brackets in `commands` with a single stack-based pass.
    ///
    /// A `]` with nothing open, or any `[` still open at the end, is reported as
    /// [`BrainfuckError::UnmatchedBrackets`] pointing at the offending index.
    pub fn build(commands: &str) -> Result<Self, BrainfuckError> {
        let mut jumps = HashMap::new();
        let mut stack: Vec<usize> = Vec::new();

        for (i, c) in commands.chars().enumerate() {
            if c == '[' {
                stack.push(i);
            } else if c == ']' {
                let Some(open_index) = stack.pop() else {
                    return Err(BrainfuckError::UnmatchedBrackets {
                        ip: i,
                        kind: UnmatchedBracketKind::Close,
                    });
                };
                jumps.insert(open_index, i);
                jumps.insert(i, open_index);
            }
        }

        // Report the innermost unclosed loop.
        if let Some(unmatched_open) = stack.last().copied() {
            return Err(BrainfuckError::UnmatchedBrackets {
                ip: unmatched_open,
                kind: UnmatchedBracketKind::Open,
            });
        }

        Ok(Self { jumps })
    }

    /// Matching bracket index for the bracket at `ip`.
    pub fn target(&self, ip: usize) -> Option<usize> {
        self.jumps.get(&ip).copied()
    }

    /// Number of entries (twice the number of loops).
    pub fn len(&self) -> usize {
        self.jumps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jumps.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.jumps.iter().map(|(k, v)| (*k, *v))
    }
}

/// A cleaned, bracket-validated program ready to execute.
#[derive(Debug, Clone)]
pub struct Program {
    commands: String,
    brackets: BracketMap,
}

impl Program {
    /// Clean `source` and build its bracket map.
    pub fn parse(source: &str) -> Result<Self, BrainfuckError> {
        let commands = clean(source);
        let brackets = BracketMap::build(&commands)?;
        Ok(Self { commands, brackets })
    }

    pub fn commands(&self) -> &str {
        &self.commands
    }

    pub fn brackets(&self) -> &BracketMap {
        &self.brackets
    }

    /// Command at `ip`, or `None` once past the end.
    pub fn command(&self, ip: usize) -> Option<char> {
        // Every command is ASCII, so byte and char indices agree.
        self.commands.as_bytes().get(ip).map(|b| *b as char)
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}
