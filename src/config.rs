use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::OnceLock;
use std::time::Duration;

use cross_xdg::BaseDirs;

use crate::error::BrainfuckError;
use crate::input::{BufferedInput, InputSource, TerminalInput};

/// Narrowest width that still fits one rendered cell.
pub const MIN_WIDTH: usize = 7;
/// Used when the terminal size cannot be detected (80 columns minus margins).
pub const FALLBACK_WIDTH: usize = 78;
/// Delay applied in live-tape mode when none was requested.
pub const LIVE_DELAY_MS: u64 = 125;

/// When, if ever, the tape is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TapeDisplay {
    /// Program output streams as it is produced; the tape is never shown.
    #[default]
    Hidden,
    /// Output is held back; the tape is printed once after the run, then the output.
    Dump,
    /// Output is held back; the tape is redrawn in place before every command.
    Live,
}

impl TapeDisplay {
    pub fn defers_output(self) -> bool {
        !matches!(self, TapeDisplay::Hidden)
    }
}

/// Immutable settings shared by every program of one invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    pub width: usize,
    pub delay: Duration,
    pub display: TapeDisplay,
    /// Characters for `,`; `None` means read key presses from the terminal.
    pub input: Option<String>,
}

impl RunConfig {
    /// Validate `width` and resolve the per-command delay.
    ///
    /// Without an explicit `delay_ms`, live mode uses the configured live delay
    /// and every other mode the configured plain delay.
    pub fn new(
        width: i64,
        delay_ms: Option<u64>,
        display: TapeDisplay,
        input: Option<String>,
        defaults: &Defaults,
    ) -> Result<Self, BrainfuckError> {
        // Negative widths fail the same way as ones that are merely too small.
        let width = match usize::try_from(width) {
            Ok(w) if w >= MIN_WIDTH => w,
            _ => return Err(BrainfuckError::TerminalTooNarrow { width, min: MIN_WIDTH }),
        };

        let delay_ms = delay_ms.unwrap_or(match display {
            TapeDisplay::Live => defaults.show_tape_delay_ms,
            _ => defaults.delay_ms,
        });

        Ok(Self {
            width,
            delay: Duration::from_millis(delay_ms),
            display,
            input,
        })
    }

    /// Build the `,` source this configuration asks for.
    pub fn input_source(&self) -> Box<dyn InputSource> {
        match &self.input {
            Some(text) => Box::new(BufferedInput::new(text)),
            None => Box::new(TerminalInput::new()),
        }
    }
}

/// Detected terminal width minus a column of padding on each side.
pub fn detect_width() -> usize {
    // Some pseudo terminals report zero columns; treat that as unknown.
    crossterm::terminal::size()
        .ok()
        .filter(|(cols, _)| *cols > 0)
        .map(|(cols, _)| (cols as usize).saturating_sub(2))
        .unwrap_or(FALLBACK_WIDTH)
}

/// User defaults read from `bf.toml`; command line flags always win.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Defaults {
    pub delay_ms: u64,
    pub show_tape_delay_ms: u64,
    pub width: Option<usize>,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            delay_ms: 0,
            show_tape_delay_ms: LIVE_DELAY_MS,
            width: None,
        }
    }
}

static DEFAULTS: OnceLock<Defaults> = OnceLock::new();

pub fn defaults() -> &'static Defaults {
    DEFAULTS.get_or_init(|| load_from_toml().unwrap_or_default())
}

fn load_from_toml() -> Option<Defaults> {
    let base_dirs = BaseDirs::new().ok()?;

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let config_home = base_dirs.config_home();

    let mut path = PathBuf::from(config_home);
    path.push("bf.toml");

    let content = fs::read_to_string(path).ok()?;
    Some(parse_defaults(&content))
}

/// Read the `[run]` section of a defaults file.
///
/// Only `key = value` lines with integer values are understood; anything else,
/// including values that fail to parse, is ignored.
pub fn parse_defaults(content: &str) -> Defaults {
    let mut in_run = false;
    let mut map: HashMap<String, String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }
        if line.starts_with('[') && line.ends_with(']') {
            in_run = &line[1..line.len() - 1] == "run";
            continue;
        }
        if !in_run {
            continue;
        }
        if let Some(eq) = line.find('=') {
            let key = line[..eq].trim().to_string();
            let val_raw = line[eq + 1..].trim();
            // Accept quoted or unquoted
            let val = val_raw.trim_matches('"').to_string();
            map.insert(key, val);
        }
    }

    let mut cfg = Defaults::default();
    if let Some(v) = map.get("delay").and_then(|s| s.parse().ok()) {
        cfg.delay_ms = v;
    }
    if let Some(v) = map.get("show_tape_delay").and_then(|s| s.parse().ok()) {
        cfg.show_tape_delay_ms = v;
    }
    if let Some(v) = map.get("width").and_then(|s| s.parse().ok()) {
        cfg.width = Some(v);
    }
    cfg
}
