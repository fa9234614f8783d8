use std::io::{self, Write};

use crate::BrainfuckError;

/// Print `err` to stderr prefixed with the program name.
///
/// Unmatched brackets additionally get a caret under the offending command of
/// `code`, which should be the cleaned program the index refers to.
pub fn print_error(program: &str, err: &BrainfuckError, code: Option<&str>) {
    match (err, code) {
        (BrainfuckError::UnmatchedBrackets { ip, kind }, Some(code)) => {
            let msg = format!("{program}: parse error: unmatched bracket {kind}");
            print_error_with_context(&msg, code, *ip);
        }
        _ => {
            eprintln!("{program}: {err}");
            let _ = io::stderr().flush();
        }
    }
}

/// Print a concise error with instruction index and a caret context window.
pub fn print_error_with_context(prefix: &str, code: &str, pos: usize) {
    eprintln!("{prefix} at instruction {pos}");

    // Show a short window around the position for context
    const WINDOW_CHARS: usize = 32;

    // Cleaned programs are ASCII, so char and byte offsets agree.
    let start = pos.saturating_sub(WINDOW_CHARS);
    let end = (pos + WINDOW_CHARS + 1).min(code.len());
    let slice = code.get(start..end).unwrap_or_default();

    eprintln!("  {}", slice);

    // Caret under the exact position
    let caret_offset = pos.saturating_sub(start);
    eprintln!("  {}^", " ".repeat(caret_offset));
    let _ = io::stderr().flush();
}

/// The name used to prefix diagnostics: the file name of `argv[0]`.
pub fn program_name(arg0: Option<String>) -> String {
    arg0.as_deref()
        .and_then(|a| std::path::Path::new(a).file_name())
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| String::from("bf"))
}
