use std::fs;
use std::io::{self, IsTerminal, Read, Write};

use clap::Parser;
use crossterm::terminal::disable_raw_mode;

use crate::cli_util::print_error;
use crate::config::{self, RunConfig, TapeDisplay};
use crate::preprocess::{clean, Program};
use crate::{run_all, BrainfuckError};

#[derive(Parser, Debug)]
#[command(name = "bf", disable_help_flag = true)]
pub struct RunArgs {
    /// Read Brainfuck code from stdin
    #[arg(short = 'c', long = "stdin-code", conflicts_with = "stdin_filenames")]
    pub stdin_code: bool,

    /// Read Brainfuck script filenames from stdin
    #[arg(short = 'f', long = "stdin-filenames")]
    pub stdin_filenames: bool,

    /// Delay in milliseconds after each command (default 0, or 125 with --show-tape)
    #[arg(short = 'd', long = "delay", value_name = "MS")]
    pub delay: Option<u64>,

    /// Print the tape after each script finishes
    #[arg(long = "dump-tape", conflicts_with = "show_tape")]
    pub dump_tape: bool,

    /// Redraw the tape while each script runs
    #[arg(long = "show-tape")]
    pub show_tape: bool,

    /// Characters consumed by `,` instead of reading key presses
    #[arg(short = 'i', long = "input", value_name = "TEXT")]
    pub input: Option<String>,

    /// Width used to lay out the tape (at least 7)
    #[arg(short = 'w', long = "width", value_name = "COLUMNS", allow_negative_numbers = true)]
    pub width: Option<i64>,

    /// Script files; `-` reads a script from stdin
    #[arg(value_name = "FILE")]
    pub files: Vec<String>,

    /// Show this help
    #[arg(short = 'h', long = "help", action = clap::ArgAction::SetTrue)]
    pub help: bool,
}

impl RunArgs {
    fn display(&self) -> TapeDisplay {
        if self.show_tape {
            TapeDisplay::Live
        } else if self.dump_tape {
            TapeDisplay::Dump
        } else {
            TapeDisplay::Hidden
        }
    }
}

pub fn run(program: &str, args: RunArgs) -> i32 {
    if args.help {
        usage_and_exit(program, 0);
    }

    let defaults = config::defaults();
    let width = args
        .width
        .or_else(|| defaults.width.and_then(|w| i64::try_from(w).ok()))
        .unwrap_or_else(|| i64::try_from(config::detect_width()).unwrap_or(i64::MAX));

    let run_config = match RunConfig::new(width, args.delay, args.display(), args.input.clone(), defaults) {
        Ok(c) => c,
        Err(err) => {
            print_error(program, &err, None);
            return 1;
        }
    };

    let sources = match collect_sources(&args) {
        Ok(s) => s,
        Err(err) => {
            print_error(program, &err, None);
            return 1;
        }
    };

    // Validate every script before running any of them.
    let mut programs = Vec::with_capacity(sources.len());
    for source in &sources {
        match Program::parse(source) {
            Ok(p) => programs.push(p),
            Err(err) => {
                print_error(program, &err, Some(&clean(source)));
                return 1;
            }
        }
    }

    if run_config.display == TapeDisplay::Live {
        // Leave the terminal usable if the animation is interrupted.
        if let Err(e) = ctrlc::set_handler(|| {
            let _ = disable_raw_mode();
            let _ = io::stdout().flush();
            let _ = io::stderr().flush();
            std::process::exit(130);
        }) {
            eprintln!("{program}: failed to set ctrl+c handler: {e}");
            let _ = io::stderr().flush();
            return 1;
        }
    }

    let mut input = run_config.input_source();
    let stdout = io::stdout();
    let mut out = stdout.lock();
    match run_all(&programs, &run_config, input.as_mut(), &mut out) {
        Ok(()) => 0,
        Err(err) => {
            let _ = out.flush();
            print_error(program, &err, None);
            1
        }
    }
}

/// Gather the source text of every script, in order: positional files, then
/// whatever stdin was asked to provide. With no files and no stdin flag, stdin
/// is read as code unless it is a terminal.
fn collect_sources(args: &RunArgs) -> Result<Vec<String>, BrainfuckError> {
    ensure_script_source(args, io::stdin().is_terminal())?;

    let mut sources = Vec::new();
    for path in &args.files {
        sources.push(read_script(path)?);
    }

    if args.stdin_filenames {
        for path in read_stdin()?.split_whitespace() {
            sources.push(read_script(path)?);
        }
    } else if args.stdin_code {
        sources.push(read_stdin()?);
    }

    if sources.is_empty() {
        sources.push(read_stdin()?);
    }

    Ok(sources)
}

/// Without file arguments every script would come from stdin, which must not
/// be a terminal; that holds for `-c` and `-f` as well.
fn ensure_script_source(args: &RunArgs, stdin_is_terminal: bool) -> Result<(), BrainfuckError> {
    if args.files.is_empty() && stdin_is_terminal {
        return Err(BrainfuckError::NoInput);
    }
    Ok(())
}

/// Read a script file; `-` names stdin.
fn read_script(path: &str) -> Result<String, BrainfuckError> {
    if path == "-" {
        return read_stdin();
    }
    fs::read_to_string(path).map_err(|source| BrainfuckError::ScriptRead {
        path: path.to_string(),
        source,
    })
}

fn read_stdin() -> Result<String, BrainfuckError> {
    let mut s = String::new();
    io::stdin()
        .read_to_string(&mut s)
        .map_err(|source| BrainfuckError::ScriptRead {
            path: "-".to_string(),
            source,
        })?;
    Ok(s)
}

fn usage_and_exit(program: &str, code: i32) -> ! {
    eprintln!(
        r#"Usage:
  {0} [OPTIONS] [FILE...]      # Run one or more Brainfuck scripts in order
  {0} [OPTIONS] < script.bf    # Run a script piped in on stdin

Options:
  --stdin-code,      -c          Also read Brainfuck code from stdin
  --stdin-filenames, -f          Also read script filenames from stdin
  --delay,           -d <MS>     Pause after every command (default 0, 125 with --show-tape)
  --dump-tape                    Print the tape after each script finishes
  --show-tape                    Redraw the tape while each script runs
  --input,           -i <TEXT>   Characters consumed by `,` (otherwise read key presses)
  --width,           -w <COLS>   Width used to lay out the tape (at least 7)
  --help,            -h          Show this help

Notes:
- Characters outside of Brainfuck's ><+-.,[] are ignored.
- A FILE named `-` is read from stdin.
- Scripts run one after another with a fresh tape each; --input is shared
  between them and is not reset.
- With --dump-tape or --show-tape, output of `.` is shown after the tape.

Examples:
- Run a script with input for `,`:
    {0} --input "hi" ./echo.bf
- Watch the tape while a script runs:
    {0} --show-tape --delay 50 ./program.bf
"#,
        program
    );
    let _ = io::stderr().flush();
    std::process::exit(code);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_follows_tape_flags() {
        let args = RunArgs::parse_from(["bf", "--show-tape", "a.bf"]);
        assert_eq!(args.display(), TapeDisplay::Live);
        let args = RunArgs::parse_from(["bf", "--dump-tape", "a.bf"]);
        assert_eq!(args.display(), TapeDisplay::Dump);
        let args = RunArgs::parse_from(["bf", "a.bf", "-"]);
        assert_eq!(args.display(), TapeDisplay::Hidden);
        assert_eq!(args.files, vec!["a.bf".to_string(), "-".to_string()]);
    }

    #[test]
    fn tape_flags_are_mutually_exclusive() {
        let res = RunArgs::try_parse_from(["bf", "--show-tape", "--dump-tape"]);
        assert!(res.is_err());
    }

    #[test]
    fn stdin_modes_are_mutually_exclusive() {
        let res = RunArgs::try_parse_from(["bf", "-c", "-f"]);
        assert!(res.is_err());
    }

    #[test]
    fn short_options_parse() {
        let args = RunArgs::parse_from(["bf", "-d", "10", "-i", "xyz", "-w", "40", "p.bf"]);
        assert_eq!(args.delay, Some(10));
        assert_eq!(args.input.as_deref(), Some("xyz"));
        assert_eq!(args.width, Some(40));
    }

    #[test]
    fn negative_width_parses() {
        let args = RunArgs::parse_from(["bf", "-w", "-5", "p.bf"]);
        assert_eq!(args.width, Some(-5));
        assert_eq!(args.files, vec!["p.bf".to_string()]);
    }

    #[test]
    fn terminal_stdin_without_files_is_no_input() {
        for flags in [&["bf"][..], &["bf", "-c"], &["bf", "-f"]] {
            let args = RunArgs::parse_from(flags.iter().copied());
            let err = ensure_script_source(&args, true).unwrap_err();
            assert!(matches!(err, BrainfuckError::NoInput), "flags {flags:?}");
            assert!(ensure_script_source(&args, false).is_ok());
        }

        let args = RunArgs::parse_from(["bf", "-c", "p.bf"]);
        assert!(ensure_script_source(&args, true).is_ok());
    }

    #[test]
    fn missing_script_file_is_an_io_error() {
        let err = read_script("definitely/not/here.bf").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Io);
        assert!(err.to_string().starts_with("cannot open file definitely/not/here.bf"));
    }
}
