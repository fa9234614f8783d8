use bf_tape::cli_util::program_name;
use bf_tape::commands::run::{self, RunArgs};
use clap::Parser;
use std::env;

fn main() {
    // Diagnostics and usage text are prefixed with the invoked name
    let program = program_name(env::args().next());

    let args = RunArgs::parse();

    std::process::exit(run::run(&program, args));
}
