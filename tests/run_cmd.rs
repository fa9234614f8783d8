use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("bf").unwrap();
    cmd.timeout(Duration::from_secs(5));
    cmd
}

fn script(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn runs_script_file() {
    let tf = script("++++++++[>++++++++<-]>+. print A");
    cargo_bin()
        .arg("-w").arg("78")
        .arg(tf.path())
        .assert()
        .success()
        .stdout("A")
        .stderr(predicate::str::is_empty());
}

#[test]
fn scripts_run_in_order_with_fresh_tapes() {
    let a = script("+.");
    let b = script("+.");
    cargo_bin()
        .arg("-w").arg("78")
        .arg(a.path())
        .arg(b.path())
        .assert()
        .success()
        .stdout("\u{1}\u{1}");
}

#[test]
fn input_is_shared_across_scripts() {
    let a = script(",.");
    let b = script(",.");
    cargo_bin()
        .args(["-w", "78", "--input", "AB"])
        .arg(a.path())
        .arg(b.path())
        .assert()
        .success()
        .stdout("AB");
}

#[test]
fn exhausted_input_is_an_error() {
    let tf = script(",.");
    cargo_bin()
        .args(["-w", "78", "-i", ""])
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("not enough input was given"));
}

#[test]
fn output_before_exhausted_input_is_kept() {
    let tf = script("+.,.");
    cargo_bin()
        .args(["-w", "78", "-i", ""])
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout("\u{1}")
        .stderr(predicate::str::contains("not enough input"));
}

#[test]
fn narrow_width_fails_before_running() {
    let tf = script("+++++++++++++++++++++++++++++++++.");
    cargo_bin()
        .args(["-w", "6"])
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("terminal is not wide enough"));
}

#[test]
fn negative_width_fails_before_running() {
    let tf = script("+++++++++++++++++++++++++++++++++.");
    cargo_bin()
        .args(["-w", "-5"])
        .arg(tf.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("terminal is not wide enough"));
}

#[test]
fn missing_file_is_reported() {
    let good = script("+.");
    cargo_bin()
        .args(["-w", "78"])
        .arg(good.path())
        .arg("no/such/script.bf")
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("cannot open file no/such/script.bf"));
}

#[test]
fn unmatched_bracket_is_reported_before_running() {
    let good = script("+.");
    let bad = script("+[.");
    cargo_bin()
        .args(["-w", "78"])
        .arg(good.path())
        .arg(bad.path())
        .assert()
        .code(1)
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("unmatched bracket '['").and(predicate::str::contains("^")));
}

#[test]
fn piped_code_runs_without_file_arguments() {
    cargo_bin()
        .args(["-w", "78"])
        .write_stdin("+++.")
        .assert()
        .success()
        .stdout("\u{3}");
}

#[test]
fn dash_reads_script_from_stdin() {
    let tf = script("++.");
    cargo_bin()
        .args(["-w", "78"])
        .arg(tf.path())
        .arg("-")
        .write_stdin("+.")
        .assert()
        .success()
        .stdout("\u{2}\u{1}");
}

#[test]
fn stdin_filenames_are_read() {
    let tf = script("++++.");
    let listing = format!("{}\n", tf.path().display());
    cargo_bin()
        .args(["-w", "78", "--stdin-filenames"])
        .write_stdin(listing)
        .assert()
        .success()
        .stdout("\u{4}");
}

#[test]
fn stdin_code_follows_file_arguments() {
    let tf = script("+.");
    cargo_bin()
        .args(["-w", "78", "-c"])
        .arg(tf.path())
        .write_stdin("++.")
        .assert()
        .success()
        .stdout("\u{1}\u{2}");
}

#[test]
fn interactive_read_with_piped_stdin_fails() {
    cargo_bin()
        .args(["-w", "78"])
        .write_stdin(",.")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("stdin is already in use"));
}

#[test]
fn dump_tape_prints_tape_after_run() {
    let tf = script("+++");
    cargo_bin()
        .args(["-w", "78", "--dump-tape"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("  3   \n"));
}

#[test]
fn dump_tape_prints_output_after_tape() {
    let tf = script("+++.>++");
    cargo_bin()
        .args(["-w", "78", "--dump-tape"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::ends_with("  3     2   \n\u{3}"));
}

#[test]
fn show_tape_highlights_pointer() {
    let tf = script("+>++.");
    cargo_bin()
        .args(["-w", "78", "--show-tape", "--delay", "0"])
        .arg(tf.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("(2  )").and(predicate::str::ends_with("\u{2}")));
}

#[test]
fn tape_flags_conflict() {
    let tf = script("+");
    cargo_bin()
        .args(["--dump-tape", "--show-tape"])
        .arg(tf.path())
        .assert()
        .failure();
}

#[test]
fn help_goes_to_stderr() {
    cargo_bin()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("Usage:").and(predicate::str::contains("--show-tape")));
}
