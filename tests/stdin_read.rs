// Exercises ',' against piped stdin and each end-of-input policy.
use assert_cmd::Command;
use predicates::prelude::*;
use std::io::Write;
use std::time::Duration;

fn cargo_bin() -> Command {
    let mut cmd = Command::cargo_bin("segbf").unwrap();
    cmd.env_remove("BF_EOF").timeout(Duration::from_secs(2));
    cmd
}

fn source_file(content: &str) -> tempfile::NamedTempFile {
    let mut tf = tempfile::NamedTempFile::new().expect("tempfile");
    write!(tf, "{}", content).unwrap();
    tf
}

#[test]
fn echoes_stdin_until_eof() {
    let tf = source_file(",[.,]");
    cargo_bin()
        .arg(tf.path())
        .write_stdin("Zebra")
        .assert()
        .success()
        .stdout("Zebra");
}

#[test]
fn eof_flag_unchanged_keeps_cell() {
    let tf = source_file("+++,.");
    cargo_bin()
        .args(["--eof", "unchanged"])
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::eq(&[3u8][..]));
}

#[test]
fn eof_flag_all_ones_stores_255() {
    let tf = source_file("+++,.");
    cargo_bin()
        .args(["--eof", "all-ones"])
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::eq(&[255u8][..]));
}

#[test]
fn eof_env_is_used_without_flag() {
    let tf = source_file("+++,.");
    cargo_bin()
        .env("BF_EOF", "all-ones")
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::eq(&[255u8][..]));
}

#[test]
fn eof_flag_overrides_env() {
    let tf = source_file("+++,.");
    cargo_bin()
        .env("BF_EOF", "all-ones")
        .args(["--eof", "zero"])
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::eq(&[0u8][..]));
}

#[test]
fn eof_from_config_file() {
    let home = tempfile::tempdir().unwrap();
    let config_home = home.path().join(".config");
    std::fs::create_dir_all(&config_home).unwrap();
    std::fs::write(config_home.join("bf.toml"), "[interpreter]\neof = \"unchanged\"\n").unwrap();

    let tf = source_file("+++,.");
    cargo_bin()
        .env("HOME", home.path())
        .env("XDG_CONFIG_HOME", &config_home)
        .arg(tf.path())
        .write_stdin("")
        .assert()
        .success()
        .stdout(predicate::eq(&[3u8][..]));
}
