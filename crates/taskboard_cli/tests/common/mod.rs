#![allow(dead_code)]

use std::io::Write;
use std::path::PathBuf;
use std::process::{Command, Output, Stdio};
use std::time::{SystemTime, UNIX_EPOCH};
use time::macros::format_description;
use time::{Duration, OffsetDateTime};

pub const PAST_DEADLINE: &str = "2000-01-01T00:00";

pub fn temp_path(file_name: &str) -> PathBuf {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    std::env::temp_dir().join(format!("taskboard-{nanos}-{file_name}"))
}

/// Deadline text `offset` from now, in the UTC zone the session runs in.
pub fn deadline_in(offset: Duration) -> String {
    let format = format_description!("[year]-[month]-[day]T[hour]:[minute]");
    (OffsetDateTime::now_utc() + offset).format(format).unwrap()
}

pub fn run_session(args: &[&str], input: &str) -> Output {
    run_session_with_config(args, input, None)
}

/// Like `run_session`, with the given JSON written as the config file.
pub fn run_session_with_config(args: &[&str], input: &str, config: Option<&str>) -> Output {
    let exe = env!("CARGO_BIN_EXE_taskboard");
    let config_path = temp_path("config.json");
    if let Some(config) = config {
        std::fs::write(&config_path, config).expect("failed to write config");
    }

    let mut child = Command::new(exe)
        .args(args)
        .env("TZ", "UTC")
        .env("TASKBOARD_CONFIG_PATH", &config_path)
        .env("TASKBOARD_DISABLE_NOTIFICATIONS", "1")
        .env_remove("TASKBOARD_LOG")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("failed to spawn session");

    {
        let stdin = child.stdin.as_mut().expect("stdin");
        stdin
            .write_all(input.as_bytes())
            .expect("failed to write to stdin");
    }

    let output = child
        .wait_with_output()
        .expect("failed to read session output");
    std::fs::remove_file(&config_path).ok();
    output
}

pub fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

pub fn stderr_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}
