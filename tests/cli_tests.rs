#![cfg(feature = "cli_api")]

use assert_cmd::Command;
use predicates::str::contains as str_contains;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.write_stdin(script.to_string()).assert()
}

#[test]
fn cli_creates_and_lists_work_items() {
    run_cli("add 2025-03-03 09:00 computer Somchai Accounting Fix the printer\nlist\nquit\n")
        .success()
        .stdout(str_contains("Work item created:"))
        .stdout(str_contains("Fix the printer"))
        .stdout(str_contains("morning"));
}

#[test]
fn cli_rejects_mutations_for_plain_users() {
    run_cli("role user\nadd 2025-03-03 09:00 computer Somchai Accounting Fix PC\nquit\n")
        .success()
        .stdout(str_contains("Session role set to user."))
        .stdout(str_contains(
            "Error: creating work items requires the admin role",
        ));
}

#[test]
fn cli_reports_bad_input() {
    run_cli("add 2025-03-03 9am computer Somchai Accounting Fix PC\nstatus abc done\nfrobnicate\nquit\n")
        .success()
        .stdout(str_contains("Invalid time (HH:MM)"))
        .stdout(str_contains("unknown work status 'done'"))
        .stdout(str_contains("Unknown command 'frobnicate'"));
}

#[test]
fn cli_day_view_shows_lanes() {
    let script = "add 2025-03-03 09:00 computer Somchai Accounting Fix PC\n\
                  add 2025-03-03 09:30 network Anan HR Cable\n\
                  day 2025-03-03\nquit\n";
    run_cli(script)
        .success()
        .stdout(str_contains("Timeline 2025-03-03 (tracks=2, slots=24)"))
        .stdout(str_contains("track 2"));
}

#[test]
fn cli_month_view_marks_busy_days() {
    run_cli("add 2025-03-07 09:00 computer Somchai Accounting Fix PC\nmonth 2025-03\nquit\n")
        .success()
        .stdout(str_contains("2025-03"))
        .stdout(str_contains(" 07(1)"));
}

#[test]
fn cli_completed_search_finds_finished_work() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    // status needs the id, so go through a saved file to learn it
    let first = run_cli(&format!(
        "add 2025-03-03 09:00 computer Somchai Accounting Fix PC\nsave json {path}\nquit\n"
    ))
    .success();
    let output = String::from_utf8_lossy(&first.get_output().stdout).to_string();
    let id = output
        .lines()
        .find_map(|line| line.split("Work item created: ").nth(1))
        .expect("created id")
        .trim()
        .to_string();

    run_cli(&format!(
        "load json {path}\ndone\nstatus {} complete\ndone 3/3/2025\nquit\n",
        &id[..8]
    ))
    .success()
    .stdout(str_contains("Loaded 1 work items from"))
    .stdout(str_contains("No completed work found."))
    .stdout(str_contains("set to complete."))
    .stdout(str_contains("Fix PC"));
}

#[test]
fn cli_save_and_load_csv_round_trip() {
    let tmp = NamedTempFile::new().expect("create temp file");
    let path = tmp.path().to_string_lossy().to_string();
    let script = format!(
        "add 2025-03-03 09:00 computer Somchai Accounting Persisted job\nsave csv {path}\n\
         add 2025-03-03 10:00 computer Somchai Accounting Temporary job\nload csv {path}\nlist\nquit\n"
    );
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);
    assert!(output.contains("Saved 1 work items to"));
    let after_reload = output
        .split("Loaded 1 work items from")
        .last()
        .unwrap_or_default();
    assert!(after_reload.contains("Persisted job"));
    assert!(
        !after_reload.contains("Temporary job"),
        "temporary item should not survive reload:\n{after_reload}"
    );
}
