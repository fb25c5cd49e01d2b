use assert_cmd::Command;
use tempfile::tempdir;
use typemaster::config::{Difficulty, Mode};
use typemaster::records::{RecordStore, Records, SqliteRecordStore};
use typemaster::SessionSummary;

fn stdout_of(output: &std::process::Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn help_lists_modes() {
    let output = Command::cargo_bin("typemaster")
        .unwrap()
        .arg("--help")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("--mode"));
    assert!(stdout.contains("--difficulty"));
    assert!(stdout.contains("quotes"));
}

#[test]
fn records_on_fresh_home_are_zero() {
    let home = tempdir().unwrap();
    let output = Command::cargo_bin("typemaster")
        .unwrap()
        .env("HOME", home.path())
        .arg("--records")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = stdout_of(&output);
    assert!(stdout.contains("best wpm:      0"), "{stdout}");
    assert!(stdout.contains("streak:        0"), "{stdout}");
    assert!(home
        .path()
        .join(".local/state/typemaster/records.db")
        .exists());
}

#[test]
fn unknown_mode_is_rejected() {
    Command::cargo_bin("typemaster")
        .unwrap()
        .args(["--mode", "marathon"])
        .assert()
        .failure();
}

#[test]
fn refuses_to_run_without_a_tty() {
    let home = tempdir().unwrap();
    let output = Command::cargo_bin("typemaster")
        .unwrap()
        .env("HOME", home.path())
        .write_stdin("")
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("tty"));
}

#[test]
fn reset_records_clears_the_store() {
    let home = tempdir().unwrap();
    let db = home.path().join(".local/state/typemaster/records.db");
    {
        let mut store = SqliteRecordStore::open(&db).unwrap();
        store
            .record(&SessionSummary {
                mode: Mode::Words,
                difficulty: Difficulty::Easy,
                wpm: 55,
                accuracy: 97,
                score: 53,
                elapsed_secs: 20.0,
                correct_chars: 90,
                incorrect_chars: 3,
                completed_words: 18,
                total_words: 30,
            })
            .unwrap();
    }

    let output = Command::cargo_bin("typemaster")
        .unwrap()
        .env("HOME", home.path())
        .arg("--reset-records")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(stdout_of(&output).contains("records cleared"));

    let store = SqliteRecordStore::open(&db).unwrap();
    assert_eq!(store.load().unwrap(), Records::default());
    assert!(store.recent(5).unwrap().is_empty());
}
