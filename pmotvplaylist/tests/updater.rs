//! Tests du lanceur de la commande de mise à jour.

use std::time::Duration;

use pmotvplaylist::{Error, UpdateOutcome, UpdateRunner};

/// Écrit un script shell dans `dir` et retourne la ligne de commande `sh <script> <args>`.
fn shell_command(dir: &std::path::Path, name: &str, body: &str, args: &[&str]) -> String {
    let script = dir.join(name);
    std::fs::write(&script, body).unwrap();
    let mut command = format!("sh {}", script.display());
    for arg in args {
        command.push(' ');
        command.push_str(arg);
    }
    command
}

#[test]
fn test_empty_command_is_rejected() {
    assert!(matches!(
        UpdateRunner::new("", None),
        Err(Error::EmptyCommand)
    ));
    assert!(matches!(
        UpdateRunner::new("   ", None),
        Err(Error::EmptyCommand)
    ));
}

#[test]
fn test_command_line_is_split_on_whitespace() {
    let runner = UpdateRunner::new("python3 update_playlist.py --verbose", None).unwrap();
    assert_eq!(runner.program(), "python3");
    assert_eq!(runner.timeout(), None);

    let runner = UpdateRunner::new("false", Some(Duration::from_secs(5))).unwrap();
    assert_eq!(runner.program(), "false");
    assert_eq!(runner.timeout(), Some(Duration::from_secs(5)));
}

#[tokio::test]
async fn test_successful_command_captures_stdout() {
    let runner = UpdateRunner::new("echo hello", None).unwrap();

    match runner.run().await {
        UpdateOutcome::Success { stdout } => assert_eq!(stdout, "hello\n"),
        other => panic!("expected Success, got {other:?}"),
    }
}

#[tokio::test]
async fn test_failing_command_reports_exit_code() {
    let runner = UpdateRunner::new("false", None).unwrap();

    match runner.run().await {
        UpdateOutcome::Failed { exit_code } => assert_eq!(exit_code, Some(1)),
        other => panic!("expected Failed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_unknown_program_reports_spawn_error() {
    let runner = UpdateRunner::new("/nonexistent/pmotv-update-xyz", None).unwrap();

    assert!(matches!(
        runner.run().await,
        UpdateOutcome::SpawnError { .. }
    ));
}

#[tokio::test]
async fn test_slow_command_times_out_and_is_killed() {
    let dir = tempfile::tempdir().unwrap();
    let marker = dir.path().join("late.txt");
    let command = shell_command(
        dir.path(),
        "slow.sh",
        "#!/bin/sh\nsleep 1\necho late > \"$1\"\n",
        &[&marker.display().to_string()],
    );

    let limit = Duration::from_millis(200);
    let runner = UpdateRunner::new(&command, Some(limit)).unwrap();

    match runner.run().await {
        UpdateOutcome::TimedOut { limit: reported } => assert_eq!(reported, limit),
        other => panic!("expected TimedOut, got {other:?}"),
    }

    // Le processus a été tué : le marqueur qu'il aurait écrit à ~1s n'apparaît pas
    tokio::time::sleep(Duration::from_millis(1500)).await;
    assert!(!marker.exists());
}

#[tokio::test]
async fn test_concurrent_runs_share_one_execution() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("count.txt");
    let command = shell_command(
        dir.path(),
        "count.sh",
        "#!/bin/sh\necho run >> \"$1\"\nsleep 1\necho done\n",
        &[&counter.display().to_string()],
    );

    let runner = UpdateRunner::new(&command, None).unwrap();
    let (a, b) = tokio::join!(runner.run(), runner.run());

    for outcome in [a, b] {
        match outcome {
            UpdateOutcome::Success { stdout } => assert_eq!(stdout, "done\n"),
            other => panic!("expected Success, got {other:?}"),
        }
    }

    // Une seule exécution pour les deux appels
    let runs = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(runs.lines().count(), 1);
}

#[tokio::test]
async fn test_sequential_runs_each_execute() {
    let dir = tempfile::tempdir().unwrap();
    let counter = dir.path().join("count.txt");
    let command = shell_command(
        dir.path(),
        "count.sh",
        "#!/bin/sh\necho run >> \"$1\"\n",
        &[&counter.display().to_string()],
    );

    let runner = UpdateRunner::new(&command, None).unwrap();
    assert!(matches!(runner.run().await, UpdateOutcome::Success { .. }));
    assert!(matches!(runner.run().await, UpdateOutcome::Success { .. }));

    let runs = std::fs::read_to_string(&counter).unwrap();
    assert_eq!(runs.lines().count(), 2);
}
