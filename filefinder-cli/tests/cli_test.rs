use anyhow::Result;
use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::{tempdir, TempDir};

fn sample_tree() -> Result<TempDir> {
    let dir = tempdir()?;
    fs::write(dir.path().join("report.txt"), "quarterly numbers\n")?;
    fs::write(dir.path().join("notes.md"), "nothing here\n")?;
    fs::create_dir(dir.path().join("archive"))?;
    fs::write(
        dir.path().join("archive/old_report.txt"),
        "line one\nQuarterly archive\n",
    )?;
    Ok(dir)
}

fn finder(dir: &TempDir) -> Result<Command> {
    let mut cmd = Command::cargo_bin("filefinder-cli")?;
    cmd.current_dir(dir.path()).arg("--plain");
    Ok(cmd)
}

#[test]
fn test_prints_all_sections() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "report", "--content", "quarterly", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("*".repeat(100)))
        .stdout(predicate::str::contains("Results found by name:"))
        .stdout(predicate::str::contains("Results found by content:"))
        .stdout(predicate::str::contains("Combined results:"))
        .stdout(predicate::str::contains("Results intersection:"))
        .stdout(predicate::str::contains("old_report.txt"))
        .stdout(predicate::str::contains("Quarterly archive"));
    Ok(())
}

#[test]
fn test_no_results_message() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "does-not-exist", "--path"])
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No results found for parameters provided",
        ));
    Ok(())
}

#[test]
fn test_missing_directory_is_not_an_error() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "report", "--path"])
        .arg(dir.path().join("missing"))
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "No results found for parameters provided",
        ));
    Ok(())
}

#[test]
fn test_json_output() -> Result<()> {
    let dir = sample_tree()?;
    let output = finder(&dir)?
        .args(["--name", "report", "--json", "--path"])
        .arg(dir.path())
        .output()?;
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout)?;
    let by_name = value["results_only_by_name"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("missing results_only_by_name"))?;
    assert_eq!(by_name.len(), 2);
    assert_eq!(value["intersection_result"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[test]
fn test_config_file_supplies_query() -> Result<()> {
    let dir = sample_tree()?;
    let config_path = dir.path().join("finder.yaml");
    fs::write(&config_path, "content: \"archive\"\n")?;

    finder(&dir)?
        .arg("--config")
        .arg(&config_path)
        .arg("--path")
        .arg(dir.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("Quarterly archive"));
    Ok(())
}

#[test]
fn test_missing_config_file_fails() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "report", "--config", "nope.yaml"])
        .assert()
        .failure();
    Ok(())
}

#[test]
fn test_invalid_timeout_rejected() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "report", "--timeout", "soon"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--timeout"));
    Ok(())
}

#[test]
fn test_debug_log_shows_configuration() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .args(["--name", "report", "--log-level", "debug", "--path"])
        .arg(dir.path())
        .env_remove("RUST_LOG")
        .assert()
        .success()
        .stderr(predicate::str::contains("Using configuration"));
    Ok(())
}

#[test]
fn test_help_documents_default_path() -> Result<()> {
    let dir = sample_tree()?;
    finder(&dir)?
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("current directory"));
    Ok(())
}
