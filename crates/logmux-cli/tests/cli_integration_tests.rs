//! CLI integration tests
//!
//! Run the built binary against temporary directories and check what it
//! prints and writes.

use std::fs;
use std::process::Command;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(env!("CARGO_BIN_EXE_logmux-cli"))
}

#[test]
fn test_emit_prints_formatted_line() {
    let output = cli()
        .args(["emit", "--domain", "net", "--level", "warning", "link down"])
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.trim_end().ends_with("net-warning-link down"));
}

#[test]
fn test_emit_below_floor_prints_nothing() {
    let output = cli()
        .args(["emit", "--level", "message", "quiet"])
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    assert!(output.stdout.is_empty());
}

#[test]
fn test_emit_json_with_tags() {
    let output = cli()
        .args([
            "emit",
            "--json",
            "--min-level",
            "debug",
            "--level",
            "trace",
            "--tag",
            "req=r-9",
            "step one",
        ])
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let record: serde_json::Value = serde_json::from_str(stdout.lines().next().unwrap()).unwrap();
    assert_eq!(record["level"], "trace");
    assert_eq!(record["message"], "step one");
    assert_eq!(record["tags"], serde_json::json!(["r-9"]));
}

#[test]
fn test_emit_to_rotating_file_from_workers() {
    // Scenario: four workers log through the output thread into a small file
    let temp_dir = TempDir::new().unwrap();
    let log_dir = temp_dir.path().join("logs");

    let output = cli()
        .args([
            "emit",
            "--threads",
            "4",
            "--file-dir",
            log_dir.to_str().unwrap(),
            "--file-name",
            "cli.log",
            "--max-size",
            "512",
            "--level",
            "error",
            "alpha",
            "bravo",
            "charlie",
        ])
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());

    // Every worker's records reached the files, tagged with the worker id
    let mut all = String::new();
    for entry in fs::read_dir(&log_dir).unwrap() {
        let path = entry.unwrap().path();
        let size = fs::metadata(&path).unwrap().len();
        assert!(size <= 512, "{} is {} bytes", path.display(), size);
        all.push_str(&fs::read_to_string(&path).unwrap());
    }
    assert_eq!(all.lines().count(), 12);
    for worker in 0..4 {
        assert_eq!(all.matches(&format!("[{}] charlie", worker)).count(), 1);
    }
    assert!(log_dir.join("cli.log.1").exists());
}

#[test]
fn test_levels_reads_config() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("logmux.toml");
    fs::write(
        &config,
        "level = \"error\"\n[domains]\nmedia = \"message\"\n",
    )
    .unwrap();

    let output = cli()
        .args(["levels", "--config", config.to_str().unwrap(), "net"])
        .output()
        .expect("Failed to execute CLI");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    assert!(stdout.contains("default: error|fatal"));
    assert!(stdout.contains("media: message|warning|error|fatal"));
    assert!(stdout.contains("net: error|fatal"));
}

#[test]
fn test_bad_config_fails() {
    let temp_dir = TempDir::new().unwrap();
    let config = temp_dir.path().join("bad.toml");
    fs::write(&config, "level = \"loud\"\n").unwrap();

    let output = cli()
        .args(["levels", "--config", config.to_str().unwrap()])
        .output()
        .expect("Failed to execute CLI");

    assert!(!output.status.success());
    let stderr = String::from_utf8(output.stderr).unwrap();
    assert!(stderr.contains("ERR_INVALID_CONFIG"));
}
