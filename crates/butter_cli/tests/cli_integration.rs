use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn butter() -> Command {
    Command::cargo_bin("butter").unwrap()
}

fn read_csv(path: &std::path::Path) -> Vec<Vec<f64>> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(|line| line.split(',').map(|v| v.parse().unwrap()).collect())
        .collect()
}

// =============================================================================
// GENERAL
// =============================================================================

#[test]
fn test_no_args_shows_help() {
    butter()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn test_version_flag() {
    butter()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("butter"));
}

#[test]
fn test_help_flag() {
    butter()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Butterworth"));
}

// =============================================================================
// DESIGN SUBCOMMAND
// =============================================================================

#[test]
fn test_design_lowpass_json() {
    let output = butter()
        .args(["design", "--sampling-rate", "1000", "--type", "lowpass", "--order", "2"])
        .args(["--cutoff", "100"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let a: Vec<f64> = serde_json::from_value(value["a"].clone()).unwrap();
    let b: Vec<f64> = serde_json::from_value(value["b"].clone()).unwrap();
    assert_eq!(a.len(), 3);
    assert_eq!(a[0], 1.0);
    assert!((a[1] + 1.142980502539901).abs() < 1e-12);
    assert!((b[0] - 0.06745527388907192).abs() < 1e-12);
}

#[test]
fn test_design_with_response() {
    butter()
        .args(["design", "-t", "highpass", "-c", "100", "--response"])
        .assert()
        .success()
        .stdout(predicate::str::contains("gain_db"))
        .stdout(predicate::str::contains("-3.01"));
}

#[test]
fn test_design_from_spec_file() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("notch.json");
    fs::write(
        &spec,
        r#"{"sampling_rate": 1000, "filter_type": "notch", "order": 2, "cutoffs": [48, 52]}"#,
    )
    .unwrap();

    let output = butter()
        .args(["design", "--spec"])
        .arg(&spec)
        .output()
        .unwrap();
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["a"].as_array().unwrap().len(), 5);
}

#[test]
fn test_design_above_nyquist_fails() {
    butter()
        .args(["design", "-s", "1000", "-t", "lowpass", "-o", "2", "-c", "600"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Nyquist"));
}

#[test]
fn test_design_inverted_band_fails() {
    butter()
        .args(["design", "-t", "bandpass", "-o", "1", "-c", "200", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("below upper cutoff"));
}

#[test]
fn test_design_missing_cutoff_fails() {
    butter()
        .args(["design", "-t", "notch", "-c", "50"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("needs 2 cutoff"));
}

#[test]
fn test_design_unknown_type_fails() {
    butter()
        .args(["design", "-t", "allpass", "-c", "100"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("allpass"));
}

#[test]
fn test_design_unknown_type_in_spec_file_fails() {
    let dir = TempDir::new().unwrap();
    let spec = dir.path().join("allpass.json");
    fs::write(
        &spec,
        r#"{"sampling_rate": 1000, "filter_type": "allpass", "order": 2, "cutoffs": [100]}"#,
    )
    .unwrap();

    butter()
        .args(["design", "--spec"])
        .arg(&spec)
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Unknown filter type"));
}

#[test]
fn test_design_huge_order_fails() {
    butter()
        .args(["design", "-o", "18446744073709551615", "-c", "100"])
        .assert()
        .code(2)
        .stderr(predicate::str::contains("Filter order must be between"));
}

#[test]
fn test_design_calculation_failure_exit_code() {
    butter()
        .args(["design", "-t", "bandpass", "-o", "13", "-c", "100", "101"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("not real"));
}

#[test]
fn test_design_missing_spec_file_fails() {
    butter()
        .args(["design", "--spec", "/nonexistent/filter.json"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Failed to open spec file"));
}

// =============================================================================
// GENERATE / FILTER
// =============================================================================

#[test]
fn test_generate_is_reproducible() {
    let run = || {
        butter()
            .args(["generate", "--rows", "20", "--columns", "3", "--seed", "9"])
            .output()
            .unwrap()
            .stdout
    };
    let first = run();
    assert_eq!(first, run());

    let text = String::from_utf8(first).unwrap();
    assert_eq!(text.lines().count(), 20);
    for line in text.lines() {
        let values: Vec<f64> = line.split(',').map(|v| v.parse().unwrap()).collect();
        assert_eq!(values.len(), 3);
        assert!(values.iter().all(|v| (100.0..200.0).contains(v)));
    }
}

#[test]
fn test_generate_then_filter() {
    let dir = TempDir::new().unwrap();
    let raw = dir.path().join("data.csv");
    let filtered = dir.path().join("data_filt.csv");
    let zero_phase = dir.path().join("data_filtfilt.csv");

    butter()
        .args(["generate", "--rows", "2000", "--columns", "4", "--seed", "3", "--output"])
        .arg(&raw)
        .assert()
        .success();

    for (out, extra) in [(&filtered, None), (&zero_phase, Some("--zero-phase"))] {
        let mut cmd = butter();
        cmd.args(["filter", "-t", "lowpass", "-o", "2", "-c", "100", "--input"])
            .arg(&raw)
            .arg("--output")
            .arg(out);
        if let Some(flag) = extra {
            cmd.arg(flag);
        }
        cmd.assert().success();
    }

    let input = read_csv(&raw);
    for path in [&filtered, &zero_phase] {
        let output = read_csv(path);
        assert_eq!(output.len(), input.len());
        assert!(output.iter().all(|row| row.len() == 4));

        // Smoothing lowers sample-to-sample jumps in every channel
        for c in 0..4 {
            let jumps = |data: &[Vec<f64>]| -> f64 {
                data.windows(2).map(|w| (w[1][c] - w[0][c]).abs()).sum()
            };
            assert!(jumps(&output[..]) < jumps(&input[..]), "column {}", c);
        }
    }
}

#[test]
fn test_filter_with_offset_correction() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("constant.csv");
    fs::write(&input, "150,-20\n".repeat(50)).unwrap();

    let output = butter()
        .args(["filter", "-c", "100", "--offset-correction", "--input"])
        .arg(&input)
        .output()
        .unwrap();
    assert!(output.status.success());

    let text = String::from_utf8(output.stdout).unwrap();
    for line in text.lines() {
        let values: Vec<f64> = line.split(',').map(|v| v.parse().unwrap()).collect();
        assert!((values[0] - 150.0).abs() < 1e-9);
        assert!((values[1] + 20.0).abs() < 1e-9);
    }
}

#[test]
fn test_filter_rejects_bad_csv() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("bad.csv");
    fs::write(&input, "1,2\n3,oops\n").unwrap();

    butter()
        .args(["filter", "-c", "100", "--input"])
        .arg(&input)
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Invalid number"));
}

#[test]
fn test_filter_missing_input_fails() {
    butter()
        .args(["filter", "-c", "100", "--input", "/nonexistent/data.csv"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to open"));
}
