use std::fs;
use std::path::Path;
use std::process::{Command, Output};

const TABLE: &str = "motif_id\tmotif_alt_id\tsequence_name\n\
                     x\tM1\tS1\n\
                     x\tM1\tS2\n\
                     x\tM2\tS1\n";

fn run_in(dir: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_motifmax"))
        .current_dir(dir)
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run motifmax")
}

fn setup(exclusions: &str) -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fimo.tsv"), TABLE).unwrap();
    fs::write(dir.path().join("seen.txt"), exclusions).unwrap();
    dir
}

#[test]
fn selects_most_common_motif() {
    let dir = setup("");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Most common motif: M1\nAppears in 2 sequences\nSequences: ['S1', 'S2']\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Test_values_1.txt")).unwrap(),
        "S1\nS2\n"
    );
    let report = fs::read_to_string(dir.path().join("Test_counts_1.txt")).unwrap();
    assert!(report.starts_with(">M1, number of sequences: 2\n"));
}

#[test]
fn excluded_motif_is_skipped() {
    let dir = setup("M1\n");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "2"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Most common motif: M2"));
    assert!(stdout.contains("Appears in 1 sequences"));
    assert_eq!(
        fs::read_to_string(dir.path().join("Test_values_2.txt")).unwrap(),
        "S1\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Test_counts_2.txt")).unwrap(),
        ">M2, number of sequences: 1\n['S1']\n"
    );
}

#[test]
fn filter_file_merges_into_exclusions() {
    let dir = setup("");
    fs::write(dir.path().join("common.txt"), "M1\n").unwrap();
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1", "common.txt"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Most common motif: M2"));
}

#[test]
fn everything_excluded_writes_sentinel_and_no_files() {
    let dir = setup("M1\nM2\n");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "3"]);
    assert!(output.status.success());
    assert_eq!(
        String::from_utf8_lossy(&output.stdout),
        "Most common motif: None\nAppears in 0 sequences\nSequences: []\n"
    );
    assert!(!dir.path().join("Test_values_3.txt").exists());
    assert!(!dir.path().join("Test_counts_3.txt").exists());
}

#[test]
fn repeated_run_appends_report() {
    let dir = setup("");
    assert!(run_in(dir.path(), &["fimo.tsv", "seen.txt", "1"]).status.success());
    fs::write(dir.path().join("seen.txt"), "M1\n").unwrap();
    assert!(run_in(dir.path(), &["fimo.tsv", "seen.txt", "1"]).status.success());

    assert_eq!(
        fs::read_to_string(dir.path().join("Test_counts_1.txt")).unwrap(),
        ">M1, number of sequences: 2\n['S1', 'S2']\n>M2, number of sequences: 1\n['S1']\n"
    );
    assert_eq!(
        fs::read_to_string(dir.path().join("Test_values_1.txt")).unwrap(),
        "S1\n"
    );
}

#[test]
fn missing_exclusion_list_is_empty_unless_required() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("fimo.tsv"), TABLE).unwrap();

    let output = run_in(dir.path(), &["fimo.tsv", "absent.txt", "1"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Most common motif: M1"));

    let output = run_in(
        dir.path(),
        &["fimo.tsv", "absent.txt", "5", "--require-exclusion-list"],
    );
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("absent.txt"));
    assert!(!dir.path().join("Test_values_5.txt").exists());
}

#[test]
fn missing_filter_file_warns() {
    let dir = setup("");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1", "nope.txt"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("nope.txt does not exist"));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Most common motif: M1"));
}

#[test]
fn out_dir_receives_files() {
    let dir = setup("");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "7", "--out-dir", "results"]);
    assert!(output.status.success());
    assert!(dir.path().join("results").join("Test_values_7.txt").exists());
    assert!(dir.path().join("results").join("Test_counts_7.txt").exists());
}

#[test]
fn missing_table_fails() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to open occurrence table"));
}

#[test]
fn missing_arguments_print_usage() {
    let dir = tempfile::tempdir().unwrap();
    let output = run_in(dir.path(), &["fimo.tsv"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Usage"));
}

#[test]
fn unreadable_filter_file_warns_and_continues() {
    let dir = setup("");
    fs::create_dir(dir.path().join("common_dir")).unwrap();
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1", "common_dir"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("common_dir"));
    assert!(String::from_utf8_lossy(&output.stdout).starts_with("Most common motif: M1\n"));
    assert!(dir.path().join("Test_counts_1.txt").exists());
}

#[test]
fn trailing_arguments_are_ignored() {
    let dir = setup("M1\n");
    let output = run_in(dir.path(), &["fimo.tsv", "seen.txt", "1", "nope.txt", "extra"]);
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("Most common motif: M2"));
}
