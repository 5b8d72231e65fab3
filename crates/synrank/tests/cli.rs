//! End-to-end CLI integration tests
//!
//! These tests invoke the compiled binary as a subprocess. Lookups run
//! against a small WordNet database written to a temp dir, and the n-gram
//! endpoint points at a closed local port so nothing leaves the machine.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

/// Nothing listens on the discard port, so every request is refused.
const DEAD_ENDPOINT: &str = "http://127.0.0.1:9/ngrams/json";

/// Returns a Command configured to run our binary.
#[allow(deprecated)]
fn cmd() -> Command {
    let mut cmd = Command::cargo_bin(env!("CARGO_PKG_NAME")).unwrap();
    cmd.env_remove("SYNRANK_WORDNET_DIR")
        .env_remove("SYNRANK_API_KEY")
        .env_remove("RUST_LOG")
        .env("SYNRANK_NGRAM__ENDPOINT", DEAD_ENDPOINT)
        .env("SYNRANK_NGRAM__MAX_ATTEMPTS", "1");
    cmd
}

fn write_wordnet(dir: &Path) {
    let files = [
        (
            "index.noun",
            "tryout n 1 1 @ 1 0 00791078\n\
             test n 2 1 @ 2 0 00791078 00791227\n\
             trial n 2 1 @ 2 0 00791078 00791227\n\
             trial_run n 1 1 @ 1 0 00791227\n",
        ),
        (
            "data.noun",
            "00791078 04 n 03 test 0 trial 0 tryout 0 000 | trying something to find out about it\n\
             00791227 04 n 03 trial 1 trial_run 0 test 1 000 | the act of testing something\n",
        ),
        ("index.verb", "test v 1 1 @ 1 1 02531625\n"),
        (
            "data.verb",
            "02531625 31 v 03 test 0 prove 0 try_out 0 000 | put to the test\n",
        ),
        ("index.adj", ""),
        ("data.adj", ""),
        ("index.adv", ""),
        ("data.adv", ""),
    ];
    for (name, body) in files {
        fs::write(
            dir.join(name),
            format!("  1 This software and database is provided by Princeton University.\n{body}"),
        )
        .unwrap();
    }
}

fn wordnet() -> TempDir {
    let tmp = TempDir::new().unwrap();
    write_wordnet(tmp.path());
    tmp
}

fn json_stdout(output: &std::process::Output) -> Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("invalid JSON output")
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_shows_usage() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Usage:"))
        .stdout(predicate::str::contains("most"))
        .stdout(predicate::str::contains("more"))
        .stdout(predicate::str::contains("synonyms"));
}

#[test]
fn long_help_lists_environment() {
    cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("SYNRANK_API_KEY"));
}

#[test]
fn version_flag_shows_version() {
    cmd()
        .arg("-V")
        .assert()
        .success()
        .stdout(predicate::str::contains(env!("CARGO_PKG_VERSION")));
}

#[test]
fn version_only_prints_bare_version() {
    cmd()
        .arg("--version-only")
        .assert()
        .success()
        .stdout(predicate::str::diff(format!(
            "{}\n",
            env!("CARGO_PKG_VERSION")
        )));
}

#[test]
fn no_subcommand_shows_help() {
    cmd()
        .assert()
        .failure()
        .stderr(predicate::str::contains("Usage:"));
}

#[test]
fn invalid_subcommand_shows_error() {
    cmd()
        .arg("rank-everything")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

// =============================================================================
// Info & Global Flags
// =============================================================================

#[test]
fn info_json_outputs_valid_json() {
    let output = cmd().args(["info", "--json"]).output().unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["name"], env!("CARGO_PKG_NAME"));
    assert_eq!(json["version"], env!("CARGO_PKG_VERSION"));
    assert_eq!(json["config"]["endpoint"], DEAD_ENDPOINT);
}

#[test]
fn global_flags_accepted() {
    for flags in [
        &["--quiet"][..],
        &["-q"],
        &["-v"],
        &["-vv"],
        &["--color", "always"],
        &["--color", "never"],
    ] {
        cmd().args(flags).arg("info").assert().success();
    }
}

#[test]
fn chdir_nonexistent_fails() {
    cmd()
        .args(["-C", "/definitely/not/a/real/dir", "info"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to change directory"));
}

// =============================================================================
// Synonyms
// =============================================================================

#[test]
fn synonyms_narrow_uses_first_synset() {
    let db = wordnet();
    cmd()
        .args(["synonyms", "Test", "--wordnet-dir"])
        .arg(db.path())
        .assert()
        .success()
        .stdout(predicate::str::diff("trial\ntryout\n"));
}

#[test]
fn synonyms_lemmas_uses_every_synset() {
    let db = wordnet();
    let output = cmd()
        .args(["--json", "synonyms", "test", "--strategy", "lemmas", "--wordnet-dir"])
        .arg(db.path())
        .output()
        .unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["strategy"], "lemmas");
    assert_eq!(
        json["synonyms"],
        serde_json::json!(["prove", "trial", "tryout"])
    );
}

#[test]
fn synonyms_reads_wordnet_dir_from_env() {
    let db = wordnet();
    cmd()
        .env("SYNRANK_WORDNET_DIR", db.path())
        .args(["synonyms", "tryout"])
        .assert()
        .success()
        .stdout(predicate::str::diff("test\ntrial\n"));
}

#[test]
fn synonyms_of_short_word_is_empty() {
    let db = wordnet();
    let output = cmd()
        .args(["--json", "synonyms", "ox", "--wordnet-dir"])
        .arg(db.path())
        .output()
        .unwrap();
    assert_eq!(json_stdout(&output)["synonyms"], serde_json::json!([]));
}

#[test]
fn missing_wordnet_is_an_error() {
    let tmp = TempDir::new().unwrap();
    cmd()
        .args(["synonyms", "test", "--wordnet-dir"])
        .arg(tmp.path().join("absent"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to load WordNet"));
}

// =============================================================================
// Ranking
// =============================================================================

#[test]
fn most_without_frequency_data_keeps_complete_list() {
    let db = wordnet();
    let output = cmd()
        .args(["--json", "most", "tryout", "-r", "0.25", "--wordnet-dir"])
        .arg(db.path())
        .output()
        .unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["word"], "tryout");
    assert_eq!(json["ranked"], serde_json::json!([]));
    assert_eq!(json["complete"], serde_json::json!(["test", "trial"]));
}

#[test]
fn more_without_frequency_data_keeps_complete_list() {
    let db = wordnet();
    let output = cmd()
        .args(["--json", "more", "trial", "--wordnet-dir"])
        .arg(db.path())
        .output()
        .unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["ranked"], serde_json::json!([]));
    assert_eq!(json["complete"], serde_json::json!(["test", "tryout"]));
}

#[test]
fn most_of_unknown_word_is_empty() {
    let db = wordnet();
    let output = cmd()
        .args(["--json", "most", "zyzzyva", "--wordnet-dir"])
        .arg(db.path())
        .output()
        .unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["ranked"], serde_json::json!([]));
    assert_eq!(json["complete"], serde_json::json!([]));
}

#[test]
fn most_text_output_lists_all_synonyms() {
    let db = wordnet();
    cmd()
        .args(["--color", "never", "most", "tryout", "--wordnet-dir"])
        .arg(db.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("no frequency data"))
        .stdout(predicate::str::contains("All synonyms"))
        .stdout(predicate::str::contains("test, trial"));
}

#[test]
fn most_rejects_non_numeric_rate() {
    cmd()
        .args(["most", "tryout", "--domination-rate", "lots"])
        .assert()
        .failure();
}

// =============================================================================
// Frequency
// =============================================================================

#[test]
fn frequency_failure_reports_zero() {
    let output = cmd()
        .args(["--json", "frequency", "tryout", "--corpus", "en"])
        .output()
        .unwrap();
    let json = json_stdout(&output);
    assert_eq!(json["word"], "tryout");
    assert_eq!(json["corpus"], "en");
    assert_eq!(json["frequency"], 0.0);
}

#[test]
fn frequency_strict_surfaces_failure() {
    cmd()
        .args(["frequency", "tryout", "--strict"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("lookup of 'tryout' failed"));
}
