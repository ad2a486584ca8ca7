//! Command-line tests for the blast-hit-extract binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::path::Path;
use tempfile::tempdir;

const GENES_REPORT: &str = "\
A\tHOT229_1_0200m_c10096_4\t100.00\t147\t0\t0\t1\t147\t400\t546\t2e-70\t 272
A\tHOT233_1c_0200m_c3_1\t100.00\t147\t0\t0\t1\t147\t1\t147\t2e-70\t 272
A\tHOT229_1_0200m_c99999_1\t98.00\t147\t0\t0\t1\t147\t1\t147\t2e-70\t 250
";

fn cmd() -> Command {
    Command::cargo_bin("blast-hit-extract").unwrap()
}

fn setup_catalog(root: &Path) {
    let sample = root.join("HOT229_1_0200m");
    std::fs::create_dir_all(&sample).unwrap();
    std::fs::write(
        sample.join("genes.fna"),
        ">c10096_4\nACGTACGT\n>c10096_5\nGGGG\n",
    )
    .unwrap();
}

#[test]
fn test_hits_text() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("q.fa-genes.tab");
    std::fs::write(&report, GENES_REPORT).unwrap();

    cmd()
        .arg("hits")
        .arg(&report)
        .assert()
        .success()
        .stdout(predicate::str::contains("HOT229_1_0200m (2 hits)"))
        .stdout(predicate::str::contains("  c3_1"));
}

#[test]
fn test_hits_json_from_stdin() {
    let output = cmd()
        .args(["--format", "json", "hits", "-"])
        .write_stdin(GENES_REPORT)
        .output()
        .unwrap();
    assert!(output.status.success());

    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(
        json["HOT229_1_0200m"],
        serde_json::json!(["c10096_4", "c99999_1"])
    );
    assert_eq!(json["HOT233_1c_0200m"], serde_json::json!(["c3_1"]));
}

#[test]
fn test_hits_full_id_mode() {
    cmd()
        .args(["hits", "--id-mode", "full", "-"])
        .write_stdin(GENES_REPORT)
        .assert()
        .success()
        .stdout(predicate::str::contains("  HOT233_1c_0200m_c3_1"));
}

#[test]
fn test_hits_malformed_row_fails() {
    cmd()
        .args(["hits", "-"])
        .write_stdin("A\tHOT229_1_0200m_c10096_4\t100\nA\tunrelated_subject\t100\n")
        .assert()
        .failure()
        .stderr(predicate::str::contains("line 2"));
}

#[test]
fn test_extract_directory() {
    let blast_out = tempdir().unwrap();
    let catalog = tempdir().unwrap();
    let work = tempdir().unwrap();
    let out = work.path().join("hits");

    std::fs::write(blast_out.path().join("q.fa-genes.tab"), GENES_REPORT).unwrap();
    setup_catalog(catalog.path());

    cmd()
        .arg("extract")
        .arg(blast_out.path())
        .arg(catalog.path())
        .arg(&out)
        .arg("--summary")
        .arg(work.path().join("summary.json"))
        .assert()
        .success()
        .stdout(predicate::str::contains("Extracted 1 of 2 samples (1 skipped)"))
        .stdout(predicate::str::contains("1 unresolved ids"));

    assert_eq!(
        std::fs::read_to_string(out.join("HOT229_1_0200m-genes.fna")).unwrap(),
        ">c10096_4\nACGTACGT\n"
    );

    let summary: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(work.path().join("summary.json")).unwrap())
            .unwrap();
    assert_eq!(summary["samples"].as_array().unwrap().len(), 2);
}

#[test]
fn test_extract_missing_catalog_fails() {
    let blast_out = tempdir().unwrap();
    let work = tempdir().unwrap();

    cmd()
        .arg("extract")
        .arg(blast_out.path())
        .arg(work.path().join("no-such-catalog"))
        .arg(work.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("no-such-catalog"));
}

#[test]
fn test_extract_malformed_report_names_file() {
    let blast_out = tempdir().unwrap();
    let catalog = tempdir().unwrap();
    let work = tempdir().unwrap();

    std::fs::write(
        blast_out.path().join("q.fa-proteins.tab"),
        "A\tsp|P69905|HBA_HUMAN\t100.00\n",
    )
    .unwrap();

    cmd()
        .arg("extract")
        .arg(blast_out.path())
        .arg(catalog.path())
        .arg(work.path().join("out"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("q.fa-proteins.tab"));
}

#[test]
fn test_fetch_tsv() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("q.fa-genes.tab");
    std::fs::write(&report, GENES_REPORT).unwrap();
    setup_catalog(dir.path());
    let output = dir.path().join("out.fna");

    cmd()
        .args(["--format", "tsv", "fetch"])
        .arg(&report)
        .arg(dir.path().join("HOT229_1_0200m").join("genes.fna"))
        .arg("HOT229_1_0200m")
        .arg(&output)
        .assert()
        .success()
        .stdout(predicate::str::contains("c10096_4\tfound"))
        .stdout(predicate::str::contains("c99999_1\tmissing"));

    assert_eq!(
        std::fs::read_to_string(output).unwrap(),
        ">c10096_4\nACGTACGT\n"
    );
}

#[test]
fn test_fetch_unknown_sample_fails() {
    let dir = tempdir().unwrap();
    let report = dir.path().join("q.fa-genes.tab");
    std::fs::write(&report, GENES_REPORT).unwrap();
    setup_catalog(dir.path());

    cmd()
        .arg("fetch")
        .arg(&report)
        .arg(dir.path().join("HOT229_1_0200m").join("genes.fna"))
        .arg("HOT999_0200m")
        .arg(dir.path().join("out.fna"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("No hits for sample HOT999_0200m"));
}
