// CLI integration tests for the import and inspect flows.
use std::fs;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

use serde_json::Value;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/filme.json");

fn cmd() -> Command {
    let exe = env!("CARGO_BIN_EXE_filmliste");
    Command::new(exe)
}

fn parse_json(value: &str) -> Value {
    serde_json::from_str(value).expect("valid json")
}

fn read_lines(path: &Path) -> Vec<Value> {
    fs::read_to_string(path)
        .expect("read")
        .lines()
        .map(parse_json)
        .collect()
}

#[test]
fn inspect_prints_metadata() {
    let inspect = cmd().args(["inspect", FIXTURE]).output().expect("inspect");
    assert!(inspect.status.success());
    let json = parse_json(std::str::from_utf8(&inspect.stdout).expect("utf8"));
    assert_eq!(json["version"], "3");
    assert_eq!(json["fingerprint"], "abc123hash");
    assert_eq!(json["published_at"], "2024-01-01T10:00:00Z");
}

#[test]
fn import_writes_rows_and_summary() {
    let temp = tempfile::tempdir().expect("tempdir");
    let out = temp.path().join("rows");

    let import = cmd()
        .args(["import", FIXTURE, "--out", out.to_str().unwrap()])
        .output()
        .expect("import");
    assert!(import.status.success());

    let summary = parse_json(std::str::from_utf8(&import.stdout).expect("utf8"));
    assert_eq!(summary["movies"], 5);
    assert_eq!(summary["channels"]["total"], 2);
    assert_eq!(summary["topics"]["total"], 3);
    assert_eq!(summary["report"]["url_degrades"], 1);

    let stderr = String::from_utf8_lossy(&import.stderr);
    let notice = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find(|value| value.get("notice").is_some())
        .expect("degrade notice");
    assert_eq!(notice["notice"]["kind"], "degraded");
    assert_eq!(notice["notice"]["cmd"], "import");

    let channels = read_lines(&out.join("channels.jsonl"));
    assert_eq!(channels[0]["id"], 1);
    assert_eq!(channels[0]["name"], "ARD");
    let movies = read_lines(&out.join("movies.jsonl"));
    assert_eq!(movies.len(), 5);
    assert_eq!(movies[4]["channel"], "ZDF");
    assert_eq!(movies[4]["topic_id"], 2);
    assert!(out.join("metadata.json").exists());
}

#[test]
fn known_names_round_trip_through_output_rows() {
    let temp = tempfile::tempdir().expect("tempdir");
    let first = temp.path().join("first");
    let second = temp.path().join("second");

    let run = cmd()
        .args(["import", FIXTURE, "--out", first.to_str().unwrap()])
        .output()
        .expect("first import");
    assert!(run.status.success());

    let run = cmd()
        .args([
            "import",
            FIXTURE,
            "--out",
            second.to_str().unwrap(),
            "--known-channels",
            first.join("channels.jsonl").to_str().unwrap(),
            "--known-topics",
            first.join("topics.jsonl").to_str().unwrap(),
            "--only-new-names",
        ])
        .output()
        .expect("second import");
    assert!(run.status.success());

    assert!(read_lines(&second.join("channels.jsonl")).is_empty());
    assert!(read_lines(&second.join("topics.jsonl")).is_empty());
    let movies = read_lines(&second.join("movies.jsonl"));
    assert_eq!(movies[3]["channel_id"], 2);
}

#[test]
fn import_reads_stdin() {
    let mut child = cmd()
        .args(["import", "-"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .expect("spawn");
    let feed = fs::read(FIXTURE).expect("fixture");
    child
        .stdin
        .take()
        .expect("stdin")
        .write_all(&feed)
        .expect("write");
    let output = child.wait_with_output().expect("wait");
    assert!(output.status.success());
    let summary = parse_json(std::str::from_utf8(&output.stdout).expect("utf8"));
    assert_eq!(summary["metadata"]["fingerprint"], "abc123hash");
}

#[test]
fn malformed_feed_exit_code() {
    let temp = tempfile::tempdir().expect("tempdir");
    let feed = temp.path().join("broken.json");
    fs::write(&feed, r#"{"X":["ARD","Tagesschau"]}"#).expect("write");
    let out = temp.path().join("rows");

    let import = cmd()
        .args([
            "import",
            feed.to_str().unwrap(),
            "--out",
            out.to_str().unwrap(),
        ])
        .output()
        .expect("import");
    assert_eq!(import.status.code().unwrap(), 7);
    assert!(!out.exists());

    let stderr = String::from_utf8_lossy(&import.stderr);
    let error = stderr
        .lines()
        .filter_map(|line| serde_json::from_str::<Value>(line).ok())
        .find(|value| value.get("error").is_some())
        .expect("error json");
    assert_eq!(error["error"]["kind"], "Format");
}

#[test]
fn not_found_exit_code() {
    let import = cmd()
        .args(["import", "/nonexistent/filme.json"])
        .output()
        .expect("import");
    assert_eq!(import.status.code().unwrap(), 3);
}

#[test]
fn usage_exit_code() {
    let import = cmd()
        .args(["import", FIXTURE, "--only-new-names"])
        .output()
        .expect("import");
    assert_eq!(import.status.code().unwrap(), 2);

    let bogus = cmd().args(["import"]).output().expect("import");
    assert_eq!(bogus.status.code().unwrap(), 2);
}
