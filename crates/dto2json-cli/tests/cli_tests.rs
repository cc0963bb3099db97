//! Integration tests for the `dto2json` CLI binary.
//!
//! These exercise the parse, detect, request and languages subcommands through the
//! actual binary: stdin/stdout piping, file I/O, option flags and the error body
//! written to stderr.

// `Command::cargo_bin` was deprecated in assert_cmd 2.1.2 in favor of
// `cargo::cargo_bin_cmd!`. Allow it until we migrate.
#![allow(deprecated)]

use assert_cmd::Command;
use predicates::prelude::*;

fn fixture(name: &str) -> String {
    format!("{}/tests/fixtures/{name}", env!("CARGO_MANIFEST_DIR"))
}

fn dto2json() -> Command {
    let mut cmd = Command::cargo_bin("dto2json").unwrap();
    cmd.env_remove("DTO2JSON_MAX_DEPTH").env_remove("RUST_LOG");
    cmd
}

fn stdout_json(output: &std::process::Output) -> serde_json::Value {
    assert!(
        output.status.success(),
        "command failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("stdout must be valid JSON")
}

fn stderr_json(output: &std::process::Output) -> serde_json::Value {
    assert_eq!(output.status.code(), Some(1));
    serde_json::from_slice(&output.stderr).expect("stderr must be an error body")
}

// ─────────────────────────────────────────────────────────────────────────────
// Parse subcommand
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn parse_stdin_to_stdout() {
    let output = dto2json()
        .args(["parse", "--language", "JAVA"])
        .write_stdin(r#"Person(name="Alice", age=30)"#)
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"name": "Alice", "age": 30})
    );
}

#[test]
fn parse_java_fixture() {
    let output = dto2json()
        .args(["parse", "-l", "JAVA", "-i", &fixture("order_java.txt")])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["id"], 1042);
    assert_eq!(json["customer"]["name"], "Ada Lovelace");
    assert_eq!(json["items"][1]["sku"], "B-7");
    assert_eq!(json["notes"]["wrap"], "blue");
    assert_eq!(json["status"], "SHIPPED");
}

#[test]
fn parse_multiline_csharp_fixture() {
    let output = dto2json()
        .args(["parse", "-l", "CSHARP", "-i", &fixture("order_csharp.txt")])
        .output()
        .unwrap();
    let json = stdout_json(&output);
    assert_eq!(json["__class"], "Order");
    assert_eq!(json["Reference"]["__type"], "Guid");
    assert_eq!(json["Items"][0]["__class"], "Item");
    assert_eq!(json["Items"][1]["Qty"], 1);
    assert_eq!(json["Totals"]["tax"], 27.8);
    assert_eq!(json["Status"]["enum_type"], "OrderStatus");
}

#[test]
fn parse_pretty_by_default_and_compact_on_request() {
    dto2json()
        .args(["parse", "-l", "JAVA"])
        .write_stdin("P(a=1)")
        .assert()
        .success()
        .stdout("{\n  \"a\": 1\n}\n");

    dto2json()
        .args(["parse", "-l", "JAVA", "--compact"])
        .write_stdin("P(a=1)")
        .assert()
        .success()
        .stdout("{\"a\":1}\n");
}

#[test]
fn parse_to_file() {
    let output_path = std::env::temp_dir().join("dto2json-test-parse-output.json");
    let output_path = output_path.to_str().unwrap();
    let _ = std::fs::remove_file(output_path);

    dto2json()
        .args(["parse", "-l", "KOTLIN", "-o", output_path, "--compact"])
        .write_stdin("P(xs=listOf(1, 2))")
        .assert()
        .success()
        .stdout("");

    let content = std::fs::read_to_string(output_path).expect("output file must exist");
    assert_eq!(content, "{\"xs\":[1,2]}\n");
    let _ = std::fs::remove_file(output_path);
}

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn unknown_language_prints_error_body() {
    let output = dto2json()
        .args(["parse", "-l", "RUBY"])
        .write_stdin("P(a=1)")
        .output()
        .unwrap();
    assert!(output.stdout.is_empty());
    assert_eq!(
        stderr_json(&output),
        serde_json::json!({"kind": "UnsupportedLanguage", "message": "unsupported language: RUBY"})
    );
}

#[test]
fn empty_input_prints_error_body() {
    let output = dto2json()
        .args(["parse", "-l", "CSHARP"])
        .write_stdin("   \n")
        .output()
        .unwrap();
    assert_eq!(stderr_json(&output)["kind"], "EmptyInput");
}

#[test]
fn unsupported_syntax_prints_error_body() {
    let output = dto2json()
        .args(["parse", "-l", "CSHARP"])
        .write_stdin("Person(name=1)")
        .output()
        .unwrap();
    assert_eq!(stderr_json(&output)["kind"], "UnsupportedSyntax");
}

#[test]
fn malformed_input_prints_error_body() {
    let output = dto2json()
        .args(["parse", "-l", "JAVA"])
        .write_stdin("Person(name)")
        .output()
        .unwrap();
    let body = stderr_json(&output);
    assert_eq!(body["kind"], "MalformedInput");
    assert!(body["message"].as_str().unwrap().contains("name"));
}

#[test]
fn missing_input_file_fails() {
    dto2json()
        .args(["parse", "-l", "JAVA", "-i", "/nonexistent/input.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read file"));
}

// ─────────────────────────────────────────────────────────────────────────────
// Parser options
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn max_depth_flag() {
    let output = dto2json()
        .args(["parse", "-l", "JAVA", "--max-depth", "1"])
        .write_stdin("A(b=B(c=1))")
        .output()
        .unwrap();
    let body = stderr_json(&output);
    assert_eq!(body["kind"], "MalformedInput");
    assert!(body["message"].as_str().unwrap().contains("nesting deeper than 1"));
}

#[test]
fn max_depth_from_environment() {
    let output = dto2json()
        .env("DTO2JSON_MAX_DEPTH", "1")
        .args(["parse", "-l", "JAVA"])
        .write_stdin("A(b=B(c=1))")
        .output()
        .unwrap();
    assert_eq!(stderr_json(&output)["kind"], "MalformedInput");
}

#[test]
fn strict_brackets_flag() {
    let input = "P(a=[1, 2), b=3)";

    dto2json()
        .args(["parse", "-l", "JAVA", "--compact"])
        .write_stdin(input)
        .assert()
        .success()
        .stdout("{\"a\":\"[1, 2)\",\"b\":3}\n");

    let output = dto2json()
        .args(["parse", "-l", "JAVA", "--strict-brackets"])
        .write_stdin(input)
        .output()
        .unwrap();
    assert_eq!(stderr_json(&output)["kind"], "MalformedInput");
}

// ─────────────────────────────────────────────────────────────────────────────
// Detect, request and languages
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn detect_prints_accepting_languages() {
    dto2json()
        .arg("detect")
        .write_stdin("Person(name=\"A\")")
        .assert()
        .success()
        .stdout("JAVA\nKOTLIN\n");
}

#[test]
fn detect_without_match_fails() {
    dto2json()
        .arg("detect")
        .write_stdin("42")
        .assert()
        .failure()
        .stderr(predicate::str::contains("No supported language"));
}

#[test]
fn request_fixture() {
    let output = dto2json()
        .args(["request", "-i", &fixture("request.json")])
        .output()
        .unwrap();
    assert_eq!(
        stdout_json(&output),
        serde_json::json!({"name": "Bob", "tags": ["a", "b"], "age": 41})
    );
}

#[test]
fn request_error_body() {
    let output = dto2json()
        .arg("request")
        .write_stdin(r#"{"language": "JAVA", "inputTxt": ""}"#)
        .output()
        .unwrap();
    assert_eq!(
        stderr_json(&output),
        serde_json::json!({"kind": "EmptyInput", "message": "input cannot be empty"})
    );
}

#[test]
fn invalid_request_document_fails() {
    dto2json()
        .arg("request")
        .write_stdin("not json")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse request JSON"));
}

#[test]
fn languages_lists_all_tags() {
    dto2json()
        .arg("languages")
        .assert()
        .success()
        .stdout("JAVA\nKOTLIN\nCSHARP\n");
}

#[test]
fn help_flag_shows_usage() {
    dto2json()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("parse"))
        .stdout(predicate::str::contains("detect"));
}

#[test]
fn unknown_subcommand_fails() {
    dto2json()
        .arg("frobnicate")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error").or(predicate::str::contains("unrecognized")));
}
