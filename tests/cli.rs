use httpmock::prelude::*;
use serde_json::json;
use std::fs;
use std::path::Path;
use std::process::{Command, Output};
use tempfile::TempDir;

fn subdl(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_subdl"))
        .args(args)
        .env_remove("SYNAPSE_AUTH_TOKEN")
        .env_remove("RUST_LOG")
        .output()
        .unwrap()
}

fn write_config(dir: &Path, server: &MockServer, token: &str) -> String {
    let path = dir.join("synapseConfig");
    fs::write(
        &path,
        format!(
            "[authentication]\nauthtoken = {token}\n\n[endpoints]\nrepoEndpoint = {}\n",
            server.url("/repo/v1")
        ),
    )
    .unwrap();
    path.display().to_string()
}

#[test]
fn missing_arguments_print_usage() {
    let output = subdl(&["--fileDownloadLocation", "out"]);
    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("--submissionId"), "stderr: {stderr}");
    assert!(stderr.contains("Usage"), "stderr: {stderr}");

    let output = subdl(&["-s", "9700001"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("--fileDownloadLocation"));
}

#[test]
fn downloads_and_exits_zero() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repo/v1/userProfile");
        then.status(200)
            .json_body(json!({"ownerId": "3345678", "userName": "jdoe"}));
    });
    let bundle = json!({
        "entity": {"dataFileHandleId": "55501"},
        "fileHandles": [{"id": "55501", "fileName": "scores.tsv"}]
    });
    server.mock(|when, then| {
        when.method(GET).path("/repo/v1/evaluation/submission/9700001");
        then.status(200)
            .json_body(json!({"id": "9700001", "entityBundleJSON": bundle.to_string()}));
    });
    let presigned = server.url("/s3/scores.tsv");
    server.mock(|when, then| {
        when.method(GET)
            .path("/repo/v1/evaluation/submission/9700001/file/55501");
        then.status(200).body(presigned);
    });
    server.mock(|when, then| {
        when.method(GET).path("/s3/scores.tsv");
        then.status(200).body("a\t1\n");
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server, "good-token");
    let out = dir.path().join("out");
    let output = subdl(&[
        "-s",
        "9700001",
        "-f",
        out.to_str().unwrap(),
        "--config",
        &config,
    ]);

    assert!(
        output.status.success(),
        "stderr: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(output.stdout.is_empty());
    assert_eq!(fs::read_to_string(out.join("scores.tsv")).unwrap(), "a\t1\n");
}

#[test]
fn bad_credentials_exit_nonzero_without_writing() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path("/repo/v1/userProfile");
        then.status(401)
            .json_body(json!({"reason": "Invalid access token"}));
    });

    let dir = TempDir::new().unwrap();
    let config = write_config(dir.path(), &server, "bad-token");
    let out = dir.path().join("out");
    let output = subdl(&[
        "-s",
        "9700001",
        "-f",
        out.to_str().unwrap(),
        "--config",
        &config,
    ]);

    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid access token"));
    assert!(!out.exists());
}
