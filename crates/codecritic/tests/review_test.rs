use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TEST_KEY: &str = "AIzaSyTESTKEY1234";

fn codecritic_cmd(config_dir: &TempDir) -> assert_cmd::Command {
    let mut cmd = cargo_bin_cmd!("codecritic");
    cmd.arg("--config-dir")
        .arg(config_dir.path())
        .env_remove("CODECRITIC_MODEL");
    cmd
}

/// Store `key` and point the API at `api_base`.
fn configure_api(config_dir: &TempDir, api_base: &str, key: &str) {
    std::fs::write(
        config_dir.path().join("settings.json"),
        serde_json::json!({ "apiBase": api_base }).to_string(),
    )
    .unwrap();
    codecritic_cmd(config_dir)
        .args(["key", "set", key])
        .assert()
        .success();
}

/// A Gemini endpoint for `model` that answers every review with `text`.
async fn gemini_stub(model: &str, text: &str) -> MockServer {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(format!("/v1beta/models/{model}:generateContent")))
        .and(query_param("key", TEST_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_raw(
            serde_json::json!({
                "candidates": [{"content": {"parts": [{"text": text}]}}]
            })
            .to_string(),
            "application/json",
        ))
        .expect(1)
        .mount(&server)
        .await;
    server
}

fn stub_base(server: &MockServer) -> String {
    format!("{}/v1beta", server.uri())
}

#[test]
fn whitespace_input_is_rejected() {
    let tmp = TempDir::new().unwrap();

    codecritic_cmd(&tmp)
        .arg("review")
        .write_stdin("   \n\t")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Please enter some code to review."));
}

#[test]
fn review_without_key_reports_configuration_error() {
    let tmp = TempDir::new().unwrap();

    codecritic_cmd(&tmp)
        .args(["review", "-"])
        .write_stdin("x=1")
        .assert()
        .failure()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains(
            "API key not configured. Please set your API key in the configuration.",
        ));
}

#[test]
fn review_without_key_json_output() {
    let tmp = TempDir::new().unwrap();

    let output = codecritic_cmd(&tmp)
        .args(["review", "--json"])
        .write_stdin("x=1")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(parsed["results"][0]["type"], "error");
    assert!(parsed["results"][0]["message"]
        .as_str()
        .unwrap()
        .starts_with("API key not configured"));
}

#[test]
fn unreachable_service_reports_generic_error() {
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, "http://127.0.0.1:9/v1beta", "AIzaSyUNREACHABLE");

    codecritic_cmd(&tmp)
        .args(["review", "-"])
        .write_stdin("x=1")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "Failed to get review from Gemini API. Please check your API key and network connection.",
        ))
        .stderr(predicate::str::contains("AIzaSyUNREACHABLE").not());
}

#[test]
fn missing_input_file_fails() {
    let tmp = TempDir::new().unwrap();

    codecritic_cmd(&tmp)
        .args(["review", "/tmp/nonexistent-codecritic-test-xyz.rs"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to read"));
}

#[test]
fn malformed_settings_fail_before_review() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(tmp.path().join("settings.json"), "{oops").unwrap();

    codecritic_cmd(&tmp)
        .arg("review")
        .write_stdin("x=1")
        .assert()
        .failure()
        .stderr(predicate::str::contains("Failed to load settings"));
}

#[test]
fn completions_are_generated() {
    let tmp = TempDir::new().unwrap();

    codecritic_cmd(&tmp)
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("codecritic"));
}

#[tokio::test(flavor = "multi_thread")]
async fn successful_review_prints_markdown_unmodified() {
    let server = gemini_stub("gemini-2.5-flash", "### Bugs\nNone found.").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);

    codecritic_cmd(&tmp)
        .arg("review")
        .write_stdin("function f(){}")
        .assert()
        .success()
        .stdout("### Bugs\nNone found.\n")
        .stderr(predicate::str::contains(TEST_KEY).not());
}

#[tokio::test(flavor = "multi_thread")]
async fn trailing_newlines_in_review_are_kept() {
    let server = gemini_stub("gemini-2.5-flash", "### Bugs\nNone found.\n\n").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);

    codecritic_cmd(&tmp)
        .arg("review")
        .write_stdin("x=1")
        .assert()
        .success()
        .stdout("### Bugs\nNone found.\n\n");
}

#[tokio::test(flavor = "multi_thread")]
async fn model_flag_selects_endpoint() {
    let server = gemini_stub("gemini-2.5-pro", "### Readability\nFine.").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);

    codecritic_cmd(&tmp)
        .args(["review", "--model", "gemini-2.5-pro"])
        .write_stdin("x=1")
        .assert()
        .success()
        .stdout(predicate::str::contains("### Readability"));
}

#[tokio::test(flavor = "multi_thread")]
async fn html_output_is_sanitized() {
    let server = gemini_stub(
        "gemini-2.5-flash",
        "### Security\n<script>alert(1)</script>\n\nEscape user input.",
    )
    .await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);
    let html_path = tmp.path().join("review.html");

    codecritic_cmd(&tmp)
        .arg("review")
        .arg("--html")
        .arg(&html_path)
        .write_stdin("eval(input)")
        .assert()
        .success()
        .stdout(predicate::str::contains("### Security"));

    let html = std::fs::read_to_string(&html_path).unwrap();
    assert!(html.contains("<h3>Security</h3>"));
    assert!(html.contains("<p>Escape user input.</p>"));
    assert!(!html.contains("<script"));
}

#[tokio::test(flavor = "multi_thread")]
async fn output_dir_receives_markdown_and_html_reports() {
    let server = gemini_stub("gemini-2.5-flash", "### Bugs\nNone found.").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);

    let source = tmp.path().join("main.rs");
    std::fs::write(&source, "fn main() {}\n").unwrap();
    let reports = tmp.path().join("reports");

    codecritic_cmd(&tmp)
        .arg("review")
        .arg(&source)
        .arg("--html")
        .arg(tmp.path().join("out.html"))
        .arg("--output-dir")
        .arg(&reports)
        .assert()
        .success()
        .stderr(predicate::str::contains("Review report saved to"));

    let markdown = std::fs::read_to_string(reports.join("main-rs-review.md")).unwrap();
    assert!(markdown.starts_with("# Code Review: main.rs\n"));
    assert!(markdown.contains("**Provider:** gemini (gemini-2.5-flash)"));
    assert!(markdown.contains("### Bugs\nNone found."));

    let html = std::fs::read_to_string(reports.join("main-rs-review.html")).unwrap();
    assert!(html.contains("<h3>Bugs</h3>"));
}

#[tokio::test(flavor = "multi_thread")]
async fn json_output_carries_review_entry() {
    let server = gemini_stub("gemini-2.5-flash", "### Bugs\nNone found.").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);

    let output = codecritic_cmd(&tmp)
        .args(["review", "--json"])
        .write_stdin("x=1")
        .output()
        .unwrap();

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    let review = parsed["results"]
        .as_array()
        .unwrap()
        .iter()
        .find(|r| r["type"] == "review")
        .unwrap();
    assert_eq!(review["message"], "### Bugs\nNone found.");
    assert_eq!(review["details"], "gemini-2.5-flash");
}

#[tokio::test(flavor = "multi_thread")]
async fn empty_review_still_writes_html_and_warns() {
    let server = gemini_stub("gemini-2.5-flash", "").await;
    let tmp = TempDir::new().unwrap();
    configure_api(&tmp, &stub_base(&server), TEST_KEY);
    let html_path = tmp.path().join("review.html");

    codecritic_cmd(&tmp)
        .arg("review")
        .arg("--html")
        .arg(&html_path)
        .write_stdin("x=1")
        .assert()
        .success()
        .stdout(predicate::str::is_empty())
        .stderr(predicate::str::contains("The review was empty"));

    assert_eq!(std::fs::read_to_string(&html_path).unwrap(), "");
}

#[test]
fn blank_stored_key_is_not_configured() {
    let tmp = TempDir::new().unwrap();
    std::fs::write(
        tmp.path().join("credentials.json"),
        r#"{"gemini_api_key": "  "}"#,
    )
    .unwrap();

    codecritic_cmd(&tmp)
        .arg("review")
        .write_stdin("x=1")
        .assert()
        .failure()
        .stderr(predicate::str::contains(
            "API key not configured. Please set your API key in the configuration.",
        ));
}
