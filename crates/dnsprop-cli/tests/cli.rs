use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// `dnsprop` isolated from the caller's environment and config file.
fn dnsprop(dir: &TempDir) -> Command {
    let mut cmd = Command::cargo_bin("dnsprop").unwrap();
    for var in [
        "RESOLVERS",
        "REQUEST_TIMEOUT",
        "ENABLE_DNSSEC",
        "CACHE_TTL",
        "CACHE_MAX_ENTRIES",
        "MAX_SERVERS",
        "LOG_LEVEL",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    cmd.env("DNSPROP_CONFIG", dir.path().join("config.toml"));
    cmd.arg("--no-color");
    cmd
}

#[test]
fn servers_lists_directory() {
    let dir = TempDir::new().unwrap();
    let output = dnsprop(&dir)
        .args(["servers", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());

    let servers: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let servers = servers.as_array().unwrap();
    assert_eq!(servers.len(), 30);
    assert_eq!(servers[0]["address"], "1.1.1.1");
    assert_eq!(servers[0]["configured"], true);
}

#[test]
fn rejects_invalid_domain() {
    let dir = TempDir::new().unwrap();
    dnsprop(&dir)
        .args(["resolve", "bad_name.example"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid domain name"));
}

#[test]
fn rejects_unsupported_type() {
    let dir = TempDir::new().unwrap();
    dnsprop(&dir)
        .args(["resolve", "example.com", "-t", "PTR"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("unsupported record type"));
}

#[test]
fn rejects_hostname_server() {
    let dir = TempDir::new().unwrap();
    dnsprop(&dir)
        .args(["resolve", "example.com", "-s", "dns.google"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid server address"));
}

#[test]
fn rejects_zero_timeout() {
    let dir = TempDir::new().unwrap();
    dnsprop(&dir)
        .args(["--timeout", "0s", "servers"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("request_timeout must be > 0"));
}

#[test]
fn config_path_and_init() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("config.toml");

    dnsprop(&dir)
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));

    dnsprop(&dir).args(["config", "init"]).assert().success();
    let written = std::fs::read_to_string(&path).unwrap();
    assert!(written.contains("request_timeout = \"2s\""));
    assert!(written.contains("cache_max_entries = 5000"));

    dnsprop(&dir)
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));
    dnsprop(&dir).args(["config", "init", "--force"]).assert().success();
}

#[test]
fn config_file_sets_resolvers() {
    let dir = TempDir::new().unwrap();
    std::fs::write(
        dir.path().join("config.toml"),
        "resolvers = [\"9.9.9.9\", \"1.1.1.1\"]\nmax_servers = 10\n",
    )
    .unwrap();

    let output = dnsprop(&dir)
        .args(["config", "show", "--output", "json"])
        .output()
        .unwrap();
    assert!(output.status.success());
    let config: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(config["resolvers"], serde_json::json!(["9.9.9.9", "1.1.1.1"]));
    assert_eq!(config["max_servers"], 10);
    assert_eq!(config["cache_ttl"], "30s");
}

#[test]
fn unreachable_server_is_reported_not_fatal() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on port 9 locally; the exchange fails or times out.
    let output = dnsprop(&dir)
        .args([
            "resolve",
            "example.com",
            "-s",
            "127.0.0.1:9",
            "--timeout",
            "300ms",
            "--output",
            "json",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());

    let body: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(body["name"], "example.com");
    assert_eq!(body["type"], "A");
    let status = body["results"][0]["status"].as_str().unwrap();
    assert!(status == "error" || status == "timeout", "status {status}");
    assert_eq!(body["results"][0]["region"], "unknown");
}

#[test]
fn expect_without_answers_exits_two() {
    let dir = TempDir::new().unwrap();
    dnsprop(&dir)
        .args([
            "resolve",
            "example.com",
            "-s",
            "127.0.0.1:9",
            "--timeout",
            "300ms",
            "--expect",
            "192.0.2.1",
            "--output",
            "json",
        ])
        .assert()
        .code(2)
        .stdout(predicate::str::contains("\"matching\": 0"));
}
