use std::process::{Command, Stdio};

fn binary() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_schooldigger_mcp"));
    cmd.env_remove("SCHOOLDIGGER_API_ID")
        .env_remove("SCHOOLDIGGER_API_KEY")
        .env_remove("SCHOOLDIGGER_LOG_DIR")
        .env("RUST_LOG", "info")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());
    cmd
}

#[test]
fn exits_non_zero_without_credentials() {
    // An empty working directory keeps a developer's .env out of the test.
    let dir = tempfile::tempdir().unwrap();
    let output = binary().current_dir(dir.path()).output().unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("configuration error") && stderr.contains("SCHOOLDIGGER_API_ID"),
        "unexpected stderr: {stderr}"
    );
    // Nothing was written on the MCP channel.
    assert!(output.stdout.is_empty());
}

#[test]
fn blank_key_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = binary()
        .current_dir(dir.path())
        .env("SCHOOLDIGGER_API_ID", "app-id")
        .env("SCHOOLDIGGER_API_KEY", "   ")
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("SCHOOLDIGGER_API_KEY"), "unexpected stderr: {stderr}");
}

#[test]
fn invalid_base_url_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let output = binary()
        .current_dir(dir.path())
        .env("SCHOOLDIGGER_API_ID", "app-id")
        .env("SCHOOLDIGGER_API_KEY", "app-key")
        .args(["--base-url", "not a url"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("invalid base URL"), "unexpected stderr: {stderr}");
}

#[test]
fn http_mode_fails_when_the_port_is_taken() {
    let taken = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let port = taken.local_addr().unwrap().port().to_string();
    let dir = tempfile::tempdir().unwrap();
    let output = binary()
        .current_dir(dir.path())
        .env("SCHOOLDIGGER_API_ID", "app-id")
        .env("SCHOOLDIGGER_API_KEY", "app-key")
        .args(["--http", "--host", "127.0.0.1", "--port", &port])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("failed to bind"), "unexpected stderr: {stderr}");
}
