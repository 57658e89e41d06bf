use std::io::Write;
use std::net::TcpListener;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde_json::{json, Value};
use tempfile::NamedTempFile;
use tokio::time::{sleep, timeout};

/// Find an available port
fn get_available_port() -> u16 {
    TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

/// Create a minimal valid config. The upstream points at a closed port.
fn minimal_config(port: u16) -> String {
    format!(
        r#"
[server]
host = "127.0.0.1"
port = {}

[auth]
username = "ash"
password = "pikachu"

[upstream]
base_url = "http://127.0.0.1:9/api/v2"
timeout_secs = 2
"#,
        port
    )
}

fn write_config(content: &str) -> NamedTempFile {
    let mut temp_file = NamedTempFile::new().unwrap();
    temp_file.write_all(content.as_bytes()).unwrap();
    temp_file.flush().unwrap();
    temp_file
}

/// Spawn the server and return a handle
async fn spawn_server(config_path: &std::path::Path) -> tokio::process::Child {
    tokio::process::Command::new(env!("CARGO_BIN_EXE_pokedex"))
        .env("POKEDEX_CONFIG", config_path)
        .env("RUST_LOG", "error") // Quiet logs during tests
        .kill_on_drop(true)
        .spawn()
        .expect("Failed to spawn server")
}

/// Wait for server to be ready. Every catalog route is protected, so an
/// unauthenticated request answering 401 means the server is up.
async fn wait_for_server(port: u16, max_attempts: u32) -> bool {
    let client = Client::new();
    for _ in 0..max_attempts {
        if let Ok(response) = client
            .get(format!("http://127.0.0.1:{}/pokemons", port))
            .send()
            .await
        {
            if response.status() == StatusCode::UNAUTHORIZED {
                return true;
            }
        }
        sleep(Duration::from_millis(50)).await;
    }
    false
}

async fn login(client: &Client, port: u16, password: &str) -> reqwest::Response {
    client
        .post(format!("http://127.0.0.1:{}/login", port))
        .json(&json!({ "username": "ash", "password": password }))
        .send()
        .await
        .expect("Failed to send request")
}

#[tokio::test]
async fn test_login_and_protected_routes() {
    let port = get_available_port();
    let config_file = write_config(&minimal_config(port));

    // Start server
    let mut server = spawn_server(config_file.path()).await;

    // Wait for server to be ready
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();

    // Wrong password
    let response = login(&client, port, "wrong").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["error"], "Invalid credentials");

    // Correct password
    let response = login(&client, port, "pikachu").await;
    assert!(response.status().is_success());
    let json: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["user"]["username"], "ash");
    let token = json["token"].as_str().unwrap().to_string();

    // The upstream is unreachable, so the listing fails after auth passes
    let response = client
        .get(format!("http://127.0.0.1:{}/pokemons", port))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let json: Value = response.json().await.expect("Failed to parse JSON");
    assert_eq!(json["error"], "Failed to fetch pokemons");

    // Metrics are served to authenticated callers
    let response = client
        .get(format!("http://127.0.0.1:{}/metrics", port))
        .bearer_auth(&token)
        .send()
        .await
        .expect("Failed to send request");
    assert!(response.status().is_success());
    let text = response.text().await.unwrap();
    assert!(text.contains("pokedex_http_requests_total"));

    // Cleanup
    server.kill().await.ok();
}

#[tokio::test]
async fn test_cors_preflight_allowed() {
    let port = get_available_port();
    let config_file = write_config(&minimal_config(port));

    let mut server = spawn_server(config_file.path()).await;
    assert!(
        wait_for_server(port, 40).await,
        "Server did not start in time"
    );

    let client = Client::new();
    let response = client
        .request(
            reqwest::Method::OPTIONS,
            format!("http://127.0.0.1:{}/login", port),
        )
        .header("Origin", "http://localhost:3000")
        .header("Access-Control-Request-Method", "POST")
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());
    assert!(response
        .headers()
        .contains_key("access-control-allow-origin"));

    server.kill().await.ok();
}

#[tokio::test]
async fn test_missing_config_file_exits_with_error() {
    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_pokedex"))
            .env("POKEDEX_CONFIG", "/nonexistent/config.toml")
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}

#[tokio::test]
async fn test_invalid_config_exits_with_error() {
    let invalid_config = r#"
[server]
port = 8080

[auth]
token_ttl_hours = 0
"#;

    let config_file = write_config(invalid_config);

    let result = timeout(
        Duration::from_secs(5),
        tokio::process::Command::new(env!("CARGO_BIN_EXE_pokedex"))
            .env("POKEDEX_CONFIG", config_file.path())
            .env("RUST_LOG", "error")
            .output(),
    )
    .await
    .expect("Command timed out")
    .expect("Failed to execute command");

    assert!(!result.status.success());
}
