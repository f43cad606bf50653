//! API integration tests
//!
//! These run against a live server with a seeded admin/admin account.

use reqwest::Client;
use serde_json::{json, Value};

const BASE_URL: &str = "http://localhost:8080/api/v1";

/// Helper to get an authenticated client
async fn get_auth_token(client: &Client) -> String {
    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send login request");

    let body: Value = response.json().await.expect("Failed to parse login response");
    body["token"].as_str().expect("No token in response").to_string()
}

#[tokio::test]
#[ignore] // Run with: cargo test -- --ignored
async fn test_health_check() {
    let client = Client::new();

    let response = client
        .get(format!("{}/health", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["status"], "healthy");
}

#[tokio::test]
#[ignore]
async fn test_login() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "admin"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["token"].is_string());
    assert_eq!(body["token_type"], "Bearer");
}

#[tokio::test]
#[ignore]
async fn test_login_invalid_credentials() {
    let client = Client::new();

    let response = client
        .post(format!("{}/auth/login", BASE_URL))
        .json(&json!({
            "username": "admin",
            "password": "wrong"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_get_current_user() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/auth/me", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(body["username"], "admin");
}

#[tokio::test]
#[ignore]
async fn test_unauthorized_access() {
    let client = Client::new();

    let response = client
        .get(format!("{}/devices", BASE_URL))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 401);
}

#[tokio::test]
#[ignore]
async fn test_list_devices() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    assert!(body["total"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_create_device_with_generated_tag() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "device_type": "laptop",
            "brand": "Lenovo",
            "model": "ThinkPad T14"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);

    let body: Value = response.json().await.expect("Failed to parse response");
    let tag = body["tag"].as_str().expect("No tag");
    assert!(tag.starts_with("JOIILT"));
    assert_eq!(body["status"], "available");

    // Cleanup
    let device_id = body["id"].as_i64().expect("No device ID");
    let _ = client
        .delete(format!("{}/devices/{}?force=true", BASE_URL, device_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_duplicate_tag_rejected() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "tag": "DUP-TEST-001",
            "device_type": "monitor"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 201);
    let body: Value = response.json().await.expect("Failed to parse response");
    let device_id = body["id"].as_i64().expect("No device ID");

    let response = client
        .post(format!("{}/devices", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({
            "tag": "dup-test-001",
            "device_type": "monitor"
        }))
        .send()
        .await
        .expect("Failed to send request");

    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = client
        .delete(format!("{}/devices/{}?force=true", BASE_URL, device_id))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_assignment_lifecycle_with_history() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let auth = |req: reqwest::RequestBuilder| req.header("Authorization", format!("Bearer {}", token));

    // Create employee
    let response = auth(client.post(format!("{}/employees", BASE_URL)))
        .json(&json!({
            "firstname": "Test",
            "lastname": "Holder",
            "position": "Engineer"
        }))
        .send()
        .await
        .expect("Failed to create employee");
    assert_eq!(response.status(), 201);
    let employee: Value = response.json().await.expect("parse employee");
    let employee_id = employee["id"].as_i64().expect("No employee ID");

    // Create device
    let response = auth(client.post(format!("{}/devices", BASE_URL)))
        .json(&json!({
            "device_type": "laptop",
            "brand": "Dell"
        }))
        .send()
        .await
        .expect("Failed to create device");
    assert_eq!(response.status(), 201);
    let device: Value = response.json().await.expect("parse device");
    let device_id = device["id"].as_i64().expect("No device ID");

    // Assign
    let response = auth(client.post(format!("{}/devices/{}/assign", BASE_URL, device_id)))
        .json(&json!({ "employee_id": employee_id, "reason": "Onboarding" }))
        .send()
        .await
        .expect("Failed to assign");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("parse assign response");
    assert_eq!(body["device"]["status"], "assigned");

    // Assigning again must be refused
    let response = auth(client.post(format!("{}/devices/{}/assign", BASE_URL, device_id)))
        .json(&json!({ "employee_id": employee_id }))
        .send()
        .await
        .expect("Failed to send second assign");
    assert_eq!(response.status(), 422);

    // Unassign with a condition snapshot
    let response = auth(client.post(format!("{}/devices/{}/unassign", BASE_URL, device_id)))
        .json(&json!({ "condition": "fair", "reason": "Returned to stock" }))
        .send()
        .await
        .expect("Failed to unassign");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("parse unassign response");
    assert_eq!(body["device"]["status"], "available");
    assert_eq!(body["device"]["condition"], "fair");

    // History shows both events, newest first
    let response = auth(client.get(format!("{}/devices/{}/history", BASE_URL, device_id)))
        .send()
        .await
        .expect("Failed to fetch history");
    assert!(response.status().is_success());
    let history: Value = response.json().await.expect("parse history");
    let entries = history.as_array().expect("history array");
    assert!(entries.len() >= 2);
    assert_eq!(entries[0]["action"], "unassigned");
    assert_eq!(entries[1]["action"], "assigned");

    // Cleanup
    let _ = auth(client.delete(format!("{}/devices/{}?force=true", BASE_URL, device_id)))
        .send()
        .await;
    let _ = auth(client.delete(format!("{}/employees/{}", BASE_URL, employee_id)))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_resignation_returns_devices() {
    let client = Client::new();
    let token = get_auth_token(&client).await;
    let auth = |req: reqwest::RequestBuilder| req.header("Authorization", format!("Bearer {}", token));

    let response = auth(client.post(format!("{}/employees", BASE_URL)))
        .json(&json!({ "firstname": "Short", "lastname": "Timer" }))
        .send()
        .await
        .expect("Failed to create employee");
    let employee: Value = response.json().await.expect("parse employee");
    let employee_id = employee["id"].as_i64().expect("No employee ID");

    let response = auth(client.post(format!("{}/devices", BASE_URL)))
        .json(&json!({ "device_type": "phone" }))
        .send()
        .await
        .expect("Failed to create device");
    let device: Value = response.json().await.expect("parse device");
    let device_id = device["id"].as_i64().expect("No device ID");

    auth(client.post(format!("{}/devices/{}/assign", BASE_URL, device_id)))
        .json(&json!({ "employee_id": employee_id }))
        .send()
        .await
        .expect("Failed to assign");

    // Resignation without returning devices is refused
    let response = auth(client.post(format!("{}/employees/{}/resign", BASE_URL, employee_id)))
        .json(&json!({ "reason": "Moved on" }))
        .send()
        .await
        .expect("Failed to send resign");
    assert_eq!(response.status(), 422);

    // With return_devices the held device comes back
    let response = auth(client.post(format!("{}/employees/{}/resign", BASE_URL, employee_id)))
        .json(&json!({ "reason": "Moved on", "return_devices": true }))
        .send()
        .await
        .expect("Failed to resign");
    assert!(response.status().is_success());
    let body: Value = response.json().await.expect("parse resign response");
    assert_eq!(body["status"], "resigned");

    let response = auth(client.get(format!("{}/devices/{}", BASE_URL, device_id)))
        .send()
        .await
        .expect("Failed to fetch device");
    let device: Value = response.json().await.expect("parse device");
    assert_eq!(device["status"], "available");

    // A resigned employee cannot receive assignments
    let response = auth(client.post(format!("{}/devices/{}/assign", BASE_URL, device_id)))
        .json(&json!({ "employee_id": employee_id }))
        .send()
        .await
        .expect("Failed to send assign");
    assert_eq!(response.status(), 422);

    // Cleanup
    let _ = auth(client.delete(format!("{}/devices/{}?force=true", BASE_URL, device_id)))
        .send()
        .await;
    let _ = auth(client.delete(format!("{}/employees/{}", BASE_URL, employee_id)))
        .send()
        .await;
}

#[tokio::test]
#[ignore]
async fn test_clients_with_counts() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/clients", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["items"].is_array());
    if let Some(first) = body["items"].as_array().and_then(|a| a.first()) {
        assert!(first["nb_employees"].is_number());
        assert!(first["nb_assets"].is_number());
    }
}

#[tokio::test]
#[ignore]
async fn test_get_stats() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .get(format!("{}/stats", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    assert!(body["devices"]["total"].is_number());
    assert!(body["employees"]["total"].is_number());
    assert!(body["clients"]["total"].is_number());
    assert!(body["activity"]["assignments_last_30_days"].is_number());
}

#[tokio::test]
#[ignore]
async fn test_generate_tag() {
    let client = Client::new();
    let token = get_auth_token(&client).await;

    let response = client
        .post(format!("{}/devices/tags/generate", BASE_URL))
        .header("Authorization", format!("Bearer {}", token))
        .json(&json!({ "device_type": "laptop" }))
        .send()
        .await
        .expect("Failed to send request");

    assert!(response.status().is_success());

    let body: Value = response.json().await.expect("Failed to parse response");
    let tag = body["tag"].as_str().expect("No tag");
    assert!(tag.starts_with("JOIILT"));
    assert_eq!(tag.len(), 10);
}
