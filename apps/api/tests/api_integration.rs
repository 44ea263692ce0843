//! End-to-end API integration tests
//!
//! These tests drive the full router against the in-memory document store
//! and test doubles for email, LLM and cluster provisioning:
//! - User registration, authentication and roles
//! - Event lifecycle, registration and capacity
//! - Teams, projects and draft visibility
//! - Judging, scoring and the leaderboard
//! - Landing page templates, clusters and the builder prompt

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    Router,
};
use chrono::{Duration, Utc};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for oneshot

use hackathon_api::api::build_router;
use hackathon_api::config::Config;
use hackathon_api::domain::cluster::ClusterStatus;
use hackathon_api::infrastructure::atlas::{ClusterProvisioner, ClusterState, ProvisionError};
use hackathon_api::infrastructure::email::{EmailMessage, Notifier, NotifyError};
use hackathon_api::infrastructure::llm::{LlmError, TextGenerator};
use hackathon_api::infrastructure::repositories::InMemoryDocumentStore;
use hackathon_api::state::AppState;

const ADMIN_EMAIL: &str = "admin@hack.test";

// ===== Test doubles =====

#[derive(Default)]
struct RecordingNotifier {
    sent: Mutex<Vec<EmailMessage>>,
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn send(&self, message: &EmailMessage) -> Result<(), NotifyError> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }

    fn provider_name(&self) -> &'static str {
        "recording"
    }
}

struct EchoLlm;

#[async_trait]
impl TextGenerator for EchoLlm {
    async fn generate(&self, _system: &str, prompt: &str) -> Result<String, LlmError> {
        Ok(format!("REFINED\n{}", prompt))
    }

    fn model(&self) -> &str {
        "echo"
    }
}

struct BrokenLlm;

#[async_trait]
impl TextGenerator for BrokenLlm {
    async fn generate(&self, _system: &str, _prompt: &str) -> Result<String, LlmError> {
        Err(LlmError::EmptyResponse)
    }

    fn model(&self) -> &str {
        "broken"
    }
}

struct FakeProvisioner;

#[async_trait]
impl ClusterProvisioner for FakeProvisioner {
    async fn create(&self, _name: &str) -> Result<ClusterState, ProvisionError> {
        Ok(ClusterState {
            status: ClusterStatus::Creating,
            connection_string: None,
        })
    }

    async fn status(&self, name: &str) -> Result<ClusterState, ProvisionError> {
        Ok(ClusterState {
            status: ClusterStatus::Ready,
            connection_string: Some(format!("mongodb+srv://{}.example.net", name)),
        })
    }

    async fn delete(&self, _name: &str) -> Result<(), ProvisionError> {
        Ok(())
    }

    fn region(&self) -> &str {
        "US_EAST_1"
    }
}

/// Provider that refuses every request
struct FailingProvisioner;

fn provider_error() -> ProvisionError {
    let error = reqwest::Client::new()
        .get("not a url")
        .build()
        .expect_err("invalid url");
    ProvisionError::Request(error)
}

#[async_trait]
impl ClusterProvisioner for FailingProvisioner {
    async fn create(&self, _name: &str) -> Result<ClusterState, ProvisionError> {
        Err(provider_error())
    }

    async fn status(&self, _name: &str) -> Result<ClusterState, ProvisionError> {
        Err(provider_error())
    }

    async fn delete(&self, _name: &str) -> Result<(), ProvisionError> {
        Err(provider_error())
    }

    fn region(&self) -> &str {
        "US_EAST_1"
    }
}

// ===== Harness =====

struct TestApp {
    router: Router,
    notifier: Arc<RecordingNotifier>,
}

fn base_state() -> (AppState, Arc<RecordingNotifier>) {
    let mut config = Config::for_tests();
    config.admin_emails = vec![ADMIN_EMAIL.to_string()];

    let notifier = Arc::new(RecordingNotifier::default());
    let state = AppState::new(
        config,
        Arc::new(InMemoryDocumentStore::new()),
        notifier.clone(),
    );
    (state, notifier)
}

fn setup_app() -> TestApp {
    let (state, notifier) = base_state();
    TestApp {
        router: build_router(state),
        notifier,
    }
}

fn setup_app_with(configure: impl FnOnce(AppState) -> AppState) -> TestApp {
    let (state, notifier) = base_state();
    TestApp {
        router: build_router(configure(state)),
        notifier,
    }
}

impl TestApp {
    async fn call(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };
        (status, json)
    }

    /// Registers and logs in; returns `(token, user_id)`
    async fn sign_up(&self, email: &str) -> (String, String) {
        let (status, _) = self
            .call(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "email": email,
                    "password": "correct-horse",
                    "full_name": "Test Person"
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);

        let (status, body) = self
            .call(
                "POST",
                "/api/auth/login",
                None,
                Some(json!({ "email": email, "password": "correct-horse" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        (
            body["token"].as_str().unwrap().to_string(),
            body["user_id"].as_str().unwrap().to_string(),
        )
    }

    async fn admin(&self) -> String {
        self.sign_up(ADMIN_EMAIL).await.0
    }

    /// Signs up a user and promotes them to judge
    async fn judge(&self, admin: &str, email: &str) -> (String, String) {
        let (token, id) = self.sign_up(email).await;
        let (status, _) = self
            .call(
                "PATCH",
                &format!("/api/admin/users/{}/role", id),
                Some(admin),
                Some(json!({ "role": "judge" })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);
        (token, id)
    }

    async fn create_event(&self, admin: &str, name: &str, extra: Value) -> String {
        let mut body = json!({
            "name": name,
            "description": "Build something great",
            "starts_at": Utc::now() + Duration::days(7),
            "ends_at": Utc::now() + Duration::days(8),
        });
        if let (Some(body), Some(extra)) = (body.as_object_mut(), extra.as_object()) {
            for (k, v) in extra {
                body.insert(k.clone(), v.clone());
            }
        }

        let (status, event) = self.call("POST", "/api/events", Some(admin), Some(body)).await;
        assert_eq!(status, StatusCode::CREATED, "{}", event);
        event["id"].as_str().unwrap().to_string()
    }

    async fn set_status(&self, admin: &str, event_id: &str, status: &str) {
        let (code, body) = self
            .call(
                "POST",
                &format!("/api/events/{}/status", event_id),
                Some(admin),
                Some(json!({ "status": status })),
            )
            .await;
        assert_eq!(code, StatusCode::OK, "{}", body);
    }

    async fn register(&self, token: &str, event_id: &str) -> StatusCode {
        self.call(
            "POST",
            &format!("/api/events/{}/register", event_id),
            Some(token),
            None,
        )
        .await
        .0
    }

    /// Team plus a complete draft project; returns `(team_id, project_id)`
    async fn team_with_project(&self, token: &str, event_id: &str, name: &str) -> (String, String) {
        let (status, team) = self
            .call(
                "POST",
                &format!("/api/events/{}/teams", event_id),
                Some(token),
                Some(json!({ "name": name })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", team);
        let team_id = team["id"].as_str().unwrap().to_string();

        let (status, project) = self
            .call(
                "POST",
                &format!("/api/teams/{}/project", team_id),
                Some(token),
                Some(json!({ "title": format!("{} app", name) })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", project);
        let project_id = project["id"].as_str().unwrap().to_string();

        let (status, _) = self
            .call(
                "PATCH",
                &format!("/api/projects/{}", project_id),
                Some(token),
                Some(json!({
                    "description": "It helps people find study partners. Built in a weekend.",
                    "repository_url": "https://github.com/example/app",
                    "technologies": ["rust", "axum"]
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK);

        (team_id, project_id)
    }

    async fn submit(&self, token: &str, project_id: &str) {
        let (status, body) = self
            .call(
                "POST",
                &format!("/api/projects/{}/submit", project_id),
                Some(token),
                None,
            )
            .await;
        assert_eq!(status, StatusCode::OK, "{}", body);
    }

    /// Assigns a judge to a project; returns the raw response
    async fn assign(
        &self,
        admin: &str,
        event_id: &str,
        project_id: &str,
        judge_id: &str,
    ) -> (StatusCode, Value) {
        self.call(
            "POST",
            &format!("/api/events/{}/judging/assignments", event_id),
            Some(admin),
            Some(json!({ "project_id": project_id, "judge_id": judge_id })),
        )
        .await
    }

    fn emails_to(&self, to: &str) -> Vec<EmailMessage> {
        self.notifier
            .sent
            .lock()
            .unwrap()
            .iter()
            .filter(|m| m.to == to)
            .cloned()
            .collect()
    }
}

fn scores(points: u32) -> Value {
    json!({
        "criteria": {
            "innovation": points,
            "technical": points,
            "design": points,
            "impact": points,
            "presentation": points
        }
    })
}

// ===== Auth =====

#[tokio::test]
async fn test_health_check() {
    let app = setup_app();

    let (status, body) = app.call("GET", "/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!("OK"));
}

#[tokio::test]
async fn test_register_login_and_me() {
    let app = setup_app();

    let (token, user_id) = app.sign_up("Someone@Example.com").await;
    let (status, me) = app.call("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], json!(user_id));
    assert_eq!(me["email"], "someone@example.com");
    assert_eq!(me["role"], "participant");
    assert!(me.get("password_hash").is_none());
}

#[tokio::test]
async fn test_admin_emails_bootstrap_admin_role() {
    let app = setup_app();

    let token = app.admin().await;
    let (_, me) = app.call("GET", "/api/auth/me", Some(&token), None).await;

    assert_eq!(me["role"], "admin");
}

#[tokio::test]
async fn test_duplicate_email_rejected() {
    let app = setup_app();
    app.sign_up("dup@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/auth/register",
            None,
            Some(json!({
                "email": "DUP@example.com",
                "password": "another-password",
                "full_name": "Dup"
            })),
        )
        .await;

    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Email already registered");
}

#[tokio::test]
async fn test_protected_route_requires_token() {
    let app = setup_app();

    let (status, body) = app.call("GET", "/api/auth/me", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Missing authorization header");
}

#[tokio::test]
async fn test_wrong_password_rejected() {
    let app = setup_app();
    app.sign_up("user@example.com").await;

    let (status, body) = app
        .call(
            "POST",
            "/api/auth/login",
            None,
            Some(json!({ "email": "user@example.com", "password": "wrong-password" })),
        )
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "Invalid credentials");
}

#[tokio::test]
async fn test_deactivated_user_loses_access() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, id) = app.sign_up("leaving@example.com").await;

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/admin/users/{}/active", id),
            Some(&admin),
            Some(json!({ "is_active": false })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app.call("GET", "/api/auth/me", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// ===== Events & registration =====

#[tokio::test]
async fn test_participants_cannot_create_events() {
    let app = setup_app();
    let (token, _) = app.sign_up("p@example.com").await;

    let (status, _) = app
        .call(
            "POST",
            "/api/events",
            Some(&token),
            Some(json!({
                "name": "Nope",
                "starts_at": Utc::now(),
                "ends_at": Utc::now() + Duration::days(1)
            })),
        )
        .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_draft_events_hidden_from_participants() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Secret Hack", json!({})).await;

    let (status, _) = app
        .call("GET", &format!("/api/events/{}", event_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, listed) = app.call("GET", "/api/events", None, None).await;
    assert_eq!(listed, json!([]));

    let (status, event) = app
        .call("GET", &format!("/api/events/{}", event_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["slug"], "secret-hack");
    assert_eq!(event["status"], "draft");
}

#[tokio::test]
async fn test_slugs_are_made_unique() {
    let app = setup_app();
    let admin = app.admin().await;

    let first = app.create_event(&admin, "Spring Hack", json!({})).await;
    let second = app.create_event(&admin, "Spring Hack", json!({})).await;

    let (_, first) = app
        .call("GET", &format!("/api/events/{}", first), Some(&admin), None)
        .await;
    let (_, second) = app
        .call("GET", &format!("/api/events/{}", second), Some(&admin), None)
        .await;
    assert_eq!(first["slug"], "spring-hack");
    assert_eq!(second["slug"], "spring-hack-2");
}

#[tokio::test]
async fn test_invalid_transition_rejected() {
    let app = setup_app();
    let admin = app.admin().await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/status", event_id),
            Some(&admin),
            Some(json!({ "status": "concluded" })),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_only_draft_events_can_be_deleted() {
    let app = setup_app();
    let admin = app.admin().await;

    let running = app.create_event(&admin, "Running", json!({})).await;
    app.set_status(&admin, &running, "open").await;
    let (status, _) = app
        .call("DELETE", &format!("/api/events/{}", running), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let draft = app.create_event(&admin, "Draft", json!({})).await;
    let (_, partner) = app
        .call(
            "POST",
            "/api/partners",
            Some(&admin),
            Some(json!({ "name": "Acme", "tier": "gold", "event_ids": [draft, running] })),
        )
        .await;
    let partner_id = partner["id"].as_str().unwrap();
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/prizes", draft),
            Some(&admin),
            Some(json!({ "title": "Best hack", "partner_id": partner_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let (_, form) = app
        .call(
            "POST",
            &format!("/api/events/{}/feedback-forms", draft),
            Some(&admin),
            Some(json!({
                "title": "Thoughts?",
                "audience": "everyone",
                "questions": [
                    { "key": "notes", "label": "Notes", "kind": { "type": "text" }, "required": false }
                ]
            })),
        )
        .await;
    assert!(form["id"].is_string(), "{}", form);

    let (status, _) = app
        .call("DELETE", &format!("/api/events/{}", draft), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .call("GET", &format!("/api/events/{}", draft), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Nothing scoped to the event survives it
    let (status, _) = app
        .call(
            "GET",
            &format!("/api/feedback-forms/{}", form["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, partner) = app
        .call("GET", &format!("/api/partners/{}", partner_id), Some(&admin), None)
        .await;
    assert_eq!(partner["event_ids"], json!([running]));
    let (status, _) = app
        .call("DELETE", &format!("/api/partners/{}", partner_id), Some(&admin), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_event_patch_null_clears_capacity() {
    let app = setup_app();
    let admin = app.admin().await;
    let event_id = app
        .create_event(&admin, "Hack", json!({ "capacity": 10, "location": "Hall A" }))
        .await;
    let uri = format!("/api/events/{}", event_id);

    let (status, event) = app
        .call("PATCH", &uri, Some(&admin), Some(json!({ "name": "Hack 2" })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["capacity"], 10);

    let (status, event) = app
        .call("PATCH", &uri, Some(&admin), Some(json!({ "capacity": null, "location": null })))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(event["capacity"], Value::Null);
    assert_eq!(event["location"], Value::Null);
    assert_eq!(event["name"], "Hack 2");
}

#[tokio::test]
async fn test_registration_requires_open_event() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.set_status(&admin, &event_id, "in_progress").await;

    assert_eq!(app.register(&token, &event_id).await, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_registration_capacity_and_duplicates() {
    let app = setup_app();
    let admin = app.admin().await;
    let (first, _) = app.sign_up("first@example.com").await;
    let (second, _) = app.sign_up("second@example.com").await;
    let event_id = app
        .create_event(&admin, "Tiny Hack", json!({ "capacity": 1 }))
        .await;
    app.set_status(&admin, &event_id, "open").await;

    assert_eq!(app.register(&first, &event_id).await, StatusCode::CREATED);
    assert_eq!(app.register(&first, &event_id).await, StatusCode::CONFLICT);

    let (status, body) = app
        .call(
            "POST",
            &format!("/api/events/{}/register", event_id),
            Some(&second),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Event is full");

    let confirmations = app.emails_to("first@example.com");
    assert_eq!(confirmations.len(), 1);
    assert!(confirmations[0].subject.contains("Tiny Hack"));
}

#[tokio::test]
async fn test_malformed_registration_body_rejected() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    let uri = format!("/api/events/{}/register", event_id);

    let (status, body) = app
        .call("POST", &uri, Some(&token), Some(json!({ "skills": "rust", "answers": 42 })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);

    let (_, participants) = app
        .call("GET", &format!("/api/events/{}/participants", event_id), Some(&admin), None)
        .await;
    assert_eq!(participants, json!([]));

    // A proper body is stored as sent
    let (status, participant) = app
        .call("POST", &uri, Some(&token), Some(json!({ "skills": ["rust", "sql"] })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(participant["skills"], json!(["rust", "sql"]));
}

#[tokio::test]
async fn test_withdraw_requires_leaving_team_first() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&token, &event_id).await;
    let (team_id, _) = app.team_with_project(&token, &event_id, "Solo").await;
    let uri = format!("/api/events/{}/register", event_id);

    let (status, body) = app.call("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Leave your team before withdrawing");

    let (status, _) = app
        .call("POST", &format!("/api/teams/{}/leave", team_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = app.call("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app.call("DELETE", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The freed spot can be taken again
    assert_eq!(app.register(&token, &event_id).await, StatusCode::CREATED);
}

#[tokio::test]
async fn test_registration_form_answers_are_validated() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;

    let (status, _) = app
        .call(
            "PUT",
            &format!("/api/events/{}/registration-form", event_id),
            Some(&admin),
            Some(json!({
                "fields": [
                    { "key": "shirt", "label": "Shirt size", "kind": { "type": "select", "options": ["S", "M", "L"] }, "required": true }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app
        .call(
            "POST",
            &format!("/api/events/{}/register", event_id),
            Some(&token),
            Some(json!({ "answers": { "shirt": "XXL" } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("shirt"));

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/register", event_id),
            Some(&token),
            Some(json!({ "answers": { "shirt": "M" }, "skills": ["rust"] })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
}

// ===== Teams & projects =====

#[tokio::test]
async fn test_team_requires_registration_and_respects_size() {
    let app = setup_app();
    let admin = app.admin().await;
    let (leader, _) = app.sign_up("leader@example.com").await;
    let (joiner, _) = app.sign_up("joiner@example.com").await;
    let (late, _) = app.sign_up("late@example.com").await;
    let event_id = app
        .create_event(&admin, "Hack", json!({ "max_team_size": 2 }))
        .await;
    app.set_status(&admin, &event_id, "open").await;

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/teams", event_id),
            Some(&leader),
            Some(json!({ "name": "Crabs" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    for token in [&leader, &joiner, &late] {
        assert_eq!(app.register(token, &event_id).await, StatusCode::CREATED);
    }

    let (_, team) = app
        .call(
            "POST",
            &format!("/api/events/{}/teams", event_id),
            Some(&leader),
            Some(json!({ "name": "Crabs" })),
        )
        .await;
    let team_id = team["id"].as_str().unwrap();

    let (status, _) = app
        .call("POST", &format!("/api/teams/{}/join", team_id), Some(&joiner), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(app.emails_to("leader@example.com").len(), 2);

    let (status, body) = app
        .call("POST", &format!("/api/teams/{}/join", team_id), Some(&late), None)
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "Team is full");
}

#[tokio::test]
async fn test_leader_leaving_hands_over_leadership() {
    let app = setup_app();
    let admin = app.admin().await;
    let (leader, _) = app.sign_up("leader@example.com").await;
    let (member, member_id) = app.sign_up("member@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&leader, &event_id).await;
    app.register(&member, &event_id).await;

    let (_, team) = app
        .call(
            "POST",
            &format!("/api/events/{}/teams", event_id),
            Some(&leader),
            Some(json!({ "name": "Crabs" })),
        )
        .await;
    let team_id = team["id"].as_str().unwrap();
    app.call("POST", &format!("/api/teams/{}/join", team_id), Some(&member), None)
        .await;

    let (status, _) = app
        .call("POST", &format!("/api/teams/{}/leave", team_id), Some(&leader), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, team) = app
        .call("GET", &format!("/api/teams/{}", team_id), None, None)
        .await;
    assert_eq!(team["leader_id"], json!(member_id));

    // Last member out disbands the team
    let (status, _) = app
        .call("POST", &format!("/api/teams/{}/leave", team_id), Some(&member), None)
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = app
        .call("GET", &format!("/api/teams/{}", team_id), None, None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_last_member_cannot_abandon_submitted_project() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&token, &event_id).await;
    let (team_id, project_id) = app.team_with_project(&token, &event_id, "Solo").await;
    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&token, &project_id).await;

    let (status, body) = app
        .call("POST", &format!("/api/teams/{}/leave", team_id), Some(&token), None)
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["error"],
        "The last member cannot leave a team with a submitted project"
    );

    let (status, team) = app
        .call("GET", &format!("/api/teams/{}", team_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(team["member_ids"].as_array().unwrap().len(), 1);
    let (status, _) = app
        .call("GET", &format!("/api/projects/{}", project_id), None, None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_draft_projects_visible_to_team_and_staff_only() {
    let app = setup_app();
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let (outsider, _) = app.sign_up("outsider@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;

    let (_, project_id) = app.team_with_project(&owner, &event_id, "Crabs").await;
    let uri = format!("/api/projects/{}", project_id);

    assert_eq!(app.call("GET", &uri, Some(&owner), None).await.0, StatusCode::OK);
    assert_eq!(app.call("GET", &uri, Some(&admin), None).await.0, StatusCode::OK);
    assert_eq!(
        app.call("GET", &uri, Some(&outsider), None).await.0,
        StatusCode::NOT_FOUND
    );
    assert_eq!(app.call("GET", &uri, None, None).await.0, StatusCode::NOT_FOUND);

    let (_, listed) = app
        .call("GET", &format!("/api/events/{}/projects", event_id), Some(&outsider), None)
        .await;
    assert_eq!(listed, json!([]));

    let (status, _) = app
        .call(
            "PATCH",
            &uri,
            Some(&outsider),
            Some(json!({ "title": "Hijacked" })),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_submission_requires_running_event() {
    let app = setup_app();
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (_, project_id) = app.team_with_project(&owner, &event_id, "Crabs").await;

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/submit", project_id),
            Some(&owner),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&owner, &project_id).await;

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/projects/{}", project_id),
            Some(&owner),
            Some(json!({ "title": "Too late" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// ===== Judging =====

#[tokio::test]
async fn test_judging_flow_and_leaderboard() {
    let app = setup_app();
    let admin = app.admin().await;
    let (judge, judge_id) = app.judge(&admin, "judge@example.com").await;
    let (stranger, _) = app.judge(&admin, "other-judge@example.com").await;
    let (alice, _) = app.sign_up("alice@example.com").await;
    let (bob, _) = app.sign_up("bob@example.com").await;

    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&alice, &event_id).await;
    app.register(&bob, &event_id).await;
    let (_, alpha) = app.team_with_project(&alice, &event_id, "Alpha").await;
    let (_, beta) = app.team_with_project(&bob, &event_id, "Beta").await;
    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&alice, &alpha).await;
    app.submit(&bob, &beta).await;

    for project in [&alpha, &beta] {
        let (status, body) = app
            .call(
                "POST",
                &format!("/api/events/{}/judging/assignments", event_id),
                Some(&admin),
                Some(json!({ "project_id": project, "judge_id": judge_id })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{}", body);
    }
    assert_eq!(app.emails_to("judge@example.com").len(), 2);

    // Duplicate assignment
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/judging/assignments", event_id),
            Some(&admin),
            Some(json!({ "project_id": alpha, "judge_id": judge_id })),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    // Unassigned judge
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", alpha),
            Some(&stranger),
            Some(scores(5)),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    // Missing criterion
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", alpha),
            Some(&judge),
            Some(json!({ "criteria": { "innovation": 5 } })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, score) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", alpha),
            Some(&judge),
            Some(scores(9)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert!((score["total"].as_f64().unwrap() - 90.0).abs() < 1e-9);

    // Double score
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", alpha),
            Some(&judge),
            Some(scores(1)),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, project) = app
        .call("GET", &format!("/api/projects/{}", alpha), None, None)
        .await;
    assert_eq!(project["status"], "judged");

    let (_, mine) = app
        .call("GET", "/api/judging/my-assignments", Some(&judge), None)
        .await;
    let mine = mine.as_array().unwrap();
    assert_eq!(mine.len(), 2);
    assert_eq!(mine.iter().filter(|a| a["scored"] == json!(true)).count(), 1);

    app.call(
        "POST",
        &format!("/api/projects/{}/scores", beta),
        Some(&judge),
        Some(scores(6)),
    )
    .await;

    // Participants wait for the event to conclude
    let leaderboard = format!("/api/events/{}/leaderboard", event_id);
    let (status, _) = app.call("GET", &leaderboard, Some(&alice), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, board) = app.call("GET", &leaderboard, Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(board[0]["project_id"], json!(alpha));
    assert_eq!(board[0]["rank"], 1);
    assert_eq!(board[1]["project_id"], json!(beta));
    assert_eq!(board[1]["rank"], 2);

    app.set_status(&admin, &event_id, "concluded").await;
    let (status, _) = app.call("GET", &leaderboard, None, None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_removing_last_open_assignment_completes_judging() {
    let app = setup_app();
    let admin = app.admin().await;
    let (first, first_id) = app.judge(&admin, "j1@example.com").await;
    let (_, second_id) = app.judge(&admin, "j2@example.com").await;
    let (alice, _) = app.sign_up("alice@example.com").await;

    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&alice, &event_id).await;
    let (_, project) = app.team_with_project(&alice, &event_id, "Alpha").await;
    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&alice, &project).await;

    let (status, scored) = app.assign(&admin, &event_id, &project, &first_id).await;
    assert_eq!(status, StatusCode::CREATED);
    let (status, pending) = app.assign(&admin, &event_id, &project, &second_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", project),
            Some(&first),
            Some(scores(7)),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    let project_uri = format!("/api/projects/{}", project);
    let (_, body) = app.call("GET", &project_uri, None, None).await;
    assert_eq!(body["status"], "submitted");

    // Scored assignments stay
    let (status, _) = app
        .call(
            "DELETE",
            &format!("/api/judging/assignments/{}", scored["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, _) = app
        .call(
            "DELETE",
            &format!("/api/judging/assignments/{}", pending["id"].as_str().unwrap()),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, body) = app.call("GET", &project_uri, None, None).await;
    assert_eq!(body["status"], "judged");

    // Judged projects take no new judges
    let (status, body) = app.assign(&admin, &event_id, &project, &second_id).await;
    assert_eq!(status, StatusCode::BAD_REQUEST, "{}", body);
}

#[tokio::test]
async fn test_demoted_judge_cannot_score() {
    let app = setup_app();
    let admin = app.admin().await;
    let (judge, judge_id) = app.judge(&admin, "judge@example.com").await;
    let (alice, _) = app.sign_up("alice@example.com").await;

    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&alice, &event_id).await;
    let (_, project) = app.team_with_project(&alice, &event_id, "Alpha").await;
    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&alice, &project).await;
    let (status, _) = app.assign(&admin, &event_id, &project, &judge_id).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call(
            "PATCH",
            &format!("/api/admin/users/{}/role", judge_id),
            Some(&admin),
            Some(json!({ "role": "participant" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", project),
            Some(&judge),
            Some(scores(8)),
        )
        .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_fractional_score_is_bad_request() {
    let app = setup_app();
    let admin = app.admin().await;
    let (judge, judge_id) = app.judge(&admin, "judge@example.com").await;
    let (alice, _) = app.sign_up("alice@example.com").await;

    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&alice, &event_id).await;
    let (_, project) = app.team_with_project(&alice, &event_id, "Alpha").await;
    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&alice, &project).await;
    app.assign(&admin, &event_id, &project, &judge_id).await;

    let mut body = scores(5);
    body["criteria"]["design"] = json!(4.5);
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/projects/{}/scores", project),
            Some(&judge),
            Some(body),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_auto_assign_balances_judges() {
    let app = setup_app();
    let admin = app.admin().await;
    app.judge(&admin, "j1@example.com").await;
    app.judge(&admin, "j2@example.com").await;
    app.judge(&admin, "j3@example.com").await;

    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    let mut projects = Vec::new();
    for name in ["a", "b", "c"] {
        let (token, _) = app.sign_up(&format!("{}@example.com", name)).await;
        app.register(&token, &event_id).await;
        let (_, project) = app.team_with_project(&token, &event_id, name).await;
        projects.push((token, project));
    }
    app.set_status(&admin, &event_id, "in_progress").await;
    for (token, project) in &projects {
        app.submit(token, project).await;
    }

    let uri = format!("/api/events/{}/judging/auto-assign", event_id);
    let (status, created) = app
        .call("POST", &uri, Some(&admin), Some(json!({ "judges_per_project": 2 })))
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created.as_array().unwrap().len(), 6);

    // Already satisfied: nothing new
    let (_, again) = app
        .call("POST", &uri, Some(&admin), Some(json!({ "judges_per_project": 2 })))
        .await;
    assert_eq!(again, json!([]));
}

// ===== Partners, templates & landing page =====

#[tokio::test]
async fn test_template_clone_and_landing_page() {
    let app = setup_app();
    let admin = app.admin().await;
    let event_id = app
        .create_event(&admin, "Winter Hack", json!({ "location": "Oslo" }))
        .await;

    let (status, template) = app
        .call(
            "POST",
            "/api/templates",
            Some(&admin),
            Some(json!({
                "name": "Classic",
                "sections": [
                    { "kind": "hero", "title": "{{ event.name }}", "body": "Join us in {{event.location}}" },
                    { "kind": "faq", "title": "FAQ", "visible": false },
                    { "kind": "prizes", "title": "Prizes" },
                    { "kind": "sponsors", "title": "Sponsors" }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", template);
    let template_id = template["id"].as_str().unwrap();

    let (status, copy) = app
        .call(
            "POST",
            &format!("/api/templates/{}/clone", template_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(copy["name"], "Classic (Copy)");
    assert_ne!(copy["id"], template["id"]);
    assert_eq!(copy["sections"], template["sections"]);

    let (_, partner) = app
        .call(
            "POST",
            "/api/partners",
            Some(&admin),
            Some(json!({ "name": "Acme", "tier": "gold", "event_ids": [event_id] })),
        )
        .await;
    let (status, _) = app
        .call(
            "POST",
            &format!("/api/events/{}/prizes", event_id),
            Some(&admin),
            Some(json!({ "title": "Best hack", "partner_id": partner["id"], "value": "500.00" })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);

    app.call(
        "PUT",
        &format!("/api/events/{}/template", event_id),
        Some(&admin),
        Some(json!({ "template_id": template_id })),
    )
    .await;

    // Drafts have no public landing page
    let landing = "/api/public/events/winter-hack/landing";
    assert_eq!(app.call("GET", landing, None, None).await.0, StatusCode::NOT_FOUND);

    app.set_status(&admin, &event_id, "open").await;
    let (status, page) = app.call("GET", landing, None, None).await;
    assert_eq!(status, StatusCode::OK, "{}", page);

    let sections = page["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["title"], "Winter Hack");
    assert_eq!(sections[0]["body"], "Join us in Oslo");
    assert_eq!(sections[1]["prizes"][0]["title"], "Best hack");
    assert_eq!(sections[2]["sponsors"][0]["tier"], "gold");
}

#[tokio::test]
async fn test_prize_awards_are_limited() {
    let app = setup_app();
    let admin = app.admin().await;
    let (alice, _) = app.sign_up("alice@example.com").await;
    let (bob, _) = app.sign_up("bob@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&alice, &event_id).await;
    app.register(&bob, &event_id).await;
    let (_, alpha) = app.team_with_project(&alice, &event_id, "Alpha").await;
    let (_, beta) = app.team_with_project(&bob, &event_id, "Beta").await;

    let (_, prize) = app
        .call(
            "POST",
            &format!("/api/events/{}/prizes", event_id),
            Some(&admin),
            Some(json!({ "title": "Grand prize" })),
        )
        .await;
    let award = format!("/api/prizes/{}/award", prize["id"].as_str().unwrap());

    // Drafts cannot win
    let (status, _) = app
        .call("POST", &award, Some(&admin), Some(json!({ "project_id": alpha })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    app.set_status(&admin, &event_id, "in_progress").await;
    app.submit(&alice, &alpha).await;
    app.submit(&bob, &beta).await;

    let (status, _) = app
        .call("POST", &award, Some(&admin), Some(json!({ "project_id": alpha })))
        .await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = app
        .call("POST", &award, Some(&admin), Some(json!({ "project_id": beta })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

// ===== Feedback =====

#[tokio::test]
async fn test_feedback_one_response_per_respondent() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&token, &event_id).await;

    let (status, form) = app
        .call(
            "POST",
            &format!("/api/events/{}/feedback-forms", event_id),
            Some(&admin),
            Some(json!({
                "title": "How was it?",
                "audience": "participants",
                "is_open": true,
                "questions": [
                    { "key": "overall", "label": "Overall", "kind": { "type": "rating", "scale": 5 }, "required": true }
                ]
            })),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED, "{}", form);
    let form_id = form["id"].as_str().unwrap();
    let responses = format!("/api/feedback-forms/{}/responses", form_id);

    let (status, _) = app
        .call("POST", &responses, Some(&token), Some(json!({ "answers": { "overall": 4 } })))
        .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, _) = app
        .call("POST", &responses, Some(&token), Some(json!({ "answers": { "overall": 5 } })))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, summary) = app
        .call(
            "GET",
            &format!("/api/feedback-forms/{}/summary", form_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["response_count"], 1);
    assert_eq!(summary["questions"][0]["average"], 4.0);
}

// ===== Clusters =====

#[tokio::test]
async fn test_clusters_unavailable_without_provisioner() {
    let app = setup_app();
    let admin = app.admin().await;

    let (status, _) = app.call("GET", "/api/admin/clusters", Some(&admin), None).await;

    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_cluster_lifecycle() {
    let app = setup_app_with(|state| state.with_provisioner(Arc::new(FakeProvisioner)));
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (team_id, _) = app.team_with_project(&owner, &event_id, "Crabs").await;
    let uri = format!("/api/teams/{}/cluster", team_id);

    let (status, cluster) = app.call("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::CREATED, "{}", cluster);
    assert_eq!(cluster["status"], "creating");
    assert!(cluster["name"].as_str().unwrap().starts_with("crabs-"));

    let (status, _) = app.call("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, refreshed) = app.call("GET", &uri, Some(&owner), None).await;
    assert_eq!(refreshed["status"], "ready");
    assert!(refreshed["connection_string"].is_string());

    let (status, deleted) = app.call("DELETE", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(deleted["status"], "deleted");

    // A new cluster is allowed once the old one is gone
    let (status, _) = app.call("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_failed_cluster_creation_is_not_recorded() {
    let app = setup_app_with(|state| state.with_provisioner(Arc::new(FailingProvisioner)));
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (team_id, _) = app.team_with_project(&owner, &event_id, "Crabs").await;
    let uri = format!("/api/teams/{}/cluster", team_id);

    let (status, _) = app.call("POST", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);

    let (status, _) = app.call("GET", &uri, Some(&owner), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (_, all) = app.call("GET", "/api/admin/clusters", Some(&admin), None).await;
    assert_eq!(all, json!([]));
}

// ===== Builder prompt & summary =====

#[tokio::test]
async fn test_builder_prompt_falls_back_when_llm_fails() {
    let app = setup_app_with(|state| state.with_llm(Arc::new(BrokenLlm)));
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (_, project_id) = app.team_with_project(&owner, &event_id, "Crabs").await;

    let (status, body) = app
        .call(
            "POST",
            &format!("/api/projects/{}/builder-prompt", project_id),
            Some(&owner),
            Some(json!({ "enhance": true })),
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enhanced"], false);
    let prompt = body["prompt"].as_str().unwrap();
    assert!(prompt.contains("Crabs app"));
    assert!(prompt.contains("rust, axum"));
}

#[tokio::test]
async fn test_builder_prompt_enhanced_by_llm() {
    let app = setup_app_with(|state| state.with_llm(Arc::new(EchoLlm)));
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (_, project_id) = app.team_with_project(&owner, &event_id, "Crabs").await;

    let (_, body) = app
        .call(
            "POST",
            &format!("/api/projects/{}/builder-prompt", project_id),
            Some(&owner),
            Some(json!({ "enhance": true })),
        )
        .await;

    assert_eq!(body["enhanced"], true);
    assert!(body["prompt"].as_str().unwrap().starts_with("REFINED"));
}

#[tokio::test]
async fn test_builder_prompt_rejects_malformed_options() {
    let app = setup_app_with(|state| state.with_llm(Arc::new(EchoLlm)));
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&token, &event_id).await;
    let (_, project_id) = app.team_with_project(&token, &event_id, "Crabs").await;
    let uri = format!("/api/projects/{}/builder-prompt", project_id);

    let (status, _) = app
        .call("POST", &uri, Some(&token), Some(json!({ "enhance": "yes" })))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    // No body at all means the defaults
    let (status, body) = app.call("POST", &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["enhanced"], false);
}

#[tokio::test]
async fn test_summary_without_llm_uses_description() {
    let app = setup_app();
    let admin = app.admin().await;
    let (owner, _) = app.sign_up("owner@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&owner, &event_id).await;
    let (_, project_id) = app.team_with_project(&owner, &event_id, "Crabs").await;

    let (status, body) = app
        .call(
            "GET",
            &format!("/api/projects/{}/summary", project_id),
            Some(&owner),
            None,
        )
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["generated"], false);
    assert_eq!(
        body["summary"],
        "It helps people find study partners. Built in a weekend."
    );
}

// ===== Analytics =====

#[tokio::test]
async fn test_analytics_are_staff_only() {
    let app = setup_app();
    let admin = app.admin().await;
    let (token, _) = app.sign_up("p@example.com").await;
    let event_id = app.create_event(&admin, "Hack", json!({})).await;
    app.set_status(&admin, &event_id, "open").await;
    app.register(&token, &event_id).await;

    let (status, _) = app.call("GET", "/api/admin/analytics", Some(&token), None).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, global) = app.call("GET", "/api/admin/analytics", Some(&admin), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(global["total_registrations"], 1);
    assert_eq!(global["users_by_role"]["participant"], 1);
    assert_eq!(global["events_by_status"]["open"], 1);

    let (_, per_event) = app
        .call(
            "GET",
            &format!("/api/admin/analytics/events/{}", event_id),
            Some(&admin),
            None,
        )
        .await;
    assert_eq!(per_event["participants_without_team"], 1);
}
