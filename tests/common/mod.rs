// Common test utilities: stub remote services and a router driver
// Shared across all test files to avoid duplication

#![allow(dead_code)]

use axum::{
    body::Body,
    extract::{Query, State},
    http::{HeaderMap, Request, Response, StatusCode},
    routing::post,
    Json, Router,
};
use phishguard_core::{
    app_config::{ApprovalConfig, ClassifierConfig, Credentials, ReputationConfig},
    build_router, AppConfig, AppState,
};
use serde::Serialize;
use serde_json::Value;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};
use tower::util::ServiceExt;

// =============================================================================
// STUB REMOTE SERVICE
// =============================================================================

/// One request as seen by a stub service
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub query: HashMap<String, String>,
    pub authorization: Option<String>,
    pub body: Value,
}

#[derive(Clone, Default)]
struct StubState {
    // Replies are consumed in order; the last one repeats forever
    replies: Arc<Mutex<VecDeque<(StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

/// Local HTTP server standing in for a remote service
pub struct StubService {
    pub url: String,
    state: StubState,
}

impl StubService {
    /// Start a stub answering every POST with the scripted replies
    pub async fn start(replies: Vec<(StatusCode, Value)>) -> Self {
        let replies = replies
            .into_iter()
            .map(|(status, body)| (status, body.to_string()))
            .collect();
        Self::start_raw(replies).await
    }

    /// Like `start`, but the bodies are sent verbatim
    pub async fn start_raw(replies: Vec<(StatusCode, String)>) -> Self {
        let state = StubState {
            replies: Arc::new(Mutex::new(replies.into_iter().collect())),
            requests: Arc::default(),
        };

        let app = Router::new()
            .route("/", post(stub_handler))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            url: format!("http://{}/", addr),
            state,
        }
    }

    pub fn hits(&self) -> usize {
        self.state.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }
}

async fn stub_handler(
    State(state): State<StubState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: String,
) -> (StatusCode, [(&'static str, &'static str); 1], String) {
    state.requests.lock().unwrap().push(RecordedRequest {
        query,
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(|v| v.to_string()),
        body: serde_json::from_str(&body).unwrap_or(Value::Null),
    });

    let mut replies = state.replies.lock().unwrap();
    let (status, body) = if replies.len() > 1 {
        replies.pop_front().unwrap()
    } else {
        replies
            .front()
            .cloned()
            .unwrap_or((StatusCode::OK, "{}".to_string()))
    };
    (status, [("content-type", "application/json")], body)
}

/// Address nothing listens on, for transport-failure tests
pub async fn unreachable_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/", addr)
}

// =============================================================================
// CONFIGURATION
// =============================================================================

/// Config pointing both remote clients at the given endpoints with fast retries
pub fn test_config(
    reputation_endpoint: &str,
    classifier_endpoint: &str,
    credentials: Credentials,
) -> AppConfig {
    AppConfig {
        reputation: ReputationConfig {
            endpoint: reputation_endpoint.to_string(),
            ..ReputationConfig::default()
        },
        classifier: ClassifierConfig {
            endpoint: classifier_endpoint.to_string(),
            retry_delay_ms: 10,
            ..ClassifierConfig::default()
        },
        approval: ApprovalConfig::default(),
        remote_timeout_secs: 5,
        credentials,
        ..AppConfig::default()
    }
}

/// Config with no credentials; remote endpoints are never contacted
pub fn offline_config() -> AppConfig {
    test_config(
        "http://127.0.0.1:9/",
        "http://127.0.0.1:9/",
        Credentials::default(),
    )
}

pub fn classifier_reply(score: f64) -> Value {
    serde_json::json!([[
        {"label": "LABEL_1", "score": score},
        {"label": "LABEL_0", "score": 1.0 - score}
    ]])
}

// =============================================================================
// ROUTER DRIVER
// =============================================================================

/// Test application wrapper
pub struct TestApp {
    pub app: Router,
    pub state: AppState,
}

impl TestApp {
    pub fn new(config: AppConfig) -> Self {
        let state = AppState::new(config);
        Self {
            app: build_router(state.clone()),
            state,
        }
    }

    /// Send a POST request
    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "POST", uri)
    }

    /// Send a PUT request
    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "PUT", uri)
    }

    /// Send a GET request
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        TestRequest::new(self, "GET", uri)
    }
}

/// Test request builder
pub struct TestRequest<'a> {
    app: &'a TestApp,
    request: Request<Body>,
}

impl<'a> TestRequest<'a> {
    fn new(app: &'a TestApp, method: &str, uri: &str) -> Self {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();

        Self { app, request }
    }

    /// Add JSON body to request
    pub fn json<T: Serialize>(self, body: &T) -> Self {
        let body_bytes = serde_json::to_vec(body).unwrap();
        self.raw_json(body_bytes)
    }

    /// Add an arbitrary body labelled as JSON
    pub fn raw_json(mut self, body: impl Into<Body>) -> Self {
        self.request = Request::builder()
            .method(self.request.method().clone())
            .uri(self.request.uri().clone())
            .header("content-type", "application/json")
            .body(body.into())
            .unwrap();
        self
    }

    /// Send the request
    pub async fn send(self) -> TestResponse {
        let response = self.app.app.clone().oneshot(self.request).await.unwrap();
        TestResponse { response }
    }
}

/// Test response wrapper
pub struct TestResponse {
    response: Response<Body>,
}

impl TestResponse {
    /// Get status code
    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    /// Parse JSON response
    pub async fn json<T: serde::de::DeserializeOwned>(self) -> T {
        let body = axum::body::to_bytes(self.response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&body).unwrap()
    }
}
