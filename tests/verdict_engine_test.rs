mod common;

use async_trait::async_trait;
use axum::http::StatusCode;
use common::{classifier_reply, offline_config, test_config, StubService};
use phishguard_core::{
    app_config::Credentials,
    services::{StatsError, StatsSnapshot},
    Platform, ScanRecorder, TrustRegistry, VerdictEngine,
};
use serde_json::json;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

const PHISHING_URL: &str = "https://arnazon-secure1.xyz/verify-account";

#[tokio::test]
async fn test_end_to_end_offline_navigation() {
    let engine = VerdictEngine::new(&offline_config());

    let verdict = engine.evaluate_navigation(PHISHING_URL).await;

    assert!(verdict.decision);
    assert_eq!(verdict.suggested_domain.as_deref(), Some("amazon.com"));
    assert!(verdict
        .reasons
        .contains(&"Possible amazon impersonation detected".to_string()));
    assert!(verdict
        .reasons
        .contains(&"Suspicious combination of TLD and security terms".to_string()));
    assert!(verdict
        .reasons
        .contains(&"Suspicious URL path pattern detected".to_string()));

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.threats_blocked, 1);
    assert_eq!(stats.recent_threats[0].url, PHISHING_URL);
}

#[tokio::test]
async fn test_reasons_are_deterministic_and_unique() {
    let engine = VerdictEngine::new(&offline_config());

    let first = engine.evaluate_navigation(PHISHING_URL).await;
    let second = engine.evaluate_navigation(PHISHING_URL).await;
    assert_eq!(first, second);

    let mut deduped = first.reasons.clone();
    deduped.sort();
    deduped.dedup();
    assert_eq!(deduped.len(), first.reasons.len());
}

#[tokio::test]
async fn test_approved_url_is_never_flagged() {
    let engine = VerdictEngine::new(&offline_config());

    engine.approve(PHISHING_URL).await;
    let verdict = engine.evaluate_navigation(PHISHING_URL).await;

    assert!(!verdict.decision);
    assert!(verdict.reasons.is_empty());
    assert!(verdict.suggested_domain.is_none());

    // Approval is per literal URL
    let other = engine
        .evaluate_navigation("https://arnazon-secure1.xyz/verify-account?next=1")
        .await;
    assert!(other.decision);
}

#[tokio::test]
async fn test_remote_reputation_reason_comes_first() {
    let reputation = StubService::start(vec![(
        StatusCode::OK,
        json!({"matches": [{"threatType": "SOCIAL_ENGINEERING"}]}),
    )])
    .await;
    let config = test_config(
        &reputation.url,
        "http://127.0.0.1:9/",
        Credentials::new(Some("sb-key".into()), None),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine.evaluate_navigation(PHISHING_URL).await;

    assert!(verdict.decision);
    assert_eq!(verdict.reasons[0], "SOCIAL_ENGINEERING");
    assert_eq!(reputation.hits(), 1);
}

#[tokio::test]
async fn test_failed_reputation_never_hides_heuristics() {
    let reputation = StubService::start(vec![(StatusCode::BAD_GATEWAY, json!({}))]).await;
    let config = test_config(
        &reputation.url,
        "http://127.0.0.1:9/",
        Credentials::new(Some("sb-key".into()), None),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine.evaluate_navigation(PHISHING_URL).await;

    assert!(verdict.decision);
    assert_eq!(verdict.suggested_domain.as_deref(), Some("amazon.com"));
}

#[tokio::test]
async fn test_trusted_navigation_skips_remote_lookup() {
    let reputation = StubService::start(vec![(
        StatusCode::OK,
        json!({"matches": [{"threatType": "MALWARE"}]}),
    )])
    .await;
    let config = test_config(
        &reputation.url,
        "http://127.0.0.1:9/",
        Credentials::new(Some("sb-key".into()), None),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine
        .evaluate_navigation("https://accounts.google.com/signin")
        .await;

    assert!(!verdict.decision);
    assert_eq!(reputation.hits(), 0);
}

#[tokio::test]
async fn test_content_check_unions_all_signals() {
    let classifier = StubService::start(vec![(StatusCode::OK, classifier_reply(0.82))]).await;
    let config = test_config(
        "http://127.0.0.1:9/",
        &classifier.url,
        Credentials::new(None, Some("hf-token".into())),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine
        .evaluate_content(
            "Join our group link now and win a free gift!",
            &[
                "not a link".to_string(),
                "https://paypa1.com/claim".to_string(),
            ],
            Platform::WhatsApp,
        )
        .await;

    assert!(verdict.decision);
    assert_eq!(
        verdict.reasons,
        vec![
            "Suspicious WhatsApp-specific pattern detected".to_string(),
            "Possible paypal impersonation detected".to_string(),
            "AI Risk Score: 82.0%".to_string(),
        ]
    );
    assert_eq!(verdict.suggested_domain.as_deref(), Some("paypal.com"));
    assert_eq!(classifier.hits(), 1);
}

#[tokio::test]
async fn test_failed_classifier_keeps_pattern_reasons() {
    let classifier = StubService::start(vec![(
        StatusCode::INTERNAL_SERVER_ERROR,
        json!({"error": "overloaded"}),
    )])
    .await;
    let config = test_config(
        "http://127.0.0.1:9/",
        &classifier.url,
        Credentials::new(None, Some("hf-token".into())),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine
        .evaluate_content(
            "Join our group link now and win a free gift!",
            &["https://paypa1.com/claim".to_string()],
            Platform::WhatsApp,
        )
        .await;

    assert!(verdict.decision);
    assert_eq!(
        verdict.reasons,
        vec![
            "Suspicious WhatsApp-specific pattern detected".to_string(),
            "Possible paypal impersonation detected".to_string(),
        ]
    );
    assert_eq!(verdict.suggested_domain.as_deref(), Some("paypal.com"));
    assert_eq!(classifier.hits(), 3);
}

#[tokio::test]
async fn test_phishing_phrase_after_long_preamble_is_flagged() {
    let engine = VerdictEngine::new(&offline_config());
    let mut content = "This week in the garden: pruning roses and planting bulbs. ".repeat(160);
    content.push_str("URGENT: your account will be suspended, verify your account now");
    assert!(content.len() > 9_000);

    let verdict = engine
        .evaluate_content(&content, &[], Platform::Generic)
        .await;

    assert!(verdict.decision);
    assert_eq!(
        verdict.reasons,
        vec!["Suspicious content pattern detected".to_string()]
    );
}

#[tokio::test]
async fn test_host_registry_replaces_default_trust_list() {
    let engine = VerdictEngine::new(&offline_config())
        .with_registry(TrustRegistry::new(["arnazon-secure1.xyz"]));

    let verdict = engine.evaluate_navigation(PHISHING_URL).await;
    assert!(!verdict.decision);

    // google.com is no longer trusted, so its brand token now counts
    let verdict = engine
        .evaluate_navigation("https://accounts.google.com/signin")
        .await;
    assert!(verdict.decision);
    assert!(verdict
        .reasons
        .contains(&"Possible google impersonation detected".to_string()));
}

#[tokio::test]
async fn test_benign_content_is_clear() {
    let engine = VerdictEngine::new(&offline_config());

    let verdict = engine
        .evaluate_content(
            "See you at the team lunch on Friday",
            &["https://www.rust-lang.org/learn".to_string()],
            Platform::Generic,
        )
        .await;

    assert!(!verdict.decision);
    assert!(verdict.reasons.is_empty());

    let stats = engine.stats().await.unwrap();
    assert_eq!(stats.links_scanned, 1);
    assert_eq!(stats.threats_blocked, 0);
}

#[tokio::test]
async fn test_link_check_uses_context_classifier() {
    let classifier = StubService::start(vec![(StatusCode::OK, classifier_reply(0.97))]).await;
    let config = test_config(
        "http://127.0.0.1:9/",
        &classifier.url,
        Credentials::new(None, Some("hf-token".into())),
    );
    let engine = VerdictEngine::new(&config);

    let verdict = engine
        .evaluate_link("https://example.org/offer", Some("Claim your reward now"))
        .await;

    assert!(verdict.decision);
    assert_eq!(verdict.reasons, vec!["AI Risk Score: 97.0%".to_string()]);
    assert!(verdict.suggested_domain.is_none());
}

#[tokio::test]
async fn test_credentials_update_enables_classifier() {
    let classifier = StubService::start(vec![(StatusCode::OK, classifier_reply(0.9))]).await;
    let config = test_config(
        "http://127.0.0.1:9/",
        &classifier.url,
        Credentials::default(),
    );
    let engine = VerdictEngine::new(&config);

    let before = engine
        .evaluate_link("https://example.org/", Some("hello"))
        .await;
    assert!(!before.decision);
    assert_eq!(classifier.hits(), 0);

    engine
        .update_credentials(None, Some("hf-token".to_string()))
        .await;
    assert_eq!(engine.credential_status().await, (false, true));

    let after = engine
        .evaluate_link("https://example.org/", Some("hello"))
        .await;
    assert!(after.decision);
    assert_eq!(classifier.hits(), 1);
}

/// Recorder whose backend is always down
#[derive(Default)]
struct FailingRecorder {
    calls: AtomicUsize,
}

#[async_trait]
impl ScanRecorder for FailingRecorder {
    async fn record_scan(&self) -> Result<(), StatsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StatsError::Unavailable("offline".to_string()))
    }

    async fn record_block(&self, _url: &str) -> Result<(), StatsError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(StatsError::Unavailable("offline".to_string()))
    }

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        Err(StatsError::Unavailable("offline".to_string()))
    }
}

#[tokio::test]
async fn test_recorder_failures_do_not_change_verdicts() {
    let recorder = Arc::new(FailingRecorder::default());
    let engine = VerdictEngine::new(&offline_config()).with_recorder(recorder.clone());

    let verdict = engine.evaluate_link(PHISHING_URL, None).await;

    assert!(verdict.decision);
    assert_eq!(recorder.calls.load(Ordering::SeqCst), 2);
    assert!(engine.stats().await.is_err());
}
