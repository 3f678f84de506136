// Remote spam/phishing text classifier client
// Bounded retry with a fixed delay on server errors and transport failures

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

use crate::app_config::{ClassifierConfig, CredentialStore};

pub const REASON_NOT_CONFIGURED: &str = "AI analysis not configured";
pub const REASON_INVALID_RESPONSE: &str = "Invalid API response";
pub const REASON_RETRIES_EXHAUSTED: &str = "AI analysis failed after retries";

#[derive(Debug, Error)]
pub enum ClassifierError {
    #[error("Classifier token not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Classifier server error: HTTP {0}")]
    ServerError(u16),

    #[error("Classifier request rejected: HTTP {0}")]
    ClientError(u16),

    #[error("Malformed classifier response: {0}")]
    Malformed(String),
}

impl ClassifierError {
    /// Only server-side failures and dropped connections are worth another attempt
    pub fn is_retryable(&self) -> bool {
        matches!(self, ClassifierError::Network(_) | ClassifierError::ServerError(_))
    }
}

#[derive(Debug, Serialize)]
struct ClassifyRequest<'a> {
    inputs: &'a str,
}

#[derive(Debug, Deserialize)]
struct LabelScore {
    label: String,
    score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassifierResult {
    pub suspicious: bool,
    pub score: f64,
    pub reason: Option<String>,
    pub attempts: u32,
}

impl ClassifierResult {
    fn neutral(reason: impl Into<String>, attempts: u32) -> Self {
        Self {
            suspicious: false,
            score: 0.0,
            reason: Some(reason.into()),
            attempts,
        }
    }
}

#[derive(Clone)]
pub struct ClassifierClient {
    http_client: reqwest::Client,
    config: ClassifierConfig,
    credentials: CredentialStore,
}

impl ClassifierClient {
    pub fn new(
        http_client: reqwest::Client,
        config: ClassifierConfig,
        credentials: CredentialStore,
    ) -> Self {
        Self {
            http_client,
            config,
            credentials,
        }
    }

    /// Classify text; failures become a neutral result carrying a diagnostic reason
    #[instrument(skip(self, text), fields(len = text.len()))]
    pub async fn classify(&self, text: &str) -> ClassifierResult {
        let Some(token) = self.credentials.classifier_token().await else {
            debug!("Classifier token missing, skipping AI analysis");
            return ClassifierResult::neutral(REASON_NOT_CONFIGURED, 0);
        };

        let max_attempts = self.config.max_attempts.max(1);

        for attempt in 1..=max_attempts {
            match self.request_score(&token, text).await {
                Ok(score) => return self.score_result(score, attempt),
                Err(e) if e.is_retryable() => {
                    warn!(
                        "Classifier attempt {}/{} failed: {}",
                        attempt, max_attempts, e
                    );
                    if attempt < max_attempts {
                        info!("Retrying in {:?}", self.config.retry_delay());
                        tokio::time::sleep(self.config.retry_delay()).await;
                    }
                },
                Err(ClassifierError::Malformed(detail)) => {
                    warn!("Classifier returned an unexpected shape: {}", detail);
                    return ClassifierResult::neutral(REASON_INVALID_RESPONSE, attempt);
                },
                Err(ClassifierError::ClientError(status)) => {
                    warn!("Classifier rejected request with HTTP {}, not retrying", status);
                    return ClassifierResult::neutral(
                        format!("AI analysis error: HTTP {}", status),
                        attempt,
                    );
                },
                Err(e) => {
                    return ClassifierResult::neutral(format!("AI analysis error: {}", e), attempt);
                },
            }
        }

        ClassifierResult::neutral(REASON_RETRIES_EXHAUSTED, max_attempts)
    }

    /// One POST to the classifier, returning the positive-class probability
    pub async fn request_score(&self, token: &str, text: &str) -> Result<f64, ClassifierError> {
        let response = self
            .http_client
            .post(&self.config.endpoint)
            .bearer_auth(token)
            .json(&ClassifyRequest { inputs: text })
            .send()
            .await?;

        let status = response.status();
        if status.is_server_error() {
            return Err(ClassifierError::ServerError(status.as_u16()));
        }
        if !status.is_success() {
            return Err(ClassifierError::ClientError(status.as_u16()));
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ClassifierError::Malformed(e.to_string()))?;

        positive_score(&value, &self.config.positive_label)
    }

    fn score_result(&self, score: f64, attempts: u32) -> ClassifierResult {
        let suspicious = score > self.config.min_risk_score;
        ClassifierResult {
            suspicious,
            score,
            reason: suspicious.then(|| format!("AI Risk Score: {:.1}%", score * 100.0)),
            attempts,
        }
    }
}

/// Extract the positive-class score from an array-of-array prediction
fn positive_score(value: &Value, positive_label: &str) -> Result<f64, ClassifierError> {
    let predictions = value
        .as_array()
        .and_then(|outer| outer.first())
        .and_then(Value::as_array)
        .ok_or_else(|| ClassifierError::Malformed("expected [[{label, score}]]".to_string()))?;

    let entries: Vec<LabelScore> = predictions
        .iter()
        .map(|entry| serde_json::from_value(entry.clone()))
        .collect::<Result<_, _>>()
        .map_err(|e| ClassifierError::Malformed(e.to_string()))?;

    let entry = entries
        .iter()
        .find(|entry| entry.label == positive_label)
        .or_else(|| entries.get(1))
        .ok_or_else(|| ClassifierError::Malformed("no positive-class entry".to_string()))?;

    if !entry.score.is_finite() || !(0.0..=1.0).contains(&entry.score) {
        return Err(ClassifierError::Malformed(format!(
            "score {} out of range",
            entry.score
        )));
    }

    Ok(entry.score)
}
