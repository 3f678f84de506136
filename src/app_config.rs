// Centralized configuration for the verdict engine and its HTTP surface
// Load every env var once at startup, then pass the value into the engine

use serde::{Deserialize, Serialize};
use std::env;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

pub const DEFAULT_SAFE_BROWSING_ENDPOINT: &str =
    "https://safebrowsing.googleapis.com/v4/threatMatches:find";
pub const DEFAULT_CLASSIFIER_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/mrm8488/bert-tiny-finetuned-sms-spam-detection";

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub reputation: ReputationConfig,
    pub classifier: ClassifierConfig,
    pub approval: ApprovalConfig,
    pub features: FeatureToggles,
    /// Per-request timeout for both remote services
    pub remote_timeout_secs: u64,
    #[serde(skip_serializing)]
    pub credentials: Credentials,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    pub environment: Environment,
    pub rust_log: String,
}

/// Environment type
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub enum Environment {
    Development,
    Test,
    Staging,
    Production,
}

impl From<String> for Environment {
    fn from(s: String) -> Self {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            "test" => Environment::Test,
            "staging" | "stage" => Environment::Staging,
            "production" | "prod" => Environment::Production,
            _ => Environment::Development,
        }
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Staging => write!(f, "staging"),
            Environment::Production => write!(f, "production"),
        }
    }
}

/// Remote threat-matching lookup
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationConfig {
    pub endpoint: String,
    pub client_id: String,
    pub client_version: String,
}

impl Default for ReputationConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_SAFE_BROWSING_ENDPOINT.to_string(),
            client_id: "phishguard-core".to_string(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

/// Remote spam/phishing text classifier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub endpoint: String,
    pub min_risk_score: f64,
    pub positive_label: String,
    pub max_attempts: u32,
    pub retry_delay_ms: u64,
}

impl ClassifierConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CLASSIFIER_ENDPOINT.to_string(),
            min_risk_score: 0.5,
            positive_label: "LABEL_1".to_string(),
            max_attempts: 3,
            retry_delay_ms: 1000,
        }
    }
}

/// User "proceed anyway" grace window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApprovalConfig {
    pub ttl_secs: u64,
    pub sweep_interval_secs: u64,
}

impl ApprovalConfig {
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }
}

impl Default for ApprovalConfig {
    fn default() -> Self {
        Self {
            ttl_secs: 300,
            sweep_interval_secs: 60,
        }
    }
}

/// Host-controlled switches for the individual signals
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureToggles {
    pub url_check: bool,
    pub ai_check: bool,
    pub domain_check: bool,
}

impl Default for FeatureToggles {
    fn default() -> Self {
        Self {
            url_check: true,
            ai_check: true,
            domain_check: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig {
                bind_address: "0.0.0.0:8080".to_string(),
                port: 8080,
                environment: Environment::Development,
                rust_log: "info".to_string(),
            },
            reputation: ReputationConfig::default(),
            classifier: ClassifierConfig::default(),
            approval: ApprovalConfig::default(),
            features: FeatureToggles::default(),
            remote_timeout_secs: 10,
            credentials: Credentials::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        // Helper function to get optional env var with default
        let get_or_default = |key: &str, default: &str| -> String {
            env::var(key).unwrap_or_else(|_| default.to_string())
        };

        let parse_u32_or_default = |key: &str, default: &str| -> Result<u32, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u32".to_string())
            })
        };

        let parse_u64_or_default = |key: &str, default: &str| -> Result<u64, ConfigError> {
            get_or_default(key, default).parse().map_err(|_| {
                ConfigError::InvalidValue(key.to_string(), "not a valid u64".to_string())
            })
        };

        let parse_bool_or_default = |key: &str, default: &str| -> bool {
            get_or_default(key, default).to_lowercase() == "true"
        };

        // Parse bind address to extract port
        let bind_address = get_or_default("BIND_ADDRESS", "0.0.0.0:8080");
        let port = bind_address
            .rsplit(':')
            .next()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let environment = Environment::from(get_or_default("ENVIRONMENT", "development"));
        let rust_log = get_or_default("RUST_LOG", "info");

        let reputation_defaults = ReputationConfig::default();
        let reputation = ReputationConfig {
            endpoint: get_or_default("SAFE_BROWSING_ENDPOINT", DEFAULT_SAFE_BROWSING_ENDPOINT),
            client_id: get_or_default("SAFE_BROWSING_CLIENT_ID", &reputation_defaults.client_id),
            client_version: get_or_default(
                "SAFE_BROWSING_CLIENT_VERSION",
                &reputation_defaults.client_version,
            ),
        };

        let min_risk_score: f64 = get_or_default("CLASSIFIER_MIN_RISK_SCORE", "0.5")
            .parse()
            .map_err(|_| {
                ConfigError::InvalidValue(
                    "CLASSIFIER_MIN_RISK_SCORE".to_string(),
                    "not a valid number".to_string(),
                )
            })?;
        if !(0.0..=1.0).contains(&min_risk_score) {
            return Err(ConfigError::InvalidValue(
                "CLASSIFIER_MIN_RISK_SCORE".to_string(),
                "must be between 0.0 and 1.0".to_string(),
            ));
        }

        let max_attempts = parse_u32_or_default("CLASSIFIER_MAX_ATTEMPTS", "3")?;
        if max_attempts == 0 {
            return Err(ConfigError::InvalidValue(
                "CLASSIFIER_MAX_ATTEMPTS".to_string(),
                "must be at least 1".to_string(),
            ));
        }

        let classifier = ClassifierConfig {
            endpoint: get_or_default("CLASSIFIER_ENDPOINT", DEFAULT_CLASSIFIER_ENDPOINT),
            min_risk_score,
            positive_label: get_or_default("CLASSIFIER_POSITIVE_LABEL", "LABEL_1"),
            max_attempts,
            retry_delay_ms: parse_u64_or_default("CLASSIFIER_RETRY_DELAY_MS", "1000")?,
        };

        let approval = ApprovalConfig {
            ttl_secs: parse_u64_or_default("APPROVAL_TTL_SECS", "300")?,
            sweep_interval_secs: parse_u64_or_default("APPROVAL_SWEEP_INTERVAL_SECS", "60")?,
        };

        let features = FeatureToggles {
            url_check: parse_bool_or_default("FEATURE_URL_CHECK", "true"),
            ai_check: parse_bool_or_default("FEATURE_AI_CHECK", "true"),
            domain_check: parse_bool_or_default("FEATURE_DOMAIN_CHECK", "true"),
        };

        let credentials = Credentials::new(
            env::var("SAFE_BROWSING_API_KEY").ok(),
            env::var("CLASSIFIER_TOKEN").ok(),
        );

        Ok(Self {
            server: ServerConfig {
                bind_address,
                port,
                environment,
                rust_log,
            },
            reputation,
            classifier,
            approval,
            features,
            remote_timeout_secs: parse_u64_or_default("REMOTE_TIMEOUT_SECS", "10")?,
            credentials,
        })
    }

    pub fn remote_timeout(&self) -> Duration {
        Duration::from_secs(self.remote_timeout_secs)
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

/// Bearer credentials for the two remote services; blank values count as absent
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct Credentials {
    pub safe_browsing_api_key: Option<String>,
    pub classifier_token: Option<String>,
}

impl Credentials {
    pub fn new(safe_browsing_api_key: Option<String>, classifier_token: Option<String>) -> Self {
        Self {
            safe_browsing_api_key: non_blank(safe_browsing_api_key),
            classifier_token: non_blank(classifier_token),
        }
    }
}

// Never print the secrets themselves
impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("safe_browsing_api_key", &self.safe_browsing_api_key.is_some())
            .field("classifier_token", &self.classifier_token.is_some())
            .finish()
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Engine-owned credential holder, replaced through an explicit update call
#[derive(Clone, Default)]
pub struct CredentialStore {
    inner: Arc<RwLock<Credentials>>,
}

impl CredentialStore {
    pub fn new(credentials: Credentials) -> Self {
        Self {
            inner: Arc::new(RwLock::new(credentials)),
        }
    }

    pub async fn safe_browsing_api_key(&self) -> Option<String> {
        self.inner.read().await.safe_browsing_api_key.clone()
    }

    pub async fn classifier_token(&self) -> Option<String> {
        self.inner.read().await.classifier_token.clone()
    }

    /// Replace only the credentials that are provided; `Some("")` clears one
    pub async fn update(&self, safe_browsing_api_key: Option<String>, classifier_token: Option<String>) {
        let mut creds = self.inner.write().await;
        if let Some(key) = safe_browsing_api_key {
            creds.safe_browsing_api_key = non_blank(Some(key));
        }
        if let Some(token) = classifier_token {
            creds.classifier_token = non_blank(Some(token));
        }
    }

    pub async fn status(&self) -> (bool, bool) {
        let creds = self.inner.read().await;
        (
            creds.safe_browsing_api_key.is_some(),
            creds.classifier_token.is_some(),
        )
    }
}
