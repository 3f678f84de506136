// Remote URL reputation lookup against a threat-matching service
// Falls back to local heuristics whenever the lookup cannot be trusted

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, instrument, warn};

use crate::app_config::{CredentialStore, ReputationConfig};
use crate::utils::domain::DomainInfo;
use crate::utils::pattern_rules::PatternEngine;
use crate::utils::trust_registry::TrustRegistry;

// =============================================================================
// ERROR TYPES
// =============================================================================

#[derive(Debug, Error)]
pub enum ReputationError {
    #[error("Safe Browsing API key not configured")]
    NotConfigured,

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Safe Browsing API returned HTTP {0}")]
    Status(u16),

    #[error("Malformed response: {0}")]
    Malformed(String),
}

// =============================================================================
// WIRE FORMAT
// =============================================================================

const THREAT_TYPES: &[&str] = &["MALWARE", "SOCIAL_ENGINEERING"];
const PLATFORM_TYPES: &[&str] = &["ANY_PLATFORM"];
const THREAT_ENTRY_TYPES: &[&str] = &["URL"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatchRequest<'a> {
    client: ClientInfo<'a>,
    threat_info: ThreatInfo<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ClientInfo<'a> {
    client_id: &'a str,
    client_version: &'a str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ThreatInfo<'a> {
    threat_types: &'static [&'static str],
    platform_types: &'static [&'static str],
    threat_entry_types: &'static [&'static str],
    threat_entries: Vec<ThreatEntry<'a>>,
}

#[derive(Debug, Serialize)]
struct ThreatEntry<'a> {
    url: &'a str,
}

#[derive(Debug, Deserialize)]
struct ThreatMatchResponse {
    #[serde(default)]
    matches: Vec<ThreatMatch>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThreatMatch {
    #[serde(default)]
    threat_type: Option<String>,
}

// =============================================================================
// RESULT
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReputationResult {
    pub suspicious: bool,
    pub reason: Option<String>,
    /// Set when the verdict came from local heuristics instead of the service
    pub degraded: bool,
}

impl ReputationResult {
    fn remote(suspicious: bool, reason: Option<String>) -> Self {
        Self {
            suspicious,
            reason,
            degraded: false,
        }
    }
}

// =============================================================================
// REPUTATION CLIENT
// =============================================================================

#[derive(Clone)]
pub struct ReputationClient {
    http_client: reqwest::Client,
    config: ReputationConfig,
    credentials: CredentialStore,
    registry: TrustRegistry,
    patterns: PatternEngine,
}

impl ReputationClient {
    pub fn new(
        http_client: reqwest::Client,
        config: ReputationConfig,
        credentials: CredentialStore,
        registry: TrustRegistry,
    ) -> Self {
        Self {
            http_client,
            config,
            credentials,
            registry,
            patterns: PatternEngine::new(),
        }
    }

    /// Trust list consulted by the heuristic fallback
    pub fn with_registry(mut self, registry: TrustRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Check a URL; never fails, degrading to heuristics when the service is unusable
    pub async fn check(&self, url: &str) -> ReputationResult {
        match self.lookup(url).await {
            Ok(result) => result,
            Err(ReputationError::NotConfigured) => {
                debug!("Reputation lookup skipped, no API key configured");
                self.heuristic_fallback(url)
            }
            Err(e) => {
                warn!("Reputation lookup failed for {}: {}", url, e);
                self.heuristic_fallback(url)
            }
        }
    }

    /// Query the threat-matching service once
    #[instrument(skip(self), fields(endpoint = %self.config.endpoint))]
    pub async fn lookup(&self, url: &str) -> Result<ReputationResult, ReputationError> {
        let api_key = self
            .credentials
            .safe_browsing_api_key()
            .await
            .ok_or(ReputationError::NotConfigured)?;

        let body = ThreatMatchRequest {
            client: ClientInfo {
                client_id: &self.config.client_id,
                client_version: &self.config.client_version,
            },
            threat_info: ThreatInfo {
                threat_types: THREAT_TYPES,
                platform_types: PLATFORM_TYPES,
                threat_entry_types: THREAT_ENTRY_TYPES,
                threat_entries: vec![ThreatEntry { url }],
            },
        };

        let response = self
            .http_client
            .post(&self.config.endpoint)
            .query(&[("key", api_key.as_str())])
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ReputationError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        let parsed: ThreatMatchResponse = if text.trim().is_empty() {
            ThreatMatchResponse {
                matches: Vec::new(),
            }
        } else {
            serde_json::from_str(&text).map_err(|e| ReputationError::Malformed(e.to_string()))?
        };

        match parsed.matches.into_iter().next() {
            Some(threat) => {
                warn!("Reputation service flagged URL: {}", url);
                Ok(ReputationResult::remote(
                    true,
                    Some(
                        threat
                            .threat_type
                            .unwrap_or_else(|| "THREAT_TYPE_UNSPECIFIED".to_string()),
                    ),
                ))
            }
            None => Ok(ReputationResult::remote(false, None)),
        }
    }

    /// Local verdict used when the remote service is unavailable
    pub fn heuristic_fallback(&self, url: &str) -> ReputationResult {
        let trusted = DomainInfo::from_url(url)
            .map(|info| self.registry.is_trusted_info(&info))
            .unwrap_or(false);

        let reason = if trusted {
            None
        } else {
            self.patterns
                .scan_url(url)
                .into_iter()
                .next()
                .map(|m| m.reason)
        };

        ReputationResult {
            suspicious: reason.is_some(),
            reason,
            degraded: true,
        }
    }
}
