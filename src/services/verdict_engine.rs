// Verdict aggregation over every detection signal
// Local signals run inline; remote lookups run as spawned tasks and may abstain

use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, instrument, warn};

use crate::app_config::{AppConfig, CredentialStore, FeatureToggles};
use crate::models::{Platform, Verdict, VerdictBuilder};
use crate::services::approval_cache::ApprovalCache;
use crate::services::scan_stats::{InMemoryStats, ScanRecorder, StatsError, StatsSnapshot};
use crate::utils::classifier_client::{ClassifierClient, ClassifierResult};
use crate::utils::domain::DomainInfo;
use crate::utils::pattern_rules::PatternEngine;
use crate::utils::safe_browsing_client::{ReputationClient, ReputationResult};
use crate::utils::similarity::SimilarityAnalyzer;
use crate::utils::trust_registry::TrustRegistry;

/// Browser-internal schemes that are never checked
const RESTRICTED_SCHEMES: &[&str] = &["chrome:", "chrome-extension:", "edge:", "about:"];

pub fn is_restricted_url(url: &str) -> bool {
    let lowered = url.trim_start().to_ascii_lowercase();
    RESTRICTED_SCHEMES
        .iter()
        .any(|scheme| lowered.starts_with(scheme))
}

/// Shared HTTP client for both remote services; a timeout counts as a transport failure
pub fn build_http_client(timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(timeout)
        .user_agent(concat!("PhishGuard-Core/", env!("CARGO_PKG_VERSION")))
        .build()
        .unwrap_or_default()
}

#[derive(Clone)]
pub struct VerdictEngine {
    registry: TrustRegistry,
    similarity: SimilarityAnalyzer,
    patterns: PatternEngine,
    reputation: ReputationClient,
    classifier: ClassifierClient,
    approvals: ApprovalCache,
    stats: Arc<dyn ScanRecorder>,
    credentials: CredentialStore,
    features: FeatureToggles,
}

impl VerdictEngine {
    pub fn new(config: &AppConfig) -> Self {
        let registry = TrustRegistry::default();
        let credentials = CredentialStore::new(config.credentials.clone());
        let http_client = build_http_client(config.remote_timeout());

        Self {
            similarity: SimilarityAnalyzer::new(registry.clone()),
            patterns: PatternEngine::new(),
            reputation: ReputationClient::new(
                http_client.clone(),
                config.reputation.clone(),
                credentials.clone(),
                registry.clone(),
            ),
            classifier: ClassifierClient::new(
                http_client,
                config.classifier.clone(),
                credentials.clone(),
            ),
            approvals: ApprovalCache::new(config.approval.ttl()),
            stats: Arc::new(InMemoryStats::new()),
            credentials,
            features: config.features.clone(),
            registry,
        }
    }

    /// Use a host-provided trust list for every signal that consults one
    pub fn with_registry(mut self, registry: TrustRegistry) -> Self {
        self.similarity = SimilarityAnalyzer::new(registry.clone());
        self.reputation = self.reputation.with_registry(registry.clone());
        self.registry = registry;
        self
    }

    /// Replace the default in-memory counters with a host-provided recorder
    pub fn with_recorder(mut self, recorder: Arc<dyn ScanRecorder>) -> Self {
        self.stats = recorder;
        self
    }

    pub fn approvals(&self) -> &ApprovalCache {
        &self.approvals
    }

    pub fn features(&self) -> &FeatureToggles {
        &self.features
    }

    // =========================================================================
    // CHECKS
    // =========================================================================

    /// Decide whether navigating to `url` should be interrupted
    #[instrument(skip(self))]
    pub async fn evaluate_navigation(&self, url: &str) -> Verdict {
        if self.approvals.is_approved(url).await {
            debug!("URL approved by user, skipping checks");
            return Verdict::clear();
        }
        if is_restricted_url(url) {
            return Verdict::clear();
        }
        let Some(domain) = DomainInfo::from_url(url) else {
            debug!("Unparseable URL, nothing to check");
            return Verdict::clear();
        };
        if self.registry.is_trusted_info(&domain) {
            return Verdict::clear();
        }

        let reputation = self
            .features
            .url_check
            .then(|| self.spawn_reputation(url));

        let patterns = self.patterns.scan_url(url);
        let similarity = self
            .features
            .domain_check
            .then(|| self.similarity.analyze(domain.as_str()));

        let mut builder = VerdictBuilder::new();
        if let Some(task) = reputation {
            if let Some(result) = join_signal("reputation", task).await {
                add_reputation(&mut builder, result);
            }
        }
        for m in patterns {
            builder.add_reason(m.reason);
        }
        if let Some(result) = similarity.filter(|s| s.is_match) {
            if let Some(reason) = result.reason {
                builder.add_reason(reason);
            }
            builder.suggest(result.candidate);
        }

        let verdict = builder.build();
        if verdict.decision {
            info!("Navigation flagged: {} ({} reasons)", url, verdict.reasons.len());
            self.record_block(url).await;
        }
        verdict
    }

    /// Check scraped page or message content plus the links found in it
    #[instrument(skip(self, content, links), fields(links = links.len(), platform = %platform))]
    pub async fn evaluate_content(
        &self,
        content: &str,
        links: &[String],
        platform: Platform,
    ) -> Verdict {
        self.record_scan().await;

        let classifier = (self.features.ai_check && !content.trim().is_empty())
            .then(|| self.spawn_classifier(content));

        let mut builder = VerdictBuilder::new();
        for m in self.patterns.scan_content(content, platform) {
            builder.add_reason(m.reason);
        }

        if self.features.domain_check {
            for link in links {
                let result = self.similarity.analyze_url(link);
                if !result.is_match {
                    continue;
                }
                if let Some(reason) = result.reason {
                    builder.add_reason(reason);
                }
                builder.suggest(result.candidate);
            }
        }

        if let Some(task) = classifier {
            if let Some(result) = join_signal("classifier", task).await {
                add_classifier(&mut builder, result);
            }
        }

        let verdict = builder.build();
        if verdict.decision {
            let subject = links
                .first()
                .cloned()
                .unwrap_or_else(|| format!("content:{}", platform));
            info!("Content flagged on {} ({} reasons)", platform, verdict.reasons.len());
            self.record_block(&subject).await;
        }
        verdict
    }

    /// Check a single link, optionally with the text surrounding it
    #[instrument(skip(self, context))]
    pub async fn evaluate_link(&self, url: &str, context: Option<&str>) -> Verdict {
        self.record_scan().await;

        let domain = if is_restricted_url(url) {
            None
        } else {
            DomainInfo::from_url(url)
        };
        if domain
            .as_ref()
            .is_some_and(|d| self.registry.is_trusted_info(d))
        {
            return Verdict::clear();
        }

        let reputation = (self.features.url_check && domain.is_some())
            .then(|| self.spawn_reputation(url));
        let classifier = context
            .filter(|c| self.features.ai_check && !c.trim().is_empty())
            .map(|c| self.spawn_classifier(c));

        let mut builder = VerdictBuilder::new();
        if let Some(domain) = domain.as_ref().filter(|_| self.features.domain_check) {
            let result = self.similarity.analyze(domain.as_str());
            if result.is_match {
                if let Some(reason) = result.reason {
                    builder.add_reason(reason);
                }
                builder.suggest(result.candidate);
            }
        }
        if let Some(task) = reputation {
            if let Some(result) = join_signal("reputation", task).await {
                add_reputation(&mut builder, result);
            }
        }
        if let Some(task) = classifier {
            if let Some(result) = join_signal("classifier", task).await {
                add_classifier(&mut builder, result);
            }
        }

        let verdict = builder.build();
        if verdict.decision {
            info!("Link flagged: {} ({} reasons)", url, verdict.reasons.len());
            self.record_block(url).await;
        }
        verdict
    }

    // =========================================================================
    // HOST CALLBACKS
    // =========================================================================

    /// User chose to proceed; suppresses navigation verdicts for one window
    pub async fn approve(&self, url: &str) {
        self.approvals.approve(url).await;
    }

    pub async fn is_approved(&self, url: &str) -> bool {
        self.approvals.is_approved(url).await
    }

    pub async fn update_credentials(
        &self,
        safe_browsing_api_key: Option<String>,
        classifier_token: Option<String>,
    ) {
        self.credentials
            .update(safe_browsing_api_key, classifier_token)
            .await;
        info!("Remote service credentials updated");
    }

    /// Which remote credentials are present, as (reputation, classifier)
    pub async fn credential_status(&self) -> (bool, bool) {
        self.credentials.status().await
    }

    pub async fn stats(&self) -> Result<StatsSnapshot, StatsError> {
        self.stats.snapshot().await
    }

    // =========================================================================
    // INTERNALS
    // =========================================================================

    fn spawn_reputation(&self, url: &str) -> JoinHandle<ReputationResult> {
        let client = self.reputation.clone();
        let url = url.to_string();
        tokio::spawn(async move { client.check(&url).await })
    }

    fn spawn_classifier(&self, text: &str) -> JoinHandle<ClassifierResult> {
        let client = self.classifier.clone();
        let text = text.to_string();
        tokio::spawn(async move { client.classify(&text).await })
    }

    async fn record_scan(&self) {
        if let Err(e) = self.stats.record_scan().await {
            warn!("Failed to record scan: {}", e);
        }
    }

    async fn record_block(&self, subject: &str) {
        if let Err(e) = self.stats.record_block(subject).await {
            warn!("Failed to record blocked threat: {}", e);
        }
    }
}

async fn join_signal<T>(name: &str, handle: JoinHandle<T>) -> Option<T> {
    match handle.await {
        Ok(result) => Some(result),
        Err(e) => {
            warn!("{} signal abstained: {}", name, e);
            None
        },
    }
}

fn add_reputation(builder: &mut VerdictBuilder, result: ReputationResult) {
    if !result.suspicious {
        return;
    }
    if result.degraded {
        debug!("Reputation verdict came from local heuristics");
    }
    if let Some(reason) = result.reason {
        builder.add_reason(reason);
    }
}

fn add_classifier(builder: &mut VerdictBuilder, result: ClassifierResult) {
    if result.suspicious {
        if let Some(reason) = result.reason {
            builder.add_reason(reason);
        }
    }
}
