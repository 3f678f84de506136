// Time-bounded allow-list of URLs the user chose to proceed to
// Process-local only; nothing survives a restart

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

pub const DEFAULT_APPROVAL_TTL: Duration = Duration::from_secs(5 * 60);

#[derive(Clone)]
pub struct ApprovalCache {
    // Keys are the literal URL strings; no normalization
    entries: Arc<RwLock<HashMap<String, Instant>>>,
    ttl: Duration,
}

impl ApprovalCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Approve a URL for one window; re-approving refreshes the expiry
    pub async fn approve(&self, url: &str) {
        let expires_at = Instant::now() + self.ttl;
        self.entries.write().await.insert(url.to_string(), expires_at);
        debug!("Approved {} for {:?}", url, self.ttl);
    }

    pub async fn is_approved(&self, url: &str) -> bool {
        let now = Instant::now();
        {
            let entries = self.entries.read().await;
            match entries.get(url) {
                Some(expires_at) if *expires_at > now => return true,
                Some(_) => {},
                None => return false,
            }
        }

        // Expired: drop it, unless a concurrent approve refreshed it meanwhile
        let mut entries = self.entries.write().await;
        match entries.get(url) {
            Some(expires_at) if *expires_at > now => true,
            Some(_) => {
                entries.remove(url);
                false
            },
            None => false,
        }
    }

    /// Remove every expired entry, returning how many were dropped
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        before - entries.len()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }

    /// Periodically purge expired approvals until the handle is aborted
    pub fn spawn_sweeper(&self, interval: Duration) -> JoinHandle<()> {
        let cache = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let removed = cache.purge_expired().await;
                if removed > 0 {
                    debug!("Approval sweeper removed {} expired entries", removed);
                }
            }
        })
    }
}

impl Default for ApprovalCache {
    fn default() -> Self {
        Self::new(DEFAULT_APPROVAL_TTL)
    }
}
