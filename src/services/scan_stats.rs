// Scan counters reported back to the host (popup stats)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;
use tokio::sync::RwLock;

pub const MAX_RECENT_THREATS: usize = 10;

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("Stats backend unavailable: {0}")]
    Unavailable(String),
}

/// Host-side counters the engine reports to after each check
#[async_trait]
pub trait ScanRecorder: Send + Sync {
    async fn record_scan(&self) -> Result<(), StatsError>;

    async fn record_block(&self, url: &str) -> Result<(), StatsError>;

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecentThreat {
    pub url: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatsSnapshot {
    pub links_scanned: u64,
    pub threats_blocked: u64,
    /// Newest first
    pub recent_threats: Vec<RecentThreat>,
}

/// Default recorder; counters reset with the process
#[derive(Default)]
pub struct InMemoryStats {
    links_scanned: AtomicU64,
    threats_blocked: AtomicU64,
    recent_threats: RwLock<VecDeque<RecentThreat>>,
}

impl InMemoryStats {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ScanRecorder for InMemoryStats {
    async fn record_scan(&self) -> Result<(), StatsError> {
        self.links_scanned.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    async fn record_block(&self, url: &str) -> Result<(), StatsError> {
        self.threats_blocked.fetch_add(1, Ordering::Relaxed);

        let mut recent = self.recent_threats.write().await;
        recent.push_front(RecentThreat {
            url: url.to_string(),
            timestamp: Utc::now(),
        });
        recent.truncate(MAX_RECENT_THREATS);
        Ok(())
    }

    async fn snapshot(&self) -> Result<StatsSnapshot, StatsError> {
        Ok(StatsSnapshot {
            links_scanned: self.links_scanned.load(Ordering::Relaxed),
            threats_blocked: self.threats_blocked.load(Ordering::Relaxed),
            recent_threats: self.recent_threats.read().await.iter().cloned().collect(),
        })
    }
}
