pub mod approval_cache;
pub mod scan_stats;
pub mod verdict_engine;

pub use approval_cache::{ApprovalCache, DEFAULT_APPROVAL_TTL};
pub use scan_stats::{InMemoryStats, RecentThreat, ScanRecorder, StatsError, StatsSnapshot};
pub use verdict_engine::{build_http_client, is_restricted_url, VerdictEngine};
