// Detection signals and shared helpers for the verdict engine

pub mod api_errors;
pub mod classifier_client;
pub mod domain;
pub mod pattern_rules;
pub mod safe_browsing_client;
pub mod similarity;
pub mod trust_registry;

pub use api_errors::{ApiError, ApiErrorResponse, ApiResult};
pub use classifier_client::{ClassifierClient, ClassifierError, ClassifierResult};
pub use domain::DomainInfo;
pub use pattern_rules::{PatternEngine, PatternMatch, RuleScope};
pub use safe_browsing_client::{ReputationClient, ReputationError, ReputationResult};
pub use similarity::{
    levenshtein, normalize_label, SimilarityAnalyzer, SimilarityKind, SimilarityResult,
    MAX_EDIT_DISTANCE,
};
pub use trust_registry::TrustRegistry;
