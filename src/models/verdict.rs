// Verdict returned to the host for one evaluated subject

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Verdict {
    pub decision: bool,
    /// Unique reasons in the order the signals reported them
    pub reasons: Vec<String>,
    pub suggested_domain: Option<String>,
}

impl Verdict {
    /// Non-phishing verdict with no supporting reasons
    pub fn clear() -> Self {
        Self {
            decision: false,
            reasons: Vec::new(),
            suggested_domain: None,
        }
    }
}

/// Accumulates reasons from several signals, dropping duplicates and blanks
#[derive(Debug, Default)]
pub struct VerdictBuilder {
    reasons: Vec<String>,
    seen: HashSet<String>,
    suggestion: Option<String>,
}

impl VerdictBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_reason(&mut self, reason: impl Into<String>) -> &mut Self {
        let reason = reason.into();
        if !reason.trim().is_empty() && self.seen.insert(reason.clone()) {
            self.reasons.push(reason);
        }
        self
    }

    /// Trusted domain the user probably meant; the first suggestion sticks
    pub fn suggest(&mut self, domain: Option<String>) -> &mut Self {
        if self.suggestion.is_none() {
            self.suggestion = domain.filter(|d| !d.is_empty());
        }
        self
    }

    pub fn build(self) -> Verdict {
        let decision = !self.reasons.is_empty();
        Verdict {
            decision,
            reasons: self.reasons,
            suggested_domain: self.suggestion.filter(|_| decision),
        }
    }
}
