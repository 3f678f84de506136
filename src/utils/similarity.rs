// Typosquatting and brand impersonation analysis against trusted roots

use serde::{Deserialize, Serialize};

use crate::utils::domain::{root_label, DomainInfo};
use crate::utils::trust_registry::TrustRegistry;

/// Largest edit distance still reported as a near-miss spelling
pub const MAX_EDIT_DISTANCE: usize = 2;

// =============================================================================
// REFERENCE TABLES
// =============================================================================

// Declaration order is the tie-break order for every pass below.
const DEFAULT_REFERENCE_ROOTS: &[&str] = &[
    "google.com",
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "microsoft.com",
    "apple.com",
    "amazon.com",
    "paypal.com",
    "chase.com",
    "wellsfargo.com",
    "bankofamerica.com",
];

// Brands without a reference root; checked after the reference brands.
const EXTRA_BRANDS: &[(&str, &str)] = &[
    ("netflix", "netflix.com"),
    ("citibank", "citibank.com"),
    ("amex", "americanexpress.com"),
    ("americanexpress", "americanexpress.com"),
];

/// Brand tokens in reference order, followed by the extra brands
fn default_brands() -> Vec<(String, String)> {
    DEFAULT_REFERENCE_ROOTS
        .iter()
        .map(|root| (root_label(root), *root))
        .chain(EXTRA_BRANDS.iter().copied())
        .map(|(token, domain)| (token.to_string(), domain.to_string()))
        .collect()
}

// Multi-character impostors are folded before single characters.
const MULTI_CHAR_SUBSTITUTIONS: &[(&str, &str)] = &[("vv", "w"), ("rn", "m")];

fn substitute_char(c: char) -> char {
    match c {
        '0' => 'o',
        '1' => 'l',
        '3' => 'e',
        '4' => 'a',
        '5' => 's',
        '7' => 't',
        '@' => 'a',
        '$' => 's',
        other => other,
    }
}

/// Fold common look-alike characters back to the letters they imitate
pub fn normalize_label(label: &str) -> String {
    let mut folded = label.to_lowercase();
    for (fake, real) in MULTI_CHAR_SUBSTITUTIONS {
        folded = folded.replace(fake, real);
    }
    folded.chars().map(substitute_char).collect()
}

/// Classic dynamic-programming edit distance with unit costs
pub fn levenshtein(a: &str, b: &str) -> usize {
    let a: Vec<char> = a.chars().collect();
    let b: Vec<char> = b.chars().collect();
    let (m, n) = (a.len(), b.len());
    if m == 0 {
        return n;
    }
    if n == 0 {
        return m;
    }

    let mut prev: Vec<usize> = (0..=n).collect();
    let mut curr = vec![0usize; n + 1];

    for i in 1..=m {
        curr[0] = i;
        for j in 1..=n {
            curr[j] = if a[i - 1] == b[j - 1] {
                prev[j - 1]
            } else {
                (prev[j - 1] + 1).min(prev[j] + 1).min(curr[j - 1] + 1)
            };
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[n]
}

// =============================================================================
// RESULT TYPES
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityKind {
    None,
    BrandImpersonation,
    NormalizedCollision,
    EditDistance,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarityResult {
    pub is_match: bool,
    pub distance: usize,
    pub candidate: Option<String>,
    pub kind: SimilarityKind,
    pub reason: Option<String>,
}

impl SimilarityResult {
    fn no_match(distance: usize) -> Self {
        Self {
            is_match: false,
            distance,
            candidate: None,
            kind: SimilarityKind::None,
            reason: None,
        }
    }

    fn matched(kind: SimilarityKind, distance: usize, candidate: &str, reason: String) -> Self {
        Self {
            is_match: true,
            distance,
            candidate: Some(candidate.to_string()),
            kind,
            reason: Some(reason),
        }
    }
}

// =============================================================================
// SIMILARITY ANALYZER
// =============================================================================

#[derive(Debug, Clone)]
pub struct SimilarityAnalyzer {
    registry: TrustRegistry,
    references: Vec<String>,
    brands: Vec<(String, String)>,
}

impl SimilarityAnalyzer {
    pub fn new(registry: TrustRegistry) -> Self {
        Self {
            registry,
            references: DEFAULT_REFERENCE_ROOTS.iter().map(|r| r.to_string()).collect(),
            brands: default_brands(),
        }
    }

    pub fn with_references<I, S>(mut self, references: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.references = references
            .into_iter()
            .map(|r| r.as_ref().to_lowercase())
            .collect();
        self
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = (S, S)>,
        S: AsRef<str>,
    {
        self.brands = brands
            .into_iter()
            .map(|(token, domain)| (token.as_ref().to_lowercase(), domain.as_ref().to_lowercase()))
            .collect();
        self
    }

    pub fn analyze(&self, domain: &str) -> SimilarityResult {
        let info = DomainInfo::new(domain);
        if info.as_str().is_empty() || self.registry.is_trusted_info(&info) {
            return SimilarityResult::no_match(0);
        }

        // Substring containment is a stronger signal than a near-miss spelling
        if let Some(result) = self.brand_impersonation(&info) {
            return result;
        }

        let label = info.first_label();
        let normalized = normalize_label(label);

        for root in &self.references {
            let reference = root_label(root);
            if label != reference && normalized == normalize_label(reference) {
                return SimilarityResult::matched(
                    SimilarityKind::NormalizedCollision,
                    0,
                    root,
                    format!("Similar to trusted domain: {}", root),
                );
            }
        }

        let mut best: Option<(usize, &str)> = None;
        for root in &self.references {
            let reference = root_label(root);
            if label == reference {
                continue;
            }
            let distance = levenshtein(label, reference);
            if best.map_or(true, |(current, _)| distance < current) {
                best = Some((distance, root.as_str()));
            }
        }

        match best {
            Some((distance, root)) if distance <= MAX_EDIT_DISTANCE => SimilarityResult::matched(
                SimilarityKind::EditDistance,
                distance,
                root,
                format!("Similar to trusted domain: {}", root),
            ),
            Some((distance, _)) => SimilarityResult::no_match(distance),
            None => SimilarityResult::no_match(0),
        }
    }

    /// Analyze the host of a URL; unparseable URLs never match
    pub fn analyze_url(&self, url: &str) -> SimilarityResult {
        match DomainInfo::from_url(url) {
            Some(info) => self.analyze(info.as_str()),
            None => SimilarityResult::no_match(0),
        }
    }

    fn brand_impersonation(&self, info: &DomainInfo) -> Option<SimilarityResult> {
        let raw = info.as_str();
        let normalized = normalize_label(raw);

        self.brands
            .iter()
            .find(|(token, _)| raw.contains(token.as_str()) || normalized.contains(token.as_str()))
            .map(|(token, domain)| {
                SimilarityResult::matched(
                    SimilarityKind::BrandImpersonation,
                    0,
                    domain,
                    format!("Possible {} impersonation detected", token),
                )
            })
    }
}

impl Default for SimilarityAnalyzer {
    fn default() -> Self {
        Self::new(TrustRegistry::default())
    }
}
