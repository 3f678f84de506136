// Heuristic phishing rules for domains, URL paths, full URLs and free text
// Every rule group is a row in RULE_GROUPS; evaluation order is declaration order.

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::models::platform::Platform;
use crate::utils::domain::DomainInfo;

const SUSPICIOUS_TLDS: &[&str] = &[
    "xyz", "top", "work", "click", "loan", "win", "review", "country", "party", "date", "stream",
    "download", "racing", "online", "science", "icu", "buzz", "site", "fun", "live", "world",
    "today", "space", "store", "tech", "one", "host",
];

const SECURITY_TERMS: &[&str] = &[
    "secure", "login", "verify", "account", "banking", "confirm", "update", "password",
    "billing", "payment", "identity",
];

const MAX_DOMAIN_HYPHENS: usize = 2;
const MAX_DOMAIN_DIGITS: usize = 3;

// =============================================================================
// RULE TABLE
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleScope {
    Domain,
    Path,
    FullUrl,
    Content,
}

#[derive(Debug)]
enum Matcher {
    Pattern(Regex),
    /// Low-reputation TLD together with a security keyword; neither alone counts
    SuspiciousTldWithKeyword,
    /// More than two hyphens or more than three digits in the hostname
    ExcessiveHyphensOrDigits,
}

impl Matcher {
    fn is_match(&self, input: &str, domain: Option<&DomainInfo>) -> bool {
        match self {
            Matcher::Pattern(re) => re.is_match(input),
            Matcher::SuspiciousTldWithKeyword => domain.map_or(false, |d| {
                SUSPICIOUS_TLDS.contains(&d.tld())
                    && SECURITY_TERMS.iter().any(|term| d.as_str().contains(term))
            }),
            Matcher::ExcessiveHyphensOrDigits => domain.map_or(false, |d| {
                d.hyphen_count() > MAX_DOMAIN_HYPHENS || d.digit_count() > MAX_DOMAIN_DIGITS
            }),
        }
    }
}

#[derive(Debug)]
pub struct RuleGroup {
    pub name: &'static str,
    pub scope: RuleScope,
    pub reason: &'static str,
    /// Group only runs for this platform when set
    pub platform: Option<Platform>,
    matchers: Vec<Matcher>,
}

impl RuleGroup {
    fn first_match(&self, input: &str, domain: Option<&DomainInfo>) -> bool {
        self.matchers.iter().any(|m| m.is_match(input, domain))
    }
}

fn patterns(sources: &[&str]) -> Vec<Matcher> {
    sources
        .iter()
        .map(|src| {
            Matcher::Pattern(
                Regex::new(&format!("(?i){}", src)).expect("Invalid phishing rule pattern"),
            )
        })
        .collect()
}

lazy_static! {
    static ref RULE_GROUPS: Vec<RuleGroup> = vec![
        RuleGroup {
            name: "domain-structure",
            scope: RuleScope::Domain,
            reason: "Suspicious domain pattern detected",
            platform: None,
            matchers: patterns(&[
                r"^secure[0-9-]+",
                r"^login[0-9-]+",
                r"^verify[0-9-]+",
                r"^account[0-9-]+",
                r"^banking[0-9-]+",
                r"^confirm[0-9-]+",
                r"^update[0-9-]+",
                r"^security[0-9-]+",
                r"-?secure-?",
                r"-?verify-?",
                r"-?account-?",
                r"-?login-?",
                r"-?confirm-?",
                r"-?update-?",
                r"secure.*bank",
                r"bank.*secure",
                r"\d+.*bank",
                r"bank.*\d+",
                r"secure.*\d+",
                r"\d+.*secure",
                r"my.*account.*verify",
                r"verify.*my.*account",
                r"online.*banking",
                r"banking.*online",
            ]),
        },
        RuleGroup {
            name: "url-path",
            scope: RuleScope::Path,
            reason: "Suspicious URL path pattern detected",
            platform: None,
            matchers: patterns(&[
                r"/secure.*login",
                r"/account.*verify",
                r"/verify.*account",
                r"/confirm.*identity",
                r"/update.*account",
                r"/password.*reset",
                r"/billing.*update",
                r"/payment.*verify",
                r"/security.*alert",
                r"/login.*secure",
            ]),
        },
        RuleGroup {
            name: "tld-keyword",
            scope: RuleScope::Domain,
            reason: "Suspicious combination of TLD and security terms",
            platform: None,
            matchers: vec![Matcher::SuspiciousTldWithKeyword],
        },
        RuleGroup {
            name: "domain-anomaly",
            scope: RuleScope::Domain,
            reason: "Suspicious domain structure detected",
            platform: None,
            matchers: vec![Matcher::ExcessiveHyphensOrDigits],
        },
        RuleGroup {
            name: "url-obfuscation",
            scope: RuleScope::FullUrl,
            reason: "Obfuscated URL structure detected",
            platform: None,
            matchers: patterns(&[
                r"^[a-z][a-z0-9+.-]*://[^/?#]*@",
                r"^[a-z][a-z0-9+.-]*://\d{1,3}(?:\.\d{1,3}){3}(?:[:/?#]|$)",
                r"(?:%[0-9a-f]{2}){3,}",
            ]),
        },
        RuleGroup {
            name: "content-phishing",
            scope: RuleScope::Content,
            reason: "Suspicious content pattern detected",
            platform: None,
            matchers: patterns(&[
                r"urgent.*account.*suspend",
                r"verify.*account",
                r"security.*alert",
                r"unusual.*login",
                r"account.*restrict",
                r"suspicious.*activity",
                r"limited.*access",
                r"password.*expire",
                r"unusual.*device",
                r"confirm.*identity",
                r"account.*verify",
                r"verify.*identity",
                r"account.*security",
                r"security.*breach",
                r"update.*account.*info",
            ]),
        },
        RuleGroup {
            name: "content-whatsapp",
            scope: RuleScope::Content,
            reason: "Suspicious WhatsApp-specific pattern detected",
            platform: Some(Platform::WhatsApp),
            matchers: patterns(&[
                r"join.*group.*link",
                r"free.*gift",
                r"lottery.*win",
                r"click.*claim",
                r"verify.*whatsapp",
                r"whatsapp.*gold",
                r"whatsapp.*update",
                r"account.*expire",
                r"prize.*claim",
                r"investment.*opportunity",
            ]),
        },
    ];
}

// =============================================================================
// PATTERN ENGINE
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatch {
    pub reason: String,
    pub rule_scope: RuleScope,
    pub group: &'static str,
}

#[derive(Debug, Clone, Copy)]
pub struct PatternEngine {
    groups: &'static [RuleGroup],
}

impl PatternEngine {
    pub fn new() -> Self {
        Self {
            groups: RULE_GROUPS.as_slice(),
        }
    }

    pub fn groups(&self) -> impl Iterator<Item = &'static RuleGroup> {
        self.groups.iter()
    }

    /// Run every applicable rule group; each group reports at most once
    pub fn scan(
        &self,
        domain: Option<&str>,
        path: Option<&str>,
        full_url: Option<&str>,
        content: Option<&str>,
        platform: Platform,
    ) -> Vec<PatternMatch> {
        let domain_info = domain
            .map(DomainInfo::new)
            .filter(|d| !d.as_str().is_empty());
        let content = content.filter(|c| !c.trim().is_empty());

        let mut matches = Vec::new();

        for group in self.groups {
            if group.platform.is_some_and(|p| p != platform) {
                continue;
            }

            let input = match group.scope {
                RuleScope::Domain => domain_info.as_ref().map(|d| d.as_str()),
                RuleScope::Path => path,
                RuleScope::FullUrl => full_url,
                RuleScope::Content => content,
            };
            let Some(input) = input else {
                continue;
            };

            if group.first_match(input, domain_info.as_ref()) {
                matches.push(PatternMatch {
                    reason: group.reason.to_string(),
                    rule_scope: group.scope,
                    group: group.name,
                });
            }
        }

        matches
    }

    /// Domain, path and full-URL rules for one URL; unparseable URLs yield nothing
    pub fn scan_url(&self, url: &str) -> Vec<PatternMatch> {
        let Ok(parsed) = Url::parse(url.trim()) else {
            return Vec::new();
        };
        let Some(host) = parsed.host_str() else {
            return Vec::new();
        };

        self.scan(
            Some(host),
            Some(parsed.path()),
            Some(url.trim()),
            None,
            Platform::Generic,
        )
    }

    pub fn scan_content(&self, content: &str, platform: Platform) -> Vec<PatternMatch> {
        self.scan(None, None, None, Some(content), platform)
    }
}

impl Default for PatternEngine {
    fn default() -> Self {
        Self::new()
    }
}
