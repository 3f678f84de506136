// Trust registry: static allow-list of root domains exempt from heuristic scrutiny

use once_cell::sync::Lazy;

use crate::utils::domain::DomainInfo;

// =============================================================================
// DEFAULT TRUST SET
// =============================================================================

const DEFAULT_TRUSTED_ROOTS: &[&str] = &[
    // Search engines
    "google.com",
    "bing.com",
    "yahoo.com",
    "duckduckgo.com",
    "baidu.com",
    // Social media
    "facebook.com",
    "twitter.com",
    "instagram.com",
    "linkedin.com",
    "pinterest.com",
    "reddit.com",
    "youtube.com",
    // Communication
    "whatsapp.com",
    "web.whatsapp.com",
    "telegram.org",
    "zoom.us",
    "teams.microsoft.com",
    "discord.com",
    "slack.com",
    // Email
    "gmail.com",
    "outlook.com",
    "live.com",
    "protonmail.com",
    // Cloud & development
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "dropbox.com",
    "drive.google.com",
    "onedrive.live.com",
    "box.com",
    // Shopping
    "amazon.com",
    "ebay.com",
    "walmart.com",
    "target.com",
    "bestbuy.com",
    // Payment
    "paypal.com",
    "stripe.com",
    "square.com",
    // Banking
    "chase.com",
    "wellsfargo.com",
    "bankofamerica.com",
    "citibank.com",
    "capitalone.com",
    // Microsoft
    "microsoft.com",
    "office.com",
    "windows.com",
    // Apple
    "apple.com",
    "icloud.com",
    "me.com",
    // Google
    "googleapis.com",
    "gstatic.com",
    "chrome.google.com",
    // Other common services
    "netflix.com",
    "spotify.com",
    "adobe.com",
    "cloudflare.com",
    "amazonaws.com",
];

static DEFAULT_REGISTRY: Lazy<TrustRegistry> =
    Lazy::new(|| TrustRegistry::new(DEFAULT_TRUSTED_ROOTS.iter().copied()));

// =============================================================================
// TRUST REGISTRY
// =============================================================================

/// Ordered set of trusted roots. `example.com` trusts `sub.example.com`, never the inverse.
#[derive(Debug, Clone)]
pub struct TrustRegistry {
    roots: Vec<String>,
}

impl TrustRegistry {
    pub fn new<I, S>(roots: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut ordered: Vec<String> = Vec::new();
        for root in roots {
            let root = root.as_ref().trim().trim_end_matches('.').to_lowercase();
            if !root.is_empty() && !ordered.contains(&root) {
                ordered.push(root);
            }
        }
        Self { roots: ordered }
    }

    /// Shared registry built from the built-in list
    pub fn roots(&self) -> &[String] {
        &self.roots
    }

    pub fn is_trusted(&self, domain: &str) -> bool {
        let info = DomainInfo::new(domain);
        self.is_trusted_info(&info)
    }

    pub fn is_trusted_info(&self, domain: &DomainInfo) -> bool {
        let host = domain.as_str();
        if host.is_empty() {
            return false;
        }
        let registered_root = domain.registered_root();

        self.roots.iter().any(|root| {
            host == root
                || (host.len() > root.len()
                    && host.ends_with(root.as_str())
                    && host.as_bytes()[host.len() - root.len() - 1] == b'.')
                || registered_root == *root
        })
    }
}

impl Default for TrustRegistry {
    fn default() -> Self {
        DEFAULT_REGISTRY.clone()
    }
}
