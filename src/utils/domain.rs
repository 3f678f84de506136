// Hostname helpers shared by the trust, similarity and pattern analyzers

use url::Url;

/// Lowercase hostname plus the derived attributes the analyzers key on
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainInfo {
    host: String,
}

impl DomainInfo {
    pub fn new(host: &str) -> Self {
        let host = host.trim().trim_end_matches('.').to_lowercase();
        Self { host }
    }

    /// Parse a URL and return its host, or `None` when the URL is unusable
    pub fn from_url(url: &str) -> Option<Self> {
        let parsed = Url::parse(url.trim()).ok()?;
        let host = parsed.host_str()?;
        if host.is_empty() {
            return None;
        }
        Some(Self::new(host))
    }

    pub fn as_str(&self) -> &str {
        &self.host
    }

    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.host.split('.').filter(|l| !l.is_empty())
    }

    pub fn label_count(&self) -> usize {
        self.labels().count()
    }

    /// Last two labels, e.g. `mail.example.com` -> `example.com`
    pub fn registered_root(&self) -> String {
        let labels: Vec<&str> = self.labels().collect();
        if labels.len() <= 2 {
            return labels.join(".");
        }
        labels[labels.len() - 2..].join(".")
    }

    pub fn tld(&self) -> &str {
        self.host.rsplit('.').next().unwrap_or("")
    }

    /// First label, ignoring a leading `www`
    pub fn first_label(&self) -> &str {
        let mut labels = self.labels();
        match labels.next() {
            Some("www") => labels.next().unwrap_or("www"),
            Some(first) => first,
            None => "",
        }
    }

    pub fn hyphen_count(&self) -> usize {
        self.host.matches('-').count()
    }

    pub fn digit_count(&self) -> usize {
        self.host.chars().filter(|c| c.is_ascii_digit()).count()
    }
}

impl std::fmt::Display for DomainInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.host)
    }
}

/// First label of a root such as `paypal.com` -> `paypal`
pub fn root_label(root: &str) -> &str {
    root.split('.').next().unwrap_or(root)
}
