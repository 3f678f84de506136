use serde::{Deserialize, Serialize};

/// Host surface a piece of content was scraped from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    #[default]
    Generic,
    WhatsApp,
    Gmail,
    Facebook,
    Twitter,
    Instagram,
}

impl From<&str> for Platform {
    fn from(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "whatsapp" | "web.whatsapp.com" => Platform::WhatsApp,
            "gmail" | "mail.google.com" => Platform::Gmail,
            "facebook" | "www.facebook.com" => Platform::Facebook,
            "twitter" | "twitter.com" | "x.com" => Platform::Twitter,
            "instagram" | "www.instagram.com" => Platform::Instagram,
            _ => Platform::Generic,
        }
    }
}

impl From<String> for Platform {
    fn from(s: String) -> Self {
        Platform::from(s.as_str())
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Platform::Generic => write!(f, "generic"),
            Platform::WhatsApp => write!(f, "whatsapp"),
            Platform::Gmail => write!(f, "gmail"),
            Platform::Facebook => write!(f, "facebook"),
            Platform::Twitter => write!(f, "twitter"),
            Platform::Instagram => write!(f, "instagram"),
        }
    }
}
