use serde::{Deserialize, Serialize};
use validator::Validate;

use super::platform::Platform;

pub const MAX_URL_LEN: u64 = 8192;

/// Navigation check for one URL
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct NavigationCheckRequest {
    #[validate(length(min = 1, max = 8192, message = "URL must be 1-8192 characters"))]
    pub url: String,
}

/// Scraped page or message body plus the links found in it
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ContentCheckRequest {
    #[validate(length(max = 65536, message = "Content must be less than 65536 characters"))]
    pub content: String,

    #[serde(default)]
    #[validate(length(max = 200, message = "Maximum 200 links per request"))]
    pub links: Vec<String>,

    #[validate(length(max = 64, message = "Platform must be less than 64 characters"))]
    pub platform: Option<String>,
}

impl ContentCheckRequest {
    pub fn validate_custom(&self) -> Result<(), String> {
        if self.links.iter().any(|l| l.len() as u64 > MAX_URL_LEN) {
            return Err("Each link must be less than 8192 characters".to_string());
        }
        Ok(())
    }

    /// Trim links and drop empty ones
    pub fn sanitize(&mut self) {
        self.links = self
            .links
            .iter()
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty())
            .collect();
    }

    pub fn platform(&self) -> Platform {
        self.platform
            .as_deref()
            .map(Platform::from)
            .unwrap_or_default()
    }
}

/// Single link with the text surrounding it
#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct LinkCheckRequest {
    #[validate(length(min = 1, max = 8192, message = "URL must be 1-8192 characters"))]
    pub url: String,

    #[validate(length(max = 65536, message = "Context must be less than 65536 characters"))]
    pub context: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Validate)]
pub struct ApprovalRequest {
    #[validate(length(min = 1, max = 8192, message = "URL must be 1-8192 characters"))]
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApprovalQuery {
    pub url: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApprovalResponse {
    pub url: String,
    pub approved: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in_secs: Option<u64>,
}

/// Absent fields leave the stored credential untouched; an empty string clears it
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CredentialsUpdateRequest {
    #[validate(length(max = 512, message = "API key must be less than 512 characters"))]
    pub safe_browsing_api_key: Option<String>,

    #[validate(length(max = 512, message = "Token must be less than 512 characters"))]
    pub classifier_token: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CredentialsStatus {
    pub safe_browsing_configured: bool,
    pub classifier_configured: bool,
}
