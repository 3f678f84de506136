pub mod check;
pub mod platform;
pub mod verdict;

// Re-export common types
pub use check::{
    ApprovalQuery, ApprovalRequest, ApprovalResponse, ContentCheckRequest, CredentialsStatus,
    CredentialsUpdateRequest, LinkCheckRequest, NavigationCheckRequest,
};
pub use platform::Platform;
pub use verdict::{Verdict, VerdictBuilder};
