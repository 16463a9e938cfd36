use crate::domain_model::{ContentPage, JobPosting, PageRequest, TeamMember};
use serde::Serialize;

#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("store error: {0}")]
    Store(String),
    #[error("internal error: {0}")]
    InternalError(String),
}

/// A content write. Either collection may be omitted to leave it untouched;
/// omitting both is a validation error.
#[derive(Debug, Clone, Default)]
pub struct ContentUpdate {
    pub team: Option<Vec<TeamMember>>,
    pub careers: Option<Vec<JobPosting>>,
}

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SeedOutcome {
    Seeded,
    AlreadyPopulated,
}

#[derive(Debug, Clone, Copy, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentCounts {
    pub team: usize,
    pub careers: usize,
}

#[async_trait::async_trait]
pub trait ContentService: Send + Sync {
    /// Cache-aside read of one content page.
    async fn get_content(&self, request: PageRequest) -> Result<ContentPage, ContentError>;
    /// Replace the provided collections, then drop every cached page before
    /// reporting success.
    async fn update_content(&self, update: ContentUpdate) -> Result<(), ContentError>;
    /// Populate initial data, but only into an empty store.
    async fn seed(&self, seed: ContentUpdate) -> Result<SeedOutcome, ContentError>;
    async fn counts(&self) -> Result<ContentCounts, ContentError>;
}
