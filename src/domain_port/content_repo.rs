use crate::application_port::ContentError;
use crate::domain_model::{ContentPage, JobPosting, PageRequest, TeamMember};

/// Storage of the published content. The in-memory implementation lives in
/// `infra_memory`; a persistent backend would slot in behind the same trait.
#[async_trait::async_trait]
pub trait ContentRepo: Send + Sync {
    /// Read one page of team members and job postings, with totals.
    async fn read_page(&self, request: PageRequest) -> Result<ContentPage, ContentError>;

    async fn replace_team(&self, team: Vec<TeamMember>) -> Result<(), ContentError>;
    async fn replace_careers(&self, careers: Vec<JobPosting>) -> Result<(), ContentError>;

    async fn append_team(&self, team: Vec<TeamMember>) -> Result<(), ContentError>;
    async fn append_careers(&self, careers: Vec<JobPosting>) -> Result<(), ContentError>;

    /// (team, careers) record counts.
    async fn counts(&self) -> Result<(usize, usize), ContentError>;
}
