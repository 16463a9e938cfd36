use serde::{Deserialize, Serialize};

use super::{JobPosting, TeamMember};

/// Bounds on client-supplied pagination, from settings.
#[derive(Debug, Clone, Copy)]
pub struct PaginationLimits {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

/// Validated pagination parameters. Construction happens at the API boundary;
/// everything below it can assume the bounds already hold.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    /// Canonical cache key for this page of results.
    pub fn signature(&self) -> String {
        format!("{}-{}", self.page, self.limit)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
    pub total_team: usize,
    pub total_careers: usize,
    pub total_pages_team: usize,
    pub total_pages_careers: usize,
}

/// One paginated slice of the published content, as returned to clients and
/// as stored in the response cache.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentPage {
    pub team: Vec<TeamMember>,
    pub careers: Vec<JobPosting>,
    pub pagination: Pagination,
}
