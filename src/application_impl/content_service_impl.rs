use crate::application_port::{
    ContentCounts, ContentError, ContentService, ContentUpdate, SeedOutcome,
};
use crate::domain_model::{ContentPage, PageRequest};
use crate::domain_port::ContentRepo;
use crate::infra_memory::ResponseCache;
use std::sync::Arc;
use tracing::{debug, info};

pub struct RealContentService {
    repo: Arc<dyn ContentRepo>,
    cache: Arc<ResponseCache>,
}

impl RealContentService {
    pub fn new(repo: Arc<dyn ContentRepo>, cache: Arc<ResponseCache>) -> Self {
        Self { repo, cache }
    }
}

#[async_trait::async_trait]
impl ContentService for RealContentService {
    async fn get_content(&self, request: PageRequest) -> Result<ContentPage, ContentError> {
        if let Some(page) = self.cache.get(request) {
            debug!(signature = %request.signature(), "serving from cache");
            return Ok(page);
        }

        let page = self.repo.read_page(request).await?;
        self.cache.put(request, page.clone());
        info!(
            page = request.page,
            limit = request.limit,
            team = page.team.len(),
            careers = page.careers.len(),
            "content fetched"
        );
        Ok(page)
    }

    async fn update_content(&self, update: ContentUpdate) -> Result<(), ContentError> {
        let ContentUpdate { team, careers } = update;
        if team.is_none() && careers.is_none() {
            return Err(ContentError::Validation(
                "either team or careers data must be provided".to_string(),
            ));
        }

        let (team_count, careers_count) = (
            team.as_ref().map(Vec::len),
            careers.as_ref().map(Vec::len),
        );
        if let Some(team) = team {
            self.repo.replace_team(team).await?;
        }
        if let Some(careers) = careers {
            self.repo.replace_careers(careers).await?;
        }

        // Sequenced strictly before the caller sees success, so the next
        // read misses and refetches.
        self.cache.invalidate_all();

        info!(?team_count, ?careers_count, "content updated");
        Ok(())
    }

    async fn seed(&self, seed: ContentUpdate) -> Result<SeedOutcome, ContentError> {
        let (team_count, careers_count) = self.repo.counts().await?;
        if team_count > 0 || careers_count > 0 {
            return Ok(SeedOutcome::AlreadyPopulated);
        }

        if let Some(team) = seed.team {
            self.repo.append_team(team).await?;
        }
        if let Some(careers) = seed.careers {
            self.repo.append_careers(careers).await?;
        }
        self.cache.invalidate_all();

        info!("content store seeded");
        Ok(SeedOutcome::Seeded)
    }

    async fn counts(&self) -> Result<ContentCounts, ContentError> {
        let (team, careers) = self.repo.counts().await?;
        Ok(ContentCounts { team, careers })
    }
}
