use crate::application_port::ContentError;
use crate::domain_model::{ContentPage, JobPosting, PageRequest, Pagination, TeamMember};
use crate::domain_port::ContentRepo;
use std::sync::Mutex;

#[derive(Debug, Default)]
struct ContentData {
    team: Vec<TeamMember>,
    careers: Vec<JobPosting>,
}

/// Process-lifetime content store. Volatile on purpose: a restart starts
/// empty and the seed endpoint repopulates it.
#[derive(Debug, Default)]
pub struct MemoryContentRepo {
    data: Mutex<ContentData>,
}

impl MemoryContentRepo {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ContentData> {
        self.data.lock().unwrap_or_else(|e| e.into_inner())
    }
}

fn page_slice<T: Clone>(items: &[T], page: u32, limit: u32) -> Vec<T> {
    let skip = (page as usize - 1) * limit as usize;
    items.iter().skip(skip).take(limit as usize).cloned().collect()
}

fn total_pages(total: usize, limit: u32) -> usize {
    total.div_ceil(limit as usize)
}

#[async_trait::async_trait]
impl ContentRepo for MemoryContentRepo {
    async fn read_page(&self, request: PageRequest) -> Result<ContentPage, ContentError> {
        let PageRequest { page, limit } = request;
        let data = self.lock();
        Ok(ContentPage {
            team: page_slice(&data.team, page, limit),
            careers: page_slice(&data.careers, page, limit),
            pagination: Pagination {
                page,
                limit,
                total_team: data.team.len(),
                total_careers: data.careers.len(),
                total_pages_team: total_pages(data.team.len(), limit),
                total_pages_careers: total_pages(data.careers.len(), limit),
            },
        })
    }

    async fn replace_team(&self, team: Vec<TeamMember>) -> Result<(), ContentError> {
        self.lock().team = team;
        Ok(())
    }

    async fn replace_careers(&self, careers: Vec<JobPosting>) -> Result<(), ContentError> {
        self.lock().careers = careers;
        Ok(())
    }

    async fn append_team(&self, mut team: Vec<TeamMember>) -> Result<(), ContentError> {
        self.lock().team.append(&mut team);
        Ok(())
    }

    async fn append_careers(&self, mut careers: Vec<JobPosting>) -> Result<(), ContentError> {
        self.lock().careers.append(&mut careers);
        Ok(())
    }

    async fn counts(&self) -> Result<(usize, usize), ContentError> {
        let data = self.lock();
        Ok((data.team.len(), data.careers.len()))
    }
}
