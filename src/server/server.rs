use crate::application_impl::*;
use crate::application_port::*;
use crate::domain_model::PaginationLimits;
use crate::domain_port::{SessionRecord, SessionStore};
use crate::infra_memory::*;
use crate::logger::*;
use crate::settings::Settings;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

pub struct Server {
    pub auth_service: Arc<dyn AuthService>,
    pub content_service: Arc<dyn ContentService>,
    pagination_limits: PaginationLimits,
    seed_data: ContentUpdate,
    started_at: std::time::Instant,
    sweeper_handles: Mutex<Vec<JoinHandle<()>>>,
    cancel: CancellationToken,
}

impl Server {
    pub fn try_new(settings: &Settings) -> anyhow::Result<Self> {
        let cancel = CancellationToken::new();
        let sweep_interval = Duration::from_secs(settings.sweep.interval_secs);
        let mut sweeper_handles = Vec::new();

        // Refresh-token registry: its own expiring store, swept in the
        // background, never shared with the cache.
        let session_entries = Arc::new(ExpiringStore::<SessionRecord>::new());
        sweeper_handles.push(spawn_sweeper(
            session_entries.clone(),
            sweep_interval,
            cancel.clone(),
        ));
        let session_store: Arc<dyn SessionStore> =
            Arc::new(MemorySessionStore::new(session_entries));

        let credentials: Arc<dyn CredentialStore> = Arc::new(AdminCredentialStore::new(
            &settings.auth.admin_user,
            &settings.auth.admin_pass,
        ));
        let token_codec: Arc<dyn TokenCodec> = Arc::new(JwtHs256Codec::new(JwtConfig {
            issuer: settings.auth.issuer.clone(),
            audience: settings.auth.audience.clone(),
            access_ttl: Duration::from_secs(settings.auth.access_ttl_secs),
            refresh_ttl: Duration::from_secs(settings.auth.refresh_ttl_secs),
            signing_key: settings.auth.jwt_secret.clone().into_bytes(),
        }));

        let auth_service: Arc<dyn AuthService> = match settings.auth.backend.as_str() {
            "fake" => Arc::new(FakeAuthService::new()),
            "real" => Arc::new(RealAuthService::new(credentials, token_codec, session_store)),
            other => return Err(anyhow::anyhow!("Unknown auth backend: {}", other)),
        };

        // Response cache: the second expiring-store instance, bounded and
        // swept on the same period.
        let cache = Arc::new(ResponseCache::new(
            settings.cache.max_entries,
            Duration::from_secs(settings.cache.ttl_secs),
        ));
        sweeper_handles.push(spawn_sweeper(cache.store(), sweep_interval, cancel.clone()));

        let content_repo: Arc<dyn crate::domain_port::ContentRepo> =
            Arc::new(MemoryContentRepo::new());
        let content_service: Arc<dyn ContentService> =
            Arc::new(RealContentService::new(content_repo, cache));

        let seed_data = load_seed(&settings.content.seed_path);

        info!("server started");

        Ok(Self {
            auth_service,
            content_service,
            pagination_limits: PaginationLimits {
                default_page_size: settings.content.default_page_size,
                max_page_size: settings.content.max_page_size,
            },
            seed_data,
            started_at: std::time::Instant::now(),
            sweeper_handles: Mutex::new(sweeper_handles),
            cancel,
        })
    }

    pub fn pagination_limits(&self) -> PaginationLimits {
        self.pagination_limits
    }

    pub fn seed_data(&self) -> ContentUpdate {
        self.seed_data.clone()
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }

    pub async fn shutdown(&self) {
        info!("server shutting down...");

        self.cancel.cancel();

        let handles: Vec<_> = match self.sweeper_handles.lock() {
            Ok(mut lock) => lock.drain(..).collect(),
            Err(_) => Vec::new(),
        };
        for handle in handles {
            let r = handle.await;
            debug!("sweeper handle dropped: {:?}", r);
        }
    }
}

fn load_seed(path: &str) -> ContentUpdate {
    #[derive(serde::Deserialize)]
    struct SeedFile {
        #[serde(default)]
        team: Option<Vec<crate::domain_model::TeamMember>>,
        #[serde(default)]
        careers: Option<Vec<crate::domain_model::JobPosting>>,
    }

    match std::fs::read_to_string(path) {
        Ok(raw) => match serde_json::from_str::<SeedFile>(&raw) {
            Ok(seed) => ContentUpdate {
                team: seed.team,
                careers: seed.careers,
            },
            Err(e) => {
                warn!(path, "seed file is not valid JSON: {e}");
                ContentUpdate::default()
            }
        },
        Err(e) => {
            warn!(path, "seed file not readable: {e}");
            ContentUpdate::default()
        }
    }
}
