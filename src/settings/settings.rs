use anyhow::{Result, anyhow};
use config::{Config, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Settings {
    pub auth: Auth,
    pub cache: Cache,
    pub content: Content,
    pub http: Http,
    pub log: Log,
    pub sweep: Sweep,
}

#[derive(Debug, Deserialize)]
pub struct Auth {
    pub backend: String, // "fake" or "real"
    pub admin_user: String,
    pub admin_pass: String,
    pub jwt_secret: String,
    pub issuer: String,
    pub audience: String,
    pub access_ttl_secs: u64,
    pub refresh_ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Cache {
    pub max_entries: usize,
    pub ttl_secs: u64,
}

#[derive(Debug, Deserialize)]
pub struct Content {
    pub default_page_size: u32,
    pub max_page_size: u32,
    pub seed_path: String,
}

#[derive(Debug, Deserialize)]
pub struct Http {
    pub address: String,
}

#[derive(Debug, Deserialize)]
pub struct Log {
    pub filter: String,
}

#[derive(Debug, Deserialize)]
pub struct Sweep {
    pub interval_secs: u64,
}

#[cfg(debug_assertions)]
const SETTINGS_PATH: &str = "settings/dev.toml";
#[cfg(not(debug_assertions))]
const SETTINGS_PATH: &str = "settings/release.toml";

/// Settings come from the profile-selected TOML file, overridable per key by
/// `CREWDECK__`-prefixed environment variables (`CREWDECK__AUTH__ADMIN_PASS`
/// and friends), which is how deployments inject secrets.
pub fn parse_settings(path: Option<&str>) -> Result<Settings> {
    let path = path.unwrap_or(SETTINGS_PATH);

    let settings: Settings = Config::builder()
        .add_source(File::with_name(path))
        .add_source(Environment::with_prefix("CREWDECK").separator("__"))
        .build()
        .map_err(|e| anyhow!(e))?
        .try_deserialize()
        .map_err(|e| anyhow!(e))?;

    Ok(settings)
}
