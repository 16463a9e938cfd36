use anyhow::{Result, anyhow};
use tracing_subscriber::{
    EnvFilter, Registry, fmt, layer::SubscriberExt, reload, util::SubscriberInitExt,
};

/// Two-phase logger: install at a fixed bootstrap level before settings are
/// parsed so startup problems are visible, then re-apply the configured
/// filter once it is known.
pub struct Logger {
    reload_handle: reload::Handle<EnvFilter, Registry>,
}

const BOOTSTRAP_FILTER: &str = "info";

impl Logger {
    pub fn new_bootstrap() -> Self {
        let (filter, reload_handle) = reload::Layer::new(EnvFilter::new(BOOTSTRAP_FILTER));

        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer())
            .init();

        Self { reload_handle }
    }

    /// Swap the active filter for the one from settings. Fails on a filter
    /// string `EnvFilter` cannot parse, leaving the bootstrap filter in place.
    pub fn apply_filter(&self, directive: &str) -> Result<()> {
        let filter = EnvFilter::try_new(directive).map_err(|e| anyhow!(e))?;
        self.reload_handle.reload(filter).map_err(|e| anyhow!(e))?;
        Ok(())
    }
}
