use crate::config::ServerConfig;
use crate::error::ServerResult;
use pipegallery::{
    load_site_config, FsSource, HttpSaveClient, HttpSource, RenderOptions, ResourceSource,
    SaveClient, SiteConfig,
};
use std::sync::Arc;
use std::time::Instant;

/// Shared application state
///
/// The site configuration is read once when the state is built and never
/// reloaded.
#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Arc<ServerConfig>,

    /// Site configuration from `config.txt`
    pub site: Arc<SiteConfig>,

    /// Where page data is fetched from
    pub source: Arc<dyn ResourceSource>,

    /// Forwards save requests to the site's `api_url`
    pub saver: Arc<dyn SaveClient>,

    /// Card rendering options
    pub render: RenderOptions,

    /// When the state was assembled, used for uptime
    pub started_at: Instant,
}

impl ServerState {
    /// Assemble state from already-built parts
    pub fn new(
        config: ServerConfig,
        site: SiteConfig,
        source: Arc<dyn ResourceSource>,
        saver: Arc<dyn SaveClient>,
    ) -> Self {
        let render = config.render_options();
        Self {
            config: Arc::new(config),
            site: Arc::new(site),
            source,
            saver,
            render,
            started_at: Instant::now(),
        }
    }

    /// Build the resource source, load the site configuration and wire the save client
    ///
    /// Fails when the site configuration cannot be fetched; the server must
    /// not start without it.
    pub async fn load(config: ServerConfig) -> ServerResult<Self> {
        let source = resource_source(&config);
        let site = load_site_config(source.as_ref()).await?;
        let saver: Arc<dyn SaveClient> = Arc::new(HttpSaveClient::new(site.api_url.clone()));

        if !site.has_save_endpoint() {
            tracing::warn!("Site configuration has no api_url, saving is disabled");
        }

        Ok(Self::new(config, site, source, saver))
    }

    /// Whole seconds since the state was assembled
    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

fn resource_source(config: &ServerConfig) -> Arc<dyn ResourceSource> {
    match &config.site_url {
        Some(url) => {
            tracing::info!("Serving gallery data from {url}");
            Arc::new(HttpSource::new(url.clone()).cache_bust(config.cache_bust))
        }
        None => {
            let root = config.site_root_or_default();
            tracing::info!("Serving gallery data from {}", root.display());
            Arc::new(FsSource::new(root))
        }
    }
}

/// Server metadata for health checks
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ServerMetadata {
    pub version: String,
    pub uptime_seconds: u64,
    pub title: String,
    pub total_pages: u32,
}
