//! Where configuration and page data come from.
//!
//! [`ResourceSource`] abstracts over fetching a text resource by relative
//! path. [`HttpSource`] reads from a remote static site, [`FsSource`] from a
//! local directory and [`MemorySource`] from an in-memory table.
use std::collections::BTreeMap;

use async_trait::async_trait;

use crate::error::SourceError;

/// Relative path of the site configuration.
pub const CONFIG_PATH: &str = "config.txt";

/// Query parameter appended to defeat intermediate caches.
pub const CACHE_BUST_PARAM: &str = "_";

/// Relative path of the tabular data for one page.
pub fn page_path(page: u32) -> String {
    format!("data/page_{page}.csv")
}

/// Fetches text resources by relative path.
#[async_trait]
pub trait ResourceSource: Send + Sync {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError>;
}

/// Fixed set of resources held in memory.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    resources: BTreeMap<String, String>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: impl Into<String>, text: impl Into<String>) -> Self {
        self.resources.insert(path.into(), text.into());
        self
    }
}

#[async_trait]
impl ResourceSource for MemorySource {
    async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
        self.resources
            .get(path)
            .cloned()
            .ok_or_else(|| SourceError::Http {
                status: 404,
                reason: "Not Found".to_string(),
            })
    }
}

#[cfg(feature = "fs")]
pub use fs::FsSource;

#[cfg(feature = "fs")]
mod fs {
    use std::path::{Path, PathBuf};

    use async_trait::async_trait;

    use super::ResourceSource;
    use crate::error::SourceError;

    /// Resources under a local directory.
    #[derive(Debug, Clone)]
    pub struct FsSource {
        root: PathBuf,
    }

    impl FsSource {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self { root: root.into() }
        }

        pub fn root(&self) -> &Path {
            &self.root
        }
    }

    #[async_trait]
    impl ResourceSource for FsSource {
        async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
            let full = self.root.join(path);
            tracing::debug!(path = %full.display(), "reading resource");
            tokio::fs::read_to_string(&full)
                .await
                .map_err(|err| SourceError::Io {
                    path: path.to_string(),
                    message: err.to_string(),
                })
        }
    }
}

#[cfg(feature = "http")]
pub use http::HttpSource;

#[cfg(feature = "http")]
mod http {
    use async_trait::async_trait;

    use super::{CACHE_BUST_PARAM, ResourceSource};
    use crate::error::SourceError;

    /// Resources under a remote base URL.
    #[derive(Debug, Clone)]
    pub struct HttpSource {
        client: reqwest::Client,
        base_url: String,
        cache_bust: bool,
    }

    impl HttpSource {
        pub fn new(base_url: impl Into<String>) -> Self {
            Self::with_client(reqwest::Client::new(), base_url)
        }

        pub fn with_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
            Self {
                client,
                base_url: base_url.into(),
                cache_bust: true,
            }
        }

        pub fn cache_bust(mut self, enabled: bool) -> Self {
            self.cache_bust = enabled;
            self
        }

        /// Absolute URL for a relative resource path.
        pub fn url_for(&self, path: &str) -> String {
            let base = self.base_url.trim_end_matches('/');
            let path = path.trim_start_matches('/');
            if self.cache_bust {
                let stamp = chrono::Utc::now().timestamp_millis();
                format!("{base}/{path}?{CACHE_BUST_PARAM}={stamp}")
            } else {
                format!("{base}/{path}")
            }
        }
    }

    #[async_trait]
    impl ResourceSource for HttpSource {
        async fn fetch_text(&self, path: &str) -> Result<String, SourceError> {
            let url = self.url_for(path);
            tracing::debug!(%url, "fetching resource");

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|err| SourceError::Transport(err.to_string()))?;

            let status = response.status();
            if !status.is_success() {
                return Err(SourceError::Http {
                    status: status.as_u16(),
                    reason: status.canonical_reason().unwrap_or_default().to_string(),
                });
            }

            response
                .text()
                .await
                .map_err(|err| SourceError::Transport(err.to_string()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_paths() {
        assert_eq!(page_path(1), "data/page_1.csv");
        assert_eq!(page_path(12), "data/page_12.csv");
    }

    #[tokio::test]
    async fn memory_source_misses_look_like_404() {
        let source = MemorySource::new().with(CONFIG_PATH, "title=x");
        assert_eq!(source.fetch_text(CONFIG_PATH).await.unwrap(), "title=x");
        assert!(matches!(
            source.fetch_text("data/page_1.csv").await,
            Err(SourceError::Http { status: 404, .. })
        ));
    }

    #[cfg(feature = "http")]
    #[test]
    fn http_urls_are_joined_and_cache_busted() {
        let source = HttpSource::new("https://photos.example.com/site/");
        let url = source.url_for("data/page_2.csv");
        assert!(url.starts_with("https://photos.example.com/site/data/page_2.csv?_="));

        let plain = source.cache_bust(false);
        assert_eq!(plain.url_for("/config.txt"), "https://photos.example.com/site/config.txt");
    }

    #[cfg(feature = "fs")]
    #[tokio::test]
    async fn fs_source_reads_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(dir.path().join("data/page_1.csv"), "id|data\n").unwrap();

        let source = FsSource::new(dir.path());
        assert_eq!(source.fetch_text(&page_path(1)).await.unwrap(), "id|data\n");
        assert!(matches!(
            source.fetch_text(&page_path(2)).await,
            Err(SourceError::Io { .. })
        ));
    }
}
