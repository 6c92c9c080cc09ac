//! Paginated photo gallery built from pipe-delimited records.
//!
//! The pipeline runs once per page view:
//!
//! 1. [`load_site_config`] reads `config.txt` into a [`SiteConfig`] at startup.
//! 2. [`load_page`] fetches `data/page_<N>.csv`, parses it with
//!    [`parse_records`], keeps displayable records and builds a [`GalleryView`].
//! 3. [`render_document`] turns the view (or the page-level error) into HTML.
//!
//! Row-level problems never fail a page; a missing `data` column or a failed
//! fetch always does.

pub mod config;
pub mod error;
pub mod pagination;
pub mod parser;
pub mod record;
pub mod render;
pub mod save;
pub mod source;

pub use config::SiteConfig;
pub use error::{GalleryError, JumpError, ParseError, RecordError, SaveError, SourceError};
pub use pagination::{JumpBox, NavigationTarget, PageWindow, PaginationLayout};
pub use parser::{Records, TableFormat, parse_records};
pub use record::PhotoRecord;
pub use render::{
    CardView, ExclusionSet, GalleryView, HandlerTable, RenderOptions, Trigger, escape_html,
    render_document,
};
pub use save::{SaveClient, SaveEnvelope, SaveState, SaveTrigger, submit};
pub use source::{CONFIG_PATH, MemorySource, ResourceSource, page_path};

#[cfg(feature = "fs")]
pub use source::FsSource;
#[cfg(feature = "http")]
pub use {save::HttpSaveClient, source::HttpSource};

/// Fetch and parse the site configuration.
///
/// A failure here is fatal for the session: no page should be rendered.
pub async fn load_site_config(source: &dyn ResourceSource) -> Result<SiteConfig, GalleryError> {
    let text = source.fetch_text(CONFIG_PATH).await.map_err(|err| {
        tracing::error!(error = %err, "failed to load site configuration");
        err
    })?;
    let config = SiteConfig::parse(&text);
    tracing::info!(
        title = %config.title,
        total_pages = config.total_pages,
        save_endpoint = config.has_save_endpoint(),
        "site configuration loaded"
    );
    Ok(config)
}

/// Parse already-fetched page text into a view.
pub fn build_page(
    text: &str,
    site: &SiteConfig,
    page: u32,
    options: &RenderOptions,
) -> Result<GalleryView, GalleryError> {
    let records = parse_records(text, &TableFormat::default())?;
    Ok(GalleryView::build(page, records, site.total_pages, options))
}

/// Fetch, parse and project one gallery page.
pub async fn load_page(
    source: &dyn ResourceSource,
    site: &SiteConfig,
    page: u32,
    options: &RenderOptions,
) -> Result<GalleryView, GalleryError> {
    let text = source.fetch_text(&page_path(page)).await?;
    let view = build_page(&text, site, page, options)?;
    tracing::debug!(page, cards = view.cards.len(), "page built");
    Ok(view)
}

/// Page number from the navigation query parameter; anything unusable is page 1.
pub fn page_from_query(raw: Option<&str>) -> u32 {
    raw.and_then(|value| value.trim().parse::<u32>().ok())
        .filter(|page| *page > 0)
        .unwrap_or(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_query_defaults_to_one() {
        assert_eq!(page_from_query(None), 1);
        assert_eq!(page_from_query(Some("")), 1);
        assert_eq!(page_from_query(Some("abc")), 1);
        assert_eq!(page_from_query(Some("0")), 1);
        assert_eq!(page_from_query(Some("-2")), 1);
        assert_eq!(page_from_query(Some("7")), 7);
    }

    #[tokio::test]
    async fn missing_config_is_fatal() {
        let source = MemorySource::new();
        assert!(matches!(
            load_site_config(&source).await,
            Err(GalleryError::Source(SourceError::Http { status: 404, .. }))
        ));
    }

    #[tokio::test]
    async fn load_page_reads_the_numbered_resource() {
        let source = MemorySource::new().with(
            page_path(3),
            "id|data\n1|\"{\"\"url_max\"\":\"\"a.jpg\"\"}\"\n",
        );
        let site = SiteConfig {
            total_pages: 5,
            ..SiteConfig::default()
        };
        let view = load_page(&source, &site, 3, &RenderOptions::default())
            .await
            .unwrap();
        assert_eq!(view.page, 3);
        assert_eq!(view.cards.len(), 1);
        assert_eq!(view.pagination.total, 5);

        assert!(load_page(&source, &site, 4, &RenderOptions::default())
            .await
            .is_err());
    }
}
