//! Gallery page rendering and page navigation.

use crate::error::{ServerError, ServerResult};
use crate::state::ServerState;
use axum::extract::{Path, Query, State};
use axum::response::{Html, IntoResponse, Redirect};
use axum::Json;
use pipegallery::{load_page, page_from_query, render_document, GalleryView, JumpBox};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Navigation query, `?page=N`
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    #[serde(default)]
    pub page: Option<String>,
}

/// Render one gallery page as a full HTML document.
///
/// Fetch and parse failures do not produce an error status: the page shell is
/// still returned with the escaped message in place of the gallery.
pub async fn gallery_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PageQuery>,
) -> Html<String> {
    let page = page_from_query(query.page.as_deref());
    let outcome = load_page(state.source.as_ref(), &state.site, page, &state.render).await;

    if let Err(err) = &outcome {
        tracing::error!(page, error = %err, "Failed to load gallery page");
    }

    Html(render_document(&state.site, &outcome, &state.render))
}

/// Jump box target when scripting is unavailable.
///
/// Valid input redirects to the requested page; anything else is rejected
/// without navigating.
pub async fn jump_to_page(
    State(state): State<Arc<ServerState>>,
    Query(query): Query<PageQuery>,
) -> ServerResult<impl IntoResponse> {
    let input = query.page.unwrap_or_default();
    let target = JumpBox::new(state.site.total_pages).resolve(&input)?;
    Ok(Redirect::to(target.as_str()))
}

/// Render tree of one page
#[derive(Debug, Serialize)]
pub struct PageResponse {
    pub title: String,
    pub view: GalleryView,
    /// Action kind → binding hook name
    pub handlers: BTreeMap<String, String>,
}

/// JSON form of a gallery page for clients that bind their own widgets.
pub async fn page_view(
    State(state): State<Arc<ServerState>>,
    Path(page): Path<String>,
) -> ServerResult<impl IntoResponse> {
    let page = page
        .parse::<u32>()
        .ok()
        .filter(|p| *p > 0)
        .ok_or_else(|| ServerError::BadRequest(format!("Invalid page '{page}'")))?;

    let view = load_page(state.source.as_ref(), &state.site, page, &state.render).await?;
    let handlers = pipegallery::HandlerTable::default()
        .iter()
        .map(|(kind, hook)| (kind.as_str().to_string(), hook.to_string()))
        .collect();

    Ok(Json(PageResponse {
        title: state.site.title.clone(),
        view,
        handlers,
    }))
}
