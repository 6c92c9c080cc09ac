//! Projects photo records into a render tree and HTML.
//!
//! The tree ([`GalleryView`], [`CardView`], [`PaginationLayout`]) carries raw
//! values and the interactions each node supports. Escaping happens when the
//! tree is turned into markup: every dynamic string goes through
//! [`escape_html`] on the way out.
//!
//! Interactions are bound by a small script embedded in the document. Nodes
//! declare what they do through `data-action` attributes, whose values come
//! from [`HandlerTable`].
use std::collections::BTreeSet;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::config::SiteConfig;
use crate::error::GalleryError;
use crate::pagination::{ControlKind, JUMP_WARNING, PaginationLayout};
use crate::record::PhotoRecord;
use crate::save::{SaveEnvelope, SaveState};

/// Attributes left out of the detail block: identifiers, raw sizes and URLs,
/// and fields already shown in the summary or modal.
pub const DEFAULT_DETAIL_EXCLUSIONS: &[&str] = &[
    "url_sq",
    "url_t",
    "url_s",
    "url_m",
    "url_l",
    "url_max",
    "url_max_2000",
    "pathalias",
    "id",
    "owner",
    "secret",
    "server",
    "farm",
    "height_s",
    "width_s",
    "height_m",
    "width_m",
    "max_width_2000",
    "max_height_2000",
    "height_l",
    "width_l",
    "height_sq",
    "width_sq",
    "max_width",
    "max_height",
    "datetaken",
    "flickr_page",
    "pageid",
];

const NO_TITLE: &str = "(No title)";
const UNKNOWN_CAMERA: &str = "Unknown camera";
const UNKNOWN_LENS: &str = "Unknown";
const NO_DETAIL: &str = "(No detail data)";
const NO_ORIGINAL: &str = "No original image to open!";
const LOAD_FAILED: &str = "Failed to load data";

/// Escape `& < > " '` for use in element content and quoted attributes.
pub fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// `exposure_time` → `Exposure Time`
pub fn attribute_label(key: &str) -> String {
    let mut label = String::with_capacity(key.len());
    let mut in_word = false;
    for c in key.chars() {
        let c = if c == '_' { ' ' } else { c };
        let is_word = c.is_alphanumeric();
        if is_word && !in_word {
            label.extend(c.to_uppercase());
        } else {
            label.push(c);
        }
        in_word = is_word;
    }
    label
}

/// Gesture that reveals a card's detail block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Trigger {
    Hover,
    #[default]
    Click,
    ModifierClick,
}

impl Trigger {
    pub fn as_str(&self) -> &'static str {
        match self {
            Trigger::Hover => "hover",
            Trigger::Click => "click",
            Trigger::ModifierClick => "modifier-click",
        }
    }
}

impl FromStr for Trigger {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "hover" => Ok(Trigger::Hover),
            "click" => Ok(Trigger::Click),
            "modifier-click" | "modifier_click" => Ok(Trigger::ModifierClick),
            other => Err(format!("unknown detail trigger '{other}'")),
        }
    }
}

/// Attribute names hidden from the detail block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExclusionSet {
    keys: BTreeSet<String>,
}

impl Default for ExclusionSet {
    fn default() -> Self {
        Self::from_keys(DEFAULT_DETAIL_EXCLUSIONS.iter().copied())
    }
}

impl ExclusionSet {
    pub fn from_keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, key: &str) -> bool {
        self.keys.contains(key)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    pub detail_trigger: Trigger,
    pub exclusions: ExclusionSet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    ToggleDetail,
    OpenModal,
    OpenImage,
    Save,
    Navigate,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::ToggleDetail => "toggle_detail",
            ActionKind::OpenModal => "open_modal",
            ActionKind::OpenImage => "open_image",
            ActionKind::Save => "save",
            ActionKind::Navigate => "navigate",
        }
    }
}

/// Part of a card an interaction is attached to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Target {
    Card,
    Image,
    OpenButton,
    SaveButton,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Interaction {
    pub target: Target,
    pub trigger: Trigger,
    pub action: ActionKind,
}

/// Binding hooks the embedded script dispatches on, one per action kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerTable {
    entries: Vec<(ActionKind, &'static str)>,
}

impl Default for HandlerTable {
    fn default() -> Self {
        Self {
            entries: vec![
                (ActionKind::ToggleDetail, "toggle-detail"),
                (ActionKind::OpenModal, "open-modal"),
                (ActionKind::OpenImage, "open-image"),
                (ActionKind::Save, "save"),
                (ActionKind::Navigate, "navigate"),
            ],
        }
    }
}

impl HandlerTable {
    pub fn hook(&self, kind: ActionKind) -> &'static str {
        self.entries
            .iter()
            .find(|(k, _)| *k == kind)
            .map(|(_, hook)| *hook)
            .unwrap_or("noop")
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActionKind, &'static str)> + '_ {
        self.entries.iter().copied()
    }
}

/// Whether a card's detail block is shown. Serializes as a plain bool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(transparent)]
pub struct DetailVisibility {
    shown: bool,
}

impl DetailVisibility {
    pub fn toggle(&mut self) {
        self.shown = !self.shown;
    }

    pub fn is_shown(&self) -> bool {
        self.shown
    }
}

/// Always-visible facts about a photo. Values are unescaped.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub title: String,
    pub camera: String,
    pub lens: String,
    pub dimensions: Option<String>,
    pub focal_length: String,
    pub author: String,
    pub date_taken: String,
    pub iso: String,
    pub aperture: String,
    pub exposure_time: String,
}

impl Summary {
    fn from_record(record: &PhotoRecord) -> Self {
        Self {
            title: record.title().unwrap_or_else(|| NO_TITLE.to_string()),
            camera: record.camera().unwrap_or_else(|| UNKNOWN_CAMERA.to_string()),
            lens: record.lens_model().unwrap_or_else(|| UNKNOWN_LENS.to_string()),
            dimensions: record.dimensions(),
            focal_length: record.focal_length().unwrap_or_default(),
            author: record.realname().unwrap_or_default(),
            date_taken: record.date_taken().unwrap_or_default(),
            iso: record.iso().unwrap_or_default(),
            aperture: record.aperture().unwrap_or_default(),
            exposure_time: record.exposure_time().unwrap_or_default(),
        }
    }

    fn to_html(&self) -> String {
        let exposure = if self.exposure_time.is_empty() {
            String::new()
        } else {
            format!("{}s", escape_html(&self.exposure_time))
        };
        format!(
            r#"<div class="info-grid">
  <div class="info-col">
    <strong>{title}</strong>
    <small>📷 {camera}</small>
    <small>🔭 Lens: {lens}</small>
    <small>📏 {dimensions}</small>
    <small>🔦 Focal: {focal}</small>
  </div>
  <div class="info-col">
    <small>👤 {author}</small>
    <small>📅 {date}</small>
    <small>ISO: {iso}</small>
    <small>ƒ/{aperture}</small>
    <small>{exposure}</small>
  </div>
</div>"#,
            title = escape_html(&self.title),
            camera = escape_html(&self.camera),
            lens = escape_html(&self.lens),
            dimensions = escape_html(self.dimensions.as_deref().unwrap_or_default()),
            focal = escape_html(&self.focal_length),
            author = escape_html(&self.author),
            date = escape_html(&self.date_taken),
            iso = escape_html(&self.iso),
            aperture = escape_html(&self.aperture),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DetailEntry {
    pub label: String,
    pub value: String,
}

/// Lightbox content for one photo.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalView {
    pub image_src: String,
    pub title: String,
    pub author: String,
    pub camera: String,
    pub lens: String,
    pub iso: String,
    pub aperture: String,
    pub focal_length: String,
    pub dimensions: Option<String>,
    /// Photo page on the hosting service, `#` when unknown.
    pub page_link: String,
}

impl ModalView {
    fn from_record(record: &PhotoRecord) -> Self {
        Self {
            image_src: record.modal_image().unwrap_or_default(),
            title: record.title().unwrap_or_default(),
            author: record.realname().unwrap_or_default(),
            camera: record.camera().unwrap_or_default(),
            lens: record.lens_model().unwrap_or_default(),
            iso: record.iso().unwrap_or_default(),
            aperture: record.aperture().unwrap_or_default(),
            focal_length: record.focal_length().unwrap_or_default(),
            dimensions: match (record.max_width(), record.max_height()) {
                (Some(w), Some(h)) => Some(format!("{w} × {h}")),
                _ => None,
            },
            page_link: record.flickr_page().unwrap_or_else(|| "#".to_string()),
        }
    }

    pub fn to_html(&self) -> String {
        let mut html = format!(
            r#"<h3>{title}</h3>
<p><strong>Author:</strong> {author}</p>
<p><strong>Camera:</strong> {camera}</p>
<p><strong>Lens:</strong> {lens}</p>
<p><strong>ISO:</strong> {iso}</p>
<p><strong>Aperture:</strong> {aperture}</p>
<p><strong>Focal Length:</strong> {focal}</p>
"#,
            title = escape_html(&self.title),
            author = escape_html(&self.author),
            camera = escape_html(&self.camera),
            lens = escape_html(&self.lens),
            iso = escape_html(&self.iso),
            aperture = escape_html(&self.aperture),
            focal = escape_html(&self.focal_length),
        );
        if let Some(dimensions) = &self.dimensions {
            html.push_str(&format!(
                "<p><strong>Size:</strong> {}</p>\n",
                escape_html(dimensions)
            ));
        }
        html.push_str(&format!(
            r#"<p><a href="{}" target="_blank" rel="noopener">View on Flickr</a></p>"#,
            escape_html(&self.page_link)
        ));
        html
    }
}

/// One photo on the page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CardView {
    pub index: usize,
    pub image_src: String,
    pub alt: String,
    pub summary: Summary,
    pub detail: Vec<DetailEntry>,
    /// Detail blocks start hidden; the toggle interaction flips this.
    #[serde(rename = "detail_shown")]
    pub detail_visibility: DetailVisibility,
    pub modal: ModalView,
    /// Original-resolution image for the "Open" action.
    pub open_url: Option<String>,
    /// Record JSON forwarded by the "Save" action.
    pub save_data: String,
    pub interactions: Vec<Interaction>,
}

impl CardView {
    /// Build a card, or `None` when the record has no usable image.
    pub fn from_record(index: usize, record: &PhotoRecord, options: &RenderOptions) -> Option<Self> {
        let image_src = record.primary_image()?;

        let detail = record
            .attributes()
            .iter()
            .filter(|(key, _)| !options.exclusions.contains(key))
            .filter_map(|(key, _)| {
                record.text(key).map(|value| DetailEntry {
                    label: attribute_label(key),
                    value,
                })
            })
            .collect();

        let click = |target, action| Interaction {
            target,
            trigger: Trigger::Click,
            action,
        };
        let interactions = vec![
            Interaction {
                target: Target::Card,
                trigger: options.detail_trigger,
                action: ActionKind::ToggleDetail,
            },
            click(Target::Image, ActionKind::OpenModal),
            click(Target::OpenButton, ActionKind::OpenImage),
            click(Target::SaveButton, ActionKind::Save),
        ];

        Some(Self {
            index,
            image_src,
            alt: record.title().unwrap_or_default(),
            summary: Summary::from_record(record),
            detail,
            detail_visibility: DetailVisibility::default(),
            modal: ModalView::from_record(record),
            open_url: record.url_max(),
            save_data: SaveEnvelope::for_record(record).web_query.data,
            interactions,
        })
    }

    /// Flip the detail block between shown and hidden.
    pub fn toggle_detail(&mut self) {
        self.detail_visibility.toggle();
    }

    fn detail_html(&self) -> String {
        if self.detail.is_empty() {
            return format!("<i>{NO_DETAIL}</i>");
        }
        self.detail
            .iter()
            .map(|entry| {
                format!(
                    "<div><strong>{}:</strong> {}</div>",
                    escape_html(&entry.label),
                    escape_html(&entry.value)
                )
            })
            .collect()
    }

    pub fn to_html(&self, handlers: &HandlerTable) -> String {
        let trigger = self
            .interactions
            .iter()
            .find(|i| i.action == ActionKind::ToggleDetail)
            .map(|i| i.trigger)
            .unwrap_or_default();

        let open_attrs = match &self.open_url {
            Some(url) => format!(r#" data-url="{}""#, escape_html(url)),
            None => format!(r#" data-missing="{}""#, escape_html(NO_ORIGINAL)),
        };

        let shown = self.detail_visibility.is_shown();
        let detail_class = if shown { "detail show-detail" } else { "detail" };

        format!(
            r#"<div class="card" data-card="{index}" data-action="{toggle}" data-trigger="{trigger}" data-detail-shown="{shown}">
<img class="card-img" src="{src}" alt="{alt}" data-action="{modal}">
{summary}
<div class="{detail_class}">{detail}</div>
<div class="button-box">
  <button type="button" class="save-btn" data-action="{save}" data-record="{record}">{save_label}</button>
  <button type="button" class="open-btn" data-action="{open}"{open_attrs}>Open</button>
</div>
<template class="modal-content" data-src="{modal_src}">{modal_html}</template>
</div>
"#,
            index = self.index,
            toggle = handlers.hook(ActionKind::ToggleDetail),
            trigger = trigger.as_str(),
            src = escape_html(&self.image_src),
            alt = escape_html(&self.alt),
            modal = handlers.hook(ActionKind::OpenModal),
            summary = self.summary.to_html(),
            detail = self.detail_html(),
            save = handlers.hook(ActionKind::Save),
            record = escape_html(&self.save_data),
            save_label = SaveState::Idle.label(),
            open = handlers.hook(ActionKind::OpenImage),
            modal_src = escape_html(&self.modal.image_src),
            modal_html = self.modal.to_html(),
        )
    }
}

/// Everything rendered for one page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GalleryView {
    pub page: u32,
    pub cards: Vec<CardView>,
    pub pagination: PaginationLayout,
}

impl GalleryView {
    /// Cards for every displayable record, in order, plus the pagination bar.
    pub fn build<I>(page: u32, records: I, total_pages: u32, options: &RenderOptions) -> Self
    where
        I: IntoIterator<Item = PhotoRecord>,
    {
        let cards = records
            .into_iter()
            // Index counts cards, not rows.
            .filter(PhotoRecord::is_displayable)
            .enumerate()
            .filter_map(|(index, record)| CardView::from_record(index, &record, options))
            .collect();

        Self {
            page,
            cards,
            pagination: PaginationLayout::compute(page, total_pages),
        }
    }

    pub fn gallery_html(&self, handlers: &HandlerTable) -> String {
        self.cards.iter().map(|card| card.to_html(handlers)).collect()
    }

    pub fn pagination_html(&self, handlers: &HandlerTable) -> String {
        pagination_html(&self.pagination, handlers)
    }
}

/// Markup for the pagination bar, jump box included.
pub fn pagination_html(layout: &PaginationLayout, handlers: &HandlerTable) -> String {
    let navigate = handlers.hook(ActionKind::Navigate);
    let mut html = String::new();

    for control in &layout.controls {
        match (&control.kind, &control.target) {
            (ControlKind::Ellipsis, _) | (_, None) => {
                html.push_str(&format!(
                    r#"<span class="dots">{}</span>"#,
                    escape_html(&control.label)
                ));
            }
            (kind, Some(target)) => {
                let class = match kind {
                    ControlKind::Page { active: true, .. } => r#" class="active""#,
                    _ => "",
                };
                html.push_str(&format!(
                    r#"<button type="button"{class} data-action="{navigate}" data-href="{href}">{label}</button>"#,
                    href = escape_html(target.as_str()),
                    label = escape_html(&control.label),
                ));
            }
        }
    }

    html.push_str(&format!(
        r#"<form class="jump-box" action="jump" method="get" data-warning="{warning}">
  <span>Go to page:</span>
  <input type="number" id="jumpInput" name="page" min="{min}" max="{max}">
  <button type="submit" id="jumpBtn">Go</button>
</form>"#,
        warning = escape_html(JUMP_WARNING),
        min = layout.jump.min,
        max = layout.jump.max,
    ));
    html
}

/// Gallery region content for a page that failed to load.
pub fn error_html(err: &GalleryError) -> String {
    format!(
        r#"<p class="load-error">{LOAD_FAILED}: {}</p>"#,
        escape_html(&err.to_string())
    )
}

/// Complete HTML document for one page view.
///
/// On error the gallery region holds the escaped message and no pagination is
/// rendered.
pub fn render_document(
    site: &SiteConfig,
    outcome: &Result<GalleryView, GalleryError>,
    options: &RenderOptions,
) -> String {
    let handlers = HandlerTable::default();
    let (gallery, pagination) = match outcome {
        Ok(view) => (view.gallery_html(&handlers), view.pagination_html(&handlers)),
        Err(err) => (error_html(err), String::new()),
    };
    let title = escape_html(&site.title);

    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>{title}</title>
<style>{STYLES}</style>
</head>
<body data-trigger="{trigger}">
<h1>{title}</h1>
<div id="gallery">
{gallery}</div>
<nav id="pagination">{pagination}</nav>
<div id="modal" class="modal">
  <span id="closeModal" class="close">&times;</span>
  <img id="modalImg" alt="">
  <div id="modalInfo"></div>
</div>
<script>
const SAVE_LABELS = {{ pending: "{pending}", saved: "{saved}", retry: "{retry}", error: "{error}" }};
{BINDINGS}
</script>
</body>
</html>
"#,
        trigger = options.detail_trigger.as_str(),
        pending = SaveState::Pending.label(),
        saved = SaveState::Saved.label(),
        retry = SaveState::Failed(crate::save::SaveFailure::Rejected(0)).label(),
        error = SaveState::Failed(crate::save::SaveFailure::Network).label(),
    )
}

const STYLES: &str = r#"
body { font-family: sans-serif; margin: 0 auto; max-width: 1400px; padding: 1rem; }
#gallery { display: grid; grid-template-columns: repeat(auto-fill, minmax(320px, 1fr)); gap: 1rem; }
.card { border: 1px solid #ddd; border-radius: 8px; padding: .5rem; cursor: pointer; }
.card-img { width: 100%; border-radius: 4px; cursor: zoom-in; }
.info-grid { display: grid; grid-template-columns: 1fr 1fr; gap: .5rem; }
.info-col { display: flex; flex-direction: column; }
.detail { display: none; font-size: .85rem; }
.detail.show-detail { display: block; }
.button-box { display: flex; gap: .5rem; margin-top: .5rem; }
.load-error { color: red; }
#pagination { display: flex; gap: .25rem; align-items: center; margin: 1rem 0; flex-wrap: wrap; }
#pagination .active { font-weight: bold; }
.jump-box { display: inline-flex; gap: .25rem; align-items: center; }
.jump-box input { width: 60px; }
.modal { display: none; position: fixed; inset: 0; background: rgba(0,0,0,.85); align-items: center; justify-content: center; gap: 1rem; }
.modal img { max-width: 90vw; max-height: 90vh; }
.modal #modalInfo { color: #eee; }
.modal .close { position: absolute; top: 1rem; right: 1.5rem; color: #fff; font-size: 2rem; cursor: pointer; }
"#;

const BINDINGS: &str = r#"
(() => {
  const modal = document.getElementById("modal");
  const modalImg = document.getElementById("modalImg");
  const modalInfo = document.getElementById("modalInfo");

  const setDetail = (card, shown) => {
    card.dataset.detailShown = String(shown);
    card.querySelector(".detail").classList.toggle("show-detail", shown);
  };
  const toggleDetail = (card) => setDetail(card, card.dataset.detailShown !== "true");

  document.querySelectorAll('.card[data-action="toggle-detail"]').forEach((card) => {
    const trigger = card.dataset.trigger;
    if (trigger === "hover") {
      card.addEventListener("mouseenter", () => setDetail(card, true));
      card.addEventListener("mouseleave", () => setDetail(card, false));
    } else {
      card.addEventListener("click", (ev) => {
        if (ev.target.closest("[data-action]") !== card) return;
        if (trigger === "modifier-click" && !(ev.ctrlKey || ev.metaKey)) return;
        toggleDetail(card);
      });
    }
  });

  const handlers = {
    "open-modal": (el) => {
      const tpl = el.closest(".card").querySelector("template.modal-content");
      modalImg.src = tpl.dataset.src;
      modalInfo.innerHTML = tpl.innerHTML;
      modal.style.display = "flex";
    },
    "open-image": (el) => {
      if (el.dataset.url) window.open(el.dataset.url, "_blank");
      else alert(el.dataset.missing);
    },
    "save": async (btn) => {
      if (btn.disabled) return;
      btn.disabled = true;
      btn.textContent = SAVE_LABELS.pending;
      try {
        const res = await fetch("api/save", {
          method: "POST",
          headers: { "Content-Type": "application/json" },
          body: JSON.stringify({ web_query: { data: btn.dataset.record } }),
        });
        if (res.ok) {
          btn.textContent = SAVE_LABELS.saved;
          return;
        }
        const body = await res.json().catch(() => ({}));
        const rejected = body.error && body.error.code === "SAVE_REJECTED";
        btn.textContent = rejected ? SAVE_LABELS.retry : SAVE_LABELS.error;
      } catch (err) {
        console.error("save request failed", err);
        btn.textContent = SAVE_LABELS.error;
      }
      btn.disabled = false;
    },
    "navigate": (el) => { window.location.href = el.dataset.href; },
  };

  document.addEventListener("click", (ev) => {
    const el = ev.target.closest("[data-action]");
    if (!el || !handlers[el.dataset.action]) return;
    ev.stopPropagation();
    handlers[el.dataset.action](el);
  });

  document.getElementById("closeModal").addEventListener("click", () => { modal.style.display = "none"; });

  const jump = document.querySelector(".jump-box");
  if (jump) {
    jump.addEventListener("submit", (ev) => {
      ev.preventDefault();
      const input = document.getElementById("jumpInput");
      const val = Number(input.value.trim());
      if (Number.isInteger(val) && val >= Number(input.min) && val <= Number(input.max)) {
        window.location.href = "index.html?page=" + val;
      } else {
        alert(jump.dataset.warning);
      }
    });
  }
})();
"#;

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn record(value: Value) -> PhotoRecord {
        match value {
            Value::Object(map) => PhotoRecord::from_attributes(map),
            other => panic!("fixture is not an object: {other}"),
        }
    }

    #[test]
    fn escape_covers_all_five_characters() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
        assert_eq!(escape_html(""), "");
    }

    #[test]
    fn labels_are_title_cased() {
        assert_eq!(attribute_label("exposure_time"), "Exposure Time");
        assert_eq!(attribute_label("iso"), "Iso");
        assert_eq!(attribute_label("lens_model_2"), "Lens Model 2");
    }

    #[test]
    fn detail_skips_excluded_and_empty_attributes() {
        let r = record(json!({
            "id": "123",
            "url_max": "a.jpg",
            "title": "T",
            "exposure_time": "1/250",
            "license": "",
            "views": 0,
            "tags": "sky sea",
        }));
        let card = CardView::from_record(0, &r, &RenderOptions::default()).unwrap();
        let labels: Vec<_> = card.detail.iter().map(|d| d.label.as_str()).collect();
        assert_eq!(labels, ["Title", "Exposure Time", "Tags"]);
    }

    #[test]
    fn configurable_exclusions() {
        let r = record(json!({"url_max": "a.jpg", "title": "T", "tags": "x"}));
        let options = RenderOptions {
            exclusions: ExclusionSet::from_keys(["url_max", "title"]),
            ..RenderOptions::default()
        };
        let card = CardView::from_record(0, &r, &options).unwrap();
        assert_eq!(card.detail.len(), 1);
        assert_eq!(card.detail[0].value, "x");
    }

    #[test]
    fn card_needs_an_image() {
        let r = record(json!({"title": "no image"}));
        assert!(CardView::from_record(0, &r, &RenderOptions::default()).is_none());
    }

    #[test]
    fn script_in_title_is_neutralized() {
        let r = record(json!({
            "title": "<script>alert(1)</script>",
            "url_max": "a.jpg",
            "tags": "<b>x</b>",
        }));
        let card = CardView::from_record(0, &r, &RenderOptions::default()).unwrap();
        let html = card.to_html(&HandlerTable::default());
        assert!(!html.contains("<script>"));
        assert!(!html.contains("<b>x</b>"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    }

    #[test]
    fn missing_values_render_empty_not_null() {
        let r = record(json!({"url_max_2000": "b.jpg", "iso": null}));
        let card = CardView::from_record(0, &r, &RenderOptions::default()).unwrap();
        let html = card.to_html(&HandlerTable::default());
        assert!(!html.contains("null"));
        assert!(!html.contains("undefined"));
        assert!(html.contains("(No title)"));
        assert!(html.contains("<i>(No detail data)</i>"));
        assert_eq!(card.open_url, None);
        assert!(html.contains(r#"data-missing="No original image to open!""#));
    }

    #[test]
    fn toggle_twice_restores_visibility() {
        let r = record(json!({"url_max": "a.jpg", "tags": "sky"}));
        let mut card = CardView::from_record(0, &r, &RenderOptions::default()).unwrap();
        let handlers = HandlerTable::default();
        let hidden = card.to_html(&handlers);
        assert!(hidden.contains(r#"data-detail-shown="false""#));
        assert!(hidden.contains(r#"<div class="detail">"#));
        assert_eq!(serde_json::to_value(&card).unwrap()["detail_shown"], false);

        card.toggle_detail();
        let shown = card.to_html(&handlers);
        assert!(shown.contains(r#"data-detail-shown="true""#));
        assert!(shown.contains(r#"<div class="detail show-detail">"#));
        assert_eq!(serde_json::to_value(&card).unwrap()["detail_shown"], true);

        card.toggle_detail();
        assert_eq!(card.to_html(&handlers), hidden);
    }

    #[test]
    fn hover_sets_visibility_instead_of_flipping() {
        assert!(BINDINGS.contains(r#"addEventListener("mouseenter", () => setDetail(card, true))"#));
        assert!(BINDINGS.contains(r#"addEventListener("mouseleave", () => setDetail(card, false))"#));
    }

    #[test]
    fn trigger_policy_is_carried_to_markup() {
        let r = record(json!({"url_max": "a.jpg"}));
        let options = RenderOptions {
            detail_trigger: Trigger::Hover,
            ..RenderOptions::default()
        };
        let card = CardView::from_record(0, &r, &options).unwrap();
        assert!(card.interactions.contains(&Interaction {
            target: Target::Card,
            trigger: Trigger::Hover,
            action: ActionKind::ToggleDetail,
        }));
        assert!(card.to_html(&HandlerTable::default()).contains(r#"data-trigger="hover""#));
        assert_eq!("modifier-click".parse::<Trigger>(), Ok(Trigger::ModifierClick));
        assert!("double-tap".parse::<Trigger>().is_err());
    }

    #[test]
    fn modal_prefers_original_and_links_page() {
        let r = record(json!({
            "url_max": "orig.jpg",
            "url_max_2000": "2k.jpg",
            "max_width": 6000,
            "max_height": 4000,
            "flickr_page": "https://flickr.com/p/1",
        }));
        let card = CardView::from_record(0, &r, &RenderOptions::default()).unwrap();
        assert_eq!(card.image_src, "2k.jpg");
        assert_eq!(card.modal.image_src, "orig.jpg");
        assert_eq!(card.modal.dimensions.as_deref(), Some("6000 × 4000"));
        assert!(card.modal.to_html().contains(r#"href="https://flickr.com/p/1""#));
        assert_eq!(card.summary.dimensions.as_deref(), Some("6000×4000"));
    }

    #[test]
    fn gallery_counts_only_displayable_records() {
        let records = vec![
            record(json!({"url_max": "1.jpg"})),
            PhotoRecord::empty(),
            record(json!({"url_max_2000": "3.jpg"})),
        ];
        let view = GalleryView::build(2, records, 4, &RenderOptions::default());
        assert_eq!(view.cards.len(), 2);
        assert_eq!(view.cards[1].index, 1);
        assert_eq!(view.pagination.current, 2);
    }

    #[test]
    fn error_document_has_escaped_message_and_no_pagination() {
        let err = GalleryError::from(crate::error::SourceError::Transport("<boom>".into()));
        let html = render_document(&SiteConfig::default(), &Err(err), &RenderOptions::default());
        assert!(html.contains("Failed to load data: network error: &lt;boom&gt;"));
        assert!(!html.contains(r#"<form class="jump-box""#));
        assert!(html.contains("<title>Default Title</title>"));
    }

    #[test]
    fn pagination_markup_marks_active_and_dots() {
        let html = pagination_html(&PaginationLayout::compute(1, 10), &HandlerTable::default());
        assert!(html.contains(r#"class="active" data-action="navigate" data-href="index.html?page=1""#));
        assert!(html.contains(r#"<span class="dots">...</span>"#));
        assert!(html.contains(r#"max="10""#));
    }
}
