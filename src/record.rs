//! The normalized photo record decoded from a row's embedded JSON payload.
//!
//! A [`PhotoRecord`] keeps every attribute of the payload in source order. The
//! handful of attributes the gallery knows about get typed accessors; the rest
//! are reachable through [`PhotoRecord::attributes`] and end up in the detail
//! block.
//!
//! Attribute values follow a "present or absent" rule when read as text:
//! empty strings, `null`, `false` and zero are treated as absent, so a missing
//! value never renders as `null` or `0` in the gallery.
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::RecordError;

/// Attribute names the gallery reads directly.
pub mod keys {
    pub const TITLE: &str = "title";
    pub const CAMERA: &str = "camera";
    pub const LENS_MODEL: &str = "lens_model";
    pub const REALNAME: &str = "realname";
    pub const DATE_TAKEN: &str = "datetaken";
    pub const ISO: &str = "iso";
    pub const APERTURE: &str = "aperture";
    pub const EXPOSURE_TIME: &str = "exposure_time";
    pub const FOCAL_LENGTH: &str = "focal_length";
    pub const MAX_WIDTH: &str = "max_width";
    pub const MAX_HEIGHT: &str = "max_height";
    pub const URL_MAX: &str = "url_max";
    pub const URL_MAX_2000: &str = "url_max_2000";
    pub const FLICKR_PAGE: &str = "flickr_page";
}

/// One photo, as decoded from a tabular row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhotoRecord {
    attributes: Map<String, Value>,
}

impl PhotoRecord {
    /// Record with no attributes, used when a row's payload is missing or undecodable.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_attributes(attributes: Map<String, Value>) -> Self {
        Self { attributes }
    }

    /// Decode a raw `data` cell.
    ///
    /// The cell is CSV-quoted JSON: doubled quotes are collapsed first, then one
    /// leading and one trailing quote are stripped.
    ///
    /// ```rust
    /// use pipegallery::PhotoRecord;
    ///
    /// let record = PhotoRecord::decode_payload(r#""{""title"":""Sunset""}""#).unwrap();
    /// assert_eq!(record.title().as_deref(), Some("Sunset"));
    /// ```
    pub fn decode_payload(raw: &str) -> Result<Self, RecordError> {
        let cleaned = unescape_payload(raw);
        match serde_json::from_str::<Value>(&cleaned) {
            Ok(Value::Object(attributes)) => Ok(Self { attributes }),
            Ok(_) => Err(RecordError::NotAnObject),
            Err(err) => Err(RecordError::InvalidJson(err.to_string())),
        }
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }

    /// Display text of an attribute, or `None` when absent or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.attributes.get(key).and_then(display_value)
    }

    pub fn title(&self) -> Option<String> {
        self.text(keys::TITLE)
    }

    pub fn camera(&self) -> Option<String> {
        self.text(keys::CAMERA)
    }

    pub fn lens_model(&self) -> Option<String> {
        self.text(keys::LENS_MODEL)
    }

    pub fn realname(&self) -> Option<String> {
        self.text(keys::REALNAME)
    }

    pub fn date_taken(&self) -> Option<String> {
        self.text(keys::DATE_TAKEN)
    }

    pub fn iso(&self) -> Option<String> {
        self.text(keys::ISO)
    }

    pub fn aperture(&self) -> Option<String> {
        self.text(keys::APERTURE)
    }

    pub fn exposure_time(&self) -> Option<String> {
        self.text(keys::EXPOSURE_TIME)
    }

    pub fn focal_length(&self) -> Option<String> {
        self.text(keys::FOCAL_LENGTH)
    }

    pub fn max_width(&self) -> Option<String> {
        self.text(keys::MAX_WIDTH)
    }

    pub fn max_height(&self) -> Option<String> {
        self.text(keys::MAX_HEIGHT)
    }

    pub fn url_max(&self) -> Option<String> {
        self.text(keys::URL_MAX)
    }

    pub fn url_max_2000(&self) -> Option<String> {
        self.text(keys::URL_MAX_2000)
    }

    pub fn flickr_page(&self) -> Option<String> {
        self.text(keys::FLICKR_PAGE)
    }

    /// Image shown on the card: the 2000px rendition when available.
    pub fn primary_image(&self) -> Option<String> {
        self.url_max_2000().or_else(|| self.url_max())
    }

    /// Image shown in the modal: the original resolution when available.
    pub fn modal_image(&self) -> Option<String> {
        self.url_max().or_else(|| self.url_max_2000())
    }

    /// A record is displayable when it has at least one usable image URL.
    pub fn is_displayable(&self) -> bool {
        self.primary_image().is_some()
    }

    /// `WIDTH×HEIGHT`, only when both are present.
    pub fn dimensions(&self) -> Option<String> {
        match (self.max_width(), self.max_height()) {
            (Some(w), Some(h)) => Some(format!("{w}×{h}")),
            _ => None,
        }
    }

    /// Compact JSON of all attributes, as forwarded by the save action.
    pub fn to_json(&self) -> String {
        Value::Object(self.attributes.clone()).to_string()
    }
}

/// Undo CSV-style quoting of a JSON blob: `""` → `"`, then strip one outer quote on each side.
pub fn unescape_payload(raw: &str) -> String {
    let collapsed = raw.replace("\"\"", "\"");
    let inner = collapsed.strip_prefix('"').unwrap_or(&collapsed);
    let inner = inner.strip_suffix('"').unwrap_or(inner);
    inner.to_string()
}

fn display_value(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::Bool(true) => Some("true".to_string()),
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        Value::Number(n) => Some(n.to_string()),
        compound => Some(compound.to_string()),
    }
}
