//! Site configuration loaded once from a `key=value` text resource.
//!
//! Recognized keys are `title`, `total_pages` and `api_url`. Any other key is
//! kept verbatim and can be read back through [`SiteConfig::get`].
//!
//! ```rust
//! use pipegallery::SiteConfig;
//!
//! let cfg = SiteConfig::parse("title = My Photos\ntotal_pages=12\ntheme=dark\n");
//! assert_eq!(cfg.title, "My Photos");
//! assert_eq!(cfg.total_pages, 12);
//! assert_eq!(cfg.get("theme"), Some("dark"));
//! ```
use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

pub const DEFAULT_TITLE: &str = "Default Title";

/// Process-wide settings, read-only after startup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiteConfig {
    pub title: String,
    /// Always at least 1.
    pub total_pages: u32,
    /// Target of save requests. Empty when not configured.
    pub api_url: String,
    #[serde(default, flatten)]
    pub extra: BTreeMap<String, String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            total_pages: 1,
            api_url: String::new(),
            extra: BTreeMap::new(),
        }
    }
}

impl SiteConfig {
    /// Parse `key=value` lines over the defaults.
    ///
    /// Lines lacking a non-empty key or value are skipped. A `total_pages`
    /// value that is not a positive integer falls back to 1.
    pub fn parse(text: &str) -> Self {
        let mut config = Self::default();

        for line in text.lines() {
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let (key, value) = (key.trim(), value.trim());
            if key.is_empty() || value.is_empty() {
                continue;
            }
            config.set(key, value);
        }

        config
    }

    fn set(&mut self, key: &str, value: &str) {
        match key {
            "title" => self.title = value.to_string(),
            "api_url" => self.api_url = value.to_string(),
            "total_pages" => {
                self.total_pages = match leading_integer(value).map(u32::try_from) {
                    Some(Ok(pages)) if pages > 0 => pages,
                    _ => {
                        tracing::warn!(value, "total_pages is not a positive integer, using 1");
                        1
                    }
                };
            }
            _ => {
                self.extra.insert(key.to_string(), value.to_string());
            }
        }
    }

    /// Raw value of any key, recognized or not.
    pub fn get(&self, key: &str) -> Option<&str> {
        match key {
            "title" => Some(&self.title),
            "api_url" if !self.api_url.is_empty() => Some(&self.api_url),
            "api_url" | "total_pages" => None,
            _ => self.extra.get(key).map(String::as_str),
        }
    }

    pub fn has_save_endpoint(&self) -> bool {
        !self.api_url.is_empty()
    }
}

/// Integer spelled by the leading sign and digit run of `value`, ignoring
/// whatever follows (`"12abc"` is 12, `"3.5"` is 3).
fn leading_integer(value: &str) -> Option<i64> {
    let (negative, rest) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let magnitude = rest[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_when_empty() {
        assert_eq!(SiteConfig::parse(""), SiteConfig::default());
        assert!(!SiteConfig::default().has_save_endpoint());
    }

    #[test]
    fn skips_lines_without_key_or_value() {
        let cfg = SiteConfig::parse("=orphan\ntitle=\njust text\n  \ntitle = Kept\n");
        assert_eq!(cfg.title, "Kept");
        assert!(cfg.extra.is_empty());
    }

    #[test]
    fn values_may_contain_equals_signs() {
        let cfg = SiteConfig::parse("api_url=https://example.com/save?token=abc\r\n");
        assert_eq!(cfg.api_url, "https://example.com/save?token=abc");
        assert!(cfg.has_save_endpoint());
    }

    #[test]
    fn bad_total_pages_falls_back_to_one() {
        for raw in ["lots", "0", "-4", "abc12", "99999999999"] {
            let cfg = SiteConfig::parse(&format!("total_pages={raw}"));
            assert_eq!(cfg.total_pages, 1, "input {raw:?}");
        }
        assert_eq!(SiteConfig::parse("total_pages= 42 ").total_pages, 42);
    }

    #[test]
    fn total_pages_reads_leading_digits() {
        assert_eq!(SiteConfig::parse("total_pages=12abc").total_pages, 12);
        assert_eq!(SiteConfig::parse("total_pages=3.5").total_pages, 3);
        assert_eq!(SiteConfig::parse("total_pages=+7").total_pages, 7);
    }

    #[test]
    fn unknown_keys_pass_through() {
        let cfg = SiteConfig::parse("footer=hello world\nlocale=vi");
        assert_eq!(cfg.get("footer"), Some("hello world"));
        assert_eq!(cfg.get("locale"), Some("vi"));
        assert_eq!(cfg.get("missing"), None);
    }
}
