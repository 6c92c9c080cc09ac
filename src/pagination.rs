//! Pagination controls as a pure function of `(current page, total pages)`.
//!
//! The layout is computed, never acted on: every control carries the
//! [`NavigationTarget`] it leads to, and a binding layer performs the actual
//! navigation as a full page load.
use std::fmt;
use std::ops::RangeInclusive;

use serde::Serialize;

use crate::error::JumpError;

/// Width of the page-number window.
pub const MAX_VISIBLE: u32 = 5;

/// Page the gallery lives on; pages are selected with `?page=N`.
pub const GALLERY_PATH: &str = "index.html";

/// Warning shown when the jump box receives an unusable value.
pub const JUMP_WARNING: &str = "Invalid page number!";

/// Location of one gallery page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct NavigationTarget(String);

impl NavigationTarget {
    pub fn for_page(page: u32) -> Self {
        Self(format!("{GALLERY_PATH}?page={page}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NavigationTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Inclusive range of page numbers shown as buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    pub start: u32,
    pub end: u32,
}

impl PageWindow {
    /// Window of up to [`MAX_VISIBLE`] pages centered on `current`, shifted to
    /// stay inside `1..=total`.
    pub fn compute(current: u32, total: u32) -> Self {
        let max_visible = i64::from(MAX_VISIBLE);
        let current = i64::from(current.max(1));
        let total = i64::from(total.max(1));

        let mut start = (current - max_visible / 2).max(1);
        let end = total.min(start + max_visible - 1);
        if end - start < max_visible - 1 {
            start = (end - max_visible + 1).max(1);
        }

        // Both bounds lie in 1..=total, which came from a u32.
        Self {
            start: start as u32,
            end: end as u32,
        }
    }

    pub fn pages(&self) -> RangeInclusive<u32> {
        self.start..=self.end
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ControlKind {
    First,
    Previous,
    Page { number: u32, active: bool },
    Ellipsis,
    /// Explicit button for the last page, shown after the ellipsis.
    LastPage { number: u32 },
    Next,
    Last,
}

/// One element of the pagination bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Control {
    #[serde(flatten)]
    pub kind: ControlKind,
    pub label: String,
    /// `None` for non-interactive elements.
    pub target: Option<NavigationTarget>,
}

impl Control {
    fn link(kind: ControlKind, label: impl Into<String>, page: u32) -> Self {
        Self {
            kind,
            label: label.into(),
            target: Some(NavigationTarget::for_page(page)),
        }
    }
}

/// Jump-to-page input accepting `1..=max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct JumpBox {
    pub min: u32,
    pub max: u32,
}

impl JumpBox {
    pub fn new(total_pages: u32) -> Self {
        Self {
            min: 1,
            max: total_pages.max(1),
        }
    }

    /// Validate user input. Only an in-range integer yields a target.
    pub fn resolve(&self, input: &str) -> Result<NavigationTarget, JumpError> {
        let trimmed = input.trim();
        let value: i64 = trimmed
            .parse()
            .map_err(|_| JumpError::NotANumber(trimmed.to_string()))?;

        if value < i64::from(self.min) || value > i64::from(self.max) {
            return Err(JumpError::OutOfRange {
                value,
                max: self.max,
            });
        }
        Ok(NavigationTarget::for_page(value as u32))
    }
}

/// Full pagination bar for one page view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationLayout {
    pub current: u32,
    pub total: u32,
    pub window: PageWindow,
    pub controls: Vec<Control>,
    pub jump: JumpBox,
}

impl PaginationLayout {
    pub fn compute(current: u32, total: u32) -> Self {
        let current = current.max(1);
        let total = total.max(1);
        let window = PageWindow::compute(current, total);
        let mut controls = Vec::new();

        if current > 1 {
            controls.push(Control::link(ControlKind::First, "«", 1));
            controls.push(Control::link(ControlKind::Previous, "<", current - 1));
        }

        for number in window.pages() {
            controls.push(Control::link(
                ControlKind::Page {
                    number,
                    active: number == current,
                },
                number.to_string(),
                number,
            ));
        }

        if window.end < total {
            controls.push(Control {
                kind: ControlKind::Ellipsis,
                label: "...".to_string(),
                target: None,
            });
            controls.push(Control::link(
                ControlKind::LastPage { number: total },
                total.to_string(),
                total,
            ));
        }

        if current < total {
            controls.push(Control::link(ControlKind::Next, ">", current + 1));
            controls.push(Control::link(ControlKind::Last, "»", total));
        }

        Self {
            current,
            total,
            window,
            controls,
            jump: JumpBox::new(total),
        }
    }

    /// Page numbers of the window buttons.
    pub fn page_numbers(&self) -> Vec<u32> {
        self.controls
            .iter()
            .filter_map(|control| match control.kind {
                ControlKind::Page { number, .. } => Some(number),
                _ => None,
            })
            .collect()
    }

    pub fn has(&self, kind: &ControlKind) -> bool {
        self.controls.iter().any(|control| control.kind == *kind)
    }

    pub fn has_ellipsis(&self) -> bool {
        self.has(&ControlKind::Ellipsis)
    }
}
