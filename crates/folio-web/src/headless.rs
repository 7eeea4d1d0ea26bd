#![forbid(unsafe_code)]

//! Headless page host for native builds and tests.
//!
//! Models the two DOM facts the runtime needs: which cursor keyword the
//! element under a point computes to, and whether the page has hidden the
//! native pointer. Clones share state, like handles to one document.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use folio_backend::{NativeCursorControl, PointerProbe};

/// Cursor keyword reported where no region matches.
pub const DEFAULT_KEYWORD: &str = "auto";

/// Axis-aligned region in client coordinates with its computed cursor.
#[derive(Debug, Clone, PartialEq)]
pub struct CursorRegion {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub cursor: String,
}

impl CursorRegion {
    #[must_use]
    pub fn contains(&self, x: f64, y: f64) -> bool {
        x >= self.x && x < self.x + self.width && y >= self.y && y < self.y + self.height
    }
}

#[derive(Debug, Default)]
struct Document {
    regions: RefCell<Vec<CursorRegion>>,
    cursor_hidden: Cell<bool>,
    restores: Cell<u32>,
}

/// In-memory stand-in for the document.
#[derive(Debug, Clone, Default)]
pub struct HeadlessHost {
    document: Rc<Document>,
}

impl HeadlessHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`add_region`](Self::add_region).
    #[must_use]
    pub fn with_region(self, x: f64, y: f64, width: f64, height: f64, cursor: &str) -> Self {
        self.add_region(x, y, width, height, cursor);
        self
    }

    /// Add a region on top of the existing ones.
    pub fn add_region(&self, x: f64, y: f64, width: f64, height: f64, cursor: &str) {
        self.document.regions.borrow_mut().push(CursorRegion {
            x,
            y,
            width,
            height,
            cursor: cursor.to_owned(),
        });
    }

    pub fn clear_regions(&self) {
        self.document.regions.borrow_mut().clear();
    }

    /// Whether `body.style.cursor` is currently `none`.
    #[must_use]
    pub fn native_cursor_hidden(&self) -> bool {
        self.document.cursor_hidden.get()
    }

    /// How many times the native cursor was restored.
    #[must_use]
    pub fn restore_count(&self) -> u32 {
        self.document.restores.get()
    }
}

impl PointerProbe for HeadlessHost {
    fn cursor_at(&self, x: f64, y: f64) -> Option<String> {
        let regions = self.document.regions.borrow();
        // Later regions stack above earlier ones.
        let keyword = regions
            .iter()
            .rev()
            .find(|region| region.contains(x, y))
            .map_or(DEFAULT_KEYWORD, |region| region.cursor.as_str());
        Some(keyword.to_owned())
    }
}

impl NativeCursorControl for HeadlessHost {
    fn hide_native_cursor(&mut self) {
        self.document.cursor_hidden.set(true);
    }

    fn restore_native_cursor(&mut self) {
        self.document.cursor_hidden.set(false);
        self.document
            .restores
            .set(self.document.restores.get().saturating_add(1));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn topmost_region_wins() {
        let host = HeadlessHost::new()
            .with_region(0.0, 0.0, 400.0, 400.0, "text")
            .with_region(100.0, 300.0, 100.0, 100.0, "pointer");
        assert_eq!(host.cursor_at(120.0, 340.0).as_deref(), Some("pointer"));
        assert_eq!(host.cursor_at(50.0, 50.0).as_deref(), Some("text"));
        assert_eq!(host.cursor_at(900.0, 900.0).as_deref(), Some(DEFAULT_KEYWORD));
    }

    #[test]
    fn region_edges_are_half_open() {
        let region = CursorRegion {
            x: 10.0,
            y: 10.0,
            width: 10.0,
            height: 10.0,
            cursor: "pointer".into(),
        };
        assert!(region.contains(10.0, 10.0));
        assert!(!region.contains(20.0, 15.0));
    }

    #[test]
    fn clones_share_cursor_visibility() {
        let host = HeadlessHost::new();
        let mut handle = host.clone();
        handle.hide_native_cursor();
        assert!(host.native_cursor_hidden());
        handle.restore_native_cursor();
        assert!(!host.native_cursor_hidden());
        assert_eq!(host.restore_count(), 1);
    }

    #[test]
    fn regions_can_change_after_cloning() {
        let host = HeadlessHost::new();
        let probe = host.clone();
        host.add_region(0.0, 0.0, 10.0, 10.0, "pointer");
        assert_eq!(probe.cursor_at(5.0, 5.0).as_deref(), Some("pointer"));
        host.clear_regions();
        assert_eq!(probe.cursor_at(5.0, 5.0).as_deref(), Some(DEFAULT_KEYWORD));
    }
}
