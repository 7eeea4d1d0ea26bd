#![forbid(unsafe_code)]

//! Navigation bar state derived from scroll position.
//!
//! The bar condenses once the page scrolls past a small threshold, and the
//! link for the section currently under the bar is highlighted.

use crate::reveal::SectionBounds;
use crate::scroll::ScrollState;

/// Tunables for [`SectionSpy`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NavConfig {
    /// Scroll offset past which the bar switches to its condensed style.
    pub scrolled_threshold: f64,
    /// Offset applied to section tops, usually minus the bar height.
    pub spy_offset: f64,
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            scrolled_threshold: 50.0,
            spy_offset: -70.0,
        }
    }
}

/// Read-only navigation snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NavState {
    pub scrolled: bool,
    /// Id of the highlighted section.
    pub active: Option<String>,
}

/// Tracks which registered section sits under the navigation bar.
#[derive(Debug, Clone, Default)]
pub struct SectionSpy {
    config: NavConfig,
    sections: Vec<(String, SectionBounds)>,
}

impl SectionSpy {
    #[must_use]
    pub fn new(config: NavConfig) -> Self {
        Self {
            config,
            sections: Vec::new(),
        }
    }

    /// Register or move a section. Sections are kept in document order.
    pub fn upsert(&mut self, id: &str, bounds: SectionBounds) {
        match self.sections.iter_mut().find(|(sid, _)| sid == id) {
            Some((_, existing)) => *existing = bounds,
            None => self.sections.push((id.to_owned(), bounds)),
        }
        self.sections.sort_by(|a, b| a.1.top.total_cmp(&b.1.top));
    }

    pub fn remove(&mut self, id: &str) {
        self.sections.retain(|(sid, _)| sid != id);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sections.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// The section whose offset top has been passed most recently and whose
    /// bottom is still below the bar.
    #[must_use]
    pub fn active_at(&self, position_y: f64) -> Option<&str> {
        self.sections
            .iter()
            .rev()
            .find(|(_, bounds)| {
                let top = bounds.top + self.config.spy_offset;
                let bottom = bounds.bottom() + self.config.spy_offset;
                position_y >= top && position_y < bottom
            })
            .map(|(id, _)| id.as_str())
    }

    #[must_use]
    pub fn state(&self, scroll: &ScrollState) -> NavState {
        NavState {
            scrolled: scroll.position_y > self.config.scrolled_threshold,
            active: self.active_at(scroll.position_y).map(str::to_owned),
        }
    }
}
