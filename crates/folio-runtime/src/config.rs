#![forbid(unsafe_code)]

//! Policy-as-data configuration for the page runtime.
//!
//! Captures every tunable of the interaction core as a single
//! [`FolioConfig`] that can be loaded from TOML or JSON at startup.
//!
//! # Loading
//!
//! ```toml
//! # folio.toml
//! [scroll]
//! idle_timeout_ms = 150
//! bottom_slack_px = 50.0
//!
//! [boot]
//! storage_key = "hasCompletedBoot"
//! ```
//!
//! ```rust,ignore
//! let config = FolioConfig::from_toml_file("folio.toml")?;
//! let config = FolioConfig::from_json_str(json)?;
//! ```
//!
//! # Defaults
//!
//! Every field defaults to the value the site ships with, so
//! `FolioConfig::default()` reproduces the built-in behaviour.

#[cfg(feature = "config-file")]
use std::path::Path;
use std::time::Duration;

#[cfg(feature = "config-file")]
use serde::{Deserialize, Serialize};

use folio_core::boot::{BootConfig, BootLine, BootScript, BootStep};
use folio_core::cursor::{CursorConfig, SpringParams};
use folio_core::nav::NavConfig;
use folio_core::reveal::RevealConfig;
use folio_core::scroll::ScrollConfig;

fn ms(n: u64) -> Duration {
    Duration::from_millis(n)
}

// ---------------------------------------------------------------------------
// Top-level FolioConfig
// ---------------------------------------------------------------------------

/// Top-level configuration for the page runtime.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct FolioConfig {
    pub scroll: ScrollPolicy,
    pub boot: BootPolicy,
    pub cursor: CursorPolicy,
    pub reveal: RevealPolicy,
    pub nav: NavPolicy,
}

impl FolioConfig {
    /// Load from a TOML string.
    #[cfg(feature = "config-file")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s).map_err(ConfigError::Toml)?;
        config.validated()
    }

    /// Load from a TOML file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_toml_str(&content)
    }

    /// Load from a JSON string.
    #[cfg(feature = "config-file")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s).map_err(ConfigError::Json)?;
        config.validated()
    }

    /// Load from a JSON file on disk.
    #[cfg(feature = "config-file")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(ConfigError::Io)?;
        Self::from_json_str(&content)
    }

    /// Return `self` if valid, the collected errors otherwise.
    pub fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();

        if self.scroll.idle_timeout_ms == 0 {
            errors.push("scroll.idle_timeout_ms must be > 0".into());
        }
        if !(self.scroll.bottom_slack_px >= 0.0) {
            errors.push(format!(
                "scroll.bottom_slack_px must be >= 0, got {}",
                self.scroll.bottom_slack_px
            ));
        }

        if self.boot.storage_key.trim().is_empty() {
            errors.push("boot.storage_key must not be empty".into());
        }
        for (index, step) in self.boot.steps.iter().enumerate() {
            if step.message.is_none() && !step.shows_cursor {
                errors.push(format!(
                    "boot.steps[{index}] must reveal a message or the cursor"
                ));
            }
        }

        for (name, spring) in [
            ("cursor.ring", &self.cursor.ring),
            ("cursor.dot", &self.cursor.dot),
        ] {
            if !(spring.stiffness > 0.0) {
                errors.push(format!("{name}.stiffness must be > 0, got {}", spring.stiffness));
            }
            if !(spring.mass > 0.0) {
                errors.push(format!("{name}.mass must be > 0, got {}", spring.mass));
            }
            if !(spring.damping >= 0.0) {
                errors.push(format!("{name}.damping must be >= 0, got {}", spring.damping));
            }
        }

        if !(0.0..=1.0).contains(&self.reveal.threshold) {
            errors.push(format!(
                "reveal.threshold must be in [0, 1], got {}",
                self.reveal.threshold
            ));
        }

        if !(self.nav.scrolled_threshold_px >= 0.0) {
            errors.push(format!(
                "nav.scrolled_threshold_px must be >= 0, got {}",
                self.nav.scrolled_threshold_px
            ));
        }

        errors
    }

    #[must_use]
    pub fn scroll_config(&self) -> ScrollConfig {
        ScrollConfig::default()
            .with_idle_timeout(ms(self.scroll.idle_timeout_ms))
            .with_bottom_slack(self.scroll.bottom_slack_px)
    }

    #[must_use]
    pub fn boot_config(&self) -> BootConfig {
        let steps = self
            .boot
            .steps
            .iter()
            .map(BootStepPolicy::to_step)
            .collect();
        BootConfig {
            script: BootScript::new(steps, ms(self.boot.settle_ms)),
            storage_key: self.boot.storage_key.clone(),
            ceiling_margin: ms(self.boot.ceiling_margin_ms),
        }
    }

    #[must_use]
    pub fn cursor_config(&self) -> CursorConfig {
        CursorConfig {
            reveal_delay: ms(self.cursor.reveal_delay_ms),
            ring: self.cursor.ring.params(),
            dot: self.cursor.dot.params(),
            ring_radius: self.cursor.ring_radius_px,
            dot_radius: self.cursor.dot_radius_px,
            ..CursorConfig::default()
        }
    }

    #[must_use]
    pub fn reveal_config(&self) -> RevealConfig {
        RevealConfig {
            threshold: self.reveal.threshold,
            root_margin: self.reveal.root_margin_px,
            once: self.reveal.once,
            delay_children: ms(self.reveal.delay_children_ms),
            stagger: ms(self.reveal.stagger_ms),
            child_duration: ms(self.reveal.child_duration_ms),
        }
    }

    #[must_use]
    pub fn nav_config(&self) -> NavConfig {
        NavConfig {
            scrolled_threshold: self.nav.scrolled_threshold_px,
            spy_offset: self.nav.spy_offset_px,
        }
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Scroll tracker parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct ScrollPolicy {
    /// Quiet period before `is_scrolling` clears.
    pub idle_timeout_ms: u64,
    /// Distance from the document end still counted as "at bottom".
    pub bottom_slack_px: f64,
}

impl Default for ScrollPolicy {
    fn default() -> Self {
        let defaults = ScrollConfig::default();
        Self {
            idle_timeout_ms: defaults.idle_timeout.as_millis() as u64,
            bottom_slack_px: defaults.bottom_slack,
        }
    }
}

/// Boot sequence parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct BootPolicy {
    /// Session storage key for the completion flag.
    pub storage_key: String,
    /// Extra time past the scripted total before the watchdog forces completion.
    pub ceiling_margin_ms: u64,
    /// Pause between the last stage and `Ready`.
    pub settle_ms: u64,
    pub steps: Vec<BootStepPolicy>,
}

impl Default for BootPolicy {
    fn default() -> Self {
        let defaults = BootConfig::default();
        Self {
            storage_key: defaults.storage_key,
            ceiling_margin_ms: defaults.ceiling_margin.as_millis() as u64,
            settle_ms: defaults.script.settle().as_millis() as u64,
            steps: defaults
                .script
                .steps()
                .iter()
                .map(BootStepPolicy::from_step)
                .collect(),
        }
    }
}

/// One boot stage.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct BootStepPolicy {
    pub delay_ms: u64,
    pub tag: Option<String>,
    pub message: Option<String>,
    pub details: Vec<String>,
    pub shows_cursor: bool,
}

impl BootStepPolicy {
    fn from_step(step: &BootStep) -> Self {
        let line = step.line.as_ref();
        Self {
            delay_ms: step.delay.as_millis() as u64,
            tag: line.and_then(|l| l.tag.clone()),
            message: line.map(|l| l.message.clone()),
            details: line.map(|l| l.details.clone()).unwrap_or_default(),
            shows_cursor: step.shows_cursor,
        }
    }

    fn to_step(&self) -> BootStep {
        let line = self.message.as_ref().map(|message| BootLine {
            tag: self.tag.clone(),
            message: message.clone(),
            details: self.details.clone(),
        });
        BootStep {
            delay: ms(self.delay_ms),
            line,
            shows_cursor: self.shows_cursor,
        }
    }
}

/// Spring parameters for one cursor overlay element.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
pub struct SpringPolicy {
    pub stiffness: f64,
    pub damping: f64,
    pub mass: f64,
}

impl SpringPolicy {
    fn params(self) -> SpringParams {
        SpringParams {
            stiffness: self.stiffness,
            damping: self.damping,
            mass: self.mass,
        }
    }
}

impl From<SpringParams> for SpringPolicy {
    fn from(p: SpringParams) -> Self {
        Self {
            stiffness: p.stiffness,
            damping: p.damping,
            mass: p.mass,
        }
    }
}

/// Cursor follower parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct CursorPolicy {
    pub reveal_delay_ms: u64,
    pub ring: SpringPolicy,
    pub dot: SpringPolicy,
    pub ring_radius_px: f64,
    pub dot_radius_px: f64,
}

impl Default for CursorPolicy {
    fn default() -> Self {
        let defaults = CursorConfig::default();
        Self {
            reveal_delay_ms: defaults.reveal_delay.as_millis() as u64,
            ring: defaults.ring.into(),
            dot: defaults.dot.into(),
            ring_radius_px: defaults.ring_radius,
            dot_radius_px: defaults.dot_radius,
        }
    }
}

/// Section reveal parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct RevealPolicy {
    pub threshold: f64,
    pub root_margin_px: f64,
    pub once: bool,
    pub delay_children_ms: u64,
    pub stagger_ms: u64,
    pub child_duration_ms: u64,
}

impl Default for RevealPolicy {
    fn default() -> Self {
        let defaults = RevealConfig::default();
        Self {
            threshold: defaults.threshold,
            root_margin_px: defaults.root_margin,
            once: defaults.once,
            delay_children_ms: defaults.delay_children.as_millis() as u64,
            stagger_ms: defaults.stagger.as_millis() as u64,
            child_duration_ms: defaults.child_duration.as_millis() as u64,
        }
    }
}

/// Navigation bar parameters.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "config-file", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config-file", serde(default))]
pub struct NavPolicy {
    pub scrolled_threshold_px: f64,
    pub spy_offset_px: f64,
}

impl Default for NavPolicy {
    fn default() -> Self {
        let defaults = NavConfig::default();
        Self {
            scrolled_threshold_px: defaults.scrolled_threshold,
            spy_offset_px: defaults.spy_offset,
        }
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

/// Errors that can occur when loading a configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// I/O error reading a file.
    Io(std::io::Error),
    /// TOML parse error.
    #[cfg(feature = "config-file")]
    Toml(toml::de::Error),
    /// JSON parse error.
    #[cfg(feature = "config-file")]
    Json(serde_json::Error),
    /// Validation errors.
    Validation(Vec<String>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => write!(f, "TOML parse error: {e}"),
            #[cfg(feature = "config-file")]
            Self::Json(e) => write!(f, "JSON parse error: {e}"),
            Self::Validation(errors) => {
                write!(f, "validation errors: {}", errors.join("; "))
            }
        }
    }
}

impl std::error::Error for ConfigError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Toml(e) => Some(e),
            #[cfg(feature = "config-file")]
            Self::Json(e) => Some(e),
            Self::Validation(_) => None,
        }
    }
}
