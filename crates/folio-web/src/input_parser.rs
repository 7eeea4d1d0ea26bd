#![forbid(unsafe_code)]

//! JSON input parser for converting host-encoded page inputs to
//! [`PageEvent`] values.
//!
//! The embedding page serializes each DOM callback as one JSON object:
//!
//! ```json
//! {"kind":"scroll","t_ms":12.5,"scroll_y":40,"viewport_height":800,"document_height":2000}
//! {"kind":"resize","t_ms":13.0,"scroll_y":40,"viewport_height":700,"document_height":2000}
//! {"kind":"pointer","t_ms":20.0,"x":120,"y":340}
//! {"kind":"frame","t_ms":16.7}
//! ```
//!
//! Kinds the runtime has no use for (focus, keyboard, touch) parse to
//! `Ok(None)` so hosts can forward their whole stream.
//!
//! # Design
//!
//! This parser lives in `folio-web` so the wasm runner and native replay
//! tools share one schema. It uses `serde_json` and is feature-gated behind
//! `input-parser`.

use core::time::Duration;

use folio_core::event::PageEvent;
use folio_core::scroll::ScrollMetrics;
use serde::Deserialize;

use crate::duration_from_ms;

/// Errors from parsing encoded input JSON.
#[derive(Debug, Clone, PartialEq)]
pub enum InputParseError {
    /// Malformed JSON.
    Json(String),
    /// Missing required field.
    MissingField(&'static str),
    /// Timestamp is negative.
    InvalidTimestamp(f64),
}

impl core::fmt::Display for InputParseError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::Json(msg) => write!(f, "JSON parse error: {msg}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::InvalidTimestamp(t) => write!(f, "invalid timestamp: {t}"),
        }
    }
}

impl std::error::Error for InputParseError {}

/// A parsed input with the host time it was observed at.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostInput {
    pub at: Duration,
    pub event: PageEvent,
}

/// Internal deserialization target matching the host schema.
#[derive(Debug, Deserialize)]
struct RawInput {
    kind: String,
    #[serde(default)]
    t_ms: Option<f64>,
    #[serde(default)]
    scroll_y: Option<f64>,
    #[serde(default)]
    viewport_height: Option<f64>,
    #[serde(default)]
    document_height: Option<f64>,
    #[serde(default)]
    x: Option<f64>,
    #[serde(default)]
    y: Option<f64>,
}

/// Parse one JSON-encoded host input.
///
/// Returns `Ok(None)` for kinds without a [`PageEvent`] equivalent and
/// `Err` for malformed JSON or missing required fields.
pub fn parse_host_input(json: &str) -> Result<Option<HostInput>, InputParseError> {
    let raw: RawInput =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    convert(&raw)
}

/// Parse a JSON array of host inputs, skipping kinds without a mapping.
///
/// The first invalid entry fails the whole batch.
pub fn parse_host_input_batch(json: &str) -> Result<Vec<HostInput>, InputParseError> {
    let raws: Vec<RawInput> =
        serde_json::from_str(json).map_err(|e| InputParseError::Json(e.to_string()))?;
    let mut inputs = Vec::with_capacity(raws.len());
    for raw in &raws {
        if let Some(input) = convert(raw)? {
            inputs.push(input);
        }
    }
    Ok(inputs)
}

fn convert(raw: &RawInput) -> Result<Option<HostInput>, InputParseError> {
    let event = match raw.kind.as_str() {
        "scroll" => PageEvent::Scroll(parse_metrics(raw)?),
        "resize" => PageEvent::Resize(parse_metrics(raw)?),
        "pointer" | "pointermove" => PageEvent::PointerMove {
            x: raw.x.ok_or(InputParseError::MissingField("x"))?,
            y: raw.y.ok_or(InputParseError::MissingField("y"))?,
        },
        "frame" => PageEvent::Frame,
        _ => return Ok(None),
    };
    let at = parse_timestamp(raw.t_ms)?;
    Ok(Some(HostInput { at, event }))
}

fn parse_timestamp(t_ms: Option<f64>) -> Result<Duration, InputParseError> {
    let t = t_ms.ok_or(InputParseError::MissingField("t_ms"))?;
    duration_from_ms(t).ok_or(InputParseError::InvalidTimestamp(t))
}

fn parse_metrics(raw: &RawInput) -> Result<ScrollMetrics, InputParseError> {
    Ok(ScrollMetrics::new(
        raw.scroll_y
            .ok_or(InputParseError::MissingField("scroll_y"))?,
        raw.viewport_height
            .ok_or(InputParseError::MissingField("viewport_height"))?,
        raw.document_height
            .ok_or(InputParseError::MissingField("document_height"))?,
    ))
}
