#![forbid(unsafe_code)]

//! Browser bindings over `js_sys::Reflect`.
//!
//! Only compiled on `wasm32`. Globals are looked up by name through
//! reflection so the crate does not depend on `web-sys` feature flags.
//! Every failure (missing global, thrown exception, wrong type) degrades:
//! storage reports [`StoreError`], hit testing reports no keyword, cursor
//! toggles become no-ops.

use folio_backend::{NativeCursorControl, PointerProbe, SessionStore, StoreError, StoreResult};
use js_sys::{Array, Function, Reflect};
use wasm_bindgen::{JsCast, JsValue};

fn global_property(name: &str) -> Option<JsValue> {
    Reflect::get(&js_sys::global(), &JsValue::from_str(name))
        .ok()
        .filter(|value| !value.is_undefined() && !value.is_null())
}

fn call_method(target: &JsValue, name: &str, args: &[JsValue]) -> Result<JsValue, JsValue> {
    let method = Reflect::get(target, &JsValue::from_str(name))?;
    let method: Function = method
        .dyn_into()
        .map_err(|_| JsValue::from_str("not a function"))?;
    let argv = Array::new();
    for arg in args {
        argv.push(arg);
    }
    method.apply(target, &argv)
}

fn describe(err: &JsValue) -> String {
    err.as_string().unwrap_or_else(|| format!("{err:?}"))
}

// ---------------------------------------------------------------------------
// sessionStorage
// ---------------------------------------------------------------------------

/// Handle to `window.sessionStorage`.
///
/// Resolved on every call: reading the property itself throws in sandboxed
/// frames, and that must surface as [`StoreError::Unavailable`].
#[derive(Debug, Clone, Copy, Default)]
pub struct DomSessionStore;

impl DomSessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn storage() -> StoreResult<JsValue> {
        global_property("sessionStorage").ok_or(StoreError::Unavailable)
    }
}

impl SessionStore for DomSessionStore {
    fn get(&self, key: &str) -> StoreResult<Option<String>> {
        let storage = Self::storage()?;
        let value = call_method(&storage, "getItem", &[JsValue::from_str(key)])
            .map_err(|err| StoreError::Rejected(describe(&err)))?;
        Ok(value.as_string())
    }

    fn set(&mut self, key: &str, value: &str) -> StoreResult<()> {
        let storage = Self::storage()?;
        call_method(
            &storage,
            "setItem",
            &[JsValue::from_str(key), JsValue::from_str(value)],
        )
        .map(drop)
        .map_err(|err| StoreError::Rejected(describe(&err)))
    }

    fn clear(&mut self, key: &str) -> StoreResult<()> {
        let storage = Self::storage()?;
        call_method(&storage, "removeItem", &[JsValue::from_str(key)])
            .map(drop)
            .map_err(|err| StoreError::Rejected(describe(&err)))
    }
}

// ---------------------------------------------------------------------------
// Document host
// ---------------------------------------------------------------------------

/// Page host over `document` and `getComputedStyle`.
#[derive(Debug, Clone, Default)]
pub struct DomHost;

impl DomHost {
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Inline `cursor` style on `document.body`, if any.
    #[must_use]
    pub fn body_cursor(&self) -> Option<String> {
        let document = global_property("document")?;
        let body = Reflect::get(&document, &JsValue::from_str("body")).ok()?;
        if body.is_null() || body.is_undefined() {
            return None;
        }
        let style = Reflect::get(&body, &JsValue::from_str("style")).ok()?;
        Reflect::get(&style, &JsValue::from_str("cursor"))
            .ok()?
            .as_string()
            .filter(|value| !value.is_empty())
    }

    fn set_body_cursor(&self, value: &str) {
        let Some(document) = global_property("document") else {
            return;
        };
        let Ok(body) = Reflect::get(&document, &JsValue::from_str("body")) else {
            return;
        };
        if body.is_null() || body.is_undefined() {
            return;
        }
        let Ok(style) = Reflect::get(&body, &JsValue::from_str("style")) else {
            return;
        };
        if Reflect::set(&style, &JsValue::from_str("cursor"), &JsValue::from_str(value)).is_err() {
            #[cfg(feature = "tracing")]
            tracing::warn!(cursor = value, "could not set body cursor style");
        }
    }
}

impl PointerProbe for DomHost {
    fn cursor_at(&self, x: f64, y: f64) -> Option<String> {
        let document = global_property("document")?;
        let element = call_method(
            &document,
            "elementFromPoint",
            &[JsValue::from_f64(x), JsValue::from_f64(y)],
        )
        .ok()?;
        if element.is_null() || element.is_undefined() {
            return None;
        }
        let style = call_method(&js_sys::global(), "getComputedStyle", &[element]).ok()?;
        Reflect::get(&style, &JsValue::from_str("cursor"))
            .ok()?
            .as_string()
    }
}

impl NativeCursorControl for DomHost {
    fn hide_native_cursor(&mut self) {
        self.set_body_cursor("none");
    }

    fn restore_native_cursor(&mut self) {
        self.set_body_cursor("auto");
    }
}
