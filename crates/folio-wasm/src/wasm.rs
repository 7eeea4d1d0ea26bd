#![forbid(unsafe_code)]

//! `wasm-bindgen` exports for the PortfolioRunner.
//!
//! This module wraps [`super::runner_core::RunnerCore`] with JS-friendly types.
//! Only compiled on `wasm32` targets.

use folio_core::cursor::NativeCursorControl;
use folio_core::event::PageEvent;
use folio_core::scroll::ScrollMetrics;
use folio_web::dom::{DomHost, DomSessionStore};
use js_sys::{Array, Object, Reflect};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

use super::runner_core::RunnerCore;

fn console_error(msg: &str) {
    let global = js_sys::global();
    let Ok(console) = Reflect::get(&global, &"console".into()) else {
        return;
    };
    let Ok(error) = Reflect::get(&console, &"error".into()) else {
        return;
    };
    let Ok(error_fn) = error.dyn_into::<js_sys::Function>() else {
        return;
    };
    let _ = error_fn.call1(&console, &JsValue::from_str(msg));
}

/// Release builds abort on panic, so no guard gets to run `Drop`. Put the
/// native pointer back before reporting.
fn report_panic(msg: &str) {
    DomHost::new().restore_native_cursor();
    console_error(msg);
}

fn install_panic_hook() {
    use std::sync::Once;

    static ONCE: Once = Once::new();
    ONCE.call_once(|| {
        std::panic::set_hook(Box::new(|info| {
            let msg = if let Some(loc) = info.location() {
                format!(
                    "panic at {}:{}:{}: {info}",
                    loc.file(),
                    loc.line(),
                    loc.column()
                )
            } else {
                format!("panic: {info}")
            };
            report_panic(&msg);
        }));
    });
}

fn set_js(obj: &Object, key: &str, value: JsValue) {
    let _ = Reflect::set(obj, &JsValue::from_str(key), &value);
}

/// Page runner for the portfolio site.
///
/// Host-driven: JavaScript forwards `scroll`, `resize` and `pointermove`
/// callbacks and calls [`step`](Self::step) from `requestAnimationFrame`.
#[wasm_bindgen]
pub struct PortfolioRunner {
    inner: RunnerCore<DomSessionStore, DomHost>,
}

#[wasm_bindgen(start)]
pub fn wasm_start() {
    install_panic_hook();
}

#[wasm_bindgen]
impl PortfolioRunner {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        install_panic_hook();
        Self {
            inner: RunnerCore::new(DomSessionStore::new(), DomHost::new()),
        }
    }

    /// Apply a JSON policy document. Must be called before `mount`.
    pub fn configure(&mut self, json: &str) -> bool {
        match self.inner.configure_json(json) {
            Ok(()) => true,
            Err(err) => {
                console_error(&format!("folio configure failed: {err}"));
                false
            }
        }
    }

    /// Mount at the page root with the initial layout.
    pub fn mount(
        &mut self,
        now_ms: f64,
        scroll_y: f64,
        viewport_height: f64,
        document_height: f64,
    ) {
        self.inner.set_time_ms(now_ms);
        self.inner.mount(scroll_y, viewport_height, document_height);
    }

    /// Set the clock from `performance.now()`.
    #[wasm_bindgen(js_name = setTime)]
    pub fn set_time(&mut self, now_ms: f64) {
        self.inner.set_time_ms(now_ms);
    }

    /// Advance the clock by `dt_ms` milliseconds.
    #[wasm_bindgen(js_name = advanceTime)]
    pub fn advance_time(&mut self, dt_ms: f64) {
        self.inner.advance_time_ms(dt_ms);
    }

    /// Parse a JSON-encoded input and queue it.
    /// Returns `true` if accepted, `false` if unsupported/malformed.
    #[wasm_bindgen(js_name = pushEncodedInput)]
    pub fn push_encoded_input(&mut self, json: &str) -> bool {
        self.inner.push_encoded_input(json)
    }

    #[wasm_bindgen(js_name = onScroll)]
    pub fn on_scroll(&mut self, scroll_y: f64, viewport_height: f64, document_height: f64) {
        self.inner.push_event(PageEvent::Scroll(ScrollMetrics::new(
            scroll_y,
            viewport_height,
            document_height,
        )));
    }

    #[wasm_bindgen(js_name = onResize)]
    pub fn on_resize(&mut self, scroll_y: f64, viewport_height: f64, document_height: f64) {
        self.inner.push_event(PageEvent::Resize(ScrollMetrics::new(
            scroll_y,
            viewport_height,
            document_height,
        )));
    }

    #[wasm_bindgen(js_name = onPointerMove)]
    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.inner.push_event(PageEvent::PointerMove { x, y });
    }

    #[wasm_bindgen(js_name = registerSection)]
    pub fn register_section(&mut self, id: &str, top: f64, height: f64) -> bool {
        self.inner.register_section(id, top, height)
    }

    /// Process queued input and one animation frame.
    ///
    /// Returns `{ mounted, events_processed, boot_ready }`.
    pub fn step(&mut self) -> JsValue {
        let result = self.inner.step();
        let obj = Object::new();
        set_js(&obj, "mounted", result.mounted.into());
        set_js(
            &obj,
            "events_processed",
            JsValue::from_f64(f64::from(result.events_processed)),
        );
        set_js(&obj, "boot_ready", result.boot_ready.into());
        obj.into()
    }

    #[wasm_bindgen(js_name = sectionProgress)]
    pub fn section_progress(&self, id: &str, index: u32) -> f64 {
        f64::from(self.inner.section_progress(id, index as usize))
    }

    /// Full state snapshot as a JS object.
    pub fn snapshot(&self) -> JsValue {
        js_sys::JSON::parse(&self.inner.snapshot_json()).unwrap_or(JsValue::NULL)
    }

    /// Full state snapshot as a JSON string.
    #[wasm_bindgen(js_name = snapshotJson)]
    pub fn snapshot_json(&self) -> String {
        self.inner.snapshot_json()
    }

    /// Drain runner logs as an array of strings.
    #[wasm_bindgen(js_name = takeLogs)]
    pub fn take_logs(&mut self) -> Array {
        let arr = Array::new();
        for line in self.inner.take_logs() {
            arr.push(&JsValue::from_str(&line));
        }
        arr
    }

    /// Tear down: cancel timers and restore the native cursor.
    pub fn unmount(&mut self) {
        self.inner.unmount();
    }
}

impl Default for PortfolioRunner {
    fn default() -> Self {
        Self::new()
    }
}
