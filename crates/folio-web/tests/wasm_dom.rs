#![cfg(target_arch = "wasm32")]
#![forbid(unsafe_code)]

use folio_backend::{NativeCursorControl, PointerProbe, SessionStore};
use folio_web::dom::{DomHost, DomSessionStore};
use wasm_bindgen_test::{wasm_bindgen_test, wasm_bindgen_test_configure};

wasm_bindgen_test_configure!(run_in_browser);

#[wasm_bindgen_test]
fn session_storage_round_trip() {
    let mut store = DomSessionStore::new();
    store.clear("folio.test").unwrap();
    assert_eq!(store.get("folio.test"), Ok(None));
    store.set("folio.test", "true").unwrap();
    assert_eq!(store.get("folio.test"), Ok(Some("true".to_owned())));
    store.clear("folio.test").unwrap();
    assert_eq!(store.get("folio.test"), Ok(None));
}

#[wasm_bindgen_test]
fn body_cursor_toggles() {
    let mut host = DomHost::new();
    host.hide_native_cursor();
    assert_eq!(host.body_cursor().as_deref(), Some("none"));
    host.restore_native_cursor();
    assert_eq!(host.body_cursor().as_deref(), Some("auto"));
    // Off-screen points hit nothing.
    assert_eq!(host.cursor_at(-10_000.0, -10_000.0), None);
}
