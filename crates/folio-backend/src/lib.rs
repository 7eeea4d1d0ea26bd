#![forbid(unsafe_code)]
#![doc = "Host boundary traits for folio: clock, session storage, pointer probing and native cursor control."]
#![doc = ""]
#![doc = "This crate defines the boundary between the folio runtime and the page"]
#![doc = "that embeds it (the browser via `folio-web`, or a headless host in tests)."]

use core::time::Duration;

pub use folio_core::cursor::{NativeCursorControl, PointerProbe};
pub use folio_core::session::{SessionStore, StoreError, StoreResult};

/// Monotonic clock abstraction.
///
/// The browser uses `performance.now()`; tests advance a virtual clock.
/// The runtime never reads wall-clock time directly.
pub trait BackendClock {
    /// Returns elapsed time since an unspecified epoch, monotonically increasing.
    fn now_mono(&self) -> Duration;
}

/// Page-facing half of the boundary: DOM queries and global style toggles.
///
/// Hosts are cheap handles; the runtime clones one into the cursor follower
/// so the native pointer is restored when the follower is dropped.
pub trait PageHost: PointerProbe + NativeCursorControl + Clone {}

impl<T: PointerProbe + NativeCursorControl + Clone> PageHost for T {}

/// Unified backend combining clock, session storage and page host.
pub trait Backend {
    /// Clock implementation.
    type Clock: BackendClock;

    /// Session-scoped storage handle. Clones address the same session.
    type Store: SessionStore + Clone;

    /// DOM access implementation.
    type Host: PageHost;

    /// Access the monotonic clock.
    fn clock(&self) -> &Self::Clock;

    /// A handle to the session store.
    fn store(&self) -> Self::Store;

    /// A handle to the page host.
    fn host(&self) -> Self::Host;
}

#[cfg(test)]
mod tests {
    use super::*;
    use folio_core::session::MemorySessionStore;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    // -----------------------------------------------------------------------
    // Test doubles
    // -----------------------------------------------------------------------

    struct FixedClock(Duration);

    impl BackendClock for FixedClock {
        fn now_mono(&self) -> Duration {
            self.0
        }
    }

    #[derive(Clone, Default)]
    struct NullHost {
        hidden: Rc<Cell<bool>>,
    }

    impl PointerProbe for NullHost {
        fn cursor_at(&self, _x: f64, _y: f64) -> Option<String> {
            None
        }
    }

    impl NativeCursorControl for NullHost {
        fn hide_native_cursor(&mut self) {
            self.hidden.set(true);
        }

        fn restore_native_cursor(&mut self) {
            self.hidden.set(false);
        }
    }

    struct TestBackend {
        clock: FixedClock,
        store: Rc<RefCell<MemorySessionStore>>,
        host: NullHost,
    }

    impl Backend for TestBackend {
        type Clock = FixedClock;
        type Store = Rc<RefCell<MemorySessionStore>>;
        type Host = NullHost;

        fn clock(&self) -> &Self::Clock {
            &self.clock
        }

        fn store(&self) -> Self::Store {
            Rc::clone(&self.store)
        }

        fn host(&self) -> Self::Host {
            self.host.clone()
        }
    }

    fn assert_page_host<H: PageHost>(_: &H) {}

    // -----------------------------------------------------------------------
    // Tests
    // -----------------------------------------------------------------------

    #[test]
    fn clock_reports_host_time() {
        let clock = FixedClock(Duration::from_millis(42));
        assert_eq!(clock.now_mono(), Duration::from_millis(42));
    }

    #[test]
    fn any_probe_with_cursor_control_is_a_page_host() {
        assert_page_host(&NullHost::default());
    }

    #[test]
    fn backend_exposes_shared_host_handles() {
        let backend = TestBackend {
            clock: FixedClock(Duration::ZERO),
            store: Rc::default(),
            host: NullHost::default(),
        };
        let mut handle = backend.host();
        handle.hide_native_cursor();
        assert!(backend.host.hidden.get());

        backend.store().set("k", "v").unwrap();
        assert_eq!(backend.store().get("k"), Ok(Some("v".into())));
        assert_eq!(backend.store.borrow().write_count(), 1);
        assert_eq!(backend.clock().now_mono(), Duration::ZERO);
    }
}
