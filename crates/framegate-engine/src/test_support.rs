//! Fake native context shared by the unit tests.

use std::ffi::{CStr, c_void};
use std::ptr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, ThreadId};

use parking_lot::Mutex;

use crate::surface::{NativeContext, NativeError, SurfaceSize};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FakeEvent {
    MakeCurrent(ThreadId),
    MakeNotCurrent(ThreadId),
    Swap(ThreadId),
    Resize(SurfaceSize),
}

#[derive(Default)]
struct Shared {
    events: Mutex<Vec<FakeEvent>>,
    current_on: Mutex<Option<ThreadId>>,
    swaps_while_not_current: Mutex<usize>,
    fail_make_current: AtomicBool,
    fail_make_not_current: AtomicBool,
    dropped: AtomicBool,
}

/// Records every native call and which thread made it.
pub struct FakeContext {
    shared: Arc<Shared>,
}

/// Test-side view of a [`FakeContext`] after it has been boxed away.
#[derive(Clone)]
pub struct FakeProbe {
    shared: Arc<Shared>,
}

impl FakeContext {
    pub fn new() -> (Self, FakeProbe) {
        let shared = Arc::new(Shared::default());
        (
            Self {
                shared: Arc::clone(&shared),
            },
            FakeProbe { shared },
        )
    }

    fn record(&self, event: FakeEvent) {
        self.shared.events.lock().push(event);
    }
}

impl NativeContext for FakeContext {
    fn make_current(&mut self) -> Result<(), NativeError> {
        if self.shared.fail_make_current.load(Ordering::SeqCst) {
            return Err(NativeError::new("make_current", "fake driver refused"));
        }
        let me = thread::current().id();
        *self.shared.current_on.lock() = Some(me);
        self.record(FakeEvent::MakeCurrent(me));
        Ok(())
    }

    fn make_not_current(&mut self) -> Result<(), NativeError> {
        if self.shared.fail_make_not_current.load(Ordering::SeqCst) {
            return Err(NativeError::new("make_not_current", "fake driver refused"));
        }
        let me = thread::current().id();
        *self.shared.current_on.lock() = None;
        self.record(FakeEvent::MakeNotCurrent(me));
        Ok(())
    }

    fn swap_buffers(&mut self) -> Result<(), NativeError> {
        let me = thread::current().id();
        if *self.shared.current_on.lock() != Some(me) {
            *self.shared.swaps_while_not_current.lock() += 1;
        }
        self.record(FakeEvent::Swap(me));
        Ok(())
    }

    fn resize(&mut self, size: SurfaceSize) {
        self.record(FakeEvent::Resize(size));
    }

    fn proc_address(&self, _name: &CStr) -> *const c_void {
        ptr::null()
    }
}

impl Drop for FakeContext {
    fn drop(&mut self) {
        self.shared.dropped.store(true, Ordering::SeqCst);
    }
}

impl FakeProbe {
    pub fn events(&self) -> Vec<FakeEvent> {
        self.shared.events.lock().clone()
    }

    pub fn count(&self, pred: impl Fn(&FakeEvent) -> bool) -> usize {
        self.shared.events.lock().iter().filter(|e| pred(e)).count()
    }

    pub fn resizes(&self) -> Vec<SurfaceSize> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                FakeEvent::Resize(size) => Some(size),
                _ => None,
            })
            .collect()
    }

    pub fn swaps_while_not_current(&self) -> usize {
        *self.shared.swaps_while_not_current.lock()
    }

    pub fn fail_make_current(&self, fail: bool) {
        self.shared.fail_make_current.store(fail, Ordering::SeqCst);
    }

    pub fn fail_make_not_current(&self, fail: bool) {
        self.shared.fail_make_not_current.store(fail, Ordering::SeqCst);
    }

    pub fn dropped(&self) -> bool {
        self.shared.dropped.load(Ordering::SeqCst)
    }
}
