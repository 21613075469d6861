//! Panic interception
//!
//! [`capture`] runs a unit of work under `catch_unwind`. A process-wide
//! panic hook, installed once, records the panic location and an unresolved
//! backtrace while a capture is active on the current thread; panics outside
//! any capture go to the previously installed hook untouched.

use backtrace::Backtrace;
use std::any::Any;
use std::cell::{Cell, RefCell};
use std::panic::{self, AssertUnwindSafe};
use std::sync::Once;

use super::stack;
use crate::models::{Frame, Site};

static INSTALL_HOOK: Once = Once::new();

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
    static PENDING: RefCell<Option<PendingPanic>> = const { RefCell::new(None) };
}

struct PendingPanic {
    origin: Option<Site>,
    backtrace: Backtrace,
}

/// A panic intercepted by [`capture`]
#[derive(Clone, Debug)]
pub struct RaisedFault {
    pub message: String,
    /// Location passed to the panic hook
    pub origin: Option<Site>,
    /// Address of the frame that raised the panic
    pub token: usize,
    /// Innermost first, without the runner's own frames
    pub frames: Vec<Frame>,
}

/// Run `work`, converting a panic into a [`RaisedFault`]
pub fn capture<R>(work: impl FnOnce() -> R) -> Result<R, RaisedFault> {
    install_hook();

    let outcome = {
        let _active = ActiveCapture::enter();
        panic::catch_unwind(AssertUnwindSafe(|| dispatch(work)))
    };

    outcome.map_err(|payload| {
        let pending = PENDING.with(|slot| slot.borrow_mut().take());
        let message = payload_message(payload.as_ref());
        match pending {
            Some(pending) => {
                let trimmed = stack::trim(stack::resolve(pending.backtrace));
                RaisedFault {
                    message,
                    origin: pending.origin,
                    token: trimmed.token,
                    frames: trimmed.frames,
                }
            }
            None => RaisedFault {
                message,
                origin: None,
                token: 0,
                frames: Vec::new(),
            },
        }
    })
}

/// Boundary frame between the runner and suite code.
///
/// Stack trimming drops this frame and everything outside it.
#[inline(never)]
fn dispatch<R>(work: impl FnOnce() -> R) -> R {
    let value = work();
    std::hint::black_box(value)
}

pub(crate) const DISPATCH_FRAME: &str = "suitecheck::fault::capture::dispatch";

fn install_hook() {
    INSTALL_HOOK.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if DEPTH.with(|depth| depth.get()) == 0 {
                previous(info);
                return;
            }
            let origin = info.location().map(Site::from_location);
            let backtrace = Backtrace::new_unresolved();
            PENDING.with(|slot| {
                *slot.borrow_mut() = Some(PendingPanic { origin, backtrace });
            });
        }));
    });
}

/// Marks the current thread as capturing for its lifetime
struct ActiveCapture;

impl ActiveCapture {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        ActiveCapture
    }
}

impl Drop for ActiveCapture {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

fn payload_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "Box<dyn Any>".to_string()
    }
}
