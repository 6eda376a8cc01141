//! Allocation error handlers.
//!
//! Every fallible vector operation reports an allocation failure to the
//! handle's [`ErrorHandler`] before returning the error. The default
//! handler treats the failure as fatal: it prints which operation failed
//! and aborts the process. A custom handler can record the error instead,
//! in which case the operation returns `Err` and the handle keeps its
//! previous, still-valid block.

use std::fmt;
use std::rc::Rc;

use vecbase_core::VectorError;

/// Callback invoked with every allocation failure of a handle.
///
/// Cheap to clone: cloned vectors share the same callback. Context the
/// callback needs (a counter, a log buffer) is captured by the closure.
#[derive(Clone, Default)]
pub struct ErrorHandler {
    callback: Option<Rc<dyn Fn(&VectorError)>>,
}

impl ErrorHandler {
    /// The default handler: print a diagnostic to stderr and abort.
    pub fn abort() -> Self {
        Self { callback: None }
    }

    /// A handler that calls `callback` and lets the operation return `Err`.
    pub fn new(callback: impl Fn(&VectorError) + 'static) -> Self {
        Self {
            callback: Some(Rc::new(callback)),
        }
    }

    /// Whether this is the aborting default handler.
    pub fn is_abort(&self) -> bool {
        self.callback.is_none()
    }

    /// Report `error`. Returns only if a custom callback is installed.
    pub fn handle(&self, error: &VectorError) {
        match &self.callback {
            Some(callback) => callback(error),
            None => abort_on(error),
        }
    }
}

impl fmt::Debug for ErrorHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = if self.is_abort() { "abort" } else { "custom" };
        f.debug_tuple("ErrorHandler").field(&kind).finish()
    }
}

/// The line the default handler prints before aborting.
fn abort_diagnostic(error: &VectorError) -> String {
    format!("vecbase: {error}, aborting")
}

#[cold]
#[inline(never)]
fn abort_on(error: &VectorError) -> ! {
    eprintln!("{}", abort_diagnostic(error));
    std::process::abort()
}
