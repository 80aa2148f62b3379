//! Collapsing per-display reconfiguration callbacks into one occurrence.
//!
//! CoreGraphics calls the reconfiguration callback for every affected
//! display, first with the begin flag and again once the change is applied.
//! One pass of begin calls arms the tracker; the first completion after it
//! reports the change and the rest of that pass is swallowed.

#![cfg_attr(not(target_os = "macos"), allow(dead_code))]

use std::sync::atomic::{AtomicBool, Ordering};

#[derive(Debug, Default)]
pub struct ReconfigurationPass {
    armed: AtomicBool,
}

impl ReconfigurationPass {
    pub const fn new() -> Self {
        Self {
            armed: AtomicBool::new(false),
        }
    }

    /// A display is about to be reconfigured.
    pub fn begin(&self) {
        self.armed.store(true, Ordering::SeqCst);
    }

    /// A display finished reconfiguring. Returns `true` for the first
    /// completion of a pass only.
    pub fn complete(&self) -> bool {
        self.armed.swap(false, Ordering::SeqCst)
    }
}
