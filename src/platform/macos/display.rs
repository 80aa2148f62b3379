//! Display reconfiguration callback.

use super::observe::dispatch;
use crate::event::Event;
use crate::platform::reconfigure::ReconfigurationPass;
use objc2_core_graphics::{
    CGDirectDisplayID, CGDisplayChangeSummaryFlags, CGDisplayRegisterReconfigurationCallback,
    CGDisplayRemoveReconfigurationCallback, CGError,
};
use std::ffi::c_void;
use std::ptr::null_mut;

/// `kCGDisplayBeginConfigurationFlag`: sent before the change is applied.
const BEGIN_CONFIGURATION_FLAG: u32 = 1 << 0;

static PASS: ReconfigurationPass = ReconfigurationPass::new();

/// Called once per affected display, before and after the change.
unsafe extern "C-unwind" fn display_reconfigured(
    _display: CGDirectDisplayID,
    flags: CGDisplayChangeSummaryFlags,
    _user_info: *mut c_void,
) {
    if flags.0 & BEGIN_CONFIGURATION_FLAG != 0 {
        PASS.begin();
    } else if PASS.complete() {
        dispatch(&Event::display_configuration_changed());
    }
}

/// Register the callback. Returns whether CoreGraphics accepted it.
pub(super) fn register() -> bool {
    let status =
        unsafe { CGDisplayRegisterReconfigurationCallback(Some(display_reconfigured), null_mut()) };
    status == CGError::Success
}

pub(super) fn unregister() {
    let status =
        unsafe { CGDisplayRemoveReconfigurationCallback(Some(display_reconfigured), null_mut()) };
    if status != CGError::Success {
        log::warn!("failed to remove display reconfiguration callback: {:?}", status);
    }
}
