//! IOKit power source notifications.
//!
//! IOKit fires on every power source update, including battery level
//! changes. Only a switch of the providing source (AC, battery, UPS) is
//! reported.

use super::observe::dispatch;
use crate::event::Event;
use objc2_core_foundation::{
    CFRetained, CFRunLoop, CFRunLoopSource, CFString, CFType, kCFRunLoopCommonModes,
};
use std::ffi::c_void;
use std::ptr::{NonNull, null_mut};
use std::sync::Mutex;

type IOPowerSourceCallbackType = unsafe extern "C-unwind" fn(context: *mut c_void);

#[link(name = "IOKit", kind = "framework")]
unsafe extern "C-unwind" {
    fn IOPSNotificationCreateRunLoopSource(
        callback: IOPowerSourceCallbackType,
        context: *mut c_void,
    ) -> *mut c_void;
    fn IOPSCopyPowerSourcesInfo() -> *mut c_void;
    fn IOPSGetProvidingPowerSourceType(snapshot: *const c_void) -> *const c_void;
}

/// Last providing power source type seen ("AC Power", "Battery Power", ...).
static LAST_SOURCE: Mutex<Option<String>> = Mutex::new(None);

/// Query the current providing power source type.
fn providing_source() -> Option<String> {
    unsafe {
        let snapshot = NonNull::new(IOPSCopyPowerSourcesInfo().cast::<CFType>())?;
        let snapshot: CFRetained<CFType> = CFRetained::from_raw(snapshot);
        // Get rule: owned by the snapshot, which outlives this borrow.
        let source = IOPSGetProvidingPowerSourceType(
            (&*snapshot as *const CFType).cast::<c_void>(),
        )
        .cast::<CFString>();
        source.as_ref().map(|s| s.to_string())
    }
}

/// Record `current` and report whether it differs from the previous value.
fn record_source(current: Option<String>) -> bool {
    let Ok(mut last) = LAST_SOURCE.lock() else {
        return true;
    };
    if *last == current {
        return false;
    }
    log::debug!("power source changed: {:?} -> {:?}", *last, current);
    *last = current;
    true
}

unsafe extern "C-unwind" fn power_sources_changed(_context: *mut c_void) {
    if record_source(providing_source()) {
        dispatch(&Event::power_source_changed());
    }
}

/// Power source run loop source, attached to one run loop.
pub(super) struct PowerSourceWatch {
    source: CFRetained<CFRunLoopSource>,
}

impl PowerSourceWatch {
    /// Create the IOKit source and attach it to `run_loop`.
    pub(super) fn install(run_loop: &CFRunLoop) -> Option<Self> {
        record_source(providing_source());

        let source = unsafe {
            let raw = IOPSNotificationCreateRunLoopSource(power_sources_changed, null_mut());
            CFRetained::from_raw(NonNull::new(raw.cast::<CFRunLoopSource>())?)
        };
        unsafe { run_loop.add_source(Some(&source), kCFRunLoopCommonModes) };
        Some(Self { source })
    }

    pub(super) fn uninstall(self, run_loop: &CFRunLoop) {
        unsafe { run_loop.remove_source(Some(&self.source), kCFRunLoopCommonModes) };
    }
}
