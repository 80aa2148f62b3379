//! macOS platform implementation.
//!
//! Subscriptions come from four places:
//! - `NSWorkspace` notification center: application launch/terminate, wake
//! - `NSDistributedNotificationCenter`: keyboard input source changes
//! - CoreGraphics display reconfiguration callback
//! - IOKit power source run loop source

mod display;
mod observe;
mod power;

pub use observe::{run_observer, stop_observer};
