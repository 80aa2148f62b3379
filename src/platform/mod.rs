//! Platform-specific implementations.

mod reconfigure;

#[cfg(target_os = "macos")]
mod macos;
#[cfg(target_os = "macos")]
pub use macos::*;

#[cfg(not(target_os = "macos"))]
mod unsupported;
#[cfg(not(target_os = "macos"))]
pub use unsupported::*;

// The helper socket is a Unix domain socket
#[cfg(not(unix))]
compile_error!("sketchyrelay only supports Unix platforms");
