//! Fallback for platforms without the notification sources the relay needs.

use crate::error::{Error, Result};
use crate::observer::EventHandler;
use std::sync::Arc;
use std::sync::atomic::AtomicBool;

pub fn run_observer<H: EventHandler + 'static>(
    _running: &Arc<AtomicBool>,
    _handler: H,
) -> Result<()> {
    Err(Error::NotSupported(
        "system notifications are only observed on macOS".into(),
    ))
}

pub fn stop_observer() -> Result<()> {
    Ok(())
}
