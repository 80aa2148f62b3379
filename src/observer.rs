//! Main Observer struct and EventHandler trait.

use crate::error::{Error, Result};
use crate::event::Event;
use crate::platform;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Trait for handling observed system events.
///
/// Implement this trait to receive events from the observer. Handlers are
/// invoked on the thread running the notification run loop and should return
/// quickly.
pub trait EventHandler: Send + Sync {
    /// Called when a system event occurs.
    fn handle_event(&self, event: &Event);
}

/// Implement EventHandler for closures.
impl<F> EventHandler for F
where
    F: Fn(&Event) + Send + Sync,
{
    fn handle_event(&self, event: &Event) {
        self(event);
    }
}

/// Notification observer that subscribes to application, wake, input
/// source, display and power notifications.
pub struct Observer {
    running: Arc<AtomicBool>,
}

impl Default for Observer {
    fn default() -> Self {
        Self::new()
    }
}

impl Observer {
    /// Create a new Observer instance.
    pub fn new() -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Register every subscription and run the notification loop (blocking).
    ///
    /// Blocks the current thread until `stop()` is called from another
    /// thread. On macOS workspace notifications are delivered to the main
    /// run loop, so call this from the main thread.
    pub fn run<H: EventHandler + 'static>(&self, handler: H) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(Error::AlreadyRunning);
        }

        let result = platform::run_observer(&self.running, handler);

        self.running.store(false, Ordering::SeqCst);
        result
    }

    /// Stop the observer.
    pub fn stop(&self) -> Result<()> {
        if !self.running.swap(false, Ordering::SeqCst) {
            return Err(Error::NotRunning);
        }

        platform::stop_observer()
    }

    /// Check if the observer is currently running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

impl Drop for Observer {
    fn drop(&mut self) {
        if self.is_running() {
            let _ = self.stop();
        }
    }
}

/// Convenience function to start observing system events.
///
/// Blocks until the observer is stopped externally or an error occurs.
///
/// # Example
///
/// ```no_run
/// use sketchyrelay::{observe, Event, EventType};
///
/// observe(|event: &Event| {
///     if event.event_type == EventType::ApplicationLaunched {
///         if let Some(app) = &event.app {
///             println!("launched: {:?}", app.name);
///         }
///     }
/// }).expect("Failed to start observer");
/// ```
pub fn observe<F>(callback: F) -> Result<()>
where
    F: Fn(&Event) + Send + Sync + 'static,
{
    let observer = Observer::new();
    observer.run(callback)
}
