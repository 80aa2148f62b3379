//! Event types reported by the notification observer.

use std::time::SystemTime;

/// The kind of operating-system occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Observer has registered its subscriptions and entered the run loop.
    ObserverEnabled,
    /// Observer left the run loop and removed its subscriptions.
    ObserverDisabled,

    /// An application finished launching.
    ApplicationLaunched,
    /// An application terminated.
    ApplicationTerminated,

    /// The system resumed from sleep.
    SystemWoke,
    /// The selected keyboard input source changed.
    InputSourceChanged,
    /// A display was added, removed, moved or reconfigured.
    DisplayConfigurationChanged,
    /// The providing power source switched (AC, battery, UPS).
    PowerSourceChanged,
}

/// Application details attached to launch/terminate events.
///
/// Only used for diagnostics; none of it goes over the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppData {
    /// Process identifier.
    pub pid: i32,
    /// Bundle identifier, if the application has one.
    pub bundle_id: Option<String>,
    /// Localized application name.
    pub name: Option<String>,
}

/// A single observed occurrence.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// The type of event.
    pub event_type: EventType,
    /// Timestamp when the event was observed.
    pub time: SystemTime,
    /// Application data for launch/terminate events.
    pub app: Option<AppData>,
}

impl Event {
    /// Create a new event with the given type and current timestamp.
    pub fn new(event_type: EventType) -> Self {
        Self {
            event_type,
            time: SystemTime::now(),
            app: None,
        }
    }

    pub fn observer_enabled() -> Self {
        Self::new(EventType::ObserverEnabled)
    }

    pub fn observer_disabled() -> Self {
        Self::new(EventType::ObserverDisabled)
    }

    /// Create an application launched event.
    pub fn application_launched(app: Option<AppData>) -> Self {
        let mut event = Self::new(EventType::ApplicationLaunched);
        event.app = app;
        event
    }

    /// Create an application terminated event.
    pub fn application_terminated(app: Option<AppData>) -> Self {
        let mut event = Self::new(EventType::ApplicationTerminated);
        event.app = app;
        event
    }

    pub fn system_woke() -> Self {
        Self::new(EventType::SystemWoke)
    }

    pub fn input_source_changed() -> Self {
        Self::new(EventType::InputSourceChanged)
    }

    pub fn display_configuration_changed() -> Self {
        Self::new(EventType::DisplayConfigurationChanged)
    }

    pub fn power_source_changed() -> Self {
        Self::new(EventType::PowerSourceChanged)
    }

    /// Check if this is an application lifecycle event.
    pub fn is_application(&self) -> bool {
        matches!(
            self.event_type,
            EventType::ApplicationLaunched | EventType::ApplicationTerminated
        )
    }
}
