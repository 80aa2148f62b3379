//! Mapping from observed events to outgoing messages and their timing.
//!
//! Application launch and termination notifications can arrive before the
//! window server has settled, so the same idempotent message is repeated a
//! little later to let the consumer re-sample settled state.

use crate::event::EventType;
use crate::message::Message;
use std::time::Duration;

/// Re-send offsets after an application launch.
pub const LAUNCH_RESEND_DELAYS: [Duration; 2] =
    [Duration::from_millis(200), Duration::from_millis(500)];

/// Re-send offsets after an application termination.
pub const TERMINATE_RESEND_DELAYS: [Duration; 1] = [Duration::from_millis(200)];

/// What to send for one occurrence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Delivery {
    /// Message sent immediately and on every re-send.
    pub message: Message,
    /// Offsets, measured from the immediate send, of each re-send.
    pub resend_after: &'static [Duration],
}

impl Delivery {
    const fn once(message: Message) -> Self {
        Self {
            message,
            resend_after: &[],
        }
    }

    /// Total number of sends, the immediate one included.
    pub fn sends(&self) -> usize {
        1 + self.resend_after.len()
    }
}

/// Look up the delivery for an event type.
///
/// Observer lifecycle markers produce nothing.
pub fn delivery_for(event_type: EventType) -> Option<Delivery> {
    match event_type {
        EventType::ApplicationLaunched => Some(Delivery {
            message: Message::WorkspaceChanged,
            resend_after: &LAUNCH_RESEND_DELAYS,
        }),
        EventType::ApplicationTerminated => Some(Delivery {
            message: Message::WorkspaceChanged,
            resend_after: &TERMINATE_RESEND_DELAYS,
        }),
        EventType::SystemWoke => Some(Delivery::once(Message::SystemWake)),
        EventType::InputSourceChanged => Some(Delivery::once(Message::InputSourceChanged)),
        EventType::DisplayConfigurationChanged => {
            Some(Delivery::once(Message::DisplayConfigurationChanged))
        }
        EventType::PowerSourceChanged => Some(Delivery::once(Message::PowerSourceChanged)),
        EventType::ObserverEnabled | EventType::ObserverDisabled => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_application_events_repeat() {
        let launch = delivery_for(EventType::ApplicationLaunched).unwrap();
        assert_eq!(launch.message, Message::WorkspaceChanged);
        assert_eq!(
            launch.resend_after,
            &[Duration::from_millis(200), Duration::from_millis(500)]
        );
        assert_eq!(launch.sends(), 3);

        let terminate = delivery_for(EventType::ApplicationTerminated).unwrap();
        assert_eq!(terminate.message, Message::WorkspaceChanged);
        assert_eq!(terminate.resend_after, &[Duration::from_millis(200)]);
        assert_eq!(terminate.sends(), 2);
    }

    #[test]
    fn test_system_events_send_once() {
        let table = [
            (EventType::SystemWoke, Message::SystemWake),
            (EventType::InputSourceChanged, Message::InputSourceChanged),
            (
                EventType::DisplayConfigurationChanged,
                Message::DisplayConfigurationChanged,
            ),
            (EventType::PowerSourceChanged, Message::PowerSourceChanged),
        ];
        for (event_type, message) in table {
            let delivery = delivery_for(event_type).unwrap();
            assert_eq!(delivery.message, message);
            assert!(delivery.resend_after.is_empty());
        }
    }

    #[test]
    fn test_lifecycle_markers_send_nothing() {
        assert_eq!(delivery_for(EventType::ObserverEnabled), None);
        assert_eq!(delivery_for(EventType::ObserverDisabled), None);
    }
}
