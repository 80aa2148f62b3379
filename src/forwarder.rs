//! Event forwarding: turns observed events into helper socket messages.

use crate::delivery::delivery_for;
use crate::dispatch::Dispatcher;
use crate::event::{Event, EventType};
use crate::observer::EventHandler;
use crate::transport::Transport;
use std::sync::Arc;

/// Forwards each observed event to the helper daemon.
///
/// Handling is moved onto the dispatch queue, so the notification callback
/// returns immediately. On the queue the mapped message is sent at once and
/// any re-sends are scheduled as deferred jobs on the same queue.
pub struct EventForwarder<T> {
    transport: Arc<T>,
    dispatcher: Dispatcher,
}

impl<T> Clone for EventForwarder<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            dispatcher: self.dispatcher.clone(),
        }
    }
}

impl<T: Transport + 'static> EventForwarder<T> {
    pub fn new(transport: T, dispatcher: Dispatcher) -> Self {
        Self {
            transport: Arc::new(transport),
            dispatcher,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Send the message for `event_type` now and schedule its re-sends.
    ///
    /// Meant to run on the dispatch queue. Returns the number of sends made
    /// or scheduled; delivery outcomes are deliberately ignored.
    pub fn forward(&self, event_type: EventType) -> usize {
        let Some(delivery) = delivery_for(event_type) else {
            return 0;
        };

        let _ = self.transport.deliver(delivery.message);
        let mut sends = 1;

        for &delay in delivery.resend_after {
            let transport = self.transport.clone();
            let message = delivery.message;
            if self.dispatcher.post_after(delay, move || {
                let _ = transport.deliver(message);
            }) {
                sends += 1;
            }
        }

        sends
    }
}

impl<T: Transport + 'static> EventHandler for EventForwarder<T> {
    fn handle_event(&self, event: &Event) {
        match &event.app {
            Some(app) => log::debug!(
                "{:?}: pid={} bundle={:?} name={:?}",
                event.event_type,
                app.pid,
                app.bundle_id,
                app.name
            ),
            None => log::debug!("{:?}", event.event_type),
        }

        let this = self.clone();
        let event_type = event.event_type;
        if !self.dispatcher.post(move || {
            this.forward(event_type);
        }) {
            log::warn!("dispatch queue is gone; dropping {:?}", event_type);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dispatch::DispatchQueue;
    use crate::message::Message;
    use crate::socket::SocketAddress;
    use crate::transport::UnixSocketTransport;
    use std::io::{BufRead, BufReader};
    use std::os::unix::net::UnixListener;
    use std::sync::Mutex;
    use std::time::{Duration, Instant};

    /// Scheduling slack allowed on every timing assertion.
    const TOLERANCE: Duration = Duration::from_millis(300);

    type Log = Arc<Mutex<Vec<(Duration, Message)>>>;

    fn recording_forwarder(
        queue: &DispatchQueue,
    ) -> (
        EventForwarder<impl Fn(Message) -> bool + Send + Sync + 'static>,
        Log,
    ) {
        let log: Log = Arc::new(Mutex::new(Vec::new()));
        let start = Instant::now();
        let sink = log.clone();
        let transport = move |message: Message| {
            sink.lock().unwrap().push((start.elapsed(), message));
            false
        };
        (EventForwarder::new(transport, queue.dispatcher()), log)
    }

    /// Poll until `count` sends are recorded, then give stray sends a
    /// moment to show up.
    fn wait_for(log: &Log, count: usize) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while log.lock().unwrap().len() < count && Instant::now() < deadline {
            std::thread::sleep(Duration::from_millis(10));
        }
        std::thread::sleep(Duration::from_millis(100));
    }

    fn assert_near(actual: Duration, expected_ms: u64) {
        let expected = Duration::from_millis(expected_ms);
        assert!(
            actual >= expected && actual <= expected + TOLERANCE,
            "expected ~{expected:?}, got {actual:?}"
        );
    }

    #[test]
    fn test_launch_sends_three_times() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, log) = recording_forwarder(&queue);

        forwarder.handle_event(&Event::application_launched(None));
        wait_for(&log, 3);

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 3);
        assert!(log.iter().all(|(_, m)| *m == Message::WorkspaceChanged));
        assert_near(log[0].0, 0);
        assert_near(log[1].0, 200);
        assert_near(log[2].0, 500);
        assert!(log[1].0 < log[2].0);
    }

    #[test]
    fn test_terminate_sends_twice() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, log) = recording_forwarder(&queue);

        forwarder.handle_event(&Event::application_terminated(None));
        wait_for(&log, 2);
        std::thread::sleep(Duration::from_millis(300));

        let log = log.lock().unwrap();
        assert_eq!(log.len(), 2);
        assert!(log.iter().all(|(_, m)| *m == Message::WorkspaceChanged));
        assert_near(log[0].0, 0);
        assert_near(log[1].0, 200);
    }

    #[test]
    fn test_system_events_send_once() {
        let table = [
            (Event::system_woke(), Message::SystemWake),
            (Event::input_source_changed(), Message::InputSourceChanged),
            (
                Event::display_configuration_changed(),
                Message::DisplayConfigurationChanged,
            ),
            (Event::power_source_changed(), Message::PowerSourceChanged),
        ];

        for (event, expected) in table {
            let queue = DispatchQueue::spawn().unwrap();
            let (forwarder, log) = recording_forwarder(&queue);

            forwarder.handle_event(&event);
            wait_for(&log, 1);

            let log = log.lock().unwrap();
            assert_eq!(log.len(), 1, "{:?}", event.event_type);
            assert_eq!(log[0].1, expected);
            assert_near(log[0].0, 0);
        }
    }

    #[test]
    fn test_lifecycle_markers_are_not_forwarded() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, log) = recording_forwarder(&queue);

        forwarder.handle_event(&Event::observer_enabled());
        forwarder.handle_event(&Event::observer_disabled());
        std::thread::sleep(Duration::from_millis(100));

        assert!(log.lock().unwrap().is_empty());
        assert_eq!(forwarder.forward(EventType::ObserverEnabled), 0);
    }

    #[test]
    fn test_rapid_occurrences_keep_every_resend() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, log) = recording_forwarder(&queue);

        forwarder.handle_event(&Event::application_launched(None));
        forwarder.handle_event(&Event::application_terminated(None));
        forwarder.handle_event(&Event::system_woke());
        wait_for(&log, 6);

        let log = log.lock().unwrap();
        let messages: Vec<_> = log.iter().map(|(_, m)| *m).collect();
        assert_eq!(
            messages,
            vec![
                Message::WorkspaceChanged,
                Message::WorkspaceChanged,
                Message::SystemWake,
                Message::WorkspaceChanged,
                Message::WorkspaceChanged,
                Message::WorkspaceChanged,
            ]
        );
        assert_near(log[3].0, 200);
        assert_near(log[4].0, 200);
        assert_near(log[5].0, 500);
    }

    #[test]
    fn test_handler_returns_before_resends() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, _log) = recording_forwarder(&queue);

        let start = Instant::now();
        forwarder.handle_event(&Event::application_launched(None));
        assert!(start.elapsed() < Duration::from_millis(100));
    }

    #[test]
    fn test_forward_counts_sends() {
        let queue = DispatchQueue::spawn().unwrap();
        let (forwarder, _log) = recording_forwarder(&queue);

        assert_eq!(forwarder.forward(EventType::ApplicationLaunched), 3);
        assert_eq!(forwarder.forward(EventType::ApplicationTerminated), 2);
        assert_eq!(forwarder.forward(EventType::PowerSourceChanged), 1);
    }

    #[test]
    fn test_launch_end_to_end_over_socket() {
        let dir = tempfile::tempdir().unwrap();
        let address = SocketAddress::resolve(Some(dir.path().into()), None).unwrap();
        assert_eq!(
            address.as_path(),
            dir.path().join("sketchybar").join("helper.sock").as_path()
        );
        std::fs::create_dir_all(address.as_path().parent().unwrap()).unwrap();
        let listener = UnixListener::bind(address.as_path()).unwrap();

        let queue = DispatchQueue::spawn().unwrap();
        let forwarder =
            EventForwarder::new(UnixSocketTransport::new(address), queue.dispatcher());

        let start = Instant::now();
        forwarder.handle_event(&Event::application_launched(None));

        let mut arrivals = Vec::new();
        for _ in 0..3 {
            let (stream, _) = listener.accept().unwrap();
            let elapsed = start.elapsed();
            let mut lines = Vec::new();
            for line in BufReader::new(stream).split(b'\n') {
                lines.push(line.unwrap());
            }
            assert_eq!(lines, vec![b"on-workspace-changed".to_vec()]);
            arrivals.push(elapsed);
        }

        assert_near(arrivals[0], 0);
        assert_near(arrivals[1], 200);
        assert_near(arrivals[2], 500);
    }

    #[test]
    fn test_absent_listener_does_not_disturb_later_sends() {
        let dir = tempfile::tempdir().unwrap();
        let address = SocketAddress::resolve(None, Some(dir.path().to_path_buf())).unwrap();

        let queue = DispatchQueue::spawn().unwrap();
        let forwarder = EventForwarder::new(
            UnixSocketTransport::new(address.clone()),
            queue.dispatcher(),
        );

        // No listener yet: nothing is delivered and nothing fails.
        assert_eq!(forwarder.forward(EventType::SystemWoke), 1);

        std::fs::create_dir_all(address.as_path().parent().unwrap()).unwrap();
        let listener = UnixListener::bind(address.as_path()).unwrap();
        forwarder.handle_event(&Event::input_source_changed());

        let (stream, _) = listener.accept().unwrap();
        let mut line = String::new();
        BufReader::new(stream).read_line(&mut line).unwrap();
        assert_eq!(line, "on-input-source-changed\n");
        assert_eq!(forwarder.transport().address(), &address);
    }
}
