//! # sketchyrelay
//!
//! Forwards macOS lifecycle notifications to the sketchybar helper daemon's
//! Unix socket as one-line text messages.
//!
//! ## Features
//!
//! - Application launch/terminate, system wake, keyboard input source,
//!   display configuration and power source notifications
//! - Fire-and-forget delivery: one connection per message, nothing read back,
//!   an absent helper daemon is silently tolerated
//! - Delayed re-sends after application launch/terminate so the consumer can
//!   re-sample window state once the window server has settled
//! - A single serialized dispatch queue for handling and re-sends
//!
//! ## Quick Start
//!
//! ### Running the relay
//!
//! ```no_run
//! sketchyrelay::relay::run().expect("relay failed");
//! ```
//!
//! ### Sending a message by hand
//!
//! ```no_run
//! use sketchyrelay::{Message, SocketAddress, send_message};
//!
//! let address = SocketAddress::from_env().expect("no socket path");
//! // `false` just means nobody is listening.
//! let _ = send_message(address.as_path(), Message::WorkspaceChanged);
//! ```
//!
//! ## Architecture
//!
//! The [`Observer`] registers every subscription and parks in the host run
//! loop. Each notification becomes an [`Event`] handed to the
//! [`EventForwarder`], which posts it onto the [`DispatchQueue`]. On the queue
//! the mapped [`Message`] is sent immediately and any re-sends are scheduled
//! as deferred jobs on the same queue, so handling never blocks on a timer.

pub mod config;
pub mod delivery;
pub mod dispatch;
pub mod error;
pub mod event;
pub mod forwarder;
pub mod message;
pub mod observer;
pub mod relay;
pub mod socket;
pub mod transport;

mod platform;

// Re-exports
pub use config::Config;
pub use delivery::{Delivery, delivery_for};
pub use dispatch::{DispatchQueue, Dispatcher};
pub use error::{Error, Result};
pub use event::{AppData, Event, EventType};
pub use forwarder::EventForwarder;
pub use message::Message;
pub use observer::{EventHandler, Observer, observe};
pub use relay::Relay;
pub use socket::SocketAddress;
pub use transport::{Transport, UnixSocketTransport, send_message};
