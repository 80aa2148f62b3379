//! One-shot, fire-and-forget delivery to the helper socket.
//!
//! Every message opens its own connection, writes one line and closes it.
//! Nothing is read back, nothing is retried, and no failure leaves this
//! module: an absent helper daemon is the normal case, not an error.

use crate::message::Message;
use crate::socket::SocketAddress;
use std::io::Write;
use std::os::unix::net::{SocketAddr, UnixStream};
use std::path::Path;

/// Something that can carry a [`Message`] to the helper daemon.
///
/// Returns whether the message was handed over completely. Callers are free
/// to ignore the result.
pub trait Transport: Send + Sync {
    fn deliver(&self, message: Message) -> bool;
}

/// Implement Transport for closures.
impl<F> Transport for F
where
    F: Fn(Message) -> bool + Send + Sync,
{
    fn deliver(&self, message: Message) -> bool {
        self(message)
    }
}

/// Transport over the helper's Unix domain stream socket.
#[derive(Debug, Clone)]
pub struct UnixSocketTransport {
    address: SocketAddress,
}

impl UnixSocketTransport {
    pub fn new(address: SocketAddress) -> Self {
        Self { address }
    }

    pub fn address(&self) -> &SocketAddress {
        &self.address
    }
}

impl Transport for UnixSocketTransport {
    fn deliver(&self, message: Message) -> bool {
        send_message(self.address.as_path(), message)
    }
}

/// Connect to `path`, write `message` followed by a newline, and close.
///
/// The stream is dropped on every exit path. Overlong paths, missing
/// listeners, refused connections and short writes all yield `false`.
pub fn send_message(path: &Path, message: Message) -> bool {
    let addr = match SocketAddr::from_pathname(path) {
        Ok(addr) => addr,
        Err(e) => {
            log::trace!("invalid helper socket address {}: {}", path.display(), e);
            return false;
        }
    };

    let mut stream = match UnixStream::connect_addr(&addr) {
        Ok(stream) => stream,
        Err(e) => {
            log::trace!("helper socket {} unreachable: {}", path.display(), e);
            return false;
        }
    };

    let line = message.to_line();
    match stream.write(line.as_bytes()) {
        Ok(written) if written == line.len() => true,
        Ok(written) => {
            log::trace!(
                "short write of {message} to {}: {written}/{} bytes",
                path.display(),
                line.len()
            );
            false
        }
        Err(e) => {
            log::trace!("failed to write {message} to {}: {}", path.display(), e);
            false
        }
    }
}
