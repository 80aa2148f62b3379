//! Process wiring: configuration, dispatch queue, forwarder and observer.

use crate::config::Config;
use crate::dispatch::DispatchQueue;
use crate::error::Result;
use crate::forwarder::EventForwarder;
use crate::observer::Observer;
use crate::transport::UnixSocketTransport;

/// The long-lived relay instance owned by the process.
pub struct Relay {
    config: Config,
    queue: DispatchQueue,
    observer: Observer,
}

impl Relay {
    /// Start the dispatch queue for `config`. Nothing is observed until
    /// [`Relay::run`] is called.
    pub fn new(config: Config) -> Result<Self> {
        Ok(Self {
            config,
            queue: DispatchQueue::spawn()?,
            observer: Observer::new(),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A forwarder delivering to the configured socket over this relay's queue.
    pub fn forwarder(&self) -> EventForwarder<UnixSocketTransport> {
        EventForwarder::new(
            UnixSocketTransport::new(self.config.socket.clone()),
            self.queue.dispatcher(),
        )
    }

    /// Subscribe to every notification and block in the run loop.
    pub fn run(&self) -> Result<()> {
        log::info!("forwarding system events to {}", self.config.socket);
        self.observer.run(self.forwarder())
    }

    /// Stop a relay running on another thread.
    pub fn stop(&self) -> Result<()> {
        self.observer.stop()
    }

    pub fn is_running(&self) -> bool {
        self.observer.is_running()
    }
}

/// Resolve the configuration from the environment and run until stopped.
pub fn run() -> Result<()> {
    let config = Config::from_env()?;
    Relay::new(config)?.run()
}
