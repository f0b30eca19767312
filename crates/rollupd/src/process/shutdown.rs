use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGQUIT, SIGTERM};
use thiserror::Error;
use tracing::info;

use super::PROCESS_TARGET;

const SHUTDOWN_SIGNALS: [i32; 4] = [SIGTERM, SIGINT, SIGQUIT, SIGHUP];

/// Shared flag raised when the process should stop after the current request.
///
/// The dispatch loop checks the flag before each negotiation call; work
/// already in flight always runs to completion.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    raised: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Builds a lowered flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Raises the flag.
    pub fn request(&self) {
        self.raised.store(true, Ordering::SeqCst);
    }

    /// Returns `true` once a shutdown has been requested.
    #[must_use]
    pub fn is_requested(&self) -> bool {
        self.raised.load(Ordering::SeqCst)
    }

    fn shared(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.raised)
    }
}

/// Abstraction over shutdown notification mechanisms.
pub trait ShutdownSignal {
    /// Arranges for `flag` to be raised when shutdown should proceed.
    fn install(&self, flag: &ShutdownFlag) -> Result<(), ShutdownError>;
}

/// Errors reported by shutdown signal listeners.
#[derive(Debug, Error)]
pub enum ShutdownError {
    /// Installing signal handlers failed.
    #[error("failed to install signal handlers: {source}")]
    Install {
        /// Underlying IO error.
        #[source]
        source: io::Error,
    },
}

/// Raises the flag on SIGTERM, SIGINT, SIGQUIT, or SIGHUP.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemShutdownSignal;

impl SystemShutdownSignal {
    /// Builds a signal listener.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl ShutdownSignal for SystemShutdownSignal {
    fn install(&self, flag: &ShutdownFlag) -> Result<(), ShutdownError> {
        for signal in SHUTDOWN_SIGNALS {
            signal_hook::flag::register(signal, flag.shared())
                .map_err(|source| ShutdownError::Install { source })?;
        }
        info!(
            target: PROCESS_TARGET,
            signals = ?SHUTDOWN_SIGNALS,
            "shutdown signal handlers installed"
        );
        Ok(())
    }
}
