//! Defines the unified error surface for process launch and supervision.

use thiserror::Error;

use crate::bootstrap::BootstrapError;
use crate::dispatch::FatalError;

use super::shutdown::ShutdownError;

/// Errors surfaced while launching or running the client process.
#[derive(Debug, Error)]
pub enum LaunchError {
    /// Bootstrapping the client failed.
    #[error("bootstrap failed: {source}")]
    Bootstrap {
        /// Underlying bootstrap error.
        #[source]
        source: BootstrapError,
    },
    /// Installing shutdown signal handlers failed.
    #[error("failed to install shutdown handling: {source}")]
    Shutdown {
        /// Underlying shutdown error.
        #[source]
        source: ShutdownError,
    },
    /// The request loop terminated on a fatal negotiation failure.
    #[error("request loop terminated: {source}")]
    Dispatch {
        /// Underlying fatal error.
        #[source]
        source: FatalError,
    },
}

impl From<BootstrapError> for LaunchError {
    fn from(source: BootstrapError) -> Self {
        Self::Bootstrap { source }
    }
}

impl From<ShutdownError> for LaunchError {
    fn from(source: ShutdownError) -> Self {
        Self::Shutdown { source }
    }
}

impl From<FatalError> for LaunchError {
    fn from(source: FatalError) -> Self {
        Self::Dispatch { source }
    }
}
