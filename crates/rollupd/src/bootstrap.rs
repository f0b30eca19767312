//! Client bootstrap orchestration.

use std::sync::Arc;

use ortho_config::{OrthoConfig, OrthoError};
use thiserror::Error;

use rollup_config::Config;

use crate::dispatch::{DispatchLoop, LoopSettings, RequestHandler, Session};
use crate::health::HealthReporter;
use crate::process::ShutdownFlag;
use crate::telemetry::{self, TelemetryError, TelemetryHandle};
use crate::transport::{HttpTransport, HttpTransportOptions, RollupTransport, TransportError};

/// Trait abstracting configuration loading for testability.
pub trait ConfigLoader: Send + Sync {
    /// Loads the client configuration.
    fn load(&self) -> Result<Config, Arc<OrthoError>>;
}

/// Loader that delegates to [`Config::load`].
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemConfigLoader;

impl ConfigLoader for SystemConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Config::load()
    }
}

/// Loader that hands out a pre-resolved configuration.
#[derive(Debug, Clone)]
pub struct StaticConfigLoader {
    config: Config,
}

impl StaticConfigLoader {
    /// Wraps `config`.
    #[must_use]
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl ConfigLoader for StaticConfigLoader {
    fn load(&self) -> Result<Config, Arc<OrthoError>> {
        Ok(self.config.clone())
    }
}

/// Builds the transport used to reach the rollup node.
pub trait TransportFactory {
    /// Transport produced by this factory.
    type Transport: RollupTransport;

    /// Creates the transport for `config`. Long waits inside the transport
    /// should give up once `shutdown` is raised.
    fn connect(
        &self,
        config: &Config,
        shutdown: &ShutdownFlag,
    ) -> Result<Self::Transport, TransportError>;
}

/// Factory producing the production [`HttpTransport`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransportFactory;

impl TransportFactory for HttpTransportFactory {
    type Transport = HttpTransport;

    fn connect(
        &self,
        config: &Config,
        shutdown: &ShutdownFlag,
    ) -> Result<HttpTransport, TransportError> {
        HttpTransport::connect(HttpTransportOptions {
            endpoint: config.http_server_url().clone(),
            timeout: config.http_timeout(),
            idle_backoff: config.idle_backoff(),
            shutdown: shutdown.clone(),
        })
    }
}

/// Errors surfaced during bootstrap.
#[derive(Debug, Error)]
pub enum BootstrapError {
    /// Configuration failed to load.
    #[error("failed to load configuration: {source}")]
    Configuration {
        /// Underlying loader error.
        #[source]
        source: Arc<OrthoError>,
    },
    /// Telemetry initialisation failed.
    #[error("failed to initialise telemetry: {source}")]
    Telemetry {
        /// Underlying telemetry error.
        #[source]
        source: TelemetryError,
    },
    /// The node transport could not be constructed.
    #[error("failed to construct rollup node transport: {source}")]
    Transport {
        /// Underlying transport error.
        #[source]
        source: TransportError,
    },
}

/// Result of a successful bootstrap invocation.
pub struct Runtime<T> {
    config: Config,
    session: Session<T>,
    telemetry: TelemetryHandle,
    reporter: Arc<dyn HealthReporter>,
}

impl<T> Runtime<T>
where
    T: RollupTransport,
{
    /// Accessor for the resolved configuration.
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Accessor for the telemetry handle, primarily useful for testing.
    #[must_use]
    pub fn telemetry(&self) -> TelemetryHandle {
        self.telemetry
    }

    /// Hands the session to a dispatch loop driving `handler`.
    pub fn into_loop<H>(self, handler: H) -> DispatchLoop<T, H>
    where
        H: RequestHandler,
    {
        let settings = LoopSettings::from(&self.config);
        DispatchLoop::new(self.session, handler, settings, self.reporter)
    }
}

/// Bootstraps the client using the supplied collaborators.
pub fn bootstrap_with<F>(
    loader: &dyn ConfigLoader,
    reporter: Arc<dyn HealthReporter>,
    factory: &F,
    shutdown: &ShutdownFlag,
) -> Result<Runtime<F::Transport>, BootstrapError>
where
    F: TransportFactory,
{
    reporter.bootstrap_starting();

    let config = match loader.load() {
        Ok(config) => config,
        Err(source) => {
            let error = BootstrapError::Configuration { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let telemetry = match telemetry::initialise(&config) {
        Ok(handle) => handle,
        Err(source) => {
            let error = BootstrapError::Telemetry { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    let transport = match factory.connect(&config, shutdown) {
        Ok(transport) => transport,
        Err(source) => {
            let error = BootstrapError::Transport { source };
            reporter.bootstrap_failed(&error);
            return Err(error);
        }
    };

    reporter.bootstrap_succeeded(&config);
    Ok(Runtime {
        config,
        session: Session::new(transport),
        telemetry,
        reporter,
    })
}
