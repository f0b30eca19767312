//! Launch sequencing for the client process.

use std::sync::Arc;

use tracing::info;

use crate::bootstrap::{
    ConfigLoader, HttpTransportFactory, SystemConfigLoader, TransportFactory, bootstrap_with,
};
use crate::dispatch::{LoopExit, RequestHandler};
use crate::echo::EchoHandler;
use crate::health::{HealthReporter, StructuredHealthReporter};

use super::PROCESS_TARGET;
use super::errors::LaunchError;
use super::shutdown::{ShutdownFlag, ShutdownSignal, SystemShutdownSignal};

/// Service dependencies required to construct the client runtime.
pub(crate) struct ServiceDeps<L, F> {
    pub(crate) loader: L,
    pub(crate) factory: F,
    pub(crate) reporter: Arc<dyn HealthReporter>,
}

/// Collaborators required to launch the client.
pub(crate) struct LaunchPlan<L, F, S, H> {
    pub(crate) services: ServiceDeps<L, F>,
    pub(crate) shutdown: S,
    pub(crate) handler: H,
}

/// Runs the client using the production collaborators until a shutdown
/// signal arrives or negotiation with the node fails.
///
/// # Errors
///
/// Returns [`LaunchError`] when bootstrap fails, signal handlers cannot be
/// installed, or the request loop terminates on a fatal error.
pub fn run() -> Result<(), LaunchError> {
    let plan = LaunchPlan {
        services: ServiceDeps {
            loader: SystemConfigLoader,
            factory: HttpTransportFactory,
            reporter: Arc::new(StructuredHealthReporter::new()),
        },
        shutdown: SystemShutdownSignal::new(),
        handler: EchoHandler::new(),
    };
    run_with(plan).map(|_| ())
}

/// Runs the client with injected collaborators.
pub(crate) fn run_with<L, F, S, H>(plan: LaunchPlan<L, F, S, H>) -> Result<LoopExit, LaunchError>
where
    L: ConfigLoader,
    F: TransportFactory,
    S: ShutdownSignal,
    H: RequestHandler,
{
    let LaunchPlan {
        services,
        shutdown,
        handler,
    } = plan;
    let ServiceDeps {
        loader,
        factory,
        reporter,
    } = services;

    let flag = ShutdownFlag::new();
    let runtime = bootstrap_with(&loader, reporter, &factory, &flag)?;
    shutdown.install(&flag)?;
    info!(
        target: PROCESS_TARGET,
        node = %runtime.config().http_server_url(),
        "starting request loop"
    );
    let exit = runtime.into_loop(handler).run(&flag)?;
    info!(
        target: PROCESS_TARGET,
        iterations = exit.iterations,
        "shutdown sequence completed"
    );
    Ok(exit)
}
