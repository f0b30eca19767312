//! Structured health reporting for lifecycle and request events.

use std::sync::Arc;

use rollup_config::Config;

use crate::bootstrap::BootstrapError;
use crate::dispatch::{FatalError, LoopExit, Settlement};

const HEALTH_TARGET: &str = concat!(env!("CARGO_PKG_NAME"), "::health");

/// Observer trait used to surface lifecycle events to telemetry sinks.
pub trait HealthReporter: Send + Sync {
    /// Invoked before configuration loading begins.
    fn bootstrap_starting(&self);

    /// Invoked after bootstrap completes successfully.
    fn bootstrap_succeeded(&self, config: &Config);

    /// Invoked when bootstrap fails.
    fn bootstrap_failed(&self, error: &BootstrapError);

    /// Invoked once a request has been processed and its verdict settled.
    fn request_settled(&self, settlement: &Settlement);

    /// Invoked when the loop stops after a shutdown request.
    fn loop_stopped(&self, exit: &LoopExit);

    /// Invoked when the negotiation call fails and the loop terminates.
    fn negotiation_failed(&self, error: &FatalError);
}

impl<T> HealthReporter for Arc<T>
where
    T: HealthReporter,
{
    fn bootstrap_starting(&self) {
        (**self).bootstrap_starting();
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        (**self).bootstrap_succeeded(config);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        (**self).bootstrap_failed(error);
    }

    fn request_settled(&self, settlement: &Settlement) {
        (**self).request_settled(settlement);
    }

    fn loop_stopped(&self, exit: &LoopExit) {
        (**self).loop_stopped(exit);
    }

    fn negotiation_failed(&self, error: &FatalError) {
        (**self).negotiation_failed(error);
    }
}

/// Default reporter that records lifecycle events using `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct StructuredHealthReporter;

impl StructuredHealthReporter {
    /// Builds a new reporter.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl HealthReporter for StructuredHealthReporter {
    fn bootstrap_starting(&self) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_starting",
            "starting rollup client bootstrap"
        );
    }

    fn bootstrap_succeeded(&self, config: &Config) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "bootstrap_succeeded",
            http_server_url = %config.http_server_url(),
            log_filter = %config.log_filter(),
            log_format = ?config.log_format(),
            initial_verdict = ?config.initial_verdict(),
            partial_emission = ?config.partial_emission(),
            "rollup client bootstrap completed"
        );
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "bootstrap_failed",
            error = %error,
            "rollup client bootstrap failed"
        );
    }

    fn request_settled(&self, settlement: &Settlement) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "request_settled",
            iteration = settlement.iteration,
            kind = %settlement.kind,
            verdict = %settlement.verdict,
            committed = settlement.committed,
            failed = settlement.error.is_some(),
            "request settled"
        );
    }

    fn loop_stopped(&self, exit: &LoopExit) {
        tracing::info!(
            target: HEALTH_TARGET,
            event = "loop_stopped",
            iterations = exit.iterations,
            "request loop stopped"
        );
    }

    fn negotiation_failed(&self, error: &FatalError) {
        tracing::error!(
            target: HEALTH_TARGET,
            event = "negotiation_failed",
            error = %error,
            "negotiation with the rollup node failed"
        );
    }
}
