//! The request loop state machine.
//!
//! Each iteration reports the previous verdict, waits for the node to classify
//! the next request, reads it, runs the handler and settles a new verdict:
//!
//! ```text
//! AWAITING_REQUEST -> CLASSIFIED(kind) -> PROCESSING -> FINALIZED(verdict)
//!        ^                                                     |
//!        +-----------------------------------------------------+
//! ```
//!
//! The negotiation call is the only suspension point and the only fatal
//! failure. Everything after classification is recovered into a rejection.
//! When shutdown is requested between requests, the last settled verdict is
//! committed with one more negotiation call before the loop stops.

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use rollup_config::{Config, PartialEmissionPolicy};

use crate::health::HealthReporter;
use crate::process::ShutdownFlag;
use crate::protocol::{Request, RequestKind, Verdict};
use crate::transport::RollupTransport;

use super::DISPATCH_TARGET;
use super::errors::{DispatchError, FatalError};
use super::handler::RequestHandler;
use super::session::Session;
use super::verdict::settle_verdict;

/// Policies that shape verdict reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopSettings {
    /// Verdict reported on the very first negotiation call.
    pub initial_verdict: Verdict,
    /// How a failed emission after committed outputs is settled.
    pub partial_emission: PartialEmissionPolicy,
}

impl Default for LoopSettings {
    fn default() -> Self {
        Self {
            initial_verdict: Verdict::Accept,
            partial_emission: PartialEmissionPolicy::Reject,
        }
    }
}

impl From<&Config> for LoopSettings {
    fn from(config: &Config) -> Self {
        Self {
            initial_verdict: config.initial_verdict().into(),
            partial_emission: config.partial_emission(),
        }
    }
}

/// Outcome of processing one classified request.
#[derive(Debug)]
pub struct Settlement {
    /// One-based iteration counter.
    pub iteration: u64,
    /// Classification reported by the node.
    pub kind: RequestKind,
    /// Verdict carried to the next negotiation call.
    pub verdict: Verdict,
    /// Outputs the node accepted for this request.
    pub committed: usize,
    /// Recoverable failure observed while processing, if any.
    pub error: Option<DispatchError>,
}

/// Summary returned after a graceful shutdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoopExit {
    /// Number of requests processed.
    pub iterations: u64,
}

/// Drives the negotiation loop until shutdown or a fatal failure.
pub struct DispatchLoop<T, H> {
    session: Session<T>,
    handler: H,
    settings: LoopSettings,
    reporter: Arc<dyn HealthReporter>,
    iterations: u64,
}

impl<T, H> DispatchLoop<T, H>
where
    T: RollupTransport,
    H: RequestHandler,
{
    /// Builds a loop that owns `session` for its whole lifetime.
    pub fn new(
        session: Session<T>,
        handler: H,
        settings: LoopSettings,
        reporter: Arc<dyn HealthReporter>,
    ) -> Self {
        Self {
            session,
            handler,
            settings,
            reporter,
            iterations: 0,
        }
    }

    /// Number of requests processed so far.
    #[must_use]
    pub fn iterations(&self) -> u64 {
        self.iterations
    }

    /// Runs until `shutdown` is raised or negotiation fails.
    ///
    /// The flag is checked before every negotiation call; a request that has
    /// already been classified is always processed to completion and its
    /// verdict reported before the loop stops.
    ///
    /// # Errors
    ///
    /// Returns [`FatalError`] when the negotiation call fails.
    pub fn run(&mut self, shutdown: &ShutdownFlag) -> Result<LoopExit, FatalError> {
        let mut verdict = self.settings.initial_verdict;
        info!(
            target: DISPATCH_TARGET,
            initial_verdict = %verdict,
            partial_emission = ?self.settings.partial_emission,
            "request loop started"
        );
        loop {
            if shutdown.is_requested() {
                if self.iterations > 0 {
                    self.report_final_verdict(verdict)?;
                }
                return Ok(self.stop());
            }
            let kind = match self.session.finish(verdict) {
                Ok(kind) => kind,
                Err(fatal) if fatal.is_interrupted() && shutdown.is_requested() => {
                    return Ok(self.stop());
                }
                Err(fatal) => return Err(self.fail(verdict, fatal)),
            };
            let settlement = self.process(kind);
            verdict = settlement.verdict;
            self.reporter.request_settled(&settlement);
        }
    }

    /// Reads, handles and settles one classified request.
    pub fn process(&mut self, kind: RequestKind) -> Settlement {
        self.iterations += 1;
        let iteration = self.iterations;
        debug!(
            target: DISPATCH_TARGET,
            iteration,
            kind = %kind,
            "request classified"
        );

        let request = match self.session.read(kind) {
            Ok(request) => request,
            Err(decode) => {
                return self.settle(iteration, kind, Verdict::Reject, 0, Some(decode.into()));
            }
        };

        let mut outputs = self.session.outputs(kind);
        let outcome = match &request {
            Request::Advance(advance) => self.handler.advance(advance, &mut outputs),
            Request::Inspect(inspect) => self.handler.inspect(inspect, &mut outputs),
        };
        let report = outputs.into_report();
        let verdict = settle_verdict(&outcome, &report, self.settings.partial_emission);
        let committed = report.committed();
        let error = match outcome {
            Err(handler) => Some(DispatchError::from(handler)),
            Ok(()) => report.into_failure().map(DispatchError::from),
        };
        self.settle(iteration, kind, verdict, committed, error)
    }

    fn settle(
        &self,
        iteration: u64,
        kind: RequestKind,
        verdict: Verdict,
        committed: usize,
        error: Option<DispatchError>,
    ) -> Settlement {
        if let Some(error) = &error {
            warn!(
                target: DISPATCH_TARGET,
                iteration,
                kind = %kind,
                error_kind = error.label(),
                verdict = %verdict,
                error = %error,
                "request processing failed"
            );
        }
        Settlement {
            iteration,
            kind,
            verdict,
            committed,
            error,
        }
    }

    /// Commits the last settled verdict once shutdown has been requested.
    ///
    /// A request the node classifies in response is left unprocessed.
    fn report_final_verdict(&mut self, verdict: Verdict) -> Result<(), FatalError> {
        match self.session.finish(verdict) {
            Ok(kind) => {
                warn!(
                    target: DISPATCH_TARGET,
                    kind = %kind,
                    verdict = %verdict,
                    "request classified during shutdown left unprocessed"
                );
                Ok(())
            }
            Err(fatal) if fatal.is_interrupted() => Ok(()),
            Err(fatal) => Err(self.fail(verdict, fatal)),
        }
    }

    fn fail(&self, verdict: Verdict, fatal: FatalError) -> FatalError {
        error!(
            target: DISPATCH_TARGET,
            iteration = self.iterations + 1,
            previous_verdict = %verdict,
            error = %fatal,
            "negotiation failed; stopping"
        );
        self.reporter.negotiation_failed(&fatal);
        fatal
    }

    fn stop(&self) -> LoopExit {
        let exit = LoopExit {
            iterations: self.iterations,
        };
        info!(
            target: DISPATCH_TARGET,
            iterations = exit.iterations,
            "shutdown requested; request loop stopped"
        );
        self.reporter.loop_stopped(&exit);
        exit
    }
}
