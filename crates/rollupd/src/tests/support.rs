//! Test harness utilities shared by the unit and behavioural suites.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use rollup_config::Config;

use crate::bootstrap::{BootstrapError, TransportFactory};
use crate::dispatch::{
    DispatchLoop, EmissionError, FatalError, HandlerError, LoopExit, LoopSettings, OutputEmitter,
    RequestHandler, Session, Settlement,
};
use crate::echo::EchoHandler;
use crate::health::HealthReporter;
use crate::process::{ShutdownError, ShutdownFlag, ShutdownSignal};
use crate::protocol::{
    Address, Advance, AdvanceMetadata, DecodeError, Inspect, Notice, RequestKind, Verdict, Voucher,
};
use crate::transport::{RollupTransport, TransportError};

/// Sender used by scripted advance requests.
pub const SENDER: Address = Address::new([0x5a; 20]);

/// Builds an advance request from [`SENDER`].
pub fn advance_request(payload: &[u8]) -> Advance {
    Advance {
        sender: SENDER,
        payload: payload.to_vec(),
        metadata: AdvanceMetadata {
            input_index: 1,
            block_number: 10,
            ..AdvanceMetadata::default()
        },
    }
}

/// Builds an inspect request.
pub fn inspect_request(payload: &[u8]) -> Inspect {
    Inspect {
        payload: payload.to_vec(),
    }
}

/// Transport call observed by a [`ScriptedTransport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recorded {
    /// `finish` was called with the verdict.
    Finish(Verdict),
    /// A read of the given kind was attempted.
    Read(RequestKind),
    /// A voucher was accepted.
    Voucher(Address, Vec<u8>),
    /// A notice was accepted.
    Notice(Vec<u8>),
}

impl Recorded {
    fn is_output(&self) -> bool {
        matches!(self, Self::Voucher(..) | Self::Notice(_))
    }
}

#[derive(Debug)]
enum Pending {
    Advance(Advance),
    Inspect(Inspect),
    Malformed(RequestKind),
}

impl Pending {
    fn kind(&self) -> RequestKind {
        match self {
            Self::Advance(_) => RequestKind::Advance,
            Self::Inspect(_) => RequestKind::Inspect,
            Self::Malformed(kind) => *kind,
        }
    }
}

#[derive(Debug)]
enum Step {
    Request(Pending),
    Fail,
}

#[derive(Debug, Default)]
struct ScriptState {
    script: VecDeque<Step>,
    pending: Option<Pending>,
    calls: Vec<Recorded>,
    output_attempts: usize,
    failing_outputs: Vec<usize>,
    exhausted: Option<ShutdownFlag>,
}

/// In-memory transport that replays a script of requests and records every
/// call in order.
///
/// Clones share state, so a test can keep a handle after moving a clone into
/// a session.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransport {
    state: Arc<Mutex<ScriptState>>,
}

impl ScriptedTransport {
    /// Builds a transport with an empty script.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a well-formed advance request.
    pub fn push_advance(&self, request: Advance) {
        self.push(Step::Request(Pending::Advance(request)));
    }

    /// Queues a well-formed inspect request.
    pub fn push_inspect(&self, request: Inspect) {
        self.push(Step::Request(Pending::Inspect(request)));
    }

    /// Queues a request of `kind` whose data fails to decode.
    pub fn push_malformed(&self, kind: RequestKind) {
        self.push(Step::Request(Pending::Malformed(kind)));
    }

    /// Queues a failing negotiation call.
    pub fn push_failure(&self) {
        self.push(Step::Fail);
    }

    /// Makes the output attempt with the given zero-based index fail.
    pub fn fail_output(&self, index: usize) {
        self.lock().failing_outputs.push(index);
    }

    /// Raises `flag` and interrupts negotiation once the script runs out.
    pub fn shutdown_when_exhausted(&self, flag: &ShutdownFlag) {
        self.lock().exhausted = Some(flag.clone());
    }

    /// Every recorded call, in order.
    pub fn calls(&self) -> Vec<Recorded> {
        self.lock().calls.clone()
    }

    /// Verdicts passed to `finish`, in order.
    pub fn finishes(&self) -> Vec<Verdict> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Recorded::Finish(verdict) => Some(verdict),
                _ => None,
            })
            .collect()
    }

    /// Outputs accepted by the transport, in order.
    pub fn outputs(&self) -> Vec<Recorded> {
        self.calls()
            .into_iter()
            .filter(Recorded::is_output)
            .collect()
    }

    fn push(&self, step: Step) {
        self.lock().script.push_back(step);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ScriptState> {
        self.state.lock().expect("script state mutex poisoned")
    }

    fn read(&self, expected: RequestKind) -> Result<Pending, DecodeError> {
        let mut state = self.lock();
        state.calls.push(Recorded::Read(expected));
        match state.pending.take() {
            None => Err(DecodeError::NoPendingRequest),
            Some(Pending::Malformed(_)) => Err(DecodeError::MissingHexPrefix { field: "payload" }),
            Some(pending) if pending.kind() != expected => Err(DecodeError::KindMismatch {
                expected,
                actual: pending.kind(),
            }),
            Some(pending) => Ok(pending),
        }
    }

    fn emit(&self, route: &'static str, output: Recorded) -> Result<(), TransportError> {
        let mut state = self.lock();
        let attempt = state.output_attempts;
        state.output_attempts += 1;
        if state.failing_outputs.contains(&attempt) {
            return Err(TransportError::Status {
                route,
                status: 500,
                body: String::from("scripted output failure"),
            });
        }
        state.calls.push(output);
        Ok(())
    }
}

impl RollupTransport for ScriptedTransport {
    fn finish(&mut self, verdict: Verdict) -> Result<RequestKind, TransportError> {
        let mut state = self.lock();
        state.calls.push(Recorded::Finish(verdict));
        state.pending = None;
        match state.script.pop_front() {
            Some(Step::Request(pending)) => {
                let kind = pending.kind();
                state.pending = Some(pending);
                Ok(kind)
            }
            Some(Step::Fail) => Err(TransportError::Status {
                route: "finish",
                status: 500,
                body: String::from("scripted negotiation failure"),
            }),
            None => match &state.exhausted {
                Some(flag) => {
                    flag.request();
                    Err(TransportError::Interrupted)
                }
                None => Err(TransportError::Status {
                    route: "finish",
                    status: 503,
                    body: String::from("script exhausted"),
                }),
            },
        }
    }

    fn read_advance(&mut self) -> Result<Advance, DecodeError> {
        match self.read(RequestKind::Advance)? {
            Pending::Advance(request) => Ok(request),
            other => Err(DecodeError::KindMismatch {
                expected: RequestKind::Advance,
                actual: other.kind(),
            }),
        }
    }

    fn read_inspect(&mut self) -> Result<Inspect, DecodeError> {
        match self.read(RequestKind::Inspect)? {
            Pending::Inspect(request) => Ok(request),
            other => Err(DecodeError::KindMismatch {
                expected: RequestKind::Inspect,
                actual: other.kind(),
            }),
        }
    }

    fn emit_voucher(&mut self, voucher: &Voucher) -> Result<(), TransportError> {
        self.emit(
            "voucher",
            Recorded::Voucher(voucher.destination, voucher.payload.clone()),
        )
    }

    fn emit_notice(&mut self, notice: &Notice) -> Result<(), TransportError> {
        self.emit("notice", Recorded::Notice(notice.payload.clone()))
    }
}

/// Factory handing out clones of a scripted transport.
#[derive(Debug, Clone, Default)]
pub struct ScriptedTransportFactory {
    pub transport: ScriptedTransport,
}

impl TransportFactory for ScriptedTransportFactory {
    type Transport = ScriptedTransport;

    fn connect(
        &self,
        _config: &Config,
        shutdown: &ShutdownFlag,
    ) -> Result<ScriptedTransport, TransportError> {
        self.transport.shutdown_when_exhausted(shutdown);
        Ok(self.transport.clone())
    }
}

/// Signal listener that never fires.
#[derive(Debug, Default, Clone, Copy)]
pub struct InertShutdownSignal;

impl ShutdownSignal for InertShutdownSignal {
    fn install(&self, _flag: &ShutdownFlag) -> Result<(), ShutdownError> {
        Ok(())
    }
}

/// How a [`ScriptedHandler`] processes advance requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AdvanceBehaviour {
    /// Delegate to [`EchoHandler`].
    #[default]
    Echo,
    /// Return a rejection without emitting.
    Reject,
    /// Emit a voucher and a notice, ignoring emission errors.
    IgnoreEmissionErrors,
}

#[derive(Debug, Default)]
struct HandlerState {
    advance: AdvanceBehaviour,
    inspect_emits_notice: bool,
    inspect_rejects: bool,
    shutdown_on_invocation: Option<ShutdownFlag>,
    invocations: Vec<RequestKind>,
    refusals: Vec<EmissionError>,
}

/// Handler with scripted behaviour that records its invocations.
#[derive(Debug, Clone, Default)]
pub struct ScriptedHandler {
    state: Arc<Mutex<HandlerState>>,
}

impl ScriptedHandler {
    /// Sets how advance requests are processed.
    pub fn set_advance(&self, behaviour: AdvanceBehaviour) {
        self.lock().advance = behaviour;
    }

    /// Makes inspect processing attempt to emit a notice.
    pub fn emit_on_inspect(&self) {
        self.lock().inspect_emits_notice = true;
    }

    /// Makes inspect processing fail with a rejection.
    pub fn reject_inspect(&self) {
        self.lock().inspect_rejects = true;
    }

    /// Raises `flag` whenever the handler is invoked, as a signal arriving
    /// mid-request would.
    pub fn shutdown_on_invocation(&self, flag: &ShutdownFlag) {
        self.lock().shutdown_on_invocation = Some(flag.clone());
    }

    /// Request kinds the handler was invoked for.
    pub fn invocations(&self) -> Vec<RequestKind> {
        self.lock().invocations.clone()
    }

    /// Emission errors the handler observed and ignored.
    pub fn refusals(&self) -> Vec<EmissionError> {
        self.lock().refusals.clone()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HandlerState> {
        self.state.lock().expect("handler state mutex poisoned")
    }

    fn record_invocation(&self, kind: RequestKind) -> std::sync::MutexGuard<'_, HandlerState> {
        let mut state = self.lock();
        state.invocations.push(kind);
        if let Some(flag) = &state.shutdown_on_invocation {
            flag.request();
        }
        state
    }
}

impl RequestHandler for ScriptedHandler {
    fn advance(
        &mut self,
        request: &Advance,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        let behaviour = self.record_invocation(RequestKind::Advance).advance;
        match behaviour {
            AdvanceBehaviour::Echo => EchoHandler::new().advance(request, outputs),
            AdvanceBehaviour::Reject => Err(HandlerError::rejected("scripted rejection")),
            AdvanceBehaviour::IgnoreEmissionErrors => {
                let results = [
                    outputs.emit_voucher(&Voucher::new(request.sender, request.payload.clone())),
                    outputs.emit_notice(&Notice::new(request.payload.clone())),
                ];
                let mut state = self.lock();
                state
                    .refusals
                    .extend(results.into_iter().filter_map(Result::err));
                Ok(())
            }
        }
    }

    fn inspect(
        &mut self,
        request: &Inspect,
        outputs: &mut OutputEmitter<'_>,
    ) -> Result<(), HandlerError> {
        let (emits, rejects) = {
            let state = self.record_invocation(RequestKind::Inspect);
            (state.inspect_emits_notice, state.inspect_rejects)
        };
        if emits && let Err(refusal) = outputs.emit_notice(&Notice::new(request.payload.clone())) {
            self.lock().refusals.push(refusal);
        }
        if rejects {
            return Err(HandlerError::rejected("scripted inspect rejection"));
        }
        Ok(())
    }
}

/// Records health events for assertions.
#[derive(Default)]
pub struct RecordingHealthReporter {
    events: Mutex<Vec<HealthEvent>>,
}

impl RecordingHealthReporter {
    /// Captures a copy of the recorded events.
    pub fn events(&self) -> Vec<HealthEvent> {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .clone()
    }

    fn record(&self, event: HealthEvent) {
        self.events
            .lock()
            .expect("health reporter mutex poisoned")
            .push(event);
    }
}

impl HealthReporter for RecordingHealthReporter {
    fn bootstrap_starting(&self) {
        self.record(HealthEvent::BootstrapStarting);
    }

    fn bootstrap_succeeded(&self, _config: &Config) {
        self.record(HealthEvent::BootstrapSucceeded);
    }

    fn bootstrap_failed(&self, error: &BootstrapError) {
        self.record(HealthEvent::BootstrapFailed(error.to_string()));
    }

    fn request_settled(&self, settlement: &Settlement) {
        self.record(HealthEvent::RequestSettled {
            kind: settlement.kind,
            verdict: settlement.verdict,
            committed: settlement.committed,
        });
    }

    fn loop_stopped(&self, exit: &LoopExit) {
        self.record(HealthEvent::LoopStopped(exit.iterations));
    }

    fn negotiation_failed(&self, error: &FatalError) {
        self.record(HealthEvent::NegotiationFailed(error.to_string()));
    }
}

/// Structured health events tracked during tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthEvent {
    /// Bootstrap started.
    BootstrapStarting,
    /// Bootstrap completed successfully.
    BootstrapSucceeded,
    /// Bootstrap failed with an error description.
    BootstrapFailed(String),
    /// A request was settled.
    RequestSettled {
        /// Request kind.
        kind: RequestKind,
        /// Settled verdict.
        verdict: Verdict,
        /// Outputs committed.
        committed: usize,
    },
    /// The loop stopped gracefully after the given number of iterations.
    LoopStopped(u64),
    /// Negotiation failed with an error description.
    NegotiationFailed(String),
}

/// Scenario world shared across BDD steps.
#[derive(Default)]
pub struct TestWorld {
    pub transport: ScriptedTransport,
    pub handler: ScriptedHandler,
    pub reporter: Arc<RecordingHealthReporter>,
    pub settings: LoopSettings,
    outcome: Option<Result<LoopExit, FatalError>>,
}

impl TestWorld {
    /// Runs the loop over the scripted requests until the script is
    /// exhausted or negotiation fails.
    pub fn run(&mut self) {
        let shutdown = ShutdownFlag::new();
        self.transport.shutdown_when_exhausted(&shutdown);
        let mut dispatch = DispatchLoop::new(
            Session::new(self.transport.clone()),
            self.handler.clone(),
            self.settings,
            self.reporter.clone(),
        );
        self.outcome = Some(dispatch.run(&shutdown));
    }

    /// Result of the last run.
    pub fn outcome(&self) -> Option<&Result<LoopExit, FatalError>> {
        self.outcome.as_ref()
    }
}

/// Builds a fresh world.
pub fn world() -> std::cell::RefCell<TestWorld> {
    std::cell::RefCell::new(TestWorld::default())
}
