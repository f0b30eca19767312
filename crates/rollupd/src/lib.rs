//! Request loop for a rollup application.
//!
//! The client repeatedly reports the verdict of the previous request to the
//! rollup node and blocks until the node hands out the next one. Requests are
//! either state-advancing (`advance`) or read-only (`inspect`); advance
//! processing may emit vouchers and notices, inspect processing never does.
//!
//! Failures are split by type. Decode, handler and emission failures are
//! [`DispatchError`]s: they turn the next reported verdict into a rejection
//! and the loop carries on. A failed negotiation call is a [`FatalError`] and
//! ends the process with a non-zero exit code.
//!
//! The node is reached through the [`RollupTransport`] trait. Production
//! wiring uses [`HttpTransport`], configured via [`rollup_config`], and runs
//! the [`EchoHandler`]; applications supply their own [`RequestHandler`].

mod bootstrap;
mod dispatch;
mod echo;
mod health;
mod process;
mod protocol;
pub mod telemetry;
mod transport;

pub use bootstrap::{
    BootstrapError, ConfigLoader, HttpTransportFactory, Runtime, StaticConfigLoader,
    SystemConfigLoader, TransportFactory, bootstrap_with,
};
pub use dispatch::{
    DispatchError, DispatchLoop, EmissionError, EmissionReport, FatalError, HandlerError,
    LoopExit, LoopSettings, OutputEmitter, OutputKind, RequestHandler, Session, Settlement,
    settle_verdict,
};
pub use echo::EchoHandler;
pub use health::{HealthReporter, StructuredHealthReporter};
pub use process::{
    LaunchError, ShutdownError, ShutdownFlag, ShutdownSignal, SystemShutdownSignal, run,
};
pub use protocol::{
    ADDRESS_LEN, Address, Advance, AdvanceMetadata, DecodeError, Inspect, Notice, Request,
    RequestKind, Verdict, Voucher,
};
pub use telemetry::{TelemetryError, TelemetryHandle};
pub use transport::{HttpTransport, HttpTransportOptions, RollupTransport, TransportError};

#[cfg(test)]
mod tests;
