//! Verdict settlement for a processed request.

use rollup_config::PartialEmissionPolicy;

use crate::protocol::Verdict;

use super::emitter::EmissionReport;
use super::errors::{EmissionError, HandlerError};

/// Turns a handler outcome and its emission report into the verdict reported
/// on the next negotiation call.
///
/// A failed emission is settled by `policy` whether the handler carried on or
/// propagated the failure with `?`: [`PartialEmissionPolicy::Reject`] always
/// rejects, while [`PartialEmissionPolicy::AcceptCommitted`] accepts when at
/// least one output was committed before the failure. Any other handler error
/// rejects.
#[must_use]
pub fn settle_verdict(
    outcome: &Result<(), HandlerError>,
    report: &EmissionReport,
    policy: PartialEmissionPolicy,
) -> Verdict {
    let emission_failed = match outcome {
        Ok(()) => report.failure().is_some(),
        Err(HandlerError::Emission(
            EmissionError::Transport { .. } | EmissionError::AfterFailure { .. },
        )) if report.failure().is_some() => true,
        Err(_) => return Verdict::Reject,
    };
    if !emission_failed {
        return Verdict::Accept;
    }
    match policy {
        PartialEmissionPolicy::AcceptCommitted if report.committed() > 0 => Verdict::Accept,
        PartialEmissionPolicy::AcceptCommitted | PartialEmissionPolicy::Reject => Verdict::Reject,
    }
}
