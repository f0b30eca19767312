//! Enumerated settings that select runtime behaviour.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Supported logging output formats.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum LogFormat {
    /// Structured JSON suitable for ingestion by logging stacks.
    #[default]
    Json,
    /// Human-readable single line output.
    Compact,
}

/// Verdict reported on the first negotiation call, before any request has
/// been processed.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum InitialVerdict {
    /// Report acceptance (the conventional default).
    #[default]
    Accept,
    /// Report rejection.
    Reject,
}

/// Outcome applied when an output emission fails after earlier outputs for
/// the same advance request were already accepted by the node.
#[derive(
    Debug, Clone, Copy, Default, Deserialize, Serialize, PartialEq, Eq, EnumString, Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum PartialEmissionPolicy {
    /// Any emission failure rejects the request.
    #[default]
    Reject,
    /// Accept when the handler succeeded and at least one output was
    /// committed before the failure.
    AcceptCommitted,
}

/// Errors encountered while parsing an option from text.
pub type OptionParseError = strum::ParseError;
