//! Test suites for the rollup request loop.

pub(crate) mod support;
