//! Cross-cutting test suites
//!
//! Per-module unit tests live next to the code. The suites here exercise the
//! blocks together: fixture conformance, chained executions through the
//! runtime, and property-based invariants.

#[cfg(test)]
mod conformance;
#[cfg(test)]
mod property_tests;
