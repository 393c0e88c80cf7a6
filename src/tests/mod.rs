//! Test Suite
//!
//! Property tests for engine invariants and HTTP-level provider tests
//! against mock servers.

mod property;
mod unit;
