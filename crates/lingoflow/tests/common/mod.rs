//! Shared test utilities for lingoflow integration tests.
//!
//! This module provides:
//! - `TestHarness` wiring a `SubmissionService` to an in-memory database
//! - Scriptable transport and renderer stubs standing in for the
//!   excluded SOAP/rendering layers

pub mod harness;

pub use harness::{FailingRenderer, StubRenderer, StubTransport, TestHarness};
