//! Testing infrastructure for stepline integration tests.
//!
//! This crate provides utilities for writing robust integration tests:
//! - `TestWorld`: isolated directories, a fake interpreter and CLI command setup
//! - `fakes`: recording stand-ins for every orchestrator collaborator
//! - `assertions`: checks over the recorded event journal

pub mod assertions;
pub mod fakes;
pub mod world;

pub use fakes::{FakeChecker, FakeConnector, FakeEngine, Journal, ScriptedProcessors};
pub use world::TestWorld;
