//! Test utilities and mock implementations.
//!
//! This module provides reusable mock implementations of the crate's
//! traits for use in unit and integration tests.

pub mod mocks;

pub use mocks::{MockBinder, MockConfig, MockMetricsProvider};
