//! Test infrastructure for the bbtag parser
//!
//! Provides fixture loading, stochastic test variations, and a compact
//! node notation for assertions.

#![allow(dead_code)]

mod generators;
mod harness;
mod loader;

pub use generators::Gen;
pub use harness::{format_node, format_nodes, run_test, run_with_variations};
pub use loader::{load_fixtures_by_name, TestCase};
