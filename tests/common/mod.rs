//! Common test infrastructure
//!
//! Integration tests drive the pipeline with a scripted inference backend
//! and a pacer that never sleeps, against CSV files in a temp directory.
//! Tests should only import from this module, not from internal submodules.

#![allow(dead_code)]

mod backend;
mod fixtures;

pub use backend::{FakeInference, NoopPacer};
pub use fixtures::*;
