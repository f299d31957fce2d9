//! Crate-level integration tests
//!
//! Each submodule drives the public API against a temporary data root.

mod pipeline;
