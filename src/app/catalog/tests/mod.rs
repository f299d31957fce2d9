//! Integration tests for the station catalog
//!
//! These tests merge successive candidate batches into catalog tables on
//! disk and check id assignment across merges.

pub mod integration;
