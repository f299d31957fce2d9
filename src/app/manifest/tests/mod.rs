//! Integration tests for manifest functionality
//!
//! This module contains integration tests that run complete listing-to-table
//! synchronization passes against a temporary data root.
