//! Unit tests for the ekscluster CLI
//!
//! These tests use mocked ports and run fast without external I/O.

#![allow(clippy::expect_used, clippy::panic)]
