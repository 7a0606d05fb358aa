//! Unit tests for the infratest harness
//!
//! These tests use mocked dependencies and run fast without external I/O.

mod settings_tests;
mod suite_run;
