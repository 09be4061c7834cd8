//! CLI integration tests for vessel.

mod lifecycle_tests;
