//! Library integration tests for vessel-lib.

mod common;
