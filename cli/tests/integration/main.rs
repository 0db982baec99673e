//! Integration tests for the nodescale binary
//!
//! These tests run the compiled binary against temporary config, region and
//! credential files. Lifecycle scripts are only executed in dry-run form,
//! except for the unix-only shell script tests.

mod config_tests;
