//! Unit tests for nodescale
//!
//! These tests use mocked ports and run fast without spawning processes.

mod mocks;
mod property_tests;
mod provider_registry;
mod scaling_service;
