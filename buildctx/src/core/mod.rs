//! Deterministic, pure logic for build context initialization.
//!
//! Core modules must be free of I/O side effects. They operate on in-memory
//! snapshots of provider metadata and arguments and return deterministic
//! outputs suitable for tests.

pub mod args;
pub mod projects;
pub mod provider;
pub mod tag;
pub mod text;
pub mod trust;
pub mod version;
