//! Integration tests for SecureCheck.
//!
//! Mock-backed tests always run. Tests that need a running PostgreSQL
//! database are gated on the DATABASE_URL environment variable and skip
//! themselves when it is unset.
//!
//! Run with: `cargo test --test integration_tests`

mod integration;
