//! In-memory [`bazaar_core::db::Adapter`] implementation.
//!
//! Backs the test suites across the workspace; also handy for demos that
//! should run without a database.

mod adapter;

pub use adapter::MemoryAdapter;
