//! Checkout support
//!
//! Materializes tree snapshots into the working directory and keeps the
//! index in step with them.

pub mod materializer;
