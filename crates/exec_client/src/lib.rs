//! Execution endpoint client.
//!
//! This crate is the single source of truth for how a snippet reaches the
//! remote execution service: one POST, one reply, no retries, no timeout.
//!
//! No widget concepts. The caller decides how to present each failure class.

mod client;

pub use client::{ExecClient, ExecError};
