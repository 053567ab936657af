//! Core domain types and errors for conveyor.
//!
//! This crate establishes the foundational data structures and error
//! handling used by every other crate in the workspace.
//!
//! ## Key Components
//!
//! - **`errors`**: the primary `Error` enum and `Result` alias,
//!   centralizing all failure modes for predictable error handling.
//! - **`types`**: domain types for the execution engine — `Target`,
//!   `TaskOutcome`, `TargetOutcome` and `ExecutionSummary`.

pub mod errors;
pub mod types;

pub use self::{
    errors::{Error, Result, ResultExt},
    types::{ExecutionSummary, Target, TargetOutcome, TaskOutcome},
};
