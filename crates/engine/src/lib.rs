//! Concurrency patterns shared by the conveyor pipeline modules.
//!
//! Three fan-out shapes, intentionally distinct:
//!
//! - [`ScatterPool`]: semaphore-bounded dispatch feeding a single-consumer
//!   outcome channel (the drift scanner's shape).
//! - [`first_error`]: unbounded fan-out returning the first failure while
//!   siblings run to completion (the parallel test runner's shape).
//! - [`gather`]: unbounded fan-out keeping every successful value plus the
//!   last error (the multi-registry publisher's shape).
//!
//! None of them cancel sibling tasks on failure, and the only shared
//! mutable state is drained at a single collection point.

pub mod gather;
pub mod group;
pub mod pool;

pub use gather::{gather, Gathered};
pub use group::first_error;
pub use pool::{ScatterPool, TargetOperation};
