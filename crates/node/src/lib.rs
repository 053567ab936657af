//! Node.js pipeline helpers.
//!
//! Two fan-out operations over the build container, reached through
//! boundary traits:
//!
//! - [`parallel_run`]: run test commands concurrently, fail-fast signal
//!   with first-error semantics.
//! - [`publish_all`]: push a built image to every configured registry,
//!   keeping refs from the registries that succeeded even when others fail.

pub mod oci;
pub mod runner;

pub use oci::{publish_all, ImageTarget, PublishConfig, PublishOutcome, RegistryPublisher, TtlConfig};
pub use runner::{parallel_run, CommandRunner};
