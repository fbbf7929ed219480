//! profstat core: domain record, fallback policy, and error types.
//!
//! This crate defines the statistics record served by the gateway, the
//! synthetic values substituted when a backing service fails, and the error
//! surface shared by every crate. It carries no transport or runtime
//! dependencies so the fallback arithmetic can be tested in isolation.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here
//! (`#![deny(clippy::panic, clippy::unwrap_used, clippy::expect_used)]`).
//! All fallible paths surface as `ProfstatError`/`Result`.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod fallback;
pub mod record;
pub mod text;

pub use error::{ProfstatError, Result};
pub use record::{Diagnostics, StatsRecord, Weather};
