//! Top-level facade crate for profstat.
//!
//! Re-exports the domain types and the gateway library so users can depend on a single crate.

pub mod core {
    pub use profstat_core::*;
}

pub mod gateway {
    pub use profstat_gateway::*;
}
