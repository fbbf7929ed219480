//! HTTP handlers for the badge and stats endpoints.
//!
//! Aggregation is contractually infallible, but both handlers still run it
//! under `catch_unwind` so a fault inside a provider can only ever surface as
//! the badge's diagnostic panel or the stats endpoint's 500 body, never as a
//! dropped connection.

pub mod badge;
pub mod stats;

use std::any::Any;

use axum::http::{header, HeaderName};

pub(crate) const NO_CACHE: &str = "no-cache, no-store, must-revalidate";

pub(crate) fn no_cache_header() -> (HeaderName, &'static str) {
    (header::CACHE_CONTROL, NO_CACHE)
}

/// Best-effort text of a caught panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn panic_payloads_are_readable() {
        let p: Box<dyn Any + Send> = Box::new("static boom");
        assert_eq!(panic_message(p.as_ref()), "static boom");

        let p: Box<dyn Any + Send> = Box::new(String::from("owned boom"));
        assert_eq!(panic_message(p.as_ref()), "owned boom");

        let p: Box<dyn Any + Send> = Box::new(42u8);
        assert_eq!(panic_message(p.as_ref()), "unknown panic");
    }
}
