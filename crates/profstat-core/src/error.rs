//! Shared error type across profstat crates.

use thiserror::Error;

/// Client-facing error codes (stable API).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientCode {
    /// Invalid or missing configuration.
    Config,
    /// A required credential is not configured.
    MissingCredential,
    /// Upstream service unreachable or errored.
    Upstream,
    /// Upstream did not answer within its bound.
    Timeout,
    /// Upstream answered with an unusable payload.
    Decode,
    /// Badge markup could not be produced.
    Render,
    /// Internal server error.
    Internal,
}

impl ClientCode {
    /// String representation used in JSON responses and metric labels.
    pub fn as_str(self) -> &'static str {
        match self {
            ClientCode::Config => "CONFIG",
            ClientCode::MissingCredential => "MISSING_CREDENTIAL",
            ClientCode::Upstream => "UPSTREAM",
            ClientCode::Timeout => "TIMEOUT",
            ClientCode::Decode => "DECODE",
            ClientCode::Render => "RENDER",
            ClientCode::Internal => "INTERNAL",
        }
    }
}

/// Shared result type.
pub type Result<T> = std::result::Result<T, ProfstatError>;

/// Unified error type used by core and gateway.
///
/// The `Display` output doubles as the human-readable failure reason stored
/// in a record's diagnostics, so messages are written for that audience.
#[derive(Debug, Error)]
pub enum ProfstatError {
    #[error("invalid config: {0}")]
    Config(String),
    #[error("{0}")]
    MissingCredential(String),
    #[error("{service} request failed: {reason}")]
    Upstream { service: &'static str, reason: String },
    #[error("{service} HTTP {status}")]
    UpstreamStatus { service: &'static str, status: u16 },
    #[error("{service} request timed out after {timeout_ms}ms")]
    Timeout { service: &'static str, timeout_ms: u64 },
    #[error("{service} returned an unreadable response: {reason}")]
    Decode { service: &'static str, reason: String },
    #[error("render failed: {0}")]
    Render(String),
    #[error("internal: {0}")]
    Internal(String),
}

impl ProfstatError {
    /// Map internal error to a stable client-facing code.
    pub fn client_code(&self) -> ClientCode {
        match self {
            ProfstatError::Config(_) => ClientCode::Config,
            ProfstatError::MissingCredential(_) => ClientCode::MissingCredential,
            ProfstatError::Upstream { .. } | ProfstatError::UpstreamStatus { .. } => {
                ClientCode::Upstream
            }
            ProfstatError::Timeout { .. } => ClientCode::Timeout,
            ProfstatError::Decode { .. } => ClientCode::Decode,
            ProfstatError::Render(_) => ClientCode::Render,
            ProfstatError::Internal(_) => ClientCode::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_reason_matches_provider_wording() {
        let e = ProfstatError::UpstreamStatus { service: "Weather API", status: 401 };
        assert_eq!(e.to_string(), "Weather API HTTP 401");
        assert_eq!(e.client_code().as_str(), "UPSTREAM");
    }

    #[test]
    fn missing_credential_is_bare_message() {
        let e = ProfstatError::MissingCredential("No weather API key configured".into());
        assert_eq!(e.to_string(), "No weather API key configured");
        assert_eq!(e.client_code(), ClientCode::MissingCredential);
    }
}
