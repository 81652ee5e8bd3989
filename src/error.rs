//! Unified error handling for talkback.
//!
//! Each concern owns a `thiserror` enum; [`TalkbackError`] ties them
//! together for the service layer, and `anyhow` is only used by `main`.

use crate::config::ConfigError;
use crate::endpoint::EndpointError;
use crate::session::SessionState;
use talkback_proto::transport::TransportReadError;
use talkback_proto::ProtocolError;
use thiserror::Error;

// ============================================================================
// Connection failures (transport establish / loss)
// ============================================================================

/// The transport could not be established, or was lost.
///
/// Surfaced to the supervisor, which decides whether to stop or restart.
#[derive(Debug, Error)]
pub enum ConnectionFailure {
    #[error("failed to connect to {endpoint}: {source}")]
    Connect {
        endpoint: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TLS handshake with {host} failed: {source}")]
    Tls {
        host: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid TLS server name: {0}")]
    InvalidServerName(String),

    #[error("read error: {0}")]
    Transport(#[from] TransportReadError),

    #[error("write error: {0}")]
    Write(#[from] ProtocolError),

    #[error("connection closed: {0}")]
    Closed(String),
}

impl ConnectionFailure {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connect { .. } => "connect_failed",
            Self::Tls { .. } => "tls_failed",
            Self::InvalidServerName(_) => "invalid_server_name",
            Self::Transport(_) => "transport_read",
            Self::Write(_) => "transport_write",
            Self::Closed(_) => "closed",
        }
    }
}

// ============================================================================
// Top-level errors
// ============================================================================

/// Errors surfaced by the talkback core.
#[derive(Debug, Error)]
pub enum TalkbackError {
    #[error(transparent)]
    Connection(#[from] ConnectionFailure),

    /// Picking from a response set with no entries.
    #[error("response set is empty")]
    EmptyResponseSet,

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Endpoint(#[from] EndpointError),

    /// A lifecycle signal arrived out of order.
    #[error("invalid session transition: {from} -> {to}")]
    InvalidTransition {
        from: SessionState,
        to: SessionState,
    },

    /// The outbound queue no longer accepts messages (a QUIT is pending).
    #[error("outbound queue closed")]
    Outbound,
}

impl TalkbackError {
    /// Get a static error code string for log labeling.
    #[inline]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Connection(e) => e.error_code(),
            Self::EmptyResponseSet => "empty_response_set",
            Self::Config(_) => "config",
            Self::Endpoint(_) => "endpoint",
            Self::InvalidTransition { .. } => "invalid_transition",
            Self::Outbound => "outbound_closed",
        }
    }
}
