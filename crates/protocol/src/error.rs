//! Protocol error types.

use thiserror::Error;

/// Errors that can occur while decoding wire payloads.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ProtocolError {
    #[error("invalid coordinate key {0:?}: expected three ':'-separated integers")]
    InvalidCoordinateKey(String),
}
