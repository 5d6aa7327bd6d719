//! Oracle error type
//!
//! Only startup can fail hard (configuration, arguments). Everything that
//! goes wrong during a toss is recovered locally and logged.

use crate::physics::PhysicsError;

#[derive(Debug)]
pub enum OracleError {
    /// Standard I/O error.
    Io(std::io::Error),
    /// JSON serialization/deserialization error.
    Json(serde_json::Error),
    /// A configuration value is out of range.
    InvalidConfig(String),
    /// A reading key is not three heads/tails symbols.
    InvalidReadingKey(String),
    /// A command line argument could not be understood.
    InvalidArgument(String),
    /// Engine configuration or selection failed.
    Physics(PhysicsError),
}

impl std::fmt::Display for OracleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OracleError::Io(e) => write!(f, "IO error: {e}"),
            OracleError::Json(e) => write!(f, "JSON error: {e}"),
            OracleError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            OracleError::InvalidReadingKey(key) => {
                write!(f, "invalid reading key '{key}' (expected three of 阳/阴 or H/T)")
            }
            OracleError::InvalidArgument(msg) => write!(f, "invalid argument: {msg}"),
            OracleError::Physics(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for OracleError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            OracleError::Io(e) => Some(e),
            OracleError::Json(e) => Some(e),
            OracleError::Physics(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for OracleError {
    fn from(e: std::io::Error) -> Self {
        OracleError::Io(e)
    }
}

impl From<serde_json::Error> for OracleError {
    fn from(e: serde_json::Error) -> Self {
        OracleError::Json(e)
    }
}

impl From<PhysicsError> for OracleError {
    fn from(e: PhysicsError) -> Self {
        OracleError::Physics(e)
    }
}
