//! Physics error type

/// Errors raised while configuring or selecting a physics engine.
#[derive(Debug, Clone, PartialEq)]
pub enum PhysicsError {
    /// An engine parameter is out of range.
    InvalidParameter(String),
    /// The engine name does not match any known engine.
    UnknownEngine(String),
}

impl std::fmt::Display for PhysicsError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PhysicsError::InvalidParameter(msg) => write!(f, "invalid physics parameter: {msg}"),
            PhysicsError::UnknownEngine(name) => {
                write!(f, "unknown physics engine '{name}' (expected contact or fallback)")
            }
        }
    }
}

impl std::error::Error for PhysicsError {}
