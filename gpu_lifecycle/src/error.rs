//! Error types for the GPU lifecycle core
//!
//! Only recoverable conditions are expressed as `Error` values: backend
//! failures while creating GPU objects and features a backend does not
//! provide. Caller contract violations are fatal and go through
//! `engine_fatal!` instead.

use std::fmt;

/// Result type for GPU lifecycle operations
pub type Result<T> = std::result::Result<T, Error>;

/// GPU lifecycle errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Backend-specific error (Vulkan, Direct3D 12, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, view, etc.)
    InvalidResource(String),

    /// Initialization failed (device, allocator, subsystems)
    InitializationFailed(String),

    /// The backend does not implement the requested feature
    Unsupported(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::Unsupported(msg) => write!(f, "Unsupported: {}", msg),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
