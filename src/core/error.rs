//! Error types for Prism.
//!
//! Uses thiserror for structured errors, one enum per layer:
//! - [`ImagingError`]: pure engine failures (bad arguments, mismatched sizes)
//! - [`CodecError`]: reading and writing image files
//! - [`DispatchError`]: store lookups, command parsing and argument binding
//! - [`ConfigError`]: loading the engine configuration
//!
//! [`PrismError`] wraps all of them for callers that do not care which layer
//! failed.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for Prism.
#[derive(Error, Debug)]
pub enum PrismError {
    #[error("Imaging error: {0}")]
    Imaging(#[from] ImagingError),

    #[error("Codec error: {0}")]
    Codec(#[from] CodecError),

    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors raised by the transformation engine.
///
/// Engine functions never touch the store or the filesystem, so every
/// variant describes a bad input.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ImagingError {
    #[error("Image dimensions must be positive, got {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("Pixel buffer holds {actual} samples, expected {expected} for a {width}x{height} image")]
    BufferLength {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("Percentage must be within 0 - 100, got {0}")]
    PercentageOutOfRange(i64),

    #[error("Invalid levels ({shadow}, {mid}, {white}): {reason}")]
    InvalidLevels {
        shadow: i64,
        mid: i64,
        white: i64,
        reason: String,
    },

    #[error("{context}: expected {expected_width}x{expected_height}, got {width}x{height}")]
    DimensionMismatch {
        context: String,
        expected_width: u32,
        expected_height: u32,
        width: u32,
        height: u32,
    },

    #[error("Cannot downscale {width}x{height} to {new_width}x{new_height}")]
    InvalidTargetSize {
        width: u32,
        height: u32,
        new_width: i64,
        new_height: i64,
    },

    #[error("Kernel must be an odd square, got size {size} with {len} weights")]
    InvalidKernel { size: usize, len: usize },

    #[error("Unsupported filter: {0}")]
    UnsupportedFilter(String),
}

/// Errors from image decoders and encoders.
#[derive(Error, Debug)]
pub enum CodecError {
    #[error("Cannot access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Image codec failure: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid PPM data: {0}")]
    Ppm(String),

    #[error("Unsupported file format '{extension}' for {path}")]
    UnsupportedFormat { path: PathBuf, extension: String },

    #[error(transparent)]
    Imaging(#[from] ImagingError),
}

/// Errors raised while routing a command to the engine.
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Image '{name}' not found")]
    ImageNotFound { name: String },

    #[error("Unknown operation '{0}'")]
    UnknownOperation(String),

    #[error("Wrong arguments for '{operation}'; usage: {usage}")]
    WrongArity { operation: String, usage: String },

    #[error("Invalid value '{value}' for '{parameter}' of '{operation}': {reason}")]
    InvalidArgument {
        operation: String,
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("Missing input '{port}' for '{operation}'")]
    MissingInput { operation: String, port: String },

    #[error("Missing parameter '{parameter}' for '{operation}'")]
    MissingParameter { operation: String, parameter: String },

    #[error("Operation '{operation}' did not produce output '{port}'")]
    OutputNotSet { operation: String, port: String },

    #[error("Cannot read script {path}: {source}")]
    Script {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error(transparent)]
    Imaging(#[from] ImagingError),

    #[error(transparent)]
    Codec(#[from] CodecError),
}

/// Errors from loading an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Cannot read configuration {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed configuration: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Error Utilities
// ============================================================================

impl ImagingError {
    /// Whether the error is an invalid-argument failure (range or dimensions).
    pub fn is_invalid_argument(&self) -> bool {
        !matches!(self, ImagingError::UnsupportedFilter(_))
    }
}

impl DispatchError {
    /// Whether the error is an invalid-argument failure.
    pub fn is_invalid_argument(&self) -> bool {
        match self {
            DispatchError::InvalidArgument { .. } | DispatchError::WrongArity { .. } => true,
            DispatchError::Imaging(e) => e.is_invalid_argument(),
            _ => false,
        }
    }

    /// Check if a script run can continue past this error.
    ///
    /// Everything except an unreadable script is local to one command.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, DispatchError::Script { .. })
    }

    /// Get a suggestion for fixing this error.
    pub fn suggested_fix(&self) -> Option<String> {
        match self {
            DispatchError::ImageNotFound { name } => {
                Some(format!("Load or create '{}' before using it", name))
            }
            DispatchError::WrongArity { usage, .. } => Some(format!("Use: {}", usage)),
            DispatchError::Imaging(ImagingError::PercentageOutOfRange(_)) => {
                Some("Pick a percentage between 0 and 100".to_string())
            }
            DispatchError::Imaging(ImagingError::InvalidLevels { .. }) => {
                Some("Levels need 0 <= shadow < mid < white <= 255".to_string())
            }
            _ => None,
        }
    }
}

/// Result type alias for engine operations.
pub type ImagingResult<T> = Result<T, ImagingError>;

/// Result type alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Result type alias for dispatcher operations.
pub type DispatchResult<T> = Result<T, DispatchError>;
