//! Core types and traits for Prism.
//!
//! This module contains the foundational types shared by the engine, the
//! codecs and the dispatcher:
//! - Value types (Image, Channel, Percentage)
//! - Port, parameter and signature definitions
//! - The Operation trait and its metadata
//! - Error types
//! - The execution context and the named-image store

pub mod types;
pub mod port;
pub mod error;
pub mod context;
pub mod operation;
pub mod store;

// Re-export commonly used types
pub use types::{Channel, Image, Percentage, Pixel, Value};
pub use port::{Constraint, ParamKind, ParameterDefinition, PortDefinition, PortDirection, Signature, Slot};
pub use error::{CodecError, ConfigError, DispatchError, ImagingError, PrismError};
pub use context::ExecutionContext;
pub use operation::{Category, Operation, OperationMetadata};
pub use store::ImageStore;
