//! Operation module.
//!
//! Contains the operation registry and the built-in operations.

pub mod registry;
pub mod builtin;

pub use registry::{OperationFactory, OperationRegistry, RegistryBuilder};
