//! # Prism - Named-image Processing Engine
//!
//! Prism loads raster images into a store of named images, transforms them
//! with a library of pixel-level and whole-image operations, and writes the
//! results back to disk. Commands can come from a script, from standard
//! input, or from a [`Session`](dispatch::Session) driving a single image.
//!
//! ## Features
//!
//! - **Kernel filters**: 3x3 blur and 5x5 sharpen with zero boundary
//! - **Tone operators**: brightness, greyscale variants, sepia, components,
//!   flips, RGB split and combine
//! - **Histograms**: peak-aligning color correction, levels remapping and a
//!   256x256 histogram plot
//! - **Haar compression** with a percentile threshold
//! - **Bilinear downscaling**
//! - **Partial application**: every single-input effect can be limited to a
//!   column split or to the black pixels of a mask
//! - **Codecs**: plain-text PPM plus PNG, JPEG, BMP and friends
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use prism::prelude::*;
//!
//! let mut dispatcher = Dispatcher::new();
//! dispatcher.execute("load", &["images/koala.ppm", "koala"])?;
//! dispatcher.execute("blur", &["koala", "koala-blur", "split", "50"])?;
//! dispatcher.execute("save", &["out/koala-blur.png", "koala-blur"])?;
//! # Ok::<(), prism::core::DispatchError>(())
//! ```
//!
//! The engine functions can also be called directly:
//!
//! ```rust
//! use prism::prelude::*;
//!
//! let image = Image::filled(2, 2, [200, 100, 50]).unwrap();
//! let grey = Effect::from_name("grayscale").unwrap().apply(&image);
//! assert_eq!(grey.pixel(0, 0), [118, 118, 118]);
//! ```
//!
//! ## Architecture
//!
//! - [`core`]: images, parameters and signatures, the `Operation` trait,
//!   errors, the execution context and the image store
//! - [`engine`]: the pure transformations
//! - [`codec`]: reading and writing files
//! - [`filters`]: the operation registry and built-in operations
//! - [`dispatch`]: command parsing, the dispatcher and the editing session
//! - [`config`]: TOML configuration

#![warn(clippy::all)]

pub mod codec;
pub mod config;
pub mod core;
pub mod dispatch;
pub mod engine;
pub mod filters;

/// Prelude module for convenient imports.
///
/// Import everything commonly needed with:
/// ```rust
/// use prism::prelude::*;
/// ```
pub mod prelude {
    // Core types
    pub use crate::core::types::{Channel, Image, Percentage, Pixel, Value};

    // Operations
    pub use crate::core::operation::{Category, Operation, OperationMetadata};
    pub use crate::core::port::{
        Constraint, ParamKind, ParameterDefinition, PortDefinition, PortDirection, Signature, Slot,
    };
    pub use crate::core::context::ExecutionContext;
    pub use crate::core::store::ImageStore;

    // Errors
    pub use crate::core::error::{
        CodecError, ConfigError, DispatchError, ImagingError, PrismError,
    };

    // Engine
    pub use crate::engine::{Effect, GreyscaleMode, Histogram, Kernel, Levels};

    // Codecs and configuration
    pub use crate::codec::{load_image, save_image, FileFormat};
    pub use crate::config::{CompressionMode, EngineConfig};

    // Registry
    pub use crate::filters::registry::{OperationFactory, OperationRegistry, RegistryBuilder};

    // Front ends
    pub use crate::dispatch::{
        Command, Dispatcher, Executed, ScriptEvent, ScriptFailure, ScriptReport, Session,
    };
}

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name.
pub const NAME: &str = env!("CARGO_PKG_NAME");
