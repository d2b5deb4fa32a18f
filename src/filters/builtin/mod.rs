//! Built-in operation implementations.
//!
//! This module contains the commands that ship with Prism. Each submodule
//! exposes a `register` function; [`register_all`] installs all of them.

mod adjust;
mod analyze;
mod channels;
mod effects;
mod io;
mod transform;
mod utility;

use crate::core::port::{ParameterDefinition, PortDefinition, Signature};
use crate::filters::registry::OperationRegistry;

/// Register all built-in operations.
pub fn register_all(registry: &mut OperationRegistry) {
    io::register(registry);
    effects::register(registry);
    adjust::register(registry);
    channels::register(registry);
    analyze::register(registry);
    transform::register(registry);
    utility::register(registry);
}

// Re-export for direct access
pub use adjust::{Brighten, ColorCorrect, LevelsAdjust};
pub use analyze::HistogramPlot;
pub use channels::{RgbCombine, RgbSplit};
pub use effects::EffectOperation;
pub use io::{LoadImage, SaveImage};
pub use transform::{Compress, Downscale};
pub use utility::Reset;

// ============================================================================
// Shared slots
// ============================================================================

/// The image an operation reads, shown as `src`.
fn source_port() -> PortDefinition {
    PortDefinition::input("source")
        .with_display_name("src")
        .with_description("Name of the image to read")
}

/// The name the result is stored under, shown as `dst`.
fn destination_port() -> PortDefinition {
    PortDefinition::output("destination")
        .with_display_name("dst")
        .with_description("Name to store the result under")
}

/// Column-split percentage following the `split` keyword.
fn split_parameter() -> ParameterDefinition {
    ParameterDefinition::percentage("split")
        .with_display_name("p")
        .with_description("Transform columns up to this percentage of the width")
}

/// `src dst`
fn plain_signature() -> Signature {
    Signature::new().input(source_port()).output(destination_port())
}

/// `src dst split p`
fn split_signature() -> Signature {
    plain_signature().keyword("split").parameter(split_parameter())
}
