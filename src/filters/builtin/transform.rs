//! Size-changing and lossy transforms: compression and downscaling.

use super::plain_signature;
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{Constraint, ParamKind, ParameterDefinition, Signature};
use crate::engine::{compress, downscale};
use crate::filters::registry::OperationRegistry;

/// Register transform operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(Compress));
    registry.register(|| Box::new(Downscale));
}

/// Haar-wavelet compression with a percentile threshold.
#[derive(Debug, Clone)]
pub struct Compress;

impl Operation for Compress {
    fn metadata(&self) -> OperationMetadata {
        let percentage = ParameterDefinition::percentage("percentage")
            .with_description("Percentile of coefficients below which detail is discarded");

        OperationMetadata::builder("compress", "Compress")
            .description("Zero small Haar wavelet coefficients and reconstruct")
            .category(Category::Transform)
            .tags(["haar", "wavelet", "lossy"])
            .signature(Signature::new().parameter(percentage).then(plain_signature()))
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let percentage = ctx.get_percentage("percentage")?;
        let mode = ctx.config().compression.mode;
        let result = compress(ctx.get_input("source")?, percentage, mode);
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Bilinear downscale to explicit dimensions.
#[derive(Debug, Clone)]
pub struct Downscale;

impl Operation for Downscale {
    fn metadata(&self) -> OperationMetadata {
        let dimension = |name: &str| {
            ParameterDefinition::new(name, ParamKind::Integer)
                .with_description(format!("Target {}, at most the source {}", name, name))
                .with_constraint(Constraint::Positive)
        };

        OperationMetadata::builder("downscale", "Downscale")
            .description("Shrink to a smaller size with bilinear interpolation")
            .category(Category::Transform)
            .alias("resize")
            .tags(["bilinear", "shrink"])
            .signature(
                Signature::new()
                    .parameter(dimension("width"))
                    .parameter(dimension("height"))
                    .then(plain_signature()),
            )
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let width = ctx.get_integer("width")?;
        let height = ctx.get_integer("height")?;
        let result = downscale(ctx.get_input("source")?, width, height)?;
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{CompressionMode, EngineConfig};
    use crate::core::error::{DispatchError, ImagingError};
    use crate::core::types::{Image, Value};
    use std::sync::Arc;

    fn pair() -> Image {
        Image::from_rows(&[vec![[100; 3], [50; 3]]]).unwrap()
    }

    fn compress_with(mode: CompressionMode, percentage: i64) -> Image {
        let mut config = EngineConfig::default();
        config.compression.mode = mode;
        let mut ctx = ExecutionContext::with_config("compress", Arc::new(config));
        ctx.add_input("source", "pair", pair());
        ctx.add_parameter("percentage", Value::Integer(percentage));
        ctx.add_destination("destination", "out");
        Compress.execute(&mut ctx).unwrap();
        ctx.take_outputs().unwrap().remove(0).1
    }

    #[test]
    fn test_compress_follows_configured_mode() {
        assert_eq!(compress_with(CompressionMode::Percentile, 0), pair());
        assert_eq!(compress_with(CompressionMode::Percentile, 90).pixel(0, 1), [75, 75, 75]);
        assert_eq!(compress_with(CompressionMode::Reference, 0).pixel(0, 0), [37, 37, 37]);
    }

    #[test]
    fn test_downscale_rejects_upscale() {
        let mut ctx = ExecutionContext::new("downscale");
        ctx.add_input("source", "pair", pair());
        ctx.add_parameter("width", Value::Integer(3));
        ctx.add_parameter("height", Value::Integer(1));
        ctx.add_destination("destination", "out");

        assert!(matches!(
            Downscale.execute(&mut ctx),
            Err(DispatchError::Imaging(ImagingError::InvalidTargetSize { .. }))
        ));
    }

    #[test]
    fn test_usages() {
        assert_eq!(Compress.metadata().usage(), "compress percentage src dst");
        assert_eq!(Downscale.metadata().usage(), "downscale width height src dst");
    }
}
