//! Tone adjustments: brightness, color correction and levels.

use super::{plain_signature, split_signature};
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{ParamKind, ParameterDefinition, Signature};
use crate::engine::{adjust_levels, brighten, color_correct, Levels};
use crate::filters::registry::OperationRegistry;

/// Register adjustment operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(Brighten));
    registry.register(|| Box::new(ColorCorrect));
    registry.register(|| Box::new(LevelsAdjust));
}

/// Adds a constant to every channel.
#[derive(Debug, Clone)]
pub struct Brighten;

impl Operation for Brighten {
    fn metadata(&self) -> OperationMetadata {
        let delta = ParameterDefinition::new("delta", ParamKind::Integer)
            .with_description("Amount added to each channel; negative darkens");

        OperationMetadata::builder("brighten", "Brighten")
            .description("Add a constant to every channel, clamping to 0-255")
            .category(Category::Color)
            .tags(["brightness", "darken"])
            .signature(Signature::new().parameter(delta).then(plain_signature()))
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let delta = ctx.get_integer("delta")?;
        let result = brighten(ctx.get_input("source")?, delta);
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Aligns the per-channel histogram peaks.
#[derive(Debug, Clone)]
pub struct ColorCorrect;

impl Operation for ColorCorrect {
    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::builder("color-correct", "Color Correct")
            .description("Shift each channel so its histogram peak meets the average peak")
            .category(Category::Color)
            .tags(["histogram", "white balance"])
            .signature(plain_signature())
            .signature(split_signature())
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let split = ctx.get_percentage_optional("split")?;
        let result = color_correct(ctx.get_input("source")?, split);
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Remaps tones through black, mid and white points.
#[derive(Debug, Clone)]
pub struct LevelsAdjust;

impl LevelsAdjust {
    fn levels(ctx: &ExecutionContext) -> DispatchResult<Levels> {
        Ok(Levels::new(
            ctx.get_integer("shadow")?,
            ctx.get_integer("mid")?,
            ctx.get_integer("white")?,
        )?)
    }
}

impl Operation for LevelsAdjust {
    fn metadata(&self) -> OperationMetadata {
        let level = |name: &str, display: &str, description: &str| {
            ParameterDefinition::new(name, ParamKind::Integer)
                .with_display_name(display)
                .with_description(description)
                .with_range(0, 255)
        };
        let points = Signature::new()
            .parameter(level("shadow", "s", "Input level mapped to black"))
            .parameter(level("mid", "m", "Input level mapped to the middle grey"))
            .parameter(level("white", "w", "Input level mapped to white"));

        let whole = points.clone().then(plain_signature());
        let split = points.then(split_signature());

        OperationMetadata::builder("levels-adjust", "Levels Adjust")
            .description("Piecewise-linear remap through shadow, mid and white points")
            .category(Category::Color)
            .alias("levels")
            .tags(["curves", "contrast"])
            .signature(whole)
            .signature(split)
            .build()
    }

    fn validate(&self, ctx: &ExecutionContext) -> DispatchResult<()> {
        Self::levels(ctx).map(|_| ())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let levels = Self::levels(ctx)?;
        let split = ctx.get_percentage_optional("split")?;
        let result = adjust_levels(ctx.get_input("source")?, levels, split);
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}
