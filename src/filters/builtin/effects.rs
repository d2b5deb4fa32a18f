//! Single-input effects: kernels, tone, components and flips.

use super::{destination_port, plain_signature, source_port, split_signature};
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{PortDefinition, Signature};
use crate::core::types::Channel;
use crate::engine::{Effect, GreyscaleMode};
use crate::filters::registry::OperationRegistry;

/// Register one operation per effect command word.
pub fn register(registry: &mut OperationRegistry) {
    for (word, effect) in Effect::NAMED {
        registry.register(move || Box::new(EffectOperation::new(word, effect)));
    }
}

/// Applies an [`Effect`] whole, through a column split, or through a mask.
#[derive(Debug, Clone)]
pub struct EffectOperation {
    word: &'static str,
    effect: Effect,
}

impl EffectOperation {
    /// Bind an effect to the command word that invokes it.
    pub fn new(word: &'static str, effect: Effect) -> Self {
        Self { word, effect }
    }

    /// The effect this operation applies.
    pub fn effect(&self) -> Effect {
        self.effect
    }

    fn describe(&self) -> (&'static str, Category, &'static str) {
        match self.effect {
            Effect::Blur => ("Blur", Category::Filter, "Gaussian-like 3x3 blur"),
            Effect::Sharpen => ("Sharpen", Category::Filter, "5x5 sharpening kernel"),
            Effect::Sepia => ("Sepia", Category::Color, "Warm brown sepia tone"),
            Effect::Greyscale(GreyscaleMode::Luma) => (
                "Luma Greyscale",
                Category::Color,
                "Greyscale from Rec. 709 luma weights",
            ),
            Effect::Greyscale(GreyscaleMode::Value) => (
                "Value Greyscale",
                Category::Color,
                "Greyscale from the largest channel",
            ),
            Effect::Greyscale(GreyscaleMode::Intensity) => (
                "Intensity Greyscale",
                Category::Color,
                "Greyscale from the channel average",
            ),
            Effect::Component(Channel::Red) => {
                ("Red Component", Category::Channel, "Copy red into all three channels")
            }
            Effect::Component(Channel::Green) => {
                ("Green Component", Category::Channel, "Copy green into all three channels")
            }
            Effect::Component(Channel::Blue) => {
                ("Blue Component", Category::Channel, "Copy blue into all three channels")
            }
            Effect::FlipHorizontal => ("Horizontal Flip", Category::Transform, "Mirror left to right"),
            Effect::FlipVertical => ("Vertical Flip", Category::Transform, "Mirror top to bottom"),
        }
    }
}

impl Operation for EffectOperation {
    fn metadata(&self) -> OperationMetadata {
        let (name, category, description) = self.describe();
        let masked = Signature::new()
            .input(source_port())
            .input(
                PortDefinition::input("mask")
                    .with_description("Same-size image; pure black pixels receive the effect"),
            )
            .output(destination_port());

        OperationMetadata::builder(self.word, name)
            .description(description)
            .category(category)
            .tags(["effect", self.effect.name()])
            .signature(plain_signature())
            .signature(split_signature())
            .signature(masked)
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let source = ctx.get_input("source")?;

        let result = if let Some(mask) = ctx.get_input_optional("mask") {
            self.effect.apply_masked(source, mask)?
        } else if let Some(split) = ctx.get_percentage_optional("split")? {
            self.effect.apply_split(source, split)?
        } else {
            self.effect.apply(source)
        };

        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::{Image, Percentage, Value};

    fn context(effect: Effect) -> (EffectOperation, ExecutionContext) {
        let image = Image::from_fn(4, 2, |i, j| [(i * 50) as u8, (j * 60) as u8, 7]).unwrap();
        let mut ctx = ExecutionContext::new(effect.name());
        ctx.add_input("source", "koala", image);
        ctx.add_destination("destination", "out");
        (EffectOperation::new(effect.name(), effect), ctx)
    }

    #[test]
    fn test_every_effect_registers_three_shapes() {
        let mut registry = OperationRegistry::new();
        register(&mut registry);

        assert_eq!(registry.len(), Effect::NAMED.len());
        for (word, _) in Effect::NAMED {
            let metadata = registry.get_metadata(word).unwrap();
            assert_eq!(
                metadata.usages(),
                vec![
                    format!("{} src dst", word),
                    format!("{} src dst split p", word),
                    format!("{} src mask dst", word),
                ]
            );
        }
    }

    #[test]
    fn test_whole_image() {
        let (op, mut ctx) = context(Effect::FlipHorizontal);
        let expected = op.effect().apply(ctx.get_input("source").unwrap());
        op.execute(&mut ctx).unwrap();

        let outputs = ctx.take_outputs().unwrap();
        assert_eq!(outputs, vec![("out".to_string(), expected)]);
    }

    #[test]
    fn test_split_form() {
        let (op, mut ctx) = context(Effect::Sepia);
        ctx.add_parameter("split", Value::Integer(50));
        let expected = op
            .effect()
            .apply_split(ctx.get_input("source").unwrap(), Percentage::new(50).unwrap())
            .unwrap();
        op.execute(&mut ctx).unwrap();

        assert_eq!(ctx.take_outputs().unwrap()[0].1, expected);
    }

    #[test]
    fn test_mask_form_rejects_mismatched_mask() {
        let (op, mut ctx) = context(Effect::Blur);
        ctx.add_input("mask", "mask", Image::filled(1, 1, [0, 0, 0]).unwrap());
        assert!(op.execute(&mut ctx).unwrap_err().is_invalid_argument());
    }
}
