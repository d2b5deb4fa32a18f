//! Splitting an image into channel images and recombining them.

use super::{destination_port, source_port};
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{PortDefinition, Signature};
use crate::core::types::Channel;
use crate::engine::{rgb_combine, rgb_split};
use crate::filters::registry::OperationRegistry;

/// Register channel operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(RgbSplit));
    registry.register(|| Box::new(RgbCombine));
}

fn port_name(channel: Channel) -> &'static str {
    match channel {
        Channel::Red => "red",
        Channel::Green => "green",
        Channel::Blue => "blue",
    }
}

/// Writes the red, green and blue components as three images.
#[derive(Debug, Clone)]
pub struct RgbSplit;

impl Operation for RgbSplit {
    fn metadata(&self) -> OperationMetadata {
        let signature = Channel::ALL.iter().fold(
            Signature::new().input(source_port()),
            |signature, &channel| {
                signature.output(
                    PortDefinition::output(port_name(channel))
                        .with_display_name(format!("{}-name", port_name(channel)))
                        .with_description(format!("Name for the {} component", port_name(channel))),
                )
            },
        );

        OperationMetadata::builder("rgb-split", "RGB Split")
            .description("Split an image into its red, green and blue components")
            .category(Category::Channel)
            .tags(["channels", "separate"])
            .signature(signature)
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let parts = rgb_split(ctx.get_input("source")?);
        for (channel, image) in Channel::ALL.into_iter().zip(parts) {
            ctx.set_output(port_name(channel), image)?;
        }
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Takes red from one image, green from a second and blue from a third.
#[derive(Debug, Clone)]
pub struct RgbCombine;

impl Operation for RgbCombine {
    fn metadata(&self) -> OperationMetadata {
        let signature = Channel::ALL.iter().fold(
            Signature::new().output(destination_port()),
            |signature, &channel| {
                signature.input(
                    PortDefinition::input(port_name(channel))
                        .with_display_name(format!("{}-name", port_name(channel)))
                        .with_description(format!("Image supplying the {} channel", port_name(channel))),
                )
            },
        );

        OperationMetadata::builder("rgb-combine", "RGB Combine")
            .description("Build an image from the channels of three same-sized images")
            .category(Category::Channel)
            .tags(["channels", "merge"])
            .signature(signature)
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let result = rgb_combine(
            ctx.get_input("red")?,
            ctx.get_input("green")?,
            ctx.get_input("blue")?,
        )?;
        ctx.set_output("destination", result)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Image;

    #[test]
    fn test_usages() {
        assert_eq!(RgbSplit.metadata().usage(), "rgb-split src red-name green-name blue-name");
        assert_eq!(RgbCombine.metadata().usage(), "rgb-combine dst red-name green-name blue-name");
    }

    #[test]
    fn test_split_outputs_in_order() {
        let mut ctx = ExecutionContext::new("rgb-split");
        ctx.add_input("source", "koala", Image::filled(2, 1, [1, 2, 3]).unwrap());
        ctx.add_destination("red", "r");
        ctx.add_destination("green", "g");
        ctx.add_destination("blue", "b");
        RgbSplit.execute(&mut ctx).unwrap();

        let outputs = ctx.take_outputs().unwrap();
        let names: Vec<&str> = outputs.iter().map(|(name, _)| name.as_str()).collect();
        assert_eq!(names, ["r", "g", "b"]);
        assert_eq!(outputs[1].1.pixel(0, 1), [2, 2, 2]);
    }

    #[test]
    fn test_combine_rejects_mismatch() {
        let mut ctx = ExecutionContext::new("rgb-combine");
        ctx.add_input("red", "r", Image::filled(2, 2, [1, 0, 0]).unwrap());
        ctx.add_input("green", "g", Image::filled(2, 2, [0, 1, 0]).unwrap());
        ctx.add_input("blue", "b", Image::filled(3, 2, [0, 0, 1]).unwrap());
        ctx.add_destination("destination", "out");

        assert!(RgbCombine.execute(&mut ctx).unwrap_err().is_invalid_argument());
    }
}
