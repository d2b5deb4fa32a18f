//! Store bookkeeping operations.

use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{PortDefinition, Signature};
use crate::filters::registry::OperationRegistry;

/// Register utility operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(Reset));
}

/// Copies one stored image onto another name.
///
/// With a snapshot taken at load time, `reset koala koala-original` undoes
/// every edit made to `koala` since.
#[derive(Debug, Clone)]
pub struct Reset;

impl Operation for Reset {
    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::builder("reset", "Reset")
            .description("Overwrite the target image with a copy of the source image")
            .category(Category::Utility)
            .alias("copy")
            .tags(["restore", "undo", "snapshot"])
            .signature(
                Signature::new()
                    .output(
                        PortDefinition::output("target")
                            .with_description("Name to overwrite"),
                    )
                    .input(
                        PortDefinition::input("source")
                            .with_description("Name of the image to copy"),
                    ),
            )
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let image = ctx.get_input("source")?.clone();
        ctx.set_output("target", image)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}
