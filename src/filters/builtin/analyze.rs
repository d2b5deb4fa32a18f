//! Histogram plotting.

use super::plain_signature;
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::engine::render_histogram;
use crate::filters::registry::OperationRegistry;

/// Register analysis operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(HistogramPlot));
}

/// Renders the channel histograms as a 256x256 line plot.
#[derive(Debug, Clone)]
pub struct HistogramPlot;

impl Operation for HistogramPlot {
    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::builder("histogram", "Histogram")
            .description("Plot the red, green and blue histograms on a 256x256 grid")
            .category(Category::Analyze)
            .tags(["plot", "distribution"])
            .signature(plain_signature())
            .build()
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let plot = render_histogram(ctx.get_input("source")?);
        ctx.set_output("destination", plot)
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
    fn test_plot_is_square() {
        let mut ctx = ExecutionContext::new("histogram");
        ctx.add_input("source", "tiny", Image::filled(3, 1, [5, 5, 5]).unwrap());
        ctx.add_destination("destination", "plot");
        HistogramPlot.execute(&mut ctx).unwrap();

        let (_, plot) = ctx.take_outputs().unwrap().remove(0);
        assert_eq!(plot.dimensions(), (256, 256));
    }
}
