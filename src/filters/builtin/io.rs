//! Image I/O operations: load, save

use crate::codec::{load_image, save_image, FileFormat};
use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::operation::{Category, Operation, OperationMetadata};
use crate::core::port::{ParameterDefinition, PortDefinition, Signature};
use crate::filters::registry::OperationRegistry;

/// Register I/O operations.
pub fn register(registry: &mut OperationRegistry) {
    registry.register(|| Box::new(LoadImage));
    registry.register(|| Box::new(SaveImage));
}

fn path_parameter(description: &str) -> ParameterDefinition {
    ParameterDefinition::path("path").with_description(description)
}

/// Loads an image from disk into the store.
#[derive(Debug, Clone)]
pub struct LoadImage;

impl Operation for LoadImage {
    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::builder("load", "Load Image")
            .description("Read a PPM or raster image file and store it under a name")
            .category(Category::Input)
            .alias("open")
            .tags(["ppm", "png", "jpeg", "bmp", "file"])
            .signature(
                Signature::new()
                    .parameter(path_parameter("Path to the image file"))
                    .output(
                        PortDefinition::output("image")
                            .with_display_name("name")
                            .with_description("Name to store the loaded image under"),
                    ),
            )
            .build()
    }

    fn validate(&self, ctx: &ExecutionContext) -> DispatchResult<()> {
        FileFormat::from_path(ctx.get_path("path")?)?;
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        let image = load_image(ctx.get_path("path")?, &ctx.config().ppm)?;
        ctx.set_output("image", image)
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

/// Writes a stored image to disk.
#[derive(Debug, Clone)]
pub struct SaveImage;

impl Operation for SaveImage {
    fn metadata(&self) -> OperationMetadata {
        OperationMetadata::builder("save", "Save Image")
            .description("Write a stored image; the extension picks the format")
            .category(Category::Output)
            .tags(["ppm", "png", "jpeg", "bmp", "file"])
            .signature(
                Signature::new()
                    .parameter(path_parameter("Destination file"))
                    .input(
                        PortDefinition::input("image")
                            .with_display_name("name")
                            .with_description("Name of the image to write"),
                    ),
            )
            .build()
    }

    fn validate(&self, ctx: &ExecutionContext) -> DispatchResult<()> {
        FileFormat::from_path(ctx.get_path("path")?)?;
        Ok(())
    }

    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()> {
        save_image(ctx.get_path("path")?, ctx.get_input("image")?)?;
        Ok(())
    }

    fn clone_box(&self) -> Box<dyn Operation> {
        Box::new(self.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::{CodecError, DispatchError};
    use crate::core::types::{Image, Value};

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("koala.ppm").to_string_lossy().into_owned();
        let image = Image::from_rows(&[vec![[1, 2, 3], [4, 5, 6]]]).unwrap();

        let mut save = ExecutionContext::new("save");
        save.add_parameter("path", Value::String(path.clone()));
        save.add_input("image", "koala", image.clone());
        SaveImage.validate(&save).unwrap();
        SaveImage.execute(&mut save).unwrap();
        assert!(save.take_outputs().unwrap().is_empty());

        let mut load = ExecutionContext::new("load");
        load.add_parameter("path", Value::String(path));
        load.add_destination("image", "copy");
        LoadImage.execute(&mut load).unwrap();
        assert_eq!(load.take_outputs().unwrap(), vec![("copy".to_string(), image)]);
    }

    #[test]
    fn test_validate_rejects_unknown_extension() {
        let mut ctx = ExecutionContext::new("load");
        ctx.add_parameter("path", Value::String("notes.txt".to_string()));
        assert!(matches!(
            LoadImage.validate(&ctx),
            Err(DispatchError::Codec(CodecError::UnsupportedFormat { .. }))
        ));
    }

    #[test]
    fn test_usages() {
        assert_eq!(LoadImage.metadata().usage(), "load path name");
        assert_eq!(SaveImage.metadata().usage(), "save path name");
    }
}
