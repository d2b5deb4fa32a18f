//! Execution context.
//!
//! The context carries the data flow of one command: source images fetched
//! from the store, parsed parameters, the store names the outputs will be
//! written under, and the outputs themselves.

use crate::config::EngineConfig;
use crate::core::error::{DispatchError, DispatchResult};
use crate::core::types::{Image, Percentage, Value};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Context provided during operation validation and execution.
#[derive(Debug)]
pub struct ExecutionContext {
    /// Command word of the operation being executed.
    pub operation: String,
    /// Source images keyed by port name.
    inputs: HashMap<String, Image>,
    /// Store names of the source images, for diagnostics.
    input_names: HashMap<String, String>,
    /// Parameter values.
    parameters: HashMap<String, Value>,
    /// Store names keyed by output port, in command order.
    destinations: IndexMap<String, String>,
    /// Output images set by the operation.
    outputs: HashMap<String, Image>,
    config: Arc<EngineConfig>,
}

impl ExecutionContext {
    /// Create a new execution context with default configuration.
    pub fn new(operation: impl Into<String>) -> Self {
        Self::with_config(operation, Arc::new(EngineConfig::default()))
    }

    /// Create a new execution context sharing `config`.
    pub fn with_config(operation: impl Into<String>, config: Arc<EngineConfig>) -> Self {
        Self {
            operation: operation.into(),
            inputs: HashMap::new(),
            input_names: HashMap::new(),
            parameters: HashMap::new(),
            destinations: IndexMap::new(),
            outputs: HashMap::new(),
            config,
        }
    }

    /// Add a source image fetched from the store under `store_name`.
    pub fn add_input(&mut self, port: impl Into<String>, store_name: impl Into<String>, image: Image) {
        let port = port.into();
        self.input_names.insert(port.clone(), store_name.into());
        self.inputs.insert(port, image);
    }

    /// Add a parameter value to the context.
    pub fn add_parameter(&mut self, name: impl Into<String>, value: Value) {
        self.parameters.insert(name.into(), value);
    }

    /// Declare the store name an output port will be written to.
    pub fn add_destination(&mut self, port: impl Into<String>, store_name: impl Into<String>) {
        self.destinations.insert(port.into(), store_name.into());
    }

    /// Engine configuration for this run.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    // ========================================================================
    // Input Getters
    // ========================================================================

    /// Get a source image by port name.
    pub fn get_input(&self, port: &str) -> DispatchResult<&Image> {
        self.inputs.get(port).ok_or_else(|| DispatchError::MissingInput {
            operation: self.operation.clone(),
            port: port.to_string(),
        })
    }

    /// Get a source image that only some signatures bind.
    pub fn get_input_optional(&self, port: &str) -> Option<&Image> {
        self.inputs.get(port)
    }

    /// Store name a source image was fetched from.
    pub fn input_name(&self, port: &str) -> Option<&str> {
        self.input_names.get(port).map(String::as_str)
    }

    /// Check if an input exists.
    pub fn has_input(&self, port: &str) -> bool {
        self.inputs.contains_key(port)
    }

    // ========================================================================
    // Parameter Getters
    // ========================================================================

    /// Get a parameter value by name.
    pub fn get_parameter(&self, name: &str) -> DispatchResult<&Value> {
        self.parameters
            .get(name)
            .ok_or_else(|| DispatchError::MissingParameter {
                operation: self.operation.clone(),
                parameter: name.to_string(),
            })
    }

    /// Get a parameter as an integer.
    pub fn get_integer(&self, name: &str) -> DispatchResult<i64> {
        let value = self.get_parameter(name)?;
        value.as_integer().ok_or_else(|| self.invalid(name, value, "not an integer"))
    }

    /// Get a parameter as a validated percentage.
    pub fn get_percentage(&self, name: &str) -> DispatchResult<Percentage> {
        Ok(Percentage::new(self.get_integer(name)?)?)
    }

    /// Get a percentage that only some signatures bind.
    pub fn get_percentage_optional(&self, name: &str) -> DispatchResult<Option<Percentage>> {
        if self.has_parameter(name) {
            self.get_percentage(name).map(Some)
        } else {
            Ok(None)
        }
    }

    /// Get a parameter as a string.
    pub fn get_string(&self, name: &str) -> DispatchResult<&str> {
        let value = self.get_parameter(name)?;
        value.as_string().ok_or_else(|| self.invalid(name, value, "not a string"))
    }

    /// Get a parameter as a filesystem path.
    pub fn get_path(&self, name: &str) -> DispatchResult<&Path> {
        self.get_string(name).map(Path::new)
    }

    /// Check if a parameter exists.
    pub fn has_parameter(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    fn invalid(&self, name: &str, value: &Value, reason: &str) -> DispatchError {
        DispatchError::InvalidArgument {
            operation: self.operation.clone(),
            parameter: name.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }

    // ========================================================================
    // Output Setters
    // ========================================================================

    /// Set an output image. The port must have a declared destination.
    pub fn set_output(&mut self, port: impl Into<String>, image: Image) -> DispatchResult<()> {
        let port = port.into();
        if !self.destinations.contains_key(&port) {
            return Err(DispatchError::OutputNotSet {
                operation: self.operation.clone(),
                port,
            });
        }
        self.outputs.insert(port, image);
        Ok(())
    }

    /// Check if an output has been set.
    pub fn has_output(&self, port: &str) -> bool {
        self.outputs.contains_key(port)
    }

    /// Store name an output port will be written to.
    pub fn destination(&self, port: &str) -> Option<&str> {
        self.destinations.get(port).map(String::as_str)
    }

    /// Pair every declared destination with its output image, in command
    /// order. Fails if any destination was left unset.
    pub fn take_outputs(mut self) -> DispatchResult<Vec<(String, Image)>> {
        let mut results = Vec::with_capacity(self.destinations.len());
        for (port, store_name) in self.destinations {
            let image = self.outputs.remove(&port).ok_or_else(|| DispatchError::OutputNotSet {
                operation: self.operation.clone(),
                port: port.clone(),
            })?;
            results.push((store_name, image));
        }
        Ok(results)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ImagingError;

    fn pixel() -> Image {
        Image::filled(1, 1, [1, 2, 3]).unwrap()
    }

    #[test]
    fn test_inputs_and_names() {
        let mut ctx = ExecutionContext::new("blur");
        ctx.add_input("source", "koala", pixel());

        assert!(ctx.has_input("source"));
        assert_eq!(ctx.input_name("source"), Some("koala"));
        assert!(matches!(
            ctx.get_input("mask"),
            Err(DispatchError::MissingInput { .. })
        ));
        assert!(ctx.get_input_optional("mask").is_none());
    }

    #[test]
    fn test_parameters() {
        let mut ctx = ExecutionContext::new("compress");
        ctx.add_parameter("percentage", Value::Integer(40));
        ctx.add_parameter("path", Value::String("a.ppm".into()));

        assert_eq!(ctx.get_percentage("percentage").unwrap().value(), 40);
        assert_eq!(ctx.get_path("path").unwrap(), Path::new("a.ppm"));
        assert!(ctx.get_integer("path").is_err());
        assert_eq!(ctx.get_percentage_optional("split").unwrap(), None);
    }

    #[test]
    fn test_percentage_out_of_range() {
        let mut ctx = ExecutionContext::new("blur");
        ctx.add_parameter("percentage", Value::Integer(150));

        let err = ctx.get_percentage("percentage").unwrap_err();
        assert!(matches!(
            err,
            DispatchError::Imaging(ImagingError::PercentageOutOfRange(150))
        ));
    }

    #[test]
    fn test_outputs_follow_destinations() {
        let mut ctx = ExecutionContext::new("rgb-split");
        ctx.add_destination("red", "r");
        ctx.add_destination("green", "g");

        assert!(ctx.set_output("blue", pixel()).is_err());
        ctx.set_output("green", pixel()).unwrap();
        ctx.set_output("red", pixel()).unwrap();

        let names: Vec<String> = ctx
            .take_outputs()
            .unwrap()
            .into_iter()
            .map(|(name, _)| name)
            .collect();
        assert_eq!(names, ["r", "g"]);
    }

    #[test]
    fn test_unset_output_is_error() {
        let mut ctx = ExecutionContext::new("histogram");
        ctx.add_destination("destination", "hist");

        assert!(matches!(
            ctx.take_outputs(),
            Err(DispatchError::OutputNotSet { .. })
        ));
    }
}
