//! Operation trait and operation metadata.
//!
//! An [`Operation`] is a named command that reads images from the store,
//! runs engine functions and names its results. Operations use a two-phase
//! design: `validate` checks bound parameters before any pixel work, and
//! `execute` produces outputs.

use crate::core::context::ExecutionContext;
use crate::core::error::DispatchResult;
use crate::core::port::Signature;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Category for organizing operations in the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// Reading images from disk
    Input,
    /// Writing images to disk
    Output,
    /// Kernel filters (blur, sharpen)
    Filter,
    /// Tone and color adjustments
    Color,
    /// Geometry changes and compression
    Transform,
    /// Channel extraction and recombination
    Channel,
    /// Analysis and measurement
    Analyze,
    /// Store bookkeeping
    Utility,
}

impl Category {
    /// Get the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Input => "Input",
            Category::Output => "Output",
            Category::Filter => "Filter",
            Category::Color => "Color",
            Category::Transform => "Transform",
            Category::Channel => "Channel",
            Category::Analyze => "Analyze",
            Category::Utility => "Utility",
        }
    }

    /// Get all categories in display order.
    pub fn all() -> &'static [Category] {
        &[
            Category::Input,
            Category::Output,
            Category::Filter,
            Category::Color,
            Category::Transform,
            Category::Channel,
            Category::Analyze,
            Category::Utility,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Metadata describing an operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OperationMetadata {
    /// Command word (e.g., "levels-adjust")
    pub id: String,
    /// Human-readable name (e.g., "Levels Adjust")
    pub name: String,
    pub category: Category,
    pub description: String,
    /// Accepted command-line shapes, tried in order
    pub signatures: Vec<Signature>,
    /// Alternative command words
    pub aliases: Vec<String>,
    /// Searchable tags
    pub tags: Vec<String>,
}

impl OperationMetadata {
    /// Create a new metadata builder.
    pub fn builder(id: impl Into<String>, name: impl Into<String>) -> OperationMetadataBuilder {
        OperationMetadataBuilder::new(id, name)
    }

    /// Find the first signature accepting `tokens`.
    pub fn signature_for<S: AsRef<str>>(&self, tokens: &[S]) -> Option<&Signature> {
        self.signatures.iter().find(|s| s.matches(tokens))
    }

    /// Usage lines for every signature.
    pub fn usages(&self) -> Vec<String> {
        self.signatures.iter().map(|s| s.usage(&self.id)).collect()
    }

    /// All usage lines joined for error messages.
    pub fn usage(&self) -> String {
        self.usages().join(" | ")
    }
}

/// Builder for OperationMetadata.
pub struct OperationMetadataBuilder {
    id: String,
    name: String,
    category: Category,
    description: String,
    signatures: Vec<Signature>,
    aliases: Vec<String>,
    tags: Vec<String>,
}

impl OperationMetadataBuilder {
    /// Create a new builder with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            category: Category::Utility,
            description: String::new(),
            signatures: Vec::new(),
            aliases: Vec::new(),
            tags: Vec::new(),
        }
    }

    /// Set the category.
    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    /// Set the description.
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add an accepted signature.
    pub fn signature(mut self, signature: Signature) -> Self {
        self.signatures.push(signature);
        self
    }

    /// Add an alternative command word.
    pub fn alias(mut self, alias: impl Into<String>) -> Self {
        self.aliases.push(alias.into());
        self
    }

    /// Add multiple tags.
    pub fn tags(mut self, tags: impl IntoIterator<Item = impl Into<String>>) -> Self {
        self.tags.extend(tags.into_iter().map(|t| t.into()));
        self
    }

    /// Build the metadata.
    pub fn build(self) -> OperationMetadata {
        OperationMetadata {
            id: self.id,
            name: self.name,
            category: self.category,
            description: self.description,
            signatures: self.signatures,
            aliases: self.aliases,
            tags: self.tags,
        }
    }
}

/// The core trait for dispatchable operations.
///
/// The dispatcher binds a command's tokens against one of the operation's
/// signatures, fills an [`ExecutionContext`] with the source images and
/// parsed parameters, then calls `validate` followed by `execute`. Outputs
/// set on the context are written to the store only when both succeed.
pub trait Operation: Send + Sync {
    /// Get the metadata for this operation.
    fn metadata(&self) -> OperationMetadata;

    /// Check cross-parameter rules that slot constraints cannot express.
    ///
    /// Default implementation accepts everything.
    fn validate(&self, _ctx: &ExecutionContext) -> DispatchResult<()> {
        Ok(())
    }

    /// Execute the operation.
    fn execute(&self, ctx: &mut ExecutionContext) -> DispatchResult<()>;

    /// Clone this operation into a boxed trait object.
    fn clone_box(&self) -> Box<dyn Operation>;
}

impl Clone for Box<dyn Operation> {
    fn clone(&self) -> Self {
        self.clone_box()
    }
}
