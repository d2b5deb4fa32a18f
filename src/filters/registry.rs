//! Operation registry for managing available commands.

use crate::core::operation::{Category, Operation, OperationMetadata};
use indexmap::IndexMap;
use std::collections::HashMap;
use std::sync::Arc;

/// Factory function for creating operation instances.
pub type OperationFactory = Arc<dyn Fn() -> Box<dyn Operation> + Send + Sync>;

/// Registry entry containing metadata and factory.
#[derive(Clone)]
pub struct RegistryEntry {
    /// Factory function to create instances.
    pub factory: OperationFactory,
    /// Cached metadata (avoids creating an instance just to read it).
    pub metadata: OperationMetadata,
}

/// Registry for all available operations.
///
/// Operations are keyed by their command word. Aliases resolve to the same
/// entry, and lookups through [`resolve`](Self::resolve) are
/// case-insensitive.
pub struct OperationRegistry {
    /// Operations indexed by command word, in registration order.
    operations: IndexMap<String, RegistryEntry>,
    /// Alias to command word.
    aliases: HashMap<String, String>,
    /// Command words grouped by category.
    categories: IndexMap<Category, Vec<String>>,
}

impl OperationRegistry {
    /// Create a new empty registry.
    pub fn new() -> Self {
        Self {
            operations: IndexMap::new(),
            aliases: HashMap::new(),
            categories: IndexMap::new(),
        }
    }

    /// Create a registry pre-populated with the built-in operations.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        crate::filters::builtin::register_all(&mut registry);
        registry
    }

    /// Register an operation type. A later registration with the same
    /// command word replaces the earlier one.
    pub fn register<F>(&mut self, factory: F)
    where
        F: Fn() -> Box<dyn Operation> + Send + Sync + 'static,
    {
        let metadata = factory().metadata();
        let id = metadata.id.to_lowercase();
        let category = metadata.category;

        for alias in &metadata.aliases {
            self.aliases.insert(alias.to_lowercase(), id.clone());
        }

        let entry = RegistryEntry {
            factory: Arc::new(factory),
            metadata,
        };

        if let Some(previous) = self.operations.insert(id.clone(), entry) {
            if let Some(ids) = self.categories.get_mut(&previous.metadata.category) {
                ids.retain(|i| *i != id);
            }
        }

        self.categories.entry(category).or_default().push(id);
    }

    /// Map a command word or alias (any case) to its registered id.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let lowered = name.to_lowercase();
        if let Some((id, _)) = self.operations.get_key_value(&lowered) {
            return Some(id.as_str());
        }
        self.aliases
            .get(&lowered)
            .and_then(|id| self.operations.get_key_value(id))
            .map(|(id, _)| id.as_str())
    }

    /// Create a new instance of an operation by command word or alias.
    pub fn create(&self, name: &str) -> Option<Box<dyn Operation>> {
        self.resolve(name)
            .and_then(|id| self.operations.get(id))
            .map(|entry| (entry.factory)())
    }

    /// Get metadata for an operation without creating an instance.
    pub fn get_metadata(&self, name: &str) -> Option<&OperationMetadata> {
        self.resolve(name)
            .and_then(|id| self.operations.get(id))
            .map(|entry| &entry.metadata)
    }

    /// Check if an operation is registered under this word or alias.
    pub fn contains(&self, name: &str) -> bool {
        self.resolve(name).is_some()
    }

    /// Get all registered command words.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.operations.keys().map(String::as_str)
    }

    /// Get all registered operations' metadata.
    pub fn operations(&self) -> impl Iterator<Item = &OperationMetadata> {
        self.operations.values().map(|entry| &entry.metadata)
    }

    /// Get command words by category.
    pub fn operations_by_category(&self, category: Category) -> Vec<&str> {
        self.categories
            .get(&category)
            .map(|ids| ids.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Search operations by id, name, description or tag.
    pub fn search(&self, query: &str) -> Vec<&str> {
        let query = query.to_lowercase();

        self.operations
            .iter()
            .filter(|(_, entry)| {
                let metadata = &entry.metadata;
                metadata.id.contains(&query)
                    || metadata.name.to_lowercase().contains(&query)
                    || metadata.description.to_lowercase().contains(&query)
                    || metadata.tags.iter().any(|t| t.to_lowercase().contains(&query))
            })
            .map(|(id, _)| id.as_str())
            .collect()
    }

    /// Command words close to an unknown `name`, for "did you mean" hints.
    ///
    /// Words sharing a three-letter prefix with `name`, or contained in it,
    /// come first; otherwise the plain search results are used.
    pub fn suggestions(&self, name: &str) -> Vec<&str> {
        let lowered = name.to_lowercase();
        let prefix: String = lowered.chars().take(3).collect();

        let close: Vec<&str> = self
            .ids()
            .filter(|id| {
                (prefix.chars().count() == 3 && id.starts_with(&prefix)) || lowered.contains(id)
            })
            .collect();

        if close.is_empty() && !lowered.is_empty() {
            self.search(&lowered)
        } else {
            close
        }
    }

    /// Unregister an operation and its aliases.
    pub fn unregister(&mut self, name: &str) -> bool {
        let Some(id) = self.resolve(name).map(str::to_string) else {
            return false;
        };
        let Some(entry) = self.operations.shift_remove(&id) else {
            return false;
        };
        self.aliases.retain(|_, target| *target != id);
        if let Some(ids) = self.categories.get_mut(&entry.metadata.category) {
            ids.retain(|i| *i != id);
        }
        true
    }

    /// Get the total number of registered operations.
    pub fn len(&self) -> usize {
        self.operations.len()
    }

    /// Check if registry is empty.
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Get operations grouped by category, in category display order, each
    /// group sorted by command word.
    pub fn grouped_by_category(&self) -> IndexMap<Category, Vec<&OperationMetadata>> {
        let mut grouped: IndexMap<Category, Vec<&OperationMetadata>> = IndexMap::new();

        for category in Category::all() {
            let mut members: Vec<&OperationMetadata> = self
                .operations
                .values()
                .map(|entry| &entry.metadata)
                .filter(|metadata| metadata.category == *category)
                .collect();
            if members.is_empty() {
                continue;
            }
            members.sort_by(|a, b| a.id.cmp(&b.id));
            grouped.insert(*category, members);
        }

        grouped
    }
}

impl Default for OperationRegistry {
    fn default() -> Self {
        Self::with_builtins()
    }
}

/// Builder for creating a customized registry.
pub struct RegistryBuilder {
    registry: OperationRegistry,
    include_builtins: bool,
}

impl RegistryBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self {
            registry: OperationRegistry::new(),
            include_builtins: true,
        }
    }

    /// Include or exclude built-in operations.
    pub fn with_builtins(mut self, include: bool) -> Self {
        self.include_builtins = include;
        self
    }

    /// Register a custom operation. Custom operations win over built-ins
    /// with the same command word.
    pub fn register<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Operation> + Send + Sync + 'static,
    {
        self.registry.register(factory);
        self
    }

    /// Build the registry.
    pub fn build(self) -> OperationRegistry {
        if !self.include_builtins {
            return self.registry;
        }
        let mut registry = OperationRegistry::with_builtins();
        for entry in self.registry.operations.into_values() {
            let factory = entry.factory;
            registry.register(move || factory());
        }
        registry
    }
}

impl Default for RegistryBuilder {
    fn default() -> Self {
        Self::new()
    }
}
