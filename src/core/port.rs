//! Port, parameter and signature definitions for operations.
//!
//! An operation's command line is described by one or more [`Signature`]s.
//! Each signature is an ordered list of [`Slot`]s: numeric or path
//! parameters, source image names, destination image names and literal
//! keywords such as `split`.

use crate::core::types::Value;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of an image port.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum PortDirection {
    /// Names an image read from the store
    Input,
    /// Names an image written to the store
    Output,
}

/// Kind of a textual parameter.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum ParamKind {
    Integer,
    Path,
}

impl fmt::Display for ParamKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamKind::Integer => write!(f, "integer"),
            ParamKind::Path => write!(f, "path"),
        }
    }
}

/// An image port: a slot holding the name of an image in the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortDefinition {
    /// Name used by the operation to look the image up
    pub name: String,
    /// Placeholder shown in usage strings
    pub display_name: String,
    pub direction: PortDirection,
    pub description: String,
}

/// A parameter slot parsed from a command token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ParameterDefinition {
    pub name: String,
    /// Placeholder shown in usage strings
    pub display_name: String,
    pub kind: ParamKind,
    pub description: String,
    /// Constraints checked before the operation runs
    pub constraints: Vec<Constraint>,
}

/// Constraints on parameter values.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", content = "params")]
pub enum Constraint {
    /// Integer must be within `[min, max]`
    Range { min: i64, max: i64 },
    /// Integer must be > 0
    Positive,
    /// String must not be empty
    NotEmpty,
}

/// One position in a command line.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "slot", rename_all = "lowercase")]
pub enum Slot {
    Parameter(ParameterDefinition),
    Image(PortDefinition),
    /// A literal word that must appear verbatim (case-insensitive)
    Keyword { word: String },
}

/// An ordered command-line shape accepted by an operation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Signature {
    pub slots: Vec<Slot>,
}

// ============================================================================
// PortDefinition Builder Pattern
// ============================================================================

impl PortDefinition {
    /// A source image name.
    pub fn input(name: impl Into<String>) -> Self {
        Self::new(name.into(), PortDirection::Input)
    }

    /// A destination image name.
    pub fn output(name: impl Into<String>) -> Self {
        Self::new(name.into(), PortDirection::Output)
    }

    fn new(name: String, direction: PortDirection) -> Self {
        Self {
            display_name: name_to_display(&name),
            name,
            direction,
            description: String::new(),
        }
    }

    /// Set the placeholder shown in usage strings.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

// ============================================================================
// ParameterDefinition Builder Pattern
// ============================================================================

impl ParameterDefinition {
    /// Create a new parameter definition.
    pub fn new(name: impl Into<String>, kind: ParamKind) -> Self {
        let name = name.into();
        Self {
            display_name: name_to_display(&name),
            name,
            kind,
            description: String::new(),
            constraints: Vec::new(),
        }
    }

    /// An integer percentage in `[0, 100]`.
    pub fn percentage(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Integer).with_range(0, 100)
    }

    /// A file path.
    pub fn path(name: impl Into<String>) -> Self {
        Self::new(name, ParamKind::Path).with_constraint(Constraint::NotEmpty)
    }

    /// Set the placeholder shown in usage strings.
    pub fn with_display_name(mut self, display_name: impl Into<String>) -> Self {
        self.display_name = display_name.into();
        self
    }

    /// Set the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Add a range constraint.
    pub fn with_range(mut self, min: i64, max: i64) -> Self {
        self.constraints.push(Constraint::Range { min, max });
        self
    }

    /// Add a constraint.
    pub fn with_constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    /// Parse a raw token into a value of this parameter's kind.
    pub fn parse(&self, token: &str) -> Result<Value, String> {
        match self.kind {
            ParamKind::Integer => token
                .parse::<i64>()
                .map(Value::Integer)
                .map_err(|_| format!("'{}' is not an integer", token)),
            ParamKind::Path => Ok(Value::String(token.to_string())),
        }
    }

    /// Validate a value against this parameter's constraints.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        for constraint in &self.constraints {
            constraint.validate(value)?;
        }
        Ok(())
    }
}

// ============================================================================
// Constraint Validation
// ============================================================================

impl Constraint {
    /// Validate a value against this constraint.
    pub fn validate(&self, value: &Value) -> Result<(), String> {
        match self {
            Constraint::Range { min, max } => {
                if let Some(num) = value.as_integer() {
                    if num < *min || num > *max {
                        return Err(format!(
                            "Value {} is out of range [{}, {}]",
                            num, min, max
                        ));
                    }
                }
            }

            Constraint::Positive => {
                if let Some(num) = value.as_integer() {
                    if num <= 0 {
                        return Err(format!("Value {} must be positive", num));
                    }
                }
            }

            Constraint::NotEmpty => {
                if value.as_string().is_some_and(str::is_empty) {
                    return Err("Value cannot be empty".to_string());
                }
            }
        }

        Ok(())
    }

    /// Get a human-readable description of this constraint.
    pub fn description(&self) -> String {
        match self {
            Constraint::Range { min, max } => format!("Must be between {} and {}", min, max),
            Constraint::Positive => "Must be positive".to_string(),
            Constraint::NotEmpty => "Cannot be empty".to_string(),
        }
    }
}

// ============================================================================
// Signatures
// ============================================================================

impl Slot {
    /// Placeholder for usage strings.
    pub fn placeholder(&self) -> &str {
        match self {
            Slot::Parameter(p) => &p.display_name,
            Slot::Image(p) => &p.display_name,
            Slot::Keyword { word } => word,
        }
    }
}

impl Signature {
    /// Create an empty signature.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter slot.
    pub fn parameter(mut self, parameter: ParameterDefinition) -> Self {
        self.slots.push(Slot::Parameter(parameter));
        self
    }

    /// Append a source image slot.
    pub fn input(mut self, port: PortDefinition) -> Self {
        self.slots.push(Slot::Image(port));
        self
    }

    /// Append a destination image slot.
    pub fn output(mut self, port: PortDefinition) -> Self {
        self.slots.push(Slot::Image(port));
        self
    }

    /// Append a literal keyword.
    pub fn keyword(mut self, word: impl Into<String>) -> Self {
        self.slots.push(Slot::Keyword { word: word.into() });
        self
    }

    /// Append every slot of `rest`.
    pub fn then(mut self, rest: Signature) -> Self {
        self.slots.extend(rest.slots);
        self
    }

    /// Number of tokens this signature consumes.
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Whether `tokens` has the right length and every keyword is in place.
    pub fn matches<S: AsRef<str>>(&self, tokens: &[S]) -> bool {
        tokens.len() == self.slots.len()
            && self.slots.iter().zip(tokens).all(|(slot, token)| match slot {
                Slot::Keyword { word } => token.as_ref().eq_ignore_ascii_case(word),
                _ => true,
            })
    }

    /// Iterate over the parameter slots.
    pub fn parameters(&self) -> impl Iterator<Item = &ParameterDefinition> {
        self.slots.iter().filter_map(|slot| match slot {
            Slot::Parameter(p) => Some(p),
            _ => None,
        })
    }

    /// Iterate over the image ports with the given direction.
    pub fn ports(&self, direction: PortDirection) -> impl Iterator<Item = &PortDefinition> {
        self.slots.iter().filter_map(move |slot| match slot {
            Slot::Image(p) if p.direction == direction => Some(p),
            _ => None,
        })
    }

    /// Render a usage line such as `blur src dst split p`.
    pub fn usage(&self, operation: &str) -> String {
        std::iter::once(operation)
            .chain(self.slots.iter().map(Slot::placeholder))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Convert snake_case name to a kebab-case placeholder.
fn name_to_display(name: &str) -> String {
    name.replace('_', "-")
}
