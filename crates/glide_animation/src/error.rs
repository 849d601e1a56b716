//! Animation error types

use glide_core::{PropertyError, ReactorError, ValueType};
use thiserror::Error;

/// Animation-related errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnimationError {
    /// Operation not valid in the animation's current lifecycle state
    #[error("Invalid animation state: {0}")]
    InvalidState(&'static str),

    /// The property does not exist on the target or its relation
    #[error("Property not found: {0}")]
    PropertyNotFound(String),

    /// Resolving the property required a relation the target does not have
    #[error("Target has no relation to resolve child property: {0}")]
    MissingRelation(String),

    /// The property's type can neither be interpolated nor snapped
    #[error("Property {name} has unsupported type {value_type}")]
    UnsupportedPropertyType { name: String, value_type: ValueType },

    /// The supplied value does not have the property's declared type
    #[error("Type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },

    /// The reactor refused the frame source
    #[error("Frame source registration failed: {0}")]
    Registration(#[from] ReactorError),

    /// Invalid configuration
    #[error("Invalid animation config: {0}")]
    Config(String),
}

impl From<PropertyError> for AnimationError {
    fn from(err: PropertyError) -> Self {
        match err {
            PropertyError::NotFound(name) => AnimationError::PropertyNotFound(name),
            PropertyError::NoRelation(name) => AnimationError::MissingRelation(name),
            PropertyError::TypeMismatch {
                name,
                expected,
                actual,
            } => AnimationError::TypeMismatch {
                name,
                expected,
                actual,
            },
        }
    }
}

/// Result type for animation operations
pub type Result<T> = std::result::Result<T, AnimationError>;
