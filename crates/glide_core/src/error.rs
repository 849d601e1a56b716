//! Core error types

use thiserror::Error;

use crate::value::ValueType;

/// Property resolution and access errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PropertyError {
    /// The object (or its relation) has no property with this name
    #[error("Property not found: {0}")]
    NotFound(String),

    /// A child property was requested but the object has no relation to look it up on
    #[error("No relation to resolve child property: {0}")]
    NoRelation(String),

    /// A value did not match the property's declared type
    #[error("Type mismatch for {name}: expected {expected}, got {actual}")]
    TypeMismatch {
        name: String,
        expected: ValueType,
        actual: ValueType,
    },
}

/// Reactor registration errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ReactorError {
    /// The reactor no longer accepts sources
    #[error("Reactor is closed")]
    Closed,

    /// The reactor has been dropped
    #[error("Reactor is gone")]
    Gone,
}
