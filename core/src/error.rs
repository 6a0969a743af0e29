//! Error types for schema construction and payload binding.
//!
//! Two distinct failure classes exist. [`SchemaError`] covers schema
//! misconfiguration, which is a programming error: it is raised while a
//! schema is being defined and aborts setup. [`BindError`] covers a
//! mismatch between a schema and the live entity graph it is applied to,
//! which aborts the bind and fails the request.
//!
//! Data-quality problems in the payload itself (a non-array where a
//! collection was expected, a stale id) are deliberately *not* errors; they
//! are collected as [`BindWarning`](crate::BindWarning)s and the bind
//! continues with partial results.

use thiserror::Error;

/// Errors raised while defining a schema.
///
/// All variants indicate misconfiguration and should surface at application
/// startup, when schemas are built.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SchemaError {
    /// Field kind string is not in the closed kind set.
    #[error("unknown field kind: {0}")]
    InvalidKind(String),

    /// Child kind is not usable as a collection element kind.
    #[error("unknown child kind: {0}")]
    InvalidChildKind(String),

    /// A child kind was set on a field that is not a collection.
    #[error("field '{0}' is not a collection")]
    NotACollection(String),

    /// A collection field was registered without an element kind.
    #[error("collection field '{0}' requires a child kind")]
    MissingChildKind(String),

    /// Two fields in the same schema share a name.
    #[error("duplicate field in schema: {0}")]
    DuplicateField(String),
}

/// Errors raised while applying a payload onto a live entity graph.
///
/// Both variants mean the entity does not match what its schema declares,
/// so the bind cannot proceed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BindError {
    /// The entity (or a collection element) lacks an accessor the schema
    /// expects.
    #[error("entity '{entity}' has no accessor for field '{field}'")]
    MissingAccessor { entity: String, field: String },

    /// A collection field on the entity holds a scalar where child items
    /// were expected.
    #[error("collection field '{field}' on entity '{entity}' does not hold child items")]
    ExpectedItems { entity: String, field: String },
}

/// Convenience alias for binding results.
///
/// Defaults the error to [`BindError`]; schema-construction code can name
/// [`SchemaError`] explicitly.
pub type Result<T, E = BindError> = std::result::Result<T, E>;
