//! Field kind definitions for schema declarations.
//!
//! [`FieldKind`] is the closed set of kinds a declared field can take.
//! [`ChildKind`] describes the element kind of a collection field as a
//! tagged variant: either a scalar kind (the elements are plain values) or
//! a nested [`Schema`] (the elements are child entities reconciled by
//! identity).

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;
use crate::schema::Schema;

/// Kind of value a declared field binds.
///
/// The set is closed: constructing a kind from any other string fails with
/// [`SchemaError::InvalidKind`].
///
/// # Examples
///
/// ```
/// use entity_bind_core::{FieldKind, SchemaError};
///
/// let kind: FieldKind = "number".parse().unwrap();
/// assert_eq!(kind, FieldKind::Number);
///
/// let err = "datetime".parse::<FieldKind>().unwrap_err();
/// assert_eq!(err, SchemaError::InvalidKind("datetime".to_string()));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Ordered sequence of elements; the element kind is a [`ChildKind`].
    Collection,
    /// Opaque value passed through unchanged.
    Mixed,
    /// Numeric value; numeric-looking strings are coerced on bind.
    Number,
    /// Textual value passed through unchanged.
    Text,
}

impl FieldKind {
    /// The closed kind set, in declaration order.
    pub const ALL: [FieldKind; 4] = [
        FieldKind::Collection,
        FieldKind::Mixed,
        FieldKind::Number,
        FieldKind::Text,
    ];

    /// Canonical lowercase name, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Collection => "collection",
            FieldKind::Mixed => "mixed",
            FieldKind::Number => "number",
            FieldKind::Text => "text",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = SchemaError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "collection" => Ok(FieldKind::Collection),
            "mixed" => Ok(FieldKind::Mixed),
            "number" => Ok(FieldKind::Number),
            "text" => Ok(FieldKind::Text),
            other => Err(SchemaError::InvalidKind(other.to_string())),
        }
    }
}

/// Element kind of a collection field.
///
/// `Scalar` elements are coerced (for [`FieldKind::Number`]) or passed
/// through; `Nested` elements are child entities reconciled against the
/// entity's current collection by identity.
///
/// A scalar child kind of `collection` is rejected: nesting collections
/// requires a child schema.
///
/// # Examples
///
/// ```
/// use entity_bind_core::{ChildKind, FieldKind, SchemaError};
///
/// let numbers = ChildKind::parse("number").unwrap();
/// assert!(matches!(numbers, ChildKind::Scalar(FieldKind::Number)));
///
/// let err = ChildKind::parse("collection").unwrap_err();
/// assert_eq!(err, SchemaError::InvalidChildKind("collection".to_string()));
/// ```
#[derive(Clone)]
pub enum ChildKind {
    /// Elements are plain payload values of the given kind.
    Scalar(FieldKind),
    /// Elements are child entities described by a nested schema.
    Nested(Arc<Schema>),
}

impl ChildKind {
    /// Builds a scalar child kind, rejecting `collection`.
    pub fn scalar(kind: FieldKind) -> Result<Self, SchemaError> {
        let child = ChildKind::Scalar(kind);
        child.validate()?;
        Ok(child)
    }

    /// Builds a nested child kind from a shared schema.
    pub fn nested(schema: &Arc<Schema>) -> Self {
        ChildKind::Nested(Arc::clone(schema))
    }

    /// Parses a scalar child kind from its string name.
    ///
    /// Unrecognized names (and `collection`) fail with
    /// [`SchemaError::InvalidChildKind`].
    pub fn parse(kind: &str) -> Result<Self, SchemaError> {
        let parsed = kind
            .parse::<FieldKind>()
            .map_err(|_| SchemaError::InvalidChildKind(kind.to_string()))?;
        ChildKind::scalar(parsed)
    }

    pub(crate) fn validate(&self) -> Result<(), SchemaError> {
        match self {
            ChildKind::Scalar(FieldKind::Collection) => Err(SchemaError::InvalidChildKind(
                FieldKind::Collection.to_string(),
            )),
            _ => Ok(()),
        }
    }
}

impl fmt::Debug for ChildKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChildKind::Scalar(kind) => f.debug_tuple("Scalar").field(kind).finish(),
            ChildKind::Nested(schema) => f.debug_tuple("Nested").field(&schema.id()).finish(),
        }
    }
}
