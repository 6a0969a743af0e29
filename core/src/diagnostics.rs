//! Recoverable data-quality diagnostics collected during binding.
//!
//! None of these abort a bind: compatible fields are still assigned and the
//! change buckets still accumulate. They exist so callers (and the future
//! validation pass) can see what the payload got wrong instead of having
//! anomalies silently tolerated.

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

/// A non-fatal anomaly observed while applying a payload.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BindWarning {
    /// A collection field received something other than an array (including
    /// nothing at all); it was bound as an empty collection.
    #[error("collection field '{field}' received a non-array payload")]
    NonArrayPayload { field: String },

    /// An incoming collection item carried an id that matches no current
    /// item; it was treated as a new object.
    #[error("collection field '{field}' references unknown id {id}")]
    UnknownItemId { field: String, id: Value },

    /// An incoming collection item was not an object; it was skipped.
    #[error("collection field '{field}' item {index} is not an object")]
    MalformedItem { field: String, index: usize },

    /// A field marked required had no payload value. Informational only:
    /// the required flag attaches no other behavior yet.
    #[error("required field '{field}' is missing from the payload")]
    MissingRequired { field: String },
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_warning_display_names_the_field() {
        let warning = BindWarning::UnknownItemId {
            field: "tracks".to_string(),
            id: json!(42),
        };
        assert_eq!(
            warning.to_string(),
            "collection field 'tracks' references unknown id 42"
        );
    }

    #[test]
    fn test_warning_serializes_with_kind_tag() {
        let warning = BindWarning::NonArrayPayload {
            field: "tags".to_string(),
        };
        let json = serde_json::to_value(&warning).unwrap();
        assert_eq!(json["kind"], "non_array_payload");
        assert_eq!(json["field"], "tags");
    }
}
