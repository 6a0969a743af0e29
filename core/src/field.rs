//! Field declarations and per-field payload application.
//!
//! A [`FieldSpec`] describes one bindable field of a schema: the entity
//! accessor it writes through, the payload key it reads from, its kind,
//! and (for collections) the element kind. Applying a value dispatches on
//! the kind: scalars are (possibly) coerced and written; scalar collections
//! are coerced element-wise; nested-entity collections run the
//! reconciliation algorithm in [`reconcile`](crate::reconcile).

use serde_json::{Number, Value};

use crate::changes::ChangeSet;
use crate::diagnostics::BindWarning;
use crate::entity::{Entity, EntityRef, FieldValue};
use crate::error::{BindError, SchemaError};
use crate::kind::{ChildKind, FieldKind};
use crate::reconcile::reconcile_collection;

/// Declaration of one bindable field.
///
/// # Examples
///
/// ```
/// use entity_bind_core::{FieldKind, FieldSpec, SchemaError};
///
/// let title = FieldSpec::new("title", FieldKind::Text).required();
/// assert_eq!(title.name(), "title");
/// assert_eq!(title.source_key(), "title");
/// assert!(title.is_required());
///
/// // The payload key can differ from the accessor name.
/// let plays = FieldSpec::new("play_count", FieldKind::Number).with_source_key("plays");
/// assert_eq!(plays.source_key(), "plays");
///
/// // Kinds parsed from strings are validated.
/// let err = FieldSpec::parse("title", "varchar").unwrap_err();
/// assert_eq!(err, SchemaError::InvalidKind("varchar".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    source_key: String,
    kind: FieldKind,
    child: Option<ChildKind>,
    required: bool,
    allow_add: bool,
    allow_delete: bool,
}

impl FieldSpec {
    /// Creates a field with the given accessor name and kind.
    ///
    /// The payload key defaults to the accessor name; all flags default to
    /// false.
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        let name = name.into();
        Self {
            source_key: name.clone(),
            name,
            kind,
            child: None,
            required: false,
            allow_add: false,
            allow_delete: false,
        }
    }

    /// Creates a field from a kind name, failing with
    /// [`SchemaError::InvalidKind`] for strings outside the closed set.
    pub fn parse(name: impl Into<String>, kind: &str) -> Result<Self, SchemaError> {
        Ok(Self::new(name, kind.parse()?))
    }

    /// Overrides the payload key this field reads from.
    pub fn with_source_key(mut self, key: impl Into<String>) -> Self {
        self.source_key = key.into();
        self
    }

    /// Sets the element kind of a collection field.
    ///
    /// Fails with [`SchemaError::NotACollection`] when the field is not a
    /// collection (regardless of the child kind's own validity), and with
    /// [`SchemaError::InvalidChildKind`] when the child kind itself is
    /// unusable.
    ///
    /// # Examples
    ///
    /// ```
    /// use entity_bind_core::{ChildKind, FieldKind, FieldSpec, SchemaError};
    ///
    /// let tags = FieldSpec::new("tags", FieldKind::Collection)
    ///     .with_child_kind(ChildKind::Scalar(FieldKind::Text))
    ///     .unwrap();
    /// assert!(tags.child_kind().is_some());
    ///
    /// let err = FieldSpec::new("title", FieldKind::Text)
    ///     .with_child_kind(ChildKind::Scalar(FieldKind::Text))
    ///     .unwrap_err();
    /// assert_eq!(err, SchemaError::NotACollection("title".to_string()));
    /// ```
    pub fn with_child_kind(mut self, child: ChildKind) -> Result<Self, SchemaError> {
        if self.kind != FieldKind::Collection {
            return Err(SchemaError::NotACollection(self.name));
        }
        child.validate()?;
        self.child = Some(child);
        Ok(self)
    }

    /// Marks the field required.
    ///
    /// Required currently attaches no bind-time behavior beyond a
    /// [`BindWarning::MissingRequired`] diagnostic; it is carried for the
    /// future validation pass.
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    /// Marks the collection as allowing element additions. Reserved; not
    /// consulted during binding.
    pub fn allow_add(mut self) -> Self {
        self.allow_add = true;
        self
    }

    /// Marks the collection as allowing element deletions. Reserved; not
    /// consulted during binding.
    pub fn allow_delete(mut self) -> Self {
        self.allow_delete = true;
        self
    }

    /// Entity accessor name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Payload key this field reads from.
    pub fn source_key(&self) -> &str {
        &self.source_key
    }

    /// Field kind.
    pub fn kind(&self) -> FieldKind {
        self.kind
    }

    /// Element kind, when this is a collection field.
    pub fn child_kind(&self) -> Option<&ChildKind> {
        self.child.as_ref()
    }

    /// Whether the field is marked required.
    pub fn is_required(&self) -> bool {
        self.required
    }

    /// Whether element additions are allowed.
    pub fn allows_add(&self) -> bool {
        self.allow_add
    }

    /// Whether element deletions are allowed.
    pub fn allows_delete(&self) -> bool {
        self.allow_delete
    }

    /// Applies one payload value onto the entity through this field.
    pub(crate) fn apply_value(
        &self,
        object: &EntityRef,
        raw: &Value,
        changes: &mut ChangeSet,
    ) -> Result<(), BindError> {
        if self.required && raw.is_null() {
            changes.warn(BindWarning::MissingRequired {
                field: self.name.clone(),
            });
        }

        let value = match self.kind {
            FieldKind::Collection => self.collection_value(object, raw, changes)?,
            FieldKind::Number => FieldValue::Scalar(coerce_number(raw)),
            FieldKind::Mixed | FieldKind::Text => FieldValue::Scalar(raw.clone()),
        };

        if !object.borrow_mut().set(&self.name, value) {
            return Err(BindError::MissingAccessor {
                entity: object.borrow().entity_type().to_string(),
                field: self.name.clone(),
            });
        }
        Ok(())
    }

    fn collection_value(
        &self,
        object: &EntityRef,
        raw: &Value,
        changes: &mut ChangeSet,
    ) -> Result<FieldValue, BindError> {
        let empty = Vec::new();
        let incoming = match raw.as_array() {
            Some(items) => items,
            None => {
                changes.warn(BindWarning::NonArrayPayload {
                    field: self.name.clone(),
                });
                &empty
            }
        };

        match &self.child {
            Some(ChildKind::Nested(schema)) => {
                let current = self.current_items(object)?;
                let next = reconcile_collection(&self.name, current, incoming, schema, changes)?;
                Ok(FieldValue::Items(next))
            }
            Some(ChildKind::Scalar(kind)) => {
                let values = incoming
                    .iter()
                    .map(|item| match kind {
                        FieldKind::Number => coerce_number(item),
                        _ => item.clone(),
                    })
                    .collect();
                Ok(FieldValue::Scalar(Value::Array(values)))
            }
            // Unreachable through SchemaBuilder, which rejects collection
            // fields without a child kind; bind the raw array as-is.
            None => Ok(FieldValue::Scalar(Value::Array(incoming.clone()))),
        }
    }

    fn current_items(&self, object: &EntityRef) -> Result<Vec<EntityRef>, BindError> {
        let entity = object.borrow();
        match entity.get(&self.name) {
            Some(FieldValue::Items(items)) => Ok(items),
            Some(FieldValue::Scalar(_)) => Err(BindError::ExpectedItems {
                entity: entity.entity_type().to_string(),
                field: self.name.clone(),
            }),
            None => Err(BindError::MissingAccessor {
                entity: entity.entity_type().to_string(),
                field: self.name.clone(),
            }),
        }
    }
}

/// Coerces a numeric-looking string to a JSON number.
///
/// Anything else, including strings that do not parse as a finite number,
/// passes through unchanged.
pub(crate) fn coerce_number(value: &Value) -> Value {
    match value {
        Value::String(s) => match parse_number(s.trim()) {
            Some(number) => Value::Number(number),
            None => value.clone(),
        },
        _ => value.clone(),
    }
}

fn parse_number(s: &str) -> Option<Number> {
    if s.is_empty() {
        return None;
    }
    if let Ok(integer) = s.parse::<i64>() {
        return Some(Number::from(integer));
    }
    match s.parse::<f64>() {
        Ok(float) if float.is_finite() => Number::from_f64(float),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use crate::entity::Record;

    use super::*;

    #[test]
    fn test_number_coercion_of_numeric_strings() {
        assert_eq!(coerce_number(&json!("42")), json!(42));
        assert_eq!(coerce_number(&json!("  42  ")), json!(42));
        assert_eq!(coerce_number(&json!("4.5")), json!(4.5));
        assert_eq!(coerce_number(&json!("1e3")), json!(1000.0));
    }

    #[test]
    fn test_number_coercion_leaves_non_numeric_untouched() {
        assert_eq!(coerce_number(&json!("abc")), json!("abc"));
        assert_eq!(coerce_number(&json!("")), json!(""));
        assert_eq!(coerce_number(&json!("NaN")), json!("NaN"));
        assert_eq!(coerce_number(&json!("inf")), json!("inf"));
        assert_eq!(coerce_number(&json!(null)), json!(null));
        assert_eq!(coerce_number(&json!(true)), json!(true));
    }

    #[test]
    fn test_apply_scalar_number_coerces() {
        let record = Record::new("Track").with_scalar("duration").into_ref();
        let field = FieldSpec::new("duration", FieldKind::Number);
        let mut changes = ChangeSet::new();

        field.apply_value(&record, &json!("42"), &mut changes).unwrap();

        let entity = record.borrow();
        assert_eq!(entity.get("duration").unwrap().as_scalar(), Some(&json!(42)));
    }

    #[test]
    fn test_apply_text_passes_through() {
        let record = Record::new("Track").with_scalar("title").into_ref();
        let field = FieldSpec::new("title", FieldKind::Text);
        let mut changes = ChangeSet::new();

        field.apply_value(&record, &json!("abc"), &mut changes).unwrap();

        let entity = record.borrow();
        assert_eq!(entity.get("title").unwrap().as_scalar(), Some(&json!("abc")));
    }

    #[test]
    fn test_apply_missing_accessor_fails() {
        let record = Record::new("Track").with_scalar("title").into_ref();
        let field = FieldSpec::new("rating", FieldKind::Number);
        let mut changes = ChangeSet::new();

        let err = field
            .apply_value(&record, &json!(5), &mut changes)
            .unwrap_err();
        assert_eq!(
            err,
            BindError::MissingAccessor {
                entity: "Track".to_string(),
                field: "rating".to_string(),
            }
        );
    }

    #[test]
    fn test_scalar_collection_coerces_elements() {
        let record = Record::new("Album").with_scalar("ratings").into_ref();
        let field = FieldSpec::new("ratings", FieldKind::Collection)
            .with_child_kind(ChildKind::Scalar(FieldKind::Number))
            .unwrap();
        let mut changes = ChangeSet::new();

        field
            .apply_value(&record, &json!(["1", "x", 3]), &mut changes)
            .unwrap();

        let entity = record.borrow();
        assert_eq!(
            entity.get("ratings").unwrap().as_scalar(),
            Some(&json!([1, "x", 3]))
        );
        assert!(changes.warnings().is_empty());
    }

    #[test]
    fn test_non_array_collection_payload_binds_empty_with_warning() {
        let record = Record::new("Album").with_scalar("tags").into_ref();
        let field = FieldSpec::new("tags", FieldKind::Collection)
            .with_child_kind(ChildKind::Scalar(FieldKind::Text))
            .unwrap();
        let mut changes = ChangeSet::new();

        field
            .apply_value(&record, &json!("not-an-array"), &mut changes)
            .unwrap();

        let entity = record.borrow();
        assert_eq!(entity.get("tags").unwrap().as_scalar(), Some(&json!([])));
        assert_eq!(
            changes.warnings(),
            &[BindWarning::NonArrayPayload {
                field: "tags".to_string()
            }]
        );
    }

    #[test]
    fn test_scalar_value_in_nested_collection_field_fails() {
        use crate::schema::{Schema, SchemaBuilder, TypeDef};

        struct LeafType;
        impl TypeDef for LeafType {
            fn create_object(&self) -> EntityRef {
                Record::new("Leaf").with_scalar("id").into_ref()
            }
            fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
                schema.register_id("id");
                Ok(())
            }
        }

        let leaf = Schema::build(LeafType).unwrap();
        // The entity holds a scalar where the schema expects child items.
        let record = Record::new("Holder")
            .with_value("leaves", json!([1, 2]))
            .into_ref();
        let field = FieldSpec::new("leaves", FieldKind::Collection)
            .with_child_kind(ChildKind::nested(&leaf))
            .unwrap();
        let mut changes = ChangeSet::new();

        let err = field
            .apply_value(&record, &json!([]), &mut changes)
            .unwrap_err();
        assert_eq!(
            err,
            BindError::ExpectedItems {
                entity: "Holder".to_string(),
                field: "leaves".to_string(),
            }
        );
    }

    #[test]
    fn test_required_field_without_value_warns_but_binds() {
        let record = Record::new("Album").with_scalar("title").into_ref();
        let field = FieldSpec::new("title", FieldKind::Text).required();
        let mut changes = ChangeSet::new();

        field.apply_value(&record, &json!(null), &mut changes).unwrap();

        assert_eq!(
            changes.warnings(),
            &[BindWarning::MissingRequired {
                field: "title".to_string()
            }]
        );
        let entity = record.borrow();
        assert_eq!(entity.get("title").unwrap().as_scalar(), Some(&json!(null)));
    }
}
