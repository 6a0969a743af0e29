//! Entity capability interface and shared entity references.
//!
//! Binding never inspects concrete domain types. Instead, every bindable
//! entity implements [`Entity`], a small get/set capability surface keyed
//! by field name. An accessor that does not exist reports as `None`/`false`
//! and surfaces to callers as
//! [`BindError::MissingAccessor`](crate::BindError::MissingAccessor).
//!
//! Entities are held behind [`EntityRef`] (`Rc<RefCell<dyn Entity>>`)
//! because one object can appear in several places at once: inside its
//! parent's collection and inside the add/edit/delete buckets. Identity is
//! reference identity ([`same_entity`]), never value equality.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Shared handle to a live domain entity.
pub type EntityRef = Rc<RefCell<dyn Entity>>;

/// Value held by a single entity field.
///
/// Scalar fields (including scalar collections, which bind as JSON arrays)
/// hold a [`Value`]; nested-entity collections hold shared references to
/// the child entities themselves.
#[derive(Debug, Clone)]
pub enum FieldValue {
    /// A plain payload value.
    Scalar(Value),
    /// An ordered collection of child entities.
    Items(Vec<EntityRef>),
}

impl FieldValue {
    /// Returns the scalar value, if this is a scalar field.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            FieldValue::Scalar(value) => Some(value),
            FieldValue::Items(_) => None,
        }
    }

    /// Returns the child entities, if this is an item collection.
    pub fn as_items(&self) -> Option<&[EntityRef]> {
        match self {
            FieldValue::Scalar(_) => None,
            FieldValue::Items(items) => Some(items),
        }
    }
}

/// Capability interface implemented by bindable domain entities.
///
/// Replaces runtime accessor-name lookup with an explicit surface: `get`
/// returns `None` and `set` returns `false` when the entity has no such
/// field, which the binder treats as a fatal schema/entity mismatch.
pub trait Entity: fmt::Debug {
    /// Entity type name, used in errors and diagnostics.
    fn entity_type(&self) -> &'static str;

    /// Reads a field value; `None` means the accessor does not exist.
    fn get(&self, field: &str) -> Option<FieldValue>;

    /// Writes a field value; `false` means the accessor does not exist.
    fn set(&mut self, field: &str, value: FieldValue) -> bool;
}

/// Wraps an entity into a shared [`EntityRef`].
pub fn entity_ref(entity: impl Entity + 'static) -> EntityRef {
    Rc::new(RefCell::new(entity))
}

/// Reference identity for entities.
///
/// Two refs are the same entity iff they point at the same allocation;
/// equal field values on distinct objects never compare as the same.
pub fn same_entity(a: &EntityRef, b: &EntityRef) -> bool {
    std::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

/// Map-backed entity with a declared field set.
///
/// Useful for tests, prototypes, and callers that do not want a bespoke
/// entity struct. Scalar fields start as `null`, item fields as an empty
/// collection; undeclared fields report as missing accessors.
///
/// # Examples
///
/// ```
/// use entity_bind_core::{Entity, FieldValue, Record};
/// use serde_json::json;
///
/// let mut track = Record::new("Track")
///     .with_value("id", json!(7))
///     .with_scalar("title");
///
/// assert_eq!(track.get("id").unwrap().as_scalar(), Some(&json!(7)));
/// assert!(track.set("title", FieldValue::Scalar(json!("Intro"))));
/// assert!(!track.set("rating", FieldValue::Scalar(json!(5))));
/// ```
#[derive(Debug, Clone)]
pub struct Record {
    entity_type: &'static str,
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    /// Creates a record with no declared fields.
    pub fn new(entity_type: &'static str) -> Self {
        Self {
            entity_type,
            fields: BTreeMap::new(),
        }
    }

    /// Declares a scalar field, initialized to `null`.
    pub fn with_scalar(mut self, name: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Scalar(Value::Null));
        self
    }

    /// Declares a scalar field with an initial value.
    pub fn with_value(mut self, name: &str, value: Value) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Scalar(value));
        self
    }

    /// Declares an item-collection field, initially empty.
    pub fn with_items(mut self, name: &str) -> Self {
        self.fields
            .insert(name.to_string(), FieldValue::Items(Vec::new()));
        self
    }

    /// Wraps this record into a shared [`EntityRef`].
    pub fn into_ref(self) -> EntityRef {
        Rc::new(RefCell::new(self))
    }

    /// Reads a scalar field value, for assertions and quick access.
    pub fn scalar(&self, name: &str) -> Option<Value> {
        self.get(name)?.as_scalar().cloned()
    }

    /// Reads an item-collection field, for assertions and quick access.
    pub fn items(&self, name: &str) -> Option<Vec<EntityRef>> {
        Some(self.get(name)?.as_items()?.to_vec())
    }
}

impl Entity for Record {
    fn entity_type(&self) -> &'static str {
        self.entity_type
    }

    fn get(&self, field: &str) -> Option<FieldValue> {
        self.fields.get(field).cloned()
    }

    fn set(&mut self, field: &str, value: FieldValue) -> bool {
        match self.fields.get_mut(field) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }
}
