//! Collection reconciliation against an entity's current children.
//!
//! The core algorithm of the crate: given the entity's current child
//! collection and an incoming payload array, match items by identity and
//! produce the new ordered collection plus add/edit/delete registrations.
//!
//! - Matched items are re-bound in place and registered to-edit; they land
//!   in the output at their incoming position, not their original one.
//! - Items without an id, or with an id matching no current item, become
//!   new objects registered to-add (the unknown-id case additionally
//!   records a [`BindWarning::UnknownItemId`] diagnostic).
//! - Current items never referenced by the payload are registered
//!   to-delete, in their original relative order.

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::changes::ChangeSet;
use crate::diagnostics::BindWarning;
use crate::entity::{Entity, EntityRef, FieldValue};
use crate::error::BindError;
use crate::schema::Schema;

/// Identity key for matching payload items to current collection elements.
///
/// Integer-looking string ids normalize to integers, so a payload id of `2`
/// matches an entity id of `"2"`. Non-integer numbers compare by canonical
/// text.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum IdKey {
    Null,
    Bool(bool),
    Int(i64),
    Text(String),
}

impl IdKey {
    fn from_value(value: &Value) -> IdKey {
        match value {
            Value::Null => IdKey::Null,
            Value::Bool(b) => IdKey::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => IdKey::Int(i),
                None => IdKey::Text(n.to_string()),
            },
            Value::String(s) => match s.parse::<i64>() {
                Ok(i) if i.to_string() == *s => IdKey::Int(i),
                _ => IdKey::Text(s.clone()),
            },
            other => IdKey::Text(other.to_string()),
        }
    }
}

/// Reconciles an incoming payload array against the current child
/// collection, returning the new ordered collection.
pub(crate) fn reconcile_collection(
    field: &str,
    current: Vec<EntityRef>,
    incoming: &[Value],
    schema: &Arc<Schema>,
    changes: &mut ChangeSet,
) -> Result<Vec<EntityRef>, BindError> {
    // Identity index over the current items, consumed as matches are found
    // so the leftovers fall out in their original relative order.
    let mut remaining: Vec<(IdKey, EntityRef)> = Vec::with_capacity(current.len());
    for item in current {
        let key = identity_of(&item, schema)?;
        remaining.push((key, item));
    }

    let mut next = Vec::with_capacity(incoming.len());
    for (index, value) in incoming.iter().enumerate() {
        let Some(item) = value.as_object() else {
            changes.warn(BindWarning::MalformedItem {
                field: field.to_string(),
                index,
            });
            continue;
        };

        let entity = match item.get(schema.id_name()) {
            Some(id) => {
                let key = IdKey::from_value(id);
                match remaining.iter().position(|(existing, _)| *existing == key) {
                    Some(position) => {
                        let (_, existing) = remaining.remove(position);
                        schema.apply_payload(&existing, item, changes)?;
                        changes.record_edit(schema, &existing);
                        existing
                    }
                    None => {
                        changes.warn(BindWarning::UnknownItemId {
                            field: field.to_string(),
                            id: id.clone(),
                        });
                        create_and_apply(schema, item, changes)?
                    }
                }
            }
            None => create_and_apply(schema, item, changes)?,
        };
        next.push(entity);
    }

    for (_, leftover) in remaining {
        changes.record_delete(schema, &leftover);
    }

    Ok(next)
}

fn create_and_apply(
    schema: &Arc<Schema>,
    item: &Map<String, Value>,
    changes: &mut ChangeSet,
) -> Result<EntityRef, BindError> {
    let entity = schema.create_object();
    schema.apply_payload(&entity, item, changes)?;
    changes.record_add(schema, &entity);
    Ok(entity)
}

fn identity_of(item: &EntityRef, schema: &Schema) -> Result<IdKey, BindError> {
    let entity = item.borrow();
    match entity.get(schema.id_accessor()) {
        Some(FieldValue::Scalar(value)) => Ok(IdKey::from_value(&value)),
        _ => Err(BindError::MissingAccessor {
            entity: entity.entity_type().to_string(),
            field: schema.id_accessor().to_string(),
        }),
    }
}
