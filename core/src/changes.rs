//! Per-invocation change accumulation and schema-tree aggregation.
//!
//! A [`ChangeSet`] is the explicit accumulator threaded through one
//! binding invocation: per-schema add/edit/delete buckets plus the
//! collected warnings. Nothing here lives on the schema itself: two
//! bindings sharing a schema can never interleave their buckets, because
//! each owns its accumulator.
//!
//! Bucket membership is deduplicated by reference identity: an object
//! registered twice (for example, appearing in two places in a payload)
//! appears once.

use std::collections::HashMap;

use crate::diagnostics::BindWarning;
use crate::entity::{EntityRef, same_entity};
use crate::schema::{Schema, SchemaId};

#[derive(Debug, Default)]
struct Buckets {
    to_add: Vec<EntityRef>,
    to_edit: Vec<EntityRef>,
    to_delete: Vec<EntityRef>,
}

/// Accumulated changes and diagnostics for one binding invocation.
///
/// # Examples
///
/// ```
/// use entity_bind_core::*;
///
/// struct NoteType;
/// impl TypeDef for NoteType {
///     fn create_object(&self) -> EntityRef {
///         Record::new("Note").with_scalar("id").into_ref()
///     }
///     fn define_fields(&self, _schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
///         Ok(())
///     }
/// }
///
/// let schema = Schema::build(NoteType).unwrap();
/// let note = schema.create_object();
///
/// let mut changes = ChangeSet::new();
/// changes.record_add(&schema, &note);
/// changes.record_add(&schema, &note); // deduplicated
///
/// assert_eq!(changes.additions(&schema).len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct ChangeSet {
    buckets: HashMap<SchemaId, Buckets>,
    warnings: Vec<BindWarning>,
}

impl ChangeSet {
    /// Creates an empty accumulator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an object to insert, deduplicated by reference.
    pub fn record_add(&mut self, schema: &Schema, entity: &EntityRef) {
        push_unique(&mut self.bucket(schema).to_add, entity);
    }

    /// Registers an object to update, deduplicated by reference.
    pub fn record_edit(&mut self, schema: &Schema, entity: &EntityRef) {
        push_unique(&mut self.bucket(schema).to_edit, entity);
    }

    /// Registers an object to delete, deduplicated by reference.
    pub fn record_delete(&mut self, schema: &Schema, entity: &EntityRef) {
        push_unique(&mut self.bucket(schema).to_delete, entity);
    }

    /// Records a recoverable diagnostic.
    pub fn warn(&mut self, warning: BindWarning) {
        self.warnings.push(warning);
    }

    /// Diagnostics collected so far, in occurrence order.
    pub fn warnings(&self) -> &[BindWarning] {
        &self.warnings
    }

    /// Objects to insert for `schema` and, depth-first, every nested
    /// schema it registered, deduplicated at each level.
    pub fn additions(&self, schema: &Schema) -> Vec<EntityRef> {
        self.merged(schema, |buckets| &buckets.to_add)
    }

    /// Objects to update, aggregated like [`additions`](Self::additions).
    pub fn edits(&self, schema: &Schema) -> Vec<EntityRef> {
        self.merged(schema, |buckets| &buckets.to_edit)
    }

    /// Objects to delete, aggregated like [`additions`](Self::additions).
    pub fn deletions(&self, schema: &Schema) -> Vec<EntityRef> {
        self.merged(schema, |buckets| &buckets.to_delete)
    }

    fn bucket(&mut self, schema: &Schema) -> &mut Buckets {
        self.buckets.entry(schema.id()).or_default()
    }

    fn merged(&self, schema: &Schema, select: fn(&Buckets) -> &Vec<EntityRef>) -> Vec<EntityRef> {
        let mut out: Vec<EntityRef> = Vec::new();
        if let Some(buckets) = self.buckets.get(&schema.id()) {
            for entity in select(buckets) {
                push_unique(&mut out, entity);
            }
        }
        for child in schema.children() {
            for entity in self.merged(child, select) {
                push_unique(&mut out, &entity);
            }
        }
        out
    }
}

fn push_unique(entities: &mut Vec<EntityRef>, entity: &EntityRef) {
    if !entities.iter().any(|existing| same_entity(existing, entity)) {
        entities.push(entity.clone());
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use crate::entity::{EntityRef, Record};
    use crate::error::SchemaError;
    use crate::field::FieldSpec;
    use crate::kind::{ChildKind, FieldKind};
    use crate::schema::{Schema, SchemaBuilder, TypeDef};

    use super::*;

    struct LeafType;

    impl TypeDef for LeafType {
        fn create_object(&self) -> EntityRef {
            Record::new("Leaf").with_scalar("id").into_ref()
        }

        fn define_fields(&self, _schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
            Ok(())
        }
    }

    struct RootType {
        leaf: Arc<Schema>,
    }

    impl TypeDef for RootType {
        fn create_object(&self) -> EntityRef {
            Record::new("Root").with_scalar("id").with_items("leaves").into_ref()
        }

        fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
            schema.field(
                FieldSpec::new("leaves", FieldKind::Collection)
                    .with_child_kind(ChildKind::nested(&self.leaf))?,
            )?;
            Ok(())
        }
    }

    #[test]
    fn test_record_add_deduplicates_by_reference() {
        let schema = Schema::build(LeafType).unwrap();
        let entity = schema.create_object();
        let mut changes = ChangeSet::new();

        changes.record_add(&schema, &entity);
        changes.record_add(&schema, &entity);

        assert_eq!(changes.additions(&schema).len(), 1);
    }

    #[test]
    fn test_aggregation_unions_parent_and_child_buckets() {
        let leaf = Schema::build(LeafType).unwrap();
        let root = Schema::build(RootType { leaf: leaf.clone() }).unwrap();

        let own = root.create_object();
        let nested = leaf.create_object();
        let mut changes = ChangeSet::new();

        changes.record_add(&root, &own);
        changes.record_add(&leaf, &nested);

        let additions = changes.additions(&root);
        assert_eq!(additions.len(), 2);
        assert!(same_entity(&additions[0], &own));
        assert!(same_entity(&additions[1], &nested));

        // The leaf schema alone only sees its own bucket.
        assert_eq!(changes.additions(&leaf).len(), 1);
    }

    #[test]
    fn test_aggregation_deduplicates_across_levels() {
        let leaf = Schema::build(LeafType).unwrap();
        let root = Schema::build(RootType { leaf: leaf.clone() }).unwrap();

        let shared = leaf.create_object();
        let mut changes = ChangeSet::new();

        changes.record_edit(&root, &shared);
        changes.record_edit(&leaf, &shared);

        assert_eq!(changes.edits(&root).len(), 1);
    }

    #[test]
    fn test_separate_change_sets_never_interleave() {
        let schema = Schema::build(LeafType).unwrap();
        let a = schema.create_object();
        let b = schema.create_object();

        let mut first = ChangeSet::new();
        let mut second = ChangeSet::new();
        first.record_add(&schema, &a);
        second.record_add(&schema, &b);

        assert_eq!(first.additions(&schema).len(), 1);
        assert!(same_entity(&first.additions(&schema)[0], &a));
        assert_eq!(second.additions(&schema).len(), 1);
        assert!(same_entity(&second.additions(&schema)[0], &b));
    }
}
