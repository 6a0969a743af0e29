//! Schema definition and payload application.
//!
//! A [`Schema`] is the bindable description of one domain type: an ordered
//! set of [`FieldSpec`]s, the identity key used for collection
//! reconciliation, and the factory that produces blank entities. Concrete
//! domain types implement [`TypeDef`]; [`Schema::build`] runs the
//! definition hook exactly once and freezes the result.
//!
//! Schemas are immutable after build and shared via `Arc`: all
//! per-invocation state (change buckets, warnings) lives in the
//! [`ChangeSet`] threaded through [`apply_payload`](Schema::apply_payload),
//! so one schema instance can serve any number of concurrent bindings.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::{Map, Value};

use crate::changes::ChangeSet;
use crate::entity::EntityRef;
use crate::error::{BindError, SchemaError};
use crate::field::FieldSpec;
use crate::kind::{ChildKind, FieldKind};

static SCHEMA_ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Process-unique schema identifier.
///
/// Keys the per-schema buckets inside a [`ChangeSet`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SchemaId(u64);

/// Definition hook implemented per concrete domain type.
///
/// [`Schema::build`] calls [`define_fields`](TypeDef::define_fields) once;
/// [`create_object`](TypeDef::create_object) is invoked whenever
/// reconciliation needs a blank entity for an incoming item.
///
/// # Examples
///
/// ```
/// use entity_bind_core::*;
///
/// struct TrackType;
///
/// impl TypeDef for TrackType {
///     fn create_object(&self) -> EntityRef {
///         Record::new("Track")
///             .with_scalar("id")
///             .with_scalar("title")
///             .into_ref()
///     }
///
///     fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
///         schema.register_id("id");
///         schema.field(FieldSpec::new("title", FieldKind::Text))?;
///         Ok(())
///     }
/// }
///
/// let schema = Schema::build(TrackType).unwrap();
/// assert_eq!(schema.id_name(), "id");
/// assert_eq!(schema.fields().len(), 1);
/// ```
pub trait TypeDef: Send + Sync + 'static {
    /// Produces a blank entity of this schema's domain type.
    fn create_object(&self) -> EntityRef;

    /// Declares the schema's fields and identity key. Called once by
    /// [`Schema::build`].
    fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError>;
}

/// Registration surface handed to [`TypeDef::define_fields`].
pub struct SchemaBuilder {
    id_name: String,
    id_accessor: String,
    fields: Vec<FieldSpec>,
    children: Vec<Arc<Schema>>,
}

impl SchemaBuilder {
    fn new() -> Self {
        Self {
            id_name: "id".to_string(),
            id_accessor: "id".to_string(),
            fields: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Sets the identity key; payload key and entity accessor share the
    /// name. Defaults to `"id"`.
    pub fn register_id(&mut self, name: &str) -> &mut Self {
        self.register_id_as(name, name)
    }

    /// Sets the identity payload key and a differing entity accessor.
    pub fn register_id_as(&mut self, name: &str, accessor: &str) -> &mut Self {
        self.id_name = name.to_string();
        self.id_accessor = accessor.to_string();
        self
    }

    /// Registers a field. Order of registration is the order of
    /// application.
    ///
    /// Re-registering a name fails with [`SchemaError::DuplicateField`]; a
    /// collection field without a child kind fails with
    /// [`SchemaError::MissingChildKind`]. Nested child schemas are recorded
    /// for change-bucket aggregation.
    pub fn field(&mut self, spec: FieldSpec) -> Result<&mut Self, SchemaError> {
        if self.fields.iter().any(|f| f.name() == spec.name()) {
            return Err(SchemaError::DuplicateField(spec.name().to_string()));
        }
        if spec.kind() == FieldKind::Collection {
            match spec.child_kind() {
                None => return Err(SchemaError::MissingChildKind(spec.name().to_string())),
                Some(ChildKind::Nested(schema)) => self.children.push(Arc::clone(schema)),
                Some(ChildKind::Scalar(_)) => {}
            }
        }
        self.fields.push(spec);
        Ok(self)
    }
}

/// Bindable description of one domain type.
///
/// Built once at startup via [`Schema::build`], then shared. See the
/// module docs for the sharing model.
pub struct Schema {
    id: SchemaId,
    id_name: String,
    id_accessor: String,
    fields: Vec<FieldSpec>,
    children: Vec<Arc<Schema>>,
    def: Box<dyn TypeDef>,
}

impl Schema {
    /// Builds a schema by running the definition hook once.
    ///
    /// Nested schemas must be built first and passed into the definition
    /// through [`ChildKind::Nested`].
    pub fn build(def: impl TypeDef) -> Result<Arc<Schema>, SchemaError> {
        let mut builder = SchemaBuilder::new();
        def.define_fields(&mut builder)?;
        Ok(Arc::new(Schema {
            id: SchemaId(SCHEMA_ID_COUNTER.fetch_add(1, Ordering::Relaxed)),
            id_name: builder.id_name,
            id_accessor: builder.id_accessor,
            fields: builder.fields,
            children: builder.children,
            def: Box::new(def),
        }))
    }

    /// Process-unique identifier of this schema.
    pub fn id(&self) -> SchemaId {
        self.id
    }

    /// Payload key identifying an item during reconciliation.
    pub fn id_name(&self) -> &str {
        &self.id_name
    }

    /// Entity accessor the identity value is read from.
    pub fn id_accessor(&self) -> &str {
        &self.id_accessor
    }

    /// Registered fields, in registration order.
    pub fn fields(&self) -> &[FieldSpec] {
        &self.fields
    }

    /// Looks up a field by accessor name.
    pub fn field(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.iter().find(|f| f.name() == name)
    }

    /// Nested schemas registered through collection fields.
    pub fn children(&self) -> &[Arc<Schema>] {
        &self.children
    }

    /// Produces a blank entity via the definition's factory.
    pub fn create_object(&self) -> EntityRef {
        self.def.create_object()
    }

    /// Applies a decoded payload onto an entity, field by field in
    /// registration order.
    ///
    /// A key missing from the payload applies as `null`. Change and
    /// warning accumulation goes into `changes`; the caller owns its
    /// lifetime, one per binding invocation.
    pub fn apply_payload(
        &self,
        object: &EntityRef,
        data: &Map<String, Value>,
        changes: &mut ChangeSet,
    ) -> Result<(), BindError> {
        for field in &self.fields {
            let raw = data.get(field.source_key()).unwrap_or(&Value::Null);
            field.apply_value(object, raw, changes)?;
        }
        Ok(())
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("id", &self.id)
            .field("id_name", &self.id_name)
            .field("id_accessor", &self.id_accessor)
            .field("fields", &self.fields)
            .field("children", &self.children.len())
            .finish()
    }
}
