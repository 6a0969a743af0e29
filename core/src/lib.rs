//! Core types and the collection reconciliation engine for
//! request-to-entity binding.
//!
//! Given a decoded request payload and a declarative schema, this crate
//! populates a live entity graph and classifies which objects a downstream
//! persistence layer must insert, update, or delete. It never persists
//! anything itself.
//!
//! - [`FieldKind`] / [`ChildKind`] — the closed field-kind set and the
//!   element kind of collection fields (scalar or nested schema).
//! - [`FieldSpec`] — one bindable field: accessor name, payload key, kind,
//!   flags.
//! - [`TypeDef`] / [`Schema`] / [`SchemaBuilder`] — the per-domain-type
//!   definition hook and the immutable, shareable schema it builds.
//! - [`Entity`] / [`EntityRef`] / [`Record`] — the capability interface
//!   bindable objects implement, and a map-backed implementation.
//! - [`ChangeSet`] — the per-invocation accumulator of add/edit/delete
//!   buckets and [`BindWarning`] diagnostics.
//!
//! Schema misconfiguration fails fast with [`SchemaError`]; a
//! schema/entity mismatch at bind time fails with [`BindError`]; payload
//! data-quality problems never fail the bind and surface as warnings.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use entity_bind_core::*;
//! use serde_json::json;
//!
//! struct TrackType;
//!
//! impl TypeDef for TrackType {
//!     fn create_object(&self) -> EntityRef {
//!         Record::new("Track")
//!             .with_scalar("id")
//!             .with_scalar("title")
//!             .into_ref()
//!     }
//!
//!     fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
//!         schema.register_id("id");
//!         schema.field(FieldSpec::new("title", FieldKind::Text))?;
//!         Ok(())
//!     }
//! }
//!
//! struct AlbumType {
//!     track: Arc<Schema>,
//! }
//!
//! impl TypeDef for AlbumType {
//!     fn create_object(&self) -> EntityRef {
//!         Record::new("Album")
//!             .with_scalar("id")
//!             .with_scalar("title")
//!             .with_items("tracks")
//!             .into_ref()
//!     }
//!
//!     fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
//!         schema.register_id("id");
//!         schema.field(FieldSpec::new("title", FieldKind::Text))?;
//!         schema.field(
//!             FieldSpec::new("tracks", FieldKind::Collection)
//!                 .with_child_kind(ChildKind::nested(&self.track))?
//!                 .allow_add()
//!                 .allow_delete(),
//!         )?;
//!         Ok(())
//!     }
//! }
//!
//! let track = Schema::build(TrackType).unwrap();
//! let album = Schema::build(AlbumType { track: track.clone() }).unwrap();
//!
//! let object = album.create_object();
//! let payload = json!({
//!     "title": "Debut",
//!     "tracks": [{"title": "Intro"}, {"title": "Outro"}],
//! });
//!
//! let mut changes = ChangeSet::new();
//! album
//!     .apply_payload(&object, payload.as_object().unwrap(), &mut changes)
//!     .unwrap();
//!
//! // Both incoming tracks were new: they are registered for insertion.
//! assert_eq!(changes.additions(&album).len(), 2);
//! assert!(changes.deletions(&album).is_empty());
//! ```

mod changes;
mod diagnostics;
mod entity;
mod error;
mod field;
mod kind;
mod reconcile;
mod schema;

pub use changes::ChangeSet;
pub use diagnostics::BindWarning;
pub use entity::{Entity, EntityRef, FieldValue, Record, entity_ref, same_entity};
pub use error::{BindError, Result, SchemaError};
pub use field::FieldSpec;
pub use kind::{ChildKind, FieldKind};
pub use schema::{Schema, SchemaBuilder, SchemaId, TypeDef};
