//! Per-request binding sessions.
//!
//! A [`BindingSession`] pairs one shared [`Schema`] with one live entity
//! for the duration of a single request. Every session owns a fresh
//! [`ChangeSet`]; nothing is accumulated on the schema, so sessions
//! sharing a schema (including concurrent ones) can never interleave
//! their results. Sessions are created per request, read once, and
//! discarded.

use std::sync::Arc;

use tracing::debug;

use entity_bind_core::{BindError, BindWarning, ChangeSet, EntityRef, Schema};

use crate::request::IncomingRequest;

/// One request's binding of a payload onto an entity graph.
///
/// # Examples
///
/// ```
/// use entity_bind_core::*;
/// use entity_bind_http::{BindingSession, IncomingRequest};
/// use serde_json::json;
///
/// struct NoteType;
/// impl TypeDef for NoteType {
///     fn create_object(&self) -> EntityRef {
///         Record::new("Note").with_scalar("id").with_scalar("body").into_ref()
///     }
///     fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
///         schema.register_id("id");
///         schema.field(FieldSpec::new("body", FieldKind::Text))?;
///         Ok(())
///     }
/// }
///
/// let schema = Schema::build(NoteType).unwrap();
/// let note = schema.create_object();
///
/// let mut session = BindingSession::new(schema, note);
/// assert!(!session.is_valid());
///
/// let request = IncomingRequest::new("POST").with_json_body(json!({"body": "hello"}));
/// session.handle(&request).unwrap();
///
/// assert!(session.is_valid());
/// let note = session.object().borrow();
/// assert_eq!(note.get("body").unwrap().as_scalar(), Some(&json!("hello")));
/// ```
pub struct BindingSession {
    schema: Arc<Schema>,
    object: EntityRef,
    changes: ChangeSet,
    submitted: bool,
}

impl BindingSession {
    /// Creates a session for one schema/entity pair, with its own empty
    /// change accumulator.
    pub fn new(schema: Arc<Schema>, object: EntityRef) -> Self {
        Self {
            schema,
            object,
            changes: ChangeSet::new(),
            submitted: false,
        }
    }

    /// Processes one request.
    ///
    /// Non-payload methods (anything but POST/PUT) are a no-op: the
    /// session stays unsubmitted and the entity untouched. Otherwise the
    /// resolved payload is applied onto the entity and the session becomes
    /// submitted.
    pub fn handle(&mut self, request: &IncomingRequest) -> Result<(), BindError> {
        let Some(payload) = request.payload() else {
            debug!(method = request.method(), "method carries no payload, skipping bind");
            return Ok(());
        };

        self.schema
            .apply_payload(&self.object, payload, &mut self.changes)?;
        self.submitted = true;
        debug!(
            fields = self.schema.fields().len(),
            warnings = self.changes.warnings().len(),
            "payload bound"
        );
        Ok(())
    }

    /// Whether a payload-bearing request has been processed.
    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    /// Whether the bound input is valid.
    ///
    /// Validation rules are not implemented: this is true exactly when the
    /// session is submitted, with no payload inspection. The contract is
    /// kept so callers are already written against it when rule evaluation
    /// arrives.
    pub fn is_valid(&self) -> bool {
        self.submitted
    }

    /// The entity this session binds onto.
    pub fn object(&self) -> &EntityRef {
        &self.object
    }

    /// Diagnostics collected while binding.
    pub fn warnings(&self) -> &[BindWarning] {
        self.changes.warnings()
    }

    /// Objects to insert, aggregated over the schema tree and reversed so
    /// the oldest-registered object comes last.
    ///
    /// The reversal is part of the downstream contract: persistence
    /// layers flush these in order, which approximates deepest-first.
    pub fn to_add(&self) -> Vec<EntityRef> {
        let mut entities = self.changes.additions(&self.schema);
        entities.reverse();
        entities
    }

    /// Objects to update, ordered like [`to_add`](Self::to_add).
    pub fn to_edit(&self) -> Vec<EntityRef> {
        let mut entities = self.changes.edits(&self.schema);
        entities.reverse();
        entities
    }

    /// Objects to delete, ordered like [`to_add`](Self::to_add).
    pub fn to_delete(&self) -> Vec<EntityRef> {
        let mut entities = self.changes.deletions(&self.schema);
        entities.reverse();
        entities
    }
}
