//! Controller-facing construction glue.

use std::sync::Arc;

use entity_bind_core::{EntityRef, Schema};

use crate::session::BindingSession;

/// Convenience surface for controllers that create binding sessions.
///
/// Pure glue: implement it on a controller type (no required methods) and
/// call [`create_input`](InputController::create_input) per request. The
/// entity may be freshly created for insert flows or loaded from storage
/// for edit flows.
///
/// # Examples
///
/// ```
/// use entity_bind_core::*;
/// use entity_bind_http::InputController;
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
/// struct NotesController;
/// impl InputController for NotesController {}
///
/// let schema = Schema::build(NoteType).unwrap();
/// let session = NotesController.create_input(schema.clone(), schema.create_object());
/// assert!(!session.is_submitted());
/// ```
pub trait InputController {
    /// Creates a fresh binding session for one request.
    fn create_input(&self, schema: Arc<Schema>, object: EntityRef) -> BindingSession {
        BindingSession::new(schema, object)
    }
}
