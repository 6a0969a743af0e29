//! Request boundary and per-request binding sessions.
//!
//! This crate is the thin layer between an HTTP framework and the
//! [`entity_bind_core`] binding engine:
//!
//! - [`IncomingRequest`] — the decoded request contract (method, JSON
//!   body, form-field fallback).
//! - [`BindingSession`] — one request's schema/entity pairing, with the
//!   submitted flag, the add/edit/delete outputs, and collected
//!   diagnostics.
//! - [`InputController`] — construction glue for controllers.
//!
//! The actual HTTP parsing and the persistence of classified objects both
//! live with the caller; this crate only resolves payloads and runs the
//! bind.
//!
//! # Example
//!
//! ```
//! use entity_bind_core::*;
//! use entity_bind_http::{BindingSession, IncomingRequest};
//! use serde_json::json;
//!
//! struct NoteType;
//! impl TypeDef for NoteType {
//!     fn create_object(&self) -> EntityRef {
//!         Record::new("Note").with_scalar("id").with_scalar("body").into_ref()
//!     }
//!     fn define_fields(&self, schema: &mut SchemaBuilder) -> Result<(), SchemaError> {
//!         schema.register_id("id");
//!         schema.field(FieldSpec::new("body", FieldKind::Text).required())?;
//!         Ok(())
//!     }
//! }
//!
//! let schema = Schema::build(NoteType).unwrap();
//! let mut session = BindingSession::new(schema.clone(), schema.create_object());
//!
//! let request = IncomingRequest::new("PUT").with_raw_body(r#"{"body": "updated"}"#);
//! session.handle(&request).unwrap();
//!
//! assert!(session.is_valid());
//! assert!(session.to_add().is_empty());
//! ```

mod controller;
mod request;
mod session;

pub use controller::InputController;
pub use request::IncomingRequest;
pub use session::BindingSession;
