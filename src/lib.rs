//! Declarative data-entry forms.
//!
//! A [`Schema`] is walked into control descriptors for a host toolkit to paint;
//! on submit the painted controls' values are read back by identifier and
//! rebuilt into a nested JSON value that mirrors the schema.
//!
//! ```text
//! Schema ─► walker ─► render (rows) ─► [Control] ─► Toolkit::paint
//!                                                     │ user edits
//! Value  ◄─ parse ◄── ValueSource::current_value ◄────┘
//! ```
pub mod codec;
pub mod control;
pub mod error;
pub mod form;
pub mod host;
pub mod parse;
pub mod path_de;
pub mod render;
pub mod repeat;
pub mod schema;
pub mod walker;

pub use codec::{Identifier, Token};
pub use control::{Action, Control, InputKind};
pub use error::{FormError, LookupError, Result};
pub use form::{Form, FormGenerator};
pub use host::{MemoryToolkit, Toolkit, ValueSource};
pub use schema::{ElementSpec, FieldKind, FieldSpec, Primitive, Schema};
