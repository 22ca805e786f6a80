//! Schema → control descriptors.
//!
//! Pure recursive descent over a [`Schema`]: every field is dispatched once on
//! its [`FieldKind`]. Arrays are left as [`Control::Array`] placeholders because
//! their row count is live state owned by the renderer.
use crate::codec::Identifier;
use crate::control::{ArrayControl, Control, InputKind};
use crate::error::{FormError, Result};
use crate::schema::{ElementSpec, FieldKind, FieldSpec, Primitive, Schema};

pub fn generate(schema: &Schema) -> Result<Vec<Control>> {
    generate_under(None, schema)
}

/// Generate `schema`'s fields with each name hung below `prefix`.
pub fn generate_under(prefix: Option<&Identifier>, schema: &Schema) -> Result<Vec<Control>> {
    let mut out = Vec::with_capacity(schema.len());
    for (name, field) in schema.iter() {
        let id = match prefix {
            Some(parent) => parent.field(name),
            None => Identifier::root(name),
        };
        out.push(generate_field(id, field)?);
    }
    Ok(out)
}

pub fn generate_field(id: Identifier, field: &FieldSpec) -> Result<Control> {
    tracing::trace!(identifier = %id, "generating field");
    match &field.kind {
        FieldKind::Object(nested) => generate_object_field(id, field.label.clone(), nested),
        FieldKind::Array(element) => Ok(generate_array_field(id, field.label.clone(), element)),
        FieldKind::Flat { primitive, enum_ } => {
            generate_flat_field(id, field.label.clone(), *primitive, enum_.as_deref())
        }
    }
}

pub fn generate_object_field(id: Identifier, label: Option<String>, nested: &Schema) -> Result<Control> {
    let children = generate_under(Some(&id), nested)?;
    Ok(Control::Group { label, children })
}

pub fn generate_array_field(id: Identifier, label: Option<String>, element: &ElementSpec) -> Control {
    Control::Array(ArrayControl { id, label, element: element.clone() })
}

pub fn generate_flat_field(
    id: Identifier,
    label: Option<String>,
    primitive: Primitive,
    enum_: Option<&[String]>,
) -> Result<Control> {
    let input = match primitive {
        Primitive::Text => InputKind::Text,
        Primitive::Number => InputKind::Number,
        Primitive::Date => return Err(FormError::Unimplemented("date fields")),
    };
    Ok(match enum_ {
        Some(options) => Control::Select {
            id,
            label,
            options: options.to_vec(),
            placeholder: options.first().cloned().unwrap_or_default(),
        },
        None => Control::Input { id, label, input },
    })
}
