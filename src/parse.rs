//! Flat control values → nested result.
//!
//! The parser walks the schema, asks the [`ValueSource`] for each control it
//! expects, and files every value under its identifier's token walk:
//! field tokens open objects, index tokens open (and pad) arrays, the last
//! token is where the value lands. Array rows are discovered by probing
//! `path-0`, `path-1`, ... until the first identifier with no control.
use serde_json::{Map, Value};

use crate::codec::{Identifier, Token};
use crate::error::{FormError, Result};
use crate::host::ValueSource;
use crate::schema::{ElementSpec, FieldKind, Primitive, Schema};

pub struct FormParser<'a, S: ValueSource + ?Sized> {
    schema: &'a Schema,
    source: &'a S,
}

impl<'a, S: ValueSource + ?Sized> FormParser<'a, S> {
    pub fn new(schema: &'a Schema, source: &'a S) -> Self {
        Self { schema, source }
    }

    pub fn parse(&self) -> Result<Value> {
        let mut result = Value::Object(Map::new());
        for (name, _) in self.schema.iter() {
            self.parse_field(&mut result, &Identifier::root(name))?;
        }
        Ok(result)
    }

    pub fn parse_field(&self, result: &mut Value, path: &Identifier) -> Result<()> {
        let field_path = path.field_path();
        let field = self
            .schema
            .resolve(field_path.as_slice())
            .ok_or_else(|| FormError::schema(path.as_str(), "identifier does not name a schema field"))?;

        match &field.kind {
            FieldKind::Flat { primitive: Primitive::Date, .. } => Err(FormError::Unimplemented("date fields")),
            FieldKind::Flat { .. } => self.parse_flat_field(result, path),
            FieldKind::Array(ElementSpec::Primitive(Primitive::Date)) => {
                Err(FormError::Unimplemented("date fields"))
            }
            FieldKind::Array(ElementSpec::Primitive(_)) => self.parse_flat_array_field(result, path),
            FieldKind::Array(ElementSpec::Object(element)) => {
                self.parse_object_array_field(result, path, element)
            }
            FieldKind::Object(nested) => {
                ensure_object(slot_mut(result, path)?, path)?;
                for (name, _) in nested.iter() {
                    self.parse_field(result, &path.field(name))?;
                }
                Ok(())
            }
        }
    }

    /// Read one control and store its raw value at the identifier's position.
    pub fn parse_flat_field(&self, result: &mut Value, id: &Identifier) -> Result<()> {
        let raw = self.source.current_value(id.as_str())?;
        *slot_mut(result, id)? = Value::String(raw);
        Ok(())
    }

    pub fn parse_flat_array_field(&self, result: &mut Value, path: &Identifier) -> Result<()> {
        let mut rows = Vec::new();
        loop {
            let row = path.index(rows.len());
            match self.source.current_value(row.as_str()) {
                Ok(raw) => rows.push(Value::String(raw)),
                Err(_) => break,
            }
        }
        tracing::debug!(array = %path, rows = rows.len(), "read primitive array");
        *slot_mut(result, path)? = Value::Array(rows);
        Ok(())
    }

    pub fn parse_object_array_field(&self, result: &mut Value, path: &Identifier, element: &Schema) -> Result<()> {
        *slot_mut(result, path)? = Value::Array(Vec::new());
        let mut index = 0;
        loop {
            let row = path.index(index);
            // only dates left to stand for the row; those are never rendered
            let Some(marker) = row_marker(&row, element) else {
                return Err(FormError::Unimplemented("date fields"));
            };
            if !self.source.contains(marker.as_str()) {
                break;
            }
            ensure_object(slot_mut(result, &row)?, &row)?;
            for (name, _) in element.iter() {
                self.parse_field(result, &row.field(name))?;
            }
            index += 1;
        }
        tracing::debug!(array = %path, rows = index, "read object array");
        Ok(())
    }
}

/// First leaf identifier a rendered row under `row` is guaranteed to have.
/// Fields that render no input (empty objects, dates) are skipped.
pub fn row_marker(row: &Identifier, element: &Schema) -> Option<Identifier> {
    element.iter().find_map(|(name, field)| {
        let id = row.field(name);
        match &field.kind {
            FieldKind::Flat { primitive: Primitive::Date, .. } => None,
            FieldKind::Flat { .. } => Some(id),
            FieldKind::Object(nested) => row_marker(&id, nested),
            FieldKind::Array(ElementSpec::Primitive(Primitive::Date)) => None,
            FieldKind::Array(ElementSpec::Primitive(_)) => Some(id.index(0)),
            FieldKind::Array(ElementSpec::Object(nested)) => row_marker(&id.index(0), nested),
        }
    })
}

// ------------------------------- Containers ------------------------------- //

/// Walk `id`'s tokens from the root, creating objects/arrays as needed, and
/// return the slot the last token names (`Null` if it was just created).
fn slot_mut<'v>(root: &'v mut Value, id: &Identifier) -> Result<&'v mut Value> {
    let mut cursor = root;
    for token in id.tokens() {
        cursor = match token {
            Token::Field(name) => {
                if cursor.is_null() {
                    *cursor = Value::Object(Map::new());
                }
                match cursor {
                    Value::Object(map) => map.entry(name).or_insert(Value::Null),
                    other => return Err(conflict(id, "a field", other)),
                }
            }
            Token::Index(index) => {
                if cursor.is_null() {
                    *cursor = Value::Array(Vec::new());
                }
                match cursor {
                    Value::Array(items) => {
                        if items.len() <= index {
                            items.resize(index + 1, Value::Null);
                        }
                        &mut items[index]
                    }
                    other => return Err(conflict(id, "an index", other)),
                }
            }
        };
    }
    Ok(cursor)
}

fn ensure_object(slot: &mut Value, id: &Identifier) -> Result<()> {
    match slot {
        Value::Null => {
            *slot = Value::Object(Map::new());
            Ok(())
        }
        Value::Object(_) => Ok(()),
        other => Err(conflict(id, "an object", other)),
    }
}

fn conflict(id: &Identifier, wanted: &str, found: &Value) -> FormError {
    let found = match found {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    };
    FormError::Conflict {
        identifier: id.to_string(),
        reason: format!("expected room for {wanted}, found {found}"),
    }
}

// ------------------------------- Tests ------------------------------------ //
