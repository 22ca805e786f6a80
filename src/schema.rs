//! Typed form schema.
//!
//! A schema maps field names (in authoring order) to [`FieldSpec`]s. The raw
//! JSON shape of each `type` is decided once, here, into the closed
//! [`FieldKind`] variants; walker, renderer and parser only ever match on
//! those.
//!
//! Authoring format:
//!
//! ```json
//! {
//!   "name":    { "type": "text", "label": "Name" },
//!   "age":     { "type": "number", "enum": [18, 21, 65] },
//!   "tags":    { "type": ["text"] },
//!   "address": { "type": { "street": { "type": "text" } } },
//!   "things":  { "type": [{ "thing_attribute": { "type": "text" } }] }
//! }
//! ```
use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::codec;
use crate::error::{FormError, Result};

// ------------------------------- Model ----------------------------------- //

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Text,
    Number,
    Date,
}

/// Shape of one repeated element of an array field.
#[derive(Debug, Clone, PartialEq)]
pub enum ElementSpec {
    Primitive(Primitive),
    Object(Schema),
}

#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Flat { primitive: Primitive, enum_: Option<Vec<String>> },
    Array(ElementSpec),
    Object(Schema),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FieldSpec {
    pub kind: FieldKind,
    pub label: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Schema {
    fields: IndexMap<String, FieldSpec>,
}

impl Primitive {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "text" | "string" => Some(Self::Text),
            "number" => Some(Self::Number),
            "date" => Some(Self::Date),
            _ => None,
        }
    }
}

impl FieldSpec {
    pub fn text() -> Self {
        Self::flat(Primitive::Text)
    }

    pub fn number() -> Self {
        Self::flat(Primitive::Number)
    }

    pub fn date() -> Self {
        Self::flat(Primitive::Date)
    }

    pub fn flat(primitive: Primitive) -> Self {
        Self { kind: FieldKind::Flat { primitive, enum_: None }, label: None }
    }

    pub fn array(element: ElementSpec) -> Self {
        Self { kind: FieldKind::Array(element), label: None }
    }

    pub fn object(schema: Schema) -> Self {
        Self { kind: FieldKind::Object(schema), label: None }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Only meaningful on flat fields; ignored on arrays and objects.
    pub fn with_enum<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if let FieldKind::Flat { enum_, .. } = &mut self.kind {
            *enum_ = Some(options.into_iter().map(Into::into).collect());
        }
        self
    }
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_field(mut self, name: &str, field: FieldSpec) -> Result<Self> {
        self.insert(name, field)?;
        Ok(self)
    }

    pub fn insert(&mut self, name: &str, field: FieldSpec) -> Result<()> {
        if !codec::is_valid_field_name(name) {
            return Err(FormError::schema(name, INVALID_NAME));
        }
        if let FieldKind::Array(ElementSpec::Object(element)) = &field.kind {
            if !element.has_leaf() {
                return Err(FormError::schema(name, NO_LEAF));
            }
        }
        self.fields.insert(name.to_string(), field);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&FieldSpec> {
        self.fields.get(name)
    }

    /// Fields in authoring order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldSpec)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Whether any field below this schema renders a control (dates count).
    pub fn has_leaf(&self) -> bool {
        self.fields.values().any(|field| match &field.kind {
            FieldKind::Flat { .. } | FieldKind::Array(ElementSpec::Primitive(_)) => true,
            FieldKind::Object(nested) | FieldKind::Array(ElementSpec::Object(nested)) => nested.has_leaf(),
        })
    }

    /// Walk a dotted field path (indices already stripped) down to its spec.
    /// Descends through nested objects and through the element schema of
    /// arrays of objects.
    pub fn resolve<S: AsRef<str>>(&self, path: &[S]) -> Option<&FieldSpec> {
        let (first, rest) = path.split_first()?;
        let field = self.get(first.as_ref())?;
        if rest.is_empty() {
            return Some(field);
        }
        match &field.kind {
            FieldKind::Object(nested) | FieldKind::Array(ElementSpec::Object(nested)) => {
                nested.resolve(rest)
            }
            _ => None,
        }
    }

    pub fn from_json_str(src: &str) -> Result<Self> {
        let value: Value = crate::path_de::from_str_with_path(src)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Self> {
        match value {
            Value::Object(map) => schema_from_map("", map),
            _ => Err(FormError::schema("<root>", "schema must be a JSON object")),
        }
    }
}

// ------------------------------- Decide ---------------------------------- //

const INVALID_NAME: &str =
    "field names must be non-empty, not all digits, and free of '.', '+' and '-<digit>'";

const NO_LEAF: &str = "array element schema has no fields to fill in";

fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() { name.to_string() } else { format!("{parent}.{name}") }
}

fn schema_from_map(parent: &str, map: &Map<String, Value>) -> Result<Schema> {
    let mut schema = Schema::new();
    for (name, raw) in map {
        let path = join_path(parent, name);
        if !codec::is_valid_field_name(name) {
            return Err(FormError::schema(path, INVALID_NAME));
        }
        let field = field_from_value(&path, raw)?;
        schema.fields.insert(name.clone(), field);
    }
    Ok(schema)
}

fn field_from_value(path: &str, raw: &Value) -> Result<FieldSpec> {
    let Value::Object(spec) = raw else {
        return Err(FormError::schema(path, "field spec must be an object with a `type`"));
    };

    let label = match spec.get("label") {
        None | Some(Value::Null) => None,
        Some(Value::String(s)) => Some(s.clone()),
        Some(_) => return Err(FormError::schema(path, "`label` must be a string")),
    };
    let enum_ = match spec.get("enum") {
        None | Some(Value::Null) => None,
        Some(Value::Array(options)) => Some(enum_from_values(path, options)?),
        Some(_) => return Err(FormError::schema(path, "`enum` must be an array")),
    };

    let kind = match spec.get("type") {
        Some(Value::String(tag)) => FieldKind::Flat { primitive: primitive_from_tag(path, tag)?, enum_ },
        Some(Value::Array(items)) => {
            reject_enum(path, &enum_)?;
            match items.as_slice() {
                [element] => FieldKind::Array(element_from_value(path, element)?),
                _ => {
                    return Err(FormError::schema(
                        path,
                        format!("array type must hold exactly one element spec, found {}", items.len()),
                    ));
                }
            }
        }
        Some(Value::Object(nested)) => {
            reject_enum(path, &enum_)?;
            FieldKind::Object(schema_from_map(path, nested)?)
        }
        Some(_) => return Err(FormError::schema(path, "`type` must be a tag, a one-element array or a schema object")),
        None => return Err(FormError::schema(path, "missing `type`")),
    };

    Ok(FieldSpec { kind, label })
}

fn element_from_value(path: &str, raw: &Value) -> Result<ElementSpec> {
    match raw {
        Value::String(tag) => Ok(ElementSpec::Primitive(primitive_from_tag(path, tag)?)),
        Value::Object(nested) => {
            let element = schema_from_map(path, nested)?;
            if !element.has_leaf() {
                return Err(FormError::schema(path, NO_LEAF));
            }
            Ok(ElementSpec::Object(element))
        }
        Value::Array(_) => Err(FormError::schema(path, "arrays of arrays are not supported")),
        _ => Err(FormError::schema(path, "array element must be a tag or a schema object")),
    }
}

fn primitive_from_tag(path: &str, tag: &str) -> Result<Primitive> {
    Primitive::from_tag(tag)
        .ok_or_else(|| FormError::schema(path, format!("unknown primitive type `{tag}`")))
}

fn reject_enum(path: &str, enum_: &Option<Vec<String>>) -> Result<()> {
    match enum_ {
        Some(_) => Err(FormError::schema(path, "`enum` is only allowed on flat fields")),
        None => Ok(()),
    }
}

fn enum_from_values(path: &str, options: &[Value]) -> Result<Vec<String>> {
    options
        .iter()
        .map(|option| match option {
            Value::String(s) => Ok(s.clone()),
            Value::Number(n) => Ok(n.to_string()),
            Value::Bool(b) => Ok(b.to_string()),
            _ => Err(FormError::schema(path, "`enum` options must be strings, numbers or booleans")),
        })
        .collect()
}

// ------------------------------- Tests ----------------------------------- //

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn schema_error(value: Value) -> String {
        match Schema::from_value(&value) {
            Err(FormError::Schema { path, reason }) => format!("{path}: {reason}"),
            other => panic!("expected schema error, got {other:?}"),
        }
    }

    #[test]
    fn decides_every_variant_in_authoring_order() {
        let schema = Schema::from_value(&json!({
            "name":    { "type": "String", "label": "Name" },
            "age":     { "type": "Number", "enum": [18, 21, 65] },
            "tags":    { "type": ["text"] },
            "address": { "type": { "street": { "type": "text" } } },
            "things":  { "type": [{ "thing_attribute": { "type": "text" } }] }
        }))
        .unwrap();

        let names: Vec<&str> = schema.iter().map(|(k, _)| k).collect();
        assert_eq!(names, ["name", "age", "tags", "address", "things"]);

        assert_eq!(schema.get("name"), Some(&FieldSpec::text().with_label("Name")));
        assert_eq!(schema.get("age"), Some(&FieldSpec::number().with_enum(["18", "21", "65"])));
        assert_eq!(
            schema.get("tags"),
            Some(&FieldSpec::array(ElementSpec::Primitive(Primitive::Text)))
        );
        let street = Schema::new().with_field("street", FieldSpec::text()).unwrap();
        assert_eq!(schema.get("address"), Some(&FieldSpec::object(street)));
        assert!(matches!(
            schema.get("things").map(|f| &f.kind),
            Some(FieldKind::Array(ElementSpec::Object(_)))
        ));
    }

    #[test]
    fn resolves_through_objects_and_object_arrays() {
        let schema = Schema::from_value(&json!({
            "address": { "type": { "geo": { "type": { "lat": { "type": "number" } } } } },
            "things":  { "type": [{ "thing_attribute": { "type": "text" } }] },
            "tags":    { "type": ["text"] }
        }))
        .unwrap();

        assert_eq!(schema.resolve(&["address", "geo", "lat"]), Some(&FieldSpec::number()));
        assert_eq!(schema.resolve(&["things", "thing_attribute"]), Some(&FieldSpec::text()));
        assert!(schema.resolve(&["tags", "anything"]).is_none());
        assert!(schema.resolve(&["missing"]).is_none());
        assert!(schema.resolve::<&str>(&[]).is_none());
    }

    #[test]
    fn arrays_of_arrays_are_schema_errors() {
        let msg = schema_error(json!({ "grid": { "type": [["String"]] } }));
        assert!(msg.starts_with("grid: arrays of arrays"), "{msg}");
    }

    #[test]
    fn array_arity_must_be_one() {
        assert!(schema_error(json!({ "xs": { "type": [] } })).contains("found 0"));
        assert!(schema_error(json!({ "xs": { "type": ["text", "number"] } })).contains("found 2"));
    }

    #[test]
    fn malformed_nodes_name_their_path() {
        let msg = schema_error(json!({ "outer": { "type": { "inner": { "type": "colour" } } } }));
        assert_eq!(msg, "outer.inner: unknown primitive type `colour`");

        let msg = schema_error(json!({ "outer": { "type": { "bad.name": { "type": "text" } } } }));
        assert!(msg.starts_with("outer.bad.name:"), "{msg}");

        assert!(schema_error(json!({ "x": { "label": "X" } })).ends_with("missing `type`"));
        assert!(schema_error(json!({ "x": "text" })).contains("must be an object"));
        assert!(schema_error(json!({ "x": { "type": ["text"], "enum": ["a"] } })).contains("flat fields"));
        assert!(schema_error(json!({ "x": { "type": [{}] } })).contains("no fields"));
        assert!(schema_error(json!({ "x": { "type": [{ "meta": { "type": {} } }] } })).contains("no fields"));
    }

    #[test]
    fn programmatic_insert_validates_names() {
        assert!(Schema::new().with_field("row-1", FieldSpec::text()).is_err());
        assert!(
            Schema::new()
                .with_field("rows", FieldSpec::array(ElementSpec::Object(Schema::new())))
                .is_err()
        );
        let hollow = Schema::new().with_field("meta", FieldSpec::object(Schema::new())).unwrap();
        assert!(!hollow.has_leaf());
        assert!(Schema::new().with_field("rows", FieldSpec::array(ElementSpec::Object(hollow))).is_err());
        assert_eq!(Schema::new().with_field("first-name", FieldSpec::text()).unwrap().len(), 1);
    }

    #[test]
    fn date_is_accepted_at_authoring_time() {
        let schema = Schema::from_json_str(r#"{ "born": { "type": "Date" } }"#).unwrap();
        assert_eq!(schema.get("born"), Some(&FieldSpec::date()));
    }
}
