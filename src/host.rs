//! What the form needs from the host UI toolkit.
//!
//! A toolkit paints control descriptors and reports the current string value
//! of a painted control by identifier. [`MemoryToolkit`] is a headless host
//! used by the CLI, the fixture runner and the tests.
use std::collections::{BTreeMap, HashMap};
use std::hash::BuildHasher;

use indexmap::IndexMap;
use serde_json::{Map, Value};

use crate::control::Control;
use crate::error::LookupError;

pub trait ValueSource {
    /// Live value of the control registered under `id`.
    fn current_value(&self, id: &str) -> Result<String, LookupError>;

    fn contains(&self, id: &str) -> bool {
        self.current_value(id).is_ok()
    }
}

pub trait Toolkit: ValueSource {
    /// Replace whatever is on screen with `controls`.
    fn paint(&mut self, controls: &[Control]);
}

// ————————————————————————————————————————————————————————————————————————————
// VALUE SOURCES
// ————————————————————————————————————————————————————————————————————————————

impl<S: BuildHasher> ValueSource for HashMap<String, String, S> {
    fn current_value(&self, id: &str) -> Result<String, LookupError> {
        self.get(id).cloned().ok_or_else(|| LookupError(id.to_string()))
    }
}

impl<S: BuildHasher> ValueSource for IndexMap<String, String, S> {
    fn current_value(&self, id: &str) -> Result<String, LookupError> {
        self.get(id).cloned().ok_or_else(|| LookupError(id.to_string()))
    }
}

impl ValueSource for BTreeMap<String, String> {
    fn current_value(&self, id: &str) -> Result<String, LookupError> {
        self.get(id).cloned().ok_or_else(|| LookupError(id.to_string()))
    }
}

/// Scalars are read as their JSON text; `null` and containers count as absent.
impl ValueSource for Map<String, Value> {
    fn current_value(&self, id: &str) -> Result<String, LookupError> {
        match self.get(id) {
            Some(Value::String(s)) => Ok(s.clone()),
            Some(v @ (Value::Number(_) | Value::Bool(_))) => Ok(v.to_string()),
            _ => Err(LookupError(id.to_string())),
        }
    }
}

// ————————————————————————————————————————————————————————————————————————————
// HEADLESS HOST
// ————————————————————————————————————————————————————————————————————————————

#[derive(Debug, Clone, Default)]
pub struct MemoryToolkit {
    values: IndexMap<String, String>,
    painted: Vec<Control>,
}

impl MemoryToolkit {
    pub fn new() -> Self {
        Self::default()
    }

    /// Type into a painted control.
    pub fn set_value(&mut self, id: &str, value: impl Into<String>) -> Result<(), LookupError> {
        match self.values.get_mut(id) {
            Some(slot) => {
                *slot = value.into();
                Ok(())
            }
            None => Err(LookupError(id.to_string())),
        }
    }

    /// Painted value-bearing identifiers, in document order.
    pub fn identifiers(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    pub fn controls(&self) -> &[Control] {
        &self.painted
    }
}

impl ValueSource for MemoryToolkit {
    fn current_value(&self, id: &str) -> Result<String, LookupError> {
        self.values.current_value(id)
    }
}

impl Toolkit for MemoryToolkit {
    fn paint(&mut self, controls: &[Control]) {
        let mut next = IndexMap::new();
        for control in controls {
            control.visit(&mut |c| {
                if let Some((id, default)) = c.value_slot() {
                    let value = self.values.get(id.as_str()).cloned().unwrap_or_else(|| default.to_string());
                    next.insert(id.to_string(), value);
                }
            });
        }
        tracing::trace!(controls = next.len(), "painted");
        self.values = next;
        self.painted = controls.to_vec();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::InputKind;
    use pretty_assertions::assert_eq;

    fn input(id: &str) -> Control {
        Control::Input { id: id.into(), label: None, input: InputKind::Text }
    }

    #[test]
    fn repaint_keeps_surviving_values_and_forgets_the_rest() {
        let mut toolkit = MemoryToolkit::new();
        toolkit.paint(&[input("tags-0"), input("tags-1")]);
        toolkit.set_value("tags-0", "a").unwrap();
        toolkit.set_value("tags-1", "b").unwrap();

        toolkit.paint(&[input("tags-0")]);
        assert_eq!(toolkit.controls(), [input("tags-0")]);
        assert_eq!(toolkit.current_value("tags-0"), Ok("a".to_string()));
        assert_eq!(toolkit.current_value("tags-1"), Err(LookupError("tags-1".into())));
        assert!(!toolkit.contains("tags-1"));
    }

    #[test]
    fn selects_start_at_their_placeholder() {
        let mut toolkit = MemoryToolkit::new();
        toolkit.paint(&[Control::Group {
            label: None,
            children: vec![Control::Select {
                id: "age".into(),
                label: None,
                options: vec!["18".into(), "21".into()],
                placeholder: "18".into(),
            }],
        }]);
        assert_eq!(toolkit.current_value("age"), Ok("18".to_string()));
        assert_eq!(toolkit.identifiers().collect::<Vec<_>>(), ["age"]);
    }

    #[test]
    fn typing_into_an_unpainted_control_is_a_lookup_error() {
        let mut toolkit = MemoryToolkit::new();
        assert_eq!(toolkit.set_value("ghost", "x"), Err(LookupError("ghost".into())));
    }

    #[test]
    fn json_maps_stringify_scalars() {
        let map = serde_json::json!({ "n": 3, "s": "x", "z": null });
        let map = map.as_object().unwrap();
        assert_eq!(map.current_value("n"), Ok("3".to_string()));
        assert_eq!(map.current_value("s"), Ok("x".to_string()));
        assert!(map.current_value("z").is_err());
    }
}
