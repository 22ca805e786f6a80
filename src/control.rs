//! Control descriptors handed to the host toolkit. No schema types leak past
//! `ArrayControl`, which the renderer expands before anything is painted.
use serde::Serialize;

use crate::codec::Identifier;
use crate::schema::ElementSpec;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Control {
    Input {
        id: Identifier,
        label: Option<String>,
        input: InputKind,
    },
    Select {
        id: Identifier,
        label: Option<String>,
        options: Vec<String>, // enum order
        placeholder: String, // first option, or empty
    },
    Group {
        label: Option<String>,
        children: Vec<Control>,
    },
    Array(ArrayControl), // unexpanded; see render::FormRenderer
    Button {
        id: String,
        label: String,
        action: Action,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum InputKind {
    Text,
    Number,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArrayControl {
    pub id: Identifier,
    pub label: Option<String>,
    #[serde(skip)]
    pub element: ElementSpec,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    Add(Identifier),
    Remove(Identifier),
    Submit,
}

pub const ADD_SUFFIX: &str = "+add";
pub const REMOVE_SUFFIX: &str = "+remove";
pub const SUBMIT_SUFFIX: &str = "+submit";

impl Control {
    pub fn add_button(array: &Identifier) -> Self {
        Control::Button {
            id: format!("{array}{ADD_SUFFIX}"),
            label: "Add".to_string(),
            action: Action::Add(array.clone()),
        }
    }

    pub fn remove_button(array: &Identifier) -> Self {
        Control::Button {
            id: format!("{array}{REMOVE_SUFFIX}"),
            label: "Remove".to_string(),
            action: Action::Remove(array.clone()),
        }
    }

    pub fn submit_button(form_id: &str) -> Self {
        Control::Button {
            id: format!("{form_id}{SUBMIT_SUFFIX}"),
            label: "Submit".to_string(),
            action: Action::Submit,
        }
    }

    /// Identifier of a value-bearing control, with the value it starts out with.
    pub fn value_slot(&self) -> Option<(&Identifier, &str)> {
        match self {
            Control::Input { id, .. } => Some((id, "")),
            Control::Select { id, placeholder, .. } => Some((id, placeholder.as_str())),
            _ => None,
        }
    }

    /// Depth-first, document order.
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a Control)) {
        f(self);
        if let Control::Group { children, .. } = self {
            for child in children {
                child.visit(f);
            }
        }
    }
}

/// All value-bearing identifiers in a rendered tree, in document order.
pub fn value_identifiers(controls: &[Control]) -> Vec<&Identifier> {
    let mut out = Vec::new();
    for control in controls {
        control.visit(&mut |c| {
            if let Some((id, _)) = c.value_slot() {
                out.push(id);
            }
        });
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn serializes_with_kind_tags() {
        let control = Control::Group {
            label: Some("Address".into()),
            children: vec![
                Control::Input { id: "address.street".into(), label: None, input: InputKind::Text },
                Control::add_button(&"tags".into()),
            ],
        };
        assert_eq!(
            serde_json::to_value(&control).unwrap(),
            json!({
                "kind": "group",
                "label": "Address",
                "children": [
                    { "kind": "input", "id": "address.street", "label": null, "input": "text" },
                    { "kind": "button", "id": "tags+add", "label": "Add", "action": { "add": "tags" } }
                ]
            })
        );
    }

    #[test]
    fn value_identifiers_skip_buttons_and_descend_groups() {
        let controls = vec![
            Control::Input { id: "name".into(), label: None, input: InputKind::Text },
            Control::Group {
                label: None,
                children: vec![Control::Select {
                    id: "address.state".into(),
                    label: None,
                    options: vec!["CA".into()],
                    placeholder: "CA".into(),
                }],
            },
            Control::submit_button("signup"),
        ];
        let ids: Vec<&str> = value_identifiers(&controls).into_iter().map(Identifier::as_str).collect();
        assert_eq!(ids, ["name", "address.state"]);
    }
}
