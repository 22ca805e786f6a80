//! Render-time expansion of array fields.
//!
//! The walker leaves every array as a placeholder; here each one is replaced
//! by `count` rows followed by its Add and Remove buttons, where `count` comes
//! from the form's [`RepeatStates`]. Rows of an array of objects are named
//! index-then-dot (`things-0.thing_attribute`), the order the parser reads.
use crate::control::{ArrayControl, Control};
use crate::error::Result;
use crate::repeat::RepeatStates;
use crate::schema::{ElementSpec, Schema};
use crate::walker;

pub struct FormRenderer<'a> {
    schema: &'a Schema,
    repeats: &'a mut RepeatStates,
}

impl<'a> FormRenderer<'a> {
    pub fn new(schema: &'a Schema, repeats: &'a mut RepeatStates) -> Self {
        Self { schema, repeats }
    }

    pub fn render(&mut self) -> Result<Vec<Control>> {
        let generated = walker::generate(self.schema)?;
        self.expand(generated)
    }

    fn expand(&mut self, controls: Vec<Control>) -> Result<Vec<Control>> {
        let mut out = Vec::with_capacity(controls.len());
        for control in controls {
            match control {
                Control::Array(array) => out.extend(self.expand_array(array)?),
                Control::Group { label, children } => {
                    let children = self.expand(children)?;
                    out.push(Control::Group { label, children });
                }
                other => out.push(other),
            }
        }
        Ok(out)
    }

    fn expand_array(&mut self, array: ArrayControl) -> Result<Vec<Control>> {
        let count = self.repeats.count(&array.id);
        tracing::debug!(array = %array.id, rows = count, "expanding array field");

        let mut out = Vec::with_capacity(count + 2);
        for index in 0..count {
            let row = array.id.index(index);
            match &array.element {
                ElementSpec::Object(element) => {
                    let children = walker::generate_under(Some(&row), element)?;
                    let children = self.expand(children)?;
                    out.push(Control::Group { label: array.label.clone(), children });
                }
                ElementSpec::Primitive(primitive) => {
                    out.push(walker::generate_flat_field(row, array.label.clone(), *primitive, None)?);
                }
            }
        }
        out.push(Control::add_button(&array.id));
        out.push(Control::remove_button(&array.id));
        Ok(out)
    }
}
