//! The embeddable form: a schema, its live row counts and a submit callback.
use serde_json::Value;

use crate::codec::Identifier;
use crate::control::{ADD_SUFFIX, Control, REMOVE_SUFFIX, SUBMIT_SUFFIX};
use crate::error::{FormError, LookupError, Result};
use crate::host::{Toolkit, ValueSource};
use crate::parse::FormParser;
use crate::render::FormRenderer;
use crate::repeat::RepeatStates;
use crate::schema::{FieldKind, Schema};

pub struct FormGenerator;

impl FormGenerator {
    pub fn create<F>(schema: Schema, id: impl Into<String>, on_submit: F) -> Form<F>
    where
        F: FnMut(Value),
    {
        Form { id: id.into(), schema, repeats: RepeatStates::new(), on_submit }
    }
}

pub struct Form<F> {
    id: String,
    schema: Schema,
    repeats: RepeatStates,
    on_submit: F,
}

impl<F: FnMut(Value)> Form<F> {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Every control of the form, arrays expanded, followed by the submit button.
    pub fn render(&mut self) -> Result<Vec<Control>> {
        let mut controls = FormRenderer::new(&self.schema, &mut self.repeats).render()?;
        controls.push(Control::submit_button(&self.id));
        Ok(controls)
    }

    pub fn mount<T: Toolkit + ?Sized>(&mut self, toolkit: &mut T) -> Result<()> {
        let controls = self.render()?;
        toolkit.paint(&controls);
        Ok(())
    }

    pub fn add_row(&mut self, array: &Identifier) -> Result<usize> {
        self.check_array(array)?;
        Ok(self.repeats.add(array))
    }

    pub fn remove_row(&mut self, array: &Identifier) -> Result<usize> {
        self.check_array(array)?;
        Ok(self.repeats.remove(array))
    }

    /// Pin an array's row count before the next render (clamped to one).
    pub fn set_rows(&mut self, array: &Identifier, count: usize) -> Result<()> {
        self.check_array(array)?;
        self.repeats.set(array, count);
        Ok(())
    }

    pub fn parse<S: ValueSource + ?Sized>(&self, source: &S) -> Result<Value> {
        FormParser::new(&self.schema, source).parse()
    }

    pub fn validate(&self) -> Result<bool> {
        Err(FormError::Unimplemented("form validation"))
    }

    /// Parse and hand the result to `on_submit`. A failed parse leaves the
    /// form untouched and the callback uncalled.
    pub fn submit<S: ValueSource + ?Sized>(&mut self, source: &S) -> Result<()> {
        let parsed = self.parse(source)?;
        tracing::debug!(form = %self.id, "submitting");
        (self.on_submit)(parsed);
        Ok(())
    }

    /// Route a button press by its identifier. Add/Remove repaint the toolkit.
    pub fn handle_event<T: Toolkit + ?Sized>(&mut self, id: &str, toolkit: &mut T) -> Result<()> {
        if id.strip_suffix(SUBMIT_SUFFIX) == Some(self.id.as_str()) {
            return self.submit(&*toolkit);
        }
        if let Some(array) = id.strip_suffix(ADD_SUFFIX) {
            self.add_row(&Identifier::from(array))?;
            return self.mount(toolkit);
        }
        if let Some(array) = id.strip_suffix(REMOVE_SUFFIX) {
            self.remove_row(&Identifier::from(array))?;
            return self.mount(toolkit);
        }
        Err(LookupError(id.to_string()).into())
    }

    fn check_array(&self, array: &Identifier) -> Result<()> {
        match self.schema.resolve(array.field_path().as_slice()) {
            Some(field) if matches!(field.kind, FieldKind::Array(_)) => Ok(()),
            _ => Err(FormError::schema(array.as_str(), "not an array field")),
        }
    }
}
