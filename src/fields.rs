//! Field primitives — labeled form controls rendered to HTML.
//!
//! These hold no state and run no validation. Each is the serde context of
//! its Handlebars template; the page script turns `input`/`change` and
//! `focusout` on any `[data-field]` control into `change` / `blur` events.

use serde::Serialize;

use crate::error::TemplateError;
use crate::signup::FieldName;
use crate::templates::{CHECKBOX_FIELD, INPUT_FIELD, PageTemplates, SELECT_FIELD};

/// HTML `type` of an input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InputType {
    Text,
    Email,
    Password,
    Date,
    Number,
}

/// A labeled `<input>`.
#[derive(Debug, Clone, Serialize)]
pub struct InputField<'a> {
    pub label: &'a str,
    #[serde(rename = "type")]
    pub input_type: InputType,
    pub name: FieldName,
    pub value: &'a str,
    pub required: bool,
    pub placeholder: Option<&'a str>,
    pub min: Option<&'a str>,
    pub max: Option<&'a str>,
    pub step: Option<&'a str>,
    pub error: Option<&'a str>,
}

impl<'a> InputField<'a> {
    pub fn new(label: &'a str, input_type: InputType, name: FieldName, value: &'a str) -> Self {
        Self {
            label,
            input_type,
            name,
            value,
            required: false,
            placeholder: None,
            min: None,
            max: None,
            step: None,
            error: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn range(mut self, min: &'a str, max: &'a str) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    pub fn step(mut self, step: &'a str) -> Self {
        self.step = Some(step);
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn render(&self, templates: &PageTemplates) -> Result<String, TemplateError> {
        templates.render(INPUT_FIELD, self)
    }
}

/// One `<option>` of a select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SelectOption<'a> {
    pub value: &'a str,
    pub label: &'a str,
    pub selected: bool,
}

/// A labeled `<select>`.
#[derive(Debug, Clone, Serialize)]
pub struct SelectField<'a> {
    pub label: &'a str,
    pub name: FieldName,
    pub options: Vec<SelectOption<'a>>,
    pub required: bool,
    pub error: Option<&'a str>,
}

impl<'a> SelectField<'a> {
    /// `options` are `(value, label)` pairs; the one equal to `value` is
    /// marked selected.
    pub fn new<I>(label: &'a str, name: FieldName, value: &str, options: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let options = options
            .into_iter()
            .map(|(option, text)| SelectOption {
                value: option,
                label: text,
                selected: option == value,
            })
            .collect();
        Self {
            label,
            name,
            options,
            required: false,
            error: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn render(&self, templates: &PageTemplates) -> Result<String, TemplateError> {
        templates.render(SELECT_FIELD, self)
    }
}

/// A checkbox whose label may be arbitrary markup (links, hints).
#[derive(Debug, Clone, Serialize)]
pub struct CheckboxField<'a> {
    pub name: FieldName,
    pub checked: bool,
    pub disabled: bool,
    /// Label markup rendered by another template; inserted unescaped.
    pub label_html: &'a str,
    pub error: Option<&'a str>,
}

impl<'a> CheckboxField<'a> {
    pub fn new(name: FieldName, checked: bool, label_html: &'a str) -> Self {
        Self {
            name,
            checked,
            disabled: false,
            label_html,
            error: None,
        }
    }

    pub fn disabled(mut self, disabled: bool) -> Self {
        self.disabled = disabled;
        self
    }

    pub fn error(mut self, error: Option<&'a str>) -> Self {
        self.error = error;
        self
    }

    pub fn render(&self, templates: &PageTemplates) -> Result<String, TemplateError> {
        templates.render(CHECKBOX_FIELD, self)
    }
}
