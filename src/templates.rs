//! Handlebars registry for the registration page.
//!
//! Every template is compiled once at startup. Values are HTML-escaped by
//! Handlebars; only `{{{triple}}}` slots take markup, and those are fed
//! from other templates or from the bundled stylesheet and script.

use handlebars::Handlebars;
use serde::Serialize;

use crate::error::TemplateError;

pub const PAGE: &str = "page";
pub const FORM: &str = "form";
pub const INPUT_FIELD: &str = "input_field";
pub const SELECT_FIELD: &str = "select_field";
pub const CHECKBOX_FIELD: &str = "checkbox_field";
pub const CONSENT_LABEL: &str = "consent_label";
pub const MODAL: &str = "modal";

/// Inlined into `<style>` by the page template.
pub const PAGE_STYLE: &str = include_str!("../templates/signup.css");

/// Turns DOM events into JSON `FormEvent`s and swaps in the returned markup.
pub const PAGE_SCRIPT: &str = include_str!("../templates/signup.js");

const SOURCES: [(&str, &str); 9] = [
    (PAGE, include_str!("../templates/page.hbs")),
    (FORM, include_str!("../templates/form.hbs")),
    ("field_label", include_str!("../templates/field_label.hbs")),
    ("field_error", include_str!("../templates/field_error.hbs")),
    (INPUT_FIELD, include_str!("../templates/input_field.hbs")),
    (SELECT_FIELD, include_str!("../templates/select_field.hbs")),
    (CHECKBOX_FIELD, include_str!("../templates/checkbox_field.hbs")),
    (CONSENT_LABEL, include_str!("../templates/consent_label.hbs")),
    (MODAL, include_str!("../templates/modal.hbs")),
];

/// Compiled page templates. Templates double as partials, so `{{> input_field}}`
/// inside the form template renders the same markup as `InputField::render`.
pub struct PageTemplates {
    handlebars: Handlebars<'static>,
}

impl PageTemplates {
    pub fn new() -> Result<Self, TemplateError> {
        let mut handlebars = Handlebars::new();
        for (name, source) in SOURCES {
            handlebars
                .register_template_string(name, source.trim_end())
                .map_err(|e| TemplateError::Register {
                    name,
                    reason: e.to_string(),
                })?;
        }
        Ok(Self { handlebars })
    }

    pub fn render<T: Serialize>(&self, name: &'static str, data: &T) -> Result<String, TemplateError> {
        self.handlebars
            .render(name, data)
            .map_err(|e| TemplateError::Render {
                name,
                reason: e.to_string(),
            })
    }
}

impl std::fmt::Debug for PageTemplates {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageTemplates").finish_non_exhaustive()
    }
}
