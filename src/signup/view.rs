//! Page rendering and the JSON snapshot returned after every event.
//!
//! Markup lives in the Handlebars templates; this module only builds their
//! serde contexts from a `SignupForm`.

use serde::Serialize;
use uuid::Uuid;

use super::controller::{FieldErrorMap, SignupForm};
use super::model::{ActivityLevel, FieldName, Gender};
use super::state::FormStep;
use crate::acknowledgment::LegalDocument;
use crate::error::TemplateError;
use crate::fields::{CheckboxField, InputField, InputType, SelectField};
use crate::templates::{CONSENT_LABEL, FORM, PAGE, PAGE_SCRIPT, PAGE_STYLE, PageTemplates};

/// Snapshot of a session after an event.
#[derive(Debug, Clone, Serialize)]
pub struct FormView {
    pub session_id: Uuid,
    pub step: FormStep,
    pub banner: Option<String>,
    /// Errors of touched fields only.
    pub errors: FieldErrorMap,
    pub terms_read: bool,
    pub privacy_read: bool,
    pub both_read: bool,
    pub open_document: Option<LegalDocument>,
    pub submitting: bool,
    pub completed: Option<String>,
    /// Re-rendered inner markup of the form container.
    pub html: String,
}

impl FormView {
    pub fn new(
        templates: &PageTemplates,
        session_id: Uuid,
        form: &SignupForm,
    ) -> Result<Self, TemplateError> {
        let ack = form.acknowledgment();
        Ok(Self {
            session_id,
            step: form.step(),
            banner: form.banner().map(str::to_string),
            errors: form.visible_errors(),
            terms_read: ack.terms_read(),
            privacy_read: ack.privacy_read(),
            both_read: ack.both_read(),
            open_document: ack.open_document(),
            submitting: form.is_submitting(),
            completed: form.completion().map(str::to_string),
            html: render_form(templates, form)?,
        })
    }
}

#[derive(Serialize)]
struct PageContext<'a> {
    session_id: Uuid,
    style: &'static str,
    script: &'static str,
    #[serde(flatten)]
    form: FormContext<'a>,
}

#[derive(Serialize)]
struct FormContext<'a> {
    completed: Option<&'a str>,
    title: &'static str,
    on_profile: bool,
    step_number: u8,
    banner: Option<&'a str>,
    submit_action: &'static str,
    account: Option<AccountStep<'a>>,
    profile: Option<ProfileStep<'a>>,
    modal: Option<ModalContext>,
}

#[derive(Serialize)]
struct AccountStep<'a> {
    email: InputField<'a>,
    password: InputField<'a>,
    confirm_password: InputField<'a>,
    consent: CheckboxField<'a>,
}

#[derive(Serialize)]
struct ProfileStep<'a> {
    nickname: InputField<'a>,
    gender: SelectField<'a>,
    birthdate: InputField<'a>,
    height: InputField<'a>,
    current_weight: InputField<'a>,
    target_weight: InputField<'a>,
    activity_level: SelectField<'a>,
    submitting: bool,
}

#[derive(Serialize)]
struct ConsentLabel {
    documents: Vec<DocumentLink>,
    both_read: bool,
}

#[derive(Serialize)]
struct DocumentLink {
    document: LegalDocument,
    title: &'static str,
    read: bool,
}

#[derive(Serialize)]
struct ModalContext {
    document: LegalDocument,
    title: &'static str,
    body: &'static str,
    scrolled: bool,
    can_accept: bool,
    hint: &'static str,
}

/// Full HTML document for a session.
pub fn render_page(
    templates: &PageTemplates,
    session_id: Uuid,
    form: &SignupForm,
) -> Result<String, TemplateError> {
    let consent_label = render_consent_label(templates, form)?;
    let context = PageContext {
        session_id,
        style: PAGE_STYLE,
        script: PAGE_SCRIPT,
        form: form_context(form, &consent_label),
    };
    templates.render(PAGE, &context)
}

/// Inner markup of the form container: header, progress, banner, fields
/// and any open document modal.
pub fn render_form(templates: &PageTemplates, form: &SignupForm) -> Result<String, TemplateError> {
    let consent_label = render_consent_label(templates, form)?;
    templates.render(FORM, &form_context(form, &consent_label))
}

fn render_consent_label(templates: &PageTemplates, form: &SignupForm) -> Result<String, TemplateError> {
    let ack = form.acknowledgment();
    let label = ConsentLabel {
        documents: LegalDocument::ALL
            .into_iter()
            .map(|document| DocumentLink {
                document,
                title: document.title(),
                read: ack.is_read(document),
            })
            .collect(),
        both_read: ack.both_read(),
    };
    templates.render(CONSENT_LABEL, &label)
}

fn form_context<'a>(form: &'a SignupForm, consent_label: &'a str) -> FormContext<'a> {
    let step = form.step();
    let (account, profile) = match step {
        FormStep::Account => (Some(account_step(form, consent_label)), None),
        FormStep::Profile => (None, Some(profile_step(form))),
    };
    FormContext {
        completed: form.completion(),
        title: step.title(),
        on_profile: step == FormStep::Profile,
        step_number: step.number(),
        banner: form.banner(),
        submit_action: match step {
            FormStep::Account => "next",
            FormStep::Profile => "submit",
        },
        account,
        profile,
        modal: form.acknowledgment().open_document().map(|document| {
            let modal = form.acknowledgment().modal(document);
            ModalContext {
                document,
                title: document.title(),
                body: document.body(),
                scrolled: modal.scrolled_to_bottom(),
                can_accept: modal.can_accept(),
                hint: modal.footer_hint(),
            }
        }),
    }
}

fn account_step<'a>(form: &'a SignupForm, consent_label: &'a str) -> AccountStep<'a> {
    let draft = form.draft();
    AccountStep {
        email: InputField::new("メールアドレス", InputType::Email, FieldName::Email, &draft.email)
            .required()
            .error(form.visible_error(FieldName::Email)),
        password: InputField::new("パスワード", InputType::Password, FieldName::Password, &draft.password)
            .required()
            .error(form.visible_error(FieldName::Password)),
        confirm_password: InputField::new(
            "パスワード（確認）",
            InputType::Password,
            FieldName::ConfirmPassword,
            &draft.confirm_password,
        )
        .required()
        .error(form.visible_error(FieldName::ConfirmPassword)),
        consent: CheckboxField::new(FieldName::TermsAccepted, draft.terms_accepted, consent_label)
            .disabled(!form.consent_unlocked())
            .error(form.visible_error(FieldName::TermsAccepted)),
    }
}

fn profile_step(form: &SignupForm) -> ProfileStep<'_> {
    let draft = form.draft();
    ProfileStep {
        nickname: InputField::new("ニックネーム", InputType::Text, FieldName::Nickname, &draft.nickname)
            .required()
            .placeholder("アプリ内で表示される名前")
            .error(form.visible_error(FieldName::Nickname)),
        gender: SelectField::new(
            "性別",
            FieldName::Gender,
            draft.gender.as_str(),
            Gender::OPTIONS.iter().map(|g| (g.as_str(), g.label())),
        )
        .required()
        .error(form.visible_error(FieldName::Gender)),
        birthdate: InputField::new("生年月日", InputType::Date, FieldName::Birthdate, &draft.birthdate)
            .required()
            .error(form.visible_error(FieldName::Birthdate)),
        height: InputField::new("身長 (cm)", InputType::Number, FieldName::Height, &draft.height)
            .required()
            .range("100", "250")
            .error(form.visible_error(FieldName::Height)),
        current_weight: InputField::new(
            "現在の体重 (kg)",
            InputType::Number,
            FieldName::CurrentWeight,
            &draft.current_weight,
        )
        .required()
        .range("20", "300")
        .step("0.1")
        .error(form.visible_error(FieldName::CurrentWeight)),
        target_weight: InputField::new(
            "目標体重 (kg)",
            InputType::Number,
            FieldName::TargetWeight,
            &draft.target_weight,
        )
        .required()
        .range("20", "300")
        .step("0.1")
        .error(form.visible_error(FieldName::TargetWeight)),
        activity_level: SelectField::new(
            "活動レベル",
            FieldName::ActivityLevel,
            draft.activity_level.as_str(),
            ActivityLevel::OPTIONS.iter().map(|level| (level.as_str(), level.label())),
        )
        .error(form.visible_error(FieldName::ActivityLevel)),
        submitting: form.is_submitting(),
    }
}
