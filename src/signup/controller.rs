//! SignupForm — owns the draft, its errors and the wizard step.
//!
//! Two update paths exist on purpose: `change` clears a field's error as
//! soon as its value changes without re-checking it, while `blur` and the
//! batch validations run the rules and are the only source of new errors.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::model::{FieldName, RegistrationDraft, STEP1_FIELDS, STEP2_FIELDS, SignupRequest};
use super::state::FormStep;
use super::validation::{STEP_INVALID_MESSAGE, check_field};
use crate::acknowledgment::{AcceptOutcome, Acknowledgment, LegalDocument, ScrollMetrics};
use crate::api::SignupApi;
use crate::error::{ApiError, FormError};

/// Field → message, present only for invalid fields.
pub type FieldErrorMap = BTreeMap<FieldName, String>;

/// Fields the user has left at least once.
pub type TouchedSet = BTreeSet<FieldName>;

/// Placeholder acknowledgment shown after a successful registration.
pub const REGISTERED_MESSAGE: &str = "登録成功！（デモ用メッセージ）";

/// Banner shown when the signup call fails.
pub const SUBMIT_FAILED_MESSAGE: &str = "登録に失敗しました。時間をおいて再度お試しください。";

/// A UI event delivered by the page.
///
/// Field and document names arrive as the page sent them and are resolved
/// in `SignupForm::apply`, so an unknown name is a `FormError`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FormEvent {
    Change { field: String, value: String },
    Blur { field: String },
    ToggleConsent { checked: bool },
    OpenDocument { document: String },
    CloseDocument { document: String },
    ScrollDocument { document: String, metrics: ScrollMetrics },
    AcceptDocument { document: String },
    Next,
    Back,
    Submit,
}

/// What applying an event asks of the caller.
#[derive(Debug, Clone, PartialEq)]
pub enum Applied {
    /// State updated; nothing else to do.
    Updated,
    /// Step 2 validated; the caller must send this request and hand the
    /// result to [`SignupForm::complete_submission`].
    SubmissionReady(SignupRequest),
}

/// Result of a submission attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitOutcome {
    /// Validation failed (or the form is not on the profile step).
    Invalid,
    /// The backend accepted the registration.
    Registered,
    /// The signup call failed; the draft is kept for another try.
    Failed { reason: String },
}

/// All registration state for one page session.
#[derive(Debug, Clone, Default)]
pub struct SignupForm {
    draft: RegistrationDraft,
    step: FormStep,
    errors: FieldErrorMap,
    touched: TouchedSet,
    banner: Option<String>,
    acknowledgment: Acknowledgment,
    consent_unlocked: bool,
    /// Set between a validated submit and its result.
    submitting: bool,
    completion: Option<String>,
}

impl SignupForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn step(&self) -> FormStep {
        self.step
    }

    pub fn errors(&self) -> &FieldErrorMap {
        &self.errors
    }

    pub fn touched(&self) -> &TouchedSet {
        &self.touched
    }

    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    pub fn acknowledgment(&self) -> &Acknowledgment {
        &self.acknowledgment
    }

    /// Whether the consent checkbox reacts to clicks.
    pub fn consent_unlocked(&self) -> bool {
        self.consent_unlocked
    }

    /// Placeholder acknowledgment after a successful registration.
    pub fn completion(&self) -> Option<&str> {
        self.completion.as_deref()
    }

    /// A signup request is in flight.
    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn is_completed(&self) -> bool {
        self.completion.is_some()
    }

    /// The error to display for `field`: only shown once the field is touched.
    pub fn visible_error(&self, field: FieldName) -> Option<&str> {
        if self.touched.contains(&field) {
            self.errors.get(&field).map(String::as_str)
        } else {
            None
        }
    }

    pub fn visible_errors(&self) -> FieldErrorMap {
        self.errors
            .iter()
            .filter(|(field, _)| self.touched.contains(field))
            .map(|(field, message)| (*field, message.clone()))
            .collect()
    }

    // ── Optimistic path ─────────────────────────────────────────────────

    /// Store a new value and drop the field's error without re-checking.
    pub fn change(&mut self, field: FieldName, value: impl Into<String>) {
        let value: String = value.into();
        if field == FieldName::TermsAccepted {
            self.toggle_consent(value == "true");
            return;
        }
        self.draft.set_text(field, value);
        self.clear_error(field);
    }

    /// Consent checkbox handler. Inert until both documents are read.
    pub fn toggle_consent(&mut self, checked: bool) {
        if !self.consent_unlocked {
            debug!("Consent toggle ignored, documents not read");
            return;
        }
        self.draft.terms_accepted = checked;
        self.clear_error(FieldName::TermsAccepted);
    }

    fn clear_error(&mut self, field: FieldName) {
        self.errors.remove(&field);
    }

    // ── Authoritative path ─────────────────────────────────────────────

    pub fn blur(&mut self, field: FieldName) {
        self.touched.insert(field);
        self.validate_field(field);
    }

    /// Run the field's rule and update the error map.
    pub fn validate_field(&mut self, field: FieldName) -> bool {
        match check_field(&self.draft, self.step, field) {
            Some(message) => {
                self.errors.insert(field, message.to_string());
                false
            }
            None => {
                self.errors.remove(&field);
                true
            }
        }
    }

    fn validate_fields(&mut self, fields: &[FieldName]) -> bool {
        self.touched.extend(fields.iter().copied());

        // every field is checked so all errors show at once
        let mut valid = true;
        for field in fields {
            if !self.validate_field(*field) {
                valid = false;
            }
        }

        if !valid {
            self.banner = Some(STEP_INVALID_MESSAGE.to_string());
        }
        valid
    }

    pub fn validate_step1(&mut self) -> bool {
        self.validate_fields(&STEP1_FIELDS)
    }

    pub fn validate_step2(&mut self) -> bool {
        self.validate_fields(&STEP2_FIELDS)
    }

    // ── Acknowledgment ─────────────────────────────────────────────────

    pub fn open_document(&mut self, document: LegalDocument) {
        self.acknowledgment.open(document);
    }

    pub fn close_document(&mut self, document: LegalDocument) {
        self.acknowledgment.close(document);
    }

    pub fn scroll_document(&mut self, document: LegalDocument, metrics: ScrollMetrics) -> bool {
        self.acknowledgment.scroll(document, metrics)
    }

    pub fn accept_document(&mut self, document: LegalDocument) -> AcceptOutcome {
        let outcome = self.acknowledgment.accept(document);
        if outcome.both_read {
            self.on_both_documents_read();
        }
        outcome
    }

    /// Both documents accepted: unlock consent and drop its stale error.
    pub fn on_both_documents_read(&mut self) {
        self.consent_unlocked = true;
        self.clear_error(FieldName::TermsAccepted);
    }

    // ── Step transitions ───────────────────────────────────────────────

    /// Leave step 1 if its fields validate.
    pub fn next(&mut self) -> bool {
        let Some(target) = self.step.next().filter(|t| self.step.can_transition_to(*t)) else {
            return false;
        };
        if !self.validate_step1() {
            info!(step = %self.step, "Step validation failed");
            return false;
        }
        self.banner = None;
        self.step = target;
        info!(step = %self.step, "Advanced to next step");
        true
    }

    /// Return to step 1. Entered data is kept.
    pub fn back(&mut self) {
        if let Some(target) = self.step.previous() {
            self.step = target;
            info!(step = %self.step, "Returned to previous step");
        }
        self.banner = None;
    }

    /// Validate step 2 and build the signup request.
    ///
    /// Marks the form as submitting; until `complete_submission` runs, further
    /// calls return `None` so a double submit sends one request.
    pub fn prepare_submission(&mut self) -> Option<SignupRequest> {
        if self.step != FormStep::Profile || self.is_completed() {
            return None;
        }
        if self.submitting {
            debug!("Submit ignored, request already in flight");
            return None;
        }
        if !self.validate_step2() {
            info!(step = %self.step, "Step validation failed");
            return None;
        }
        self.submitting = true;
        Some(SignupRequest::from(&self.draft))
    }

    /// Apply the signup call's result.
    pub fn complete_submission(
        &mut self,
        result: Result<serde_json::Value, ApiError>,
    ) -> SubmitOutcome {
        self.submitting = false;
        match result {
            Ok(_) => {
                info!("Registration submitted");
                self.draft = RegistrationDraft::default();
                self.banner = None;
                self.completion = Some(REGISTERED_MESSAGE.to_string());
                SubmitOutcome::Registered
            }
            Err(e) => {
                warn!(error = %e, "Registration failed");
                self.banner = Some(SUBMIT_FAILED_MESSAGE.to_string());
                SubmitOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    /// Validate step 2 and, if it passes, register through `api`.
    pub async fn submit(&mut self, api: &dyn SignupApi) -> SubmitOutcome {
        let Some(request) = self.prepare_submission() else {
            return SubmitOutcome::Invalid;
        };
        let result = api.signup(&request).await;
        self.complete_submission(result)
    }

    /// Apply one page event.
    pub fn apply(&mut self, event: FormEvent) -> Result<Applied, FormError> {
        match event {
            FormEvent::Change { field, value } => self.change(field.parse()?, value),
            FormEvent::Blur { field } => self.blur(field.parse()?),
            FormEvent::ToggleConsent { checked } => self.toggle_consent(checked),
            FormEvent::OpenDocument { document } => self.open_document(document.parse()?),
            FormEvent::CloseDocument { document } => self.close_document(document.parse()?),
            FormEvent::ScrollDocument { document, metrics } => {
                self.scroll_document(document.parse()?, metrics);
            }
            FormEvent::AcceptDocument { document } => {
                self.accept_document(document.parse()?);
            }
            FormEvent::Next => {
                self.next();
            }
            FormEvent::Back => self.back(),
            FormEvent::Submit => {
                if let Some(request) = self.prepare_submission() {
                    return Ok(Applied::SubmissionReady(request));
                }
            }
        }
        Ok(Applied::Updated)
    }
}
