//! Field validation rules and their user-facing messages.
//!
//! Everything here is pure: the controller decides when to run a rule and
//! what to do with the result.

use std::sync::LazyLock;

use regex::Regex;

use super::model::{FieldName, Gender, RegistrationDraft};
use super::state::FormStep;

/// Minimum password length, counted in characters.
pub const MIN_PASSWORD_LEN: usize = 8;

/// Banner shown when a batch validation fails.
pub const STEP_INVALID_MESSAGE: &str = "入力内容に問題があります。各項目を確認してください。";

pub mod messages {
    pub const EMAIL_REQUIRED: &str = "メールアドレスは必須です";
    pub const EMAIL_INVALID: &str = "有効なメールアドレスを入力してください";
    pub const PASSWORD_REQUIRED: &str = "パスワードは必須です";
    pub const PASSWORD_TOO_SHORT: &str = "パスワードは8文字以上で入力してください";
    pub const CONFIRM_REQUIRED: &str = "パスワード(確認)は必須です";
    pub const CONFIRM_MISMATCH: &str = "パスワードが一致しません";
    pub const TERMS_REQUIRED: &str = "利用規約に同意してください";
    pub const NICKNAME_REQUIRED: &str = "ニックネームは必須です";
    pub const GENDER_REQUIRED: &str = "性別を選択してください";
    pub const BIRTHDATE_REQUIRED: &str = "生年月日は必須です";
    pub const HEIGHT_REQUIRED: &str = "身長は必須です";
    pub const CURRENT_WEIGHT_REQUIRED: &str = "現在の体重は必須です";
    pub const TARGET_WEIGHT_REQUIRED: &str = "目標体重は必須です";
}

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

/// `local@domain.tld` with no whitespace and at least one `.` after the `@`.
pub fn is_valid_email(email: &str) -> bool {
    EMAIL_PATTERN.is_match(email)
}

/// Length is the only requirement; character classes are not checked.
///
/// Length is counted in UTF-16 code units, as the browser's
/// `input.value.length` does, so a non-BMP character counts twice.
pub fn is_valid_password(password: &str) -> bool {
    password.encode_utf16().count() >= MIN_PASSWORD_LEN
}

/// Run the rule for `field` against `draft`.
///
/// Returns the error message, or `None` when the field is valid. Profile
/// fields are only required once the wizard is on the profile step.
pub fn check_field(draft: &RegistrationDraft, step: FormStep, field: FieldName) -> Option<&'static str> {
    use messages::*;

    let on_profile = step == FormStep::Profile;
    match field {
        FieldName::Email => {
            if draft.email.is_empty() {
                Some(EMAIL_REQUIRED)
            } else if !is_valid_email(&draft.email) {
                Some(EMAIL_INVALID)
            } else {
                None
            }
        }
        FieldName::Password => {
            if draft.password.is_empty() {
                Some(PASSWORD_REQUIRED)
            } else if !is_valid_password(&draft.password) {
                Some(PASSWORD_TOO_SHORT)
            } else {
                None
            }
        }
        FieldName::ConfirmPassword => {
            if draft.confirm_password.is_empty() {
                Some(CONFIRM_REQUIRED)
            } else if draft.confirm_password != draft.password {
                Some(CONFIRM_MISMATCH)
            } else {
                None
            }
        }
        FieldName::TermsAccepted => (!draft.terms_accepted).then_some(TERMS_REQUIRED),
        FieldName::Nickname => (on_profile && draft.nickname.is_empty()).then_some(NICKNAME_REQUIRED),
        FieldName::Gender => {
            (on_profile && draft.gender == Gender::Unselected).then_some(GENDER_REQUIRED)
        }
        FieldName::Birthdate => {
            (on_profile && draft.birthdate.is_empty()).then_some(BIRTHDATE_REQUIRED)
        }
        FieldName::Height => (on_profile && draft.height.is_empty()).then_some(HEIGHT_REQUIRED),
        FieldName::CurrentWeight => {
            (on_profile && draft.current_weight.is_empty()).then_some(CURRENT_WEIGHT_REQUIRED)
        }
        FieldName::TargetWeight => {
            (on_profile && draft.target_weight.is_empty()).then_some(TARGET_WEIGHT_REQUIRED)
        }
        FieldName::ActivityLevel => None,
    }
}
