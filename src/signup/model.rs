//! Registration draft and field identifiers.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FormError;

/// Every field of the registration form.
///
/// Serialized (and parsed) with the camelCase names used by the page and
/// the signup endpoint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum FieldName {
    Email,
    Password,
    ConfirmPassword,
    TermsAccepted,
    Nickname,
    Gender,
    Birthdate,
    Height,
    CurrentWeight,
    TargetWeight,
    ActivityLevel,
}

/// Fields batch-validated when leaving step 1.
pub const STEP1_FIELDS: [FieldName; 4] = [
    FieldName::Email,
    FieldName::Password,
    FieldName::ConfirmPassword,
    FieldName::TermsAccepted,
];

/// Fields batch-validated when submitting step 2.
pub const STEP2_FIELDS: [FieldName; 6] = [
    FieldName::Nickname,
    FieldName::Gender,
    FieldName::Birthdate,
    FieldName::Height,
    FieldName::CurrentWeight,
    FieldName::TargetWeight,
];

impl FieldName {
    pub const ALL: [FieldName; 11] = [
        Self::Email,
        Self::Password,
        Self::ConfirmPassword,
        Self::TermsAccepted,
        Self::Nickname,
        Self::Gender,
        Self::Birthdate,
        Self::Height,
        Self::CurrentWeight,
        Self::TargetWeight,
        Self::ActivityLevel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::ConfirmPassword => "confirmPassword",
            Self::TermsAccepted => "termsAccepted",
            Self::Nickname => "nickname",
            Self::Gender => "gender",
            Self::Birthdate => "birthdate",
            Self::Height => "height",
            Self::CurrentWeight => "currentWeight",
            Self::TargetWeight => "targetWeight",
            Self::ActivityLevel => "activityLevel",
        }
    }
}

impl std::fmt::Display for FieldName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldName {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| FormError::UnknownField(s.to_string()))
    }
}

/// Gender selection. `Unselected` is the empty placeholder option.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Gender {
    #[default]
    #[serde(rename = "")]
    Unselected,
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub const OPTIONS: [Gender; 5] = [
        Self::Unselected,
        Self::Male,
        Self::Female,
        Self::Other,
        Self::PreferNotToSay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unselected => "",
            Self::Male => "male",
            Self::Female => "female",
            Self::Other => "other",
            Self::PreferNotToSay => "preferNotToSay",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Unselected => "選択してください",
            Self::Male => "男性",
            Self::Female => "女性",
            Self::Other => "その他",
            Self::PreferNotToSay => "回答しない",
        }
    }

    /// Parse a select value; anything unrecognised counts as unselected.
    pub fn from_value(value: &str) -> Self {
        Self::OPTIONS
            .into_iter()
            .find(|g| g.as_str() == value)
            .unwrap_or_default()
    }
}

/// Self-reported activity level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    #[default]
    Moderate,
    Active,
    VeryActive,
}

impl ActivityLevel {
    pub const OPTIONS: [ActivityLevel; 5] = [
        Self::Sedentary,
        Self::Light,
        Self::Moderate,
        Self::Active,
        Self::VeryActive,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sedentary => "sedentary",
            Self::Light => "light",
            Self::Moderate => "moderate",
            Self::Active => "active",
            Self::VeryActive => "veryActive",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Sedentary => "低い（ほとんど運動しない）",
            Self::Light => "軽い（週1-3回の運動）",
            Self::Moderate => "普通（週3-5回の運動）",
            Self::Active => "高い（ほぼ毎日運動する）",
            Self::VeryActive => "非常に高い（1日に複数回運動）",
        }
    }

    /// Parse a select value; unrecognised values keep the default.
    pub fn from_value(value: &str) -> Self {
        Self::OPTIONS
            .into_iter()
            .find(|level| level.as_str() == value)
            .unwrap_or_default()
    }
}

/// Everything the user has entered so far.
///
/// Numeric profile fields stay as entered text: the form only checks that
/// they are present, and the backend receives them verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegistrationDraft {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub nickname: String,
    pub gender: Gender,
    pub birthdate: String,
    pub height: String,
    pub current_weight: String,
    pub target_weight: String,
    pub activity_level: ActivityLevel,
    pub terms_accepted: bool,
}

impl RegistrationDraft {
    /// Current value of a field as the text shown in its control.
    pub fn value(&self, field: FieldName) -> &str {
        match field {
            FieldName::Email => &self.email,
            FieldName::Password => &self.password,
            FieldName::ConfirmPassword => &self.confirm_password,
            FieldName::TermsAccepted => {
                if self.terms_accepted {
                    "true"
                } else {
                    ""
                }
            }
            FieldName::Nickname => &self.nickname,
            FieldName::Gender => self.gender.as_str(),
            FieldName::Birthdate => &self.birthdate,
            FieldName::Height => &self.height,
            FieldName::CurrentWeight => &self.current_weight,
            FieldName::TargetWeight => &self.target_weight,
            FieldName::ActivityLevel => self.activity_level.as_str(),
        }
    }

    /// Store a text value. The consent flag is not settable from here.
    pub(crate) fn set_text(&mut self, field: FieldName, value: String) {
        match field {
            FieldName::Email => self.email = value,
            FieldName::Password => self.password = value,
            FieldName::ConfirmPassword => self.confirm_password = value,
            FieldName::TermsAccepted => {}
            FieldName::Nickname => self.nickname = value,
            FieldName::Gender => self.gender = Gender::from_value(&value),
            FieldName::Birthdate => self.birthdate = value,
            FieldName::Height => self.height = value,
            FieldName::CurrentWeight => self.current_weight = value,
            FieldName::TargetWeight => self.target_weight = value,
            FieldName::ActivityLevel => self.activity_level = ActivityLevel::from_value(&value),
        }
    }
}

/// JSON body for `POST /auth/signup`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub nickname: String,
    pub gender: Gender,
    pub birthdate: String,
    pub height: String,
    pub current_weight: String,
    pub target_weight: String,
    pub activity_level: ActivityLevel,
}

impl From<&RegistrationDraft> for SignupRequest {
    fn from(draft: &RegistrationDraft) -> Self {
        Self {
            email: draft.email.clone(),
            password: draft.password.clone(),
            confirm_password: draft.confirm_password.clone(),
            nickname: draft.nickname.clone(),
            gender: draft.gender,
            birthdate: draft.birthdate.clone(),
            height: draft.height.clone(),
            current_weight: draft.current_weight.clone(),
            target_weight: draft.target_weight.clone(),
            activity_level: draft.activity_level,
        }
    }
}
