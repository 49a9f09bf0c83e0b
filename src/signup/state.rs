//! Wizard step state machine.

use serde::{Deserialize, Serialize};

/// The two pages of the registration wizard.
///
/// `next` only moves Step1 → Step2; `back` only moves Step2 → Step1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormStep {
    /// Account credentials and consent.
    #[default]
    Account,
    /// Health profile.
    Profile,
}

impl FormStep {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: FormStep) -> bool {
        matches!(
            (self, target),
            (Self::Account, Self::Profile) | (Self::Profile, Self::Account)
        )
    }

    /// The following step, if any.
    pub fn next(&self) -> Option<FormStep> {
        match self {
            Self::Account => Some(Self::Profile),
            Self::Profile => None,
        }
    }

    /// The preceding step, if any.
    pub fn previous(&self) -> Option<FormStep> {
        match self {
            Self::Account => None,
            Self::Profile => Some(Self::Account),
        }
    }

    /// 1-based page number.
    pub fn number(&self) -> u8 {
        match self {
            Self::Account => 1,
            Self::Profile => 2,
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Self::Account => "アカウント登録",
            Self::Profile => "基本情報登録",
        }
    }
}

impl std::fmt::Display for FormStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Account => "account",
            Self::Profile => "profile",
        };
        write!(f, "{s}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_transitions() {
        assert!(FormStep::Account.can_transition_to(FormStep::Profile));
        assert!(FormStep::Profile.can_transition_to(FormStep::Account));
    }

    #[test]
    fn self_transitions_invalid() {
        assert!(!FormStep::Account.can_transition_to(FormStep::Account));
        assert!(!FormStep::Profile.can_transition_to(FormStep::Profile));
    }

    #[test]
    fn next_and_previous() {
        assert_eq!(FormStep::Account.next(), Some(FormStep::Profile));
        assert_eq!(FormStep::Profile.next(), None);
        assert_eq!(FormStep::Profile.previous(), Some(FormStep::Account));
        assert_eq!(FormStep::Account.previous(), None);
    }

    #[test]
    fn display_matches_serde() {
        for step in [FormStep::Account, FormStep::Profile] {
            let json = serde_json::to_string(&step).unwrap();
            assert_eq!(format!("\"{step}\""), json);
        }
    }

    #[test]
    fn starts_on_account_step() {
        assert_eq!(FormStep::default(), FormStep::Account);
        assert_eq!(FormStep::default().number(), 1);
    }
}
