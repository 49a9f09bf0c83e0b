//! Registration wizard — the form controller, its rules and the page that
//! drives it.
//!
//! A session owns one `SignupForm`. Page events go through
//! `SignupForm::apply`; the consent checkbox is unlocked by the
//! acknowledgment flow, and a validated step 2 is posted to the signup API.

pub mod controller;
pub mod model;
pub mod routes;
pub mod state;
pub mod validation;
pub mod view;

pub use controller::{Applied, FieldErrorMap, FormEvent, SignupForm, SubmitOutcome, TouchedSet};
pub use model::{ActivityLevel, FieldName, Gender, RegistrationDraft, SignupRequest};
pub use routes::{SessionStore, SignupRouteState, signup_routes, spawn_expiry_task};
pub use state::FormStep;
pub use view::FormView;
