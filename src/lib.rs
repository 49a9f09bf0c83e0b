//! weight-signup — account registration for the weight-management app.

pub mod acknowledgment;
pub mod api;
pub mod config;
pub mod error;
pub mod fields;
pub mod signup;
pub mod templates;
