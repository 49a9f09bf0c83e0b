//! Terms / privacy acknowledgment flow.
//!
//! Each document is shown in a modal whose accept button stays disabled
//! until the reader scrolls to the end. Once both documents are accepted
//! the registration form unlocks its consent checkbox.

pub mod coordinator;
pub mod document;
pub mod modal;

pub use coordinator::{AcceptOutcome, Acknowledgment};
pub use document::LegalDocument;
pub use modal::{DocumentModal, ScrollMetrics};
