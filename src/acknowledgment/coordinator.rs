//! Tracks which documents have been read and accepted.

use serde::Serialize;
use tracing::debug;

use super::document::LegalDocument;
use super::modal::{DocumentModal, ScrollMetrics};

/// Result of an accept click.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AcceptOutcome {
    /// The document was recorded as read (false when the modal was closed or
    /// not yet scrolled to the bottom).
    pub accepted: bool,
    /// Both documents are now read; the consent checkbox may be unlocked.
    pub both_read: bool,
}

/// Read-state for the terms and privacy documents.
///
/// Read flags only ever go from false to true. Each modal's scroll flag is
/// reset whenever it is reopened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Acknowledgment {
    terms: DocumentModal,
    privacy: DocumentModal,
    terms_read: bool,
    privacy_read: bool,
}

impl Default for Acknowledgment {
    fn default() -> Self {
        Self {
            terms: DocumentModal::new(LegalDocument::Terms),
            privacy: DocumentModal::new(LegalDocument::Privacy),
            terms_read: false,
            privacy_read: false,
        }
    }
}

impl Acknowledgment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn modal(&self, document: LegalDocument) -> &DocumentModal {
        match document {
            LegalDocument::Terms => &self.terms,
            LegalDocument::Privacy => &self.privacy,
        }
    }

    fn modal_mut(&mut self, document: LegalDocument) -> &mut DocumentModal {
        match document {
            LegalDocument::Terms => &mut self.terms,
            LegalDocument::Privacy => &mut self.privacy,
        }
    }

    pub fn is_read(&self, document: LegalDocument) -> bool {
        match document {
            LegalDocument::Terms => self.terms_read,
            LegalDocument::Privacy => self.privacy_read,
        }
    }

    pub fn terms_read(&self) -> bool {
        self.terms_read
    }

    pub fn privacy_read(&self) -> bool {
        self.privacy_read
    }

    pub fn both_read(&self) -> bool {
        both_read(self.terms_read, self.privacy_read)
    }

    /// The first document whose modal is currently shown.
    pub fn open_document(&self) -> Option<LegalDocument> {
        LegalDocument::ALL
            .into_iter()
            .find(|doc| self.modal(*doc).is_open())
    }

    pub fn open(&mut self, document: LegalDocument) {
        debug!(document = %document, "Opening document modal");
        self.modal_mut(document).open();
    }

    pub fn close(&mut self, document: LegalDocument) {
        self.modal_mut(document).close();
    }

    pub fn scroll(&mut self, document: LegalDocument, metrics: ScrollMetrics) -> bool {
        self.modal_mut(document).scroll(metrics)
    }

    /// Accept a document. Only possible once its modal was scrolled to the
    /// bottom; closes the modal and records the read flag.
    pub fn accept(&mut self, document: LegalDocument) -> AcceptOutcome {
        let modal = self.modal_mut(document);
        if !modal.can_accept() {
            debug!(document = %document, "Accept ignored, document not read to the bottom");
            return AcceptOutcome {
                accepted: false,
                both_read: false,
            };
        }
        modal.close();

        match document {
            LegalDocument::Terms => self.terms_read = true,
            LegalDocument::Privacy => self.privacy_read = true,
        }

        let both_read = self.both_read();
        debug!(document = %document, both_read, "Document accepted");
        AcceptOutcome {
            accepted: true,
            both_read,
        }
    }
}

/// Consent is unlocked only when both documents were accepted.
pub fn both_read(terms_read: bool, privacy_read: bool) -> bool {
    terms_read && privacy_read
}
