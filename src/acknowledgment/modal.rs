//! Scroll-gated document modal.

use serde::{Deserialize, Serialize};

use super::document::LegalDocument;

/// Distance from the end of the content that still counts as "read to the
/// bottom".
pub const SCROLL_BOTTOM_THRESHOLD: f64 = 20.0;

/// Scroll position reported by the modal's content pane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn is_at_bottom(&self) -> bool {
        self.scroll_height - self.scroll_top <= self.client_height + SCROLL_BOTTOM_THRESHOLD
    }
}

/// One document's modal: visibility plus whether the reader has reached the
/// end since it was last opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentModal {
    document: LegalDocument,
    open: bool,
    scrolled_to_bottom: bool,
}

impl DocumentModal {
    pub fn new(document: LegalDocument) -> Self {
        Self {
            document,
            open: false,
            scrolled_to_bottom: false,
        }
    }

    pub fn document(&self) -> LegalDocument {
        self.document
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn scrolled_to_bottom(&self) -> bool {
        self.scrolled_to_bottom
    }

    /// Show the modal. Every open starts unread.
    pub fn open(&mut self) {
        self.open = true;
        self.scrolled_to_bottom = false;
    }

    pub fn close(&mut self) {
        self.open = false;
    }

    /// Record a scroll event. Returns whether the bottom has been reached.
    pub fn scroll(&mut self, metrics: ScrollMetrics) -> bool {
        if self.open && metrics.is_at_bottom() {
            self.scrolled_to_bottom = true;
        }
        self.scrolled_to_bottom
    }

    /// Whether the accept button is enabled.
    pub fn can_accept(&self) -> bool {
        self.open && self.scrolled_to_bottom
    }

    /// Footer hint under the document text.
    pub fn footer_hint(&self) -> &'static str {
        if self.scrolled_to_bottom {
            "最後まで読みました。以下のボタンで同意できます。"
        } else {
            "同意するには最後までお読みください。"
        }
    }
}
