//! Maps a resort's registry entry to the extraction routine used for its
//! pages.

use powdertrack_core::{MergedRecord, ResortConfig};

use crate::document::Document;
use crate::extract::{self, family};

/// Resort groups sharing a page template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResortFamily {
    VailResorts,
}

impl ResortFamily {
    /// Parses a registry `family` tag. Unknown tags return `None` and the
    /// resort falls back to the generic cascade.
    #[must_use]
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "vail-resorts" => Some(ResortFamily::VailResorts),
            _ => None,
        }
    }
}

/// Extraction routine selected for one resort.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Extractor {
    /// The four-strategy generic cascade.
    Generic,
    /// A family template scan with generic fallback.
    Family(ResortFamily),
}

impl Extractor {
    /// Selects the extractor for `resort` from its registry family tag.
    #[must_use]
    pub fn for_resort(resort: &ResortConfig) -> Self {
        match resort.family.as_deref() {
            None => Extractor::Generic,
            Some(tag) => match ResortFamily::from_tag(tag) {
                Some(family) => Extractor::Family(family),
                None => {
                    tracing::warn!(
                        resort = %resort.name,
                        family = tag,
                        "unknown resort family tag, using generic extractor"
                    );
                    Extractor::Generic
                }
            },
        }
    }

    /// Runs the selected routine against one parsed page.
    #[must_use]
    pub fn extract(&self, doc: &Document, url: &str) -> MergedRecord {
        match self {
            Extractor::Generic => extract::extract_generic(doc, url),
            Extractor::Family(ResortFamily::VailResorts) => family::extract_vail(doc, url),
        }
    }
}
