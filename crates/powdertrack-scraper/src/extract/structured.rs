//! Strategy 1: structured data.
//!
//! Reads JSON-LD blocks (logged for observability; resort pages rarely
//! carry measurement data in them) and elements with a `data-snow`
//! attribute, whose value is taken as fresh snowfall in centimeters.

use powdertrack_core::{FieldKey, PartialRecord};

use crate::document::Document;
use crate::units::first_number;

pub(crate) fn extract_structured(doc: &Document) -> PartialRecord {
    let mut out = PartialRecord::new();

    for block in doc.jsonld_blocks() {
        let block_type = block
            .get("@type")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown");
        tracing::debug!(block_type, "found JSON-LD block");
    }

    for element in doc.attr_elements("data-snow") {
        if let Some(value) = first_number(&element.value) {
            if value > 0 {
                out.set_if_absent(FieldKey::NewSnow24hCm, value as f64);
                break;
            }
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(body, "https://example.com").unwrap()
    }

    #[test]
    fn data_snow_attribute_maps_to_fresh_snowfall() {
        let d = doc(r#"<html><body><span data-snow="15">fresh</span></body></html>"#);
        let out = extract_structured(&d);
        assert_eq!(out.get(FieldKey::NewSnow24hCm), Some(15.0));
    }

    #[test]
    fn zero_and_non_numeric_values_are_skipped() {
        let d = doc(
            r#"<html><body>
                <span data-snow="0">none</span>
                <span data-snow="lots">vague</span>
            </body></html>"#,
        );
        let out = extract_structured(&d);
        assert!(out.is_empty());
    }

    #[test]
    fn first_usable_attribute_wins() {
        let d = doc(
            r#"<html><body>
                <span data-snow="8">today</span>
                <span data-snow="30">this week</span>
            </body></html>"#,
        );
        let out = extract_structured(&d);
        assert_eq!(out.get(FieldKey::NewSnow24hCm), Some(8.0));
    }
}
