//! The strategy cascade: four independent extraction strategies applied in
//! fixed order against one [`Document`], merged under first-strategy-wins
//! per field.
//!
//! Order matters: structured data is the most trustworthy signal, then
//! page metadata, then class-heuristic containers, then full-text pattern
//! scanning as the last resort. A field resolved by an earlier strategy is
//! never overwritten by a later one.

pub(crate) mod classes;
pub(crate) mod family;
pub(crate) mod fulltext;
pub(crate) mod meta;
pub(crate) mod structured;

use powdertrack_core::{MergedRecord, PartialRecord};

use crate::document::Document;

/// Runs the full generic strategy cascade against one document.
///
/// Sealing through [`MergedRecord::from_partial`] re-applies every sanity
/// bound and the count-pair invariant; out-of-bound fields are dropped,
/// never clamped.
#[must_use]
pub fn extract_generic(doc: &Document, url: &str) -> MergedRecord {
    let mut merged = PartialRecord::new();

    merged.merge_absent(&structured::extract_structured(doc));
    merged.merge_absent(&meta::extract_meta(doc));
    merged.merge_absent(&classes::extract_classes(doc));
    merged.merge_absent(&fulltext::extract_fulltext(doc, &merged));

    MergedRecord::from_partial(merged, url)
}

#[cfg(test)]
mod tests {
    use powdertrack_core::FieldKey;

    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(body, "https://example.com/snow").unwrap()
    }

    #[test]
    fn scenario_full_us_style_report() {
        let d = doc(
            "<html><body>Base Depth: 42in, Summit: 61in, 24hr Snowfall: 8in, \
             5/10 lifts open</body></html>",
        );
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::BaseDepthCm), Some(106.0));
        assert_eq!(record.get(FieldKey::SummitDepthCm), Some(154.0));
        assert_eq!(record.get(FieldKey::NewSnow24hCm), Some(20.0));
        assert_eq!(record.get(FieldKey::LiftsOpen), Some(5.0));
        assert_eq!(record.get(FieldKey::LiftsTotal), Some(10.0));
        assert_eq!(record.get(FieldKey::RunsOpen), None);
    }

    #[test]
    fn scenario_out_of_bound_snowfall_is_dropped_not_clamped() {
        let d = doc("<html><body>Base: 50cm  New snow 24h: 400cm</body></html>");
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::BaseDepthCm), Some(50.0));
        assert_eq!(record.get(FieldKey::NewSnow24hCm), None);
        assert_eq!(record.fields.len(), 1);
    }

    #[test]
    fn scenario_absurd_base_depth_never_appears() {
        let d = doc("<html><body>base: 4000cm</body></html>");
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::BaseDepthCm), None);
    }

    #[test]
    fn meta_tag_value_beats_full_text_value() {
        // Meta strategy (second) resolves base depth before the full-text
        // strategy (fourth) ever sees the field.
        let d = doc(
            r#"<html><head>
                <meta name="description" content="snow base 40in today">
            </head><body>Base: 30cm and climbing</body></html>"#,
        );
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::BaseDepthCm), Some(101.0)); // 40in -> 101cm
    }

    #[test]
    fn structured_data_beats_everything_for_24h_snow() {
        let d = doc(
            r#"<html><head>
                <meta name="snow" content="new snow 4in">
            </head><body><span data-snow="12">fresh</span> overnight: 6</body></html>"#,
        );
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::NewSnow24hCm), Some(12.0));
    }

    #[test]
    fn extraction_is_idempotent_for_one_document() {
        let d = doc(
            "<html><body>Base Depth: 42in, Summit: 61in, 3/7 chairs spinning, \
             Trail status: 12/20 runs open</body></html>",
        );
        let first = extract_generic(&d, "https://example.com/snow");
        let second = extract_generic(&d, "https://example.com/snow");
        assert_eq!(first.fields, second.fields);
        assert_eq!(first.source_url, second.source_url);
    }

    #[test]
    fn unrecognizable_content_yields_empty_fields() {
        let d = doc("<html><body>Book your summer mountain-bike pass now!</body></html>");
        let record = extract_generic(&d, "https://example.com/snow");
        assert!(record.fields.is_empty());
        assert!(!record.has_meaningful_data());
    }

    #[test]
    fn run_ratio_alone_is_extracted() {
        let d = doc("<html><body>Trail status: 12/20 runs open</body></html>");
        let record = extract_generic(&d, "https://example.com/snow");
        assert_eq!(record.get(FieldKey::RunsOpen), Some(12.0));
        assert_eq!(record.get(FieldKey::RunsTotal), Some(20.0));
        assert!(record.has_meaningful_data());
    }
}
