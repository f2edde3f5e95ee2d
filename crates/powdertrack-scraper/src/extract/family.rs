//! Specialized extractor for the Vail Resorts page template.
//!
//! Vail-family sites share a markup scheme: depth values sit in containers
//! whose class matches `snow.*depth` or `depth.*value`, or carry a
//! `data-snow-depth` attribute, and are published in inches. The extractor
//! reads those first, then falls back to the generic cascade for whatever
//! the template scan left unresolved.

use powdertrack_core::{FieldKey, MergedRecord, PartialRecord};
use regex::Regex;

use super::extract_generic;
use crate::document::Document;
use crate::units::{first_number, to_cm, LengthUnit};

pub(crate) fn extract_vail(doc: &Document, url: &str) -> MergedRecord {
    let mut out = PartialRecord::new();

    let selectors = [
        Regex::new("(?i)snow.*depth").expect("valid regex"),
        Regex::new("(?i)depth.*value").expect("valid regex"),
    ];
    for pattern in &selectors {
        for element in doc.class_elements(pattern) {
            classify_depth(&element.text, &element.parent_text, &mut out);
        }
    }
    for element in doc.attr_elements("data-snow-depth") {
        let text = if element.value.trim().is_empty() {
            &element.text
        } else {
            &element.value
        };
        classify_depth(text, &element.parent_text, &mut out);
    }

    // Generic cascade fills anything the template scan missed.
    let generic = extract_generic(doc, url);
    out.merge_absent(&generic.fields);
    MergedRecord::from_partial(out, url)
}

/// Reads the first number out of `text` as inches and files it under base
/// or summit depth depending on the surrounding context.
fn classify_depth(text: &str, context: &str, out: &mut PartialRecord) {
    let Some(raw) = first_number(text) else {
        return;
    };
    let value = to_cm(raw as f64, LengthUnit::Inches) as f64;
    let context = format!("{text} {context}").to_lowercase();

    if context.contains("base") || context.contains("lower") {
        out.set_if_absent(FieldKey::BaseDepthCm, value);
    } else if context.contains("summit") || context.contains("top") || context.contains("upper") {
        out.set_if_absent(FieldKey::SummitDepthCm, value);
    }
}
