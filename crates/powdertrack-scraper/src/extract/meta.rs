//! Strategy 2: page metadata.
//!
//! Scans `<meta>` tags whose name/property or content mentions snow for a
//! `<number><unit>` token, then classifies it as base depth or fresh
//! snowfall from the surrounding words.

use powdertrack_core::{FieldKey, PartialRecord};
use regex::Regex;

use crate::document::Document;
use crate::units::{to_cm, LengthUnit};

pub(crate) fn extract_meta(doc: &Document) -> PartialRecord {
    let mut out = PartialRecord::new();
    let measure = Regex::new(r#"(\d+)\s*(in|inch|cm|")"#).expect("valid regex");

    for tag in doc.meta_tags() {
        if !(tag.name.contains("snow") || tag.content.to_lowercase().contains("snow")) {
            continue;
        }
        let content = tag.content.to_lowercase();
        let Some(caps) = measure.captures(&content) else {
            continue;
        };
        let Ok(raw) = caps[1].parse::<f64>() else {
            continue;
        };
        let unit = if caps[2].contains("in") || caps[2].contains('"') {
            LengthUnit::Inches
        } else {
            LengthUnit::Centimeters
        };
        let value = to_cm(raw, unit) as f64;

        if content.contains("base") {
            out.set_if_absent(FieldKey::BaseDepthCm, value);
        } else if content.contains("new") || content.contains("fresh") {
            out.set_if_absent(FieldKey::NewSnow24hCm, value);
        }
    }

    out
}
