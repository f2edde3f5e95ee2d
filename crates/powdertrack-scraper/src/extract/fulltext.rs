//! Strategy 4: full-text pattern scan, the last resort.
//!
//! Runs ordered pattern tables against the document's flattened text. Per
//! field, patterns are tried in order and the first in-bound match wins.
//! A match without a local unit marker falls back to the document-level
//! inch inference; an explicit `cm` in the matched text always overrides
//! that inference.

use powdertrack_core::{FieldKey, PartialRecord};
use regex::Regex;

use crate::document::Document;
use crate::units::{to_celsius, to_cm, LengthUnit, TempUnit};

pub(crate) fn extract_fulltext(doc: &Document, resolved: &PartialRecord) -> PartialRecord {
    let mut out = PartialRecord::new();
    let text = doc.text();
    let assume_inches = doc.prefix_suggests_inches();

    for (key, patterns) in measurement_patterns() {
        if resolved.contains(key) {
            continue;
        }
        'field: for pattern in &patterns {
            for caps in pattern.captures_iter(text) {
                let Ok(raw) = caps[1].parse::<f64>() else {
                    continue;
                };
                let matched = caps[0].to_lowercase();
                let has_inch = matched.contains("in") || matched.contains('"');
                let has_cm = matched.contains("cm");
                let unit = if has_inch || (assume_inches && !has_cm) {
                    LengthUnit::Inches
                } else {
                    LengthUnit::Centimeters
                };
                let value = to_cm(raw, unit) as f64;
                if !key.within_bounds(value) {
                    continue;
                }
                tracing::debug!(field = %key, value, "full-text match");
                out.set_if_absent(key, value);
                break 'field;
            }
        }
    }

    extract_ratio_pairs(text, resolved, &mut out);
    extract_temperature(text, resolved, &mut out);
    out
}

/// Ordered pattern tables per measurement field. Group 1 is always the
/// numeric value; everything else in the match is unit/context evidence.
fn measurement_patterns() -> Vec<(FieldKey, Vec<Regex>)> {
    let compile = |patterns: &[&str]| -> Vec<Regex> {
        patterns
            .iter()
            .map(|p| Regex::new(p).expect("valid regex"))
            .collect()
    };

    vec![
        (
            FieldKey::BaseDepthCm,
            compile(&[
                r#"(?i)base[:\s]+(\d+)\s*(?:in|inch|"|cm)"#,
                r#"(?i)(?:lower|bottom)[:\s]+(\d+)\s*(?:in|inch|"|cm)"#,
                r#"(?i)(\d+)\s*(?:in|inch|"|cm)[:\s]+base"#,
                r#"(?i)base\s+depth[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)snow\s+depth.*?base.*?(\d+)(?:\s*(?:in|inch|"|cm))?"#,
            ]),
        ),
        (
            FieldKey::SummitDepthCm,
            compile(&[
                r#"(?i)summit[:\s]+(\d+)\s*(?:in|inch|"|cm)"#,
                r#"(?i)(?:top|upper|peak)[:\s]+(\d+)\s*(?:in|inch|"|cm)"#,
                r#"(?i)(\d+)\s*(?:in|inch|"|cm)[:\s]+(?:summit|top)"#,
                r#"(?i)summit\s+depth[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
            ]),
        ),
        (
            FieldKey::NewSnow24hCm,
            compile(&[
                r#"(?i)(?:24|twenty.?four)\s*(?:hr|hour|h)(?:\s+snow(?:fall)?)?[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)overnight[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)last\s+24[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)new\s+snow[:\s]+(\d+)\s*(?:in|inch|"|cm)"#,
                r#"(?i)(?:24|twenty.?four)\s*(?:hr|hour|h).*?(\d+)\s*(?:in|inch|"|cm)"#,
            ]),
        ),
        (
            FieldKey::NewSnow48hCm,
            compile(&[
                r#"(?i)(?:48|forty.?eight)\s*(?:hr|hour|h)[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)(?:2|two)\s+day[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)last\s+48[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
            ]),
        ),
        (
            FieldKey::NewSnow7dCm,
            compile(&[
                r#"(?i)(?:7|seven)\s+day[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)last\s+week[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
                r#"(?i)week[:\s]+(\d+)(?:\s*(?:in|inch|"|cm))?"#,
            ]),
        ),
    ]
}

fn extract_ratio_pairs(text: &str, resolved: &PartialRecord, out: &mut PartialRecord) {
    let pairs = [
        (
            FieldKey::LiftsOpen,
            FieldKey::LiftsTotal,
            Regex::new(r"(?i)(\d+)\s*(?:of|/)\s*(\d+)\s+(?:lift|chair)").expect("valid regex"),
        ),
        (
            FieldKey::RunsOpen,
            FieldKey::RunsTotal,
            Regex::new(r"(?i)(\d+)\s*(?:of|/)\s*(\d+)\s+(?:trail|run|piste)").expect("valid regex"),
        ),
    ];

    for (open_key, total_key, pattern) in pairs {
        if resolved.contains(open_key) || resolved.contains(total_key) {
            continue;
        }
        for caps in pattern.captures_iter(text) {
            let (Ok(open), Ok(total)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
                continue;
            };
            if open > total {
                continue;
            }
            out.set_if_absent(open_key, open);
            out.set_if_absent(total_key, total);
            break;
        }
    }
}

fn extract_temperature(text: &str, resolved: &PartialRecord, out: &mut PartialRecord) {
    if resolved.contains(FieldKey::TemperatureBaseC) {
        return;
    }
    let patterns = [
        Regex::new(r"(-?\d+)\s*°?\s*[fF](?:ahrenheit)?\b").expect("valid regex"),
        Regex::new(r"(-?\d+)\s*°?\s*[cC](?:elsius)?\b").expect("valid regex"),
        Regex::new(r"[tT]emp(?:erature)?[:\s]+(-?\d+)").expect("valid regex"),
    ];

    for pattern in &patterns {
        if let Some(caps) = pattern.captures(text) {
            let Ok(raw) = caps[1].parse::<f64>() else {
                continue;
            };
            let matched = caps[0].to_lowercase();
            // An explicit unit letter always wins; only an unmarked value
            // falls back to the over-50-reads-as-Fahrenheit rule.
            let unit = if matched.contains('f') {
                TempUnit::Fahrenheit
            } else if matched.contains('c') {
                TempUnit::Celsius
            } else if raw > 50.0 {
                TempUnit::Fahrenheit
            } else {
                TempUnit::Celsius
            };
            out.set_if_absent(FieldKey::TemperatureBaseC, to_celsius(raw, unit));
            return;
        }
    }
}
