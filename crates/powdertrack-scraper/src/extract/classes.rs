//! Strategy 3: class-heuristic containers.
//!
//! Two passes over class/id-matched container elements. The first looks
//! for depth measurements inside snow/depth/powder/condition containers,
//! classifying base vs summit from the surrounding text. The second looks
//! for open/total ratios inside lift/terrain/trail containers.

use powdertrack_core::{FieldKey, PartialRecord};
use regex::Regex;

use crate::document::Document;
use crate::units::{to_cm, LengthUnit};

pub(crate) fn extract_classes(doc: &Document) -> PartialRecord {
    let mut out = PartialRecord::new();
    extract_depths(doc, &mut out);
    extract_ratios(doc, &mut out);
    out
}

fn extract_depths(doc: &Document, out: &mut PartialRecord) {
    let container = Regex::new("(?i)snow|depth|powder|condition").expect("valid regex");
    let measure = Regex::new(r#"(\d+)\s*(in|inch|"|cm)"#).expect("valid regex");

    for element in doc.class_elements(&container) {
        // Prefer a dedicated value sub-element; fall back to the whole
        // container text. The label and parent give classification context.
        let value_text = element
            .value
            .clone()
            .unwrap_or_else(|| element.text.clone())
            .to_lowercase();
        let context = format!(
            "{} {} {}",
            element.label.as_deref().unwrap_or(""),
            element.text,
            element.parent_text
        )
        .to_lowercase();

        let Some(caps) = measure.captures(&value_text) else {
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

        if context.contains("base") || context.contains("lower") || context.contains("bottom") {
            out.set_if_absent(FieldKey::BaseDepthCm, value);
        } else if context.contains("summit")
            || context.contains("top")
            || context.contains("upper")
            || context.contains("peak")
        {
            out.set_if_absent(FieldKey::SummitDepthCm, value);
        }
    }
}

fn extract_ratios(doc: &Document, out: &mut PartialRecord) {
    let container = Regex::new("(?i)lift|terrain|trail|run").expect("valid regex");
    let ratio = Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid regex");

    for element in doc.class_elements(&container) {
        let context = format!("{} {}", element.text, element.parent_text).to_lowercase();
        let Some(caps) = ratio.captures(&element.text) else {
            continue;
        };
        let (Ok(open), Ok(total)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            continue;
        };
        if open > total {
            continue;
        }

        // Both halves of a pair come from the same match or neither lands.
        if context.contains("lift") || context.contains("chair") {
            if !out.contains(FieldKey::LiftsOpen) && !out.contains(FieldKey::LiftsTotal) {
                out.set_if_absent(FieldKey::LiftsOpen, open);
                out.set_if_absent(FieldKey::LiftsTotal, total);
            }
        } else if context.contains("trail")
            || context.contains("run")
            || context.contains("piste")
        {
            if !out.contains(FieldKey::RunsOpen) && !out.contains(FieldKey::RunsTotal) {
                out.set_if_absent(FieldKey::RunsOpen, open);
                out.set_if_absent(FieldKey::RunsTotal, total);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(body: &str) -> Document {
        Document::parse(body, "https://example.com").unwrap()
    }

    #[test]
    fn base_depth_from_labeled_stat_container() {
        let d = doc(
            r#"<html><body>
                <div class="snow-stat">
                    <span class="stat-label">Base</span>
                    <span class="stat-value">42"</span>
                </div>
            </body></html>"#,
        );
        let out = extract_classes(&d);
        assert_eq!(out.get(FieldKey::BaseDepthCm), Some(106.0));
    }

    #[test]
    fn summit_depth_classified_from_parent_context() {
        let d = doc(
            r#"<html><body>
                <div class="conditions">Summit <span class="depth">61in</span></div>
            </body></html>"#,
        );
        let out = extract_classes(&d);
        assert_eq!(out.get(FieldKey::SummitDepthCm), Some(154.0));
    }

    #[test]
    fn centimeter_values_pass_through_unconverted() {
        let d = doc(
            r#"<html><body><div class="snowDepth">Base: 120cm</div></body></html>"#,
        );
        let out = extract_classes(&d);
        assert_eq!(out.get(FieldKey::BaseDepthCm), Some(120.0));
    }

    #[test]
    fn lift_ratio_lands_as_complete_pair() {
        let d = doc(
            r#"<html><body><div class="lift-status">Lifts: 5/10 open</div></body></html>"#,
        );
        let out = extract_classes(&d);
        assert_eq!(out.get(FieldKey::LiftsOpen), Some(5.0));
        assert_eq!(out.get(FieldKey::LiftsTotal), Some(10.0));
    }

    #[test]
    fn inverted_ratio_is_rejected_whole() {
        let d = doc(
            r#"<html><body><div class="trail-report">Runs: 25/10 open</div></body></html>"#,
        );
        let out = extract_classes(&d);
        assert!(out.is_empty());
    }

    #[test]
    fn depth_without_base_or_summit_context_is_skipped() {
        let d = doc(
            r#"<html><body><div class="snowfall">Season total: 300in</div></body></html>"#,
        );
        let out = extract_classes(&d);
        assert!(out.is_empty());
    }
}
