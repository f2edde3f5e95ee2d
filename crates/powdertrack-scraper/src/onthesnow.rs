//! Adapter for OnTheSnow ski-report pages.
//!
//! OnTheSnow aggregates condition reports under a stable markup scheme, so
//! resorts carrying an `onthesnow_slug` in the registry can be read from
//! `https://www.onthesnow.com/{slug}/skireport` instead of their own site.
//! Depth and snowfall stats are published in inches.

use powdertrack_core::{FieldKey, MergedRecord, PartialRecord};
use regex::Regex;

use crate::document::Document;
use crate::error::ScrapeError;
use crate::fetch::PageClient;
use crate::units::{to_cm, LengthUnit};

pub const BASE_URL: &str = "https://www.onthesnow.com";

/// Fetches and parses one resort's OnTheSnow ski report.
///
/// `base_url` is normally [`BASE_URL`]; tests point it at a local server.
///
/// # Errors
///
/// Returns the underlying [`ScrapeError`] when the page cannot be fetched
/// or parsed at all. An intact page with no recognizable stats yields an
/// empty record, not an error.
pub async fn fetch_ski_report(
    client: &PageClient,
    base_url: &str,
    slug: &str,
) -> Result<MergedRecord, ScrapeError> {
    let url = format!("{}/{}/skireport", base_url.trim_end_matches('/'), slug);
    let doc = client.fetch_page(&url).await?;
    Ok(parse_ski_report(&doc, &url))
}

fn parse_ski_report(doc: &Document, url: &str) -> MergedRecord {
    let mut out = PartialRecord::new();

    let snow_stat = Regex::new("snow-report__stat").expect("valid regex");
    let inches = Regex::new(r#"(\d+)\s*""#).expect("valid regex");
    for element in doc.class_elements(&snow_stat) {
        let (Some(label), Some(value)) = (element.label.as_deref(), element.value.as_deref())
        else {
            continue;
        };
        let Some(caps) = inches.captures(value) else {
            continue;
        };
        let Ok(raw) = caps[1].parse::<f64>() else {
            continue;
        };
        let cm = to_cm(raw, LengthUnit::Inches) as f64;

        let label = label.to_lowercase();
        if label.contains("base") && label.contains("depth") {
            out.set_if_absent(FieldKey::BaseDepthCm, cm);
        } else if label.contains("summit") || label.contains("top") {
            out.set_if_absent(FieldKey::SummitDepthCm, cm);
        } else if label.contains("24") || label.contains("overnight") {
            out.set_if_absent(FieldKey::NewSnow24hCm, cm);
        } else if label.contains("48") {
            out.set_if_absent(FieldKey::NewSnow48hCm, cm);
        } else if label.contains("7") || label.contains("week") {
            out.set_if_absent(FieldKey::NewSnow7dCm, cm);
        }
    }

    let terrain_stat = Regex::new("terrain-stats__stat").expect("valid regex");
    let ratio = Regex::new(r"(\d+)\s*/\s*(\d+)").expect("valid regex");
    for element in doc.class_elements(&terrain_stat) {
        let Some(caps) = ratio.captures(&element.text) else {
            continue;
        };
        let (Ok(open), Ok(total)) = (caps[1].parse::<f64>(), caps[2].parse::<f64>()) else {
            continue;
        };
        let context = element.text.to_lowercase();
        if context.contains("lift") {
            out.set_if_absent(FieldKey::LiftsOpen, open);
            out.set_if_absent(FieldKey::LiftsTotal, total);
        } else if context.contains("trail") || context.contains("run") {
            out.set_if_absent(FieldKey::RunsOpen, open);
            out.set_if_absent(FieldKey::RunsTotal, total);
        }
    }

    MergedRecord::from_partial(out, url)
}
