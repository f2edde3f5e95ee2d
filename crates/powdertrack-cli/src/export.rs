//! Snapshot export: one JSON and one CSV file per collection run.
//!
//! The CSV is hand-formatted with a deterministic shape: one row per
//! resort in slug order, canonical field columns, empty cells where a
//! field was not extracted. None of the emitted values can contain a
//! comma, so no quoting is needed.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use powdertrack_core::FieldKey;
use powdertrack_scraper::ResortReport;

/// Writes `snow_data_<date>.json` and `.csv` under `dir`, creating the
/// directory if needed. Returns the two paths written.
///
/// # Errors
///
/// Returns an error when the directory cannot be created or either file
/// cannot be written.
pub fn write_snapshots(
    dir: &Path,
    reports: &BTreeMap<String, ResortReport>,
) -> anyhow::Result<(PathBuf, PathBuf)> {
    fs::create_dir_all(dir)?;
    let date = Utc::now().format("%Y-%m-%d");

    let json_path = dir.join(format!("snow_data_{date}.json"));
    fs::write(&json_path, serde_json::to_string_pretty(reports)?)?;

    let csv_path = dir.join(format!("snow_data_{date}.csv"));
    fs::write(&csv_path, to_csv(reports))?;

    Ok((json_path, csv_path))
}

fn to_csv(reports: &BTreeMap<String, ResortReport>) -> String {
    let mut out = String::from("resort,outcome,captured_at,source_url");
    for key in FieldKey::ALL {
        out.push(',');
        out.push_str(key.name());
    }
    out.push('\n');

    for (slug, report) in reports {
        out.push_str(slug);
        out.push(',');
        out.push_str(match report.outcome {
            powdertrack_scraper::ScrapeOutcome::Succeeded => "succeeded",
            powdertrack_scraper::ScrapeOutcome::Exhausted => "exhausted",
        });
        out.push(',');
        out.push_str(&report.record.captured_at.to_rfc3339());
        out.push(',');
        out.push_str(&report.record.source_url);
        for key in FieldKey::ALL {
            out.push(',');
            if let Some(value) = report.record.get(key) {
                out.push_str(&format_cell(value));
            }
        }
        out.push('\n');
    }

    out
}

/// Integral values print without a trailing `.0`; temperatures keep their
/// single decimal.
fn format_cell(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.0}")
    } else {
        format!("{value}")
    }
}

#[cfg(test)]
mod tests {
    use powdertrack_core::{MergedRecord, PartialRecord};
    use powdertrack_scraper::ScrapeOutcome;

    use super::*;

    fn reports() -> BTreeMap<String, ResortReport> {
        let mut fields = PartialRecord::new();
        fields.set_if_absent(FieldKey::BaseDepthCm, 106.0);
        fields.set_if_absent(FieldKey::TemperatureBaseC, -3.9);
        let record = MergedRecord::from_partial(fields, "https://example.com/snow");

        let mut map = BTreeMap::new();
        map.insert(
            "vail".to_owned(),
            ResortReport {
                resort: "vail".to_owned(),
                outcome: ScrapeOutcome::Succeeded,
                record,
            },
        );
        map.insert(
            "stowe".to_owned(),
            ResortReport {
                resort: "stowe".to_owned(),
                outcome: ScrapeOutcome::Exhausted,
                record: MergedRecord::empty("https://stowe.example.com"),
            },
        );
        map
    }

    #[test]
    fn csv_header_follows_canonical_field_order() {
        let csv = to_csv(&reports());
        let header = csv.lines().next().unwrap();
        assert_eq!(
            header,
            "resort,outcome,captured_at,source_url,base_depth_cm,summit_depth_cm,\
             new_snow_24h_cm,new_snow_48h_cm,new_snow_7d_cm,lifts_open,lifts_total,\
             runs_open,runs_total,temperature_base_c"
        );
    }

    #[test]
    fn csv_rows_are_slug_sorted_with_empty_cells_for_absent_fields() {
        let csv = to_csv(&reports());
        let rows: Vec<&str> = csv.lines().skip(1).collect();
        assert_eq!(rows.len(), 2);
        assert!(rows[0].starts_with("stowe,exhausted,"));
        assert!(rows[1].starts_with("vail,succeeded,"));
        // 10 empty field cells on the exhausted row.
        assert!(rows[0].ends_with("https://stowe.example.com,,,,,,,,,,"));
        // Integral depth without ".0", temperature with its decimal.
        assert!(rows[1].contains(",106,"));
        assert!(rows[1].ends_with(",-3.9"));
    }

    #[test]
    fn snapshots_land_in_the_requested_directory() {
        let dir = tempfile::tempdir().unwrap();
        let (json_path, csv_path) = write_snapshots(dir.path(), &reports()).unwrap();
        assert!(json_path.exists());
        assert!(csv_path.exists());

        let parsed: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
        assert_eq!(parsed["vail"]["outcome"], "succeeded");
        assert_eq!(parsed["vail"]["record"]["fields"]["base_depth_cm"], 106.0);
    }
}
