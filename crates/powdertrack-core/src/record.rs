//! Canonical measurement records shared by every extractor and adapter.
//!
//! A [`PartialRecord`] is what one extraction strategy produces: a sparse
//! mapping from [`FieldKey`] to an already-unit-converted value. A
//! [`MergedRecord`] is the sealed output of a full extraction attempt and
//! guarantees that every retained value lies within its field's sanity
//! bounds — out-of-bound values are dropped, never clamped, so a present
//! field always means "plausible evidence was found".

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One canonical measurement name in the output schema.
///
/// The serialized names (`base_depth_cm`, …) are the contract with the
/// persistence/export consumers; depth and snowfall values are integral
/// centimeters, temperature is Celsius rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKey {
    BaseDepthCm,
    SummitDepthCm,
    NewSnow24hCm,
    NewSnow48hCm,
    NewSnow7dCm,
    LiftsOpen,
    LiftsTotal,
    RunsOpen,
    RunsTotal,
    TemperatureBaseC,
}

impl FieldKey {
    /// Every field in canonical output order (also the CSV column order).
    pub const ALL: [FieldKey; 10] = [
        FieldKey::BaseDepthCm,
        FieldKey::SummitDepthCm,
        FieldKey::NewSnow24hCm,
        FieldKey::NewSnow48hCm,
        FieldKey::NewSnow7dCm,
        FieldKey::LiftsOpen,
        FieldKey::LiftsTotal,
        FieldKey::RunsOpen,
        FieldKey::RunsTotal,
        FieldKey::TemperatureBaseC,
    ];

    /// The canonical snake_case name, matching the serde representation.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            FieldKey::BaseDepthCm => "base_depth_cm",
            FieldKey::SummitDepthCm => "summit_depth_cm",
            FieldKey::NewSnow24hCm => "new_snow_24h_cm",
            FieldKey::NewSnow48hCm => "new_snow_48h_cm",
            FieldKey::NewSnow7dCm => "new_snow_7d_cm",
            FieldKey::LiftsOpen => "lifts_open",
            FieldKey::LiftsTotal => "lifts_total",
            FieldKey::RunsOpen => "runs_open",
            FieldKey::RunsTotal => "runs_total",
            FieldKey::TemperatureBaseC => "temperature_base_c",
        }
    }

    /// Returns `true` if `value` lies within this field's sanity bounds.
    ///
    /// Depths must fall in [5, 1000] cm; snowfall windows in [0, 300] cm.
    /// Count and temperature fields carry no per-value bound here — count
    /// pairs are checked jointly in [`MergedRecord::from_partial`].
    #[must_use]
    pub fn within_bounds(self, value: f64) -> bool {
        match self {
            FieldKey::BaseDepthCm | FieldKey::SummitDepthCm => (5.0..=1000.0).contains(&value),
            FieldKey::NewSnow24hCm | FieldKey::NewSnow48hCm | FieldKey::NewSnow7dCm => {
                (0.0..=300.0).contains(&value)
            }
            FieldKey::LiftsOpen
            | FieldKey::LiftsTotal
            | FieldKey::RunsOpen
            | FieldKey::RunsTotal => value >= 0.0,
            FieldKey::TemperatureBaseC => true,
        }
    }

    /// For an open-count field, the total-count field it is paired with.
    #[must_use]
    pub fn paired_total(self) -> Option<FieldKey> {
        match self {
            FieldKey::LiftsOpen => Some(FieldKey::LiftsTotal),
            FieldKey::RunsOpen => Some(FieldKey::RunsTotal),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Sparse field mapping produced by one extraction strategy.
///
/// A present key always carries a value that already passed that strategy's
/// own unit conversion; strategies never insert raw, unconverted numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialRecord(BTreeMap<FieldKey, f64>);

impl PartialRecord {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<f64> {
        self.0.get(&key).copied()
    }

    #[must_use]
    pub fn contains(&self, key: FieldKey) -> bool {
        self.0.contains_key(&key)
    }

    /// Inserts `value` only when `key` is not already set.
    ///
    /// This is the first-wins rule: within a strategy it keeps the first
    /// match in document order, across strategies it keeps the earlier
    /// strategy's value. Returns `true` if the value was inserted.
    pub fn set_if_absent(&mut self, key: FieldKey, value: f64) -> bool {
        if self.0.contains_key(&key) {
            return false;
        }
        self.0.insert(key, value);
        true
    }

    /// Folds `other` into `self` under first-wins precedence.
    pub fn merge_absent(&mut self, other: &PartialRecord) {
        for (key, value) in &other.0 {
            self.set_if_absent(*key, *value);
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (FieldKey, f64)> + '_ {
        self.0.iter().map(|(k, v)| (*k, *v))
    }

    fn remove(&mut self, key: FieldKey) -> Option<f64> {
        self.0.remove(&key)
    }
}

/// The sealed result of one extraction attempt against one URL.
///
/// Built once by folding strategy outputs; never mutated afterward. A
/// second candidate URL produces a new `MergedRecord`, never an update to
/// the first. Invariant: every retained value passed its field's sanity
/// bound and count pairs are complete with `open <= total`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergedRecord {
    pub fields: PartialRecord,
    pub source_url: String,
    pub captured_at: DateTime<Utc>,
}

impl MergedRecord {
    /// Seals `partial` into a record, applying every field's sanity bound
    /// and the count-pair consistency rule.
    ///
    /// Out-of-bound values are silently dropped (never clamped — a clamped
    /// value would misrepresent confidence). An open count surviving
    /// without its total, or exceeding it, drops the whole pair.
    #[must_use]
    pub fn from_partial(mut partial: PartialRecord, source_url: &str) -> Self {
        let out_of_bounds: Vec<FieldKey> = partial
            .iter()
            .filter(|(key, value)| !key.within_bounds(*value))
            .map(|(key, _)| key)
            .collect();
        for key in out_of_bounds {
            partial.remove(key);
        }

        for (open_key, total_key) in [
            (FieldKey::LiftsOpen, FieldKey::LiftsTotal),
            (FieldKey::RunsOpen, FieldKey::RunsTotal),
        ] {
            let consistent = match (partial.get(open_key), partial.get(total_key)) {
                (Some(open), Some(total)) => open <= total,
                (None, None) => true,
                _ => false,
            };
            if !consistent {
                partial.remove(open_key);
                partial.remove(total_key);
            }
        }

        Self {
            fields: partial,
            source_url: source_url.to_owned(),
            captured_at: Utc::now(),
        }
    }

    /// Minimal record for an exhausted extraction: URL and timestamp only.
    ///
    /// Explicitly distinct from "all fields zero" — absence means no
    /// plausible evidence, not a zero measurement.
    #[must_use]
    pub fn empty(source_url: &str) -> Self {
        Self::from_partial(PartialRecord::new(), source_url)
    }

    #[must_use]
    pub fn get(&self, key: FieldKey) -> Option<f64> {
        self.fields.get(key)
    }

    /// The minimum-field-presence test deciding whether this extraction
    /// attempt was sufficient to stop trying further candidate URLs.
    #[must_use]
    pub fn has_meaningful_data(&self) -> bool {
        [
            FieldKey::BaseDepthCm,
            FieldKey::SummitDepthCm,
            FieldKey::NewSnow24hCm,
            FieldKey::LiftsOpen,
            FieldKey::RunsOpen,
        ]
        .iter()
        .any(|key| self.fields.contains(*key))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_if_absent_keeps_first_value() {
        let mut partial = PartialRecord::new();
        assert!(partial.set_if_absent(FieldKey::BaseDepthCm, 50.0));
        assert!(!partial.set_if_absent(FieldKey::BaseDepthCm, 99.0));
        assert_eq!(partial.get(FieldKey::BaseDepthCm), Some(50.0));
    }

    #[test]
    fn merge_absent_does_not_overwrite() {
        let mut first = PartialRecord::new();
        first.set_if_absent(FieldKey::BaseDepthCm, 50.0);

        let mut second = PartialRecord::new();
        second.set_if_absent(FieldKey::BaseDepthCm, 80.0);
        second.set_if_absent(FieldKey::SummitDepthCm, 120.0);

        first.merge_absent(&second);
        assert_eq!(first.get(FieldKey::BaseDepthCm), Some(50.0));
        assert_eq!(first.get(FieldKey::SummitDepthCm), Some(120.0));
    }

    #[test]
    fn seal_drops_out_of_bound_depth_instead_of_clamping() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::BaseDepthCm, 4000.0);
        partial.set_if_absent(FieldKey::SummitDepthCm, 150.0);

        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert_eq!(record.get(FieldKey::BaseDepthCm), None);
        assert_eq!(record.get(FieldKey::SummitDepthCm), Some(150.0));
    }

    #[test]
    fn seal_drops_snowfall_above_window_bound() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::NewSnow24hCm, 400.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert!(record.fields.is_empty());
    }

    #[test]
    fn seal_drops_incomplete_count_pair() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::LiftsOpen, 5.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert_eq!(record.get(FieldKey::LiftsOpen), None);
    }

    #[test]
    fn seal_drops_pair_when_open_exceeds_total() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::RunsOpen, 15.0);
        partial.set_if_absent(FieldKey::RunsTotal, 10.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert_eq!(record.get(FieldKey::RunsOpen), None);
        assert_eq!(record.get(FieldKey::RunsTotal), None);
    }

    #[test]
    fn seal_keeps_consistent_pair() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::LiftsOpen, 5.0);
        partial.set_if_absent(FieldKey::LiftsTotal, 10.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert_eq!(record.get(FieldKey::LiftsOpen), Some(5.0));
        assert_eq!(record.get(FieldKey::LiftsTotal), Some(10.0));
    }

    #[test]
    fn empty_record_is_not_meaningful() {
        let record = MergedRecord::empty("https://example.com/snow");
        assert!(!record.has_meaningful_data());
        assert_eq!(record.source_url, "https://example.com/snow");
    }

    #[test]
    fn runs_open_alone_is_meaningful() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::RunsOpen, 12.0);
        partial.set_if_absent(FieldKey::RunsTotal, 20.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert!(record.has_meaningful_data());
    }

    #[test]
    fn new_snow_7d_alone_is_not_meaningful() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::NewSnow7dCm, 40.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        assert!(!record.has_meaningful_data());
    }

    #[test]
    fn field_key_serializes_to_canonical_name() {
        let json = serde_json::to_string(&FieldKey::BaseDepthCm).unwrap();
        assert_eq!(json, "\"base_depth_cm\"");
        assert_eq!(FieldKey::NewSnow24hCm.name(), "new_snow_24h_cm");
    }

    #[test]
    fn fields_map_serializes_with_string_keys() {
        let mut partial = PartialRecord::new();
        partial.set_if_absent(FieldKey::BaseDepthCm, 106.0);
        let record = MergedRecord::from_partial(partial, "https://example.com");
        let value = serde_json::to_value(&record).unwrap();
        assert_eq!(value["fields"]["base_depth_cm"], 106.0);
        assert_eq!(value["source_url"], "https://example.com");
    }
}
