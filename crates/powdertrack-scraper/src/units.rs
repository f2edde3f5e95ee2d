//! Unit normalization and the shared numeric-extraction primitives.
//!
//! Every strategy parses numbers through [`first_number`] / [`first_decimal`]
//! and converts through [`to_cm`] / [`to_celsius`] — no strategy hand-rolls
//! digit scanning or conversion arithmetic.

/// Length unit of a raw matched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LengthUnit {
    Inches,
    Centimeters,
}

/// Temperature unit of a raw matched value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Fahrenheit,
    Celsius,
}

/// Converts a length to integer centimeters.
///
/// Inches multiply by 2.54 and truncate (`floor` for the non-negative
/// values that reach this function); centimeter values pass through
/// unchanged, already integer-rounded by the caller.
#[must_use]
pub fn to_cm(value: f64, unit: LengthUnit) -> i64 {
    match unit {
        #[allow(clippy::cast_possible_truncation)]
        LengthUnit::Inches => (value * 2.54).floor() as i64,
        #[allow(clippy::cast_possible_truncation)]
        LengthUnit::Centimeters => value as i64,
    }
}

/// Converts a temperature to Celsius, rounded to one decimal place.
#[must_use]
pub fn to_celsius(value: f64, unit: TempUnit) -> f64 {
    match unit {
        TempUnit::Fahrenheit => ((value - 32.0) * 5.0 / 9.0 * 10.0).round() / 10.0,
        TempUnit::Celsius => value,
    }
}

/// Extracts the first contiguous run of digits from `text`, after
/// stripping thousands-separator commas. Returns `None` when the text
/// contains no digits.
#[must_use]
pub fn first_number(text: &str) -> Option<i64> {
    let cleaned = text.replace(',', "");
    let bytes = cleaned.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let end = bytes[start..]
        .iter()
        .position(|b| !b.is_ascii_digit())
        .map_or(cleaned.len(), |offset| start + offset);
    cleaned[start..end].parse::<i64>().ok()
}

/// Extracts the first number from `text`, allowing a single decimal point.
#[must_use]
pub fn first_decimal(text: &str) -> Option<f64> {
    let cleaned = text.replace(',', "");
    let bytes = cleaned.as_bytes();
    let start = bytes.iter().position(u8::is_ascii_digit)?;
    let mut end = start;
    let mut seen_dot = false;
    while end < bytes.len() {
        let b = bytes[end];
        if b.is_ascii_digit() {
            end += 1;
        } else if b == b'.' && !seen_dot && end + 1 < bytes.len() && bytes[end + 1].is_ascii_digit()
        {
            seen_dot = true;
            end += 1;
        } else {
            break;
        }
    }
    cleaned[start..end].parse::<f64>().ok()
}
