use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// One resort entry from `resorts.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResortConfig {
    pub name: String,
    pub country: String,
    pub region: String,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub base_elevation_m: Option<u32>,
    pub summit_elevation_m: Option<u32>,
    pub vertical_drop_m: Option<u32>,
    pub website_url: Option<String>,
    pub snow_report_url: Option<String>,
    /// Resort-family tag for specialized extraction (e.g. `"vail-resorts"`).
    /// Unset resorts use the generic extractor.
    pub family: Option<String>,
    /// OnTheSnow URL slug (e.g. `"colorado/vail"`), when the resort is
    /// listed on that platform.
    pub onthesnow_slug: Option<String>,
}

impl ResortConfig {
    /// Generate a URL-safe slug from the resort name.
    #[must_use]
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| {
                if c.is_ascii_alphanumeric() || c == '-' {
                    c
                } else if c == ' ' {
                    '-'
                } else {
                    '\0'
                }
            })
            .filter(|&c| c != '\0')
            .collect::<String>()
            .split('-')
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join("-")
    }

    /// Candidate URLs in extraction order: the dedicated snow-report page
    /// first (most likely to carry conditions), then the general website.
    #[must_use]
    pub fn candidate_urls(&self) -> Vec<&str> {
        let mut urls = Vec::new();
        if let Some(url) = self.snow_report_url.as_deref() {
            urls.push(url);
        }
        if let Some(url) = self.website_url.as_deref() {
            urls.push(url);
        }
        urls
    }

    #[must_use]
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) => Some((lat, lon)),
            _ => None,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct ResortsFile {
    pub resorts: Vec<ResortConfig>,
}

/// Load and validate the resort registry from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_resorts(path: &Path) -> Result<ResortsFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ResortsFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    let resorts_file: ResortsFile = serde_yaml::from_str(&content)?;

    validate_resorts(&resorts_file)?;

    Ok(resorts_file)
}

fn validate_resorts(resorts_file: &ResortsFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();
    let mut seen_slugs = HashSet::new();

    for resort in &resorts_file.resorts {
        if resort.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "resort name must be non-empty".to_string(),
            ));
        }

        if resort.candidate_urls().is_empty() {
            return Err(ConfigError::Validation(format!(
                "resort '{}' has neither a snow_report_url nor a website_url",
                resort.name
            )));
        }

        if let Some(lat) = resort.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::Validation(format!(
                    "resort '{}' has invalid latitude {lat}",
                    resort.name
                )));
            }
        }
        if let Some(lon) = resort.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ConfigError::Validation(format!(
                    "resort '{}' has invalid longitude {lon}",
                    resort.name
                )));
            }
        }

        let lower_name = resort.name.to_lowercase();
        if !seen_names.insert(lower_name) {
            return Err(ConfigError::Validation(format!(
                "duplicate resort name: '{}'",
                resort.name
            )));
        }

        let slug = resort.slug();
        if !seen_slugs.insert(slug.clone()) {
            return Err(ConfigError::Validation(format!(
                "duplicate resort slug: '{}' (from resort '{}')",
                slug, resort.name
            )));
        }
    }

    Ok(())
}
