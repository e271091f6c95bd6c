//! Package metadata carried in application labels and version fields.
//!
//! Package installs annotate their applications with a version label and a
//! base64 encoded JSON blob describing the package, including its icons.
//! Everything here is best effort: absent or malformed input yields `None`.

use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use base64::Engine;
use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use svcwatch_types::AppRecord;
use tracing::debug;

use crate::config::LabelKeys;

/// Icon references at the three sizes a package provides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct ServiceImages {
    pub icon_small: String,
    pub icon_medium: String,
    pub icon_large: String,
}

/// Standard alphabet, padding optional on decode.
const METADATA_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Subset of the decoded package metadata we care about.
#[derive(Debug, Deserialize)]
struct PackageMetadata {
    images: ServiceImages,
}

/// Version of the installed package.
///
/// Prefers the package version label and falls back to the raw
/// application version.
pub fn service_version(app: &AppRecord, labels: &LabelKeys) -> Option<String> {
    app.label(&labels.package_version)
        .map(str::to_string)
        .or_else(|| app.version.clone())
}

/// When the application's current configuration was installed.
///
/// Returns an RFC 3339 UTC timestamp taken from the last configuration
/// change, or from the version when that is a timestamp. Timestamps without
/// an offset are read as UTC.
pub fn installed_time(app: &AppRecord) -> Option<String> {
    let config_change = app
        .version_info
        .as_ref()
        .and_then(|info| info.last_config_change_at.as_deref());

    config_change
        .into_iter()
        .chain(app.version.as_deref())
        .find_map(parse_timestamp)
        .map(|at| at.to_rfc3339_opts(SecondsFormat::Millis, true))
}

/// Parse an ISO 8601 timestamp into UTC.
///
/// Accepts RFC 3339, then a date-time without offset, then a bare date.
pub(crate) fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
        return Some(at.with_timezone(&Utc));
    }
    if let Ok(at) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(at.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|at| at.and_utc())
}

/// Decode the icon set from the package metadata label.
pub fn service_images(app: &AppRecord, labels: &LabelKeys) -> Option<ServiceImages> {
    let encoded = app.label(&labels.package_metadata)?;
    match decode_images(encoded) {
        Ok(images) => Some(images),
        Err(reason) => {
            debug!(app = %app.id, %reason, "Ignoring undecodable package metadata");
            None
        }
    }
}

fn decode_images(encoded: &str) -> Result<ServiceImages, String> {
    let compact: String = encoded
        .chars()
        .filter(|c| !c.is_ascii_whitespace())
        .collect();
    let bytes = METADATA_ENGINE
        .decode(compact)
        .map_err(|e| format!("base64: {}", e))?;
    let metadata: PackageMetadata =
        serde_json::from_slice(&bytes).map_err(|e| format!("json: {}", e))?;
    Ok(metadata.images)
}
