//! Reading and writing case files

use std::{fs, path::Path};

use anyhow::{Context, Result};
use dauc_core::UcCase;
use tracing::debug;

use crate::format::CaseFormat;

/// Load a case from `.json` or `.toml`.
///
/// Only parsing happens here; structural checks are left to
/// [`crate::ValidationReport`] or [`UcCase::validate`].
pub fn load_case(path: impl AsRef<Path>) -> Result<UcCase> {
    let path = path.as_ref();
    let format = CaseFormat::from_path(path)?;
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading case file '{}'", path.display()))?;
    let case = parse_case(&text, format)
        .with_context(|| format!("parsing {} '{}'", format.friendly_name(), path.display()))?;
    debug!(
        case = %case.name,
        hours = case.hours,
        generators = case.generators.len(),
        buses = case.buses.len(),
        lines = case.lines.len(),
        "loaded case"
    );
    Ok(case)
}

pub fn parse_case(text: &str, format: CaseFormat) -> Result<UcCase> {
    let case = match format {
        CaseFormat::Json => serde_json::from_str(text)?,
        CaseFormat::Toml => toml::from_str(text)?,
    };
    Ok(case)
}

/// Write `case` in the format implied by the extension of `path`.
pub fn save_case(case: &UcCase, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let text = match CaseFormat::from_path(path)? {
        CaseFormat::Json => {
            serde_json::to_string_pretty(case).context("serializing case to JSON")?
        }
        CaseFormat::Toml => toml::to_string_pretty(case).context("serializing case to TOML")?,
    };
    fs::write(path, text).with_context(|| format!("writing case to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_algo::test_utils::three_unit_case;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_reports_path() {
        let err = load_case("/nonexistent/case.json").unwrap_err();
        assert!(format!("{err:#}").contains("/nonexistent/case.json"));
    }

    #[test]
    fn test_parse_error_is_contextualised() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, "{ \"name\": 3 }").unwrap();
        let err = load_case(&path).unwrap_err();
        assert!(err.to_string().contains("parsing JSON case"));
    }

    #[test]
    fn test_frequency_and_lines_default() {
        let mut value = serde_json::to_value(three_unit_case()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("frequency");
        obj.remove("lines");
        let case = parse_case(&value.to_string(), CaseFormat::Json).unwrap();
        assert_eq!(case.frequency, dauc_core::FrequencyParams::default());
        assert!(case.lines.is_empty());
    }
}
