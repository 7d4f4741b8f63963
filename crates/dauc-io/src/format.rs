//! Case file formats and detection by extension.

use std::path::Path;

use anyhow::{anyhow, Result};

/// Supported case file formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaseFormat {
    Json,
    Toml,
}

impl CaseFormat {
    pub const ALL: &'static [CaseFormat] = &[CaseFormat::Json, CaseFormat::Toml];

    /// Expected file extensions for this format.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            CaseFormat::Json => &["json"],
            CaseFormat::Toml => &["toml"],
        }
    }

    pub fn friendly_name(&self) -> &'static str {
        match self {
            CaseFormat::Json => "JSON case",
            CaseFormat::Toml => "TOML case",
        }
    }

    /// Detect the format from the file extension (case-insensitive).
    pub fn from_path(path: &Path) -> Result<Self> {
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|s| s.to_lowercase())
            .unwrap_or_default();
        Self::ALL
            .iter()
            .copied()
            .find(|f| f.extensions().contains(&extension.as_str()))
            .ok_or_else(|| {
                anyhow!(
                    "unsupported case extension '{}' for {} (use .json or .toml)",
                    extension,
                    path.display()
                )
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_by_extension() {
        assert_eq!(CaseFormat::from_path(Path::new("a/case.json")).unwrap(), CaseFormat::Json);
        assert_eq!(CaseFormat::from_path(Path::new("case.TOML")).unwrap(), CaseFormat::Toml);
    }

    #[test]
    fn test_rejects_unknown_extension() {
        let err = CaseFormat::from_path(Path::new("case.dat")).unwrap_err();
        assert!(err.to_string().contains("unsupported case extension 'dat'"));
        assert!(CaseFormat::from_path(Path::new("case")).is_err());
    }
}
