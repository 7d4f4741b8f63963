//! Validation reports for case data

use std::fmt;

use dauc_core::{DaucError, UcCase};
use serde::Serialize;

/// Severity level for case issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseIssue {
    pub severity: Severity,
    pub subject: String,
    pub message: String,
}

/// Summary sizes of a case
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CaseStats {
    pub hours: usize,
    pub generators: usize,
    pub buses: usize,
    pub lines: usize,
    pub peak_load_mw: f64,
    pub installed_mw: f64,
}

/// Outcome of [`UcCase::validate`] in a printable form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationReport {
    pub case: String,
    pub stats: CaseStats,
    pub issues: Vec<CaseIssue>,
}

impl ValidationReport {
    pub fn from_case(case: &UcCase) -> Self {
        let issues = match case.validate() {
            Ok(warnings) => warnings
                .into_iter()
                .map(|w| CaseIssue {
                    severity: Severity::Warning,
                    subject: w.subject,
                    message: w.message,
                })
                .collect(),
            Err(DaucError::Validation(message)) => vec![CaseIssue {
                severity: Severity::Error,
                subject: case.name.clone(),
                message,
            }],
            Err(other) => vec![CaseIssue {
                severity: Severity::Error,
                subject: case.name.clone(),
                message: other.to_string(),
            }],
        };

        let stats = CaseStats {
            hours: case.hours,
            generators: case.generators.len(),
            buses: case.buses.len(),
            lines: case.lines.len(),
            peak_load_mw: (0..case.hours)
                .map(|t| case.system_load(t))
                .fold(0.0, f64::max),
            installed_mw: case
                .generators
                .iter()
                .map(|g| g.pmax_mw.iter().copied().fold(0.0, f64::max))
                .sum(),
        };

        Self {
            case: case.name.clone(),
            stats,
            issues,
        }
    }

    pub fn warning_count(&self) -> usize {
        self.count(Severity::Warning)
    }

    pub fn error_count(&self) -> usize {
        self.count(Severity::Error)
    }

    pub fn is_valid(&self) -> bool {
        self.error_count() == 0
    }

    fn count(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = &self.stats;
        writeln!(f, "Case: {}", self.case)?;
        writeln!(
            f,
            "  {} hours, {} generators, {} buses, {} lines",
            s.hours, s.generators, s.buses, s.lines
        )?;
        writeln!(
            f,
            "  peak load {:.1} MW, installed {:.1} MW",
            s.peak_load_mw, s.installed_mw
        )?;
        for issue in &self.issues {
            let tag = match issue.severity {
                Severity::Warning => "warning",
                Severity::Error => "error",
            };
            writeln!(f, "  {tag}: {}: {}", issue.subject, issue.message)?;
        }
        if self.is_valid() {
            write!(f, "OK ({} warnings)", self.warning_count())
        } else {
            write!(f, "INVALID")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_algo::test_utils::three_unit_case;

    #[test]
    fn test_clean_case() {
        let report = ValidationReport::from_case(&three_unit_case());
        assert!(report.is_valid());
        assert_eq!(report.warning_count(), 0);
        assert_eq!(report.stats.generators, 3);
        assert!((report.stats.peak_load_mw - 240.0).abs() < 1e-9);
        assert!((report.stats.installed_mw - 360.0).abs() < 1e-9);
        assert!(report.to_string().ends_with("OK (0 warnings)"));
    }

    #[test]
    fn test_structural_error() {
        let mut case = three_unit_case();
        case.buses[1].load_mw.pop();
        let report = ValidationReport::from_case(&case);
        assert!(!report.is_valid());
        assert_eq!(report.error_count(), 1);
        assert!(report.to_string().contains("INVALID"));
    }

    #[test]
    fn test_non_convex_cost_is_a_warning() {
        let mut case = three_unit_case();
        case.generators[0].blocks[1].slope = 5.0;
        let report = ValidationReport::from_case(&case);
        assert!(report.is_valid());
        assert!(report.warning_count() >= 1);
        assert!(report.issues.iter().any(|i| i.subject == "G1"));
    }
}
