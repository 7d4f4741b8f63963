//! Solution and model export

use std::path::Path;

use anyhow::{Context, Result};
use dauc_algo::{DualityReport, UcSolution};
use dauc_core::{model::lp::write_lp, Model};
use serde::Serialize;

/// Serialize any result to pretty JSON at `path`.
pub fn write_json<T: Serialize>(value: &T, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("serializing result to JSON")?;
    std::fs::write(path, json).with_context(|| format!("writing JSON to {}", path.display()))?;
    Ok(())
}

pub fn write_solution_json(solution: &UcSolution, path: &Path) -> Result<()> {
    write_json(solution, path)
}

/// Convert to JSON value (for stdout)
pub fn solution_to_json_value(solution: &UcSolution) -> Result<serde_json::Value> {
    serde_json::to_value(solution).context("converting UcSolution to JSON value")
}

pub fn write_duality_json(report: &DualityReport, path: &Path) -> Result<()> {
    write_json(report, path)
}

/// Write `model` in CPLEX LP format.
pub fn write_model_lp(model: &Model, path: &Path) -> Result<()> {
    std::fs::write(path, write_lp(model))
        .with_context(|| format!("writing LP model to {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_algo::test_utils::three_unit_case;
    use dauc_algo::uc::solve_uc;
    use dauc_core::SolverConfig;
    use tempfile::TempDir;

    #[test]
    fn test_solution_json_has_schedules() {
        let solution = solve_uc(&three_unit_case(), &SolverConfig::default()).unwrap();
        let json = solution_to_json_value(&solution).unwrap();
        assert_eq!(json["status"], "optimal");
        assert_eq!(json["schedules"].as_array().unwrap().len(), 3);
        assert_eq!(json["schedules"][0]["name"], "G1");

        let dir = TempDir::new().unwrap();
        let path = dir.path().join("uc.json");
        write_solution_json(&solution, &path).unwrap();
        let back: UcSolution =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(back.schedules.len(), 3);
        assert_eq!(back.status, solution.status);
    }

    #[test]
    fn test_write_to_missing_directory_fails_with_path() {
        let model = Model::new("empty");
        let err = write_model_lp(&model, Path::new("/nonexistent/dir/m.lp")).unwrap_err();
        assert!(err.to_string().contains("/nonexistent/dir/m.lp"));
    }
}
