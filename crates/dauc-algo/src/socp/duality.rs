use dauc_core::{DaucError, DaucResult, SolverConfig};
use serde::Serialize;
use tracing::{info, warn};

use super::SocpData;
use crate::backends::solve_model;

/// Relative tolerance for primal = dual
pub const STRONG_DUALITY_TOL: f64 = 1e-5;

/// Objectives of the primal/dual pair and what they say about duality
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DualityReport {
    pub primal: f64,
    pub dual: f64,
    /// `primal − dual`
    pub gap: f64,
    /// Primal objective bounds the dual from above
    pub weak_holds: bool,
    /// Objectives agree within [`STRONG_DUALITY_TOL`] (relative)
    pub strong_holds: bool,
    pub primal_x: Vec<f64>,
    pub dual_values: Vec<f64>,
}

impl DualityReport {
    pub fn relative_gap(&self) -> f64 {
        self.gap.abs() / self.primal.abs().max(1.0)
    }
}

/// Solve the primal and the dual independently and compare objectives.
pub fn check_duality(data: &SocpData, config: &SolverConfig) -> DaucResult<DualityReport> {
    let primal = solve_model(data.primal_model()?, config)?;
    let Some(p_obj) = primal.objective.filter(|_| primal.status.is_optimal()) else {
        return Err(DaucError::Solver(format!("primal ended with status {}", primal.status)));
    };
    let dual = solve_model(data.dual_model()?, config)?;
    let Some(d_obj) = dual.objective.filter(|_| dual.status.is_optimal()) else {
        return Err(DaucError::Solver(format!("dual ended with status {}", dual.status)));
    };

    let gap = p_obj - d_obj;
    let scale = p_obj.abs().max(1.0);
    let report = DualityReport {
        primal: p_obj,
        dual: d_obj,
        gap,
        weak_holds: gap >= -STRONG_DUALITY_TOL * scale,
        strong_holds: gap.abs() <= STRONG_DUALITY_TOL * scale,
        primal_x: primal.values,
        dual_values: dual.values,
    };
    if report.strong_holds {
        info!(primal = p_obj, dual = d_obj, "strong duality holds");
    } else {
        warn!(primal = p_obj, dual = d_obj, gap, "duality gap above tolerance");
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_gap_scales_with_objective() {
        let report = DualityReport {
            primal: -200.0,
            dual: -200.002,
            gap: 0.002,
            weak_holds: true,
            strong_holds: false,
            primal_x: vec![],
            dual_values: vec![],
        };
        assert!((report.relative_gap() - 1e-5).abs() < 1e-12);
    }
}
