//! UC MILP solve entry point

use dauc_core::{DaucResult, SolverConfig, UcCase};
use tracing::info;

use super::{UcFormulation, UcSolution};
use crate::backends::solve_model;

/// Build and solve the unit commitment model for `case`.
///
/// The MILP engine is chosen by `config.milp_solver`. With
/// [`dauc_core::MilpSolverKind::ClarabelRelaxation`] the commitment binaries
/// are relaxed to `[0, 1]` and the result is a lower bound, flagged by
/// `exact = false`.
///
/// # Example
///
/// ```no_run
/// use dauc_algo::uc::solve_uc;
/// use dauc_core::SolverConfig;
///
/// let case = dauc_algo::test_utils::three_unit_case();
/// let solution = solve_uc(&case, &SolverConfig::default())?;
/// println!("{}", solution.summary());
/// # Ok::<(), dauc_core::DaucError>(())
/// ```
pub fn solve_uc(case: &UcCase, config: &SolverConfig) -> DaucResult<UcSolution> {
    let formulation = UcFormulation::build(case)?;
    solve_formulation(case, formulation, config)
}

/// Solve an already built formulation of `case`
pub fn solve_formulation(
    case: &UcCase,
    formulation: UcFormulation,
    config: &SolverConfig,
) -> DaucResult<UcSolution> {
    let (model, vars) = formulation.into_parts();
    let exact = config.milp_solver.is_exact();
    let raw = solve_model(model, config)?;
    let solution = UcSolution::from_model(case, &vars, &raw, exact);
    if solution.is_optimal() {
        info!(
            case = %case.name,
            objective = solution.objective.unwrap_or_default(),
            exact,
            "unit commitment solved"
        );
    } else {
        info!(case = %case.name, status = %solution.status, "unit commitment not solved to optimality");
    }
    Ok(solution)
}
