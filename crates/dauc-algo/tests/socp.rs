//! SOCP primal/dual tests
//!
//! Tests cover:
//! - Weak and strong duality on the reference data
//! - Primal solution satisfying every row and the cone
//! - LP export of the dual model
//! - Duality on modified data

use dauc_algo::backends::solve_model;
use dauc_algo::socp::{check_duality, SocpData, STRONG_DUALITY_TOL};
use dauc_core::model::lp::write_lp;
use dauc_core::{ProblemClass, SolveStatus, SolverConfig};

#[test]
fn socp_reference_strong_duality() {
    let report = check_duality(&SocpData::reference(), &SolverConfig::default()).unwrap();
    assert!(report.weak_holds);
    assert!(report.strong_holds, "gap {}", report.gap);
    assert!(report.relative_gap() <= STRONG_DUALITY_TOL);
    assert_eq!(report.primal_x.len(), 4);
    // 3 row multipliers + 4 cone multipliers
    assert_eq!(report.dual_values.len(), 7);
}

#[test]
fn socp_primal_solution_is_feasible() {
    let primal = SocpData::reference().primal_model().unwrap();
    assert_eq!(primal.problem_class(), ProblemClass::Conic);
    let sol = solve_model(primal.clone(), &SolverConfig::default()).unwrap();
    assert_eq!(sol.status, SolveStatus::Optimal);
    let violations = primal.check_assignment(&sol.values, 1e-5);
    assert!(violations.is_empty(), "{violations:?}");
    let x = &sol.values;
    assert!(2.0 * x[0] * x[1] >= x[2] * x[2] + x[3] * x[3] - 1e-5);
}

#[test]
fn socp_dual_lp_text() {
    let dual = SocpData::reference().dual_model().unwrap();
    let text = write_lp(&dual);
    assert!(text.starts_with("\\ Model socp_dual\nMaximize\n"));
    assert!(text.contains(" obj: - 7 y0 + 4 y1 - 15 y2\n"));
    assert!(text.contains(" DUAL_x2: - y1 - z2 = -1\n"));
    assert!(text.contains(" CONE: [ - 2 z0 * z1 + z2 ^2 + z3 ^2 ] <= 0\n"));
    assert!(text.contains(" y1 free\n"));
    assert!(text.ends_with("End\n"));
}

#[test]
fn socp_duality_with_looser_rows() {
    let mut data = SocpData::reference();
    data.rows[0].rhs = 20.0;
    data.rows[2].rhs = 30.0;
    let report = check_duality(&data, &SolverConfig::default()).unwrap();
    assert!(report.strong_holds, "gap {}", report.gap);
}
