//! Solver backends for [`Model`]s.
//!
//! A backend receives a finished model by value and returns a
//! [`ModelSolution`]. Backends are matched to models through
//! [`ProblemClass`]:
//!
//! | Class | Backend |
//! |-------|---------|
//! | LP | [`ClarabelBackend`] (direct interior point, reports row duals) |
//! | SOCP | [`ClarabelBackend`] |
//! | MILP | [`GoodLpBackend`] with microlp, HiGHS or a Clarabel relaxation |
//!
//! Infeasible, unbounded and limit-reached outcomes come back as a
//! [`SolveStatus`] inside `Ok`; `Err` is reserved for failures to run the
//! solver at all.

use dauc_core::{
    DaucError, DaucResult, MilpSolverKind, Model, ModelSolution, ProblemClass, SolverConfig,
};
use tracing::{debug, info};

mod conic;
mod milp;

pub use conic::ClarabelBackend;
pub use milp::{GoodLpBackend, GoodLpEngine};

/// Implements the actual solving of a [`Model`].
pub trait ModelBackend: Send + Sync {
    /// Unique identifier (e.g., "microlp", "clarabel")
    fn id(&self) -> &str;

    /// Whether this backend can solve models of `class`
    fn supports(&self, class: ProblemClass) -> bool;

    /// Check if this backend was compiled in
    fn is_available(&self) -> bool {
        true
    }

    /// Solve the model
    fn solve(&self, model: Model, config: &SolverConfig) -> DaucResult<ModelSolution>;
}

/// Pick the backend for a problem class and configuration
pub fn backend_for(class: ProblemClass, config: &SolverConfig) -> DaucResult<Box<dyn ModelBackend>> {
    let backend: Box<dyn ModelBackend> = match class {
        ProblemClass::Linear | ProblemClass::Conic => Box::new(ClarabelBackend),
        ProblemClass::MixedInteger => {
            let engine = match config.milp_solver {
                MilpSolverKind::Microlp => GoodLpEngine::Microlp,
                MilpSolverKind::Highs => GoodLpEngine::Highs,
                MilpSolverKind::ClarabelRelaxation => GoodLpEngine::Clarabel,
            };
            Box::new(GoodLpBackend::new(engine))
        }
        ProblemClass::MixedIntegerConic => {
            return Err(DaucError::Solver(
                "mixed-integer conic models are not supported by any backend".into(),
            ))
        }
    };
    if !backend.is_available() {
        return Err(DaucError::Solver(format!(
            "backend '{}' is not compiled in; rebuild dauc-algo with the `solver-{}` feature",
            backend.id(),
            backend.id()
        )));
    }
    Ok(backend)
}

/// Solve `model` with the backend matching its problem class.
pub fn solve_model(model: Model, config: &SolverConfig) -> DaucResult<ModelSolution> {
    let class = model.problem_class();
    let backend = backend_for(class, config)?;
    debug!(
        model = model.name(),
        class = %class,
        vars = model.num_vars(),
        integer_vars = model.num_integer_vars(),
        rows = model.constraints().len(),
        cones = model.cones().len(),
        backend = backend.id(),
        "dispatching model"
    );
    let name = model.name().to_string();
    let solution = backend.solve(model, config)?;
    info!(
        model = %name,
        backend = %solution.backend,
        status = %solution.status,
        objective = ?solution.objective,
        time_ms = solution.solve_time_ms as u64,
        "solve finished"
    );
    Ok(solution)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_core::{ConstraintKind, LinExpr, LinearConstraint, ObjectiveSense, Sense, Site};

    #[test]
    fn test_backend_is_object_safe() {
        fn _accepts(_b: &dyn ModelBackend) {}
    }

    #[test]
    fn test_dispatch_by_class() {
        let cfg = SolverConfig::default();
        assert_eq!(backend_for(ProblemClass::Conic, &cfg).unwrap().id(), "clarabel");
        assert_eq!(backend_for(ProblemClass::MixedInteger, &cfg).unwrap().id(), "microlp");
        assert!(backend_for(ProblemClass::MixedIntegerConic, &cfg).is_err());
    }

    #[test]
    fn test_solve_small_lp() {
        // min x + 2y  s.t. x + y >= 3, x <= 1
        let mut m = Model::new("lp");
        let x = m.add_continuous("x", 0.0, 1.0);
        let y = m.add_continuous("y", 0.0, f64::INFINITY);
        m.add_constraint(LinearConstraint::new(
            "cover",
            ConstraintKind::Inequality,
            Site::none(),
            x + y,
            Sense::Ge,
            3.0,
        ))
        .unwrap();
        m.set_objective(x + 2.0 * y, ObjectiveSense::Minimize);

        let sol = solve_model(m, &SolverConfig::default()).unwrap();
        assert!(sol.status.is_optimal());
        assert!((sol.objective.unwrap() - 5.0).abs() < 1e-5);
        assert!((sol.value(x).unwrap() - 1.0).abs() < 1e-5);
        // shadow price of the covering row is the marginal cost of y
        assert!((sol.dual(0).unwrap() - 2.0).abs() < 1e-4);
    }

    #[test]
    fn test_solve_small_milp() {
        // max 3a + 2b  s.t. a + b <= 1.5, binaries
        let mut m = Model::new("milp");
        let a = m.add_binary("a");
        let b = m.add_binary("b");
        m.add_constraint(LinearConstraint::new(
            "budget",
            ConstraintKind::Inequality,
            Site::none(),
            a + b,
            Sense::Le,
            1.5,
        ))
        .unwrap();
        m.set_objective(3.0 * a + LinExpr::term(b, 2.0), ObjectiveSense::Maximize);

        let sol = solve_model(m, &SolverConfig::default()).unwrap();
        assert!(sol.status.is_optimal());
        assert!((sol.value(a).unwrap() - 1.0).abs() < 1e-6);
        assert!(sol.value(b).unwrap().abs() < 1e-6);
        assert!((sol.objective.unwrap() - 3.0).abs() < 1e-6);
    }
}
