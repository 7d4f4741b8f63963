//! good_lp backend for linear and mixed-integer models

use std::time::Instant;

use dauc_core::{
    DaucError, DaucResult, Model, ModelSolution, ObjectiveSense, ProblemClass, Sense, SolveStatus,
    SolverConfig, VarDomain,
};
use good_lp::solvers::clarabel::clarabel;
use good_lp::solvers::microlp::microlp;
use good_lp::{
    constraint, variable, Constraint, Expression, ProblemVariables, ResolutionError, Solution,
    SolverModel, Variable,
};
use tracing::{debug, warn};

use super::ModelBackend;

/// Engine behind [`GoodLpBackend`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GoodLpEngine {
    /// Pure-Rust simplex + branch and bound
    Microlp,
    /// HiGHS (feature `solver-highs`)
    Highs,
    /// Clarabel interior point; integrality is relaxed
    Clarabel,
}

impl GoodLpEngine {
    pub fn as_str(&self) -> &'static str {
        match self {
            GoodLpEngine::Microlp => "microlp",
            GoodLpEngine::Highs => "highs",
            GoodLpEngine::Clarabel => "clarabel_relaxation",
        }
    }

    /// Limits set in `config` that this engine cannot apply.
    ///
    /// Only HiGHS takes a time limit and a MIP gap through good_lp.
    pub fn ignored_settings(&self, config: &SolverConfig) -> Vec<&'static str> {
        if *self == GoodLpEngine::Highs {
            return Vec::new();
        }
        let mut ignored = Vec::new();
        if config.time_limit_seconds.is_some() {
            ignored.push("time_limit");
        }
        if config.mip_gap.is_some() {
            ignored.push("mip_gap");
        }
        ignored
    }
}

#[derive(Debug, Clone, Copy)]
pub struct GoodLpBackend {
    engine: GoodLpEngine,
}

impl GoodLpBackend {
    pub fn new(engine: GoodLpEngine) -> Self {
        Self { engine }
    }
}

/// good_lp problem pieces translated from a [`Model`]
struct Translated {
    vars: ProblemVariables,
    handles: Vec<Variable>,
    objective: Expression,
    rows: Vec<Constraint>,
}

fn translate(model: &Model) -> Translated {
    let mut vars = ProblemVariables::new();
    let handles: Vec<Variable> = model
        .variables()
        .iter()
        .map(|def| {
            let mut v = variable().name(def.name.clone());
            match def.domain {
                VarDomain::Binary => v = v.binary(),
                VarDomain::Integer => v = v.integer(),
                VarDomain::Continuous => {}
            }
            if def.lower.is_finite() {
                v = v.min(def.lower);
            }
            if def.upper.is_finite() {
                v = v.max(def.upper);
            }
            vars.add(v)
        })
        .collect();

    let to_expr = |e: &dauc_core::LinExpr| -> Expression {
        let mut expr = Expression::from(e.constant_term());
        for (var, coef) in e.terms() {
            expr += coef * handles[var.index()];
        }
        expr
    };

    let objective = to_expr(model.objective());
    let rows = model
        .constraints()
        .iter()
        .map(|row| {
            let lhs = to_expr(&row.expr);
            let rhs = row.rhs;
            match row.sense {
                Sense::Le => constraint!(lhs <= rhs),
                Sense::Ge => constraint!(lhs >= rhs),
                Sense::Eq => constraint!(lhs == rhs),
            }
        })
        .collect();

    Translated {
        vars,
        handles,
        objective,
        rows,
    }
}

fn run<M>(mut problem: M, rows: Vec<Constraint>, handles: &[Variable]) -> Result<Vec<f64>, ResolutionError>
where
    M: SolverModel<Error = ResolutionError>,
{
    for row in rows {
        problem = problem.with(row);
    }
    let solution = problem.solve()?;
    Ok(handles.iter().map(|v| solution.value(*v)).collect())
}

impl ModelBackend for GoodLpBackend {
    fn id(&self) -> &str {
        self.engine.as_str()
    }

    fn supports(&self, class: ProblemClass) -> bool {
        matches!(class, ProblemClass::Linear | ProblemClass::MixedInteger)
    }

    fn is_available(&self) -> bool {
        match self.engine {
            GoodLpEngine::Highs => cfg!(feature = "solver-highs"),
            _ => true,
        }
    }

    fn solve(&self, mut model: Model, config: &SolverConfig) -> DaucResult<ModelSolution> {
        let class = model.problem_class();
        if !self.supports(class) {
            return Err(DaucError::Solver(format!(
                "{} cannot solve {} models",
                self.id(),
                class
            )));
        }
        if self.engine == GoodLpEngine::Clarabel && model.num_integer_vars() > 0 {
            let relaxed = model.relax_integrality();
            warn!(
                relaxed,
                "clarabel solves the continuous relaxation; commitment decisions may be fractional"
            );
        }
        if let Some(threads) = config.threads {
            if self.engine != GoodLpEngine::Highs {
                debug!(threads, engine = self.id(), "engine is single-threaded; thread hint ignored");
            }
        }
        for setting in self.engine.ignored_settings(config) {
            warn!(setting, engine = self.id(), "engine does not support this limit; solving without it");
        }

        let start = Instant::now();
        let Translated {
            vars,
            handles,
            objective,
            rows,
        } = translate(&model);
        let unsolved = match model.sense() {
            ObjectiveSense::Minimize => vars.minimise(objective),
            ObjectiveSense::Maximize => vars.maximise(objective),
        };

        let outcome = match self.engine {
            GoodLpEngine::Microlp => run(unsolved.using(microlp), rows, &handles),
            GoodLpEngine::Clarabel => run(unsolved.using(clarabel), rows, &handles),
            GoodLpEngine::Highs => {
                #[cfg(feature = "solver-highs")]
                {
                    let mut problem = unsolved
                        .using(good_lp::solvers::highs::highs)
                        .set_option("output_flag", config.verbose);
                    if let Some(threads) = config.threads {
                        problem = problem.set_option("threads", threads as i32);
                    }
                    if let Some(limit) = config.time_limit_seconds {
                        problem = problem.set_option("time_limit", limit);
                    }
                    if let Some(gap) = config.mip_gap {
                        problem = problem.set_option("mip_rel_gap", gap);
                    }
                    run(problem, rows, &handles)
                }
                #[cfg(not(feature = "solver-highs"))]
                {
                    let _ = (unsolved, rows);
                    return Err(DaucError::Solver(
                        "HiGHS support not compiled in; rebuild with the `solver-highs` feature"
                            .into(),
                    ));
                }
            }
        };
        let elapsed = start.elapsed().as_millis();

        match outcome {
            Ok(values) => {
                let objective = model.evaluate_objective(&values);
                Ok(ModelSolution {
                    status: SolveStatus::Optimal,
                    objective: Some(objective),
                    values,
                    duals: Vec::new(),
                    backend: self.id().to_string(),
                    solve_time_ms: elapsed,
                })
            }
            Err(ResolutionError::Infeasible) => {
                Ok(ModelSolution::terminal(SolveStatus::Infeasible, self.id(), elapsed))
            }
            Err(ResolutionError::Unbounded) => {
                Ok(ModelSolution::terminal(SolveStatus::Unbounded, self.id(), elapsed))
            }
            Err(other) => {
                let msg = other.to_string();
                if msg.to_ascii_lowercase().contains("time limit") {
                    return Ok(ModelSolution::terminal(SolveStatus::TimeLimit, self.id(), elapsed));
                }
                Err(DaucError::Solver(format!("{} failed: {}", self.id(), msg)))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dauc_core::{ConstraintKind, LinExpr, LinearConstraint, Site};

    fn infeasible_model() -> Model {
        let mut m = Model::new("infeasible");
        let u = m.add_binary("u");
        m.add_constraint(LinearConstraint::new(
            "too_much",
            ConstraintKind::Inequality,
            Site::none(),
            LinExpr::from(u),
            Sense::Ge,
            2.0,
        ))
        .unwrap();
        m.set_objective(LinExpr::from(u), ObjectiveSense::Minimize);
        m
    }

    #[test]
    fn test_infeasible_is_a_status() {
        let backend = GoodLpBackend::new(GoodLpEngine::Microlp);
        let sol = backend.solve(infeasible_model(), &SolverConfig::default()).unwrap();
        assert_eq!(sol.status, SolveStatus::Infeasible);
        assert!(sol.values.is_empty());
    }

    #[test]
    fn test_relaxation_allows_fractional_values() {
        // min -u  s.t. u <= 0.5 ; relaxed optimum u = 0.5
        let mut m = Model::new("relax");
        let u = m.add_binary("u");
        m.add_constraint(LinearConstraint::new(
            "half",
            ConstraintKind::Inequality,
            Site::none(),
            LinExpr::from(u),
            Sense::Le,
            0.5,
        ))
        .unwrap();
        m.set_objective(LinExpr::term(u, -1.0), ObjectiveSense::Minimize);
        let sol = GoodLpBackend::new(GoodLpEngine::Clarabel)
            .solve(m, &SolverConfig::default())
            .unwrap();
        assert!((sol.value(u).unwrap() - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_default_engine_reports_unsupported_limits() {
        let config = SolverConfig {
            time_limit_seconds: Some(1e-9),
            mip_gap: Some(0.01),
            ..SolverConfig::default()
        };
        assert_eq!(
            GoodLpEngine::Microlp.ignored_settings(&config),
            vec!["time_limit", "mip_gap"]
        );
        assert_eq!(
            GoodLpEngine::Clarabel.ignored_settings(&config),
            vec!["time_limit", "mip_gap"]
        );
        assert!(GoodLpEngine::Highs.ignored_settings(&config).is_empty());
        assert!(GoodLpEngine::Microlp
            .ignored_settings(&SolverConfig::default())
            .is_empty());

        // solved without the limit rather than reported as timed out
        let mut m = Model::new("tiny");
        let u = m.add_binary("u");
        m.set_objective(LinExpr::term(u, 1.0), ObjectiveSense::Minimize);
        let sol = GoodLpBackend::new(GoodLpEngine::Microlp).solve(m, &config).unwrap();
        assert_eq!(sol.status, SolveStatus::Optimal);
    }

    #[test]
    fn test_highs_availability_matches_feature() {
        let backend = GoodLpBackend::new(GoodLpEngine::Highs);
        assert_eq!(backend.is_available(), cfg!(feature = "solver-highs"));
    }

    #[test]
    fn test_rejects_conic_models() {
        let mut m = Model::new("cone");
        let a = m.add_continuous("a", 0.0, f64::INFINITY);
        let b = m.add_continuous("b", 0.0, f64::INFINITY);
        m.add_cone(
            "k",
            ConstraintKind::Cone,
            dauc_core::ConeKind::RotatedQuadratic { u: a, v: b, xs: vec![] },
        )
        .unwrap();
        let res = GoodLpBackend::new(GoodLpEngine::Microlp).solve(m, &SolverConfig::default());
        assert!(res.is_err());
    }
}
