//! Direct Clarabel backend for linear and second-order cone models
//!
//! Clarabel solves
//!
//! ```text
//! minimize    ½x'Px + q'x
//! subject to  Ax + s = b,  s ∈ K
//! ```
//!
//! Rows are laid out as: linear rows in model order, then variable bounds,
//! then one second-order cone per model cone. `=` rows go to the zero cone,
//! `≤` rows (and negated `≥` rows) to the nonnegative cone.
//!
//! A rotated cone `2uv ≥ ‖x‖²` is passed as the standard cone
//! `((u+v)/√2, (u−v)/√2, x)`, which is the same set.

use std::time::Instant;

use clarabel::{
    algebra::CscMatrix,
    solver::{DefaultSettingsBuilder, DefaultSolver, IPSolver, SolverStatus, SupportedConeT},
};
use dauc_core::{
    ConeKind, DaucError, DaucResult, Model, ModelSolution, ObjectiveSense, ProblemClass, Sense,
    SolveStatus, SolverConfig,
};
use tracing::debug;

use super::ModelBackend;

#[derive(Debug, Clone, Copy, Default)]
pub struct ClarabelBackend;

/// Column-wise sparse accumulator for `A`, plus `b` and the cone list
struct ConicRows {
    cols: Vec<Vec<(usize, f64)>>,
    rhs: Vec<f64>,
    cones: Vec<SupportedConeT<f64>>,
}

impl ConicRows {
    fn new(n_var: usize) -> Self {
        Self {
            cols: vec![Vec::new(); n_var],
            rhs: Vec::new(),
            cones: Vec::new(),
        }
    }

    fn push_row(&mut self, coeffs: impl IntoIterator<Item = (usize, f64)>, b: f64) -> usize {
        let row = self.rhs.len();
        for (col, val) in coeffs {
            self.cols[col].push((row, val));
        }
        self.rhs.push(b);
        row
    }

    /// `Σ coeffᵢ·xᵢ = b`; consecutive equalities share one zero cone
    fn push_eq(&mut self, coeffs: impl IntoIterator<Item = (usize, f64)>, b: f64) -> usize {
        let row = self.push_row(coeffs, b);
        match self.cones.last_mut() {
            Some(SupportedConeT::ZeroConeT(n)) => *n += 1,
            _ => self.cones.push(SupportedConeT::ZeroConeT(1)),
        }
        row
    }

    /// `Σ coeffᵢ·xᵢ ≤ b`; consecutive inequalities share one nonnegative cone
    fn push_leq(&mut self, coeffs: impl IntoIterator<Item = (usize, f64)>, b: f64) -> usize {
        let row = self.push_row(coeffs, b);
        match self.cones.last_mut() {
            Some(SupportedConeT::NonnegativeConeT(n)) => *n += 1,
            _ => self.cones.push(SupportedConeT::NonnegativeConeT(1)),
        }
        row
    }

    /// `‖(s₁..)‖ ≤ s₀` with `s = −rows·x`
    fn push_soc(&mut self, rows: Vec<Vec<(usize, f64)>>) {
        let dim = rows.len();
        for coeffs in rows {
            self.push_row(coeffs.into_iter().map(|(c, v)| (c, -v)), 0.0);
        }
        self.cones.push(SupportedConeT::SecondOrderConeT(dim));
    }

    fn into_csc(mut self) -> (CscMatrix<f64>, Vec<f64>, Vec<SupportedConeT<f64>>) {
        let n_rows = self.rhs.len();
        let n_var = self.cols.len();
        let mut col_ptr = Vec::with_capacity(n_var + 1);
        let mut row_idx = Vec::new();
        let mut values = Vec::new();
        for col in self.cols.iter_mut() {
            col_ptr.push(row_idx.len());
            col.sort_by_key(|(r, _)| *r);
            for &(r, v) in col.iter() {
                row_idx.push(r);
                values.push(v);
            }
        }
        col_ptr.push(row_idx.len());
        (
            CscMatrix::new(n_rows, n_var, col_ptr, row_idx, values),
            self.rhs,
            self.cones,
        )
    }
}

fn map_status(status: SolverStatus) -> SolveStatus {
    match status {
        SolverStatus::Solved | SolverStatus::AlmostSolved => SolveStatus::Optimal,
        SolverStatus::PrimalInfeasible | SolverStatus::AlmostPrimalInfeasible => {
            SolveStatus::Infeasible
        }
        SolverStatus::DualInfeasible | SolverStatus::AlmostDualInfeasible => SolveStatus::Unbounded,
        SolverStatus::MaxTime => SolveStatus::TimeLimit,
        SolverStatus::MaxIterations => SolveStatus::IterationLimit,
        _ => SolveStatus::NumericalError,
    }
}

impl ModelBackend for ClarabelBackend {
    fn id(&self) -> &str {
        "clarabel"
    }

    fn supports(&self, class: ProblemClass) -> bool {
        matches!(class, ProblemClass::Linear | ProblemClass::Conic)
    }

    fn solve(&self, model: Model, config: &SolverConfig) -> DaucResult<ModelSolution> {
        let class = model.problem_class();
        if !self.supports(class) {
            return Err(DaucError::Solver(format!(
                "clarabel cannot solve {class} models; integer variables need a MILP backend"
            )));
        }
        let start = Instant::now();
        let n_var = model.num_vars();
        let mut rows = ConicRows::new(n_var);

        for row in model.constraints() {
            let coeffs = row.expr.terms().map(|(v, c)| (v.index(), c));
            match row.sense {
                Sense::Eq => rows.push_eq(coeffs, row.rhs),
                Sense::Le => rows.push_leq(coeffs, row.rhs),
                Sense::Ge => rows.push_leq(coeffs.map(|(v, c)| (v, -c)), -row.rhs),
            };
        }
        let n_linear = model.constraints().len();

        for (j, def) in model.variables().iter().enumerate() {
            if def.lower.is_finite() && def.upper.is_finite() && def.lower == def.upper {
                rows.push_eq([(j, 1.0)], def.lower);
                continue;
            }
            if def.lower.is_finite() {
                rows.push_leq([(j, -1.0)], -def.lower);
            }
            if def.upper.is_finite() {
                rows.push_leq([(j, 1.0)], def.upper);
            }
        }

        let sqrt_half = std::f64::consts::FRAC_1_SQRT_2;
        for cone in model.cones() {
            let soc_rows = match &cone.cone {
                ConeKind::Quadratic { t, xs } => std::iter::once(vec![(t.index(), 1.0)])
                    .chain(xs.iter().map(|x| vec![(x.index(), 1.0)]))
                    .collect(),
                ConeKind::RotatedQuadratic { u, v, xs } => {
                    let head = vec![(u.index(), sqrt_half), (v.index(), sqrt_half)];
                    let diff = vec![(u.index(), sqrt_half), (v.index(), -sqrt_half)];
                    [head, diff]
                        .into_iter()
                        .chain(xs.iter().map(|x| vec![(x.index(), 1.0)]))
                        .collect()
                }
            };
            rows.push_soc(soc_rows);
        }

        let (a_mat, b, cones) = rows.into_csc();
        let p_mat = CscMatrix::new(n_var, n_var, vec![0; n_var + 1], Vec::new(), Vec::new());
        let flip = match model.sense() {
            ObjectiveSense::Minimize => 1.0,
            ObjectiveSense::Maximize => -1.0,
        };
        let mut q = vec![0.0; n_var];
        for (v, c) in model.objective().terms() {
            q[v.index()] = flip * c;
        }

        if let Some(threads) = config.threads {
            debug!(threads, "clarabel runs single-threaded; thread hint ignored");
        }
        debug!(
            vars = n_var,
            rows = b.len(),
            cone_blocks = cones.len(),
            "assembled conic problem"
        );

        let mut settings = DefaultSettingsBuilder::default();
        settings.verbose(config.verbose).max_iter(config.max_iterations);
        if let Some(limit) = config.time_limit_seconds {
            settings.time_limit(limit);
        }
        let settings = settings
            .build()
            .map_err(|e| DaucError::Solver(format!("Clarabel settings error: {e:?}")))?;

        let mut solver = DefaultSolver::new(&p_mat, &q, &a_mat, &b, &cones, settings)
            .map_err(|e| DaucError::Solver(format!("Clarabel initialization failed: {e:?}")))?;
        solver.solve();

        let sol = &solver.solution;
        let status = map_status(sol.status);
        let elapsed = start.elapsed().as_millis();
        if !status.is_optimal() {
            debug!(clarabel_status = ?sol.status, "clarabel did not converge to an optimum");
            return Ok(ModelSolution::terminal(status, self.id(), elapsed));
        }

        let values = sol.x.clone();
        let objective = model.evaluate_objective(&values);
        let duals = sol.z.iter().take(n_linear).copied().collect();
        Ok(ModelSolution {
            status,
            objective: Some(objective),
            values,
            duals,
            backend: self.id().to_string(),
            solve_time_ms: elapsed,
        })
    }
}
