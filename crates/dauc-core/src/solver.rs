//! Solver configuration and results shared by all backends

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DaucError;
use crate::model::VarId;

/// Structural class of a [`crate::Model`], used for backend dispatch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProblemClass {
    /// Continuous variables, linear rows
    Linear,
    /// Integer or binary variables, linear rows
    MixedInteger,
    /// Continuous variables with second-order cones
    Conic,
    /// Integer variables with cones (no backend supports this)
    MixedIntegerConic,
}

impl fmt::Display for ProblemClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProblemClass::Linear => write!(f, "LP"),
            ProblemClass::MixedInteger => write!(f, "MILP"),
            ProblemClass::Conic => write!(f, "SOCP"),
            ProblemClass::MixedIntegerConic => write!(f, "MISOCP"),
        }
    }
}

/// Engine used for mixed-integer linear models
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MilpSolverKind {
    /// Pure-Rust branch and bound (good_lp `microlp`)
    #[default]
    Microlp,
    /// HiGHS through good_lp; needs the `solver-highs` feature of dauc-algo
    Highs,
    /// Clarabel on the continuous relaxation (binaries in [0, 1])
    ClarabelRelaxation,
}

const MILP_SOLVER_NAMES: &[&str] = &["microlp", "highs", "clarabel_relaxation"];

impl MilpSolverKind {
    pub fn available() -> &'static [&'static str] {
        MILP_SOLVER_NAMES
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MilpSolverKind::Microlp => "microlp",
            MilpSolverKind::Highs => "highs",
            MilpSolverKind::ClarabelRelaxation => "clarabel_relaxation",
        }
    }

    /// Whether integrality is enforced
    pub fn is_exact(&self) -> bool {
        !matches!(self, MilpSolverKind::ClarabelRelaxation)
    }
}

impl fmt::Display for MilpSolverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MilpSolverKind {
    type Err = DaucError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.to_ascii_lowercase().replace('-', "_");
        match normalized.as_str() {
            "microlp" => Ok(MilpSolverKind::Microlp),
            "highs" => Ok(MilpSolverKind::Highs),
            "clarabel" | "clarabel_relaxation" | "relax" => Ok(MilpSolverKind::ClarabelRelaxation),
            other => Err(DaucError::Config(format!(
                "unknown MILP solver '{}'; supported values: {}",
                other,
                MilpSolverKind::available().join(", ")
            ))),
        }
    }
}

/// Options passed to a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SolverConfig {
    /// Worker threads hint; `None` leaves the backend default
    pub threads: Option<usize>,
    pub time_limit_seconds: Option<f64>,
    /// Relative MIP gap
    pub mip_gap: Option<f64>,
    pub verbose: bool,
    pub milp_solver: MilpSolverKind,
    /// Iteration cap for interior-point backends
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            threads: None,
            time_limit_seconds: None,
            mip_gap: None,
            verbose: false,
            milp_solver: MilpSolverKind::default(),
            max_iterations: 200,
        }
    }
}

/// Terminal state reported by a backend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolveStatus {
    Optimal,
    Infeasible,
    Unbounded,
    TimeLimit,
    IterationLimit,
    NumericalError,
}

impl SolveStatus {
    pub fn is_optimal(&self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }
}

impl fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::TimeLimit => "time limit",
            SolveStatus::IterationLimit => "iteration limit",
            SolveStatus::NumericalError => "numerical error",
        };
        f.write_str(s)
    }
}

/// Raw result of solving a [`crate::Model`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelSolution {
    pub status: SolveStatus,
    /// Objective value in the model's own sense; present when optimal
    pub objective: Option<f64>,
    /// Variable values indexed by [`VarId::index`]; empty unless optimal
    pub values: Vec<f64>,
    /// Duals of the linear rows in model order; empty when the backend does
    /// not report them
    pub duals: Vec<f64>,
    pub backend: String,
    pub solve_time_ms: u128,
}

impl ModelSolution {
    /// Solution carrying only a non-optimal status
    pub fn terminal(status: SolveStatus, backend: impl Into<String>, solve_time_ms: u128) -> Self {
        Self {
            status,
            objective: None,
            values: Vec::new(),
            duals: Vec::new(),
            backend: backend.into(),
            solve_time_ms,
        }
    }

    pub fn value(&self, var: VarId) -> Option<f64> {
        self.values.get(var.index()).copied()
    }

    pub fn dual(&self, row: usize) -> Option<f64> {
        self.duals.get(row).copied()
    }
}
