//! Solver-independent mathematical program
//!
//! A [`Model`] owns its variables, linear rows, cones and objective. Formulation
//! code builds one explicitly and then moves it into a backend:
//!
//! ```text
//! let mut m = Model::new("uc");
//! let u = m.add_binary("onoff_G1_1");
//! let p = m.add_continuous("power_G1_1", 0.0, f64::INFINITY);
//! m.add_constraint(LinearConstraint::new(.., p - 200.0 * u, Sense::Le, 0.0));
//! m.set_objective(LinExpr::from(p) * 10.0, ObjectiveSense::Minimize);
//! ```
//!
//! Each linear row carries a [`ConstraintKind`] and a [`Site`], which lets tests
//! and reports ask for "all min-on window rows of generator 3" without parsing
//! names.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{DaucError, DaucResult};
use crate::solver::ProblemClass;

mod constraint;
mod expr;
pub mod lp;

pub use constraint::{ConeConstraint, ConeKind, ConstraintKind, LinearConstraint, Sense, Site};
pub use expr::{LinExpr, VarId};

/// Variable domain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VarDomain {
    Continuous,
    Binary,
    Integer,
}

impl VarDomain {
    pub fn is_integral(&self) -> bool {
        !matches!(self, VarDomain::Continuous)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VarDef {
    pub name: String,
    /// Lower bound; `f64::NEG_INFINITY` for free
    pub lower: f64,
    /// Upper bound; `f64::INFINITY` for unbounded
    pub upper: f64,
    pub domain: VarDomain,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ObjectiveSense {
    #[default]
    Minimize,
    Maximize,
}

/// What an assignment got wrong
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ViolationType {
    LowerBound,
    UpperBound,
    Integrality,
    Row(ConstraintKind),
    Cone,
}

/// A bound, integrality, row or cone not satisfied by an assignment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Violation {
    pub name: String,
    pub what: ViolationType,
    pub amount: f64,
}

/// A mathematical program under construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Model {
    name: String,
    variables: Vec<VarDef>,
    constraints: Vec<LinearConstraint>,
    cones: Vec<ConeConstraint>,
    objective: LinExpr,
    sense: ObjectiveSense,
}

impl Model {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_var(
        &mut self,
        name: impl Into<String>,
        lower: f64,
        upper: f64,
        domain: VarDomain,
    ) -> VarId {
        let id = VarId::new(self.variables.len());
        self.variables.push(VarDef {
            name: name.into(),
            lower,
            upper,
            domain,
        });
        id
    }

    pub fn add_continuous(&mut self, name: impl Into<String>, lower: f64, upper: f64) -> VarId {
        self.add_var(name, lower, upper, VarDomain::Continuous)
    }

    pub fn add_free(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name, f64::NEG_INFINITY, f64::INFINITY, VarDomain::Continuous)
    }

    pub fn add_binary(&mut self, name: impl Into<String>) -> VarId {
        self.add_var(name, 0.0, 1.0, VarDomain::Binary)
    }

    /// Append a linear row, returning its index.
    ///
    /// Rows may only reference variables already added to this model.
    pub fn add_constraint(&mut self, row: LinearConstraint) -> DaucResult<usize> {
        self.check_vars(row.expr.max_var(), &row.name)?;
        self.constraints.push(row);
        Ok(self.constraints.len() - 1)
    }

    /// Append a cone row. Members must exist and be distinct.
    pub fn add_cone(
        &mut self,
        name: impl Into<String>,
        kind: ConstraintKind,
        cone: ConeKind,
    ) -> DaucResult<usize> {
        let name = name.into();
        let members = cone.members();
        self.check_vars(members.iter().max().copied(), &name)?;
        let mut sorted = members.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != members.len() {
            return Err(DaucError::Model(format!("cone '{name}' repeats a variable")));
        }
        self.cones.push(ConeConstraint { name, kind, cone });
        Ok(self.cones.len() - 1)
    }

    pub fn set_objective(&mut self, expr: LinExpr, sense: ObjectiveSense) {
        self.objective = expr;
        self.sense = sense;
    }

    fn check_vars(&self, max: Option<VarId>, row: &str) -> DaucResult<()> {
        match max {
            Some(v) if v.index() >= self.variables.len() => Err(DaucError::Model(format!(
                "row '{row}' references {v} but the model has {} variables",
                self.variables.len()
            ))),
            _ => Ok(()),
        }
    }

    pub fn variables(&self) -> &[VarDef] {
        &self.variables
    }

    pub fn var(&self, id: VarId) -> Option<&VarDef> {
        self.variables.get(id.index())
    }

    pub fn var_by_name(&self, name: &str) -> Option<VarId> {
        self.variables
            .iter()
            .position(|v| v.name == name)
            .map(VarId::new)
    }

    pub fn constraints(&self) -> &[LinearConstraint] {
        &self.constraints
    }

    pub fn cones(&self) -> &[ConeConstraint] {
        &self.cones
    }

    pub fn objective(&self) -> &LinExpr {
        &self.objective
    }

    pub fn sense(&self) -> ObjectiveSense {
        self.sense
    }

    pub fn num_vars(&self) -> usize {
        self.variables.len()
    }

    pub fn num_integer_vars(&self) -> usize {
        self.variables.iter().filter(|v| v.domain.is_integral()).count()
    }

    pub fn constraints_of(&self, kind: ConstraintKind) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints.iter().filter(move |c| c.kind == kind)
    }

    pub fn constraints_at(
        &self,
        kind: ConstraintKind,
        site: Site,
    ) -> impl Iterator<Item = &LinearConstraint> {
        self.constraints
            .iter()
            .filter(move |c| c.kind == kind && c.site == site)
    }

    pub fn constraint_by_name(&self, name: &str) -> Option<&LinearConstraint> {
        self.constraints.iter().find(|c| c.name == name)
    }

    /// Row counts per kind, cones included
    pub fn counts_by_kind(&self) -> BTreeMap<ConstraintKind, usize> {
        let mut counts = BTreeMap::new();
        for c in &self.constraints {
            *counts.entry(c.kind).or_insert(0) += 1;
        }
        for c in &self.cones {
            *counts.entry(c.kind).or_insert(0) += 1;
        }
        counts
    }

    pub fn problem_class(&self) -> ProblemClass {
        let integer = self.variables.iter().any(|v| v.domain.is_integral());
        match (integer, self.cones.is_empty()) {
            (false, true) => ProblemClass::Linear,
            (true, true) => ProblemClass::MixedInteger,
            (false, false) => ProblemClass::Conic,
            (true, false) => ProblemClass::MixedIntegerConic,
        }
    }

    /// Turn binary and integer variables into continuous ones, keeping bounds.
    pub fn relax_integrality(&mut self) -> usize {
        let mut relaxed = 0;
        for v in self.variables.iter_mut().filter(|v| v.domain.is_integral()) {
            v.domain = VarDomain::Continuous;
            relaxed += 1;
        }
        relaxed
    }

    pub fn evaluate(&self, expr: &LinExpr, values: &[f64]) -> f64 {
        expr.evaluate(values)
    }

    pub fn evaluate_objective(&self, values: &[f64]) -> f64 {
        self.objective.evaluate(values)
    }

    /// Every bound, integrality requirement, row and cone violated by more
    /// than `tol`.
    pub fn check_assignment(&self, values: &[f64], tol: f64) -> Vec<Violation> {
        let mut out = Vec::new();
        for (i, def) in self.variables.iter().enumerate() {
            let x = values.get(i).copied().unwrap_or(0.0);
            if x < def.lower - tol {
                out.push(Violation {
                    name: def.name.clone(),
                    what: ViolationType::LowerBound,
                    amount: def.lower - x,
                });
            }
            if x > def.upper + tol {
                out.push(Violation {
                    name: def.name.clone(),
                    what: ViolationType::UpperBound,
                    amount: x - def.upper,
                });
            }
            if def.domain.is_integral() && (x - x.round()).abs() > tol {
                out.push(Violation {
                    name: def.name.clone(),
                    what: ViolationType::Integrality,
                    amount: (x - x.round()).abs(),
                });
            }
        }
        for row in &self.constraints {
            let amount = row.violation(values);
            if amount > tol {
                out.push(Violation {
                    name: row.name.clone(),
                    what: ViolationType::Row(row.kind),
                    amount,
                });
            }
        }
        for cone in &self.cones {
            let amount = cone.cone.violation(values);
            if amount > tol {
                out.push(Violation {
                    name: cone.name.clone(),
                    what: ViolationType::Cone,
                    amount,
                });
            }
        }
        out
    }
}
