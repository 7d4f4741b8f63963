//! Second-order cone primal/dual pair
//!
//! A small conic program and its algebraic dual, built as two independent
//! models so weak and strong duality can be checked numerically.
//!
//! ```text
//! Primal                                   Dual
//! min  c'x                                 max  −Σ_{≤} b_i·y_i + Σ_{=} b_e·y_e
//! s.t. a_i'x ≤ b_i      (y_i ≥ 0)          s.t. Σ_{≤} a_ij·y_i − Σ_{=} a_ej·y_e − z_j  ≥ −c_j   x_j ≥ 0
//!      a_e'x = b_e      (y_e free)                                                    = −c_j   x_j free
//!      x ∈ K_r                                  z ∈ K_r
//! ```
//!
//! `K_r = {(u, v, w): 2uv ≥ ‖w‖², u, v ≥ 0}` is the rotated second-order cone,
//! which is self-dual. The reference data is
//!
//! ```text
//! min  2x0 + x1 + x2 − 3x3
//! s.t. x0                  ≤ 7    INEQ1
//!      2x0 − x1 + x2 + ½x3 = 4    EQ
//!      x0 + x1 − 2x3       ≤ 15   INEQ2
//!      2·x0·x1 ≥ x2² + x3²        CONE
//!      x0, x1 ≥ 0
//! ```

use dauc_core::{
    ConeKind, ConstraintKind, DaucError, DaucResult, LinExpr, LinearConstraint, Model,
    ObjectiveSense, Sense, Site, VarId,
};

mod duality;

pub use duality::{check_duality, DualityReport, STRONG_DUALITY_TOL};

/// A primal row `coeffs·x (≤ | =) rhs`
#[derive(Debug, Clone, PartialEq)]
pub struct SocpRow {
    pub name: String,
    pub coeffs: Vec<f64>,
    pub sense: Sense,
    pub rhs: f64,
}

/// Primal variables forming the rotated cone: `2·x[u]·x[v] ≥ Σ x[w]²`
#[derive(Debug, Clone, PartialEq)]
pub struct RotatedConeIdx {
    pub u: usize,
    pub v: usize,
    pub w: Vec<usize>,
}

/// Data of a single-cone SOCP in inequality/equality form
#[derive(Debug, Clone, PartialEq)]
pub struct SocpData {
    pub cost: Vec<f64>,
    pub rows: Vec<SocpRow>,
    /// `true` for variables restricted to `x ≥ 0`
    pub nonnegative: Vec<bool>,
    pub cone: RotatedConeIdx,
}

impl Default for SocpData {
    fn default() -> Self {
        Self::reference()
    }
}

impl SocpData {
    pub fn reference() -> Self {
        let row = |name: &str, coeffs: [f64; 4], sense, rhs| SocpRow {
            name: name.to_string(),
            coeffs: coeffs.to_vec(),
            sense,
            rhs,
        };
        Self {
            cost: vec![2.0, 1.0, 1.0, -3.0],
            rows: vec![
                row("INEQ1", [1.0, 0.0, 0.0, 0.0], Sense::Le, 7.0),
                row("EQ", [2.0, -1.0, 1.0, 0.5], Sense::Eq, 4.0),
                row("INEQ2", [1.0, 1.0, 0.0, -2.0], Sense::Le, 15.0),
            ],
            nonnegative: vec![true, true, false, false],
            cone: RotatedConeIdx {
                u: 0,
                v: 1,
                w: vec![2, 3],
            },
        }
    }

    pub fn num_vars(&self) -> usize {
        self.cost.len()
    }

    fn validate(&self) -> DaucResult<()> {
        let n = self.num_vars();
        if self.nonnegative.len() != n {
            return Err(DaucError::Model(format!(
                "sign vector has {} entries, expected {n}",
                self.nonnegative.len()
            )));
        }
        for row in &self.rows {
            if row.coeffs.len() != n {
                return Err(DaucError::Model(format!(
                    "row '{}' has {} coefficients, expected {n}",
                    row.name,
                    row.coeffs.len()
                )));
            }
            if row.sense == Sense::Ge {
                return Err(DaucError::Model(format!(
                    "row '{}' must be written as <= or =",
                    row.name
                )));
            }
        }
        let members = self.cone_members();
        if members.iter().any(|&j| j >= n) {
            return Err(DaucError::Model("cone references an unknown variable".into()));
        }
        Ok(())
    }

    fn cone_members(&self) -> Vec<usize> {
        [self.cone.u, self.cone.v]
            .into_iter()
            .chain(self.cone.w.iter().copied())
            .collect()
    }

    fn cone_over(&self, ids: &[VarId]) -> ConeKind {
        ConeKind::RotatedQuadratic {
            u: ids[self.cone.u],
            v: ids[self.cone.v],
            xs: self.cone.w.iter().map(|&j| ids[j]).collect(),
        }
    }

    /// Primal minimisation over `x`
    pub fn primal_model(&self) -> DaucResult<Model> {
        self.validate()?;
        let mut m = Model::new("socp_primal");
        let x: Vec<VarId> = (0..self.num_vars())
            .map(|j| {
                let lower = if self.nonnegative[j] { 0.0 } else { f64::NEG_INFINITY };
                m.add_continuous(format!("x{j}"), lower, f64::INFINITY)
            })
            .collect();

        for row in &self.rows {
            let kind = match row.sense {
                Sense::Eq => ConstraintKind::Equality,
                _ => ConstraintKind::Inequality,
            };
            let expr = LinExpr::from_terms(x.iter().copied().zip(row.coeffs.iter().copied()));
            m.add_constraint(LinearConstraint::new(
                row.name.clone(),
                kind,
                Site::none(),
                expr,
                row.sense,
                row.rhs,
            ))?;
        }
        m.add_cone("CONE", ConstraintKind::Cone, self.cone_over(&x))?;
        m.set_objective(
            LinExpr::from_terms(x.iter().copied().zip(self.cost.iter().copied())),
            ObjectiveSense::Minimize,
        );
        Ok(m)
    }

    /// Algebraic dual: one `y` per primal row, one `z` per cone member.
    pub fn dual_model(&self) -> DaucResult<Model> {
        self.validate()?;
        let mut m = Model::new("socp_dual");

        let y: Vec<VarId> = self
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| match row.sense {
                Sense::Eq => m.add_free(format!("y{i}")),
                _ => m.add_continuous(format!("y{i}"), 0.0, f64::INFINITY),
            })
            .collect();

        let members = self.cone_members();
        let mut z: Vec<Option<VarId>> = vec![None; self.num_vars()];
        for (k, &j) in members.iter().enumerate() {
            // u and v carry the sign restriction of the cone
            let id = if k < 2 {
                m.add_continuous(format!("z{j}"), 0.0, f64::INFINITY)
            } else {
                m.add_free(format!("z{j}"))
            };
            z[j] = Some(id);
        }

        for j in 0..self.num_vars() {
            let mut expr = LinExpr::new();
            for (row, &yi) in self.rows.iter().zip(&y) {
                let a = row.coeffs[j];
                match row.sense {
                    Sense::Eq => expr.add_term(yi, -a),
                    _ => expr.add_term(yi, a),
                };
            }
            if let Some(zj) = z[j] {
                expr.add_term(zj, -1.0);
            }
            let sense = if self.nonnegative[j] { Sense::Ge } else { Sense::Eq };
            m.add_constraint(LinearConstraint::new(
                format!("DUAL_x{j}"),
                ConstraintKind::DualRow,
                Site::none(),
                expr,
                sense,
                -self.cost[j],
            ))?;
        }

        let z_ids: Vec<VarId> = z.iter().map(|v| v.unwrap_or(VarId::new(0))).collect();
        m.add_cone("CONE", ConstraintKind::Cone, self.cone_over(&z_ids))?;

        let mut objective = LinExpr::new();
        for (row, &yi) in self.rows.iter().zip(&y) {
            match row.sense {
                Sense::Eq => objective.add_term(yi, row.rhs),
                _ => objective.add_term(yi, -row.rhs),
            };
        }
        m.set_objective(objective, ObjectiveSense::Maximize);
        Ok(m)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row_terms(m: &Model, name: &str) -> (Vec<(String, f64)>, Sense, f64) {
        let row = m.constraint_by_name(name).unwrap();
        let terms = row
            .expr
            .terms()
            .map(|(v, c)| (m.var(v).unwrap().name.clone(), c))
            .collect();
        (terms, row.sense, row.rhs)
    }

    fn t(name: &str, c: f64) -> (String, f64) {
        (name.to_string(), c)
    }

    #[test]
    fn test_dual_objective() {
        let dual = SocpData::reference().dual_model().unwrap();
        assert_eq!(dual.sense(), ObjectiveSense::Maximize);
        let obj = dual.objective();
        let coef = |n: &str| obj.coefficient(dual.var_by_name(n).unwrap());
        assert_eq!(coef("y0"), -7.0);
        assert_eq!(coef("y1"), 4.0);
        assert_eq!(coef("y2"), -15.0);
    }

    #[test]
    fn test_dual_rows_match_hand_derivation() {
        let dual = SocpData::reference().dual_model().unwrap();
        assert_eq!(
            row_terms(&dual, "DUAL_x0"),
            (vec![t("y0", 1.0), t("y1", -2.0), t("y2", 1.0), t("z0", -1.0)], Sense::Ge, -2.0)
        );
        assert_eq!(
            row_terms(&dual, "DUAL_x1"),
            (vec![t("y1", 1.0), t("y2", 1.0), t("z1", -1.0)], Sense::Ge, -1.0)
        );
        assert_eq!(
            row_terms(&dual, "DUAL_x2"),
            (vec![t("y1", -1.0), t("z2", -1.0)], Sense::Eq, -1.0)
        );
        assert_eq!(
            row_terms(&dual, "DUAL_x3"),
            (vec![t("y1", -0.5), t("y2", -2.0), t("z3", -1.0)], Sense::Eq, 3.0)
        );
    }

    #[test]
    fn test_dual_variable_signs() {
        let dual = SocpData::reference().dual_model().unwrap();
        let lower = |n: &str| dual.var(dual.var_by_name(n).unwrap()).unwrap().lower;
        assert_eq!(lower("y0"), 0.0);
        assert_eq!(lower("y1"), f64::NEG_INFINITY);
        assert_eq!(lower("y2"), 0.0);
        assert_eq!(lower("z0"), 0.0);
        assert_eq!(lower("z1"), 0.0);
        assert_eq!(lower("z2"), f64::NEG_INFINITY);
        assert_eq!(lower("z3"), f64::NEG_INFINITY);
    }

    #[test]
    fn test_primal_is_strictly_feasible_at_known_point() {
        let primal = SocpData::reference().primal_model().unwrap();
        assert!(primal.check_assignment(&[2.0, 1.0, 1.0, 0.0], 1e-12).is_empty());
    }

    #[test]
    fn test_rejects_mismatched_rows() {
        let mut data = SocpData::reference();
        data.rows[0].coeffs.pop();
        assert!(data.primal_model().is_err());
    }
}
