use std::fmt;

use serde::{Deserialize, Serialize};

use super::expr::{LinExpr, VarId};
use crate::{GenId, LineId};

/// Row direction: `expr <sense> rhs`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Sense {
    Le,
    Ge,
    Eq,
}

impl Sense {
    pub fn symbol(&self) -> &'static str {
        match self {
            Sense::Le => "<=",
            Sense::Ge => ">=",
            Sense::Eq => "=",
        }
    }

    /// Signed violation of `lhs <sense> rhs` (0 when satisfied)
    pub fn violation(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Sense::Le => (lhs - rhs).max(0.0),
            Sense::Ge => (rhs - lhs).max(0.0),
            Sense::Eq => (lhs - rhs).abs(),
        }
    }
}

/// Family a constraint row belongs to.
///
/// Unit commitment rows carry one of the specific kinds; generic programs
/// (such as the conic duality pair) use `Inequality`, `Equality`, `DualRow`
/// and `Cone`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ConstraintKind {
    GenCapUpper,
    GenCapLower,
    PowerBlocks,
    RampUp,
    RampDown,
    StartShutLogic,
    NoSimultaneousSwitch,
    MinOnForced,
    MinOffForced,
    MinOnWindow,
    MinOffWindow,
    PfrHeadroomUp,
    PfrHeadroomDown,
    ReserveHeadroomUp,
    ReserveHeadroomDown,
    LineFlowForward,
    LineFlowReverse,
    LoadBalance,
    SystemReserve,
    PfrUpRequirement,
    PfrDownRequirement,
    AgcUpRequirement,
    AgcDownRequirement,
    Inequality,
    Equality,
    DualRow,
    Cone,
}

impl ConstraintKind {
    /// Short label used as a row-name prefix in LP output
    pub fn label(&self) -> &'static str {
        match self {
            ConstraintKind::GenCapUpper => "cap_up",
            ConstraintKind::GenCapLower => "cap_lo",
            ConstraintKind::PowerBlocks => "blocks",
            ConstraintKind::RampUp => "ramp_up",
            ConstraintKind::RampDown => "ramp_dn",
            ConstraintKind::StartShutLogic => "su_sd",
            ConstraintKind::NoSimultaneousSwitch => "su_sd_excl",
            ConstraintKind::MinOnForced => "minon_forced",
            ConstraintKind::MinOffForced => "minoff_forced",
            ConstraintKind::MinOnWindow => "minon",
            ConstraintKind::MinOffWindow => "minoff",
            ConstraintKind::PfrHeadroomUp => "pfr_up_hr",
            ConstraintKind::PfrHeadroomDown => "pfr_dn_hr",
            ConstraintKind::ReserveHeadroomUp => "rsv_up_hr",
            ConstraintKind::ReserveHeadroomDown => "rsv_dn_hr",
            ConstraintKind::LineFlowForward => "flow_fwd",
            ConstraintKind::LineFlowReverse => "flow_rev",
            ConstraintKind::LoadBalance => "balance",
            ConstraintKind::SystemReserve => "reserve",
            ConstraintKind::PfrUpRequirement => "pfr_up_req",
            ConstraintKind::PfrDownRequirement => "pfr_dn_req",
            ConstraintKind::AgcUpRequirement => "agc_up_req",
            ConstraintKind::AgcDownRequirement => "agc_dn_req",
            ConstraintKind::Inequality => "ineq",
            ConstraintKind::Equality => "eq",
            ConstraintKind::DualRow => "dual",
            ConstraintKind::Cone => "cone",
        }
    }
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Index cell a row was generated for. Hours are 1-based.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Site {
    pub gen: Option<GenId>,
    pub line: Option<LineId>,
    pub hour: Option<usize>,
}

impl Site {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn gen_hour(gen: GenId, hour: usize) -> Self {
        Self {
            gen: Some(gen),
            line: None,
            hour: Some(hour),
        }
    }

    pub fn line_hour(line: LineId, hour: usize) -> Self {
        Self {
            gen: None,
            line: Some(line),
            hour: Some(hour),
        }
    }

    pub fn hour(hour: usize) -> Self {
        Self {
            gen: None,
            line: None,
            hour: Some(hour),
        }
    }
}

/// A linear row `expr <sense> rhs`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub site: Site,
    pub expr: LinExpr,
    pub sense: Sense,
    pub rhs: f64,
}

impl LinearConstraint {
    /// Constraint with any constant in `expr` moved to the right-hand side
    pub fn new(
        name: impl Into<String>,
        kind: ConstraintKind,
        site: Site,
        expr: LinExpr,
        sense: Sense,
        rhs: f64,
    ) -> Self {
        let constant = expr.constant_term();
        let expr = if constant != 0.0 {
            expr - constant
        } else {
            expr
        };
        Self {
            name: name.into(),
            kind,
            site,
            expr,
            sense,
            rhs: rhs - constant,
        }
    }

    pub fn lhs(&self, values: &[f64]) -> f64 {
        self.expr.evaluate(values)
    }

    pub fn violation(&self, values: &[f64]) -> f64 {
        self.sense.violation(self.lhs(values), self.rhs)
    }
}

/// Cone shapes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConeKind {
    /// `t ≥ ‖xs‖₂`, `t ≥ 0`
    Quadratic { t: VarId, xs: Vec<VarId> },
    /// `2·u·v ≥ ‖xs‖₂²`, `u, v ≥ 0`
    RotatedQuadratic { u: VarId, v: VarId, xs: Vec<VarId> },
}

impl ConeKind {
    /// Variables in cone order (head first)
    pub fn members(&self) -> Vec<VarId> {
        match self {
            ConeKind::Quadratic { t, xs } => std::iter::once(*t).chain(xs.iter().copied()).collect(),
            ConeKind::RotatedQuadratic { u, v, xs } => {
                [*u, *v].into_iter().chain(xs.iter().copied()).collect()
            }
        }
    }

    /// Amount by which `values` leave the cone (0 inside)
    pub fn violation(&self, values: &[f64]) -> f64 {
        let val = |v: &VarId| values.get(v.index()).copied().unwrap_or(0.0);
        let sq: f64 = match self {
            ConeKind::Quadratic { xs, .. } | ConeKind::RotatedQuadratic { xs, .. } => {
                xs.iter().map(|x| val(x).powi(2)).sum()
            }
        };
        match self {
            ConeKind::Quadratic { t, .. } => {
                let t = val(t);
                (sq.sqrt() - t).max(-t).max(0.0)
            }
            ConeKind::RotatedQuadratic { u, v, .. } => {
                let (u, v) = (val(u), val(v));
                (sq - 2.0 * u * v).max(-u).max(-v).max(0.0)
            }
        }
    }
}

/// A named second-order cone membership row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConeConstraint {
    pub name: String,
    pub kind: ConstraintKind,
    pub cone: ConeKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constant_moves_to_rhs() {
        let x = VarId::new(0);
        let c = LinearConstraint::new(
            "r",
            ConstraintKind::Inequality,
            Site::none(),
            LinExpr::from(x) + 3.0,
            Sense::Le,
            10.0,
        );
        assert_eq!(c.rhs, 7.0);
        assert_eq!(c.expr.constant_term(), 0.0);
        assert_eq!(c.violation(&[8.0]), 1.0);
        assert_eq!(c.violation(&[6.0]), 0.0);
    }

    #[test]
    fn test_rotated_cone_violation() {
        let cone = ConeKind::RotatedQuadratic {
            u: VarId::new(0),
            v: VarId::new(1),
            xs: vec![VarId::new(2), VarId::new(3)],
        };
        // 2*2*1 = 4 >= 1 + 0
        assert_eq!(cone.violation(&[2.0, 1.0, 1.0, 0.0]), 0.0);
        // 2*1*1 = 2 < 4 + 1
        assert!((cone.violation(&[1.0, 1.0, 2.0, 1.0]) - 3.0).abs() < 1e-12);
        assert_eq!(cone.members().len(), 4);
    }

    #[test]
    fn test_quadratic_cone_violation() {
        let cone = ConeKind::Quadratic {
            t: VarId::new(0),
            xs: vec![VarId::new(1), VarId::new(2)],
        };
        assert_eq!(cone.violation(&[5.0, 3.0, 4.0]), 0.0);
        assert!((cone.violation(&[4.0, 3.0, 4.0]) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kind_labels_unique() {
        use std::collections::HashSet;
        let kinds = [
            ConstraintKind::GenCapUpper,
            ConstraintKind::MinOnWindow,
            ConstraintKind::MinOnForced,
            ConstraintKind::LineFlowForward,
            ConstraintKind::LineFlowReverse,
            ConstraintKind::DualRow,
        ];
        let labels: HashSet<_> = kinds.iter().map(|k| k.label()).collect();
        assert_eq!(labels.len(), kinds.len());
    }
}
