//! Variable handles and sparse affine expressions

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

/// Handle to a variable owned by a [`super::Model`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VarId(usize);

impl VarId {
    #[inline]
    pub fn new(index: usize) -> Self {
        VarId(index)
    }
    #[inline]
    pub fn index(&self) -> usize {
        self.0
    }
}

impl fmt::Display for VarId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "x{}", self.0)
    }
}

/// Affine expression `Σ coef·var + constant`.
///
/// Terms are kept in a `BTreeMap` so iteration order (and therefore LP output
/// and backend row assembly) is deterministic. Zero coefficients are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinExpr {
    terms: BTreeMap<VarId, f64>,
    constant: f64,
}

impl LinExpr {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn constant(value: f64) -> Self {
        Self {
            terms: BTreeMap::new(),
            constant: value,
        }
    }

    pub fn term(var: VarId, coef: f64) -> Self {
        let mut e = Self::new();
        e.add_term(var, coef);
        e
    }

    /// Sum of `coef·var` pairs
    pub fn from_terms(terms: impl IntoIterator<Item = (VarId, f64)>) -> Self {
        let mut e = Self::new();
        for (v, c) in terms {
            e.add_term(v, c);
        }
        e
    }

    /// Sum of variables with unit coefficients
    pub fn sum(vars: impl IntoIterator<Item = VarId>) -> Self {
        Self::from_terms(vars.into_iter().map(|v| (v, 1.0)))
    }

    pub fn add_term(&mut self, var: VarId, coef: f64) -> &mut Self {
        let entry = self.terms.entry(var).or_insert(0.0);
        *entry += coef;
        if *entry == 0.0 {
            self.terms.remove(&var);
        }
        self
    }

    pub fn add_constant(&mut self, value: f64) -> &mut Self {
        self.constant += value;
        self
    }

    pub fn terms(&self) -> impl Iterator<Item = (VarId, f64)> + '_ {
        self.terms.iter().map(|(&v, &c)| (v, c))
    }

    pub fn coefficient(&self, var: VarId) -> f64 {
        self.terms.get(&var).copied().unwrap_or(0.0)
    }

    pub fn constant_term(&self) -> f64 {
        self.constant
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Largest variable index referenced, if any
    pub fn max_var(&self) -> Option<VarId> {
        self.terms.keys().next_back().copied()
    }

    /// Evaluate against a dense value vector indexed by [`VarId::index`].
    /// Missing entries count as zero.
    pub fn evaluate(&self, values: &[f64]) -> f64 {
        self.terms
            .iter()
            .map(|(v, c)| c * values.get(v.index()).copied().unwrap_or(0.0))
            .sum::<f64>()
            + self.constant
    }

    /// Multiply every coefficient and the constant by `factor`
    pub fn scaled(mut self, factor: f64) -> Self {
        if factor == 0.0 {
            return Self::new();
        }
        for c in self.terms.values_mut() {
            *c *= factor;
        }
        self.constant *= factor;
        self
    }
}

impl From<VarId> for LinExpr {
    fn from(var: VarId) -> Self {
        LinExpr::term(var, 1.0)
    }
}

impl From<f64> for LinExpr {
    fn from(value: f64) -> Self {
        LinExpr::constant(value)
    }
}

impl<T: Into<LinExpr>> AddAssign<T> for LinExpr {
    fn add_assign(&mut self, rhs: T) {
        let rhs = rhs.into();
        for (v, c) in rhs.terms {
            self.add_term(v, c);
        }
        self.constant += rhs.constant;
    }
}

impl<T: Into<LinExpr>> SubAssign<T> for LinExpr {
    fn sub_assign(&mut self, rhs: T) {
        *self += rhs.into().scaled(-1.0);
    }
}

impl<T: Into<LinExpr>> Add<T> for LinExpr {
    type Output = LinExpr;
    fn add(mut self, rhs: T) -> LinExpr {
        self += rhs;
        self
    }
}

impl<T: Into<LinExpr>> Sub<T> for LinExpr {
    type Output = LinExpr;
    fn sub(mut self, rhs: T) -> LinExpr {
        self -= rhs;
        self
    }
}

impl Neg for LinExpr {
    type Output = LinExpr;
    fn neg(self) -> LinExpr {
        self.scaled(-1.0)
    }
}

impl Mul<f64> for LinExpr {
    type Output = LinExpr;
    fn mul(self, rhs: f64) -> LinExpr {
        self.scaled(rhs)
    }
}

impl Mul<VarId> for f64 {
    type Output = LinExpr;
    fn mul(self, rhs: VarId) -> LinExpr {
        LinExpr::term(rhs, self)
    }
}

impl<T: Into<LinExpr>> Add<T> for VarId {
    type Output = LinExpr;
    fn add(self, rhs: T) -> LinExpr {
        LinExpr::from(self) + rhs
    }
}

impl<T: Into<LinExpr>> Sub<T> for VarId {
    type Output = LinExpr;
    fn sub(self, rhs: T) -> LinExpr {
        LinExpr::from(self) - rhs
    }
}

impl std::iter::Sum for LinExpr {
    fn sum<I: Iterator<Item = LinExpr>>(iter: I) -> Self {
        let mut total = LinExpr::new();
        for e in iter {
            total += e;
        }
        total
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terms_merge_and_cancel() {
        let x = VarId::new(0);
        let y = VarId::new(1);
        let e = 2.0 * x + y - x - 1.0 * x;
        assert_eq!(e.coefficient(x), 0.0);
        assert_eq!(e.len(), 1);
        assert_eq!(e.coefficient(y), 1.0);
    }

    #[test]
    fn test_evaluate_with_constant() {
        let x = VarId::new(0);
        let y = VarId::new(2);
        let e = (3.0 * x + 2.0 * y) + 5.0;
        assert_eq!(e.evaluate(&[1.0, 100.0, 2.0]), 12.0);
        // missing entries are zero
        assert_eq!(e.evaluate(&[1.0]), 8.0);
    }

    #[test]
    fn test_sum_and_scale() {
        let vars = [VarId::new(0), VarId::new(1), VarId::new(2)];
        let e = LinExpr::sum(vars) * 2.0;
        assert_eq!(e.evaluate(&[1.0, 1.0, 1.0]), 6.0);
        assert_eq!(e.max_var(), Some(VarId::new(2)));
        let total: LinExpr = vars.iter().map(|&v| LinExpr::from(v)).sum();
        assert_eq!(total.len(), 3);
    }

    #[test]
    fn test_negation() {
        let x = VarId::new(0);
        let e = -(LinExpr::from(x) + 4.0);
        assert_eq!(e.coefficient(x), -1.0);
        assert_eq!(e.constant_term(), -4.0);
    }
}
