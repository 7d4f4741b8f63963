//! # dauc-core: Day-Ahead Unit Commitment Core
//!
//! Shared data structures for the unit commitment and conic duality models.
//!
//! ## Design Philosophy
//!
//! The crate separates *what the system looks like* from *how it is optimized*:
//!
//! - [`case`] holds the input data of a unit commitment study (generators,
//!   buses, lines, hourly system requirements).
//! - [`model`] is a solver-independent intermediate representation of a
//!   mathematical program. Formulations populate a [`Model`] and hand it,
//!   by value, to a backend in `dauc-algo`.
//! - [`solver`] carries the configuration and result types exchanged with
//!   backends.
//!
//! ```text
//! UcCase ──build──▶ Model ──solve──▶ ModelSolution
//!   (data)          (IR, tagged rows)  (status + values)
//! ```
//!
//! ## ID System
//!
//! Every element has a newtype ID wrapping a `usize`, so generator IDs cannot
//! be confused with bus or line IDs:
//! - [`GenId`], [`BusId`], [`LineId`]
//!
//! ## Modules
//!
//! - [`case`] - Unit commitment input data and derived quantities
//! - [`error`] - Unified [`DaucError`] type
//! - [`model`] - Variables, tagged constraints, cones, LP-format writer
//! - [`solver`] - Solver configuration, problem classes and solutions

use serde::{Deserialize, Serialize};
use std::fmt;

pub mod case;
pub mod error;
pub mod model;
pub mod solver;

pub use case::{
    Bus, CaseWarning, CostBlock, FrequencyParams, Generator, InitialCondition, Line, ReservePrices,
    SystemProfile, UcCase, BLOCK_COUNT,
};
pub use error::{DaucError, DaucResult};
pub use model::{
    ConeConstraint, ConeKind, ConstraintKind, LinExpr, LinearConstraint, Model, ObjectiveSense,
    Sense, Site, VarDef, VarDomain, VarId, Violation, ViolationType,
};
pub use solver::{
    MilpSolverKind, ModelSolution, ProblemClass, SolveStatus, SolverConfig,
};

// Newtype wrappers for IDs for type safety
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GenId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BusId(usize);
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LineId(usize);

impl GenId {
    #[inline]
    pub fn new(value: usize) -> Self {
        GenId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl BusId {
    #[inline]
    pub fn new(value: usize) -> Self {
        BusId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl LineId {
    #[inline]
    pub fn new(value: usize) -> Self {
        LineId(value)
    }
    #[inline]
    pub fn value(&self) -> usize {
        self.0
    }
}

impl fmt::Display for GenId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Gen#{}", self.0)
    }
}

impl fmt::Display for BusId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Bus#{}", self.0)
    }
}

impl fmt::Display for LineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Line#{}", self.0)
    }
}
