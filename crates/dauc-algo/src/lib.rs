//! # dauc-algo: Unit Commitment and Conic Duality Models
//!
//! This crate turns input data into [`dauc_core::Model`]s and solves them.
//!
//! | Module | Model | Problem Class |
//! |--------|-------|---------------|
//! | [`uc`] | Day-ahead unit commitment with PFR/AGC reserves and PTDF limits | MILP |
//! | [`socp`] | Four-variable second-order cone program and its dual | SOCP |
//!
//! ### Architecture
//!
//! Formulations and solvers are separate:
//!
//! - **Formulations** ([`uc::UcFormulation`], [`socp::SocpData`]) build a model
//!   with tagged rows and hand it over by value.
//! - **Backends** ([`backends::ModelBackend`]) solve a model. [`backends::solve_model`]
//!   picks one by [`dauc_core::ProblemClass`]: good_lp (microlp, HiGHS or a
//!   Clarabel relaxation) for MILP, Clarabel directly for LP and SOCP.
//!
//! ## Example
//!
//! ```ignore
//! use dauc_algo::{socp::{check_duality, SocpData}, uc::solve_uc};
//! use dauc_core::SolverConfig;
//!
//! let config = SolverConfig::default();
//! let uc = solve_uc(&case, &config)?;
//! println!("{}", uc.summary());
//!
//! let report = check_duality(&SocpData::reference(), &config)?;
//! assert!(report.strong_holds);
//! ```

pub mod backends;
pub mod socp;
pub mod test_utils;
pub mod uc;

pub use backends::{solve_model, ModelBackend};
pub use socp::{check_duality, DualityReport, SocpData};
pub use uc::{solve_uc, UcFormulation, UcSolution};
