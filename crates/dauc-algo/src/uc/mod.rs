//! Day-Ahead Unit Commitment (UC)
//!
//! Mixed-integer linear formulation of an hourly commitment and dispatch
//! problem with frequency-response reserves and PTDF transmission limits.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  DAY-AHEAD UNIT COMMITMENT                                               │
//! │  ─────────────────────────                                               │
//! │                                                                          │
//! │  Given:                                                                  │
//! │    • Thermal units with 4-block convex costs and min up/down times      │
//! │    • Hourly bus loads, reserve margins and PFR/AGC requirements         │
//! │    • PTDF rows of monitored lines                                       │
//! │                                                                          │
//! │  Decide, per unit and hour:                                              │
//! │    • on/off, start-up, shut-down (binary)                               │
//! │    • output split into cost blocks, PFR and AGC provision               │
//! │                                                                          │
//! │  Minimize:                                                               │
//! │    switching + no-load + energy + reserve cost + shortfall penalties    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Formulation
//!
//! ```text
//! P ≤ u·Pmax(t)        P ≥ u·Pmin        P = u·Pmin + Σ_k blk_k
//! |P(t) − P(t−1)| ≤ RR·60                       (P(0) = initial output)
//! su(t) − sd(t) = u(t) − u(t−1)                 (u(0) = initial status)
//! su(t) + sd(t) ≤ 1.0001
//! Σ_{window} u ≥ len·su(t)   Σ_{window} (1−u) ≥ len·sd(t)
//! P + pfr↑ ≤ u·Pmax          P − pfr↓ ≥ u·Pmin
//! P + pfr↑ + agc↑ ≤ u·Pmax   P − pfr↓ − agc↓ ≥ u·Pmin
//! −cap ≤ Σ_g PTDF·P_g − Σ_b PTDF·load_b ≤ cap
//! Σ P = load                 Σ u·Pmax ≥ load + reserve
//! Σ pfr↑ + short ≥ req↑ − load·D·Δf/F0   (same credit on the ↓ side)
//! Σ agc↑ + short ≥ req↑      Σ agc↓ + short ≥ req↓
//! ```
//!
//! Minimum up/down windows are truncated at the end of the horizon, and hours
//! still owed from before the horizon are fixed directly (see
//! [`InitialCommitment`]).

mod commitment;
mod formulation;
mod solution;
mod solver;
mod variables;

pub use commitment::{window, InitialCommitment};
pub use formulation::{UcFormulation, SWITCH_LIMIT};
pub use solution::{CostBreakdown, GeneratorSchedule, HourShortfall, UcSolution};
pub use solver::{solve_formulation, solve_uc};
pub use variables::{GenHourVars, HourSlacks, UcVariables};
