//! Unit commitment case data
//!
//! A [`UcCase`] bundles every indexed parameter of a day-ahead study:
//!
//! ```text
//! hours      1..T                        planning horizon
//! generators limits, 4-block costs, min on/off, initial state, reserves
//! buses      hourly demand
//! lines      capacity + PTDF row over buses
//! system     hourly load, reserve margin, PFR/AGC requirements, damping
//! ```
//!
//! Hourly vectors are indexed `0..T` and correspond to hours `1..=T`.

use crate::error::{DaucError, DaucResult};
use crate::{BusId, GenId, LineId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Number of piecewise-linear cost segments per generator.
pub const BLOCK_COUNT: usize = 4;

/// Frequency-response and penalty parameters shared by the whole system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrequencyParams {
    /// Nominal frequency F0 (Hz)
    pub nominal_hz: f64,
    /// Maximum frequency deviation Δf_max (Hz)
    pub max_deviation_hz: f64,
    /// Time allowed to recover nominal frequency (min)
    pub recovery_time_min: f64,
    /// Penalty per MW of PFR shortfall
    pub pfr_penalty: f64,
    /// Penalty per MW of AGC shortfall
    pub agc_penalty: f64,
}

impl Default for FrequencyParams {
    fn default() -> Self {
        Self {
            nominal_hz: 60.0,
            max_deviation_hz: 0.2,
            recovery_time_min: 5.0,
            pfr_penalty: 30.0,
            agc_penalty: 30.0,
        }
    }
}

/// One segment of a piecewise-linear generation cost curve.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostBlock {
    /// Marginal cost of the segment ($/MWh)
    pub slope: f64,
    /// Width of the segment (MW)
    pub span_mw: f64,
}

impl CostBlock {
    pub fn new(slope: f64, span_mw: f64) -> Self {
        Self { slope, span_mw }
    }
}

/// Pre-horizon state of a generator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InitialCondition {
    /// Whether the unit is on when the horizon starts
    pub status: bool,
    /// Hours the unit has been in `status` before the horizon
    pub hours: u32,
    /// Output at the end of the pre-horizon hour (MW)
    pub power_mw: f64,
}

impl InitialCondition {
    pub fn online(hours: u32, power_mw: f64) -> Self {
        Self {
            status: true,
            hours,
            power_mw,
        }
    }

    pub fn offline(hours: u32) -> Self {
        Self {
            status: false,
            hours,
            power_mw: 0.0,
        }
    }

    /// Initial status as 0/1
    pub fn status_value(&self) -> f64 {
        if self.status {
            1.0
        } else {
            0.0
        }
    }
}

/// Linear capacity prices for frequency-response reserves ($/MW).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ReservePrices {
    pub pfr_up: f64,
    pub pfr_down: f64,
    pub agc_up: f64,
    pub agc_down: f64,
}

/// A thermal generating unit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Generator {
    pub id: GenId,
    pub name: String,
    /// Bus the unit injects into
    pub bus: BusId,
    /// Minimum stable output when committed (MW)
    pub pmin_mw: f64,
    /// Hourly maximum output (MW), one entry per hour
    pub pmax_mw: Vec<f64>,
    /// Piecewise-linear cost segments above `pmin_mw`
    pub blocks: [CostBlock; BLOCK_COUNT],
    pub startup_cost: f64,
    pub shutdown_cost: f64,
    /// Cost per committed hour
    pub no_load_cost: f64,
    /// Minimum up time (h); 0 disables the restriction
    pub min_on_hours: u32,
    /// Minimum down time (h); 0 disables the restriction
    pub min_off_hours: u32,
    pub initial: InitialCondition,
    /// Ramp rate (MW/min)
    pub ramp_rate_mw_per_min: f64,
    /// Equivalent governor droop constant
    pub droop: f64,
    /// Governor dead band (Hz)
    pub deadband_hz: f64,
    #[serde(default)]
    pub prices: ReservePrices,
}

impl Generator {
    /// Maximum output at hour index `t` (0-based)
    pub fn pmax_at(&self, t: usize) -> f64 {
        self.pmax_mw.get(t).copied().unwrap_or(0.0)
    }

    /// Allowed change in output between consecutive hours (MW/h)
    pub fn hourly_ramp_mw(&self) -> f64 {
        self.ramp_rate_mw_per_min * 60.0
    }

    /// Upper bound on positive PFR: `(Δf_max - deadband) / droop`.
    ///
    /// A dead band wider than the allowed deviation leaves no governor
    /// response, so the bound is clamped at zero.
    pub fn pfr_up_capacity(&self, max_deviation_hz: f64) -> f64 {
        if self.droop <= 0.0 {
            return 0.0;
        }
        ((max_deviation_hz - self.deadband_hz) / self.droop).max(0.0)
    }

    /// Upper bound on negative PFR. Regulation-down PFR is not offered.
    pub fn pfr_down_capacity(&self) -> f64 {
        0.0
    }

    /// Upper bound on AGC in either direction: ramp rate times recovery time.
    pub fn agc_capacity(&self, recovery_time_min: f64) -> f64 {
        self.ramp_rate_mw_per_min * recovery_time_min
    }

    /// Total width of the cost blocks (MW)
    pub fn total_span_mw(&self) -> f64 {
        self.blocks.iter().map(|b| b.span_mw).sum()
    }

    /// Whether block slopes are non-decreasing (convex cost curve)
    pub fn has_convex_cost(&self) -> bool {
        self.blocks.windows(2).all(|w| w[0].slope <= w[1].slope)
    }
}

/// A load bus.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bus {
    pub id: BusId,
    pub name: String,
    /// Hourly demand (MW)
    pub load_mw: Vec<f64>,
}

/// A monitored transmission line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Line {
    pub id: LineId,
    pub name: String,
    /// Thermal limit, applied symmetrically (MW)
    pub capacity_mw: f64,
    /// PTDF row, aligned with [`UcCase::buses`]
    pub ptdf: Vec<f64>,
}

/// Hourly system-wide requirements.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SystemProfile {
    /// System load (MW). When absent, the sum of bus loads is used.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_mw: Option<Vec<f64>>,
    /// Capacity margin above load (MW)
    pub reserve_mw: Vec<f64>,
    /// Load damping coefficient
    pub load_damping: Vec<f64>,
    pub pfr_up_mw: Vec<f64>,
    pub pfr_down_mw: Vec<f64>,
    pub agc_up_mw: Vec<f64>,
    pub agc_down_mw: Vec<f64>,
}

/// Non-fatal observation about case data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseWarning {
    pub subject: String,
    pub message: String,
}

/// Complete day-ahead unit commitment input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UcCase {
    pub name: String,
    /// Planning horizon length T (hours)
    pub hours: usize,
    #[serde(default)]
    pub frequency: FrequencyParams,
    pub generators: Vec<Generator>,
    pub buses: Vec<Bus>,
    #[serde(default)]
    pub lines: Vec<Line>,
    pub system: SystemProfile,
}

impl UcCase {
    /// Hours as the 1-based set `1..=T`
    pub fn hour_set(&self) -> std::ops::RangeInclusive<usize> {
        1..=self.hours
    }

    /// System load at hour index `t` (0-based)
    pub fn system_load(&self, t: usize) -> f64 {
        match &self.system.load_mw {
            Some(load) => load.get(t).copied().unwrap_or(0.0),
            None => self.buses.iter().map(|b| b.load_mw.get(t).copied().unwrap_or(0.0)).sum(),
        }
    }

    /// Position of a bus in [`UcCase::buses`] (and in every PTDF row)
    pub fn bus_index(&self, id: BusId) -> Option<usize> {
        self.buses.iter().position(|b| b.id == id)
    }

    pub fn generator(&self, id: GenId) -> Option<&Generator> {
        self.generators.iter().find(|g| g.id == id)
    }

    /// Frequency-damping credit at hour index `t`: `load · D · Δf_max / F0`.
    pub fn damping_credit(&self, t: usize) -> f64 {
        let damping = self.system.load_damping.get(t).copied().unwrap_or(0.0);
        if self.frequency.nominal_hz <= 0.0 {
            return 0.0;
        }
        self.system_load(t) * damping * self.frequency.max_deviation_hz
            / self.frequency.nominal_hz
    }

    /// Check index-set consistency.
    ///
    /// Structural problems (wrong vector lengths, dangling bus references,
    /// duplicate IDs) are errors. Data that is well-formed but suspicious
    /// (non-convex costs, inverted limits) is returned as warnings.
    pub fn validate(&self) -> DaucResult<Vec<CaseWarning>> {
        if self.hours == 0 {
            return Err(DaucError::Validation("planning horizon must be at least one hour".into()));
        }
        if self.generators.is_empty() {
            return Err(DaucError::Validation("case has no generators".into()));
        }

        let t = self.hours;
        let check_len = |what: &str, len: usize| -> DaucResult<()> {
            if len != t {
                return Err(DaucError::Validation(format!(
                    "{what} has {len} entries, expected {t}"
                )));
            }
            Ok(())
        };

        let mut bus_ids = HashSet::new();
        for bus in &self.buses {
            if !bus_ids.insert(bus.id) {
                return Err(DaucError::Validation(format!("duplicate bus id {}", bus.id)));
            }
            check_len(&format!("load of bus '{}'", bus.name), bus.load_mw.len())?;
        }

        let mut gen_ids = HashSet::new();
        let mut warnings = Vec::new();
        for gen in &self.generators {
            if !gen_ids.insert(gen.id) {
                return Err(DaucError::Validation(format!("duplicate generator id {}", gen.id)));
            }
            if !bus_ids.contains(&gen.bus) {
                return Err(DaucError::Validation(format!(
                    "generator '{}' references unknown bus {}",
                    gen.name, gen.bus
                )));
            }
            check_len(&format!("pmax of generator '{}'", gen.name), gen.pmax_mw.len())?;
            if gen.blocks.iter().any(|b| b.span_mw < 0.0) {
                return Err(DaucError::Validation(format!(
                    "generator '{}' has a negative block span",
                    gen.name
                )));
            }

            if !gen.has_convex_cost() {
                warnings.push(CaseWarning {
                    subject: gen.name.clone(),
                    message: "cost block slopes decrease; the cost curve is not convex".into(),
                });
            }
            if gen.pmax_mw.iter().any(|&p| p < gen.pmin_mw) {
                warnings.push(CaseWarning {
                    subject: gen.name.clone(),
                    message: "pmax below pmin in at least one hour".into(),
                });
            }
            if gen.droop <= 0.0 {
                warnings.push(CaseWarning {
                    subject: gen.name.clone(),
                    message: "non-positive droop; PFR capacity set to zero".into(),
                });
            } else if gen.deadband_hz > self.frequency.max_deviation_hz {
                warnings.push(CaseWarning {
                    subject: gen.name.clone(),
                    message: "dead band exceeds maximum frequency deviation; no PFR available"
                        .into(),
                });
            }
            if gen.initial.status && gen.initial.power_mw < gen.pmin_mw {
                warnings.push(CaseWarning {
                    subject: gen.name.clone(),
                    message: "initially on below pmin".into(),
                });
            }
        }

        let n_bus = self.buses.len();
        let mut line_ids = HashSet::new();
        for line in &self.lines {
            if !line_ids.insert(line.id) {
                return Err(DaucError::Validation(format!("duplicate line id {}", line.id)));
            }
            if line.ptdf.len() != n_bus {
                return Err(DaucError::Validation(format!(
                    "PTDF row of line '{}' has {} entries, expected {n_bus}",
                    line.name,
                    line.ptdf.len()
                )));
            }
            if line.capacity_mw < 0.0 {
                return Err(DaucError::Validation(format!(
                    "line '{}' has negative capacity",
                    line.name
                )));
            }
        }

        let sys = &self.system;
        if let Some(load) = &sys.load_mw {
            check_len("system load", load.len())?;
        }
        check_len("system reserve", sys.reserve_mw.len())?;
        check_len("load damping", sys.load_damping.len())?;
        check_len("PFR up requirement", sys.pfr_up_mw.len())?;
        check_len("PFR down requirement", sys.pfr_down_mw.len())?;
        check_len("AGC up requirement", sys.agc_up_mw.len())?;
        check_len("AGC down requirement", sys.agc_down_mw.len())?;

        if sys.load_mw.is_some() && !self.buses.is_empty() {
            for h in 0..t {
                let bus_total: f64 = self.buses.iter().map(|b| b.load_mw[h]).sum();
                if (bus_total - self.system_load(h)).abs() > 1e-6 {
                    warnings.push(CaseWarning {
                        subject: format!("hour {}", h + 1),
                        message: format!(
                            "system load {:.3} differs from bus total {:.3}",
                            self.system_load(h),
                            bus_total
                        ),
                    });
                }
            }
        }

        Ok(warnings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit(id: usize, bus: usize) -> Generator {
        Generator {
            id: GenId::new(id),
            name: format!("G{id}"),
            bus: BusId::new(bus),
            pmin_mw: 10.0,
            pmax_mw: vec![50.0, 50.0],
            blocks: [
                CostBlock::new(10.0, 10.0),
                CostBlock::new(11.0, 10.0),
                CostBlock::new(12.0, 10.0),
                CostBlock::new(13.0, 10.0),
            ],
            startup_cost: 100.0,
            shutdown_cost: 10.0,
            no_load_cost: 5.0,
            min_on_hours: 1,
            min_off_hours: 1,
            initial: InitialCondition::online(4, 20.0),
            ramp_rate_mw_per_min: 1.0,
            droop: 0.004,
            deadband_hz: 0.036,
            prices: ReservePrices::default(),
        }
    }

    fn two_hour_case() -> UcCase {
        UcCase {
            name: "tiny".into(),
            hours: 2,
            frequency: FrequencyParams::default(),
            generators: vec![unit(1, 1)],
            buses: vec![Bus {
                id: BusId::new(1),
                name: "B1".into(),
                load_mw: vec![20.0, 30.0],
            }],
            lines: vec![],
            system: SystemProfile {
                load_mw: None,
                reserve_mw: vec![0.0; 2],
                load_damping: vec![1.0; 2],
                pfr_up_mw: vec![0.0; 2],
                pfr_down_mw: vec![0.0; 2],
                agc_up_mw: vec![0.0; 2],
                agc_down_mw: vec![0.0; 2],
            },
        }
    }

    #[test]
    fn test_pfr_capacities() {
        let g = unit(1, 1);
        assert!((g.pfr_up_capacity(0.2) - (0.2 - 0.036) / 0.004).abs() < 1e-9);
        assert_eq!(g.pfr_down_capacity(), 0.0);
        assert_eq!(g.pfr_up_capacity(0.01), 0.0);
        assert_eq!(g.agc_capacity(5.0), 5.0);
        assert_eq!(g.hourly_ramp_mw(), 60.0);
    }

    #[test]
    fn test_system_load_defaults_to_bus_sum() {
        let mut case = two_hour_case();
        assert_eq!(case.system_load(1), 30.0);
        case.system.load_mw = Some(vec![25.0, 35.0]);
        assert_eq!(case.system_load(1), 35.0);
    }

    #[test]
    fn test_damping_credit() {
        let case = two_hour_case();
        let expected = 20.0 * 1.0 * 0.2 / 60.0;
        assert!((case.damping_credit(0) - expected).abs() < 1e-12);
    }

    #[test]
    fn test_validate_accepts_consistent_case() {
        let warnings = two_hour_case().validate().unwrap();
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_validate_rejects_short_vectors() {
        let mut case = two_hour_case();
        case.system.agc_up_mw = vec![0.0];
        let err = case.validate().unwrap_err();
        assert!(err.to_string().contains("AGC up requirement"));
    }

    #[test]
    fn test_validate_rejects_unknown_bus() {
        let mut case = two_hour_case();
        case.generators[0].bus = BusId::new(9);
        assert!(matches!(case.validate(), Err(DaucError::Validation(_))));
    }

    #[test]
    fn test_validate_warns_on_non_convex_cost() {
        let mut case = two_hour_case();
        case.generators[0].blocks[3].slope = 1.0;
        let warnings = case.validate().unwrap();
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("not convex"));
    }

    #[test]
    fn test_validate_rejects_bad_ptdf_row() {
        let mut case = two_hour_case();
        case.lines.push(Line {
            id: LineId::new(1),
            name: "L1".into(),
            capacity_mw: 10.0,
            ptdf: vec![0.5, 0.5],
        });
        assert!(case.validate().is_err());
    }
}
