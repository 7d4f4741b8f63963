//! Unit commitment solution types

use std::time::Duration;

use dauc_core::{GenId, ModelSolution, SolveStatus, UcCase, VarId, BLOCK_COUNT};
use serde::{Deserialize, Serialize};

use super::variables::UcVariables;

/// Hourly decisions of one generator. Vectors are indexed by hour `0..T`.
///
/// Commitment values are kept as reported by the solver so a relaxed solve
/// shows its fractional decisions; use [`GeneratorSchedule::is_on`] for the
/// rounded state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneratorSchedule {
    pub id: GenId,
    pub name: String,
    pub onoff: Vec<f64>,
    pub startup: Vec<f64>,
    pub shutdown: Vec<f64>,
    pub power_mw: Vec<f64>,
    pub blocks_mw: Vec<[f64; BLOCK_COUNT]>,
    pub pfr_up_mw: Vec<f64>,
    pub pfr_down_mw: Vec<f64>,
    pub agc_up_mw: Vec<f64>,
    pub agc_down_mw: Vec<f64>,
}

impl GeneratorSchedule {
    /// Rounded commitment at 1-based `hour`
    pub fn is_on(&self, hour: usize) -> bool {
        hour.checked_sub(1)
            .and_then(|t| self.onoff.get(t))
            .is_some_and(|&u| u >= 0.5)
    }

    pub fn startups(&self) -> usize {
        self.startup.iter().filter(|&&s| s >= 0.5).count()
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdown.iter().filter(|&&s| s >= 0.5).count()
    }

    pub fn energy_mwh(&self) -> f64 {
        self.power_mw.iter().sum()
    }
}

/// Reserve shortfalls of one hour (MW)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourShortfall {
    pub hour: usize,
    pub pfr_up: f64,
    pub pfr_down: f64,
    pub agc_up: f64,
    pub agc_down: f64,
}

impl HourShortfall {
    pub fn total(&self) -> f64 {
        self.pfr_up + self.pfr_down + self.agc_up + self.agc_down
    }
}

/// Objective recomputed term by term from a schedule
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub startup: f64,
    pub shutdown: f64,
    pub no_load: f64,
    pub energy: f64,
    pub reserve_capacity: f64,
    pub pfr_penalty: f64,
    pub agc_penalty: f64,
}

impl CostBreakdown {
    pub fn total(&self) -> f64 {
        self.startup
            + self.shutdown
            + self.no_load
            + self.energy
            + self.reserve_capacity
            + self.pfr_penalty
            + self.agc_penalty
    }
}

/// Result of a unit commitment solve
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UcSolution {
    pub case: String,
    pub status: SolveStatus,
    pub objective: Option<f64>,
    pub schedules: Vec<GeneratorSchedule>,
    pub shortfalls: Vec<HourShortfall>,
    pub solve_time: Duration,
    pub backend: String,
    /// False when integrality was relaxed
    pub exact: bool,
}

impl UcSolution {
    /// Map raw model values back onto generators and hours
    pub fn from_model(
        case: &UcCase,
        vars: &UcVariables,
        raw: &ModelSolution,
        exact: bool,
    ) -> Self {
        let val = |v: VarId| raw.value(v).unwrap_or(0.0);
        let optimal = raw.status.is_optimal();

        let schedules = if optimal {
            case.generators
                .iter()
                .enumerate()
                .map(|(g, gen)| {
                    let per_hour = &vars.gen[g];
                    GeneratorSchedule {
                        id: gen.id,
                        name: gen.name.clone(),
                        onoff: per_hour.iter().map(|v| val(v.onoff)).collect(),
                        startup: per_hour.iter().map(|v| val(v.startup)).collect(),
                        shutdown: per_hour.iter().map(|v| val(v.shutdown)).collect(),
                        power_mw: per_hour.iter().map(|v| val(v.power)).collect(),
                        blocks_mw: per_hour.iter().map(|v| v.blocks.map(val)).collect(),
                        pfr_up_mw: per_hour.iter().map(|v| val(v.pfr_up)).collect(),
                        pfr_down_mw: per_hour.iter().map(|v| val(v.pfr_down)).collect(),
                        agc_up_mw: per_hour.iter().map(|v| val(v.agc_up)).collect(),
                        agc_down_mw: per_hour.iter().map(|v| val(v.agc_down)).collect(),
                    }
                })
                .collect()
        } else {
            Vec::new()
        };

        let shortfalls = if optimal {
            vars.hour
                .iter()
                .enumerate()
                .map(|(t, s)| HourShortfall {
                    hour: t + 1,
                    pfr_up: val(s.pfr_short_up),
                    pfr_down: val(s.pfr_short_down),
                    agc_up: val(s.agc_short_up),
                    agc_down: val(s.agc_short_down),
                })
                .collect()
        } else {
            Vec::new()
        };

        Self {
            case: case.name.clone(),
            status: raw.status,
            objective: raw.objective,
            schedules,
            shortfalls,
            solve_time: Duration::from_millis(raw.solve_time_ms as u64),
            backend: raw.backend.clone(),
            exact,
        }
    }

    pub fn is_optimal(&self) -> bool {
        self.status.is_optimal()
    }

    pub fn schedule(&self, id: GenId) -> Option<&GeneratorSchedule> {
        self.schedules.iter().find(|s| s.id == id)
    }

    /// Total output at 1-based `hour` (MW)
    pub fn total_generation(&self, hour: usize) -> f64 {
        self.schedules
            .iter()
            .filter_map(|s| hour.checked_sub(1).and_then(|t| s.power_mw.get(t)))
            .sum()
    }

    /// Committed units at 1-based `hour`
    pub fn committed_units(&self, hour: usize) -> usize {
        self.schedules.iter().filter(|s| s.is_on(hour)).count()
    }

    /// Recompute the objective of these decisions under `case`'s costs.
    ///
    /// Decisions are held fixed, so raising any cost coefficient in `case`
    /// can only raise the total.
    pub fn evaluate_cost(&self, case: &UcCase) -> CostBreakdown {
        let mut cost = CostBreakdown::default();
        for sched in &self.schedules {
            let Some(gen) = case.generator(sched.id) else {
                continue;
            };
            cost.startup += gen.startup_cost * sched.startup.iter().sum::<f64>();
            cost.shutdown += gen.shutdown_cost * sched.shutdown.iter().sum::<f64>();
            cost.no_load += gen.no_load_cost * sched.onoff.iter().sum::<f64>();
            for blocks in &sched.blocks_mw {
                cost.energy += blocks
                    .iter()
                    .zip(&gen.blocks)
                    .map(|(mw, b)| mw * b.slope)
                    .sum::<f64>();
            }
            cost.reserve_capacity += gen.prices.pfr_up * sched.pfr_up_mw.iter().sum::<f64>()
                + gen.prices.pfr_down * sched.pfr_down_mw.iter().sum::<f64>()
                + gen.prices.agc_up * sched.agc_up_mw.iter().sum::<f64>()
                + gen.prices.agc_down * sched.agc_down_mw.iter().sum::<f64>();
        }
        for s in &self.shortfalls {
            cost.pfr_penalty += case.frequency.pfr_penalty * (s.pfr_up + s.pfr_down);
            cost.agc_penalty += case.frequency.agc_penalty * (s.agc_up + s.agc_down);
        }
        cost
    }

    pub fn summary(&self) -> String {
        let mut s = String::new();
        s.push_str(&format!("Unit Commitment Summary: {}\n{}\n", self.case, "=".repeat(40)));
        s.push_str(&format!("Status: {}\n", self.status));
        if !self.exact {
            s.push_str("Note: integrality relaxed (LP bound)\n");
        }
        if let Some(obj) = self.objective {
            s.push_str(&format!("Total Cost: ${:.2}\n", obj));
        }
        s.push_str(&format!("Backend: {}\n", self.backend));
        s.push_str(&format!("Solve Time: {:.2?}\n", self.solve_time));
        if self.schedules.is_empty() {
            return s;
        }

        let hours = self.schedules[0].power_mw.len();
        s.push_str("\nGeneration by hour:\n");
        for h in 1..=hours {
            s.push_str(&format!(
                "  h{:<3} {:>10.2} MW  ({} units on)\n",
                h,
                self.total_generation(h),
                self.committed_units(h)
            ));
        }
        s.push_str("\nUnits:\n");
        for sched in &self.schedules {
            s.push_str(&format!(
                "  {:<12} {:>10.2} MWh  starts {}  stops {}\n",
                sched.name,
                sched.energy_mwh(),
                sched.startups(),
                sched.shutdowns()
            ));
        }
        let short: f64 = self.shortfalls.iter().map(HourShortfall::total).sum();
        if short > 1e-6 {
            s.push_str(&format!("\nReserve shortfall: {:.2} MW-h\n", short));
        }
        s
    }
}
