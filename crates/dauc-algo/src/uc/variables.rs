//! Decision variables of the unit commitment model

use dauc_core::{Model, UcCase, VarId, BLOCK_COUNT};
use tracing::warn;

/// Variables of one generator at one hour
#[derive(Debug, Clone, Copy)]
pub struct GenHourVars {
    pub onoff: VarId,
    pub startup: VarId,
    pub shutdown: VarId,
    pub power: VarId,
    pub blocks: [VarId; BLOCK_COUNT],
    pub pfr_up: VarId,
    pub pfr_down: VarId,
    pub agc_up: VarId,
    pub agc_down: VarId,
}

/// Reserve shortfall slacks of one hour
#[derive(Debug, Clone, Copy)]
pub struct HourSlacks {
    pub pfr_short_up: VarId,
    pub pfr_short_down: VarId,
    pub agc_short_up: VarId,
    pub agc_short_down: VarId,
}

/// Variable handles indexed as `gen[g][t]` and `hour[t]` (0-based)
#[derive(Debug, Clone)]
pub struct UcVariables {
    pub gen: Vec<Vec<GenHourVars>>,
    pub hour: Vec<HourSlacks>,
}

impl UcVariables {
    /// Create every variable of `case` in `model`
    pub fn create(model: &mut Model, case: &UcCase) -> Self {
        let inf = f64::INFINITY;
        let dev = case.frequency.max_deviation_hz;
        let rec = case.frequency.recovery_time_min;

        let gen = case
            .generators
            .iter()
            .map(|g| {
                let pfr_up_cap = g.pfr_up_capacity(dev);
                if g.droop > 0.0 && g.deadband_hz > dev {
                    warn!(
                        generator = %g.name,
                        deadband_hz = g.deadband_hz,
                        max_deviation_hz = dev,
                        "dead band exceeds maximum frequency deviation; PFR capacity clamped to 0"
                    );
                }
                let agc_cap = g.agc_capacity(rec);
                (1..=case.hours)
                    .map(|h| {
                        let n = |what: &str| format!("{what}_{}_{h}", g.name);
                        let blocks = std::array::from_fn(|k| {
                            model.add_continuous(n(&format!("block{}", k + 1)), 0.0, g.blocks[k].span_mw)
                        });
                        GenHourVars {
                            onoff: model.add_binary(n("onoff")),
                            startup: model.add_binary(n("startup")),
                            shutdown: model.add_binary(n("shutdown")),
                            power: model.add_continuous(n("power"), 0.0, inf),
                            blocks,
                            pfr_up: model.add_continuous(n("pfr_up"), 0.0, pfr_up_cap),
                            pfr_down: model.add_continuous(n("pfr_down"), 0.0, g.pfr_down_capacity()),
                            agc_up: model.add_continuous(n("agc_up"), 0.0, agc_cap),
                            agc_down: model.add_continuous(n("agc_down"), 0.0, agc_cap),
                        }
                    })
                    .collect()
            })
            .collect();

        let hour = (1..=case.hours)
            .map(|h| HourSlacks {
                pfr_short_up: model.add_continuous(format!("pfr_short_up_{h}"), 0.0, inf),
                pfr_short_down: model.add_continuous(format!("pfr_short_down_{h}"), 0.0, inf),
                agc_short_up: model.add_continuous(format!("agc_short_up_{h}"), 0.0, inf),
                agc_short_down: model.add_continuous(format!("agc_short_down_{h}"), 0.0, inf),
            })
            .collect();

        Self { gen, hour }
    }

    /// Variables of generator index `g` at 1-based `hour`
    pub fn at(&self, g: usize, hour: usize) -> &GenHourVars {
        &self.gen[g][hour - 1]
    }

    pub fn slacks(&self, hour: usize) -> &HourSlacks {
        &self.hour[hour - 1]
    }
}
