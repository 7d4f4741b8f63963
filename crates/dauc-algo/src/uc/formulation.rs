//! Constraint generation for the unit commitment MILP

use dauc_core::{
    ConstraintKind, DaucError, DaucResult, Generator, LinExpr, LinearConstraint, Model,
    ObjectiveSense, Sense, Site, UcCase, VarId,
};
use tracing::{debug, warn};

use super::commitment::{window, InitialCommitment};
use super::variables::{GenHourVars, UcVariables};

/// Relaxed right-hand side of `startup + shutdown ≤ 1`
pub const SWITCH_LIMIT: f64 = 1.0001;

/// A built unit commitment model together with its variable handles.
#[derive(Debug, Clone)]
pub struct UcFormulation {
    model: Model,
    vars: UcVariables,
    commitments: Vec<InitialCommitment>,
}

impl UcFormulation {
    /// Validate `case` and generate the full model.
    pub fn build(case: &UcCase) -> DaucResult<Self> {
        for w in case.validate()? {
            warn!(subject = %w.subject, "{}", w.message);
        }

        let mut model = Model::new(format!("uc_{}", case.name));
        let vars = UcVariables::create(&mut model, case);
        let commitments: Vec<InitialCommitment> =
            case.generators.iter().map(InitialCommitment::of).collect();

        let mut b = Builder {
            model: &mut model,
            case,
            vars: &vars,
        };
        for (g, gen) in case.generators.iter().enumerate() {
            b.dispatch(g, gen)?;
            b.ramping(g, gen)?;
            b.commitment_logic(g, gen)?;
            b.min_up_down(g, gen, commitments[g])?;
            b.frequency_headroom(g, gen)?;
        }
        b.transmission()?;
        b.system()?;
        b.objective();

        debug!(
            case = %case.name,
            vars = model.num_vars(),
            binaries = model.num_integer_vars(),
            rows = model.constraints().len(),
            "built unit commitment model"
        );
        Ok(Self {
            model,
            vars,
            commitments,
        })
    }

    pub fn model(&self) -> &Model {
        &self.model
    }

    pub fn variables(&self) -> &UcVariables {
        &self.vars
    }

    /// Initial commitment state of generator index `g`
    pub fn initial_commitment(&self, g: usize) -> Option<InitialCommitment> {
        self.commitments.get(g).copied()
    }

    pub fn into_parts(self) -> (Model, UcVariables) {
        (self.model, self.vars)
    }
}

struct Builder<'a> {
    model: &'a mut Model,
    case: &'a UcCase,
    vars: &'a UcVariables,
}

impl Builder<'_> {
    fn row(
        &mut self,
        kind: ConstraintKind,
        site: Site,
        expr: LinExpr,
        sense: Sense,
        rhs: f64,
    ) -> DaucResult<()> {
        let name = row_name(self.case, kind, site);
        self.model
            .add_constraint(LinearConstraint::new(name, kind, site, expr, sense, rhs))
            .map(|_| ())
    }

    fn dispatch(&mut self, g: usize, gen: &Generator) -> DaucResult<()> {
        for h in self.case.hour_set() {
            let v = *self.vars.at(g, h);
            let site = Site::gen_hour(gen.id, h);
            let pmax = gen.pmax_at(h - 1);

            self.row(ConstraintKind::GenCapUpper, site, v.power - pmax * v.onoff, Sense::Le, 0.0)?;
            self.row(ConstraintKind::GenCapLower, site, v.power - gen.pmin_mw * v.onoff, Sense::Ge, 0.0)?;
            let blocks = v.power - gen.pmin_mw * v.onoff - LinExpr::sum(v.blocks);
            self.row(ConstraintKind::PowerBlocks, site, blocks, Sense::Eq, 0.0)?;
        }
        Ok(())
    }

    fn ramping(&mut self, g: usize, gen: &Generator) -> DaucResult<()> {
        let ramp = gen.hourly_ramp_mw();
        for h in self.case.hour_set() {
            let site = Site::gen_hour(gen.id, h);
            let p = self.vars.at(g, h).power;
            let delta = if h == 1 {
                LinExpr::from(p) - gen.initial.power_mw
            } else {
                p - self.vars.at(g, h - 1).power
            };
            self.row(ConstraintKind::RampUp, site, delta.clone(), Sense::Le, ramp)?;
            self.row(ConstraintKind::RampDown, site, delta, Sense::Ge, -ramp)?;
        }
        Ok(())
    }

    fn commitment_logic(&mut self, g: usize, gen: &Generator) -> DaucResult<()> {
        for h in self.case.hour_set() {
            let v = *self.vars.at(g, h);
            let site = Site::gen_hour(gen.id, h);
            let previous = if h == 1 {
                LinExpr::constant(gen.initial.status_value())
            } else {
                LinExpr::from(self.vars.at(g, h - 1).onoff)
            };
            let logic = v.startup - v.shutdown - v.onoff + previous;
            self.row(ConstraintKind::StartShutLogic, site, logic, Sense::Eq, 0.0)?;
            self.row(
                ConstraintKind::NoSimultaneousSwitch,
                site,
                v.startup + v.shutdown,
                Sense::Le,
                SWITCH_LIMIT,
            )?;
        }
        Ok(())
    }

    fn min_up_down(&mut self, g: usize, gen: &Generator, state: InitialCommitment) -> DaucResult<()> {
        let horizon = self.case.hours;
        for h in self.case.hour_set() {
            let v = *self.vars.at(g, h);
            let site = Site::gen_hour(gen.id, h);

            match state.forced_at(h) {
                Some(true) => {
                    self.row(ConstraintKind::MinOnForced, site, v.onoff.into(), Sense::Eq, 1.0)?;
                    continue;
                }
                Some(false) => {
                    self.row(ConstraintKind::MinOffForced, site, v.onoff.into(), Sense::Eq, 0.0)?;
                    continue;
                }
                None => {}
            }

            if gen.min_on_hours >= 1 {
                let (first, last) = window(h, gen.min_on_hours, horizon);
                let len = (last - first + 1) as f64;
                let on: LinExpr = LinExpr::sum((first..=last).map(|t| self.vars.at(g, t).onoff));
                self.row(
                    ConstraintKind::MinOnWindow,
                    site,
                    on - len * v.startup,
                    Sense::Ge,
                    0.0,
                )?;
            }
            if gen.min_off_hours >= 1 {
                let (first, last) = window(h, gen.min_off_hours, horizon);
                let len = (last - first + 1) as f64;
                // Σ (1 - u) ≥ len·sd  ⇔  -Σ u - len·sd ≥ -len
                let on: LinExpr = LinExpr::sum((first..=last).map(|t| self.vars.at(g, t).onoff));
                self.row(
                    ConstraintKind::MinOffWindow,
                    site,
                    -on - len * v.shutdown,
                    Sense::Ge,
                    -len,
                )?;
            }
        }
        Ok(())
    }

    fn frequency_headroom(&mut self, g: usize, gen: &Generator) -> DaucResult<()> {
        for h in self.case.hour_set() {
            let v = *self.vars.at(g, h);
            let site = Site::gen_hour(gen.id, h);
            let upper = LinExpr::term(v.onoff, -gen.pmax_at(h - 1));
            let lower = LinExpr::term(v.onoff, -gen.pmin_mw);

            self.row(
                ConstraintKind::PfrHeadroomUp,
                site,
                v.power + v.pfr_up + upper.clone(),
                Sense::Le,
                0.0,
            )?;
            self.row(
                ConstraintKind::PfrHeadroomDown,
                site,
                v.power - v.pfr_down + lower.clone(),
                Sense::Ge,
                0.0,
            )?;
            self.row(
                ConstraintKind::ReserveHeadroomUp,
                site,
                v.power + v.pfr_up + v.agc_up + upper,
                Sense::Le,
                0.0,
            )?;
            self.row(
                ConstraintKind::ReserveHeadroomDown,
                site,
                v.power - v.pfr_down - v.agc_down + lower,
                Sense::Ge,
                0.0,
            )?;
        }
        Ok(())
    }

    fn transmission(&mut self) -> DaucResult<()> {
        let case = self.case;
        let gen_bus: Vec<usize> = case
            .generators
            .iter()
            .map(|gen| {
                case.bus_index(gen.bus).ok_or_else(|| {
                    DaucError::Validation(format!("generator '{}' has no bus", gen.name))
                })
            })
            .collect::<DaucResult<_>>()?;

        for line in &case.lines {
            for h in case.hour_set() {
                let site = Site::line_hour(line.id, h);
                let mut flow = LinExpr::new();
                for (g, &bus) in gen_bus.iter().enumerate() {
                    flow.add_term(self.vars.at(g, h).power, line.ptdf[bus]);
                }
                let load_flow: f64 = case
                    .buses
                    .iter()
                    .zip(&line.ptdf)
                    .map(|(bus, f)| f * bus.load_mw[h - 1])
                    .sum();
                flow.add_constant(-load_flow);

                self.row(ConstraintKind::LineFlowForward, site, flow.clone(), Sense::Le, line.capacity_mw)?;
                self.row(ConstraintKind::LineFlowReverse, site, flow, Sense::Ge, -line.capacity_mw)?;
            }
        }
        Ok(())
    }

    fn system(&mut self) -> DaucResult<()> {
        let case = self.case;
        let vars = self.vars;
        let sys = &case.system;
        let n_gen = case.generators.len();
        for h in case.hour_set() {
            let t = h - 1;
            let site = Site::hour(h);
            let load = case.system_load(t);
            let credit = case.damping_credit(t);
            let slack = *vars.slacks(h);
            let over_gens = |pick: fn(&GenHourVars) -> VarId| -> LinExpr {
                LinExpr::sum((0..n_gen).map(|g| pick(vars.at(g, h))))
            };

            self.row(ConstraintKind::LoadBalance, site, over_gens(|v| v.power), Sense::Eq, load)?;

            let capacity = LinExpr::from_terms(
                case.generators
                    .iter()
                    .enumerate()
                    .map(|(g, gen)| (vars.at(g, h).onoff, gen.pmax_at(t))),
            );
            self.row(
                ConstraintKind::SystemReserve,
                site,
                capacity,
                Sense::Ge,
                load + sys.reserve_mw[t],
            )?;

            self.row(
                ConstraintKind::PfrUpRequirement,
                site,
                over_gens(|v| v.pfr_up) + slack.pfr_short_up,
                Sense::Ge,
                sys.pfr_up_mw[t] - credit,
            )?;
            self.row(
                ConstraintKind::PfrDownRequirement,
                site,
                over_gens(|v| v.pfr_down) + slack.pfr_short_down,
                Sense::Ge,
                sys.pfr_down_mw[t] - credit,
            )?;
            self.row(
                ConstraintKind::AgcUpRequirement,
                site,
                over_gens(|v| v.agc_up) + slack.agc_short_up,
                Sense::Ge,
                sys.agc_up_mw[t],
            )?;
            self.row(
                ConstraintKind::AgcDownRequirement,
                site,
                over_gens(|v| v.agc_down) + slack.agc_short_down,
                Sense::Ge,
                sys.agc_down_mw[t],
            )?;
        }
        Ok(())
    }

    fn objective(&mut self) {
        let case = self.case;
        let mut cost = LinExpr::new();
        for (g, gen) in case.generators.iter().enumerate() {
            for h in case.hour_set() {
                let v = self.vars.at(g, h);
                cost.add_term(v.startup, gen.startup_cost)
                    .add_term(v.shutdown, gen.shutdown_cost)
                    .add_term(v.onoff, gen.no_load_cost)
                    .add_term(v.pfr_up, gen.prices.pfr_up)
                    .add_term(v.pfr_down, gen.prices.pfr_down)
                    .add_term(v.agc_up, gen.prices.agc_up)
                    .add_term(v.agc_down, gen.prices.agc_down);
                for (blk, block) in v.blocks.iter().zip(&gen.blocks) {
                    cost.add_term(*blk, block.slope);
                }
            }
        }
        let freq = &case.frequency;
        for h in case.hour_set() {
            let s = self.vars.slacks(h);
            cost.add_term(s.pfr_short_up, freq.pfr_penalty)
                .add_term(s.pfr_short_down, freq.pfr_penalty)
                .add_term(s.agc_short_up, freq.agc_penalty)
                .add_term(s.agc_short_down, freq.agc_penalty);
        }
        self.model.set_objective(cost, ObjectiveSense::Minimize);
    }
}

fn row_name(case: &UcCase, kind: ConstraintKind, site: Site) -> String {
    let mut name = kind.label().to_string();
    if let Some(gen) = site.gen.and_then(|id| case.generator(id)) {
        name.push('_');
        name.push_str(&gen.name);
    }
    if let Some(line) = site.line.and_then(|id| case.lines.iter().find(|l| l.id == id)) {
        name.push('_');
        name.push_str(&line.name);
    }
    if let Some(h) = site.hour {
        name.push_str(&format!("_{h}"));
    }
    name
}
