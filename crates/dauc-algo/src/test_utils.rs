//! Small cases shared by tests, doc examples and the CLI smoke tests

use dauc_core::{
    Bus, BusId, CostBlock, FrequencyParams, GenId, Generator, InitialCondition, Line, LineId,
    ReservePrices, SystemProfile, UcCase,
};

/// Three units on a three-bus radial system over four hours.
///
/// ```text
///  G1 (bus 1, base) ── L12 ── bus 2 (G2, load) ── L23 ── bus 3 (G3, load)
/// ```
///
/// System load is 160/200/240/210 MW with a 20 MW reserve margin. G1 owes
/// two more hours of up time (on 2 h, minimum 4 h), G3 is a fast peaker with
/// no minimum up/down restriction.
pub fn three_unit_case() -> UcCase {
    let hours = 4;
    let prices = ReservePrices {
        pfr_up: 0.5,
        pfr_down: 0.5,
        agc_up: 1.0,
        agc_down: 1.0,
    };
    let blocks = |spans: [f64; 4], slopes: [f64; 4]| -> [CostBlock; 4] {
        std::array::from_fn(|k| CostBlock::new(slopes[k], spans[k]))
    };

    let generators = vec![
        Generator {
            id: GenId::new(1),
            name: "G1".into(),
            bus: BusId::new(1),
            pmin_mw: 50.0,
            pmax_mw: vec![200.0; hours],
            blocks: blocks([50.0, 40.0, 30.0, 30.0], [10.0, 12.0, 14.0, 16.0]),
            startup_cost: 500.0,
            shutdown_cost: 100.0,
            no_load_cost: 200.0,
            min_on_hours: 4,
            min_off_hours: 2,
            initial: InitialCondition::online(2, 120.0),
            ramp_rate_mw_per_min: 2.0,
            droop: 0.004,
            deadband_hz: 0.036,
            prices,
        },
        Generator {
            id: GenId::new(2),
            name: "G2".into(),
            bus: BusId::new(2),
            pmin_mw: 20.0,
            pmax_mw: vec![100.0; hours],
            blocks: blocks([20.0, 20.0, 20.0, 20.0], [20.0, 22.0, 24.0, 26.0]),
            startup_cost: 300.0,
            shutdown_cost: 50.0,
            no_load_cost: 100.0,
            min_on_hours: 2,
            min_off_hours: 2,
            initial: InitialCondition::online(5, 50.0),
            ramp_rate_mw_per_min: 1.5,
            droop: 0.008,
            deadband_hz: 0.036,
            prices,
        },
        Generator {
            id: GenId::new(3),
            name: "G3".into(),
            bus: BusId::new(3),
            pmin_mw: 10.0,
            pmax_mw: vec![60.0; hours],
            blocks: blocks([10.0, 10.0, 15.0, 15.0], [40.0, 45.0, 50.0, 55.0]),
            startup_cost: 100.0,
            shutdown_cost: 20.0,
            no_load_cost: 50.0,
            min_on_hours: 0,
            min_off_hours: 0,
            initial: InitialCondition::offline(3),
            ramp_rate_mw_per_min: 1.0,
            droop: 0.01,
            deadband_hz: 0.036,
            prices,
        },
    ];

    let buses = vec![
        Bus {
            id: BusId::new(1),
            name: "b1".into(),
            load_mw: vec![0.0; hours],
        },
        Bus {
            id: BusId::new(2),
            name: "b2".into(),
            load_mw: vec![100.0, 130.0, 160.0, 140.0],
        },
        Bus {
            id: BusId::new(3),
            name: "b3".into(),
            load_mw: vec![60.0, 70.0, 80.0, 70.0],
        },
    ];

    let lines = vec![
        Line {
            id: LineId::new(1),
            name: "L12".into(),
            capacity_mw: 250.0,
            ptdf: vec![0.0, -1.0, -1.0],
        },
        Line {
            id: LineId::new(2),
            name: "L23".into(),
            capacity_mw: 100.0,
            ptdf: vec![0.0, 0.0, -1.0],
        },
    ];

    UcCase {
        name: "three_unit".into(),
        hours,
        frequency: FrequencyParams::default(),
        generators,
        buses,
        lines,
        system: SystemProfile {
            load_mw: None,
            reserve_mw: vec![20.0; hours],
            load_damping: vec![1.0; hours],
            pfr_up_mw: vec![30.0; hours],
            pfr_down_mw: vec![0.0; hours],
            agc_up_mw: vec![15.0; hours],
            agc_down_mw: vec![15.0; hours],
        },
    }
}
