use traffic_light_controller::control_system::config::ControllerConfig;
use traffic_light_controller::control_system::phase_machine::AdvanceReason;
use traffic_light_controller::control_system::topology::phase_contains;
use traffic_light_controller::monitoring::signal_trace::{read_trace, SignalTrace};
use traffic_light_controller::shared_data::{all_sensors, Lane, Phase, SensorState, SignalState};
use traffic_light_controller::simulation_engine::scenario::{
    scenario_1, scenario_2, scenario_3, scenario_4, Scenario, SimulationTimeslice,
};
use traffic_light_controller::simulation_engine::simulator::{run_scenario, ScenarioRun};

use Phase::*;

fn changes(scenario: &Scenario, config: &ControllerConfig) -> Vec<(u64, Phase)> {
    run_scenario(scenario, config, None)
        .unwrap()
        .phase_changes
        .iter()
        .map(|change| (change.at, change.to))
        .collect()
}

#[test]
fn scenario_1_cycles_through_every_phase_and_wraps() {
    let summary = run_scenario(&scenario_1(), &ControllerConfig::default(), None).unwrap();
    let timings = ControllerConfig::default().timings;

    let hops: Vec<(u64, Phase)> = summary.phase_changes.iter().map(|c| (c.at, c.to)).collect();
    assert_eq!(
        &hops[..5],
        &[
            (10, NorthSouthThrough),
            (40, EastWestTurning),
            (50, EastWestThrough),
            (80, NorthSouthTurning),
            (90, NorthSouthThrough),
        ]
    );

    for change in &summary.phase_changes {
        let timing = timings.get(change.from);
        assert_eq!(change.to, change.from.next());
        // Constant pressure: every phase leaves as soon as its minimum is met.
        assert_eq!(change.reason, AdvanceReason::CarsWaiting);
        assert_eq!(change.active_for, timing.min_active_time);
        assert!(change.active_for <= timing.max_active_time);
    }
    assert_eq!(summary.phase_changes.len(), 15);
    assert_eq!(summary.final_phase, EastWestThrough);
}

#[test]
fn scenario_2_hands_over_when_n_n_blocks_the_turners() {
    let summary = run_scenario(&scenario_2(), &ControllerConfig::default(), None).unwrap();

    // t=10: turners still clear, so NorthSouthTurning holds past its minimum.
    // t=20: N_N now conflicts with the turners and is queued, minimum met.
    assert_eq!(summary.phase_changes.len(), 1);
    let change = summary.phase_changes[0];
    assert_eq!((change.at, change.from, change.to), (20, NorthSouthTurning, NorthSouthThrough));
    assert_eq!(change.reason, AdvanceReason::CarsWaiting);

    // N_N flows with clear opposing lanes for the rest of the run.
    assert_eq!(summary.final_phase, NorthSouthThrough);
    assert_eq!(summary.ticks, 30);
    assert_eq!(summary.duration, 300);
    assert_eq!(summary.longest_wait, None);
}

#[test]
fn scenario_3_recovers_from_full_load_into_north_south_through() {
    let hops = changes(&scenario_3(), &ControllerConfig::default());
    let first_half = changes(&scenario_1(), &ControllerConfig::default());

    assert_eq!(&hops[..first_half.len()], &first_half[..]);
    assert_eq!(&hops[first_half.len()..], &[(320, NorthSouthTurning), (330, NorthSouthThrough)]);
}

#[test]
fn scenario_4_resumes_cycling_when_traffic_returns() {
    let hops = changes(&scenario_4(), &ControllerConfig::default());
    let tail: Vec<(u64, Phase)> = hops.into_iter().filter(|(at, _)| *at >= 600).collect();
    assert_eq!(
        &tail[..4],
        &[
            (610, EastWestTurning),
            (620, EastWestThrough),
            (650, NorthSouthTurning),
            (660, NorthSouthThrough),
        ]
    );
}

#[test]
fn idle_intersection_advances_exactly_at_each_maximum() {
    let scenario = Scenario::new(
        "idle",
        vec![SimulationTimeslice::new(0, 400, all_sensors(SensorState::Clear))],
    );
    let config = ControllerConfig {
        time_step: 1,
        ..ControllerConfig::default()
    };

    let summary = run_scenario(&scenario, &config, None).unwrap();
    let hops: Vec<(u64, Phase, u64)> = summary
        .phase_changes
        .iter()
        .map(|c| (c.at, c.from, c.active_for))
        .collect();
    assert_eq!(
        hops,
        vec![
            (60, NorthSouthTurning, 60),
            (180, NorthSouthThrough, 120),
            (210, EastWestTurning, 30),
            (270, EastWestThrough, 60),
            (330, NorthSouthTurning, 60),
        ]
    );
    assert!(summary
        .phase_changes
        .iter()
        .all(|c| c.reason == AdvanceReason::MaxActiveTime));
}

#[test]
fn invariants_hold_on_every_tick_of_random_traffic() {
    let config = ControllerConfig::default();

    for seed in 0..25 {
        let scenario = Scenario::random(seed, 900, 10);
        let mut run = ScenarioRun::new(&scenario, &config).unwrap();

        while !run.is_done() {
            let sensors = *run.simulator().sensors();
            run.step().unwrap();
            let controller = run.controller();

            let on: Vec<Phase> = controller
                .phase_records()
                .filter(|record| record.is_on)
                .map(|record| record.phase)
                .collect();
            assert_eq!(on, vec![controller.active_phase()], "seed {seed}");

            for lane in Lane::ALL {
                let signal = controller.current_signals()[lane.index()];
                assert_ne!(signal, SignalState::Yellow);
                assert_eq!(
                    signal == SignalState::Green,
                    phase_contains(controller.active_phase(), lane),
                    "seed {seed} lane {lane}"
                );

                let record = controller.vehicle_record(lane);
                if signal == SignalState::Green || !sensors[lane.index()].is_set() {
                    assert!(!record.is_waiting, "seed {seed} lane {lane}");
                    assert_eq!(record.wait_time, 0);
                }
            }

            let any_waiting = Lane::ALL
                .iter()
                .any(|lane| controller.vehicle_record(*lane).is_waiting);
            assert_eq!(controller.cars_waiting(), any_waiting);
        }
    }
}

#[test]
fn trace_file_records_every_tick() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("signal_trace.csv");

    let mut trace = SignalTrace::append(&path).unwrap();
    let summary = run_scenario(&scenario_2(), &ControllerConfig::default(), Some(&mut trace)).unwrap();
    drop(trace);

    let records = read_trace(&path).unwrap();
    assert_eq!(records.len() as u64, summary.ticks);
    assert_eq!(records[0].time, 0);
    assert_eq!(records[0].active_phase, NorthSouthTurning);
    assert_eq!(records[2].time, 20);
    assert_eq!(records[2].active_phase, NorthSouthThrough);
    assert_eq!(records[2].n_n, SignalState::Green);
    assert_eq!(records[2].n_w, SignalState::Red);
    assert!(records.iter().all(|r| r.scenario == "scenario_2"));
}
