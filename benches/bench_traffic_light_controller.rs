// benches/bench_traffic_light_controller.rs
use criterion::{
    black_box, criterion_group, criterion_main, AxisScale, Criterion, PlotConfiguration,
};
use std::time::Duration;
use traffic_light_controller::clock::SimClock;
use traffic_light_controller::control_system::traffic_light_controller::ControllerBuilder;
use traffic_light_controller::shared_data::{all_sensors, sensors_with, Lane, SensorState};

fn bench_tick(c: &mut Criterion) {
    let mut group = c.benchmark_group("tick");

    group.sample_size(100);
    group.measurement_time(Duration::from_secs(5));
    group.warm_up_time(Duration::from_secs(2));
    group.plot_config(PlotConfiguration::default().summary_scale(AxisScale::Linear));

    let loads = [
        ("empty", all_sensors(SensorState::Clear)),
        ("north_south", sensors_with(&[Lane::N_N, Lane::N_W, Lane::S_E])),
        ("full", all_sensors(SensorState::Set)),
    ];

    for (name, sensors) in loads {
        group.bench_function(name, |b| {
            let mut clock = SimClock::new();
            let mut controller = ControllerBuilder::new(40).initialize(&clock).unwrap();
            b.iter(|| {
                // Ten simulated seconds per tick, like the scenario driver.
                clock.advance(10);
                black_box(controller.tick(&clock, &sensors));
            });
        });
    }
    group.finish();
}

criterion_group!(benches, bench_tick);
criterion_main!(benches);
