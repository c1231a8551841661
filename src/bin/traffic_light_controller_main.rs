use std::env;
use std::process;

use tokio::time::Duration;
use traffic_light_controller::control_system::config::ControllerConfig;
use traffic_light_controller::error::RunError;
use traffic_light_controller::global_variables::{ENV_CONFIG_PATH, SIGNAL_TRACE_CSV};
use traffic_light_controller::monitoring::signal_trace::SignalTrace;
use traffic_light_controller::simulation_engine::scenario::Scenario;
use traffic_light_controller::simulation_engine::simulator::{ScenarioRun, ScenarioSummary};

const RANDOM_DURATION: u64 = 600;

/// Scenario arguments: `1`..`4`, `random` or `random:<seed>`, or a path to a
/// JSON scenario file. No arguments runs all four built-in scenarios.
fn parse_scenarios(args: &[String]) -> Result<Vec<Scenario>, RunError> {
    if args.is_empty() {
        return Ok(Scenario::builtins());
    }

    args.iter()
        .map(|arg| Scenario::from_arg(arg, RANDOM_DURATION).map_err(RunError::from))
        .collect()
}

fn load_config() -> Result<ControllerConfig, RunError> {
    match env::var(ENV_CONFIG_PATH) {
        Ok(path) => Ok(ControllerConfig::load(path)?),
        Err(_) => Ok(ControllerConfig::default()),
    }
}

async fn run(config: &ControllerConfig, scenarios: &[Scenario]) -> Result<(), RunError> {
    let mut trace = match &config.trace_csv {
        Some(path) if path.is_empty() => Some(SignalTrace::append(SIGNAL_TRACE_CSV)?),
        Some(path) => Some(SignalTrace::append(path)?),
        None => None,
    };

    for scenario in scenarios {
        let mut run = ScenarioRun::new(scenario, config)?.echo(true);
        if let Some(trace) = trace.as_mut() {
            run = run.with_trace(trace);
        }

        let summary = if config.tick_delay_ms > 0 {
            run.run_paced(Duration::from_millis(config.tick_delay_ms)).await?
        } else {
            run.run()?
        };
        print_summary(&summary);
    }

    Ok(())
}

fn print_summary(summary: &ScenarioSummary) {
    println!(
        "{}: {}s over {} ticks, {} phase changes, finished in {}",
        summary.scenario,
        summary.duration,
        summary.ticks,
        summary.phase_changes.len(),
        summary.final_phase
    );
    if let Some((lane, wait)) = summary.longest_wait {
        println!("Longest wait still queued: lane ({}) for {}s", lane, wait);
    }
    println!();
}

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = match load_config() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Config error: {}", e);
            process::exit(1);
        }
    };

    let args: Vec<String> = env::args().skip(1).collect();
    let scenarios = match parse_scenarios(&args) {
        Ok(scenarios) => scenarios,
        Err(e) => {
            eprintln!("Scenario error: {}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(&config, &scenarios).await {
        eprintln!("Controller error: {}", e);
        process::exit(1);
    }
}
