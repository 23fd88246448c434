//! Basic example of using the traffic signals library.

use std::env;
use std::time::{Duration, Instant};

use traffic_signals::config::Config;
use traffic_signals::deadline::Deadline;
use traffic_signals::generator::{generate, GeneratorParams};
use traffic_signals::problem::Problem;
use traffic_signals::utils::{format_duration, save_schedule};
use traffic_signals::TrafficOptimizer;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Info)
        .init();

    // Load an instance from the command line or generate one
    let args: Vec<String> = env::args().collect();
    let problem = if args.len() > 1 {
        println!("Loading problem from: {}", args[1]);
        Problem::from_file(&args[1])?
    } else {
        println!("Generating a random instance");
        generate(&GeneratorParams::default(), 42)
    };
    println!(
        "Loaded problem: {} with {} intersections, {} streets and {} cars",
        problem.name,
        problem.intersections.len(),
        problem.streets.len(),
        problem.cars.len()
    );
    println!("Score upper bound: {}", problem.score_upper_bound());

    // Configure the optimizer
    let config = Config::new()
        .with_exec_duration(Duration::from_secs(10))
        .with_escalation_divisor(8)
        .with_stagnation_rounds(10)
        .with_max_delta(3);

    let deadline = Deadline::after(config.exec_duration);
    let mut optimizer = TrafficOptimizer::new(problem, config, deadline);

    println!("Starting search (time limit: 10s)");
    let start_time = Instant::now();
    let schedule = optimizer.run().clone();
    let runtime = start_time.elapsed();

    println!("Search completed in {}", format_duration(runtime));
    println!("{}", optimizer.statistics.format());

    let output_path = format!("{}.out", optimizer.problem.name);
    println!("Saving schedule to: {}", output_path);
    save_schedule(&schedule, &optimizer.problem, &output_path)?;

    Ok(())
}
