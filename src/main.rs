use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use clap::Parser;
use log::{info, warn, LevelFilter};

use traffic_signals::config::Config;
use traffic_signals::deadline::Deadline;
use traffic_signals::problem::Problem;
use traffic_signals::utils::{check_batch, format_duration, save_schedule, RunStatistics};
use traffic_signals::{Result, TrafficOptimizer};

/// Optimize traffic-light schedules for one or more instances.
#[derive(Debug, Parser)]
#[command(name = "traffic-signals", version, about)]
struct Cli {
    /// Problem files to solve, in order
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Directory for `<input>.out` files (defaults to next to each input)
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// JSON configuration file; flags below override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Wall-clock budget per instance, in seconds
    #[arg(long)]
    exec_seconds: Option<u64>,

    /// Escalation divisor
    #[arg(long)]
    divisor: Option<usize>,

    /// Escalation rounds without improvement before stopping
    #[arg(long)]
    stagnation: Option<u32>,

    /// Cap on the phase positions the sweeps may edit
    #[arg(long)]
    max_pos: Option<usize>,

    /// Largest duration step tried by the sweeps
    #[arg(long)]
    max_delta: Option<i32>,

    /// Pick the escalation divisor per instance by trying 1..=MAX
    #[arg(long, value_name = "MAX")]
    tune_divisor: Option<usize>,

    /// Seed phase durations from street usage before escalation
    #[arg(long)]
    seed_by_usage: bool,

    /// Run the green-light-wait escalator after the congestion escalator
    #[arg(long)]
    green_wait: bool,

    /// Write run statistics for all instances as JSON
    #[arg(long)]
    stats: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn build_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_json_file(path)?,
            None => Config::new(),
        };

        if let Some(seconds) = self.exec_seconds {
            config = config.with_exec_duration(Duration::from_secs(seconds));
        }
        if let Some(divisor) = self.divisor {
            config = config.with_escalation_divisor(divisor);
        }
        if let Some(rounds) = self.stagnation {
            config = config.with_stagnation_rounds(rounds);
        }
        if let Some(max_pos) = self.max_pos {
            config = config.with_max_pos(max_pos);
        }
        if let Some(max_delta) = self.max_delta {
            config = config.with_max_delta(max_delta);
        }
        if let Some(max_divisor) = self.tune_divisor {
            config = config.with_tune_divisor(max_divisor);
        }
        if self.seed_by_usage {
            config = config.with_seed_by_usage(true);
        }
        if self.green_wait {
            config = config.with_green_wait_escalation(true);
        }

        config.validate()?;
        Ok(config)
    }

    fn log_level(&self) -> LevelFilter {
        match self.verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    fn output_path(&self, input: &Path) -> PathBuf {
        let file_name = format!(
            "{}.out",
            input.file_name().unwrap_or_default().to_string_lossy()
        );
        match &self.output_dir {
            Some(dir) => dir.join(file_name),
            None => input.with_file_name(file_name),
        }
    }
}

fn solve(cli: &Cli, config: &Config, input: &Path) -> Result<RunStatistics> {
    let problem = Problem::from_file(input)?;
    info!(
        "{}, Duration: {}, Intersections: {}, Bonus Per Car: {}, Streets: {}, Cars: {}",
        input.display(),
        problem.duration,
        problem.intersections.len(),
        problem.bonus_per_car,
        problem.streets.len(),
        problem.cars.len()
    );

    let deadline = Deadline::after(config.exec_duration);
    let mut optimizer = TrafficOptimizer::new(problem, config.clone(), deadline);
    let schedule = optimizer.run().clone();

    let output = cli.output_path(input);
    save_schedule(&schedule, &optimizer.problem, &output)?;
    info!("Wrote {}", output.display());
    info!("{}", optimizer.statistics.format());

    Ok(optimizer.statistics)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    env_logger::Builder::new()
        .filter_level(cli.log_level())
        .parse_default_env()
        .init();

    let config = cli.build_config()?;
    if let Some(dir) = &cli.output_dir {
        fs::create_dir_all(dir)?;
    }

    let start_time = Instant::now();
    let mut all_statistics = Vec::with_capacity(cli.inputs.len());

    for input in &cli.inputs {
        let solve_start = Instant::now();
        match solve(&cli, &config, input) {
            Ok(statistics) => all_statistics.push(statistics),
            Err(e) => warn!("Skipping {}: {}", input.display(), e),
        }
        info!("Solve time: {}", format_duration(solve_start.elapsed()));
    }

    info!("Runtime: {}", format_duration(start_time.elapsed()));

    if let Some(path) = &cli.stats {
        fs::write(path, serde_json::to_string_pretty(&all_statistics)?)?;
    }

    check_batch(all_statistics.len(), cli.inputs.len())
}
