//! Phase durations proportional to street usage.

use crate::deadline::Deadline;
use crate::problem::Problem;
use crate::schedule::Schedule;
use log::debug;

/// Sets every phase to `max(1, usage / d)` and keeps the best `d`.
#[derive(Debug, Clone, Copy)]
pub struct UsageSeeder {
    /// Divisors `1..=max_divisor` are tried
    pub max_divisor: usize,
}

/// Result of a seeding run.
#[derive(Debug, Clone)]
pub struct Seeding {
    pub schedule: Schedule,
    pub score: u64,
    /// Divisor of the returned schedule, `None` when the input was kept
    pub divisor: Option<usize>,
}

impl Default for UsageSeeder {
    fn default() -> Self {
        UsageSeeder { max_divisor: 49 }
    }
}

/// Copy `schedule` with each phase lasting `max(1, usage / divisor)` seconds.
pub fn seed_by_usage(problem: &Problem, schedule: &Schedule, divisor: usize) -> Schedule {
    let divisor = divisor.max(1);
    let mut seeded = schedule.clone();
    for plan in seeded.intersections.iter_mut() {
        for phase in plan.phases.iter_mut() {
            let usage = problem.street(phase.street).incoming_usage_count / divisor;
            phase.duration = u32::try_from(usage).unwrap_or(u32::MAX).max(1);
        }
    }
    seeded
}

impl UsageSeeder {
    pub fn new(max_divisor: usize) -> Self {
        UsageSeeder { max_divisor }
    }

    /// Try every divisor and return the best seeded schedule, or the input if none beats it.
    pub fn run(&self, problem: &Problem, schedule: Schedule, deadline: &Deadline) -> Seeding {
        let mut best_score = problem.run_simulation_lite(&schedule);
        let mut best: Option<(Schedule, usize)> = None;

        for divisor in 1..=self.max_divisor {
            if deadline.expired() {
                break;
            }

            let candidate = seed_by_usage(problem, &schedule, divisor);
            let score = problem.run_simulation_lite(&candidate);
            if score > best_score {
                debug!("Usage seeding with divisor {}: {}", divisor, score);
                best_score = score;
                best = Some((candidate, divisor));
            }
        }

        match best {
            Some((schedule, divisor)) => Seeding {
                schedule,
                score: best_score,
                divisor: Some(divisor),
            },
            None => Seeding {
                schedule,
                score: best_score,
                divisor: None,
            },
        }
    }
}
