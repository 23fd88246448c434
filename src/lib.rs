//! # Traffic Signals
//!
//! Time-budgeted local search for traffic-light schedules.
//!
//! Given a road network of intersections and one-way streets, and a set of
//! cars with fixed routes, the optimizer searches for a per-intersection
//! green-light cycle that gets as many cars as possible to their destination
//! before the simulation ends, and as early as possible.
//!
//! The pipeline starts from a naive one-second-per-street schedule, orders
//! each cycle by expected arrival, lengthens the phases of congested streets,
//! prunes phases that only serve cars that never finish, and then hill-climbs
//! with swap, relocate and duration moves until a wall-clock deadline.
//!
//! Optional stages seed durations from street usage, tune the escalation
//! divisor per instance, and lengthen phases with long green-light queues.

pub mod config;
pub mod deadline;
pub mod error;
pub mod escalate;
pub mod generator;
pub mod local_search;
pub mod ordering;
pub mod problem;
pub mod prune;
pub mod schedule;
pub mod seeding;
pub mod simulation;
pub mod tuning;
pub mod utils;

pub use crate::error::{Error, Result};

use crate::config::Config;
use crate::deadline::Deadline;
use crate::escalate::{DurationEscalator, GreenWaitEscalator};
use crate::local_search::LocalSearch;
use crate::problem::Problem;
use crate::prune::DeadWeightPruner;
use crate::schedule::Schedule;
use crate::seeding::UsageSeeder;
use crate::tuning::DivisorTuner;
use crate::utils::RunStatistics;

use log::info;
use std::collections::HashSet;
use std::time::Instant;

/// The main structure that sequences the optimization stages for one instance.
pub struct TrafficOptimizer {
    pub problem: Problem,
    pub config: Config,
    pub deadline: Deadline,
    pub best_schedule: Option<Schedule>,
    pub statistics: RunStatistics,
    pub start_time: Instant,
}

impl TrafficOptimizer {
    /// Create an optimizer for the given problem, configuration and deadline.
    pub fn new(problem: Problem, config: Config, deadline: Deadline) -> Self {
        let statistics = RunStatistics {
            instance: problem.name.clone(),
            ..RunStatistics::default()
        };

        TrafficOptimizer {
            problem,
            config,
            deadline,
            best_schedule: None,
            statistics,
            start_time: Instant::now(),
        }
    }

    /// Build the naive schedule and apply the initial ordering.
    ///
    /// The ordering is only kept when it does not lower the score.
    pub fn initialize(&mut self) -> Schedule {
        self.statistics.score_upper_bound = self.problem.score_upper_bound();
        self.statistics.removed_streets = self.problem.remove_unused_streets();

        let naive = Schedule::naive(&self.problem);
        let naive_score = self.problem.run_simulation_lite(&naive);
        self.statistics.initial_score = naive_score;

        let mut ordered = naive.clone();
        ordering::initial_order(&self.problem, &mut ordered, &HashSet::new());
        let ordered_score = self.problem.run_simulation_lite(&ordered);

        let (schedule, score) = if ordered_score >= naive_score {
            (ordered, ordered_score)
        } else {
            (naive, naive_score)
        };
        self.statistics.ordered_score = score;
        info!(
            "Initial score {} (naive {}, upper bound {})",
            score, naive_score, self.statistics.score_upper_bound
        );

        self.best_schedule = Some(schedule.clone());
        schedule
    }

    /// Run every stage and return the best schedule found before the deadline.
    pub fn run(&mut self) -> &Schedule {
        self.start_time = Instant::now();
        let mut schedule = self.initialize();

        self.statistics.seeded_score = self.statistics.ordered_score;
        if self.config.seed_by_usage {
            let seeding = UsageSeeder::default().run(&self.problem, schedule, &self.deadline);
            info!(
                "Seeded durations from street usage: score {} (divisor {:?})",
                seeding.score, seeding.divisor
            );
            self.statistics.seeded_score = seeding.score;
            schedule = seeding.schedule;
        }

        let mut divisor = self.config.escalation_divisor;
        if let Some(max_divisor) = self.config.tune_divisor {
            let tuner = DivisorTuner::new(max_divisor, self.config.stagnation_rounds);
            let tuning = tuner.run(&self.problem, &schedule, &self.deadline);
            if let Some(best) = tuning.divisor {
                info!(
                    "Tuned escalation divisor {} over {} trials: score {}",
                    best, tuning.trials, tuning.score
                );
                divisor = best;
            }
        }
        self.statistics.escalation_divisor = divisor;

        self.statistics.escalated_score = self.statistics.seeded_score;
        if !self.config.skip_escalation {
            let escalator = DurationEscalator::new(divisor, self.config.stagnation_rounds);
            let escalation = escalator.run(&self.problem, schedule, &self.deadline);
            info!(
                "Escalated durations in {} rounds: score {}",
                escalation.rounds, escalation.score
            );
            self.statistics.escalation_rounds = escalation.rounds;
            self.statistics.escalated_score = escalation.score;
            schedule = escalation.schedule;
        }

        self.statistics.green_wait_score = self.statistics.escalated_score;
        if self.config.green_wait_escalation {
            let escalation = GreenWaitEscalator.run(&self.problem, schedule, &self.deadline);
            info!(
                "Escalated green-light waits in {} rounds: score {}",
                escalation.rounds, escalation.score
            );
            self.statistics.green_wait_score = escalation.score;
            schedule = escalation.schedule;
        }

        self.statistics.pruned_score = self.statistics.green_wait_score;
        if !self.config.skip_pruning {
            let pruning = DeadWeightPruner.run(&self.problem, schedule, &self.deadline);
            info!(
                "Pruned streets of unfinished cars: score {} ({} cars written off)",
                pruning.score,
                pruning.wasted_cars.len()
            );
            self.statistics.pruned_score = pruning.score;
            schedule = pruning.schedule;
        }

        let mut local_search =
            LocalSearch::for_schedule(self.deadline, &schedule, self.config.max_pos);
        schedule = local_search.hill_climb(
            &self.problem,
            schedule,
            self.config.max_delta,
            self.config.max_rounds_without_improvement,
        );

        self.statistics.final_score = self.problem.run_simulation_lite(&schedule);
        self.statistics.hill_climb_passes = local_search.passes;
        self.statistics.evaluations = local_search.evaluations;
        self.statistics.improvements = local_search.improvements;
        self.statistics.runtime = self.start_time.elapsed();
        info!("Final score {}", self.statistics.final_score);

        self.best_schedule.insert(schedule)
    }
}
