//! Search for the escalation divisor that scores best on one instance.

use crate::deadline::Deadline;
use crate::escalate::DurationEscalator;
use crate::problem::Problem;
use crate::prune::DeadWeightPruner;
use crate::schedule::Schedule;
use log::debug;

/// Runs escalation and pruning once per divisor in `1..=max_divisor`.
#[derive(Debug, Clone, Copy)]
pub struct DivisorTuner {
    pub max_divisor: usize,
    pub stagnation_rounds: u32,
}

/// Outcome of a tuning run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DivisorTuning {
    /// Smallest divisor reaching the best score, `None` if no trial ran
    pub divisor: Option<usize>,
    pub score: u64,
    pub trials: usize,
}

impl DivisorTuner {
    pub fn new(max_divisor: usize, stagnation_rounds: u32) -> Self {
        DivisorTuner {
            max_divisor,
            stagnation_rounds,
        }
    }

    /// Score every divisor from the same starting schedule until the deadline.
    pub fn run(&self, problem: &Problem, schedule: &Schedule, deadline: &Deadline) -> DivisorTuning {
        let mut tuning = DivisorTuning {
            divisor: None,
            score: 0,
            trials: 0,
        };

        for divisor in 1..=self.max_divisor {
            if deadline.expired() {
                break;
            }

            let escalation = DurationEscalator::new(divisor, self.stagnation_rounds).run(
                problem,
                schedule.clone(),
                deadline,
            );
            let pruning = DeadWeightPruner.run(problem, escalation.schedule, deadline);
            tuning.trials += 1;

            if tuning.divisor.is_none() || pruning.score > tuning.score {
                debug!("Divisor {} scores {}", divisor, pruning.score);
                tuning.divisor = Some(divisor);
                tuning.score = pruning.score;
            }
        }

        tuning
    }
}
