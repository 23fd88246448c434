//! Local search over green-light schedules.
//!
//! Every sweep is a deterministic first-improvement pass: intersections are
//! visited in ascending id order and positions in a fixed ascending order,
//! so identical inputs always give identical outputs before the deadline.

pub mod delta;
pub mod relocate;
pub mod swap;
pub mod utils;

use crate::deadline::Deadline;
use crate::problem::Problem;
use crate::schedule::Schedule;
use log::{debug, info};

pub use self::delta::delta_duration;
pub use self::relocate::relocate;
pub use self::swap::swap;

/// Manages the hill-climbing phase of the optimizer.
pub struct LocalSearch {
    /// Positions beyond this index are never edited
    pub max_pos: usize,
    pub deadline: Deadline,
    /// Oracle calls spent on candidates
    pub evaluations: u64,
    /// Candidates accepted by any sweep
    pub improvements: u64,
    /// Completed hill-climb passes
    pub passes: u64,
}

impl LocalSearch {
    /// Create a local search with an explicit position window.
    pub fn new(deadline: Deadline, max_pos: usize) -> Self {
        LocalSearch {
            max_pos,
            deadline,
            evaluations: 0,
            improvements: 0,
            passes: 0,
        }
    }

    /// Create a local search whose window is the requested cap clamped to the
    /// longest plan of `schedule`.
    pub fn for_schedule(deadline: Deadline, schedule: &Schedule, requested_cap: usize) -> Self {
        Self::new(deadline, utils::window_size(schedule, requested_cap))
    }

    pub(crate) fn evaluate(&mut self, problem: &Problem, candidate: &Schedule) -> u64 {
        self.evaluations += 1;
        problem.run_simulation_lite(candidate)
    }

    /// Run full passes of every neighborhood until the deadline expires.
    ///
    /// A pass runs Swap, then Relocate, then duration steps `+d` and `-d` for
    /// `d` in `1..=max_delta`. Without `max_rounds_without_improvement` the
    /// loop keeps going after a pass that changed nothing; with it, the loop
    /// stops after that many consecutive unchanged passes.
    pub fn hill_climb(
        &mut self,
        problem: &Problem,
        schedule: Schedule,
        max_delta: i32,
        max_rounds_without_improvement: Option<u32>,
    ) -> Schedule {
        let mut schedule = schedule;
        let mut last_score = problem.run_simulation_lite(&schedule);
        let mut rounds_without_improvement = 0u32;

        debug!(
            "Hill climb starting at {} with window {}",
            last_score, self.max_pos
        );

        while !self.deadline.expired() {
            schedule = self.swap_sweep(problem, &schedule);
            schedule = self.relocate_sweep(problem, &schedule);

            for delta in 1..=max_delta {
                schedule = self.delta_sweep(problem, &schedule, delta);
                schedule = self.delta_sweep(problem, &schedule, -delta);
            }
            self.passes += 1;

            let score = problem.run_simulation_lite(&schedule);
            if score == last_score {
                rounds_without_improvement += 1;
                if let Some(limit) = max_rounds_without_improvement {
                    if rounds_without_improvement >= limit {
                        debug!("Hill climb stagnated after {} passes", self.passes);
                        break;
                    }
                }
                continue;
            }

            info!("Done full pass, score {} (was {}), starting again", score, last_score);
            last_score = score;
            rounds_without_improvement = 0;
        }

        schedule
    }
}
