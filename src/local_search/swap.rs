//! Swap neighborhood: exchange two phases of the same intersection.

use crate::problem::Problem;
use crate::schedule::Schedule;
use log::trace;

use super::utils::loop_positions;
use super::LocalSearch;

/// Exchange the phases at `pos1` and `pos2` of intersection `intersection`.
///
/// Returns a new schedule; the input is left untouched.
pub fn swap(schedule: &Schedule, intersection: usize, pos1: usize, pos2: usize) -> Schedule {
    let mut candidate = schedule.clone();
    candidate.intersections[intersection]
        .phases
        .swap(pos1, pos2);
    candidate
}

impl LocalSearch {
    /// One first-improvement pass of the Swap neighborhood.
    ///
    /// Candidates are visited by ascending intersection, then by `pos2`
    /// ascending with every `pos1 < pos2`. A strictly better candidate
    /// replaces the current schedule immediately and the pass continues from it.
    pub fn swap_sweep(&mut self, problem: &Problem, schedule: &Schedule) -> Schedule {
        let mut best = schedule.clone();
        let mut best_score = problem.run_simulation_lite(&best);

        for i in 0..best.intersection_count() {
            if self.deadline.expired() {
                break;
            }
            let loop_pos = loop_positions(best.intersections[i].len(), self.max_pos);

            'candidates: for pos2 in 1..loop_pos {
                for pos1 in 0..pos2 {
                    if self.deadline.expired() {
                        break 'candidates;
                    }

                    let candidate = swap(&best, i, pos1, pos2);
                    let score = self.evaluate(problem, &candidate);
                    if score > best_score {
                        trace!("Swap {}:{}<->{} improves {} -> {}", i, pos1, pos2, best_score, score);
                        best = candidate;
                        best_score = score;
                        self.improvements += 1;
                    }
                }
            }
        }

        best
    }
}
