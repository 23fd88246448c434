//! Relocate neighborhood: move one phase to another position of its cycle.

use crate::problem::Problem;
use crate::schedule::Schedule;
use log::trace;

use super::utils::{is_adjacent, loop_positions};
use super::LocalSearch;

/// Remove the phase at `from` and reinsert it at index `to`, shifting the phases between.
///
/// Returns a new schedule; the input is left untouched.
pub fn relocate(schedule: &Schedule, intersection: usize, from: usize, to: usize) -> Schedule {
    let mut candidate = schedule.clone();
    let phases = &mut candidate.intersections[intersection].phases;
    let phase = phases.remove(from);
    phases.insert(to, phase);
    candidate
}

impl LocalSearch {
    /// One first-improvement pass of the Relocate neighborhood.
    ///
    /// Visits every ordered pair inside the window, target position outermost.
    /// Equal and adjacent pairs are skipped since a Swap covers them.
    pub fn relocate_sweep(&mut self, problem: &Problem, schedule: &Schedule) -> Schedule {
        let mut best = schedule.clone();
        let mut best_score = problem.run_simulation_lite(&best);

        for i in 0..best.intersection_count() {
            if self.deadline.expired() {
                break;
            }
            let loop_pos = loop_positions(best.intersections[i].len(), self.max_pos);

            'candidates: for to in 0..loop_pos {
                for from in 0..loop_pos {
                    if self.deadline.expired() {
                        break 'candidates;
                    }
                    if from == to || is_adjacent(from, to) {
                        continue;
                    }

                    let candidate = relocate(&best, i, from, to);
                    let score = self.evaluate(problem, &candidate);
                    if score > best_score {
                        trace!("Relocate {}:{}->{} improves {} -> {}", i, from, to, best_score, score);
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
