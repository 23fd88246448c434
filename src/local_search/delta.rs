//! Duration neighborhood: lengthen or shorten a single green phase.

use crate::problem::Problem;
use crate::schedule::Schedule;
use log::trace;

use super::utils::loop_positions;
use super::LocalSearch;

/// Add `delta` seconds to the phase at `pos` of intersection `intersection`.
///
/// Returns `None` when the duration would become negative.
pub fn delta_duration(
    schedule: &Schedule,
    intersection: usize,
    pos: usize,
    delta: i32,
) -> Option<Schedule> {
    let current = schedule.intersections[intersection].phases[pos].duration;
    let duration = current.checked_add_signed(delta)?;

    let mut candidate = schedule.clone();
    candidate.intersections[intersection].phases[pos].duration = duration;
    Some(candidate)
}

impl LocalSearch {
    /// One first-improvement pass changing each windowed phase by `delta`.
    ///
    /// A candidate is kept when it scores strictly higher, or when it scores
    /// the same and `delta` shortens the phase.
    pub fn delta_sweep(&mut self, problem: &Problem, schedule: &Schedule, delta: i32) -> Schedule {
        let mut best = schedule.clone();
        let mut best_score = problem.run_simulation_lite(&best);

        for i in 0..best.intersection_count() {
            if self.deadline.expired() {
                break;
            }
            let loop_pos = loop_positions(best.intersections[i].len(), self.max_pos);

            for pos in 0..loop_pos {
                if self.deadline.expired() {
                    break;
                }

                let candidate = match delta_duration(&best, i, pos, delta) {
                    Some(candidate) => candidate,
                    None => continue,
                };

                let score = self.evaluate(problem, &candidate);
                if score > best_score || (score == best_score && delta < 0) {
                    trace!("Delta {:+} at {}:{} gives {} (was {})", delta, i, pos, score, best_score);
                    best = candidate;
                    best_score = score;
                    self.improvements += 1;
                }
            }
        }

        best
    }
}
