//! Utility functions for the schedule sweeps.

use crate::schedule::Schedule;

/// Position window applied uniformly to every sweep of one optimization run.
///
/// The window is the requested cap, clamped to the longest plan in the schedule.
pub fn window_size(schedule: &Schedule, requested_cap: usize) -> usize {
    requested_cap.min(schedule.max_plan_len())
}

/// Number of leading positions a sweep may edit in a plan of `plan_len` phases.
pub fn loop_positions(plan_len: usize, max_pos: usize) -> usize {
    max_pos.min(plan_len)
}

/// Are two positions next to each other?
pub fn is_adjacent(pos1: usize, pos2: usize) -> bool {
    pos1.abs_diff(pos2) == 1
}
