//! Removal of green phases that only serve cars which never finish.

use crate::deadline::Deadline;
use crate::problem::Problem;
use crate::schedule::Schedule;
use crate::simulation::CarTrace;
use log::debug;

/// Result of a pruning run.
#[derive(Debug, Clone)]
pub struct Pruning {
    pub schedule: Schedule,
    pub score: u64,
    /// Unfinished cars left in the wasted-usage set when the scan stopped
    pub wasted_cars: Vec<usize>,
    /// Unfinished cars taken out of the wasted-usage set, in the order they were spared
    pub spared_cars: Vec<usize>,
}

/// Copy `schedule` without the phases of streets whose only users are `cars`.
///
/// Every non-final leg of each listed car is subtracted from the street's
/// incoming usage count; streets left at zero lose all their phases.
pub fn remove_streets_used_only_by(
    problem: &Problem,
    schedule: &Schedule,
    cars: &[CarTrace],
) -> Schedule {
    let mut usage: Vec<usize> = problem
        .streets
        .iter()
        .map(|street| street.incoming_usage_count)
        .collect();

    for trace in cars {
        let route = &problem.cars[trace.car].route;
        for &street in &route[..route.len().saturating_sub(1)] {
            usage[street] = usage[street].saturating_sub(1);
        }
    }

    let mut pruned = schedule.clone();
    for trace in cars {
        let route = &problem.cars[trace.car].route;
        for &street in &route[..route.len().saturating_sub(1)] {
            if usage[street] == 0 {
                let intersection = problem.street(street).end_intersection;
                if let Some(plan) = pruned.intersections.get_mut(intersection) {
                    plan.remove_street(street);
                }
            }
        }
    }

    pruned
}

/// Prunes green phases kept alive only by cars that miss the deadline.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeadWeightPruner;

impl DeadWeightPruner {
    /// Prune and return the best schedule found, or the input if nothing improved.
    ///
    /// After pruning for every unfinished car, cars are tried for exclusion
    /// from the wasted set one at a time, closest-to-finishing first. The first
    /// exclusion that strictly improves the score is kept and the scan restarts.
    pub fn run(&self, problem: &Problem, schedule: Schedule, deadline: &Deadline) -> Pruning {
        if deadline.expired() {
            let score = problem.run_simulation_lite(&schedule);
            return Pruning {
                schedule,
                score,
                wasted_cars: Vec::new(),
                spared_cars: Vec::new(),
            };
        }

        let result = problem.run_simulation(&schedule);

        if result.unfinished_cars.is_empty() {
            return Pruning {
                schedule,
                score: result.score,
                wasted_cars: Vec::new(),
                spared_cars: Vec::new(),
            };
        }

        let mut best = schedule.clone();
        let mut best_score = result.score;

        let candidate = remove_streets_used_only_by(problem, &schedule, &result.unfinished_cars);
        let score = problem.run_simulation_lite(&candidate);
        if score > best_score {
            debug!("Pruning all unfinished cars: {} -> {}", best_score, score);
            best = candidate;
            best_score = score;
        }

        let mut wasted = result.unfinished_cars;
        wasted.sort_by_key(|trace| trace.time_left_on_drive);
        let mut spared_cars = Vec::new();

        'scan: loop {
            let mut excluded = None;

            for i in 0..wasted.len() {
                if deadline.expired() {
                    break 'scan;
                }

                let spared = wasted.remove(i);
                let candidate = remove_streets_used_only_by(problem, &schedule, &wasted);
                let score = problem.run_simulation_lite(&candidate);
                wasted.insert(i, spared);

                if score > best_score {
                    debug!("Sparing car {}: {} -> {}", wasted[i].car, best_score, score);
                    best = candidate;
                    best_score = score;
                    excluded = Some(i);
                    break;
                }
            }

            match excluded {
                Some(i) => {
                    spared_cars.push(wasted.remove(i).car);
                }
                None => break,
            }
        }

        Pruning {
            schedule: best,
            score: best_score,
            wasted_cars: wasted.iter().map(|trace| trace.car).collect(),
            spared_cars,
        }
    }
}
