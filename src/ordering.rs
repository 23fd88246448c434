//! Initial green-light ordering heuristic.

use crate::problem::Problem;
use crate::schedule::Schedule;
use log::debug;
use std::collections::HashSet;

/// Earliest second at which any car could be waiting at the end of each street.
///
/// Assumes an empty network: a car reaches the end of its first street at
/// time 0 and every later street after driving its full length. Streets that
/// are only ever a final leg never hold a queue and stay `None`.
pub fn earliest_arrivals(problem: &Problem) -> Vec<Option<u32>> {
    let mut earliest: Vec<Option<u32>> = vec![None; problem.streets.len()];

    for car in &problem.cars {
        let mut time = 0u32;
        let waiting_legs = car.route.len().saturating_sub(1);

        for (leg, &street) in car.route.iter().take(waiting_legs).enumerate() {
            if leg > 0 {
                time = time.saturating_add(problem.street(street).length);
            }
            earliest[street] = Some(earliest[street].map_or(time, |t| t.min(time)));
        }
    }

    earliest
}

/// Reorder each plan so the street whose first car arrives earliest goes green first.
///
/// Intersections in `excluded` keep their order. The sort is stable, and
/// streets that no car waits on move to the end.
pub fn initial_order(problem: &Problem, schedule: &mut Schedule, excluded: &HashSet<usize>) {
    let earliest = earliest_arrivals(problem);
    let mut reordered = 0;

    for (id, plan) in schedule.intersections.iter_mut().enumerate() {
        if excluded.contains(&id) || plan.len() < 2 {
            continue;
        }

        let before = plan.phases.clone();
        plan.phases
            .sort_by_key(|phase| earliest[phase.street].unwrap_or(u32::MAX));
        if plan.phases != before {
            reordered += 1;
        }
    }

    debug!("Initial ordering changed {} intersections", reordered);
}
