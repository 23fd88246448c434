//! Congestion-guided lengthening of green phases.

use crate::deadline::Deadline;
use crate::problem::Problem;
use crate::schedule::Schedule;
use crate::simulation::IntersectionStats;
use itertools::Itertools;
use log::debug;

/// Lengthens the green phase of the most blocked street at the worst intersections.
#[derive(Debug, Clone, Copy)]
pub struct DurationEscalator {
    /// The top `congested / divisor` intersections are edited each round
    pub divisor: usize,
    /// Rounds without a new best score before stopping
    pub stagnation_rounds: u32,
}

/// Result of an escalation run.
#[derive(Debug, Clone)]
pub struct Escalation {
    pub schedule: Schedule,
    pub score: u64,
    pub rounds: u32,
}

impl DurationEscalator {
    pub fn new(divisor: usize, stagnation_rounds: u32) -> Self {
        DurationEscalator {
            divisor: divisor.max(1),
            stagnation_rounds,
        }
    }

    /// Escalate durations and return the best schedule seen across all rounds.
    pub fn run(&self, problem: &Problem, schedule: Schedule, deadline: &Deadline) -> Escalation {
        let mut current = schedule;
        let mut best: Option<(Schedule, u64)> = None;
        let mut rounds = 0u32;
        let mut rounds_since_best = 0u32;

        while rounds_since_best < self.stagnation_rounds && !deadline.expired() {
            rounds += 1;
            rounds_since_best += 1;

            let result = problem.run_simulation(&current);
            if best.as_ref().map_or(true, |(_, score)| result.score > *score) {
                best = Some((current.clone(), result.score));
                rounds_since_best = 0;
            }

            // Stable sort: equal loads stay in intersection order
            let congested: Vec<&IntersectionStats> = result
                .intersection_stats
                .iter()
                .filter(|stats| stats.worst_blocked_street_load > 0)
                .sorted_by(|a, b| b.worst_blocked_street_load.cmp(&a.worst_blocked_street_load))
                .collect();
            if congested.is_empty() {
                debug!("Escalation converged: no blocked traffic left");
                break;
            }

            let selected = congested.len() / self.divisor;
            if selected == 0 {
                debug!(
                    "Escalation stopped: {} congested intersections below divisor {}",
                    congested.len(),
                    self.divisor
                );
                break;
            }

            for stats in congested.iter().take(selected) {
                Self::lengthen_worst_street(problem, &mut current, stats);
            }

            debug!(
                "Escalation round {}: score {}, lengthened {} of {} congested intersections",
                rounds,
                result.score,
                selected,
                congested.len()
            );
        }

        match best {
            Some((schedule, score)) => Escalation {
                schedule,
                score,
                rounds,
            },
            None => {
                let score = problem.run_simulation_lite(&current);
                Escalation {
                    schedule: current,
                    score,
                    rounds,
                }
            }
        }
    }

    /// Add one second to every phase whose street name matches the reported worst street.
    fn lengthen_worst_street(problem: &Problem, schedule: &mut Schedule, stats: &IntersectionStats) {
        let name = match stats.worst_blocked_street_name.as_deref() {
            Some(name) => name,
            None => return,
        };
        let plan = match schedule.intersections.get_mut(stats.id) {
            Some(plan) => plan,
            None => return,
        };

        for phase in plan.phases.iter_mut() {
            if problem.street(phase.street).name == name {
                phase.duration += 1;
            }
        }
    }
}

/// Lengthens the phase of the street with the longest green-light wait, one
/// second at a time, rolling back every step that does not beat the round's score.
#[derive(Debug, Clone, Copy, Default)]
pub struct GreenWaitEscalator;

impl GreenWaitEscalator {
    /// Escalate until a round brings no new best score and return the best schedule.
    pub fn run(&self, problem: &Problem, schedule: Schedule, deadline: &Deadline) -> Escalation {
        // Wait last seen when a step on that street was rolled back
        let mut rejected_at: Vec<Option<u64>> = vec![None; problem.streets.len()];
        let mut current = schedule;
        let mut best: Option<(Schedule, u64)> = None;
        let mut rounds = 0u32;

        'rounds: while !deadline.expired() {
            let result = problem.run_simulation(&current);
            if best.as_ref().map_or(true, |(_, score)| result.score > *score) {
                best = Some((current.clone(), result.score));
            } else {
                break;
            }
            rounds += 1;

            let waiting: Vec<&IntersectionStats> = result
                .intersection_stats
                .iter()
                .filter(|stats| stats.worst_green_light_wait > 0)
                .sorted_by(|a, b| b.worst_green_light_wait.cmp(&a.worst_green_light_wait))
                .collect();
            if waiting.is_empty() {
                debug!("Green-wait escalation converged: no queue behind a green light");
                break;
            }

            let mut kept = 0usize;
            for stats in waiting {
                if deadline.expired() {
                    break 'rounds;
                }
                let street = match stats.worst_green_light_wait_street_id {
                    Some(street) => street,
                    None => continue,
                };
                if rejected_at[street] == Some(stats.worst_green_light_wait) {
                    continue;
                }
                let pos = match current
                    .intersections
                    .get(stats.id)
                    .and_then(|plan| plan.phases.iter().position(|phase| phase.street == street))
                {
                    Some(pos) => pos,
                    None => continue,
                };

                current.intersections[stats.id].phases[pos].duration += 1;
                if problem.run_simulation_lite(&current) > result.score {
                    rejected_at[street] = None;
                    kept += 1;
                } else {
                    current.intersections[stats.id].phases[pos].duration -= 1;
                    rejected_at[street] = Some(stats.worst_green_light_wait);
                }
            }

            debug!(
                "Green-wait round {}: score {}, kept {} steps",
                rounds, result.score, kept
            );
        }

        match best {
            Some((schedule, score)) => Escalation {
                schedule,
                score,
                rounds,
            },
            None => {
                let score = problem.run_simulation_lite(&current);
                Escalation {
                    schedule: current,
                    score,
                    rounds,
                }
            }
        }
    }
}
