//! Discrete per-second traffic simulation used to score schedules.

use crate::problem::Problem;
use crate::schedule::Schedule;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// A car that did not reach the end of its route before the deadline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CarTrace {
    /// Car id, an index into `Problem::cars`
    pub car: usize,
    /// Seconds still to drive on the current street when time ran out (0 if queued)
    pub time_left_on_drive: u32,
}

/// Congestion hot-spots observed at one intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionStats {
    pub id: usize,
    /// Street with the most car-seconds queued at a red light
    pub worst_blocked_street_name: Option<String>,
    pub worst_blocked_street_load: u64,
    /// Street with the most car-seconds queued behind another car while green
    pub worst_green_light_wait_street_id: Option<usize>,
    pub worst_green_light_wait: u64,
}

/// Outcome of a full simulation run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SimulationResult {
    pub score: u64,
    pub finished_cars: usize,
    pub unfinished_cars: Vec<CarTrace>,
    pub intersection_stats: Vec<IntersectionStats>,
}

impl SimulationResult {
    /// Largest blocked load over all intersections.
    pub fn max_blocked_traffic(&self) -> u64 {
        self.intersection_stats
            .iter()
            .map(|stats| stats.worst_blocked_street_load)
            .max()
            .unwrap_or(0)
    }
}

/// Second-by-second green street lookup for every intersection.
struct Lights {
    /// Expanded cycle per intersection, truncated to the simulated horizon
    cycles: Vec<Vec<usize>>,
    periods: Vec<u32>,
}

impl Lights {
    fn new(problem: &Problem, schedule: &Schedule) -> Self {
        let horizon = problem.duration as usize + 1;
        let mut cycles = Vec::with_capacity(schedule.intersections.len());
        let mut periods = Vec::with_capacity(schedule.intersections.len());

        for plan in &schedule.intersections {
            let period = plan.period();
            let mut cycle = Vec::with_capacity((period as usize).min(horizon));

            'phases: for phase in plan.phases.iter().filter(|phase| phase.is_active()) {
                for _ in 0..phase.duration {
                    if cycle.len() == horizon {
                        break 'phases;
                    }
                    cycle.push(phase.street);
                }
            }

            cycles.push(cycle);
            periods.push(period);
        }

        Lights { cycles, periods }
    }

    fn is_green(&self, intersection: usize, street: usize, time: u32) -> bool {
        match self.periods.get(intersection) {
            Some(&period) if period > 0 => {
                self.cycles[intersection][(time % period) as usize] == street
            }
            _ => false,
        }
    }
}

impl Problem {
    /// Score a schedule without collecting diagnostics.
    pub fn run_simulation_lite(&self, schedule: &Schedule) -> u64 {
        self.simulate(schedule, false).score
    }

    /// Score a schedule and report unfinished cars and per-intersection congestion.
    pub fn run_simulation(&self, schedule: &Schedule) -> SimulationResult {
        self.simulate(schedule, true)
    }

    fn simulate(&self, schedule: &Schedule, diagnostics: bool) -> SimulationResult {
        let duration = self.duration;
        let lights = Lights::new(self, schedule);

        let mut queues: Vec<VecDeque<usize>> = vec![VecDeque::new(); self.streets.len()];
        let mut waiting: Vec<usize> = Vec::new();
        let mut arrivals: Vec<Vec<usize>> = vec![Vec::new(); duration as usize + 1];
        let mut leg = vec![0usize; self.cars.len()];
        let mut arrival_time = vec![0u32; self.cars.len()];
        let mut finished = vec![false; self.cars.len()];

        let mut blocked = vec![0u64; if diagnostics { self.streets.len() } else { 0 }];
        let mut green_wait = vec![0u64; if diagnostics { self.streets.len() } else { 0 }];

        let mut score = 0u64;
        let mut finished_cars = 0usize;

        for car in &self.cars {
            arrivals[0].push(car.id);
        }

        for time in 0..=duration {
            for car in std::mem::take(&mut arrivals[time as usize]) {
                let route = &self.cars[car].route;
                let street = route[leg[car]];

                if leg[car] + 1 == route.len() {
                    finished[car] = true;
                    finished_cars += 1;
                    score += u64::from(self.bonus_per_car) + u64::from(duration - time);
                    continue;
                }

                if queues[street].is_empty() {
                    waiting.push(street);
                }
                queues[street].push_back(car);
            }

            for &street in &waiting {
                let intersection = self.streets[street].end_intersection;
                let green = lights.is_green(intersection, street, time);

                if diagnostics {
                    let queued = queues[street].len() as u64;
                    if green {
                        green_wait[street] += queued - 1;
                    } else {
                        blocked[street] += queued;
                    }
                }

                if !green {
                    continue;
                }

                if let Some(car) = queues[street].pop_front() {
                    leg[car] += 1;
                    let next = self.cars[car].route[leg[car]];
                    let arrival = time + self.streets[next].length.max(1);
                    arrival_time[car] = arrival;
                    if arrival <= duration {
                        arrivals[arrival as usize].push(car);
                    }
                }
            }

            waiting.retain(|&street| !queues[street].is_empty());
        }

        let mut result = SimulationResult {
            score,
            finished_cars,
            ..SimulationResult::default()
        };

        if diagnostics {
            result.unfinished_cars = (0..self.cars.len())
                .filter(|&car| !finished[car])
                .map(|car| CarTrace {
                    car,
                    time_left_on_drive: arrival_time[car].saturating_sub(duration),
                })
                .collect();
            result.intersection_stats = self.intersection_stats(&blocked, &green_wait);
        }

        result
    }

    fn intersection_stats(&self, blocked: &[u64], green_wait: &[u64]) -> Vec<IntersectionStats> {
        let mut stats: Vec<IntersectionStats> = (0..self.intersections.len())
            .map(|id| IntersectionStats {
                id,
                ..IntersectionStats::default()
            })
            .collect();

        for street in &self.streets {
            let entry = &mut stats[street.end_intersection];

            if blocked[street.id] > entry.worst_blocked_street_load {
                entry.worst_blocked_street_load = blocked[street.id];
                entry.worst_blocked_street_name = Some(street.name.clone());
            }
            if green_wait[street.id] > entry.worst_green_light_wait {
                entry.worst_green_light_wait = green_wait[street.id];
                entry.worst_green_light_wait_street_id = Some(street.id);
            }
        }

        stats
    }
}
