//! Green-light schedule representation.

use crate::problem::Problem;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Write};

/// One entry of an intersection's green-light cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    /// Street id receiving the green light
    pub street: usize,
    /// Seconds of green light; zero keeps the phase as an inert placeholder
    pub duration: u32,
}

impl Phase {
    pub fn new(street: usize, duration: u32) -> Self {
        Phase { street, duration }
    }

    /// Does this phase take part in the activation cycle?
    pub fn is_active(&self) -> bool {
        self.duration > 0
    }
}

/// The ordered green-light cycle of a single intersection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntersectionPlan {
    pub phases: Vec<Phase>,
}

impl IntersectionPlan {
    pub fn new() -> Self {
        IntersectionPlan { phases: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    /// Cycle period: the sum of positive durations.
    pub fn period(&self) -> u32 {
        self.phases.iter().map(|phase| phase.duration).sum()
    }

    /// Number of phases with a positive duration.
    pub fn active_count(&self) -> usize {
        self.phases.iter().filter(|phase| phase.is_active()).count()
    }

    /// Remove every phase for `street`, returning how many were removed.
    pub fn remove_street(&mut self, street: usize) -> usize {
        let before = self.phases.len();
        self.phases.retain(|phase| phase.street != street);
        before - self.phases.len()
    }
}

/// A full assignment of green-light cycles, indexed by intersection id.
///
/// `Clone` produces an independent deep copy, which every move generator relies on.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schedule {
    pub intersections: Vec<IntersectionPlan>,
}

impl Schedule {
    /// Create a schedule with an empty plan for every intersection.
    pub fn new(intersection_count: usize) -> Self {
        Schedule {
            intersections: vec![IntersectionPlan::new(); intersection_count],
        }
    }

    /// Every incoming street gets a one-second green light, in network order.
    pub fn naive(problem: &Problem) -> Self {
        let mut schedule = Schedule::new(problem.intersections.len());

        for intersection in &problem.intersections {
            schedule.intersections[intersection.id].phases = intersection
                .incoming_streets
                .iter()
                .map(|&street| Phase::new(street, 1))
                .collect();
        }

        schedule
    }

    pub fn intersection_count(&self) -> usize {
        self.intersections.len()
    }

    /// Length of the longest plan.
    pub fn max_plan_len(&self) -> usize {
        self.intersections
            .iter()
            .map(IntersectionPlan::len)
            .max()
            .unwrap_or(0)
    }

    /// Number of intersections with at least one positive-duration phase.
    pub fn count_intersections_with_green_lights(&self) -> usize {
        self.intersections
            .iter()
            .filter(|plan| plan.active_count() > 0)
            .count()
    }

    /// Write the schedule in submission format.
    ///
    /// Only phases with a positive duration are written, and intersections
    /// without any such phase are omitted entirely.
    pub fn write_submission<W: Write>(&self, problem: &Problem, mut out: W) -> io::Result<()> {
        writeln!(out, "{}", self.count_intersections_with_green_lights())?;

        for (id, plan) in self.intersections.iter().enumerate() {
            let active = plan.active_count();
            if active == 0 {
                continue;
            }

            writeln!(out, "{}", id)?;
            writeln!(out, "{}", active)?;
            for phase in plan.phases.iter().filter(|phase| phase.is_active()) {
                writeln!(out, "{} {}", problem.street(phase.street).name, phase.duration)?;
            }
        }

        Ok(())
    }

    /// Render the submission format into a string.
    pub fn to_submission(&self, problem: &Problem) -> String {
        let mut buffer = Vec::new();
        // Writing into a Vec cannot fail.
        let _ = self.write_submission(problem, &mut buffer);
        String::from_utf8_lossy(&buffer).into_owned()
    }
}

impl fmt::Debug for Schedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Schedule:")?;
        writeln!(f, "  Intersections: {}", self.intersections.len())?;
        writeln!(
            f,
            "  With green lights: {}",
            self.count_intersections_with_green_lights()
        )?;

        for (i, plan) in self.intersections.iter().enumerate() {
            if plan.is_empty() {
                continue;
            }
            let phases: Vec<(usize, u32)> = plan
                .phases
                .iter()
                .map(|phase| (phase.street, phase.duration))
                .collect();
            writeln!(f, "  Intersection {}: {:?} (Period: {})", i, phases, plan.period())?;
        }

        Ok(())
    }
}
