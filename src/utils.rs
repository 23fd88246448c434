//! Utility functions and structures for reporting optimization runs.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::problem::Problem;
use crate::schedule::Schedule;

/// Format a duration as hours, minutes, and seconds.
pub fn format_duration(duration: Duration) -> String {
    let total_seconds = duration.as_secs();
    let hours = total_seconds / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}h {:02}m {:02}s", hours, minutes, seconds)
}

/// Save a schedule in submission format.
pub fn save_schedule<P: AsRef<Path>>(
    schedule: &Schedule,
    problem: &Problem,
    path: P,
) -> Result<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    schedule.write_submission(problem, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Fail a batch run in which every attempted instance was skipped.
pub fn check_batch(solved: usize, attempted: usize) -> Result<()> {
    if solved == 0 && attempted > 0 {
        return Err(Error::NoInstanceSolved { attempted });
    }
    Ok(())
}

/// Scores and counters collected over one optimization run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunStatistics {
    pub instance: String,
    pub score_upper_bound: u64,
    pub removed_streets: usize,
    pub initial_score: u64,
    pub ordered_score: u64,
    pub seeded_score: u64,
    pub escalation_divisor: usize,
    pub escalated_score: u64,
    pub green_wait_score: u64,
    pub pruned_score: u64,
    pub final_score: u64,
    pub escalation_rounds: u32,
    pub hill_climb_passes: u64,
    pub evaluations: u64,
    pub improvements: u64,
    #[serde(with = "duration_secs")]
    pub runtime: Duration,
}

impl RunStatistics {
    /// Format the statistics as a string.
    pub fn format(&self) -> String {
        format!(
            "Run Statistics ({}):
- Score Upper Bound: {}
- Removed Streets: {}
- Initial Score: {}
- After Ordering: {}
- After Seeding: {}
- After Escalation: {} ({} rounds, divisor {})
- After Green-Wait Escalation: {}
- After Pruning: {}
- Final Score: {}
- Hill-Climb Passes: {}
- Evaluations: {}
- Improvements: {}
- Runtime: {}",
            self.instance,
            self.score_upper_bound,
            self.removed_streets,
            self.initial_score,
            self.ordered_score,
            self.seeded_score,
            self.escalated_score,
            self.escalation_rounds,
            self.escalation_divisor,
            self.green_wait_score,
            self.pruned_score,
            self.final_score,
            self.hill_climb_passes,
            self.evaluations,
            self.improvements,
            format_duration(self.runtime)
        )
    }
}

mod duration_secs {
    use serde::Serializer;
    use std::time::Duration;

    pub fn serialize<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(duration.as_secs_f64())
    }
}
