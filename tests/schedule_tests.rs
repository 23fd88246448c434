//! Unit tests for the schedule representation and submission output.

use traffic_signals::problem::Problem;
use traffic_signals::schedule::{IntersectionPlan, Phase, Schedule};

/// Creates a two-intersection problem where both cars wait on street `a`.
fn create_test_problem() -> Problem {
    let text = "\
6 2 3 2 1000
0 1 a 1
1 0 b 2
0 1 c 1
2 a b
2 a b
";
    Problem::parse("TestProblem", text).unwrap()
}

#[test]
fn test_naive_schedule() {
    let problem = create_test_problem();
    let schedule = Schedule::naive(&problem);

    assert_eq!(schedule.intersection_count(), 2);
    assert_eq!(schedule.intersections[0].phases, vec![Phase::new(1, 1)]);
    assert_eq!(
        schedule.intersections[1].phases,
        vec![Phase::new(0, 1), Phase::new(2, 1)]
    );
    assert_eq!(schedule.max_plan_len(), 2);
    assert_eq!(schedule.intersections[1].period(), 2);
}

#[test]
fn test_naive_schedule_after_removing_unused_streets() {
    let mut problem = create_test_problem();
    assert_eq!(problem.remove_unused_streets(), 2);

    let schedule = Schedule::naive(&problem);
    assert!(schedule.intersections[0].is_empty());
    assert_eq!(schedule.intersections[1].phases, vec![Phase::new(0, 1)]);
}

#[test]
fn test_clone_is_independent() {
    let problem = create_test_problem();
    let original = Schedule::naive(&problem);

    let mut copy = original.clone();
    copy.intersections[1].phases[0].duration = 7;
    copy.intersections[1].phases.swap(0, 1);
    copy.intersections[0].phases.clear();

    assert_eq!(original, Schedule::naive(&problem));
    assert_ne!(original, copy);
}

#[test]
fn test_plan_helpers() {
    let mut plan = IntersectionPlan::new();
    plan.phases = vec![Phase::new(3, 2), Phase::new(4, 0), Phase::new(3, 1), Phase::new(5, 4)];

    assert_eq!(plan.period(), 7);
    assert_eq!(plan.active_count(), 3);
    assert!(!plan.phases[1].is_active());

    assert_eq!(plan.remove_street(3), 2);
    assert_eq!(plan.phases, vec![Phase::new(4, 0), Phase::new(5, 4)]);
}

#[test]
fn test_submission_format() {
    let problem = create_test_problem();
    let mut schedule = Schedule::naive(&problem);
    schedule.intersections[1].phases[0].duration = 3;

    assert_eq!(schedule.count_intersections_with_green_lights(), 2);
    assert_eq!(schedule.to_submission(&problem), "2\n0\n1\nb 1\n1\n2\na 3\nc 1\n");
}

#[test]
fn test_submission_skips_inert_phases_and_empty_intersections() {
    let problem = create_test_problem();
    let mut schedule = Schedule::naive(&problem);
    schedule.intersections[0].phases[0].duration = 0;
    schedule.intersections[1].phases[1].duration = 0;

    assert_eq!(schedule.count_intersections_with_green_lights(), 1);
    assert_eq!(schedule.to_submission(&problem), "1\n1\n1\na 1\n");
}

#[test]
fn test_submission_of_empty_schedule() {
    let problem = create_test_problem();
    let schedule = Schedule::new(problem.intersections.len());

    assert_eq!(schedule.to_submission(&problem), "0\n");
}
