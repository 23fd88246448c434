//! Unit tests for the move generators and sweeps.

use std::time::Duration;

use traffic_signals::deadline::Deadline;
use traffic_signals::generator::{generate, GeneratorParams};
use traffic_signals::local_search::utils::{is_adjacent, loop_positions, window_size};
use traffic_signals::local_search::{delta_duration, relocate, swap, LocalSearch};
use traffic_signals::problem::Problem;
use traffic_signals::schedule::{Phase, Schedule};

/// Two cars wait on street `a`; street `c` competes for the same light.
fn create_two_car_problem() -> Problem {
    let text = "\
6 2 3 2 1000
0 1 a 1
1 0 b 2
0 1 c 1
2 a b
2 a b
";
    Problem::parse("TwoCars", text).unwrap()
}

/// A single car with a two-street route through a two-intersection network.
fn create_one_car_problem() -> Problem {
    let text = "\
6 2 3 1 1000
0 1 a 1
1 0 b 2
0 1 c 1
2 a b
";
    Problem::parse("OneCar", text).unwrap()
}

/// One car whose first street shares its light with two other streets.
fn create_three_way_problem() -> Problem {
    let text = "\
6 2 4 1 1000
0 1 c 1
0 1 d 1
0 1 a 1
1 0 b 2
2 a b
";
    Problem::parse("ThreeWay", text).unwrap()
}

fn long_deadline() -> Deadline {
    Deadline::after(Duration::from_secs(60))
}

fn generated_schedule(seed: u64) -> (Problem, Schedule) {
    let problem = generate(&GeneratorParams::default(), seed);
    let schedule = Schedule::naive(&problem);
    (problem, schedule)
}

#[test]
fn test_swap_is_an_involution() {
    let (_, schedule) = generated_schedule(1);
    let i = (0..schedule.intersection_count())
        .find(|&i| schedule.intersections[i].len() >= 3)
        .unwrap();

    let once = swap(&schedule, i, 0, 2);
    assert_ne!(once, schedule);
    assert_eq!(once.intersections[i].phases[0], schedule.intersections[i].phases[2]);

    let twice = swap(&once, i, 0, 2);
    assert_eq!(twice, schedule);
}

#[test]
fn test_relocate_shifts_intervening_phases() {
    let mut schedule = Schedule::new(1);
    schedule.intersections[0].phases = (0..5).map(|street| Phase::new(street, 1)).collect();

    let moved = relocate(&schedule, 0, 0, 3);
    let order: Vec<usize> = moved.intersections[0].phases.iter().map(|p| p.street).collect();
    assert_eq!(order, vec![1, 2, 3, 0, 4]);

    let back = relocate(&moved, 0, 3, 0);
    assert_eq!(back, schedule);

    // Input is never modified
    let order: Vec<usize> = schedule.intersections[0].phases.iter().map(|p| p.street).collect();
    assert_eq!(order, vec![0, 1, 2, 3, 4]);
}

#[test]
fn test_delta_duration_round_trip() {
    let (_, schedule) = generated_schedule(2);

    let longer = delta_duration(&schedule, 0, 0, 3).unwrap();
    assert_eq!(longer.intersections[0].phases[0].duration, 4);
    assert_eq!(schedule.intersections[0].phases[0].duration, 1);

    let restored = delta_duration(&longer, 0, 0, -3).unwrap();
    assert_eq!(restored, schedule);
}

#[test]
fn test_delta_duration_rejects_negative_duration() {
    let (_, schedule) = generated_schedule(2);

    assert!(delta_duration(&schedule, 0, 0, -2).is_none());

    let zero = delta_duration(&schedule, 0, 0, -1).unwrap();
    assert_eq!(zero.intersections[0].phases[0].duration, 0);
    assert_eq!(zero.intersections[0].len(), schedule.intersections[0].len());
}

#[test]
fn test_window_helpers() {
    let (_, schedule) = generated_schedule(4);
    let longest = schedule.max_plan_len();

    assert_eq!(window_size(&schedule, usize::MAX), longest);
    assert_eq!(window_size(&schedule, 1), 1);
    assert_eq!(loop_positions(3, 10), 3);
    assert_eq!(loop_positions(10, 3), 3);
    assert!(is_adjacent(2, 3));
    assert!(is_adjacent(3, 2));
    assert!(!is_adjacent(1, 3));
}

#[test]
fn test_delta_sweep_lengthens_first_street_when_it_helps() {
    let problem = create_two_car_problem();
    let schedule = Schedule::naive(&problem);
    assert_eq!(problem.run_simulation_lite(&schedule), (1000 + 4) + (1000 + 2));

    let mut local_search = LocalSearch::new(long_deadline(), 1);
    let improved = local_search.delta_sweep(&problem, &schedule, 1);

    assert_eq!(improved.intersections[1].phases[0], Phase::new(0, 2));
    assert_eq!(improved.intersections[1].phases[1], Phase::new(2, 1));
    // Street `b` is never queued on, lengthening it is not an improvement
    assert_eq!(improved.intersections[0].phases[0], Phase::new(1, 1));
    assert_eq!(problem.run_simulation_lite(&improved), (1000 + 4) + (1000 + 3));
    assert_eq!(local_search.evaluations, 2);
}

#[test]
fn test_delta_sweep_leaves_single_car_schedule_unchanged() {
    let problem = create_one_car_problem();
    let schedule = Schedule::naive(&problem);
    assert_eq!(problem.run_simulation_lite(&schedule), 1000 + 4);

    let mut local_search = LocalSearch::new(long_deadline(), 1);
    let result = local_search.delta_sweep(&problem, &schedule, 1);

    assert_eq!(result, schedule);
    assert_eq!(problem.run_simulation_lite(&result), 1000 + 4);
}

#[test]
fn test_negative_delta_sweep_accepts_ties() {
    let problem = create_two_car_problem();
    let schedule = Schedule::naive(&problem);

    let mut local_search = LocalSearch::new(long_deadline(), usize::MAX);
    let result = local_search.delta_sweep(&problem, &schedule, -1);

    // `b` shrinks to zero at no cost, `a` would stop all traffic, `c` frees `a`.
    assert_eq!(result.intersections[0].phases, vec![Phase::new(1, 0)]);
    assert_eq!(
        result.intersections[1].phases,
        vec![Phase::new(0, 1), Phase::new(2, 0)]
    );
    assert_eq!(problem.run_simulation_lite(&result), (1000 + 4) + (1000 + 3));
}

#[test]
fn test_swap_sweep_moves_used_street_first() {
    let problem = create_one_car_problem();
    let mut schedule = Schedule::naive(&problem);
    schedule.intersections[1].phases.swap(0, 1);
    assert_eq!(problem.run_simulation_lite(&schedule), 1000 + 3);

    let mut local_search = LocalSearch::for_schedule(long_deadline(), &schedule, usize::MAX);
    let result = local_search.swap_sweep(&problem, &schedule);

    assert_eq!(result.intersections[1].phases[0].street, 0);
    assert_eq!(problem.run_simulation_lite(&result), 1000 + 4);
    assert_eq!(local_search.improvements, 1);
}

#[test]
fn test_relocate_sweep_moves_used_street_to_front() {
    let problem = create_three_way_problem();
    let schedule = Schedule::naive(&problem);
    // Naive order is c, d, a: the car crosses at t=2.
    assert_eq!(problem.run_simulation_lite(&schedule), 1000 + 2);

    let mut local_search = LocalSearch::for_schedule(long_deadline(), &schedule, usize::MAX);
    let result = local_search.relocate_sweep(&problem, &schedule);

    let order: Vec<usize> = result.intersections[1].phases.iter().map(|p| p.street).collect();
    assert_eq!(order, vec![2, 0, 1]);
    assert_eq!(problem.run_simulation_lite(&result), 1000 + 4);
}

#[test]
fn test_relocate_sweep_skips_adjacent_moves() {
    let problem = create_one_car_problem();
    let mut schedule = Schedule::naive(&problem);
    schedule.intersections[1].phases.swap(0, 1);

    // Only adjacent pairs exist in a two-phase plan.
    let mut local_search = LocalSearch::new(long_deadline(), usize::MAX);
    let result = local_search.relocate_sweep(&problem, &schedule);

    assert_eq!(result, schedule);
    assert_eq!(local_search.evaluations, 0);
}

#[test]
fn test_window_limits_edited_positions() {
    let problem = create_three_way_problem();
    let schedule = Schedule::naive(&problem);

    let mut local_search = LocalSearch::new(long_deadline(), 2);
    let swapped = local_search.swap_sweep(&problem, &schedule);
    let relocated = local_search.relocate_sweep(&problem, &swapped);

    // `a` sits at position 2, outside the window.
    assert_eq!(relocated, schedule);
}

#[test]
fn test_sweeps_never_lower_the_score() {
    for seed in 0..3 {
        let (problem, schedule) = generated_schedule(seed);
        let base = problem.run_simulation_lite(&schedule);
        let mut local_search = LocalSearch::for_schedule(long_deadline(), &schedule, 4);

        let swapped = local_search.swap_sweep(&problem, &schedule);
        let swapped_score = problem.run_simulation_lite(&swapped);
        assert!(swapped_score >= base);

        let relocated = local_search.relocate_sweep(&problem, &swapped);
        let relocated_score = problem.run_simulation_lite(&relocated);
        assert!(relocated_score >= swapped_score);

        let longer = local_search.delta_sweep(&problem, &relocated, 2);
        let longer_score = problem.run_simulation_lite(&longer);
        assert!(longer_score >= relocated_score);

        let shorter = local_search.delta_sweep(&problem, &longer, -1);
        assert!(problem.run_simulation_lite(&shorter) >= longer_score);
    }
}

#[test]
fn test_sweeps_are_deterministic() {
    let (problem, schedule) = generated_schedule(5);

    let run = || {
        let mut local_search = LocalSearch::for_schedule(long_deadline(), &schedule, 3);
        let swapped = local_search.swap_sweep(&problem, &schedule);
        local_search.delta_sweep(&problem, &swapped, 1)
    };

    assert_eq!(run(), run());
}

#[test]
fn test_expired_deadline_returns_input() {
    let (problem, schedule) = generated_schedule(6);
    let mut local_search = LocalSearch::for_schedule(Deadline::expired_now(), &schedule, usize::MAX);

    assert_eq!(local_search.swap_sweep(&problem, &schedule), schedule);
    assert_eq!(local_search.relocate_sweep(&problem, &schedule), schedule);
    assert_eq!(local_search.delta_sweep(&problem, &schedule, -1), schedule);
    assert_eq!(local_search.evaluations, 0);

    let climbed = local_search.hill_climb(&problem, schedule.clone(), 3, None);
    assert_eq!(climbed, schedule);
    assert_eq!(local_search.passes, 0);
}

#[test]
fn test_hill_climb_stops_on_stagnation_when_asked() {
    let problem = create_two_car_problem();
    let schedule = Schedule::naive(&problem);

    let mut local_search = LocalSearch::for_schedule(long_deadline(), &schedule, usize::MAX);
    let result = local_search.hill_climb(&problem, schedule.clone(), 3, Some(2));

    assert!(problem.run_simulation_lite(&result) >= problem.run_simulation_lite(&schedule));
    assert!(local_search.passes >= 2);
}
