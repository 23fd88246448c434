//! Unit tests for parsing and the derived network data.

use traffic_signals::problem::Problem;
use traffic_signals::Error;

const SMALL_INSTANCE: &str = "\
6 4 5 2 1000
2 0 rue-de-londres 1
0 1 rue-d-amsterdam 1
3 1 rue-d-athenes 1
2 3 rue-de-rome 2
1 2 rue-de-moscou 3
4 rue-de-londres rue-d-amsterdam rue-de-moscou rue-de-rome
3 rue-d-athenes rue-de-moscou rue-de-londres
";

#[test]
fn test_parse_small_instance() {
    let problem = Problem::parse("small", SMALL_INSTANCE).unwrap();

    assert_eq!(problem.name, "small");
    assert_eq!(problem.duration, 6);
    assert_eq!(problem.bonus_per_car, 1000);
    assert_eq!(problem.intersections.len(), 4);
    assert_eq!(problem.streets.len(), 5);
    assert_eq!(problem.cars.len(), 2);

    let moscou = problem.street_id("rue-de-moscou").unwrap();
    assert_eq!(problem.street(moscou).start_intersection, 1);
    assert_eq!(problem.street(moscou).end_intersection, 2);
    assert_eq!(problem.street(moscou).length, 3);

    assert_eq!(problem.cars[0].route, vec![0, 1, 4, 3]);
    assert_eq!(problem.cars[1].route, vec![2, 4, 0]);
}

#[test]
fn test_incoming_usage_counts_skip_final_leg() {
    let problem = Problem::parse("small", SMALL_INSTANCE).unwrap();

    let usage = |name: &str| problem.street(problem.street_id(name).unwrap()).incoming_usage_count;

    assert_eq!(usage("rue-de-londres"), 1);
    assert_eq!(usage("rue-d-amsterdam"), 1);
    assert_eq!(usage("rue-d-athenes"), 1);
    // Only ever the last street of a route
    assert_eq!(usage("rue-de-rome"), 0);
    assert_eq!(usage("rue-de-moscou"), 2);
}

#[test]
fn test_incoming_streets_per_intersection() {
    let problem = Problem::parse("small", SMALL_INSTANCE).unwrap();

    assert_eq!(problem.intersections[0].incoming_streets, vec![0]);
    assert_eq!(problem.intersections[1].incoming_streets, vec![1, 2]);
    assert_eq!(problem.intersections[2].incoming_streets, vec![4]);
    assert_eq!(problem.intersections[3].incoming_streets, vec![3]);
    assert_eq!(problem.intersections[2].outgoing_streets, vec![0, 3]);
}

#[test]
fn test_remove_unused_streets() {
    let mut problem = Problem::parse("small", SMALL_INSTANCE).unwrap();

    let removed = problem.remove_unused_streets();

    assert_eq!(removed, 1);
    assert!(problem.intersections[3].incoming_streets.is_empty());
    // Street records stay addressable
    assert_eq!(problem.street(3).name, "rue-de-rome");

    // Idempotent
    assert_eq!(problem.remove_unused_streets(), 0);
}

#[test]
fn test_score_upper_bound() {
    let problem = Problem::parse("small", SMALL_INSTANCE).unwrap();

    // Car 0 drives 1 + 3 + 2 = 6 seconds, car 1 drives 3 + 1 = 4 seconds.
    assert_eq!(problem.free_flow_time(&problem.cars[0]), 6);
    assert_eq!(problem.free_flow_time(&problem.cars[1]), 4);
    assert_eq!(problem.score_upper_bound(), (1000 + 0) + (1000 + 2));
}

#[test]
fn test_score_upper_bound_ignores_cars_that_cannot_finish() {
    let text = "\
3 2 2 1 50
0 1 short 1
1 0 long 10
2 short long
";
    let problem = Problem::parse("bound", text).unwrap();
    assert_eq!(problem.score_upper_bound(), 0);
}

#[test]
fn test_parse_rejects_unknown_street() {
    let text = "\
6 2 1 1 10
0 1 a 1
2 a nowhere
";
    match Problem::parse("bad", text) {
        Err(Error::Parse { line, message }) => {
            assert_eq!(line, 3);
            assert!(message.contains("nowhere"));
        }
        other => panic!("expected parse error, got {:?}", other.map(|p| p.name)),
    }
}

#[test]
fn test_parse_rejects_bad_header_and_ranges() {
    assert!(matches!(
        Problem::parse("bad", "6 2 1 1\n"),
        Err(Error::Parse { line: 1, .. })
    ));
    assert!(matches!(
        Problem::parse("bad", "6 2 1 0 10\n0 5 a 1\n"),
        Err(Error::Parse { line: 2, .. })
    ));
    assert!(matches!(
        Problem::parse("bad", "6 2 2 0 10\n0 1 a 1\n"),
        Err(Error::Parse { .. })
    ));
    assert!(matches!(Problem::parse("bad", ""), Err(Error::Parse { .. })));
}

#[test]
fn test_parse_rejects_route_length_mismatch() {
    let text = "\
6 2 2 1 10
0 1 a 1
1 0 b 1
3 a b
";
    assert!(matches!(
        Problem::parse("bad", text),
        Err(Error::Parse { line: 4, .. })
    ));
}
