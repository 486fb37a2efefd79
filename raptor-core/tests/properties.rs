mod common;

use common::{FeedBuilder, assert_sound, query};
use proptest::prelude::*;
use raptor_core::prelude::*;

#[derive(Debug, Clone)]
struct RandomRoute {
    stops: Vec<usize>,
    hops: Vec<Time>,
    starts: Vec<Time>,
}

#[derive(Debug, Clone)]
struct Case {
    num_stops: usize,
    routes: Vec<RandomRoute>,
    walks: Vec<(usize, usize, Time)>,
    source: usize,
    target: usize,
    departure: Time,
}

fn first_occurrences(stops: Vec<usize>) -> Vec<usize> {
    let mut unique = Vec::with_capacity(stops.len());
    for stop in stops {
        if !unique.contains(&stop) {
            unique.push(stop);
        }
    }
    unique
}

fn route_strategy(num_stops: usize) -> impl Strategy<Value = RandomRoute> {
    prop::collection::vec(0..num_stops, 2..=num_stops)
        .prop_map(first_occurrences)
        .prop_filter("a route needs two stops", |stops| stops.len() >= 2)
        .prop_flat_map(|stops| {
            let hops = prop::collection::vec(1..300u32, stops.len() - 1);
            let starts = prop::collection::vec(0..2_000u32, 1..=3);
            (Just(stops), hops, starts)
        })
        .prop_map(|(stops, hops, starts)| RandomRoute {
            stops,
            hops,
            starts,
        })
}

prop_compose! {
    fn case_strategy()(num_stops in 3usize..=7)(
        routes in prop::collection::vec(route_strategy(num_stops), 1..=4),
        walks in prop::collection::vec((0..num_stops, 0..num_stops, 1..600u32), 0..=4),
        source in 0..num_stops,
        target in 0..num_stops,
        departure in 0..1_500u32,
        num_stops in Just(num_stops),
    ) -> Case {
        Case { num_stops, routes, walks, source, target, departure }
    }
}

fn stop_name(idx: usize) -> String {
    format!("s{idx}")
}

/// Trips of a route share travel times, so they never overtake each other
fn build(case: &Case) -> TransitNetwork {
    let names: Vec<String> = (0..case.num_stops).map(stop_name).collect();
    let refs: Vec<&str> = names.iter().map(String::as_str).collect();
    let mut builder = FeedBuilder::with_stops(&refs);

    for (route_idx, route) in case.routes.iter().enumerate() {
        for (trip_idx, &start) in route.starts.iter().enumerate() {
            let mut time = start;
            let mut calls = vec![(refs[route.stops[0]], time)];
            for (&stop, &hop) in route.stops[1..].iter().zip(&route.hops) {
                time += hop;
                calls.push((refs[stop], time));
            }
            builder = builder.simple_trip(
                &format!("r{route_idx}t{trip_idx}"),
                &format!("r{route_idx}"),
                &calls,
            );
        }
    }
    for &(a, b, duration) in &case.walks {
        if a != b {
            builder = builder.walk(refs[a], refs[b], duration);
        }
    }
    builder.build()
}

fn case_query(case: &Case) -> Query {
    query(
        &stop_name(case.source),
        &stop_name(case.target),
        case.departure,
    )
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn arrivals_never_worsen_across_rounds(case in case_strategy()) {
        prop_assume!(case.source != case.target);
        let network = build(&case);
        let state = raptor(&network, case.source, case.target, case.departure, &RaptorConfig::default())
            .unwrap();

        for round in 1..state.round_count() {
            for stop in 0..network.stop_count() {
                let before = state.label(round - 1, stop).arrival_or_max();
                let after = state.label(round, stop).arrival_or_max();
                prop_assert!(after <= before, "stop {} got worse in round {}", stop, round);
            }
        }
    }

    #[test]
    fn rounds_are_bounded_by_stop_count(case in case_strategy()) {
        prop_assume!(case.source != case.target);
        let network = build(&case);
        let config = RaptorConfig { max_rounds: usize::MAX, ..RaptorConfig::default() };
        let state = raptor(&network, case.source, case.target, case.departure, &config).unwrap();
        prop_assert!(state.round_count() <= network.stop_count() + 1);
    }

    #[test]
    fn journeys_are_sound_and_pareto(case in case_strategy()) {
        prop_assume!(case.source != case.target);
        let network = build(&case);
        let q = case_query(&case);
        let journeys = find_journeys(&network, &q, &RaptorConfig::default()).unwrap();

        for journey in &journeys {
            assert_sound(&network, journey, &q.source, &q.target);
            prop_assert_eq!(journey.departure_time, case.departure);
        }
        for pair in journeys.windows(2) {
            prop_assert!(pair[0].round < pair[1].round);
            prop_assert!(pair[0].arrival_time > pair[1].arrival_time, "dominated journey {:?}", pair[1]);
        }

        let state = raptor(&network, case.source, case.target, case.departure, &RaptorConfig::default())
            .unwrap();
        let best = state.arrival(state.last_round(), case.target);
        prop_assert_eq!(best, journeys.last().map(|j| j.arrival_time));
    }

    #[test]
    fn unpruned_search_stays_sound(case in case_strategy()) {
        prop_assume!(case.source != case.target);
        let network = build(&case);
        let q = case_query(&case);
        let config = RaptorConfig { target_pruning: false, ..RaptorConfig::default() };
        for journey in find_journeys(&network, &q, &config).unwrap() {
            assert_sound(&network, &journey, &q.source, &q.target);
        }
    }

    #[test]
    fn queries_are_idempotent(case in case_strategy()) {
        prop_assume!(case.source != case.target);
        let network = build(&case);
        let q = case_query(&case);
        let first = find_journeys(&network, &q, &RaptorConfig::default()).unwrap();
        let second = find_journeys(&network, &q, &RaptorConfig::default()).unwrap();
        prop_assert_eq!(first, second);
    }
}
