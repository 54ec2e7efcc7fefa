//! Property checks of the search engine against a brute-force oracle.

use std::sync::OnceLock;

use itertools::Itertools;
use rstest::rstest;

use homlat_common::{Graph, SearchConfig};
use homlat_solver::{Solver, find_homomorphism};

fn init_test_logger() {
    static INIT: OnceLock<()> = OnceLock::new();
    let _ = INIT.get_or_init(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Exhaustive oracle: try every function from G-nodes to H-nodes.
fn brute_force_exists(g: &Graph, h: &Graph) -> bool {
    if g.node_count() == 0 {
        return true;
    }
    if h.node_count() == 0 {
        return false;
    }
    let g_nodes = g.nodes();
    (0..g.node_count())
        .map(|_| h.nodes().iter().copied())
        .multi_cartesian_product()
        .any(|assignment| {
            g.edges().iter().all(|&(u, v)| {
                let up = g_nodes.iter().position(|&n| n == u).unwrap();
                let vp = g_nodes.iter().position(|&n| n == v).unwrap();
                h.has_edge(assignment[up], assignment[vp])
            })
        })
}

/// Exhaustive oracle: count every valid function.
fn brute_force_count(g: &Graph, h: &Graph) -> u64 {
    if g.node_count() == 0 {
        return 1;
    }
    if h.node_count() == 0 {
        return 0;
    }
    let g_nodes = g.nodes();
    (0..g.node_count())
        .map(|_| h.nodes().iter().copied())
        .multi_cartesian_product()
        .filter(|assignment| {
            g.edges().iter().all(|&(u, v)| {
                let up = g_nodes.iter().position(|&n| n == u).unwrap();
                let vp = g_nodes.iter().position(|&n| n == v).unwrap();
                h.has_edge(assignment[up], assignment[vp])
            })
        })
        .count() as u64
}

fn small_graph_zoo() -> Vec<(&'static str, Graph)> {
    vec![
        ("K1", Graph::complete(1)),
        ("K2", Graph::complete(2)),
        ("K3", Graph::complete(3)),
        ("K4", Graph::complete(4)),
        ("P3", Graph::path(3)),
        ("P4", Graph::path(4)),
        ("C3", Graph::cycle(3)),
        ("C4", Graph::cycle(4)),
        ("C5", Graph::cycle(5)),
        ("E3", Graph::edgeless(3)),
        ("E0", Graph::edgeless(0)),
        (
            "star4",
            Graph::undirected([0, 1, 2, 3], [(0, 1), (0, 2), (0, 3)]).unwrap(),
        ),
        (
            "paw",
            Graph::undirected([0, 1, 2, 3], [(0, 1), (1, 2), (2, 0), (2, 3)]).unwrap(),
        ),
    ]
}

#[test]
fn matches_brute_force_on_all_small_pairs() {
    init_test_logger();
    let zoo = small_graph_zoo();
    for (gname, g) in &zoo {
        for (hname, h) in &zoo {
            let expected = brute_force_exists(g, h);
            let got = find_homomorphism(g, h, &SearchConfig::default());
            assert_eq!(
                got.is_found(),
                expected,
                "solver disagrees with brute force on {gname} -> {hname}"
            );
            if let Some(mapping) = got.into_mapping() {
                assert!(
                    mapping.verify(g, h),
                    "unsound mapping returned for {gname} -> {hname}"
                );
            }
        }
    }
}

#[test]
fn enumeration_count_matches_brute_force() {
    init_test_logger();
    let zoo = small_graph_zoo();
    for (gname, g) in &zoo {
        if g.node_count() > 4 {
            continue;
        }
        for (hname, h) in &zoo {
            if h.node_count() > 4 {
                continue;
            }
            let config = SearchConfig::default();
            let mut solver = Solver::new(g, h, &config);
            let summary = solver.count_all();
            assert!(summary.complete);
            assert_eq!(
                summary.found,
                brute_force_count(g, h),
                "enumeration count wrong for {gname} -> {hname}"
            );
        }
    }
}

#[rstest]
#[case::self_map_path(Graph::path(5))]
#[case::self_map_cycle(Graph::cycle(6))]
#[case::self_map_complete(Graph::complete(4))]
#[case::self_map_edgeless(Graph::edgeless(4))]
fn reflexivity(#[case] g: Graph) {
    init_test_logger();
    let outcome = find_homomorphism(&g, &g, &SearchConfig::default());
    let mapping = outcome.into_mapping().expect("identity mapping exists");
    assert!(mapping.verify(&g, &g));
}

#[rstest]
#[case::even_cycle_two_colors(Graph::cycle(8), Graph::complete(2), true)]
#[case::odd_cycle_needs_three(Graph::cycle(7), Graph::complete(2), false)]
#[case::odd_cycle_three_colors(Graph::cycle(7), Graph::complete(3), true)]
#[case::bigger_clique_never_shrinks(Graph::complete(4), Graph::complete(3), false)]
#[case::clique_into_bigger_clique(Graph::complete(3), Graph::complete(5), true)]
#[case::long_odd_cycle_into_shorter_odd(Graph::cycle(9), Graph::cycle(3), true)]
#[case::short_odd_cycle_into_longer_odd(Graph::cycle(3), Graph::cycle(9), false)]
fn known_homomorphism_facts(#[case] g: Graph, #[case] h: Graph, #[case] expected: bool) {
    init_test_logger();
    assert_eq!(
        find_homomorphism(&g, &h, &SearchConfig::default()).is_found(),
        expected
    );
}

#[test]
fn repeated_queries_are_reproducible() {
    init_test_logger();
    // Counters are rebuilt per solver; two fresh queries on the same pair
    // must agree.
    let g = Graph::cycle(5);
    let h = Graph::cycle(7);
    let first = find_homomorphism(&g, &h, &SearchConfig::default()).is_found();
    let second = find_homomorphism(&g, &h, &SearchConfig::default()).is_found();
    assert_eq!(first, second);
}

#[test]
fn stats_observe_backtracking() {
    init_test_logger();
    let g = Graph::cycle(5);
    let h = Graph::complete(2);
    let config = SearchConfig::default();
    let mut solver = Solver::new(&g, &h, &config);
    assert!(!solver.find_one().is_found());
    assert!(solver.stats().steps > 0);
    assert!(solver.stats().backtracks > 0);
}
