use ado_core::{
    GraphDefect,
    OracleError,
};
use assertables::*;
use ordered_float::OrderedFloat;
use tracing_test::traced_test;

use super::*;
use crate::OracleConfig;

fn config(levels: usize, seed: u64) -> OracleConfig {
    OracleConfig::default().levels(levels).seed(seed)
}

/// Every pair is within `[d, (2k - 1) d]`, symmetric, and zero on the diagonal.
#[allow(clippy::cast_precision_loss)]
fn assert_stretch_holds(exact: &Exact, oracle: &Oracle) {
    let bound = oracle.levels() as f64 * 2.0 - 1.0;
    for u in exact.nodes() {
        assert_eq!(oracle.query(u, u).unwrap(), 0.0);
        for v in exact.nodes().filter(|&v| v > u) {
            let distance = exact.distances[u][v];
            let estimate = oracle.query(u, v).unwrap();

            assert_ge!(estimate, distance - EPSILON);
            assert_le!(estimate, bound * distance + EPSILON);
            assert_eq!(estimate, oracle.query(v, u).unwrap(), "({u}, {v}) is not symmetric");
        }
    }
}

#[rstest]
fn test_five_cycle_sampled(five_cycle: UnGraph<(), f64>) {
    let oracle = Oracle::build(&five_cycle, &config(2, 4)).unwrap();

    let estimate = oracle.query(0, 2).unwrap();

    assert_ge!(estimate, 2.0);
    assert_le!(estimate, 6.0);
    assert_eq!(oracle.query(0, 0).unwrap(), 0.0);
}

#[rstest]
fn test_five_cycle_with_fixed_landmark(five_cycle: UnGraph<(), f64>) {
    // Node 1 is the only level-1 landmark: the ascent from 2 finds it in B(0).
    let hierarchy = LandmarkHierarchy::from_ranks(2, vec![0, 1, 0, 0, 0]).unwrap();
    let oracle = Oracle::build_with_hierarchy(&five_cycle, hierarchy, false).unwrap();

    assert_eq!(oracle.query(0, 2).unwrap(), 2.0);
    assert_eq!(oracle.query(2, 0).unwrap(), 2.0);
    assert_eq!(oracle.witness(1, 2).unwrap(), Witness { landmark: Some(1), distance: OrderedFloat(1.0) });
}

#[rstest]
fn test_single_level_is_exact(random_graph: UnGraph<(), f64>) {
    let exact = Exact::new(random_graph);
    let oracle = Oracle::build(&exact.graph, &config(1, 0)).unwrap();

    for u in exact.nodes() {
        for v in exact.nodes() {
            assert_eq!(oracle.query(u, v).unwrap(), exact.distances[u][v]);
        }
    }
}

#[rstest]
#[case(2, 1)]
#[case(2, 2)]
#[case(3, 3)]
#[case(3, 4)]
#[case(4, 5)]
#[case(6, 6)]
fn test_stretch_on_random_graph(random_graph: UnGraph<(), f64>, #[case] levels: usize, #[case] seed: u64) {
    let exact = Exact::new(random_graph);
    let oracle = Oracle::build(&exact.graph, &config(levels, seed)).unwrap();
    assert_stretch_holds(&exact, &oracle);
}

#[rstest]
#[case(3, 10)]
#[case(4, 11)]
fn test_stretch_on_grid(small_grid: UnGraph<(), f64>, #[case] levels: usize, #[case] seed: u64) {
    let exact = Exact::new(small_grid);
    let oracle = Oracle::build(&exact.graph, &config(levels, seed)).unwrap();
    assert_stretch_holds(&exact, &oracle);
}

#[rstest]
fn test_stretch_on_larger_sparse_graph() {
    let exact = Exact::new(random_connected_graph(150, 40, 25, 99));
    let oracle = Oracle::build(&exact.graph, &config(3, 99)).unwrap();
    assert_stretch_holds(&exact, &oracle);
}

#[rstest]
fn test_empty_intermediate_levels(random_graph: UnGraph<(), f64>) {
    let ranks: Vec<_> = (0..random_graph.node_count()).map(|node| usize::from(node % 7 == 0)).collect();
    let hierarchy = LandmarkHierarchy::from_ranks(4, ranks).unwrap();
    assert_eq!(hierarchy.level_sizes(), vec![60, 9, 0, 0, 0]);

    let exact = Exact::new(random_graph);
    let oracle = Oracle::build_with_hierarchy(&exact.graph, hierarchy, true).unwrap();

    assert_stretch_holds(&exact, &oracle);
}

#[rstest]
fn test_same_seed_same_answers(random_graph: UnGraph<(), f64>) {
    let first = Oracle::build(&random_graph, &config(3, 1234)).unwrap();
    let second = Oracle::build(&random_graph, &config(3, 1234)).unwrap();

    assert_eq!(first.hierarchy(), second.hierarchy());
    for u in 0..random_graph.node_count() {
        assert_eq!(first.bunch(u).unwrap(), second.bunch(u).unwrap());
        for v in 0..random_graph.node_count() {
            assert_eq!(first.query(u, v).unwrap(), second.query(u, v).unwrap());
        }
    }
}

#[rstest]
fn test_parallel_build_matches_sequential(random_graph: UnGraph<(), f64>) {
    let sequential = Oracle::build(&random_graph, &config(3, 8).parallel(false)).unwrap();
    let parallel = Oracle::build(&random_graph, &config(3, 8).parallel(true)).unwrap();

    for u in 0..random_graph.node_count() {
        assert_eq!(sequential.bunch(u).unwrap(), parallel.bunch(u).unwrap());
    }
    assert_eq!(sequential.stats().levels, parallel.stats().levels);
}

#[rstest]
fn test_build_with_rng_ignores_seed(random_graph: UnGraph<(), f64>) {
    let from_rng = Oracle::build_with_rng(&random_graph, &config(3, 1), &mut rng(2)).unwrap();
    let from_seed = Oracle::build(&random_graph, &config(3, 2)).unwrap();

    assert_eq!(from_rng.hierarchy(), from_seed.hierarchy());
}

#[rstest]
fn test_unweighted_graph() {
    let graph = UnGraph::<(), ()>::from_edges([(0, 1), (1, 2), (2, 3), (3, 4), (4, 0), (1, 3)]);

    let oracle = Oracle::build(&graph, &OracleConfig::default().levels(1).seed(0)).unwrap();

    assert_eq!(oracle.query(0, 2).unwrap(), 2.0);
    assert_eq!(oracle.query(1, 3).unwrap(), 1.0);
    assert_eq!(oracle.query(4, 2).unwrap(), 2.0);
}

#[rstest]
fn test_rejects_zero_levels(five_cycle: UnGraph<(), f64>) {
    let err = Oracle::build(&five_cycle, &config(0, 0)).unwrap_err();
    assert!(matches!(err, OracleError::InvalidConfiguration(_)));
}

#[rstest]
#[case::negative(
    graph_from_edges(3, &[(0, 1, -1.0), (1, 2, 1.0)]),
    GraphDefect::NegativeLength { from: 0, to: 1, length: -1.0 }
)]
#[case::weighted_self_loop(
    graph_from_edges(2, &[(0, 1, 1.0), (0, 0, 2.0)]),
    GraphDefect::NonZeroSelfLoop { node: 0, length: 2.0 }
)]
#[case::disconnected(
    graph_from_edges(4, &[(0, 1, 1.0), (2, 3, 1.0)]),
    GraphDefect::Disconnected { components: 2 }
)]
fn test_rejects_invalid_graph(#[case] graph: UnGraph<(), f64>, #[case] defect: GraphDefect) {
    let err = Oracle::build(&graph, &config(2, 0)).unwrap_err();
    assert_eq!(err, OracleError::InvalidGraph(defect));
}

#[rstest]
fn test_rejects_path_length_overflow() {
    // Each edge is finite but the path 0 - 1 - 2 is not.
    let graph = graph_from_edges(3, &[(0, 1, f64::MAX), (1, 2, f64::MAX)]);

    let err = Oracle::build(&graph, &config(1, 0)).unwrap_err();

    assert_eq!(err, OracleError::InvalidGraph(GraphDefect::LengthOverflow { edges: 2 }));
}

#[rstest]
fn test_large_finite_lengths_are_answered() {
    let half = f64::MAX / 4.0;
    let graph = graph_from_edges(3, &[(0, 1, half), (1, 2, half)]);

    let oracle = Oracle::build(&graph, &config(1, 0)).unwrap();

    assert_eq!(oracle.query(0, 2).unwrap(), half * 2.0);
}

#[rstest]
fn test_zero_length_self_loop_is_accepted() {
    let graph = graph_from_edges(3, &[(0, 1, 1.0), (1, 2, 1.0), (1, 1, 0.0)]);

    let oracle = Oracle::build(&graph, &config(2, 0)).unwrap();

    assert_ge!(oracle.query(0, 2).unwrap(), 2.0);
}

#[rstest]
fn test_rejects_out_of_range_query(five_cycle: UnGraph<(), f64>) {
    let oracle = Oracle::build(&five_cycle, &config(2, 0)).unwrap();

    assert_eq!(oracle.query(0, 5).unwrap_err(), OracleError::OutOfRangeNode { node: 5, node_count: 5 });
    assert_eq!(oracle.query(7, 0).unwrap_err(), OracleError::OutOfRangeNode { node: 7, node_count: 5 });
    assert!(oracle.witness(0, 5).is_err());
    assert!(oracle.bunch(5).is_err());
}

#[rstest]
fn test_rejects_hierarchy_of_wrong_size(five_cycle: UnGraph<(), f64>) {
    let hierarchy = LandmarkHierarchy::from_ranks(2, vec![0; 4]).unwrap();

    let err = Oracle::build_with_hierarchy(&five_cycle, hierarchy, false).unwrap_err();

    assert!(matches!(err, OracleError::InvalidConfiguration(_)));
}

#[rstest]
fn test_empty_graph() {
    let graph = graph_from_edges(0, &[]);

    let oracle = Oracle::build(&graph, &config(3, 0)).unwrap();

    assert_eq!(oracle.node_count(), 0);
    assert_eq!(oracle.query(0, 0).unwrap_err(), OracleError::OutOfRangeNode { node: 0, node_count: 0 });
}

#[rstest]
fn test_single_node_graph() {
    let graph = graph_from_edges(1, &[]);

    let oracle = Oracle::build(&graph, &config(3, 0)).unwrap();

    assert_eq!(oracle.query(0, 0).unwrap(), 0.0);
}

#[rstest]
fn test_query_many_matches_single_queries(random_graph: UnGraph<(), f64>) {
    let oracle = Oracle::build(&random_graph, &config(3, 21)).unwrap();
    let pairs: Vec<_> = (0..60).map(|u| (u, (u * 17 + 5) % 60)).collect();

    let answers = oracle.query_many(&pairs).unwrap();

    assert_eq!(answers.len(), pairs.len());
    for (&(u, v), answer) in pairs.iter().zip(answers) {
        assert_eq!(answer, oracle.query(u, v).unwrap());
    }
    assert_eq!(
        oracle.query_many(&[(0, 1), (60, 0)]).unwrap_err(),
        OracleError::OutOfRangeNode { node: 60, node_count: 60 }
    );
}

#[rstest]
fn test_witness_and_bunch_accessors(random_graph: UnGraph<(), f64>) {
    let oracle = Oracle::build(&random_graph, &config(3, 17)).unwrap();

    for node in 0..random_graph.node_count() {
        assert_eq!(oracle.witness(0, node).unwrap(), Witness { landmark: Some(node), distance: OrderedFloat(0.0) });
        assert_eq!(oracle.witness(3, node).unwrap(), Witness::UNREACHED);
        assert_eq!(oracle.witness(9, node).unwrap(), Witness::UNREACHED);

        let bunch = oracle.bunch(node).unwrap();
        assert!(bunch.windows(2).all(|pair| pair[0].0 < pair[1].0));
        assert!(bunch.contains(&(node, 0.0)));
    }
}

#[rstest]
fn test_stats(random_graph: UnGraph<(), f64>) {
    let oracle = Oracle::build(&random_graph, &config(3, 30)).unwrap();
    let stats = oracle.stats();

    let bunch_total: usize = (0..60).map(|node| oracle.bunch(node).unwrap().len()).sum();
    let sizes = oracle.hierarchy().level_sizes();

    assert_eq!(stats.nodes, 60);
    assert_eq!(stats.levels.len(), 3);
    assert_eq!(stats.levels[0].landmarks, 60);
    assert_eq!(stats.total_bunch_entries, bunch_total);
    assert_eq!(stats.levels.iter().map(|level| level.bunch_entries).sum::<usize>(), bunch_total);
    for (level, level_stats) in stats.levels.iter().enumerate() {
        assert_eq!(level_stats.exclusive, sizes[level] - sizes[level + 1]);
    }
}

#[rstest]
#[traced_test]
fn test_build_is_logged(five_cycle: UnGraph<(), f64>) {
    Oracle::build(&five_cycle, &config(2, 0)).unwrap();
    assert!(logs_contain("oracle built"));
}

#[rstest]
fn test_shared_across_threads(random_graph: UnGraph<(), f64>) {
    let oracle = Oracle::build(&random_graph, &config(3, 40)).unwrap();
    let expected: Vec<f64> = (0..60).map(|v| oracle.query(0, v).unwrap()).collect();

    std::thread::scope(|scope| {
        for _ in 0..4 {
            scope.spawn(|| {
                let answers: Vec<f64> = (0..60).map(|v| oracle.query(0, v).unwrap()).collect();
                assert_eq!(answers, expected);
            });
        }
    });
}
