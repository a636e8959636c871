extern crate checkers_search;

use checkers_search::boards::game_tree::{GameTreeBuilder, TreeValue};
use checkers_search::controller::SearchController;
use checkers_search::{Board, SearchConfig};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::time::{Duration, Instant};

fn main() {
    env_logger::init();

    // Build a reproducible random game tree
    let mut rng = StdRng::seed_from_u64(2024);
    let tree = GameTreeBuilder::random(&mut rng, 8, 4);
    println!("Game tree with {} positions", tree.len());

    // Give the engine a quarter of a second
    let config = SearchConfig {
        hard_limit: Duration::from_millis(250),
        safety_margin: Duration::from_millis(50),
        ..SearchConfig::default()
    };
    let controller = SearchController::builder()
        .with_config(config)
        .with_evaluator(TreeValue)
        .build()
        .expect("valid configuration");

    let root = tree.root();
    let started = Instant::now();
    let decision = controller.decide(&root, started + Duration::from_secs(1));

    // Print the decision
    println!(
        "Chose successor {:?} of {} with score {:?} at depth {} ({:?})",
        decision.chosen,
        root.successors().len(),
        decision.score,
        decision.depth,
        decision.reason
    );
    println!(
        "{} nodes, {} evaluations, {} cache hits, {} cutoffs in {:?}",
        decision.stats.nodes,
        decision.stats.evaluations,
        decision.stats.evaluation_hits + decision.stats.expansion_hits,
        decision.stats.cutoffs,
        started.elapsed()
    );

    assert!(!decision.is_pass());
    assert!(started.elapsed() < Duration::from_secs(1));
}
