use clap::Parser;
use eight_puzzle_solver::engine::Board;
use eight_puzzle_solver::heuristics::Strategy;
use eight_puzzle_solver::solver::{Outcome, SearchConfig, SearchLimits, Solver};
use eight_puzzle_solver::utils::{init_tracing, GOAL};
use std::collections::HashMap;
use std::time::Duration;

#[derive(Parser, Debug)]
#[clap(author, version, about = "Compare search strategies over seeded random boards", long_about = None)]
struct Args {
    /// Number of random boards to evaluate
    #[clap(short, long, default_value_t = 20)]
    boards: u64,

    /// Scramble length for each board
    #[clap(short, long, default_value_t = 20)]
    moves: usize,

    /// First seed; board `i` uses `start_seed + i`
    #[clap(long, default_value_t = 0)]
    start_seed: u64,

    /// Skip depth-first search, whose paths are very long
    #[clap(long)]
    skip_dfs: bool,

    /// Wall-clock budget per search, in seconds
    #[clap(long, default_value_t = 60)]
    time_limit: u64,

    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[derive(Default)]
struct Tally {
    solved: usize,
    unsolved: usize,
    moves: Vec<usize>,
    costs: Vec<u32>,
    expanded: Vec<usize>,
    frontier: Vec<usize>,
}

fn average<T: Copy + Into<f64>>(values: &[T]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|&v| v.into()).sum::<f64>() / values.len() as f64
}

fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    let strategies: Vec<Strategy> = Strategy::ALL
        .into_iter()
        .filter(|s| !(args.skip_dfs && *s == Strategy::DepthFirst))
        .collect();
    let mut tallies: HashMap<Strategy, Tally> = HashMap::new();
    let limits = SearchLimits {
        time_limit: Some(Duration::from_secs(args.time_limit)),
        ..SearchLimits::default()
    };

    println!(
        "Evaluating {} strategies on {} boards ({} scramble moves)...",
        strategies.len(),
        args.boards,
        args.moves
    );

    for board_idx in 0..args.boards {
        let seed = args.start_seed + board_idx;
        let board = Board::scrambled_with_seed(&GOAL, args.moves, seed);
        println!("\nBoard {} (seed {}):\n{}", board_idx, seed, board);

        for &strategy in &strategies {
            let config = SearchConfig::new(strategy).with_limits(limits.clone());
            let outcome = Solver::from_board(board, config).run();
            let tally = tallies.entry(strategy).or_default();
            match outcome {
                Outcome::Solved(solution) => {
                    println!(
                        "  {:<22} moves {:<6} cost {:<7} expanded {}",
                        strategy.to_string(),
                        solution.len(),
                        solution.total_cost,
                        solution.nodes_expanded
                    );
                    tally.solved += 1;
                    tally.moves.push(solution.len());
                    tally.costs.push(solution.total_cost);
                    tally.expanded.push(solution.nodes_expanded);
                    tally.frontier.push(solution.max_frontier_size);
                }
                other => {
                    eprintln!(
                        "Warning: {} did not solve board {} (seed {}): {:?}",
                        strategy, board_idx, seed, other
                    );
                    tally.unsolved += 1;
                }
            }
        }
    }

    println!("\n--- Evaluation Complete ---");
    println!(
        "{:<22} {:>7} {:>9} {:>9} {:>11} {:>11}",
        "Strategy", "Solved", "Moves", "Cost", "Expanded", "Frontier"
    );
    for strategy in &strategies {
        let Some(tally) = tallies.get(strategy) else {
            continue;
        };
        let moves: Vec<f64> = tally.moves.iter().map(|&m| m as f64).collect();
        let expanded: Vec<f64> = tally.expanded.iter().map(|&e| e as f64).collect();
        let frontier: Vec<f64> = tally.frontier.iter().map(|&f| f as f64).collect();
        println!(
            "{:<22} {:>3}/{:<3} {:>9.1} {:>9.1} {:>11.1} {:>11.1}",
            strategy.to_string(),
            tally.solved,
            tally.solved + tally.unsolved,
            average(&moves),
            average(&tally.costs),
            average(&expanded),
            average(&frontier)
        );
    }
}
