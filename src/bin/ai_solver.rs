use clap::Parser;
use eight_puzzle_solver::engine::Board;
use eight_puzzle_solver::heuristics::Strategy;
use eight_puzzle_solver::solver::{Outcome, SearchConfig, SearchLimits, Solver};
use eight_puzzle_solver::utils::{board_from_str, init_tracing, Preset, GOAL};
use std::process::ExitCode;
use std::time::{Duration, Instant};

#[derive(Parser, Debug)]
#[clap(author, version, about, long_about = None)]
struct Args {
    /// Board to solve, e.g. "1 3 4 8 6 2 7 0 5" or "134862705" (0 is the blank)
    board: Option<String>,

    /// Solve a preset board instead of a literal one
    #[clap(short, long, value_enum, conflicts_with = "board")]
    preset: Option<Preset>,

    /// Solve a random scramble of the goal made with this many moves
    #[clap(long, conflicts_with_all = ["board", "preset"])]
    scramble: Option<usize>,

    /// Seed for --scramble
    #[clap(long, default_value_t = 0)]
    seed: u64,

    /// Search strategy
    #[clap(short, long, value_enum, default_value_t = Strategy::AStarManhattan)]
    strategy: Strategy,

    /// Run every strategy and print a comparison table
    #[clap(short, long, conflicts_with = "strategy")]
    all: bool,

    /// Goal board (defaults to "1 2 3 8 0 4 7 6 5")
    #[clap(long)]
    goal: Option<String>,

    /// Wall-clock budget per search, in seconds
    #[clap(long, default_value_t = 300)]
    time_limit: u64,

    /// Do not print the individual moves
    #[clap(short, long)]
    quiet: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[clap(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn initial_board(args: &Args, goal: &Board) -> Result<Board, String> {
    if let Some(text) = &args.board {
        return board_from_str(text).map_err(|e| format!("Invalid board '{}': {}", text, e));
    }
    if let Some(moves) = args.scramble {
        return Ok(Board::scrambled_with_seed(goal, moves, args.seed));
    }
    Ok(args.preset.unwrap_or(Preset::Easy).board())
}

fn run_search(board: Board, strategy: Strategy, goal: Board, time_limit: Duration) -> (Outcome, Duration) {
    let limits = SearchLimits {
        time_limit: Some(time_limit),
        ..SearchLimits::default()
    };
    let config = SearchConfig::new(strategy).with_goal(goal).with_limits(limits);
    let started = Instant::now();
    let outcome = Solver::from_board(board, config).run();
    (outcome, started.elapsed())
}

fn print_outcome(board: &Board, strategy: Strategy, outcome: &Outcome, elapsed: Duration, quiet: bool) {
    println!("Strategy: {}", strategy);
    match outcome {
        Outcome::Solved(solution) => {
            if !quiet {
                println!("\nStart:\n{}\n", board);
                for (i, step) in solution.steps.iter().enumerate() {
                    println!(
                        "Move {}: {} (tile {}, cost so far {})\n{}\n",
                        i + 1,
                        step.action,
                        step.step_cost,
                        step.cumulative_cost,
                        step.board
                    );
                }
            }
            println!("Moves:          {}", solution.len());
            println!("Total cost:     {}", solution.total_cost);
            println!("Nodes expanded: {}", solution.nodes_expanded);
            println!("Max frontier:   {}", solution.max_frontier_size);
        }
        Outcome::Exhausted => {
            println!("No solution: the board cannot reach the goal.");
        }
        Outcome::Aborted(reason) => {
            println!("Search stopped early: {:?}", reason);
        }
    }
    println!("Time:           {:.3}s\n", elapsed.as_secs_f64());
}

fn print_table(rows: &[(Strategy, Outcome, Duration)]) {
    println!(
        "{:<22} {:>7} {:>7} {:>10} {:>10} {:>9}",
        "Strategy", "Moves", "Cost", "Expanded", "Frontier", "Time(s)"
    );
    for (strategy, outcome, elapsed) in rows {
        match outcome {
            Outcome::Solved(s) => println!(
                "{:<22} {:>7} {:>7} {:>10} {:>10} {:>9.3}",
                strategy.to_string(),
                s.len(),
                s.total_cost,
                s.nodes_expanded,
                s.max_frontier_size,
                elapsed.as_secs_f64()
            ),
            Outcome::Exhausted => println!("{:<22} {:>7}", strategy.to_string(), "exhausted"),
            Outcome::Aborted(reason) => {
                println!("{:<22} {:>7}", strategy.to_string(), format!("{:?}", reason))
            }
        }
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_tracing(args.verbose);

    let goal = match args.goal.as_deref().map(board_from_str).transpose() {
        Ok(goal) => goal.unwrap_or(GOAL),
        Err(e) => {
            eprintln!("Invalid goal: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let board = match initial_board(&args, &goal) {
        Ok(board) => board,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    let time_limit = Duration::from_secs(args.time_limit);

    println!("Initial board:\n{}\n", board);
    println!("Goal board:\n{}\n", goal);

    if args.all {
        let rows: Vec<(Strategy, Outcome, Duration)> = Strategy::ALL
            .into_iter()
            .map(|strategy| {
                let (outcome, elapsed) = run_search(board, strategy, goal, time_limit);
                (strategy, outcome, elapsed)
            })
            .collect();
        print_table(&rows);
        return ExitCode::SUCCESS;
    }

    let (outcome, elapsed) = run_search(board, args.strategy, goal, time_limit);
    print_outcome(&board, args.strategy, &outcome, elapsed, args.quiet);
    if outcome.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
