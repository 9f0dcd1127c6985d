use clap::ValueEnum;
use eight_puzzle_solver::engine::{Action, Game};
use eight_puzzle_solver::heuristics::Strategy;
use eight_puzzle_solver::solver::solve;
use eight_puzzle_solver::utils::{board_from_str, Preset, GOAL};
use std::io::{self, Write};

fn main() {
    let start = match std::env::args().nth(1) {
        Some(arg) => match Preset::from_str(&arg, true) {
            Ok(preset) => preset.board(),
            Err(_) => match board_from_str(&arg) {
                Ok(board) => board,
                Err(e) => {
                    eprintln!("Invalid board '{}': {}", arg, e);
                    std::process::exit(1);
                }
            },
        },
        None => Preset::Easy.board(),
    };

    let mut game = Game::new_with_board(start);
    println!("Welcome to the Eight Puzzle!");
    println!("Goal:\n{}\n", GOAL);

    loop {
        println!("---------------------");
        println!("Moves: {}, Cost: {}", game.steps(), game.cost());
        println!("{}", game.board());

        if game.is_solved(&GOAL) {
            println!();
            println!("---------------------");
            println!("Solved!");
            println!("Total moves: {}", game.steps());
            println!("Total cost:  {}", game.cost());
            println!("---------------------");
            break;
        }

        print!("Move the blank (u/r/d/l), 'z' to undo, 'h' for a hint, 'q' to quit: ");
        if io::stdout().flush().is_err() {
            break;
        }

        let mut input = String::new();
        match io::stdin().read_line(&mut input) {
            Ok(0) => break,
            Ok(_) => {}
            Err(_) => {
                println!("Error reading input. Please try again.");
                continue;
            }
        }

        match input.trim() {
            "q" => {
                println!("Thanks for playing!");
                break;
            }
            "z" => {
                if game.undo_last_move() {
                    println!("Move undone.");
                } else {
                    println!("Nothing to undo.");
                }
            }
            "h" => match solve(game.board(), Strategy::AStarManhattan, &GOAL).solution() {
                Some(solution) => match solution.steps.first() {
                    Some(step) => println!(
                        "Hint: move {} ({} moves, cost {} to go).",
                        step.action,
                        solution.len(),
                        solution.total_cost
                    ),
                    None => println!("Already solved."),
                },
                None => println!("This board cannot reach the goal."),
            },
            other => {
                let mut chars = other.chars();
                match (chars.next().and_then(Action::from_char), chars.next()) {
                    (Some(action), None) => {
                        if !game.process_move(action) {
                            println!("Invalid move: the blank cannot move {}.", action);
                        }
                    }
                    _ => println!("Invalid input. Use u, r, d, l, z, h or q."),
                }
            }
        }
    }
}
