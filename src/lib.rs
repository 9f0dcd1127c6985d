//! # Eight Puzzle Solver Library
//!
//! This library solves the 3x3 sliding-tile puzzle: given a scrambled board,
//! it finds a sequence of blank moves reaching a goal board under one of six
//! classical search strategies (breadth-first, depth-first, uniform-cost,
//! greedy best-first, and A* with the misplaced-tile or Manhattan heuristic).
//! Moving tile `k` costs `k`.
//!
//! It is used by three binaries:
//! - `ai_solver`: solves a literal, preset, or scrambled board with one or all
//!   strategies and prints the path and search statistics.
//! - `strategy_evaluator`: compares the strategies over seeded random boards.
//! - `human_player`: lets you slide the tiles yourself from the command line.
//!
//! ## Modules
//! - `engine`: the board (`Board`), moves (`Action`), successor generation and
//!   the interactive `Game`.
//! - `heuristics`: the `Strategy` enum, the misplaced-tile and Manhattan
//!   heuristics, and the per-strategy `CostModel`.
//! - `frontier`: the FIFO / LIFO / min-heap `Frontier` with duplicate
//!   reconciliation.
//! - `solver`: the node arena and the search driver (`Solver`, `solve`).
//! - `utils`: preset boards and board parsing.
//! - `error`: `PuzzleError`.

pub mod engine;
pub mod error;
pub mod frontier;
pub mod heuristics;
pub mod solver;
pub mod utils;

pub use error::PuzzleError;
pub use solver::{solve, Outcome, Solution};
