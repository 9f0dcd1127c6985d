//! Search strategies, heuristics and the per-strategy cost model.
//!
//! Each [`Strategy`] selects a frontier discipline and, for the cost-based
//! strategies, a cost function. The function is picked once when a
//! [`CostModel`] is built, so evaluating a state never re-dispatches on the
//! strategy.
use crate::engine::{row_col, Board, BLANK, CELLS};
use std::cmp::Ordering;
use std::fmt;

/// The six selectable search algorithms.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, clap::ValueEnum)]
pub enum Strategy {
    /// Uninformed, FIFO frontier. Finds a solution with the fewest moves.
    #[value(name = "bfs")]
    BreadthFirst,
    /// Uninformed, LIFO frontier.
    #[value(name = "dfs")]
    DepthFirst,
    /// Orders by path cost (sum of moved tile ids).
    #[value(name = "ucs")]
    UniformCost,
    /// Orders by misplaced-tile count only.
    #[value(name = "greedy")]
    GreedyBestFirst,
    /// Orders by path cost plus misplaced-tile count.
    #[value(name = "astar-misplaced")]
    AStarMisplaced,
    /// Orders by path cost plus Manhattan distance sum.
    #[value(name = "astar-manhattan")]
    AStarManhattan,
}

/// How the frontier orders its entries for a given strategy.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Discipline {
    Fifo,
    Lifo,
    MinHeap,
}

impl Strategy {
    pub const ALL: [Strategy; 6] = [
        Strategy::BreadthFirst,
        Strategy::DepthFirst,
        Strategy::UniformCost,
        Strategy::GreedyBestFirst,
        Strategy::AStarMisplaced,
        Strategy::AStarManhattan,
    ];

    pub fn discipline(&self) -> Discipline {
        match self {
            Strategy::BreadthFirst => Discipline::Fifo,
            Strategy::DepthFirst => Discipline::Lifo,
            _ => Discipline::MinHeap,
        }
    }

    /// Whether states are ranked by a computed cost rather than insertion order.
    pub fn is_cost_based(&self) -> bool {
        self.discipline() == Discipline::MinHeap
    }

    fn cost_fn(&self) -> Option<CostFn> {
        match self {
            Strategy::BreadthFirst | Strategy::DepthFirst => None,
            Strategy::UniformCost => Some(path_cost_only as CostFn),
            Strategy::GreedyBestFirst => Some(misplaced_only as CostFn),
            Strategy::AStarMisplaced => Some(path_plus_misplaced as CostFn),
            Strategy::AStarManhattan => Some(path_plus_manhattan as CostFn),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Strategy::BreadthFirst => "Breadth-first",
            Strategy::DepthFirst => "Depth-first",
            Strategy::UniformCost => "Uniform-cost",
            Strategy::GreedyBestFirst => "Greedy best-first",
            Strategy::AStarMisplaced => "A* (misplaced tiles)",
            Strategy::AStarManhattan => "A* (Manhattan)",
        };
        write!(f, "{}", s)
    }
}

type CostFn = fn(&GoalTable, &Board, u32) -> u32;

fn path_cost_only(_: &GoalTable, _: &Board, path_cost: u32) -> u32 {
    path_cost
}

fn misplaced_only(goal: &GoalTable, board: &Board, _: u32) -> u32 {
    goal.misplaced(board)
}

fn path_plus_misplaced(goal: &GoalTable, board: &Board, path_cost: u32) -> u32 {
    path_cost + goal.misplaced(board)
}

fn path_plus_manhattan(goal: &GoalTable, board: &Board, path_cost: u32) -> u32 {
    path_cost + goal.manhattan(board)
}

/// A goal board with each tile's goal cell precomputed.
#[derive(Clone, Debug)]
pub struct GoalTable {
    goal: Board,
    position_of: [usize; CELLS],
}

impl GoalTable {
    pub fn new(goal: Board) -> Self {
        let mut position_of = [0; CELLS];
        for (index, &tile) in goal.tiles().iter().enumerate() {
            position_of[tile as usize] = index;
        }
        GoalTable { goal, position_of }
    }

    pub fn goal(&self) -> &Board {
        &self.goal
    }

    /// Number of non-blank tiles not on their goal cell.
    pub fn misplaced(&self, board: &Board) -> u32 {
        board
            .tiles()
            .iter()
            .zip(self.goal.tiles())
            .filter(|&(&tile, &want)| tile != BLANK && tile != want)
            .count() as u32
    }

    /// Sum over non-blank tiles of the grid distance to their goal cell.
    pub fn manhattan(&self, board: &Board) -> u32 {
        board
            .tiles()
            .iter()
            .enumerate()
            .filter(|&(_, &tile)| tile != BLANK)
            .map(|(index, &tile)| {
                let (r, c) = row_col(index);
                let (gr, gc) = row_col(self.position_of[tile as usize]);
                (r.abs_diff(gr) + c.abs_diff(gc)) as u32
            })
            .sum()
    }
}

/// Counts the non-blank tiles of `board` that are not where `goal` has them.
///
/// # Examples
/// ```
/// use eight_puzzle_solver::engine::Board;
/// use eight_puzzle_solver::heuristics::misplaced_tiles;
/// use eight_puzzle_solver::utils::GOAL;
///
/// let one_move = Board::new(&[1, 2, 3, 8, 4, 0, 7, 6, 5]).unwrap();
/// assert_eq!(misplaced_tiles(&GOAL, &GOAL), 0);
/// assert_eq!(misplaced_tiles(&one_move, &GOAL), 1);
/// ```
pub fn misplaced_tiles(board: &Board, goal: &Board) -> u32 {
    GoalTable::new(*goal).misplaced(board)
}

/// Sums the Manhattan distance of every non-blank tile from its goal cell.
pub fn manhattan_sum(board: &Board, goal: &Board) -> u32 {
    GoalTable::new(*goal).manhattan(board)
}

/// A strategy-tagged priority. Lower is better.
///
/// Costs are only comparable when produced under the same strategy;
/// `partial_cmp` returns `None` across strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cost {
    pub strategy: Strategy,
    pub value: u32,
}

impl PartialOrd for Cost {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        (self.strategy == other.strategy).then(|| self.value.cmp(&other.value))
    }
}

impl Cost {
    /// Compares two costs from the same search run.
    ///
    /// # Panics
    /// Panics if the costs come from different strategies. A single search
    /// only ever creates costs under one strategy, so this is a defect.
    pub fn compare(&self, other: &Cost) -> Ordering {
        match self.partial_cmp(other) {
            Some(ordering) => ordering,
            None => panic!(
                "strategy mismatch: cannot compare {:?} cost with {:?} cost",
                self.strategy, other.strategy
            ),
        }
    }
}

/// Maps a state to its priority under one fixed strategy and goal.
#[derive(Clone)]
pub struct CostModel {
    strategy: Strategy,
    table: GoalTable,
    cost_fn: Option<CostFn>,
}

impl CostModel {
    pub fn new(strategy: Strategy, goal: Board) -> Self {
        CostModel {
            strategy,
            table: GoalTable::new(goal),
            cost_fn: strategy.cost_fn(),
        }
    }

    pub fn strategy(&self) -> Strategy {
        self.strategy
    }

    pub fn goal(&self) -> &Board {
        self.table.goal()
    }

    /// Scores a state from its board and memoized path cost.
    ///
    /// Returns `None` for the insertion-ordered strategies, which never
    /// compare costs.
    pub fn evaluate(&self, board: &Board, path_cost: u32) -> Option<Cost> {
        self.cost_fn.map(|f| Cost {
            strategy: self.strategy,
            value: f(&self.table, board, path_cost),
        })
    }
}

impl fmt::Debug for CostModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CostModel")
            .field("strategy", &self.strategy)
            .field("goal", self.table.goal())
            .finish()
    }
}
