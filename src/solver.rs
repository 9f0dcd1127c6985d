use crate::engine::{Action, Board, Tile};
use crate::error::PuzzleError;
use crate::frontier::{Entry, Frontier};
use crate::heuristics::{CostModel, Strategy};
use crate::utils::GOAL;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, info_span};

/// Index of a node in the solver's arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub usize);

/// A state in the implicit search tree.
///
/// Nodes are immutable once created and live in the solver's arena for the
/// whole run; `parent` is an arena index used only to rebuild the path.
#[derive(Clone, Debug)]
pub struct Node {
    pub board: Board,
    /// Number of moves from the root.
    pub depth: u32,
    /// The blank move that produced this node. `None` for the root.
    pub action: Option<Action>,
    /// The tile swapped with the blank to reach this node; also the cost of
    /// that move. `0` for the root.
    pub moved_tile: Tile,
    pub parent: Option<NodeId>,
    /// Sum of `moved_tile` from the root to this node, inclusive.
    pub path_cost: u32,
    pub strategy: Strategy,
}

impl Node {
    fn root(board: Board, strategy: Strategy) -> Self {
        Node {
            board,
            depth: 0,
            action: None,
            moved_tile: 0,
            parent: None,
            path_cost: 0,
            strategy,
        }
    }
}

/// Produces one child per legal blank move of `parent`, in `Action::ALL`
/// order. Children inherit the parent's strategy.
pub fn generate_successors(parent_id: NodeId, parent: &Node) -> Vec<Node> {
    parent
        .board
        .successors()
        .into_iter()
        .map(|(action, board, moved)| Node {
            board,
            depth: parent.depth + 1,
            action: Some(action),
            moved_tile: moved,
            parent: Some(parent_id),
            path_cost: parent.path_cost + u32::from(moved),
            strategy: parent.strategy,
        })
        .collect()
}

/// Budgets checked once per iteration of the search loop.
#[derive(Clone, Debug, Default)]
pub struct SearchLimits {
    /// Wall-clock budget measured from the start of [`Solver::run`].
    pub time_limit: Option<Duration>,
    /// Maximum number of nodes to pop from the frontier.
    pub max_expansions: Option<usize>,
    /// External cancellation flag.
    pub cancel: Option<Arc<AtomicBool>>,
}

/// Everything the solver needs besides the initial board.
#[derive(Clone, Debug)]
pub struct SearchConfig {
    pub goal: Board,
    pub strategy: Strategy,
    pub limits: SearchLimits,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            goal: GOAL,
            strategy: Strategy::AStarManhattan,
            limits: SearchLimits::default(),
        }
    }
}

impl SearchConfig {
    pub fn new(strategy: Strategy) -> Self {
        SearchConfig {
            strategy,
            ..Self::default()
        }
    }

    pub fn with_goal(mut self, goal: Board) -> Self {
        self.goal = goal;
        self
    }

    pub fn with_limits(mut self, limits: SearchLimits) -> Self {
        self.limits = limits;
        self
    }
}

/// One move of a solution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Step {
    pub action: Action,
    /// The board after the move.
    pub board: Board,
    /// Id of the tile that moved.
    pub step_cost: u32,
    pub cumulative_cost: u32,
}

/// A path from the initial board to the goal, with search statistics.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Solution {
    pub steps: Vec<Step>,
    pub total_cost: u32,
    pub nodes_expanded: usize,
    pub max_frontier_size: usize,
}

impl Solution {
    /// The actions in order, suitable for replaying with `Board::apply_move`.
    pub fn actions(&self) -> Vec<Action> {
        self.steps.iter().map(|s| s.action).collect()
    }

    /// Number of moves in the solution.
    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }
}

/// Why a search stopped before reaching a terminal state.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbortReason {
    Deadline,
    Cancelled,
    ExpansionLimit,
}

/// Result of a search run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    Solved(Solution),
    /// The frontier emptied without reaching the goal: the initial board is
    /// not reachable from the goal under the move model.
    Exhausted,
    /// A limit from [`SearchLimits`] stopped the run.
    Aborted(AbortReason),
}

impl Outcome {
    pub fn solution(&self) -> Option<&Solution> {
        match self {
            Outcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    pub fn is_solved(&self) -> bool {
        matches!(self, Outcome::Solved(_))
    }
}

/// Graph search over 8-puzzle states under one strategy.
///
/// Owns the node arena, the frontier and the expanded set for the duration of
/// a run. Drive it to completion with [`Solver::run`], or one iteration at a
/// time with [`Solver::step`].
#[derive(Debug)]
pub struct Solver {
    model: CostModel,
    limits: SearchLimits,
    arena: Vec<Node>,
    frontier: Frontier,
    expanded: HashSet<Board>,
    goal_node: Option<NodeId>,
    outcome: Option<Outcome>,
}

impl Solver {
    /// Validates `initial` and sets up a search from it.
    ///
    /// # Errors
    /// Returns `PuzzleError::InvalidBoard` if `initial` is not a permutation
    /// of the tile set with exactly one blank.
    pub fn new(initial: &[Tile], config: SearchConfig) -> Result<Self, PuzzleError> {
        let board = Board::new(initial)?;
        Ok(Self::from_board(board, config))
    }

    /// Sets up a search from an already validated board.
    pub fn from_board(initial: Board, config: SearchConfig) -> Self {
        let strategy = config.strategy;
        let model = CostModel::new(strategy, config.goal);
        let mut solver = Solver {
            model,
            limits: config.limits,
            arena: Vec::new(),
            frontier: Frontier::for_strategy(strategy),
            expanded: HashSet::new(),
            goal_node: None,
            outcome: None,
        };
        let root = solver.alloc(Node::root(initial, strategy));
        solver.push(root);
        solver
    }

    pub fn strategy(&self) -> Strategy {
        self.model.strategy()
    }

    /// Returns the arena node for `id`.
    ///
    /// # Panics
    /// Panics if `id` was not issued by this solver.
    pub fn node(&self, id: NodeId) -> &Node {
        &self.arena[id.0]
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    /// Number of boards popped from the frontier so far.
    pub fn nodes_expanded(&self) -> usize {
        self.expanded.len()
    }

    /// The node that reached the goal, once solved.
    pub fn goal_node(&self) -> Option<NodeId> {
        self.goal_node
    }

    /// Runs the search until it is solved, exhausted or a limit trips.
    ///
    /// Calling `run` again after a terminal outcome returns the same outcome.
    pub fn run(&mut self) -> Outcome {
        let span = info_span!("search", strategy = %self.strategy());
        let _enter = span.enter();

        if let Some(outcome) = &self.outcome {
            return outcome.clone();
        }

        let deadline = self.limits.time_limit.map(|limit| Instant::now() + limit);
        loop {
            if let Some(reason) = self.check_limits(deadline) {
                info!(?reason, expanded = self.nodes_expanded(), "search aborted");
                return Outcome::Aborted(reason);
            }
            if let Some(outcome) = self.step() {
                return outcome;
            }
        }
    }

    /// Performs one iteration: pop the best node, test it, expand it.
    ///
    /// Returns `Some` once the search reaches a terminal outcome.
    pub fn step(&mut self) -> Option<Outcome> {
        if let Some(outcome) = &self.outcome {
            return Some(outcome.clone());
        }

        let Some(entry) = self.frontier.pop_best() else {
            info!(expanded = self.nodes_expanded(), "frontier exhausted");
            return Some(self.finish(Outcome::Exhausted));
        };
        self.expanded.insert(entry.board);

        if entry.board.is_goal(self.model.goal()) {
            let solution = self.reconstruct(entry.node);
            info!(
                moves = solution.len(),
                cost = solution.total_cost,
                expanded = solution.nodes_expanded,
                max_frontier = solution.max_frontier_size,
                "solved"
            );
            self.goal_node = Some(entry.node);
            return Some(self.finish(Outcome::Solved(solution)));
        }

        let parent = &self.arena[entry.node.0];
        debug!(
            depth = parent.depth,
            blank = parent.board.blank_index(),
            frontier = self.frontier.len(),
            "expanding"
        );
        for child in generate_successors(entry.node, parent) {
            self.admit(child);
        }
        None
    }

    fn finish(&mut self, outcome: Outcome) -> Outcome {
        self.outcome = Some(outcome.clone());
        outcome
    }

    fn check_limits(&self, deadline: Option<Instant>) -> Option<AbortReason> {
        if let Some(cancel) = &self.limits.cancel {
            if cancel.load(Ordering::Relaxed) {
                return Some(AbortReason::Cancelled);
            }
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            return Some(AbortReason::Deadline);
        }
        if self
            .limits
            .max_expansions
            .is_some_and(|max| self.nodes_expanded() >= max)
        {
            return Some(AbortReason::ExpansionLimit);
        }
        None
    }

    /// Applies the duplicate policy to a candidate successor.
    ///
    /// Boards already expanded are always rejected. The insertion-ordered
    /// strategies also reject boards already on the frontier; the cost-based
    /// ones admit the candidate and let the frontier keep the cheaper copy.
    fn admit(&mut self, child: Node) {
        if self.expanded.contains(&child.board) {
            return;
        }
        let cost_based = self.strategy().is_cost_based();
        if !cost_based && self.frontier.contains(&child.board) {
            return;
        }

        let board = child.board;
        let id = self.alloc(child);
        self.push(id);

        if cost_based {
            let evicted = self.frontier.reconcile(&board);
            if !evicted.is_empty() {
                debug!(?evicted, "evicted dominated duplicates");
            }
        }
    }

    fn alloc(&mut self, node: Node) -> NodeId {
        self.arena.push(node);
        NodeId(self.arena.len() - 1)
    }

    fn push(&mut self, id: NodeId) {
        let node = &self.arena[id.0];
        let entry = Entry {
            node: id,
            board: node.board,
            cost: self.model.evaluate(&node.board, node.path_cost),
        };
        self.frontier.push(entry);
    }

    /// Walks parent links from `id` to the root and reports the path in
    /// root-to-goal order.
    fn reconstruct(&self, id: NodeId) -> Solution {
        let mut chain = Vec::new();
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            chain.push(node);
            cursor = node.parent;
        }
        chain.reverse();

        let steps: Vec<Step> = chain
            .iter()
            .filter_map(|node| {
                node.action.map(|action| Step {
                    action,
                    board: node.board,
                    step_cost: u32::from(node.moved_tile),
                    cumulative_cost: node.path_cost,
                })
            })
            .collect();

        Solution {
            total_cost: self.node(id).path_cost,
            steps,
            nodes_expanded: self.nodes_expanded(),
            max_frontier_size: self.frontier.high_water(),
        }
    }

    /// Recomputes the path cost of `id` by summing moved tiles up the parent
    /// chain, without using the memoized value.
    pub fn path_cost_by_walk(&self, id: NodeId) -> u32 {
        let mut total = 0;
        let mut cursor = Some(id);
        while let Some(current) = cursor {
            let node = self.node(current);
            total += u32::from(node.moved_tile);
            cursor = node.parent;
        }
        total
    }
}

/// Solves `initial` towards `goal` with `strategy` and no limits.
///
/// # Examples
/// ```
/// use eight_puzzle_solver::engine::Board;
/// use eight_puzzle_solver::heuristics::Strategy;
/// use eight_puzzle_solver::solver::{solve, Outcome};
/// use eight_puzzle_solver::utils::GOAL;
///
/// let board = Board::new(&[1, 2, 3, 8, 4, 0, 7, 6, 5]).unwrap();
/// let outcome = solve(&board, Strategy::AStarManhattan, &GOAL);
/// let solution = outcome.solution().unwrap();
/// assert_eq!(solution.len(), 1);
/// assert_eq!(solution.total_cost, 4);
///
/// let unsolvable = Board::new(&[2, 1, 3, 8, 0, 4, 7, 6, 5]).unwrap();
/// assert_eq!(solve(&unsolvable, Strategy::AStarManhattan, &GOAL), Outcome::Exhausted);
/// ```
pub fn solve(initial: &Board, strategy: Strategy, goal: &Board) -> Outcome {
    let config = SearchConfig::new(strategy).with_goal(*goal);
    Solver::from_board(*initial, config).run()
}
