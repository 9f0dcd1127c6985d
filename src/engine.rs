//! Core puzzle engine for the sliding-tile (8-puzzle) problem.
//!
//! This module defines the puzzle's fundamental components:
//! - `Tile`: the numeric id of a tile; `BLANK` (0) is the empty cell.
//! - `Action`: a direction the blank moves in.
//! - `Board`: a validated row-major permutation of `0..CELLS`, with move
//!   legality, move application, successor generation and seeded scrambles.
//! - `Game`: an interactive session over a board with a move history for undo.
use crate::error::{BoardDefect, PuzzleError};
use rand::rngs::SmallRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use std::fmt;

/// The numeric id of a tile. Moving tile `k` costs `k`.
pub type Tile = u8;

/// The id of the empty cell.
pub const BLANK: Tile = 0;

/// Edge length of the square grid.
pub const EDGE: usize = 3;

/// Number of cells on the board (`EDGE * EDGE`).
pub const CELLS: usize = EDGE * EDGE;

/// A direction the blank moves in.
///
/// `Up` means the blank swaps with the tile directly above it, so that tile
/// slides down into the old blank cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Up,
    Right,
    Down,
    Left,
}

impl Action {
    /// All actions, in the order successors are generated.
    pub const ALL: [Action; 4] = [Action::Up, Action::Right, Action::Down, Action::Left];

    /// Returns the `(row, column)` offset applied to the blank.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Action::Up => (-1, 0),
            Action::Right => (0, 1),
            Action::Down => (1, 0),
            Action::Left => (0, -1),
        }
    }

    /// Returns the action that undoes this one.
    pub fn opposite(&self) -> Self {
        match self {
            Action::Up => Action::Down,
            Action::Down => Action::Up,
            Action::Left => Action::Right,
            Action::Right => Action::Left,
        }
    }

    /// Parses a single-letter move (`u`, `r`, `d`, `l`, case-insensitive).
    pub fn from_char(c: char) -> Option<Self> {
        match c.to_ascii_lowercase() {
            'u' => Some(Action::Up),
            'r' => Some(Action::Right),
            'd' => Some(Action::Down),
            'l' => Some(Action::Left),
            _ => None,
        }
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Action::Up => "Up",
            Action::Right => "Right",
            Action::Down => "Down",
            Action::Left => "Left",
        };
        write!(f, "{}", s)
    }
}

/// Returns the `(row, column)` of a cell index on the grid.
pub fn row_col(index: usize) -> (usize, usize) {
    (index / EDGE, index % EDGE)
}

/// Represents a puzzle configuration as a row-major sequence of tiles.
///
/// A `Board` is always a permutation of `0..CELLS`: exactly one blank and no
/// duplicate tiles. The only way to obtain one from untrusted input is
/// [`Board::new`], which validates the invariant. Equality and hashing are
/// by tile content only.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    tiles: [Tile; CELLS],
    blank: usize,
}

impl Board {
    /// Creates a board from a tile sequence, validating that it is a
    /// permutation of `0..CELLS` with exactly one blank.
    ///
    /// # Errors
    /// Returns `PuzzleError::InvalidBoard` naming the first defect found.
    ///
    /// # Examples
    /// ```
    /// use eight_puzzle_solver::engine::Board;
    ///
    /// let board = Board::new(&[1, 2, 3, 8, 0, 4, 7, 6, 5]).unwrap();
    /// assert_eq!(board.blank_index(), 4);
    ///
    /// assert!(Board::new(&[1, 2, 3, 8, 1, 4, 7, 6, 5]).is_err());
    /// assert!(Board::new(&[1, 2, 3]).is_err());
    /// ```
    pub fn new(tiles: &[Tile]) -> Result<Self, PuzzleError> {
        if tiles.len() != CELLS {
            return Err(BoardDefect::WrongLength {
                expected: CELLS,
                found: tiles.len(),
            }
            .into());
        }

        let mut seen = [false; CELLS];
        for &tile in tiles {
            let slot = seen
                .get_mut(tile as usize)
                .ok_or(BoardDefect::TileOutOfRange(tile))?;
            if *slot {
                return Err(BoardDefect::DuplicateTile(tile).into());
            }
            *slot = true;
        }

        let blank = locate_blank(tiles)?;
        let mut grid = [BLANK; CELLS];
        grid.copy_from_slice(tiles);
        Ok(Board { tiles: grid, blank })
    }

    /// Builds a board from a literal known to be a valid permutation.
    ///
    /// Only used for the crate's own constants; the blank is located at
    /// compile time.
    pub(crate) const fn from_array_unchecked(tiles: [Tile; CELLS]) -> Self {
        let mut blank = 0;
        let mut i = 0;
        while i < CELLS {
            if tiles[i] == BLANK {
                blank = i;
            }
            i += 1;
        }
        Board { tiles, blank }
    }

    /// Returns the tiles in row-major order.
    pub fn tiles(&self) -> &[Tile; CELLS] {
        &self.tiles
    }

    /// Returns the tile at the specified row (`r`) and column (`c`).
    ///
    /// # Panics
    /// Panics if `r` or `c` are outside the grid.
    pub fn get_tile(&self, r: usize, c: usize) -> Tile {
        assert!(r < EDGE && c < EDGE, "cell ({r}, {c}) is off the board");
        self.tiles[r * EDGE + c]
    }

    /// Returns the cell index holding the blank.
    pub fn blank_index(&self) -> usize {
        self.blank
    }

    /// Checks whether this board matches `goal` tile for tile.
    pub fn is_goal(&self, goal: &Board) -> bool {
        self.tiles == goal.tiles
    }

    /// Returns the index of the cell the blank would move into, or `None`
    /// when `action` would take it off the grid.
    pub fn target_index(&self, action: Action) -> Option<usize> {
        let (row, col) = row_col(self.blank);
        let (dr, dc) = action.as_offset();
        let new_row = row as isize + dr;
        let new_col = col as isize + dc;

        if new_row >= 0 && new_row < EDGE as isize && new_col >= 0 && new_col < EDGE as isize {
            Some(new_row as usize * EDGE + new_col as usize)
        } else {
            None
        }
    }

    /// Lists the actions the blank can legally take, in `Action::ALL` order.
    pub fn legal_actions(&self) -> Vec<Action> {
        Action::ALL
            .into_iter()
            .filter(|&action| self.target_index(action).is_some())
            .collect()
    }

    /// Swaps the blank with its neighbour in direction `action`.
    ///
    /// Returns the new board and the id of the tile that moved, which is also
    /// the cost of the move.
    ///
    /// # Errors
    /// Returns `PuzzleError::IllegalMove` if the blank would leave the grid.
    pub fn apply_move(&self, action: Action) -> Result<(Board, Tile), PuzzleError> {
        let target = self
            .target_index(action)
            .ok_or(PuzzleError::IllegalMove(action))?;
        Ok(self.swap_blank_with(target))
    }

    /// Swaps the blank with the cell at `target`. The caller guarantees that
    /// `target` is orthogonally adjacent to the blank.
    fn swap_blank_with(&self, target: usize) -> (Board, Tile) {
        let mut tiles = self.tiles;
        let moved = tiles[target];
        tiles.swap(self.blank, target);
        (
            Board {
                tiles,
                blank: target,
            },
            moved,
        )
    }

    /// Generates every successor reachable with one blank move.
    ///
    /// Each entry is `(action, new_board, moved_tile)`. Successors appear in
    /// `Action::ALL` order, restricted to legal moves.
    pub fn successors(&self) -> Vec<(Action, Board, Tile)> {
        Action::ALL
            .into_iter()
            .filter_map(|action| {
                self.target_index(action).map(|target| {
                    let (board, moved) = self.swap_blank_with(target);
                    (action, board, moved)
                })
            })
            .collect()
    }

    /// Scrambles `goal` by a seeded random walk of `moves` legal blank moves.
    ///
    /// Immediately undoing the previous move is avoided when another move is
    /// available, so the walk does not trivially cancel itself. The result is
    /// always reachable from `goal`, and the same seed always produces the
    /// same board.
    pub fn scrambled_with_seed(goal: &Board, moves: usize, seed: u64) -> Self {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut board = *goal;
        let mut last: Option<Action> = None;

        for _ in 0..moves {
            let mut options = board.legal_actions();
            if let Some(prev) = last {
                options.retain(|&a| a != prev.opposite());
            }
            // The blank always has at least two legal moves on a 3x3 grid.
            let Some(&action) = options.choose(&mut rng) else {
                break;
            };
            if let Some(target) = board.target_index(action) {
                board = board.swap_blank_with(target).0;
                last = Some(action);
            }
        }
        board
    }
}

/// Finds the blank by linear scan.
fn locate_blank(tiles: &[Tile]) -> Result<usize, PuzzleError> {
    tiles
        .iter()
        .position(|&t| t == BLANK)
        .ok_or_else(|| BoardDefect::MissingBlank.into())
}

impl fmt::Display for Board {
    /// Draws the board as a grid of tiles joined by connectors, with the
    /// blank shown as `_`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for r in 0..EDGE {
            let row: Vec<String> = (0..EDGE)
                .map(|c| match self.tiles[r * EDGE + c] {
                    BLANK => "_".to_string(),
                    tile => tile.to_string(),
                })
                .collect();
            write!(f, "{}", row.join("--"))?;
            if r < EDGE - 1 {
                writeln!(f)?;
                writeln!(f, "{}", vec!["|"; EDGE].join("  "))?;
            }
        }
        Ok(())
    }
}

/// Manages an interactive puzzle session.
///
/// Tracks the current board, the actions taken, the accumulated tile cost,
/// and a history of prior states so moves can be undone.
///
/// # Examples
/// ```
/// use eight_puzzle_solver::engine::{Action, Game};
/// use eight_puzzle_solver::utils::GOAL;
///
/// let mut game = Game::new_with_board(GOAL);
/// assert!(game.process_move(Action::Right));
/// assert_eq!(game.cost(), 4);
/// assert!(game.undo_last_move());
/// assert!(game.board().is_goal(&GOAL));
/// ```
#[derive(Clone, Debug)]
pub struct Game {
    board: Board,
    cost: u32,
    actions: Vec<Action>,
    history: Vec<(Board, u32)>, // (board, cost) before each move, for undo
}

impl Game {
    /// Starts a session from `initial_board`.
    pub fn new_with_board(initial_board: Board) -> Self {
        Game {
            board: initial_board,
            cost: 0,
            actions: Vec::new(),
            history: Vec::new(),
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Total tile cost of the moves made so far.
    pub fn cost(&self) -> u32 {
        self.cost
    }

    /// Number of moves made so far.
    pub fn steps(&self) -> usize {
        self.actions.len()
    }

    pub fn actions(&self) -> &[Action] {
        &self.actions
    }

    /// Moves the blank in direction `action`.
    ///
    /// Returns `false` and leaves the session untouched if the move would
    /// take the blank off the grid.
    pub fn process_move(&mut self, action: Action) -> bool {
        match self.board.apply_move(action) {
            Ok((next, moved)) => {
                self.history.push((self.board, self.cost));
                self.board = next;
                self.cost += u32::from(moved);
                self.actions.push(action);
                true
            }
            Err(_) => false,
        }
    }

    /// Reverts the last move. Returns `false` if no moves have been made.
    pub fn undo_last_move(&mut self) -> bool {
        match self.history.pop() {
            Some((board, cost)) => {
                self.board = board;
                self.cost = cost;
                self.actions.pop();
                true
            }
            None => false,
        }
    }

    pub fn is_solved(&self, goal: &Board) -> bool {
        self.board.is_goal(goal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{EASY, GOAL, HARD};

    fn is_permutation(board: &Board) -> bool {
        let mut sorted = *board.tiles();
        sorted.sort_unstable();
        sorted.iter().enumerate().all(|(i, &t)| t as usize == i)
            && board.tiles()[board.blank_index()] == BLANK
    }

    #[test]
    fn test_new_valid_board() {
        let board = Board::new(&[1, 2, 3, 8, 0, 4, 7, 6, 5]).unwrap();
        assert_eq!(board, GOAL);
        assert_eq!(board.blank_index(), 4);
        assert_eq!(board.get_tile(0, 2), 3);
        assert_eq!(board.get_tile(2, 0), 7);
    }

    #[test]
    fn test_new_rejects_wrong_length() {
        let err = Board::new(&[1, 2, 3, 8, 0, 4, 7, 6]).unwrap_err();
        assert_eq!(
            err,
            PuzzleError::InvalidBoard(BoardDefect::WrongLength {
                expected: 9,
                found: 8
            })
        );
    }

    #[test]
    fn test_new_rejects_duplicates_and_out_of_range() {
        assert_eq!(
            Board::new(&[1, 2, 3, 8, 0, 4, 7, 6, 6]).unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::DuplicateTile(6))
        );
        assert_eq!(
            Board::new(&[1, 2, 3, 8, 0, 4, 7, 6, 9]).unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::TileOutOfRange(9))
        );
        // Two blanks are reported as a duplicate of tile 0.
        assert_eq!(
            Board::new(&[1, 2, 3, 8, 0, 0, 7, 6, 5]).unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::DuplicateTile(0))
        );
    }

    #[test]
    fn test_locate_blank_missing() {
        assert_eq!(
            locate_blank(&[1, 2, 3]).unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::MissingBlank)
        );
    }

    #[test]
    fn test_constants_are_valid_boards() {
        for board in [GOAL, EASY, HARD] {
            assert!(is_permutation(&board), "{:?} is not a permutation", board);
            assert_eq!(Board::new(board.tiles()).unwrap(), board);
        }
    }

    #[test]
    fn test_legal_actions_by_blank_position() {
        // Centre: all four moves.
        assert_eq!(GOAL.legal_actions(), Action::ALL.to_vec());

        // Top-left corner: only right and down.
        let corner = Board::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(corner.legal_actions(), vec![Action::Right, Action::Down]);

        // Bottom edge middle: up, right, left.
        let edge = Board::new(&[1, 2, 3, 4, 5, 6, 7, 0, 8]).unwrap();
        assert_eq!(
            edge.legal_actions(),
            vec![Action::Up, Action::Right, Action::Left]
        );
    }

    #[test]
    fn test_apply_move_swaps_blank_and_reports_tile() {
        let (next, moved) = GOAL.apply_move(Action::Right).unwrap();
        assert_eq!(moved, 4);
        assert_eq!(next.tiles(), &[1, 2, 3, 8, 4, 0, 7, 6, 5]);
        assert_eq!(next.blank_index(), 5);

        let (next, moved) = GOAL.apply_move(Action::Up).unwrap();
        assert_eq!(moved, 2);
        assert_eq!(next.tiles(), &[1, 0, 3, 8, 2, 4, 7, 6, 5]);
    }

    #[test]
    fn test_apply_move_illegal() {
        let corner = Board::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        assert_eq!(
            corner.apply_move(Action::Up).unwrap_err(),
            PuzzleError::IllegalMove(Action::Up)
        );
        assert!(corner.apply_move(Action::Left).is_err());
    }

    #[test]
    fn test_move_then_opposite_restores_board() {
        for action in GOAL.legal_actions() {
            let (next, _) = GOAL.apply_move(action).unwrap();
            let (back, _) = next.apply_move(action.opposite()).unwrap();
            assert_eq!(back, GOAL);
        }
    }

    #[test]
    fn test_successors_are_permutations() {
        for seed in 0..50 {
            let board = Board::scrambled_with_seed(&GOAL, 25, seed);
            let successors = board.successors();
            assert!((2..=4).contains(&successors.len()));
            for (action, next, moved) in successors {
                assert!(is_permutation(&next), "successor is not a permutation");
                assert_ne!(moved, BLANK);
                assert_eq!(next.tiles()[board.blank_index()], moved);
                assert_eq!(board.apply_move(action).unwrap(), (next, moved));
            }
        }
    }

    #[test]
    fn test_scrambled_with_seed_determinism() {
        let a = Board::scrambled_with_seed(&GOAL, 30, 7);
        let b = Board::scrambled_with_seed(&GOAL, 30, 7);
        assert_eq!(a, b, "same seed must give the same scramble");
        assert!(is_permutation(&a));

        let zero = Board::scrambled_with_seed(&GOAL, 0, 7);
        assert_eq!(zero, GOAL, "zero moves leaves the goal untouched");
    }

    #[test]
    fn test_display_board_formatting() {
        let expected = "1--2--3\n|  |  |\n8--_--4\n|  |  |\n7--6--5";
        assert_eq!(GOAL.to_string(), expected);
    }

    #[test]
    fn test_action_from_char() {
        assert_eq!(Action::from_char('U'), Some(Action::Up));
        assert_eq!(Action::from_char('l'), Some(Action::Left));
        assert_eq!(Action::from_char('x'), None);
    }

    #[test]
    fn test_game_moves_and_undo() {
        let mut game = Game::new_with_board(GOAL);
        assert!(game.is_solved(&GOAL));

        assert!(game.process_move(Action::Up));
        assert!(game.process_move(Action::Left));
        assert_eq!(game.steps(), 2);
        assert_eq!(game.cost(), 2 + 1);
        assert_eq!(game.actions(), &[Action::Up, Action::Left]);
        assert!(!game.is_solved(&GOAL));

        assert!(game.undo_last_move());
        assert_eq!(game.cost(), 2);
        assert!(game.undo_last_move());
        assert!(game.is_solved(&GOAL));
        assert!(!game.undo_last_move(), "nothing left to undo");
    }

    #[test]
    fn test_game_rejects_illegal_move() {
        let corner = Board::new(&[0, 1, 2, 3, 4, 5, 6, 7, 8]).unwrap();
        let mut game = Game::new_with_board(corner);
        assert!(!game.process_move(Action::Left));
        assert_eq!(game.steps(), 0);
        assert_eq!(game.board(), &corner);
    }
}
