use crate::engine::{Board, Tile};
use crate::error::PuzzleError;
use std::fmt;
use tracing_subscriber::EnvFilter;

/// The reference goal: tiles run clockwise around a centre blank.
pub const GOAL: Board = Board::from_array_unchecked([1, 2, 3, 8, 0, 4, 7, 6, 5]);

/// A short, solvable scramble of `GOAL`.
pub const EASY: Board = Board::from_array_unchecked([1, 3, 4, 8, 6, 2, 7, 0, 5]);

pub const MEDIUM: Board = Board::from_array_unchecked([2, 8, 1, 0, 4, 3, 7, 6, 5]);

/// `GOAL` rotated by 180 degrees.
pub const HARD: Board = Board::from_array_unchecked([5, 6, 7, 4, 0, 8, 3, 2, 1]);

/// Named starting boards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, clap::ValueEnum)]
pub enum Preset {
    Easy,
    Medium,
    Hard,
}

impl Preset {
    pub const ALL: [Preset; 3] = [Preset::Easy, Preset::Medium, Preset::Hard];

    pub fn board(&self) -> Board {
        match self {
            Preset::Easy => EASY,
            Preset::Medium => MEDIUM,
            Preset::Hard => HARD,
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Preset::Easy => "easy",
            Preset::Medium => "medium",
            Preset::Hard => "hard",
        };
        write!(f, "{}", s)
    }
}

/// Parses a board from text.
///
/// Tiles may be separated by whitespace, commas, or `--`/`|` connectors as
/// produced by the board's `Display`; `_` stands for the blank. A string of
/// exactly nine digits with no separators is read one digit per tile.
///
/// # Errors
/// * `PuzzleError::Parse` if a token is not a tile number.
/// * `PuzzleError::InvalidBoard` if the tiles do not form a valid board.
///
/// # Examples
/// ```
/// use eight_puzzle_solver::utils::{board_from_str, GOAL};
///
/// assert_eq!(board_from_str("1 2 3 8 0 4 7 6 5").unwrap(), GOAL);
/// assert_eq!(board_from_str("123804765").unwrap(), GOAL);
/// assert_eq!(board_from_str("1,2,3, 8,0,4, 7,6,5").unwrap(), GOAL);
/// assert_eq!(board_from_str(&GOAL.to_string()).unwrap(), GOAL);
///
/// assert!(board_from_str("1 2 3 x 0 4 7 6 5").is_err());
/// assert!(board_from_str("1 2 3").is_err());
/// ```
pub fn board_from_str(s: &str) -> Result<Board, PuzzleError> {
    let trimmed = s.trim();
    let tiles = if trimmed.len() == crate::engine::CELLS
        && trimmed.chars().all(|c| c.is_ascii_digit())
    {
        trimmed
            .chars()
            .map(|c| parse_tile(&c.to_string()))
            .collect::<Result<Vec<Tile>, _>>()?
    } else {
        trimmed
            .split(|c: char| c.is_whitespace() || c == ',' || c == '-' || c == '|')
            .filter(|token| !token.is_empty())
            .map(parse_tile)
            .collect::<Result<Vec<Tile>, _>>()?
    };
    Board::new(&tiles)
}

fn parse_tile(token: &str) -> Result<Tile, PuzzleError> {
    if token == "_" {
        return Ok(crate::engine::BLANK);
    }
    token
        .parse::<Tile>()
        .map_err(|_| PuzzleError::Parse(format!("unrecognized tile '{}'", token)))
}

/// Installs a `tracing` subscriber for the binaries.
///
/// `RUST_LOG` wins when set; otherwise the level is `warn`, raised to `info`
/// by one `-v` and `debug` by two or more.
pub fn init_tracing(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    // Ignored if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoardDefect;

    #[test]
    fn test_board_from_str_separators() {
        assert_eq!(board_from_str("1 3 4\n8 6 2\n7 0 5").unwrap(), EASY);
        assert_eq!(board_from_str("  281043765  ").unwrap(), MEDIUM);
        assert_eq!(board_from_str("5,6,7,4,_,8,3,2,1").unwrap(), HARD);
    }

    #[test]
    fn test_board_from_str_round_trips_display() {
        for preset in Preset::ALL {
            let board = preset.board();
            assert_eq!(board_from_str(&board.to_string()).unwrap(), board);
        }
    }

    #[test]
    fn test_board_from_str_invalid_token() {
        let err = board_from_str("1 2 3 8 0 4 7 6 X").unwrap_err();
        assert_eq!(err, PuzzleError::Parse("unrecognized tile 'X'".to_string()));
        assert!(err.to_string().contains("unrecognized tile 'X'"));
    }

    #[test]
    fn test_board_from_str_invalid_board() {
        assert_eq!(
            board_from_str("1 2 3 8 0 4 7 6 5 9").unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::WrongLength {
                expected: 9,
                found: 10
            })
        );
        assert_eq!(
            board_from_str("112345678").unwrap_err(),
            PuzzleError::InvalidBoard(BoardDefect::DuplicateTile(1))
        );
        assert!(board_from_str("").is_err());
    }

    #[test]
    fn test_presets_are_distinct_from_goal() {
        for preset in Preset::ALL {
            assert_ne!(preset.board(), GOAL, "{} preset is already solved", preset);
        }
    }
}
