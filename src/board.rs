use std::fmt;
use std::str::FromStr;

use crate::{error::GameError, streak, COLUMNS, ROWS};

#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Cell {
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            _ => false,
        }
    }

    /// The integer used for this cell in grids and CSV files
    pub fn code(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::PlayerOne => 1,
            Cell::PlayerTwo => 2,
        }
    }

    pub fn from_code(code: i64) -> Option<Self> {
        match code {
            0 => Some(Cell::Empty),
            1 => Some(Cell::PlayerOne),
            2 => Some(Cell::PlayerTwo),
            _ => None,
        }
    }

    pub fn player(self) -> Option<Player> {
        match self {
            Cell::Empty => None,
            Cell::PlayerOne => Some(Player::One),
            Cell::PlayerTwo => Some(Player::Two),
        }
    }
}

/// One of the two colors. `One` is conventionally the opponent and `Two` the agent
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash)]
pub enum Player {
    One,
    Two,
}

impl Player {
    pub fn cell(self) -> Cell {
        match self {
            Player::One => Cell::PlayerOne,
            Player::Two => Cell::PlayerTwo,
        }
    }

    pub fn opponent(self) -> Self {
        match self {
            Player::One => Player::Two,
            Player::Two => Player::One,
        }
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum GameState {
    Playing,
    PlayerOneWin,
    PlayerTwoWin,
    Draw,
}

/// A Connect 4 position stored as a grid of cells
///
/// Row 0 is the top of the board and pieces fall towards row `ROWS - 1`.
/// Boards are small `Copy` values: applying a move always produces a new
/// board and leaves the original untouched.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub struct Board {
    cells: [[Cell; COLUMNS]; ROWS], // cells are stored top-to-bottom, left-to-right
}

impl Board {
    pub fn new() -> Self {
        Self {
            cells: [[Cell::Empty; COLUMNS]; ROWS],
        }
    }

    /// Builds a board from a top-row-first grid of cell codes (0 = empty,
    /// 1 = player one, 2 = player two)
    ///
    /// The grid must be exactly `ROWS` x `COLUMNS`, use only known codes and
    /// contain no piece floating above an empty cell.
    pub fn from_grid<R: AsRef<[i64]>>(grid: &[R]) -> Result<Self, GameError> {
        if grid.len() != ROWS {
            return Err(GameError::MalformedInput(format!(
                "expected {} rows, found {}",
                ROWS,
                grid.len()
            )));
        }

        let mut board = Self::new();
        for (row, values) in grid.iter().enumerate() {
            let values = values.as_ref();
            if values.len() != COLUMNS {
                return Err(GameError::MalformedInput(format!(
                    "expected {} columns on row {}, found {}",
                    COLUMNS,
                    row,
                    values.len()
                )));
            }
            for (column, &value) in values.iter().enumerate() {
                board.cells[row][column] = Cell::from_code(value).ok_or_else(|| {
                    GameError::MalformedInput(format!(
                        "invalid cell value {} at row {}, column {}",
                        value, row, column
                    ))
                })?;
            }
        }

        // every occupied cell must rest on another piece or the bottom row
        for column in 0..COLUMNS {
            for row in 0..ROWS - 1 {
                if !board.cells[row][column].is_empty() && board.cells[row + 1][column].is_empty()
                {
                    return Err(GameError::MalformedInput(format!(
                        "floating piece at row {}, column {}",
                        row, column
                    )));
                }
            }
        }

        Ok(board)
    }

    /// Builds a board by replaying a string of one-indexed columns, e.g. "4453"
    ///
    /// Moves alternate between player one and player two, starting with
    /// player one.
    pub fn from_moves<S: AsRef<str>>(moves: S) -> Result<Self, GameError> {
        let mut board = Self::new();
        let mut player = Player::One;

        for column_char in moves.as_ref().chars() {
            match column_char.to_digit(10).map(|c| c as usize) {
                Some(column @ 1..=COLUMNS) => {
                    // abort if the position is won at any point
                    if board.winner().is_some() {
                        return Err(GameError::MalformedInput(
                            "invalid position, game is over".into(),
                        ));
                    }
                    board = board.apply(column - 1, player)?;
                    player = player.opponent();
                }
                _ => {
                    return Err(GameError::MalformedInput(format!(
                        "could not parse '{}' as a valid move",
                        column_char
                    )))
                }
            }
        }
        Ok(board)
    }

    pub fn get(&self, row: usize, column: usize) -> Cell {
        self.cells[row][column]
    }

    pub fn playable(&self, column: usize) -> bool {
        column < COLUMNS && self.cells[0][column].is_empty()
    }

    /// All playable columns in ascending order
    pub fn legal_moves(&self) -> Vec<usize> {
        (0..COLUMNS).filter(|&column| self.playable(column)).collect()
    }

    /// The row a piece dropped into `column` would land on
    pub fn drop_row(&self, column: usize) -> Option<usize> {
        if column >= COLUMNS {
            return None;
        }
        (0..ROWS)
            .rev()
            .find(|&row| self.cells[row][column].is_empty())
    }

    /// Returns a new board with `player`'s piece dropped into `column`
    pub fn apply(&self, column: usize, player: Player) -> Result<Board, GameError> {
        if column >= COLUMNS {
            return Err(GameError::ColumnOutOfRange { column });
        }
        let row = self
            .drop_row(column)
            .ok_or(GameError::ColumnFull { column })?;

        let mut next = *self;
        next.cells[row][column] = player.cell();
        Ok(next)
    }

    /// Whether the top row is completely filled
    pub fn is_full(&self) -> bool {
        self.cells[0].iter().all(|cell| !cell.is_empty())
    }

    pub fn num_pieces(&self) -> usize {
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|cell| !cell.is_empty())
            .count()
    }

    /// The number of pieces `player` has on the board
    pub fn count(&self, player: Player) -> usize {
        let target = player.cell();
        self.cells
            .iter()
            .flat_map(|row| row.iter())
            .filter(|&&cell| cell == target)
            .count()
    }

    pub fn has_four(&self, player: Player) -> bool {
        streak::count_streaks(self, player, 4) > 0
    }

    pub fn winner(&self) -> Option<Player> {
        if self.has_four(Player::One) {
            Some(Player::One)
        } else if self.has_four(Player::Two) {
            Some(Player::Two)
        } else {
            None
        }
    }

    /// The player due to move, assuming player one opened the game
    pub fn next_player(&self) -> Player {
        if self.count(Player::One) > self.count(Player::Two) {
            Player::Two
        } else {
            Player::One
        }
    }

    /// A board is terminal once either player has four in a row or the top row is full
    pub fn is_terminal(&self) -> bool {
        self.has_four(Player::One) || self.has_four(Player::Two) || self.is_full()
    }

    pub fn state(&self) -> GameState {
        match self.winner() {
            Some(Player::One) => GameState::PlayerOneWin,
            Some(Player::Two) => GameState::PlayerTwoWin,
            None if self.is_full() => GameState::Draw,
            None => GameState::Playing,
        }
    }

    /// Returns the same position with the two colors exchanged
    pub fn swap_colors(&self) -> Board {
        let mut swapped = *self;
        for cell in swapped.cells.iter_mut().flat_map(|row| row.iter_mut()) {
            *cell = match *cell {
                Cell::Empty => Cell::Empty,
                Cell::PlayerOne => Cell::PlayerTwo,
                Cell::PlayerTwo => Cell::PlayerOne,
            };
        }
        swapped
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses comma separated rows of cell codes, top row first
impl FromStr for Board {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut grid = Vec::with_capacity(ROWS);
        for (row, line) in s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
        {
            let values = line
                .split(',')
                .map(|token| {
                    let token = token.trim();
                    token.parse::<i64>().map_err(|_| {
                        GameError::MalformedInput(format!(
                            "could not parse '{}' on row {}",
                            token, row
                        ))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            grid.push(values);
        }
        Self::from_grid(&grid)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.iter() {
            let line: Vec<String> = row.iter().map(|cell| cell.code().to_string()).collect();
            writeln!(f, "{}", line.join(","))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_fills_from_the_bottom() {
        let board = Board::new();
        assert_eq!(board.drop_row(3), Some(ROWS - 1));

        let board = board.apply(3, Player::One).unwrap();
        assert_eq!(board.get(ROWS - 1, 3), Cell::PlayerOne);
        assert_eq!(board.drop_row(3), Some(ROWS - 2));

        let board = board.apply(3, Player::Two).unwrap();
        assert_eq!(board.get(ROWS - 2, 3), Cell::PlayerTwo);
    }

    #[test]
    fn apply_rejects_invalid_columns() {
        let mut board = Board::new();
        for _ in 0..ROWS {
            board = board.apply(0, Player::One).unwrap();
        }
        assert_eq!(board.drop_row(0), None);
        assert_eq!(
            board.apply(0, Player::Two),
            Err(GameError::ColumnFull { column: 0 })
        );
        assert_eq!(
            board.apply(COLUMNS, Player::Two),
            Err(GameError::ColumnOutOfRange { column: COLUMNS })
        );
        assert_eq!(board.drop_row(COLUMNS), None);
    }

    #[test]
    fn from_grid_rejects_malformed_input() {
        let short = vec![vec![0i64; COLUMNS]; ROWS - 1];
        assert!(matches!(
            Board::from_grid(&short),
            Err(GameError::MalformedInput(_))
        ));

        let mut narrow = vec![vec![0i64; COLUMNS]; ROWS];
        narrow[2].pop();
        assert!(Board::from_grid(&narrow).is_err());

        let mut bad_value = vec![vec![0i64; COLUMNS]; ROWS];
        bad_value[ROWS - 1][0] = 3;
        assert!(Board::from_grid(&bad_value).is_err());

        let mut floating = vec![vec![0i64; COLUMNS]; ROWS];
        floating[ROWS - 2][4] = 1;
        assert!(Board::from_grid(&floating).is_err());
    }

    #[test]
    fn csv_round_trip() {
        let board = Board::from_moves("4453361").unwrap();
        let text = board.to_string();
        assert_eq!(text.parse::<Board>().unwrap(), board);
        assert!("0,0,x,0,0,0,0".parse::<Board>().is_err());
    }

    #[test]
    fn from_moves_stops_at_finished_games() {
        assert!(Board::from_moves("1212121").is_ok());
        assert!(Board::from_moves("12121213").is_err());
        assert!(Board::from_moves("8").is_err());
        assert!(Board::from_moves("1111111").is_err());
    }

    #[test]
    fn game_state() {
        assert_eq!(Board::new().state(), GameState::Playing);
        assert_eq!(
            Board::from_moves("1212121").unwrap().state(),
            GameState::PlayerOneWin
        );
        assert_eq!(
            Board::from_moves("2121323").unwrap().state(),
            GameState::Playing
        );
        assert_eq!(
            Board::from_moves("1122334").unwrap().state(),
            GameState::PlayerOneWin
        );

        let full: Board = "1,1,1,2,1,1,1
                           1,1,1,2,1,1,1
                           2,2,2,1,2,2,2
                           2,2,2,1,2,2,2
                           1,1,1,2,1,1,1
                           1,1,1,2,1,1,1"
            .parse()
            .unwrap();
        assert_eq!(full.state(), GameState::Draw);
        assert!(full.is_terminal());
        assert!(full.legal_moves().is_empty());
    }

    #[test]
    fn next_player_follows_piece_counts() {
        assert_eq!(Board::new().next_player(), Player::One);
        assert_eq!(Board::from_moves("4").unwrap().next_player(), Player::Two);
        assert_eq!(Board::from_moves("4453").unwrap().next_player(), Player::One);

        let loaded: Board = "0,0,0,0,0,0,0
                             0,0,0,0,0,0,0
                             0,0,0,0,0,0,0
                             0,0,0,0,0,0,0
                             0,0,0,2,0,0,0
                             0,0,1,1,2,0,1"
            .parse()
            .unwrap();
        assert_eq!(loaded.next_player(), Player::Two);
    }

    #[test]
    fn swap_colors_exchanges_pieces() {
        let board = Board::from_moves("445").unwrap();
        let swapped = board.swap_colors();
        assert_eq!(swapped.count(Player::One), board.count(Player::Two));
        assert_eq!(swapped.count(Player::Two), board.count(Player::One));
        assert_eq!(swapped.swap_colors(), board);
    }
}
