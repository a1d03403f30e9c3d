//! Run counting used by both win detection and the heuristic evaluators

use crate::{board::Board, board::Player, COLUMNS, ROWS};

/// The directions scanned from every origin cell as (row step, column step):
/// down, right, diagonal down-right and diagonal up-right
const DIRECTIONS: [(isize, isize); 4] = [(1, 0), (0, 1), (1, 1), (-1, 1)];

/// Counts runs of at least `length` pieces of `color`
///
/// Every cell holding `color` is treated as an origin and scanned in each of
/// the four directions, adding one hit per direction whose run reaches
/// `length`. Overlapping runs are counted once per origin, so a line of four
/// scores three hits at `length` 2.
pub fn count_streaks(board: &Board, color: Player, length: usize) -> usize {
    let mut count = 0;
    for row in 0..ROWS {
        for column in 0..COLUMNS {
            if board.get(row, column) != color.cell() {
                continue;
            }
            for &(row_step, column_step) in DIRECTIONS.iter() {
                if run_length(board, row, column, row_step, column_step) >= length {
                    count += 1;
                }
            }
        }
    }
    count
}

/// The number of consecutive cells matching the origin's color, starting at
/// the origin and stepping by (`row_step`, `column_step`) until a mismatch or
/// the edge of the board
pub fn run_length(
    board: &Board,
    row: usize,
    column: usize,
    row_step: isize,
    column_step: isize,
) -> usize {
    let color = board.get(row, column);
    let (mut r, mut c) = (row as isize, column as isize);
    let mut run = 0;
    while r >= 0
        && r < ROWS as isize
        && c >= 0
        && c < COLUMNS as isize
        && board.get(r as usize, c as usize) == color
    {
        run += 1;
        r += row_step;
        c += column_step;
    }
    run
}
