//! Parsing helpers for fixture boards.
use crate::engine::Board;

/// Parses an array of row strings into a `Board`.
///
/// Each string is one row, top to bottom, holding whitespace-separated
/// tile values; `0` marks the empty cell. The number of rows fixes the
/// board size, so every row must hold exactly that many values and the
/// whole grid must be a permutation of `{0, .., size * size - 1}`.
///
/// # Errors
/// Returns a description of the first problem found: a row of the wrong
/// width, an unparseable value, or a sequence failing the permutation
/// check in [`Board::from_cells`].
///
/// # Examples
/// ```
/// use fifteen_engine::utils::board_from_rows;
///
/// let board = board_from_rows(&["1 2 3", "4 0 5", "7 8 6"]).unwrap();
/// assert_eq!(board.size(), 3);
/// assert_eq!(board.empty_index(), 4);
///
/// assert!(board_from_rows(&["1 2", "3 x"]).is_err());
/// ```
pub fn board_from_rows(rows: &[&str]) -> Result<Board, String> {
    let size = rows.len();
    let mut cells = Vec::with_capacity(size * size);
    for (row_index, row) in rows.iter().enumerate() {
        let entries: Vec<&str> = row.split_whitespace().collect();
        if entries.len() != size {
            return Err(format!(
                "Row {} has {} values. Expected {}",
                row_index,
                entries.len(),
                size
            ));
        }
        for entry in entries {
            let value: u8 = entry.parse().map_err(|_| {
                format!("Unrecognized tile value '{}' in row {}", entry, row_index)
            })?;
            cells.push(value);
        }
    }
    Board::from_cells(size, cells)
}
