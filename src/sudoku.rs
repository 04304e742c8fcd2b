//! Sudoku-to-exact-cover reduction, grid validation, text encodings, and
//! the thin facade that ties the reducer to the solver.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dlx::Matrix;
use crate::error::SudokuError;
use crate::solver::{self, Solution};

static UNDERSCORE_FORM: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+(_[0-9]+)*$").unwrap());
static PLAIN_DIGITS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+$").unwrap());

/// A validated N×N Sudoku grid. `0` means "empty"; filled cells hold
/// `1..=size`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sudoku {
    grid: Vec<Vec<u32>>,
    size: usize,
    box_side: usize,
}

impl Sudoku {
    /// Validates and wraps a grid.
    ///
    /// Rejects a grid that isn't square, whose side isn't a perfect
    /// square (so it has no box size), or that holds a cell value outside
    /// `0..=size`. Does *not* reject grids with conflicting clues — those
    /// are left to surface as an unsolvable reduction instead.
    pub fn new(grid: Vec<Vec<u32>>) -> Result<Self, SudokuError> {
        let size = grid.len();

        for row in &grid {
            if row.len() != size {
                return Err(SudokuError::NotSquare { expected: size, found: row.len() });
            }
        }

        let box_side = (size as f64).sqrt().round() as usize;
        if box_side * box_side != size {
            return Err(SudokuError::SizeNotPerfectSquare { size });
        }

        for (r, row) in grid.iter().enumerate() {
            for (c, &value) in row.iter().enumerate() {
                if value as usize > size {
                    return Err(SudokuError::ValueOutOfRange { row: r, col: c, value, size });
                }
            }
        }

        Ok(Self { grid, size, box_side })
    }

    /// Parses the underscore-delimited form (`"1_0_3_2"`), which supports
    /// N > 9 since each field is a decimal number rather than a digit.
    pub fn from_text(text: &str) -> Result<Self, SudokuError> {
        if !UNDERSCORE_FORM.is_match(text) {
            return Err(SudokuError::MalformedText {
                detail: format!("{text:?} is not underscore-delimited decimal fields"),
            });
        }

        let fields: Vec<u32> = text
            .split('_')
            .map(|f| f.parse().expect("regex already validated decimal digits"))
            .collect();

        let size = integer_sqrt(fields.len())
            .ok_or(SudokuError::SizeNotPerfectSquare { size: fields.len() })?;

        let grid = fields.chunks(size).map(|chunk| chunk.to_vec()).collect();
        Self::new(grid)
    }

    /// Parses the plain digit-string form (`"103200..."`), only valid for
    /// N ≤ 9 since each cell is a single digit.
    pub fn from_digits(text: &str) -> Result<Self, SudokuError> {
        if !PLAIN_DIGITS.is_match(text) {
            return Err(SudokuError::MalformedText {
                detail: format!("{text:?} is not a plain digit string"),
            });
        }

        let size = integer_sqrt(text.len())
            .ok_or(SudokuError::SizeNotPerfectSquare { size: text.len() })?;

        if size > 9 {
            return Err(SudokuError::MalformedText {
                detail: "the plain digit form only supports grids up to 9x9".into(),
            });
        }

        let fields: Vec<u32> =
            text.chars().map(|ch| ch.to_digit(10).expect("regex already validated digits")).collect();

        let grid = fields.chunks(size).map(|chunk| chunk.to_vec()).collect();
        Self::new(grid)
    }

    /// Emits the underscore-delimited form, with the terminal underscore
    /// trimmed.
    pub fn to_text(&self) -> String {
        self.grid
            .iter()
            .flat_map(|row| row.iter())
            .map(|v| v.to_string())
            .collect::<Vec<_>>()
            .join("_")
    }

    /// The underlying grid.
    pub fn grid(&self) -> &[Vec<u32>] {
        &self.grid
    }

    /// The grid's side length N.
    pub fn size(&self) -> usize {
        self.size
    }

    /// `true` if every filled row, column and box has no repeated value.
    /// Empty cells (`0`) are ignored.
    pub fn is_valid(&self) -> bool {
        (0..self.size).all(|r| self.unique_values(self.grid[r].iter().copied()))
            && (0..self.size)
                .all(|c| self.unique_values(self.grid.iter().map(|row| row[c])))
            && (0..self.box_side).all(|br| {
                (0..self.box_side).all(|bc| self.unique_values(self.box_values(br, bc)))
            })
    }

    /// `true` if the grid has no empty cells and is valid.
    pub fn is_solved(&self) -> bool {
        self.grid.iter().flatten().all(|&v| v != 0) && self.is_valid()
    }

    fn unique_values(&self, values: impl Iterator<Item = u32>) -> bool {
        let mut seen = vec![false; self.size + 1];
        for v in values.filter(|&v| v != 0) {
            if seen[v as usize] {
                return false;
            }
            seen[v as usize] = true;
        }
        true
    }

    fn box_values(&self, box_row: usize, box_col: usize) -> impl Iterator<Item = u32> + '_ {
        let row0 = box_row * self.box_side;
        let col0 = box_col * self.box_side;
        (0..self.box_side)
            .flat_map(move |dr| (0..self.box_side).map(move |dc| (row0 + dr, col0 + dc)))
            .map(|(r, c)| self.grid[r][c])
    }

    fn box_of(&self, row: usize, col: usize) -> usize {
        (row / self.box_side) * self.box_side + col / self.box_side
    }
}

fn integer_sqrt(n: usize) -> Option<usize> {
    let root = (n as f64).sqrt().round() as usize;
    (root * root == n).then_some(root)
}

/// Builds the `4·N²`-column exact-cover matrix encoding `sudoku`.
///
/// Column blocks, each `N²` wide: cell-has-a-value, row-has-value,
/// column-has-value, box-has-value. A row named `"r_c_v"` is emitted for
/// every `(r, c, v)` triple where cell `(r, c)` is empty or already holds
/// `v + 1`.
pub fn to_matrix(sudoku: &Sudoku) -> Matrix {
    let n = sudoku.size;
    let mut matrix = Matrix::new(4 * n * n);

    for r in 0..n {
        for c in 0..n {
            let existing = sudoku.grid[r][c];
            let box_id = sudoku.box_of(r, c);

            for v in 0..n {
                if existing != 0 && existing as usize != v + 1 {
                    continue;
                }

                let columns = [
                    r * n + c,
                    n * n + r * n + v,
                    2 * n * n + c * n + v,
                    3 * n * n + box_id * n + v,
                ];

                matrix
                    .add_row(format!("{r}_{c}_{v}"), &columns)
                    .expect("every (r, c, v) row covers exactly four distinct columns");
            }
        }
    }

    matrix
}

/// Applies a solver [`Solution`]'s chosen rows back onto `sudoku`'s grid.
pub fn decode(sudoku: &Sudoku, solution: &Solution) -> Sudoku {
    let mut grid = sudoku.grid.clone();

    for row_name in &solution.rows {
        let mut parts = row_name.splitn(3, '_');
        let r: usize = parts.next().unwrap().parse().unwrap();
        let c: usize = parts.next().unwrap().parse().unwrap();
        let v: usize = parts.next().unwrap().parse().unwrap();
        grid[r][c] = (v + 1) as u32;
    }

    Sudoku { grid, size: sudoku.size, box_side: sudoku.box_side }
}

/// Reduces `sudoku` to an exact-cover matrix, solves it, and decodes the
/// result. Returns `None` if the grid has no solution.
pub fn solve(sudoku: &Sudoku) -> Option<Sudoku> {
    let mut matrix = to_matrix(sudoku);
    let solution = solver::solve(&mut matrix);

    if solution.is_empty() {
        return None;
    }

    Some(decode(sudoku, &solution))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_grid(n: usize) -> Vec<Vec<u32>> {
        vec![vec![0; n]; n]
    }

    #[test]
    fn rejects_non_square_grids() {
        let grid = vec![vec![0, 0], vec![0, 0, 0]];
        assert!(matches!(Sudoku::new(grid), Err(SudokuError::NotSquare { .. })));
    }

    #[test]
    fn rejects_sizes_that_are_not_perfect_squares() {
        let grid = empty_grid(5);
        assert!(matches!(Sudoku::new(grid), Err(SudokuError::SizeNotPerfectSquare { .. })));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let mut grid = empty_grid(4);
        grid[0][0] = 9;
        assert!(matches!(Sudoku::new(grid), Err(SudokuError::ValueOutOfRange { .. })));
    }

    #[test]
    fn round_trips_through_text() {
        let grid = vec![vec![1, 0, 3, 4], vec![0, 2, 0, 0], vec![0, 0, 0, 2], vec![4, 0, 0, 1]];
        let sudoku = Sudoku::new(grid).unwrap();
        let round_tripped = Sudoku::from_text(&sudoku.to_text()).unwrap();
        assert_eq!(sudoku, round_tripped);
    }

    #[test]
    fn plain_digit_form_rejects_grids_above_9x9() {
        let text = "0".repeat(100); // 10x10
        assert!(Sudoku::from_digits(&text).is_err());
    }

    #[test]
    fn malformed_text_is_rejected_not_panicked() {
        assert!(Sudoku::from_text("1_2_x_4").is_err());
        assert!(Sudoku::from_digits("12x4").is_err());
    }
}
