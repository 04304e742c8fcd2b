use std::error::Error;
use std::fmt;

/// Errors the matrix itself can reject without having mutated anything.
///
/// Everything else that can go wrong with a matrix (an out-of-range
/// column index, an unbalanced cover/uncover) is a contract violation and
/// aborts via `assert!`/`panic!` instead — see the crate's error design
/// notes for why the split falls there.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    /// `add_row` was called with a column set that deduplicates to empty.
    EmptyRow { row_name: String },
}

impl fmt::Display for MatrixError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MatrixError::EmptyRow { row_name } => {
                write!(f, "row {row_name:?} has no columns to cover")
            }
        }
    }
}

impl Error for MatrixError {}

/// Errors raised while parsing or validating a Sudoku grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SudokuError {
    /// The grid isn't square: some row's length differs from the grid's.
    NotSquare { expected: usize, found: usize },
    /// The grid's side length isn't a perfect square, so it has no box size.
    SizeNotPerfectSquare { size: usize },
    /// A cell holds a value outside `0..=size`.
    ValueOutOfRange { row: usize, col: usize, value: u32, size: usize },
    /// A text encoding didn't match either accepted form.
    MalformedText { detail: String },
}

impl fmt::Display for SudokuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SudokuError::NotSquare { expected, found } => {
                write!(f, "grid row has length {found}, expected {expected}")
            }
            SudokuError::SizeNotPerfectSquare { size } => {
                write!(f, "grid side {size} is not a perfect square")
            }
            SudokuError::ValueOutOfRange { row, col, value, size } => write!(
                f,
                "cell ({row}, {col}) holds {value}, outside 0..={size}"
            ),
            SudokuError::MalformedText { detail } => write!(f, "malformed grid text: {detail}"),
        }
    }
}

impl Error for SudokuError {}
