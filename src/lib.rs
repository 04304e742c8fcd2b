//! Dancing Links (DLX) exact-cover solver, with a Sudoku reduction on top.
//!
//! [`dlx`] owns the sparse cell arena and the four circular doubly linked
//! lists that make column cover/uncover O(1)-ish. [`solver`] drives
//! Knuth's Algorithm X over a [`dlx::Matrix`]. [`sudoku`] reduces an N×N
//! Sudoku grid to an exact-cover instance and decodes a solution back
//! into a filled grid.

pub mod dlx;
pub mod error;
pub mod solver;
pub mod sudoku;

pub use dlx::{ColumnRef, Matrix};
pub use error::{MatrixError, SudokuError};
pub use solver::Solution;
pub use sudoku::Sudoku;

// Necessary to export the modules to be integration tested in 'tests'
