//! Knuth's Algorithm X, driven over a [`crate::dlx::Matrix`] via the
//! dancing-links cover/uncover primitives.
//!
//! The search always returns the *first* solution it finds (this crate
//! never enumerates every exact cover) and short-circuits the recursion
//! the moment one is found, unwinding back up while still performing the
//! matching uncover at every frame so the matrix is left exactly as it
//! was handed in.

use std::collections::HashMap;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::dlx::{Direction, Matrix};

/// The result of a solve: the chosen row names, and for each the full set
/// of column names it covers. Both are empty iff the instance has no
/// exact cover.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    pub rows: Vec<String>,
    pub details: HashMap<String, Vec<String>>,
}

impl Solution {
    /// `true` iff the instance was unsolvable.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Runs Algorithm X to completion and returns the first solution found,
/// or an empty [`Solution`] if the matrix has no exact cover.
pub fn solve(matrix: &mut Matrix) -> Solution {
    let mut stack = Vec::new();
    let mut solution = Solution::default();

    let found = search(matrix, &mut stack, &mut solution);
    debug!("search finished, solution found: {found}");

    solution
}

fn search(matrix: &mut Matrix, stack: &mut Vec<usize>, out: &mut Solution) -> bool {
    if matrix.is_solved() {
        *out = extract(matrix, stack);
        return true;
    }

    let column = matrix.min_size_column();
    matrix.cover(column);

    let mut solved = false;

    for r in matrix.walk(column.index(), Direction::D).collect::<Vec<_>>() {
        stack.push(r);

        for j in matrix.walk(r, Direction::R).collect::<Vec<_>>() {
            matrix.cover(matrix.column_of(j));
        }

        if search(matrix, stack, out) {
            solved = true;
        }

        for j in matrix.walk(r, Direction::L).collect::<Vec<_>>() {
            matrix.uncover(matrix.column_of(j));
        }

        stack.pop();

        if solved {
            break;
        }
    }

    matrix.uncover(column);

    solved
}

fn extract(matrix: &Matrix, stack: &[usize]) -> Solution {
    let mut rows = Vec::with_capacity(stack.len());
    let mut details = HashMap::with_capacity(stack.len());

    for &cell in stack {
        let row_name = matrix.row_name(matrix.row_of(cell)).to_string();

        let mut columns = vec![matrix.column_name(matrix.column_of(cell)).to_string()];
        columns.extend(
            matrix
                .walk(cell, Direction::R)
                .map(|j| matrix.column_name(matrix.column_of(j)).to_string()),
        );

        rows.push(row_name.clone());
        details.insert(row_name, columns);
    }

    Solution { rows, details }
}
