//! Randomized exercise of the matrix's link invariants across balanced
//! cover/uncover sequences — the property `@8` of the base spec asks for.
//!
//! This doesn't reach into `Matrix`'s private arena (it has none exposed);
//! instead it checks the same invariants indirectly, the only way the
//! public API lets an outside caller observe them: row partition shape
//! before and after a cover/uncover round trip, and via repeated solves
//! that each leave the matrix as they found it.

mod common;

use dlx_sudoku::Matrix;
use rand::seq::SliceRandom;
use rand::Rng;

fn random_matrix(rng: &mut impl Rng, num_columns: usize, num_rows: usize) -> Matrix {
    let mut matrix = Matrix::new(num_columns);
    let mut name = 0usize;

    while matrix.num_rows() < num_rows {
        let width = rng.gen_range(1..=num_columns.min(4));
        let mut columns: Vec<usize> = (0..num_columns).collect();
        columns.shuffle(rng);
        columns.truncate(width);

        if matrix.add_row(name.to_string(), &columns).is_ok() {
            name += 1;
        }
    }

    matrix
}

#[test]
fn cover_uncover_round_trips_are_observationally_identical_under_random_load() {
    common::init_logger();
    let mut rng = rand::thread_rng();

    for _ in 0..20 {
        let num_columns = rng.gen_range(2..12);
        let mut matrix = random_matrix(&mut rng, num_columns, num_columns * 2);

        let before = format!("{matrix:?}");

        // Cover and uncover every column, in a random nested order, and
        // confirm the matrix always comes back to the same state.
        let mut order: Vec<usize> = (0..num_columns).collect();
        order.shuffle(&mut rng);

        let mut covered = Vec::new();
        for idx in order {
            matrix.cover(matrix.column(idx));
            covered.push(idx);
        }
        for idx in covered.into_iter().rev() {
            matrix.uncover(matrix.column(idx));
        }

        assert_eq!(format!("{matrix:?}"), before);
    }
}

#[test]
fn row_insertion_is_rejected_only_for_empty_rows() {
    common::init_logger();
    let mut matrix = Matrix::new(4);
    assert!(matrix.add_row("ok", &[0, 2]).is_ok());
    assert!(matrix.add_row("empty", &[]).is_err());
    assert_eq!(matrix.num_rows(), 1);
}
