//! Sparse 0/1 matrix represented as intersecting circular doubly linked
//! lists ("dancing links"), as described by Knuth's Algorithm X.
//!
//! Cells live in a single arena (`Vec<Node>`); links are indices into that
//! arena rather than pointers, so cover/uncover never allocates and the
//! whole matrix is dropped in one shot. Node 0 is the root sentinel,
//! nodes `1..=num_columns` are the column headers, and everything after
//! that is a live row cell.
//!
//! This is largely the same index-arena technique used by dlx-style
//! solvers elsewhere in this space, generalized to an arbitrary column
//! count and named row set rather than one hardcoded to a 9x9 grid.

use std::collections::HashMap;

use log::{error, trace};

use crate::error::MatrixError;

/// One of the four ring directions a cell can be walked in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Direction {
    L,
    R,
    U,
    D,
}

impl Direction {
    fn opposite(self) -> Self {
        match self {
            Direction::L => Direction::R,
            Direction::R => Direction::L,
            Direction::U => Direction::D,
            Direction::D => Direction::U,
        }
    }
}

#[derive(Debug, Clone)]
enum Kind {
    /// The root sentinel; its R ring holds exactly the uncovered headers.
    Root,
    /// A column header: a live-cell counter and a display name.
    Header { size: usize, name: String },
    /// A live matrix cell, tagged with the row and column it belongs to.
    Body { row: usize, column: usize },
}

#[derive(Debug, Clone)]
struct Node {
    links: [usize; 4],
    kind: Kind,
}

impl Node {
    fn link(&self, dir: Direction) -> usize {
        self.links[dir as usize]
    }

    fn set_link(&mut self, dir: Direction, idx: usize) {
        self.links[dir as usize] = idx;
    }
}

/// Opaque reference to a column header, obtained from [`Matrix::column`].
///
/// This is the one canonical column-reference type `cover`/`uncover`
/// accept — callers never pass a bare cell index or column index past the
/// public boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnRef(usize);

impl ColumnRef {
    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Iterator over a ring, starting just past `start` and stopping just
/// before cycling back to it. The starting cell is never yielded.
pub(crate) struct Walk<'a> {
    matrix: &'a Matrix,
    start: usize,
    current: usize,
    dir: Direction,
}

impl<'a> Iterator for Walk<'a> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        let next = self.matrix.nodes[self.current].link(self.dir);
        if next == self.start {
            return None;
        }
        self.current = next;
        Some(next)
    }
}

/// A sparse exact-cover matrix, arena-backed and index-linked.
#[derive(Debug, Clone)]
pub struct Matrix {
    nodes: Vec<Node>,
    num_columns: usize,
    row_names: Vec<String>,
    row_name_to_number: HashMap<String, usize>,
}

impl Matrix {
    const ROOT: usize = 0;

    /// Builds a matrix with `num_columns` columns, labeled `"0"..."num_columns - 1"`.
    pub fn new(num_columns: usize) -> Self {
        let labels: Vec<String> = (0..num_columns).map(|i| i.to_string()).collect();
        Self::with_labels(&labels)
    }

    /// Builds a matrix with one column per label, in the given order.
    pub fn with_labels<S: AsRef<str>>(labels: &[S]) -> Self {
        let num_columns = labels.len();
        let mut nodes = Vec::with_capacity(num_columns + 1);
        nodes.push(Node { links: [0; 4], kind: Kind::Root });

        for label in labels.iter() {
            let header_idx = nodes.len();
            nodes.push(Node {
                links: [0, 0, header_idx, header_idx],
                kind: Kind::Header { size: 0, name: label.as_ref().to_string() },
            });
        }

        let last = nodes.len() - 1;
        for i in 0..=num_columns {
            let r = if i == num_columns { Self::ROOT } else { i + 1 };
            let l = if i == 0 { last } else { i - 1 };
            nodes[i].set_link(Direction::R, r);
            nodes[i].set_link(Direction::L, l);
        }

        Self { nodes, num_columns, row_names: Vec::new(), row_name_to_number: HashMap::new() }
    }

    /// Number of columns the matrix was constructed with.
    pub fn num_columns(&self) -> usize {
        self.num_columns
    }

    /// Number of rows inserted so far.
    pub fn num_rows(&self) -> usize {
        self.row_names.len()
    }

    /// Appends a row covering `column_indices` (deduplicated and sorted
    /// ascending before insertion).
    ///
    /// # Panics
    ///
    /// Panics if a column index is out of range — that's a matrix-contract
    /// violation (programmer error), not data the matrix can reject on its
    /// own.
    pub fn add_row(
        &mut self,
        row_name: impl Into<String>,
        column_indices: &[usize],
    ) -> Result<(), MatrixError> {
        let row_name = row_name.into();

        let mut cols: Vec<usize> = column_indices.to_vec();
        cols.sort_unstable();
        cols.dedup();

        if cols.is_empty() {
            return Err(MatrixError::EmptyRow { row_name });
        }

        for &c in &cols {
            assert!(
                c < self.num_columns,
                "column index {c} out of bounds (0..{})",
                self.num_columns
            );
        }

        let row_number = self.row_names.len();
        let start = self.nodes.len();

        for &col in &cols {
            let idx = self.nodes.len();
            self.nodes.push(Node { links: [0; 4], kind: Kind::Body { row: row_number, column: col } });
            self.splice_into_column(col, idx);
        }

        let end = self.nodes.len();
        for (offset, idx) in (start..end).enumerate() {
            let l = if offset == 0 { end - 1 } else { idx - 1 };
            let r = if idx + 1 == end { start } else { idx + 1 };
            self.nodes[idx].set_link(Direction::L, l);
            self.nodes[idx].set_link(Direction::R, r);
        }

        trace!("inserted row {row_name:?} (#{row_number}) over columns {cols:?}");

        self.row_names.push(row_name.clone());
        self.row_name_to_number.insert(row_name, row_number);

        Ok(())
    }

    fn splice_into_column(&mut self, column: usize, cell: usize) {
        let header = column + 1;
        let tail = self.nodes[header].link(Direction::U);

        self.nodes[cell].set_link(Direction::U, tail);
        self.nodes[cell].set_link(Direction::D, header);
        self.nodes[tail].set_link(Direction::D, cell);
        self.nodes[header].set_link(Direction::U, cell);

        match &mut self.nodes[header].kind {
            Kind::Header { size, .. } => *size += 1,
            _ => {
                error!("splice_into_column: node {header} does not map to a header");
                unreachable!("column index does not map to a header")
            }
        }
    }

    /// Normalizes a column index into the opaque reference type `cover`/
    /// `uncover` accept.
    ///
    /// # Panics
    ///
    /// Panics if `index` is out of range (matrix-contract violation).
    pub fn column(&self, index: usize) -> ColumnRef {
        assert!(
            index < self.num_columns,
            "column index {index} out of bounds (0..{})",
            self.num_columns
        );
        ColumnRef(index + 1)
    }

    /// The display name a column was constructed with.
    pub fn column_name(&self, column: ColumnRef) -> &str {
        match &self.nodes[column.0].kind {
            Kind::Header { name, .. } => name,
            _ => {
                error!("column_name called on node {} which is not a header", column.0);
                unreachable!("ColumnRef never points outside the header range")
            }
        }
    }

    /// The row_number a row was inserted under `row_name`, if any.
    pub fn row_number(&self, row_name: &str) -> Option<usize> {
        self.row_name_to_number.get(row_name).copied()
    }

    /// `true` once every column has been covered (the matrix is empty).
    pub fn is_solved(&self) -> bool {
        self.nodes[Self::ROOT].link(Direction::R) == Self::ROOT
    }

    /// Removes `column` from the header ring and, for every row passing
    /// through it, unlinks that row's other cells from their own column
    /// rings. Perfectly undone by a matching [`Matrix::uncover`].
    pub fn cover(&mut self, column: ColumnRef) {
        let header = column.0;
        self.unlink(header, Direction::R);

        let mut i = self.nodes[header].link(Direction::D);
        while i != header {
            let mut j = self.nodes[i].link(Direction::R);
            while j != i {
                self.unlink(j, Direction::D);
                self.adjust_size(j, -1);
                j = self.nodes[j].link(Direction::R);
            }
            i = self.nodes[i].link(Direction::D);
        }
    }

    /// Exact mirror of [`Matrix::cover`]: relinks in reverse traversal
    /// order (Up/Left instead of Down/Right) so the pre-cover topology is
    /// restored bit-for-bit.
    pub fn uncover(&mut self, column: ColumnRef) {
        let header = column.0;

        let mut i = self.nodes[header].link(Direction::U);
        while i != header {
            let mut j = self.nodes[i].link(Direction::L);
            while j != i {
                self.adjust_size(j, 1);
                self.relink(j, Direction::D);
                j = self.nodes[j].link(Direction::L);
            }
            i = self.nodes[i].link(Direction::U);
        }

        self.relink(header, Direction::R);
    }

    fn unlink(&mut self, idx: usize, dir: Direction) {
        let opp = dir.opposite();
        let next = self.nodes[idx].link(dir);
        let prev = self.nodes[idx].link(opp);
        self.nodes[next].set_link(opp, prev);
        self.nodes[prev].set_link(dir, next);
    }

    fn relink(&mut self, idx: usize, dir: Direction) {
        let opp = dir.opposite();
        let next = self.nodes[idx].link(dir);
        let prev = self.nodes[idx].link(opp);
        self.nodes[next].set_link(opp, idx);
        self.nodes[prev].set_link(dir, idx);
    }

    fn adjust_size(&mut self, cell: usize, delta: isize) {
        let header = self.header_of(cell);
        match &mut self.nodes[header].kind {
            Kind::Header { size, .. } => *size = (*size as isize + delta) as usize,
            _ => {
                error!("adjust_size: header_of returned non-header node {header}");
                unreachable!("header_of always returns a header index")
            }
        }
    }

    fn header_of(&self, cell: usize) -> usize {
        match &self.nodes[cell].kind {
            Kind::Body { column, .. } => column + 1,
            Kind::Header { .. } => cell,
            Kind::Root => {
                error!("header_of called on the root sentinel");
                unreachable!("the root has no column")
            }
        }
    }

    // -- internals the solver needs but that stay out of the public API --

    pub(crate) fn walk(&self, start: usize, dir: Direction) -> Walk<'_> {
        Walk { matrix: self, start, current: start, dir }
    }

    pub(crate) fn column_of(&self, cell: usize) -> ColumnRef {
        ColumnRef(self.header_of(cell))
    }

    pub(crate) fn row_of(&self, cell: usize) -> usize {
        match &self.nodes[cell].kind {
            Kind::Body { row, .. } => *row,
            _ => {
                error!("row_of called on node {cell} which is not a body cell");
                unreachable!("expected a body cell")
            }
        }
    }

    pub(crate) fn row_name(&self, row_number: usize) -> &str {
        &self.row_names[row_number]
    }

    fn header_size(&self, header: usize) -> usize {
        match &self.nodes[header].kind {
            Kind::Header { size, .. } => *size,
            _ => {
                error!("header_size called on node {header} which is not a header");
                unreachable!("expected a header")
            }
        }
    }

    /// The uncovered column with the fewest live rows, leftmost on ties.
    ///
    /// # Panics
    ///
    /// Panics if the matrix is already fully covered — callers must check
    /// [`Matrix::is_solved`] first.
    pub(crate) fn min_size_column(&self) -> ColumnRef {
        let mut best: Option<usize> = None;
        let mut best_size = usize::MAX;

        for idx in self.walk(Self::ROOT, Direction::R) {
            let size = self.header_size(idx);
            if size < best_size {
                best_size = size;
                best = Some(idx);
                if best_size == 0 {
                    break;
                }
            }
        }

        ColumnRef(best.expect("min_size_column called on an already-solved matrix"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invariants_hold(m: &Matrix) {
        for idx in 0..m.nodes.len() {
            let node = &m.nodes[idx];
            assert_eq!(m.nodes[node.link(Direction::L)].link(Direction::R), idx);
            assert_eq!(m.nodes[node.link(Direction::R)].link(Direction::L), idx);
            assert_eq!(m.nodes[node.link(Direction::U)].link(Direction::D), idx);
            assert_eq!(m.nodes[node.link(Direction::D)].link(Direction::U), idx);
        }

        for header in 1..=m.num_columns {
            let reported = m.header_size(header);
            let actual = m.walk(header, Direction::D).count();
            assert_eq!(reported, actual, "header {header} size out of sync");
        }
    }

    fn sample() -> Matrix {
        // Knuth's own toy example from "Dancing Links".
        let mut m = Matrix::new(7);
        m.add_row("A", &[2, 4, 5]).unwrap();
        m.add_row("B", &[0, 3, 6]).unwrap();
        m.add_row("C", &[1, 2, 5]).unwrap();
        m.add_row("D", &[0, 3]).unwrap();
        m.add_row("E", &[1, 6]).unwrap();
        m.add_row("F", &[3, 4, 6]).unwrap();
        m
    }

    #[test]
    fn construction_satisfies_link_invariants() {
        invariants_hold(&sample());
    }

    #[test]
    fn cover_then_uncover_is_observationally_identical() {
        let mut m = sample();
        let before = format!("{m:?}");

        let col = m.column(2);
        m.cover(col);
        invariants_hold(&m);
        assert_ne!(format!("{m:?}"), before);

        m.uncover(col);
        invariants_hold(&m);
        assert_eq!(format!("{m:?}"), before);
    }

    #[test]
    fn row_ring_visits_exactly_its_columns_in_order() {
        let m = sample();
        // Row "A" covers columns [2, 4, 5]; its first cell is the one
        // spliced into column 2 (the first element in sorted order).
        let col2 = m.column(2);
        let first_cell = m.walk(col2.index(), Direction::D).next().unwrap();

        let mut seen = vec![m.column_of(first_cell).index()];
        seen.extend(m.walk(first_cell, Direction::R).map(|c| m.column_of(c).index()));

        assert_eq!(seen, vec![3, 5, 6]); // header indices for columns 2, 4, 5
    }

    #[test]
    fn empty_row_is_rejected() {
        let mut m = Matrix::new(3);
        let err = m.add_row("bad", &[]).unwrap_err();
        assert_eq!(err, MatrixError::EmptyRow { row_name: "bad".into() });
    }

    #[test]
    fn row_number_looks_up_a_row_by_its_name() {
        let m = sample();
        assert_eq!(m.row_number("A"), Some(0));
        assert_eq!(m.row_number("F"), Some(5));
        assert_eq!(m.row_number("nope"), None);
    }

    #[test]
    fn duplicate_column_indices_collapse_to_one_cell() {
        let mut m = Matrix::new(3);
        m.add_row("dup", &[1, 1, 1]).unwrap();
        let col = m.column(1);
        assert_eq!(m.walk(col.index(), Direction::D).count(), 1);
    }

    #[test]
    #[should_panic]
    fn out_of_range_column_is_a_contract_violation() {
        let mut m = Matrix::new(3);
        let _ = m.add_row("oops", &[5]);
    }

    #[test]
    fn fully_covered_matrix_is_solved() {
        let mut m = Matrix::new(1);
        m.add_row("only", &[0]).unwrap();
        assert!(!m.is_solved());
        let col = m.column(0);
        m.cover(col);
        assert!(m.is_solved());
    }
}
