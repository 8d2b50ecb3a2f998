use std::cmp;

use crate::grid_traits::GridDimensions;
use crate::units::{
    ColumnIndex, ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowIndex, RowLength, RowsCount,
};

#[derive(Debug, Copy, Clone)]
pub struct RectGridDimensions {
    row_width: RowLength,
    column_height: ColumnLength,
}

impl RectGridDimensions {
    pub fn new(row_width: RowLength, column_height: ColumnLength) -> RectGridDimensions {
        RectGridDimensions {
            row_width,
            column_height,
        }
    }
}

impl GridDimensions for RectGridDimensions {
    #[inline(always)]
    fn size(&self) -> NodesCount {
        NodesCount(self.row_width.0 * self.column_height.0)
    }

    #[inline(always)]
    fn rows(&self) -> RowsCount {
        RowsCount(self.column_height.0)
    }

    #[inline(always)]
    fn row_length(&self, _: Option<RowIndex>) -> Option<RowLength> {
        Some(self.row_width)
    }

    #[inline(always)]
    fn columns(&self) -> ColumnsCount {
        ColumnsCount(self.row_width.0)
    }

    #[inline(always)]
    fn column_length(&self, _: Option<ColumnIndex>) -> ColumnLength {
        self.column_height
    }

    fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        let edges_count_hint =
            (4 * cells_count.0).saturating_sub(4 * cmp::max(self.row_width.0, self.column_height.0));
        (cells_count, EdgesCount(edges_count_hint))
    }
}

/// Concentric rings of cells around a disc shaped hole of `inner_radius` cell
/// widths. A ring's cell count doubles whenever its radius passes the doubling
/// threshold, which starts at the inner radius and doubles at each split, so
/// cells keep a roughly square aspect ratio as the circumference grows.
#[derive(Debug, Clone)]
pub struct PolarGridDimensions {
    ring_cell_counts: Vec<usize>,
    inner_radius: usize,
    rows: RowsCount,
    size: NodesCount,
}

impl PolarGridDimensions {
    pub fn new(inner_radius: usize, rings: RowsCount, first_ring_columns: usize) -> PolarGridDimensions {
        let mut ring_cell_counts = Vec::with_capacity(rings.0);
        let mut columns = first_ring_columns;
        let mut double_at_radius = if inner_radius == 0 { 2 } else { inner_radius };

        for ring in 0..rings.0 {
            let radius = inner_radius + ring;
            if radius > double_at_radius {
                columns *= 2;
                double_at_radius *= 2;
            }
            ring_cell_counts.push(columns);
        }

        let size = ring_cell_counts.iter().sum();
        PolarGridDimensions {
            ring_cell_counts,
            inner_radius,
            rows: rings,
            size: NodesCount(size),
        }
    }

    #[inline]
    pub fn inner_radius(&self) -> usize {
        self.inner_radius
    }

    #[inline]
    pub fn ring_cell_counts(&self) -> &[usize] {
        &self.ring_cell_counts
    }
}

impl GridDimensions for PolarGridDimensions {
    #[inline(always)]
    fn size(&self) -> NodesCount {
        self.size
    }

    #[inline(always)]
    fn rows(&self) -> RowsCount {
        self.rows
    }

    fn row_length(&self, row_index: Option<RowIndex>) -> Option<RowLength> {
        match row_index {
            Some(row) => self
                .ring_cell_counts
                .get(row.0)
                .map(|&ring_len| RowLength(ring_len)),
            // Rings vary in length so there is no single answer.
            None => None,
        }
    }

    #[inline(always)]
    fn columns(&self) -> ColumnsCount {
        // There is no 'column' on a polar grid going all the way through from the
        // outer ring to the centre.
        ColumnsCount(0)
    }

    #[inline(always)]
    fn column_length(&self, _: Option<ColumnIndex>) -> ColumnLength {
        ColumnLength(self.rows.0)
    }

    fn graph_size(&self) -> (NodesCount, EdgesCount) {
        let cells_count = self.size();
        (cells_count, EdgesCount(cells_count.0 * 3))
    }
}
