use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;

use crate::cells::{Cell, Coordinate};
use crate::grid_traits::{GridDimensions, GridIterators};
use crate::units::{ColumnIndex, ColumnLength, ColumnsCount, RowIndex, RowLength, RowsCount};

/// Row major walk over every cell. The coordinate conversion consults the
/// dimensions, so one iterator type serves rectangular and polar grids alike.
#[derive(Clone)]
pub struct GridCellIter<CellT: Cell> {
    dimensions: Rc<dyn GridDimensions>,
    current_cell_number: usize,
    cells_count: usize,
    cell_type: PhantomData<CellT>,
}

impl<CellT: Cell> GridCellIter<CellT> {
    fn new(dimensions: &Rc<dyn GridDimensions>) -> GridCellIter<CellT> {
        GridCellIter {
            dimensions: dimensions.clone(),
            current_cell_number: 0,
            cells_count: dimensions.size().0,
            cell_type: PhantomData,
        }
    }
}

impl<CellT: Cell> fmt::Debug for GridCellIter<CellT> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "GridCellIter :: current_cell_number: {:?}, cells_count: {:?}",
            self.current_cell_number, self.cells_count
        )
    }
}

impl<CellT: Cell> ExactSizeIterator for GridCellIter<CellT> {} // default impl using size_hint()
impl<CellT: Cell> Iterator for GridCellIter<CellT> {
    type Item = CellT::Coord;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord =
                Self::Item::from_row_major_index(self.current_cell_number, self.dimensions.as_ref());
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        (lower_bound, Some(lower_bound))
    }
}

#[derive(Debug, Copy, Clone)]
pub struct RectGridIterators;

impl<CellT: Cell> GridIterators<CellT> for RectGridIterators {
    type CellIter = GridCellIter<CellT>;
    type BatchIter = RectBatchIter<CellT>;

    fn iter(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::CellIter {
        GridCellIter::new(dimensions)
    }

    fn iter_row(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter {
        RectBatchIter::new(BatchIterType::Row, dimensions)
    }

    fn iter_column(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter {
        RectBatchIter::new(BatchIterType::Column, dimensions)
    }
}

#[derive(Debug, Copy, Clone)]
enum BatchIterType {
    Row,
    Column,
}

#[derive(Debug, Copy, Clone)]
pub struct RectBatchIter<CellT> {
    iter_type: BatchIterType,
    current_index: usize,
    row_length: RowLength,
    rows_size: RowsCount,
    col_length: ColumnLength,
    cols_size: ColumnsCount,
    cell_type: PhantomData<CellT>,
}

impl<CellT> RectBatchIter<CellT> {
    fn new(iter_type: BatchIterType, dimensions: &Rc<dyn GridDimensions>) -> RectBatchIter<CellT> {
        RectBatchIter {
            iter_type,
            current_index: 0,
            row_length: dimensions.row_length(None).expect("rectangular grids have one row length"),
            rows_size: dimensions.rows(),
            col_length: dimensions.column_length(None),
            cols_size: dimensions.columns(),
            cell_type: PhantomData,
        }
    }
}

impl<CellT: Cell> Iterator for RectBatchIter<CellT> {
    type Item = Vec<CellT::Coord>;
    fn next(&mut self) -> Option<Self::Item> {
        if let BatchIterType::Row = self.iter_type {
            let RowsCount(count) = self.rows_size;
            if self.current_index < count {
                let RowLength(length) = self.row_length;
                let coords = (0..length)
                    .map(|i| {
                        CellT::Coord::from_row_column_indices(
                            ColumnIndex(i),
                            RowIndex(self.current_index),
                        )
                    })
                    .collect();
                self.current_index += 1;
                Some(coords)
            } else {
                None
            }
        } else {
            let ColumnsCount(count) = self.cols_size;
            if self.current_index < count {
                let ColumnLength(length) = self.col_length;
                let coords = (0..length)
                    .map(|i| {
                        CellT::Coord::from_row_column_indices(
                            ColumnIndex(self.current_index),
                            RowIndex(i),
                        )
                    })
                    .collect();
                self.current_index += 1;
                Some(coords)
            } else {
                None
            }
        }
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PolarGridIterators;

impl<CellT: Cell> GridIterators<CellT> for PolarGridIterators {
    type CellIter = GridCellIter<CellT>;
    type BatchIter = RingBatchIter<CellT>;

    fn iter(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::CellIter {
        GridCellIter::new(dimensions)
    }

    fn iter_row(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter {
        RingBatchIter {
            dimensions: dimensions.clone(),
            current_ring: 0,
            rings: dimensions.rows().0,
            cell_type: PhantomData,
        }
    }

    fn iter_column(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter {
        // There are no full height columns on a polar grid. An empty iterator
        // keeps the trait honest instead of inventing spokes.
        RingBatchIter {
            dimensions: dimensions.clone(),
            current_ring: dimensions.rows().0,
            rings: dimensions.rows().0,
            cell_type: PhantomData,
        }
    }
}

/// Yields each concentric ring of cells, innermost first.
#[derive(Clone)]
pub struct RingBatchIter<CellT> {
    dimensions: Rc<dyn GridDimensions>,
    current_ring: usize,
    rings: usize,
    cell_type: PhantomData<CellT>,
}

impl<CellT: Cell> Iterator for RingBatchIter<CellT> {
    type Item = Vec<CellT::Coord>;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_ring < self.rings {
            let RowLength(length) = self
                .dimensions
                .row_length(Some(RowIndex(self.current_ring)))
                .expect("ring index within the grid's ring count");
            let coords = (0..length)
                .map(|i| {
                    CellT::Coord::from_row_column_indices(
                        ColumnIndex(i),
                        RowIndex(self.current_ring),
                    )
                })
                .collect();
            self.current_ring += 1;
            Some(coords)
        } else {
            None
        }
    }
}
