use std::rc::Rc;
use std::{u16, u32, u8};

use crate::cells::{PolarCell, SquareCell};
use crate::grid::Grid;
use crate::grid_coordinates::{PolarGridCoordinates, RectGridCoordinates};
use crate::grid_dimensions::{PolarGridDimensions, RectGridDimensions};
use crate::grid_iterators::{PolarGridIterators, RectGridIterators};
use crate::grid_traits::GridDimensions;
use crate::units::{ColumnLength, RowLength, RowsCount};

pub type SmallRectangularGrid = Grid<u8, SquareCell, RectGridIterators>;
pub type MediumRectangularGrid = Grid<u16, SquareCell, RectGridIterators>;
pub type LargeRectangularGrid = Grid<u32, SquareCell, RectGridIterators>;
pub type PolarGrid = Grid<u32, PolarCell, PolarGridIterators>;

pub fn small_rect_grid(row_width: RowLength, column_height: ColumnLength) -> Option<SmallRectangularGrid> {
    if row_width.0 * column_height.0 <= u8::MAX as usize {
        Some(SmallRectangularGrid::new(
            Rc::new(RectGridDimensions::new(row_width, column_height)),
            Box::new(RectGridCoordinates),
            RectGridIterators,
        ))
    } else {
        None
    }
}

pub fn medium_rect_grid(row_width: RowLength, column_height: ColumnLength) -> Option<MediumRectangularGrid> {
    if row_width.0 * column_height.0 <= u16::MAX as usize {
        Some(MediumRectangularGrid::new(
            Rc::new(RectGridDimensions::new(row_width, column_height)),
            Box::new(RectGridCoordinates),
            RectGridIterators,
        ))
    } else {
        None
    }
}

pub fn large_rect_grid(row_width: RowLength, column_height: ColumnLength) -> Option<LargeRectangularGrid> {
    if row_width.0 * column_height.0 <= u32::MAX as usize {
        Some(LargeRectangularGrid::new(
            Rc::new(RectGridDimensions::new(row_width, column_height)),
            Box::new(RectGridCoordinates),
            RectGridIterators,
        ))
    } else {
        None
    }
}

pub fn polar_grid(inner_radius: usize, rings: RowsCount, first_ring_columns: usize) -> Option<PolarGrid> {
    if first_ring_columns == 0 {
        return None;
    }
    let dimensions = PolarGridDimensions::new(inner_radius, rings, first_ring_columns);
    if dimensions.size().0 <= u32::MAX as usize {
        Some(PolarGrid::new(
            Rc::new(dimensions),
            Box::new(PolarGridCoordinates),
            PolarGridIterators,
        ))
    } else {
        None
    }
}
