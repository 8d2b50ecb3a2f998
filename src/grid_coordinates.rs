use std::rc::Rc;

use rand::{Rng, XorShiftRng};

use crate::cells::{Cell, Coordinate};
use crate::grid_traits::{GridCoordinates, GridDimensions};
use crate::units::{RowIndex, RowLength};

#[derive(Debug, Copy, Clone)]
pub struct RectGridCoordinates;

impl<CellT: Cell> GridCoordinates<CellT> for RectGridCoordinates {
    fn grid_coordinate_to_index(
        &self,
        coord: CellT::Coord,
        dimensions: &Rc<dyn GridDimensions>,
    ) -> Option<usize> {
        if GridCoordinates::<CellT>::is_valid_coordinate(self, coord, dimensions) {
            let grid_2d_coord = coord.as_cartesian_2d();
            dimensions
                .row_length(None) // all rows are the same length
                .map(|RowLength(row_size)| {
                    (grid_2d_coord.y as usize * row_size) + grid_2d_coord.x as usize
                })
        } else {
            None
        }
    }

    fn is_valid_coordinate(&self, coord: CellT::Coord, dimensions: &Rc<dyn GridDimensions>) -> bool {
        let grid_2d_coord = coord.as_cartesian_2d();
        let RowLength(width) = match dimensions.row_length(None) {
            Some(l) => l,
            None => return false,
        };
        (grid_2d_coord.x as usize) < width
            && (grid_2d_coord.y as usize) < dimensions.column_length(None).0
    }

    fn random_cell(
        &self,
        rng: &mut XorShiftRng,
        dimensions: &Rc<dyn GridDimensions>,
    ) -> CellT::Coord {
        let index = rng.gen::<usize>() % dimensions.size().0;
        CellT::Coord::from_row_major_index(index, dimensions.as_ref())
    }
}

#[derive(Debug, Copy, Clone)]
pub struct PolarGridCoordinates;

impl<CellT: Cell> GridCoordinates<CellT> for PolarGridCoordinates {
    fn grid_coordinate_to_index(
        &self,
        coord: CellT::Coord,
        dimensions: &Rc<dyn GridDimensions>,
    ) -> Option<usize> {
        if GridCoordinates::<CellT>::is_valid_coordinate(self, coord, dimensions) {
            let c = coord.as_cartesian_2d();
            let cells_in_inner_rings: usize = (0..c.y as usize)
                .map(|ring| {
                    dimensions
                        .row_length(Some(RowIndex(ring)))
                        .expect("ring index below a valid coordinate's ring")
                        .0
                })
                .sum();
            Some(cells_in_inner_rings + c.x as usize)
        } else {
            None
        }
    }

    fn is_valid_coordinate(&self, coord: CellT::Coord, dimensions: &Rc<dyn GridDimensions>) -> bool {
        let c = coord.as_cartesian_2d();
        match dimensions.row_length(Some(RowIndex(c.y as usize))) {
            Some(RowLength(ring_len)) => (c.x as usize) < ring_len,
            None => false,
        }
    }

    fn random_cell(
        &self,
        rng: &mut XorShiftRng,
        dimensions: &Rc<dyn GridDimensions>,
    ) -> CellT::Coord {
        let index = rng.gen::<usize>() % dimensions.size().0;
        CellT::Coord::from_row_major_index(index, dimensions.as_ref())
    }
}
