use std::marker::PhantomData;

use crate::cells::Cell;
use crate::grid_traits::GridDisplay;
use crate::pathing::{Distances, MaxDistance};
use crate::utils::FnvHashSet;

impl<CellT, MaxDistanceT> GridDisplay<CellT> for Distances<CellT, MaxDistanceT>
where
    CellT: Cell,
    MaxDistanceT: MaxDistance,
{
    fn render_cell_body(&self, coord: CellT::Coord) -> String {
        if let Some(d) = self.distance_from_start_to(coord) {
            // centre align, padding 3, lowercase hexadecimal
            format!("{:^3x}", d)
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct PathDisplay<CellT: Cell> {
    on_path_coordinates: FnvHashSet<CellT::Coord>,
}

impl<CellT: Cell> PathDisplay<CellT> {
    pub fn new(path: &[CellT::Coord]) -> Self {
        PathDisplay {
            on_path_coordinates: path.iter().cloned().collect(),
        }
    }
}

impl<CellT: Cell> GridDisplay<CellT> for PathDisplay<CellT> {
    fn render_cell_body(&self, coord: CellT::Coord) -> String {
        if self.on_path_coordinates.contains(&coord) {
            String::from(" . ")
        } else {
            String::from("   ")
        }
    }
}

#[derive(Debug)]
pub struct StartEndPointsDisplay<CellT: Cell> {
    start_coordinates: CellT::CoordinateSmallVec,
    end_coordinates: CellT::CoordinateSmallVec,
    cell_type: PhantomData<CellT>,
}

impl<CellT: Cell> StartEndPointsDisplay<CellT> {
    pub fn new(
        starts: CellT::CoordinateSmallVec,
        ends: CellT::CoordinateSmallVec,
    ) -> StartEndPointsDisplay<CellT> {
        StartEndPointsDisplay {
            start_coordinates: starts,
            end_coordinates: ends,
            cell_type: PhantomData,
        }
    }
}

impl<CellT: Cell> GridDisplay<CellT> for StartEndPointsDisplay<CellT> {
    fn render_cell_body(&self, coord: CellT::Coord) -> String {
        let contains_coordinate =
            |coordinates: &CellT::CoordinateSmallVec| coordinates.iter().any(|&c| c == coord);

        if contains_coordinate(&self.start_coordinates) {
            String::from(" S ")
        } else if contains_coordinate(&self.end_coordinates) {
            String::from(" E ")
        } else {
            String::from("   ")
        }
    }
}

#[cfg(test)]
mod tests {

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, SquareCell};
    use crate::grid_traits::GridDisplay;
    use crate::grids::small_rect_grid;
    use crate::pathing::Distances;
    use crate::units::{ColumnLength, RowLength};

    #[test]
    fn distances_render_as_lower_hex() {
        let mut g = small_rect_grid(RowLength(2), ColumnLength(1)).unwrap();
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(1, 0);
        g.link(a, b).expect("link failed");
        let distances = Distances::<SquareCell, u32>::new(&g, a, 0).unwrap();

        assert_eq!(distances.render_cell_body(a), " 0 ");
        assert_eq!(distances.render_cell_body(b), " 1 ");
        assert_eq!(
            distances.render_cell_body(Cartesian2DCoordinate::new(9, 9)),
            "   "
        );
    }

    #[test]
    fn path_cells_render_as_dots() {
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(1, 0);
        let display = PathDisplay::<SquareCell>::new(&[a]);
        assert_eq!(display.render_cell_body(a), " . ");
        assert_eq!(display.render_cell_body(b), "   ");
    }
}
