use std::rc::Rc;

use rand::XorShiftRng;

use crate::cells::Cell;
use crate::units::{
    ColumnIndex, ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowIndex, RowLength, RowsCount,
};

pub trait GridDimensions {
    fn size(&self) -> NodesCount;
    fn rows(&self) -> RowsCount;
    /// The length of a particular row, or of any row when `None` is given and
    /// all rows share one length. Polar grids have per-ring lengths, so they
    /// answer `None` queries with `None`.
    fn row_length(&self, row_index: Option<RowIndex>) -> Option<RowLength>;
    fn columns(&self) -> ColumnsCount;
    fn column_length(&self, column_index: Option<ColumnIndex>) -> ColumnLength;
    fn graph_size(&self) -> (NodesCount, EdgesCount);
}

pub trait GridCoordinates<CellT: Cell> {
    fn grid_coordinate_to_index(
        &self,
        coord: CellT::Coord,
        dimensions: &Rc<dyn GridDimensions>,
    ) -> Option<usize>;
    fn is_valid_coordinate(&self, coord: CellT::Coord, dimensions: &Rc<dyn GridDimensions>) -> bool;
    // Note: &mut XorShiftRng not a generic <R: Rng> so that GridCoordinates can be a trait object.
    fn random_cell(&self, rng: &mut XorShiftRng, dimensions: &Rc<dyn GridDimensions>)
        -> CellT::Coord;
}

pub trait GridIterators<CellT: Cell> {
    type CellIter: Iterator<Item = CellT::Coord>;
    type BatchIter: Iterator<Item = Vec<CellT::Coord>>;
    fn iter(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::CellIter;
    fn iter_row(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter;
    fn iter_column(&self, dimensions: &Rc<dyn GridDimensions>) -> Self::BatchIter;
}

pub trait GridDisplay<CellT: Cell> {
    /// Render the contents of a grid cell as text.
    /// The String should be 3 glyphs long, padded if required.
    fn render_cell_body(&self, _: CellT::Coord) -> String {
        String::from("   ")
    }
}
