use std::fmt;
use std::marker::PhantomData;
use std::rc::Rc;
use std::slice;

use petgraph::graph;
pub use petgraph::graph::IndexType;
use petgraph::{Graph, Undirected};
use rand::XorShiftRng;

use crate::cells::{Cell, Coordinate, SquareCell};
use crate::grid_traits::{GridCoordinates, GridDimensions, GridDisplay, GridIterators};
use crate::units::{ColumnLength, ColumnsCount, EdgesCount, NodesCount, RowLength, RowsCount};
use crate::utils::FnvHashMap;

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum CellLinkError {
    InvalidGridCoordinate,
    SelfLink,
    NotNeighbours,
}

/// Which way the hidden passage under a weave crossing runs.
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub enum TunnelOrientation {
    NorthSouth,
    EastWest,
}

pub struct Grid<GridIndexType: IndexType, CellT: Cell, Iters: GridIterators<CellT>> {
    graph: Graph<(), (), Undirected, GridIndexType>,
    dimensions: Rc<dyn GridDimensions>,
    coordinates: Box<dyn GridCoordinates<CellT>>,
    iterators: Iters,
    tunnels: FnvHashMap<CellT::Coord, TunnelOrientation>,
    // Weave tunnels redirect a cell's neighbour in a direction away from the
    // geometric offset, or remove it. Consulted before the offset calculation.
    rewired_neighbours: FnvHashMap<(CellT::Coord, CellT::Direction), Option<CellT::Coord>>,
    grid_display: Option<Rc<dyn GridDisplay<CellT>>>,
    cell_type: PhantomData<CellT>,
}

impl<GridIndexType: IndexType, CellT: Cell, Iters: GridIterators<CellT>> fmt::Debug
    for Grid<GridIndexType, CellT, Iters>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "Grid :: size: {:?}, rows: {:?}, links: {:?}",
            self.size(),
            self.rows(),
            self.links_count()
        )
    }
}

impl<GridIndexType: IndexType, CellT: Cell, Iters: GridIterators<CellT>>
    Grid<GridIndexType, CellT, Iters>
{
    pub fn new(
        dimensions: Rc<dyn GridDimensions>,
        coordinates: Box<dyn GridCoordinates<CellT>>,
        iterators: Iters,
    ) -> Grid<GridIndexType, CellT, Iters> {
        let (NodesCount(nodes), EdgesCount(edges)) = dimensions.graph_size();

        let mut grid = Grid {
            graph: Graph::with_capacity(nodes, edges),
            dimensions,
            coordinates,
            iterators,
            tunnels: FnvHashMap::default(),
            rewired_neighbours: FnvHashMap::default(),
            grid_display: None,
            cell_type: PhantomData,
        };
        for _ in 0..nodes {
            let _ = grid.graph.add_node(());
        }

        grid
    }

    #[inline]
    pub fn set_grid_display(&mut self, grid_display: Option<Rc<dyn GridDisplay<CellT>>>) {
        self.grid_display = grid_display;
    }

    #[inline]
    pub fn grid_display(&self) -> &Option<Rc<dyn GridDisplay<CellT>>> {
        &self.grid_display
    }

    #[inline]
    pub fn dimensions(&self) -> &Rc<dyn GridDimensions> {
        &self.dimensions
    }

    #[inline]
    pub fn size(&self) -> usize {
        self.dimensions.size().0
    }

    #[inline]
    pub fn links_count(&self) -> usize {
        self.graph.edge_count()
    }

    #[inline]
    pub fn rows(&self) -> RowsCount {
        self.dimensions.rows()
    }

    #[inline]
    pub fn row_length(&self) -> Option<RowLength> {
        self.dimensions.row_length(None)
    }

    #[inline]
    pub fn columns(&self) -> ColumnsCount {
        self.dimensions.columns()
    }

    #[inline]
    pub fn column_length(&self) -> ColumnLength {
        self.dimensions.column_length(None)
    }

    #[inline]
    pub fn random_cell(&self, rng: &mut XorShiftRng) -> CellT::Coord {
        self.coordinates.random_cell(rng, &self.dimensions)
    }

    /// Link two adjacent cells with a passage.
    pub fn link(&mut self, a: CellT::Coord, b: CellT::Coord) -> Result<(), CellLinkError> {
        if a == b {
            return Err(CellLinkError::SelfLink);
        }
        match (
            self.grid_coordinate_graph_index(a),
            self.grid_coordinate_graph_index(b),
        ) {
            (Some(a_index), Some(b_index)) => {
                if !self.is_neighbour(a, b) {
                    return Err(CellLinkError::NotNeighbours);
                }
                let _ = self.graph.update_edge(a_index, b_index, ());
                Ok(())
            }
            _ => Err(CellLinkError::InvalidGridCoordinate),
        }
    }

    /// Unlink two cells, if the grid coordinates are valid and a link exists between them.
    /// Returns true if an unlink occurred.
    pub fn unlink(&mut self, a: CellT::Coord, b: CellT::Coord) -> bool {
        if let (Some(a_index), Some(b_index)) = (
            self.grid_coordinate_graph_index(a),
            self.grid_coordinate_graph_index(b),
        ) {
            if let Some(edge_index) = self.graph.find_edge(a_index, b_index) {
                // This will invalidate the last edge index in the graph, which is fine as we
                // are not storing them for any reason.
                self.graph.remove_edge(edge_index);
                return true;
            }
        }
        false
    }

    /// Cell nodes that are connected to a particular node by a passage.
    pub fn links(&self, coord: CellT::Coord) -> Option<CellT::CoordinateSmallVec> {
        if let Some(graph_node_index) = self.grid_coordinate_graph_index(coord) {
            let linked_cells = self
                .graph
                .neighbors(graph_node_index)
                .map(|node_index| {
                    CellT::Coord::from_row_major_index(node_index.index(), self.dimensions.as_ref())
                })
                .collect();
            Some(linked_cells)
        } else {
            None
        }
    }

    /// The number of passages leading out of this cell.
    pub fn links_degree(&self, coord: CellT::Coord) -> Option<usize> {
        self.grid_coordinate_graph_index(coord)
            .map(|index| self.graph.neighbors(index).count())
    }

    /// Cell nodes adjacent to a particular node on the grid, but not
    /// necessarily linked by a passage.
    pub fn neighbours(&self, coord: CellT::Coord) -> CellT::CoordinateSmallVec {
        let all_dirs = CellT::offset_directions(Some(coord), self.dimensions.as_ref());
        all_dirs
            .iter()
            .filter_map(|dir| self.neighbour_at_direction(coord, *dir))
            .collect()
    }

    pub fn neighbours_at_directions(
        &self,
        coord: CellT::Coord,
        dirs: &[CellT::Direction],
    ) -> CellT::CoordinateOptionSmallVec {
        dirs.iter()
            .map(|direction| self.neighbour_at_direction(coord, *direction))
            .collect()
    }

    pub fn neighbour_at_direction(
        &self,
        coord: CellT::Coord,
        direction: CellT::Direction,
    ) -> Option<CellT::Coord> {
        if let Some(rewired) = self.rewired_neighbours.get(&(coord, direction)) {
            return *rewired;
        }
        let neighbour_coord_opt =
            CellT::offset_coordinate(coord, direction, self.dimensions.as_ref());

        neighbour_coord_opt.and_then(|neighbour_coord| {
            if self.is_valid_coordinate(neighbour_coord) && neighbour_coord != coord {
                Some(neighbour_coord)
            } else {
                None
            }
        })
    }

    /// Are two cells in the grid linked?
    pub fn is_linked(&self, a: CellT::Coord, b: CellT::Coord) -> bool {
        if let (Some(a_index), Some(b_index)) = (
            self.grid_coordinate_graph_index(a),
            self.grid_coordinate_graph_index(b),
        ) {
            self.graph.find_edge(a_index, b_index).is_some()
        } else {
            false
        }
    }

    pub fn is_neighbour_linked(&self, coord: CellT::Coord, direction: CellT::Direction) -> bool {
        self.neighbour_at_direction(coord, direction)
            .map_or(false, |neighbour_coord| self.is_linked(coord, neighbour_coord))
    }

    /// Redirect `coord`'s neighbour in `direction`, or sever it with `None`.
    /// Only the weave tunnel builder and the persistence loader write this.
    pub(crate) fn rewire_neighbour(
        &mut self,
        coord: CellT::Coord,
        direction: CellT::Direction,
        to: Option<CellT::Coord>,
    ) {
        self.rewired_neighbours.insert((coord, direction), to);
    }

    pub(crate) fn set_tunnel(&mut self, coord: CellT::Coord, orientation: TunnelOrientation) {
        self.tunnels.insert(coord, orientation);
    }

    /// The tunnel marker of a weave pass-through cell, if any.
    pub fn tunnel(&self, coord: CellT::Coord) -> Option<TunnelOrientation> {
        self.tunnels.get(&coord).cloned()
    }

    /// Convert a grid coordinate to a one dimensional index in the range 0...grid.size().
    /// Returns None if the grid coordinate is invalid.
    #[inline]
    pub fn grid_coordinate_to_index(&self, coord: CellT::Coord) -> Option<usize> {
        self.coordinates.grid_coordinate_to_index(coord, &self.dimensions)
    }

    #[inline]
    pub fn iter(&self) -> Iters::CellIter {
        self.iterators.iter(&self.dimensions)
    }

    #[inline]
    pub fn iter_row(&self) -> Iters::BatchIter {
        self.iterators.iter_row(&self.dimensions)
    }

    #[inline]
    pub fn iter_column(&self) -> Iters::BatchIter {
        self.iterators.iter_column(&self.dimensions)
    }

    pub fn iter_links(&self) -> LinksIter<CellT, GridIndexType> {
        LinksIter {
            graph_edge_iter: self.graph.raw_edges().iter(),
            dimensions: self.dimensions.as_ref(),
            cell_type: PhantomData,
        }
    }

    /// Is the grid coordinate valid for this grid - within the grid's dimensions.
    #[inline]
    pub fn is_valid_coordinate(&self, coord: CellT::Coord) -> bool {
        self.coordinates.is_valid_coordinate(coord, &self.dimensions)
    }

    fn is_neighbour(&self, a: CellT::Coord, b: CellT::Coord) -> bool {
        self.neighbours(a).iter().any(|&coord| coord == b)
    }

    /// Convert a grid coordinate into a petgraph node index.
    /// Returns None if the grid coordinate is invalid (out of the grid's dimensions).
    #[inline]
    fn grid_coordinate_graph_index(
        &self,
        coord: CellT::Coord,
    ) -> Option<graph::NodeIndex<GridIndexType>> {
        self.grid_coordinate_to_index(coord)
            .map(graph::NodeIndex::<GridIndexType>::new)
    }
}

pub struct LinksIter<'a, CellT: Cell, GridIndexType: IndexType> {
    graph_edge_iter: slice::Iter<'a, graph::Edge<(), GridIndexType>>,
    dimensions: &'a dyn GridDimensions,
    cell_type: PhantomData<CellT>,
}

impl<'a, CellT: Cell, GridIndexType: IndexType> Iterator for LinksIter<'a, CellT, GridIndexType> {
    type Item = (CellT::Coord, CellT::Coord);

    fn next(&mut self) -> Option<Self::Item> {
        self.graph_edge_iter.next().map(|edge| {
            let src_cell_coord =
                CellT::Coord::from_row_major_index(edge.source().index(), self.dimensions);
            let dst_cell_coord =
                CellT::Coord::from_row_major_index(edge.target().index(), self.dimensions);
            (src_cell_coord, dst_cell_coord)
        })
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.graph_edge_iter.size_hint()
    }
}
impl<'a, CellT: Cell, GridIndexType: IndexType> ExactSizeIterator
    for LinksIter<'a, CellT, GridIndexType>
{
} // default impl using size_hint()

// Unicode box drawing text rendering, for square cell grids only - the polar
// layout does not map onto a character matrix.
impl<GridIndexType: IndexType, Iters: GridIterators<SquareCell>> fmt::Display
    for Grid<GridIndexType, SquareCell, Iters>
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        use crate::cells::CompassPrimary as Dir;

        const WALL_L: &str = "╴";
        const WALL_R: &str = "╶";
        const WALL_U: &str = "╵";
        const WALL_D: &str = "╷";
        const WALL_LR_3: &str = "───";
        const WALL_LR: &str = "─";
        const WALL_UD: &str = "│";
        const WALL_LD: &str = "┐";
        const WALL_RU: &str = "└";
        const WALL_LU: &str = "┘";
        const WALL_RD: &str = "┌";
        const WALL_LRU: &str = "┴";
        const WALL_LRD: &str = "┬";
        const WALL_LRUD: &str = "┼";
        const WALL_RUD: &str = "├";
        const WALL_LUD: &str = "┤";

        let columns_count = self.columns().0;
        let rows_count = self.rows().0;

        let render_cell_body = |coord| {
            if let Some(ref displayer) = *self.grid_display() {
                displayer.render_cell_body(coord)
            } else {
                String::from("   ")
            }
        };

        // Start by special case rendering the text for the north most boundary
        let mut output = String::from(WALL_RD);
        if let Some(first_grid_row) = self.iter_row().next() {
            for (index, coord) in first_grid_row.iter().enumerate() {
                output.push_str(WALL_LR_3);
                let is_east_open = self.is_neighbour_linked(*coord, Dir::East);
                if is_east_open {
                    output.push_str(WALL_LR);
                } else {
                    let is_last_cell = index == columns_count - 1;
                    if is_last_cell {
                        output.push_str(WALL_LD);
                    } else {
                        output.push_str(WALL_LRD);
                    }
                }
            }
        }
        output.push('\n');

        for (index_row, row) in self.iter_row().enumerate() {
            let is_last_row = index_row == (rows_count - 1);

            // Starts off by special case rendering the west most boundary of the row.
            // The top section of the cell is done by the previous row.
            let mut row_middle_section_render = String::from(WALL_UD);
            let mut row_bottom_section_render = String::from("");

            for (index_column, cell_coord) in row.into_iter().enumerate() {
                let render_cell_side = |direction, passage_clear_text, blocking_wall_text| {
                    self.neighbour_at_direction(cell_coord, direction)
                        .map_or(blocking_wall_text, |neighbour_coord| {
                            if self.is_linked(cell_coord, neighbour_coord) {
                                passage_clear_text
                            } else {
                                blocking_wall_text
                            }
                        })
                };
                let is_first_column = index_column == 0;
                let is_last_column = index_column == (columns_count - 1);
                let east_open = self.is_neighbour_linked(cell_coord, Dir::East);
                let south_open = self.is_neighbour_linked(cell_coord, Dir::South);

                // Each cell will simply use the southern wall of the cell above
                // it as its own northern wall, so we only need to worry about the cell’s body,
                // its eastern boundary ('|'), and its southern boundary ('---+') minus the
                // south west corner.
                let body = render_cell_body(cell_coord);
                let east_boundary = render_cell_side(Dir::East, " ", WALL_UD);
                row_middle_section_render.push_str(&body);
                row_middle_section_render.push_str(east_boundary);

                if is_first_column {
                    row_bottom_section_render = if is_last_row {
                        String::from(WALL_RU)
                    } else if south_open {
                        String::from(WALL_UD)
                    } else {
                        String::from(WALL_RUD)
                    };
                }
                let south_boundary = render_cell_side(Dir::South, "   ", WALL_LR_3);
                row_bottom_section_render.push_str(south_boundary);

                let corner = match (is_last_row, is_last_column) {
                    (true, true) => WALL_LU,
                    (true, false) => {
                        if east_open {
                            WALL_LR
                        } else {
                            WALL_LRU
                        }
                    }
                    (false, true) => {
                        if south_open {
                            WALL_UD
                        } else {
                            WALL_LUD
                        }
                    }
                    (false, false) => {
                        let access_se_from_east = self
                            .neighbour_at_direction(cell_coord, Dir::East)
                            .map_or(false, |c| self.is_neighbour_linked(c, Dir::South));
                        let access_se_from_south = self
                            .neighbour_at_direction(cell_coord, Dir::South)
                            .map_or(false, |c| self.is_neighbour_linked(c, Dir::East));
                        let show_right_section = !access_se_from_east;
                        let show_down_section = !access_se_from_south;
                        let show_up_section = !east_open;
                        let show_left_section = !south_open;

                        match (
                            show_left_section,
                            show_right_section,
                            show_up_section,
                            show_down_section,
                        ) {
                            (true, true, true, true) => WALL_LRUD,
                            (true, true, true, false) => WALL_LRU,
                            (true, true, false, true) => WALL_LRD,
                            (true, false, true, true) => WALL_LUD,
                            (false, true, true, true) => WALL_RUD,
                            (true, true, false, false) => WALL_LR,
                            (false, false, true, true) => WALL_UD,
                            (false, true, true, false) => WALL_RU,
                            (true, false, false, true) => WALL_LD,
                            (true, false, true, false) => WALL_LU,
                            (false, true, false, true) => WALL_RD,
                            (true, false, false, false) => WALL_L,
                            (false, true, false, false) => WALL_R,
                            (false, false, true, false) => WALL_U,
                            (false, false, false, true) => WALL_D,
                            _ => " ",
                        }
                    }
                };

                row_bottom_section_render.push_str(corner);
            }

            output.push_str(&row_middle_section_render);
            output.push('\n');
            output.push_str(&row_bottom_section_render);
            output.push('\n');
        }

        write!(f, "{}", output)
    }
}

#[cfg(test)]
mod tests {

    use itertools::Itertools; // a trait
    use smallvec::SmallVec;
    use std::u32;

    use super::*;
    use crate::cells::{Cartesian2DCoordinate, CompassPrimary};
    use crate::grids::{small_rect_grid, SmallRectangularGrid};
    use crate::units;

    fn small_grid(w: usize, h: usize) -> SmallRectangularGrid {
        small_rect_grid(units::RowLength(w), units::ColumnLength(h))
            .expect("grid dimensions too large for small grid")
    }

    // Compare a smallvec to e.g. a vec! or &[T].
    // SmallVec really ruins the syntax ergonomics, hence this macro
    // The compiler often succeeds in automatically adding the correct & and derefs (*) but not here
    macro_rules! assert_smallvec_eq {
        ($x:expr, $y:expr) => {
            assert_eq!(&*$x, &*$y)
        };
    }

    #[test]
    fn neighbour_cells() {
        let g = small_grid(10, 10);

        let check_expected_neighbours = |coord, expected_neighbours: &[Cartesian2DCoordinate]| {
            let node_indices: Vec<Cartesian2DCoordinate> =
                g.neighbours(coord).iter().cloned().sorted().collect();
            let expected_indices: Vec<Cartesian2DCoordinate> =
                expected_neighbours.iter().cloned().sorted().collect();
            assert_eq!(node_indices, expected_indices);
        };
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        // corners
        check_expected_neighbours(gc(0, 0), &[gc(1, 0), gc(0, 1)]);
        check_expected_neighbours(gc(9, 0), &[gc(8, 0), gc(9, 1)]);
        check_expected_neighbours(gc(0, 9), &[gc(0, 8), gc(1, 9)]);
        check_expected_neighbours(gc(9, 9), &[gc(9, 8), gc(8, 9)]);

        // side element examples
        check_expected_neighbours(gc(1, 0), &[gc(0, 0), gc(1, 1), gc(2, 0)]);
        check_expected_neighbours(gc(0, 1), &[gc(0, 0), gc(0, 2), gc(1, 1)]);
        check_expected_neighbours(gc(0, 8), &[gc(1, 8), gc(0, 7), gc(0, 9)]);
        check_expected_neighbours(gc(9, 8), &[gc(9, 7), gc(9, 9), gc(8, 8)]);

        // Some place with 4 neighbours inside the grid
        check_expected_neighbours(gc(1, 1), &[gc(0, 1), gc(1, 0), gc(2, 1), gc(1, 2)]);
    }

    #[test]
    fn neighbours_at_dirs() {
        let g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        let check_neighbours =
            |coord, dirs: &[CompassPrimary], neighbour_opts: &[Option<Cartesian2DCoordinate>]| {
                let neighbour_options = g.neighbours_at_directions(coord, dirs);
                assert_eq!(&*neighbour_options, neighbour_opts);
            };
        check_neighbours(gc(0, 0), &[], &[]);
        check_neighbours(gc(0, 0), &[CompassPrimary::North], &[None]);
        check_neighbours(gc(0, 0), &[CompassPrimary::West], &[None]);
        check_neighbours(
            gc(0, 0),
            &[CompassPrimary::West, CompassPrimary::North],
            &[None, None],
        );
        check_neighbours(
            gc(0, 0),
            &[CompassPrimary::East, CompassPrimary::South],
            &[Some(gc(1, 0)), Some(gc(0, 1))],
        );

        check_neighbours(gc(1, 1), &[], &[]);
        check_neighbours(gc(1, 1), &[CompassPrimary::South], &[None]);
        check_neighbours(gc(1, 1), &[CompassPrimary::East], &[None]);
        check_neighbours(
            gc(1, 1),
            &[CompassPrimary::South, CompassPrimary::East],
            &[None, None],
        );
        check_neighbours(
            gc(1, 1),
            &[CompassPrimary::West, CompassPrimary::North],
            &[Some(gc(0, 1)), Some(gc(1, 0))],
        );
    }

    #[test]
    fn neighbour_at_dir() {
        let g = small_grid(2, 2);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let check_neighbour = |coord, dir: CompassPrimary, expected| {
            assert_eq!(g.neighbour_at_direction(coord, dir), expected);
        };
        check_neighbour(gc(0, 0), CompassPrimary::North, None);
        check_neighbour(gc(0, 0), CompassPrimary::South, Some(gc(0, 1)));
        check_neighbour(gc(0, 0), CompassPrimary::East, Some(gc(1, 0)));
        check_neighbour(gc(0, 0), CompassPrimary::West, None);

        check_neighbour(gc(1, 1), CompassPrimary::North, Some(gc(1, 0)));
        check_neighbour(gc(1, 1), CompassPrimary::South, None);
        check_neighbour(gc(1, 1), CompassPrimary::East, None);
        check_neighbour(gc(1, 1), CompassPrimary::West, Some(gc(0, 1)));
    }

    #[test]
    fn rewired_neighbours_take_precedence() {
        let mut g = small_grid(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        // Tunnel through (1,1): north and south of the centre become each other's
        // neighbours and the centre loses both directions.
        g.rewire_neighbour(gc(1, 0), CompassPrimary::South, Some(gc(1, 2)));
        g.rewire_neighbour(gc(1, 2), CompassPrimary::North, Some(gc(1, 0)));
        g.rewire_neighbour(gc(1, 1), CompassPrimary::North, None);
        g.rewire_neighbour(gc(1, 1), CompassPrimary::South, None);

        assert_eq!(
            g.neighbour_at_direction(gc(1, 0), CompassPrimary::South),
            Some(gc(1, 2))
        );
        assert_eq!(
            g.neighbour_at_direction(gc(1, 2), CompassPrimary::North),
            Some(gc(1, 0))
        );
        assert_eq!(g.neighbour_at_direction(gc(1, 1), CompassPrimary::North), None);
        assert_eq!(g.neighbour_at_direction(gc(1, 1), CompassPrimary::South), None);

        // The rewired pair can now be linked despite not being geometric neighbours.
        g.link(gc(1, 0), gc(1, 2)).expect("tunnel link failed");
        assert!(g.is_linked(gc(1, 0), gc(1, 2)));
    }

    #[test]
    fn grid_size() {
        let g = small_grid(10, 10);
        assert_eq!(g.size(), 100);
    }

    #[test]
    fn grid_rows() {
        let g = small_grid(10, 10);
        assert_eq!(g.rows().0, 10);
    }

    #[test]
    fn grid_coordinate_as_index() {
        let g = small_grid(3, 3);
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);
        let coords = &[
            gc(0, 0),
            gc(1, 0),
            gc(2, 0),
            gc(0, 1),
            gc(1, 1),
            gc(2, 1),
            gc(0, 2),
            gc(1, 2),
            gc(2, 2),
        ];
        let indices: Vec<Option<usize>> = coords
            .iter()
            .map(|coord| g.grid_coordinate_to_index(*coord))
            .collect();
        let expected = (0..9).map(Some).collect::<Vec<Option<usize>>>();
        assert_eq!(expected, indices);

        assert_eq!(g.grid_coordinate_to_index(gc(2, 3)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(3, 2)), None);
        assert_eq!(g.grid_coordinate_to_index(gc(u32::MAX, u32::MAX)), None);
    }

    #[test]
    fn random_cell() {
        let g = small_grid(4, 4);
        let cells_count = 4 * 4;
        let mut rng = rand::weak_rng();
        for _ in 0..1000 {
            let coord = g.random_cell(&mut rng);
            assert!(coord.x < cells_count);
            assert!(coord.y < cells_count);
        }
    }

    #[test]
    fn cell_iter() {
        let g = small_grid(2, 2);
        assert_eq!(
            g.iter().collect::<Vec<Cartesian2DCoordinate>>(),
            &[
                Cartesian2DCoordinate::new(0, 0),
                Cartesian2DCoordinate::new(1, 0),
                Cartesian2DCoordinate::new(0, 1),
                Cartesian2DCoordinate::new(1, 1),
            ]
        );
    }

    #[test]
    fn row_iter() {
        let g = small_grid(2, 2);
        assert_eq!(
            g.iter_row().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
            &[
                &[Cartesian2DCoordinate::new(0, 0), Cartesian2DCoordinate::new(1, 0)],
                &[Cartesian2DCoordinate::new(0, 1), Cartesian2DCoordinate::new(1, 1)],
            ]
        );
    }

    #[test]
    fn column_iter() {
        let g = small_grid(2, 2);
        assert_eq!(
            g.iter_column().collect::<Vec<Vec<Cartesian2DCoordinate>>>(),
            &[
                &[Cartesian2DCoordinate::new(0, 0), Cartesian2DCoordinate::new(0, 1)],
                &[Cartesian2DCoordinate::new(1, 0), Cartesian2DCoordinate::new(1, 1)],
            ]
        );
    }

    #[test]
    fn linking_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 1);
        let b = Cartesian2DCoordinate::new(0, 2);
        let c = Cartesian2DCoordinate::new(0, 3);

        // Testing the expected grid `links`
        let sorted_links = |grid: &SmallRectangularGrid, coord| -> Vec<Cartesian2DCoordinate> {
            grid.links(coord)
                .expect("coordinate is invalid")
                .iter()
                .cloned()
                .sorted()
                .collect()
        };
        macro_rules! links_sorted {
            ($x:expr) => {
                sorted_links(&g, $x)
            };
        }

        // Testing that the order of the arguments to `is_linked` does not matter
        macro_rules! bi_check_linked {
            ($x:expr, $y:expr) => {
                g.is_linked($x, $y) && g.is_linked($y, $x)
            };
        }

        // Testing `is_neighbour_linked` for all directions
        let all_dirs = [
            CompassPrimary::North,
            CompassPrimary::South,
            CompassPrimary::East,
            CompassPrimary::West,
        ];

        let directional_links_check = |grid: &SmallRectangularGrid,
                                       coord: Cartesian2DCoordinate,
                                       expected_dirs_linked: &[CompassPrimary]| {
            let expected_complement: SmallVec<[CompassPrimary; 4]> = all_dirs
                .iter()
                .cloned()
                .filter(|dir: &CompassPrimary| !expected_dirs_linked.contains(dir))
                .collect();
            for exp_dir in expected_dirs_linked {
                assert!(grid.is_neighbour_linked(coord, *exp_dir));
            }
            for not_exp_dir in expected_complement.iter() {
                assert!(!grid.is_neighbour_linked(coord, *not_exp_dir));
            }
        };
        macro_rules! check_directional_links {
            ($coord:expr, $expected:expr) => {
                directional_links_check(&g, $coord, &$expected)
            };
        }

        // a, b and c start with no links
        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(a, c));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);
        assert_eq!(links_sorted!(c), vec![]);
        check_directional_links!(a, []);
        check_directional_links!(b, []);
        check_directional_links!(c, []);

        g.link(a, b).expect("link failed");
        // a - b linked bi-directionally
        assert!(bi_check_linked!(a, b));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a]);
        check_directional_links!(a, [CompassPrimary::South]);
        check_directional_links!(b, [CompassPrimary::North]);
        check_directional_links!(c, []);

        g.link(b, c).expect("link failed");
        // a - b still linked bi-directionally after linking b - c
        // b linked to a & c bi-directionally
        // c linked to b bi-directionally
        assert!(bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert!(!bi_check_linked!(a, c));
        assert_eq!(links_sorted!(a), vec![b]);
        assert_eq!(links_sorted!(b), vec![a, c]);
        assert_eq!(links_sorted!(c), vec![b]);

        check_directional_links!(a, [CompassPrimary::South]);
        check_directional_links!(b, [CompassPrimary::North, CompassPrimary::South]);
        check_directional_links!(c, [CompassPrimary::North]);

        // a - b unlinked
        // b still linked to c bi-directionally
        let is_ab_unlinked = g.unlink(a, b);
        assert!(is_ab_unlinked);
        assert!(!bi_check_linked!(a, b));
        assert!(bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![c]);
        assert_eq!(links_sorted!(c), vec![b]);
        check_directional_links!(a, []);
        check_directional_links!(b, [CompassPrimary::South]);
        check_directional_links!(c, [CompassPrimary::North]);

        // a, b and c all unlinked again
        let is_bc_unlinked = g.unlink(b, c);
        assert!(is_bc_unlinked);
        assert!(!bi_check_linked!(a, b));
        assert!(!bi_check_linked!(a, c));
        assert!(!bi_check_linked!(b, c));
        assert_eq!(links_sorted!(a), vec![]);
        assert_eq!(links_sorted!(b), vec![]);
        assert_eq!(links_sorted!(c), vec![]);
        check_directional_links!(a, []);
        check_directional_links!(b, []);
        check_directional_links!(c, []);
    }

    #[test]
    fn no_self_linked_cycles() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let link_result = g.link(a, a);
        assert_eq!(link_result, Err(CellLinkError::SelfLink));
    }

    #[test]
    fn no_links_to_invalid_coordinates() {
        let mut g = small_grid(4, 4);
        let good_coord = Cartesian2DCoordinate::new(0, 0);
        let invalid_coord = Cartesian2DCoordinate::new(100, 100);
        let link_result = g.link(good_coord, invalid_coord);
        assert_eq!(link_result, Err(CellLinkError::InvalidGridCoordinate));
    }

    #[test]
    fn no_links_between_non_adjacent_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let far = Cartesian2DCoordinate::new(3, 3);
        assert_eq!(g.link(a, far), Err(CellLinkError::NotNeighbours));
    }

    #[test]
    fn no_parallel_duplicated_linked_cells() {
        let mut g = small_grid(4, 4);
        let a = Cartesian2DCoordinate::new(0, 0);
        let b = Cartesian2DCoordinate::new(0, 1);
        g.link(a, b).expect("link failed");
        g.link(a, b).expect("link failed");
        assert_smallvec_eq!(g.links(a).unwrap(), &[b]);
        assert_smallvec_eq!(g.links(b).unwrap(), &[a]);

        g.unlink(a, b);
        assert_smallvec_eq!(g.links(a).unwrap(), &[]);
        assert_smallvec_eq!(g.links(b).unwrap(), &[]);
    }

    #[test]
    fn polar_grid_neighbours() {
        use crate::cells::ClockDirection;
        use crate::grids::polar_grid;

        // Inner radius 2 with 8 cells on the first of 2 rings: the second ring
        // splits to 16 cells (radius 3 > threshold 2).
        let g = polar_grid(2, units::RowsCount(2), 8).expect("polar grid too large");
        let gc = |x, y| Cartesian2DCoordinate::new(x, y);

        assert_eq!(g.neighbour_at_direction(gc(0, 0), ClockDirection::In), None);
        assert_eq!(
            g.neighbour_at_direction(gc(0, 0), ClockDirection::Clockwise),
            Some(gc(1, 0))
        );
        // counter clockwise wraps around the ring
        assert_eq!(
            g.neighbour_at_direction(gc(0, 0), ClockDirection::CounterClockwise),
            Some(gc(7, 0))
        );
        // the ring subdivides, so plain out does not exist but the split pair does
        assert_eq!(g.neighbour_at_direction(gc(0, 0), ClockDirection::Out), None);
        assert_eq!(
            g.neighbour_at_direction(gc(0, 0), ClockDirection::OutCounterClockwise),
            Some(gc(0, 1))
        );
        assert_eq!(
            g.neighbour_at_direction(gc(0, 0), ClockDirection::OutClockwise),
            Some(gc(1, 1))
        );

        // Both outer split cells point back at the same inner parent.
        assert_eq!(
            g.neighbour_at_direction(gc(0, 1), ClockDirection::In),
            Some(gc(0, 0))
        );
        assert_eq!(
            g.neighbour_at_direction(gc(1, 1), ClockDirection::In),
            Some(gc(0, 0))
        );

        // Outermost ring has nothing further out.
        assert_eq!(g.neighbour_at_direction(gc(0, 1), ClockDirection::Out), None);
        assert_eq!(
            g.neighbour_at_direction(gc(0, 1), ClockDirection::OutClockwise),
            None
        );
    }
}
