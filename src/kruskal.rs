//! Randomized Kruskal passage building and weave (over/under) tunnels.
//!
//! Unlike the walk based generators this builder tracks connectivity with a
//! disjoint set forest instead of visited marks: a wall between two cells is
//! knocked through only when the cells belong to different components, so the
//! result is a spanning tree with every candidate wall order equally likely.

use rand::{Rng, XorShiftRng};

use crate::cells::{Cartesian2DCoordinate, Cell, SquareCell};
use crate::grid::{Grid, IndexType, TunnelOrientation};
use crate::grid_traits::GridIterators;
use crate::union_find::DisjointSetForest;

pub struct PassageBuilder<'g, GridIndexType: IndexType, CellT: Cell, Iters: GridIterators<CellT>> {
    grid: &'g mut Grid<GridIndexType, CellT, Iters>,
    forest: DisjointSetForest,
    // Each wall between two adjacent cells appears exactly once.
    walls: Vec<(CellT::Coord, CellT::Coord)>,
}

impl<'g, GridIndexType, CellT, Iters> PassageBuilder<'g, GridIndexType, CellT, Iters>
where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    pub fn new(grid: &'g mut Grid<GridIndexType, CellT, Iters>) -> PassageBuilder<'g, GridIndexType, CellT, Iters> {
        let forest = DisjointSetForest::new(grid.size());

        let mut walls = Vec::with_capacity(grid.size() * 2);
        for cell in grid.iter() {
            let cell_index = grid
                .grid_coordinate_to_index(cell)
                .expect("iterated coordinate is valid");
            for neighbour in grid.neighbours(cell).iter() {
                let neighbour_index = grid
                    .grid_coordinate_to_index(*neighbour)
                    .expect("neighbour coordinate is valid");
                if neighbour_index < cell_index {
                    walls.push((cell, *neighbour));
                }
            }
        }

        PassageBuilder { grid, forest, walls }
    }

    /// Knock through walls in uniformly random order until the maze spans the
    /// grid. Walls between already connected cells are discarded, so no cycle
    /// is ever created. Returns the collapsed forest for inspection.
    pub fn build(mut self, rng: &mut XorShiftRng) -> DisjointSetForest {
        rng.shuffle(&mut self.walls);

        for &(a, b) in &self.walls {
            let a_index = self
                .grid
                .grid_coordinate_to_index(a)
                .expect("wall endpoint coordinate is valid");
            let b_index = self
                .grid
                .grid_coordinate_to_index(b)
                .expect("wall endpoint coordinate is valid");

            if self.forest.union(a_index, b_index) {
                self.grid
                    .link(a, b)
                    .expect("wall endpoints are adjacent cells");
            }
        }

        self.forest
    }

    fn cell_index(&self, coord: CellT::Coord) -> usize {
        self.grid
            .grid_coordinate_to_index(coord)
            .expect("coordinate within the grid")
    }

    fn remove_wall(&mut self, a: CellT::Coord, b: CellT::Coord) {
        if let Some(position) = self
            .walls
            .iter()
            .position(|&(x, y)| (x == a && y == b) || (x == b && y == a))
        {
            self.walls.swap_remove(position);
        }
    }
}

impl<'g, GridIndexType, Iters> PassageBuilder<'g, GridIndexType, SquareCell, Iters>
where
    GridIndexType: IndexType,
    Iters: GridIterators<SquareCell>,
{
    /// Try to place one weave crossing: two passages crossing without meeting.
    ///
    /// Picks a random interior cell with no passages yet. When the four
    /// neighbouring components are pairwise distinct, either a north-south or
    /// an east-west tunnel is dug straight through the cell: the tunnel pair
    /// become each other's neighbours (bypassing the pass-through cell
    /// entirely) and the crossing pair connect to the cell on the surface.
    /// The consumed walls leave the candidate list and four components merge
    /// into two. Anything short of that is a no-op returning false.
    pub fn add_random_passage(&mut self, rng: &mut XorShiftRng) -> bool {
        use crate::cells::CompassPrimary as Dir;

        let rows = self.grid.rows().0;
        let columns = self.grid.columns().0;
        if rows < 4 || columns < 4 {
            return false;
        }

        let r = rng.gen_range(2, rows - 1) as u32;
        let c = rng.gen_range(2, columns - 1) as u32;
        let here = Cartesian2DCoordinate::new(c, r);
        if self.grid.links_degree(here) != Some(0) {
            return false;
        }

        let north = Cartesian2DCoordinate::new(c, r - 1);
        let south = Cartesian2DCoordinate::new(c, r + 1);
        let east = Cartesian2DCoordinate::new(c + 1, r);
        let west = Cartesian2DCoordinate::new(c - 1, r);

        let north_index = self.cell_index(north);
        let south_index = self.cell_index(south);
        let east_index = self.cell_index(east);
        let west_index = self.cell_index(west);
        let roots = [
            self.forest.find(north_index),
            self.forest.find(south_index),
            self.forest.find(east_index),
            self.forest.find(west_index),
        ];
        // All four components must be pairwise distinct, otherwise the tunnel
        // could close a cycle through some path already carved elsewhere.
        let pairwise_distinct = (0..4).all(|i| (i + 1..4).all(|j| roots[i] != roots[j]));
        if !pairwise_distinct {
            return false;
        }

        if rng.gen() {
            self.dig_tunnel(north, south, east, west, here, Dir::South, Dir::North, TunnelOrientation::NorthSouth);
        } else {
            self.dig_tunnel(east, west, north, south, here, Dir::West, Dir::East, TunnelOrientation::EastWest);
        }
        true
    }

    /// As many weave placement attempts as the grid interior has cells.
    /// Returns how many tunnels were dug.
    pub fn many_random_passages(&mut self, rng: &mut XorShiftRng) -> usize {
        let rows = self.grid.rows().0;
        let columns = self.grid.columns().0;
        if rows < 4 || columns < 4 {
            return 0;
        }

        let attempts = (rows - 2) * (columns - 2);
        (0..attempts)
            .filter(|_| self.add_random_passage(rng))
            .count()
    }

    /// `tunnel_start`/`tunnel_end` become direct neighbours and get the under
    /// passage; `cross_start`/`cross_end` connect through `here` on top.
    #[allow(clippy::too_many_arguments)]
    fn dig_tunnel(
        &mut self,
        tunnel_start: Cartesian2DCoordinate,
        tunnel_end: Cartesian2DCoordinate,
        cross_start: Cartesian2DCoordinate,
        cross_end: Cartesian2DCoordinate,
        here: Cartesian2DCoordinate,
        towards_end: crate::cells::CompassPrimary,
        towards_start: crate::cells::CompassPrimary,
        orientation: TunnelOrientation,
    ) {
        self.grid.rewire_neighbour(tunnel_start, towards_end, Some(tunnel_end));
        self.grid.rewire_neighbour(tunnel_end, towards_start, Some(tunnel_start));
        self.grid.rewire_neighbour(here, towards_end, None);
        self.grid.rewire_neighbour(here, towards_start, None);

        self.grid
            .link(tunnel_start, tunnel_end)
            .expect("tunnel endpoints were just made neighbours");
        self.grid
            .link(cross_end, here)
            .expect("crossing cells are adjacent");
        self.grid
            .link(here, cross_start)
            .expect("crossing cells are adjacent");
        self.grid.set_tunnel(here, orientation);

        self.remove_wall(tunnel_start, here);
        self.remove_wall(here, tunnel_end);

        let here_index = self.cell_index(here);
        let tunnel = (self.cell_index(tunnel_start), self.cell_index(tunnel_end));
        let crossing = (self.cell_index(cross_start), self.cell_index(cross_end));
        self.forest.union(tunnel.0, tunnel.1);
        self.forest.union(crossing.0, crossing.1);
        self.forest.union(here_index, crossing.0);
    }
}

/// Generate a maze with randomized Kruskal, without any weave tunnels.
pub fn kruskal<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    PassageBuilder::new(grid).build(rng);
}
