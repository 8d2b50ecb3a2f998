//! Distance fields and route finding over the passage graph.
//!
//! A `Distances` map is grown from one root cell by a breadth first flood of
//! the link relation, frontier by frontier. Distance maps support cellwise
//! arithmetic and a minimum merge with a pallet tie-break, which is how
//! multiple flood regions grown from different seeds get stitched together.
//! Distance maps never mutate the grid.

use std::fmt::{Debug, Display, LowerHex};
use std::marker::PhantomData;
use std::ops::Add;

use num::traits::{Bounded, NumCast, One, Unsigned, Zero};
use smallvec::SmallVec;

use crate::cells::{Cell, Coordinate};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridIterators;
use crate::utils;
use crate::utils::FnvHashMap;

// Trait (hack) used purely as a generic type parameter alias because it looks ugly to type this out each time.
// Note generic parameter type aliases are not in the language.
// `type X = Y;` only works with concrete types.
pub trait MaxDistance:
    Zero + One + Bounded + Unsigned + NumCast + Add + Debug + Clone + Copy + Display + LowerHex + Ord
{
}
impl<T> MaxDistance for T where
    T: Zero + One + Bounded + Unsigned + NumCast + Add + Debug + Clone + Copy + Display + LowerHex + Ord
{
}

/// Identifier of the seed region a distance entry was flooded from. Regions
/// merged with `merge_min` resolve exact ties through these tags.
pub type Pallet = i32;

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum PathingError {
    InvalidCoordinate,
    MismatchedCellPopulations,
    UnreachableGoal,
}

/// How much distance one passage contributes.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum EdgeWeighting {
    /// Every passage is one step.
    Unit,
    /// A passage costs the Chebyshev span between its end cells, so a weave
    /// tunnel that passes under a cell counts the cells it crosses.
    CellSpan,
}

#[derive(Debug)]
pub struct Distances<CellT: Cell, MaxDistanceT = u32> {
    start_coordinate: CellT::Coord,
    distances: FnvHashMap<CellT::Coord, MaxDistanceT>,
    pallets: FnvHashMap<CellT::Coord, Pallet>,
    max_distance: MaxDistanceT,
    weighting: EdgeWeighting,
    cell_type: PhantomData<CellT>,
}

impl<CellT, MaxDistanceT> Clone for Distances<CellT, MaxDistanceT>
where
    CellT: Cell,
    MaxDistanceT: Clone,
{
    fn clone(&self) -> Self {
        Distances {
            start_coordinate: self.start_coordinate.clone(),
            distances: self.distances.clone(),
            pallets: self.pallets.clone(),
            max_distance: self.max_distance.clone(),
            weighting: self.weighting,
            cell_type: PhantomData,
        }
    }
}

impl<CellT, MaxDistanceT> Distances<CellT, MaxDistanceT>
where
    CellT: Cell,
    MaxDistanceT: MaxDistance,
{
    /// Flood fill distances from `start_coordinate` over the passages,
    /// counting every passage as one step. Cells reached get the `pallet` tag.
    pub fn new<GridIndexType, Iters>(
        grid: &Grid<GridIndexType, CellT, Iters>,
        start_coordinate: CellT::Coord,
        pallet: Pallet,
    ) -> Result<Distances<CellT, MaxDistanceT>, PathingError>
    where
        GridIndexType: IndexType,
        Iters: GridIterators<CellT>,
    {
        Self::with_weighting(grid, start_coordinate, pallet, EdgeWeighting::Unit)
    }

    /// Flood fill weighting each passage by the cell span it crosses. Used on
    /// weave mazes, where a tunnel passage physically covers two cells.
    pub fn new_spanning<GridIndexType, Iters>(
        grid: &Grid<GridIndexType, CellT, Iters>,
        start_coordinate: CellT::Coord,
        pallet: Pallet,
    ) -> Result<Distances<CellT, MaxDistanceT>, PathingError>
    where
        GridIndexType: IndexType,
        Iters: GridIterators<CellT>,
    {
        Self::with_weighting(grid, start_coordinate, pallet, EdgeWeighting::CellSpan)
    }

    fn with_weighting<GridIndexType, Iters>(
        grid: &Grid<GridIndexType, CellT, Iters>,
        start_coordinate: CellT::Coord,
        pallet: Pallet,
        weighting: EdgeWeighting,
    ) -> Result<Distances<CellT, MaxDistanceT>, PathingError>
    where
        GridIndexType: IndexType,
        Iters: GridIterators<CellT>,
    {
        if !grid.is_valid_coordinate(start_coordinate) {
            return Err(PathingError::InvalidCoordinate);
        }

        let cells_count = grid.size();
        let mut distances = utils::fnv_hashmap(cells_count);
        let mut pallets = utils::fnv_hashmap(cells_count);
        distances.insert(start_coordinate, MaxDistanceT::zero());
        pallets.insert(start_coordinate, pallet);
        let mut max = MaxDistanceT::zero();

        // The distances map doubles as the visited set: a cell that has a
        // distance has its final distance, every step outward from the
        // frontier can only be as long or longer.
        let mut frontier = vec![start_coordinate];
        while !frontier.is_empty() {
            let mut new_frontier = vec![];
            for cell_coord in &frontier {
                let distance_to_cell = distances[cell_coord];

                let links: CellT::CoordinateSmallVec = grid
                    .links(*cell_coord)
                    .expect("frontier cell has an invalid cell coordinate");
                for link_coordinate in &*links {
                    if !distances.contains_key(link_coordinate) {
                        let weight = edge_weight::<CellT, MaxDistanceT>(
                            weighting,
                            *cell_coord,
                            *link_coordinate,
                        );
                        let distance_to_link = distance_to_cell + weight;
                        if distance_to_link > max {
                            max = distance_to_link;
                        }
                        distances.insert(*link_coordinate, distance_to_link);
                        pallets.insert(*link_coordinate, pallet);
                        new_frontier.push(*link_coordinate);
                    }
                }
            }
            frontier = new_frontier;
        }

        Ok(Distances {
            start_coordinate,
            distances,
            pallets,
            max_distance: max,
            weighting,
            cell_type: PhantomData,
        })
    }

    #[inline(always)]
    pub fn start(&self) -> CellT::Coord {
        self.start_coordinate
    }

    #[inline(always)]
    pub fn max(&self) -> MaxDistanceT {
        self.max_distance
    }

    #[inline(always)]
    pub fn distance_from_start_to(&self, coord: CellT::Coord) -> Option<MaxDistanceT> {
        self.distances.get(&coord).cloned()
    }

    #[inline(always)]
    pub fn pallet_of(&self, coord: CellT::Coord) -> Option<Pallet> {
        self.pallets.get(&coord).cloned()
    }

    /// The number of cells the flood reached, the root included.
    #[inline]
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    pub fn furthest_points_on_grid(&self) -> SmallVec<[CellT::Coord; 8]> {
        let mut furthest = SmallVec::<[CellT::Coord; 8]>::new();
        let furthest_distance = self.max();

        for (coord, distance) in self.distances.iter() {
            if *distance == furthest_distance {
                furthest.push(*coord);
            }
        }
        furthest
    }

    /// Cellwise sum of two distance maps over the same cell population.
    pub fn add(&self, other: &Self) -> Result<Self, PathingError> {
        self.combine(other, |this, that| this + that)
    }

    /// Cellwise difference, saturating at zero (distances are unsigned).
    pub fn subtract(&self, other: &Self) -> Result<Self, PathingError> {
        self.combine(other, |this, that| {
            if that > this {
                MaxDistanceT::zero()
            } else {
                this - that
            }
        })
    }

    fn combine<F>(&self, other: &Self, op: F) -> Result<Self, PathingError>
    where
        F: Fn(MaxDistanceT, MaxDistanceT) -> MaxDistanceT,
    {
        let mut combined = self.clone();
        let mut max = MaxDistanceT::zero();
        for (coord, this) in &self.distances {
            let that = other
                .distance_from_start_to(*coord)
                .ok_or(PathingError::MismatchedCellPopulations)?;
            let value = op(*this, that);
            if value > max {
                max = value;
            }
            combined.distances.insert(*coord, value);
        }
        combined.max_distance = max;
        Ok(combined)
    }

    pub fn add_scalar(&self, amount: MaxDistanceT) -> Self {
        self.map_values(|v| v + amount)
    }

    /// Saturates at zero, as `subtract` does.
    pub fn subtract_scalar(&self, amount: MaxDistanceT) -> Self {
        self.map_values(|v| if amount > v { MaxDistanceT::zero() } else { v - amount })
    }

    fn map_values<F>(&self, op: F) -> Self
    where
        F: Fn(MaxDistanceT) -> MaxDistanceT,
    {
        let mut mapped = self.clone();
        let mut max = MaxDistanceT::zero();
        for value in mapped.distances.values_mut() {
            *value = op(*value);
            if *value > max {
                max = *value;
            }
        }
        mapped.max_distance = max;
        mapped
    }

    /// Keep whichever map reached each cell first.
    ///
    /// On an exact distance tie the other map wins only when its pallet tag
    /// exceeds this map's by exactly one - the rule that decides which region
    /// owns the boundary cells where two floods meet.
    pub fn merge_min(&self, other: &Self) -> Result<Self, PathingError> {
        let mut merged = self.clone();
        let mut max = MaxDistanceT::zero();
        for (coord, &this) in &self.distances {
            let that = other
                .distance_from_start_to(*coord)
                .ok_or(PathingError::MismatchedCellPopulations)?;
            let this_pallet = self.pallets[coord];
            let that_pallet = other
                .pallet_of(*coord)
                .ok_or(PathingError::MismatchedCellPopulations)?;

            let (value, pallet) = if that < this {
                (that, that_pallet)
            } else if that > this {
                (this, this_pallet)
            } else if that_pallet - this_pallet == 1 {
                (that, that_pallet)
            } else {
                (this, this_pallet)
            };
            if value > max {
                max = value;
            }
            merged.distances.insert(*coord, value);
            merged.pallets.insert(*coord, pallet);
        }
        merged.max_distance = max;
        Ok(merged)
    }

    /// The route from the root to `goal`, root first.
    ///
    /// Walks backwards from the goal, at each step taking the first linked
    /// neighbour - in the grid's fixed direction iteration order, so braided
    /// mazes with several equally good steps resolve deterministically - whose
    /// recorded distance plus the passage weight lands exactly on the current
    /// distance.
    pub fn path_to<GridIndexType, Iters>(
        &self,
        grid: &Grid<GridIndexType, CellT, Iters>,
        goal: CellT::Coord,
    ) -> Result<Vec<CellT::Coord>, PathingError>
    where
        GridIndexType: IndexType,
        Iters: GridIterators<CellT>,
    {
        if !grid.is_valid_coordinate(goal) {
            return Err(PathingError::InvalidCoordinate);
        }
        let mut current_distance = self
            .distance_from_start_to(goal)
            .ok_or(PathingError::UnreachableGoal)?;

        let mut path = vec![goal];
        let mut current = goal;
        while current != self.start_coordinate {
            let mut stepped = false;
            for neighbour in grid.neighbours(current).iter() {
                if !grid.is_linked(current, *neighbour) {
                    continue;
                }
                if let Some(neighbour_distance) = self.distance_from_start_to(*neighbour) {
                    let weight = edge_weight::<CellT, MaxDistanceT>(
                        self.weighting,
                        *neighbour,
                        current,
                    );
                    if neighbour_distance + weight == current_distance {
                        current = *neighbour;
                        current_distance = neighbour_distance;
                        path.push(current);
                        stepped = true;
                        break;
                    }
                }
            }
            if !stepped {
                // No neighbour makes progress rootwards: the map does not
                // belong to this grid's link relation.
                return Err(PathingError::UnreachableGoal);
            }
        }

        path.reverse();
        Ok(path)
    }
}

fn edge_weight<CellT, MaxDistanceT>(
    weighting: EdgeWeighting,
    a: CellT::Coord,
    b: CellT::Coord,
) -> MaxDistanceT
where
    CellT: Cell,
    MaxDistanceT: MaxDistance,
{
    match weighting {
        EdgeWeighting::Unit => MaxDistanceT::one(),
        EdgeWeighting::CellSpan => {
            let (a, b) = (a.as_cartesian_2d(), b.as_cartesian_2d());
            let dx = (<i64 as From<u32>>::from(a.x) - <i64 as From<u32>>::from(b.x)).abs();
            let dy = (<i64 as From<u32>>::from(a.y) - <i64 as From<u32>>::from(b.y)).abs();
            NumCast::from(dx.max(dy)).expect("cell span fits in the distance type")
        }
    }
}

/// Detour cost of every cell relative to the best start-goal route:
/// `(distance from start + distance from goal) - shortest path length`.
/// Cells on an optimal path score zero; dead ends score high. Feed it to a
/// colouring function to paint the solution.
pub fn distances_from_path<GridIndexType, MaxDistanceT, CellT, Iters>(
    grid: &Grid<GridIndexType, CellT, Iters>,
    start: CellT::Coord,
    goal: CellT::Coord,
    pallet: Pallet,
) -> Result<Distances<CellT, MaxDistanceT>, PathingError>
where
    GridIndexType: IndexType,
    MaxDistanceT: MaxDistance,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    let to_start = Distances::<CellT, MaxDistanceT>::new(grid, start, pallet)?;
    let to_goal = Distances::<CellT, MaxDistanceT>::new(grid, goal, pallet)?;
    let path_length = to_goal
        .distance_from_start_to(start)
        .ok_or(PathingError::UnreachableGoal)?;
    let summed = to_start.add(&to_goal)?;
    Ok(summed.subtract_scalar(path_length))
}

/// An approximately longest path through the maze: flood from anywhere, flood
/// again from the furthest cell found, walk to the furthest cell of that.
/// Exact on perfect mazes; braided mazes get a good long path, not a proof.
pub fn longest_path<GridIndexType, MaxDistanceT, CellT, Iters>(
    grid: &Grid<GridIndexType, CellT, Iters>,
) -> Option<Vec<CellT::Coord>>
where
    GridIndexType: IndexType,
    MaxDistanceT: MaxDistance,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    let arbitrary_start = grid.iter().next()?;
    let first_distances =
        Distances::<CellT, MaxDistanceT>::new(grid, arbitrary_start, 0).ok()?;

    let long_path_start = first_distances.furthest_points_on_grid()[0];
    let distances_from_start =
        Distances::<CellT, MaxDistanceT>::new(grid, long_path_start, 0).ok()?;
    let end_point = distances_from_start.furthest_points_on_grid()[0];

    distances_from_start.path_to(grid, end_point).ok()
}
