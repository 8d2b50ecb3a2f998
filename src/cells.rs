use crate::grid_traits::GridDimensions;
use crate::units::{ColumnIndex, RowIndex, RowLength};

use smallvec::SmallVec;
use std::convert::From;
use std::fmt::Debug;
use std::hash::Hash;
use std::iter::FromIterator;
use std::ops::Deref;

pub trait Coordinate: PartialEq + Eq + Hash + Copy + Clone + Debug + Ord + PartialOrd {
    fn from_row_major_index(index: usize, dimensions: &dyn GridDimensions) -> Self;
    fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self;
    fn as_cartesian_2d(&self) -> Cartesian2DCoordinate;
}

pub trait Cell {
    type Coord: Coordinate;
    type Direction: Eq + PartialEq + Copy + Clone + Debug + Hash + DirectionName;
    // Require that the Option fixed size Vec specifically wraps Coord with an Option otherwise
    // we get type errors saying a general CoordinateOptionSmallVec IntoIterator::Item cannot `unwrap`.
    // Deref<Target=[Self::Coord]> gives access to the `iter` of slices.
    type CoordinateSmallVec: FromIterator<Self::Coord> + Deref<Target = [Self::Coord]>;
    type CoordinateOptionSmallVec: FromIterator<Option<Self::Coord>>
        + Deref<Target = [Option<Self::Coord>]>;
    type DirectionSmallVec: FromIterator<Self::Direction> + Deref<Target = [Self::Direction]>;

    /// The possible directions away from this cell, given the grid's dimensions.
    fn offset_directions(
        coord: Option<Self::Coord>,
        dimensions: &dyn GridDimensions,
    ) -> Self::DirectionSmallVec;

    /// A new `Coord` offset 1 cell away in the given direction.
    /// Returns None if the coordinate is not representable on these dimensions.
    fn offset_coordinate(
        coord: Self::Coord,
        dir: Self::Direction,
        dimensions: &dyn GridDimensions,
    ) -> Option<Self::Coord>;

    /// Direction that a sidewinder style run follows along a row.
    fn run_direction() -> Self::Direction;

    /// Direction that closes out a run, perpendicular to `run_direction`.
    fn close_out_direction() -> Self::Direction;
}

/// Stable textual names for directions, used by the persistence records.
pub trait DirectionName: Sized {
    fn name(&self) -> &'static str;
    fn from_name(name: &str) -> Option<Self>;
}

#[derive(Hash, Eq, PartialEq, Copy, Clone, Debug, Ord, PartialOrd)]
pub struct Cartesian2DCoordinate {
    pub x: u32,
    pub y: u32,
}

impl Cartesian2DCoordinate {
    pub fn new(x: u32, y: u32) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate { x, y }
    }
}

impl Coordinate for Cartesian2DCoordinate {
    fn from_row_major_index(index: usize, dimensions: &dyn GridDimensions) -> Cartesian2DCoordinate {
        if let Some(RowLength(width)) = dimensions.row_length(None) {
            // All rows the same length: plain row major order.
            let x = index % width;
            let y = index / width;
            Cartesian2DCoordinate::new(x as u32, y as u32)
        } else {
            // Row lengths vary (polar rings): walk the rows.
            let mut remaining = index;
            let rows = dimensions.rows().0;
            for row in 0..rows {
                let RowLength(len) = dimensions
                    .row_length(Some(RowIndex(row)))
                    .expect("row index within the grid's row count");
                if remaining < len {
                    return Cartesian2DCoordinate::new(remaining as u32, row as u32);
                }
                remaining -= len;
            }
            panic!("row major index {} out of range for these grid dimensions", index);
        }
    }

    #[inline]
    fn from_row_column_indices(col_index: ColumnIndex, row_index: RowIndex) -> Self {
        let (ColumnIndex(col), RowIndex(row)) = (col_index, row_index);
        Cartesian2DCoordinate::new(col as u32, row as u32)
    }

    #[inline]
    fn as_cartesian_2d(&self) -> Cartesian2DCoordinate {
        *self
    }
}

impl From<(u32, u32)> for Cartesian2DCoordinate {
    fn from(x_y_pair: (u32, u32)) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(x_y_pair.0, x_y_pair.1)
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum CompassPrimary {
    North,
    South,
    East,
    West,
}

impl DirectionName for CompassPrimary {
    fn name(&self) -> &'static str {
        match *self {
            CompassPrimary::North => "north",
            CompassPrimary::South => "south",
            CompassPrimary::East => "east",
            CompassPrimary::West => "west",
        }
    }
    fn from_name(name: &str) -> Option<CompassPrimary> {
        match name {
            "north" => Some(CompassPrimary::North),
            "south" => Some(CompassPrimary::South),
            "east" => Some(CompassPrimary::East),
            "west" => Some(CompassPrimary::West),
            _ => None,
        }
    }
}

#[derive(Copy, Clone, Debug)]
pub struct SquareCell;

impl Cell for SquareCell {
    type Coord = Cartesian2DCoordinate;
    type Direction = CompassPrimary;
    type CoordinateSmallVec = SmallVec<[Self::Coord; 4]>;
    type CoordinateOptionSmallVec = SmallVec<[Option<Self::Coord>; 4]>;
    type DirectionSmallVec = SmallVec<[CompassPrimary; 4]>;

    fn offset_directions(_: Option<Self::Coord>, _: &dyn GridDimensions) -> Self::DirectionSmallVec {
        [
            CompassPrimary::North,
            CompassPrimary::South,
            CompassPrimary::East,
            CompassPrimary::West,
        ]
        .iter()
        .cloned()
        .collect()
    }

    fn offset_coordinate(
        coord: Self::Coord,
        dir: Self::Direction,
        _: &dyn GridDimensions,
    ) -> Option<Self::Coord> {
        let (x, y) = (coord.x, coord.y);
        match dir {
            CompassPrimary::North => {
                if y > 0 {
                    Some(Cartesian2DCoordinate { x, y: y - 1 })
                } else {
                    None
                }
            }
            CompassPrimary::South => Some(Cartesian2DCoordinate { x, y: y + 1 }),
            CompassPrimary::East => Some(Cartesian2DCoordinate { x: x + 1, y }),
            CompassPrimary::West => {
                if x > 0 {
                    Some(Cartesian2DCoordinate { x: x - 1, y })
                } else {
                    None
                }
            }
        }
    }

    #[inline]
    fn run_direction() -> Self::Direction {
        CompassPrimary::East
    }

    #[inline]
    fn close_out_direction() -> Self::Direction {
        CompassPrimary::North
    }
}

/// Directions on a circular grid of concentric rings.
///
/// `Out` exists only where a ring does not subdivide going outward, otherwise
/// the two half-width cells are reached with `OutClockwise`/`OutCounterClockwise`.
#[derive(Eq, PartialEq, Copy, Clone, Debug, Hash)]
pub enum ClockDirection {
    In,
    Clockwise,
    CounterClockwise,
    Out,
    OutClockwise,
    OutCounterClockwise,
}

impl DirectionName for ClockDirection {
    fn name(&self) -> &'static str {
        match *self {
            ClockDirection::In => "in",
            ClockDirection::Clockwise => "cw",
            ClockDirection::CounterClockwise => "ccw",
            ClockDirection::Out => "out",
            ClockDirection::OutClockwise => "outcw",
            ClockDirection::OutCounterClockwise => "outccw",
        }
    }
    fn from_name(name: &str) -> Option<ClockDirection> {
        match name {
            "in" => Some(ClockDirection::In),
            "cw" => Some(ClockDirection::Clockwise),
            "ccw" => Some(ClockDirection::CounterClockwise),
            "out" => Some(ClockDirection::Out),
            "outcw" => Some(ClockDirection::OutClockwise),
            "outccw" => Some(ClockDirection::OutCounterClockwise),
            _ => None,
        }
    }
}

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct PolarCell;

impl PolarCell {
    fn ring_length(ring: usize, dimensions: &dyn GridDimensions) -> Option<usize> {
        dimensions.row_length(Some(RowIndex(ring))).map(|l| l.0)
    }
}

impl Cell for PolarCell {
    type Coord = Cartesian2DCoordinate;
    type Direction = ClockDirection;
    type CoordinateSmallVec = SmallVec<[Self::Coord; 6]>;
    type CoordinateOptionSmallVec = SmallVec<[Option<Self::Coord>; 6]>;
    type DirectionSmallVec = SmallVec<[ClockDirection; 6]>;

    fn offset_directions(
        coord: Option<Self::Coord>,
        dimensions: &dyn GridDimensions,
    ) -> Self::DirectionSmallVec {
        let mut dirs: Self::DirectionSmallVec = [
            ClockDirection::In,
            ClockDirection::Clockwise,
            ClockDirection::CounterClockwise,
        ]
        .iter()
        .cloned()
        .collect();

        let subdivides = coord
            .and_then(|c| {
                let this = Self::ring_length(c.y as usize, dimensions)?;
                let next = Self::ring_length(c.y as usize + 1, dimensions)?;
                Some(next > this)
            });
        match subdivides {
            Some(true) => {
                dirs.push(ClockDirection::OutClockwise);
                dirs.push(ClockDirection::OutCounterClockwise);
            }
            Some(false) => dirs.push(ClockDirection::Out),
            // Outermost ring, or no coordinate to judge from: offer every
            // outward direction and let coordinate validation reject them.
            None => {
                dirs.push(ClockDirection::Out);
                dirs.push(ClockDirection::OutClockwise);
                dirs.push(ClockDirection::OutCounterClockwise);
            }
        }
        dirs
    }

    fn offset_coordinate(
        coord: Self::Coord,
        dir: Self::Direction,
        dimensions: &dyn GridDimensions,
    ) -> Option<Self::Coord> {
        let (x, ring) = (coord.x, coord.y as usize);
        let this_len = Self::ring_length(ring, dimensions)?;
        let next_len = Self::ring_length(ring + 1, dimensions);

        match dir {
            ClockDirection::In => {
                if ring == 0 {
                    None
                } else {
                    let prev_len =
                        Self::ring_length(ring - 1, dimensions).expect("inner ring exists");
                    let ratio = (this_len / prev_len) as u32;
                    Some(Cartesian2DCoordinate::new(x / ratio.max(1), ring as u32 - 1))
                }
            }
            // Lateral moves wrap around the ring. A one cell ring has no
            // lateral neighbour at all.
            ClockDirection::Clockwise => {
                if this_len < 2 {
                    None
                } else {
                    Some(Cartesian2DCoordinate::new(
                        (x + 1) % this_len as u32,
                        ring as u32,
                    ))
                }
            }
            ClockDirection::CounterClockwise => {
                if this_len < 2 {
                    None
                } else {
                    Some(Cartesian2DCoordinate::new(
                        (x + this_len as u32 - 1) % this_len as u32,
                        ring as u32,
                    ))
                }
            }
            ClockDirection::Out => match next_len {
                Some(next) if next == this_len => {
                    Some(Cartesian2DCoordinate::new(x, ring as u32 + 1))
                }
                _ => None,
            },
            ClockDirection::OutClockwise => match next_len {
                Some(next) if next > this_len => {
                    Some(Cartesian2DCoordinate::new(x * 2 + 1, ring as u32 + 1))
                }
                _ => None,
            },
            ClockDirection::OutCounterClockwise => match next_len {
                Some(next) if next > this_len => {
                    Some(Cartesian2DCoordinate::new(x * 2, ring as u32 + 1))
                }
                _ => None,
            },
        }
    }

    #[inline]
    fn run_direction() -> Self::Direction {
        ClockDirection::Clockwise
    }

    #[inline]
    fn close_out_direction() -> Self::Direction {
        ClockDirection::In
    }
}
