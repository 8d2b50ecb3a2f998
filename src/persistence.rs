//! Line oriented JSON save and load of generated mazes.
//!
//! The first line names the grid kind and its construction parameters; every
//! further line is one cell record: coordinate, linked neighbours by direction
//! name, and the weave tunnel marker if the cell carries one. Only the link
//! relation and tunnel markers are persisted - adjacency is always recomputed
//! from the dimensions on load, with tunnel rewiring re-derived from the
//! markers.

use std::error::Error;
use std::fmt;
use std::io;
use std::io::{BufRead, Write};

use serde_derive::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::cells::{Cartesian2DCoordinate, Cell, CompassPrimary, DirectionName, SquareCell};
use crate::grid::{Grid, IndexType, TunnelOrientation};
use crate::grid_traits::GridIterators;
use crate::grids::{large_rect_grid, polar_grid, LargeRectangularGrid, PolarGrid};
use crate::units::{ColumnLength, RowIndex, RowLength, RowsCount};

#[derive(Debug)]
pub enum PersistenceError {
    Io(io::Error),
    Json(serde_json::Error),
    UnknownGridKind(String),
    InvalidRecord(String),
}

impl fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match *self {
            PersistenceError::Io(ref e) => write!(f, "maze file io error: {}", e),
            PersistenceError::Json(ref e) => write!(f, "maze file is not valid json: {}", e),
            PersistenceError::UnknownGridKind(ref k) => {
                write!(f, "no grid constructor for the recorded kind: {}", k)
            }
            PersistenceError::InvalidRecord(ref r) => {
                write!(f, "cell record does not fit the grid: {}", r)
            }
        }
    }
}

impl Error for PersistenceError {}

impl From<io::Error> for PersistenceError {
    fn from(e: io::Error) -> PersistenceError {
        PersistenceError::Io(e)
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(e: serde_json::Error) -> PersistenceError {
        PersistenceError::Json(e)
    }
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(tag = "grid", rename_all = "snake_case")]
enum GridHeader {
    Rectangular {
        width: usize,
        height: usize,
    },
    Polar {
        inner_radius: usize,
        rings: usize,
        first_ring_columns: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
struct CellRecord {
    cell: [u32; 2],
    links: BTreeMap<String, [u32; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tunnel: Option<String>,
}

/// A reloaded maze, whichever kind the file recorded.
#[derive(Debug)]
pub enum LoadedGrid {
    Rectangular(LargeRectangularGrid),
    Polar(PolarGrid),
}

pub fn save_rect_grid<W, GridIndexType, Iters>(
    grid: &Grid<GridIndexType, SquareCell, Iters>,
    mut writer: W,
) -> Result<(), PersistenceError>
where
    W: Write,
    GridIndexType: IndexType,
    Iters: GridIterators<SquareCell>,
{
    let header = GridHeader::Rectangular {
        width: grid.row_length().expect("rectangular grids have one row length").0,
        height: grid.column_length().0,
    };
    writeln!(writer, "{}", serde_json::to_string(&header)?)?;
    write_cell_records(grid, writer)
}

/// The inner radius is a construction parameter that the grid's dimensions do
/// not expose back, so the caller supplies it again.
pub fn save_polar_grid<W>(
    grid: &PolarGrid,
    inner_radius: usize,
    mut writer: W,
) -> Result<(), PersistenceError>
where
    W: Write,
{
    let first_ring_columns = grid
        .dimensions()
        .row_length(Some(RowIndex(0)))
        .map(|l| l.0)
        .unwrap_or(0);
    let header = GridHeader::Polar {
        inner_radius,
        rings: grid.rows().0,
        first_ring_columns,
    };
    writeln!(writer, "{}", serde_json::to_string(&header)?)?;
    write_cell_records(grid, writer)
}

fn write_cell_records<W, GridIndexType, CellT, Iters>(
    grid: &Grid<GridIndexType, CellT, Iters>,
    mut writer: W,
) -> Result<(), PersistenceError>
where
    W: Write,
    GridIndexType: IndexType,
    CellT: Cell,
    CellT::Coord: Coordinate2d,
    Iters: GridIterators<CellT>,
{
    for cell in grid.iter() {
        let mut links = BTreeMap::new();
        let directions = CellT::offset_directions(Some(cell), grid.dimensions().as_ref());
        for dir in directions.iter() {
            if let Some(neighbour) = grid.neighbour_at_direction(cell, *dir) {
                if grid.is_linked(cell, neighbour) {
                    links.insert(dir.name().to_owned(), neighbour.to_pair());
                }
            }
        }

        let tunnel = grid.tunnel(cell).map(|orientation| {
            match orientation {
                TunnelOrientation::NorthSouth => "ns",
                TunnelOrientation::EastWest => "ew",
            }
            .to_owned()
        });

        let record = CellRecord {
            cell: cell.to_pair(),
            links,
            tunnel,
        };
        writeln!(writer, "{}", serde_json::to_string(&record)?)?;
    }
    Ok(())
}

pub fn load_grid<R: BufRead>(reader: R) -> Result<LoadedGrid, PersistenceError> {
    let mut lines = reader.lines();
    let header_line = lines
        .next()
        .ok_or_else(|| PersistenceError::InvalidRecord("empty maze file".to_owned()))??;
    let header: GridHeader = serde_json::from_str(&header_line).map_err(|_| {
        // Surface the kind when it is recognisably a header with a bad tag.
        PersistenceError::UnknownGridKind(header_line.clone())
    })?;

    let records = read_cell_records(lines)?;

    match header {
        GridHeader::Rectangular { width, height } => {
            let mut grid = large_rect_grid(RowLength(width), ColumnLength(height)).ok_or_else(
                || PersistenceError::InvalidRecord("rectangular grid too large".to_owned()),
            )?;
            restore_tunnels(&mut grid, &records)?;
            restore_links(&mut grid, &records)?;
            Ok(LoadedGrid::Rectangular(grid))
        }
        GridHeader::Polar {
            inner_radius,
            rings,
            first_ring_columns,
        } => {
            let mut grid = polar_grid(inner_radius, RowsCount(rings), first_ring_columns)
                .ok_or_else(|| {
                    PersistenceError::InvalidRecord("polar grid parameters invalid".to_owned())
                })?;
            restore_links(&mut grid, &records)?;
            Ok(LoadedGrid::Polar(grid))
        }
    }
}

fn read_cell_records<I>(lines: I) -> Result<Vec<CellRecord>, PersistenceError>
where
    I: Iterator<Item = io::Result<String>>,
{
    let mut records = vec![];
    for line in lines {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        records.push(serde_json::from_str(&line)?);
    }
    Ok(records)
}

/// Re-derive the weave tunnel neighbour rewiring from the persisted markers.
/// Must run before the links are restored, tunnel links join non adjacent
/// cells until their neighbourhood is rewired.
fn restore_tunnels<GridIndexType, Iters>(
    grid: &mut Grid<GridIndexType, SquareCell, Iters>,
    records: &[CellRecord],
) -> Result<(), PersistenceError>
where
    GridIndexType: IndexType,
    Iters: GridIterators<SquareCell>,
{
    for record in records {
        let here = Cartesian2DCoordinate::new(record.cell[0], record.cell[1]);
        if record.tunnel.is_some() && (here.x == 0 || here.y == 0) {
            return Err(PersistenceError::InvalidRecord(format!(
                "tunnel marker on boundary cell {:?}",
                record.cell
            )));
        }
        match record.tunnel.as_deref() {
            None => {}
            Some("ns") => {
                let north = Cartesian2DCoordinate::new(here.x, here.y - 1);
                let south = Cartesian2DCoordinate::new(here.x, here.y + 1);
                grid.rewire_neighbour(north, CompassPrimary::South, Some(south));
                grid.rewire_neighbour(south, CompassPrimary::North, Some(north));
                grid.rewire_neighbour(here, CompassPrimary::North, None);
                grid.rewire_neighbour(here, CompassPrimary::South, None);
                grid.set_tunnel(here, TunnelOrientation::NorthSouth);
            }
            Some("ew") => {
                let east = Cartesian2DCoordinate::new(here.x + 1, here.y);
                let west = Cartesian2DCoordinate::new(here.x - 1, here.y);
                grid.rewire_neighbour(east, CompassPrimary::West, Some(west));
                grid.rewire_neighbour(west, CompassPrimary::East, Some(east));
                grid.rewire_neighbour(here, CompassPrimary::East, None);
                grid.rewire_neighbour(here, CompassPrimary::West, None);
                grid.set_tunnel(here, TunnelOrientation::EastWest);
            }
            Some(other) => {
                return Err(PersistenceError::InvalidRecord(format!(
                    "unknown tunnel marker {:?}",
                    other
                )));
            }
        }
    }
    Ok(())
}

fn restore_links<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    records: &[CellRecord],
) -> Result<(), PersistenceError>
where
    GridIndexType: IndexType,
    CellT: Cell,
    CellT::Coord: Coordinate2d,
    Iters: GridIterators<CellT>,
{
    for record in records {
        let cell = CellT::Coord::from_pair(record.cell);
        for (direction_name, neighbour_pair) in &record.links {
            if CellT::Direction::from_name(direction_name).is_none() {
                return Err(PersistenceError::InvalidRecord(format!(
                    "unknown direction {:?}",
                    direction_name
                )));
            }
            let neighbour = CellT::Coord::from_pair(*neighbour_pair);
            // Each passage appears in both end cells' records; linking twice
            // collapses to one undirected edge.
            grid.link(cell, neighbour).map_err(|e| {
                PersistenceError::InvalidRecord(format!(
                    "link {:?} -> {:?} rejected: {:?}",
                    cell, neighbour, e
                ))
            })?;
        }
    }
    Ok(())
}

/// Coordinates that round trip through a `[x, y]` pair in the records.
pub trait Coordinate2d {
    fn to_pair(&self) -> [u32; 2];
    fn from_pair(pair: [u32; 2]) -> Self;
}

impl Coordinate2d for Cartesian2DCoordinate {
    fn to_pair(&self) -> [u32; 2] {
        [self.x, self.y]
    }
    fn from_pair(pair: [u32; 2]) -> Cartesian2DCoordinate {
        Cartesian2DCoordinate::new(pair[0], pair[1])
    }
}

#[cfg(test)]
mod tests {

    use rand::{SeedableRng, XorShiftRng};
    use std::collections::BTreeSet;
    use std::io::Cursor;

    use super::*;
    use crate::generators;
    use crate::kruskal::PassageBuilder;
    use crate::units::{ColumnLength, RowLength, RowsCount};

    fn rng(seed: u32) -> XorShiftRng {
        XorShiftRng::from_seed([seed, 0x193a6754, 0xa8a7d469, 0x97830e05])
    }

    fn edge_set<GridIndexType, CellT, Iters>(
        grid: &Grid<GridIndexType, CellT, Iters>,
    ) -> BTreeSet<(CellT::Coord, CellT::Coord)>
    where
        GridIndexType: IndexType,
        CellT: Cell,
        Iters: GridIterators<CellT>,
    {
        grid.iter_links()
            .map(|(a, b)| if a <= b { (a, b) } else { (b, a) })
            .collect()
    }

    #[test]
    fn rect_round_trip_preserves_links_exactly() {
        let mut grid = large_rect_grid(RowLength(6), ColumnLength(5)).unwrap();
        generators::recursive_backtracker(&mut grid, &mut rng(1));

        let mut buffer = Vec::new();
        save_rect_grid(&grid, &mut buffer).expect("save failed");

        match load_grid(Cursor::new(buffer)).expect("load failed") {
            LoadedGrid::Rectangular(reloaded) => {
                assert_eq!(edge_set(&grid), edge_set(&reloaded));
                assert_eq!(grid.size(), reloaded.size());
            }
            LoadedGrid::Polar(_) => panic!("rectangular maze reloaded as polar"),
        }
    }

    #[test]
    fn woven_round_trip_restores_tunnels_and_rewiring() {
        let mut grid = large_rect_grid(RowLength(8), ColumnLength(8)).unwrap();
        {
            let mut builder = PassageBuilder::new(&mut grid);
            assert!(builder.add_random_passage(&mut rng(2)));
            builder.build(&mut rng(3));
        }

        let mut buffer = Vec::new();
        save_rect_grid(&grid, &mut buffer).expect("save failed");

        let reloaded = match load_grid(Cursor::new(buffer)).expect("load failed") {
            LoadedGrid::Rectangular(g) => g,
            LoadedGrid::Polar(_) => panic!("rectangular maze reloaded as polar"),
        };
        assert_eq!(edge_set(&grid), edge_set(&reloaded));

        let tunnels: Vec<_> = grid.iter().filter(|&c| grid.tunnel(c).is_some()).collect();
        assert_eq!(tunnels.len(), 1);
        let here = tunnels[0];
        assert_eq!(grid.tunnel(here), reloaded.tunnel(here));
        // Adjacency was recomputed, tunnel rewiring included.
        for dir in &[
            CompassPrimary::North,
            CompassPrimary::South,
            CompassPrimary::East,
            CompassPrimary::West,
        ] {
            assert_eq!(
                grid.neighbour_at_direction(here, *dir),
                reloaded.neighbour_at_direction(here, *dir)
            );
        }
    }

    #[test]
    fn polar_round_trip_preserves_links_exactly() {
        let mut grid = polar_grid(2, RowsCount(4), 8).unwrap();
        generators::wilson(&mut grid, &mut rng(4));

        let mut buffer = Vec::new();
        save_polar_grid(&grid, 2, &mut buffer).expect("save failed");

        match load_grid(Cursor::new(buffer)).expect("load failed") {
            LoadedGrid::Polar(reloaded) => {
                assert_eq!(edge_set(&grid), edge_set(&reloaded));
                assert_eq!(grid.size(), reloaded.size());
            }
            LoadedGrid::Rectangular(_) => panic!("polar maze reloaded as rectangular"),
        }
    }

    #[test]
    fn unknown_grid_kind_is_unrecoverable() {
        let file = "{\"grid\":\"triangular\",\"sides\":3}\n";
        match load_grid(Cursor::new(file.as_bytes())) {
            Err(PersistenceError::UnknownGridKind(_)) => {}
            other => panic!("expected UnknownGridKind, got {:?}", other),
        }
    }

    #[test]
    fn corrupt_cell_record_is_rejected() {
        // Links a pair of cells that are not adjacent on a 3x3 grid.
        let file = "{\"grid\":\"rectangular\",\"width\":3,\"height\":3}\n\
                    {\"cell\":[0,0],\"links\":{\"east\":[2,2]}}\n";
        match load_grid(Cursor::new(file.as_bytes())) {
            Err(PersistenceError::InvalidRecord(_)) => {}
            other => panic!("expected InvalidRecord, got {:?}", other),
        }
    }
}
