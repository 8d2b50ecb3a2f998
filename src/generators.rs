//! Maze generation algorithms.
//!
//! Every generator takes an unlinked grid and a caller supplied random number
//! generator, and carves passages until the grid is a perfect maze: connected,
//! acyclic, one unique route between any two cells. The same code runs on
//! rectangular and polar grids through the `Cell` trait. Each algorithm has its
//! own statistical bias, documented per function.

use lazy_static::lazy_static;
use rand::{Rng, XorShiftRng};

use crate::cells::{Cell, Coordinate};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridIterators;
use crate::utils::{fnv_hashmap, fnv_hashset, FnvHashMap};

lazy_static! {
    /// Short selection codes for the command line, mapped to display names.
    pub static ref ALGORITHM_NAMES: FnvHashMap<&'static str, &'static str> = {
        let mut names = fnv_hashmap(8);
        names.insert("bt", "Binary Tree");
        names.insert("s", "Sidewinder");
        names.insert("ab", "Aldous-Broder");
        names.insert("w", "Wilson");
        names.insert("hk", "Hunt and Kill");
        names.insert("rb", "Recursive Backtracker");
        names.insert("k", "Randomized Kruskal");
        names
    };
}

/// The next cell along a sidewinder style run: one step in the topology's run
/// direction, stopping where the row would wrap around (polar rings are
/// circular; letting a run wrap would close a loop and break the spanning
/// tree guarantee).
fn run_next<GridIndexType, CellT, Iters>(
    grid: &Grid<GridIndexType, CellT, Iters>,
    coord: CellT::Coord,
) -> Option<CellT::Coord>
where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    grid.neighbour_at_direction(coord, CellT::run_direction())
        .filter(|next| {
            let (n, c) = (next.as_cartesian_2d(), coord.as_cartesian_2d());
            n.y == c.y && n.x == c.x + 1
        })
}

/// Apply the binary tree maze generation algorithm to a grid.
///
/// Each cell chooses uniformly between its close-out neighbour (north on a
/// rectangular grid, inward on a polar grid) and its run neighbour (east /
/// clockwise), when they exist. O(cells); heavily biased - the boundary row
/// with no close-out neighbour becomes one unbroken corridor, and no loop is
/// ever produced.
pub fn binary_tree<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    for cell_coord in grid.iter() {
        let close_out = grid.neighbour_at_direction(cell_coord, CellT::close_out_direction());
        let run = run_next(grid, cell_coord);
        let candidates: Vec<CellT::Coord> =
            [close_out, run].iter().filter_map(|c| *c).collect();

        if !candidates.is_empty() {
            let link_coord = candidates[rng.gen::<usize>() % candidates.len()];
            grid.link(cell_coord, link_coord)
                .expect("cells adjacent on the grid must be linkable");
        }
    }
}

/// Apply the sidewinder maze generation algorithm to the grid.
///
/// Rows are visited in run direction accumulating a run of cells. At each cell
/// a fair coin decides whether to close the run out - linking one random run
/// member towards the close-out direction - or to extend the run by one cell.
/// Runs always close at the row boundary; cells on the close-out boundary
/// never close early. O(cells), biased toward long horizontal corridors.
pub fn sidewinder<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    for coordinates_line in grid.iter_row() {
        let mut run = vec![];

        for coord in coordinates_line {
            run.push(coord);

            let next_in_run = run_next(grid, coord);
            let at_run_end_boundary = next_in_run.is_none();
            let at_close_out_boundary = grid
                .neighbour_at_direction(coord, CellT::close_out_direction())
                .is_none();

            let should_close_out =
                at_run_end_boundary || (!at_close_out_boundary && rng.gen()); // coin flip

            if should_close_out {
                let sample = rng.gen::<usize>() % run.len();
                let run_member = run[sample];

                if let Some(close_out_coord) =
                    grid.neighbour_at_direction(run_member, CellT::close_out_direction())
                {
                    grid.link(run_member, close_out_coord)
                        .expect("cells adjacent on the grid must be linkable");
                }
                run.clear();
            } else {
                grid.link(coord, next_in_run.unwrap())
                    .expect("cells adjacent on the grid must be linkable");
            }
        }
    }
}

/// Apply the Aldous-Broder maze generation algorithm to the grid.
///
/// A pure random walk: step to a uniformly random neighbour, and carve a
/// passage whenever the neighbour has never been visited. Produces an unbiased
/// uniform spanning tree. Expected running time is the cover time of the walk,
/// superlinear in the cell count - slow on large grids, by nature not defect.
pub fn aldous_broder<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    if grid.size() <= 1 {
        return;
    }

    let mut current = grid.random_cell(rng);
    let mut unvisited_count = grid.size() - 1;
    while unvisited_count > 0 {
        let neighbours = grid.neighbours(current);
        let next = *rng
            .choose(&*neighbours)
            .expect("every cell of a multi cell grid has a neighbour");

        if grid.links_degree(next).expect("neighbour coordinate is valid") == 0 {
            grid.link(current, next)
                .expect("cells adjacent on the grid must be linkable");
            unvisited_count -= 1;
        }
        current = next;
    }
}

/// Apply Wilson's maze generation algorithm to the grid.
///
/// Loop erased random walks from unvisited cells to the visited region; the
/// walk path is carved wholesale once it touches a visited cell. Like
/// Aldous-Broder the spanning tree is uniformly distributed over all spanning
/// trees, but in practice it converges much faster.
pub fn wilson<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    if grid.size() <= 1 {
        return;
    }

    let mut unvisited_order: Vec<CellT::Coord> = grid.iter().collect();
    let mut unvisited = fnv_hashset(unvisited_order.len());
    unvisited.extend(unvisited_order.iter().cloned());

    let first_visited = grid.random_cell(rng);
    unvisited.remove(&first_visited);

    while !unvisited.is_empty() {
        // Uniform pick from the unvisited set: sample the shrinking order
        // vector, discarding entries that have since been visited.
        let mut cell = loop {
            let index = rng.gen::<usize>() % unvisited_order.len();
            let candidate = unvisited_order[index];
            if unvisited.contains(&candidate) {
                break candidate;
            }
            unvisited_order.swap_remove(index);
        };

        // Loop erased random walk until it reaches any visited cell.
        let mut path = vec![cell];
        while unvisited.contains(&cell) {
            let neighbours = grid.neighbours(cell);
            cell = *rng
                .choose(&*neighbours)
                .expect("every cell of a multi cell grid has a neighbour");

            if let Some(revisit_position) = path.iter().position(|&c| c == cell) {
                path.truncate(revisit_position + 1);
            } else {
                path.push(cell);
            }
        }

        for i in 0..path.len() - 1 {
            grid.link(path[i], path[i + 1])
                .expect("walk steps are between adjacent cells");
            unvisited.remove(&path[i]);
        }
    }
}

/// Apply the hunt and kill maze generation algorithm to the grid.
///
/// Random walk that only ever moves into unvisited cells; when boxed in, scan
/// the grid in a fixed order for the first unvisited cell bordering the
/// visited region, link the two and resume from there. O(cells) amortised
/// scanning; long corridors with occasional short dead end clusters.
pub fn hunt_and_kill<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    if grid.size() == 0 {
        return;
    }

    let degree = |g: &Grid<GridIndexType, CellT, Iters>, c: CellT::Coord| {
        g.links_degree(c).expect("coordinate from the grid is valid")
    };

    let mut current = Some(grid.random_cell(rng));
    while let Some(cell) = current {
        let unvisited_neighbours: Vec<CellT::Coord> = grid
            .neighbours(cell)
            .iter()
            .cloned()
            .filter(|&n| degree(grid, n) == 0)
            .collect();

        if !unvisited_neighbours.is_empty() {
            let next = *rng.choose(&unvisited_neighbours).unwrap();
            grid.link(cell, next)
                .expect("cells adjacent on the grid must be linkable");
            current = Some(next);
        } else {
            // Hunt: first unvisited cell adjacent to the visited region.
            current = None;
            for candidate in grid.iter() {
                if degree(grid, candidate) != 0 {
                    continue;
                }
                let visited_neighbours: Vec<CellT::Coord> = grid
                    .neighbours(candidate)
                    .iter()
                    .cloned()
                    .filter(|&n| degree(grid, n) != 0)
                    .collect();
                if !visited_neighbours.is_empty() {
                    let joined = *rng.choose(&visited_neighbours).unwrap();
                    grid.link(candidate, joined)
                        .expect("cells adjacent on the grid must be linkable");
                    current = Some(candidate);
                    break;
                }
            }
        }
    }
}

/// Apply the recursive backtracker maze generation algorithm to the grid.
///
/// Depth first search with an explicit stack (no recursion, so grid size is
/// not limited by thread stack depth). From the top of the stack move to a
/// random unvisited neighbour, pushing it; pop when boxed in. Long winding
/// corridors with the classic backtracking bias.
pub fn recursive_backtracker<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    if grid.size() == 0 {
        return;
    }

    let mut stack = vec![grid.random_cell(rng)];

    while let Some(&current) = stack.last() {
        let unvisited_neighbours: Vec<CellT::Coord> = grid
            .neighbours(current)
            .iter()
            .cloned()
            .filter(|&n| grid.links_degree(n).expect("coordinate from the grid is valid") == 0)
            .collect();

        if unvisited_neighbours.is_empty() {
            stack.pop();
        } else {
            let next = *rng.choose(&unvisited_neighbours).unwrap();
            grid.link(current, next)
                .expect("cells adjacent on the grid must be linkable");
            stack.push(next);
        }
    }
}

/// Cells with exactly one passage.
pub fn dead_end_cells<GridIndexType, CellT, Iters>(
    grid: &Grid<GridIndexType, CellT, Iters>,
) -> Vec<CellT::Coord>
where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    grid.iter()
        .filter(|&c| grid.links_degree(c) == Some(1))
        .collect()
}

/// Braid the maze: remove dead ends by linking them to one extra neighbour.
///
/// Each dead end is kept with probability `1 - p` (`p` of 1.0 removes every
/// dead end that can be removed). A neighbour that is itself a dead end is
/// preferred as the new connection, mutually curing two dead ends at once.
/// Braiding introduces cycles - the maze is no longer perfect afterwards.
pub fn braid<GridIndexType, CellT, Iters>(
    grid: &mut Grid<GridIndexType, CellT, Iters>,
    p: f64,
    rng: &mut XorShiftRng,
) where
    GridIndexType: IndexType,
    CellT: Cell,
    Iters: GridIterators<CellT>,
{
    let mut dead_ends = dead_end_cells(grid);
    rng.shuffle(&mut dead_ends);

    for cell in dead_ends {
        // An earlier braid link may already have cured this dead end.
        if grid.links_degree(cell) != Some(1) || rng.gen::<f64>() > p {
            continue;
        }

        let linked = grid.links(cell).expect("dead end coordinate is valid");
        let possible_links: Vec<CellT::Coord> = grid
            .neighbours(cell)
            .iter()
            .cloned()
            .filter(|n| !linked.iter().any(|l| l == n))
            .collect();
        if possible_links.is_empty() {
            continue;
        }

        let other_dead_ends: Vec<CellT::Coord> = possible_links
            .iter()
            .cloned()
            .filter(|&n| grid.links_degree(n) == Some(1))
            .collect();

        let new_link = if !other_dead_ends.is_empty() {
            *rng.choose(&other_dead_ends).unwrap()
        } else {
            *rng.choose(&possible_links).unwrap()
        };
        grid.link(cell, new_link)
            .expect("cells adjacent on the grid must be linkable");
    }
}
