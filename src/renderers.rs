//! Raster rendering of square cell mazes to RGB images.
//!
//! Draws the wall structure from the link relation and optionally paints each
//! cell through a caller supplied colour lookup over a distance map. The grid
//! is never mutated. Weave tunnels render as the surface passage only; the
//! under passage is hidden, its pass-through cell keeps all four walls except
//! the crossing openings.

use image::{Rgb, RgbImage};

use crate::cells::{Cartesian2DCoordinate, CompassPrimary, SquareCell};
use crate::grid::{Grid, IndexType};
use crate::grid_traits::GridIterators;
use crate::pathing::Distances;

pub type ColourFn<'a> = Box<dyn Fn(u32, Cartesian2DCoordinate) -> Rgb<u8> + 'a>;

pub struct RenderOptions<'a> {
    cell_side_pixels: u32,
    distances: Option<&'a Distances<SquareCell, u32>>,
    colour_fn: Option<ColourFn<'a>>,
}

pub struct RenderOptionsBuilder<'a> {
    options: RenderOptions<'a>,
}

impl<'a> RenderOptionsBuilder<'a> {
    pub fn new() -> RenderOptionsBuilder<'a> {
        RenderOptionsBuilder {
            options: RenderOptions {
                cell_side_pixels: 10,
                distances: None,
                colour_fn: None,
            },
        }
    }

    pub fn cell_side_pixels(mut self, pixels: u8) -> Self {
        self.options.cell_side_pixels = u32::from(pixels.max(2));
        self
    }

    /// Paint cell backgrounds with `colour(distance, coordinate)` looked up
    /// over the given distance map. Cells the map never reached stay white.
    pub fn colour_distances(
        mut self,
        distances: &'a Distances<SquareCell, u32>,
        colour: ColourFn<'a>,
    ) -> Self {
        self.options.distances = Some(distances);
        self.options.colour_fn = Some(colour);
        self
    }

    pub fn build(self) -> RenderOptions<'a> {
        self.options
    }
}

impl<'a> Default for RenderOptionsBuilder<'a> {
    fn default() -> Self {
        RenderOptionsBuilder::new()
    }
}

const WALL: Rgb<u8> = Rgb([0, 0, 0]);
const BACKGROUND: Rgb<u8> = Rgb([0xff, 0xff, 0xff]);

pub fn render_square_grid<GridIndexType, Iters>(
    grid: &Grid<GridIndexType, SquareCell, Iters>,
    options: &RenderOptions,
) -> RgbImage
where
    GridIndexType: IndexType,
    Iters: GridIterators<SquareCell>,
{
    let cell_px = options.cell_side_pixels;
    let columns = grid.columns().0 as u32;
    let rows = grid.rows().0 as u32;
    let mut image = RgbImage::from_pixel(columns * cell_px + 1, rows * cell_px + 1, BACKGROUND);

    for cell in grid.iter() {
        let x1 = cell.x * cell_px;
        let y1 = cell.y * cell_px;
        let x2 = (cell.x + 1) * cell_px;
        let y2 = (cell.y + 1) * cell_px;

        if let (Some(distances), Some(colour_fn)) =
            (options.distances, options.colour_fn.as_ref())
        {
            if let Some(distance) = distances.distance_from_start_to(cell) {
                let colour = colour_fn(distance, cell);
                fill_rect(&mut image, x1 + 1, y1 + 1, x2, y2, colour);
            }
        }
    }

    // Walls drawn over the cell fills. North and west boundary walls are
    // special cased to the cells without those neighbours; interior walls
    // belong to the east/south sides of each cell.
    for cell in grid.iter() {
        let x1 = cell.x * cell_px;
        let y1 = cell.y * cell_px;
        let x2 = (cell.x + 1) * cell_px;
        let y2 = (cell.y + 1) * cell_px;

        if grid.neighbour_at_direction(cell, CompassPrimary::North).is_none() {
            horizontal_line(&mut image, x1, x2, y1);
        }
        if grid.neighbour_at_direction(cell, CompassPrimary::West).is_none() {
            vertical_line(&mut image, y1, y2, x1);
        }
        if !grid.is_neighbour_linked(cell, CompassPrimary::East) {
            vertical_line(&mut image, y1, y2, x2);
        }
        if !grid.is_neighbour_linked(cell, CompassPrimary::South) {
            horizontal_line(&mut image, x1, x2, y2);
        }
    }

    image
}

fn fill_rect(image: &mut RgbImage, x1: u32, y1: u32, x2: u32, y2: u32, colour: Rgb<u8>) {
    for y in y1..y2 {
        for x in x1..x2 {
            image.put_pixel(x, y, colour);
        }
    }
}

fn horizontal_line(image: &mut RgbImage, x1: u32, x2: u32, y: u32) {
    for x in x1..=x2 {
        image.put_pixel(x, y, WALL);
    }
}

fn vertical_line(image: &mut RgbImage, y1: u32, y2: u32, x: u32) {
    for y in y1..=y2 {
        image.put_pixel(x, y, WALL);
    }
}
