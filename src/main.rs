use docopt::Docopt;
use image::Rgb;
use mazeweave::{
    cells::SquareCell,
    generators,
    grid_displays::PathDisplay,
    grid_iterators::RectGridIterators,
    grid_traits::GridDisplay,
    grids::{large_rect_grid, polar_grid, LargeRectangularGrid, PolarGrid},
    kruskal::PassageBuilder,
    pathing, persistence, renderers, units,
};
use rand::{SeedableRng, XorShiftRng};
use serde_derive::Deserialize;
use std::{
    fs::File,
    io,
    io::prelude::*,
    io::BufReader,
    path::Path,
    rc::Rc,
};

const USAGE: &str = "Mazeweave

Usage:
    mazeweave_driver -h | --help
    mazeweave_driver generate (bt|s|ab|w|hk|rb|k) [(--grid-size=<n>|--grid-width=<w> --grid-height=<h>)] [--polar-rings=<r> --polar-columns=<c> --polar-inner-radius=<i>] [--seed=<n>] [--weave=<n>] [--braid=<p>] [--show-distances|--show-path] [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>] [--colour-distances] [--save=<path>]
    mazeweave_driver load <maze-file> [--text-out=<path>] [--image-out=<path>] [--cell-pixels=<n>]

Algorithm codes:
    bt=Binary Tree  s=Sidewinder  ab=Aldous-Broder  w=Wilson
    hk=Hunt and Kill  rb=Recursive Backtracker  k=Randomized Kruskal

Options:
    -h --help                 Show this screen.
    --grid-size=<n>           The rectangular grid size is n * n.
    --grid-width=<w>          The grid width in a w*h grid [default: 20].
    --grid-height=<h>         The grid height in a w*h grid [default: 20].
    --polar-rings=<r>         Generate on a polar grid with r concentric rings instead.
    --polar-columns=<c>       Cell count of the innermost polar ring [default: 8].
    --polar-inner-radius=<i>  Width in cells of the hole at the polar grid centre [default: 2].
    --seed=<n>                Seed the random generator for a reproducible maze.
    --weave=<n>               With k on a rectangular grid: attempt n weave tunnel placements before building.
    --braid=<p>               After generation link up dead ends with probability p (0.0 to 1.0).
    --show-distances          Show the distance to every cell from the longest path's start in the text rendering.
    --show-path               Show the longest path through the maze in the text rendering.
    --text-out=<path>         Write the text rendering to a file instead of stdout.
    --image-out=<path>        Write a PNG rendering of the maze.
    --cell-pixels=<n>         Pixel count to render one cell in the image [default: 10] max 255.
    --colour-distances        Paint each image cell by its distance from the longest path's start.
    --save=<path>             Persist the maze as line oriented json.
";

#[derive(Debug, Deserialize)]
struct MazeArgs {
    cmd_load: bool,
    cmd_bt: bool,
    cmd_s: bool,
    cmd_ab: bool,
    cmd_w: bool,
    cmd_hk: bool,
    cmd_rb: bool,
    cmd_k: bool,
    arg_maze_file: String,
    flag_grid_size: Option<usize>,
    flag_grid_width: usize,
    flag_grid_height: usize,
    flag_polar_rings: Option<usize>,
    flag_polar_columns: usize,
    flag_polar_inner_radius: usize,
    flag_seed: Option<u32>,
    flag_weave: Option<usize>,
    flag_braid: Option<f64>,
    flag_show_distances: bool,
    flag_show_path: bool,
    flag_text_out: String,
    flag_image_out: String,
    flag_cell_pixels: u8,
    flag_colour_distances: bool,
    flag_save: String,
}

// We'll put our errors in an `errors` module, and other modules in
// this crate will `use errors::*;` to get access to everything
// `error_chain!` creates.
mod errors {
    use error_chain::*;
    error_chain! {
        foreign_links {
            DocOptFailure(::docopt::Error);
            Io(::std::io::Error);
            ImageWriteError(::image::ImageError);
            MazeFileError(::mazeweave::persistence::PersistenceError);
        }
    }
}
use crate::errors::*;
use error_chain::bail;

fn main() -> Result<()> {
    let args: MazeArgs = Docopt::new(USAGE).and_then(|d| d.deserialize())?;

    if args.cmd_load {
        return load_maze(&args);
    }

    let mut rng = make_rng(args.flag_seed);
    let code = algorithm_code(&args);
    let algorithm_name = generators::ALGORITHM_NAMES
        .get(code)
        .ok_or_else(|| format!("unknown algorithm code {}", code))?;

    if let Some(rings) = args.flag_polar_rings {
        if !args.flag_text_out.is_empty() || !args.flag_image_out.is_empty() {
            bail!("text and image rendering are only available for rectangular grids");
        }
        let mut grid = polar_grid(
            args.flag_polar_inner_radius,
            units::RowsCount(rings),
            args.flag_polar_columns,
        )
        .ok_or("polar grid parameters out of range")?;

        generate_polar(&mut grid, code, &mut rng);
        if let Some(p) = args.flag_braid {
            generators::braid(&mut grid, p, &mut rng);
        }

        println!(
            "{} polar maze: {} rings, {} cells, {} dead ends",
            algorithm_name,
            rings,
            grid.size(),
            generators::dead_end_cells(&grid).len()
        );

        if !args.flag_save.is_empty() {
            let file = File::create(&args.flag_save)?;
            persistence::save_polar_grid(&grid, args.flag_polar_inner_radius, file)?;
        }
        return Ok(());
    }

    let (width, height) = if let Some(square_grid_size) = args.flag_grid_size {
        (square_grid_size, square_grid_size)
    } else {
        (args.flag_grid_width, args.flag_grid_height)
    };
    if width == 0 || height == 0 {
        bail!("grid dimensions must be at least 1x1");
    }
    let mut grid = large_rect_grid(units::RowLength(width), units::ColumnLength(height))
        .ok_or("rectangular grid dimensions out of range")?;

    let tunnels = generate_rect(&mut grid, code, args.flag_weave, &mut rng);
    if let Some(p) = args.flag_braid {
        generators::braid(&mut grid, p, &mut rng);
    }

    println!(
        "{} maze: {}x{}, {} dead ends, {} weave tunnels",
        algorithm_name,
        width,
        height,
        generators::dead_end_cells(&grid).len(),
        tunnels
    );

    if !args.flag_save.is_empty() {
        let file = File::create(&args.flag_save)?;
        persistence::save_rect_grid(&grid, file)?;
    }

    render_rect_text(&mut grid, &args)?;
    render_rect_image(&grid, &args)?;

    Ok(())
}

fn algorithm_code(args: &MazeArgs) -> &'static str {
    if args.cmd_bt {
        "bt"
    } else if args.cmd_s {
        "s"
    } else if args.cmd_ab {
        "ab"
    } else if args.cmd_w {
        "w"
    } else if args.cmd_hk {
        "hk"
    } else if args.cmd_rb {
        "rb"
    } else {
        "k"
    }
}

fn make_rng(seed: Option<u32>) -> XorShiftRng {
    match seed {
        Some(s) => XorShiftRng::from_seed([s.max(1), 0x9e37_79b9, 0x8f1b_bcdc, 0xca62_c1d6]),
        None => rand::weak_rng(),
    }
}

/// Runs the chosen algorithm; returns how many weave tunnels were dug.
fn generate_rect(
    grid: &mut LargeRectangularGrid,
    code: &str,
    weave: Option<usize>,
    rng: &mut XorShiftRng,
) -> usize {
    match code {
        "bt" => generators::binary_tree(grid, rng),
        "s" => generators::sidewinder(grid, rng),
        "ab" => generators::aldous_broder(grid, rng),
        "w" => generators::wilson(grid, rng),
        "hk" => generators::hunt_and_kill(grid, rng),
        "rb" => generators::recursive_backtracker(grid, rng),
        "k" => {
            let mut builder = PassageBuilder::new(grid);
            let tunnels = match weave {
                Some(attempts) => (0..attempts)
                    .filter(|_| builder.add_random_passage(rng))
                    .count(),
                None => 0,
            };
            builder.build(rng);
            return tunnels;
        }
        _ => unreachable!("docopt only accepts known algorithm codes"),
    }
    0
}

fn generate_polar(grid: &mut PolarGrid, code: &str, rng: &mut XorShiftRng) {
    match code {
        "bt" => generators::binary_tree(grid, rng),
        "s" => generators::sidewinder(grid, rng),
        "ab" => generators::aldous_broder(grid, rng),
        "w" => generators::wilson(grid, rng),
        "hk" => generators::hunt_and_kill(grid, rng),
        "rb" => generators::recursive_backtracker(grid, rng),
        // Weave tunnels need the compass directions of a rectangular grid.
        "k" => mazeweave::kruskal::kruskal(grid, rng),
        _ => unreachable!("docopt only accepts known algorithm codes"),
    }
}

fn render_rect_text(grid: &mut LargeRectangularGrid, args: &MazeArgs) -> Result<()> {
    if args.flag_show_distances || args.flag_show_path {
        let path = pathing::longest_path::<u32, u32, SquareCell, RectGridIterators>(grid)
            .ok_or("maze has no path to display")?;

        if args.flag_show_distances {
            let distances = pathing::Distances::<SquareCell, u32>::new(grid, path[0], 0)
                .map_err(|e| format!("distance flood failed: {:?}", e))?;
            grid.set_grid_display(Some(Rc::new(distances) as Rc<dyn GridDisplay<SquareCell>>));
        } else {
            let display_path = Rc::new(PathDisplay::<SquareCell>::new(&path));
            grid.set_grid_display(Some(display_path as Rc<dyn GridDisplay<SquareCell>>));
        }
    }

    if args.flag_text_out.is_empty() {
        println!("{}", grid);
    } else {
        write_text_to_file(&format!("{}", grid), &args.flag_text_out)
            .chain_err(|| format!("Failed to write maze to text file {}", args.flag_text_out))?;
    }
    Ok(())
}

fn render_rect_image(grid: &LargeRectangularGrid, args: &MazeArgs) -> Result<()> {
    if args.flag_image_out.is_empty() {
        return Ok(());
    }

    let distances = if args.flag_colour_distances {
        let path = pathing::longest_path::<u32, u32, SquareCell, RectGridIterators>(grid)
            .ok_or("maze has no path to colour by")?;
        Some(
            pathing::Distances::<SquareCell, u32>::new(grid, path[0], 0)
                .map_err(|e| format!("distance flood failed: {:?}", e))?,
        )
    } else {
        None
    };

    let mut builder = renderers::RenderOptionsBuilder::new().cell_side_pixels(args.flag_cell_pixels);
    if let Some(ref distances) = distances {
        let furthest = distances.max().max(1);
        builder = builder.colour_distances(
            distances,
            Box::new(move |d, _| {
                // White at the start shading to deep red at the furthest cell.
                let heat = (d * 200 / furthest) as u8;
                Rgb([0xff, 0xff - heat, 0xff - heat])
            }),
        );
    }
    let options = builder.build();

    let image = renderers::render_square_grid(grid, &options);
    image.save(Path::new(&args.flag_image_out))?;
    Ok(())
}

fn load_maze(args: &MazeArgs) -> Result<()> {
    let file = File::open(&args.arg_maze_file)
        .chain_err(|| format!("Cannot open maze file {}", args.arg_maze_file))?;
    let loaded = persistence::load_grid(BufReader::new(file))?;

    match loaded {
        persistence::LoadedGrid::Rectangular(mut grid) => {
            println!(
                "reloaded rectangular maze: {} cells, {} links, {} dead ends",
                grid.size(),
                grid.links_count(),
                generators::dead_end_cells(&grid).len()
            );
            render_rect_text(&mut grid, args)?;
            render_rect_image(&grid, args)?;
        }
        persistence::LoadedGrid::Polar(grid) => {
            println!(
                "reloaded polar maze: {} cells, {} links, {} dead ends",
                grid.size(),
                grid.links_count(),
                generators::dead_end_cells(&grid).len()
            );
        }
    }
    Ok(())
}

fn write_text_to_file(data: &str, file_name: &str) -> io::Result<()> {
    let mut f = File::create(file_name)?;
    f.write_all(data.as_bytes())?;
    Ok(())
}
