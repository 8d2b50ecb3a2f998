use criterion::{criterion_group, criterion_main, Criterion};
use mazeweave::{
    cells::{Cartesian2DCoordinate, SquareCell},
    generators,
    grid_iterators::RectGridIterators,
    grids::{medium_rect_grid, MediumRectangularGrid},
    pathing,
    units::{ColumnLength, RowLength},
};
use rand::{SeedableRng, XorShiftRng};

fn maze_32() -> MediumRectangularGrid {
    let mut rng = XorShiftRng::from_seed([0x193a_6754, 0xa8a7_d469, 0x9783_0e05, 0x113b_a7bb]);
    let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
    generators::recursive_backtracker(&mut g, &mut rng);
    g
}

fn bench_distances_32_u16(c: &mut Criterion) {
    let g = maze_32();
    c.bench_function("distances_32_u16", move |b| {
        b.iter(|| {
            pathing::Distances::<SquareCell, u32>::new(&g, Cartesian2DCoordinate::new(0, 0), 0)
                .unwrap()
        })
    });
}

fn bench_shortest_path_32_u16(c: &mut Criterion) {
    let g = maze_32();
    let distances =
        pathing::Distances::<SquareCell, u32>::new(&g, Cartesian2DCoordinate::new(0, 0), 0)
            .unwrap();
    let goal = distances.furthest_points_on_grid()[0];
    c.bench_function("shortest_path_32_u16", move |b| {
        b.iter(|| distances.path_to(&g, goal).unwrap())
    });
}

fn bench_longest_path_32_u16(c: &mut Criterion) {
    let g = maze_32();
    c.bench_function("longest_path_32_u16", move |b| {
        b.iter(|| {
            pathing::longest_path::<u16, u32, SquareCell, RectGridIterators>(&g).unwrap()
        })
    });
}

criterion_group!(
    benches,
    bench_distances_32_u16,
    bench_shortest_path_32_u16,
    bench_longest_path_32_u16
);
criterion_main!(benches);
