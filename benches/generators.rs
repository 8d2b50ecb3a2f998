use criterion::{criterion_group, criterion_main, Criterion};
use mazeweave::{
    generators,
    grids::medium_rect_grid,
    kruskal,
    units::{ColumnLength, RowLength},
};
use rand::{SeedableRng, XorShiftRng};

fn bench_rng() -> XorShiftRng {
    XorShiftRng::from_seed([0x193a_6754, 0xa8a7_d469, 0x9783_0e05, 0x113b_a7bb])
}

fn bench_binary_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("binary_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::binary_tree(&mut g, &mut rng)
        })
    });
}

fn bench_sidewinder_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("sidewinder_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::sidewinder(&mut g, &mut rng)
        })
    });
}

fn bench_aldous_broder_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("aldous_broder_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::aldous_broder(&mut g, &mut rng)
        })
    });
}

fn bench_wilson_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("wilson_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::wilson(&mut g, &mut rng)
        })
    });
}

fn bench_hunt_and_kill_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("hunt_and_kill_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::hunt_and_kill(&mut g, &mut rng)
        })
    });
}

fn bench_recursive_backtracker_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("recursive_backtracker_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            generators::recursive_backtracker(&mut g, &mut rng)
        })
    });
}

fn bench_kruskal_maze_32_u16(c: &mut Criterion) {
    let mut rng = bench_rng();
    c.bench_function("kruskal_maze_32_u16", move |b| {
        b.iter(|| {
            let mut g = medium_rect_grid(RowLength(32), ColumnLength(32)).unwrap();
            kruskal::kruskal(&mut g, &mut rng)
        })
    });
}

criterion_group!(
    benches,
    bench_binary_maze_32_u16,
    bench_sidewinder_maze_32_u16,
    bench_aldous_broder_maze_32_u16,
    bench_wilson_maze_32_u16,
    bench_hunt_and_kill_maze_32_u16,
    bench_recursive_backtracker_maze_32_u16,
    bench_kruskal_maze_32_u16
);
criterion_main!(benches);
