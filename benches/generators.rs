use criterion::{criterion_group, criterion_main, Criterion};
use mazerace::{
    cells::Cartesian2DCoordinate,
    generators,
    grid::Grid,
    pathing::Distances,
    units::{ColumnsCount, RowsCount, WallThickness},
};

fn fresh_grid() -> Grid {
    Grid::new(ColumnsCount(32), RowsCount(32), WallThickness(4.0))
        .expect("bench grid dimensions are valid")
}

fn bench_recursive_backtracker_32(c: &mut Criterion) {
    c.bench_function("recursive_backtracker_32", |b| {
        b.iter(|| {
            let mut g = fresh_grid();
            let mut rng = generators::seeded_rng(97);
            generators::recursive_backtracker(&mut g, &mut rng)
        })
    });
}

fn bench_flood_fill_distances_32(c: &mut Criterion) {
    let mut g = fresh_grid();
    let mut rng = generators::seeded_rng(97);
    generators::recursive_backtracker(&mut g, &mut rng);

    c.bench_function("flood_fill_distances_32", move |b| {
        b.iter(|| Distances::<u32>::new(&g, Cartesian2DCoordinate::new(0, 0)))
    });
}

criterion_group!(
    benches,
    bench_recursive_backtracker_32,
    bench_flood_fill_distances_32
);
criterion_main!(benches);
