use criterion::{black_box, criterion_group, criterion_main, Criterion};
use gridpath::{find_path, Grid, Heuristic, Point};

/// 64x64 grid of mixed costs, crossed by walls every 8 rows that leave a gap every 16 columns
fn base_grid() -> Grid {
    let size = 64;
    let costs = (0..size)
        .map(|row| {
            (0..size)
                .map(|col| {
                    if row % 8 == 4 && col % 16 != 7 {
                        0
                    } else {
                        1 + (row * 7 + col * 13) % 9
                    }
                })
                .collect()
        })
        .collect();

    Grid::new(costs).unwrap()
}

fn load_base_map_scaled(factor: usize) -> (Grid, Point, Point) {
    let mut grid = base_grid();
    grid.scale_up(factor);

    let start = Point { row: 0, col: 0 };
    let goal = Point {
        row: grid.rows() - 1,
        col: grid.columns() - 1,
    };

    (grid, start, goal)
}

fn bench_map_scaled(c: &mut Criterion, factor: usize) {
    let (grid, start, goal) = load_base_map_scaled(factor);

    for (name, heuristic) in [("astar", Heuristic::Estimate), ("dijkstra", Heuristic::Zero)] {
        c.bench_function(&format!("map_scaled_{}_{}", factor, name), |b| {
            b.iter(|| {
                let res = find_path(&grid, black_box(start), black_box(goal), heuristic);
                assert!(res.is_ok());
            })
        });
    }
}

pub fn map_small(c: &mut Criterion) {
    bench_map_scaled(c, 1);
}

pub fn map_medium(c: &mut Criterion) {
    bench_map_scaled(c, 2);
}

pub fn map_large(c: &mut Criterion) {
    bench_map_scaled(c, 4);
}

criterion_group!(benches, map_small, map_medium, map_large);
criterion_main!(benches);
