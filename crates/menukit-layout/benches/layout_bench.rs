//! Benchmarks for the grid and pack solvers.
//!
//! Run with: cargo bench -p menukit-layout --bench layout_bench

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use menukit_layout::grid::{GridCell, GridSpec, RowSpec};
use menukit_layout::pack::{PackChild, PackSpec};
use menukit_layout::{Alignment, Size};

fn grid_cells(n: usize) -> Vec<GridCell> {
    (0..n)
        .map(|i| {
            GridCell::new(
                Size::new(40 + (i as i32 % 7) * 10, 20 + (i as i32 % 3) * 4),
                Alignment::Center,
            )
        })
        .collect()
}

fn bench_grid(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/grid");
    for n in [6usize, 60, 600] {
        let columns = 3;
        let rows = n.div_ceil(columns);
        let spec = GridSpec::new(columns)
            .rows(RowSpec::Uniform(rows))
            .row_spacing(4);
        let cells = grid_cells(n);
        group.bench_with_input(BenchmarkId::new("solve", n), &cells, |b, cells| {
            b.iter(|| black_box(spec.solve(black_box(cells))))
        });
    }
    group.finish();
}

fn bench_pack(c: &mut Criterion) {
    let mut group = c.benchmark_group("layout/pack");
    for n in [3usize, 30, 300] {
        let spec = PackSpec::vertical().spacing(5).max_size(None, Some(400));
        let children: Vec<PackChild> = (0..n)
            .map(|i| PackChild::new(Size::new(50 + i as i32 % 20, 20)).align(Alignment::Center))
            .collect();
        group.bench_with_input(BenchmarkId::new("solve", n), &children, |b, children| {
            b.iter(|| black_box(spec.solve(black_box(children))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_grid, bench_pack);
criterion_main!(benches);
