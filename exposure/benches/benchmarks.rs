use criterion::{criterion_group, criterion_main, Criterion};
use exposure::{geo::geometry::Coord, ExposureReport, Reducer};

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

/// Open water west of the site, suburbs east of it.
fn coastline(coord: Coord<f64>) -> Option<u16> {
    if coord.x < -70.6 {
        Some(11)
    } else {
        Some(22)
    }
}

fn classify(c: &mut Criterion) {
    let mut group = c.benchmark_group("Exposure");

    for (name, height_ft) in [("low-rise", 30.0), ("high-rise", 600.0)] {
        for reducer in [Reducer::Threshold, Reducer::Majority] {
            let builder = ExposureReport::builder()
                .origin(41.5, -70.6)
                .height_ft(height_ft)
                .reducer(reducer);
            group.bench_function(format!("{name} {reducer:?}"), |b| {
                b.iter(|| builder.build(&coastline).unwrap())
            });
        }
    }
}

criterion_group!(benches, classify);
criterion_main!(benches);
