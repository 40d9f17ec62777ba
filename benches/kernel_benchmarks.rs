use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use odormap::{Config, DomainConfig, GasMap, KernelParams, Point3d};

fn sample_position(counter: usize) -> Point3d {
    let x = 2.8 + (counter % 97) as f64 * 0.1;
    let y = 0.05 + (counter % 61) as f64 * 0.063;
    Point3d::planar(x, y)
}

fn benchmark_ingest(c: &mut Criterion) {
    let mut group = c.benchmark_group("ingest");

    let mut map = GasMap::new(&Config::default()).unwrap();
    group.bench_function("single_ingest_reference", |b| {
        let mut counter = 0;
        b.iter(|| {
            let position = sample_position(counter);
            counter += 1;
            map.ingest(black_box(position), black_box(0.5)).unwrap()
        })
    });

    // Cost grows with the window, not with the number of past samples.
    for rco in [0.3, 0.6, 1.2] {
        let config = Config::default().with_kernel(KernelParams {
            rco,
            ..KernelParams::default()
        });
        let mut map = GasMap::new(&config).unwrap();
        group.bench_with_input(BenchmarkId::new("ingest_by_rco", rco), &rco, |b, _| {
            let mut counter = 0;
            b.iter(|| {
                let position = sample_position(counter);
                counter += 1;
                map.ingest(black_box(position), black_box(0.5)).unwrap()
            })
        });
    }

    let positions: Vec<Point3d> = (0..100).map(sample_position).collect();
    let concentrations: Vec<f64> = (0..100).map(|k| k as f64 * 0.01).collect();
    group.bench_function("batch_ingest_100", |b| {
        b.iter(|| {
            let mut map = GasMap::new(&Config::default()).unwrap();
            map.ingest_batch(black_box(&positions), black_box(&concentrations))
                .unwrap();
            map
        })
    });

    group.finish();
}

fn benchmark_readback(c: &mut Criterion) {
    let mut group = c.benchmark_group("readback");

    let config = Config::default().with_domain(DomainConfig::default().with_bins(256, 256));
    let mut map = GasMap::new(&config).unwrap();
    for k in 0..500 {
        map.ingest(sample_position(k), (k % 13) as f64).unwrap();
    }

    let probes: Vec<Point3d> = (0..1000).map(|k| sample_position(k * 7)).collect();
    group.bench_function("query_1000", |b| {
        b.iter(|| map.query_many(black_box(&probes)).unwrap())
    });

    group.bench_function("dump_256x256", |b| b.iter(|| black_box(map.dump())));

    group.finish();
}

criterion_group!(benches, benchmark_ingest, benchmark_readback);
criterion_main!(benches);
