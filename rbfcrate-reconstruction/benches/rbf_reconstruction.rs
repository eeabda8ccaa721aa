use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rbfcrate_core::{KernelSpec, Point3, ReconstructionGrid};
use rbfcrate_reconstruction::{reconstruct, ParallelConfig, RbfSolver, Reconstructor, SolverConfig};

const SAMPLE_COUNTS: [usize; 3] = [50, 100, 200];

fn random_samples(count: usize) -> Vec<Point3> {
    let mut rng = StdRng::seed_from_u64(7);
    (0..count)
        .map(|_| {
            Point3::new(rng.gen::<f64>(), rng.gen::<f64>(), rng.gen::<f64>())
                .expect("random coordinates are finite")
        })
        .collect()
}

fn solve(c: &mut Criterion) {
    let kernel = KernelSpec::ThinPlate;
    let solver = RbfSolver::new(SolverConfig::default());

    let mut g = c.benchmark_group("solve");
    g.sample_size(10);

    for count in SAMPLE_COUNTS {
        let samples = random_samples(count);
        g.bench_with_input(BenchmarkId::from_parameter(count), &samples, |b, samples| {
            b.iter(|| std::hint::black_box(&solver).solve(std::hint::black_box(samples), &kernel));
        });
    }

    g.finish();
}

fn reconstruct_lattice(c: &mut Criterion) {
    let kernel = KernelSpec::Multiquadric { epsilon: 1.0 };
    let samples = random_samples(100);
    let weights = RbfSolver::default()
        .solve(&samples, &kernel)
        .expect("random samples are well conditioned");
    let min = Point3::origin();
    let max = Point3::new(1.0, 1.0, 1.0).expect("finite corner");

    let mut g = c.benchmark_group("reconstruct");
    g.sample_size(10);

    for resolution in [8u32, 16, 32] {
        let grid = ReconstructionGrid::lattice([resolution; 3], min, max).expect("valid lattice");
        g.bench_with_input(
            BenchmarkId::new("parallel", resolution),
            &grid,
            |b, grid| {
                b.iter(|| reconstruct(&weights, &samples, &kernel, std::hint::black_box(grid)));
            },
        );
        g.bench_with_input(
            BenchmarkId::new("sequential", resolution),
            &grid,
            |b, grid| {
                b.iter(|| {
                    Reconstructor::new(&weights, &samples, kernel, std::hint::black_box(grid))
                        .map(|r| r.with_parallel(ParallelConfig::sequential()).collect_points())
                });
            },
        );
    }

    g.finish();
}

criterion_group!(benches, solve, reconstruct_lattice);
criterion_main!(benches);
