use batch_pcc::correlation::baseline;
use batch_pcc::correlation::PccSessionBuilder;
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::time::Duration;

// Grid trades sequence length against batch size so every cell reduces a
// similar element count.
const LENGTHS: [usize; 6] = [10, 100, 1_000, 10_000, 20_000, 100_000];
const YCOUNTS: [usize; 6] = [100_000, 10_000, 1_000, 100, 50, 10];

fn fill(len: usize, phase: f32) -> Vec<f32> {
	(0..len).map(|i| (i as f32 * phase).sin()).collect()
}

fn benchmark_serial_pcc(c: &mut Criterion) {
	let mut group = c.benchmark_group("serial_pcc");
	group.measurement_time(Duration::from_secs(5));
	for k in 0..LENGTHS.len() {
		let (length, count) = (LENGTHS[k], YCOUNTS[k]);
		let x = fill(length, 0.37);
		let y = fill(length * count, 0.11);
		group.bench_with_input(
			BenchmarkId::from_parameter(format!("length={} count={}", length, count)),
			&k,
			|b, _| {
				b.iter(|| black_box(baseline::pcc_rows(&x, &y)));
			},
		);
	}
	group.finish();
}

fn benchmark_parallel_pcc(c: &mut Criterion) {
	let mut group = c.benchmark_group("parallel_pcc");
	group.measurement_time(Duration::from_secs(5));
	for k in 0..LENGTHS.len() {
		let (length, count) = (LENGTHS[k], YCOUNTS[k]);
		let x = fill(length, 0.37);
		let y = fill(length * count, 0.11);
		let mut session = PccSessionBuilder::new(length, count)
			.build()
			.expect("session build failed");
		session.load_y(&y).expect("load_y failed");
		group.bench_with_input(
			BenchmarkId::from_parameter(format!("length={} count={}", length, count)),
			&k,
			|b, _| {
				b.iter(|| {
					session.write_x(&x).expect("write_x failed");
					black_box(session.compute()[0]);
				});
			},
		);
	}
	group.finish();
}

fn benchmark_chunk_widths(c: &mut Criterion) {
	// One large sequence, sweep the partition width of the reference side.
	const LENGTH: usize = 1_000_000;
	let x = fill(LENGTH, 0.37);
	let y = fill(LENGTH, 0.11);
	let mut group = c.benchmark_group("chunk_width");
	group.measurement_time(Duration::from_secs(5));
	for width in [0usize, 3_000, 30_000, 250_000] {
		let mut session = PccSessionBuilder::new(LENGTH, 1)
			.width_x(width)
			.width_y(width)
			.build()
			.expect("session build failed");
		session.load_y(&y).expect("load_y failed");
		group.bench_with_input(BenchmarkId::from_parameter(width), &width, |b, _| {
			b.iter(|| {
				session.write_x(&x).expect("write_x failed");
				black_box(session.compute()[0]);
			});
		});
	}
	group.finish();
}

criterion_group!(
	benches,
	benchmark_serial_pcc,
	benchmark_parallel_pcc,
	benchmark_chunk_widths
);
criterion_main!(benches);
