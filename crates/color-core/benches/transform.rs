//! Pipeline transform benchmarks
//!
//! Compares evaluating a compiled profile-to-profile pipeline pixel-by-pixel against looking
//! the same transform up through a precomputed [`DeviceLutAccelerator`] grid.

use color_core::pipeline::{CompileOptions, CompiledPipeline, DeviceLutAccelerator, RenderIntent};
use color_core::virtual_profile::VirtualProfileId;
use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};

fn generate_rgb8_data(count: usize) -> Vec<u8> {
    (0..count * 3).map(|i| ((i * 37) % 256) as u8).collect()
}

fn srgb_to_adobe_rgb() -> CompiledPipeline {
    let srgb = VirtualProfileId::SRgb.build();
    let adobe = VirtualProfileId::AdobeRgb1998.build();
    CompiledPipeline::compile(
        &[srgb, adobe],
        &[RenderIntent::RelativeColorimetric],
        CompileOptions::default(),
    )
    .expect("srgb -> adobe rgb (1998) pipeline compiles")
}

fn bench_pipeline_transform(c: &mut Criterion) {
    let pipeline = srgb_to_adobe_rgb();
    let mut group = c.benchmark_group("pipeline_transform");

    for pixel_count in [1000, 10000, 100000].iter() {
        let src = generate_rgb8_data(*pixel_count);
        group.throughput(Throughput::Elements(*pixel_count as u64));

        group.bench_with_input(BenchmarkId::new("live", pixel_count), pixel_count, |b, _| {
            b.iter(|| {
                for rgb in src.chunks_exact(3) {
                    let input = [
                        rgb[0] as f64 / 255.0,
                        rgb[1] as f64 / 255.0,
                        rgb[2] as f64 / 255.0,
                    ];
                    black_box(pipeline.transform(&input).unwrap());
                }
            })
        });
    }

    group.finish();
}

fn bench_accelerator_build(c: &mut Criterion) {
    let pipeline = srgb_to_adobe_rgb();
    let mut group = c.benchmark_group("accelerator_build");

    for grid_size in [9, 17, 33].iter() {
        group.bench_with_input(BenchmarkId::new("grid", grid_size), grid_size, |b, &size| {
            b.iter(|| black_box(DeviceLutAccelerator::build(&pipeline, size).unwrap()))
        });
    }

    group.finish();
}

fn bench_accelerator_lookup(c: &mut Criterion) {
    let pipeline = srgb_to_adobe_rgb();
    let accel = DeviceLutAccelerator::build(&pipeline, 33).unwrap();
    let mut group = c.benchmark_group("accelerator_lookup");

    for pixel_count in [1000, 10000, 100000].iter() {
        let src = generate_rgb8_data(*pixel_count);
        let mut dst = vec![0u8; src.len()];
        group.throughput(Throughput::Elements(*pixel_count as u64));

        group.bench_with_input(BenchmarkId::new("rgb8", pixel_count), pixel_count, |b, _| {
            b.iter(|| accel.transform_rgb8(black_box(&src), black_box(&mut dst)))
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_pipeline_transform,
    bench_accelerator_build,
    bench_accelerator_lookup,
);

criterion_main!(benches);
