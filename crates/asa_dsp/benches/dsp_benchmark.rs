//! Performance benchmarks for the DSP module
//!
//! Run with: cargo bench -p asa_dsp

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use asa_dsp::{distribute, RealFft, SpectralBinner, Window, Windower};

fn benchmark_distribution(c: &mut Criterion) {
    let mut group = c.benchmark_group("distribute");

    for (bins, lines) in [(512, 32), (1024, 256), (16384, 4096)] {
        group.bench_function(format!("power_{}_bins_{}_lines", bins, lines), |b| {
            b.iter(|| distribute(black_box(bins), black_box(lines), black_box(1.5)).unwrap());
        });
        group.bench_function(format!("uniform_{}_bins_{}_lines", bins, lines), |b| {
            b.iter(|| distribute(black_box(bins), black_box(lines), black_box(1.0)).unwrap());
        });
    }

    group.finish();
}

fn benchmark_sequence(c: &mut Criterion) {
    let mut group = c.benchmark_group("sequence");

    // Common FFT sizes for visualizers
    for size in [256, 1024, 2048, 8192] {
        group.throughput(Throughput::Elements(size as u64));

        group.bench_function(format!("window_fft_fold_{}", size), |b| {
            let bins = size / 2;
            let windower = Windower::new(Window::Hann, size, size).unwrap();
            let mut fft = RealFft::new(size).unwrap();
            let binner = SpectralBinner::new(1, distribute(bins, 32, 1.2).unwrap());

            let samples: Vec<i16> = (0..size)
                .map(|i| ((i as f32 * 0.05).sin() * 12000.0) as i16)
                .collect();
            let mut real = vec![0.0; size];
            let mut lines = vec![0.0; bins];

            b.iter(|| {
                windower.apply(black_box(&samples), &mut real).unwrap();
                let spectrum = fft.process(&real).unwrap();
                black_box(binner.fold(spectrum, &mut lines).unwrap());
            });
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_distribution, benchmark_sequence);

criterion_main!(benches);
