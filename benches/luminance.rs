use criterion::{Criterion, black_box, criterion_group, criterion_main};
use qr_ladder::utils::grayscale::{rgba_to_luminance, rgba_to_luminance_parallel};
use qr_ladder::{histogram, otsu_threshold};

fn bench_luminance_small(c: &mut Criterion) {
    let image = vec![128u8; 100 * 100 * 4];
    c.bench_function("rgba_to_luminance_100x100", |b| {
        b.iter(|| rgba_to_luminance(black_box(&image), black_box(100), black_box(100)))
    });
}

fn bench_luminance_large(c: &mut Criterion) {
    let image = vec![128u8; 1920 * 1080 * 4];
    c.bench_function("rgba_to_luminance_1920x1080", |b| {
        b.iter(|| rgba_to_luminance(black_box(&image), black_box(1920), black_box(1080)))
    });
}

fn bench_luminance_parallel_medium(c: &mut Criterion) {
    let image = vec![128u8; 640 * 480 * 4];
    c.bench_function("rgba_to_luminance_parallel_640x480", |b| {
        b.iter(|| rgba_to_luminance_parallel(black_box(&image), black_box(640), black_box(480)))
    });
}

fn bench_otsu(c: &mut Criterion) {
    let gray: Vec<u8> = (0..640 * 480).map(|i| (i % 251) as u8).collect();
    c.bench_function("otsu_threshold_640x480", |b| {
        b.iter(|| otsu_threshold(&histogram(black_box(&gray))))
    });
}

criterion_group!(
    benches,
    bench_luminance_small,
    bench_luminance_large,
    bench_luminance_parallel_medium,
    bench_otsu
);
criterion_main!(benches);
