//! Benchmarks for extraction pipeline operations.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use image::{DynamicImage, Rgba, RgbaImage};
use tinct::{dominant_color, DynamicExtractor, ExtractConfig, GpuContext, SourceImage, Strategy};

fn test_image(width: u32, height: u32) -> SourceImage {
    let pixels = RgbaImage::from_fn(width, height, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8, 255])
    });
    SourceImage::srgb(DynamicImage::ImageRgba8(pixels))
}

fn bench_cpu_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("CPU Extraction");

    let config = ExtractConfig {
        strategy: Strategy::Cpu,
        ..ExtractConfig::default()
    };
    let mut extractor = DynamicExtractor::cpu(config.alpha_threshold);

    for (width, height, name) in [(640, 480, "VGA"), (1920, 1080, "1080p"), (4032, 3024, "12MP")] {
        let source = test_image(width, height);
        group.bench_with_input(BenchmarkId::from_parameter(name), &source, |b, source| {
            b.iter(|| {
                let color =
                    dominant_color(black_box(source.clone()), &mut extractor, &config).unwrap();
                black_box(color);
            });
        });
    }

    group.finish();
}

fn bench_gpu_extraction(c: &mut Criterion) {
    let mut group = c.benchmark_group("GPU Extraction");

    let config = ExtractConfig::default();
    let ctx = match pollster::block_on(GpuContext::new()) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };
    let mut extractor = match DynamicExtractor::gpu(
        ctx.device,
        ctx.queue,
        config.target_size,
        config.alpha_threshold,
    ) {
        Ok(extractor) => extractor,
        Err(e) => {
            eprintln!("Skipping GPU benchmarks: {}", e);
            return;
        }
    };

    let source = test_image(1920, 1080);
    group.bench_function("dominant_color_1080p", |b| {
        b.iter(|| {
            let color = dominant_color(black_box(source.clone()), &mut extractor, &config).unwrap();
            black_box(color);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_cpu_extraction, bench_gpu_extraction);
criterion_main!(benches);
