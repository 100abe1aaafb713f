//! Integration tests for the extraction pipeline.

use image::{DynamicImage, Rgba, RgbaImage};
use tinct::{
    dominant_color, extract_dominant_color, ColorExtract, DynamicExtractor, ExtractConfig,
    GpuContext, SourceImage, Strategy,
};

fn solid(width: u32, height: u32, rgba: [u8; 4]) -> SourceImage {
    SourceImage::srgb(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
        width,
        height,
        Rgba(rgba),
    )))
}

fn cpu_config() -> ExtractConfig {
    let _ = env_logger::builder().is_test(true).try_init();
    ExtractConfig {
        strategy: Strategy::Cpu,
        ..ExtractConfig::default()
    }
}

async fn create_gpu_context() -> Option<GpuContext> {
    let _ = env_logger::builder().is_test(true).try_init();
    GpuContext::new().await.ok()
}

#[test]
fn test_cpu_uniform_color_with_floor() {
    let source = solid(512, 384, [200, 100, 50, 255]);
    let color = pollster::block_on(extract_dominant_color(source, &cpu_config())).unwrap();

    // Mean brightness of (200, 100, 50) sits below 0.5, so the floor scales
    // all channels by 0.5 / brightness.
    let scale = 0.5 / ((200.0 + 100.0 + 50.0) / (3.0 * 255.0));
    let expected = [
        200.0 / 255.0 * scale,
        100.0 / 255.0 * scale,
        50.0 / 255.0 * scale,
    ];
    let tolerance = 2.0 / 255.0;
    assert!((color.r - expected[0]).abs() < tolerance, "r = {}", color.r);
    assert!((color.g - expected[1]).abs() < tolerance, "g = {}", color.g);
    assert!((color.b - expected[2]).abs() < tolerance, "b = {}", color.b);
}

#[test]
fn test_cpu_bright_color_unadjusted() {
    let source = solid(128, 128, [250, 240, 230, 255]);
    let color = pollster::block_on(extract_dominant_color(source, &cpu_config())).unwrap();
    let tolerance = 2.0 / 255.0;
    assert!((color.r - 250.0 / 255.0).abs() < tolerance);
    assert!((color.g - 240.0 / 255.0).abs() < tolerance);
    assert!((color.b - 230.0 / 255.0).abs() < tolerance);
}

#[test]
fn test_black_image_hits_the_floor() {
    let source = solid(128, 128, [0, 0, 0, 255]);
    let color = pollster::block_on(extract_dominant_color(source, &cpu_config())).unwrap();
    // A black mean has no hue to scale, so the floor lifts it to neutral gray.
    assert!((color.r - 0.5).abs() < 1e-5);
    assert!((color.g - 0.5).abs() < 1e-5);
    assert!((color.b - 0.5).abs() < 1e-5);
}

#[test]
fn test_extraction_is_bit_identical_across_runs() {
    let pixels = RgbaImage::from_fn(300, 200, |x, y| {
        Rgba([(x % 256) as u8, (y % 256) as u8, ((x + y) % 256) as u8, 255])
    });
    let config = cpu_config();
    let mut extractor = pollster::block_on(tinct::create_extractor(&config)).unwrap();

    let source = SourceImage::srgb(DynamicImage::ImageRgba8(pixels));
    let first = dominant_color(source.clone(), &mut extractor, &config).unwrap();
    let second = dominant_color(source, &mut extractor, &config).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_oriented_source_extracts_same_color() {
    // A uniform image has the same mean no matter how it is rotated.
    let upright = solid(64, 48, [250, 240, 230, 255]);
    let rotated = solid(48, 64, [250, 240, 230, 255]).with_orientation(tinct::Orientation::Rotate90);

    let a = pollster::block_on(extract_dominant_color(upright, &cpu_config())).unwrap();
    let b = pollster::block_on(extract_dominant_color(rotated, &cpu_config())).unwrap();
    assert_eq!(a, b);
}

#[tokio::test]
async fn test_gpu_uniform_color_with_floor() {
    if create_gpu_context().await.is_none() {
        return;
    }
    let config = ExtractConfig {
        strategy: Strategy::Gpu,
        ..ExtractConfig::default()
    };
    let source = solid(512, 384, [200, 100, 50, 255]);
    let color = extract_dominant_color(source, &config).await.unwrap();

    let scale = 0.5 / ((200.0 + 100.0 + 50.0) / (3.0 * 255.0));
    let tolerance = 2.0 / 255.0;
    assert!((color.r - 200.0 / 255.0 * scale).abs() < tolerance);
    assert!((color.g - 100.0 / 255.0 * scale).abs() < tolerance);
    assert!((color.b - 50.0 / 255.0 * scale).abs() < tolerance);
}

#[tokio::test]
async fn test_gpu_matches_cpu() {
    let ctx = match create_gpu_context().await {
        Some(ctx) => ctx,
        None => return,
    };
    let config = ExtractConfig::default();
    let mut gpu = DynamicExtractor::gpu(
        ctx.device.clone(),
        ctx.queue.clone(),
        config.target_size,
        config.alpha_threshold,
    )
    .unwrap();
    let mut cpu = DynamicExtractor::cpu(config.alpha_threshold);
    assert!(gpu.is_gpu());

    let pixels = RgbaImage::from_fn(400, 300, |x, y| {
        Rgba([(x * 3 % 256) as u8, (y * 5 % 256) as u8, 90, 255])
    });
    let source = SourceImage::srgb(DynamicImage::ImageRgba8(pixels));

    let gpu_color = dominant_color(source.clone(), &mut gpu, &config).unwrap();
    let cpu_color = dominant_color(source, &mut cpu, &config).unwrap();

    let tolerance = 2.0 / 255.0;
    assert!((gpu_color.r - cpu_color.r).abs() < tolerance);
    assert!((gpu_color.g - cpu_color.g).abs() < tolerance);
    assert!((gpu_color.b - cpu_color.b).abs() < tolerance);
}

#[tokio::test]
async fn test_gpu_extractor_size_wins_over_config() {
    let ctx = match create_gpu_context().await {
        Some(ctx) => ctx,
        None => return,
    };
    // Extractor built at 64 pixels, config still asking for the default 256:
    // the pipeline downsamples to the extractor's own size.
    let config = ExtractConfig::default();
    let mut extractor =
        DynamicExtractor::gpu(ctx.device, ctx.queue, 64, config.alpha_threshold).unwrap();
    assert_eq!(extractor.target_size(), Some(64));

    let color = dominant_color(solid(512, 384, [250, 240, 230, 255]), &mut extractor, &config)
        .unwrap();
    let tolerance = 2.0 / 255.0;
    assert!((color.r - 250.0 / 255.0).abs() < tolerance);
}

#[tokio::test]
async fn test_gpu_extractor_reuse_across_requests() {
    let ctx = match create_gpu_context().await {
        Some(ctx) => ctx,
        None => return,
    };
    let config = ExtractConfig::default();
    let mut extractor = DynamicExtractor::gpu(
        ctx.device,
        ctx.queue,
        config.target_size,
        config.alpha_threshold,
    )
    .unwrap();

    // Second request reuses the cached pipeline and buffers.
    let first = dominant_color(solid(64, 64, [10, 200, 30, 255]), &mut extractor, &config).unwrap();
    let second =
        dominant_color(solid(64, 64, [10, 200, 30, 255]), &mut extractor, &config).unwrap();
    assert_eq!(first, second);
}
