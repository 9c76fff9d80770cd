// SPDX-License-Identifier: GPL-3.0-only

//! CLI commands for booth operations
//!
//! This module provides command-line functionality for:
//! - Listing camera sources
//! - Taking a single photo
//! - Printing effect directives

use retro_cam::backends::camera::{
    CameraBackendType, CameraFrame, MediaAcquisition, SourceSpec, StreamConstraints,
    list_cameras as enumerate_cameras,
};
use retro_cam::caption::{PresetCaptions, caption_or_fallback};
use retro_cam::pipelines::photo::PhotoPipeline;
use retro_cam::storage;
use retro_cam::{BeautyLevel, CaptureRequest, Config, EffectDirective, FilterPreset, Sticker};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// Options of the `photo` command
pub struct PhotoOptions {
    pub source: Option<SourceSpec>,
    pub filter: Option<FilterPreset>,
    pub beauty: BeautyLevel,
    /// Overrides the directive derived from filter and beauty
    pub directive: Option<EffectDirective>,
    pub sticker: Option<Sticker>,
    pub output: Option<PathBuf>,
    pub data_url: bool,
    pub caption: bool,
}

/// List all available camera sources
pub fn list_cameras(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let mut cameras = enumerate_cameras();
    if let Some(path) = &config.still_image_path {
        cameras.extend(
            SourceSpec::Image(path.clone())
                .into_backend()
                .enumerate_cameras()
                .into_iter()
                .map(|device| (CameraBackendType::StillImage, device)),
        );
    }

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for (index, (kind, camera)) in cameras.iter().enumerate() {
        let marker = if *kind == config.backend { "*" } else { " " };
        println!("{} [{}] {} ({})", marker, index, camera.name, kind);
        println!("      Source: {}", source_string(*kind, &camera.path));
    }
    println!();

    Ok(())
}

fn source_string(kind: CameraBackendType, path: &str) -> String {
    match kind {
        CameraBackendType::TestPattern => "pattern".to_string(),
        CameraBackendType::StillImage => format!("image:{}", path),
        CameraBackendType::V4l2 => format!("v4l2:{}", path),
    }
}

/// Take a photo with the given controls
pub fn take_photo(
    config: &Config,
    options: PhotoOptions,
) -> Result<(), Box<dyn std::error::Error>> {
    let source = options
        .source
        .unwrap_or_else(|| SourceSpec::from_config(config));
    let backend = source.into_backend();
    let warm_up = backend.backend_type() == CameraBackendType::V4l2;

    let mut acquisition = MediaAcquisition::new(
        backend,
        StreamConstraints::new(config.ideal_width, config.ideal_height),
    );
    acquisition
        .start()
        .map_err(|e| format!("{} ({})", e.user_message(), e))?;

    if let Some(format) = acquisition.format() {
        eprintln!("Capture format: {}", format);
    }

    let frame = wait_for_frame(&mut acquisition, warm_up)
        .ok_or("Failed to capture frame from camera")?;

    let request = CaptureRequest {
        filter: options.filter.unwrap_or(config.default_filter),
        beauty: options.beauty,
        sticker: options.sticker,
    };

    let pipeline = PhotoPipeline::from_config(config);
    let rt = tokio::runtime::Runtime::new()?;
    let image = match options.directive {
        Some(directive) => {
            info!(directive = %directive, "Capturing photo with explicit directive");
            pipeline.composite_with(&frame, &directive, request.sticker.as_ref())?
        }
        None => {
            info!(directive = %request.directive(), "Capturing photo");
            rt.block_on(pipeline.composite_async(frame, request))?
        }
    };
    let image = Arc::new(image);

    // Release the camera before the slower steps
    acquisition.stop();

    if options.data_url {
        println!("{}", image.data_url());
    } else {
        let (dir, file_name) = match options.output {
            Some(path) if !path.is_dir() => {
                let dir = path
                    .parent()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_default();
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .ok_or("Output path has no file name")?;
                (dir, name)
            }
            Some(dir) => (dir, default_file_name()),
            None => (config.photo_dir(), default_file_name()),
        };
        let path = rt.block_on(storage::save_photo(image.clone(), &dir, file_name))?;
        println!("Photo saved: {}", path.display());
    }

    if options.caption {
        let service = PresetCaptions::new(config.timings.caption_delay());
        let caption = rt.block_on(caption_or_fallback(&service, image, &config.fallback_caption));
        // Keep stdout clean for the data URL
        if options.data_url {
            eprintln!("Caption: {}", caption);
        } else {
            println!("Caption: {}", caption);
        }
    }

    Ok(())
}

fn default_file_name() -> String {
    storage::photo_file_name(&chrono::Local::now(), uuid::Uuid::new_v4())
}

/// Poll the camera until a frame arrives; webcams get a warm-up period
/// so exposure can settle
fn wait_for_frame(acquisition: &mut MediaAcquisition, warm_up: bool) -> Option<CameraFrame> {
    let start = Instant::now();
    let timeout = Duration::from_secs(5);
    let warmup = if warm_up {
        Duration::from_millis(500)
    } else {
        Duration::ZERO
    };
    let mut frame: Option<CameraFrame> = None;

    while start.elapsed() < timeout {
        if let Some(f) = acquisition.current_frame() {
            frame = Some(f.clone());
            // After warmup period, use the latest good frame
            if start.elapsed() >= warmup {
                break;
            }
        }
        std::thread::sleep(Duration::from_millis(16));
    }

    frame
}

/// Print the directive for a filter and beauty level
pub fn print_directive(filter: FilterPreset, beauty: BeautyLevel) {
    println!("{}", EffectDirective::compose(filter, beauty));
}
