// SPDX-License-Identifier: MPL-2.0

//! Integration tests for the effect pipeline

use image::{Rgba, RgbaImage};
use retro_cam::effects::{Adjustment, apply_directive};
use retro_cam::{BeautyLevel, CaptureRequest, EffectDirective, FilterPreset, Sticker};

#[test]
fn test_preset_directives() {
    let cases = [
        (FilterPreset::Normal, "none"),
        (FilterPreset::Soft, "brightness(1.1) contrast(0.9) saturate(1.1)"),
        (FilterPreset::Vintage, "sepia(0.4) contrast(1.1) brightness(0.9)"),
        (FilterPreset::Bw, "grayscale(1) contrast(1.2)"),
        (FilterPreset::Warm, "sepia(0.2) saturate(1.4) hue-rotate(-10deg)"),
        (FilterPreset::Cool, "brightness(1.05) hue-rotate(10deg) saturate(0.8)"),
        (
            FilterPreset::Film,
            "contrast(1.2) saturate(1.2) sepia(0.1) brightness(0.9)",
        ),
    ];

    for (preset, expected) in cases {
        let directive = EffectDirective::compose(preset, BeautyLevel::MIN);
        assert_eq!(directive.to_string(), expected, "preset {:?}", preset);
    }
}

#[test]
fn test_filter_then_beauty() {
    let directive = EffectDirective::compose(FilterPreset::Bw, BeautyLevel::new(50));
    assert_eq!(
        directive.to_string(),
        "grayscale(1) contrast(1.2) brightness(1.25) contrast(0.875) saturate(0.9) blur(0.5px)"
    );
}

#[test]
fn test_max_beauty() {
    let directive = EffectDirective::compose(FilterPreset::Normal, BeautyLevel::MAX);
    assert_eq!(
        directive.to_string(),
        "brightness(1.5) contrast(0.75) saturate(0.8) blur(1px)"
    );
}

#[test]
fn test_beauty_is_monotonic() {
    let mut previous = BeautyLevel::new(0);
    for level in 1..=100u8 {
        let current = BeautyLevel::new(level);
        assert!(current.brightness() > previous.brightness());
        assert!(current.contrast() < previous.contrast());
        assert!(current.saturation() < previous.saturation());
        assert!(current.blur_px() > previous.blur_px());
        previous = current;
    }
}

#[test]
fn test_beauty_level_is_clamped() {
    assert_eq!(BeautyLevel::new(250), BeautyLevel::MAX);
    assert_eq!(BeautyLevel::MAX.saturating_add(10), BeautyLevel::MAX);
    assert_eq!(BeautyLevel::MIN.saturating_sub(10), BeautyLevel::MIN);
    assert!("101".parse::<BeautyLevel>().is_err());
}

#[test]
fn test_directive_parses_its_own_output() {
    let directive = EffectDirective::compose(FilterPreset::Warm, BeautyLevel::new(30));
    let parsed: EffectDirective = directive.to_string().parse().unwrap();
    assert_eq!(parsed, directive);
}

#[test]
fn test_directive_parse_errors() {
    assert!("glow(2)".parse::<EffectDirective>().is_err());
    assert!("brightness(1.1".parse::<EffectDirective>().is_err());
    assert!("contrast(abc)".parse::<EffectDirective>().is_err());
    assert_eq!(
        "contrast(50%)".parse::<EffectDirective>().unwrap(),
        EffectDirective::new(vec![Adjustment::Contrast(0.5)])
    );
}

#[test]
fn test_filter_preset_names() {
    assert_eq!("vintage".parse::<FilterPreset>().unwrap(), FilterPreset::Vintage);
    assert_eq!("Mono".parse::<FilterPreset>().unwrap(), FilterPreset::Bw);
    assert!("sparkle".parse::<FilterPreset>().is_err());

    let mut preset = FilterPreset::Normal;
    for _ in 0..FilterPreset::ALL.len() {
        preset = preset.next();
    }
    assert_eq!(preset, FilterPreset::Normal);
    assert_eq!(FilterPreset::Normal.previous(), FilterPreset::Film);
}

#[test]
fn test_sticker_cycle_ends_with_none() {
    let mut current: Option<Sticker> = None;
    let mut seen = 0;
    loop {
        current = Sticker::cycle(current.as_ref());
        if current.is_none() {
            break;
        }
        seen += 1;
    }
    assert_eq!(seen, Sticker::catalog().count());
    assert!(Sticker::new("   ").is_err());
}

#[test]
fn test_capture_request_directive() {
    let request = CaptureRequest {
        filter: FilterPreset::Cool,
        beauty: BeautyLevel::new(20),
        sticker: Some(Sticker::new("🔥").unwrap()),
    };
    assert_eq!(
        request.directive(),
        EffectDirective::compose(FilterPreset::Cool, BeautyLevel::new(20))
    );
}

#[test]
fn test_identity_directive_leaves_pixels_untouched() {
    let original = RgbaImage::from_pixel(8, 8, Rgba([10, 120, 200, 255]));
    let mut image = original.clone();
    apply_directive(&mut image, &EffectDirective::none());
    assert_eq!(image, original);
}

#[test]
fn test_grayscale_filter_removes_colour() {
    let mut image = RgbaImage::from_pixel(8, 8, Rgba([200, 40, 40, 255]));
    apply_directive(
        &mut image,
        &EffectDirective::compose(FilterPreset::Bw, BeautyLevel::MIN),
    );
    for pixel in image.pixels() {
        assert_eq!(pixel[0], pixel[1]);
        assert_eq!(pixel[1], pixel[2]);
        assert_eq!(pixel[3], 255);
    }
}
