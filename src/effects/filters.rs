// SPDX-License-Identifier: GPL-3.0-only

//! Filter presets, beauty levels and the effect directive they compose into
//!
//! A directive is an ordered list of adjustments written in filter-function
//! notation: `"brightness(1.1) contrast(0.9) saturate(1.1)"`. The same
//! directive drives the live preview and the captured photo.

use crate::constants::{MAX_BEAUTY_LEVEL, STICKERS};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A single image adjustment
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjustment {
    /// Linear multiplier, 1 = unchanged
    Brightness(f64),
    /// Contrast around mid-grey, 1 = unchanged
    Contrast(f64),
    /// Saturation, 1 = unchanged, 0 = grey
    Saturate(f64),
    /// Hue rotation in degrees
    HueRotate(f64),
    /// Gaussian blur standard deviation in pixels
    Blur(f64),
    /// Amount of desaturation, 0..=1
    Grayscale(f64),
    /// Amount of sepia toning, 0..=1
    Sepia(f64),
}

impl Adjustment {
    fn name(&self) -> &'static str {
        match self {
            Adjustment::Brightness(_) => "brightness",
            Adjustment::Contrast(_) => "contrast",
            Adjustment::Saturate(_) => "saturate",
            Adjustment::HueRotate(_) => "hue-rotate",
            Adjustment::Blur(_) => "blur",
            Adjustment::Grayscale(_) => "grayscale",
            Adjustment::Sepia(_) => "sepia",
        }
    }

    /// The numeric argument of the adjustment
    pub fn value(&self) -> f64 {
        match *self {
            Adjustment::Brightness(v)
            | Adjustment::Contrast(v)
            | Adjustment::Saturate(v)
            | Adjustment::HueRotate(v)
            | Adjustment::Blur(v)
            | Adjustment::Grayscale(v)
            | Adjustment::Sepia(v) => v,
        }
    }

    fn parse(token: &str) -> Result<Self, String> {
        let (name, rest) = token
            .split_once('(')
            .ok_or_else(|| format!("expected name(value), got '{}'", token))?;
        let arg = rest
            .strip_suffix(')')
            .ok_or_else(|| format!("missing ')' in '{}'", token))?
            .trim();

        let number = |arg: &str, unit: &str| -> Result<f64, String> {
            let (digits, scale) = if let Some(pct) = arg.strip_suffix('%') {
                (pct, 0.01)
            } else {
                (arg.strip_suffix(unit).unwrap_or(arg), 1.0)
            };
            digits
                .trim()
                .parse::<f64>()
                .map(|v| v * scale)
                .map_err(|_| format!("invalid value '{}' in '{}'", arg, token))
        };

        match name.trim() {
            "brightness" => Ok(Adjustment::Brightness(number(arg, "")?)),
            "contrast" => Ok(Adjustment::Contrast(number(arg, "")?)),
            "saturate" => Ok(Adjustment::Saturate(number(arg, "")?)),
            "hue-rotate" => Ok(Adjustment::HueRotate(number(arg, "deg")?)),
            "blur" => Ok(Adjustment::Blur(number(arg, "px")?)),
            "grayscale" => Ok(Adjustment::Grayscale(number(arg, "")?)),
            "sepia" => Ok(Adjustment::Sepia(number(arg, "")?)),
            other => Err(format!("unknown adjustment '{}'", other)),
        }
    }
}

impl fmt::Display for Adjustment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Adjustment::HueRotate(deg) => write!(f, "hue-rotate({}deg)", deg),
            Adjustment::Blur(px) => write!(f, "blur({}px)", px),
            other => write!(f, "{}({})", other.name(), other.value()),
        }
    }
}

/// Ordered list of adjustments applied to a frame
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EffectDirective {
    adjustments: Vec<Adjustment>,
}

impl EffectDirective {
    /// The identity directive ("none")
    pub fn none() -> Self {
        Self::default()
    }

    pub fn new(adjustments: Vec<Adjustment>) -> Self {
        Self { adjustments }
    }

    /// Compose the directive for a filter preset and beauty level.
    ///
    /// The preset's adjustments come first, the beauty group second. An
    /// identity preset contributes nothing, so the beauty group stands alone.
    pub fn compose(filter: FilterPreset, beauty: BeautyLevel) -> Self {
        let mut adjustments = filter.adjustments().to_vec();
        adjustments.extend(beauty.adjustments());
        Self { adjustments }
    }

    pub fn adjustments(&self) -> &[Adjustment] {
        &self.adjustments
    }

    pub fn is_identity(&self) -> bool {
        self.adjustments.is_empty()
    }
}

impl From<&CaptureRequest> for EffectDirective {
    fn from(request: &CaptureRequest) -> Self {
        EffectDirective::compose(request.filter, request.beauty)
    }
}

impl fmt::Display for EffectDirective {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.adjustments.is_empty() {
            return write!(f, "none");
        }
        for (i, adjustment) in self.adjustments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", adjustment)?;
        }
        Ok(())
    }
}

impl FromStr for EffectDirective {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s == "none" {
            return Ok(Self::none());
        }

        let mut adjustments = Vec::new();
        let mut rest = s;
        while !rest.is_empty() {
            let end = rest
                .find(')')
                .ok_or_else(|| format!("unterminated adjustment in '{}'", rest))?;
            adjustments.push(Adjustment::parse(rest[..=end].trim())?);
            rest = rest[end + 1..].trim_start();
        }
        Ok(Self { adjustments })
    }
}

/// The named filter presets offered by the booth
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FilterPreset {
    #[default]
    Normal,
    Soft,
    Vintage,
    Bw,
    Warm,
    Cool,
    Film,
}

const SOFT: &[Adjustment] = &[
    Adjustment::Brightness(1.1),
    Adjustment::Contrast(0.9),
    Adjustment::Saturate(1.1),
];
const VINTAGE: &[Adjustment] = &[
    Adjustment::Sepia(0.4),
    Adjustment::Contrast(1.1),
    Adjustment::Brightness(0.9),
];
const BW: &[Adjustment] = &[Adjustment::Grayscale(1.0), Adjustment::Contrast(1.2)];
const WARM: &[Adjustment] = &[
    Adjustment::Sepia(0.2),
    Adjustment::Saturate(1.4),
    Adjustment::HueRotate(-10.0),
];
const COOL: &[Adjustment] = &[
    Adjustment::Brightness(1.05),
    Adjustment::HueRotate(10.0),
    Adjustment::Saturate(0.8),
];
const FILM: &[Adjustment] = &[
    Adjustment::Contrast(1.2),
    Adjustment::Saturate(1.2),
    Adjustment::Sepia(0.1),
    Adjustment::Brightness(0.9),
];

impl FilterPreset {
    /// All presets in menu order
    pub const ALL: [FilterPreset; 7] = [
        FilterPreset::Normal,
        FilterPreset::Soft,
        FilterPreset::Vintage,
        FilterPreset::Bw,
        FilterPreset::Warm,
        FilterPreset::Cool,
        FilterPreset::Film,
    ];

    /// Identifier used in config files and on the command line
    pub fn key(&self) -> &'static str {
        match self {
            FilterPreset::Normal => "normal",
            FilterPreset::Soft => "soft",
            FilterPreset::Vintage => "vintage",
            FilterPreset::Bw => "bw",
            FilterPreset::Warm => "warm",
            FilterPreset::Cool => "cool",
            FilterPreset::Film => "film",
        }
    }

    /// Name shown in the filter menu
    pub fn display_name(&self) -> &'static str {
        match self {
            FilterPreset::Normal => "Original",
            FilterPreset::Soft => "Soft",
            FilterPreset::Vintage => "Retro",
            FilterPreset::Bw => "Mono",
            FilterPreset::Warm => "Summer",
            FilterPreset::Cool => "Winter",
            FilterPreset::Film => "1990s",
        }
    }

    pub fn adjustments(&self) -> &'static [Adjustment] {
        match self {
            FilterPreset::Normal => &[],
            FilterPreset::Soft => SOFT,
            FilterPreset::Vintage => VINTAGE,
            FilterPreset::Bw => BW,
            FilterPreset::Warm => WARM,
            FilterPreset::Cool => COOL,
            FilterPreset::Film => FILM,
        }
    }

    /// Next preset in menu order, wrapping around
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Previous preset in menu order, wrapping around
    pub fn previous(self) -> Self {
        let idx = Self::ALL.iter().position(|p| *p == self).unwrap_or(0);
        Self::ALL[(idx + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for FilterPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for FilterPreset {
    type Err = String;

    /// Accepts the key (`"bw"`) or the menu name (`"Mono"`), case-insensitive
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|p| p.key().eq_ignore_ascii_case(s) || p.display_name().eq_ignore_ascii_case(s))
            .ok_or_else(|| {
                let keys: Vec<&str> = Self::ALL.iter().map(|p| p.key()).collect();
                format!("unknown filter '{}' (expected one of: {})", s, keys.join(", "))
            })
    }
}

/// Beauty slider position, 0 (natural) to 100 (glamour)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u8", into = "u8")]
pub struct BeautyLevel(u8);

impl BeautyLevel {
    pub const MIN: BeautyLevel = BeautyLevel(0);
    pub const MAX: BeautyLevel = BeautyLevel(MAX_BEAUTY_LEVEL);

    /// Create a level, clamping to 0..=100
    pub fn new(level: u8) -> Self {
        Self(level.min(MAX_BEAUTY_LEVEL))
    }

    pub fn get(&self) -> u8 {
        self.0
    }

    pub fn saturating_add(self, step: u8) -> Self {
        Self::new(self.0.saturating_add(step))
    }

    pub fn saturating_sub(self, step: u8) -> Self {
        Self::new(self.0.saturating_sub(step))
    }

    /// Brightness multiplier: 1.0 at level 0 up to 1.5 at level 100
    pub fn brightness(&self) -> f64 {
        1.0 + f64::from(self.0) / 200.0
    }

    /// Contrast multiplier: 1.0 at level 0 down to 0.75 at level 100
    pub fn contrast(&self) -> f64 {
        1.0 - f64::from(self.0) / 400.0
    }

    /// Saturation multiplier: 1.0 at level 0 down to 0.8 at level 100
    pub fn saturation(&self) -> f64 {
        1.0 - f64::from(self.0) / 500.0
    }

    /// Soft-focus blur radius: 0px at level 0 up to 1px at level 100
    pub fn blur_px(&self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// The beauty adjustment group; empty at level 0
    pub fn adjustments(&self) -> Vec<Adjustment> {
        if self.0 == 0 {
            return Vec::new();
        }
        vec![
            Adjustment::Brightness(self.brightness()),
            Adjustment::Contrast(self.contrast()),
            Adjustment::Saturate(self.saturation()),
            Adjustment::Blur(self.blur_px()),
        ]
    }
}

impl From<u8> for BeautyLevel {
    fn from(level: u8) -> Self {
        Self::new(level)
    }
}

impl From<BeautyLevel> for u8 {
    fn from(level: BeautyLevel) -> Self {
        level.0
    }
}

impl FromStr for BeautyLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let level: u8 = s
            .trim()
            .parse()
            .map_err(|_| format!("invalid beauty level '{}'", s))?;
        if level > MAX_BEAUTY_LEVEL {
            return Err(format!(
                "beauty level {} out of range (0-{})",
                level, MAX_BEAUTY_LEVEL
            ));
        }
        Ok(Self(level))
    }
}

impl fmt::Display for BeautyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A sticker glyph burned into the centre of a photo
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Sticker(String);

impl Sticker {
    pub fn new(glyph: impl Into<String>) -> Result<Self, String> {
        let glyph = glyph.into();
        let trimmed = glyph.trim();
        if trimmed.is_empty() {
            return Err("sticker glyph must not be empty".to_string());
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn glyph(&self) -> &str {
        &self.0
    }

    /// The stickers offered in the sticker menu
    pub fn catalog() -> impl Iterator<Item = Sticker> {
        STICKERS.iter().map(|g| Sticker(g.to_string()))
    }

    /// Cycle through "no sticker" and then each catalog sticker in order
    pub fn cycle(current: Option<&Sticker>) -> Option<Sticker> {
        let catalog: Vec<Sticker> = Self::catalog().collect();
        match current.and_then(|c| catalog.iter().position(|s| s == c)) {
            None if current.is_none() => catalog.into_iter().next(),
            None => None,
            Some(idx) => catalog.into_iter().nth(idx + 1),
        }
    }
}

impl TryFrom<String> for Sticker {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Sticker::new(value)
    }
}

impl From<Sticker> for String {
    fn from(sticker: Sticker) -> Self {
        sticker.0
    }
}

impl FromStr for Sticker {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Sticker::new(s)
    }
}

impl fmt::Display for Sticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parameters of one shutter press
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CaptureRequest {
    pub filter: FilterPreset,
    pub beauty: BeautyLevel,
    pub sticker: Option<Sticker>,
}

impl CaptureRequest {
    pub fn directive(&self) -> EffectDirective {
        EffectDirective::from(self)
    }
}
