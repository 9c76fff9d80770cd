// SPDX-License-Identifier: GPL-3.0-only

//! Effect pipeline
//!
//! Maps the booth controls (filter preset, beauty level) to an
//! [`EffectDirective`] and applies it to RGBA surfaces. Deriving a directive
//! is pure and cheap, so frontends re-derive it on every control change.

pub mod apply;
pub mod filters;

pub use apply::{apply_directive, apply_directive_scaled, render_preview};
pub use filters::{Adjustment, BeautyLevel, CaptureRequest, EffectDirective, FilterPreset, Sticker};
