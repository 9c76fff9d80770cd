// SPDX-License-Identifier: MPL-2.0

//! Processing pipelines
//!
//! Capture work runs off the live preview: the preview keeps rendering while
//! a shutter press is composited and encoded.
//!
//! ```text
//! ┌──────────────┐     ┌───────────────────┐     ┌──────────────┐
//! │ Camera Frame │ ──▶ │  Photo Pipeline   │ ──▶ │ CapturedImage│
//! │   (RGBA)     │     │  - Mirror         │     │  (JPEG, URI) │
//! │              │     │  - Directive      │     │              │
//! │              │     │  - Sticker        │     │              │
//! └──────────────┘     └───────────────────┘     └──────────────┘
//! ```
//!
//! # Modules
//!
//! - [`photo`]: compositing and JPEG encoding of a single shutter press

pub mod photo;
