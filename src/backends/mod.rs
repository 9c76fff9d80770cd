// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for frame capture
//!
//! The backend layer abstracts hardware access, providing a consistent API
//! regardless of where frames come from:
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 Booth Layer                  │
//! └────────────────────┬────────────────────────┘
//!                      │
//! ┌────────────────────┴────────────────────────┐
//! │              Backend Layer                   │
//! │   ┌──────────┐  ┌───────────┐  ┌────────┐   │
//! │   │ Pattern  │  │ Still img │  │  V4L2  │   │
//! │   └──────────┘  └───────────┘  └────────┘   │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`camera`]: camera backends, media acquisition and frame types

pub mod camera;
