// SPDX-License-Identifier: GPL-3.0-only

//! Session operation handlers
//!
//! Operations are grouped by functional domain, each adding methods to
//! [`AppModel`](crate::app::AppModel).

pub mod camera;
pub mod capture;
pub mod wall;
