// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for camera access
//!
//! - [`camera`]: Camera backend with device enumeration, capture session and photo capture
//! - [`permission`]: Camera authorization through the XDG Desktop Portal

pub mod camera;
pub mod permission;
