// SPDX-License-Identifier: GPL-3.0-only

//! Settings page module
//!
//! Appearance, camera and emotion model settings, plus a debug-only label
//! override.

pub mod view;
