// SPDX-License-Identifier: MPL-2.0

//! Capture controls module
//!
//! - Capture button
//! - Clear button shown while a still is held

pub mod capture_button;
