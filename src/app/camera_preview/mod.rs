// SPDX-License-Identifier: MPL-2.0

//! Camera preview module
//!
//! Turns RGBA frames into image handles for the mood page. The live preview
//! and the held still go through the same conversion so a mirrored preview
//! is captured the way the user saw it.

pub mod widget;

use crate::backends::camera::CameraFrame;
use crate::errors::ClassifyError;
use cosmic::widget::image::Handle;
use image::{RgbaImage, imageops};

/// Tightly packed RGBA pixels, flipped horizontally when `mirror` is set
pub fn display_image(frame: &CameraFrame, mirror: bool) -> Result<RgbaImage, ClassifyError> {
    let mut image = frame.to_rgba_image()?;
    if mirror {
        imageops::flip_horizontal_in_place(&mut image);
    }
    Ok(image)
}

/// Image handle for the preview or held still
pub fn frame_handle(frame: &CameraFrame, mirror: bool) -> Result<Handle, ClassifyError> {
    let image = display_image(frame, mirror)?;
    let (width, height) = image.dimensions();
    Ok(Handle::from_rgba(width, height, image.into_raw()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_pixel_frame() -> CameraFrame {
        // red, blue
        CameraFrame::from_rgba(2, 1, vec![255, 0, 0, 255, 0, 0, 255, 255])
    }

    #[test]
    fn test_display_image_unmirrored() {
        let image = display_image(&two_pixel_frame(), false).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 255, 255]);
    }

    #[test]
    fn test_display_image_mirrored() {
        let image = display_image(&two_pixel_frame(), true).unwrap();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }

    #[test]
    fn test_short_buffer_is_rejected() {
        let frame = CameraFrame::from_rgba(4, 4, vec![0; 8]);
        assert!(display_image(&frame, false).is_err());
    }
}
