// SPDX-License-Identifier: GPL-3.0-only

//! Camera discovery through the GStreamer device monitor
//!
//! The monitor reports devices from every installed provider. When PipeWire
//! exposes cameras, the raw V4L2 nodes behind them are hidden so each physical
//! camera appears once.

use super::super::types::{CameraDevice, DeviceApi};
use gstreamer::prelude::*;
use tracing::{debug, info, warn};

/// Enumerate video sources currently present
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    if let Err(e) = gstreamer::init() {
        warn!(error = %e, "GStreamer init failed");
        return Vec::new();
    }

    let monitor = gstreamer::DeviceMonitor::new();
    monitor.add_filter(Some("Video/Source"), None);
    if let Err(e) = monitor.start() {
        warn!(error = %e, "Device monitor failed to start");
        return Vec::new();
    }
    let devices = monitor.devices();
    monitor.stop();

    let cameras: Vec<CameraDevice> = devices.iter().filter_map(camera_from_device).collect();
    let cameras = prefer_pipewire(cameras);
    info!(count = cameras.len(), "Enumerated cameras");
    cameras
}

fn camera_from_device(device: &gstreamer::Device) -> Option<CameraDevice> {
    let name = device.display_name().to_string();
    let properties = device.properties()?;
    let api = property_string(&properties, "device.api");

    let (api, path) = match api.as_deref() {
        Some("pipewire") => (
            DeviceApi::PipeWire,
            property_string(&properties, "object.serial")?,
        ),
        Some("v4l2") => (
            DeviceApi::V4l2,
            property_string(&properties, "api.v4l2.path")
                .or_else(|| property_string(&properties, "device.path"))?,
        ),
        other => {
            debug!(name = %name, api = ?other, "Skipping device with unsupported API");
            return None;
        }
    };

    debug!(name = %name, api = %api, path = %path, "Found camera");
    Some(CameraDevice { name, path, api })
}

/// Read a property as text whatever its GValue type
fn property_string(properties: &gstreamer::StructureRef, key: &str) -> Option<String> {
    let value = properties.value(key).ok()?;
    value
        .get::<String>()
        .ok()
        .or_else(|| value.serialize().ok().map(|s| s.to_string()))
        .filter(|s| !s.is_empty())
}

/// Drop V4L2 duplicates when PipeWire already exposes cameras
pub(crate) fn prefer_pipewire(cameras: Vec<CameraDevice>) -> Vec<CameraDevice> {
    let has_pipewire = cameras.iter().any(|c| c.api == DeviceApi::PipeWire);
    let mut filtered: Vec<CameraDevice> = Vec::with_capacity(cameras.len());

    for camera in cameras {
        if has_pipewire && camera.api != DeviceApi::PipeWire {
            continue;
        }
        if !filtered.iter().any(|c| c.path == camera.path) {
            filtered.push(camera);
        }
    }
    filtered
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera(name: &str, path: &str, api: DeviceApi) -> CameraDevice {
        CameraDevice {
            name: name.to_string(),
            path: path.to_string(),
            api,
        }
    }

    #[test]
    fn test_pipewire_hides_v4l2_nodes() {
        let cameras = vec![
            camera("Webcam (V4L2)", "/dev/video0", DeviceApi::V4l2),
            camera("Webcam", "57", DeviceApi::PipeWire),
        ];
        let filtered = prefer_pipewire(cameras);
        assert_eq!(filtered.len(), 1);
        assert_eq!(filtered[0].api, DeviceApi::PipeWire);
    }

    #[test]
    fn test_v4l2_only_keeps_unique_paths() {
        let cameras = vec![
            camera("Webcam", "/dev/video0", DeviceApi::V4l2),
            camera("Webcam", "/dev/video0", DeviceApi::V4l2),
            camera("IR Camera", "/dev/video2", DeviceApi::V4l2),
        ];
        assert_eq!(prefer_pipewire(cameras).len(), 2);
    }
}
