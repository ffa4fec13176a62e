//! Camera instances and the factory that builds them
//!
//! The manager treats cameras as opaque [`CameraControl`] objects produced by
//! a host-supplied [`CameraFactory`]. [`GenericCamera`] is a reasonable
//! default that stores the info payload, accumulates stream descriptions and
//! tracks the latest telemetry; hosts with vendor-specific behavior plug in
//! their own factory.

use tracing::debug;

use crate::protocol::{
    CameraInfoPayload, CameraSettingsPayload, CaptureStatusPayload, ParamAckPayload,
    ParamValuePayload, PeerId, StorageInfoPayload, StreamInfoPayload, StreamStatusPayload,
};

/// Per-camera control surface consumed by the manager
pub trait CameraControl: Send {
    /// Component id of the peer this camera lives on
    fn peer_id(&self) -> PeerId;

    /// Display label shown in camera lists
    fn model_name(&self) -> &str;

    fn stream_count(&self) -> usize;

    fn current_stream(&self) -> usize;

    fn set_current_stream(&mut self, index: usize);

    fn current_stream_info(&self) -> Option<&StreamInfoPayload>;

    /// Apply a discrete zoom step (+1 in, -1 out)
    fn step_zoom(&mut self, direction: i32);

    fn handle_capture_status(&mut self, status: CaptureStatusPayload);

    fn handle_storage_info(&mut self, info: StorageInfoPayload);

    fn handle_settings(&mut self, settings: CameraSettingsPayload);

    fn handle_param_ack(&mut self, ack: ParamAckPayload);

    fn handle_param_value(&mut self, value: ParamValuePayload);

    fn handle_stream_info(&mut self, info: StreamInfoPayload);

    fn handle_stream_status(&mut self, status: StreamStatusPayload);
}

/// Builds a [`CameraControl`] from a decoded info reply
pub trait CameraFactory: Send + Sync {
    /// Returns `None` when the payload describes something this factory
    /// cannot drive (the peer then stays undiscovered).
    fn create(&self, info: &CameraInfoPayload, peer_id: PeerId) -> Option<Box<dyn CameraControl>>;
}

/// Default camera implementation backed entirely by received telemetry
pub struct GenericCamera {
    peer_id: PeerId,
    info: CameraInfoPayload,
    label: String,
    streams: Vec<StreamInfoPayload>,
    current_stream: usize,
    zoom_level: i32,
    last_capture_status: Option<CaptureStatusPayload>,
    last_storage_info: Option<StorageInfoPayload>,
    last_settings: Option<CameraSettingsPayload>,
}

impl GenericCamera {
    pub fn new(info: CameraInfoPayload, peer_id: PeerId) -> Self {
        let label = if info.vendor_name.is_empty() {
            info.model_name.clone()
        } else {
            format!("{} {}", info.vendor_name, info.model_name)
        };
        Self {
            peer_id,
            info,
            label,
            streams: Vec::new(),
            current_stream: 0,
            zoom_level: 0,
            last_capture_status: None,
            last_storage_info: None,
            last_settings: None,
        }
    }

    pub fn info(&self) -> &CameraInfoPayload {
        &self.info
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    pub fn capture_status(&self) -> Option<&CaptureStatusPayload> {
        self.last_capture_status.as_ref()
    }

    pub fn storage_info(&self) -> Option<&StorageInfoPayload> {
        self.last_storage_info.as_ref()
    }

    pub fn settings(&self) -> Option<&CameraSettingsPayload> {
        self.last_settings.as_ref()
    }
}

impl CameraControl for GenericCamera {
    fn peer_id(&self) -> PeerId {
        self.peer_id
    }

    fn model_name(&self) -> &str {
        &self.label
    }

    fn stream_count(&self) -> usize {
        self.streams.len()
    }

    fn current_stream(&self) -> usize {
        self.current_stream
    }

    fn set_current_stream(&mut self, index: usize) {
        if index < self.streams.len() {
            self.current_stream = index;
        }
    }

    fn current_stream_info(&self) -> Option<&StreamInfoPayload> {
        self.streams.get(self.current_stream)
    }

    fn step_zoom(&mut self, direction: i32) {
        if self.info.has_zoom() {
            self.zoom_level += direction.signum();
            debug!(
                peer_id = self.peer_id,
                zoom = self.zoom_level,
                "Stepped zoom"
            );
        }
    }

    fn handle_capture_status(&mut self, status: CaptureStatusPayload) {
        self.last_capture_status = Some(status);
    }

    fn handle_storage_info(&mut self, info: StorageInfoPayload) {
        self.last_storage_info = Some(info);
    }

    fn handle_settings(&mut self, settings: CameraSettingsPayload) {
        self.last_settings = Some(settings);
    }

    fn handle_param_ack(&mut self, ack: ParamAckPayload) {
        if !ack.accepted {
            debug!(peer_id = self.peer_id, param = %ack.param_id, "Parameter write rejected");
        }
    }

    fn handle_param_value(&mut self, value: ParamValuePayload) {
        debug!(peer_id = self.peer_id, param = %value.param_id, value = %value.value, "Parameter value");
    }

    fn handle_stream_info(&mut self, info: StreamInfoPayload) {
        // One slot per stream id; replace on repeat announcements.
        match self.streams.iter_mut().find(|s| s.stream_id == info.stream_id) {
            Some(slot) => *slot = info,
            None => self.streams.push(info),
        }
    }

    fn handle_stream_status(&mut self, status: StreamStatusPayload) {
        if let Some(stream) = self
            .streams
            .iter_mut()
            .find(|s| s.stream_id == status.stream_id)
        {
            stream.framerate = status.framerate;
        }
    }
}

/// Factory producing [`GenericCamera`] for any video-capable peer
#[derive(Default)]
pub struct GenericCameraFactory;

impl CameraFactory for GenericCameraFactory {
    fn create(&self, info: &CameraInfoPayload, peer_id: PeerId) -> Option<Box<dyn CameraControl>> {
        if info.model_name.is_empty() {
            return None;
        }
        Some(Box::new(GenericCamera::new(info.clone(), peer_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(model: &str) -> CameraInfoPayload {
        CameraInfoPayload {
            vendor_name: "ACME".to_string(),
            model_name: model.to_string(),
            firmware_version: 1,
            capability_flags: CameraInfoPayload::CAP_HAS_VIDEO_STREAM
                | CameraInfoPayload::CAP_HAS_ZOOM,
            resolution_h: 1920,
            resolution_v: 1080,
        }
    }

    fn stream(id: u8, name: &str) -> StreamInfoPayload {
        StreamInfoPayload {
            stream_id: id,
            name: name.to_string(),
            uri: format!("rtsp://vehicle/{}", name),
            framerate: 30.0,
            resolution_h: 1920,
            resolution_v: 1080,
        }
    }

    #[test]
    fn test_label_includes_vendor() {
        let cam = GenericCamera::new(info("Eyeball"), 100);
        assert_eq!(cam.model_name(), "ACME Eyeball");
    }

    #[test]
    fn test_stream_info_replaces_by_id() {
        let mut cam = GenericCamera::new(info("Eyeball"), 100);
        cam.handle_stream_info(stream(1, "main"));
        cam.handle_stream_info(stream(2, "thermal"));
        cam.handle_stream_info(stream(1, "main-updated"));

        assert_eq!(cam.stream_count(), 2);
        assert_eq!(cam.current_stream_info().unwrap().name, "main-updated");
    }

    #[test]
    fn test_set_current_stream_out_of_range_ignored() {
        let mut cam = GenericCamera::new(info("Eyeball"), 100);
        cam.handle_stream_info(stream(1, "main"));

        cam.set_current_stream(5);
        assert_eq!(cam.current_stream(), 0);
    }

    #[test]
    fn test_factory_rejects_nameless_payload() {
        let factory = GenericCameraFactory;
        let mut payload = info("Eyeball");
        payload.model_name.clear();
        assert!(factory.create(&payload, 100).is_none());
    }
}
