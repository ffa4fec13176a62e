//! Decoded protocol messages exchanged with the vehicle
//!
//! The wire codec lives outside this crate; everything here is already
//! decoded into typed structures. Messages are tagged with the originating
//! vehicle and the peer (component) that produced them.

use serde::{Deserialize, Serialize};

/// Identifier of a vehicle on the link
pub type VehicleId = u8;

/// Identifier of an addressable component within a vehicle
pub type PeerId = u8;

/// A decoded message delivered by the transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Vehicle the message originated from
    pub vehicle_id: VehicleId,
    /// Component within the vehicle
    pub peer_id: PeerId,
    pub kind: MessageKind,
}

impl Message {
    pub fn new(vehicle_id: VehicleId, peer_id: PeerId, kind: MessageKind) -> Self {
        Self {
            vehicle_id,
            peer_id,
            kind,
        }
    }
}

/// Message kinds this core recognizes
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum MessageKind {
    Heartbeat(HeartbeatPayload),
    CameraInfo(CameraInfoPayload),
    CaptureStatus(CaptureStatusPayload),
    StorageInfo(StorageInfoPayload),
    CameraSettings(CameraSettingsPayload),
    ParamAck(ParamAckPayload),
    ParamValue(ParamValuePayload),
    StreamInfo(StreamInfoPayload),
    StreamStatus(StreamStatusPayload),
    /// Any message id the codec decoded but this core does not handle
    Unknown { msg_id: u32 },
}

/// Commands this core emits back over the link
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Command {
    /// Ask a peer to send its camera information
    RequestCameraInfo,
}

/// Periodic liveness signal from a peer
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HeartbeatPayload {
    /// Raw component type reported by the peer
    pub component_type: u8,
}

/// Reply to [`Command::RequestCameraInfo`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CameraInfoPayload {
    pub vendor_name: String,
    pub model_name: String,
    pub firmware_version: u32,
    /// Capability bitmask (video streaming, zoom, capture modes)
    pub capability_flags: u32,
    pub resolution_h: u16,
    pub resolution_v: u16,
}

impl CameraInfoPayload {
    /// Peer advertises at least one video stream
    pub const CAP_HAS_VIDEO_STREAM: u32 = 1 << 0;
    /// Peer supports zoom commands
    pub const CAP_HAS_ZOOM: u32 = 1 << 1;

    pub fn has_video_stream(&self) -> bool {
        self.capability_flags & Self::CAP_HAS_VIDEO_STREAM != 0
    }

    pub fn has_zoom(&self) -> bool {
        self.capability_flags & Self::CAP_HAS_ZOOM != 0
    }
}

/// Current image/video capture state of a camera
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CaptureStatusPayload {
    pub image_capturing: bool,
    pub video_recording: bool,
    /// Elapsed recording time in milliseconds
    pub recording_time_ms: u32,
    pub available_capacity_mib: f32,
}

/// Storage media report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StorageInfoPayload {
    pub storage_id: u8,
    pub total_capacity_mib: f32,
    pub used_capacity_mib: f32,
}

/// Camera mode report
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CameraSettingsPayload {
    pub mode: CameraMode,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CameraMode {
    #[default]
    Photo,
    Video,
    Survey,
}

/// Acknowledgment of an extended parameter write
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamAckPayload {
    pub param_id: String,
    pub accepted: bool,
}

/// Extended parameter value report
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParamValuePayload {
    pub param_id: String,
    pub value: String,
}

/// Description of one video stream offered by a camera
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StreamInfoPayload {
    pub stream_id: u8,
    pub name: String,
    pub uri: String,
    pub framerate: f32,
    pub resolution_h: u16,
    pub resolution_v: u16,
}

/// Live status of a video stream
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StreamStatusPayload {
    pub stream_id: u8,
    pub active: bool,
    pub framerate: f32,
}
