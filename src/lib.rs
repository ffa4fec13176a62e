//! # GCS Camera Manager
//!
//! Discovery, liveness tracking and selection of camera-capable peers on a
//! remotely controlled vehicle, driven over an asynchronous, lossy
//! command/telemetry link.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                             VEHICLE                                  │
//! │   ┌──────────┐      ┌──────────┐      ┌──────────┐                   │
//! │   │ Camera 1 │      │ Camera 2 │      │ Gimbal   │  (peer components)│
//! │   └────┬─────┘      └────┬─────┘      └────┬─────┘                   │
//! └────────┼─────────────────┼─────────────────┼─────────────────────────┘
//!          │ heartbeats / info replies / stream + capture telemetry
//!          ▼                 ▼                 ▼
//! ┌──────────────────────────────────────────────────────────────────────┐
//! │                      CameraManager (manager)                         │
//! │  ┌────────────────┐  ┌──────────────────┐  ┌──────────────────────┐  │
//! │  │ Dispatch router│─▶│ DiscoveryTracker │  │ Selection + debounce │  │
//! │  │ (by peer id)   │  │ (retry, eviction)│  │ (camera/stream/zoom) │  │
//! │  └───────┬────────┘  └────────┬─────────┘  └──────────▲───────────┘  │
//! │          │                    │ info request          │ step events  │
//! │          ▼                    ▼                       │              │
//! │  ┌────────────────┐  ┌──────────────────┐  ┌──────────┴───────────┐  │
//! │  │ Roster         │  │ CommandLink      │  │ InputDevice (mpsc)   │  │
//! │  │ (CameraControl)│  │ (transport)      │  │                      │  │
//! │  └────────────────┘  └──────────────────┘  └──────────────────────┘  │
//! └──────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The manager reconciles unordered heartbeat and info-reply arrivals into a
//! monotonic roster of confirmed cameras, forwards camera-scoped telemetry to
//! the owning [`camera::CameraControl`], and applies rate-limited stepping of
//! the current camera, stream and zoom in response to discrete input events.

pub mod camera;
pub mod config;
pub mod error;
pub mod input;
pub mod manager;
pub mod protocol;
pub mod transport;

pub use error::{Error, Result};

/// Application-wide constants
pub mod constants {
    /// Minimum silence before an info request is retried, in milliseconds
    pub const INFO_RETRY_AFTER_MS: u64 = 2000;

    /// Total info requests sent before giving up on a peer
    pub const MAX_INFO_REQUESTS: u32 = 4;

    /// Heartbeat silence after which a confirmed camera is evicted, in milliseconds
    pub const HEARTBEAT_STALE_AFTER_MS: u64 = 5000;

    /// Period of the eviction sweep, in milliseconds
    pub const SWEEP_INTERVAL_MS: u64 = 500;

    /// Debounce window for zoom stepping, in milliseconds
    pub const ZOOM_DEBOUNCE_MS: u64 = 250;

    /// Debounce window shared by camera and stream stepping, in milliseconds
    pub const SWITCH_DEBOUNCE_MS: u64 = 1000;

    /// Capacity of the roster-event broadcast channel
    pub const EVENT_CHANNEL_CAPACITY: usize = 64;
}
