//! Camera Roster Monitor
//!
//! Runs the camera manager against a simulated vehicle with two camera
//! peers, a lossy first info request, and a synthetic input device stepping
//! through the roster. Useful for watching discovery, retry, selection and
//! eviction behavior in the logs.

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use gcs_camera_manager::{
    camera::GenericCameraFactory,
    config::AppConfig,
    input::{InputDevice, InputEvent},
    manager::CameraManager,
    protocol::{CameraInfoPayload, HeartbeatPayload, Message, MessageKind, StreamInfoPayload},
    transport::{ChannelLink, OutboundCommand},
};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting camera roster monitor");

    let config = AppConfig::load_or_default()?;
    let vehicle_id = config.vehicle.system_id;

    let (link, mut commands) = ChannelLink::channel();
    let manager = Arc::new(CameraManager::new(
        &config,
        Arc::new(link),
        Arc::new(GenericCameraFactory),
    ));
    manager.set_vehicle_ready(true);

    // Inbound channel standing in for the decoded-message stream.
    let (msg_tx, mut msg_rx) = tokio::sync::mpsc::unbounded_channel::<Message>();

    // Simulated vehicle: answers info requests, but peer 100 drops the first
    // one so the retry path is visible in the logs.
    {
        let msg_tx = msg_tx.clone();
        tokio::spawn(async move {
            let mut dropped_first = false;
            while let Some(OutboundCommand { peer_id, .. }) = commands.recv().await {
                if peer_id == 100 && !dropped_first {
                    dropped_first = true;
                    tracing::info!(peer_id, "Vehicle sim: dropping first info request");
                    continue;
                }
                let info = CameraInfoPayload {
                    vendor_name: "ACME".to_string(),
                    model_name: format!("Eyeball Mk{}", peer_id - 99),
                    firmware_version: 1,
                    capability_flags: CameraInfoPayload::CAP_HAS_VIDEO_STREAM
                        | CameraInfoPayload::CAP_HAS_ZOOM,
                    resolution_h: 1920,
                    resolution_v: 1080,
                };
                let _ = msg_tx.send(Message::new(
                    vehicle_id,
                    peer_id,
                    MessageKind::CameraInfo(info),
                ));
                let _ = msg_tx.send(Message::new(
                    vehicle_id,
                    peer_id,
                    MessageKind::StreamInfo(StreamInfoPayload {
                        stream_id: 1,
                        name: "main".to_string(),
                        uri: format!("rtsp://vehicle/peer{}/main", peer_id),
                        framerate: 30.0,
                        resolution_h: 1920,
                        resolution_v: 1080,
                    }),
                ));
            }
        });
    }

    // Two camera peers heartbeating once a second.
    {
        let msg_tx = msg_tx.clone();
        tokio::spawn(async move {
            loop {
                for peer_id in [100u8, 101] {
                    let _ = msg_tx.send(Message::new(
                        vehicle_id,
                        peer_id,
                        MessageKind::Heartbeat(HeartbeatPayload::default()),
                    ));
                }
                tokio::time::sleep(Duration::from_secs(1)).await;
            }
        });
    }

    // Deliver decoded messages to the manager in arrival order.
    {
        let manager = manager.clone();
        tokio::spawn(async move {
            while let Some(message) = msg_rx.recv().await {
                manager.handle_message(&message);
            }
        });
    }

    // Operator stand-in: step to the next camera every five seconds.
    let (input_handle, input_device) = InputDevice::channel("sim-gamepad");
    manager.set_active_input(Some(input_device));
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(5)).await;
            if !input_handle.send(InputEvent::StepCamera(1)) {
                break;
            }
        }
    });

    // Trace change notifications as they happen.
    {
        let mut events = manager.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                tracing::debug!(?event, "Roster event");
            }
        });
    }

    // Periodic roster dump.
    loop {
        tokio::time::sleep(Duration::from_secs(2)).await;
        let status = serde_json::json!({
            "cameras": manager.camera_labels(),
            "current": manager.current_index(),
            "stream": manager.current_stream_info().map(|s| s.name),
        });
        tracing::info!(%status, "Roster");
    }
}
