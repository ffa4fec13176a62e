//! Camera manager: dispatch router, discovery driver, selection controller
//!
//! One [`CameraManager`] tracks one vehicle. Decoded messages are routed by
//! peer id: heartbeats and info replies drive the discovery tracker, all
//! other camera-scoped kinds are forwarded to the owning camera instance.
//! A periodic sweep task evicts confirmed cameras whose heartbeats stop, and
//! debounced step events from the active input device move the current
//! camera/stream/zoom.

pub mod discovery;
pub mod roster;

pub use discovery::{DiscoveryState, DiscoveryTracker, HeartbeatAction, PeerDiscoveryRecord};
pub use roster::Roster;

use std::sync::{Arc, Weak};
use std::time::Instant;

use parking_lot::Mutex;
use tokio::sync::broadcast;
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::camera::{CameraControl, CameraFactory};
use crate::config::{AppConfig, SelectionConfig};
use crate::constants::EVENT_CHANNEL_CAPACITY;
use crate::input::{InputDevice, InputEvent};
use crate::protocol::{Command, Message, MessageKind, PeerId, StreamInfoPayload, VehicleId};
use crate::transport::CommandLink;

/// Change notifications broadcast to observers (UI, video pipeline)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RosterEvent {
    /// A camera was added or removed
    RosterChanged,
    /// The label list changed
    LabelsChanged,
    /// The current camera selection changed
    CurrentCameraChanged,
    /// The current stream (or the camera it is scoped to) changed
    StreamChanged,
}

struct Inner {
    vehicle_id: VehicleId,
    primary_component: PeerId,
    vehicle_ready: bool,
    discovery: DiscoveryTracker,
    roster: Roster,
    link: Arc<dyn CommandLink>,
    factory: Arc<dyn CameraFactory>,
    selection: SelectionConfig,
    last_zoom_change: Instant,
    last_switch_change: Instant,
    events: broadcast::Sender<RosterEvent>,
}

/// Discovery, liveness and selection manager for one vehicle's cameras
pub struct CameraManager {
    inner: Arc<Mutex<Inner>>,
    events: broadcast::Sender<RosterEvent>,
    sweep_task: JoinHandle<()>,
    input_task: Mutex<Option<JoinHandle<()>>>,
}

impl CameraManager {
    /// Create the manager and start its eviction sweep. Must be called from
    /// within a tokio runtime.
    pub fn new(
        config: &AppConfig,
        link: Arc<dyn CommandLink>,
        factory: Arc<dyn CameraFactory>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let now = Instant::now();
        let inner = Arc::new(Mutex::new(Inner {
            vehicle_id: config.vehicle.system_id,
            primary_component: config.vehicle.primary_component,
            vehicle_ready: false,
            discovery: DiscoveryTracker::new(config.discovery.clone()),
            roster: Roster::new(),
            link,
            factory,
            selection: config.selection.clone(),
            last_zoom_change: now,
            last_switch_change: now,
            events: events.clone(),
        }));

        let sweep_task = Self::spawn_sweep(Arc::downgrade(&inner), config.discovery.sweep_interval());
        debug!(vehicle_id = config.vehicle.system_id, "Camera manager created");

        Self {
            inner,
            events,
            sweep_task,
            input_task: Mutex::new(None),
        }
    }

    fn spawn_sweep(inner: Weak<Mutex<Inner>>, period: std::time::Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                let Some(inner) = inner.upgrade() else { break };
                inner.lock().sweep_at(Instant::now());
            }
        })
    }

    /// Subscribe to roster/selection change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    /// Discovery accepts heartbeats only while the vehicle is ready
    pub fn set_vehicle_ready(&self, ready: bool) {
        debug!(ready, "Vehicle readiness changed");
        self.inner.lock().vehicle_ready = ready;
    }

    /// Entry point for every decoded message from the transport
    pub fn handle_message(&self, message: &Message) {
        self.inner.lock().handle_message_at(message, Instant::now());
    }

    /// Entry point for step events, when the host delivers them directly
    pub fn handle_input(&self, event: InputEvent) {
        self.inner.lock().handle_input_at(event, Instant::now());
    }

    /// Hand over the active input device. Events from a previously active
    /// device stop being delivered immediately.
    pub fn set_active_input(&self, device: Option<InputDevice>) {
        let mut slot = self.input_task.lock();
        if let Some(task) = slot.take() {
            task.abort();
        }
        let Some(mut device) = device else {
            debug!("Input device cleared");
            return;
        };
        debug!(device = %device.name, "Input device changed");
        let inner = Arc::downgrade(&self.inner);
        *slot = Some(tokio::spawn(async move {
            while let Some(event) = device.events.recv().await {
                let Some(inner) = inner.upgrade() else { break };
                inner.lock().handle_input_at(event, Instant::now());
            }
        }));
    }

    /// Select a camera by index; no-op when out of range or unchanged
    pub fn set_current_camera(&self, index: usize) {
        self.inner.lock().set_current_camera(index);
    }

    pub fn camera_count(&self) -> usize {
        self.inner.lock().roster.len()
    }

    pub fn camera_labels(&self) -> Vec<String> {
        self.inner.lock().roster.labels().to_vec()
    }

    pub fn current_index(&self) -> Option<usize> {
        self.inner.lock().roster.current_index()
    }

    pub fn current_camera_peer(&self) -> Option<PeerId> {
        self.inner.lock().roster.current_camera().map(|c| c.peer_id())
    }

    pub fn current_stream_info(&self) -> Option<StreamInfoPayload> {
        self.inner
            .lock()
            .roster
            .current_camera()
            .and_then(|c| c.current_stream_info().cloned())
    }

    /// Run a closure against the currently selected camera, if any
    pub fn with_current_camera<R>(&self, f: impl FnOnce(&mut dyn CameraControl) -> R) -> Option<R> {
        self.inner.lock().roster.current_camera_mut().map(f)
    }
}

impl Drop for CameraManager {
    fn drop(&mut self) {
        self.sweep_task.abort();
        if let Some(task) = self.input_task.lock().take() {
            task.abort();
        }
    }
}

impl Inner {
    fn emit(&self, event: RosterEvent) {
        // Err just means nobody is subscribed.
        let _ = self.events.send(event);
    }

    fn handle_message_at(&mut self, message: &Message, now: Instant) {
        if message.vehicle_id != self.vehicle_id {
            return;
        }
        match &message.kind {
            MessageKind::Heartbeat(_) => self.handle_heartbeat_at(message.peer_id, now),
            MessageKind::CameraInfo(payload) => {
                let payload = payload.clone();
                self.handle_camera_info(message.peer_id, &payload);
            }
            MessageKind::CaptureStatus(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "capture status", |c| {
                    c.handle_capture_status(payload)
                });
            }
            MessageKind::StorageInfo(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "storage info", |c| {
                    c.handle_storage_info(payload)
                });
            }
            MessageKind::CameraSettings(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "settings", |c| c.handle_settings(payload));
            }
            MessageKind::ParamAck(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "param ack", |c| c.handle_param_ack(payload));
            }
            MessageKind::ParamValue(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "param value", |c| {
                    c.handle_param_value(payload)
                });
            }
            MessageKind::StreamInfo(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "stream info", |c| {
                    c.handle_stream_info(payload)
                });
            }
            MessageKind::StreamStatus(payload) => {
                let payload = payload.clone();
                self.forward(message.peer_id, "stream status", |c| {
                    c.handle_stream_status(payload)
                });
            }
            MessageKind::Unknown { msg_id } => {
                trace!(msg_id, "Ignoring unhandled message kind");
            }
        }
    }

    /// Forward a camera-scoped message to the owning instance. Messages for
    /// peers that never completed discovery (or were evicted) are dropped.
    fn forward(&mut self, peer_id: PeerId, kind: &str, f: impl FnOnce(&mut dyn CameraControl)) {
        match self.roster.get_mut_by_peer(peer_id) {
            Some(camera) => f(camera),
            None => warn!(peer_id, kind, "Camera component id not found, dropping message"),
        }
    }

    fn handle_heartbeat_at(&mut self, peer_id: PeerId, now: Instant) {
        if !self.vehicle_ready || peer_id == self.primary_component {
            return;
        }
        match self.discovery.on_heartbeat(peer_id, now) {
            HeartbeatAction::RequestInfo { attempt } => {
                debug!(peer_id, attempt, "Requesting camera info");
                if let Err(e) = self.link.send_command(peer_id, Command::RequestCameraInfo) {
                    warn!(peer_id, error = %e, "Failed to send camera info request");
                }
            }
            HeartbeatAction::GaveUp { first: true } => {
                warn!(
                    vehicle_id = self.vehicle_id,
                    peer_id, "Giving up requesting camera info"
                );
            }
            _ => {}
        }
    }

    fn handle_camera_info(&mut self, peer_id: PeerId, payload: &crate::protocol::CameraInfoPayload) {
        if !self.discovery.on_info_reply(peer_id) {
            return;
        }
        debug!(
            peer_id,
            model = %payload.model_name,
            vendor = %payload.vendor_name,
            "Camera info received"
        );
        match self.factory.create(payload, peer_id) {
            Some(camera) => {
                let label = camera.model_name().to_string();
                if self.roster.push(camera) {
                    info!(peer_id, label = %label, "Camera added to roster");
                    self.emit(RosterEvent::RosterChanged);
                    self.emit(RosterEvent::LabelsChanged);
                }
            }
            // The record stays InfoReceived so the request is not repeated;
            // the peer remains effectively undiscovered.
            None => warn!(peer_id, "Camera info payload rejected by factory"),
        }
    }

    /// Evict every confirmed camera whose heartbeats have gone silent
    fn sweep_at(&mut self, now: Instant) {
        for peer_id in self.discovery.stale_peers(now) {
            self.discovery.remove(peer_id);
            if let Some(outcome) = self.roster.remove_peer(peer_id) {
                warn!(
                    peer_id,
                    label = %outcome.label,
                    "Camera stopped transmitting. Removing from list"
                );
                self.emit(RosterEvent::RosterChanged);
                self.emit(RosterEvent::LabelsChanged);
                if outcome.selection_changed {
                    self.emit(RosterEvent::CurrentCameraChanged);
                    self.emit(RosterEvent::StreamChanged);
                }
            }
        }
    }

    fn set_current_camera(&mut self, index: usize) {
        if self.roster.set_current(index) {
            self.emit(RosterEvent::CurrentCameraChanged);
            self.emit(RosterEvent::StreamChanged);
        }
    }

    fn handle_input_at(&mut self, event: InputEvent, now: Instant) {
        match event {
            InputEvent::StepZoom(direction) => {
                if now.duration_since(self.last_zoom_change) > self.selection.zoom_debounce() {
                    self.last_zoom_change = now;
                    debug!(direction, "Step camera zoom");
                    if let Some(camera) = self.roster.current_camera_mut() {
                        camera.step_zoom(direction);
                    }
                }
            }
            InputEvent::StepCamera(direction) => {
                if now.duration_since(self.last_switch_change) > self.selection.switch_debounce() {
                    self.last_switch_change = now;
                    debug!(direction, "Step camera");
                    let count = self.roster.len();
                    if count == 0 {
                        return;
                    }
                    let current = self.roster.current_index().unwrap_or(0) as i64;
                    let next = (current + direction as i64).rem_euclid(count as i64) as usize;
                    self.set_current_camera(next);
                }
            }
            InputEvent::StepStream(direction) => {
                if now.duration_since(self.last_switch_change) > self.selection.switch_debounce() {
                    self.last_switch_change = now;
                    let mut changed = false;
                    if let Some(camera) = self.roster.current_camera_mut() {
                        let count = camera.stream_count();
                        if count > 0 {
                            debug!(direction, "Step camera stream");
                            let next = (camera.current_stream() as i64 + direction as i64)
                                .rem_euclid(count as i64) as usize;
                            camera.set_current_stream(next);
                            changed = true;
                        }
                    }
                    if changed {
                        self.emit(RosterEvent::StreamChanged);
                    }
                }
            }
        }
    }
}
