//! Discrete input events from the active control device
//!
//! The input-device manager (joystick, gamepad, hotkeys) lives outside this
//! crate; a device is represented here as a named stream of step events. Only
//! one device is active at a time — the manager drops its subscription to the
//! previous device when a new one is handed over.

use tokio::sync::mpsc;

/// A discrete step request from the operator
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    /// Zoom in (+1) or out (-1) on the current camera
    StepZoom(i32),
    /// Move camera selection forward (+1) or back (-1)
    StepCamera(i32),
    /// Move stream selection forward (+1) or back (-1)
    StepStream(i32),
}

/// Receiving side of an input device's event stream
pub struct InputDevice {
    pub name: String,
    pub events: mpsc::UnboundedReceiver<InputEvent>,
}

/// Sending side, held by the host's device driver
#[derive(Clone)]
pub struct InputHandle {
    tx: mpsc::UnboundedSender<InputEvent>,
}

impl InputDevice {
    /// Create a device and the handle its driver emits events through
    pub fn channel(name: impl Into<String>) -> (InputHandle, InputDevice) {
        let (tx, rx) = mpsc::unbounded_channel();
        (
            InputHandle { tx },
            InputDevice {
                name: name.into(),
                events: rx,
            },
        )
    }
}

impl InputHandle {
    /// Emit a step event. Returns false once the device is unsubscribed.
    pub fn send(&self, event: InputEvent) -> bool {
        self.tx.send(event).is_ok()
    }
}
