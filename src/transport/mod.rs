//! Command link to the vehicle
//!
//! The connection itself (serial, UDP, whatever the host uses) is owned by an
//! external transport object. This module only defines the narrow contract the
//! manager needs: a fire-and-forget command send. Replies, if any, come back
//! later as ordinary decoded messages.

use tokio::sync::mpsc;

use crate::error::TransportError;
use crate::protocol::{Command, PeerId};

/// Outbound command channel to the vehicle
pub trait CommandLink: Send + Sync {
    /// Send a command addressed to a single peer. Fire-and-forget: a missing
    /// reply is not an error at this layer.
    fn send_command(&self, peer_id: PeerId, command: Command) -> Result<(), TransportError>;
}

/// A command addressed to a peer, as seen by the far end of a [`ChannelLink`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundCommand {
    pub peer_id: PeerId,
    pub command: Command,
}

/// Channel-backed [`CommandLink`] for in-process hosts and tests
pub struct ChannelLink {
    tx: mpsc::UnboundedSender<OutboundCommand>,
}

impl ChannelLink {
    /// Create a link and the receiving end the host drains commands from
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<OutboundCommand>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl CommandLink for ChannelLink {
    fn send_command(&self, peer_id: PeerId, command: Command) -> Result<(), TransportError> {
        self.tx
            .send(OutboundCommand { peer_id, command })
            .map_err(|_| TransportError::LinkClosed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_link_delivers_commands() {
        let (link, mut rx) = ChannelLink::channel();

        link.send_command(100, Command::RequestCameraInfo).unwrap();

        let out = rx.try_recv().unwrap();
        assert_eq!(out.peer_id, 100);
        assert_eq!(out.command, Command::RequestCameraInfo);
    }

    #[test]
    fn test_channel_link_closed_receiver() {
        let (link, rx) = ChannelLink::channel();
        drop(rx);

        let err = link.send_command(100, Command::RequestCameraInfo);
        assert!(matches!(err, Err(TransportError::LinkClosed)));
    }
}
