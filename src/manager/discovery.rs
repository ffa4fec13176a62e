//! Per-peer discovery and liveness state machine
//!
//! Heartbeats from non-primary components mark a peer as a camera candidate.
//! The tracker requests camera info with a bounded retry budget, confirms the
//! peer once an info reply arrives, and reports confirmed peers whose
//! heartbeats have gone silent so the manager can evict them.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::time::Instant;

use crate::config::DiscoveryConfig;
use crate::protocol::PeerId;

/// Discovery progress for one peer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryState {
    /// Info requested, no reply yet
    Requesting,
    /// Info reply received, peer is a confirmed camera
    InfoReceived,
    /// Retry budget exhausted, peer is permanently inert
    GivenUp,
}

/// Tracking record for one peer
#[derive(Debug)]
pub struct PeerDiscoveryRecord {
    pub state: DiscoveryState,
    /// Info requests sent so far
    pub try_count: u32,
    /// Set at creation and refreshed on each heartbeat once confirmed.
    /// Deliberately NOT refreshed by heartbeats while still requesting, so
    /// once the initial retry window lapses every further heartbeat
    /// re-satisfies the elapsed check until the budget runs out.
    pub last_heartbeat_at: Instant,
}

/// What the manager should do after feeding a heartbeat to the tracker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartbeatAction {
    /// Emit an info request to the peer (`attempt` counts from 1)
    RequestInfo { attempt: u32 },
    /// Confirmed peer, liveness refreshed
    Refreshed,
    /// Retry budget exhausted; warn only on the first transition
    GaveUp { first: bool },
    /// Still inside the retry window, nothing to do
    Waiting,
}

/// Discovery records for all peers of one vehicle
pub struct DiscoveryTracker {
    config: DiscoveryConfig,
    records: HashMap<PeerId, PeerDiscoveryRecord>,
}

impl DiscoveryTracker {
    pub fn new(config: DiscoveryConfig) -> Self {
        Self {
            config,
            records: HashMap::new(),
        }
    }

    /// Feed a heartbeat from a candidate peer
    pub fn on_heartbeat(&mut self, peer_id: PeerId, now: Instant) -> HeartbeatAction {
        let record = match self.records.entry(peer_id) {
            Entry::Vacant(entry) => {
                entry.insert(PeerDiscoveryRecord {
                    state: DiscoveryState::Requesting,
                    try_count: 1,
                    last_heartbeat_at: now,
                });
                return HeartbeatAction::RequestInfo { attempt: 1 };
            }
            Entry::Occupied(entry) => entry.into_mut(),
        };

        if record.state == DiscoveryState::InfoReceived {
            record.last_heartbeat_at = now;
            return HeartbeatAction::Refreshed;
        }

        // Still waiting for info (or already given up).
        if now.duration_since(record.last_heartbeat_at) <= self.config.retry_after() {
            return HeartbeatAction::Waiting;
        }
        if record.try_count >= self.config.max_requests {
            let first = record.state != DiscoveryState::GivenUp;
            record.state = DiscoveryState::GivenUp;
            return HeartbeatAction::GaveUp { first };
        }
        record.try_count += 1;
        HeartbeatAction::RequestInfo {
            attempt: record.try_count,
        }
    }

    /// Feed an info reply. Returns true exactly once per peer, on the
    /// `Requesting` -> `InfoReceived` transition; replies for unknown,
    /// already-confirmed or given-up peers are ignored.
    pub fn on_info_reply(&mut self, peer_id: PeerId) -> bool {
        match self.records.get_mut(&peer_id) {
            Some(record) if record.state == DiscoveryState::Requesting => {
                record.state = DiscoveryState::InfoReceived;
                true
            }
            _ => false,
        }
    }

    /// Confirmed peers whose heartbeats have gone silent. Peers still
    /// requesting or given up never time out here.
    pub fn stale_peers(&self, now: Instant) -> Vec<PeerId> {
        self.records
            .iter()
            .filter(|(_, r)| {
                r.state == DiscoveryState::InfoReceived
                    && now.duration_since(r.last_heartbeat_at) > self.config.stale_after()
            })
            .map(|(peer_id, _)| *peer_id)
            .collect()
    }

    pub fn remove(&mut self, peer_id: PeerId) {
        self.records.remove(&peer_id);
    }

    pub fn record(&self, peer_id: PeerId) -> Option<&PeerDiscoveryRecord> {
        self.records.get(&peer_id)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
