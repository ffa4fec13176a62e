//! Ordered roster of confirmed cameras
//!
//! Cameras appear in discovery order; labels stay index-aligned with the
//! camera list. The current-selection index is `None` while the roster is
//! empty and always in range otherwise.

use crate::camera::CameraControl;
use crate::protocol::PeerId;

/// What happened to the selection when a camera was removed
pub struct RemovalOutcome {
    pub camera: Box<dyn CameraControl>,
    pub label: String,
    /// True when the removed camera was the current selection
    pub selection_changed: bool,
}

/// Confirmed cameras plus their labels and the current selection
#[derive(Default)]
pub struct Roster {
    cameras: Vec<Box<dyn CameraControl>>,
    labels: Vec<String>,
    current: Option<usize>,
}

impl Roster {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.cameras.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cameras.is_empty()
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Append a newly discovered camera. Rejects duplicate peer ids.
    /// The first camera becomes the current selection.
    pub fn push(&mut self, camera: Box<dyn CameraControl>) -> bool {
        if self.position_of(camera.peer_id()).is_some() {
            return false;
        }
        self.labels.push(camera.model_name().to_string());
        self.cameras.push(camera);
        if self.current.is_none() {
            self.current = Some(0);
        }
        true
    }

    /// Select a camera by index. Accepted only when the index is in range and
    /// differs from the current selection.
    pub fn set_current(&mut self, index: usize) -> bool {
        if index < self.cameras.len() && self.current != Some(index) {
            self.current = Some(index);
            true
        } else {
            false
        }
    }

    pub fn current_camera_mut(&mut self) -> Option<&mut dyn CameraControl> {
        let index = self.current?;
        self.cameras.get_mut(index).map(|c| &mut **c as &mut dyn CameraControl)
    }

    pub fn current_camera(&self) -> Option<&dyn CameraControl> {
        let index = self.current?;
        self.cameras.get(index).map(|c| c.as_ref())
    }

    pub fn position_of(&self, peer_id: PeerId) -> Option<usize> {
        // Linear scan; rosters hold a handful of cameras at most.
        self.cameras.iter().position(|c| c.peer_id() == peer_id)
    }

    pub fn get_mut_by_peer(&mut self, peer_id: PeerId) -> Option<&mut dyn CameraControl> {
        let index = self.position_of(peer_id)?;
        self.cameras.get_mut(index).map(|c| &mut **c as &mut dyn CameraControl)
    }

    /// Remove a camera by peer id, keeping the relative order of the rest.
    /// If the removed camera was current and others remain, index 0 becomes
    /// current; if the roster empties, the selection becomes none; removals
    /// before the current index shift it down so the same camera stays
    /// selected.
    pub fn remove_peer(&mut self, peer_id: PeerId) -> Option<RemovalOutcome> {
        let index = self.position_of(peer_id)?;
        let camera = self.cameras.remove(index);
        let label = self.labels.remove(index);

        let selection_changed = match self.current {
            Some(current) if current == index => {
                self.current = if self.cameras.is_empty() { None } else { Some(0) };
                true
            }
            Some(current) if current > index => {
                self.current = Some(current - 1);
                false
            }
            _ => false,
        };

        Some(RemovalOutcome {
            camera,
            label,
            selection_changed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::GenericCamera;
    use crate::protocol::CameraInfoPayload;
    use proptest::prelude::*;

    fn camera(peer_id: PeerId) -> Box<dyn CameraControl> {
        let info = CameraInfoPayload {
            vendor_name: String::new(),
            model_name: format!("Cam {}", peer_id),
            firmware_version: 1,
            capability_flags: CameraInfoPayload::CAP_HAS_VIDEO_STREAM,
            resolution_h: 1920,
            resolution_v: 1080,
        };
        Box::new(GenericCamera::new(info, peer_id))
    }

    #[test]
    fn test_first_camera_becomes_current() {
        let mut roster = Roster::new();
        assert_eq!(roster.current_index(), None);

        assert!(roster.push(camera(100)));
        assert_eq!(roster.current_index(), Some(0));
        assert_eq!(roster.labels(), &["Cam 100".to_string()]);
    }

    #[test]
    fn test_duplicate_peer_rejected() {
        let mut roster = Roster::new();
        assert!(roster.push(camera(100)));
        assert!(!roster.push(camera(100)));
        assert_eq!(roster.len(), 1);
    }

    #[test]
    fn test_set_current_bounds_and_no_op() {
        let mut roster = Roster::new();
        roster.push(camera(100));
        roster.push(camera(101));

        assert!(!roster.set_current(0)); // already current
        assert!(!roster.set_current(2)); // out of range
        assert!(roster.set_current(1));
        assert_eq!(roster.current_index(), Some(1));
    }

    #[test]
    fn test_remove_current_selects_index_zero() {
        let mut roster = Roster::new();
        roster.push(camera(100));
        roster.push(camera(101));
        roster.push(camera(102));
        roster.set_current(2);

        let outcome = roster.remove_peer(102).unwrap();
        assert!(outcome.selection_changed);
        assert_eq!(roster.current_index(), Some(0));
        assert_eq!(roster.labels(), &["Cam 100".to_string(), "Cam 101".to_string()]);
    }

    #[test]
    fn test_remove_last_camera_clears_selection() {
        let mut roster = Roster::new();
        roster.push(camera(100));

        let outcome = roster.remove_peer(100).unwrap();
        assert!(outcome.selection_changed);
        assert_eq!(outcome.label, "Cam 100");
        assert_eq!(roster.current_index(), None);
        assert!(roster.is_empty());
    }

    #[test]
    fn test_remove_before_current_keeps_same_camera_selected() {
        let mut roster = Roster::new();
        roster.push(camera(100));
        roster.push(camera(101));
        roster.set_current(1);

        let outcome = roster.remove_peer(100).unwrap();
        assert!(!outcome.selection_changed);
        assert_eq!(roster.current_index(), Some(0));
        assert_eq!(roster.current_camera().unwrap().peer_id(), 101);
    }

    #[test]
    fn test_remove_unknown_peer_is_none() {
        let mut roster = Roster::new();
        roster.push(camera(100));
        assert!(roster.remove_peer(55).is_none());
    }

    proptest! {
        /// For any sequence of insertions and removals the current index
        /// stays in range, labels stay aligned, and evicting the current
        /// camera falls back to index 0.
        #[test]
        fn prop_selection_invariant(ops in proptest::collection::vec((any::<bool>(), 0u8..8), 1..64)) {
            let mut roster = Roster::new();
            for (add, peer_id) in ops {
                if add {
                    roster.push(camera(peer_id));
                } else if let Some(outcome) = roster.remove_peer(peer_id) {
                    if outcome.selection_changed && !roster.is_empty() {
                        prop_assert_eq!(roster.current_index(), Some(0));
                    }
                }

                prop_assert_eq!(roster.labels().len(), roster.len());
                match roster.current_index() {
                    Some(index) => prop_assert!(index < roster.len()),
                    None => prop_assert!(roster.is_empty()),
                }
            }
        }
    }
}
