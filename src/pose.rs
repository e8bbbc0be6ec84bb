// pose.rs
use serde::{Deserialize, Serialize};

/// Curl of the five right-hand proximal finger bones. All five chase the
/// same action target but each keeps its own smoothed value, so a gesture
/// change ripples through the hand instead of snapping it.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize)]
pub struct FingerCurls {
    pub thumb: f32,
    pub index: f32,
    pub middle: f32,
    pub ring: f32,
    pub little: f32,
}

impl FingerCurls {
    pub fn as_array(&self) -> [f32; 5] {
        [self.thumb, self.index, self.middle, self.ring, self.little]
    }
}

/// Current rotation of every animated channel, one scalar per degree of
/// freedom. Mutated once per frame by the blender; the values here are the
/// smoothed "where the joint is now", never the targets.
///
/// The left upper arm is absent on purpose: its roll is pinned at a constant
/// and written straight to the rig every frame (see blend.rs).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PoseState {
    pub head_pitch: f32,
    pub head_yaw: f32,
    pub chest_pitch: f32,
    pub chest_roll: f32,
    pub arm_pitch: f32,
    pub arm_roll: f32,
    pub elbow_yaw: f32,
    pub wrist_pitch: f32,
    pub wrist_roll: f32,
    pub fingers: FingerCurls,
}

impl PoseState {
    pub fn new() -> Self {
        Self::default()
    }
}
