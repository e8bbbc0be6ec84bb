// rig.rs — the seam between the animation core and whatever renders her.
//
// A rig is loaded asynchronously and may be missing optional bones, so every
// write is best-effort: implementations silently skip names they don't have.
// The bone vocabulary is closed — the core iterates the enumeration instead
// of probing ad-hoc string names.

use crate::expression::Emotion;
use std::collections::{HashMap, HashSet};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Bone {
    Head,
    Chest,
    LeftUpperArm,
    RightUpperArm,
    RightLowerArm,
    RightHand,
    RightThumb,
    RightIndex,
    RightMiddle,
    RightRing,
    RightLittle,
}

impl Bone {
    pub const ALL: [Bone; 11] = [
        Bone::Head,
        Bone::Chest,
        Bone::LeftUpperArm,
        Bone::RightUpperArm,
        Bone::RightLowerArm,
        Bone::RightHand,
        Bone::RightThumb,
        Bone::RightIndex,
        Bone::RightMiddle,
        Bone::RightRing,
        Bone::RightLittle,
    ];

    pub const FINGERS: [Bone; 5] = [
        Bone::RightThumb,
        Bone::RightIndex,
        Bone::RightMiddle,
        Bone::RightRing,
        Bone::RightLittle,
    ];

    /// The humanoid bone name this maps to on a VRM-style model.
    pub fn humanoid_name(self) -> &'static str {
        match self {
            Bone::Head => "head",
            Bone::Chest => "spine",
            Bone::LeftUpperArm => "leftUpperArm",
            Bone::RightUpperArm => "rightUpperArm",
            Bone::RightLowerArm => "rightLowerArm",
            Bone::RightHand => "rightHand",
            Bone::RightThumb => "rightThumbProximal",
            Bone::RightIndex => "rightIndexProximal",
            Bone::RightMiddle => "rightMiddleProximal",
            Bone::RightRing => "rightRingProximal",
            Bone::RightLittle => "rightLittleProximal",
        }
    }
}

/// Euler rotation in radians. pitch = x, yaw = y, roll = z.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rotation {
    pub pitch: f32,
    pub yaw: f32,
    pub roll: f32,
}

impl Rotation {
    pub fn pitch_yaw(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw, roll: 0.0 }
    }

    pub fn roll(roll: f32) -> Self {
        Self { pitch: 0.0, yaw: 0.0, roll }
    }
}

/// Named expression-weight channels on the face rig.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Expression {
    Emotion(Emotion),
    MouthOpen,
    Blink,
}

impl Expression {
    pub fn name(self) -> &'static str {
        match self {
            Expression::Emotion(e) => e.label(),
            // "aa" is the VRM viseme channel for an open mouth.
            Expression::MouthOpen => "aa",
            Expression::Blink => "blink",
        }
    }
}

pub trait Rig {
    fn set_rotation(&mut self, bone: Bone, rotation: Rotation);
    fn set_weight(&mut self, expression: Expression, weight: f32);
}

/// In-memory rig: records the last value written per channel. Serves the
/// headless binary and every core test; doubles as the missing-bone model
/// (writes to a bone listed as missing are dropped, exactly like a model
/// without that optional bone).
#[derive(Debug, Default)]
pub struct MemoryRig {
    rotations: HashMap<Bone, Rotation>,
    weights: HashMap<Expression, f32>,
    missing: HashSet<Bone>,
}

impl MemoryRig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn without_bones(missing: impl IntoIterator<Item = Bone>) -> Self {
        Self { missing: missing.into_iter().collect(), ..Self::default() }
    }

    pub fn rotation(&self, bone: Bone) -> Option<Rotation> {
        self.rotations.get(&bone).copied()
    }

    pub fn weight(&self, expression: Expression) -> Option<f32> {
        self.weights.get(&expression).copied()
    }
}

impl Rig for MemoryRig {
    fn set_rotation(&mut self, bone: Bone, rotation: Rotation) {
        if self.missing.contains(&bone) {
            return;
        }
        self.rotations.insert(bone, rotation);
    }

    fn set_weight(&mut self, expression: Expression, weight: f32) {
        self.weights.insert(expression, weight);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_bones_are_silently_skipped() {
        let mut rig = MemoryRig::without_bones([Bone::RightThumb]);
        rig.set_rotation(Bone::RightThumb, Rotation::roll(1.2));
        rig.set_rotation(Bone::Head, Rotation::pitch_yaw(0.1, 0.2));
        assert_eq!(rig.rotation(Bone::RightThumb), None);
        assert_eq!(rig.rotation(Bone::Head), Some(Rotation::pitch_yaw(0.1, 0.2)));
    }

    #[test]
    fn humanoid_names_cover_the_vocabulary() {
        for bone in Bone::ALL {
            assert!(!bone.humanoid_name().is_empty());
        }
    }
}
