// blend.rs — per-frame pose blending: idle oscillators, action overrides,
// pointer look-at, one smoothing primitive for everything.
//
// Priority per frame: action overrides beat the procedural idle targets,
// then the head target is faded between that result and the pointer-derived
// look target by the action's pointer weight. Only after arbitration does
// each channel advance toward its final target through `approach`.

use crate::action::{ActionKind, ActionState};
use crate::pointer::PointerSignal;
use crate::pose::PoseState;
use crate::rig::{Bone, Rig, Rotation};

/// Per-frame interpolation fraction. The sole animation primitive: every
/// joint and every expression weight converges through this same factor.
pub const SMOOTHING: f32 = 0.1;

/// Left upper arm stays pinned at the side; this roll is never animated.
pub const LEFT_ARM_ROLL: f32 = -1.2;

/// Advance `current` one frame toward `target`.
pub fn approach(current: f32, target: f32) -> f32 {
    current + (target - current) * SMOOTHING
}

pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

/// The frame's target value per animated channel, before smoothing.
#[derive(Clone, Copy, Debug)]
pub struct PoseTargets {
    pub head_pitch: f32,
    pub head_yaw: f32,
    pub chest_pitch: f32,
    pub chest_roll: f32,
    pub arm_pitch: f32,
    pub arm_roll: f32,
    pub elbow_yaw: f32,
    pub wrist_roll: f32,
    pub finger_curl: f32,
}

// ── Procedural idle ───────────────────────────────────────────────────────────

/// Breathing-scale sinusoids, each channel with its own frequency and
/// amplitude so the motion never visibly loops.
pub fn idle_targets(t: f32) -> PoseTargets {
    PoseTargets {
        head_pitch: (t * 0.8).sin() * 0.04,
        head_yaw: (t * 0.4).sin() * 0.08,
        chest_pitch: (t * 1.2).sin() * 0.02,
        chest_roll: (t * 0.5).sin() * 0.03,
        arm_pitch: 0.0,
        arm_roll: 1.2,
        elbow_yaw: 0.0,
        wrist_roll: 0.0,
        finger_curl: 0.0,
    }
}

// ── Action overrides ──────────────────────────────────────────────────────────

/// Start from the idle targets and override only the channels the action
/// claims; everything else keeps breathing.
pub fn action_targets(kind: ActionKind, t: f32) -> PoseTargets {
    let mut targets = idle_targets(t);
    match kind {
        ActionKind::Idle => {}
        ActionKind::LookAround => {
            targets.head_yaw = (t * -2.0).sin() * 0.2;
        }
        ActionKind::CheckNails => {
            targets.head_pitch = 0.3;
            targets.arm_roll = 1.0;
            targets.arm_pitch = -0.5;
            targets.elbow_yaw = 2.6;
            targets.wrist_roll = 0.1;
            targets.finger_curl = 1.2;
        }
        ActionKind::Nod => {
            targets.head_pitch = (t * 10.0).sin() * 0.1;
        }
    }
    targets
}

// ── Frame blend ───────────────────────────────────────────────────────────────

/// Compute the frame's final targets and advance every channel one step.
pub fn blend_frame(pose: &mut PoseState, t: f32, pointer: PointerSignal, action: &ActionState) {
    let targets = action_targets(action.current, t);
    let look = pointer.look_target();

    // Head is the only contested channel: the pointer weight fades between
    // the action/idle target and the look target.
    let head_pitch = lerp(targets.head_pitch, look.pitch, action.pointer_weight);
    let head_yaw = lerp(targets.head_yaw, look.yaw, action.pointer_weight);

    pose.head_pitch = approach(pose.head_pitch, head_pitch);
    pose.head_yaw = approach(pose.head_yaw, head_yaw);
    pose.chest_pitch = approach(pose.chest_pitch, targets.chest_pitch);
    pose.chest_roll = approach(pose.chest_roll, targets.chest_roll);
    pose.arm_pitch = approach(pose.arm_pitch, targets.arm_pitch);
    pose.arm_roll = approach(pose.arm_roll, targets.arm_roll);
    pose.elbow_yaw = approach(pose.elbow_yaw, targets.elbow_yaw);
    // Both wrist axes chase the one wrist target.
    pose.wrist_pitch = approach(pose.wrist_pitch, targets.wrist_roll);
    pose.wrist_roll = approach(pose.wrist_roll, targets.wrist_roll);
    pose.fingers.thumb = approach(pose.fingers.thumb, targets.finger_curl);
    pose.fingers.index = approach(pose.fingers.index, targets.finger_curl);
    pose.fingers.middle = approach(pose.fingers.middle, targets.finger_curl);
    pose.fingers.ring = approach(pose.fingers.ring, targets.finger_curl);
    pose.fingers.little = approach(pose.fingers.little, targets.finger_curl);
}

/// Write the smoothed pose onto the rig. Implementations skip bones the
/// loaded model doesn't have.
pub fn apply_pose(pose: &PoseState, rig: &mut dyn Rig) {
    rig.set_rotation(Bone::Head, Rotation::pitch_yaw(pose.head_pitch, pose.head_yaw));
    rig.set_rotation(
        Bone::Chest,
        Rotation { pitch: pose.chest_pitch, yaw: 0.0, roll: pose.chest_roll },
    );
    rig.set_rotation(
        Bone::RightUpperArm,
        Rotation { pitch: pose.arm_pitch, yaw: 0.0, roll: pose.arm_roll },
    );
    rig.set_rotation(Bone::LeftUpperArm, Rotation::roll(LEFT_ARM_ROLL));
    rig.set_rotation(Bone::RightLowerArm, Rotation { pitch: 0.0, yaw: pose.elbow_yaw, roll: 0.0 });
    rig.set_rotation(
        Bone::RightHand,
        Rotation { pitch: pose.wrist_pitch, yaw: 0.0, roll: pose.wrist_roll },
    );
    for (bone, curl) in Bone::FINGERS.iter().zip(pose.fingers.as_array()) {
        rig.set_rotation(*bone, Rotation::roll(curl));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rig::MemoryRig;

    const CENTERED: PointerSignal = PointerSignal { x: 0.0, y: 0.0 };

    fn idle_state() -> ActionState {
        ActionState { current: ActionKind::Idle, pointer_weight: 1.0 }
    }

    #[test]
    fn approach_closes_the_gap_by_exactly_one_tenth() {
        let mut v = 0.0_f32;
        let target = 2.6;
        let mut gap = target;
        for step in 0..50 {
            v = approach(v, target);
            gap *= 0.9;
            assert!(
                ((target - v) - gap).abs() < 1e-4,
                "step {step}: remaining {} vs {gap}",
                target - v
            );
        }
    }

    #[test]
    fn idle_targets_match_the_oscillator_table() {
        let t = 1.7;
        let targets = idle_targets(t);
        assert_eq!(targets.head_pitch, (t * 0.8).sin() * 0.04);
        assert_eq!(targets.head_yaw, (t * 0.4).sin() * 0.08);
        assert_eq!(targets.chest_pitch, (t * 1.2).sin() * 0.02);
        assert_eq!(targets.chest_roll, (t * 0.5).sin() * 0.03);
        assert_eq!(targets.arm_roll, 1.2);
        assert_eq!(targets.finger_curl, 0.0);
    }

    #[test]
    fn check_nails_overrides_its_channels_and_keeps_chest_breathing() {
        let t = 3.3;
        let targets = action_targets(ActionKind::CheckNails, t);
        assert_eq!(targets.head_pitch, 0.3);
        assert_eq!(targets.arm_roll, 1.0);
        assert_eq!(targets.arm_pitch, -0.5);
        assert_eq!(targets.elbow_yaw, 2.6);
        assert_eq!(targets.wrist_roll, 0.1);
        assert_eq!(targets.finger_curl, 1.2);
        // Unclaimed channels stay procedural.
        assert_eq!(targets.chest_pitch, (t * 1.2).sin() * 0.02);
    }

    #[test]
    fn look_around_and_nod_oscillate_the_head() {
        let t = 0.4;
        let look = action_targets(ActionKind::LookAround, t);
        assert_eq!(look.head_yaw, (t * -2.0).sin() * 0.2);
        assert_eq!(look.head_pitch, (t * 0.8).sin() * 0.04, "pitch stays idle");
        let nod = action_targets(ActionKind::Nod, t);
        assert_eq!(nod.head_pitch, (t * 10.0).sin() * 0.1);
        assert_eq!(nod.head_yaw, (t * 0.4).sin() * 0.08, "yaw stays idle");
    }

    #[test]
    fn pointer_owns_the_head_at_full_weight() {
        let mut pose = PoseState::new();
        let pointer = PointerSignal { x: 0.5, y: 0.5 };
        let action = idle_state();
        for _ in 0..200 {
            blend_frame(&mut pose, 0.0, pointer, &action);
        }
        let look = pointer.look_target();
        assert!((pose.head_pitch - look.pitch).abs() < 1e-3);
        assert!((pose.head_yaw - look.yaw).abs() < 1e-3);
    }

    #[test]
    fn pointer_is_ignored_at_zero_weight() {
        let mut pose = PoseState::new();
        let pointer = PointerSignal { x: 0.5, y: 0.5 };
        let action = ActionState { current: ActionKind::CheckNails, pointer_weight: 0.0 };
        for _ in 0..200 {
            blend_frame(&mut pose, 2.0, pointer, &action);
        }
        assert!((pose.head_pitch - 0.3).abs() < 1e-3, "head follows the action, not the pointer");
    }

    #[test]
    fn gesture_converges_onto_the_override_pose() {
        let mut pose = PoseState::new();
        let action = ActionState { current: ActionKind::CheckNails, pointer_weight: 0.0 };
        for _ in 0..300 {
            blend_frame(&mut pose, 1.0, CENTERED, &action);
        }
        assert!((pose.elbow_yaw - 2.6).abs() < 1e-3);
        assert!((pose.fingers.middle - 1.2).abs() < 1e-3);
        assert!((pose.wrist_pitch - 0.1).abs() < 1e-3, "wrist pitch follows the wrist target");
    }

    #[test]
    fn apply_writes_every_present_bone_and_pins_the_left_arm() {
        let mut pose = PoseState::new();
        blend_frame(&mut pose, 0.5, CENTERED, &idle_state());
        let mut rig = MemoryRig::new();
        apply_pose(&pose, &mut rig);
        for bone in Bone::ALL {
            assert!(rig.rotation(bone).is_some(), "{:?} not written", bone);
        }
        assert_eq!(rig.rotation(Bone::LeftUpperArm), Some(Rotation::roll(LEFT_ARM_ROLL)));
    }

    #[test]
    fn apply_tolerates_a_rig_missing_optional_bones() {
        let mut pose = PoseState::new();
        blend_frame(&mut pose, 0.5, CENTERED, &idle_state());
        let mut rig = MemoryRig::without_bones([Bone::RightThumb, Bone::Chest]);
        apply_pose(&pose, &mut rig);
        assert_eq!(rig.rotation(Bone::RightThumb), None);
        assert!(rig.rotation(Bone::Head).is_some());
    }
}
