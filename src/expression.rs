// expression.rs — facial expression weights: emotion fades, blink, viseme.
//
// Weights converge through the same 0.1-per-frame smoothing as the joints.
// Blink is the one exception: its pulse shape is written to the rig as-is,
// smoothing it further would soften the snap of the eyelid.

use crate::blend::approach;
use crate::rig::{Expression, Rig};
use tracing::debug;

/// Seconds an emotion stays raised before falling back to neutral.
pub const EMOTE_DURATION: f32 = 4.0;

/// Emotion weight at or above this keeps the eyes from blinking
/// mid-expression.
pub const BLINK_SUPPRESS_THRESHOLD: f32 = 0.5;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Emotion {
    Happy,
    Sad,
    Angry,
    Surprised,
    Neutral,
}

impl Emotion {
    pub const ALL: [Emotion; 5] = [
        Emotion::Happy,
        Emotion::Sad,
        Emotion::Angry,
        Emotion::Surprised,
        Emotion::Neutral,
    ];

    /// Lowercase label as it appears in reply tags and on the face rig.
    pub fn label(self) -> &'static str {
        match self {
            Emotion::Happy => "happy",
            Emotion::Sad => "sad",
            Emotion::Angry => "angry",
            Emotion::Surprised => "surprised",
            Emotion::Neutral => "neutral",
        }
    }

    pub fn from_label(label: &str) -> Option<Emotion> {
        match label {
            "happy" => Some(Emotion::Happy),
            "sad" => Some(Emotion::Sad),
            "angry" => Some(Emotion::Angry),
            "surprised" => Some(Emotion::Surprised),
            "neutral" => Some(Emotion::Neutral),
            _ => None,
        }
    }
}

/// Sharp, infrequent eyelid pulse: zero almost everywhere, spiking only
/// where the slow sine clears 0.9 of its amplitude.
pub fn blink_pulse(t: f32) -> f32 {
    ((t * 1.5).sin() * 20.0 - 18.0).max(0.0)
}

pub struct ExpressionState {
    weights: [f32; Emotion::ALL.len()],
    active: Emotion,
    revert_at: Option<f32>,
    mouth: f32,
    mouth_target: f32,
}

impl Default for ExpressionState {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpressionState {
    pub fn new() -> Self {
        Self {
            weights: [0.0; Emotion::ALL.len()],
            active: Emotion::Neutral,
            revert_at: None,
            mouth: 0.0,
            mouth_target: 0.0,
        }
    }

    /// Raise `emotion` for the next `EMOTE_DURATION` seconds. Last write
    /// wins: a new label replaces the active one and its deadline.
    pub fn set_emotion(&mut self, emotion: Emotion, now: f32) {
        debug!(emotion = emotion.label(), "emotion raised");
        self.active = emotion;
        self.revert_at = Some(now + EMOTE_DURATION);
    }

    pub fn active(&self) -> Emotion {
        self.active
    }

    /// Driven by the speech collaborator while audio plays; decays to zero
    /// through the smoothing law once playback ends.
    pub fn set_mouth_target(&mut self, target: f32) {
        self.mouth_target = target.clamp(0.0, 1.0);
    }

    pub fn weight(&self, emotion: Emotion) -> f32 {
        self.weights[Self::index(emotion)]
    }

    pub fn mouth(&self) -> f32 {
        self.mouth
    }

    /// Advance every smoothed weight one frame.
    pub fn tick(&mut self, now: f32) {
        if self.revert_at.is_some_and(|at| now >= at) {
            self.active = Emotion::Neutral;
            self.revert_at = None;
        }
        for emotion in Emotion::ALL {
            let target = if emotion == self.active && self.revert_at.is_some() {
                1.0
            } else {
                0.0
            };
            let w = &mut self.weights[Self::index(emotion)];
            *w = approach(*w, target);
        }
        self.mouth = approach(self.mouth, self.mouth_target);
    }

    /// Write the frame's weights onto the face rig.
    pub fn apply(&self, t: f32, rig: &mut dyn Rig) {
        for emotion in Emotion::ALL {
            rig.set_weight(Expression::Emotion(emotion), self.weight(emotion));
        }
        rig.set_weight(Expression::MouthOpen, self.mouth);
        let blink = if self.blink_suppressed() { 0.0 } else { blink_pulse(t) };
        rig.set_weight(Expression::Blink, blink);
    }

    /// No blinking while a strong non-neutral emotion is showing.
    fn blink_suppressed(&self) -> bool {
        self.active != Emotion::Neutral
            && self.weight(self.active) >= BLINK_SUPPRESS_THRESHOLD
    }

    fn index(emotion: Emotion) -> usize {
        Emotion::ALL.iter().position(|e| *e == emotion).unwrap_or(0)
    }
}
