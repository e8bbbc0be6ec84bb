// action.rs — random gesture selection with timed reversion to idle.
//
// One deadline per logical timer: picking a new action REPLACES the pending
// revert instead of stacking a second one, so an old revert can never cut a
// newer action short.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

/// Seconds between selection rounds.
pub const PICK_INTERVAL: f32 = 5.0;
/// Seconds an action stays armed before reverting to idle.
pub const ACTION_DURATION: f32 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ActionKind {
    Idle,
    LookAround,
    CheckNails,
    Nod,
}

impl ActionKind {
    pub const ALL: [ActionKind; 4] = [
        ActionKind::Idle,
        ActionKind::LookAround,
        ActionKind::CheckNails,
        ActionKind::Nod,
    ];

    /// Actions where she looks away from the pointer entirely.
    pub fn holds_gaze(self) -> bool {
        matches!(self, ActionKind::LookAround | ActionKind::CheckNails)
    }

    pub fn name(self) -> &'static str {
        match self {
            ActionKind::Idle => "idle",
            ActionKind::LookAround => "look_around",
            ActionKind::CheckNails => "check_nails",
            ActionKind::Nod => "nod",
        }
    }
}

/// What the blender reads each frame. Invariant: `pointer_weight` is 0.0
/// exactly when the current action holds gaze, 1.0 otherwise.
#[derive(Clone, Copy, Debug)]
pub struct ActionState {
    pub current: ActionKind,
    pub pointer_weight: f32,
}

impl Default for ActionState {
    fn default() -> Self {
        Self { current: ActionKind::Idle, pointer_weight: 1.0 }
    }
}

pub struct ActionScheduler {
    state: ActionState,
    next_pick: f32,
    revert_at: Option<f32>,
    rng: StdRng,
}

impl Default for ActionScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionScheduler {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            state: ActionState::default(),
            next_pick: PICK_INTERVAL,
            revert_at: None,
            rng,
        }
    }

    pub fn state(&self) -> &ActionState {
        &self.state
    }

    /// Advance the scheduler to `now` (seconds of elapsed wall-clock time).
    /// Revert runs before selection so a pick landing on the same frame wins.
    pub fn tick(&mut self, now: f32) {
        if self.revert_at.is_some_and(|at| now >= at) {
            self.revert();
        }
        if now >= self.next_pick {
            let kind = ActionKind::ALL[self.rng.gen_range(0..ActionKind::ALL.len())];
            self.activate(kind, now);
            self.next_pick = now + PICK_INTERVAL;
        }
    }

    fn activate(&mut self, kind: ActionKind, now: f32) {
        debug!(action = kind.name(), "gesture selected");
        self.state.current = kind;
        self.state.pointer_weight = if kind.holds_gaze() { 0.0 } else { 1.0 };
        // Rearm replaces any pending revert.
        self.revert_at = Some(now + ACTION_DURATION);
    }

    fn revert(&mut self) {
        self.state = ActionState::default();
        self.revert_at = None;
    }
}
