// puppet.rs — the per-frame context object.
//
// All mutable animation state lives here and is threaded explicitly through
// each component, so the whole character can be driven and asserted on
// without a live rig. One `tick` per rendered frame; everything else is an
// out-of-frame event (pointer move, reply, mouth target).

use crate::action::{ActionScheduler, ActionState};
use crate::blend;
use crate::chat::ChatLog;
use crate::expression::ExpressionState;
use crate::interpret::{parse_reply, ParsedReply};
use crate::pointer::PointerSignal;
use crate::pose::PoseState;
use crate::rig::Rig;
use rand::rngs::StdRng;

pub struct Puppet {
    pose: PoseState,
    actions: ActionScheduler,
    expressions: ExpressionState,
    pointer: PointerSignal,
    chat: ChatLog,
}

impl Default for Puppet {
    fn default() -> Self {
        Self::new()
    }
}

impl Puppet {
    pub fn new() -> Self {
        Self::with_scheduler(ActionScheduler::new())
    }

    /// Seeded construction for deterministic gesture selection.
    pub fn with_rng(rng: StdRng) -> Self {
        Self::with_scheduler(ActionScheduler::with_rng(rng))
    }

    fn with_scheduler(actions: ActionScheduler) -> Self {
        Self {
            pose: PoseState::new(),
            actions,
            expressions: ExpressionState::new(),
            pointer: PointerSignal::default(),
            chat: ChatLog::new(),
        }
    }

    /// One frame: schedule gestures, blend the pose, fade the expressions,
    /// and write both onto the rig if one is loaded. With no rig the state
    /// still advances — the animation never stops running.
    pub fn tick(&mut self, now: f32, rig: Option<&mut dyn Rig>) {
        self.actions.tick(now);
        blend::blend_frame(&mut self.pose, now, self.pointer, self.actions.state());
        self.expressions.tick(now);
        if let Some(rig) = rig {
            blend::apply_pose(&self.pose, rig);
            self.expressions.apply(now, rig);
        }
    }

    pub fn pointer_moved(&mut self, client: (f32, f32), viewport: (f32, f32)) {
        self.pointer = PointerSignal::from_client(client, viewport);
    }

    pub fn set_mouth_target(&mut self, target: f32) {
        self.expressions.set_mouth_target(target);
    }

    /// Interpret a raw model reply: raise the emotion (only if a rig is
    /// loaded — there is no queueing for a face that isn't there yet),
    /// remember the exchange, and hand back the display text.
    pub fn apply_reply(&mut self, user_text: &str, raw: &str, now: f32, rig_loaded: bool) -> String {
        let ParsedReply { emotion, text } = parse_reply(raw);
        if rig_loaded {
            self.expressions.set_emotion(emotion, now);
        }
        self.chat.push_exchange(user_text, &text);
        text
    }

    pub fn pose(&self) -> &PoseState {
        &self.pose
    }

    pub fn action(&self) -> &ActionState {
        self.actions.state()
    }

    pub fn expressions(&self) -> &ExpressionState {
        &self.expressions
    }

    pub fn chat(&self) -> &ChatLog {
        &self.chat
    }
}
