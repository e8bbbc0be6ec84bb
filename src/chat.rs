// chat.rs
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

/// Exchanges of conversational memory carried into the next model call.
pub const MAX_EXCHANGES: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Model,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: Role,
    pub text: String,
}

/// Rolling window of the last `MAX_EXCHANGES` user/model pairs. Turns only
/// ever enter as a pair, and the oldest pair is evicted first.
#[derive(Clone, Debug, Default)]
pub struct ChatLog {
    turns: VecDeque<ChatTurn>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_exchange(&mut self, user: &str, model: &str) {
        self.turns.push_back(ChatTurn { role: Role::User, text: user.to_string() });
        self.turns.push_back(ChatTurn { role: Role::Model, text: model.to_string() });
        while self.turns.len() > MAX_EXCHANGES * 2 {
            self.turns.pop_front();
            self.turns.pop_front();
        }
    }

    pub fn turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
