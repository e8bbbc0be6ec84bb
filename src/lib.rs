// lib.rs
pub mod action;
pub mod app;
pub mod blend;
pub mod chat;
pub mod config;
pub mod error;
pub mod expression;
pub mod interpret;
pub mod llm;
pub mod pointer;
pub mod pose;
pub mod prompt;
pub mod puppet;
pub mod rig;
pub mod speech;

pub use action::{ActionKind, ActionScheduler, ActionState};
pub use app::{ChatPuppetApp, Event};
pub use chat::{ChatLog, ChatTurn, Role};
pub use config::PuppetConfig;
pub use error::{PuppetError, Result};
pub use expression::{Emotion, ExpressionState};
pub use interpret::{parse_reply, ParsedReply};
pub use llm::{ChatModel, GeminiChat};
pub use pointer::PointerSignal;
pub use pose::PoseState;
pub use prompt::Persona;
pub use puppet::Puppet;
pub use rig::{Bone, Expression, MemoryRig, Rig, Rotation};
pub use speech::{ElevenLabsEngine, LocalEngine, Speaker, SpeechEngine};
