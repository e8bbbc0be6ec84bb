// app.rs — wires the animation core to its collaborators.
//
// Everything funnels through one event channel into the owning task, so all
// mutable state stays single-threaded: network replies, mouth flaps, and
// pointer moves land between frames, never during one. Chat submissions
// carry a monotonic sequence number; a reply older than the most recent
// submission is discarded instead of applying state out of order.

use crate::error::Result;
use crate::llm::ChatModel;
use crate::puppet::Puppet;
use crate::rig::Rig;
use crate::speech::{self, Speaker, FLAP_INTERVAL};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc;
use tracing::{debug, warn};

#[derive(Debug)]
pub enum Event {
    /// User submitted chat text (typed, or relayed by a speech-to-text
    /// collaborator — the core doesn't care which).
    Submit(String),
    /// A language-model call resolved.
    Reply { seq: u64, user_text: String, outcome: Result<String> },
    /// Mouth-open target from the speech playback loop.
    Mouth(f32),
    /// Raw pointer position over the viewport.
    PointerMoved { client: (f32, f32), viewport: (f32, f32) },
}

pub struct ChatPuppetApp {
    puppet: Puppet,
    rig: Option<Box<dyn Rig + Send>>,
    chat_model: Arc<dyn ChatModel>,
    speaker: Arc<Speaker>,
    events: mpsc::Sender<Event>,
    latest_seq: u64,
    started: Instant,
}

impl ChatPuppetApp {
    pub fn new(
        chat_model: Arc<dyn ChatModel>,
        speaker: Arc<Speaker>,
        events: mpsc::Sender<Event>,
    ) -> Self {
        Self {
            puppet: Puppet::new(),
            rig: None,
            chat_model,
            speaker,
            events,
            latest_seq: 0,
            started: Instant::now(),
        }
    }

    /// Called by the rig-loader collaborator once the model is ready.
    /// Until then every frame still runs, it just has nowhere to write.
    pub fn set_rig(&mut self, rig: Box<dyn Rig + Send>) {
        self.rig = Some(rig);
    }

    pub fn puppet(&self) -> &Puppet {
        &self.puppet
    }

    fn elapsed(&self) -> f32 {
        self.started.elapsed().as_secs_f32()
    }

    /// One render tick.
    pub fn frame(&mut self) {
        let now = self.elapsed();
        match self.rig.as_deref_mut() {
            Some(rig) => self.puppet.tick(now, Some(rig)),
            None => self.puppet.tick(now, None),
        }
    }

    /// Process one out-of-frame event. Returns display text when a reply
    /// made it through, for the transcript view to show.
    pub fn handle(&mut self, event: Event) -> Option<String> {
        match event {
            Event::Submit(text) => {
                self.submit(text);
                None
            }
            Event::Reply { seq, user_text, outcome } => self.on_reply(seq, user_text, outcome),
            Event::Mouth(target) => {
                self.puppet.set_mouth_target(target);
                None
            }
            Event::PointerMoved { client, viewport } => {
                self.puppet.pointer_moved(client, viewport);
                None
            }
        }
    }

    fn submit(&mut self, text: String) {
        self.latest_seq += 1;
        let seq = self.latest_seq;
        let model = Arc::clone(&self.chat_model);
        let history = self.puppet.chat().clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let outcome = model.reply(&text, &history).await;
            let _ = events.send(Event::Reply { seq, user_text: text, outcome }).await;
        });
    }

    fn on_reply(&mut self, seq: u64, user_text: String, outcome: Result<String>) -> Option<String> {
        if seq < self.latest_seq {
            debug!(seq, latest = self.latest_seq, "stale reply discarded");
            return None;
        }
        match outcome {
            // Logged and dropped: no retry, no canned reply.
            Err(e) => {
                warn!("language model call failed: {e}");
                None
            }
            Ok(raw) => {
                let now = self.elapsed();
                let display = self.puppet.apply_reply(&user_text, &raw, now, self.rig.is_some());
                self.start_speech(display.clone());
                Some(display)
            }
        }
    }

    /// Synthesize off-thread and flap the mouth for the playback window.
    /// The audio bytes themselves belong to the playback collaborator.
    fn start_speech(&self, text: String) {
        let speaker = Arc::clone(&self.speaker);
        let events = self.events.clone();
        tokio::spawn(async move {
            let spoken = speaker.speak(&text).await;
            let mut rng = StdRng::from_entropy();
            let mut remaining = spoken.duration;
            while remaining > Duration::ZERO {
                let _ = events.send(Event::Mouth(speech::flap_target(&mut rng))).await;
                tokio::time::sleep(FLAP_INTERVAL).await;
                remaining = remaining.saturating_sub(FLAP_INTERVAL);
            }
            let _ = events.send(Event::Mouth(0.0)).await;
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::ChatLog;
    use crate::error::PuppetError;
    use async_trait::async_trait;

    struct EchoModel;

    #[async_trait]
    impl ChatModel for EchoModel {
        async fn reply(&self, prompt: &str, _history: &ChatLog) -> Result<String> {
            Ok(format!("[HAPPY] echo: {prompt}"))
        }
    }

    fn app_with_channel(cap: usize) -> (ChatPuppetApp, mpsc::Receiver<Event>) {
        let (tx, rx) = mpsc::channel(cap);
        let app = ChatPuppetApp::new(Arc::new(EchoModel), Arc::new(Speaker::new(None)), tx);
        (app, rx)
    }

    #[tokio::test]
    async fn submit_reply_roundtrip_updates_chat_and_flaps() {
        let (mut app, mut rx) = app_with_channel(64);
        app.handle(Event::Submit("hi".to_string()));

        let reply = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("reply should arrive")
            .expect("channel open");
        let display = app.handle(reply);
        assert_eq!(display.as_deref(), Some("echo: hi"));
        assert_eq!(app.puppet().chat().len(), 2);

        // The speech task starts flapping right away.
        let flap = tokio::time::timeout(Duration::from_secs(2), rx.recv())
            .await
            .expect("flap should arrive")
            .expect("channel open");
        match flap {
            Event::Mouth(v) => assert!((0.2..=0.8).contains(&v), "flap {v}"),
            other => panic!("expected a mouth event, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn stale_replies_are_fenced_out() {
        let (mut app, _rx) = app_with_channel(64);
        app.latest_seq = 2; // two submissions in flight
        let stale = app.handle(Event::Reply {
            seq: 1,
            user_text: "old".to_string(),
            outcome: Ok("[SAD] too late".to_string()),
        });
        assert_eq!(stale, None);
        assert!(app.puppet().chat().is_empty(), "stale reply must not touch state");

        let current = app.handle(Event::Reply {
            seq: 2,
            user_text: "new".to_string(),
            outcome: Ok("[HAPPY] in time".to_string()),
        });
        assert_eq!(current.as_deref(), Some("in time"));
    }

    #[tokio::test]
    async fn failed_replies_are_logged_and_dropped() {
        let (mut app, _rx) = app_with_channel(64);
        app.latest_seq = 1;
        let out = app.handle(Event::Reply {
            seq: 1,
            user_text: "hi".to_string(),
            outcome: Err(PuppetError::Llm("quota".to_string())),
        });
        assert_eq!(out, None);
        assert!(app.puppet().chat().is_empty());
    }

    #[tokio::test]
    async fn pointer_and_mouth_events_reach_the_puppet() {
        let (mut app, _rx) = app_with_channel(8);
        app.handle(Event::PointerMoved { client: (0.0, 0.0), viewport: (800.0, 600.0) });
        app.handle(Event::Mouth(0.5));
        app.frame();
        assert!(app.puppet().expressions().mouth() > 0.0);
    }
}
