// speech.rs — the speech collaborator: remote synthesis with a local
// fallback so she is never silent, plus the mouth-flap numbers the playback
// loop feeds back into the expression fader.
//
// The flap is timer-based and random on both paths — amplitude-derived
// lip-sync is out of scope, the mouth just needs to move while audio plays.

use crate::error::{PuppetError, Result};
use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

/// Cadence of mouth-target updates while speaking.
pub const FLAP_INTERVAL: Duration = Duration::from_millis(100);

#[async_trait]
pub trait SpeechEngine: Send + Sync {
    fn name(&self) -> &'static str;
    fn is_available(&self) -> bool;
    async fn synthesize(&self, text: &str) -> Result<Bytes>;
}

// ── Remote engine ─────────────────────────────────────────────────────────────

pub struct ElevenLabsEngine {
    client: reqwest::Client,
    api_key: String,
    voice_id: String,
    model_id: String,
    base_url: String,
}

impl ElevenLabsEngine {
    pub fn new(api_key: String, voice_id: String, model_id: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            voice_id,
            model_id,
            base_url: "https://api.elevenlabs.io".to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url;
        self
    }

    fn request_body(&self, text: &str) -> Value {
        json!({
            "text": text,
            "model_id": self.model_id,
            "voice_settings": {
                "stability": 0.5,
                "similarity_boost": 0.75,
                "style": 0.0,
                "use_speaker_boost": true,
            }
        })
    }
}

#[async_trait]
impl SpeechEngine for ElevenLabsEngine {
    fn name(&self) -> &'static str {
        "elevenlabs"
    }

    fn is_available(&self) -> bool {
        !self.api_key.is_empty()
    }

    async fn synthesize(&self, text: &str) -> Result<Bytes> {
        let url = format!("{}/v1/text-to-speech/{}", self.base_url, self.voice_id);
        let response = self
            .client
            .post(&url)
            .header("Content-Type", "application/json")
            .header("xi-api-key", &self.api_key)
            .json(&self.request_body(text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PuppetError::Speech(format!("HTTP {status}: {text}")));
        }

        Ok(response.bytes().await?)
    }
}

// ── Local fallback ────────────────────────────────────────────────────────────

/// Produces no audio bytes; the caller still gets a speech window sized to
/// the text, so the mouth flaps and the turn reads as spoken.
pub struct LocalEngine;

#[async_trait]
impl SpeechEngine for LocalEngine {
    fn name(&self) -> &'static str {
        "local"
    }

    fn is_available(&self) -> bool {
        true
    }

    async fn synthesize(&self, _text: &str) -> Result<Bytes> {
        Ok(Bytes::new())
    }
}

// ── Speaker ───────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct SpokenReply {
    /// Audio payload for the playback collaborator. Empty on the local path.
    pub audio: Bytes,
    /// How long the mouth should keep flapping.
    pub duration: Duration,
    pub engine: &'static str,
}

/// Arbitrates primary → fallback. Speaking never fails: any primary error
/// drops to the local engine.
pub struct Speaker {
    primary: Option<Box<dyn SpeechEngine>>,
    fallback: Box<dyn SpeechEngine>,
}

impl Speaker {
    pub fn new(primary: Option<Box<dyn SpeechEngine>>) -> Self {
        Self { primary, fallback: Box::new(LocalEngine) }
    }

    pub async fn speak(&self, text: &str) -> SpokenReply {
        let duration = estimate_duration(text);
        if let Some(primary) = self.primary.as_ref().filter(|p| p.is_available()) {
            match primary.synthesize(text).await {
                Ok(audio) => {
                    debug!(engine = primary.name(), bytes = audio.len(), "speech synthesized");
                    return SpokenReply { audio, duration, engine: primary.name() };
                }
                Err(e) => warn!(engine = primary.name(), "synthesis failed, using fallback: {e}"),
            }
        }
        let audio = self.fallback.synthesize(text).await.unwrap_or_else(|e| {
            warn!("fallback synthesis failed: {e}");
            Bytes::new()
        });
        SpokenReply { audio, duration, engine: self.fallback.name() }
    }
}

/// With no audio element to ask, the playback window is estimated from the
/// text: ~15 characters per second, never shorter than a beat.
pub fn estimate_duration(text: &str) -> Duration {
    let chars = text.chars().count() as u64;
    Duration::from_millis((chars * 1000 / 15).max(1200))
}

/// Random flap between 0.2 and 0.8, fed to the mouth-open target while
/// audio is playing.
pub fn flap_target(rng: &mut impl Rng) -> f32 {
    0.2 + rng.gen::<f32>() * 0.6
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    struct FailingEngine;

    #[async_trait]
    impl SpeechEngine for FailingEngine {
        fn name(&self) -> &'static str {
            "failing"
        }
        fn is_available(&self) -> bool {
            true
        }
        async fn synthesize(&self, _text: &str) -> Result<Bytes> {
            Err(PuppetError::Speech("quota exceeded".to_string()))
        }
    }

    #[tokio::test]
    async fn primary_failure_falls_back_to_local() {
        let speaker = Speaker::new(Some(Box::new(FailingEngine)));
        let spoken = speaker.speak("hello there").await;
        assert_eq!(spoken.engine, "local");
        assert!(spoken.audio.is_empty());
        assert!(spoken.duration >= Duration::from_millis(1200));
    }

    #[tokio::test]
    async fn unavailable_primary_is_skipped_without_a_call() {
        let engine = ElevenLabsEngine::new(String::new(), "v".into(), "m".into());
        assert!(!engine.is_available());
        let speaker = Speaker::new(Some(Box::new(engine)));
        let spoken = speaker.speak("hi").await;
        assert_eq!(spoken.engine, "local");
    }

    #[test]
    fn request_body_matches_the_wire_contract() {
        let engine = ElevenLabsEngine::new("k".into(), "voice".into(), "model-x".into());
        let body = engine.request_body("say this");
        assert_eq!(body["text"], "say this");
        assert_eq!(body["model_id"], "model-x");
        assert_eq!(body["voice_settings"]["stability"], 0.5);
        assert_eq!(body["voice_settings"]["similarity_boost"], 0.75);
        assert_eq!(body["voice_settings"]["use_speaker_boost"], true);
    }

    #[test]
    fn flap_targets_stay_in_range() {
        let mut rng = StdRng::seed_from_u64(3);
        for _ in 0..1000 {
            let v = flap_target(&mut rng);
            assert!((0.2..=0.8).contains(&v), "flap {v} out of range");
        }
    }

    #[test]
    fn duration_scales_with_text_but_has_a_floor() {
        assert_eq!(estimate_duration(""), Duration::from_millis(1200));
        let long = "x".repeat(150);
        assert_eq!(estimate_duration(&long), Duration::from_secs(10));
    }
}
