// main.rs — headless driver: a 60 Hz render tick plus a stdin chat prompt.
// Rendering proper belongs to an external collaborator; here the rig is the
// in-memory one, which is enough to watch her emote and reply.

use chatpuppet::app::{ChatPuppetApp, Event};
use chatpuppet::config::PuppetConfig;
use chatpuppet::error::PuppetError;
use chatpuppet::llm::GeminiChat;
use chatpuppet::rig::MemoryRig;
use chatpuppet::speech::{ElevenLabsEngine, Speaker, SpeechEngine};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::mpsc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), PuppetError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = PuppetConfig::from_env();
    config.validate().map_err(PuppetError::Config)?;

    if config.gemini_api_key.is_none() {
        warn!("CHATPUPPET_GEMINI_KEY not set; chat replies will fail until it is");
    }
    let chat_model = Arc::new(GeminiChat::new(
        config.gemini_api_key.clone().unwrap_or_default(),
        config.chat_model.clone(),
        config.persona.system_instruction(),
    ));

    let primary: Option<Box<dyn SpeechEngine>> = config.eleven_api_key.clone().map(|key| {
        Box::new(ElevenLabsEngine::new(key, config.voice_id.clone(), config.tts_model.clone()))
            as Box<dyn SpeechEngine>
    });
    let speaker = Arc::new(Speaker::new(primary));

    let (tx, mut rx) = mpsc::channel(64);
    let mut app = ChatPuppetApp::new(chat_model, speaker, tx.clone());
    // The headless "model load" is instant; a real loader would call this
    // from its completion handler.
    app.set_rig(Box::new(MemoryRig::new()));

    // Stdin plays the role of the send button. A speech-to-text collaborator
    // would submit through the same channel.
    let input = tx.clone();
    tokio::spawn(async move {
        let mut lines = BufReader::new(tokio::io::stdin()).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            let text = line.trim().to_string();
            if !text.is_empty() {
                let _ = input.send(Event::Submit(text)).await;
            }
        }
    });

    info!(persona = %config.persona.name, "chatpuppet running; type to chat, ctrl-d to quit");

    let mut ticker = tokio::time::interval(Duration::from_millis(16));
    loop {
        tokio::select! {
            _ = ticker.tick() => app.frame(),
            event = rx.recv() => match event {
                Some(event) => {
                    if let Some(display) = app.handle(event) {
                        println!("{}: {display}", config.persona.name);
                    }
                }
                None => break,
            },
        }
    }

    Ok(())
}
