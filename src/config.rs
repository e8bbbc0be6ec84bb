// config.rs
use crate::prompt::Persona;
use serde::{Deserialize, Serialize};

/// Everything the binary wires from the environment. Missing keys are not
/// an error here: a puppet with no API keys still animates, she just can't
/// answer — validation only rejects configs that are nonsense, not ones
/// that are merely offline.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PuppetConfig {
    pub gemini_api_key: Option<String>,
    pub eleven_api_key: Option<String>,
    pub chat_model: String,
    pub voice_id: String,
    pub tts_model: String,
    pub persona: Persona,
}

impl Default for PuppetConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            eleven_api_key: None,
            chat_model: "gemini-2.5-flash-lite".to_string(),
            voice_id: "21m00Tcm4lcv85compute".to_string(),
            tts_model: "eleven_flash_v2_5".to_string(),
            persona: Persona::default(),
        }
    }
}

impl PuppetConfig {
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(key) = std::env::var("CHATPUPPET_GEMINI_KEY") {
            cfg.gemini_api_key = Some(key);
        }
        if let Ok(key) = std::env::var("CHATPUPPET_ELEVEN_KEY") {
            cfg.eleven_api_key = Some(key);
        }
        if let Ok(model) = std::env::var("CHATPUPPET_CHAT_MODEL") {
            cfg.chat_model = model;
        }
        if let Ok(voice) = std::env::var("CHATPUPPET_VOICE_ID") {
            cfg.voice_id = voice;
        }
        if let Ok(name) = std::env::var("CHATPUPPET_PERSONA_NAME") {
            cfg.persona.name = name;
        }
        cfg
    }

    pub fn validate(&self) -> Result<(), String> {
        if self.chat_model.trim().is_empty() {
            return Err("chat_model must not be empty".to_string());
        }
        if self.voice_id.trim().is_empty() {
            return Err("voice_id must not be empty".to_string());
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate_without_any_keys() {
        let cfg = PuppetConfig::default();
        assert!(cfg.validate().is_ok());
        assert!(cfg.gemini_api_key.is_none());
    }

    #[test]
    fn empty_model_id_is_rejected() {
        let cfg = PuppetConfig { chat_model: " ".into(), ..Default::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let cfg: PuppetConfig =
            serde_json::from_str(r#"{"persona": {"name": "Wren"}}"#).unwrap();
        assert_eq!(cfg.persona.name, "Wren");
        assert_eq!(cfg.tts_model, "eleven_flash_v2_5");
    }
}
