//! # Narrative Module
//!
//! "The System" narrator: short in-character flavor text fetched from the
//! Gemini `generateContent` endpoint.
//!
//! Strictly decorative and strictly post-commit. [`SystemVoice::describe`]
//! never returns an error: a missing key, a transport failure, or an empty
//! response each degrade to a fixed fallback string. Callers invoke it
//! only after game state has been mutated and persisted, so a narrative
//! outage can never block or alter a transition.

use crate::player::Player;
use reqwest::Client;
use serde::{Deserialize, Serialize};

/// Events the System narrates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemEvent {
    Login,
    LevelUp,
    Failure,
    Advice,
    Reminder,
    Penalty,
}

/// Returned when no API key is configured.
pub const FALLBACK_MISSING_KEY: &str = "SYSTEM ERROR: API KEY NOT FOUND.";

/// Returned on any transport or API error.
pub const FALLBACK_OFFLINE: &str = "SYSTEM: OFFLINE.";

/// Returned when the service answers without usable text.
pub const FALLBACK_UNSTABLE: &str = "SYSTEM: CONNECTION UNSTABLE.";

const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const SYSTEM_TONE: &str = "You are \"The System\" from Solo Leveling. \
You speak coldly, robotically, and with authority. \
Always call the user \"Player\". \
Keep responses short unless giving advice. \
Use RPG terms like Stats, Daily Quest, Penalty Zone, Level Up.";

/// The narrator client.
pub struct SystemVoice {
    client: Client,
    endpoint: String,
    model: String,
    api_key: Option<String>,
}

impl SystemVoice {
    /// Builds a narrator reading the key from `GEMINI_API_KEY`.
    pub fn from_env() -> Self {
        Self::new(std::env::var("GEMINI_API_KEY").ok())
    }

    /// Builds a narrator with an explicit (possibly absent) key.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
        }
    }

    /// Narrates an event in the System's voice.
    ///
    /// Infallible by contract: every failure path returns one of the
    /// fixed fallback strings.
    pub async fn describe(
        &self,
        event: SystemEvent,
        player: &Player,
        query: Option<&str>,
    ) -> String {
        let Some(api_key) = self.api_key.as_deref() else {
            log::error!("narrative request dropped: no API key configured");
            return FALLBACK_MISSING_KEY.to_string();
        };

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.endpoint, self.model, api_key
        );
        let body = GenerateRequest {
            contents: vec![Content {
                parts: vec![Part {
                    text: prompt_for(event, player, query),
                }],
            }],
            system_instruction: Content {
                parts: vec![Part {
                    text: SYSTEM_TONE.to_string(),
                }],
            },
        };

        let response = match self.client.post(&url).json(&body).send().await {
            Ok(response) => response,
            Err(err) => {
                log::error!("narrative request failed: {}", err);
                return FALLBACK_OFFLINE.to_string();
            }
        };

        if !response.status().is_success() {
            log::error!("narrative service answered {}", response.status());
            return FALLBACK_OFFLINE.to_string();
        }

        match response.json::<GenerateResponse>().await {
            Ok(parsed) => parsed
                .first_text()
                .unwrap_or_else(|| FALLBACK_UNSTABLE.to_string()),
            Err(err) => {
                log::error!("narrative response unreadable: {}", err);
                return FALLBACK_OFFLINE.to_string();
            }
        }
    }
}

/// Builds the per-event prompt handed to the model.
fn prompt_for(event: SystemEvent, player: &Player, query: Option<&str>) -> String {
    match event {
        SystemEvent::Login => format!(
            "Player {} logged in. Level {}. Welcome them and remind them of today's Daily Quest.",
            player.username, player.level
        ),
        SystemEvent::LevelUp => format!(
            "Player reached Level {}. Provide a system-style level-up announcement.",
            player.level
        ),
        SystemEvent::Failure => {
            "Player failed the Daily Quest. Warn them about the Penalty Zone.".to_string()
        }
        SystemEvent::Advice => format!(
            "Player asked: \"{}\". Give RPG-themed fitness advice in under 100 words.",
            query.unwrap_or_default()
        ),
        SystemEvent::Reminder => {
            "Daily Quest unfinished. Issue a short threatening reminder about Penalty Mode."
                .to_string()
        }
        SystemEvent::Penalty => {
            "Player triggered Penalty Mode. Describe it in a dramatic, dangerous Solo Leveling tone."
                .to_string()
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(rename = "systemInstruction")]
    system_instruction: Content,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

impl GenerateResponse {
    fn first_text(&self) -> Option<String> {
        let text = self
            .candidates
            .first()?
            .content
            .parts
            .first()?
            .text
            .trim()
            .to_string();
        if text.is_empty() {
            None
        } else {
            Some(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new("jin@example.com".to_string(), "Jinwoo".to_string())
    }

    #[test]
    fn test_prompts_carry_player_context() {
        let mut p = player();
        p.level = 7;

        let login = prompt_for(SystemEvent::Login, &p, None);
        assert!(login.contains("Jinwoo"));
        assert!(login.contains("Level 7"));

        let advice = prompt_for(SystemEvent::Advice, &p, Some("how do I train legs?"));
        assert!(advice.contains("how do I train legs?"));
    }

    #[tokio::test]
    async fn test_missing_key_fails_closed() {
        let voice = SystemVoice::new(None);
        let text = voice.describe(SystemEvent::Penalty, &player(), None).await;
        assert_eq!(text, FALLBACK_MISSING_KEY);
    }

    #[test]
    fn test_response_parsing_extracts_first_candidate() {
        let json = r#"{"candidates":[{"content":{"parts":[{"text":" LEVEL UP. "}]}}]}"#;
        let parsed: GenerateResponse = serde_json::from_str(json).unwrap();
        assert_eq!(parsed.first_text().as_deref(), Some("LEVEL UP."));
    }

    #[test]
    fn test_empty_response_yields_no_text() {
        let parsed: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(parsed.first_text(), None);
    }
}
