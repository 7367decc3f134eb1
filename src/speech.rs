//! Speech output via the platform's speech-synthesis engine.
//!
//! Utterances are submitted with `interrupt = false`, so the engine queues
//! them and plays them in submission order. Nothing here waits for playback
//! or cancels queued speech; a backlog from one poll simply carries over
//! into the next.

use tracing::{debug, info, warn};

use crate::config::SpeechConfig;

/// Sink for announcement phrases.
pub trait Speaker: Send {
    /// Submit one utterance. Non-blocking; ordering is the engine's own.
    fn submit(&mut self, text: &str);
}

/// Speaker backed by the host platform's speech engine.
///
/// Degrades to silence with a warning when no engine is available, so the
/// poll/render loop keeps working on machines without speech support.
pub struct PlatformSpeaker {
    tts: Option<tts::Tts>,
}

impl PlatformSpeaker {
    pub fn new(config: &SpeechConfig) -> Self {
        if !config.enabled {
            info!("Speech output disabled");
            return Self { tts: None };
        }

        let tts = match tts::Tts::default() {
            Ok(mut tts) => {
                apply_rate(&mut tts, config.rate);
                info!("Speech engine initialized");
                Some(tts)
            }
            Err(e) => {
                warn!("Failed to initialize speech engine: {e} — continuing silently");
                None
            }
        };

        Self { tts }
    }
}

impl Speaker for PlatformSpeaker {
    fn submit(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(tts) = &mut self.tts {
            debug!("Speaking: {text:?}");
            if let Err(e) = tts.speak(text, false) {
                warn!("Failed to submit utterance: {e}");
            }
        }
    }
}

/// Scale the engine's normal rate by the configured multiplier, clamped to
/// what the engine supports. A multiplier of 1.0 keeps the normal rate.
fn apply_rate(tts: &mut tts::Tts, multiplier: f32) {
    if !tts.supported_features().rate {
        if multiplier != 1.0 {
            warn!("Speech engine does not support rate changes");
        }
        return;
    }

    let rate = (tts.normal_rate() * multiplier).clamp(tts.min_rate(), tts.max_rate());
    if let Err(e) = tts.set_rate(rate) {
        warn!("Failed to set speech rate: {e}");
    }
}
