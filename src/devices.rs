//! Audio and speech adapters for the terminal frontend.

use std::io::{stdout, Write};
use std::process::{Child, Command, Stdio};

use log::{debug, warn};
use word_shooter::config::Voice;
use word_shooter::entities::Sound;
use word_shooter::ports::{AudioPort, SpeechPort};

/// Rings the terminal bell for cues loud enough to matter.  Quieter cues are
/// only logged.
pub struct BellAudio {
    pub min_volume: f32,
}

impl Default for BellAudio {
    fn default() -> Self {
        Self { min_volume: 0.3 }
    }
}

impl AudioPort for BellAudio {
    fn play(&mut self, sound: Sound, volume: f32) {
        debug!("sound {sound:?} at {volume:.1}");
        if volume >= self.min_volume {
            let mut out = stdout();
            let _ = out.write_all(b"\x07").and_then(|_| out.flush());
        }
    }
}

/// Hands utterances to an external speech synthesiser (`espeak` by default).
/// The first failure to launch it switches speech off for the session.
pub struct CommandSpeech {
    program: Option<String>,
    /// Synthesiser processes not yet reaped.
    running: Vec<Child>,
}

impl CommandSpeech {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: Some(program.into()),
            running: Vec::new(),
        }
    }

    pub fn disabled() -> Self {
        Self {
            program: None,
            running: Vec::new(),
        }
    }
}

impl SpeechPort for CommandSpeech {
    fn speak(&mut self, text: &str, voice: &Voice) {
        self.running.retain_mut(|child| matches!(child.try_wait(), Ok(None)));
        let Some(program) = &self.program else {
            return;
        };
        // espeak takes words per minute, pitch 0-99 and amplitude 0-200.
        let spawned = Command::new(program)
            .arg("-v")
            .arg(&voice.language)
            .arg("-s")
            .arg(format!("{}", (175.0 * voice.rate).round() as u32))
            .arg("-p")
            .arg(format!("{}", (50.0 * voice.pitch).clamp(0.0, 99.0).round() as u32))
            .arg("-a")
            .arg(format!("{}", (200.0 * voice.volume).clamp(0.0, 200.0).round() as u32))
            .arg(text)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .spawn();
        match spawned {
            Ok(child) => self.running.push(child),
            Err(e) => {
                warn!("speech disabled, cannot run {program}: {e}");
                self.program = None;
            }
        }
    }
}
