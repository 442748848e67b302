//! Game state machine.
//!
//! `Game` owns one session together with everything the session needs to
//! run: the word pool, the settings, the RNG, the tick driver and the ports.
//! Several games can live side by side; nothing here is global.
//!
//! ```text
//!   NotStarted ──start──▶ Running ──end / win / loss──▶ Ended
//!        ▲                   ▲                            │
//!        │                   └──────────restart───────────┤
//!        └───────────────────quit_to_menu─────────────────┘
//! ```

use std::time::Instant;

use log::{debug, info, warn};
use rand::rngs::StdRng;

use crate::compute::{self, RoundEnd};
use crate::config::{self, Settings};
use crate::entities::{Cue, GameStatus, Outcome, Session, WordPair};
use crate::input::{self, Action};
use crate::ports::{AudioPort, GlyphMetrics, Renderer, SpeechPort};
use crate::render;
use crate::round;
use crate::scheduler::{DelayQueue, Ticker};
use crate::words::{self, WordPool};

pub struct Game<A: AudioPort, S: SpeechPort> {
    session: Session,
    pool: WordPool,
    settings: Settings,
    metrics: GlyphMetrics,
    rng: StdRng,
    /// Drives the simulation; armed only while a game runs.
    ticker: Ticker,
    /// Drives the star field, always armed.
    ambient: Ticker,
    speech_queue: DelayQueue<String>,
    audio: A,
    speech: S,
}

impl<A: AudioPort, S: SpeechPort> Game<A, S> {
    pub fn new(
        settings: Settings,
        pool: WordPool,
        audio: A,
        speech: S,
        mut rng: StdRng,
        now: Instant,
    ) -> Self {
        let session = compute::init_state(&settings, &mut rng);
        let mut ambient = Ticker::new(settings.tick_interval());
        ambient.start(now);
        Self {
            session,
            pool,
            ticker: Ticker::new(settings.tick_interval()),
            ambient,
            settings,
            metrics: GlyphMetrics::default(),
            rng,
            speech_queue: DelayQueue::default(),
            audio,
            speech,
        }
    }

    /// Use different label metrics for collisions.
    pub fn with_metrics(mut self, metrics: GlyphMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Direct access for tools and tests that stage a particular situation.
    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    pub fn status(&self) -> GameStatus {
        self.session.status
    }

    pub fn pool(&self) -> &WordPool {
        &self.pool
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn audio(&self) -> &A {
        &self.audio
    }

    pub fn speech(&self) -> &S {
        &self.speech
    }

    pub fn is_ticking(&self) -> bool {
        self.ticker.is_running()
    }

    pub fn pending_speech(&self) -> usize {
        self.speech_queue.len()
    }

    // ── Control surface ──────────────────────────────────────────────────────

    /// Begin a new game.  Ignored while a game is already running.
    pub fn start(&mut self, now: Instant) -> bool {
        if self.session.status == GameStatus::Running {
            return false;
        }
        self.ticker.stop();
        self.session = Session {
            status: GameStatus::Running,
            ..compute::reset_for_game(&self.session, self.settings.initial_lives)
        };
        self.ticker.start(now);
        info!("game started with {} words", self.pool.len());
        self.next_round(now);
        self.flush_cues(now);
        true
    }

    /// Stop the running game by hand.
    pub fn end(&mut self) -> bool {
        self.finish(Outcome::Stopped)
    }

    /// Play again from the end screen.
    pub fn restart(&mut self, now: Instant) -> bool {
        if self.session.status != GameStatus::Ended {
            return false;
        }
        self.start(now)
    }

    /// Leave the end screen for the title screen.
    pub fn quit_to_menu(&mut self) -> bool {
        if self.session.status != GameStatus::Ended {
            return false;
        }
        self.session.status = GameStatus::NotStarted;
        self.session.outcome = None;
        debug!("back to title screen");
        true
    }

    fn finish(&mut self, outcome: Outcome) -> bool {
        if self.session.status != GameStatus::Running {
            return false;
        }
        // The driver goes first so no tick sees a half-cleared session.
        self.ticker.stop();
        self.session = Session {
            status: GameStatus::Ended,
            outcome: Some(outcome),
            ..compute::clear_field(&self.session)
        };
        info!(
            "game ended: {:?} after {} of {} words",
            outcome,
            self.session.used_words.len(),
            self.pool.len()
        );
        true
    }

    // ── Input ────────────────────────────────────────────────────────────────

    pub fn handle(&mut self, action: Action, now: Instant) {
        self.session = input::apply(&self.session, action);
        self.flush_cues(now);
    }

    // ── Configuration surface ────────────────────────────────────────────────

    /// Change the base fall speed.  The running round picks it up on the
    /// next tick.
    pub fn set_word_speed(&mut self, speed: f32) -> config::Result<()> {
        config::check_speed("word_speed", speed)?;
        self.settings.word_speed = speed;
        self.session.base_word_speed = speed;
        self.session.word_speed = speed;
        debug!("word speed set to {speed}");
        Ok(())
    }

    /// Change the distance covered by one move; applies to the next key press.
    pub fn set_player_speed(&mut self, speed: f32) -> config::Result<()> {
        config::check_speed("player_speed", speed)?;
        self.settings.player_speed = speed;
        self.session.player_speed = speed;
        debug!("player speed set to {speed}");
        Ok(())
    }

    /// Replace the word pool and forget which words were used.  An empty list
    /// is rejected and the current pool stays.
    pub fn load_words(&mut self, pairs: Vec<WordPair>) -> words::Result<()> {
        if let Err(e) = self.pool.replace(pairs) {
            warn!("word list rejected: {e}");
            return Err(e);
        }
        self.session.used_words.clear();
        info!("loaded {} word pairs", self.pool.len());
        Ok(())
    }

    // ── Timing ───────────────────────────────────────────────────────────────

    /// Run everything due at `now`: star twinkle, simulation ticks and
    /// delayed pronunciations.
    pub fn update(&mut self, now: Instant) {
        for _ in 0..self.ambient.due(now) {
            self.session.stars = compute::twinkle_stars(&self.session.stars);
        }

        for _ in 0..self.ticker.due(now) {
            if !self.ticker.is_running() {
                break;
            }
            self.step(now);
        }

        for text in self.speech_queue.take_due(now) {
            self.speech.speak(&text, &self.settings.voice);
        }
    }

    /// One simulation tick.  Does nothing unless a game is running.
    pub fn step(&mut self, now: Instant) {
        if self.session.status != GameStatus::Running {
            return;
        }
        let (next, round_end) = compute::tick(&self.session, &self.metrics, &mut self.rng);
        self.session = next;
        match round_end {
            None => {}
            Some(RoundEnd::OutOfLives) => {
                self.finish(Outcome::Lost);
            }
            Some(end) => {
                debug!("round over: {end:?}");
                self.next_round(now);
            }
        }
        self.flush_cues(now);
    }

    fn next_round(&mut self, now: Instant) {
        match round::start_new_round(&self.session, &self.pool, &mut self.rng) {
            Some(next) => self.session = next,
            None => {
                self.flush_cues(now);
                self.finish(Outcome::Won);
            }
        }
    }

    /// Hand queued side effects to the ports.
    fn flush_cues(&mut self, now: Instant) {
        for cue in std::mem::take(&mut self.session.cues) {
            match cue {
                Cue::Play(sound) => {
                    let volume = self.settings.volumes.for_sound(sound);
                    self.audio.play(sound, volume);
                }
                Cue::Pronounce(text) => {
                    self.speech_queue
                        .schedule(now + self.settings.speech_delay(), text);
                }
            }
        }
    }

    // ── Rendering ────────────────────────────────────────────────────────────

    pub fn draw<R: Renderer + ?Sized>(&self, out: &mut R) -> std::io::Result<()> {
        render::draw_frame(out, &self.session)
    }
}
