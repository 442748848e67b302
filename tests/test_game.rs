use std::time::{Duration, Instant};

use word_shooter::config::Settings;
use word_shooter::entities::*;
use word_shooter::input::Action;
use word_shooter::ports::{RecordingAudio, RecordingRenderer, RecordingSpeech};
use word_shooter::{Game, WordPool};

use rand::rngs::StdRng;
use rand::SeedableRng;

type TestGame = Game<RecordingAudio, RecordingSpeech>;

fn three_words() -> WordPool {
    WordPool::new(vec![
        WordPair::new("apple", "苹果"),
        WordPair::new("book", "书"),
        WordPair::new("cat", "猫"),
    ])
    .unwrap()
}

fn new_game(settings: Settings, pool: WordPool, t0: Instant) -> TestGame {
    Game::new(
        settings,
        pool,
        RecordingAudio::default(),
        RecordingSpeech::default(),
        StdRng::seed_from_u64(7),
        t0,
    )
}

/// Put a bullet right under the word matching `pick` so the next tick hits it.
fn aim_at(game: &mut TestGame, pick: impl Fn(&FallingWord) -> bool) {
    let s = game.session_mut();
    let target = s.words.iter().find(|w| pick(w)).cloned().unwrap();
    let y = target.y + s.word_speed - 1.0 + PROJECTILE_SPEED;
    s.projectiles.push(Projectile {
        x: target.x + 1.0,
        y,
        kind: ProjectileKind::Bullet,
    });
}

fn answer_correctly(game: &mut TestGame, now: Instant) {
    aim_at(game, |w| w.is_correct);
    game.step(now);
}

// ── state machine ─────────────────────────────────────────────────────────────

#[test]
fn new_game_waits_on_title_screen() {
    let t0 = Instant::now();
    let game = new_game(Settings::default(), three_words(), t0);
    assert_eq!(game.status(), GameStatus::NotStarted);
    assert!(!game.is_ticking());
    assert!(game.session().words.is_empty());
}

#[test]
fn start_begins_first_round() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);

    assert!(game.start(t0));
    assert_eq!(game.status(), GameStatus::Running);
    assert!(game.is_ticking());
    assert_eq!(game.session().words.len(), 3);
    assert_eq!(game.session().used_words.len(), 1);
    assert_eq!(game.session().lives, 1);
    assert_eq!(game.pending_speech(), 1);

    // a second start is ignored while running
    assert!(!game.start(t0));
    assert_eq!(game.session().used_words.len(), 1);
}

#[test]
fn end_stops_driver_and_clears_field() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    game.handle(Action::FireBullet, t0);

    assert!(game.end());
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.session().outcome, Some(Outcome::Stopped));
    assert!(!game.is_ticking());
    assert!(game.session().words.is_empty());
    assert!(game.session().projectiles.is_empty());
    assert!(game.session().current_word.is_empty());

    assert!(!game.end());
}

#[test]
fn end_is_ignored_before_start() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    assert!(!game.end());
    assert!(!game.restart(t0));
    assert!(!game.quit_to_menu());
    assert_eq!(game.status(), GameStatus::NotStarted);
}

#[test]
fn restart_and_quit_from_end_screen() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    answer_correctly(&mut game, t0);
    assert_eq!(game.session().used_words.len(), 2);
    game.end();

    assert!(game.restart(t0));
    assert_eq!(game.status(), GameStatus::Running);
    assert_eq!(game.session().used_words.len(), 1);
    assert_eq!(game.session().consecutive_hits, 0);
    assert_eq!(game.session().outcome, None);

    game.end();
    assert!(game.quit_to_menu());
    assert_eq!(game.status(), GameStatus::NotStarted);
    assert_eq!(game.session().outcome, None);
    assert!(game.start(t0));
}

#[test]
fn ticks_only_advance_while_running() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.step(t0);
    assert_eq!(game.session().frame, 0);

    game.start(t0);
    game.update(t0 + Duration::from_millis(33));
    assert_eq!(game.session().frame, 2);
    assert!(game.session().words.iter().all(|w| w.y == 2.0));
}

// ── input ─────────────────────────────────────────────────────────────────────

#[test]
fn input_is_ignored_outside_running() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.handle(Action::FireBullet, t0);
    game.handle(Action::MoveLeft, t0);
    assert!(game.session().projectiles.is_empty());
    assert_eq!(game.session().player, Player::spawn());
    assert!(game.audio().played.is_empty());
}

#[test]
fn shooting_plays_cue_at_configured_volume() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    game.handle(Action::FireBullet, t0);
    game.handle(Action::FireBullet, t0);
    assert_eq!(game.session().projectiles.len(), 2);
    assert_eq!(game.audio().played, vec![(Sound::Shoot, 0.2), (Sound::Shoot, 0.2)]);
}

#[test]
fn missile_without_stock_does_nothing() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    let before = game.session().clone();

    game.handle(Action::FireMissile, t0);
    assert!(game.session().projectiles.is_empty());
    assert!(game.audio().played.is_empty());
    assert_eq!(game.session().missiles, 0);
    assert_eq!(game.session().words, before.words);
}

#[test]
fn missile_clears_round_and_starts_next() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    game.session_mut().missiles = 1;

    game.handle(Action::FireMissile, t0);
    assert_eq!(game.session().missiles, 0);
    assert_eq!(game.audio().sounds(), vec![Sound::MissileLaunch]);

    // move the missile under the first word
    let first = game.session().words[0].clone();
    let missile = &mut game.session_mut().projectiles[0];
    missile.x = first.x + 1.0;
    missile.y = first.y + PROJECTILE_SPEED;
    let old_word = game.session().current_word.clone();

    game.step(t0);
    let s = game.session();
    assert_eq!(s.used_words.len(), 2);
    assert_ne!(s.current_word, old_word);
    assert_eq!(s.words.len(), 3);
    assert!(s.words.iter().all(|w| w.y == 0.0));
    assert_eq!(s.particles.len(), 3 * PARTICLE_COUNT);
    assert_eq!(s.missiles, 0);
    assert_eq!(
        game.audio().sounds(),
        vec![
            Sound::MissileLaunch,
            Sound::Explosion,
            Sound::Explosion,
            Sound::Explosion
        ]
    );
}

// ── rounds, streaks, speed ────────────────────────────────────────────────────

#[test]
fn five_correct_answers_earn_a_missile() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), WordPool::default(), t0);
    game.start(t0);
    for hit in 1..=4 {
        answer_correctly(&mut game, t0);
        assert_eq!(game.session().consecutive_hits, hit);
    }
    answer_correctly(&mut game, t0);
    assert_eq!(game.session().consecutive_hits, 0);
    assert_eq!(game.session().missiles, 1);
    assert_eq!(game.status(), GameStatus::Running);
}

#[test]
fn wrong_answer_doubles_speed_until_next_round() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    answer_correctly(&mut game, t0);
    assert_eq!(game.session().consecutive_hits, 1);

    aim_at(&mut game, |w| !w.is_correct);
    game.step(t0);
    assert_eq!(game.session().word_speed, 2.0);
    assert_eq!(game.session().consecutive_hits, 0);
    assert_eq!(game.session().words.len(), 2);

    answer_correctly(&mut game, t0);
    assert_eq!(game.session().word_speed, 1.0);
}

#[test]
fn answering_every_word_wins() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    answer_correctly(&mut game, t0);
    answer_correctly(&mut game, t0);
    assert_eq!(game.status(), GameStatus::Running);

    answer_correctly(&mut game, t0);
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.session().outcome, Some(Outcome::Won));
    assert!(!game.is_ticking());
    assert_eq!(game.session().used_words.len(), 3);
    assert_eq!(
        game.audio().sounds(),
        vec![Sound::Explosion, Sound::Explosion, Sound::Explosion]
    );
}

#[test]
fn losing_the_last_life_ends_the_game() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    for w in &mut game.session_mut().words {
        w.y = FIELD_HEIGHT;
    }

    game.step(t0);
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.session().outcome, Some(Outcome::Lost));
    assert_eq!(game.session().lives, 0);
    assert!(!game.is_ticking());
    assert_eq!(game.audio().sounds(), vec![Sound::LifeLost]);
}

#[test]
fn missed_word_with_lives_left_starts_next_round() {
    let t0 = Instant::now();
    let settings = Settings {
        initial_lives: 3,
        ..Settings::default()
    };
    let mut game = new_game(settings, three_words(), t0);
    game.start(t0);
    game.session_mut().words[0].y = FIELD_HEIGHT;

    game.step(t0);
    assert_eq!(game.status(), GameStatus::Running);
    assert_eq!(game.session().lives, 2);
    assert_eq!(game.session().used_words.len(), 2);
    assert_eq!(game.audio().played, vec![(Sound::LifeLost, 0.4)]);
}

#[test]
fn stalled_update_stops_at_game_end() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    for w in &mut game.session_mut().words {
        w.y = FIELD_HEIGHT;
    }
    game.update(t0 + Duration::from_secs(5));
    assert_eq!(game.status(), GameStatus::Ended);
    assert_eq!(game.session().frame, 1);
    assert_eq!(game.audio().sounds(), vec![Sound::LifeLost]);
}

// ── speech ────────────────────────────────────────────────────────────────────

#[test]
fn word_is_spoken_after_the_delay() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    let word = game.session().current_word.clone();

    game.update(t0 + Duration::from_millis(500));
    assert!(game.speech().spoken.is_empty());

    game.update(t0 + Duration::from_millis(1000));
    assert_eq!(game.speech().spoken.len(), 1);
    let (text, voice) = &game.speech().spoken[0];
    assert_eq!(text, &word);
    assert_eq!(voice.language, "en");
    assert_eq!(voice.volume, 0.5);
}

#[test]
fn pending_speech_survives_round_change_and_end() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);
    let first = game.session().current_word.clone();
    answer_correctly(&mut game, t0);
    let second = game.session().current_word.clone();
    game.end();

    game.update(t0 + Duration::from_secs(2));
    let spoken: Vec<&str> = game.speech().spoken.iter().map(|(t, _)| t.as_str()).collect();
    assert_eq!(spoken, vec![first.as_str(), second.as_str()]);
}

// ── configuration & word lists ────────────────────────────────────────────────

#[test]
fn speeds_are_validated_and_applied() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);

    assert!(game.set_word_speed(0.0).is_err());
    assert!(game.set_player_speed(-5.0).is_err());
    assert_eq!(game.session().word_speed, 1.0);

    game.set_word_speed(3.0).unwrap();
    game.set_player_speed(50.0).unwrap();
    assert_eq!(game.session().word_speed, 3.0);

    game.handle(Action::MoveLeft, t0);
    assert_eq!(game.session().player.x, 340.0);

    game.step(t0);
    assert!(game.session().words.iter().all(|w| w.y == 3.0));

    // later rounds start from the new base
    answer_correctly(&mut game, t0);
    assert_eq!(game.session().word_speed, 3.0);
}

#[test]
fn uploading_words_replaces_pool_and_forgets_used() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    game.start(t0);

    assert!(game.load_words(Vec::new()).is_err());
    assert_eq!(game.pool().len(), 3);
    assert_eq!(game.session().used_words.len(), 1);

    game.load_words(vec![WordPair::new("sun", "太阳"), WordPair::new("moon", "月亮")])
        .unwrap();
    assert_eq!(game.pool().len(), 2);
    assert!(game.session().used_words.is_empty());
}

#[test]
fn independent_games_do_not_share_state() {
    let t0 = Instant::now();
    let mut a = new_game(Settings::default(), three_words(), t0);
    let b = new_game(Settings::default(), three_words(), t0);
    a.start(t0);
    assert_eq!(b.status(), GameStatus::NotStarted);
    assert!(b.session().used_words.is_empty());
}

// ── background & rendering ────────────────────────────────────────────────────

#[test]
fn stars_twinkle_on_the_title_screen() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    let before: Vec<f32> = game.session().stars.iter().map(|s| s.brightness).collect();
    game.update(t0 + Duration::from_millis(16));
    let after: Vec<f32> = game.session().stars.iter().map(|s| s.brightness).collect();
    assert_ne!(before, after);
    assert_eq!(game.session().frame, 0);
}

#[test]
fn frames_show_title_hud_and_outcome() {
    let t0 = Instant::now();
    let mut game = new_game(Settings::default(), three_words(), t0);
    let mut screen = RecordingRenderer::default();

    game.draw(&mut screen).unwrap();
    assert!(screen.texts().contains(&"WORD SHOOTER"));

    game.start(t0);
    game.draw(&mut screen).unwrap();
    let texts = screen.texts();
    assert!(texts.contains(&game.session().current_word.as_str()));
    for w in &game.session().words {
        assert!(texts.contains(&w.text.as_str()));
    }
    assert!(texts.contains(&"♥"));

    for w in &mut game.session_mut().words {
        w.y = FIELD_HEIGHT;
    }
    game.step(t0);
    game.draw(&mut screen).unwrap();
    assert!(screen.texts().contains(&"GAME OVER"));
}
