mod devices;
mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Stdout};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use clap::Parser;
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    terminal, ExecutableCommand,
};
use log::{info, warn};
use rand::rngs::StdRng;
use rand::SeedableRng;

use word_shooter::entities::GameStatus;
use word_shooter::input::action_for_key;
use word_shooter::words::{load_word_file, WordPool};
use word_shooter::{Game, Settings};

use devices::{BellAudio, CommandSpeech};
use display::TerminalRenderer;

const FRAME: Duration = Duration::from_millis(16); // ≈60 FPS

/// How long a status message stays on the bottom row.
const NOTICE_TIME: Duration = Duration::from_secs(3);

const WORD_SPEED_STEP: f32 = 0.5;
const PLAYER_SPEED_STEP: f32 = 5.0;

#[derive(Parser)]
#[command(name = "word_shooter")]
#[command(about = "Shoot the falling translation of the word on screen")]
struct Args {
    /// Word list to play with (two-column CSV: source,translation)
    #[arg(short, long)]
    words: Option<PathBuf>,

    /// Settings file (JSON)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Seed for a reproducible game
    #[arg(long)]
    seed: Option<u64>,

    /// Log file (defaults to word_shooter.log in the temp directory)
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Speech synthesiser command
    #[arg(long, default_value = "espeak")]
    speech: String,

    /// Disable speech
    #[arg(long)]
    mute_speech: bool,
}

type Screen = TerminalRenderer<BufWriter<Stdout>>;
type TerminalGame = Game<BellAudio, CommandSpeech>;

// ── Logging ───────────────────────────────────────────────────────────────────

/// Logs go to a file; the terminal belongs to the game.
fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = File::create(path)
        .with_context(|| format!("cannot create log file {}", path.display()))?;
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_secs()
        .target(env_logger::Target::Pipe(Box::new(file)))
        .try_init()?;
    Ok(())
}

// ── Status line ───────────────────────────────────────────────────────────────

struct Notice {
    text: String,
    until: Instant,
}

impl Notice {
    fn new(text: impl Into<String>, now: Instant) -> Self {
        Self {
            text: text.into(),
            until: now + NOTICE_TIME,
        }
    }
}

// ── Key handling ──────────────────────────────────────────────────────────────

enum Flow {
    Continue,
    Quit,
}

fn handle_key(
    game: &mut TerminalGame,
    key: KeyEvent,
    word_file: Option<&Path>,
    notice: &mut Option<Notice>,
    now: Instant,
) -> Flow {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Flow::Quit;
    }

    match (game.status(), key.code) {
        (GameStatus::Running, KeyCode::Esc) | (GameStatus::Running, KeyCode::Char('q')) => {
            game.end();
        }
        (GameStatus::Running, code) => {
            if let Some(action) = action_for_key(code) {
                game.handle(action, now);
            } else {
                adjust_speeds(game, code, notice, now);
            }
        }
        (GameStatus::NotStarted, KeyCode::Enter) => {
            game.start(now);
        }
        (GameStatus::NotStarted, KeyCode::Char('q')) | (GameStatus::NotStarted, KeyCode::Esc) => {
            return Flow::Quit;
        }
        (GameStatus::NotStarted, KeyCode::Char('w')) => reload_words(game, word_file, notice, now),
        (GameStatus::NotStarted, code) => adjust_speeds(game, code, notice, now),
        (GameStatus::Ended, KeyCode::Char('r')) | (GameStatus::Ended, KeyCode::Enter) => {
            game.restart(now);
        }
        (GameStatus::Ended, KeyCode::Char('q')) | (GameStatus::Ended, KeyCode::Esc) => {
            game.quit_to_menu();
        }
        (GameStatus::Ended, KeyCode::Char('w')) => reload_words(game, word_file, notice, now),
        (GameStatus::Ended, _) => {}
    }
    Flow::Continue
}

fn adjust_speeds(
    game: &mut TerminalGame,
    code: KeyCode,
    notice: &mut Option<Notice>,
    now: Instant,
) {
    let word_speed = game.settings().word_speed;
    let player_speed = game.settings().player_speed;
    let result = match code {
        KeyCode::Char('+') | KeyCode::Char('=') => game.set_word_speed(word_speed + WORD_SPEED_STEP),
        KeyCode::Char('-') => game.set_word_speed((word_speed - WORD_SPEED_STEP).max(WORD_SPEED_STEP)),
        KeyCode::Char(']') => game.set_player_speed(player_speed + PLAYER_SPEED_STEP),
        KeyCode::Char('[') => {
            game.set_player_speed((player_speed - PLAYER_SPEED_STEP).max(PLAYER_SPEED_STEP))
        }
        _ => return,
    };
    let text = match result {
        Ok(()) => format!(
            "word speed {:.1}  player speed {:.0}",
            game.settings().word_speed,
            game.settings().player_speed
        ),
        Err(e) => e.to_string(),
    };
    *notice = Some(Notice::new(text, now));
}

/// Re-read the word list given on the command line.
fn reload_words(
    game: &mut TerminalGame,
    word_file: Option<&Path>,
    notice: &mut Option<Notice>,
    now: Instant,
) {
    let Some(path) = word_file else {
        *notice = Some(Notice::new("no word list given (--words)", now));
        return;
    };
    let text = match load_word_file(path).and_then(|pairs| game.load_words(pairs)) {
        Ok(()) => format!("loaded {} words from {}", game.pool().len(), path.display()),
        Err(e) => format!("word list rejected: {e}"),
    };
    *notice = Some(Notice::new(text, now));
}

// ── Game loop ─────────────────────────────────────────────────────────────────

fn game_loop(
    screen: &mut Screen,
    game: &mut TerminalGame,
    rx: &mpsc::Receiver<Event>,
    word_file: Option<&Path>,
) -> std::io::Result<()> {
    let mut notice: Option<Notice> = None;

    loop {
        let frame_start = Instant::now();

        // ── Drain all pending input events (non-blocking) ─────────────────────
        while let Ok(event) = rx.try_recv() {
            match event {
                // Key-down and key-repeat each produce one action
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if let Flow::Quit = handle_key(game, key, word_file, &mut notice, frame_start) {
                        return Ok(());
                    }
                }
                Event::Resize(cols, rows) => screen.resize(cols, rows),
                _ => {}
            }
        }

        game.update(frame_start);

        if notice.as_ref().is_some_and(|n| n.until <= frame_start) {
            notice = None;
        }
        screen.set_status_line(notice.as_ref().map(|n| n.text.clone()));
        game.draw(screen)?;

        let elapsed = frame_start.elapsed();
        if elapsed < FRAME {
            thread::sleep(FRAME - elapsed);
        }
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

fn build_game(args: &Args) -> anyhow::Result<TerminalGame> {
    let settings = match &args.config {
        Some(path) => Settings::load(path)
            .with_context(|| format!("cannot load settings from {}", path.display()))?,
        None => Settings::default(),
    };

    let pool = match &args.words {
        Some(path) => {
            let pairs = load_word_file(path)
                .with_context(|| format!("cannot load word list {}", path.display()))?;
            WordPool::new(pairs)?
        }
        None => WordPool::default(),
    };

    let rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let speech = if args.mute_speech {
        CommandSpeech::disabled()
    } else {
        CommandSpeech::new(args.speech.clone())
    };

    info!("{} word pairs, settings {:?}", pool.len(), settings);
    Ok(Game::new(
        settings,
        pool,
        BellAudio::default(),
        speech,
        rng,
        Instant::now(),
    ))
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let log_path = args
        .log_file
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join("word_shooter.log"));
    if let Err(e) = init_logging(&log_path) {
        eprintln!("warning: logging disabled: {e:#}");
    }

    // Configuration problems are reported before the terminal is taken over.
    let mut game = build_game(&args)?;

    terminal::enable_raw_mode()?;
    let mut screen = TerminalRenderer::new(BufWriter::new(stdout()))?;
    screen.writer().execute(terminal::EnterAlternateScreen)?;
    screen.writer().execute(cursor::Hide)?;

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break; // receiver dropped → program exiting
                }
            }
            Err(_) => break,
        }
    });

    let result = game_loop(&mut screen, &mut game, &rx, args.words.as_deref());

    // Always restore the terminal
    let _ = screen.writer().execute(cursor::Show);
    let _ = screen.writer().execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    if let Err(e) = &result {
        warn!("terminal error: {e}");
    }
    result.context("terminal error")
}
