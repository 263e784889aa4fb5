mod display;

use std::fs::File;
use std::io::{stdout, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::{mpsc, Mutex};
use std::thread;
use std::time::Instant;

use anyhow::Context as _;
use clap::Parser;
use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    terminal, ExecutableCommand,
};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::info;
use tracing_subscriber::EnvFilter;

use space_invaders::canvas::Viewport;
use space_invaders::clock::SystemClock;
use space_invaders::input::{FrameInput, GameEvent, HeldKeys, Key};
use space_invaders::{Config, Game};

#[derive(Parser)]
#[command(name = "space_invaders")]
#[command(about = "Space Invaders in the terminal")]
struct Args {
    /// JSON config file; missing keys take defaults
    #[arg(long)]
    config: Option<PathBuf>,
    /// Name the score is saved under
    #[arg(long)]
    name: Option<String>,
    /// Fixed RNG seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,
    /// Leaderboard file
    #[arg(long)]
    save_file: Option<PathBuf>,
    /// Write logs here; the terminal itself is the game screen
    #[arg(long)]
    log_file: Option<PathBuf>,
}

// ── Input mapping ─────────────────────────────────────────────────────────────

enum Mapped {
    Key(Key),
    Quit,
}

fn map_key(code: KeyCode, modifiers: KeyModifiers) -> Option<Mapped> {
    let mapped = match code {
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => Mapped::Quit,
        KeyCode::Char('q') | KeyCode::Char('Q') => Mapped::Quit,
        KeyCode::Left | KeyCode::Char('a') | KeyCode::Char('A') => Mapped::Key(Key::Left),
        KeyCode::Right | KeyCode::Char('d') | KeyCode::Char('D') => Mapped::Key(Key::Right),
        KeyCode::Up => Mapped::Key(Key::Up),
        KeyCode::Down => Mapped::Key(Key::Down),
        KeyCode::Char(' ') => Mapped::Key(Key::Fire),
        KeyCode::Enter => Mapped::Key(Key::Confirm),
        KeyCode::Esc => Mapped::Key(Key::Cancel),
        _ => return None,
    };
    Some(mapped)
}

/// Drain every pending terminal event into this frame's input.
///
/// Presses become one-shot events and refresh the held-key window; repeats
/// only refresh it; releases (keyboard-enhancement terminals) drop the key.
fn collect_events(rx: &mpsc::Receiver<Event>, held: &mut HeldKeys, frame: u64) -> Vec<GameEvent> {
    let mut events = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        let Event::Key(KeyEvent { code, kind, modifiers, .. }) = ev else {
            continue;
        };
        match (map_key(code, modifiers), kind) {
            (Some(Mapped::Quit), KeyEventKind::Press) => events.push(GameEvent::Quit),
            (Some(Mapped::Key(key)), KeyEventKind::Press) => {
                held.press(key, frame);
                events.push(GameEvent::KeyDown(key));
            }
            (Some(Mapped::Key(key)), KeyEventKind::Repeat) => held.press(key, frame),
            (Some(Mapped::Key(key)), KeyEventKind::Release) => held.release(key),
            _ => {}
        }
    }
    events
}

// ── Frame loop ────────────────────────────────────────────────────────────────

fn game_loop<W: Write>(
    out: &mut W,
    game: &mut Game,
    rx: &mpsc::Receiver<Event>,
    config: &Config,
) -> std::io::Result<()> {
    let budget = config.frame_budget();
    let mut held = HeldKeys::default();
    let mut frame: u64 = 0;
    let mut last = Instant::now();

    while game.is_running() {
        let frame_start = Instant::now();
        let dt = frame_start.duration_since(last).as_secs_f32();
        last = frame_start;
        frame += 1;

        let events = collect_events(rx, &mut held, frame);
        game.update(FrameInput::new(dt, events, held.controls(frame)));

        let (cols, rows) = terminal::size()?;
        display::present(out, &game.render(), Viewport { cols, rows })?;

        let elapsed = frame_start.elapsed();
        if elapsed < budget {
            thread::sleep(budget - elapsed);
        }
    }
    Ok(())
}

// ── Startup ───────────────────────────────────────────────────────────────────

fn build_config(args: &Args) -> anyhow::Result<Config> {
    let mut config = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };
    if let Some(name) = &args.name {
        config.player_name = name.clone();
    }
    if let Some(seed) = args.seed {
        config.seed = Some(seed);
    }
    if let Some(path) = &args.save_file {
        config.save_file = path.clone();
    }
    config.validate()?;
    Ok(config)
}

fn init_tracing(log_file: Option<&Path>) -> anyhow::Result<()> {
    let Some(path) = log_file else {
        return Ok(());
    };
    let file = File::create(path)
        .with_context(|| format!("failed to create log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .compact()
        .init();
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_tracing(args.log_file.as_deref())?;
    let config = build_config(&args)?;

    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };
    info!(player = %config.player_name, seed = ?config.seed, "=== Space Invaders startup ===");
    let mut game = Game::new(&config, Box::new(SystemClock::new()), rng);

    let raw_out = stdout();
    let mut out = BufWriter::new(raw_out);

    terminal::enable_raw_mode()?;
    out.execute(terminal::EnterAlternateScreen)?;
    out.execute(cursor::Hide)?;

    // Request key-release (and key-repeat) events from the terminal.
    // Kitty-protocol terminals support this; others fall back gracefully.
    let keyboard_enhanced = out
        .execute(PushKeyboardEnhancementFlags(
            KeyboardEnhancementFlags::REPORT_EVENT_TYPES,
        ))
        .is_ok();

    // Dedicate a thread exclusively to blocking event reads, sending them
    // through a channel so the game loop never has to block on I/O.
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || {
        while let Ok(ev) = event::read() {
            if tx.send(ev).is_err() {
                break; // receiver dropped → program exiting
            }
        }
    });

    let result = game_loop(&mut out, &mut game, &rx, &config);

    // Always restore the terminal
    if keyboard_enhanced {
        let _ = out.execute(PopKeyboardEnhancementFlags);
    }
    let _ = out.execute(cursor::Show);
    let _ = out.execute(terminal::LeaveAlternateScreen);
    let _ = terminal::disable_raw_mode();

    info!(frames = game.frame(), "shutdown");
    result.map_err(Into::into)
}
