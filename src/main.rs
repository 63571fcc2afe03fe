//! Terminal memory game runner (default binary).
//!
//! Uses crossterm for keyboard/mouse input and the framebuffer-based
//! renderer from `tui_memory::term`. Configuration comes from environment
//! variables, overridden by command-line flags.

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind, MouseButton, MouseEvent, MouseEventKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tracing::{info, warn};
use tui_memory::clock::FrameClock;
use tui_memory::config::{parse_grid_size, AppConfig};
use tui_memory::logging;
use tui_memory::core::GameSnapshot;
use tui_memory::engine::GameController;
use tui_memory::input::{handle_key_event, should_quit, Cursor};
use tui_memory::records::{default_records_path, AnyStore, BestRecords, JsonFileStore, MemoryStore};
use tui_memory::term::{FrameBuffer, GameView, TerminalRenderer, Viewport};
use tui_memory::types::{GameAction, GridSize, TICK_MS};

#[derive(Parser, Debug)]
#[command(name = "tui-memory")]
#[command(version, about = "Memory card matching game for the terminal", long_about = None)]
struct Cli {
    /// Board dimension N for an N x N board (2, 4, 6, 8, 10, 12 or 16)
    #[arg(short, long, value_parser = parse_grid_size)]
    size: Option<GridSize>,

    /// Use emoji faces (boards up to the emoji limit)
    #[arg(long, overrides_with = "no_emoji")]
    emoji: bool,

    /// Use colored faces only
    #[arg(long)]
    no_emoji: bool,

    /// Seed for reproducible deals
    #[arg(long)]
    seed: Option<u64>,

    /// Best-records file
    #[arg(long, value_name = "PATH")]
    records: Option<PathBuf>,

    /// Keep best records in memory only
    #[arg(long)]
    no_save: bool,
}

impl Cli {
    fn apply(self, config: &mut AppConfig) {
        if let Some(size) = self.size {
            config.grid_size = size;
        }
        if self.emoji {
            config.use_emoji = true;
        } else if self.no_emoji {
            config.use_emoji = false;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.records.is_some() {
            config.records_path = self.records;
        }
        config.no_save |= self.no_save;
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let mut config = AppConfig::from_env().context("invalid environment configuration")?;
    cli.apply(&mut config);

    logging::init(&config)?;

    let records = BestRecords::new(open_store(&config));
    let rng = match config.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_os_rng(),
    };
    let mut game = GameController::new(config.controller_config(), records, rng);
    info!(size = %config.grid_size, seed = ?config.seed, "starting");

    let mut term = TerminalRenderer::new();
    term.enter()?;

    let result = run(&mut term, &mut game);

    // Always try to restore terminal state.
    let _ = term.exit();
    result
}

fn open_store(config: &AppConfig) -> AnyStore {
    if config.no_save {
        return AnyStore::Memory(MemoryStore::new());
    }
    match config.records_path.clone().or_else(default_records_path) {
        Some(path) => AnyStore::File(JsonFileStore::open(path)),
        None => {
            warn!("no config directory; best records will not be saved");
            AnyStore::Memory(MemoryStore::new())
        }
    }
}

fn run(term: &mut TerminalRenderer, game: &mut GameController<AnyStore>) -> Result<()> {
    let view = GameView::new();
    let mut fb = FrameBuffer::new(0, 0);
    let mut snap = GameSnapshot::default();
    let mut cursor = Cursor::default();
    let mut banner: Option<String> = None;
    let mut dirty = true;

    let mut clock = FrameClock::new(Duration::from_millis(TICK_MS as u64));

    loop {
        let (w, h) = crossterm::terminal::size().unwrap_or((80, 24));
        let viewport = Viewport::new(w, h);

        // Render only when something changed.
        if dirty {
            game.snapshot_into(&mut snap);
            cursor.clamp(snap.size);
            view.render_into_with_notice(
                &snap,
                Some(cursor.index(snap.size)),
                banner.as_deref(),
                viewport,
                &mut fb,
            );
            term.draw_swap(&mut fb)?;
            dirty = false;
        }

        // Input with timeout until next tick.
        if event::poll(clock.timeout(Instant::now()))? {
            match event::read()? {
                Event::Key(key) if key.kind != KeyEventKind::Release => {
                    if should_quit(key) {
                        return Ok(());
                    }
                    if let Some(command) = handle_key_event(key) {
                        if let Some(action) =
                            command.into_action(&mut cursor, snap.size, game.selected_size())
                        {
                            if matches!(action, GameAction::Start | GameAction::Shuffle) {
                                banner = None;
                            }
                            game.apply_action(action);
                        }
                        dirty = true;
                    }
                }
                Event::Mouse(MouseEvent {
                    kind: MouseEventKind::Down(MouseButton::Left),
                    column,
                    row,
                    ..
                }) => {
                    if let Some(index) = view.card_at(&snap, viewport, column, row) {
                        cursor = Cursor::from_index(index, snap.size);
                        game.apply_action(GameAction::Flip(index));
                        dirty = true;
                    }
                }
                Event::Resize(..) => {
                    term.invalidate();
                    dirty = true;
                }
                _ => {}
            }
        }

        // Tick with the wall time that actually passed.
        if let Some(elapsed_ms) = clock.due(Instant::now()) {
            dirty |= game.tick(elapsed_ms);

            if let Some(notice) = game.take_notice() {
                banner = Some(notice.summary());
                dirty = true;
            }
        }
    }
}
