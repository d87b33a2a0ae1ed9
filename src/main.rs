use std::fs::{self, File};
use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use clap::Parser;
use crossterm::event;
use grid_snake::config::{Rgb, SessionConfig, Speed};
use grid_snake::grid::{GridSize, MIN_TILE_COUNT};
use grid_snake::input::{GameInput, map_event};
use grid_snake::renderer::{self, ViewInfo};
use grid_snake::score::{APP_DIR_NAME, JsonScoreStore, MemoryScoreStore, ScoreStore};
use grid_snake::session::{Phase, SessionController};
use grid_snake::terminal_runtime::{TerminalSession, install_panic_hook};
use grid_snake::ui::menu::{MenuAction, StartMenu};
use grid_snake::ui::signals::SignalRecorder;
use log::{info, warn};
use simplelog::{Config, LevelFilter, WriteLogger};

/// Input poll timeout while no tick is scheduled.
const IDLE_POLL: Duration = Duration::from_millis(250);

#[derive(Debug, Parser)]
#[command(version, about = "Snake on a square grid")]
struct Cli {
    /// Speed preset: slow, normal, fast (or 150, 100, 50 ms).
    #[arg(long)]
    speed: Option<String>,

    /// Background colour, `#rrggbb` or a name such as `black`.
    #[arg(long)]
    background: Option<String>,

    /// Snake colour, `#rrggbb` or a name such as `lime`.
    #[arg(long = "snake-color")]
    snake_color: Option<String>,

    /// Tiles per side of the square grid.
    #[arg(
        long = "tile-count",
        default_value_t = 20,
        value_parser = clap::value_parser!(u16).range(i64::from(MIN_TILE_COUNT)..)
    )]
    tile_count: u16,

    /// Seed for deterministic food placement.
    #[arg(long)]
    seed: Option<u64>,

    /// High score file (defaults to the platform data directory).
    #[arg(long = "score-file")]
    score_file: Option<PathBuf>,

    /// Keep the high score in memory only.
    #[arg(long = "no-persist")]
    no_persist: bool,

    /// Log file (defaults to the platform data directory).
    #[arg(long = "log-file")]
    log_file: Option<PathBuf>,

    /// Log level: off, error, warn, info, debug, trace.
    #[arg(long = "log-level", default_value = "info")]
    log_level: String,
}

enum Flow {
    Continue,
    Quit,
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();
    init_logging(&cli);
    install_panic_hook();

    if cli.no_persist {
        run(&cli, MemoryScoreStore::default())
    } else {
        let store = cli
            .score_file
            .clone()
            .map_or_else(JsonScoreStore::default_location, JsonScoreStore::new);
        info!("high score file: {}", store.path().display());
        run(&cli, store)
    }
}

fn init_logging(cli: &Cli) {
    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }

    let file = match File::create(&path) {
        Ok(file) => file,
        Err(error) => {
            eprintln!("Logging disabled, cannot open {}: {error}", path.display());
            return;
        }
    };

    let level = cli.log_level.parse().unwrap_or(LevelFilter::Info);
    if let Err(error) = WriteLogger::init(level, Config::default(), file) {
        eprintln!("Logging disabled: {error}");
    }
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(APP_DIR_NAME);
    base.push("grid-snake.log");
    base
}

/// Starts from the defaults and applies each CLI override that validates.
fn initial_config(cli: &Cli) -> SessionConfig {
    let mut config = SessionConfig::default();

    if let Some(raw) = &cli.speed {
        match raw.parse::<Speed>() {
            Ok(speed) => config.speed = speed,
            Err(error) => warn!("{error}; keeping {}", config.speed.label()),
        }
    }
    if let Some(raw) = &cli.background {
        match raw.parse::<Rgb>() {
            Ok(color) => config.colors.background = color,
            Err(error) => warn!("{error}; keeping {}", config.colors.background),
        }
    }
    if let Some(raw) = &cli.snake_color {
        match raw.parse::<Rgb>() {
            Ok(color) => config.colors.snake = color,
            Err(error) => warn!("{error}; keeping {}", config.colors.snake),
        }
    }

    config
}

fn run<S: ScoreStore>(cli: &Cli, store: S) -> io::Result<()> {
    let grid = GridSize::new(cli.tile_count);
    let mut session = match cli.seed {
        Some(seed) => SessionController::with_seed(grid, store, seed),
        None => SessionController::new(grid, store),
    };
    if let Err(error) = session.configure(initial_config(cli)) {
        warn!("startup configuration refused: {error}");
    }

    let mut menu = StartMenu::new(*session.config());
    let signals = SignalRecorder::new(session.high_score());
    session.subscribe(Box::new(signals.clone()));
    let mut terminal = TerminalSession::enter()?;
    info!("grid-snake started, high score {}", session.high_score());

    loop {
        session.poll(Instant::now());

        terminal.terminal_mut().draw(|frame| {
            renderer::render(
                frame,
                &session.snapshot(),
                ViewInfo {
                    menu: &menu,
                    signals: signals.latest(),
                },
            );
        })?;

        let timeout = session.next_tick_in(Instant::now()).unwrap_or(IDLE_POLL);
        if !event::poll(timeout)? {
            continue;
        }
        let Some(input) = map_event(&event::read()?) else {
            continue;
        };

        let flow = handle_input(&mut session, &mut menu, input);
        if matches!(flow, Flow::Quit) {
            break;
        }
    }

    info!("grid-snake exiting, high score {}", session.high_score());
    Ok(())
}

fn handle_input<S: ScoreStore>(
    session: &mut SessionController<S>,
    menu: &mut StartMenu,
    input: GameInput,
) -> Flow {
    if input == GameInput::Quit {
        return Flow::Quit;
    }

    match (session.phase(), input) {
        (Phase::Idle, input) => {
            if let MenuAction::Start(config) = menu.apply(input) {
                if let Err(error) = session.configure(config) {
                    warn!("menu configuration refused: {error}");
                }
                session.start();
            }
        }
        (Phase::Running, GameInput::Turn(heading)) => {
            session.request_heading_change(heading);
        }
        (Phase::Terminated { .. }, GameInput::Confirm) => {
            session.acknowledge();
            *menu = StartMenu::new(*session.config());
        }
        _ => {}
    }

    Flow::Continue
}
