use std::error::Error as _;
use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use log::{LevelFilter, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use simplelog::WriteLogger;
use thiserror::Error;
use torus_snake::config::{ConfigError, GameConfig, GrowthTiming};
use torus_snake::game::{GameContext, GameLoop};
use torus_snake::input::KeyboardInput;
use torus_snake::renderer::TerminalRenderer;
use torus_snake::terminal_runtime::TerminalSession;

const LOG_DIR_NAME: &str = "torus-snake";
const LOG_FILE_NAME: &str = "torus-snake.log";

/// Snake on a board whose edges wrap around.
#[derive(Debug, Parser)]
#[command(version)]
struct Cli {
    /// JSON config file; defaults to `torus-snake/config.json` in the user config dir.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Board width in cells.
    #[arg(long)]
    width: Option<u16>,

    /// Board height in cells.
    #[arg(long)]
    height: Option<u16>,

    /// Terminal columns per cell.
    #[arg(long)]
    cell_size: Option<u16>,

    /// Simulation ticks per second.
    #[arg(long)]
    tick_rate: Option<u32>,

    /// When eating lengthens the snake.
    #[arg(long, value_enum)]
    growth: Option<GrowthTiming>,

    /// Seed for a reproducible game.
    #[arg(long)]
    seed: Option<u64>,

    /// Where to write the log.
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Log verbosity (off, error, warn, info, debug, trace).
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,
}

impl Cli {
    fn apply_overrides(&self, config: &mut GameConfig) {
        if let Some(width) = self.width {
            config.width = width;
        }
        if let Some(height) = self.height {
            config.height = height;
        }
        if let Some(cell_size) = self.cell_size {
            config.cell_size = cell_size;
        }
        if let Some(tick_rate) = self.tick_rate {
            config.tick_rate = tick_rate;
        }
        if let Some(growth) = self.growth {
            config.growth = growth;
        }
    }
}

#[derive(Debug, Error)]
enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("failed to open log file {}", path.display())]
    LogFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to install logger")]
    Logger(#[from] log::SetLoggerError),
    #[error("terminal I/O failed")]
    Io(#[from] io::Error),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            eprintln!("torus-snake: {error}");
            let mut source = error.source();
            while let Some(cause) = source {
                eprintln!("  caused by: {cause}");
                source = cause.source();
            }
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<(), AppError> {
    init_logging(cli)?;

    let config = resolve_config(cli)?;
    let ctx = GameContext::from_config(&config)?;

    let rng = match cli.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let mut session = TerminalSession::enter()?;
    let mut input = KeyboardInput;
    let mut renderer = TerminalRenderer::new(session.terminal_mut());
    GameLoop::new(&ctx, rng).run(&mut input, &mut renderer)?;

    Ok(())
}

/// Defaults, then the JSON file, then command-line flags.
fn resolve_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    let mut config = load_config(cli)?;
    cli.apply_overrides(&mut config);
    Ok(config)
}

fn load_config(cli: &Cli) -> Result<GameConfig, ConfigError> {
    if let Some(path) = &cli.config {
        return GameConfig::load(path, false);
    }

    match GameConfig::default_path() {
        Some(path) => {
            if !path.exists() {
                warn!("no config file at {}; using defaults", path.display());
            }
            GameConfig::load(&path, true)
        }
        None => {
            warn!("no config directory on this platform; using defaults");
            Ok(GameConfig::default())
        }
    }
}

fn init_logging(cli: &Cli) -> Result<(), AppError> {
    if cli.log_level == LevelFilter::Off {
        return Ok(());
    }

    let path = cli.log_file.clone().unwrap_or_else(default_log_path);
    let file = open_log_file(&path).map_err(|source| AppError::LogFile {
        path: path.clone(),
        source,
    })?;

    WriteLogger::init(cli.log_level, simplelog::Config::default(), file)?;
    Ok(())
}

fn open_log_file(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    File::create(path)
}

fn default_log_path() -> PathBuf {
    let mut base = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
    base.push(LOG_DIR_NAME);
    base.push(LOG_FILE_NAME);
    base
}
