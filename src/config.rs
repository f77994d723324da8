use std::io;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const APP_DIR_NAME: &str = "torus-snake";
const CONFIG_FILE_NAME: &str = "config.json";

/// Default board width in cells.
pub const DEFAULT_GRID_WIDTH: u16 = 32;

/// Default board height in cells.
pub const DEFAULT_GRID_HEIGHT: u16 = 24;

/// Default cell size in terminal columns.
pub const DEFAULT_CELL_SIZE: u16 = 2;

/// Default simulation rate in ticks per second.
pub const DEFAULT_TICK_RATE: u32 = 20;

/// A plain 24-bit color, serialized as `[r, g, b]`.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub const BLACK: Self = Self(0, 0, 0);
    pub const GREEN: Self = Self(0, 255, 0);
    pub const RED: Self = Self(255, 0, 0);
    pub const CYAN: Self = Self(93, 216, 228);
}

/// Colors handed to the renderer for every drawn entity.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Palette {
    pub snake: Rgb,
    pub apple: Rgb,
    pub background: Rgb,
    pub border: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            snake: Rgb::GREEN,
            apple: Rgb::RED,
            background: Rgb::BLACK,
            border: Rgb::CYAN,
        }
    }
}

/// When eating an apple lengthens the snake.
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum GrowthTiming {
    /// The move that reaches the apple keeps its tail.
    #[default]
    Immediate,
    /// The apple is detected after the move and the following move keeps its tail.
    Deferred,
}

/// User-facing game configuration, before validation.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct GameConfig {
    pub width: u16,
    pub height: u16,
    pub cell_size: u16,
    /// Simulation ticks per second.
    pub tick_rate: u32,
    pub growth: GrowthTiming,
    pub palette: Palette,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            cell_size: DEFAULT_CELL_SIZE,
            tick_rate: DEFAULT_TICK_RATE,
            growth: GrowthTiming::Immediate,
            palette: Palette::default(),
        }
    }
}

impl GameConfig {
    /// Returns the platform-correct default config file path, if one exists
    /// for this platform.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Reads a configuration file. Keys missing from the file keep their
    /// default values.
    ///
    /// When `allow_missing` is true a nonexistent file yields the defaults.
    pub fn load(path: &Path, allow_missing: bool) -> Result<Self, ConfigError> {
        let raw = match std::fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound && allow_missing => {
                return Ok(Self::default());
            }
            Err(source) => {
                return Err(ConfigError::Read {
                    path: path.to_path_buf(),
                    source,
                });
            }
        };

        serde_json::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Checks the values that the simulation depends on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::EmptyGrid {
                width: self.width,
                height: self.height,
            });
        }
        if self.cell_size == 0 {
            return Err(ConfigError::ZeroCellSize);
        }
        if self.tick_rate == 0 {
            return Err(ConfigError::ZeroTickRate);
        }
        Ok(())
    }

    /// Wall-clock time between two ticks.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_secs(1) / self.tick_rate.max(1)
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("board must be at least 1x1 cells, got {width}x{height}")]
    EmptyGrid { width: u16, height: u16 },
    #[error("cell size must be positive")]
    ZeroCellSize,
    #[error("tick rate must be positive")]
    ZeroTickRate,
    #[error("failed to read config file {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse config file {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
