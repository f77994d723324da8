use std::io;
use std::thread;
use std::time::{Duration, Instant};

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::apple::{Apple, Placement};
use crate::config::{ConfigError, GameConfig, GrowthTiming, Palette};
use crate::grid::GridWorld;
use crate::input::{GameInput, InputAdapter};
use crate::renderer::{Drawable, Renderer};
use crate::snake::Snake;

/// Validated, read-only settings shared by everything in one run.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct GameContext {
    pub grid: GridWorld,
    pub palette: Palette,
    pub growth: GrowthTiming,
    pub tick_interval: Duration,
}

impl GameContext {
    /// Validates `config` and freezes it into a context.
    pub fn from_config(config: &GameConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let grid = GridWorld::new(config.width, config.height, config.cell_size)?;

        Ok(Self {
            grid,
            palette: config.palette,
            growth: config.growth,
            tick_interval: config.tick_interval(),
        })
    }
}

/// Current high-level gameplay state.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum GameStatus {
    Playing,
    /// The snake covers every cell; the state no longer changes.
    BoardFull,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum TickOutcome {
    Moved,
    Ate,
    /// The head ran into the body; `length` is the length it reached.
    SelfCollision { length: usize },
    /// This tick filled the last free cell.
    BoardFull,
    /// Nothing happened because the board is already full.
    Frozen,
}

/// Complete mutable game state for one session.
#[derive(Debug, Clone)]
pub struct GameState<R = StdRng> {
    pub snake: Snake,
    /// `None` only once the board is full.
    pub apple: Option<Apple>,
    pub tick_count: u64,
    pub status: GameStatus,
    ctx: GameContext,
    rng: R,
}

impl GameState<StdRng> {
    /// Creates a deterministic state for tests and reproducible runs.
    #[must_use]
    pub fn new_with_seed(ctx: &GameContext, seed: u64) -> Self {
        Self::new(ctx, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> GameState<R> {
    /// Spawns the snake on the center cell and the first apple next to it.
    pub fn new(ctx: &GameContext, mut rng: R) -> Self {
        let snake = Snake::spawn(ctx.grid, &mut rng);
        let apple = Apple::spawn(&mut rng, ctx.grid, &snake.occupied(), ctx.palette.apple);
        let status = if apple.is_some() {
            GameStatus::Playing
        } else {
            GameStatus::BoardFull
        };

        Self {
            snake,
            apple,
            tick_count: 0,
            status,
            ctx: *ctx,
            rng,
        }
    }

    /// Queues one external input. Quit is the loop's business, not the state's.
    pub fn apply_input(&mut self, input: GameInput) {
        if let GameInput::Direction(direction) = input {
            self.snake.update_direction(direction);
        }
    }

    /// Advances simulation by one gameplay tick.
    pub fn tick(&mut self) -> TickOutcome {
        if self.status == GameStatus::BoardFull {
            return TickOutcome::Frozen;
        }
        self.tick_count += 1;

        let grid = self.ctx.grid;
        let apple_at = self.apple.map(|apple| apple.position);

        let ate = match self.ctx.growth {
            GrowthTiming::Immediate => {
                let eats = apple_at == Some(self.snake.next_head(grid));
                if eats {
                    self.snake.grow();
                }
                self.snake.move_forward(grid);
                eats
            }
            GrowthTiming::Deferred => {
                self.snake.move_forward(grid);
                let eats = apple_at == Some(self.snake.head());
                if eats {
                    self.snake.grow();
                }
                eats
            }
        };

        if ate {
            debug!(
                "apple eaten at {:?}, length {}",
                self.snake.head(),
                self.snake.len()
            );
            if self.replace_apple() == Placement::BoardFull {
                info!("board full at length {}", self.snake.len());
                self.status = GameStatus::BoardFull;
                return TickOutcome::BoardFull;
            }
            return TickOutcome::Ate;
        }

        if self.snake.head_overlaps_body() {
            let length = self.snake.len();
            info!("self collision at {:?}, length {length}", self.snake.head());
            self.snake.reset(grid, &mut self.rng);
            if apple_at.is_some_and(|position| self.snake.occupies(position)) {
                self.replace_apple();
            }
            return TickOutcome::SelfCollision { length };
        }

        TickOutcome::Moved
    }

    fn replace_apple(&mut self) -> Placement {
        let occupied = self.snake.occupied();
        let grid = self.ctx.grid;
        let placement = self
            .apple
            .as_mut()
            .map_or(Placement::BoardFull, |apple| {
                apple.respawn(&mut self.rng, grid, &occupied)
            });
        if placement == Placement::BoardFull {
            self.apple = None;
        }
        placement
    }
}

impl<R> GameState<R> {
    /// Returns the settings this state was created with.
    #[must_use]
    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// Things to draw, in paint order.
    #[must_use]
    pub fn drawables(&self) -> Vec<Drawable<'_>> {
        let mut drawables = vec![Drawable::SnakeBody(&self.snake)];
        if let Some(apple) = &self.apple {
            drawables.push(Drawable::Apple(apple));
        }
        drawables
    }

    /// Emits one full frame: clear, snake (head last), apple.
    pub fn render<D: Renderer + ?Sized>(&self, renderer: &mut D) -> io::Result<()> {
        let palette = &self.ctx.palette;
        renderer.clear(palette.background);
        for drawable in self.drawables() {
            drawable.emit(palette, self.ctx.grid.cell_size(), &mut *renderer);
        }
        renderer.present()
    }
}

/// Totals gathered over one [`GameLoop::run`].
#[derive(Debug, Clone, Copy, Default, Eq, PartialEq)]
pub struct RunSummary {
    pub ticks: u64,
    pub apples_eaten: u64,
    pub resets: u64,
    pub longest: usize,
    pub board_full: bool,
}

impl RunSummary {
    fn record(&mut self, outcome: TickOutcome, length: usize) {
        match outcome {
            TickOutcome::Frozen => return,
            TickOutcome::Ate => self.apples_eaten += 1,
            TickOutcome::BoardFull => {
                self.apples_eaten += 1;
                self.board_full = true;
            }
            TickOutcome::SelfCollision { length } => {
                self.resets += 1;
                self.longest = self.longest.max(length);
            }
            TickOutcome::Moved => {}
        }
        self.ticks += 1;
        self.longest = self.longest.max(length);
    }
}

/// Sleeps until fixed tick boundaries.
///
/// A late tick moves the schedule forward instead of firing a burst of
/// catch-up ticks.
#[derive(Debug, Clone, Copy)]
pub struct Pacer {
    interval: Duration,
    next_tick: Instant,
}

impl Pacer {
    #[must_use]
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            next_tick: Instant::now() + interval,
        }
    }

    /// Blocks until the next boundary and schedules the one after it.
    pub fn wait(&mut self) {
        let now = Instant::now();
        if let Some(remaining) = self.next_tick.checked_duration_since(now) {
            thread::sleep(remaining);
            self.next_tick += self.interval;
        } else {
            self.next_tick = now + self.interval;
        }
    }
}

/// Fixed-rate driver: input, update, render, wait.
#[derive(Debug)]
pub struct GameLoop<R = StdRng> {
    state: GameState<R>,
}

impl<R: Rng> GameLoop<R> {
    pub fn new(ctx: &GameContext, rng: R) -> Self {
        Self::with_state(GameState::new(ctx, rng))
    }

    /// Drives an already prepared state.
    pub fn with_state(state: GameState<R>) -> Self {
        Self { state }
    }

    #[must_use]
    pub fn state(&self) -> &GameState<R> {
        &self.state
    }

    /// Runs ticks until the input adapter reports Quit.
    ///
    /// A full board freezes the simulation but keeps rendering, so the
    /// final position stays visible until the player quits.
    pub fn run<I, D>(&mut self, input: &mut I, renderer: &mut D) -> io::Result<RunSummary>
    where
        I: InputAdapter + ?Sized,
        D: Renderer + ?Sized,
    {
        let ctx = *self.state.context();
        info!(
            "starting on a {}x{} board, one tick every {:?}",
            ctx.grid.width(),
            ctx.grid.height(),
            ctx.tick_interval
        );

        let mut summary = RunSummary::default();
        let mut pacer = Pacer::new(ctx.tick_interval);

        self.state.render(renderer)?;
        loop {
            let inputs = input.poll()?;
            if inputs.contains(&GameInput::Quit) {
                break;
            }
            for game_input in inputs {
                self.state.apply_input(game_input);
            }

            let outcome = self.state.tick();
            summary.record(outcome, self.state.snake.len());

            self.state.render(renderer)?;
            pacer.wait();
        }

        info!(
            "stopped after {} ticks: {} apples, {} resets, longest {}",
            summary.ticks, summary.apples_eaten, summary.resets, summary.longest
        );
        Ok(summary)
    }
}
