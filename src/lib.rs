//! A snake game on a wrap-around board.
//!
//! The simulation ([`grid`], [`snake`], [`apple`], [`game`]) knows nothing
//! about terminals. It reads [`input::GameInput`]s from an
//! [`input::InputAdapter`] and paints through a [`renderer::Renderer`]; the
//! crossterm and ratatui implementations of both live alongside it.

pub mod apple;
pub mod config;
pub mod game;
pub mod grid;
pub mod input;
pub mod renderer;
pub mod snake;
pub mod terminal_runtime;
