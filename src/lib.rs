//! termreel library crate.
//!
//! Plays a directory of image frames as text art by running an external
//! rasterizer once per frame, with live keyboard control of its options.

pub mod cli;
pub mod config;
pub mod error;
pub mod frames;
pub mod hud;
pub mod input;
pub mod player;
pub mod rasterizer;
pub mod render_config;
pub mod scheduler;
pub mod shutdown;
pub mod terminal;
