//! Text Tree Builder: turns `tree`-style diagrams into real directories and
//! empty files.
//!
//! `core` holds the parser and the materializer, `app` runs builds on a
//! background task and formats their events, `config` persists settings.

pub mod app;
pub mod config;
pub mod core;
pub mod utils;
