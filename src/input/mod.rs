//! Input pipeline
//!
//! Translates key events into navigator commands.

pub mod keybindings;
