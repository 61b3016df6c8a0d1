// Terminal file browser library - exposes the core modules for the binary and tests

pub mod app;
pub mod config;
pub mod input;
pub mod primitives;
pub mod services;
pub mod view;
