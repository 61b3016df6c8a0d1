//! Low-level primitives and utilities

pub mod display_width;
pub mod path_utils;
