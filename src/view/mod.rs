//! View and UI layer
//!
//! The file tree model and navigator, plus the renderers that draw them.

pub mod file_tree;
pub mod theme;
pub mod ui;
