//! Renderers for the two panes

pub mod file_explorer;
pub mod preview;

pub use file_explorer::FileExplorerRenderer;
pub use preview::PreviewPane;
