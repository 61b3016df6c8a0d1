//! Services that talk to the world outside the tree: the filesystem, the
//! terminal, log files and external programs

pub mod fs;
pub mod launcher;
pub mod log_dirs;
pub mod terminal_modes;
pub mod tracing_setup;
