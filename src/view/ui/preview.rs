//! Preview pane: title bar, metadata block and file contents

use crate::config::PreviewConfig;
use crate::primitives::path_utils;
use crate::services::fs::{FsBackend, FsEntryType};
use crate::view::file_tree::{SizeCell, TreeNode};
use crate::view::theme::Theme;
use chrono::{DateTime, Local};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
    Frame,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::SystemTime;

/// Format a byte count with SI units, e.g. `999 B`, `1.5 kB`, `2.0 MB`
pub fn format_size(size: u64) -> String {
    const UNIT: u64 = 1000;
    if size < UNIT {
        return format!("{} B", size);
    }

    const PREFIXES: [char; 6] = ['k', 'M', 'G', 'T', 'P', 'E'];
    let mut div = UNIT;
    let mut exp = 0;
    let mut n = size / UNIT;
    while n >= UNIT {
        div *= UNIT;
        exp += 1;
        n /= UNIT;
    }

    let mut value = size as f64 / div as f64;
    // 999.95 and up would print as "1000.0"
    if (value * 10.0).round() >= 10_000.0 && exp + 1 < PREFIXES.len() {
        value /= UNIT as f64;
        exp += 1;
    }
    format!("{:.1} {}B", value, PREFIXES[exp])
}

/// `ls`-style mode string, e.g. `drwxr-xr-x`
pub fn format_mode(entry_type: FsEntryType, mode: Option<u32>) -> String {
    let kind = match entry_type {
        FsEntryType::Directory => 'd',
        FsEntryType::Symlink => 'l',
        FsEntryType::File => '-',
        FsEntryType::Special => '?',
    };

    let mut out = String::with_capacity(10);
    out.push(kind);
    match mode {
        Some(mode) => {
            for shift in [6, 3, 0] {
                let bits = (mode >> shift) & 0o7;
                out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
                out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
                out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
            }
        }
        None => out.push_str("?????????"),
    }
    out
}

pub fn format_modified(modified: Option<SystemTime>) -> String {
    match modified {
        Some(time) => DateTime::<Local>::from(time)
            .format("%Y-%m-%d %H:%M:%S %z")
            .to_string(),
        None => String::new(),
    }
}

/// What the preview pane currently shows
#[derive(Debug, Default)]
pub struct PreviewPane {
    path: Option<PathBuf>,
    title_dir: String,
    title_base: String,
    mode: String,
    modified: String,
    size: Option<Arc<SizeCell>>,
    mime_type: String,
    content: String,
}

impl PreviewPane {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    /// Show `node`; file contents are read only when below the size limit
    pub fn update(&mut self, node: &TreeNode, backend: &dyn FsBackend, config: &PreviewConfig) {
        let (dir, base) = path_utils::display_parts(node.path());
        let metadata = node.entry.metadata.as_ref();

        self.path = Some(node.path().to_path_buf());
        self.title_dir = dir;
        self.title_base = base;
        self.mode = format_mode(node.entry.entry_type, metadata.and_then(|m| m.mode));
        self.modified = format_modified(metadata.and_then(|m| m.modified));
        self.size = Some(Arc::clone(&node.size));
        self.mime_type = node.mime_type.clone();
        self.content = Self::read_content(node, backend, config).unwrap_or_default();
    }

    fn read_content(node: &TreeNode, backend: &dyn FsBackend, config: &PreviewConfig) -> Option<String> {
        if !config.enabled || node.is_dir() || node.entry.is_special() {
            return None;
        }
        let size = node.size()?;
        if size >= config.max_bytes {
            return None;
        }

        match backend.read_head(node.path(), config.max_bytes as usize) {
            Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
            Err(e) => {
                tracing::debug!("Cannot preview {:?}: {}", node.path(), e);
                None
            }
        }
    }

    fn size_text(&self) -> String {
        match self.size.as_ref().and_then(|s| s.get()) {
            Some(size) => format_size(size),
            None => "…".to_string(),
        }
    }

    /// The four metadata rows
    pub fn info_lines(&self) -> Vec<(&'static str, String)> {
        vec![
            ("      Mode:", self.mode.clone()),
            ("  Modified:", self.modified.clone()),
            ("      Size:", self.size_text()),
            (" Mime Type:", self.mime_type.clone()),
        ]
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, theme: &Theme) {
        let [topbar_area, info_area, content_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(5),
            Constraint::Min(0),
        ])
        .areas(area);

        let title = Line::from(vec![
            Span::styled(self.title_dir.clone(), Style::default().fg(theme.directory_fg)),
            Span::raw(self.title_base.clone()),
        ]);
        let topbar = Paragraph::new(title).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.topbar_border))
                .padding(Padding::horizontal(1)),
        );
        frame.render_widget(topbar, topbar_area);

        let info: Vec<Line> = self
            .info_lines()
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!(" │{}", label), Style::default().fg(theme.muted_fg)),
                    Span::raw(format!(" {}", value)),
                ])
            })
            .collect();
        frame.render_widget(Paragraph::new(info), info_area);

        let content = Paragraph::new(self.content.as_str())
            .style(Style::default().bg(theme.content_bg))
            .block(Block::default().padding(Padding::horizontal(2)))
            .scroll((0, 0));
        frame.render_widget(content, content_area);
    }
}
