use crate::config::TreeIcons;
use crate::primitives::display_width::pad_to_width;
use crate::view::file_tree::{Navigator, NodeId};
use crate::view::theme::Theme;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Padding},
    Frame,
};

pub struct FileExplorerRenderer;

impl FileExplorerRenderer {
    /// Rows available for tree entries inside `area`
    pub fn viewport_height(area: Rect) -> usize {
        area.height as usize
    }

    /// Render the visible window of the tree in the given frame area
    pub fn render(nav: &Navigator, frame: &mut Frame, area: Rect, theme: &Theme, icons: &TreeIcons) {
        let block = Block::default()
            .borders(Borders::RIGHT)
            .border_style(Style::default().fg(theme.sidebar_lines))
            .padding(Padding::horizontal(2))
            .style(Style::default().bg(theme.sidebar_bg));
        let inner_width = block.inner(area).width as usize;

        let scroll_offset = nav.scroll_offset();
        let height = Self::viewport_height(area);
        let selected_index = nav.selected_index();

        let items: Vec<ListItem> = nav
            .visible_rows()
            .into_iter()
            .skip(scroll_offset)
            .take(height)
            .map(|(node_id, depth)| Self::render_node(nav, node_id, depth, inner_width, theme, icons))
            .collect();

        let list = List::new(items).block(block).highlight_style(
            Style::default()
                .bg(theme.selection_bg)
                .add_modifier(Modifier::BOLD),
        );

        let mut list_state = ListState::default();
        if let Some(selected) = selected_index {
            if selected >= scroll_offset {
                list_state.select(Some(selected - scroll_offset));
            }
        }

        frame.render_stateful_widget(list, area, &mut list_state);
    }

    /// Render a single tree node as a ListItem
    fn render_node(
        nav: &Navigator,
        node_id: NodeId,
        depth: usize,
        width: usize,
        theme: &Theme,
        icons: &TreeIcons,
    ) -> ListItem<'static> {
        let Some(node) = nav.tree().get_node(node_id) else {
            return ListItem::new(Line::default());
        };

        let mut spans = Vec::new();

        let guides = "│ ".repeat(depth);
        let mut used = guides.chars().count();
        if depth > 0 {
            spans.push(Span::styled(guides, Style::default().fg(theme.sidebar_lines)));
        }

        let name_style = if node.is_dir() {
            Style::default().fg(theme.directory_fg)
        } else {
            Style::default().fg(theme.file_fg)
        };

        let suffix = if node.is_error() { " [Error]" } else { "" };
        let label_width = width.saturating_sub(used + suffix.len());
        let label = pad_to_width(&node.label(icons), label_width);
        used += label_width;
        spans.push(Span::styled(label, name_style));

        if !suffix.is_empty() && used < width {
            spans.push(Span::styled(suffix, Style::default().fg(theme.error_fg)));
        }

        ListItem::new(Line::from(spans))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::LocalFsBackend;
    use crate::view::file_tree::{FileTree, SizeScheduler};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn buffer_lines(terminal: &Terminal<TestBackend>) -> Vec<String> {
        let buffer = terminal.backend().buffer();
        (0..buffer.area.height)
            .map(|y| {
                (0..buffer.area.width)
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect()
    }

    #[test]
    fn test_renders_visible_rows() {
        let temp_dir = TempDir::new().unwrap();
        let start = temp_dir.path().join("proj");
        std::fs::create_dir_all(start.join("src")).unwrap();
        std::fs::write(start.join("Cargo.toml"), "[package]").unwrap();

        let tree = FileTree::new(Arc::new(LocalFsBackend::new()), SizeScheduler::Disabled);
        let mut nav = Navigator::new(tree);
        nav.load(&start).unwrap();

        let mut terminal = Terminal::new(TestBackend::new(40, 6)).unwrap();
        terminal
            .draw(|frame| {
                FileExplorerRenderer::render(
                    &nav,
                    frame,
                    frame.area(),
                    &Theme::default(),
                    &TreeIcons::default(),
                )
            })
            .unwrap();

        let lines = buffer_lines(&terminal);
        assert!(lines[1].contains("▼ proj"), "{:?}", lines);
        assert!(lines[2].contains("│ │ ▶ src"), "{:?}", lines);
        assert!(lines[3].contains("Cargo.toml"), "{:?}", lines);
    }
}
