//! Navigation state machine over a [`FileTree`].
//!
//! The navigator owns the tree, the current root and the focus. It turns
//! [`Command`]s into tree operations and reports focus changes, selections and
//! open requests through single-subscriber callbacks.

use super::node::{NodeId, TreeNode};
use super::tree::FileTree;
use super::view::FocusState;
use std::io;
use std::path::Path;

/// Notification callback; the last registration wins
pub type NodeCallback = Box<dyn FnMut(&TreeNode)>;

/// A user gesture, already decoded from the input device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// Toggle a directory, or activate a file
    Select,
    /// Hand the focused entry to the system opener
    Open,
    /// Collapse, move to the parent, or widen the root
    DrillOut,
    /// Expand, or narrow the root to an expanded directory
    DrillIn,
    /// Narrow the root to the focused directory
    ZoomIn,
    /// Widen the root to its parent directory
    ZoomOut,
    Up,
    Down,
    PageUp,
    PageDown,
    First,
    Last,
}

/// Work queued until after the next redraw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deferred {
    Changed,
}

pub struct Navigator {
    tree: FileTree,
    root: Option<NodeId>,
    focus: FocusState,
    on_changed: Option<NodeCallback>,
    on_select: Option<NodeCallback>,
    on_open: Option<NodeCallback>,
    after_draw: Vec<Deferred>,
}

impl std::fmt::Debug for Navigator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Navigator")
            .field("tree", &self.tree)
            .field("root", &self.root)
            .field("focus", &self.focus)
            .field("after_draw", &self.after_draw)
            .finish()
    }
}

impl Navigator {
    pub fn new(tree: FileTree) -> Self {
        Self {
            tree,
            root: None,
            focus: FocusState::new(),
            on_changed: None,
            on_select: None,
            on_open: None,
            after_draw: Vec::new(),
        }
    }

    /// Show `start` expanded inside its parent directory, with focus on it
    ///
    /// If the parent cannot be read, `start` itself becomes the root.
    pub fn load(&mut self, start: &Path) -> io::Result<()> {
        let start_id = self.tree.create_root(start)?;
        if let Err(e) = self.tree.expand(start_id) {
            tracing::warn!("Cannot list {:?}: {}", start, e);
        }

        let root = match self.tree.create_parent(start_id) {
            Ok(parent) => parent,
            Err(e) => {
                tracing::warn!("Cannot list parent of {:?}: {}", start, e);
                start_id
            }
        };

        self.root = Some(root);
        self.tree.prune(root);
        tracing::info!(
            "Loaded {:?} with root {:?}",
            start,
            self.tree.get_node(root).map(|n| n.entry.path.clone())
        );

        self.set_current(start_id);
        Ok(())
    }

    pub fn on_changed(&mut self, callback: impl FnMut(&TreeNode) + 'static) {
        self.on_changed = Some(Box::new(callback));
    }

    pub fn on_select(&mut self, callback: impl FnMut(&TreeNode) + 'static) {
        self.on_select = Some(Box::new(callback));
    }

    pub fn on_open(&mut self, callback: impl FnMut(&TreeNode) + 'static) {
        self.on_open = Some(Box::new(callback));
    }

    pub fn tree(&self) -> &FileTree {
        &self.tree
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn root_node(&self) -> Option<&TreeNode> {
        self.root.and_then(|id| self.tree.get_node(id))
    }

    pub fn focus(&self) -> Option<NodeId> {
        self.focus.get_selected()
    }

    pub fn focused_node(&self) -> Option<&TreeNode> {
        self.focus().and_then(|id| self.tree.get_node(id))
    }

    /// Visible rows under the root, with their depth
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        match self.root {
            Some(root) => self.tree.visible_nodes(root),
            None => Vec::new(),
        }
    }

    fn visible_ids(&self) -> Vec<NodeId> {
        self.visible_rows().into_iter().map(|(id, _)| id).collect()
    }

    pub fn selected_index(&self) -> Option<usize> {
        self.focus.selected_index(&self.visible_ids())
    }

    pub fn scroll_offset(&self) -> usize {
        self.focus.get_scroll_offset()
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        if self.focus.viewport_height() != height {
            self.focus.set_viewport_height(height);
            let visible = self.visible_ids();
            self.focus.update_scroll_for_selection(&visible);
        }
    }

    /// Whether deferred notifications are waiting for a redraw
    pub fn has_pending_after_draw(&self) -> bool {
        !self.after_draw.is_empty()
    }

    /// Run work deferred until after a redraw
    pub fn run_after_draw(&mut self) {
        for deferred in std::mem::take(&mut self.after_draw) {
            match deferred {
                Deferred::Changed => self.emit_changed(),
            }
        }
    }

    pub fn execute(&mut self, command: Command) {
        match command {
            Command::Select => self.select(),
            Command::Open => self.open(),
            Command::DrillOut => self.drill_out(),
            Command::DrillIn => self.drill_in(),
            Command::ZoomIn => {
                if let Some(id) = self.focus() {
                    if self.tree.get_node(id).is_some_and(|n| n.is_dir()) {
                        self.zoom_in(id);
                    }
                }
            }
            Command::ZoomOut => self.zoom_out(),
            Command::Up => self.move_focus(FocusState::select_prev),
            Command::Down => self.move_focus(FocusState::select_next),
            Command::PageUp => self.move_focus(FocusState::select_page_up),
            Command::PageDown => self.move_focus(FocusState::select_page_down),
            Command::First => self.move_focus(FocusState::select_first),
            Command::Last => self.move_focus(FocusState::select_last),
        }
    }

    /// Toggle the focused directory, or report the focused file as selected
    pub fn select(&mut self) {
        let Some(node) = self.focused_node() else {
            return;
        };
        let (id, is_dir, expanded) = (node.id, node.is_dir(), node.is_expanded());

        if expanded {
            self.tree.collapse(id);
        } else if is_dir {
            self.expand(id);
        } else {
            self.emit(Event::Select);
        }
        self.refresh_scroll();
    }

    /// Report the focused entry as to be opened externally
    pub fn open(&mut self) {
        self.emit(Event::Open);
    }

    pub fn drill_out(&mut self) {
        let (Some(root), Some(focus)) = (self.root, self.focus()) else {
            return;
        };

        if focus == root {
            self.zoom_out();
        } else if self.tree.get_node(focus).is_some_and(|n| n.is_expanded()) {
            self.tree.collapse(focus);
            self.refresh_scroll();
        } else if let Some(parent) = self.tree.find_parent(root, focus) {
            self.set_current(parent);
        }
    }

    pub fn drill_in(&mut self) {
        let Some(node) = self.focused_node() else {
            return;
        };
        if !node.is_dir() {
            return;
        }

        let id = node.id;
        if node.is_expanded() {
            self.zoom_in(id);
        } else {
            self.expand(id);
            self.refresh_scroll();
        }
    }

    /// Make `id` the root. It must be a directory inside the current root.
    ///
    /// Nodes outside the new root are dropped; if that takes the focus with
    /// them, focus moves to the new root. The change notification is sent
    /// after the next redraw.
    pub fn zoom_in(&mut self, id: NodeId) {
        let Some(root) = self.root else {
            return;
        };
        if !self.tree.contains(root, id) || !self.tree.get_node(id).is_some_and(|n| n.is_dir()) {
            return;
        }

        if !self.tree.get_node(id).is_some_and(|n| n.is_expanded()) {
            self.expand(id);
        }

        self.root = Some(id);
        self.tree.prune(id);

        let focus_alive = self
            .focus()
            .is_some_and(|f| self.tree.get_node(f).is_some());
        if !focus_alive {
            self.focus.set_selected(Some(id));
        }

        self.after_draw.push(Deferred::Changed);
        self.refresh_scroll();
    }

    /// Make the parent directory of the root the new root.
    ///
    /// If the old root no longer exists on disk it is dropped, and focus
    /// moves to the new root.
    pub fn zoom_out(&mut self) {
        let Some(root) = self.root else {
            return;
        };

        match self.tree.create_parent(root) {
            Ok(parent) if parent != root => {
                self.root = Some(parent);
                self.tree.prune(parent);

                let focus_alive = self
                    .focus()
                    .is_some_and(|f| self.tree.get_node(f).is_some());
                if !focus_alive {
                    self.focus.set_selected(Some(parent));
                }
                self.refresh_scroll();
                if !focus_alive {
                    self.emit_changed();
                }
            }
            Ok(_) => {}
            Err(e) => {
                tracing::warn!("Cannot zoom out: {}", e);
            }
        }
    }

    /// Focus `id` if it is visible under the root
    pub fn set_current(&mut self, id: NodeId) {
        let Some(root) = self.root else {
            return;
        };
        if !self.tree.contains(root, id) || self.focus() == Some(id) {
            return;
        }

        self.focus.set_selected(Some(id));
        self.refresh_scroll();
        self.emit_changed();
    }

    fn move_focus(&mut self, step: fn(&mut FocusState, &[NodeId])) {
        let before = self.focus();
        let visible = self.visible_ids();
        step(&mut self.focus, &visible);
        self.focus.update_scroll_for_selection(&visible);

        if self.focus() != before {
            self.emit_changed();
        }
    }

    fn expand(&mut self, id: NodeId) {
        if let Err(e) = self.tree.expand(id) {
            tracing::debug!("Expand of {} failed: {}", id, e);
        }
    }

    fn refresh_scroll(&mut self) {
        let visible = self.visible_ids();
        self.focus.update_scroll_for_selection(&visible);
    }

    fn emit_changed(&mut self) {
        self.emit(Event::Changed);
    }

    fn emit(&mut self, event: Event) {
        let Some(node) = self.focus.get_selected().and_then(|id| self.tree.get_node(id)) else {
            return;
        };
        let callback = match event {
            Event::Changed => self.on_changed.as_mut(),
            Event::Select => self.on_select.as_mut(),
            Event::Open => self.on_open.as_mut(),
        };
        if let Some(callback) = callback {
            callback(node);
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Event {
    Changed,
    Select,
    Open,
}
