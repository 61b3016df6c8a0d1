use super::node::NodeId;

/// Selection and scroll state over a flat list of visible rows
///
/// Every method takes the current visible rows, so the state never has to be
/// kept in sync with structural changes to the tree.
#[derive(Debug)]
pub struct FocusState {
    /// Currently selected node
    selected_node: Option<NodeId>,
    /// Scroll offset (index into visible nodes)
    scroll_offset: usize,
    /// Last known viewport height (for scrolling calculations)
    viewport_height: usize,
}

impl Default for FocusState {
    fn default() -> Self {
        Self::new()
    }
}

impl FocusState {
    pub fn new() -> Self {
        Self {
            selected_node: None,
            scroll_offset: 0,
            viewport_height: 10, // Default, will be updated during rendering
        }
    }

    /// Set the viewport height (should be called during rendering)
    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height;
    }

    pub fn viewport_height(&self) -> usize {
        self.viewport_height
    }

    /// Get the currently selected node ID
    pub fn get_selected(&self) -> Option<NodeId> {
        self.selected_node
    }

    /// Set the selected node
    pub fn set_selected(&mut self, node_id: Option<NodeId>) {
        self.selected_node = node_id;
    }

    /// Index of the selection within `visible`
    pub fn selected_index(&self, visible: &[NodeId]) -> Option<usize> {
        let selected = self.selected_node?;
        visible.iter().position(|&id| id == selected)
    }

    /// Move the selection by `delta` rows, clamped to the list
    fn step(&mut self, visible: &[NodeId], delta: isize) {
        if visible.is_empty() {
            return;
        }

        match self.selected_index(visible) {
            Some(pos) => {
                let new_pos = pos
                    .saturating_add_signed(delta)
                    .min(visible.len() - 1);
                self.selected_node = Some(visible[new_pos]);
            }
            None => self.selected_node = Some(visible[0]),
        }
    }

    /// Select the next visible node
    pub fn select_next(&mut self, visible: &[NodeId]) {
        self.step(visible, 1);
    }

    /// Select the previous visible node
    pub fn select_prev(&mut self, visible: &[NodeId]) {
        self.step(visible, -1);
    }

    /// Move selection up by a page (viewport height)
    pub fn select_page_up(&mut self, visible: &[NodeId]) {
        if self.viewport_height == 0 {
            return;
        }
        self.step(visible, -(self.viewport_height as isize));
    }

    /// Move selection down by a page (viewport height)
    pub fn select_page_down(&mut self, visible: &[NodeId]) {
        if self.viewport_height == 0 {
            return;
        }
        self.step(visible, self.viewport_height as isize);
    }

    /// Select the first visible node
    pub fn select_first(&mut self, visible: &[NodeId]) {
        if let Some(&first) = visible.first() {
            self.selected_node = Some(first);
        }
    }

    /// Select the last visible node
    pub fn select_last(&mut self, visible: &[NodeId]) {
        if let Some(&last) = visible.last() {
            self.selected_node = Some(last);
        }
    }

    /// Get the scroll offset
    pub fn get_scroll_offset(&self) -> usize {
        self.scroll_offset
    }

    /// Update scroll offset so the selection stays inside the viewport
    ///
    /// The view only scrolls once the cursor moves past an edge, so moving
    /// down walks the cursor to the bottom before scrolling, and vice versa.
    pub fn update_scroll_for_selection(&mut self, visible: &[NodeId]) {
        if self.viewport_height == 0 {
            return;
        }

        // Don't leave blank rows at the bottom after the list shrinks
        let max_offset = visible.len().saturating_sub(self.viewport_height);
        self.scroll_offset = self.scroll_offset.min(max_offset);

        if let Some(pos) = self.selected_index(visible) {
            if pos < self.scroll_offset {
                self.scroll_offset = pos;
            } else if pos >= self.scroll_offset + self.viewport_height {
                self.scroll_offset = pos - self.viewport_height + 1;
            }
        }
    }
}
