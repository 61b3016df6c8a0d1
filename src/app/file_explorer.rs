use super::App;
use std::path::{Path, PathBuf};

/// What the navigator reported, by path
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExplorerEvent {
    Changed(PathBuf),
    Select(PathBuf),
    Open(PathBuf),
}

/// External program the event loop should start
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launch {
    /// Run the editor in the foreground on this file
    Edit(PathBuf),
    /// Hand this path to the platform opener
    Open(PathBuf),
}

impl App {
    /// Apply queued navigator notifications. Returns true if any arrived.
    pub(super) fn drain_explorer_events(&mut self) -> bool {
        let mut any = false;
        while let Ok(event) = self.explorer_rx.try_recv() {
            any = true;
            match event {
                ExplorerEvent::Changed(path) => self.show_in_preview(&path),
                ExplorerEvent::Select(path) => self.launches.push_back(Launch::Edit(path)),
                ExplorerEvent::Open(path) => self.launches.push_back(Launch::Open(path)),
            }
        }
        any
    }

    fn show_in_preview(&mut self, path: &Path) {
        let tree = self.navigator.tree();
        // The node may be gone if a later command pruned it
        let Some(node) = tree.get_node_by_path(path) else {
            tracing::debug!("Focused node {:?} no longer in tree", path);
            return;
        };
        self.preview
            .update(node, tree.backend().as_ref(), &self.config.preview);
    }
}
