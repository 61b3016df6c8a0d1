use super::size::SizeCell;
use crate::config::TreeIcons;
use crate::services::fs::FsEntry;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Unique identifier for a tree node
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node({})", self.0)
    }
}

/// Represents a node in the file tree
///
/// Nodes carry no parent link; the tree finds a parent by walking down from
/// the current root.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Unique identifier
    pub id: NodeId,
    /// Filesystem entry information
    pub entry: FsEntry,
    /// Child node IDs, in display order, while expanded
    pub children: Vec<NodeId>,
    /// Current state of the node
    pub state: NodeState,
    /// Byte size; pending for directories until the background walk lands
    pub size: Arc<SizeCell>,
    /// Sniffed content type, empty when unknown
    pub mime_type: String,
}

impl TreeNode {
    /// Create a new tree node with an already-resolved size cell
    pub fn new(id: NodeId, entry: FsEntry, size: Arc<SizeCell>, mime_type: String) -> Self {
        let state = if entry.is_dir() {
            NodeState::Collapsed
        } else {
            NodeState::Leaf
        };

        Self {
            id,
            entry,
            children: Vec::new(),
            state,
            size,
            mime_type,
        }
    }

    pub fn path(&self) -> &Path {
        &self.entry.path
    }

    pub fn name(&self) -> &str {
        &self.entry.name
    }

    /// Check if this node is a directory
    pub fn is_dir(&self) -> bool {
        self.entry.is_dir()
    }

    /// Check if this node is a file (anything that is not a directory)
    pub fn is_file(&self) -> bool {
        !self.entry.is_dir()
    }

    /// Check if this node is expanded
    pub fn is_expanded(&self) -> bool {
        self.state == NodeState::Expanded
    }

    /// Check if this node is collapsed
    pub fn is_collapsed(&self) -> bool {
        self.state == NodeState::Collapsed
    }

    /// Check if this node has an error
    pub fn is_error(&self) -> bool {
        matches!(self.state, NodeState::Error(_))
    }

    /// Check if this node is a leaf (file, not a directory)
    pub fn is_leaf(&self) -> bool {
        self.state == NodeState::Leaf
    }

    /// Size in bytes, `None` while a directory walk is pending
    pub fn size(&self) -> Option<u64> {
        self.size.get()
    }

    /// Display label: icon followed by the name
    pub fn label(&self, icons: &TreeIcons) -> String {
        format!("{} {}", icon_for(self.is_dir(), self.is_expanded(), icons), self.name())
    }
}

/// Icon for a row, depending only on kind and expansion
pub fn icon_for(is_dir: bool, expanded: bool, icons: &TreeIcons) -> &str {
    match (is_dir, expanded) {
        (true, true) => &icons.expanded,
        (true, false) => &icons.collapsed,
        (false, _) => &icons.file,
    }
}

/// Node identity is the path it names
impl PartialEq for TreeNode {
    fn eq(&self, other: &Self) -> bool {
        self.entry.path == other.entry.path
    }
}

impl Eq for TreeNode {}

/// State of a tree node
#[derive(Debug, Clone, PartialEq)]
pub enum NodeState {
    /// Directory not yet expanded
    Collapsed,
    /// Directory expanded, children loaded
    Expanded,
    /// Failed to read the directory (with error message)
    Error(String),
    /// File (leaf node, cannot be expanded)
    Leaf,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::FsEntryType;
    use std::path::PathBuf;

    fn dir_node(id: usize, path: &str) -> TreeNode {
        let path = PathBuf::from(path);
        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        TreeNode::new(
            NodeId(id),
            FsEntry::new(path, name, FsEntryType::Directory),
            Arc::new(SizeCell::pending()),
            String::new(),
        )
    }

    #[test]
    fn test_node_creation() {
        let entry = FsEntry::new(
            PathBuf::from("/test/file.txt"),
            "file.txt".to_string(),
            FsEntryType::File,
        );

        let node = TreeNode::new(
            NodeId(0),
            entry,
            Arc::new(SizeCell::ready(12)),
            "text/plain".to_string(),
        );

        assert_eq!(node.id, NodeId(0));
        assert!(node.is_file());
        assert!(node.is_leaf());
        assert_eq!(node.size(), Some(12));
        assert_eq!(node.children.len(), 0);
    }

    #[test]
    fn test_node_states() {
        let mut node = dir_node(0, "/test/dir");

        assert!(node.is_dir());
        assert!(node.is_collapsed());
        assert!(!node.is_error());
        assert_eq!(node.size(), None);

        node.state = NodeState::Expanded;
        assert!(node.is_expanded());

        node.state = NodeState::Error("Failed to read".to_string());
        assert!(node.is_error());
        assert!(!node.is_expanded());
    }

    #[test]
    fn test_equality_is_by_path() {
        let a = dir_node(1, "/x/y");
        let mut b = dir_node(7, "/x/y");
        b.state = NodeState::Expanded;
        assert_eq!(a, b);
        assert_ne!(a, dir_node(1, "/x/z"));
    }

    #[test]
    fn test_label_depends_on_state() {
        let icons = TreeIcons::default();
        let mut node = dir_node(0, "/test/dir");

        let collapsed = node.label(&icons);
        assert_eq!(collapsed, node.label(&icons));
        assert_eq!(collapsed, "▶ dir");

        node.state = NodeState::Expanded;
        assert_eq!(node.label(&icons), "▼ dir");
        assert_eq!(icon_for(false, true, &icons), icon_for(false, false, &icons));
    }
}
