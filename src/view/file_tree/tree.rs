use super::mime::{self, SNIFF_LEN};
use super::node::{NodeId, NodeState, TreeNode};
use super::size::{SizeCell, SizeScheduler};
use super::sort;
use crate::services::fs::{FsBackend, FsEntry};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// File tree with lazy loading support
///
/// Nodes live in an arena keyed by [`NodeId`]. A directory is only read when
/// it is expanded, and the tree has no fixed root: callers keep track of which
/// node they display from and call [`FileTree::prune`] when they narrow it.
pub struct FileTree {
    /// All nodes indexed by ID
    nodes: HashMap<NodeId, TreeNode>,
    /// Path to node ID mapping; paths are unique among live nodes
    path_to_node: HashMap<PathBuf, NodeId>,
    /// Next node ID to assign
    next_id: usize,
    backend: Arc<dyn FsBackend>,
    sizes: SizeScheduler,
    show_hidden: bool,
}

impl fmt::Debug for FileTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileTree")
            .field("nodes", &self.nodes.len())
            .field("backend", &"<dyn FsBackend>")
            .field("sizes", &self.sizes)
            .field("show_hidden", &self.show_hidden)
            .finish()
    }
}

impl FileTree {
    /// Create an empty tree
    pub fn new(backend: Arc<dyn FsBackend>, sizes: SizeScheduler) -> Self {
        Self {
            nodes: HashMap::new(),
            path_to_node: HashMap::new(),
            next_id: 0,
            backend,
            sizes,
            show_hidden: true,
        }
    }

    /// Whether dot-entries are listed
    pub fn with_show_hidden(mut self, show_hidden: bool) -> Self {
        self.show_hidden = show_hidden;
        self
    }

    pub fn backend(&self) -> &Arc<dyn FsBackend> {
        &self.backend
    }

    /// Get a node by ID
    pub fn get_node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    /// Get a mutable reference to a node by ID
    fn get_node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    /// Get a node by path
    pub fn get_node_by_path(&self, path: &Path) -> Option<&TreeNode> {
        self.path_to_node
            .get(path)
            .and_then(|id| self.get_node(*id))
    }

    /// Get number of nodes currently in memory
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached node for a directory, typically the first root
    ///
    /// The path is canonicalized first.
    ///
    /// # Errors
    ///
    /// Returns an error if the path doesn't exist or isn't a directory.
    pub fn create_root(&mut self, path: &Path) -> io::Result<NodeId> {
        let path = self.backend.canonicalize(path)?;
        if let Some(&id) = self.path_to_node.get(&path) {
            return Ok(id);
        }

        let entry = self.backend.get_entry(&path)?;
        if !entry.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("Path is not a directory: {:?}", path),
            ));
        }

        Ok(self.add_node(entry))
    }

    /// Expand a directory node, always re-reading it from disk
    ///
    /// # Errors
    ///
    /// Returns an error if the node is not a directory or cannot be read. An
    /// unreadable directory is left in [`NodeState::Error`] with no children.
    pub fn expand(&mut self, id: NodeId) -> io::Result<()> {
        self.load(id, None)
    }

    /// Collapse a directory node, dropping all its descendants
    pub fn collapse(&mut self, id: NodeId) {
        let children = match self.get_node(id) {
            Some(node) if node.is_dir() => node.children.clone(),
            _ => return,
        };

        for child_id in children {
            self.remove_node_recursive(child_id);
        }

        if let Some(node) = self.get_node_mut(id) {
            node.children.clear();
            node.state = NodeState::Collapsed;
        }
    }

    /// (Re)load the children of a directory node
    ///
    /// If `preserve` names a node whose path appears in the listing, that node
    /// is attached as-is, keeping its own children, state and size. Every other
    /// entry gets a fresh node. Previous children other than `preserve` are
    /// dropped.
    pub fn load(&mut self, id: NodeId, preserve: Option<NodeId>) -> io::Result<()> {
        let node = self
            .get_node(id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Node not found"))?;

        if !node.is_dir() {
            return Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "Cannot expand a file node",
            ));
        }

        let path = node.entry.path.clone();
        let old_children = node.children.clone();
        let preserve_path = preserve
            .and_then(|p| self.get_node(p))
            .map(|n| n.entry.path.clone());

        for child_id in old_children {
            if Some(child_id) != preserve {
                self.remove_node_recursive(child_id);
            }
        }

        let mut entries = match self.backend.read_dir(&path) {
            Ok(entries) => entries,
            Err(e) => {
                tracing::warn!("Failed to read directory {:?}: {}", path, e);
                if let Some(node) = self.get_node_mut(id) {
                    node.children.clear();
                    node.state = NodeState::Error(e.to_string());
                }
                return Err(e);
            }
        };

        if !self.show_hidden {
            entries.retain(|e| !e.is_hidden() || Some(&e.path) == preserve_path.as_ref());
        }
        sort::sort_entries(&mut entries);

        let mut child_ids = Vec::with_capacity(entries.len());
        let mut reused = false;
        for entry in entries {
            match preserve {
                Some(keep) if Some(&entry.path) == preserve_path.as_ref() => {
                    child_ids.push(keep);
                    reused = true;
                }
                _ => child_ids.push(self.add_node(entry)),
            }
        }

        if preserve.is_some() && !reused {
            tracing::debug!("{:?} no longer lists {:?}", path, preserve_path);
        }
        tracing::debug!("Loaded {} entries from {:?}", child_ids.len(), path);

        if let Some(node) = self.get_node_mut(id) {
            node.children = child_ids;
            node.state = NodeState::Expanded;
        }

        Ok(())
    }

    /// Build (or find) the node for the parent directory of `id`, loaded with
    /// `id` itself as one of its children.
    ///
    /// Returns `id` unchanged when it has no parent directory.
    ///
    /// # Errors
    ///
    /// Returns an error if the parent directory cannot be read; any node built
    /// for it is discarded and `id` is left untouched.
    pub fn create_parent(&mut self, id: NodeId) -> io::Result<NodeId> {
        let node = self
            .get_node(id)
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Node not found"))?;

        let Some(dir) = node.entry.path.parent().map(Path::to_path_buf) else {
            return Ok(id);
        };
        tracing::debug!("Create parent for: {:?} => {:?}", node.entry.path, dir);

        let (parent_id, created) = match self.path_to_node.get(&dir) {
            Some(&existing) => (existing, false),
            None => {
                let entry = self.backend.get_entry(&dir)?;
                (self.add_node(entry), true)
            }
        };

        if let Err(e) = self.load(parent_id, Some(id)) {
            if created {
                self.remove_node_recursive(parent_id);
            }
            return Err(e);
        }

        Ok(parent_id)
    }

    /// Drop every node that is not reachable from `root`
    pub fn prune(&mut self, root: NodeId) {
        let mut reachable = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if reachable.insert(id) {
                if let Some(node) = self.get_node(id) {
                    stack.extend(node.children.iter().copied());
                }
            }
        }

        let before = self.nodes.len();
        self.nodes.retain(|id, _| reachable.contains(id));
        self.path_to_node.retain(|_, id| reachable.contains(id));

        let dropped = before - self.nodes.len();
        if dropped > 0 {
            tracing::debug!("Pruned {} nodes outside {}", dropped, root);
        }
    }

    /// Get all visible nodes under `root` in tree order, with their depth
    pub fn visible_nodes(&self, root: NodeId) -> Vec<(NodeId, usize)> {
        let mut visible = Vec::new();
        self.collect_visible_recursive(root, 0, &mut visible);
        visible
    }

    fn collect_visible_recursive(&self, id: NodeId, depth: usize, visible: &mut Vec<(NodeId, usize)>) {
        let Some(node) = self.get_node(id) else {
            return;
        };
        visible.push((id, depth));

        if node.is_expanded() {
            for &child_id in &node.children {
                self.collect_visible_recursive(child_id, depth + 1, visible);
            }
        }
    }

    /// Find the parent of `id` by walking down from `root` along path prefixes
    pub fn find_parent(&self, root: NodeId, id: NodeId) -> Option<NodeId> {
        let target = self.get_node(id)?.entry.path.clone();
        let mut current = self.get_node(root)?;
        if current.id == id || !target.starts_with(&current.entry.path) {
            return None;
        }

        loop {
            if current.children.contains(&id) {
                return Some(current.id);
            }
            current = current
                .children
                .iter()
                .filter_map(|&c| self.get_node(c))
                .find(|c| c.is_expanded() && target.starts_with(&c.entry.path))?;
        }
    }

    /// Whether `id` is `root` or one of its loaded descendants
    pub fn contains(&self, root: NodeId, id: NodeId) -> bool {
        (id == root && self.nodes.contains_key(&id)) || self.find_parent(root, id).is_some()
    }

    /// Add a new node to the tree, starting its size computation or sniffing
    /// its content as appropriate
    fn add_node(&mut self, entry: FsEntry) -> NodeId {
        let id = NodeId(self.next_id);
        self.next_id += 1;

        let (size, mime_type) = if entry.is_dir() {
            let cell = Arc::new(SizeCell::pending());
            self.sizes
                .schedule(&self.backend, entry.path.clone(), Arc::clone(&cell));
            (cell, String::new())
        } else {
            let size = Arc::new(SizeCell::ready(entry.size().unwrap_or(0)));
            // FIFOs and device nodes can block or react when opened
            let mime_type = if entry.is_special() {
                String::new()
            } else {
                match self.backend.read_head(&entry.path, SNIFF_LEN) {
                    Ok(head) => mime::sniff(&entry.path, &head),
                    Err(e) => {
                        tracing::trace!("Cannot sniff {:?}: {}", entry.path, e);
                        String::new()
                    }
                }
            };
            (size, mime_type)
        };

        if let Some(old) = self.path_to_node.insert(entry.path.clone(), id) {
            tracing::warn!("Replacing live node {} for {:?}", old, entry.path);
        }
        self.nodes.insert(id, TreeNode::new(id, entry, size, mime_type));

        id
    }

    /// Remove a node and all its descendants
    fn remove_node_recursive(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child_id in node.children {
                self.remove_node_recursive(child_id);
            }

            if self.path_to_node.get(&node.entry.path) == Some(&id) {
                self.path_to_node.remove(&node.entry.path);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::fs::{LocalFsBackend, SlowFsBackend, SlowFsConfig};
    use std::fs as std_fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let temp_dir = TempDir::new().unwrap();
        let temp_path = temp_dir.path();

        // Create test structure:
        // /
        // ├── dir1/
        // │   ├── file1.txt
        // │   └── file2.txt
        // ├── dir2/
        // │   └── subdir/
        // │       └── file3.txt
        // ├── .hidden
        // └── file4.txt

        std_fs::create_dir(temp_path.join("dir1")).unwrap();
        std_fs::write(temp_path.join("dir1/file1.txt"), "content1").unwrap();
        std_fs::write(temp_path.join("dir1/file2.txt"), "content2").unwrap();

        std_fs::create_dir(temp_path.join("dir2")).unwrap();
        std_fs::create_dir(temp_path.join("dir2/subdir")).unwrap();
        std_fs::write(temp_path.join("dir2/subdir/file3.txt"), "content3").unwrap();

        std_fs::write(temp_path.join(".hidden"), "h").unwrap();
        std_fs::write(temp_path.join("file4.txt"), "content4").unwrap();

        temp_dir
    }

    fn create_test_tree(sizes: SizeScheduler) -> (TempDir, FileTree, NodeId) {
        let temp_dir = create_test_dir();
        let mut tree = FileTree::new(Arc::new(LocalFsBackend::new()), sizes);
        let root = tree.create_root(temp_dir.path()).unwrap();
        (temp_dir, tree, root)
    }

    fn child_names(tree: &FileTree, id: NodeId) -> Vec<String> {
        tree.get_node(id)
            .unwrap()
            .children
            .iter()
            .map(|&c| tree.get_node(c).unwrap().entry.name.clone())
            .collect()
    }

    fn child_by_name(tree: &FileTree, id: NodeId, name: &str) -> NodeId {
        *tree
            .get_node(id)
            .unwrap()
            .children
            .iter()
            .find(|&&c| tree.get_node(c).unwrap().entry.name == name)
            .unwrap()
    }

    #[test]
    fn test_create_root() {
        let (_temp_dir, tree, root) = create_test_tree(SizeScheduler::Disabled);

        assert_eq!(tree.node_count(), 1);
        let node = tree.get_node(root).unwrap();
        assert!(node.is_collapsed());
        assert!(node.size.is_pending());
    }

    #[test]
    fn test_create_root_rejects_files() {
        let temp_dir = create_test_dir();
        let mut tree = FileTree::new(Arc::new(LocalFsBackend::new()), SizeScheduler::Disabled);
        let err = tree.create_root(&temp_dir.path().join("file4.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(tree.create_root(&temp_dir.path().join("missing")).is_err());
    }

    #[test]
    fn test_expand_sorted() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);

        tree.expand(root).unwrap();

        assert!(tree.get_node(root).unwrap().is_expanded());
        assert_eq!(
            child_names(&tree, root),
            vec!["dir1", "dir2", ".hidden", "file4.txt"]
        );
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_hidden_entries_filtered() {
        let (_temp_dir, tree, root) = create_test_tree(SizeScheduler::Disabled);
        let mut tree = tree.with_show_hidden(false);

        tree.expand(root).unwrap();
        assert_eq!(child_names(&tree, root), vec!["dir1", "dir2", "file4.txt"]);
    }

    #[test]
    fn test_file_attributes_set_at_construction() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();

        let file = tree.get_node(child_by_name(&tree, root, "file4.txt")).unwrap();
        assert_eq!(file.size(), Some(8));
        assert_eq!(file.mime_type, "text/plain; charset=utf-8");
        assert!(file.is_leaf());
    }

    #[test]
    fn test_inline_directory_sizes() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Inline);

        assert_eq!(tree.get_node(root).unwrap().size(), Some(33));
        tree.expand(root).unwrap();

        let dir1 = tree.get_node(child_by_name(&tree, root, "dir1")).unwrap();
        assert_eq!(dir1.size(), Some(16));
        let dir2 = tree.get_node(child_by_name(&tree, root, "dir2")).unwrap();
        assert_eq!(dir2.size(), Some(8));
    }

    #[test]
    fn test_collapse_drops_descendants() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir2 = child_by_name(&tree, root, "dir2");
        tree.expand(dir2).unwrap();
        let subdir = child_by_name(&tree, dir2, "subdir");
        tree.expand(subdir).unwrap();
        assert_eq!(tree.node_count(), 7);

        tree.collapse(dir2);

        let node = tree.get_node(dir2).unwrap();
        assert!(node.is_collapsed());
        assert!(node.children.is_empty());
        assert_eq!(tree.node_count(), 5);
        assert!(tree.get_node(subdir).is_none());
    }

    #[test]
    fn test_expand_collapse_expand_sees_disk_changes() {
        let (temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir1 = child_by_name(&tree, root, "dir1");
        tree.expand(dir1).unwrap();
        assert_eq!(child_names(&tree, dir1), vec!["file1.txt", "file2.txt"]);

        tree.collapse(dir1);
        std_fs::write(temp_dir.path().join("dir1/File0.txt"), "new").unwrap();
        std_fs::remove_file(temp_dir.path().join("dir1/file2.txt")).unwrap();
        tree.expand(dir1).unwrap();

        assert_eq!(child_names(&tree, dir1), vec!["File0.txt", "file1.txt"]);
    }

    #[test]
    fn test_reload_keeps_order() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let first = child_names(&tree, root);
        tree.expand(root).unwrap();
        assert_eq!(child_names(&tree, root), first);
        assert_eq!(tree.node_count(), 5);
    }

    #[test]
    fn test_unreadable_directory_is_recoverable() {
        let (temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir1 = child_by_name(&tree, root, "dir1");

        std_fs::remove_dir_all(temp_dir.path().join("dir1")).unwrap();
        assert!(tree.expand(dir1).is_err());

        let node = tree.get_node(dir1).unwrap();
        assert!(node.is_error());
        assert!(node.children.is_empty());

        tree.collapse(dir1);
        assert!(tree.get_node(dir1).unwrap().is_collapsed());
    }

    #[test]
    fn test_load_preserves_identity() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir2 = child_by_name(&tree, root, "dir2");
        tree.expand(dir2).unwrap();
        let subdir = child_by_name(&tree, dir2, "subdir");
        let old_dir1 = child_by_name(&tree, root, "dir1");

        tree.load(root, Some(dir2)).unwrap();

        assert_eq!(child_by_name(&tree, root, "dir2"), dir2);
        assert!(tree.get_node(dir2).unwrap().is_expanded());
        assert_eq!(child_by_name(&tree, dir2, "subdir"), subdir);
        assert_ne!(child_by_name(&tree, root, "dir1"), old_dir1);
        assert!(tree.get_node(old_dir1).is_none());
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_create_parent_reuses_child() {
        let (temp_dir, mut tree, _) = create_test_tree(SizeScheduler::Disabled);
        let dir2 = tree.create_root(&temp_dir.path().join("dir2")).unwrap();
        tree.expand(dir2).unwrap();

        let parent = tree.create_parent(dir2).unwrap();

        let parent_node = tree.get_node(parent).unwrap();
        assert!(parent_node.is_expanded());
        assert_eq!(
            parent_node.entry.path,
            temp_dir.path().canonicalize().unwrap()
        );
        assert_eq!(child_by_name(&tree, parent, "dir2"), dir2);
        assert!(tree.get_node(dir2).unwrap().is_expanded());
    }

    #[test]
    fn test_create_parent_at_filesystem_root() {
        let mut tree = FileTree::new(Arc::new(LocalFsBackend::new()), SizeScheduler::Disabled);
        let root = tree.create_root(Path::new("/")).unwrap();
        assert_eq!(tree.create_parent(root).unwrap(), root);
        assert_eq!(tree.node_count(), 1);
    }

    #[test]
    fn test_prune_and_paths_stay_unique() {
        let (temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir2 = child_by_name(&tree, root, "dir2");
        tree.expand(dir2).unwrap();

        tree.prune(dir2);
        assert_eq!(tree.node_count(), 2);
        assert!(tree.get_node(root).is_none());
        let canon = temp_dir.path().canonicalize().unwrap();
        assert!(tree.get_node_by_path(&canon).is_none());

        let parent = tree.create_parent(dir2).unwrap();
        assert_eq!(tree.get_node_by_path(&canon).unwrap().id, parent);
        assert_eq!(tree.node_count(), 6);
    }

    #[test]
    fn test_visible_nodes_and_parents() {
        let (_temp_dir, mut tree, root) = create_test_tree(SizeScheduler::Disabled);
        tree.expand(root).unwrap();
        let dir1 = child_by_name(&tree, root, "dir1");
        tree.expand(dir1).unwrap();
        let file1 = child_by_name(&tree, dir1, "file1.txt");

        let visible = tree.visible_nodes(root);
        assert_eq!(visible.len(), 7);
        assert_eq!(visible[0], (root, 0));
        assert_eq!(visible[1], (dir1, 1));
        assert_eq!(visible[2], (file1, 2));

        assert_eq!(tree.find_parent(root, file1), Some(dir1));
        assert_eq!(tree.find_parent(root, dir1), Some(root));
        assert_eq!(tree.find_parent(root, root), None);
        assert_eq!(tree.find_parent(dir1, root), None);
        assert!(tree.contains(root, file1));
        assert!(!tree.contains(dir1, root));
    }

    #[test]
    fn test_collapse_does_not_touch_disk() {
        let temp_dir = create_test_dir();
        let slow = Arc::new(SlowFsBackend::new(
            Arc::new(LocalFsBackend::new()),
            SlowFsConfig::none(),
        ));
        let mut tree = FileTree::new(slow.clone(), SizeScheduler::Disabled);
        let root = tree.create_root(temp_dir.path()).unwrap();

        tree.expand(root).unwrap();
        tree.collapse(root);
        tree.collapse(root);
        assert_eq!(slow.metrics().read_dir_calls, 1);

        tree.expand(root).unwrap();
        assert_eq!(slow.metrics().read_dir_calls, 2);
    }

    #[cfg(unix)]
    #[test]
    fn test_expand_lists_fifo_without_opening_it() {
        use std::os::unix::ffi::OsStrExt;

        let temp_dir = TempDir::new().unwrap();
        std_fs::write(temp_dir.path().join("notes.txt"), "hi").unwrap();
        let pipe = temp_dir.path().join("pipe");
        let c_path = std::ffi::CString::new(pipe.as_os_str().as_bytes()).unwrap();
        assert_eq!(unsafe { libc::mkfifo(c_path.as_ptr(), 0o644) }, 0);

        let mut tree = FileTree::new(Arc::new(LocalFsBackend::new()), SizeScheduler::Inline);
        let root = tree.create_root(temp_dir.path()).unwrap();

        // Run off-thread so a blocking open fails the test instead of hanging it
        let (tx, rx) = std::sync::mpsc::channel();
        let handle = std::thread::spawn(move || {
            let result = tree.expand(root);
            let _ = tx.send(());
            (tree, result)
        });
        rx.recv_timeout(std::time::Duration::from_secs(5))
            .expect("expand blocked on a FIFO");
        let (tree, result) = handle.join().unwrap();
        result.unwrap();

        let node = tree.get_node_by_path(&tree_path(&tree, root, "pipe")).unwrap();
        assert!(node.entry.is_special());
        assert!(!node.is_dir());
        assert_eq!(node.mime_type, "");
        assert_eq!(node.size(), Some(0));

        let notes = tree.get_node_by_path(&tree_path(&tree, root, "notes.txt")).unwrap();
        assert_eq!(notes.mime_type, "text/plain; charset=utf-8");
    }

    fn tree_path(tree: &FileTree, root: NodeId, name: &str) -> PathBuf {
        tree.get_node(root).unwrap().entry.path.join(name)
    }
}
