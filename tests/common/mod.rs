#![allow(dead_code)]

pub mod tracing;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use term_finder::services::fs::{FsBackend, LocalFsBackend};
use term_finder::view::file_tree::{FileTree, Navigator, NodeId, SizeScheduler};

/// A directory tree on disk, kept alive for the test's duration
pub struct Fixture {
    _temp_dir: TempDir,
    pub top: PathBuf,
}

impl Fixture {
    /// `<tmp>/top/{a/{B/{inner.txt, deep/leaf.bin}, a/, c.txt}, z.txt}`
    pub fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let top = temp_dir.path().canonicalize().unwrap().join("top");
        fs::create_dir_all(top.join("a/B/deep")).unwrap();
        fs::create_dir_all(top.join("a/a")).unwrap();
        fs::write(top.join("a/B/inner.txt"), "inner").unwrap();
        fs::write(top.join("a/B/deep/leaf.bin"), vec![0u8; 1000]).unwrap();
        fs::write(top.join("a/c.txt"), "ccc").unwrap();
        fs::write(top.join("z.txt"), "z").unwrap();
        Self {
            _temp_dir: temp_dir,
            top,
        }
    }

    pub fn path(&self, rel: &str) -> PathBuf {
        self.top.join(rel)
    }
}

pub fn local_navigator(start: &Path, sizes: SizeScheduler) -> Navigator {
    navigator_with(Arc::new(LocalFsBackend::new()), start, sizes)
}

pub fn navigator_with(backend: Arc<dyn FsBackend>, start: &Path, sizes: SizeScheduler) -> Navigator {
    self::tracing::init_tracing_from_env();
    let mut nav = Navigator::new(FileTree::new(backend, sizes));
    nav.load(start).unwrap();
    nav
}

pub fn id_of(nav: &Navigator, path: &Path) -> NodeId {
    nav.tree().get_node_by_path(path).unwrap().id
}

/// Names of `id`'s loaded children, in order
pub fn child_names(nav: &Navigator, id: NodeId) -> Vec<String> {
    let tree = nav.tree();
    tree.get_node(id)
        .unwrap()
        .children
        .iter()
        .map(|&c| tree.get_node(c).unwrap().name().to_string())
        .collect()
}

pub fn focus_path(nav: &Navigator) -> PathBuf {
    nav.focused_node().unwrap().path().to_path_buf()
}

pub fn root_path(nav: &Navigator) -> PathBuf {
    nav.root_node().unwrap().path().to_path_buf()
}
