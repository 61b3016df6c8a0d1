// File tree module: lazy directory tree plus the navigator driving it

pub mod mime;
pub mod navigator;
pub mod node;
pub mod size;
pub mod sort;
pub mod tree;
pub mod view;

pub use navigator::{Command, NodeCallback, Navigator};
pub use node::{NodeId, NodeState, TreeNode};
pub use size::{SizeCell, SizeScheduler};
pub use tree::FileTree;
pub use view::FocusState;
