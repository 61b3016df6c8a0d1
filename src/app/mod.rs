//! Application state driven by the terminal event loop

mod file_explorer;

use crate::config::Config;
use crate::input::keybindings::{self, Action};
use crate::view::file_tree::{FileTree, Navigator};
use crate::view::theme::Theme;
use crate::view::ui::{FileExplorerRenderer, PreviewPane};
use crossterm::event::KeyEvent;
use ratatui::layout::{Constraint, Layout};
use ratatui::Frame;
use std::collections::VecDeque;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

pub use file_explorer::{ExplorerEvent, Launch};

pub struct App {
    navigator: Navigator,
    preview: PreviewPane,
    config: Config,
    theme: Theme,
    /// Notifications from the navigator callbacks
    explorer_rx: Receiver<ExplorerEvent>,
    /// Paths whose directory size finished computing
    size_rx: Option<Receiver<PathBuf>>,
    launches: VecDeque<Launch>,
    should_quit: bool,
}

impl App {
    /// Create the app around `tree`; `size_rx` receives finished size walks
    pub fn new(config: Config, tree: FileTree, size_rx: Option<Receiver<PathBuf>>) -> Self {
        let (tx, explorer_rx) = mpsc::channel();
        let mut navigator = Navigator::new(tree);

        let changed = tx.clone();
        navigator.on_changed(move |node| {
            let _ = changed.send(ExplorerEvent::Changed(node.path().to_path_buf()));
        });
        let select = tx.clone();
        navigator.on_select(move |node| {
            let _ = select.send(ExplorerEvent::Select(node.path().to_path_buf()));
        });
        navigator.on_open(move |node| {
            let _ = tx.send(ExplorerEvent::Open(node.path().to_path_buf()));
        });

        let theme = Theme::from(&config.theme);
        Self {
            navigator,
            preview: PreviewPane::new(),
            config,
            theme,
            explorer_rx,
            size_rx,
            launches: VecDeque::new(),
            should_quit: false,
        }
    }

    /// Open the browser on `start`
    pub fn load(&mut self, start: &Path) -> io::Result<()> {
        self.navigator.load(start)?;
        self.drain_explorer_events();
        Ok(())
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    pub fn preview(&self) -> &PreviewPane {
        &self.preview
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Handle a key press. Returns true if the screen needs redrawing.
    pub fn handle_key(&mut self, event: KeyEvent) -> bool {
        match keybindings::resolve(&event) {
            Some(Action::Quit) => {
                self.quit();
                true
            }
            Some(Action::Navigate(command)) => {
                tracing::trace!("command {:?}", command);
                self.navigator.execute(command);
                self.drain_explorer_events();
                true
            }
            None => false,
        }
    }

    /// Pick up work finished off the UI thread. Returns true if anything
    /// visible changed.
    pub fn process_async_messages(&mut self) -> bool {
        let mut changed = false;

        if let Some(rx) = &self.size_rx {
            while let Ok(path) = rx.try_recv() {
                tracing::trace!("size ready for {:?}", path);
                changed = true;
            }
        }

        changed | self.drain_explorer_events()
    }

    /// Run work deferred until the frame was drawn. Returns true if another
    /// frame is needed.
    pub fn after_draw(&mut self) -> bool {
        if !self.navigator.has_pending_after_draw() {
            return false;
        }
        self.navigator.run_after_draw();
        self.drain_explorer_events()
    }

    /// Next external program to run, if any
    pub fn take_launch(&mut self) -> Option<Launch> {
        self.launches.pop_front()
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let [tree_area, preview_area] = Layout::horizontal([
            Constraint::Length(self.config.file_tree.width),
            Constraint::Min(0),
        ])
        .areas(frame.area());

        self.navigator
            .set_viewport_height(FileExplorerRenderer::viewport_height(tree_area));
        FileExplorerRenderer::render(
            &self.navigator,
            frame,
            tree_area,
            &self.theme,
            &self.config.file_tree.icons,
        );
        self.preview.render(frame, preview_area, &self.theme);
    }
}
