use anyhow::{Context, Result as AnyhowResult};
use clap::Parser;
use crossterm::event::{self, Event as CrosstermEvent, KeyEventKind};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::time::{Duration, Instant};
use term_finder::app::{App, Launch};
use term_finder::config::Config;
use term_finder::primitives::path_utils::expand_tilde;
use term_finder::services::fs::LocalFsBackend;
use term_finder::services::terminal_modes::{self, TerminalModes};
use term_finder::services::{launcher, log_dirs, tracing_setup};
use term_finder::view::file_tree::{FileTree, SizeScheduler};

type AppTerminal = Terminal<CrosstermBackend<io::Stdout>>;

/// A terminal file browser
#[derive(Parser, Debug)]
#[command(name = "term-finder")]
#[command(about = "Browse the filesystem as a tree in the terminal", long_about = None)]
#[command(version)]
struct Args {
    /// Directory to start in (default: current directory)
    #[arg(value_name = "DIR")]
    dir: Option<String>,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Path to log file (default: the XDG state directory)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Print the effective configuration as JSON and exit
    #[arg(long)]
    dump_config: bool,

    /// Print the config and log locations and exit
    #[arg(long)]
    show_paths: bool,
}

/// An explicit `--config` must load; the user config falls back to defaults
fn load_config(args: &Args) -> AnyhowResult<Config> {
    match &args.config {
        Some(path) => Config::load_from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(Config::load_user()),
    }
}

fn main() -> AnyhowResult<()> {
    let args = Args::parse();

    // No terminal setup needed for these
    if args.show_paths {
        log_dirs::print_all_paths();
        return Ok(());
    }
    if args.dump_config {
        let config = load_config(&args)?;
        let json = serde_json::to_string_pretty(&config).context("Failed to serialize config")?;
        println!("{}", json);
        return Ok(());
    }

    let log_file = args
        .log_file
        .clone()
        .unwrap_or_else(log_dirs::main_log_path);
    if !tracing_setup::init_global(&log_file) {
        eprintln!("Warning: could not log to {}", log_file.display());
    }
    log_dirs::cleanup_stale_logs();
    tracing::info!("term-finder starting");

    let config = load_config(&args)?;
    let start = match &args.dir {
        Some(dir) => expand_tilde(dir),
        None => std::env::current_dir().context("Cannot determine current directory")?,
    };

    // Directory size walks run on the blocking pool of this runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .thread_name("term-finder-worker")
        .build()
        .context("Failed to start tokio runtime")?;

    let (size_tx, size_rx) = mpsc::channel();
    let sizes = if config.file_tree.directory_sizes {
        SizeScheduler::Background {
            handle: runtime.handle().clone(),
            notify: Some(size_tx),
        }
    } else {
        SizeScheduler::Disabled
    };
    let tree = FileTree::new(Arc::new(LocalFsBackend::new()), sizes)
        .with_show_hidden(config.file_tree.show_hidden);

    let mut app = App::new(config, tree, Some(size_rx));
    app.load(&start)
        .with_context(|| format!("Cannot browse {}", start.display()))?;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic| {
        terminal_modes::emergency_cleanup();
        original_hook(panic);
    }));

    let mut terminal_modes = TerminalModes::enable()?;
    let mut terminal = Terminal::new(CrosstermBackend::new(io::stdout()))?;
    terminal.clear()?;

    let result = run_event_loop(&mut app, &mut terminal, &mut terminal_modes);

    terminal_modes.undo();
    // Pending size walks are abandoned
    runtime.shutdown_background();
    tracing::info!("term-finder exiting");

    result
}

fn run_event_loop(
    app: &mut App,
    terminal: &mut AppTerminal,
    terminal_modes: &mut TerminalModes,
) -> AnyhowResult<()> {
    const FRAME_DURATION: Duration = Duration::from_millis(16); // 60fps
    let mut last_render = Instant::now();
    let mut needs_render = true;

    loop {
        if app.process_async_messages() {
            needs_render = true;
        }

        while let Some(launch) = app.take_launch() {
            run_launch(app, launch, terminal, terminal_modes)?;
            needs_render = true;
        }

        if app.should_quit() {
            break;
        }

        if needs_render && last_render.elapsed() >= FRAME_DURATION {
            terminal.draw(|frame| app.render(frame))?;
            last_render = Instant::now();
            // Deferred notifications may change what is shown
            needs_render = app.after_draw();
        }

        let timeout = if needs_render {
            FRAME_DURATION.saturating_sub(last_render.elapsed())
        } else {
            Duration::from_millis(50)
        };

        if !event::poll(timeout)? {
            continue;
        }

        match event::read()? {
            CrosstermEvent::Key(key_event) => {
                if key_event.kind == KeyEventKind::Press && app.handle_key(key_event) {
                    needs_render = true;
                }
            }
            CrosstermEvent::Resize(_, _) => {
                needs_render = true;
            }
            _ => {}
        }
    }

    Ok(())
}

/// Start an external program. The editor gets the real terminal until it
/// exits; failures are logged and browsing continues.
fn run_launch(
    app: &App,
    launch: Launch,
    terminal: &mut AppTerminal,
    terminal_modes: &mut TerminalModes,
) -> AnyhowResult<()> {
    match launch {
        Launch::Edit(path) => {
            let editor = app.config().editor_command();
            terminal_modes.undo();
            let result = launcher::run_editor(&editor, &path);
            terminal_modes
                .reenable()
                .context("Failed to restore terminal after editor")?;
            terminal.clear()?;
            if let Err(e) = result {
                tracing::warn!("Failed to run editor {:?} on {:?}: {}", editor, path, e);
            }
        }
        Launch::Open(path) => launcher::open_detached(&path),
    }
    Ok(())
}
