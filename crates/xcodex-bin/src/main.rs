//! xcodex entrypoint: CLI, logging, terminal session and the host loop.
//!
//! The loop is strictly sequential: draw a frame, stop if the editor asked
//! to quit, wait for one event, feed it to the editor. The poll timeout
//! only exists so expired status messages disappear without a key press.

use std::io::{Write, stdout};
use std::path::{Path, PathBuf};
use std::sync::Once;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use core_actions::{Editor, EditorOptions};
use core_config::load_from;
use core_render::{RenderContext, Writer, compose};
use core_syntax::Theme;
use core_terminal::{CrosstermBackend, TerminalBackend, TerminalEvent, read_event};
use tracing::{error, info};
use tracing_appender::non_blocking::WorkerGuard;

const LOG_FILE: &str = "xcodex.log";
/// Status bar and message bar.
const CHROME_ROWS: u16 = 2;
const POLL_INTERVAL: Duration = Duration::from_millis(250);

#[derive(Parser, Debug)]
#[command(name = "xcodex", version, about = "A small modal text editor")]
struct Args {
    /// File to open. A missing file is created on the first write.
    pub path: Option<PathBuf>,
    /// Configuration file (overrides discovery of `xcodex.toml`).
    #[arg(long = "config")]
    pub config: Option<PathBuf>,
}

fn configure_logging() -> Option<WorkerGuard> {
    let log_dir = Path::new(".");
    let log_path = log_dir.join(LOG_FILE);
    if log_path.exists() {
        let _ = std::fs::remove_file(&log_path);
    }
    let file_appender = tracing_appender::rolling::never(log_dir, LOG_FILE);
    let (writer, guard) = tracing_appender::non_blocking(file_appender);
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_ansi(false)
        .with_writer(writer)
        .try_init()
        .ok()
        .map(|_| guard)
}

fn install_panic_hook() {
    static HOOK: Once = Once::new();
    HOOK.call_once(|| {
        let default_panic = std::panic::take_hook();
        std::panic::set_hook(Box::new(move |info| {
            error!(target: "runtime", %info, "panic");
            default_panic(info);
        }));
    });
}

fn build_editor(args: &Args) -> Result<(Editor, Theme)> {
    let config = load_from(args.config.clone())?;
    let theme = Theme::by_name(&config.file.theme.name);
    let mut editor = Editor::new(EditorOptions::from(&config.file.editor));
    if let Some(path) = &args.path {
        editor
            .open(path)
            .with_context(|| format!("opening {}", path.display()))?;
    }
    info!(
        target: "runtime",
        config = ?config.source,
        theme = theme.name,
        path = ?args.path,
        "bootstrap_complete"
    );
    Ok((editor, theme))
}

fn resize(editor: &mut Editor, cols: u16, rows: u16) {
    let text_rows = rows.saturating_sub(CHROME_ROWS);
    editor.set_screen_size(usize::from(text_rows), usize::from(cols));
}

fn draw<W: Write>(editor: &Editor, theme: &Theme, out: &mut W) -> Result<()> {
    let pending = editor.pending_keys();
    let frame = compose(&RenderContext {
        state: editor.state(),
        message: editor.status_message(),
        pending: &pending,
    });
    Writer::from_frame(&frame, theme).flush_to(out)
}

fn run(args: Args) -> Result<()> {
    let (mut editor, theme) = build_editor(&args)?;
    let mut backend = CrosstermBackend::new();
    backend.set_title("xcodex")?;
    let mut guard = backend.enter_guard()?;
    let (cols, rows) = guard.backend().size()?;
    resize(&mut editor, cols, rows);

    let mut out = stdout();
    loop {
        draw(&editor, &theme, &mut out)?;
        if editor.quit_requested() {
            break;
        }
        match read_event(POLL_INTERVAL)? {
            Some(TerminalEvent::Key(key)) => editor.process_key(key),
            Some(TerminalEvent::Resize(cols, rows)) => resize(&mut editor, cols, rows),
            None => {}
        }
    }
    info!(
        target: "runtime",
        hook_failures = editor.hook_failures(),
        "shutdown"
    );
    Ok(())
}

fn main() -> Result<()> {
    let _log_guard = configure_logging();
    install_panic_hook();
    info!(target: "runtime", "startup");
    let result = run(Args::parse());
    if let Err(err) = &result {
        error!(target: "runtime", error = %format!("{err:#}"), "fatal");
    }
    result
}
