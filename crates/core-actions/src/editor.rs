//! The editing session driven by the host loop.
//!
//! The host feeds key events into [`Editor::process_key`] and pulls
//! everything else (rows, cursor, mode, status text, quit flag) afterwards.
//! Collaborators are boxed trait objects so tests and the binary can swap
//! them: [`FileIo`] for persistence, [`PluginHost`] for lifecycle hooks and
//! [`CompletionSource`] for Insert-mode completion.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Result;
use core_config::EditorConfig;
use core_events::KeyEvent;
use core_plugin::{CompletionSource, Hook, NoopPluginHost, PluginHost, WordCompletion};
use core_state::{EditorState, Mode};
use core_text::{Row, RowStore};
use tracing::{debug, info, warn};

use crate::dispatcher::{self, Ctx, Effect, edit_failed, mode::apply_transition, motion};
use crate::io_ops::{FileIo, FsIo};
use crate::key_translator::KeyTranslator;

/// Tunables taken from `[editor]` in the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditorOptions {
    pub tab_stop: usize,
    /// Extra quit attempts required while the document is dirty.
    pub quit_times: u32,
    pub undo_capacity: usize,
    pub max_count: u32,
    pub line_numbers: bool,
    pub status_timeout: Duration,
}

impl Default for EditorOptions {
    fn default() -> Self {
        Self::from(&EditorConfig::default())
    }
}

impl From<&EditorConfig> for EditorOptions {
    fn from(cfg: &EditorConfig) -> Self {
        Self {
            tab_stop: cfg.tab_stop,
            quit_times: cfg.quit_times,
            undo_capacity: cfg.undo_capacity,
            max_count: cfg.max_count,
            line_numbers: cfg.line_numbers,
            status_timeout: cfg.status_timeout(),
        }
    }
}

pub struct Editor {
    state: EditorState,
    keys: KeyTranslator,
    quit_times: u32,
    quit_remaining: u32,
    quit_requested: bool,
    syntax_enabled: bool,
    status_timeout: Duration,
    plugins: Box<dyn PluginHost>,
    completion: Box<dyn CompletionSource>,
    io: Box<dyn FileIo>,
    hook_failures: usize,
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorOptions::default())
    }
}

impl Editor {
    pub fn new(options: EditorOptions) -> Self {
        let mut state = EditorState::with_undo_capacity(
            RowStore::new(options.tab_stop),
            options.undo_capacity,
        );
        state.show_line_numbers = options.line_numbers;
        Self {
            state,
            keys: KeyTranslator::new(options.max_count),
            quit_times: options.quit_times,
            quit_remaining: options.quit_times,
            quit_requested: false,
            syntax_enabled: true,
            status_timeout: options.status_timeout,
            plugins: Box::new(NoopPluginHost),
            completion: Box::new(WordCompletion),
            io: Box::new(FsIo),
            hook_failures: 0,
        }
    }

    /// Install a plugin host and load its plugins. A failing load is logged
    /// and the host is kept; hooks it cannot serve fail individually.
    pub fn with_plugins(mut self, mut host: Box<dyn PluginHost>) -> Self {
        if let Err(err) = host.load_all() {
            warn!(target: "plugin", host = host.name(), error = %err, "plugin_load_failed");
        }
        self.plugins = host;
        self
    }

    pub fn with_completion(mut self, source: Box<dyn CompletionSource>) -> Self {
        self.completion = source;
        self
    }

    pub fn with_io(mut self, io: Box<dyn FileIo>) -> Self {
        self.io = io;
        self
    }

    /// Replace the document with `lines` (no file association change).
    pub fn set_lines<I, S>(&mut self, lines: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let rows = RowStore::from_lines(lines, self.state.rows().tab_stop());
        self.state.replace_rows(rows);
        self.refresh_syntax();
    }

    /// Load `path` as the document. A missing file opens an empty document
    /// bound to that name.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        let lines = match self.io.load(path) {
            Ok(lines) => lines,
            Err(err) if is_not_found(&err) => {
                info!(target: "io", path = %path.display(), "new_file");
                self.state.set_status("New file");
                Vec::new()
            }
            Err(err) => return Err(err),
        };
        self.state
            .replace_rows(RowStore::from_lines(lines, self.state.rows().tab_stop()));
        self.state.file_name = Some(path.to_path_buf());
        self.refresh_syntax();
        self.fire(Hook::open(path));
        Ok(())
    }

    /// Consume one key event.
    pub fn process_key(&mut self, key: KeyEvent) {
        let mode_before = self.state.mode;
        let result = {
            let mut ctx = Ctx {
                state: &mut self.state,
                keys: &mut self.keys,
                completion: self.completion.as_ref(),
            };
            dispatcher::dispatch(&mut ctx, &key)
        };
        match apply_transition(&mut self.state, &mut self.keys, result.transition) {
            Ok(Some((from, to))) => self.fire(Hook::ModeChange { from, to }),
            Ok(None) => {}
            Err(err) => {
                for effect in edit_failed(err).effects {
                    self.apply_effect(effect);
                }
            }
        }
        let mut quit_attempted = false;
        for effect in result.effects {
            quit_attempted |= matches!(
                effect,
                Effect::Quit { .. } | Effect::Write { then_quit: true, .. }
            );
            self.apply_effect(effect);
        }
        let command_line = mode_before == Mode::Command || self.state.mode == Mode::Command;
        if !quit_attempted && !command_line {
            self.quit_remaining = self.quit_times;
        }
        self.settle_cursor();
    }

    fn settle_cursor(&mut self) {
        self.state.clamp_cursor();
        if self.state.mode == Mode::Normal || self.state.mode.is_visual() {
            self.state.cursor = motion::clamp_to_char(self.state.rows(), self.state.cursor);
        }
        self.state.scroll();
    }

    fn apply_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Status(text) => self.state.set_status(text),
            Effect::CharInserted { ch, at } => self.fire(Hook::CharInsert { ch, at }),
            Effect::Write {
                path,
                then_quit,
                only_if_dirty,
            } => {
                let saved = if only_if_dirty && !self.state.dirty {
                    true
                } else {
                    self.save(path)
                };
                if saved && then_quit {
                    self.quit_attempt(false);
                }
            }
            Effect::Quit { force } => self.quit_attempt(force),
            Effect::Syntax(on) => {
                self.syntax_enabled = on;
                self.refresh_syntax();
                let label = if on { "Syntax on" } else { "Syntax off" };
                self.state.set_status(label);
            }
        }
    }

    fn quit_attempt(&mut self, force: bool) {
        if force || !self.state.dirty || self.quit_remaining == 0 {
            info!(target: "actions.dispatch", force, dirty = self.state.dirty, "quit");
            self.quit_requested = true;
            return;
        }
        self.state.set_status(format!(
            "WARNING!!! File has unsaved changes. Quit {} more times to quit (or :q! to discard).",
            self.quit_remaining
        ));
        self.quit_remaining -= 1;
    }

    /// Write the document to `target` or the current file name. Returns
    /// whether the write happened.
    fn save(&mut self, target: Option<PathBuf>) -> bool {
        let Some(path) = target.or_else(|| self.state.file_name.clone()) else {
            self.state.set_status("No file name");
            return false;
        };
        let content = self.state.rows_to_flat_string();
        match self.io.save(&path, &content) {
            Ok(bytes) => {
                info!(target: "io", path = %path.display(), bytes, "save");
                self.state.dirty = false;
                self.state.file_name = Some(path.clone());
                self.refresh_syntax();
                self.state.set_status(format!("{bytes} bytes written to disk"));
                self.fire(Hook::save(&path));
                true
            }
            Err(err) => {
                warn!(target: "io", path = %path.display(), error = %err, "save_failed");
                self.state.set_status(format!("Can't save! I/O error: {err:#}"));
                false
            }
        }
    }

    fn refresh_syntax(&mut self) {
        let highlighter = if self.syntax_enabled {
            self.state
                .file_name
                .as_deref()
                .and_then(core_syntax::find_syntax)
        } else {
            None
        };
        debug!(target: "syntax", enabled = self.syntax_enabled, found = highlighter.is_some(), "syntax_refresh");
        self.state.set_highlighter(highlighter);
    }

    fn fire(&mut self, hook: Hook) {
        if let Err(err) = self.plugins.on_hook(&hook) {
            self.hook_failures += 1;
            warn!(target: "plugin", hook = hook.name(), error = %err, "hook_failed");
        }
    }

    pub fn current_mode(&self) -> Mode {
        self.state.mode
    }

    /// Status text, or empty once it has been shown for the configured
    /// timeout.
    pub fn status_message(&self) -> &str {
        match &self.state.status {
            Some(msg) if !msg.is_expired(self.status_timeout) => &msg.text,
            _ => "",
        }
    }

    pub fn quit_requested(&self) -> bool {
        self.quit_requested
    }

    pub fn rows(&self) -> &[Row] {
        self.state.rows().rows()
    }

    pub fn cursor_screen_position(&self) -> (usize, usize) {
        self.state.cursor_screen_position()
    }

    pub fn state(&self) -> &EditorState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut EditorState {
        &mut self.state
    }

    pub fn set_screen_size(&mut self, rows: usize, cols: usize) {
        self.state.set_screen_size(rows, cols);
    }

    /// Pending count/prefix keys for the status bar.
    pub fn pending_keys(&self) -> String {
        self.keys.pending_display()
    }

    pub fn hook_failures(&self) -> usize {
        self.hook_failures
    }

    pub fn syntax_enabled(&self) -> bool {
        self.syntax_enabled
    }
}

fn is_not_found(err: &anyhow::Error) -> bool {
    err.downcast_ref::<std::io::Error>()
        .is_some_and(|e| e.kind() == std::io::ErrorKind::NotFound)
}
