#![allow(dead_code)] // Shared across integration tests; each test binary uses a subset of helpers.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

use anyhow::{Result, anyhow, bail};
use core_actions::{Editor, EditorOptions, FileIo};
use core_events::{KeyCode, KeyEvent};
use core_plugin::{Hook, PluginHost};
use tracing::Level;
use tracing::subscriber::with_default;
use tracing_subscriber::fmt::MakeWriter;

/// Editor with default options over `lines`, cursor at the origin.
pub fn editor_with(lines: &[&str]) -> Editor {
    editor_with_options(lines, EditorOptions::default())
}

pub fn editor_with_options(lines: &[&str], options: EditorOptions) -> Editor {
    let mut ed = Editor::new(options);
    ed.set_lines(lines.iter().copied());
    ed
}

/// Parse vim-style key notation: plain chars plus `<Esc>`, `<CR>`, `<BS>`,
/// `<Del>`, `<Tab>`, `<Up>`/`<Down>`/`<Left>`/`<Right>` and `<C-x>`.
pub fn parse_keys(notation: &str) -> Vec<KeyEvent> {
    let mut out = Vec::new();
    let mut chars = notation.chars();
    while let Some(c) = chars.next() {
        if c != '<' {
            out.push(KeyEvent::char(c));
            continue;
        }
        let name: String = chars.by_ref().take_while(|&c| c != '>').collect();
        let key = match name.as_str() {
            "Esc" => KeyEvent::named(KeyCode::Esc),
            "CR" => KeyEvent::named(KeyCode::Enter),
            "BS" => KeyEvent::named(KeyCode::Backspace),
            "Del" => KeyEvent::named(KeyCode::Delete),
            "Tab" => KeyEvent::named(KeyCode::Tab),
            "Up" => KeyEvent::named(KeyCode::Up),
            "Down" => KeyEvent::named(KeyCode::Down),
            "Left" => KeyEvent::named(KeyCode::Left),
            "Right" => KeyEvent::named(KeyCode::Right),
            "lt" => KeyEvent::char('<'),
            other => match other.strip_prefix("C-").and_then(|s| s.chars().next()) {
                Some(letter) => KeyEvent::ctrl(letter),
                None => panic!("unknown key notation <{other}>"),
            },
        };
        out.push(key);
    }
    out
}

pub fn feed(ed: &mut Editor, notation: &str) {
    for key in parse_keys(notation) {
        ed.process_key(key);
    }
}

pub fn lines(ed: &Editor) -> Vec<String> {
    ed.rows().iter().map(|r| r.raw().to_owned()).collect()
}

/// (row, col) of the cursor in file coordinates.
pub fn cursor(ed: &Editor) -> (usize, usize) {
    let c = ed.state().cursor;
    (c.row, c.col)
}

/// In-memory filesystem.
#[derive(Clone, Default)]
pub struct MemIo {
    pub files: Arc<Mutex<HashMap<PathBuf, String>>>,
    pub fail_writes: bool,
}

impl MemIo {
    pub fn with_file(path: &str, content: &str) -> Self {
        let io = Self::default();
        io.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_owned());
        io
    }

    pub fn read(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileIo for MemIo {
    fn load(&self, path: &Path) -> Result<Vec<String>> {
        match self.files.lock().unwrap().get(path) {
            Some(content) => Ok(content.lines().map(str::to_owned).collect()),
            None => Err(std::io::Error::from(std::io::ErrorKind::NotFound).into()),
        }
    }

    fn save(&self, path: &Path, content: &str) -> Result<usize> {
        if self.fail_writes {
            bail!("disk full");
        }
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_owned());
        Ok(content.len())
    }
}

/// Plugin host that records every hook and optionally fails some of them.
#[derive(Clone, Default)]
pub struct RecordingHost {
    pub seen: Arc<Mutex<Vec<Hook>>>,
    pub fail_on: Option<&'static str>,
}

impl RecordingHost {
    pub fn names(&self) -> Vec<&'static str> {
        self.seen.lock().unwrap().iter().map(Hook::name).collect()
    }
}

impl PluginHost for RecordingHost {
    fn name(&self) -> &'static str {
        "recording-host"
    }

    fn load_all(&mut self) -> Result<()> {
        Ok(())
    }

    fn on_hook(&mut self, hook: &Hook) -> Result<()> {
        self.seen.lock().unwrap().push(hook.clone());
        if self.fail_on == Some(hook.name()) {
            return Err(anyhow!("plugin crashed in {}", hook.name()));
        }
        Ok(())
    }
}

/// Log sink shared between a test and its subscriber.
#[derive(Clone, Default)]
struct BufferWriter {
    inner: Arc<Mutex<Vec<u8>>>,
}

struct LockedWriter<'a> {
    guard: MutexGuard<'a, Vec<u8>>,
}

impl Write for LockedWriter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for BufferWriter {
    type Writer = LockedWriter<'a>;

    fn make_writer(&'a self) -> Self::Writer {
        LockedWriter {
            guard: self.inner.lock().expect("log buffer poisoned"),
        }
    }
}

/// Run `f` under a fmt subscriber at `DEBUG` and return what it logged.
pub fn capture_logs<F: FnOnce()>(f: F) -> String {
    let writer = BufferWriter::default();
    let buffer = writer.inner.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(Level::DEBUG)
        .with_target(true)
        .with_ansi(false)
        .without_time()
        .with_writer(writer)
        .finish();
    with_default(subscriber, f);
    let bytes = buffer.lock().unwrap().clone();
    String::from_utf8(bytes).unwrap()
}
