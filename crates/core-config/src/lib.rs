//! Configuration loading and parsing.
//!
//! `xcodex.toml` is looked up in the working directory first, then under the
//! platform config directory (`<config_dir>/xcodex/xcodex.toml`). Unknown keys
//! are ignored. A missing file yields defaults; a malformed one is logged and
//! also yields defaults, so a typo never prevents the editor from starting.
//!
//! Values outside their valid range are clamped by [`Config::normalize`],
//! which logs each adjustment under the `config` target.

use anyhow::Result;
use serde::Deserialize;
use std::{fs, path::PathBuf, time::Duration};
use tracing::{info, warn};

pub const CONFIG_FILE_NAME: &str = "xcodex.toml";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct EditorConfig {
    #[serde(default = "EditorConfig::default_tab_stop")]
    pub tab_stop: usize,
    #[serde(default = "EditorConfig::default_quit_times")]
    pub quit_times: u32,
    #[serde(default = "EditorConfig::default_undo_capacity")]
    pub undo_capacity: usize,
    #[serde(default = "EditorConfig::default_max_count")]
    pub max_count: u32,
    #[serde(default = "EditorConfig::default_line_numbers")]
    pub line_numbers: bool,
    #[serde(default = "EditorConfig::default_status_timeout_secs")]
    pub status_timeout_secs: u64,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_stop: Self::default_tab_stop(),
            quit_times: Self::default_quit_times(),
            undo_capacity: Self::default_undo_capacity(),
            max_count: Self::default_max_count(),
            line_numbers: Self::default_line_numbers(),
            status_timeout_secs: Self::default_status_timeout_secs(),
        }
    }
}

impl EditorConfig {
    const fn default_tab_stop() -> usize {
        4
    }
    const fn default_quit_times() -> u32 {
        3
    }
    const fn default_undo_capacity() -> usize {
        1000
    }
    const fn default_max_count() -> u32 {
        1000
    }
    const fn default_line_numbers() -> bool {
        true
    }
    const fn default_status_timeout_secs() -> u64 {
        5
    }

    pub fn status_timeout(&self) -> Duration {
        Duration::from_secs(self.status_timeout_secs)
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
pub struct ThemeConfig {
    #[serde(default = "ThemeConfig::default_name")]
    pub name: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            name: Self::default_name(),
        }
    }
}

impl ThemeConfig {
    fn default_name() -> String {
        "default".to_string()
    }
}

#[derive(Debug, Deserialize, Default, Clone, PartialEq, Eq)]
pub struct ConfigFile {
    #[serde(default)]
    pub editor: EditorConfig,
    #[serde(default)]
    pub theme: ThemeConfig,
}

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub raw: Option<String>, // original file string (optional)
    pub source: Option<PathBuf>,
    pub file: ConfigFile,
}

/// Best-effort config path following platform conventions (XDG / AppData Roaming).
pub fn discover() -> PathBuf {
    let local = PathBuf::from(CONFIG_FILE_NAME);
    if local.exists() {
        return local;
    }
    if let Some(dir) = dirs::config_dir() {
        return dir.join("xcodex").join(CONFIG_FILE_NAME);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

pub fn load_from(path: Option<PathBuf>) -> Result<Config> {
    let path = path.unwrap_or_else(discover);
    let Ok(content) = fs::read_to_string(&path) else {
        info!(target: "config", path = %path.display(), "config_not_found_using_defaults");
        return Ok(Config::default());
    };
    match toml::from_str::<ConfigFile>(&content) {
        Ok(file) => {
            let mut cfg = Config {
                raw: Some(content),
                source: Some(path),
                file,
            };
            cfg.normalize();
            Ok(cfg)
        }
        Err(err) => {
            warn!(target: "config", path = %path.display(), error = %err, "config_parse_failed_using_defaults");
            Ok(Config::default())
        }
    }
}

impl Config {
    /// Clamp out-of-range values. Returns the number of adjusted fields.
    pub fn normalize(&mut self) -> usize {
        let editor = &mut self.file.editor;
        let mut adjusted = 0;
        if editor.tab_stop == 0 || editor.tab_stop > 16 {
            let clamped = editor.tab_stop.clamp(1, 16);
            info!(target: "config", raw = editor.tab_stop, clamped, "tab_stop_clamped");
            editor.tab_stop = clamped;
            adjusted += 1;
        }
        if editor.undo_capacity == 0 {
            info!(target: "config", raw = 0, clamped = 1, "undo_capacity_clamped");
            editor.undo_capacity = 1;
            adjusted += 1;
        }
        if editor.max_count == 0 {
            info!(target: "config", raw = 0, clamped = 1, "max_count_clamped");
            editor.max_count = 1;
            adjusted += 1;
        }
        adjusted
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::path::PathBuf;
    use std::sync::{Arc, Mutex, MutexGuard};
    use tracing::Level;
    use tracing::subscriber::with_default;
    use tracing_subscriber::fmt::MakeWriter;

    #[derive(Clone)]
    struct BufferWriter {
        inner: Arc<Mutex<Vec<u8>>>,
    }

    impl BufferWriter {
        fn new() -> (Self, Arc<Mutex<Vec<u8>>>) {
            let buf = Arc::new(Mutex::new(Vec::new()));
            (Self { inner: buf.clone() }, buf)
        }
    }

    struct LockedWriter<'a> {
        guard: MutexGuard<'a, Vec<u8>>,
    }

    impl<'a> Write for LockedWriter<'a> {
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

    fn capture<F: FnOnce()>(f: F) -> String {
        let (writer, buffer) = BufferWriter::new();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(Level::INFO)
            .with_target(true)
            .with_ansi(false)
            .without_time()
            .with_writer(writer)
            .finish();
        with_default(subscriber, f);
        let bytes = buffer.lock().unwrap().clone();
        String::from_utf8(bytes).unwrap()
    }

    #[test]
    fn default_config_when_missing_file() {
        let cfg = load_from(Some(PathBuf::from("__nonexistent_hopefully__.toml"))).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
        assert_eq!(cfg.file.editor.tab_stop, 4);
        assert_eq!(cfg.file.editor.quit_times, 3);
        assert_eq!(cfg.file.editor.max_count, 1000);
        assert_eq!(cfg.file.theme.name, "default");
        assert!(cfg.source.is_none());
    }

    #[test]
    fn parses_editor_and_theme_sections() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(
            tmp.path(),
            "[editor]\ntab_stop = 8\nquit_times = 1\nline_numbers = false\n[theme]\nname = \"mono\"\n",
        )
        .unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file.editor.tab_stop, 8);
        assert_eq!(cfg.file.editor.quit_times, 1);
        assert!(!cfg.file.editor.line_numbers);
        assert_eq!(cfg.file.editor.undo_capacity, 1000);
        assert_eq!(cfg.file.theme.name, "mono");
        assert_eq!(cfg.source.as_deref(), Some(tmp.path()));
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\nfancy = true\n[plugins]\nlua = 1\n").unwrap();
        let cfg = load_from(Some(tmp.path().to_path_buf())).unwrap();
        assert_eq!(cfg.file, ConfigFile::default());
    }

    #[test]
    fn malformed_file_falls_back_to_defaults_and_logs() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor\ntab_stop = ").unwrap();
        let mut cfg = None;
        let log = capture(|| {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        assert_eq!(cfg.unwrap().file, ConfigFile::default());
        assert!(log.contains("WARN config:"));
        assert!(log.contains("config_parse_failed_using_defaults"));
    }

    #[test]
    fn clamping_logs_under_config_target() {
        let tmp = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(tmp.path(), "[editor]\ntab_stop = 0\nundo_capacity = 0\n").unwrap();
        let mut cfg = None;
        let log = capture(|| {
            cfg = Some(load_from(Some(tmp.path().to_path_buf())).unwrap());
        });
        let cfg = cfg.unwrap();
        assert_eq!(cfg.file.editor.tab_stop, 1);
        assert_eq!(cfg.file.editor.undo_capacity, 1);
        assert!(log.contains("INFO config:"));
        assert!(log.contains("tab_stop_clamped"));
        assert!(log.contains("undo_capacity_clamped"));
    }
}
