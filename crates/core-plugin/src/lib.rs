//! Extension seams: lifecycle hooks and insert-mode completion.
//!
//! The dispatcher fires a [`Hook`] at four points (file open, char insert,
//! mode change, save) through a [`PluginHost`]. Hook failures are reported
//! back as errors; the caller logs them and carries on, so a misbehaving
//! plugin can never abort an edit.
//!
//! Completion is a separate, pure collaborator: given the word prefix left of
//! the cursor and the document, return candidate words.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use core_state::Mode;
use core_text::{Position, RowStore};

/// Lifecycle events delivered to plugins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Hook {
    Open { path: PathBuf },
    CharInsert { ch: char, at: Position },
    ModeChange { from: Mode, to: Mode },
    Save { path: PathBuf },
}

impl Hook {
    /// Stable hook name used by plugin manifests and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Hook::Open { .. } => "on_open",
            Hook::CharInsert { .. } => "on_char_insert",
            Hook::ModeChange { .. } => "on_mode_change",
            Hook::Save { .. } => "on_save",
        }
    }

    pub fn open(path: &Path) -> Self {
        Hook::Open {
            path: path.to_path_buf(),
        }
    }

    pub fn save(path: &Path) -> Self {
        Hook::Save {
            path: path.to_path_buf(),
        }
    }
}

/// A collection of plugins receiving hooks.
pub trait PluginHost: Send {
    /// Stable human-readable host identifier (for logs / diagnostics).
    fn name(&self) -> &'static str;
    /// Discover and load plugins. Must be idempotent.
    fn load_all(&mut self) -> anyhow::Result<()>;
    /// Deliver one hook to every loaded plugin.
    fn on_hook(&mut self, hook: &Hook) -> anyhow::Result<()>;
}

impl<T: PluginHost + ?Sized> PluginHost for &mut T {
    fn name(&self) -> &'static str {
        (**self).name()
    }
    fn load_all(&mut self) -> anyhow::Result<()> {
        (**self).load_all()
    }
    fn on_hook(&mut self, hook: &Hook) -> anyhow::Result<()> {
        (**self).on_hook(hook)
    }
}

/// Host with no plugins.
#[derive(Debug, Default)]
pub struct NoopPluginHost;

impl PluginHost for NoopPluginHost {
    fn name(&self) -> &'static str {
        "noop-plugin-host"
    }
    fn load_all(&mut self) -> anyhow::Result<()> {
        Ok(())
    }
    fn on_hook(&mut self, hook: &Hook) -> anyhow::Result<()> {
        tracing::trace!(target: "plugin", hook = hook.name(), "hook_ignored");
        Ok(())
    }
}

/// Source of completion candidates for the word left of the cursor.
pub trait CompletionSource: Send {
    /// Candidates that start with `prefix` and are longer than it, best first.
    fn candidates(&self, prefix: &str, rows: &RowStore) -> Vec<String>;
}

/// Completes from words already present in the document, sorted.
#[derive(Debug, Default)]
pub struct WordCompletion;

pub fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

impl CompletionSource for WordCompletion {
    fn candidates(&self, prefix: &str, rows: &RowStore) -> Vec<String> {
        if prefix.is_empty() {
            return Vec::new();
        }
        let mut words = BTreeSet::new();
        for row in rows.rows() {
            for word in row.raw().split(|c: char| !is_word_char(c)) {
                if word.len() > prefix.len() && word.starts_with(prefix) {
                    words.insert(word.to_owned());
                }
            }
        }
        words.into_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn noop_host_accepts_everything() {
        let mut host = NoopPluginHost;
        assert_eq!(host.name(), "noop-plugin-host");
        host.load_all().unwrap();
        host.on_hook(&Hook::save(Path::new("a.txt"))).unwrap();
    }

    #[test]
    fn hook_names() {
        let hook = Hook::ModeChange {
            from: Mode::Normal,
            to: Mode::Insert,
        };
        assert_eq!(hook.name(), "on_mode_change");
        assert_eq!(Hook::open(Path::new("x")).name(), "on_open");
    }

    #[test]
    fn word_completion_is_sorted_and_deduplicated() {
        let rows = RowStore::from_lines(["let value = valid;", "value_of(v) + val"], 4);
        let got = WordCompletion.candidates("val", &rows);
        assert_eq!(got, vec!["valid", "value", "value_of"]);
        assert!(WordCompletion.candidates("", &rows).is_empty());
    }
}
