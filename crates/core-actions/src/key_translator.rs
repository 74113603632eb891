//! KeyTranslator: numeric count and two-key prefix accumulation.
//!
//! State (minimal):
//! * `pending_count`: digits typed before a command. A leading `0` is not a
//!   count; it passes through as the line-start motion.
//! * `pending_prefix`: the first key of a recognized two-key sequence
//!   (`gg`, `dd`, `yy`). The next key either completes the sequence or
//!   cancels it; a cancelling key is swallowed, not reprocessed.
//!
//! Counts are clamped to `max_count` so a runaway prefix cannot schedule
//! unbounded repeated work.

use core_events::{KeyCode, KeyEvent};
use tracing::trace;

/// Outcome of feeding one key to the translator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Translation {
    /// Key consumed into the pending count or prefix.
    Pending,
    /// Key cancelled a pending prefix and is dropped.
    Swallowed,
    /// A complete command: the final key, any count, and the completed prefix.
    Ready {
        key: KeyEvent,
        count: Option<u32>,
        prefix: Option<char>,
    },
}

#[derive(Debug)]
pub struct KeyTranslator {
    pending_count: Option<u32>,
    pending_prefix: Option<char>,
    max_count: u32,
}

impl Default for KeyTranslator {
    fn default() -> Self {
        Self::new(1000)
    }
}

impl KeyTranslator {
    pub fn new(max_count: u32) -> Self {
        Self {
            pending_count: None,
            pending_prefix: None,
            max_count: max_count.max(1),
        }
    }

    pub fn max_count(&self) -> u32 {
        self.max_count
    }

    /// Drop any pending count or prefix (mode changes).
    pub fn reset(&mut self) {
        self.pending_count = None;
        self.pending_prefix = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending_count.is_some() || self.pending_prefix.is_some()
    }

    /// Pending keys as typed, for the status bar (e.g. `3d`).
    pub fn pending_display(&self) -> String {
        let mut out = String::new();
        if let Some(n) = self.pending_count {
            out.push_str(&n.to_string());
        }
        if let Some(p) = self.pending_prefix {
            out.push(p);
        }
        out
    }

    /// Feed `key`. `prefixes` lists the keys that open a two-key sequence in
    /// the current mode; a sequence completes only when the second key
    /// repeats the first.
    pub fn translate(&mut self, key: &KeyEvent, prefixes: &[char]) -> Translation {
        if let Some(prefix) = self.pending_prefix.take() {
            let count = self.pending_count.take();
            if key.printable() == Some(prefix) {
                return Translation::Ready {
                    key: *key,
                    count,
                    prefix: Some(prefix),
                };
            }
            trace!(target: "actions.keys", prefix = %prefix, key = %key, "pending_prefix_cancelled");
            return Translation::Swallowed;
        }

        if let Some(c) = key.printable() {
            if let Some(digit) = c.to_digit(10)
                && (digit != 0 || self.pending_count.is_some())
            {
                let next = self
                    .pending_count
                    .unwrap_or(0)
                    .saturating_mul(10)
                    .saturating_add(digit)
                    .min(self.max_count);
                self.pending_count = Some(next);
                return Translation::Pending;
            }
            if prefixes.contains(&c) {
                self.pending_prefix = Some(c);
                return Translation::Pending;
            }
        }

        if key.code == KeyCode::Esc && self.pending_count.is_some() {
            // Esc only clears a dangling count
            self.pending_count = None;
            return Translation::Swallowed;
        }

        Translation::Ready {
            key: *key,
            count: self.pending_count.take(),
            prefix: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ch(c: char) -> KeyEvent {
        KeyEvent::char(c)
    }

    fn feed(t: &mut KeyTranslator, keys: &str, prefixes: &[char]) -> Translation {
        let mut last = Translation::Pending;
        for c in keys.chars() {
            last = t.translate(&ch(c), prefixes);
        }
        last
    }

    #[test]
    fn count_accumulates_then_applies() {
        let mut t = KeyTranslator::default();
        assert_eq!(t.translate(&ch('1'), &[]), Translation::Pending);
        assert_eq!(t.translate(&ch('2'), &[]), Translation::Pending);
        assert_eq!(t.pending_display(), "12");
        assert_eq!(
            t.translate(&ch('j'), &[]),
            Translation::Ready {
                key: ch('j'),
                count: Some(12),
                prefix: None
            }
        );
        assert!(!t.is_pending());
    }

    #[test]
    fn leading_zero_is_a_motion() {
        let mut t = KeyTranslator::default();
        assert!(matches!(
            t.translate(&ch('0'), &[]),
            Translation::Ready { count: None, .. }
        ));
        assert_eq!(feed(&mut t, "10", &[]), Translation::Pending);
        assert_eq!(t.pending_display(), "10");
    }

    #[test]
    fn count_is_capped() {
        let mut t = KeyTranslator::new(1000);
        let out = feed(&mut t, "99999x", &[]);
        assert!(matches!(out, Translation::Ready { count: Some(1000), .. }));
    }

    #[test]
    fn two_key_sequence_completes() {
        let mut t = KeyTranslator::default();
        let out = feed(&mut t, "3dd", &['d', 'g', 'y']);
        assert_eq!(
            out,
            Translation::Ready {
                key: ch('d'),
                count: Some(3),
                prefix: Some('d')
            }
        );
    }

    #[test]
    fn cancelling_key_is_swallowed() {
        let mut t = KeyTranslator::default();
        assert_eq!(t.translate(&ch('g'), &['g']), Translation::Pending);
        assert_eq!(t.translate(&ch('j'), &['g']), Translation::Swallowed);
        assert!(!t.is_pending());
        // the next key is handled normally again
        assert!(matches!(
            t.translate(&ch('j'), &['g']),
            Translation::Ready { prefix: None, .. }
        ));
    }

    #[test]
    fn esc_clears_dangling_count() {
        let mut t = KeyTranslator::default();
        t.translate(&ch('5'), &[]);
        assert_eq!(
            t.translate(&KeyEvent::named(KeyCode::Esc), &[]),
            Translation::Swallowed
        );
        assert!(!t.is_pending());
    }
}
