//! Recording backend for tests and platforms without a native one
//!
//! `SimBackend` records every synthetic-input batch and posted character
//! instead of touching the OS; failure modes are switchable so the
//! injector's fallback chain can be exercised.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use super::{KeyEvent, MessagePost, PointerHook, SyntheticInput};
use crate::suppress::ClickFilter;

#[derive(Debug, Default)]
pub struct SimBackend {
    pub sent: Vec<KeyEvent>,
    pub posted: Vec<char>,
    /// Report zero queued records from `send`.
    pub fail_synthetic: bool,
    /// Reject every message post.
    pub fail_post: bool,
}

impl SimBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SyntheticInput for SimBackend {
    fn send(&mut self, batch: &[KeyEvent]) -> usize {
        if self.fail_synthetic {
            return 0;
        }
        self.sent.extend_from_slice(batch);
        batch.len()
    }
}

impl MessagePost for SimBackend {
    fn post_char_to_focus(&mut self, ch: char) -> bool {
        if self.fail_post {
            return false;
        }
        self.posted.push(ch);
        true
    }
}

/// Hook stand-in: tracks installation through a shared flag and can be
/// told to deny installation like an OS would.
pub struct SimHook {
    deny: bool,
    installed: Arc<AtomicBool>,
}

impl SimHook {
    pub fn new() -> Self {
        Self {
            deny: false,
            installed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// A hook the OS refuses to install.
    pub fn denying() -> Self {
        Self {
            deny: true,
            installed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn installed_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.installed)
    }
}

impl Default for SimHook {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerHook for SimHook {
    fn install(&mut self, _filter: Arc<ClickFilter>) -> bool {
        if self.deny {
            return false;
        }
        self.installed.store(true, Ordering::SeqCst);
        true
    }

    fn uninstall(&mut self) {
        self.installed.store(false, Ordering::SeqCst);
    }
}
