//! Platform capability boundary
//!
//! The OS facilities the core consumes (low-level pointer hook, synthetic
//! keyboard input, direct message post) live behind these traits so the
//! decoding and classification logic stays pure and unit-testable without
//! a live device or synthetic-input privileges. One implementation per
//! target OS, plus a recording backend for tests and demos.

pub mod sim;
#[cfg(windows)]
pub mod windows;

use std::sync::Arc;

use crate::suppress::ClickFilter;

/// A keyboard-layout-independent virtual key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VirtualKey(pub u16);

impl VirtualKey {
    /// A-Z virtual keys share the uppercase ASCII codes; anything else has
    /// no layout-independent key.
    pub fn from_letter(ch: char) -> Option<Self> {
        let upper = ch.to_ascii_uppercase();
        upper.is_ascii_uppercase().then(|| Self(upper as u16))
    }
}

/// One record for the synthetic-input facility.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyEvent {
    Down(VirtualKey),
    Up(VirtualKey),
    /// A single Unicode character event, layout-independent.
    Unicode(char),
}

/// OS synthetic-input facility. `send` queues the batch and reports how
/// many records were accepted; any shortfall means the batch failed.
pub trait SyntheticInput {
    fn send(&mut self, batch: &[KeyEvent]) -> usize;
}

/// OS message-post facility: deliver a character message to the focused
/// control of the foreground application. No delivery confirmation; the
/// return value only reports whether the post was accepted.
pub trait MessagePost {
    fn post_char_to_focus(&mut self, ch: char) -> bool;
}

/// OS low-level pointer hook facility.
pub trait PointerHook {
    /// Install the hook; its callback consults `filter` for verdicts.
    /// Returns false when the OS denies the hook.
    fn install(&mut self, filter: Arc<ClickFilter>) -> bool;
    fn uninstall(&mut self);
}
