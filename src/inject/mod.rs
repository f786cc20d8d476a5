//! Character injection
//!
//! Delivers a decoded character to whichever application has focus, as if
//! typed. Strategies are tried in order until one succeeds: a virtual-key
//! down/up pair (letters only, layout-independent and the most reliable),
//! a Unicode synthetic-input event (any character), and finally a
//! character message posted straight to the focused control. Injection is
//! best-effort: when every strategy fails the character is dropped and
//! nothing surfaces to the decoding engine.

use std::fmt;
use std::thread;
use std::time::Duration;

use crate::platform::{KeyEvent, MessagePost, SyntheticInput, VirtualKey};

/// Settle time around each synthetic event, tolerating OS input-queue
/// timing.
const SETTLE: Duration = Duration::from_millis(10);

#[derive(Debug)]
pub enum InjectError {
    /// The strategy does not handle this character at all.
    NotApplicable,
    SyntheticInput(String),
    MessagePost(String),
}

impl fmt::Display for InjectError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectError::NotApplicable => write!(f, "strategy not applicable"),
            InjectError::SyntheticInput(msg) => write!(f, "synthetic input: {}", msg),
            InjectError::MessagePost(msg) => write!(f, "message post: {}", msg),
        }
    }
}

impl std::error::Error for InjectError {}

/// Ordered-strategy character injector over a platform backend.
pub struct Injector<B> {
    backend: B,
    verbose: bool,
}

impl<B: SyntheticInput + MessagePost> Injector<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Inject one character, best-effort.
    pub fn inject(&mut self, ch: char) {
        match self.try_virtual_key(ch) {
            Ok(()) => {
                if self.verbose {
                    eprintln!("[INJECT] '{}' via virtual key", ch);
                }
                return;
            }
            Err(InjectError::NotApplicable) => {}
            Err(err) => {
                if self.verbose {
                    eprintln!("[INJECT] virtual key failed: {}", err);
                }
            }
        }

        match self.try_unicode(ch) {
            Ok(()) => {
                if self.verbose {
                    eprintln!("[INJECT] '{}' via unicode input", ch);
                }
                return;
            }
            Err(err) => {
                if self.verbose {
                    eprintln!("[INJECT] unicode input failed: {}", err);
                }
            }
        }

        match self.try_message_post(ch) {
            Ok(()) => {
                if self.verbose {
                    eprintln!("[INJECT] '{}' via message post", ch);
                }
            }
            Err(err) => {
                if self.verbose {
                    eprintln!("[INJECT] message post failed: {}", err);
                }
                eprintln!("[INJECT] '{}' dropped: all strategies failed", ch);
            }
        }
    }

    fn try_virtual_key(&mut self, ch: char) -> Result<(), InjectError> {
        let vk = VirtualKey::from_letter(ch).ok_or(InjectError::NotApplicable)?;
        let batch = [KeyEvent::Down(vk), KeyEvent::Up(vk)];
        let queued = self.settled(|backend| backend.send(&batch));
        if queued == batch.len() {
            Ok(())
        } else {
            Err(InjectError::SyntheticInput(format!(
                "queued {} of {} records",
                queued,
                batch.len()
            )))
        }
    }

    fn try_unicode(&mut self, ch: char) -> Result<(), InjectError> {
        let batch = [KeyEvent::Unicode(ch)];
        let queued = self.settled(|backend| backend.send(&batch));
        if queued == batch.len() {
            Ok(())
        } else {
            Err(InjectError::SyntheticInput(format!(
                "queued {} of {} records",
                queued,
                batch.len()
            )))
        }
    }

    fn try_message_post(&mut self, ch: char) -> Result<(), InjectError> {
        if self.settled(|backend| backend.post_char_to_focus(ch)) {
            Ok(())
        } else {
            Err(InjectError::MessagePost("post rejected".into()))
        }
    }

    fn settled<R>(&mut self, attempt: impl FnOnce(&mut B) -> R) -> R {
        thread::sleep(SETTLE);
        let result = attempt(&mut self.backend);
        thread::sleep(SETTLE);
        result
    }
}
