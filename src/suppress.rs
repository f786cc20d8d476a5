//! Gesture suppression
//!
//! While Morse mode is active, the touch surface's native gesture layer
//! turns tap flurries into double/triple clicks. A system-wide low-level
//! pointer hook discards the rapid repeats: the shared [`ClickFilter`]
//! classifies primary-button-down events, and [`GestureSuppressor`] owns
//! the hook lifecycle around it.
//!
//! The filter is shared between the hook callback context and the toggle
//! call-sites, so its whole state is atomics. Toggling is the only
//! mutation path from outside the hook callback.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::platform::PointerHook;

/// Window in which repeated primary-button-downs count as one gesture.
pub const DOUBLE_CLICK_WINDOW: Duration = Duration::from_millis(500);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Pass the event to the next hook in the chain.
    Forward,
    /// Report the event handled so it never reaches the application.
    Suppress,
}

fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_millis() as u64
}

/// Click classification state, lock-free for the hook callback.
#[derive(Debug)]
pub struct ClickFilter {
    enabled: AtomicBool,
    last_click_ms: AtomicU64,
    clicks: AtomicU32,
}

impl ClickFilter {
    pub fn new() -> Self {
        Self {
            enabled: AtomicBool::new(false),
            last_click_ms: AtomicU64::new(0),
            clicks: AtomicU32::new(0),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::SeqCst)
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::SeqCst);
    }

    /// Classify a primary-button-down event happening now.
    pub fn on_button_down(&self) -> Verdict {
        self.on_button_down_at(now_ms())
    }

    pub fn on_button_down_at(&self, now_ms: u64) -> Verdict {
        if !self.is_enabled() {
            return Verdict::Forward;
        }

        let last = self.last_click_ms.load(Ordering::SeqCst);
        if now_ms.saturating_sub(last) <= DOUBLE_CLICK_WINDOW.as_millis() as u64 {
            let clicks = self.clicks.fetch_add(1, Ordering::SeqCst) + 1;
            if clicks >= 2 {
                // Suppressed events do not refresh the click timestamp, so
                // the window keeps measuring from the last forwarded click.
                return Verdict::Suppress;
            }
        } else {
            self.clicks.store(1, Ordering::SeqCst);
        }

        self.last_click_ms.store(now_ms, Ordering::SeqCst);
        Verdict::Forward
    }

    /// A directly-delivered double-click message is swallowed outright
    /// while enabled.
    pub fn on_double_click(&self) -> Verdict {
        if self.is_enabled() {
            Verdict::Suppress
        } else {
            Verdict::Forward
        }
    }
}

impl Default for ClickFilter {
    fn default() -> Self {
        Self::new()
    }
}

/// Hook lifecycle around a shared [`ClickFilter`]. Enabled means the hook
/// is installed and the filter is intercepting; toggling is idempotent.
pub struct GestureSuppressor<H: PointerHook> {
    filter: Arc<ClickFilter>,
    hook: H,
    installed: bool,
}

impl<H: PointerHook> GestureSuppressor<H> {
    pub fn new(hook: H) -> Self {
        Self {
            filter: Arc::new(ClickFilter::new()),
            hook,
            installed: false,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.filter.is_enabled()
    }

    pub fn filter(&self) -> Arc<ClickFilter> {
        Arc::clone(&self.filter)
    }

    /// Enable or disable suppression. A failed hook install leaves
    /// suppression disabled; it is never an error.
    pub fn set_enabled(&mut self, enabled: bool) {
        if enabled == self.is_enabled() {
            return;
        }
        if enabled {
            if !self.installed {
                if !self.hook.install(Arc::clone(&self.filter)) {
                    return;
                }
                self.installed = true;
            }
            self.filter.set_enabled(true);
        } else {
            self.filter.set_enabled(false);
            if self.installed {
                self.hook.uninstall();
                self.installed = false;
            }
        }
    }

    /// Disable for the duration of a character injection so the injected
    /// event is not mistaken for a touch-originated click. The guard
    /// restores the previous state when dropped, success or failure.
    pub fn pause(&mut self) -> SuppressorPause<'_, H> {
        let resume = self.is_enabled();
        if resume {
            self.set_enabled(false);
        }
        SuppressorPause {
            suppressor: self,
            resume,
        }
    }
}

pub struct SuppressorPause<'a, H: PointerHook> {
    suppressor: &'a mut GestureSuppressor<H>,
    resume: bool,
}

impl<H: PointerHook> Drop for SuppressorPause<'_, H> {
    fn drop(&mut self) {
        if self.resume {
            self.suppressor.set_enabled(true);
        }
    }
}
