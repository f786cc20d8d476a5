//! Morse decoding engine
//!
//! Consumes contact snapshots from the raw-input collaborator, tracks the
//! two-fingers-resting / third-finger-tapping state, classifies tap
//! durations into symbols, and resolves the accumulated sequence to a
//! character once input pauses.
//!
//! The engine is single-context: all observations, timer firings, and
//! resolutions happen on the dispatch loop that owns it. Timers are
//! expressed as deadlines the owner polls and fires back into the engine,
//! so re-arming atomically replaces the previous deadline.

pub mod classify;
pub mod contact;

use std::collections::HashSet;
use std::time::{Duration, Instant};

pub use classify::{classify, Symbol, DASH_THRESHOLD, DOT_THRESHOLD};
pub use contact::Contact;

use crate::symbols::SymbolTable;

/// Inactivity gap after the last tap before the sequence resolves.
pub const SEQUENCE_TIMEOUT: Duration = Duration::from_millis(1500);

/// Cadence of the feedback tick that runs while a tap is held.
pub const TAP_FEEDBACK_INTERVAL: Duration = Duration::from_millis(50);

/// Notifications delivered to the shell, in order, exactly once each.
///
/// A `SequenceChanged` with empty text always follows the `CharacterTyped`
/// for the same resolution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// The pending sequence changed; empty text means it was cleared.
    SequenceChanged(String),
    /// A sequence resolved to this character.
    CharacterTyped(char),
}

pub struct MorseEngine {
    enabled: bool,
    last_contact_count: usize,
    /// Start of the in-flight tap, present iff a third finger is down.
    tap_started_at: Option<Instant>,
    /// The two resting fingers' ids. Descriptive only; never consulted to
    /// validate that a tap kept the same base fingers.
    base_contacts: HashSet<u32>,
    sequence: String,
    table: SymbolTable,
    events: flume::Sender<EngineEvent>,
    sequence_deadline: Option<Instant>,
    feedback_deadline: Option<Instant>,
    verbose: bool,
}

impl MorseEngine {
    pub fn new(events: flume::Sender<EngineEvent>) -> Self {
        Self {
            enabled: false,
            last_contact_count: 0,
            tap_started_at: None,
            base_contacts: HashSet::new(),
            sequence: String::new(),
            table: SymbolTable::new(),
            events,
            sequence_deadline: None,
            feedback_deadline: None,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Enable or disable decoding. Disabling forces a full reset.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
        if !enabled {
            self.reset();
        }
    }

    /// Process one raw-input event. An empty slice is an explicit
    /// "no contacts" notification, not a missing event.
    pub fn observe(&mut self, contacts: &[Contact]) {
        self.observe_at(contacts, Instant::now());
    }

    pub fn observe_at(&mut self, contacts: &[Contact], now: Instant) {
        if !self.enabled {
            return;
        }

        let count = contacts.len();

        if count == 3 && self.last_contact_count == 2 && self.tap_started_at.is_none() {
            self.start_tap(now);
        } else if count == 2 && self.last_contact_count == 3 && self.tap_started_at.is_some() {
            self.end_tap(now);
        } else if count == 2 && self.tap_started_at.is_none() {
            self.refresh_base_contacts(contacts);
        } else if count == 0 {
            self.reset();
        }

        self.last_contact_count = count;
    }

    /// The pending sequence's inactivity deadline, if one is armed.
    pub fn sequence_deadline(&self) -> Option<Instant> {
        self.sequence_deadline
    }

    /// The next feedback tick, armed only while a tap is held.
    pub fn feedback_deadline(&self) -> Option<Instant> {
        self.feedback_deadline
    }

    pub fn current_sequence(&self) -> &str {
        &self.sequence
    }

    /// Ids of the resting fingers recorded at the last two-contact event.
    pub fn base_contacts(&self) -> &HashSet<u32> {
        &self.base_contacts
    }

    /// Resolve the pending sequence. Called by the owner when the
    /// sequence deadline fires; returns the decoded character so the
    /// owner can hand it to the injector. Unrecognized sequences are
    /// silently discarded.
    pub fn on_sequence_timeout(&mut self) -> Option<char> {
        self.sequence_deadline = None;

        let resolved = if self.sequence.is_empty() {
            None
        } else {
            self.table.lookup(&self.sequence)
        };

        match resolved {
            Some(ch) => {
                if self.verbose {
                    eprintln!("[MORSE] {} -> '{}'", self.sequence, ch);
                }
                let _ = self.events.send(EngineEvent::CharacterTyped(ch));
            }
            None if self.verbose && !self.sequence.is_empty() => {
                eprintln!("[MORSE] {} -> no match, discarded", self.sequence);
            }
            None => {}
        }

        self.sequence.clear();
        let _ = self.events.send(EngineEvent::SequenceChanged(String::new()));
        resolved
    }

    /// Feedback tick while a tap is held. Reserved as a hook point for
    /// live duration display; re-arms itself until the tap ends.
    pub fn on_tap_feedback(&mut self, now: Instant) {
        if self.tap_started_at.is_some() {
            self.feedback_deadline = Some(now + TAP_FEEDBACK_INTERVAL);
        } else {
            self.feedback_deadline = None;
        }
    }

    fn start_tap(&mut self, now: Instant) {
        self.tap_started_at = Some(now);
        self.feedback_deadline = Some(now + TAP_FEEDBACK_INTERVAL);
    }

    fn end_tap(&mut self, now: Instant) {
        let Some(started_at) = self.tap_started_at.take() else {
            return;
        };
        self.feedback_deadline = None;

        let duration = now.saturating_duration_since(started_at);
        let symbol = classify(duration);
        self.sequence.push(symbol.as_char());

        if self.verbose {
            eprintln!(
                "[MORSE] tap {}ms -> {} (sequence: {})",
                duration.as_millis(),
                symbol,
                self.sequence
            );
        }

        let _ = self
            .events
            .send(EngineEvent::SequenceChanged(self.sequence.clone()));

        // Restart, never stack: a new tap pushes the whole deadline out.
        self.sequence_deadline = Some(now + SEQUENCE_TIMEOUT);
    }

    fn refresh_base_contacts(&mut self, contacts: &[Contact]) {
        self.base_contacts.clear();
        self.base_contacts.extend(contacts.iter().map(|c| c.id));
    }

    fn reset(&mut self) {
        self.tap_started_at = None;
        self.sequence_deadline = None;
        self.feedback_deadline = None;
        self.sequence.clear();
        self.base_contacts.clear();
        self.last_contact_count = 0;
        let _ = self.events.send(EngineEvent::SequenceChanged(String::new()));
    }
}
