//! End-to-end decode flow: contact snapshots in, injected characters out,
//! with gesture suppression paused around the injection.

use std::sync::atomic::Ordering;
use std::time::{Duration, Instant};

use morsepad::engine::{contact::snapshot, EngineEvent, MorseEngine};
use morsepad::inject::Injector;
use morsepad::platform::sim::{SimBackend, SimHook};
use morsepad::platform::{KeyEvent, VirtualKey};
use morsepad::suppress::GestureSuppressor;

/// Rest two fingers, hold a third for `ms`, lift it again.
fn tap(engine: &mut MorseEngine, start: Instant, ms: u64) -> Instant {
    engine.observe_at(&snapshot(&[1, 2]), start);
    engine.observe_at(&snapshot(&[1, 2, 3]), start);
    let end = start + Duration::from_millis(ms);
    engine.observe_at(&snapshot(&[1, 2]), end);
    end
}

#[test]
fn test_three_short_taps_type_s() {
    let (tx, rx) = flume::unbounded();
    let mut engine = MorseEngine::new(tx);
    engine.set_enabled(true);

    let mut t = Instant::now();
    for _ in 0..3 {
        t = tap(&mut engine, t, 100) + Duration::from_millis(300);
    }

    let resolved = engine.on_sequence_timeout();
    assert_eq!(resolved, Some('S'));

    let hook = SimHook::new();
    let installed = hook.installed_flag();
    let mut suppressor = GestureSuppressor::new(hook);
    suppressor.set_enabled(true);

    let mut injector = Injector::new(SimBackend::new());
    {
        let _pause = suppressor.pause();
        assert!(!installed.load(Ordering::SeqCst));
        injector.inject(resolved.unwrap());
    }
    // Unconditionally re-enabled after the injection.
    assert!(suppressor.is_enabled());
    assert!(installed.load(Ordering::SeqCst));

    assert_eq!(
        injector.backend().sent,
        vec![
            KeyEvent::Down(VirtualKey(0x53)),
            KeyEvent::Up(VirtualKey(0x53)),
        ]
    );

    let events: Vec<_> = rx.drain().collect();
    assert!(events.contains(&EngineEvent::CharacterTyped('S')));
    assert_eq!(
        events.last(),
        Some(&EngineEvent::SequenceChanged(String::new()))
    );
}

#[test]
fn test_characters_resolve_one_pause_at_a_time() {
    let (tx, _rx) = flume::unbounded();
    let mut engine = MorseEngine::new(tx);
    engine.set_enabled(true);
    let mut injector = Injector::new(SimBackend::new());

    // H = ....
    let mut t = Instant::now();
    for _ in 0..4 {
        t = tap(&mut engine, t, 80) + Duration::from_millis(250);
    }
    if let Some(ch) = engine.on_sequence_timeout() {
        injector.inject(ch);
    }

    // I = ..
    for _ in 0..2 {
        t = tap(&mut engine, t, 80) + Duration::from_millis(250);
    }
    if let Some(ch) = engine.on_sequence_timeout() {
        injector.inject(ch);
    }

    assert_eq!(
        injector.backend().sent,
        vec![
            KeyEvent::Down(VirtualKey(0x48)),
            KeyEvent::Up(VirtualKey(0x48)),
            KeyEvent::Down(VirtualKey(0x49)),
            KeyEvent::Up(VirtualKey(0x49)),
        ]
    );
}

#[test]
fn test_sos_keyed_without_letter_gaps_is_dropped() {
    let (tx, rx) = flume::unbounded();
    let mut engine = MorseEngine::new(tx);
    engine.set_enabled(true);
    let mut injector = Injector::new(SimBackend::new());

    let mut t = Instant::now();
    for ms in [80, 80, 80, 300, 300, 300, 80, 80, 80] {
        t = tap(&mut engine, t, ms) + Duration::from_millis(250);
    }
    assert_eq!(engine.current_sequence(), "...---...");

    // Not a single character; discarded without error.
    if let Some(ch) = engine.on_sequence_timeout() {
        injector.inject(ch);
    }

    assert!(injector.backend().sent.is_empty());
    assert!(injector.backend().posted.is_empty());
    assert_eq!(engine.current_sequence(), "");

    let events: Vec<_> = rx.drain().collect();
    assert!(!events
        .iter()
        .any(|e| matches!(e, EngineEvent::CharacterTyped(_))));
}
