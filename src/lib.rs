//! morsepad — type with Morse code from a multi-touch surface
//!
//! Rest two fingers on the touchpad and tap a third: short taps are dots,
//! long taps are dashes. Pause, and the accumulated sequence resolves to a
//! character that is injected into whichever application has focus.
//!
//! The crate is the decoding core plus its OS seams. Raw-input
//! registration and parsing belong to an external collaborator that feeds
//! [`engine::MorseEngine::observe`] with contact snapshots; the binary in
//! `main.rs` is the thin shell that owns the dispatch loop.

pub mod config;
pub mod engine;
pub mod inject;
pub mod platform;
pub mod suppress;
pub mod symbols;
