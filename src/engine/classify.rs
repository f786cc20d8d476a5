//! Tap-duration classification
//!
//! A third-finger tap shorter than [`DOT_THRESHOLD`] is a dot; everything
//! longer is a dash. [`DASH_THRESHOLD`] marks where a "very long" tap
//! would begin, but long taps degrade to dash rather than getting a third
//! symbol class, so classification stays two-way.

use std::fmt;
use std::time::Duration;

/// Taps shorter than this are dots.
pub const DOT_THRESHOLD: Duration = Duration::from_millis(200);

/// Upper bound of a normal dash. Taps at or past this still classify as
/// dash; the constant is kept for a potential long-press symbol class.
pub const DASH_THRESHOLD: Duration = Duration::from_millis(500);

/// One Morse symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    Dot,
    Dash,
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::Dot => '.',
            Symbol::Dash => '-',
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Classify a measured tap duration.
pub fn classify(duration: Duration) -> Symbol {
    if duration < DOT_THRESHOLD {
        Symbol::Dot
    } else {
        Symbol::Dash
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_taps_are_dots() {
        assert_eq!(classify(Duration::ZERO), Symbol::Dot);
        assert_eq!(classify(Duration::from_millis(100)), Symbol::Dot);
        assert_eq!(classify(Duration::from_millis(199)), Symbol::Dot);
    }

    #[test]
    fn test_medium_taps_are_dashes() {
        assert_eq!(classify(Duration::from_millis(200)), Symbol::Dash);
        assert_eq!(classify(Duration::from_millis(300)), Symbol::Dash);
        assert_eq!(classify(Duration::from_millis(499)), Symbol::Dash);
    }

    #[test]
    fn test_very_long_taps_degrade_to_dash() {
        assert_eq!(classify(DASH_THRESHOLD), Symbol::Dash);
        assert_eq!(classify(Duration::from_millis(500)), Symbol::Dash);
        assert_eq!(classify(Duration::from_secs(10)), Symbol::Dash);
    }

    #[test]
    fn test_symbol_chars() {
        assert_eq!(Symbol::Dot.as_char(), '.');
        assert_eq!(Symbol::Dash.as_char(), '-');
    }
}
