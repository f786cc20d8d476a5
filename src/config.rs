use serde::Deserialize;
use std::fs;
use std::path::Path;

/// Shell configuration, read from `morsepad.toml` in the working
/// directory.
///
/// Morse timing is deliberately not configurable; the thresholds live as
/// constants beside the classifier.
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Start with decoding enabled instead of waiting for a toggle.
    #[serde(default)]
    pub start_enabled: bool,
    /// Install the pointer hook while decoding is enabled.
    #[serde(default = "default_suppress_gestures")]
    pub suppress_gestures: bool,
    /// Log classification and injection decisions to stderr.
    #[serde(default)]
    pub verbose: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_enabled: false,
            suppress_gestures: default_suppress_gestures(),
            verbose: false,
        }
    }
}

fn default_suppress_gestures() -> bool {
    true
}

impl Config {
    pub fn load() -> Self {
        let path = Path::new("morsepad.toml");
        if path.exists() {
            fs::read_to_string(path)
                .ok()
                .and_then(|s| toml::from_str(&s).ok())
                .unwrap_or_default()
        } else {
            Config::default()
        }
    }
}
