use serde::{Deserialize, Serialize};

/// Countdown behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountdownConfig {
    /// Restart the countdown with the same duration after it expires.
    #[serde(default)]
    pub looping: bool,
}
