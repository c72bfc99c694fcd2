mod backend;
mod engine;
mod envelope;
mod rodio_backend;
mod settings;

pub use {
    backend::{AudioBackend, OpenReply, PlaybackHandle, WakeFn},
    engine::{CHIME_MESSAGE, FADE_INTERVAL, MONITOR_INTERVAL, PlaybackEngine, PlaybackState},
    envelope::{FADE_RAMP_MS, FadeEnvelope, clamp_volume, effective_duration_ms},
    rodio_backend::{RodioBackend, RodioHandle},
    settings::{AudioSettings, DEFAULT_MAX_DURATION_MS},
};

use std::fmt;

use uuid::Uuid;

/// Identity of one playback session, for timer routing and log correlation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(Uuid);

impl SessionId {
    pub(crate) fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}
