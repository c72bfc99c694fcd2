use crate::{CoreResult, audio::SessionId};

use std::{
    fmt,
    path::Path,
    sync::{Arc, mpsc},
    time::Duration,
};

/// Wakes the host loop after an open completes. May run on any thread.
pub type WakeFn = Arc<dyn Fn() + Send + Sync>;

pub(crate) struct OpenedSound<H> {
    pub(crate) session: SessionId,
    pub(crate) result: CoreResult<H>,
}

/// Completion slot for one [`AudioBackend::open`] request.
///
/// Can be moved to a worker thread whenever the handle type is `Send`.
pub struct OpenReply<H> {
    session: SessionId,
    sender: mpsc::Sender<OpenedSound<H>>,
    wake: WakeFn,
}

impl<H> OpenReply<H> {
    pub(crate) fn new(session: SessionId, sender: mpsc::Sender<OpenedSound<H>>, wake: WakeFn) -> Self {
        Self {
            session,
            sender,
            wake,
        }
    }

    /// Session the request was made for.
    pub fn session(&self) -> SessionId {
        self.session
    }

    /// Deliver the outcome and wake the host loop.
    ///
    /// The engine picks it up on its next [`crate::PlaybackEngine::poll_opened`];
    /// a handle for a session that was stopped or replaced meanwhile is dropped there.
    pub fn send(self, result: CoreResult<H>) {
        let _ = self.sender.send(OpenedSound {
            session: self.session,
            result,
        });
        (self.wake)();
    }
}

impl<H> fmt::Debug for OpenReply<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenReply")
            .field("session", &self.session)
            .finish_non_exhaustive()
    }
}

/// Platform audio output facility.
pub trait AudioBackend {
    /// Live output for one session.
    type Handle: PlaybackHandle;

    /// Open and decode `path` onto the output device, paused.
    ///
    /// Must not block on file or device I/O. The outcome goes to `reply`,
    /// either before returning or later from another thread. Failures are
    /// [`crate::ReminderError::AudioOpenFailure`] for missing or undecodable
    /// files and [`crate::ReminderError::AudioDevice`] when no output device
    /// is available.
    fn open(&mut self, path: &Path, reply: OpenReply<Self::Handle>);
}

/// An opened sound bound to an output device.
///
/// Dropping the handle releases the file and halts its output.
pub trait PlaybackHandle {
    /// Natural length of the sound, when the decoder can tell.
    fn duration(&self) -> Option<Duration>;

    /// Set linear output volume in `[0.0, 1.0]`.
    fn set_volume(&mut self, volume: f32);

    /// Start or resume output.
    fn play(&mut self);

    /// Whether the device ran out of samples.
    fn is_finished(&self) -> bool;

    /// Halt output immediately. Safe to call more than once.
    fn stop(&mut self);
}
