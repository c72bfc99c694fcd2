use crate::{
    CoreResult, ReminderError,
    audio::{AudioBackend, OpenReply, PlaybackHandle},
};

use std::{
    fs::File,
    io::BufReader,
    panic::Location,
    path::{Path, PathBuf},
    sync::mpsc,
    thread::{self, JoinHandle},
    time::Duration,
};

use error_location::ErrorLocation;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};
use tracing::{debug, error, info, warn};

const AUDIO_THREAD_NAME: &str = "tray-timer-audio";

struct OpenJob {
    path: PathBuf,
    reply: OpenReply<RodioHandle>,
}

/// [`AudioBackend`] on the default output device via `rodio`.
///
/// File, decoder and device work runs on a dedicated audio thread, so
/// [`AudioBackend::open`] returns immediately. The thread owns one output
/// stream for the backend's lifetime; it is opened on the first request
/// and retried on the next request if that fails.
#[derive(Debug, Default)]
pub struct RodioBackend {
    jobs: Option<mpsc::Sender<OpenJob>>,
    worker: Option<JoinHandle<()>>,
}

impl RodioBackend {
    /// Create the backend. The audio thread starts on the first open.
    pub fn new() -> Self {
        Self::default()
    }

    fn spawn_worker(&mut self) -> std::io::Result<mpsc::Sender<OpenJob>> {
        let (jobs, queue) = mpsc::channel();
        let worker = thread::Builder::new()
            .name(AUDIO_THREAD_NAME.to_string())
            .spawn(move || run_worker(queue))?;

        if let Some(previous) = self.worker.replace(worker) {
            let _ = previous.join();
        }
        debug!("Audio thread started");
        Ok(jobs)
    }
}

/// A decoded sound queued on the shared output stream.
pub struct RodioHandle {
    sink: Sink,
    duration: Option<Duration>,
}

impl AudioBackend for RodioBackend {
    type Handle = RodioHandle;

    fn open(&mut self, path: &Path, reply: OpenReply<RodioHandle>) {
        let mut job = OpenJob {
            path: path.to_path_buf(),
            reply,
        };

        if let Some(jobs) = self.jobs.as_ref() {
            match jobs.send(job) {
                Ok(()) => return,
                Err(mpsc::SendError(returned)) => {
                    warn!("Audio thread exited, restarting");
                    job = returned;
                }
            }
        }

        match self.spawn_worker() {
            Ok(jobs) => {
                if let Err(mpsc::SendError(job)) = jobs.send(job) {
                    job.reply.send(Err(device_error("audio thread exited".to_string())));
                }
                self.jobs = Some(jobs);
            }
            Err(e) => {
                error!(error = %e, "Failed to start audio thread");
                job.reply
                    .send(Err(device_error(format!("Failed to start audio thread: {}", e))));
            }
        }
    }
}

impl Drop for RodioBackend {
    fn drop(&mut self) {
        // Closing the queue ends the worker loop.
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            let _ = worker.join();
        }
    }
}

fn run_worker(queue: mpsc::Receiver<OpenJob>) {
    let mut output: Option<(OutputStream, OutputStreamHandle)> = None;

    for job in queue {
        let result = open_sound(&job.path, &mut output);
        if let Err(e) = &result {
            debug!(path = ?job.path, error = ?e, "Sound open failed");
        }
        job.reply.send(result);
    }

    debug!("Audio thread exiting");
}

fn open_sound(
    path: &Path,
    output: &mut Option<(OutputStream, OutputStreamHandle)>,
) -> CoreResult<RodioHandle> {
    let file = File::open(path).map_err(|e| ReminderError::AudioOpenFailure {
        path: path.to_path_buf(),
        reason: e.to_string(),
        location: ErrorLocation::from(Location::caller()),
    })?;

    let source = Decoder::new(BufReader::new(file)).map_err(|e| ReminderError::AudioOpenFailure {
        path: path.to_path_buf(),
        reason: format!("unsupported or corrupt audio: {}", e),
        location: ErrorLocation::from(Location::caller()),
    })?;
    let duration = source.total_duration();

    let stream_handle = output_handle(output)?;
    let sink = Sink::try_new(&stream_handle)
        .map_err(|e| device_error(format!("Failed to create sink: {}", e)))?;

    sink.pause();
    sink.append(source);

    info!(path = ?path, duration_ms = ?duration.map(|d| d.as_millis()), "Sound opened");

    Ok(RodioHandle { sink, duration })
}

fn output_handle(
    output: &mut Option<(OutputStream, OutputStreamHandle)>,
) -> CoreResult<OutputStreamHandle> {
    if let Some((_, handle)) = output {
        return Ok(handle.clone());
    }

    let (stream, handle) = OutputStream::try_default()
        .map_err(|e| device_error(format!("Failed to open output device: {}", e)))?;
    info!("Audio output device opened");

    *output = Some((stream, handle.clone()));
    Ok(handle)
}

#[track_caller]
fn device_error(reason: String) -> ReminderError {
    ReminderError::AudioDevice {
        reason,
        location: ErrorLocation::from(Location::caller()),
    }
}

impl PlaybackHandle for RodioHandle {
    fn duration(&self) -> Option<Duration> {
        self.duration
    }

    fn set_volume(&mut self, volume: f32) {
        self.sink.set_volume(volume);
    }

    fn play(&mut self) {
        self.sink.play();
    }

    fn is_finished(&self) -> bool {
        self.sink.empty()
    }

    fn stop(&mut self) {
        self.sink.stop();
        debug!("Sink stopped");
    }
}
