use crate::{AppError, AppResult};

use std::{
    fs::{File, TryLockError},
    io::Write,
    panic::Location,
    path::{Path, PathBuf},
};

use error_location::ErrorLocation;
use tracing::{debug, info};

const LOCK_FILE: &str = "tray-timer.lock";

/// RAII guard that holds the single-instance lock.
///
/// The lock is an exclusive advisory lock on a file in the data directory.
/// The OS releases it when the process exits, even after a crash, so a
/// stale file never blocks the next launch.
pub struct InstanceGuard {
    file: File,
    path: PathBuf,
}

impl InstanceGuard {
    /// Take the lock in `dir`, failing with [`AppError::AlreadyRunning`] if
    /// another process holds it.
    #[track_caller]
    pub(crate) fn acquire(dir: &Path) -> AppResult<Self> {
        let path = dir.join(LOCK_FILE);

        let mut file = File::options()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)?;

        match file.try_lock() {
            Ok(()) => {}
            Err(TryLockError::WouldBlock) => {
                return Err(AppError::AlreadyRunning {
                    lock_path: path,
                    location: ErrorLocation::from(Location::caller()),
                });
            }
            Err(TryLockError::Error(e)) => return Err(e.into()),
        }

        file.set_len(0)?;
        write!(file, "{}", std::process::id())?;

        info!(lock_path = ?path, "Instance lock acquired");

        Ok(Self { file, path })
    }
}

impl Drop for InstanceGuard {
    fn drop(&mut self) {
        let _ = self.file.unlock();
        debug!(lock_path = ?self.path, "Instance lock released");
    }
}
