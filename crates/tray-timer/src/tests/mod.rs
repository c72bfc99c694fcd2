
use std::{env, path::PathBuf};

use uuid::Uuid;

/// Unique scratch directory under the system temp dir. Not created.
pub(crate) fn temp_dir(name: &str) -> PathBuf {
    env::temp_dir().join(format!("tray-timer-{}-{}", name, Uuid::new_v4()))
}
