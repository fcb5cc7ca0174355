use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use client_logging::{client_info, client_warn};
use tempfile::NamedTempFile;
use thiserror::Error;

/// Name of the persisted entry, matching the cookie the browser front end
/// of the conversion service uses.
const COOKIE_NAME: &str = "current_task";

#[derive(Debug, Error)]
pub enum HandleError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Durable slot for the active job identifier.
///
/// At most one value at a time; `get` after a restart returns what `set`
/// wrote, unless cleared or expired first. Absence is an expected outcome,
/// so the operations are infallible; storage problems are logged and read
/// as absence.
pub trait TaskHandleStore: Send + Sync {
    fn set(&self, job_id: &str);
    fn get(&self) -> Option<String>;
    fn clear(&self);
}

type Clock = Arc<dyn Fn() -> i64 + Send + Sync>;

/// Cookie-style file store: one `current_task=...; Max-Age=...; Expires=...`
/// line. Clearing rewrites the entry already expired instead of deleting
/// the file, mirroring cookie deletion semantics.
pub struct CookieFileStore {
    path: PathBuf,
    max_age: Duration,
    now_unix: Clock,
}

impl CookieFileStore {
    pub fn new(path: PathBuf, max_age: Duration) -> Self {
        Self::with_clock(path, max_age, Arc::new(|| Utc::now().timestamp()))
    }

    /// Same store with an injected clock, for expiry tests.
    pub fn with_clock(path: PathBuf, max_age: Duration, now_unix: Clock) -> Self {
        Self {
            path,
            max_age,
            now_unix,
        }
    }

    fn write_entry(&self, value: &str, max_age_secs: i64) -> Result<(), HandleError> {
        let expires = (self.now_unix)() + max_age_secs;
        let entry = format!("{COOKIE_NAME}={value}; Max-Age={max_age_secs}; Expires={expires}\n");

        // Temp file plus rename, so a torn write can never leave a corrupt
        // handle behind.
        let dir = match self.path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(entry.as_bytes())?;
        tmp.flush()?;
        tmp.persist(&self.path).map_err(|err| HandleError::Io(err.error))?;
        Ok(())
    }

    fn read_entry(&self) -> Option<(String, i64)> {
        let content = match fs::read_to_string(&self.path) {
            Ok(text) => text,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return None,
            Err(err) => {
                client_warn!("failed to read task handle from {:?}: {err}", self.path);
                return None;
            }
        };
        parse_entry(&content)
    }
}

impl TaskHandleStore for CookieFileStore {
    fn set(&self, job_id: &str) {
        let max_age_secs = self.max_age.as_secs() as i64;
        match self.write_entry(job_id, max_age_secs) {
            Ok(()) => client_info!("stored task handle {job_id}"),
            Err(err) => client_warn!("failed to store task handle {job_id}: {err}"),
        }
    }

    fn get(&self) -> Option<String> {
        let (value, expires) = self.read_entry()?;
        if value.is_empty() || expires <= (self.now_unix)() {
            return None;
        }
        Some(value)
    }

    fn clear(&self) {
        if let Err(err) = self.write_entry("", -1) {
            client_warn!("failed to clear task handle: {err}");
        }
    }
}

fn parse_entry(content: &str) -> Option<(String, i64)> {
    let line = content.lines().next()?.trim();
    let mut value = None;
    let mut expires = None;
    for part in line.split(';') {
        let Some((key, val)) = part.trim().split_once('=') else {
            continue;
        };
        match key.trim() {
            COOKIE_NAME => value = Some(val.trim().to_string()),
            "Expires" => expires = val.trim().parse::<i64>().ok(),
            _ => {}
        }
    }
    Some((value?, expires?))
}

/// In-memory implementation, the substitute for tests and headless runs.
#[derive(Default)]
pub struct MemoryHandleStore {
    slot: Mutex<Option<String>>,
}

impl MemoryHandleStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TaskHandleStore for MemoryHandleStore {
    fn set(&self, job_id: &str) {
        *self.slot.lock().expect("handle slot") = Some(job_id.to_string());
    }

    fn get(&self) -> Option<String> {
        self.slot.lock().expect("handle slot").clone()
    }

    fn clear(&self) {
        *self.slot.lock().expect("handle slot") = None;
    }
}
