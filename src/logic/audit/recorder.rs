//! Audit Recorder
//!
//! Append-only JSONL writer, one event per line, flushed per event so a
//! crash loses at most the event being written. Rotates by size.

use std::fs::{File, OpenOptions};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{Datelike, Timelike, Utc};
use parking_lot::Mutex;

use super::event::PipelineEvent;

/// Maximum file size before rotation (10 MB)
const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Log file name prefix
const LOG_PREFIX: &str = "pipeline";

/// Log file extension
const LOG_EXT: &str = ".jsonl";

struct LogFile {
    writer: BufWriter<File>,
    path: PathBuf,
    size: u64,
}

/// Owned handle to an audit log directory. Cheap to share by reference;
/// writes are serialized internally.
pub struct AuditLog {
    base_dir: PathBuf,
    state: Mutex<LogFile>,
}

impl AuditLog {
    /// Open (creating if needed) an audit log in `base_dir`
    pub fn open(base_dir: impl Into<PathBuf>) -> io::Result<Self> {
        let base_dir = base_dir.into();
        std::fs::create_dir_all(&base_dir)?;
        let state = Self::open_new_file(&base_dir)?;
        Ok(Self { base_dir, state: Mutex::new(state) })
    }

    fn open_new_file(base_dir: &Path) -> io::Result<LogFile> {
        let now = Utc::now();
        let filename = format!(
            "{}_{}{:02}{:02}_{:02}{:02}{:02}{}",
            LOG_PREFIX,
            now.year(),
            now.month(),
            now.day(),
            now.hour(),
            now.minute(),
            now.second(),
            LOG_EXT
        );
        let path = base_dir.join(filename);
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        log::info!("opened audit log {:?}", path);
        Ok(LogFile { writer: BufWriter::new(file), path, size: 0 })
    }

    /// Record an event. Failures are logged and swallowed; the audit
    /// trail must never take the pipeline down with it.
    pub fn record(&self, event: &PipelineEvent) {
        if let Err(e) = self.try_record(event) {
            log::error!("failed to record audit event: {}", e);
        }
    }

    pub fn try_record(&self, event: &PipelineEvent) -> io::Result<()> {
        let line = event.to_jsonl();
        let bytes = line.as_bytes();

        let mut state = self.state.lock();
        if state.size + bytes.len() as u64 > MAX_FILE_SIZE {
            state.writer.flush()?;
            let fresh = Self::open_new_file(&self.base_dir)?;
            let old = std::mem::replace(&mut *state, fresh);
            log::info!("rotated audit log from {:?}", old.path);
        }

        state.writer.write_all(bytes)?;
        state.writer.write_all(b"\n")?;
        state.size += bytes.len() as u64 + 1;
        state.writer.flush()
    }

    /// Path of the file currently being written
    pub fn current_file(&self) -> PathBuf {
        self.state.lock().path.clone()
    }
}

/// Read all events back from one log file, skipping unparseable lines
pub fn read_events(path: &Path) -> io::Result<Vec<PipelineEvent>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let mut events = Vec::new();
    for line in reader.lines() {
        let line = line?;
        if line.is_empty() {
            continue;
        }
        match serde_json::from_str::<PipelineEvent>(&line) {
            Ok(event) => events.push(event),
            Err(e) => log::warn!("skipping unparseable audit line: {}", e),
        }
    }
    Ok(events)
}

// ============================================================================
// TESTS
// ============================================================================
