// taillight - app/watcher.rs
//
// Change detection for the selected log file.
//
// Two layers:
//   - `ChangeDetector` is the synchronous two-state machine (Idle/Watching)
//     driven by `poll()` ticks. One stat per tick; a reload is signalled at
//     most once per modification.
//   - `FollowManager` runs the detector on a background thread at a fixed
//     interval and streams `FollowProgress` messages over an mpsc channel.
//     An `Arc<AtomicBool>` cancel flag stops the thread; the sleep is split
//     into sub-intervals so cancellation is detected promptly.
//
// Single-flight: each tick performs its stat and (conditional) whole-file
// read to completion before the next tick is scheduled, so polling and
// reload never interleave. Starting a new follow stops the previous one.

use crate::core::model::FollowProgress;
use crate::platform::fs::read_lines_lossy;
use crate::util::constants::FOLLOW_CANCEL_CHECK_INTERVAL_MS;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::time::{Duration, SystemTime};

// =============================================================================
// ChangeDetector
// =============================================================================

/// Outcome of a single poll tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollOutcome {
    /// No file is being watched.
    Idle,
    /// The file's modification time did not increase; nothing to do.
    Unchanged,
    /// The modification time strictly increased; the caller should reload
    /// the full content. Reported exactly once per change.
    Modified,
    /// The file could not be stat'd (deleted, rotated away, permissions).
    /// Non-fatal: the detector keeps watching so a re-created file is
    /// picked up on a later tick.
    Missing,
}

#[derive(Debug)]
enum DetectorState {
    Idle,
    Watching {
        path: PathBuf,
        /// Last-known modification time. `None` when unknown (file was
        /// missing or just reappeared), in which case the next successful
        /// stat counts as a modification.
        last_modified: Option<SystemTime>,
    },
}

/// Two-state poll-based watcher for the selected file.
#[derive(Debug)]
pub struct ChangeDetector {
    state: DetectorState,
}

impl ChangeDetector {
    pub fn new() -> Self {
        Self {
            state: DetectorState::Idle,
        }
    }

    /// Start watching `path`, seeding the baseline from its current mtime.
    ///
    /// The caller is expected to have just loaded the file's content, so the
    /// current mtime is the already-seen state and does not trigger a
    /// reload. If the file cannot be stat'd the baseline stays unknown and
    /// the first successful stat reports `Modified`.
    pub fn open(&mut self, path: &Path) {
        let last_modified = std::fs::metadata(path).and_then(|m| m.modified()).ok();
        tracing::debug!(
            file = %path.display(),
            seeded = last_modified.is_some(),
            "Change detector: watching"
        );
        self.state = DetectorState::Watching {
            path: path.to_path_buf(),
            last_modified,
        };
    }

    /// Stop watching and return to `Idle`.
    pub fn close(&mut self) {
        self.state = DetectorState::Idle;
    }

    pub fn is_watching(&self) -> bool {
        matches!(self.state, DetectorState::Watching { .. })
    }

    /// The path currently being watched, if any.
    pub fn watched_path(&self) -> Option<&Path> {
        match &self.state {
            DetectorState::Watching { path, .. } => Some(path),
            DetectorState::Idle => None,
        }
    }

    /// One poll tick: re-stat the watched file.
    ///
    /// Reports `Modified` only when the mtime strictly increased past the
    /// stored baseline (which is then advanced, so each change is reported
    /// exactly once).
    pub fn poll(&mut self) -> PollOutcome {
        let DetectorState::Watching {
            path,
            last_modified,
        } = &mut self.state
        else {
            return PollOutcome::Idle;
        };

        match std::fs::metadata(&*path).and_then(|m| m.modified()) {
            Ok(mtime) => match *last_modified {
                Some(prev) if mtime <= prev => PollOutcome::Unchanged,
                _ => {
                    *last_modified = Some(mtime);
                    tracing::debug!(file = %path.display(), "Change detector: modified");
                    PollOutcome::Modified
                }
            },
            Err(e) => {
                tracing::debug!(file = %path.display(), error = %e, "Change detector: stat failed");
                // Drop the baseline so a re-created file reloads even if its
                // mtime is not newer than the vanished one.
                *last_modified = None;
                PollOutcome::Missing
            }
        }
    }
}

impl Default for ChangeDetector {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// FollowManager
// =============================================================================

/// Manages a follow (live reload) operation on a background thread.
///
/// The manager lives on the caller's thread and exposes a simple
/// start/stop/poll interface; progress arrives as `FollowProgress` messages.
pub struct FollowManager {
    /// Channel receiver for the consumer to poll follow progress messages.
    pub progress_rx: Option<mpsc::Receiver<FollowProgress>>,
    /// Cancel flag shared with the background thread.
    cancel_flag: Option<Arc<AtomicBool>>,
}

impl FollowManager {
    pub fn new() -> Self {
        Self {
            progress_rx: None,
            cancel_flag: None,
        }
    }

    /// Start following `path`, polling every `interval_secs` seconds.
    ///
    /// Spawns the background poll thread immediately. If a follow is already
    /// running it is stopped first, so at most one poll loop exists.
    pub fn start_follow(&mut self, path: PathBuf, interval_secs: u64) {
        self.stop_follow();

        let (tx, rx) = mpsc::channel();
        let cancel = Arc::new(AtomicBool::new(false));

        self.progress_rx = Some(rx);
        self.cancel_flag = Some(Arc::clone(&cancel));

        tracing::info!(file = %path.display(), interval_secs, "Follow started");
        std::thread::spawn(move || {
            run_follow_watcher(path, interval_secs, tx, cancel);
        });
    }

    /// Request the background thread to stop.
    ///
    /// The thread exits within `FOLLOW_CANCEL_CHECK_INTERVAL_MS` and sends
    /// `FollowProgress::Stopped` before terminating.
    pub fn stop_follow(&mut self) {
        if let Some(flag) = self.cancel_flag.take() {
            flag.store(true, Ordering::SeqCst);
        }
        self.progress_rx = None;
    }

    /// Returns `true` if a follow background thread is currently active.
    pub fn is_active(&self) -> bool {
        self.cancel_flag.is_some()
    }

    /// Drain all pending progress messages without blocking.
    pub fn poll_progress(&self) -> Vec<FollowProgress> {
        let mut messages = Vec::new();
        if let Some(ref rx) = self.progress_rx {
            while let Ok(msg) = rx.try_recv() {
                messages.push(msg);
            }
        }
        messages
    }
}

impl Default for FollowManager {
    fn default() -> Self {
        Self::new()
    }
}

// =============================================================================
// Background poll loop
// =============================================================================

/// Background poll loop: one detector tick per interval, whole-file reload
/// on change. Runs until the cancel flag is set or the receiver is dropped.
fn run_follow_watcher(
    path: PathBuf,
    interval_secs: u64,
    tx: mpsc::Sender<FollowProgress>,
    cancel: Arc<AtomicBool>,
) {
    macro_rules! send {
        ($msg:expr) => {
            if tx.send($msg).is_err() {
                // Consumer dropped the channel -- exit silently.
                return;
            }
        };
    }

    let mut detector = ChangeDetector::new();
    detector.open(&path);
    send!(FollowProgress::Started { path: path.clone() });

    // Only report Missing on the transition, not every tick.
    let mut was_missing = false;

    // Sub-divide each poll interval into cancel-check slices.
    let interval_ms = interval_secs.saturating_mul(1_000);
    let slices = (interval_ms / FOLLOW_CANCEL_CHECK_INTERVAL_MS).max(1);

    loop {
        // Interruptible sleep: check cancel flag between slices.
        for _ in 0..slices {
            std::thread::sleep(Duration::from_millis(FOLLOW_CANCEL_CHECK_INTERVAL_MS));
            if cancel.load(Ordering::SeqCst) {
                send!(FollowProgress::Stopped);
                return;
            }
        }

        match detector.poll() {
            PollOutcome::Modified => {
                was_missing = false;
                match read_lines_lossy(&path) {
                    Ok(lines) => {
                        let modified: Option<DateTime<Utc>> = std::fs::metadata(&path)
                            .ok()
                            .and_then(|m| m.modified().ok())
                            .map(DateTime::<Utc>::from);
                        tracing::debug!(
                            file = %path.display(),
                            lines = lines.len(),
                            "Follow: reloaded"
                        );
                        send!(FollowProgress::Reloaded { lines, modified });
                    }
                    Err(e) => {
                        // Vanished between the stat and the read; report as
                        // missing and let the next tick retry.
                        tracing::warn!(file = %path.display(), error = %e, "Follow: read failed");
                        was_missing = true;
                        send!(FollowProgress::Missing { path: path.clone() });
                    }
                }
            }
            PollOutcome::Missing => {
                if !was_missing {
                    was_missing = true;
                    send!(FollowProgress::Missing { path: path.clone() });
                }
            }
            PollOutcome::Unchanged | PollOutcome::Idle => {}
        }
    }
}

// =============================================================================
// Tests
// =============================================================================
