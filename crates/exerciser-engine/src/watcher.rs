// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Modification-time polling for the solution file.
//!
//! Changes are detected by comparing raw modification times. A rewrite that
//! keeps the same timestamp is not observed.

use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

/// Reads the modification time of `path`, logging a warning when it cannot.
fn modified(path: &Path) -> Option<SystemTime> {
    match std::fs::metadata(path).and_then(|meta| meta.modified()) {
        Ok(mtime) => Some(mtime),
        Err(err) => {
            log::warn!("Could not read modification time of '{}': {err}", path.display());
            None
        }
    }
}

/// Watches a single file for modification-time changes.
#[derive(Debug, Clone)]
pub struct FileWatcher {
    path: PathBuf,
    last_mtime: Option<SystemTime>,
    interval: Duration,
    last_poll: Option<Instant>,
}

impl FileWatcher {
    /// Starts watching `path`, recording its current modification time.
    pub fn new(path: impl Into<PathBuf>, interval: Duration) -> Self {
        let path = path.into();
        let last_mtime = modified(&path);
        log::debug!("Watching '{}' every {interval:?}.", path.display());
        Self {
            path,
            last_mtime,
            interval,
            last_poll: None,
        }
    }

    /// Returns the new modification time of `path` if it differs from `last_mtime`.
    ///
    /// Returns `None` when the file is unchanged or cannot be read.
    pub fn check(path: &Path, last_mtime: Option<SystemTime>) -> Option<SystemTime> {
        let mtime = modified(path)?;
        (Some(mtime) != last_mtime).then_some(mtime)
    }

    /// Checks the file if at least one poll interval has passed since the last check.
    ///
    /// Returns `true` exactly once per observed change.
    pub fn poll(&mut self, now: Instant) -> bool {
        if let Some(last_poll) = self.last_poll {
            if now.saturating_duration_since(last_poll) < self.interval {
                return false;
            }
        }
        self.last_poll = Some(now);

        match Self::check(&self.path, self.last_mtime) {
            Some(mtime) => {
                log::debug!("'{}' changed on disk.", self.path.display());
                self.last_mtime = Some(mtime);
                true
            }
            None => false,
        }
    }

    /// The watched path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The last modification time observed.
    pub fn last_mtime(&self) -> Option<SystemTime> {
        self.last_mtime
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;

    fn set_mtime(path: &Path, mtime: SystemTime) {
        let file = File::options().write(true).open(path).expect("open watched file");
        file.set_modified(mtime).expect("set mtime");
    }

    fn watched_file() -> (tempfile::TempDir, PathBuf, SystemTime) {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("solution.toml");
        let mut file = File::create(&path).expect("create");
        writeln!(file, "[pid]").expect("write");
        let a = SystemTime::UNIX_EPOCH + Duration::from_secs(1_700_000_000);
        set_mtime(&path, a);
        (dir, path, a)
    }

    #[test]
    fn check_reports_only_differences() {
        let (_dir, path, a) = watched_file();
        assert_eq!(FileWatcher::check(&path, Some(a)), None);
        assert_eq!(FileWatcher::check(&path, None), Some(a));

        let b = a + Duration::from_secs(5);
        set_mtime(&path, b);
        assert_eq!(FileWatcher::check(&path, Some(a)), Some(b));
    }

    #[test]
    fn missing_file_is_not_a_change() {
        let dir = tempfile::tempdir().expect("tempdir");
        assert_eq!(FileWatcher::check(&dir.path().join("gone.toml"), None), None);
    }

    #[test]
    fn poll_fires_once_per_change_at_most_once_per_interval() {
        let (_dir, path, a) = watched_file();
        let t0 = Instant::now();
        let mut watcher = FileWatcher::new(&path, Duration::from_secs(1));
        assert_eq!(watcher.last_mtime(), Some(a));

        assert!(!watcher.poll(t0));
        assert!(!watcher.poll(t0 + Duration::from_millis(500)));

        let b = a + Duration::from_secs(60);
        set_mtime(&path, b);
        // Still inside the interval started at t0.
        assert!(!watcher.poll(t0 + Duration::from_millis(900)));
        assert!(watcher.poll(t0 + Duration::from_secs(1)));
        assert!(!watcher.poll(t0 + Duration::from_secs(2)));
        assert_eq!(watcher.last_mtime(), Some(b));
    }

    #[test]
    fn identical_mtime_rewrite_is_invisible() {
        let (_dir, path, a) = watched_file();
        let t0 = Instant::now();
        let mut watcher = FileWatcher::new(&path, Duration::from_secs(1));

        std::fs::write(&path, "[pid]\nkp = 3.0\n").expect("rewrite");
        set_mtime(&path, a);
        assert!(!watcher.poll(t0));
        assert!(!watcher.poll(t0 + Duration::from_secs(1)));
    }
}
