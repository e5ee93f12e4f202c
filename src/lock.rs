//! File locking and atomic writes for the file-backed store
//!
//! - Advisory exclusive lock (fs2/flock) on a lock file, with timeout
//! - Atomic write pattern (write temp + rename)

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::time::{Duration, Instant};

use fs2::FileExt;

use crate::error::{Error, Result};

/// Default lock timeout in milliseconds
pub const DEFAULT_LOCK_TIMEOUT_MS: u64 = 5000;

/// Retry interval while waiting for a contended lock
const LOCK_RETRY_INTERVAL_MS: u64 = 50;

fn is_lock_contended(err: &io::Error) -> bool {
    if err.kind() == io::ErrorKind::WouldBlock {
        return true;
    }

    // On Windows, fs2 surfaces lock/sharing violations as "Other".
    #[cfg(windows)]
    {
        matches!(err.raw_os_error(), Some(32) | Some(33))
    }
    #[cfg(not(windows))]
    {
        false
    }
}

fn open_lock_file(path: &Path) -> Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    Ok(OpenOptions::new()
        .read(true)
        .write(true)
        .create(true)
        .truncate(false)
        .open(path)?)
}

/// A file lock guard that releases the lock when dropped
#[derive(Debug)]
pub struct FileLock {
    file: File,
}

impl FileLock {
    /// Acquire an exclusive lock on `path`, creating it if needed.
    ///
    /// Returns `Error::LockFailed` if the lock is still held by someone else
    /// after `timeout_ms`.
    pub fn acquire(path: impl AsRef<Path>, timeout_ms: u64) -> Result<Self> {
        let path = path.as_ref();
        let file = open_lock_file(path)?;

        let start = Instant::now();
        let timeout = Duration::from_millis(timeout_ms);
        let retry_interval = Duration::from_millis(LOCK_RETRY_INTERVAL_MS);

        loop {
            match file.try_lock_exclusive() {
                Ok(()) => return Ok(FileLock { file }),
                Err(e) if is_lock_contended(&e) => {
                    if start.elapsed() >= timeout {
                        return Err(Error::LockFailed(path.to_path_buf()));
                    }
                    std::thread::sleep(retry_interval);
                }
                Err(e) => return Err(Error::Io(e)),
            }
        }
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

/// Atomically replace the contents of `path`.
///
/// Writes a sibling temp file, syncs it, then renames over the target, so
/// readers see either the old or the new contents. Takes no lock. The temp
/// file is removed if any step fails.
pub fn write_atomic(path: impl AsRef<Path>, data: &[u8]) -> Result<()> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Same directory as the target so the rename stays on one filesystem
    let temp_path = path.with_extension(format!(
        "{}.tmp.{}",
        path.extension().and_then(|e| e.to_str()).unwrap_or(""),
        std::process::id()
    ));

    let result = write_and_rename(&temp_path, path, data);
    if result.is_err() {
        let _ = fs::remove_file(&temp_path);
    }
    result
}

fn write_and_rename(temp_path: &Path, path: &Path, data: &[u8]) -> Result<()> {
    let mut temp_file = File::create(temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);

    fs::rename(temp_path, path)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};
    use std::thread;
    use tempfile::TempDir;

    #[test]
    fn lock_is_exclusive_until_dropped() {
        let temp_dir = TempDir::new().expect("tempdir");
        let lock_path = temp_dir.path().join(".lock");

        let lock = FileLock::acquire(&lock_path, 1000).expect("acquire");
        assert!(lock_path.exists());
        assert!(matches!(
            FileLock::acquire(&lock_path, 20),
            Err(Error::LockFailed(_))
        ));

        drop(lock);

        FileLock::acquire(&lock_path, 20).expect("reacquire after drop");
    }

    #[test]
    fn timeout_returns_lock_failed() {
        let temp_dir = TempDir::new().expect("tempdir");
        let lock_path = temp_dir.path().join(".lock");

        let _lock = FileLock::acquire(&lock_path, 1000).expect("acquire");
        let result = FileLock::acquire(&lock_path, 50);
        assert!(matches!(result, Err(Error::LockFailed(_))));
    }

    #[test]
    fn atomic_write_replaces_contents() {
        let temp_dir = TempDir::new().expect("tempdir");
        let file_path = temp_dir.path().join("nested").join("todos.json");

        write_atomic(&file_path, b"[]").expect("write");
        assert_eq!(fs::read_to_string(&file_path).expect("read"), "[]");

        write_atomic(&file_path, b"[{\"id\":\"a\"}]").expect("overwrite");
        assert_eq!(
            fs::read_to_string(&file_path).expect("read"),
            "[{\"id\":\"a\"}]"
        );

        let leftovers: Vec<_> = fs::read_dir(file_path.parent().expect("parent"))
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn failed_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().expect("tempdir");
        // A directory at the target makes the final rename fail
        let target = temp_dir.path().join("todos.json");
        fs::create_dir(&target).expect("dir at target");
        fs::write(target.join("keep"), b"x").expect("fill dir");

        assert!(write_atomic(&target, b"[]").is_err());

        let leftovers: Vec<_> = fs::read_dir(temp_dir.path())
            .expect("read dir")
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".tmp."))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn single_lock_holder_under_contention() {
        let temp_dir = TempDir::new().expect("tempdir");
        let lock_path = temp_dir.path().join(".lock");

        let threads = 8;
        let barrier = Arc::new(Barrier::new(threads));
        let in_lock = Arc::new(AtomicUsize::new(0));
        let max_concurrent = Arc::new(AtomicUsize::new(0));

        let handles: Vec<_> = (0..threads)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let in_lock = Arc::clone(&in_lock);
                let max_concurrent = Arc::clone(&max_concurrent);
                let lock_path = lock_path.clone();
                thread::spawn(move || {
                    barrier.wait();
                    let _lock = FileLock::acquire(&lock_path, 5000).expect("acquire");
                    let current = in_lock.fetch_add(1, Ordering::SeqCst) + 1;
                    max_concurrent.fetch_max(current, Ordering::SeqCst);
                    thread::sleep(Duration::from_millis(5));
                    in_lock.fetch_sub(1, Ordering::SeqCst);
                })
            })
            .collect();

        for handle in handles {
            handle.join().expect("join");
        }

        assert_eq!(max_concurrent.load(Ordering::SeqCst), 1);
    }
}
