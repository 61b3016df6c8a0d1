//! Slow filesystem backend for testing
//!
//! This module provides a decorator around any FsBackend that adds
//! configurable delays to simulate slow I/O and counts every call. Tests use
//! it to check how often the navigator actually touches the disk, and to
//! observe a directory size while its background walk is still running.

use super::backend::{FsBackend, FsEntry};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread;
use std::time::Duration;

/// Configuration for slow filesystem simulation
#[derive(Debug, Clone)]
pub struct SlowFsConfig {
    /// Delay for read_dir operations
    pub read_dir_delay: Duration,
    /// Delay for get_entry operations
    pub get_entry_delay: Duration,
    /// Delay for read_head operations
    pub read_head_delay: Duration,
    /// Delay for dir_size operations
    pub dir_size_delay: Duration,
    /// Delay for canonicalize operations
    pub canonicalize_delay: Duration,
}

impl SlowFsConfig {
    /// Create a config with uniform delay for all operations
    pub fn uniform(delay: Duration) -> Self {
        Self {
            read_dir_delay: delay,
            get_entry_delay: delay,
            read_head_delay: delay,
            dir_size_delay: delay,
            canonicalize_delay: delay,
        }
    }

    /// Create a config with no delays (useful as a baseline)
    pub fn none() -> Self {
        Self::uniform(Duration::ZERO)
    }

    /// Only the recursive size walk is slow
    pub fn slow_dir_size(delay: Duration) -> Self {
        Self {
            dir_size_delay: delay,
            ..Self::none()
        }
    }
}

impl Default for SlowFsConfig {
    fn default() -> Self {
        Self::none()
    }
}

/// Metrics tracking for filesystem operations
#[derive(Debug, Clone, Default)]
pub struct BackendMetrics {
    pub read_dir_calls: usize,
    pub get_entry_calls: usize,
    pub read_head_calls: usize,
    pub dir_size_calls: usize,
    pub canonicalize_calls: usize,
    /// Total time spent in artificial delays
    pub total_delay_time: Duration,
}

impl BackendMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all metrics to zero
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Get total number of filesystem calls
    pub fn total_calls(&self) -> usize {
        self.read_dir_calls
            + self.get_entry_calls
            + self.read_head_calls
            + self.dir_size_calls
            + self.canonicalize_calls
    }
}

/// Slow filesystem backend wrapper for testing
pub struct SlowFsBackend {
    inner: Arc<dyn FsBackend>,
    config: SlowFsConfig,
    metrics: Arc<Mutex<BackendMetrics>>,
}

impl SlowFsBackend {
    pub fn new(inner: Arc<dyn FsBackend>, config: SlowFsConfig) -> Self {
        Self {
            inner,
            config,
            metrics: Arc::new(Mutex::new(BackendMetrics::new())),
        }
    }

    /// Create with uniform delay for all operations
    pub fn with_uniform_delay(inner: Arc<dyn FsBackend>, delay: Duration) -> Self {
        Self::new(inner, SlowFsConfig::uniform(delay))
    }

    /// Get a snapshot of current metrics
    pub fn metrics(&self) -> BackendMetrics {
        self.lock_metrics().clone()
    }

    /// Reset metrics to zero
    pub fn reset_metrics(&self) {
        self.lock_metrics().reset();
    }

    fn lock_metrics(&self) -> MutexGuard<'_, BackendMetrics> {
        // A panicking test thread must not hide the counts from the others
        self.metrics.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Sleep and record the delay, then bump one counter
    fn record(&self, delay: Duration, bump: impl FnOnce(&mut BackendMetrics)) {
        if !delay.is_zero() {
            thread::sleep(delay);
        }
        let mut metrics = self.lock_metrics();
        metrics.total_delay_time += delay;
        bump(&mut metrics);
    }
}

impl FsBackend for SlowFsBackend {
    fn read_dir(&self, path: &Path) -> io::Result<Vec<FsEntry>> {
        self.record(self.config.read_dir_delay, |m| m.read_dir_calls += 1);
        self.inner.read_dir(path)
    }

    fn get_entry(&self, path: &Path) -> io::Result<FsEntry> {
        self.record(self.config.get_entry_delay, |m| m.get_entry_calls += 1);
        self.inner.get_entry(path)
    }

    fn read_head(&self, path: &Path, limit: usize) -> io::Result<Vec<u8>> {
        self.record(self.config.read_head_delay, |m| m.read_head_calls += 1);
        self.inner.read_head(path, limit)
    }

    fn dir_size(&self, path: &Path) -> io::Result<u64> {
        self.record(self.config.dir_size_delay, |m| m.dir_size_calls += 1);
        self.inner.dir_size(path)
    }

    fn canonicalize(&self, path: &Path) -> io::Result<PathBuf> {
        self.record(self.config.canonicalize_delay, |m| m.canonicalize_calls += 1);
        self.inner.canonicalize(path)
    }
}
