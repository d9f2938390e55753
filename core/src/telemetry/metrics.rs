use std::sync::Mutex;

/// Run counters shared between the pipeline and its worker tasks.
pub struct MetricsRecorder {
    inner: Mutex<Metrics>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub frames_processed: usize,
    pub runs_completed: usize,
    pub runs_failed: usize,
}

#[derive(Default)]
struct Metrics {
    frames_processed: usize,
    runs_completed: usize,
    runs_failed: usize,
}

impl MetricsRecorder {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(Metrics::default()),
        }
    }

    pub fn record_frames(&self, count: usize) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.frames_processed += count;
        }
    }

    pub fn record_completed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.runs_completed += 1;
        }
    }

    pub fn record_failed(&self) {
        if let Ok(mut metrics) = self.inner.lock() {
            metrics.runs_failed += 1;
        }
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        if let Ok(metrics) = self.inner.lock() {
            MetricsSnapshot {
                frames_processed: metrics.frames_processed,
                runs_completed: metrics.runs_completed,
                runs_failed: metrics.runs_failed,
            }
        } else {
            MetricsSnapshot::default()
        }
    }
}

impl Default for MetricsRecorder {
    fn default() -> Self {
        Self::new()
    }
}
