//! Rate limiting for warnings emitted once per grid cell.

/// Counts warnings and lets through at most `max` of them.
///
/// Callers gate each `tracing::warn!` on [`WarningLimiter::allow`] and call
/// [`WarningLimiter::finish`] once the pass is over to report what was dropped.
#[derive(Clone, Debug)]
pub struct WarningLimiter {
    max: usize,
    emitted: usize,
    suppressed: usize,
}

impl WarningLimiter {
    /// Limiter that lets through at most `max` warnings.
    pub fn new(max: usize) -> Self {
        Self {
            max,
            emitted: 0,
            suppressed: 0,
        }
    }

    /// Returns `true` if the next warning may be logged, counting it either way.
    pub fn allow(&mut self) -> bool {
        if self.emitted < self.max {
            self.emitted += 1;
            true
        } else {
            self.suppressed += 1;
            false
        }
    }

    /// Warnings let through so far.
    pub fn emitted(&self) -> usize {
        self.emitted
    }

    /// Warnings dropped so far.
    pub fn suppressed(&self) -> usize {
        self.suppressed
    }

    /// Logs a single summary line if anything was suppressed.
    pub fn finish(&self, what: &str) {
        if self.suppressed > 0 {
            tracing::warn!(
                suppressed = self.suppressed,
                "{what}: {} further warnings suppressed after the first {}",
                self.suppressed,
                self.max
            );
        }
    }
}
