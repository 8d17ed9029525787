//! Progress reporting for the resource phase.

/// Snapshot sent after each finished resource (CLI-friendly).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadProgress {
    /// Resources finished so far (completed, skipped or failed).
    pub done: usize,
    /// Resources in this run.
    pub total: usize,
    /// Bytes written by this run.
    pub bytes: u64,
    pub failed: usize,
    /// Cache name of the resource that just finished.
    pub last: String,
}

impl DownloadProgress {
    /// Fraction complete in [0.0, 1.0].
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 1.0;
        }
        (self.done as f64 / self.total as f64).min(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fraction_handles_empty_run() {
        let p = DownloadProgress {
            done: 0,
            total: 0,
            bytes: 0,
            failed: 0,
            last: String::new(),
        };
        assert_eq!(p.fraction(), 1.0);
        let p = DownloadProgress {
            done: 1,
            total: 4,
            ..p
        };
        assert!((p.fraction() - 0.25).abs() < 1e-9);
    }
}
