// Data staleness detection: reset by every snapshot, trips after a quiet interval.
#[derive(Clone, Debug, PartialEq)]
pub struct StalenessTracker {
    pub stale_after_ms: f64,
    last_snapshot_ms: Option<f64>,
    stale: bool,
}

impl StalenessTracker {
    pub fn new(stale_after_ms: f64) -> Self {
        Self {
            stale_after_ms,
            last_snapshot_ms: None,
            stale: false,
        }
    }

    pub fn record(&mut self, now_ms: f64) {
        self.last_snapshot_ms = Some(now_ms);
        self.stale = false;
    }

    /// Returns `true` on the tick where the data first goes stale.
    pub fn check(&mut self, now_ms: f64) -> bool {
        let Some(last) = self.last_snapshot_ms else {
            return false;
        };
        if !self.stale && now_ms - last >= self.stale_after_ms {
            self.stale = true;
            return true;
        }
        false
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }
}
