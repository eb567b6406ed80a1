/// When the firmware should spawn the next update task
///
/// Every boot gets one check as soon as the network is up, however long that
/// takes. With a non-zero interval further checks follow once that much time
/// has passed since the last one started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckSchedule {
    interval_ms: u64,
    since_last_ms: u64,
    checked_this_boot: bool,
}

impl CheckSchedule {
    /// `0` means once per boot
    pub fn every_minutes(minutes: u32) -> Self {
        Self {
            interval_ms: u64::from(minutes) * 60_000,
            since_last_ms: 0,
            checked_this_boot: false,
        }
    }

    pub fn advance(&mut self, elapsed_ms: u64) {
        self.since_last_ms = self.since_last_ms.saturating_add(elapsed_ms);
    }

    pub fn is_due(&self) -> bool {
        if !self.checked_this_boot {
            return true;
        }
        self.interval_ms > 0 && self.since_last_ms >= self.interval_ms
    }

    /// Record that an update task was spawned
    pub fn started(&mut self) {
        self.checked_this_boot = true;
        self.since_last_ms = 0;
    }
}
