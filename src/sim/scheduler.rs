//! Fixed-interval tick scheduling on a caller-supplied clock
//!
//! Nothing here reads wall time or blocks. The host pumps `poll(now_ms)` from
//! whatever timer it has (browser interval, native loop, test). Every issued
//! token carries the generation it was issued under; stopping or restarting
//! bumps the generation, so a token obtained before that is dead.

/// Upper bound on ticks replayed by a single catch-up pass
pub const MAX_CATCHUP_TICKS: u32 = 8;

/// Proof that a tick became due under a particular schedule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickToken {
    generation: u64,
    pub due_ms: u64,
}

/// Fixed-interval tick source
#[derive(Debug, Clone, Default)]
pub struct TickScheduler {
    interval_ms: Option<u64>,
    next_due_ms: u64,
    generation: u64,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin ticking every `interval_ms`, first tick one interval from `now_ms`.
    /// Restarts cleanly if already running.
    pub fn start(&mut self, interval_ms: u64, now_ms: u64) {
        self.stop();
        let interval_ms = interval_ms.max(1);
        self.interval_ms = Some(interval_ms);
        self.next_due_ms = now_ms + interval_ms;
        log::debug!("scheduler started: every {interval_ms}ms (gen {})", self.generation);
    }

    /// Cancel the schedule. Outstanding tokens become dead.
    pub fn stop(&mut self) {
        self.generation += 1;
        self.interval_ms = None;
    }

    pub fn is_running(&self) -> bool {
        self.interval_ms.is_some()
    }

    pub fn interval_ms(&self) -> Option<u64> {
        self.interval_ms
    }

    /// Restart with a new interval if it differs from the current one
    pub fn retune(&mut self, interval_ms: u64, now_ms: u64) {
        if self.interval_ms.is_some_and(|current| current != interval_ms.max(1)) {
            self.start(interval_ms, now_ms);
        }
    }

    /// At most one due tick. Call repeatedly to catch up.
    pub fn poll(&mut self, now_ms: u64) -> Option<TickToken> {
        let interval = self.interval_ms?;
        if now_ms < self.next_due_ms {
            return None;
        }
        let token = TickToken {
            generation: self.generation,
            due_ms: self.next_due_ms,
        };
        self.next_due_ms += interval;
        Some(token)
    }

    /// Drop any backlog so the next tick is one interval from `now_ms`
    pub fn resync(&mut self, now_ms: u64) {
        if let Some(interval) = self.interval_ms {
            if self.next_due_ms <= now_ms {
                log::warn!("scheduler fell behind by {}ms, resyncing", now_ms - self.next_due_ms);
                self.next_due_ms = now_ms + interval;
            }
        }
    }

    /// Whether `token` still belongs to the active schedule
    pub fn is_live(&self, token: &TickToken) -> bool {
        self.interval_ms.is_some() && token.generation == self.generation
    }
}

/// Proof that a deferred action came due
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeferredToken {
    generation: u64,
}

/// A single cancellable one-shot action (e.g. the AI "thinking" pause)
#[derive(Debug, Clone, Default)]
pub struct Deferred {
    due_ms: Option<u64>,
    generation: u64,
}

impl Deferred {
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule the action `delay_ms` from `now_ms`, replacing any pending one
    pub fn arm(&mut self, delay_ms: u64, now_ms: u64) {
        self.generation += 1;
        self.due_ms = Some(now_ms + delay_ms);
    }

    pub fn cancel(&mut self) {
        self.generation += 1;
        self.due_ms = None;
    }

    pub fn is_armed(&self) -> bool {
        self.due_ms.is_some()
    }

    /// Fires at most once per `arm`
    pub fn poll(&mut self, now_ms: u64) -> Option<DeferredToken> {
        match self.due_ms {
            Some(due) if now_ms >= due => {
                self.due_ms = None;
                Some(DeferredToken {
                    generation: self.generation,
                })
            }
            _ => None,
        }
    }

    /// A token is live until the slot is re-armed or cancelled
    pub fn is_live(&self, token: &DeferredToken) -> bool {
        token.generation == self.generation
    }
}
