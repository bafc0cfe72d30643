use std::time::{Duration, Instant};

/// Repeating frame source polled from the main loop.
///
/// Nothing runs on its own: the owner calls `poll` with the current time and
/// gets back the elapsed time since `start` whenever a frame is due. `stop`
/// cancels it; a stopped ticker never yields again until restarted.
#[derive(Clone, Debug)]
pub(crate) struct FrameTicker {
    interval: Duration,
    started_at: Option<Instant>,
    next_due: Option<Instant>,
    last_elapsed: Duration,
}

impl FrameTicker {
    pub(crate) fn new(interval: Duration) -> Self {
        Self {
            interval,
            started_at: None,
            next_due: None,
            last_elapsed: Duration::ZERO,
        }
    }

    pub(crate) fn from_fps(fps: u32) -> Self {
        Self::new(Duration::from_secs_f64(1.0 / fps.max(1) as f64))
    }

    pub(crate) fn start(&mut self, now: Instant) {
        self.started_at = Some(now);
        self.next_due = Some(now);
        self.last_elapsed = Duration::ZERO;
    }

    pub(crate) fn stop(&mut self) {
        self.started_at = None;
        self.next_due = None;
    }

    pub(crate) fn is_running(&self) -> bool {
        self.started_at.is_some()
    }

    pub(crate) fn poll(&mut self, now: Instant) -> Option<Duration> {
        let (start, due) = (self.started_at?, self.next_due?);
        if now < due {
            return None;
        }
        self.next_due = Some(now + self.interval);

        // never report time going backwards
        let elapsed = now.saturating_duration_since(start).max(self.last_elapsed);
        self.last_elapsed = elapsed;
        Some(elapsed)
    }
}

/// Sleeps out the remainder of a frame started at `now`.
pub(crate) fn pace_frame(target: Duration, now: Instant) {
    let end = now + target;
    loop {
        let t = Instant::now();
        if t >= end {
            break;
        }
        let left = end - t;
        if left > Duration::from_millis(2) {
            std::thread::sleep(Duration::from_millis(1));
        } else {
            std::hint::spin_loop();
        }
    }
}
