use std::time::{Duration, Instant};

use crossterm::event;

use crate::tui::event::TuiEvent;

/// Event loop state management.
///
/// Tick deadlines come from the application on every call to `next()`.
/// Renders happen after state changes, at most once per frame interval.
#[derive(Debug)]
pub(super) struct EventLoop {
    frame_interval: Duration,
    last_update: Instant,
    last_render: Instant,
    dirty: bool,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    /// Creates a new `EventLoop` rendering at most 60 times per second.
    pub fn new() -> Self {
        let now = Instant::now();
        let past_time = now.checked_sub(Duration::from_secs(1)).unwrap_or(now);
        Self {
            frame_interval: Duration::from_secs_f64(1.0 / 60.0),
            last_update: now,
            last_render: past_time,
            dirty: true, // Initial render is required on startup
        }
    }

    pub(super) fn set_frame_interval(&mut self, interval: Duration) {
        self.frame_interval = interval;
    }

    /// Returns the time since the previous call and restarts the update clock.
    pub(super) fn take_elapsed(&mut self) -> Duration {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_update);
        self.last_update = now;
        elapsed
    }

    /// Returns the next event.
    ///
    /// `next_update` is the application's requested delay after the previous
    /// update. Blocks until it is reached, a render is due, or a crossterm
    /// event occurs.
    pub(super) fn next(&mut self, next_update: Option<Duration>) -> anyhow::Result<TuiEvent> {
        loop {
            let now = Instant::now();
            if let Some(delay) = next_update
                && now.duration_since(self.last_update) >= delay
            {
                self.dirty = true;
                return Ok(TuiEvent::Tick);
            }

            if self.dirty && now.duration_since(self.last_render) >= self.frame_interval {
                self.last_render = now;
                self.dirty = false;
                return Ok(TuiEvent::Render);
            }

            if let Some(timeout) = self.compute_timeout(now, next_update)
                && !event::poll(timeout)?
            {
                continue;
            }

            self.dirty = true;
            return Ok(event::read()?.into());
        }
    }

    fn compute_timeout(&self, now: Instant, next_update: Option<Duration>) -> Option<Duration> {
        let next_tick_at = next_update.map(|delay| self.last_update + delay);
        let next_render_at = self
            .dirty
            .then(|| self.last_render + self.frame_interval);
        let next_timeout_at = [next_tick_at, next_render_at].into_iter().flatten().min()?;
        Some(next_timeout_at.saturating_duration_since(now))
    }
}
