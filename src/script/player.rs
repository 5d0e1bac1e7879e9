//! Script playback against a tracker.
//!
//! Playback is either instant (no waiting; an optional manual clock is set
//! to each step's time so timestamps stay meaningful) or paced on the tokio
//! timer. Either way every step runs on the caller's task, so the tracker
//! never leaves the thread that owns it.

use std::time::Duration;

use tracing::{debug, info, instrument, warn};

use crate::core::{EventTracker, ManualClock};

use super::Script;

/// Slowest accepted playback speed
pub const MIN_SPEED: f64 = 0.001;

/// How playback spaces out steps
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Pacing {
    /// Apply every step immediately
    Instant,

    /// Wait between steps; `speed` 2.0 plays twice as fast
    Realtime { speed: f64 },
}

impl Default for Pacing {
    fn default() -> Self {
        Self::Realtime { speed: 1.0 }
    }
}

/// Outcome counts of one playback
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaybackReport {
    /// Steps the tracker accepted
    pub applied: usize,

    /// Steps the tracker ignored (duplicate/unknown id, re-completion)
    pub rejected: usize,

    /// Script time of the last step
    pub duration_ms: u64,
}

/// Plays scripts into a tracker
#[derive(Debug, Clone, Default)]
pub struct ScriptPlayer {
    pacing: Pacing,
    clock: Option<ManualClock>,
}

impl ScriptPlayer {
    pub fn new(pacing: Pacing) -> Self {
        let pacing = match pacing {
            Pacing::Realtime { speed } if !(speed.is_finite() && speed > 0.0) => {
                warn!(speed, "Invalid playback speed, using 1.0");
                Pacing::Realtime { speed: 1.0 }
            }
            Pacing::Realtime { speed } if speed < MIN_SPEED => {
                warn!(speed, min = MIN_SPEED, "Playback speed too low, clamping");
                Pacing::Realtime { speed: MIN_SPEED }
            }
            other => other,
        };

        Self { pacing, clock: None }
    }

    pub fn instant() -> Self {
        Self::new(Pacing::Instant)
    }

    /// Advance this clock to each step's time before applying it.
    ///
    /// Pass the same clock the tracker was built with.
    pub fn with_clock(mut self, clock: ManualClock) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn pacing(&self) -> Pacing {
        self.pacing
    }

    /// Apply every step now, in playback order, ignoring pacing
    pub fn play_now(&self, script: &Script, tracker: &mut EventTracker) -> PlaybackReport {
        let base = self.clock_base();
        let mut report = PlaybackReport::default();

        for step in script.ordered_steps() {
            self.stamp(base, step.at_ms);
            self.apply(step, tracker, &mut report);
        }

        report
    }

    /// Play the script, waiting between steps when pacing is real time
    #[instrument(skip(self, script, tracker), fields(script = %script.name))]
    pub async fn play(&self, script: &Script, tracker: &mut EventTracker) -> PlaybackReport {
        let speed = match self.pacing {
            Pacing::Instant => return self.play_now(script, tracker),
            Pacing::Realtime { speed } => speed,
        };

        info!(steps = script.steps.len(), speed, "Playing script");

        let base = self.clock_base();
        let mut report = PlaybackReport::default();
        let mut elapsed_ms = 0u64;

        for step in script.ordered_steps() {
            let wait_ms = step.at_ms.saturating_sub(elapsed_ms);
            if wait_ms > 0 {
                tokio::time::sleep(scaled_delay(wait_ms, speed)).await;
                elapsed_ms = step.at_ms;
            }

            self.stamp(base, step.at_ms);
            self.apply(step, tracker, &mut report);
        }

        info!(
            applied = report.applied,
            rejected = report.rejected,
            "Script finished"
        );
        report
    }

    fn clock_base(&self) -> i64 {
        use crate::core::Clock;
        self.clock.as_ref().map(|c| c.now_ms()).unwrap_or(0)
    }

    fn stamp(&self, base: i64, at_ms: u64) {
        if let Some(ref clock) = self.clock {
            let offset = i64::try_from(at_ms).unwrap_or(i64::MAX);
            clock.set(base.saturating_add(offset));
        }
    }

    fn apply(&self, step: &super::ScriptStep, tracker: &mut EventTracker, report: &mut PlaybackReport) {
        match step.action.apply(tracker) {
            Ok(()) => report.applied += 1,
            Err(e) => {
                debug!(at_ms = step.at_ms, "Step ignored: {}", e);
                report.rejected += 1;
            }
        }
        report.duration_ms = report.duration_ms.max(step.at_ms);
    }
}

/// Real time to wait for `wait_ms` of script time at `speed`
fn scaled_delay(wait_ms: u64, speed: f64) -> Duration {
    let secs = wait_ms as f64 / 1000.0 / speed;
    Duration::try_from_secs_f64(secs).unwrap_or_else(|_| {
        warn!(wait_ms, speed, "Step delay out of range, waiting as long as possible");
        Duration::MAX
    })
}
