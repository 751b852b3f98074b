use crate::animation::ease::Ease;
use crate::foundation::error::{StitchlineError, StitchlineResult};

/// Duration of the load-time count-up animation.
pub const TIMER_ANIMATION_MS: i64 = 3000;

const MS_PER_DAY: i64 = 86_400_000;
const MS_PER_HOUR: i64 = 3_600_000;
const MS_PER_MINUTE: i64 = 60_000;

/// Wall-clock source, injected so the animator can be driven in tests.
pub trait Clock {
    /// Milliseconds since the Unix epoch.
    fn now_ms(&self) -> i64;
}

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

/// The fixed local start date the elapsed display counts from (2025-11-18).
pub fn default_start_epoch_ms() -> StitchlineResult<i64> {
    let naive = chrono::NaiveDate::from_ymd_opt(2025, 11, 18)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| StitchlineError::validation("invalid start date"))?;
    let local = naive
        .and_local_timezone(chrono::Local)
        .earliest()
        .ok_or_else(|| StitchlineError::validation("start date not representable in local time"))?;
    Ok(local.timestamp_millis())
}

/// An elapsed duration broken into whole days, hours and minutes.
///
/// Seconds are intentionally not shown. The decomposition chains floor
/// division with modulo: `days = ms / day`, `hours = (ms % day) / hour`,
/// `minutes = (ms % hour) / minute`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ElapsedBreakdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
}

impl ElapsedBreakdown {
    pub fn from_ms(ms: i64) -> Self {
        Self {
            days: ms / MS_PER_DAY,
            hours: (ms % MS_PER_DAY) / MS_PER_HOUR,
            minutes: (ms % MS_PER_HOUR) / MS_PER_MINUTE,
        }
    }
}

impl std::fmt::Display for ElapsedBreakdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}d {}h {}m", self.days, self.hours, self.minutes)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimerPhase {
    /// Easing the displayed value from zero up to the true elapsed time.
    Animating,
    /// Displaying the true elapsed time on every sample.
    Live,
}

/// One sampled display value.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerSample {
    pub display_ms: i64,
    pub display: ElapsedBreakdown,
    pub phase: TimerPhase,
}

/// Elapsed-time animator: `Animating` -> `Live`, no terminal exit.
///
/// On start the true elapsed time is computed once. While animating, each
/// sample eases the displayed value with [`Ease::OutCubic`] over
/// [`TIMER_ANIMATION_MS`]; at the end of the ramp the sample is exactly the
/// live `now - start_epoch` and the animator switches to `Live`, where every
/// sample recomputes the true value directly.
#[derive(Debug)]
pub struct TimerAnimator<C: Clock> {
    clock: C,
    start_epoch_ms: i64,
    animation_started_at_ms: i64,
    actual_elapsed_ms: i64,
    phase: TimerPhase,
}

impl<C: Clock> TimerAnimator<C> {
    /// A start epoch in the future would produce negative display units, which
    /// the display has no policy for; it is rejected here instead.
    pub fn start(clock: C, start_epoch_ms: i64) -> StitchlineResult<Self> {
        let now = clock.now_ms();
        if start_epoch_ms > now {
            return Err(StitchlineError::validation(
                "timer start epoch is in the future",
            ));
        }
        Ok(Self {
            clock,
            start_epoch_ms,
            animation_started_at_ms: now,
            actual_elapsed_ms: now - start_epoch_ms,
            phase: TimerPhase::Animating,
        })
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    /// Sample the display value at the current wall-clock time.
    ///
    /// Drives the `Animating` -> `Live` transition as a side effect.
    pub fn sample(&mut self) -> TimerSample {
        let now = self.clock.now_ms();
        match self.phase {
            TimerPhase::Animating => {
                let elapsed = now - self.animation_started_at_ms;
                let progress = (elapsed as f64 / TIMER_ANIMATION_MS as f64).min(1.0);
                if progress >= 1.0 {
                    self.phase = TimerPhase::Live;
                    return self.live_sample(now);
                }
                let eased = Ease::OutCubic.apply(progress);
                let display_ms = (self.actual_elapsed_ms as f64 * eased).floor() as i64;
                TimerSample {
                    display_ms,
                    display: ElapsedBreakdown::from_ms(display_ms),
                    phase: TimerPhase::Animating,
                }
            }
            TimerPhase::Live => self.live_sample(now),
        }
    }

    fn live_sample(&self, now_ms: i64) -> TimerSample {
        let display_ms = now_ms - self.start_epoch_ms;
        TimerSample {
            display_ms,
            display: ElapsedBreakdown::from_ms(display_ms),
            phase: TimerPhase::Live,
        }
    }
}
