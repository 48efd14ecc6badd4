use spin_sleep_util::Interval;
use std::time::Duration;

const DEFAULT_FPS: f64 = 60.0;

#[derive(Default, Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LimitMode {
    /// Pace the loop at the default frame rate.
    #[default]
    Auto,
    Target(Duration),
    Disabled,
}

impl LimitMode {
    #[inline]
    pub fn from_fps(fps: f64) -> Self {
        LimitMode::Target(Duration::from_secs_f64(1.0 / fps))
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        !matches!(self, LimitMode::Disabled)
    }
}

pub(crate) struct FrameLimiter {
    mode: LimitMode,
    interval: Interval,
}

impl FrameLimiter {
    #[inline]
    pub fn new(mode: LimitMode) -> Self {
        let dt = match mode {
            LimitMode::Disabled => Duration::from_secs_f64(1.0 / DEFAULT_FPS),
            _ => duration_from_mode(mode),
        };

        if mode.is_enabled() {
            log::debug!("FrameLimiter enabled with mode={mode:?}");
        }

        FrameLimiter {
            mode,
            interval: spin_sleep_util::interval(dt),
        }
    }

    #[inline(always)]
    pub fn tick(&mut self) {
        if !self.mode.is_enabled() {
            return;
        }

        self.interval.tick();
    }
}

#[inline(always)]
fn duration_from_mode(mode: LimitMode) -> Duration {
    match mode {
        LimitMode::Auto => Duration::from_secs_f64(1.0 / DEFAULT_FPS),
        LimitMode::Target(dt) => dt,
        LimitMode::Disabled => Duration::ZERO,
    }
}
