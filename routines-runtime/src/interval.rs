use std::time::Duration;

use chrono::{NaiveDateTime, NaiveTime};

use crate::error::RoutineError;

/// Raw interval options, as accepted by the builder and `change_interval`.
///
/// The duration components are summed. `time` selects the daily wall-clock
/// mode and is mutually exclusive with the duration components.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IntervalSpec {
    pub seconds: u64,
    pub minutes: u64,
    pub hours: u64,
    pub time: Option<NaiveTime>,
}

impl IntervalSpec {
    /// Duration-mode spec from a number of seconds.
    pub fn from_secs(seconds: u64) -> Self {
        Self {
            seconds,
            ..Self::default()
        }
    }

    /// Daily-mode spec firing at the given wall-clock time.
    pub fn at(time: NaiveTime) -> Self {
        Self {
            time: Some(time),
            ..Self::default()
        }
    }

    /// Validate the spec and resolve which mode is active.
    pub(crate) fn resolve(&self) -> Result<Interval, RoutineError> {
        let total = self.seconds + self.minutes * 60 + self.hours * 3600;
        match self.time {
            Some(_) if total > 0 => Err(RoutineError::Configuration(
                "time is mutually exclusive with seconds/minutes/hours".into(),
            )),
            Some(at) => Ok(Interval::Daily(at)),
            None if total == 0 => Err(RoutineError::Configuration(
                "at least one of seconds, minutes, hours or time is required".into(),
            )),
            None => Ok(Interval::Every(Duration::from_secs(total))),
        }
    }
}

/// Resolved interval mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Interval {
    /// Fixed delay between iteration boundaries.
    Every(Duration),
    /// Daily occurrence of a wall-clock time.
    Daily(NaiveTime),
}

impl Interval {
    /// Wait between the current instant and the next iteration boundary.
    pub(crate) fn next_wait(&self, now: NaiveDateTime) -> Duration {
        match self {
            Interval::Every(duration) => *duration,
            Interval::Daily(at) => until_next_occurrence(now, *at),
        }
    }
}

/// Delay until the next occurrence of `at`, rolling over to tomorrow when
/// the time has already passed today.
fn until_next_occurrence(now: NaiveDateTime, at: NaiveTime) -> Duration {
    let today = now.date().and_time(at);
    let target = if today > now {
        today
    } else {
        today + chrono::Duration::days(1)
    };
    (target - now).to_std().unwrap_or(Duration::ZERO)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, s).unwrap()
    }

    fn on(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 1)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn duration_components_are_summed() {
        let spec = IntervalSpec {
            seconds: 3,
            minutes: 2,
            hours: 1,
            time: None,
        };
        assert_eq!(
            spec.resolve().unwrap(),
            Interval::Every(Duration::from_secs(3723))
        );
    }

    #[test]
    fn empty_spec_is_rejected() {
        let err = IntervalSpec::default().resolve().unwrap_err();
        assert!(matches!(err, RoutineError::Configuration(_)));
    }

    #[test]
    fn time_and_duration_are_mutually_exclusive() {
        let mut spec = IntervalSpec::from_secs(5);
        spec.time = Some(at(12, 0, 0));
        let err = spec.resolve().unwrap_err();
        assert!(matches!(err, RoutineError::Configuration(_)));
    }

    #[test]
    fn time_alone_selects_daily_mode() {
        let spec = IntervalSpec::at(at(12, 0, 0));
        assert_eq!(spec.resolve().unwrap(), Interval::Daily(at(12, 0, 0)));
    }

    #[test]
    fn daily_wait_targets_today_when_still_ahead() {
        let wait = until_next_occurrence(on(10, 0, 0), at(12, 30, 0));
        assert_eq!(wait, Duration::from_secs(2 * 3600 + 30 * 60));
    }

    #[test]
    fn daily_wait_rolls_over_when_already_passed() {
        let wait = until_next_occurrence(on(13, 0, 0), at(12, 0, 0));
        assert_eq!(wait, Duration::from_secs(23 * 3600));
    }

    #[test]
    fn daily_wait_on_the_exact_boundary_rolls_over() {
        let wait = until_next_occurrence(on(12, 0, 0), at(12, 0, 0));
        assert_eq!(wait, Duration::from_secs(24 * 3600));
    }
}
