//! Formatting policy for countdown text.
//!
//! A countdown is in one of three [`Phase`]s depending on how many seconds
//! remain until the scheduled time:
//!
//! - `remaining >= 86400`: [`Phase::Distant`], rendered as a long duration
//! - `0 <= remaining < 86400`: [`Phase::Imminent`], rendered as a clock countdown
//! - `remaining < 0`: [`Phase::Late`], rendered as the time elapsed since the target
//!
//! The phase split is fixed. The text of each phase is supplied by a
//! [`CountdownFormat`] implementation, so applications with their own
//! localized strings can plug them in. [`DefaultFormat`] provides English text.
//!
//! ```rust
//! use bubbletea_countdown::format::{format_remaining, DefaultFormat, Phase};
//!
//! assert_eq!(format_remaining(&DefaultFormat, 125), (Phase::Imminent, "02:05".to_string()));
//! assert_eq!(format_remaining(&DefaultFormat, -30), (Phase::Late, "+00:30".to_string()));
//! assert_eq!(format_remaining(&DefaultFormat, 90061), (Phase::Distant, "1 day 1 hour".to_string()));
//! ```

use chrono::{Datelike, FixedOffset, TimeZone};

/// Remaining seconds at or above which the long-duration format is used.
pub const LONG_DURATION_THRESHOLD: i64 = 86_400;

const SECONDS_PER_HOUR: i64 = 3_600;
const SECONDS_PER_MINUTE: i64 = 60;

/// Which side of the scheduled time the countdown is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// A day or more remains.
    Distant,
    /// Less than a day remains.
    Imminent,
    /// The scheduled time has passed.
    Late,
}

impl Phase {
    /// Classifies a remaining-seconds value.
    pub fn of(remaining: i64) -> Self {
        if remaining >= LONG_DURATION_THRESHOLD {
            Phase::Distant
        } else if remaining < 0 {
            Phase::Late
        } else {
            Phase::Imminent
        }
    }

    /// Returns true once the scheduled time has passed.
    pub fn is_late(self) -> bool {
        self == Phase::Late
    }
}

/// The text templates used for each phase.
///
/// Every method receives a non-negative number of seconds. The late-by text
/// must be distinguishable from countdown text for the same value.
pub trait CountdownFormat: Send + Sync {
    /// Text for a countdown of a day or more.
    fn long_duration(&self, seconds: i64) -> String;

    /// Text for a countdown of less than a day.
    fn countdown(&self, seconds: i64) -> String;

    /// Text for how long ago the scheduled time passed.
    fn late_by(&self, seconds: i64) -> String;

    /// Heading shown above the timer text.
    fn title(&self, phase: Phase) -> String;
}

/// English formatting with zero-padded clock digits.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultFormat;

fn plural(value: i64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}

impl CountdownFormat for DefaultFormat {
    fn long_duration(&self, seconds: i64) -> String {
        let seconds = seconds.max(0);
        let days = seconds / LONG_DURATION_THRESHOLD;
        let hours = (seconds % LONG_DURATION_THRESHOLD) / SECONDS_PER_HOUR;

        match (days, hours) {
            (0, 0) => plural(seconds / SECONDS_PER_MINUTE, "minute"),
            (0, h) => plural(h, "hour"),
            (d, 0) => plural(d, "day"),
            (d, h) => format!("{} {}", plural(d, "day"), plural(h, "hour")),
        }
    }

    fn countdown(&self, seconds: i64) -> String {
        let seconds = seconds.max(0);
        let hours = seconds / SECONDS_PER_HOUR;
        let minutes = (seconds % SECONDS_PER_HOUR) / SECONDS_PER_MINUTE;
        let secs = seconds % SECONDS_PER_MINUTE;

        if hours > 0 {
            format!("{:02}:{:02}:{:02}", hours, minutes, secs)
        } else {
            format!("{:02}:{:02}", minutes, secs)
        }
    }

    fn late_by(&self, seconds: i64) -> String {
        format!("+{}", self.countdown(seconds))
    }

    fn title(&self, phase: Phase) -> String {
        match phase {
            Phase::Distant | Phase::Imminent => "Starts in".to_string(),
            Phase::Late => "Late by".to_string(),
        }
    }
}

/// Picks the phase for `remaining` and formats it with `format`.
///
/// Late countdowns are formatted from the absolute value of `remaining`.
pub fn format_remaining(format: &dyn CountdownFormat, remaining: i64) -> (Phase, String) {
    let phase = Phase::of(remaining);
    let text = match phase {
        Phase::Distant => format.long_duration(remaining),
        Phase::Imminent => format.countdown(remaining),
        Phase::Late => format.late_by(remaining.saturating_abs()),
    };
    (phase, text)
}

/// Describes when `target` happens, relative to the calendar day of `now`.
///
/// Both instants are interpreted in `offset`. Produces `today at 14:05`,
/// `tomorrow at 09:00`, `yesterday at 23:10`, `on Mar 3 at 18:30`, or
/// `on Mar 3, 2031 at 18:30` when the year differs from the current one.
/// Returns an empty string for timestamps chrono cannot represent.
pub fn schedule_subtitle(target: i64, now: i64, offset: FixedOffset) -> String {
    let (Some(target_at), Some(now_at)) = (
        offset.timestamp_opt(target, 0).single(),
        offset.timestamp_opt(now, 0).single(),
    ) else {
        return String::new();
    };

    let time = target_at.format("%H:%M");
    let day_delta = (target_at.date_naive() - now_at.date_naive()).num_days();

    match day_delta {
        0 => format!("today at {}", time),
        1 => format!("tomorrow at {}", time),
        -1 => format!("yesterday at {}", time),
        _ if target_at.year() == now_at.year() => {
            format!("on {} at {}", target_at.format("%b %-d"), time)
        }
        _ => format!("on {} at {}", target_at.format("%b %-d, %Y"), time),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // 2023-11-14T22:13:20Z
    const NOV_14_2023: i64 = 1_700_000_000;

    fn utc() -> FixedOffset {
        FixedOffset::east_opt(0).unwrap()
    }

    #[test]
    fn test_phase_boundaries() {
        assert_eq!(Phase::of(86_400), Phase::Distant);
        assert_eq!(Phase::of(86_399), Phase::Imminent);
        assert_eq!(Phase::of(0), Phase::Imminent);
        assert_eq!(Phase::of(-1), Phase::Late);
        assert!(Phase::of(-1).is_late());
        assert!(!Phase::of(0).is_late());
    }

    #[test]
    fn test_distant_always_uses_long_duration() {
        for remaining in [86_400, 90_061, 172_800, 1_000_000, i32::MAX as i64] {
            let (phase, text) = format_remaining(&DefaultFormat, remaining);
            assert_eq!(phase, Phase::Distant);
            assert_eq!(text, DefaultFormat.long_duration(remaining));
            assert!(!text.contains(':'), "long format leaked clock digits: {}", text);
        }
    }

    #[test]
    fn test_imminent_formats_exact_remaining() {
        for remaining in [0, 1, 59, 60, 125, 3_599, 3_600, 3_725, 86_399] {
            let (phase, text) = format_remaining(&DefaultFormat, remaining);
            assert_eq!(phase, Phase::Imminent);
            assert_eq!(text, DefaultFormat.countdown(remaining));
        }
    }

    #[test]
    fn test_late_formats_absolute_value() {
        for remaining in [-1, -30, -3_725, -200_000] {
            let (phase, text) = format_remaining(&DefaultFormat, remaining);
            assert_eq!(phase, Phase::Late);
            assert_eq!(text, DefaultFormat.late_by(-remaining));
            assert_ne!(text, DefaultFormat.countdown(-remaining));
        }
    }

    #[test]
    fn test_late_handles_extreme_values() {
        let (phase, text) = format_remaining(&DefaultFormat, i64::MIN);
        assert_eq!(phase, Phase::Late);
        assert!(text.starts_with('+'));
    }

    #[test]
    fn test_default_countdown_text() {
        assert_eq!(DefaultFormat.countdown(0), "00:00");
        assert_eq!(DefaultFormat.countdown(125), "02:05");
        assert_eq!(DefaultFormat.countdown(3_599), "59:59");
        assert_eq!(DefaultFormat.countdown(3_725), "01:02:05");
        assert_eq!(DefaultFormat.countdown(86_399), "23:59:59");
    }

    #[test]
    fn test_default_late_by_text() {
        assert_eq!(DefaultFormat.late_by(30), "+00:30");
        assert_eq!(DefaultFormat.late_by(3_661), "+01:01:01");
    }

    #[test]
    fn test_default_long_duration_text() {
        assert_eq!(DefaultFormat.long_duration(86_400), "1 day");
        assert_eq!(DefaultFormat.long_duration(90_061), "1 day 1 hour");
        assert_eq!(DefaultFormat.long_duration(3 * 86_400), "3 days");
        assert_eq!(DefaultFormat.long_duration(2 * 86_400 + 5 * 3_600), "2 days 5 hours");
        assert_eq!(DefaultFormat.long_duration(7_200), "2 hours");
        assert_eq!(DefaultFormat.long_duration(60), "1 minute");
    }

    #[test]
    fn test_default_titles() {
        assert_eq!(DefaultFormat.title(Phase::Distant), "Starts in");
        assert_eq!(DefaultFormat.title(Phase::Imminent), "Starts in");
        assert_eq!(DefaultFormat.title(Phase::Late), "Late by");
    }

    #[test]
    fn test_custom_policy_is_used() {
        struct Shouty;
        impl CountdownFormat for Shouty {
            fn long_duration(&self, seconds: i64) -> String {
                format!("LONG {}", seconds)
            }
            fn countdown(&self, seconds: i64) -> String {
                format!("SOON {}", seconds)
            }
            fn late_by(&self, seconds: i64) -> String {
                format!("LATE {}", seconds)
            }
            fn title(&self, _phase: Phase) -> String {
                String::new()
            }
        }

        assert_eq!(format_remaining(&Shouty, 90_000).1, "LONG 90000");
        assert_eq!(format_remaining(&Shouty, 5).1, "SOON 5");
        assert_eq!(format_remaining(&Shouty, -5).1, "LATE 5");
    }

    #[test]
    fn test_subtitle_relative_days() {
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023, utc()),
            "today at 22:13"
        );
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023 - 86_400, utc()),
            "tomorrow at 22:13"
        );
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023 + 86_400, utc()),
            "yesterday at 22:13"
        );
    }

    #[test]
    fn test_subtitle_calendar_dates() {
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023 - 10 * 86_400, utc()),
            "on Nov 14 at 22:13"
        );
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023 - 365 * 86_400, utc()),
            "on Nov 14, 2023 at 22:13"
        );
    }

    #[test]
    fn test_subtitle_respects_offset() {
        let plus_two = FixedOffset::east_opt(2 * 3_600).unwrap();
        // 00:13 on Nov 15 local, and "now" is the same instant
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023, plus_two),
            "today at 00:13"
        );
        // "now" is 21:00Z, which is still 23:00 on Nov 14 at +2
        assert_eq!(
            schedule_subtitle(NOV_14_2023, NOV_14_2023 - 4_400, plus_two),
            "tomorrow at 00:13"
        );
    }
}
