use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, Months, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike};
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

/// Calendar unit used for view scales, header bands and magnets.
///
/// Variants are declared from finest to coarsest so the derived ordering
/// follows granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    Millisecond,
    Second,
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    Year,
}

impl TimeUnit {
    pub const ALL: [TimeUnit; 9] = [
        TimeUnit::Millisecond,
        TimeUnit::Second,
        TimeUnit::Minute,
        TimeUnit::Hour,
        TimeUnit::Day,
        TimeUnit::Week,
        TimeUnit::Month,
        TimeUnit::Quarter,
        TimeUnit::Year,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Millisecond => "millisecond",
            Self::Second => "second",
            Self::Minute => "minute",
            Self::Hour => "hour",
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Quarter => "quarter",
            Self::Year => "year",
        }
    }

    /// Length in milliseconds for units of constant length.
    #[must_use]
    pub fn fixed_millis(self) -> Option<i64> {
        match self {
            Self::Millisecond => Some(1),
            Self::Second => Some(1_000),
            Self::Minute => Some(60_000),
            Self::Hour => Some(3_600_000),
            Self::Day => Some(86_400_000),
            Self::Week => Some(7 * 86_400_000),
            Self::Month | Self::Quarter | Self::Year => None,
        }
    }

    /// `true` for units strictly shorter than a day.
    #[must_use]
    pub fn is_sub_day(self) -> bool {
        self < Self::Day
    }

    /// Enclosing unit used to count positions of `self` (minute of hour, month of year...).
    #[must_use]
    pub fn parent(self) -> Option<TimeUnit> {
        match self {
            Self::Millisecond => Some(Self::Second),
            Self::Second => Some(Self::Minute),
            Self::Minute => Some(Self::Hour),
            Self::Hour => Some(Self::Day),
            Self::Day => Some(Self::Month),
            Self::Week | Self::Month | Self::Quarter => Some(Self::Year),
            Self::Year => None,
        }
    }

    /// Truncates `date` to the start of the unit period containing it.
    ///
    /// Weeks start on Monday.
    #[must_use]
    pub fn start_of(self, date: NaiveDateTime) -> NaiveDateTime {
        let day = date.date();
        match self {
            Self::Millisecond => {
                let nanos = date.nanosecond() / 1_000_000 * 1_000_000;
                date.with_nanosecond(nanos).unwrap_or(date)
            }
            Self::Second => date.with_nanosecond(0).unwrap_or(date),
            Self::Minute => day
                .and_hms_opt(date.hour(), date.minute(), 0)
                .unwrap_or(date),
            Self::Hour => day.and_hms_opt(date.hour(), 0, 0).unwrap_or(date),
            Self::Day => midnight(day),
            Self::Week => {
                let back = i64::from(day.weekday().num_days_from_monday());
                day.checked_sub_signed(TimeDelta::days(back))
                    .map_or(date, midnight)
            }
            Self::Month => midnight(first_of_month(day, day.month())),
            Self::Quarter => {
                let month = (day.month() - 1) / 3 * 3 + 1;
                midnight(first_of_month(day, month))
            }
            Self::Year => midnight(first_of_month(day, 1)),
        }
    }

    /// `true` when `date` lies exactly on the start of a unit period.
    #[must_use]
    pub fn is_boundary(self, date: NaiveDateTime) -> bool {
        self.start_of(date) == date
    }

    /// Moves `date` by `amount` units (negative moves backwards).
    ///
    /// Month-based units keep the day of month when possible and clamp to the
    /// last day otherwise. Returns `None` on calendar overflow.
    #[must_use]
    pub fn checked_add(self, date: NaiveDateTime, amount: i64) -> Option<NaiveDateTime> {
        if let Some(step) = self.fixed_millis() {
            let delta = TimeDelta::try_milliseconds(step.checked_mul(amount)?)?;
            return date.checked_add_signed(delta);
        }

        let months = match self {
            Self::Month => amount,
            Self::Quarter => amount.checked_mul(3)?,
            _ => amount.checked_mul(12)?,
        };
        let magnitude = Months::new(u32::try_from(months.unsigned_abs()).ok()?);
        if months >= 0 {
            date.checked_add_months(magnitude)
        } else {
            date.checked_sub_months(magnitude)
        }
    }

    /// Number of whole units between two period starts (`to - from`).
    #[must_use]
    pub fn units_between(self, from: NaiveDateTime, to: NaiveDateTime) -> i64 {
        if let Some(step) = self.fixed_millis() {
            return to.signed_duration_since(from).num_milliseconds() / step;
        }

        let months = (i64::from(to.year()) - i64::from(from.year())) * 12
            + i64::from(to.month())
            - i64::from(from.month());
        match self {
            Self::Month => months,
            Self::Quarter => months / 3,
            _ => months / 12,
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = GanttError;

    fn from_str(input: &str) -> GanttResult<Self> {
        let normalized = input.trim().to_ascii_lowercase();
        if normalized == "ms" {
            return Ok(Self::Millisecond);
        }
        let singular = normalized.strip_suffix('s').unwrap_or(&normalized);
        let unit = match singular {
            "millisecond" => Self::Millisecond,
            "second" => Self::Second,
            "minute" => Self::Minute,
            "hour" => Self::Hour,
            "day" => Self::Day,
            "week" => Self::Week,
            "month" => Self::Month,
            "quarter" => Self::Quarter,
            "year" => Self::Year,
            _ => return Err(GanttError::UnknownTimeUnit(input.to_owned())),
        };
        Ok(unit)
    }
}

pub(crate) fn midnight(day: NaiveDate) -> NaiveDateTime {
    day.and_time(NaiveTime::MIN)
}

/// Midnight at the start of the day following `day`.
pub(crate) fn next_midnight(day: NaiveDate) -> Option<NaiveDateTime> {
    day.succ_opt().map(midnight)
}

fn first_of_month(day: NaiveDate, month: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(day.year(), month, 1).unwrap_or(day)
}
