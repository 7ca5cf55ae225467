use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

use super::time_unit::{TimeUnit, midnight};

/// Snapping of dates to multiples of a unit, e.g. `15 minutes`.
///
/// The date is truncated to `unit`, then its position inside the enclosing
/// unit (minute of hour, hour of day...) is rounded to the nearest multiple
/// of `value`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ColumnMagnet {
    pub value: u32,
    pub unit: TimeUnit,
}

impl ColumnMagnet {
    #[must_use]
    pub fn new(value: u32, unit: TimeUnit) -> Self {
        Self { value, unit }
    }

    #[must_use]
    pub fn snap(self, date: NaiveDateTime) -> NaiveDateTime {
        if self.value == 0 {
            return date;
        }

        let value = i64::from(self.value);
        let truncated = self.unit.start_of(date);
        let Some(parent) = self.unit.parent() else {
            let year = i64::from(truncated.year());
            let rounded = round_to_multiple(year, value);
            return i32::try_from(rounded)
                .ok()
                .and_then(|year| NaiveDate::from_ymd_opt(year, 1, 1))
                .map_or(truncated, midnight);
        };

        // Days of the month count from 1, every other position from 0.
        let origin = i64::from(self.unit == TimeUnit::Day);
        let base = self.unit.start_of(parent.start_of(truncated));
        let count = self.unit.units_between(base, truncated) + origin;
        self.unit
            .checked_add(base, round_to_multiple(count, value) - origin)
            .unwrap_or(truncated)
    }
}

fn round_to_multiple(count: i64, value: i64) -> i64 {
    // Halves round up.
    (count as f64 / value as f64 + 0.5).floor() as i64 * value
}

impl fmt::Display for ColumnMagnet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let suffix = if self.value == 1 { "" } else { "s" };
        write!(f, "{} {}{suffix}", self.value, self.unit)
    }
}

impl FromStr for ColumnMagnet {
    type Err = GanttError;

    fn from_str(input: &str) -> GanttResult<Self> {
        let parts: Vec<&str> = input.split_whitespace().collect();
        let (Some(value), Some(unit)) = (parts.first(), parts.last()) else {
            return Err(GanttError::InvalidMagnet(input.to_owned()));
        };
        if parts.len() < 2 {
            return Err(GanttError::InvalidMagnet(input.to_owned()));
        }

        let value = value
            .parse::<u32>()
            .map_err(|_| GanttError::InvalidMagnet(input.to_owned()))?;
        let unit = unit.parse::<TimeUnit>()?;
        Ok(Self { value, unit })
    }
}

impl TryFrom<String> for ColumnMagnet {
    type Error = GanttError;

    fn try_from(value: String) -> GanttResult<Self> {
        value.parse()
    }
}

impl From<ColumnMagnet> for String {
    fn from(magnet: ColumnMagnet) -> Self {
        magnet.to_string()
    }
}
