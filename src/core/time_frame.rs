use std::fmt;
use std::sync::Arc;

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Weekday};
use serde::{Deserialize, Serialize};

use crate::error::{GanttError, GanttResult};

use super::time_unit::{midnight, next_midnight};

pub type TimeFrameMappingFn = Arc<dyn Fn(NaiveDate) -> Vec<String> + Send + Sync + 'static>;
pub type DateEvaluatorFn = Arc<dyn Fn(NaiveDate) -> bool + Send + Sync + 'static>;

/// Recurring daily interval flagged working or non-working.
///
/// `start`/`end` are times of day. `None` opens the bound to the start or end
/// of the day, and an `end` of `00:00` also means end of day.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TimeFrame {
    #[serde(default, with = "time_of_day")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "time_of_day")]
    pub end: Option<NaiveTime>,
    #[serde(default)]
    pub working: bool,
    #[serde(default)]
    pub default: bool,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
}

impl TimeFrame {
    /// Working interval between two times of day.
    #[must_use]
    pub fn working(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            working: true,
            ..Self::default()
        }
    }

    /// Non-working interval between two times of day.
    #[must_use]
    pub fn non_working(start: NaiveTime, end: NaiveTime) -> Self {
        Self {
            start: Some(start),
            end: Some(end),
            working: false,
            ..Self::default()
        }
    }

    /// Interval covering the whole day.
    #[must_use]
    pub fn whole_day(working: bool) -> Self {
        Self {
            working,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub fn with_color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Anchors the interval onto `day`.
    #[must_use]
    pub fn resolve(&self, day: NaiveDate) -> ResolvedTimeFrame {
        let end_of_day = next_midnight(day).unwrap_or(NaiveDateTime::MAX);
        let start = self.start.map_or_else(|| midnight(day), |time| day.and_time(time));
        let end = match self.end {
            Some(time) if time != NaiveTime::MIN => day.and_time(time),
            _ => end_of_day,
        };

        ResolvedTimeFrame {
            start,
            end,
            working: self.working,
            color: self.color.clone(),
            classes: self.classes.clone(),
        }
    }
}

/// Time frame anchored on absolute instants.
///
/// Values are built once and never mutated; bound changes produce new values.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTimeFrame {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
    pub working: bool,
    pub color: Option<String>,
    pub classes: Vec<String>,
}

impl ResolvedTimeFrame {
    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.end.signed_duration_since(self.start).num_milliseconds()
    }

    /// Copy of this frame with new bounds.
    #[must_use]
    pub fn with_bounds(&self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self {
            start,
            end,
            ..self.clone()
        }
    }

    /// Intersection with `[start, end)`, or `None` when it is empty.
    #[must_use]
    pub fn clipped(&self, start: NaiveDateTime, end: NaiveDateTime) -> Option<Self> {
        let clipped_start = self.start.max(start);
        let clipped_end = self.end.min(end);
        (clipped_start < clipped_end).then(|| self.with_bounds(clipped_start, clipped_end))
    }
}

/// Date-dependent selection of time frame names.
#[derive(Clone)]
pub struct TimeFrameMapping {
    func: TimeFrameMappingFn,
}

impl TimeFrameMapping {
    pub fn new<F>(func: F) -> Self
    where
        F: Fn(NaiveDate) -> Vec<String> + Send + Sync + 'static,
    {
        Self {
            func: Arc::new(func),
        }
    }

    #[must_use]
    pub fn time_frame_names(&self, day: NaiveDate) -> Vec<String> {
        (self.func)(day)
    }
}

impl fmt::Debug for TimeFrameMapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TimeFrameMapping").finish_non_exhaustive()
    }
}

/// Rule deciding which days a [`DateFrame`] applies to.
#[derive(Clone)]
pub enum DateMatcher {
    Evaluator(DateEvaluatorFn),
    /// Inclusive day range.
    Range { start: NaiveDate, end: NaiveDate },
    Weekdays(Vec<Weekday>),
    /// Matches nothing; used by fallback-only frames.
    Never,
}

impl DateMatcher {
    #[must_use]
    pub fn matches(&self, day: NaiveDate) -> bool {
        match self {
            Self::Evaluator(evaluator) => evaluator(day),
            Self::Range { start, end } => day >= *start && day <= *end,
            Self::Weekdays(days) => days.contains(&day.weekday()),
            Self::Never => false,
        }
    }
}

impl fmt::Debug for DateMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Evaluator(_) => f.write_str("Evaluator(..)"),
            Self::Range { start, end } => f
                .debug_struct("Range")
                .field("start", start)
                .field("end", end)
                .finish(),
            Self::Weekdays(days) => f.debug_tuple("Weekdays").field(days).finish(),
            Self::Never => f.write_str("Never"),
        }
    }
}

/// Associates matching days with time frame or mapping names.
#[derive(Debug, Clone)]
pub struct DateFrame {
    pub matcher: DateMatcher,
    pub targets: Vec<String>,
    pub default: bool,
}

impl DateFrame {
    pub fn new<I, S>(matcher: DateMatcher, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            matcher,
            targets: targets.into_iter().map(Into::into).collect(),
            default: false,
        }
    }

    /// Frame covering one whole day.
    pub fn on_date<I, S>(date: NaiveDate, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(
            DateMatcher::Range {
                start: date,
                end: date,
            },
            targets,
        )
    }

    /// Frame covering an inclusive day range.
    pub fn between<I, S>(start: NaiveDate, end: NaiveDate, targets: I) -> GanttResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if end < start {
            return Err(GanttError::InvalidData(format!(
                "date frame range ends ({end}) before it starts ({start})"
            )));
        }
        Ok(Self::new(DateMatcher::Range { start, end }, targets))
    }

    pub fn on_weekdays<I, S>(weekdays: Vec<Weekday>, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(DateMatcher::Weekdays(weekdays), targets)
    }

    pub fn matching<F, I, S>(evaluator: F, targets: I) -> Self
    where
        F: Fn(NaiveDate) -> bool + Send + Sync + 'static,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(DateMatcher::Evaluator(Arc::new(evaluator)), targets)
    }

    /// Frame used only when no other date frame matches a day.
    pub fn fallback<I, S>(targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(DateMatcher::Never, targets).with_default(true)
    }

    #[must_use]
    pub fn with_default(mut self, default: bool) -> Self {
        self.default = default;
        self
    }

    #[must_use]
    pub fn date_match(&self, day: NaiveDate) -> bool {
        self.matcher.matches(day)
    }
}

/// Parses `HH:MM` / `HH:MM:SS`; `24:00` is accepted as end of day.
pub fn parse_time_of_day(input: &str) -> GanttResult<NaiveTime> {
    let trimmed = input.trim();
    if trimmed == "24:00" || trimmed == "24:00:00" {
        return Ok(NaiveTime::MIN);
    }
    NaiveTime::parse_from_str(trimmed, "%H:%M:%S")
        .or_else(|_| NaiveTime::parse_from_str(trimmed, "%H:%M"))
        .map_err(|_| GanttError::InvalidTimeOfDay(input.to_owned()))
}

pub(crate) mod time_of_day {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_some(&time.format("%H:%M:%S").to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        raw.map(|value| super::parse_time_of_day(&value).map_err(serde::de::Error::custom))
            .transpose()
    }
}
