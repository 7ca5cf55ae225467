use chrono::{NaiveDate, Weekday};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{Calendar, DateFrame, TimeFrame};
use crate::error::{GanttError, GanttResult};

/// Serializable description of a date frame.
///
/// Exactly one matcher is used, checked in order: `date`, `start`/`end`,
/// `weekdays`. A frame with no matcher must be flagged `default`.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DateFrameConfig {
    #[serde(default)]
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub start: Option<NaiveDate>,
    #[serde(default)]
    pub end: Option<NaiveDate>,
    #[serde(default)]
    pub weekdays: Vec<Weekday>,
    #[serde(default)]
    pub targets: Vec<String>,
    #[serde(default)]
    pub default: bool,
}

impl DateFrameConfig {
    pub fn to_date_frame(&self, name: &str) -> GanttResult<DateFrame> {
        let targets = self.targets.iter().cloned();
        let frame = if let Some(date) = self.date {
            DateFrame::on_date(date, targets)
        } else if self.start.is_some() || self.end.is_some() {
            DateFrame::between(
                self.start.unwrap_or(NaiveDate::MIN),
                self.end.unwrap_or(NaiveDate::MAX),
                targets,
            )?
        } else if !self.weekdays.is_empty() {
            DateFrame::on_weekdays(self.weekdays.clone(), targets)
        } else if self.default {
            DateFrame::fallback(targets)
        } else {
            return Err(GanttError::InvalidData(format!(
                "date frame `{name}` needs a date, a range, weekdays or the default flag"
            )));
        };
        Ok(frame.with_default(self.default))
    }
}

/// Serializable calendar: named time frames plus named date frames.
///
/// Time frame mappings are closures and can only be registered in code.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CalendarConfig {
    #[serde(default)]
    pub time_frames: IndexMap<String, TimeFrame>,
    #[serde(default)]
    pub date_frames: IndexMap<String, DateFrameConfig>,
}

impl CalendarConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_time_frame(mut self, name: impl Into<String>, time_frame: TimeFrame) -> Self {
        self.time_frames.insert(name.into(), time_frame);
        self
    }

    #[must_use]
    pub fn with_date_frame(mut self, name: impl Into<String>, date_frame: DateFrameConfig) -> Self {
        self.date_frames.insert(name.into(), date_frame);
        self
    }

    /// Registers every frame into `calendar`, overwriting same-named entries.
    ///
    /// Nothing is registered when a date frame is invalid.
    pub fn apply(&self, calendar: &mut Calendar) -> GanttResult<()> {
        let date_frames = self
            .date_frames
            .iter()
            .map(|(name, config)| Ok((name.clone(), config.to_date_frame(name)?)))
            .collect::<GanttResult<Vec<_>>>()?;

        calendar.register_time_frames(
            self.time_frames
                .iter()
                .map(|(name, frame)| (name.clone(), frame.clone())),
        );
        calendar.register_date_frames(date_frames);
        Ok(())
    }

    pub fn to_calendar(&self) -> GanttResult<Calendar> {
        let mut calendar = Calendar::new();
        self.apply(&mut calendar)?;
        Ok(calendar)
    }

    pub fn to_json_pretty(&self) -> GanttResult<String> {
        serde_json::to_string_pretty(self).map_err(|e| {
            GanttError::InvalidData(format!("failed to serialize calendar: {e}"))
        })
    }

    pub fn from_json_str(input: &str) -> GanttResult<Self> {
        serde_json::from_str(input)
            .map_err(|e| GanttError::InvalidData(format!("failed to parse calendar: {e}")))
    }
}
