use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::error::{GanttError, GanttResult};

use super::calendar::Calendar;
use super::column::{Column, ColumnSettings};
use super::time_unit::TimeUnit;

/// Nominal column width used when no fixed width is configured.
pub const DEFAULT_COLUMN_WIDTH: f64 = 20.0;

/// Consecutive fully cropped columns tolerated before generation gives up.
const MAX_CROPPED_STREAK: usize = 100_000;

/// Produces contiguous columns of one unit.
#[derive(Debug, Clone, Copy)]
pub struct ColumnGenerator<'a> {
    calendar: Option<&'a Calendar>,
    unit: TimeUnit,
    column_width: f64,
    settings: ColumnSettings,
}

impl<'a> ColumnGenerator<'a> {
    #[must_use]
    pub fn new(unit: TimeUnit, column_width: Option<f64>, settings: ColumnSettings) -> Self {
        Self {
            calendar: None,
            unit,
            column_width: column_width.unwrap_or(DEFAULT_COLUMN_WIDTH),
            settings,
        }
    }

    #[must_use]
    pub fn with_calendar(mut self, calendar: &'a Calendar) -> Self {
        self.calendar = Some(calendar);
        self
    }

    #[must_use]
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    #[must_use]
    pub fn column_width(&self) -> f64 {
        self.column_width
    }

    /// Generates one column per unit starting at `from`.
    ///
    /// Forward generation stops once a kept column reaches `to` (a `to` lying on a
    /// unit boundary gets no column of its own) or once `left` leaves
    /// `maximum_width`. Reverse generation starts just before `from`, walks
    /// backwards until a column starts at or before `to`, and returns columns
    /// in ascending order with decreasing negative offsets.
    pub fn generate(
        &self,
        from: NaiveDateTime,
        to: Option<NaiveDateTime>,
        maximum_width: Option<f64>,
        left_offset: f64,
        reverse: bool,
    ) -> GanttResult<Vec<Column>> {
        if to.is_none() && maximum_width.is_none() {
            return Err(GanttError::MissingGenerationBound);
        }

        let width = self.column_width;
        let step = if reverse { -1 } else { 1 };
        let mut date = self.unit.start_of(from);
        if reverse && date == from {
            match self.unit.checked_add(date, -1) {
                Some(previous) => date = previous,
                None => return Ok(Vec::new()),
            }
        }

        let mut left: f64 = 0.0;
        let mut columns = Vec::new();
        let mut cropped_streak = 0usize;

        loop {
            if maximum_width.is_some_and(|maximum| left.abs() > maximum + width) {
                break;
            }
            let Some(end_date) = self.unit.checked_add(date, 1) else {
                break;
            };

            let offset = if reverse { left - width } else { left };
            let column = Column::new(
                date,
                end_date,
                offset + left_offset,
                width,
                self.calendar,
                self.settings,
            );

            if column.is_cropped() {
                cropped_streak += 1;
                if cropped_streak > MAX_CROPPED_STREAK {
                    warn!(
                        unit = %self.unit,
                        date = %date,
                        skipped = cropped_streak,
                        "calendar crops every column, stopping generation"
                    );
                    break;
                }
            } else {
                cropped_streak = 0;
                left += if reverse { -width } else { width };
                columns.push(column);

                // Only a kept column can satisfy `to`; cropped ones are stepped over.
                let reached = match to {
                    Some(to) if reverse => date <= to,
                    Some(to) => end_date >= to,
                    None => false,
                };
                if reached {
                    break;
                }
            }

            match self.unit.checked_add(date, step) {
                Some(next) => date = next,
                None => break,
            }
        }

        if reverse {
            columns.reverse();
        }
        debug!(
            unit = %self.unit,
            from = %from,
            reverse,
            count = columns.len(),
            "generated columns"
        );
        Ok(columns)
    }
}
