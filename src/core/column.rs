use std::collections::HashMap;
use std::ops::Range;

use chrono::{NaiveDate, NaiveDateTime, TimeDelta};
use serde::{Deserialize, Serialize};

use super::calendar::Calendar;
use super::day_spans::DaySpans;
use super::layout::{Extent, Rescalable};
use super::magnet::ColumnMagnet;
use super::time_frame::ResolvedTimeFrame;

/// How working or non-working time is displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFramesMode {
    /// Takes its share of the column but is not drawn.
    Hidden,
    Visible,
    /// Takes no space at all; remaining time is stretched over the column.
    Cropped,
}

/// Display modes for working and non-working time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeFramesDisplay {
    pub working: TimeFramesMode,
    pub non_working: TimeFramesMode,
}

impl Default for TimeFramesDisplay {
    fn default() -> Self {
        Self {
            working: TimeFramesMode::Hidden,
            non_working: TimeFramesMode::Visible,
        }
    }
}

impl TimeFramesDisplay {
    #[must_use]
    pub fn new(working: TimeFramesMode, non_working: TimeFramesMode) -> Self {
        Self {
            working,
            non_working,
        }
    }

    #[must_use]
    pub fn mode_for(self, working: bool) -> TimeFramesMode {
        if working {
            self.working
        } else {
            self.non_working
        }
    }

    /// `true` when calendar resolution is pointless (everything hidden).
    #[must_use]
    pub fn is_disabled(self) -> bool {
        self.working == TimeFramesMode::Hidden && self.non_working == TimeFramesMode::Hidden
    }

    #[must_use]
    pub fn is_cropping(self) -> bool {
        self.working == TimeFramesMode::Cropped || self.non_working == TimeFramesMode::Cropped
    }
}

/// Per-column options shared by every generated column.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ColumnSettings {
    pub display: TimeFramesDisplay,
    pub magnet: Option<ColumnMagnet>,
}

/// Resolved calendar interval positioned inside its column.
///
/// `original_size` is relative to the column's original geometry; live
/// geometry is obtained through [`Column::time_frame_extent`].
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnTimeFrame {
    pub frame: ResolvedTimeFrame,
    pub hidden: bool,
    pub cropped: bool,
    pub original_size: Extent,
}

impl ColumnTimeFrame {
    #[must_use]
    pub fn start(&self) -> NaiveDateTime {
        self.frame.start
    }

    #[must_use]
    pub fn end(&self) -> NaiveDateTime {
        self.frame.end
    }

    #[must_use]
    pub fn working(&self) -> bool {
        self.frame.working
    }

    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.frame.duration_ms()
    }
}

/// One time unit of the axis, `[date, end_date)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    date: NaiveDateTime,
    end_date: NaiveDateTime,
    duration_ms: i64,
    left: f64,
    width: f64,
    original_size: Extent,
    factor: f64,
    time_frames: Vec<ColumnTimeFrame>,
    days: HashMap<NaiveDate, Range<usize>>,
    display: TimeFramesDisplay,
    cropped: bool,
    magnet: Option<ColumnMagnet>,
}

impl Column {
    /// Builds a column and resolves its calendar intervals.
    ///
    /// Without a calendar, or when both display modes are hidden, the column
    /// carries no time frames and maps dates linearly.
    #[must_use]
    pub fn new(
        date: NaiveDateTime,
        end_date: NaiveDateTime,
        left: f64,
        width: f64,
        calendar: Option<&Calendar>,
        settings: ColumnSettings,
    ) -> Self {
        let mut column = Self {
            date,
            end_date,
            duration_ms: end_date.signed_duration_since(date).num_milliseconds(),
            left,
            width,
            original_size: Extent::new(left, width),
            factor: 1.0,
            time_frames: Vec::new(),
            days: HashMap::new(),
            display: settings.display,
            cropped: false,
            magnet: settings.magnet,
        };

        match calendar {
            Some(calendar) if !settings.display.is_disabled() => {
                column.resolve_time_frames(calendar);
            }
            _ => {}
        }
        column
    }

    /// Column without calendar intervals.
    #[must_use]
    pub fn plain(date: NaiveDateTime, end_date: NaiveDateTime, left: f64, width: f64) -> Self {
        Self::new(date, end_date, left, width, None, ColumnSettings::default())
    }

    fn resolve_time_frames(&mut self, calendar: &Calendar) {
        let mut frames: Vec<ResolvedTimeFrame> = Vec::new();
        for span in DaySpans::new(self.date, self.end_date) {
            let first = frames.len();
            let day_frames = calendar.get_time_frames(span.day());
            frames.extend(
                Calendar::solve(&day_frames, span.start, span.end)
                    .into_iter()
                    .filter_map(|frame| frame.clipped(self.date, self.end_date)),
            );
            self.days.insert(span.day(), first..frames.len());
        }

        let extents: Vec<Extent> = frames
            .iter()
            .map(|frame| {
                let offset = frame.start.signed_duration_since(self.date).num_milliseconds();
                Extent::new(
                    ratio(offset, self.duration_ms) * self.width,
                    ratio(frame.duration_ms(), self.duration_ms) * self.width,
                )
            })
            .collect();

        let crops: Vec<bool> = frames
            .iter()
            .map(|frame| self.display.mode_for(frame.working) == TimeFramesMode::Cropped)
            .collect();
        let extents = if self.display.is_cropping() {
            self.crop_extents(&extents, &crops)
        } else {
            extents
        };

        self.time_frames = frames
            .into_iter()
            .zip(extents)
            .zip(crops)
            .map(|((frame, original_size), cropped)| ColumnTimeFrame {
                hidden: self.display.mode_for(frame.working) != TimeFramesMode::Visible,
                cropped: cropped && self.display.is_cropping(),
                frame,
                original_size,
            })
            .collect();
    }

    /// Removes cropped width and stretches the kept frames over the column.
    ///
    /// A column with nothing left to show is flagged cropped as a whole.
    fn crop_extents(&mut self, extents: &[Extent], crops: &[bool]) -> Vec<Extent> {
        let kept_width: f64 = extents
            .iter()
            .zip(crops)
            .filter(|(_, cropped)| !**cropped)
            .map(|(extent, _)| extent.width)
            .sum();

        if kept_width <= 0.0 {
            self.cropped = !extents.is_empty();
            return extents.iter().map(|_| Extent::new(0.0, 0.0)).collect();
        }
        if kept_width == self.width {
            return extents.to_vec();
        }

        let cropped_ratio = self.width / kept_width;
        let mut cropped_width = 0.0;
        extents
            .iter()
            .zip(crops)
            .map(|(extent, cropped)| {
                let left = (extent.left - cropped_width) * cropped_ratio;
                if *cropped {
                    cropped_width += extent.width;
                    Extent::new(left, 0.0)
                } else {
                    Extent::new(left, extent.width * cropped_ratio)
                }
            })
            .collect()
    }

    #[must_use]
    pub fn date(&self) -> NaiveDateTime {
        self.date
    }

    #[must_use]
    pub fn end_date(&self) -> NaiveDateTime {
        self.end_date
    }

    #[must_use]
    pub fn duration_ms(&self) -> i64 {
        self.duration_ms
    }

    #[must_use]
    pub fn left(&self) -> f64 {
        self.left
    }

    #[must_use]
    pub fn width(&self) -> f64 {
        self.width
    }

    #[must_use]
    pub fn right(&self) -> f64 {
        self.left + self.width
    }

    #[must_use]
    pub fn extent(&self) -> Extent {
        Extent::new(self.left, self.width)
    }

    #[must_use]
    pub fn width_factor(&self) -> f64 {
        self.factor
    }

    /// `true` when every interval of the column was cropped away.
    #[must_use]
    pub fn is_cropped(&self) -> bool {
        self.cropped
    }

    #[must_use]
    pub fn display(&self) -> TimeFramesDisplay {
        self.display
    }

    #[must_use]
    pub fn magnet(&self) -> Option<ColumnMagnet> {
        self.magnet
    }

    #[must_use]
    pub fn time_frames(&self) -> &[ColumnTimeFrame] {
        &self.time_frames
    }

    pub fn visible_time_frames(&self) -> impl Iterator<Item = &ColumnTimeFrame> {
        self.time_frames.iter().filter(|frame| !frame.hidden)
    }

    /// Time frames resolved for the calendar day `day`.
    #[must_use]
    pub fn day_time_frames(&self, day: NaiveDate) -> &[ColumnTimeFrame] {
        self.days
            .get(&day)
            .and_then(|range| self.time_frames.get(range.clone()))
            .unwrap_or(&[])
    }

    /// Live geometry of one of this column's frames, relative to the column.
    #[must_use]
    pub fn time_frame_extent(&self, frame: &ColumnTimeFrame) -> Extent {
        frame.original_size.scaled(self.factor)
    }

    #[must_use]
    pub fn contains_date(&self, date: NaiveDateTime) -> bool {
        date > self.date && date <= self.end_date
    }

    /// Snaps `date` with the column magnet, if any.
    #[must_use]
    pub fn magnet_date(&self, date: NaiveDateTime) -> NaiveDateTime {
        self.magnet.map_or(date, |magnet| magnet.snap(date))
    }

    /// Date at `position` (relative to the column, clamped to `[0, width]`).
    #[must_use]
    pub fn date_by_position(&self, position: f64, magnet: bool) -> NaiveDateTime {
        let position = position.max(0.0).min(self.width);

        let date = self
            .display
            .is_cropping()
            .then(|| self.date_in_time_frames(position))
            .flatten()
            .unwrap_or_else(|| {
                let offset = ratio_f64(position, self.width) * self.duration_ms as f64;
                add_millis(self.date, offset.round() as i64)
            });

        if magnet { self.magnet_date(date) } else { date }
    }

    fn date_in_time_frames(&self, position: f64) -> Option<NaiveDateTime> {
        self.time_frames
            .iter()
            .filter(|frame| !frame.cropped)
            .find_map(|frame| {
                let extent = self.time_frame_extent(frame);
                extent.contains(position).then(|| {
                    let offset = ratio_f64(position - extent.left, extent.width)
                        * frame.duration_ms() as f64;
                    add_millis(frame.start(), offset.round() as i64)
                })
            })
    }

    /// Position of `date` relative to the column, clamped to `[0, width]`.
    ///
    /// In cropped mode, dates falling in cropped time collapse onto the edge
    /// of the next visible interval.
    #[must_use]
    pub fn position_by_date(&self, date: NaiveDateTime) -> f64 {
        if date <= self.date {
            return 0.0;
        }
        if date >= self.end_date {
            return self.width;
        }

        if self.display.is_cropping() && !self.time_frames.is_empty() {
            return self.cropped_position_by_date(date);
        }

        let offset = date.signed_duration_since(self.date).num_milliseconds();
        ratio(offset, self.duration_ms) * self.width
    }

    fn cropped_position_by_date(&self, date: NaiveDateTime) -> f64 {
        let next_visible = self
            .day_time_frames(date.date())
            .iter()
            .find(|frame| !frame.cropped && frame.end() > date);
        if let Some(frame) = next_visible {
            let extent = self.time_frame_extent(frame);
            if date < frame.start() {
                return extent.left;
            }
            let offset = date.signed_duration_since(frame.start()).num_milliseconds();
            return extent.left + ratio(offset, frame.duration_ms()) * extent.width;
        }

        self.time_frames
            .iter()
            .rev()
            .find(|frame| !frame.cropped && frame.end() <= date)
            .map_or(0.0, |frame| self.time_frame_extent(frame).right())
    }
}

impl Rescalable for Column {
    fn original_size(&self) -> Extent {
        self.original_size
    }

    fn apply_width_factor(&mut self, factor: f64) {
        let live = self.original_size.scaled(factor);
        self.left = live.left;
        self.width = live.width;
        self.factor = factor;
    }
}

/// `numerator / denominator`, or `0` when the denominator is not positive.
fn ratio(numerator: i64, denominator: i64) -> f64 {
    if denominator <= 0 {
        return 0.0;
    }
    numerator as f64 / denominator as f64
}

fn ratio_f64(numerator: f64, denominator: f64) -> f64 {
    if denominator <= 0.0 || !denominator.is_finite() {
        return 0.0;
    }
    numerator / denominator
}

fn add_millis(date: NaiveDateTime, millis: i64) -> NaiveDateTime {
    TimeDelta::try_milliseconds(millis)
        .and_then(|delta| date.checked_add_signed(delta))
        .unwrap_or(date)
}
