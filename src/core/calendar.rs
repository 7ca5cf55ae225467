//! Working calendar: rule registries and per-day interval resolution.

use std::cmp::Reverse;

use chrono::{NaiveDate, NaiveDateTime};
use indexmap::IndexMap;
use smallvec::SmallVec;
use tracing::trace;

use super::time_frame::{DateFrame, ResolvedTimeFrame, TimeFrame, TimeFrameMapping};

/// Registry of time frames, time frame mappings and date frames.
///
/// Registration order is kept and matters: it is the tie-breaker when two
/// resolved frames have the same duration. Registering an existing name
/// replaces the value in place without moving it.
#[derive(Debug, Clone, Default)]
pub struct Calendar {
    time_frames: IndexMap<String, TimeFrame>,
    time_frame_mappings: IndexMap<String, TimeFrameMapping>,
    date_frames: IndexMap<String, DateFrame>,
}

impl Calendar {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes every registered object.
    pub fn clear(&mut self) {
        self.time_frames.clear();
        self.time_frame_mappings.clear();
        self.date_frames.clear();
    }

    pub fn register_time_frame(&mut self, name: impl Into<String>, time_frame: TimeFrame) {
        self.time_frames.insert(name.into(), time_frame);
    }

    pub fn register_time_frames<I, S>(&mut self, time_frames: I)
    where
        I: IntoIterator<Item = (S, TimeFrame)>,
        S: Into<String>,
    {
        for (name, time_frame) in time_frames {
            self.register_time_frame(name, time_frame);
        }
    }

    pub fn remove_time_frames<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.time_frames.shift_remove(name.as_ref());
        }
    }

    pub fn clear_time_frames(&mut self) {
        self.time_frames.clear();
    }

    pub fn register_time_frame_mapping(
        &mut self,
        name: impl Into<String>,
        mapping: TimeFrameMapping,
    ) {
        self.time_frame_mappings.insert(name.into(), mapping);
    }

    pub fn register_time_frame_mappings<I, S>(&mut self, mappings: I)
    where
        I: IntoIterator<Item = (S, TimeFrameMapping)>,
        S: Into<String>,
    {
        for (name, mapping) in mappings {
            self.register_time_frame_mapping(name, mapping);
        }
    }

    pub fn remove_time_frame_mappings<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.time_frame_mappings.shift_remove(name.as_ref());
        }
    }

    pub fn clear_time_frame_mappings(&mut self) {
        self.time_frame_mappings.clear();
    }

    pub fn register_date_frame(&mut self, name: impl Into<String>, date_frame: DateFrame) {
        self.date_frames.insert(name.into(), date_frame);
    }

    pub fn register_date_frames<I, S>(&mut self, date_frames: I)
    where
        I: IntoIterator<Item = (S, DateFrame)>,
        S: Into<String>,
    {
        for (name, date_frame) in date_frames {
            self.register_date_frame(name, date_frame);
        }
    }

    pub fn remove_date_frames<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.date_frames.shift_remove(name.as_ref());
        }
    }

    pub fn clear_date_frames(&mut self) {
        self.date_frames.clear();
    }

    #[must_use]
    pub fn time_frame(&self, name: &str) -> Option<&TimeFrame> {
        self.time_frames.get(name)
    }

    #[must_use]
    pub fn time_frame_mapping(&self, name: &str) -> Option<&TimeFrameMapping> {
        self.time_frame_mappings.get(name)
    }

    #[must_use]
    pub fn date_frame(&self, name: &str) -> Option<&DateFrame> {
        self.date_frames.get(name)
    }

    #[must_use]
    pub fn time_frame_names(&self) -> Vec<&str> {
        self.time_frames.keys().map(String::as_str).collect()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time_frames.is_empty()
            && self.time_frame_mappings.is_empty()
            && self.date_frames.is_empty()
    }

    /// Effective time frames for `day`, anchored on that day.
    ///
    /// Matching date frames are used first, then date frames flagged
    /// `default`. Targets resolve through a mapping when one has the name,
    /// otherwise directly to a time frame. When nothing resolves, time frames
    /// flagged `default` apply.
    #[must_use]
    pub fn get_time_frames(&self, day: NaiveDate) -> Vec<ResolvedTimeFrame> {
        let mut date_frames: SmallVec<[&DateFrame; 4]> = self
            .date_frames
            .values()
            .filter(|date_frame| date_frame.date_match(day))
            .collect();
        if date_frames.is_empty() {
            date_frames = self
                .date_frames
                .values()
                .filter(|date_frame| date_frame.default)
                .collect();
        }

        let mut selected: SmallVec<[&TimeFrame; 4]> = SmallVec::new();
        for date_frame in &date_frames {
            for target in &date_frame.targets {
                if let Some(mapping) = self.time_frame_mappings.get(target) {
                    selected.extend(
                        mapping
                            .time_frame_names(day)
                            .iter()
                            .filter_map(|name| self.time_frames.get(name)),
                    );
                } else if let Some(time_frame) = self.time_frames.get(target) {
                    selected.push(time_frame);
                }
            }
        }

        if selected.is_empty() {
            selected.extend(self.time_frames.values().filter(|time_frame| time_frame.default));
        }

        trace!(%day, date_frames = date_frames.len(), time_frames = selected.len(), "resolved calendar day");
        selected
            .into_iter()
            .map(|time_frame| time_frame.resolve(day))
            .collect()
    }

    /// Resolves overlapping frames into an ordered partition of `[start, end)`.
    ///
    /// Without any input frame the whole span is working; otherwise time not
    /// covered by a frame is non-working. Frames are applied from the longest
    /// to the shortest (stable on input order), so a shorter frame always wins
    /// where it overlaps a longer one, and among equal durations the later one
    /// wins.
    #[must_use]
    pub fn solve(
        time_frames: &[ResolvedTimeFrame],
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Vec<ResolvedTimeFrame> {
        if end <= start {
            return Vec::new();
        }

        let seed = ResolvedTimeFrame {
            start,
            end,
            working: time_frames.is_empty(),
            color: time_frames.iter().find_map(|frame| frame.color.clone()),
            classes: time_frames
                .iter()
                .flat_map(|frame| frame.classes.iter().cloned())
                .collect(),
        };
        let mut solved = vec![seed];

        let mut ordered: Vec<&ResolvedTimeFrame> = time_frames.iter().collect();
        ordered.sort_by_key(|frame| Reverse(frame.duration_ms()));

        for frame in ordered {
            if let Some(clipped) = frame.clipped(start, end) {
                solved = splice(solved, clipped);
            }
        }

        solved.retain(|frame| frame.start < frame.end && frame.start < end && frame.end > start);
        solved
    }
}

/// Inserts `frame` into an ordered partition, cutting whatever it overlaps.
///
/// An interval containing the frame is split in three, intervals straddling
/// one of its bounds are truncated, and intervals it fully covers disappear.
fn splice(solved: Vec<ResolvedTimeFrame>, frame: ResolvedTimeFrame) -> Vec<ResolvedTimeFrame> {
    let (frame_start, frame_end) = (frame.start, frame.end);
    let mut spliced = Vec::with_capacity(solved.len() + 2);
    let mut pending = Some(frame);

    for interval in solved {
        if interval.end <= frame_start {
            spliced.push(interval);
            continue;
        }
        if interval.start >= frame_end {
            spliced.extend(pending.take());
            spliced.push(interval);
            continue;
        }

        if interval.start < frame_start {
            spliced.push(interval.with_bounds(interval.start, frame_start));
        }
        spliced.extend(pending.take());
        if interval.end > frame_end {
            spliced.push(interval.with_bounds(frame_end, interval.end));
        }
    }

    spliced.extend(pending);
    spliced
}
