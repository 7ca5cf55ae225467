use std::iter::FusedIterator;

use chrono::{NaiveDate, NaiveDateTime};

use super::time_unit::next_midnight;

/// Part of a single calendar day inside a larger span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DaySpan {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl DaySpan {
    #[must_use]
    pub fn day(self) -> NaiveDate {
        self.start.date()
    }
}

/// Lazy sequence of day boundaries between two instants.
///
/// The first span starts at `start` (possibly mid-day), every following span
/// starts at midnight, and the last one is cut at `end`. Cloning restarts the
/// sequence from the clone point.
#[derive(Debug, Clone)]
pub struct DaySpans {
    cursor: NaiveDateTime,
    end: NaiveDateTime,
}

impl DaySpans {
    #[must_use]
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { cursor: start, end }
    }
}

impl Iterator for DaySpans {
    type Item = DaySpan;

    fn next(&mut self) -> Option<Self::Item> {
        if self.cursor >= self.end {
            return None;
        }

        let span_end = next_midnight(self.cursor.date()).map_or(self.end, |next| next.min(self.end));
        let span = DaySpan {
            start: self.cursor,
            end: span_end,
        };
        self.cursor = span_end;
        Some(span)
    }
}

impl FusedIterator for DaySpans {}
