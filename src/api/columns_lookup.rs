use chrono::NaiveDateTime;
use ordered_float::OrderedFloat;
use tracing::{debug, warn};

use crate::core::{Column, Rescalable, bracket_by};
use crate::error::GanttResult;

use super::{ColumnsEvent, ColumnsManager, ExpandDirection};

impl ColumnsManager {
    /// First column of the main range, or of the previous extension when `extended`.
    #[must_use]
    pub fn get_first_column(&self, extended: bool) -> Option<&Column> {
        if extended {
            self.previous_columns.first()
        } else {
            self.columns.first()
        }
    }

    /// Last column of the main range, or of the next extension when `extended`.
    #[must_use]
    pub fn get_last_column(&self, extended: bool) -> Option<&Column> {
        if extended {
            self.next_columns.last()
        } else {
            self.columns.last()
        }
    }

    /// Column at `date`, or the next one after it, extending the axis when
    /// `date` lies outside the main range.
    pub fn get_column_by_date(&mut self, date: NaiveDateTime) -> Option<&Column> {
        self.expand_extended_columns_for_date(date);
        let len = self.extended_len();
        let index = bracket_by(len, &date, |index| self.extended_key(index, Column::date))
            .floor_or_ceil(len)?;
        self.extended_column(index)
    }

    /// Column whose left edge is the last one at or before `position`.
    pub fn get_column_by_position(&mut self, position: f64) -> Option<&Column> {
        self.expand_extended_columns_for_position(position);
        let len = self.extended_len();
        let index = bracket_by(len, &OrderedFloat(position), |index| {
            OrderedFloat(self.extended_key(index, Column::left))
        })
        .floor?;
        self.extended_column(index)
    }

    /// Date at absolute `position`, optionally snapped by the column magnet.
    pub fn get_date_by_position(&mut self, position: f64, magnet: bool) -> Option<NaiveDateTime> {
        let column = self.get_column_by_position(position)?;
        Some(column.date_by_position(position - column.left(), magnet))
    }

    /// Absolute position of `date`.
    pub fn get_position_by_date(&mut self, date: NaiveDateTime) -> Option<f64> {
        let column = self.get_column_by_date(date)?;
        Some(column.left() + column.position_by_date(date))
    }

    /// Generates extension columns so that `date` is covered.
    ///
    /// Returns `true` when `date` lies outside the main range. Extensions are
    /// regenerated only when they do not already reach `date`.
    pub fn expand_extended_columns_for_date(&mut self, date: NaiveDateTime) -> bool {
        let (Some(first), Some(last)) = (self.columns.first(), self.columns.last()) else {
            return false;
        };
        let (from, end_date) = (first.date(), last.end_date());

        if date < from {
            let covered = self
                .previous_columns
                .first()
                .is_some_and(|column| column.date() <= date);
            if !covered {
                let generated = self.generator().generate(from, Some(date), None, 0.0, true);
                self.install_extension(ExpandDirection::Left, generated);
            }
            return true;
        }

        if date > end_date {
            let covered = self
                .next_columns
                .last()
                .is_some_and(|column| column.end_date() >= date);
            if !covered {
                let generated = self.generator().generate(
                    end_date,
                    Some(date),
                    None,
                    self.original_width,
                    false,
                );
                self.install_extension(ExpandDirection::Right, generated);
            }
            return true;
        }
        false
    }

    /// Generates extension columns so that absolute `position` is covered.
    pub fn expand_extended_columns_for_position(&mut self, position: f64) -> bool {
        let (Some(first), Some(last)) = (self.columns.first(), self.columns.last()) else {
            return false;
        };
        let (from, end_date) = (first.date(), last.end_date());
        let factor = self.width_factor;

        if position < 0.0 {
            let covered = self
                .previous_columns
                .first()
                .is_some_and(|column| column.left() <= position);
            if !covered {
                let generated =
                    self.generator()
                        .generate(from, None, Some(-position / factor), 0.0, true);
                self.install_extension(ExpandDirection::Left, generated);
            }
            return true;
        }

        if position > self.width {
            let covered = self
                .next_columns
                .last()
                .is_some_and(|column| column.right() >= position);
            if !covered {
                let generated = self.generator().generate(
                    end_date,
                    None,
                    Some((position - self.width) / factor),
                    self.original_width,
                    false,
                );
                self.install_extension(ExpandDirection::Right, generated);
            }
            return true;
        }
        false
    }

    fn install_extension(
        &mut self,
        direction: ExpandDirection,
        generated: GanttResult<Vec<Column>>,
    ) {
        let mut columns = match generated {
            Ok(columns) => columns,
            Err(err) => {
                warn!(error = %err, ?direction, "skipping column extension");
                return;
            }
        };
        for column in &mut columns {
            column.apply_width_factor(self.width_factor);
        }

        let columns_len = columns.len();
        match direction {
            ExpandDirection::Left => self.previous_columns = columns,
            ExpandDirection::Right => self.next_columns = columns,
        }
        debug!(?direction, columns = columns_len, "extended columns");
        self.emit_columns_event(ColumnsEvent::Extended {
            direction,
            columns_len,
        });
    }

    fn extended_len(&self) -> usize {
        self.previous_columns.len() + self.columns.len() + self.next_columns.len()
    }

    /// Column at `index` of previous + main + next columns.
    fn extended_column(&self, index: usize) -> Option<&Column> {
        let mut index = index;
        for slice in [&self.previous_columns, &self.columns, &self.next_columns] {
            if index < slice.len() {
                return slice.get(index);
            }
            index -= slice.len();
        }
        None
    }

    fn extended_key<K: Default>(&self, index: usize, key: impl Fn(&Column) -> K) -> K {
        self.extended_column(index).map(key).unwrap_or_default()
    }
}
